//! winit-backed platform collaborator
//!
//! winit delivers events through callbacks; the frame loop wants a
//! poll-style pump. This layer queues translated events as they arrive and
//! drains the queue into the shared `Input` struct once per frame, from
//! `pump_events`. Nothing here blocks.

use cinder_abi::{Input, KeyCode};
use cinder_engine::Platform;
use cinder_math::IVec2;
use std::collections::VecDeque;
use winit::event::MouseButton;
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

/// One translated OS event, queued until the next pump.
#[derive(Debug, Clone, Copy)]
pub enum PlatformEvent {
    Key { code: KeyCode, down: bool },
    MouseMove(IVec2),
    Resize(IVec2),
}

/// Platform state owned by the winit application handler.
pub struct WinitPlatform {
    queue: VecDeque<PlatformEvent>,
    screen_size: IVec2,
    close_requested: bool,
}

impl WinitPlatform {
    pub fn new(screen_size: IVec2) -> Self {
        Self {
            queue: VecDeque::new(),
            screen_size,
            close_requested: false,
        }
    }

    pub fn push(&mut self, event: PlatformEvent) {
        if let PlatformEvent::Resize(size) = event {
            self.screen_size = size;
        }
        self.queue.push_back(event);
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn push_key(&mut self, physical: PhysicalKey, down: bool) {
        if let Some(code) = translate_key(physical) {
            self.push(PlatformEvent::Key { code, down });
        }
    }

    pub fn push_mouse_button(&mut self, button: MouseButton, down: bool) {
        let code = match button {
            MouseButton::Left => KeyCode::MouseLeft,
            MouseButton::Middle => KeyCode::MouseMiddle,
            MouseButton::Right => KeyCode::MouseRight,
            _ => return,
        };
        self.push(PlatformEvent::Key { code, down });
    }
}

impl Platform for WinitPlatform {
    fn pump_events(&mut self, input: &mut Input) -> bool {
        input.clear_frame_transitions();
        input.screen_size = self.screen_size;

        while let Some(event) = self.queue.pop_front() {
            match event {
                PlatformEvent::Key { code, down } => input.apply_key_event(code, down),
                PlatformEvent::MouseMove(pos) => input.apply_mouse_move(pos),
                PlatformEvent::Resize(size) => input.screen_size = size,
            }
        }

        !self.close_requested
    }
}

/// Map a winit physical key to the runtime's key table.
fn translate_key(physical: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = physical else {
        return None;
    };
    Some(match code {
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyB => KeyCode::B,
        WinitKey::KeyC => KeyCode::C,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::KeyE => KeyCode::E,
        WinitKey::KeyF => KeyCode::F,
        WinitKey::KeyG => KeyCode::G,
        WinitKey::KeyH => KeyCode::H,
        WinitKey::KeyI => KeyCode::I,
        WinitKey::KeyJ => KeyCode::J,
        WinitKey::KeyK => KeyCode::K,
        WinitKey::KeyL => KeyCode::L,
        WinitKey::KeyM => KeyCode::M,
        WinitKey::KeyN => KeyCode::N,
        WinitKey::KeyO => KeyCode::O,
        WinitKey::KeyP => KeyCode::P,
        WinitKey::KeyQ => KeyCode::Q,
        WinitKey::KeyR => KeyCode::R,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyT => KeyCode::T,
        WinitKey::KeyU => KeyCode::U,
        WinitKey::KeyV => KeyCode::V,
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyX => KeyCode::X,
        WinitKey::KeyY => KeyCode::Y,
        WinitKey::KeyZ => KeyCode::Z,
        WinitKey::Digit0 => KeyCode::Key0,
        WinitKey::Digit1 => KeyCode::Key1,
        WinitKey::Digit2 => KeyCode::Key2,
        WinitKey::Digit3 => KeyCode::Key3,
        WinitKey::Digit4 => KeyCode::Key4,
        WinitKey::Digit5 => KeyCode::Key5,
        WinitKey::Digit6 => KeyCode::Key6,
        WinitKey::Digit7 => KeyCode::Key7,
        WinitKey::Digit8 => KeyCode::Key8,
        WinitKey::Digit9 => KeyCode::Key9,
        WinitKey::Space => KeyCode::Space,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::Escape => KeyCode::Escape,
        WinitKey::ArrowUp => KeyCode::Up,
        WinitKey::ArrowDown => KeyCode::Down,
        WinitKey::ArrowLeft => KeyCode::Left,
        WinitKey::ArrowRight => KeyCode::Right,
        WinitKey::Backspace => KeyCode::Backspace,
        WinitKey::Enter => KeyCode::Return,
        WinitKey::Delete => KeyCode::Delete,
        WinitKey::Home => KeyCode::Home,
        WinitKey::End => KeyCode::End,
        WinitKey::PageUp => KeyCode::PageUp,
        WinitKey::PageDown => KeyCode::PageDown,
        WinitKey::ShiftLeft | WinitKey::ShiftRight => KeyCode::Shift,
        WinitKey::ControlLeft | WinitKey::ControlRight => KeyCode::Control,
        WinitKey::AltLeft | WinitKey::AltRight => KeyCode::Alt,
        WinitKey::F1 => KeyCode::F1,
        WinitKey::F2 => KeyCode::F2,
        WinitKey::F3 => KeyCode::F3,
        WinitKey::F4 => KeyCode::F4,
        WinitKey::F5 => KeyCode::F5,
        WinitKey::F6 => KeyCode::F6,
        WinitKey::F7 => KeyCode::F7,
        WinitKey::F8 => KeyCode::F8,
        WinitKey::F9 => KeyCode::F9,
        WinitKey::F10 => KeyCode::F10,
        WinitKey::F11 => KeyCode::F11,
        WinitKey::F12 => KeyCode::F12,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeroed_input() -> Box<Input> {
        unsafe { Box::new(core::mem::zeroed()) }
    }

    #[test]
    fn test_pump_drains_queue() {
        let mut platform = WinitPlatform::new(IVec2::new(1280, 640));
        let mut input = zeroed_input();

        platform.push(PlatformEvent::Key { code: KeyCode::W, down: true });
        platform.push(PlatformEvent::MouseMove(IVec2::new(10, 20)));

        assert!(platform.pump_events(&mut input));
        assert!(input.key_is_down(KeyCode::W));
        assert_eq!(input.mouse_pos, IVec2::new(10, 20));
        assert_eq!(input.screen_size, IVec2::new(1280, 640));

        // Queue drained; next pump sees no stale transitions.
        assert!(platform.pump_events(&mut input));
        assert!(!input.key_pressed_this_frame(KeyCode::W));
        assert!(input.key_is_down(KeyCode::W));
    }

    #[test]
    fn test_close_is_reported_on_pump() {
        let mut platform = WinitPlatform::new(IVec2::new(640, 480));
        let mut input = zeroed_input();
        assert!(platform.pump_events(&mut input));
        platform.request_close();
        assert!(!platform.pump_events(&mut input));
    }

    #[test]
    fn test_resize_updates_screen_size() {
        let mut platform = WinitPlatform::new(IVec2::new(640, 480));
        let mut input = zeroed_input();
        platform.push(PlatformEvent::Resize(IVec2::new(1920, 1080)));
        platform.pump_events(&mut input);
        assert_eq!(input.screen_size, IVec2::new(1920, 1080));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let mut platform = WinitPlatform::new(IVec2::new(640, 480));
        platform.push_key(PhysicalKey::Code(WinitKey::NumLock), true);
        assert!(platform.queue.is_empty());
    }
}
