//! Input state shared with the gameplay module
//!
//! The platform layer drains OS events into [`Input`] once per frame; the
//! gameplay module only reads it. Per-key transitions use half-transition
//! counting so a press-and-release inside one frame is not lost.

use cinder_math::IVec2;

/// Size of the key state table. Leaves headroom past the named codes so the
/// table layout survives additions without an ABI break.
pub const KEY_COUNT: usize = 128;

/// Key and mouse-button codes understood by the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCode {
    #[default]
    MouseLeft,
    MouseMiddle,
    MouseRight,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,
    Space,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Return,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Shift,
    Control,
    Alt,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
}

impl KeyCode {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-key state for one frame.
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct Key {
    pub is_down: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    /// Number of down/up edges seen this frame.
    pub half_transition_count: u8,
}

/// All input state for one frame, host-allocated once in the persistent
/// arena and passed by address into the gameplay module.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Input {
    pub screen_size: IVec2,
    pub prev_mouse_pos: IVec2,
    pub mouse_pos: IVec2,
    pub rel_mouse: IVec2,
    pub prev_mouse_pos_world: IVec2,
    pub mouse_pos_world: IVec2,
    pub rel_mouse_world: IVec2,
    pub keys: [Key; KEY_COUNT],
}

impl Input {
    #[inline]
    pub fn key_is_down(&self, code: KeyCode) -> bool {
        self.keys[code.index()].is_down
    }

    #[inline]
    pub fn key_pressed_this_frame(&self, code: KeyCode) -> bool {
        let key = self.keys[code.index()];
        key.is_down && key.half_transition_count >= 1
    }

    #[inline]
    pub fn key_released_this_frame(&self, code: KeyCode) -> bool {
        let key = self.keys[code.index()];
        !key.is_down && key.half_transition_count >= 1
    }

    /// Clear per-frame transition state. The platform calls this at the top
    /// of its event pump, before applying the frame's events.
    pub fn clear_frame_transitions(&mut self) {
        for key in &mut self.keys {
            key.just_pressed = false;
            key.just_released = false;
            key.half_transition_count = 0;
        }
        self.rel_mouse = IVec2::ZERO;
        self.rel_mouse_world = IVec2::ZERO;
        self.prev_mouse_pos = self.mouse_pos;
        self.prev_mouse_pos_world = self.mouse_pos_world;
    }

    /// Apply one key edge from the platform event pump.
    pub fn apply_key_event(&mut self, code: KeyCode, down: bool) {
        let key = &mut self.keys[code.index()];
        if key.is_down != down {
            key.half_transition_count = key.half_transition_count.saturating_add(1);
        }
        key.just_pressed = !key.just_pressed && !key.is_down && down;
        key.just_released = !key.just_released && key.is_down && !down;
        key.is_down = down;
    }

    /// Apply a mouse move from the platform event pump.
    pub fn apply_mouse_move(&mut self, pos: IVec2) {
        self.rel_mouse = self.rel_mouse + (pos - self.mouse_pos);
        self.mouse_pos = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeroed_input() -> Input {
        // The host never constructs Input either; it lives in zeroed
        // arena memory.
        unsafe { core::mem::zeroed() }
    }

    #[test]
    fn test_press_and_release_edges() {
        let mut input = zeroed_input();

        input.clear_frame_transitions();
        input.apply_key_event(KeyCode::W, true);
        assert!(input.key_is_down(KeyCode::W));
        assert!(input.key_pressed_this_frame(KeyCode::W));
        assert!(input.keys[KeyCode::W.index()].just_pressed);

        input.clear_frame_transitions();
        assert!(input.key_is_down(KeyCode::W));
        assert!(!input.key_pressed_this_frame(KeyCode::W));

        input.apply_key_event(KeyCode::W, false);
        assert!(input.key_released_this_frame(KeyCode::W));
        assert!(!input.key_is_down(KeyCode::W));
    }

    #[test]
    fn test_tap_within_one_frame_is_not_lost() {
        let mut input = zeroed_input();
        input.clear_frame_transitions();
        input.apply_key_event(KeyCode::Space, true);
        input.apply_key_event(KeyCode::Space, false);

        // Released by frame end, but the tap is still observable.
        assert!(!input.key_is_down(KeyCode::Space));
        assert_eq!(input.keys[KeyCode::Space.index()].half_transition_count, 2);
        assert!(input.key_released_this_frame(KeyCode::Space));
    }

    #[test]
    fn test_mouse_relative_accumulates() {
        let mut input = zeroed_input();
        input.clear_frame_transitions();
        input.apply_mouse_move(IVec2::new(10, 4));
        input.apply_mouse_move(IVec2::new(14, 2));
        assert_eq!(input.mouse_pos, IVec2::new(14, 2));
        assert_eq!(input.rel_mouse, IVec2::new(14, 2));
    }
}
