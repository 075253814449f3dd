//! File and timestamp probing
//!
//! Thin filesystem layer for the hot-reload controller and asset loading.
//! Timestamp stats fail soft (`None` means "unknown", treated as "no
//! change"); reads draw their buffers from an arena instead of allocating.

use cinder_memory::Arena;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

/// Does `path` exist as a regular file?
pub fn exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Size of the file at `path` in bytes.
pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Modification time of `path`, or `None` if the stat fails.
///
/// A momentarily unreadable file (mid-rebuild, locked) must never crash the
/// frame loop; callers treat `None` as "no change detected".
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Read the whole file into arena memory, null-padding one trailing byte so
/// the buffer doubles as a C-style string. Returns `None` if the file
/// cannot be opened or read; the returned slice excludes the pad byte.
///
/// A failed read rewinds the arena to its pre-call offset, so probing a
/// momentarily unreadable file does not accumulate scratch.
pub fn read_into<'a>(path: &Path, arena: &'a mut Arena) -> Option<&'a [u8]> {
    let size = match file_size(path) {
        Ok(size) => size as usize,
        Err(err) => {
            log::debug!("failed to stat '{}': {}", path.display(), err);
            return None;
        }
    };
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::debug!("failed to open '{}': {}", path.display(), err);
            return None;
        }
    };

    let mark = arena.mark();
    let ptr = arena.alloc(size + 1);
    // Raw-derived so the abandoning rewind below does not conflict with
    // the success path's returned borrow.
    let buffer = unsafe { core::slice::from_raw_parts_mut(ptr.as_ptr(), size + 1) };
    if let Err(err) = file.read_exact(&mut buffer[..size]) {
        log::debug!("failed to read '{}': {}", path.display(), err);
        arena.rewind(mark);
        return None;
    }
    buffer[size] = 0;
    Some(&buffer[..size])
}

/// Copy `src` to `dst` through arena scratch memory.
///
/// The hot-reload controller copies the build artifact to a shadow path and
/// loads the shadow, so the OS never holds the live artifact open while an
/// external rebuild wants to rewrite it. An empty source counts as a
/// failure: it is what a build-in-progress truncation looks like.
pub fn copy(src: &Path, dst: &Path, arena: &Arena) -> io::Result<()> {
    let size = file_size(src)? as usize;
    if size == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("source file '{}' is empty", src.display()),
        ));
    }

    let buffer = arena.alloc_slice(size + 1);
    let mut file = File::open(src)?;
    file.read_exact(&mut buffer[..size])?;
    fs::write(dst, &buffer[..size])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("present.txt");
        assert!(!exists(&path));
        fs::write(&path, b"x").unwrap();
        assert!(exists(&path));
        // Directories are not files.
        assert!(!exists(dir.path()));
    }

    #[test]
    fn test_modified_time_soft_failure() {
        assert!(modified_time(Path::new("/no/such/file")).is_none());
    }

    #[test]
    fn test_read_into_null_pads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shader.wgsl");
        fs::write(&path, b"fn main() {}").unwrap();

        let mut arena = Arena::new(4096);
        let data = read_into(&path, &mut arena).unwrap();
        assert_eq!(data, b"fn main() {}");
        // One trailing nul directly behind the content.
        let padded = unsafe { std::slice::from_raw_parts(data.as_ptr(), data.len() + 1) };
        assert_eq!(padded[data.len()], 0);
    }

    #[test]
    fn test_read_into_missing_file() {
        let mut arena = Arena::new(4096);
        assert!(read_into(Path::new("/no/such/file"), &mut arena).is_none());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_read_into_unreadable_leaves_arena_clean() {
        let dir = tempfile::tempdir().unwrap();
        // Headroom beyond the directory's stat size (4096 on ext4) so the
        // allocation succeeds and the rewind path is the one under test.
        let mut arena = Arena::with_capacity_kb(16);
        // A directory stats fine but cannot be read as a file; whichever
        // branch rejects it, the arena offset is unchanged afterwards.
        assert!(read_into(dir.path(), &mut arena).is_none());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_copy_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("module.so");
        let dst = dir.path().join("module_load.so");
        let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(&src, &payload).unwrap();

        let arena = Arena::with_capacity_kb(64);
        copy(&src, &dst, &arena).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), payload);
        // Source untouched, free for a concurrent rebuild.
        assert_eq!(fs::read(&src).unwrap(), payload);
    }

    #[test]
    fn test_copy_rejects_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("truncated.so");
        File::create(&src).unwrap().flush().unwrap();

        let arena = Arena::new(1024);
        assert!(copy(&src, &dir.path().join("out.so"), &arena).is_err());
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let arena = Arena::new(1024);
        let err = copy(
            Path::new("/no/such/module.so"),
            &dir.path().join("out.so"),
            &arena,
        );
        assert!(err.is_err());
    }
}
