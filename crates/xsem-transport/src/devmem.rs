use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::MemoryRegion;

/// Physical memory access through a `/dev/mem`-style character device.
///
/// Windows are mapped read-only with `MAP_SHARED`; every read is a single
/// volatile 32-bit load, so hardware registers with read side effects see
/// exactly the accesses the caller issues.
pub struct DevMem {
    file: File,
    path: PathBuf,
    windows: Vec<Window>,
}

struct Window {
    base: u64,
    len: usize,
    ptr: *mut libc::c_void,
    map_len: usize,
    page_offset: usize,
}

impl Window {
    fn contains(&self, addr: u64) -> bool {
        let Some(end) = self.base.checked_add(self.len as u64) else {
            return false;
        };
        addr >= self.base && addr.checked_add(4).is_some_and(|last| last <= end)
    }
}

// SAFETY: DevMem owns its mappings exclusively and only hands out copies of
// loaded words. The mapped pages stay valid until Drop regardless of thread.
unsafe impl Send for DevMem {}

// SAFETY: the mappings are read-only and reads go through `&self` with
// volatile single-word loads, which are safe to issue concurrently.
unsafe impl Sync for DevMem {}

impl DevMem {
    /// Default physical memory device.
    pub const DEFAULT_PATH: &'static str = "/dev/mem";

    /// Open a physical memory device without mapping anything yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_SYNC)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;
        debug!(?path, "opened physical memory device");

        Ok(Self {
            file,
            path,
            windows: Vec::new(),
        })
    }

    /// Map `len` bytes of physical memory starting at `base`.
    ///
    /// `base` does not need to be page aligned; the mapping is widened to the
    /// enclosing page internally.
    pub fn map(&mut self, base: u64, len: usize) -> Result<()> {
        if len == 0 {
            return Err(TransportError::Map {
                base,
                len,
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty window"),
            });
        }

        let page = page_size();
        let page_offset = (base % page as u64) as usize;
        let page_base = base - page_offset as u64;
        let map_len = page_offset + len;
        let offset = libc::off_t::try_from(page_base).map_err(|_| TransportError::Map {
            base,
            len,
            source: io::Error::new(io::ErrorKind::InvalidInput, "base exceeds off_t range"),
        })?;

        // SAFETY: the fd is an open device owned by `self.file`; a null hint lets
        // the kernel choose the address, `offset` is page aligned and the result
        // is checked against MAP_FAILED before use.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                map_len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                self.file.as_raw_fd(),
                offset,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(TransportError::Map {
                base,
                len,
                source: io::Error::last_os_error(),
            });
        }

        info!(
            path = ?self.path,
            base = format_args!("{base:#x}"),
            len,
            "mapped physical memory window"
        );

        self.windows.push(Window {
            base,
            len,
            ptr,
            map_len,
            page_offset,
        });
        Ok(())
    }

    /// Builder form of [`DevMem::map`].
    pub fn with_window(mut self, base: u64, len: usize) -> Result<Self> {
        self.map(base, len)?;
        Ok(self)
    }

    /// Path of the underlying device.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MemoryRegion for DevMem {
    fn read32(&self, addr: u64) -> Result<u32> {
        if addr % 4 != 0 {
            return Err(TransportError::Misaligned { addr });
        }
        let window = self
            .windows
            .iter()
            .find(|window| window.contains(addr))
            .ok_or(TransportError::Unmapped { addr })?;
        let offset = window.page_offset + (addr - window.base) as usize;

        // SAFETY: `contains` guarantees offset + 4 <= map_len; the mapping base is
        // page aligned and `addr` is 4-byte aligned, so the pointer is aligned.
        let word = unsafe {
            std::ptr::read_volatile(window.ptr.cast::<u8>().add(offset).cast::<u32>())
        };
        Ok(word)
    }
}

impl Drop for DevMem {
    fn drop(&mut self) {
        for window in self.windows.drain(..) {
            // SAFETY: ptr/map_len come from a successful mmap in `map` and are
            // unmapped exactly once here.
            unsafe {
                libc::munmap(window.ptr, window.map_len);
            }
        }
    }
}

impl std::fmt::Debug for DevMem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let windows: Vec<(u64, usize)> = self.windows.iter().map(|w| (w.base, w.len)).collect();
        f.debug_struct("DevMem")
            .field("path", &self.path)
            .field("windows", &windows)
            .finish()
    }
}

fn page_size() -> usize {
    // SAFETY: sysconf has no memory-safety preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backing_file(tag: &str, words: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "xsem-devmem-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        let bytes: Vec<u8> = (0..words as u32)
            .flat_map(|i| (0xA000_0000 | i).to_le_bytes())
            .collect();
        std::fs::write(&path, bytes).expect("backing file should be writable");
        path
    }

    #[test]
    fn reads_words_through_unaligned_window() {
        let page = page_size();
        let path = backing_file("read", page / 2);
        let base = (page + 8) as u64;

        let mem = DevMem::open(&path)
            .expect("file should open")
            .with_window(base, 16)
            .expect("window should map");

        let first = mem.read32(base).expect("first word in window");
        let last = mem.read32(base + 12).expect("last word in window");
        assert_eq!(first, 0xA000_0000 | ((page as u32 + 8) / 4));
        assert_eq!(last, 0xA000_0000 | ((page as u32 + 20) / 4));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_unmapped_and_misaligned_reads() {
        let path = backing_file("reject", 64);
        let mem = DevMem::open(&path)
            .expect("file should open")
            .with_window(0x10, 0x10)
            .expect("window should map");

        assert!(matches!(
            mem.read32(0x20),
            Err(TransportError::Unmapped { addr: 0x20 })
        ));
        assert!(matches!(
            mem.read32(0x0C),
            Err(TransportError::Unmapped { addr: 0x0C })
        ));
        assert!(matches!(
            mem.read32(0x12),
            Err(TransportError::Misaligned { addr: 0x12 })
        ));
        assert_eq!(mem.read32(0x1C).expect("last word"), 0xA000_0007);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_missing_device_reports_path() {
        let err = DevMem::open("/nonexistent/xsem/mem").unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/xsem/mem"));
    }

    #[test]
    fn empty_window_is_rejected() {
        let path = backing_file("empty", 4);
        let mut mem = DevMem::open(&path).expect("file should open");
        assert!(matches!(mem.map(0, 0), Err(TransportError::Map { .. })));
        let _ = std::fs::remove_file(&path);
    }
}
