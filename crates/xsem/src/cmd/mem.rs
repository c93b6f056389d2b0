use std::path::Path;

use xsem_transport::MemoryRegion;

use crate::exit::CliResult;

/// Physical memory with the given `(base, len)` windows mapped.
#[cfg(unix)]
pub fn open_memory(path: &Path, windows: &[(u64, usize)]) -> CliResult<Box<dyn MemoryRegion>> {
    use crate::exit::transport_error;
    use xsem_transport::DevMem;

    let mut mem = DevMem::open(path).map_err(|err| transport_error("open failed", err))?;
    for (base, len) in windows {
        mem.map(*base, *len)
            .map_err(|err| transport_error("map failed", err))?;
    }
    Ok(Box::new(mem))
}

#[cfg(not(unix))]
pub fn open_memory(path: &Path, _windows: &[(u64, usize)]) -> CliResult<Box<dyn MemoryRegion>> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!(
            "{}: physical memory access is only supported on unix hosts",
            path.display()
        ),
    ))
}
