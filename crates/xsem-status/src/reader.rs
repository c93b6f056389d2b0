use tracing::debug;
use xsem_transport::MemoryRegion;

use crate::cram::{CorrectedError, CramStatus, CramStatusWord};
use crate::error::Result;
use crate::layout::{
    StatusLayout, MAX_CRAM_ERROR_LOCATIONS, MAX_NPI_ERROR_INFO, MAX_NPI_SLAVE_SKIP_WORDS,
};
use crate::npi::{NpiStatus, NpiStatusWord};

/// Reads the XilSEM status block from PMC RAM.
///
/// The server updates the block while scanning; a snapshot is a series of
/// independent 32-bit loads and may mix values from two scan cycles.
#[derive(Debug)]
pub struct StatusReader<M> {
    mem: M,
    layout: StatusLayout,
}

impl<M: MemoryRegion> StatusReader<M> {
    pub fn new(mem: M) -> Self {
        Self::with_layout(mem, StatusLayout::default())
    }

    pub fn with_layout(mem: M, layout: StatusLayout) -> Self {
        Self { mem, layout }
    }

    pub fn layout(&self) -> &StatusLayout {
        &self.layout
    }

    pub fn into_inner(self) -> M {
        self.mem
    }

    /// Snapshot of the CRAM scan status and the last corrected errors.
    pub fn cram_status(&self) -> Result<CramStatus> {
        let raw = self.mem.read32(self.layout.cram_status)?;
        let corrected_bits = self.mem.read32(self.layout.cram_corrected_bits)?;

        let mut error_locations = [CorrectedError::decode(0, 0); MAX_CRAM_ERROR_LOCATIONS];
        for (i, location) in error_locations.iter_mut().enumerate() {
            let offset = i as u64 * self.layout.cram_error_addr_stride;
            let low = self.mem.read32(self.layout.cram_error_addr_low + offset)?;
            let high = self.mem.read32(self.layout.cram_error_addr_high + offset)?;
            *location = CorrectedError::decode(low, high);
        }

        debug!(status = raw, corrected_bits, "read CRAM status");
        Ok(CramStatus {
            status: CramStatusWord::decode(raw),
            error_locations,
            corrected_bits,
        })
    }

    /// Snapshot of the NPI scan status.
    pub fn npi_status(&self) -> Result<NpiStatus> {
        let raw = self.mem.read32(self.layout.npi_status)?;
        let scan_count = self.mem.read32(self.layout.npi_scan_count)?;
        let heartbeat_count = self.mem.read32(self.layout.npi_heartbeat_count)?;

        let mut slave_skip = [0u32; MAX_NPI_SLAVE_SKIP_WORDS];
        for (i, word) in slave_skip.iter_mut().enumerate() {
            *word = self.mem.read32(self.layout.npi_slave_skip + 4 * i as u64)?;
        }
        let mut error_info = [0u32; MAX_NPI_ERROR_INFO];
        for (i, word) in error_info.iter_mut().enumerate() {
            *word = self.mem.read32(self.layout.npi_error_info + 4 * i as u64)?;
        }

        debug!(status = raw, scan_count, heartbeat_count, "read NPI status");
        Ok(NpiStatus {
            status: NpiStatusWord::decode(raw),
            slave_skip,
            scan_count,
            heartbeat_count,
            error_info,
        })
    }
}
