//! Physical address maps.
//!
//! Defaults are the Versal addresses the XilSEM server uses. They are plain
//! structs so that other parts (or a simulated memory) can supply their own.

/// Number of corrected-error address pairs kept in PMC RAM.
pub const MAX_CRAM_ERROR_LOCATIONS: usize = 7;
/// Number of NPI slave skip counter words (four 1-byte counters each).
pub const MAX_NPI_SLAVE_SKIP_WORDS: usize = 8;
/// Number of NPI error information words.
pub const MAX_NPI_ERROR_INFO: usize = 2;
/// Number of CRAM block types with a frame count.
pub const BLOCK_TYPES: usize = 7;

/// Location of the XilSEM status block in PMC RAM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLayout {
    /// First corrected-error low address word.
    pub cram_error_addr_low: u64,
    /// First corrected-error high address word.
    pub cram_error_addr_high: u64,
    /// Distance between consecutive corrected-error entries.
    pub cram_error_addr_stride: u64,
    pub cram_corrected_bits: u64,
    pub cram_status: u64,
    pub npi_status: u64,
    /// First slave skip counter word; the rest follow at 4-byte steps.
    pub npi_slave_skip: u64,
    pub npi_scan_count: u64,
    pub npi_heartbeat_count: u64,
    /// First error information word; the second follows at +4.
    pub npi_error_info: u64,
}

impl Default for StatusLayout {
    fn default() -> Self {
        Self {
            cram_error_addr_low: 0xF201_4000,
            cram_error_addr_high: 0xF201_4004,
            cram_error_addr_stride: 8,
            cram_corrected_bits: 0xF201_4038,
            npi_status: 0xF201_403C,
            npi_slave_skip: 0xF201_4040,
            npi_scan_count: 0xF201_4060,
            npi_heartbeat_count: 0xF201_4064,
            npi_error_info: 0xF201_4068,
            cram_status: 0xF201_4070,
        }
    }
}

impl StatusLayout {
    /// Smallest `(base, len)` window that covers every field.
    pub fn window(&self) -> (u64, usize) {
        let last_error = (MAX_CRAM_ERROR_LOCATIONS as u64 - 1) * self.cram_error_addr_stride;
        let starts = [
            self.cram_error_addr_low,
            self.cram_error_addr_high,
            self.cram_corrected_bits,
            self.cram_status,
            self.npi_status,
            self.npi_slave_skip,
            self.npi_scan_count,
            self.npi_heartbeat_count,
            self.npi_error_info,
        ];
        let ends = [
            self.cram_error_addr_low + last_error + 4,
            self.cram_error_addr_high + last_error + 4,
            self.cram_corrected_bits + 4,
            self.cram_status + 4,
            self.npi_status + 4,
            self.npi_slave_skip + 4 * MAX_NPI_SLAVE_SKIP_WORDS as u64,
            self.npi_scan_count + 4,
            self.npi_heartbeat_count + 4,
            self.npi_error_info + 4 * MAX_NPI_ERROR_INFO as u64,
        ];
        let base = starts.into_iter().min().unwrap_or_default();
        let end = ends.into_iter().max().unwrap_or_default();
        (base, (end - base) as usize)
    }
}

/// Location of the CFRAME registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CframeLayout {
    /// CFRAME register block of row 0.
    pub base: u64,
    /// Distance between the register blocks of consecutive rows.
    pub row_stride: u64,
    /// Offset of the 128-bit SEU CRC register within a row block.
    pub seu_crc: u64,
    /// Offset of the eight last-frame words within a row block.
    pub last_frame: u64,
    /// CFU register holding the number of rows in the device.
    pub row_range: u64,
}

impl Default for CframeLayout {
    fn default() -> Self {
        Self {
            base: 0xF12D_0000,
            row_stride: 0x2000,
            seu_crc: 0x310,
            last_frame: 0x220,
            row_range: 0xF12B_006C,
        }
    }
}

impl CframeLayout {
    /// Register block of `row`.
    pub fn row_base(&self, row: u32) -> u64 {
        self.base + u64::from(row) * self.row_stride
    }

    /// `(base, len)` window covering the register blocks of `rows` rows.
    pub fn window(&self, rows: u32) -> (u64, usize) {
        (self.base, (u64::from(rows.max(1)) * self.row_stride) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_window_spans_whole_block() {
        let (base, len) = StatusLayout::default().window();
        assert_eq!(base, 0xF201_4000);
        assert_eq!(len, 0x74);
    }

    #[test]
    fn cframe_rows_are_strided() {
        let layout = CframeLayout::default();
        assert_eq!(layout.row_base(0), 0xF12D_0000);
        assert_eq!(layout.row_base(3), 0xF12D_6000);
        assert_eq!(layout.window(4), (0xF12D_0000, 0x8000));
    }
}
