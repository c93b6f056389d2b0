use serde::Serialize;
use tracing::debug;
use xsem_transport::MemoryRegion;

use crate::error::Result;
use crate::layout::{CframeLayout, BLOCK_TYPES};

/// Width of one frame count in the last-frame register.
const FRAME_COUNT_BITS: u32 = 20;
/// Number of 32-bit words in the last-frame register.
const LAST_FRAME_WORDS: usize = 8;
/// Block types packed in each half (words 0..4 and 4..8) of the register.
const TYPES_PER_HALF: usize = 4;
/// Valid bits of the CFU row range register.
const ROW_RANGE_MASK: u32 = 0x1F;

/// Total frames of each block type in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameCounts(pub [u32; BLOCK_TYPES]);

impl FrameCounts {
    /// Unpack the last-frame register words.
    ///
    /// Counts are 20 bits wide and packed back to back from bit 0 of
    /// word 0 (types 0..=3) and of word 4 (types 4..=6), so most of them
    /// straddle a word boundary.
    pub fn from_words(words: &[u32; LAST_FRAME_WORDS]) -> Self {
        let mut counts = [0u32; BLOCK_TYPES];
        for (ty, count) in counts.iter_mut().enumerate() {
            let half = &words[(ty / TYPES_PER_HALF) * TYPES_PER_HALF..];
            let start = (ty % TYPES_PER_HALF) as u32 * FRAME_COUNT_BITS;
            *count = bit_field(half, start, FRAME_COUNT_BITS);
        }
        Self(counts)
    }

    /// Frames of `block_type`; unknown types have none.
    pub fn frames(&self, block_type: u32) -> u32 {
        self.0.get(block_type as usize).copied().unwrap_or(0)
    }

    /// Whether `frame` exists in `block_type` and can be targeted for
    /// injection. A block type with zero frames never can.
    pub fn is_injectable(&self, block_type: u32, frame: u32) -> bool {
        frame < self.frames(block_type)
    }
}

/// Extract `width` bits starting at bit `start` of a little-endian word array.
fn bit_field(words: &[u32], start: u32, width: u32) -> u32 {
    let index = (start / 32) as usize;
    let shift = start % 32;
    let low = u64::from(words[index]);
    let high = words.get(index + 1).copied().map_or(0, u64::from);
    let joined = (high << 32) | low;
    ((joined >> shift) & ((1u64 << width) - 1)) as u32
}

/// Reads golden values straight from the CFRAME registers.
#[derive(Debug)]
pub struct RegisterReader<M> {
    mem: M,
    layout: CframeLayout,
}

impl<M: MemoryRegion> RegisterReader<M> {
    pub fn new(mem: M) -> Self {
        Self::with_layout(mem, CframeLayout::default())
    }

    pub fn with_layout(mem: M, layout: CframeLayout) -> Self {
        Self { mem, layout }
    }

    pub fn layout(&self) -> &CframeLayout {
        &self.layout
    }

    /// Golden CRC of `row`.
    ///
    /// The SEU CRC register is 128 bits wide and must be read as four
    /// consecutive words; only the third one holds the CRC.
    pub fn golden_crc(&self, row: u32) -> Result<u32> {
        let addr = self.layout.row_base(row) + self.layout.seu_crc;
        let mut words = [0u32; 4];
        for (i, word) in words.iter_mut().enumerate() {
            *word = self.mem.read32(addr + 4 * i as u64)?;
        }
        debug!(row, crc = words[2], "read golden CRC");
        Ok(words[2])
    }

    /// Frame counts of every block type in `row`.
    pub fn total_frames(&self, row: u32) -> Result<FrameCounts> {
        let addr = self.layout.row_base(row) + self.layout.last_frame;
        let mut words = [0u32; LAST_FRAME_WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            *word = self.mem.read32(addr + 4 * i as u64)?;
        }
        let counts = FrameCounts::from_words(&words);
        debug!(row, counts = ?counts.0, "read frame counts");
        Ok(counts)
    }

    /// Number of CFRAME rows in the device.
    pub fn row_range(&self) -> Result<u32> {
        Ok(self.mem.read32(self.layout.row_range)? & ROW_RANGE_MASK)
    }
}
