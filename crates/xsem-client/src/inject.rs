use serde::Serialize;

/// Bits [19:0] of a frame address: frame number.
pub const FRAME_NUMBER_MASK: u32 = 0x000F_FFFF;
/// Bits [22:20] of a frame address: block type.
pub const BLOCK_TYPE_SHIFT: u32 = 20;
pub const BLOCK_TYPE_MASK: u32 = 0x7;

/// CRAM frame address (EFAR).
///
/// Packed verbatim: out-of-range fields are left for the server to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameAddress {
    /// Frame number within the block.
    pub frame: u32,
    /// Block type, 0..=6.
    pub block_type: u32,
}

impl FrameAddress {
    pub fn new(frame: u32, block_type: u32) -> Self {
        Self { frame, block_type }
    }

    /// Split a packed frame address.
    pub fn from_word(word: u32) -> Self {
        Self {
            frame: word & FRAME_NUMBER_MASK,
            block_type: (word >> BLOCK_TYPE_SHIFT) & BLOCK_TYPE_MASK,
        }
    }

    /// Packed frame address as sent on the wire.
    pub fn to_word(self) -> u32 {
        self.frame | (self.block_type << BLOCK_TYPE_SHIFT)
    }
}

/// Location of a single-bit CRAM error injection.
///
/// The server is authoritative for every range (row < CFU row range,
/// qword < 25, bit < 128, frame < frame count of the block); no local checks
/// are made. Quadword 12 holds ECC bits and is the safe place to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ErrorInjection {
    pub row: u32,
    pub frame: FrameAddress,
    pub qword: u32,
    pub bit: u32,
}

impl ErrorInjection {
    /// Request arguments in wire order: frame address, qword, bit, row.
    pub fn to_args(&self) -> [u32; 4] {
        [self.frame.to_word(), self.qword, self.bit, self.row]
    }
}
