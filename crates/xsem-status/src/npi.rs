use serde::Serialize;

use crate::layout::{MAX_NPI_ERROR_INFO, MAX_NPI_SLAVE_SKIP_WORDS};

/// NPI status word, decoded.
///
/// Every field mirrors one bit of `raw`; combinations are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NpiStatusWord {
    pub raw: u32,
    pub idle_state: bool,
    pub init_state: bool,
    pub scan_state: bool,
    pub sha_injection_state: bool,
    pub sha_mismatch_state: bool,
    pub internal_error_state: bool,
    /// Bit 8: scan is disabled in the design.
    pub scan_disabled: bool,
    pub first_scan_complete: bool,
    pub scan_suspended: bool,
    pub periodic_scan_enabled: bool,
    /// Bit 16: SHA mismatch on the first scan.
    pub sha_mismatch_first_scan: bool,
    pub sha_mismatch_scan: bool,
    pub descriptor_header_invalid: bool,
    pub descriptor_sha_header_invalid: bool,
    pub slave_address_invalid: bool,
    /// Bit 21: DDRMC main slave arbitration failed.
    pub ddrmc_arbitration_failure: bool,
    pub gt_arbitration_failure: bool,
    pub safety_write_failure: bool,
    pub sha_engine_failure: bool,
    pub gpio_write_failure: bool,
    /// Bit 28: scan exceeded its time budget.
    pub execution_time_exceeded: bool,
    /// Bit 29: pulse check failed and descriptors were skipped.
    pub descriptors_skipped: bool,
    pub periodic_scan_missed: bool,
    /// Bit 31: crypto blocks disabled for export compliance.
    pub crypto_disabled: bool,
}

impl NpiStatusWord {
    pub fn decode(raw: u32) -> Self {
        let bit = |n: u32| raw & (1 << n) != 0;
        Self {
            raw,
            idle_state: bit(0),
            init_state: bit(1),
            scan_state: bit(2),
            sha_injection_state: bit(3),
            sha_mismatch_state: bit(4),
            internal_error_state: bit(5),
            scan_disabled: bit(8),
            first_scan_complete: bit(9),
            scan_suspended: bit(10),
            periodic_scan_enabled: bit(11),
            sha_mismatch_first_scan: bit(16),
            sha_mismatch_scan: bit(17),
            descriptor_header_invalid: bit(18),
            descriptor_sha_header_invalid: bit(19),
            slave_address_invalid: bit(20),
            ddrmc_arbitration_failure: bit(21),
            gt_arbitration_failure: bit(22),
            safety_write_failure: bit(23),
            sha_engine_failure: bit(24),
            gpio_write_failure: bit(25),
            execution_time_exceeded: bit(28),
            descriptors_skipped: bit(29),
            periodic_scan_missed: bit(30),
            crypto_disabled: bit(31),
        }
    }
}

/// Where the last SHA mismatch was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NpiErrorInfo {
    /// Node id of the failing descriptor (word 0).
    pub node_id: u32,
    /// Word 1 bits [15:8].
    pub descriptor_index: u32,
    /// Word 1 bits [7:0].
    pub slave_skip_index: u32,
}

/// NPI scan status block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpiStatus {
    pub status: NpiStatusWord,
    /// Raw slave skip counter words.
    pub slave_skip: [u32; MAX_NPI_SLAVE_SKIP_WORDS],
    /// Completed periodic scan cycles.
    pub scan_count: u32,
    /// Scanned descriptor slaves.
    pub heartbeat_count: u32,
    pub error_info: [u32; MAX_NPI_ERROR_INFO],
}

impl NpiStatus {
    /// The 32 one-byte skip counters, counter `4 * w + b` being byte `b`
    /// (least significant first) of word `w`.
    pub fn slave_skip_counters(&self) -> [u8; 4 * MAX_NPI_SLAVE_SKIP_WORDS] {
        let mut counters = [0u8; 4 * MAX_NPI_SLAVE_SKIP_WORDS];
        for (chunk, word) in counters.chunks_exact_mut(4).zip(self.slave_skip) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        counters
    }

    pub fn error_details(&self) -> NpiErrorInfo {
        NpiErrorInfo {
            node_id: self.error_info[0],
            descriptor_index: (self.error_info[1] >> 8) & 0xFF,
            slave_skip_index: self.error_info[1] & 0xFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAG_BITS: [u32; 24] = [
        0, 1, 2, 3, 4, 5, 8, 9, 10, 11, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 28, 29, 30, 31,
    ];

    fn flags(word: &NpiStatusWord) -> [bool; 24] {
        [
            word.idle_state,
            word.init_state,
            word.scan_state,
            word.sha_injection_state,
            word.sha_mismatch_state,
            word.internal_error_state,
            word.scan_disabled,
            word.first_scan_complete,
            word.scan_suspended,
            word.periodic_scan_enabled,
            word.sha_mismatch_first_scan,
            word.sha_mismatch_scan,
            word.descriptor_header_invalid,
            word.descriptor_sha_header_invalid,
            word.slave_address_invalid,
            word.ddrmc_arbitration_failure,
            word.gt_arbitration_failure,
            word.safety_write_failure,
            word.sha_engine_failure,
            word.gpio_write_failure,
            word.execution_time_exceeded,
            word.descriptors_skipped,
            word.periodic_scan_missed,
            word.crypto_disabled,
        ]
    }

    #[test]
    fn each_flag_tracks_only_its_bit() {
        for (i, bit) in FLAG_BITS.iter().enumerate() {
            let alone = NpiStatusWord::decode(1 << bit);
            let others = NpiStatusWord::decode(!(1 << bit));

            for (j, value) in flags(&alone).iter().enumerate() {
                assert_eq!(*value, i == j, "bit {bit} set alone, field {j}");
            }
            for (j, value) in flags(&others).iter().enumerate() {
                assert_eq!(*value, i != j, "bit {bit} cleared alone, field {j}");
            }
        }
    }

    #[test]
    fn reserved_bits_set_no_flag() {
        let reserved = (0b11 << 6) | (0xF << 12) | (0b11 << 26);
        let word = NpiStatusWord::decode(reserved);
        assert!(flags(&word).iter().all(|f| !f));
        assert_eq!(word.raw, reserved);
    }

    #[test]
    fn contradictory_states_pass_through() {
        let word = NpiStatusWord::decode(0b101);
        assert!(word.idle_state);
        assert!(word.scan_state);
    }

    fn status_with(slave_skip: [u32; 8], error_info: [u32; 2]) -> NpiStatus {
        NpiStatus {
            status: NpiStatusWord::decode(0),
            slave_skip,
            scan_count: 0,
            heartbeat_count: 0,
            error_info,
        }
    }

    #[test]
    fn skip_counters_unpack_bytes_in_order() {
        let status = status_with([0x0403_0201, 0, 0, 0, 0, 0, 0, 0xFF00_00AA], [0, 0]);
        let counters = status.slave_skip_counters();

        assert_eq!(&counters[..4], &[1, 2, 3, 4]);
        assert_eq!(counters[28], 0xAA);
        assert_eq!(counters[31], 0xFF);
        assert!(counters[4..28].iter().all(|c| *c == 0));
    }

    #[test]
    fn error_details_split_word_one() {
        let status = status_with([0; 8], [0x1812_0034, 0xFFFF_2A07]);
        let info = status.error_details();

        assert_eq!(info.node_id, 0x1812_0034);
        assert_eq!(info.descriptor_index, 0x2A);
        assert_eq!(info.slave_skip_index, 0x07);
    }
}
