//! XilSEM status decoding and CFRAME register reads.
//!
//! Unlike the command client, nothing here goes through the IPI mailbox:
//! - [`StatusReader`] loads the CRAM and NPI status blocks the server keeps
//!   in PMC RAM and decodes the packed status words
//! - [`RegisterReader`] loads golden CRC and per-row frame counts straight
//!   from the CFRAME registers
//!
//! Both only read memory, so they can be shared freely between callers.

pub mod cram;
pub mod error;
pub mod layout;
pub mod npi;
pub mod reader;
pub mod registers;

pub use cram::{AddressValidity, CorrectableOutcome, CorrectedError, CramStatus, CramStatusWord};
pub use error::{Result, StatusError};
pub use layout::{
    CframeLayout, StatusLayout, BLOCK_TYPES, MAX_CRAM_ERROR_LOCATIONS, MAX_NPI_ERROR_INFO,
    MAX_NPI_SLAVE_SKIP_WORDS,
};
pub use npi::{NpiErrorInfo, NpiStatus, NpiStatusWord};
pub use reader::StatusReader;
pub use registers::{FrameCounts, RegisterReader};

#[cfg(test)]
pub(crate) mod testing;
