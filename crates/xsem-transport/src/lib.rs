//! IPI mailbox and physical memory access seams.
//!
//! Provides the two ways the XilSEM client reaches the platform management
//! controller:
//! - [`IpiChannel`]: blocking send/receive of fixed-size IPI message buffers
//! - [`MemoryRegion`]: 32-bit loads from physical memory (PMC RAM, CFRAME registers)
//!
//! This is the lowest layer of xsem. The mailbox driver itself lives outside
//! this workspace; anything that can move eight words each way can implement
//! [`IpiChannel`].

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod devmem;

pub use error::{Result, TransportError};
pub use traits::{IpiChannel, IpiMessage, MemoryRegion, IPI_MSG_LEN};

#[cfg(unix)]
pub use devmem::DevMem;
