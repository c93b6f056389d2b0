//! Client for the XilSEM soft error mitigation service on Versal devices.
//!
//! xsem drives the CRAM and NPI scans run by the platform management
//! controller: start and stop them, inject test errors, read frame ECC and
//! configuration, subscribe to error notifications, and read the status the
//! server publishes in PMC RAM.
//!
//! # Crate Structure
//!
//! - [`transport`]: IPI mailbox and physical memory seams
//! - [`codec`]: request/response buffer layout and byte-stream mailboxes
//! - [`client`]: one blocking method per XilSEM command (behind `client` feature)
//! - [`status`]: status block decoding and CFRAME register reads (behind `status` feature)

/// Re-export transport types.
pub mod transport {
    pub use xsem_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use xsem_codec::*;
}

/// Re-export client types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use xsem_client::*;
}

/// Re-export status types (requires `status` feature).
#[cfg(feature = "status")]
pub mod status {
    pub use xsem_status::*;
}
