//! Blocking XilSEM command client.
//!
//! One method per remote capability of the XilSEM server: CRAM and NPI
//! scan control, error injection, frame ECC readout, configuration readout
//! and event notification registration. Every call is a single blocking
//! request/reply over an [`IpiChannel`](xsem_transport::IpiChannel).
//!
//! Transport success does not mean the server accepted the operation: the
//! primary status in the returned reply says that.

pub mod attributes;
pub mod client;
pub mod error;
pub mod inject;
pub mod notifier;
pub mod reply;

pub use attributes::{AutoStart, CramAttributes, NpiAttributes, ScanMode};
pub use client::{ClientConfig, SemClient};
pub use error::{ClientError, Result};
pub use inject::{ErrorInjection, FrameAddress};
pub use notifier::{EventMask, Notifier, NotifyFlag, NotifyModule};
pub use reply::{FrameEcc, IpiResponse, SemConfig};
pub use xsem_codec::{Command, CramErrorCode};
