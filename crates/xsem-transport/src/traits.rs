use crate::error::Result;

/// Number of 32-bit words in one IPI message buffer (request or response).
pub const IPI_MSG_LEN: usize = 8;

/// One IPI message buffer as it crosses the mailbox.
pub type IpiMessage = [u32; IPI_MSG_LEN];

/// A blocking request/reply mailbox to the platform management controller.
///
/// Implementations own their concurrency discipline; callers issue one
/// `send` followed by one `receive` per round trip.
pub trait IpiChannel {
    /// Deliver a request buffer to the remote controller.
    fn send(&mut self, message: &IpiMessage) -> Result<()>;

    /// Block until the remote controller replies and return the reply buffer.
    fn receive(&mut self) -> Result<IpiMessage>;
}

impl<C: IpiChannel + ?Sized> IpiChannel for &mut C {
    fn send(&mut self, message: &IpiMessage) -> Result<()> {
        (**self).send(message)
    }

    fn receive(&mut self) -> Result<IpiMessage> {
        (**self).receive()
    }
}

impl<C: IpiChannel + ?Sized> IpiChannel for Box<C> {
    fn send(&mut self, message: &IpiMessage) -> Result<()> {
        (**self).send(message)
    }

    fn receive(&mut self) -> Result<IpiMessage> {
        (**self).receive()
    }
}

/// Read-only view of physical memory shared with the management controller.
///
/// Reads are single 32-bit loads; no multi-word atomicity is implied.
pub trait MemoryRegion {
    /// Load the 32-bit word at physical address `addr`.
    fn read32(&self, addr: u64) -> Result<u32>;
}

impl<M: MemoryRegion + ?Sized> MemoryRegion for &M {
    fn read32(&self, addr: u64) -> Result<u32> {
        (**self).read32(addr)
    }
}

impl<M: MemoryRegion + ?Sized> MemoryRegion for Box<M> {
    fn read32(&self, addr: u64) -> Result<u32> {
        (**self).read32(addr)
    }
}
