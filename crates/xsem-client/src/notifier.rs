use std::ops::BitOr;

use serde::Serialize;

/// XilSEM module a notification subscription refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum NotifyModule {
    Cram = 0x1,
    Npi = 0x2,
}

/// Bitmask of events within one module.
///
/// Bit meanings depend on the module, hence the per-module constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct EventMask(pub u32);

impl EventMask {
    pub const CRAM_UNCORRECTABLE_ECC: EventMask = EventMask(0x1);
    pub const CRAM_CRC: EventMask = EventMask(0x2);
    pub const CRAM_INTERNAL: EventMask = EventMask(0x4);
    pub const CRAM_CORRECTABLE_ECC: EventMask = EventMask(0x8);
    /// SHA mismatch detected by the NPI scan.
    pub const NPI_CRC: EventMask = EventMask(0x1);
    pub const NPI_INTERNAL: EventMask = EventMask(0x2);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

/// Whether a registration turns notification on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum NotifyFlag {
    Disable = 0x0,
    Enable = 0x1,
}

/// Event notification subscription request.
///
/// The client keeps no record of registrations: unsubscribing is
/// registering the same module and events again with [`NotifyFlag::Disable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Notifier {
    pub module: NotifyModule,
    pub event: EventMask,
    pub flag: NotifyFlag,
}

impl Notifier {
    pub fn enable(module: NotifyModule, event: EventMask) -> Self {
        Self {
            module,
            event,
            flag: NotifyFlag::Enable,
        }
    }

    pub fn disable(module: NotifyModule, event: EventMask) -> Self {
        Self {
            module,
            event,
            flag: NotifyFlag::Disable,
        }
    }

    /// Request arguments in wire order: module, event, flag.
    pub fn to_args(&self) -> [u32; 3] {
        [self.module as u32, self.event.bits(), self.flag as u32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_and_disable_differ_only_in_flag() {
        let events = EventMask::CRAM_CRC | EventMask::CRAM_UNCORRECTABLE_ECC;
        let on = Notifier::enable(NotifyModule::Cram, events);
        let off = Notifier::disable(NotifyModule::Cram, events);

        assert_eq!(on.to_args(), [0x1, 0x3, 0x1]);
        assert_eq!(off.to_args(), [0x1, 0x3, 0x0]);
    }

    #[test]
    fn event_mask_contains() {
        let events = EventMask::NPI_CRC | EventMask::NPI_INTERNAL;
        assert!(events.contains(EventMask::NPI_INTERNAL));
        assert!(!EventMask::CRAM_CRC.contains(EventMask::CRAM_CORRECTABLE_ECC));
    }
}
