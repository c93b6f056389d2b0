use xsem_client::{Command, EventMask, Notifier, NotifyModule};

use crate::cmd::ipi::{open_client, print_reply};
use crate::cmd::{EventArg, EventArgs, ModuleArg};
use crate::exit::{client_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub fn run(args: EventArgs, format: OutputFormat) -> CliResult<i32> {
    let notifier = notifier(&args)?;
    let resp = open_client(&args.device)?
        .register_event(&notifier)
        .map_err(|err| client_error("event register failed", err))?;
    Ok(print_reply(Command::EventRegister, &resp, format))
}

fn notifier(args: &EventArgs) -> CliResult<Notifier> {
    let module = match args.module {
        ModuleArg::Cram => NotifyModule::Cram,
        ModuleArg::Npi => NotifyModule::Npi,
    };

    let mut mask = EventMask::default();
    for event in &args.events {
        mask = mask | event_mask(module, *event)?;
    }

    Ok(if args.disable {
        Notifier::disable(module, mask)
    } else {
        Notifier::enable(module, mask)
    })
}

fn event_mask(module: NotifyModule, event: EventArg) -> CliResult<EventMask> {
    match (module, event) {
        (NotifyModule::Cram, EventArg::Ue) => Ok(EventMask::CRAM_UNCORRECTABLE_ECC),
        (NotifyModule::Cram, EventArg::Ce) => Ok(EventMask::CRAM_CORRECTABLE_ECC),
        (NotifyModule::Cram, EventArg::Crc) => Ok(EventMask::CRAM_CRC),
        (NotifyModule::Cram, EventArg::Internal) => Ok(EventMask::CRAM_INTERNAL),
        (NotifyModule::Npi, EventArg::Crc) => Ok(EventMask::NPI_CRC),
        (NotifyModule::Npi, EventArg::Internal) => Ok(EventMask::NPI_INTERNAL),
        (NotifyModule::Npi, other) => Err(CliError::new(
            USAGE,
            format!("event {other:?} does not exist for the NPI module"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::DeviceArgs;

    fn args(module: ModuleArg, events: Vec<EventArg>, disable: bool) -> EventArgs {
        EventArgs {
            device: DeviceArgs {
                device: "/dev/null".into(),
                timeout: "5s".into(),
                no_ack_check: false,
            },
            module,
            events,
            disable,
        }
    }

    #[test]
    fn cram_events_combine() {
        let notifier = notifier(&args(
            ModuleArg::Cram,
            vec![EventArg::Ue, EventArg::Crc, EventArg::Ce],
            false,
        ))
        .unwrap();
        assert_eq!(notifier.to_args(), [0x1, 0xB, 0x1]);
    }

    #[test]
    fn disable_keeps_module_and_events() {
        let notifier = notifier(&args(ModuleArg::Npi, vec![EventArg::Crc], true)).unwrap();
        assert_eq!(notifier.to_args(), [0x2, 0x1, 0x0]);
    }

    #[test]
    fn npi_rejects_ecc_events() {
        let err = notifier(&args(ModuleArg::Npi, vec![EventArg::Ue], false)).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
