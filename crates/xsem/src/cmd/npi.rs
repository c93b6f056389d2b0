use xsem_client::Command;

use crate::cmd::ipi::{open_client, print_reply};
use crate::cmd::NpiCommand;
use crate::exit::{client_error, CliResult};
use crate::output::OutputFormat;

pub fn run(command: NpiCommand, format: OutputFormat) -> CliResult<i32> {
    let (command, resp) = match command {
        NpiCommand::Start(args) => (
            Command::NpiStartScan,
            open_client(&args)?
                .npi_start_scan()
                .map_err(|err| client_error("npi start failed", err))?,
        ),
        NpiCommand::Stop(args) => (
            Command::NpiStopScan,
            open_client(&args)?
                .npi_stop_scan()
                .map_err(|err| client_error("npi stop failed", err))?,
        ),
        NpiCommand::Inject(args) => (
            Command::NpiInjectError,
            open_client(&args)?
                .npi_inject_error()
                .map_err(|err| client_error("npi inject failed", err))?,
        ),
        NpiCommand::Sha(args) => (
            Command::NpiGoldenSha,
            open_client(&args.device)?
                .npi_golden_sha(args.buffer)
                .map_err(|err| client_error("npi sha failed", err))?,
        ),
    };
    Ok(print_reply(command, &resp, format))
}
