mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "xsem", version, about = "XilSEM soft error mitigation client")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{CramCommand, EventArg, ModuleArg, NpiCommand, StatusCommand};

    #[test]
    fn parses_cram_inject() {
        let cli = Cli::try_parse_from([
            "xsem",
            "cram",
            "inject",
            "--device",
            "/dev/ipi",
            "--row",
            "5",
            "--frame",
            "0x100",
            "--bit",
            "64",
        ])
        .expect("inject args should parse");

        match cli.command {
            Command::Cram(CramCommand::Inject(args)) => {
                assert_eq!(args.row, 5);
                assert_eq!(args.frame, 0x100);
                assert_eq!(args.block_type, 0);
                assert_eq!(args.qword, 12);
                assert_eq!(args.bit, 64);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn inject_requires_location() {
        let err = Cli::try_parse_from(["xsem", "cram", "inject", "--device", "/dev/ipi"])
            .expect_err("missing row/frame/bit should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_event_list() {
        let cli = Cli::try_parse_from([
            "xsem",
            "event",
            "cram",
            "--device",
            "/dev/ipi",
            "--events",
            "ue,crc",
            "--disable",
        ])
        .expect("event args should parse");

        match cli.command {
            Command::Event(args) => {
                assert_eq!(args.module, ModuleArg::Cram);
                assert_eq!(args.events, vec![EventArg::Ue, EventArg::Crc]);
                assert!(args.disable);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_npi_sha_hex_buffer() {
        let cli = Cli::try_parse_from([
            "xsem", "npi", "sha", "--device", "/dev/ipi", "--buffer", "0x1000_0000",
        ])
        .expect("sha args should parse");
        assert!(matches!(
            cli.command,
            Command::Npi(NpiCommand::Sha(ref args)) if args.buffer == 0x1000_0000
        ));
    }

    #[test]
    fn status_defaults_to_dev_mem() {
        let cli = Cli::try_parse_from(["xsem", "status", "npi"]).expect("status should parse");
        match cli.command {
            Command::Status(StatusCommand::Npi(args)) => {
                assert_eq!(args.mem, std::path::PathBuf::from("/dev/mem"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_frames_row_and_format() {
        let cli = Cli::try_parse_from(["xsem", "frames", "3", "--format", "json"])
            .expect("frames should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Frames(ref args) if args.row == 3));
    }
}
