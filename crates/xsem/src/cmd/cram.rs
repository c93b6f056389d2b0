use serde::Serialize;
use xsem_client::{Command, ErrorInjection, FrameAddress, FrameEcc};

use crate::cmd::ipi::{open_client, print_reply};
use crate::cmd::{CramCommand, CramEccArgs, CramInjectArgs};
use crate::exit::{client_error, status_code, CliResult};
use crate::output::{flag, hex, print_record, OutputFormat};

pub fn run(command: CramCommand, format: OutputFormat) -> CliResult<i32> {
    match command {
        CramCommand::Init(args) => {
            let resp = open_client(&args)?
                .cram_init()
                .map_err(|err| client_error("cram init failed", err))?;
            Ok(print_reply(Command::CramInit, &resp, format))
        }
        CramCommand::Start(args) => {
            let resp = open_client(&args)?
                .cram_start_scan()
                .map_err(|err| client_error("cram start failed", err))?;
            Ok(print_reply(Command::CramStartScan, &resp, format))
        }
        CramCommand::Stop(args) => {
            let resp = open_client(&args)?
                .cram_stop_scan()
                .map_err(|err| client_error("cram stop failed", err))?;
            Ok(print_reply(Command::CramStopScan, &resp, format))
        }
        CramCommand::Inject(args) => inject(args, format),
        CramCommand::Ecc(args) => ecc(args, format),
    }
}

fn injection(args: &CramInjectArgs) -> ErrorInjection {
    ErrorInjection {
        row: args.row,
        frame: FrameAddress::new(args.frame, args.block_type),
        qword: args.qword,
        bit: args.bit,
    }
}

fn inject(args: CramInjectArgs, format: OutputFormat) -> CliResult<i32> {
    let injection = injection(&args);
    let resp = open_client(&args.device)?
        .cram_inject_error(&injection)
        .map_err(|err| client_error("cram inject failed", err))?;
    Ok(print_reply(Command::CramInjectError, &resp, format))
}

#[derive(Serialize)]
struct EccOutput {
    row: u32,
    frame: FrameAddress,
    accepted: bool,
    ecc: FrameEcc,
}

fn ecc(args: CramEccArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = FrameAddress::new(args.frame, args.block_type);
    let ecc = open_client(&args.device)?
        .cram_read_frame_ecc(frame, args.row)
        .map_err(|err| client_error("cram ecc failed", err))?;

    let fields = vec![
        ("row", args.row.to_string()),
        ("frame", hex(frame.to_word())),
        ("segment0", hex(ecc.segment0)),
        ("segment1", hex(ecc.segment1)),
        ("status", hex(ecc.status)),
        ("accepted", flag(ecc.is_accepted())),
    ];
    let out = EccOutput {
        row: args.row,
        frame,
        accepted: ecc.is_accepted(),
        ecc,
    };
    print_record(&out, &fields, format);
    Ok(status_code(ecc.status))
}
