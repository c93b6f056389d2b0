use serde::Serialize;
use xsem_client::{AutoStart, ScanMode, SemConfig};

use crate::cmd::ipi::open_client;
use crate::cmd::DeviceArgs;
use crate::exit::{client_error, status_code, CliResult};
use crate::output::{flag, hex, print_record, OutputFormat};

#[derive(Serialize)]
struct CramConfig {
    raw: u32,
    scan_mode: ScanMode,
    correction_enabled: bool,
    software_ecc: bool,
    auto_start: AutoStart,
}

#[derive(Serialize)]
struct NpiConfig {
    raw: u32,
    software_sha: bool,
    auto_start: AutoStart,
    scan_interval_ms: u32,
}

#[derive(Serialize)]
struct ConfigOutput {
    ack_id: u32,
    status: u32,
    accepted: bool,
    cram: CramConfig,
    npi: NpiConfig,
}

impl From<&SemConfig> for ConfigOutput {
    fn from(config: &SemConfig) -> Self {
        Self {
            ack_id: config.ack_id,
            status: config.status,
            accepted: config.is_accepted(),
            cram: CramConfig {
                raw: config.cram.raw(),
                scan_mode: config.cram.scan_mode(),
                correction_enabled: config.cram.correction_enabled(),
                software_ecc: config.cram.software_ecc(),
                auto_start: config.cram.auto_start(),
            },
            npi: NpiConfig {
                raw: config.npi.raw(),
                software_sha: config.npi.software_sha(),
                auto_start: config.npi.auto_start(),
                scan_interval_ms: config.npi.scan_interval_ms(),
            },
        }
    }
}

pub fn run(args: DeviceArgs, format: OutputFormat) -> CliResult<i32> {
    let config = open_client(&args)?
        .get_config()
        .map_err(|err| client_error("get config failed", err))?;
    let out = ConfigOutput::from(&config);

    let fields = vec![
        ("status", hex(out.status)),
        ("accepted", flag(out.accepted)),
        ("cram", hex(out.cram.raw)),
        ("cram.scan_mode", format!("{:?}", out.cram.scan_mode)),
        ("cram.correction", flag(out.cram.correction_enabled)),
        ("cram.software_ecc", flag(out.cram.software_ecc)),
        ("cram.auto_start", format!("{:?}", out.cram.auto_start)),
        ("npi", hex(out.npi.raw)),
        ("npi.software_sha", flag(out.npi.software_sha)),
        ("npi.auto_start", format!("{:?}", out.npi.auto_start)),
        ("npi.scan_interval_ms", out.npi.scan_interval_ms.to_string()),
    ];
    print_record(&out, &fields, format);
    Ok(status_code(config.status))
}
