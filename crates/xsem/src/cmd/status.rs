use xsem_status::{CramStatus, NpiStatus, StatusLayout, StatusReader};

use crate::cmd::mem::open_memory;
use crate::cmd::{MemArgs, StatusCommand};
use crate::exit::{status_error, CliResult, SUCCESS};
use crate::output::{flag, hex, print_record, Fields, OutputFormat};

pub fn run(command: StatusCommand, format: OutputFormat) -> CliResult<i32> {
    match command {
        StatusCommand::Cram(args) => {
            let status = reader(&args)?
                .cram_status()
                .map_err(|err| status_error("cram status failed", err))?;
            print_record(&status, &cram_fields(&status), format);
        }
        StatusCommand::Npi(args) => {
            let status = reader(&args)?
                .npi_status()
                .map_err(|err| status_error("npi status failed", err))?;
            print_record(&status, &npi_fields(&status), format);
        }
    }
    Ok(SUCCESS)
}

fn reader(args: &MemArgs) -> CliResult<StatusReader<Box<dyn xsem_transport::MemoryRegion>>> {
    let layout = StatusLayout::default();
    let mem = open_memory(&args.mem, &[layout.window()])?;
    Ok(StatusReader::with_layout(mem, layout))
}

fn cram_fields(status: &CramStatus) -> Fields {
    let word = &status.status;
    let mut fields = vec![
        ("status", hex(word.raw)),
        ("scan_included", flag(word.scan_included)),
        ("init", flag(word.init_state)),
        ("observation", flag(word.observation_state)),
        ("correction", flag(word.correction_state)),
        ("idle", flag(word.idle_state)),
        ("injection", flag(word.injection_state)),
        ("fatal", flag(word.fatal_state)),
        ("calibration_timeout", flag(word.calibration_timeout)),
        ("startup_failure", flag(word.startup_failure)),
        ("uncorrectable_ecc", flag(word.uncorrectable_ecc)),
        ("crc_error", flag(word.crc_error)),
        ("correctable_ecc", flag(word.correctable_ecc)),
        ("invalid_error_location", flag(word.invalid_error_location)),
        ("internal_error", flag(word.internal_error)),
        ("correctable_outcome", format!("{:?}", word.correctable_outcome)),
        ("init_complete", flag(word.init_complete)),
        ("scan_disabled", flag(word.scan_disabled)),
        (
            "error_code",
            word.error_code
                .map(|code| format!("{:#04x} {}", code.code(), code.description()))
                .unwrap_or_else(|| "none".to_string()),
        ),
        ("corrected_bits", status.corrected_bits.to_string()),
    ];
    for location in status.error_locations.iter().filter(|loc| loc.is_valid()) {
        fields.push((
            "corrected_error",
            format!(
                "row={} block_type={} frame={:#x} qword={} bit={}",
                location.row, location.block_type, location.frame, location.qword, location.bit
            ),
        ));
    }
    fields
}

fn npi_fields(status: &NpiStatus) -> Fields {
    let word = &status.status;
    let info = status.error_details();
    let skipped: Vec<String> = status
        .slave_skip_counters()
        .iter()
        .enumerate()
        .filter(|(_, count)| **count != 0)
        .map(|(slave, count)| format!("{slave}:{count}"))
        .collect();
    let skipped = if skipped.is_empty() {
        "none".to_string()
    } else {
        skipped.join(",")
    };

    vec![
        ("status", hex(word.raw)),
        ("idle", flag(word.idle_state)),
        ("init", flag(word.init_state)),
        ("scan", flag(word.scan_state)),
        ("sha_injection", flag(word.sha_injection_state)),
        ("sha_mismatch", flag(word.sha_mismatch_state)),
        ("internal_error", flag(word.internal_error_state)),
        ("scan_disabled", flag(word.scan_disabled)),
        ("first_scan_complete", flag(word.first_scan_complete)),
        ("scan_suspended", flag(word.scan_suspended)),
        ("periodic_scan", flag(word.periodic_scan_enabled)),
        ("sha_mismatch_first_scan", flag(word.sha_mismatch_first_scan)),
        ("sha_mismatch_scan", flag(word.sha_mismatch_scan)),
        ("descriptor_header_invalid", flag(word.descriptor_header_invalid)),
        (
            "descriptor_sha_header_invalid",
            flag(word.descriptor_sha_header_invalid),
        ),
        ("slave_address_invalid", flag(word.slave_address_invalid)),
        ("ddrmc_arbitration_failure", flag(word.ddrmc_arbitration_failure)),
        ("gt_arbitration_failure", flag(word.gt_arbitration_failure)),
        ("safety_write_failure", flag(word.safety_write_failure)),
        ("sha_engine_failure", flag(word.sha_engine_failure)),
        ("gpio_write_failure", flag(word.gpio_write_failure)),
        ("execution_time_exceeded", flag(word.execution_time_exceeded)),
        ("descriptors_skipped", flag(word.descriptors_skipped)),
        ("periodic_scan_missed", flag(word.periodic_scan_missed)),
        ("crypto_disabled", flag(word.crypto_disabled)),
        ("scan_count", status.scan_count.to_string()),
        ("heartbeat_count", status.heartbeat_count.to_string()),
        ("slave_skips", skipped),
        ("error_node_id", hex(info.node_id)),
        ("error_descriptor_index", info.descriptor_index.to_string()),
        ("error_slave_skip_index", info.slave_skip_index.to_string()),
    ]
}
