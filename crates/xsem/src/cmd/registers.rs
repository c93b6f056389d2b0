use serde::Serialize;
use xsem_status::{CframeLayout, FrameCounts, RegisterReader};
use xsem_transport::MemoryRegion;

use crate::cmd::mem::open_memory;
use crate::cmd::{MemArgs, RowArgs};
use crate::exit::{status_error, CliResult, SUCCESS};
use crate::output::{hex, print_record, print_rows, OutputFormat};

fn row_reader(args: &RowArgs) -> CliResult<RegisterReader<Box<dyn MemoryRegion>>> {
    let layout = CframeLayout::default();
    let window = (layout.row_base(args.row), layout.row_stride as usize);
    let mem = open_memory(&args.mem.mem, &[window])?;
    Ok(RegisterReader::with_layout(mem, layout))
}

#[derive(Serialize)]
struct FramesOutput {
    row: u32,
    frames: FrameCounts,
}

pub fn frames(args: RowArgs, format: OutputFormat) -> CliResult<i32> {
    let frames = row_reader(&args)?
        .total_frames(args.row)
        .map_err(|err| status_error("frame count read failed", err))?;

    let rows: Vec<Vec<String>> = frames
        .0
        .iter()
        .enumerate()
        .map(|(block_type, count)| {
            vec![
                args.row.to_string(),
                block_type.to_string(),
                count.to_string(),
            ]
        })
        .collect();
    let out = FramesOutput {
        row: args.row,
        frames,
    };
    print_rows(&out, &["ROW", "BLOCK_TYPE", "FRAMES"], &rows, format);
    Ok(SUCCESS)
}

#[derive(Serialize)]
struct CrcOutput {
    row: u32,
    golden_crc: u32,
}

pub fn crc(args: RowArgs, format: OutputFormat) -> CliResult<i32> {
    let golden_crc = row_reader(&args)?
        .golden_crc(args.row)
        .map_err(|err| status_error("golden CRC read failed", err))?;

    let out = CrcOutput {
        row: args.row,
        golden_crc,
    };
    let fields = vec![("row", args.row.to_string()), ("golden_crc", hex(golden_crc))];
    print_record(&out, &fields, format);
    Ok(SUCCESS)
}

#[derive(Serialize)]
struct RowsOutput {
    rows: u32,
}

pub fn rows(args: MemArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = CframeLayout::default();
    let mem = open_memory(&args.mem, &[(layout.row_range, 4)])?;
    let rows = RegisterReader::with_layout(mem, layout)
        .row_range()
        .map_err(|err| status_error("row range read failed", err))?;

    print_record(
        &RowsOutput { rows },
        &vec![("rows", rows.to_string())],
        format,
    );
    Ok(SUCCESS)
}
