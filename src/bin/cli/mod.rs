// src/bin/cli/mod.rs

//! Command-line helpers shared by `listener-log-filter` and
//! `attention-log-viewer`.

use std::process::ExitCode;

use ::anyhow::Context;
use ::const_format::concatcp;
use ::olslib::common::{
    FPath,
    FILESZ_ADVISORY,
};
use ::olslib::debug::printers::{
    e_err,
    e_wrn,
};
use ::olslib::printer::printers::{
    PrinterRecord,
    SinkResult,
};
use ::olslib::printer::summary::print_summary;
use ::olslib::readers::logprocessor::{
    LogProcessor,
    ScanConfig,
    ScanStatus,
};
use ::olslib::readers::streamreader::{
    BlockSz,
    StreamReader,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--version` message body, after the program name.
pub const CLI_VERSION: &str = concatcp!(
    "\n",
    "Version: ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "MSRV: ",
    env!("CARGO_PKG_RUST_VERSION"),
    "\n",
    "License: ",
    env!("CARGO_PKG_LICENSE"),
    CLI_HELP_AFTER_NOTE_DEBUG,
);

/// `--help` afterword about `--read-mode`, shared by both programs.
pub const CLI_HELP_AFTER_READ_MODE: &str = "\
Read modes:
    lines   read one line at a time (default)
    blocks  read --blocksz bytes at a time
    eager   read the entire input at once; memory grows with the input

Exit status is 0 when the input was read to the end, or when the output was
closed early (e.g. piped to `head`). Exit status is 1 when the input could not
be read.";

/// `clap` argument parser for `--blocksz`. Accepts `0x`, `0o`, and `0b`
/// prefixed numbers.
pub fn cli_parse_blocksz(blockszs: &str) -> std::result::Result<BlockSz, String> {
    let errs = format!("Unable to parse a number for --blocksz {:?}", blockszs);
    let parsed = if let Some(hex) = blockszs.strip_prefix("0x") {
        BlockSz::from_str_radix(hex, 16)
    } else if let Some(oct) = blockszs.strip_prefix("0o") {
        BlockSz::from_str_radix(oct, 8)
    } else if let Some(bin) = blockszs.strip_prefix("0b") {
        BlockSz::from_str_radix(bin, 2)
    } else {
        blockszs.parse::<BlockSz>()
    };
    let blocksz: BlockSz = match parsed {
        Ok(val) => val,
        Err(err) => return Err(format!("{} {}", errs, err)),
    };
    if blocksz == 0 {
        return Err(format!("--blocksz must be greater than 0, it was {:?}", blockszs));
    }

    Ok(blocksz)
}

/// Warn about a very large input; processing continues.
fn filesz_advisory(streamreader: &StreamReader) {
    match streamreader.filesz() {
        Some(filesz) if filesz > FILESZ_ADVISORY => {
            e_wrn!("The file size is over 1 GB. Processing might take some time.");
            e_wrn!("If you see this warning, you might want to start questioning your career choice as an Oracle DBA.");
            e_wrn!("At least start rotating the listener log so that it doesn't grow so large.");
        }
        _ => {}
    }
}

/// Scan the log at `path` per `config`, printing to stdout.
///
/// `header` is printed before any record.
pub fn process_path(
    path: &FPath,
    config: ScanConfig,
    header: Option<&str>,
    summary: bool,
) -> ::anyhow::Result<ScanStatus> {
    defn!("({:?}, {:?})", path, config);
    let mut processor = LogProcessor::new(config).context("invalid configuration")?;
    let read_mode = processor.config().read_mode;
    let mut streamreader =
        StreamReader::open(path, read_mode).with_context(|| format!("cannot open {:?}", path))?;
    filesz_advisory(&streamreader);
    let mut printer = PrinterRecord::stdout();
    if let Some(header) = header {
        if printer
            .print_line(header.as_bytes())
            .context("cannot write to stdout")?
            == SinkResult::Closed
        {
            defx!("return OutputClosed");
            return Ok(ScanStatus::OutputClosed);
        }
    }
    let result = processor.run(&mut streamreader, &mut printer);
    if summary {
        print_summary(&processor.summary_complete(&streamreader, &printer));
    }
    let status: ScanStatus = result.with_context(|| format!("error processing {:?}", path))?;
    defx!("return {:?}", status);

    Ok(status)
}

/// Determine a process exit code from the result of [`process_path`].
pub fn exit_code(result: ::anyhow::Result<ScanStatus>) -> ExitCode {
    match result {
        Ok(_status) => {
            defo!("status {:?}", _status);
            ExitCode::SUCCESS
        }
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
