// src/printer/summary.rs

//! Functions to print the `--summary` of a scan.

use crate::common::FileSz;
use crate::readers::summary::Summary;

use std::io::{
    Result,
    Write,
};

const OPT_SUMMARY_PRINT_INDENT1: &str = "  ";
const OPT_SUMMARY_PRINT_INDENT2: &str = "      ";

fn filesz_to_string(filesz: Option<FileSz>) -> String {
    match filesz {
        Some(filesz) => format!("{0} (0x{0:X})", filesz),
        None => String::from("unknown"),
    }
}

/// Write the summary of a scan to `out`.
pub fn write_summary<W: Write>(
    summary: &Summary,
    out: &mut W,
) -> Result<()> {
    let indent1 = OPT_SUMMARY_PRINT_INDENT1;
    let indent2 = OPT_SUMMARY_PRINT_INDENT2;
    let sr = &summary.streamreader;
    let fa = &summary.fragmentassembler;
    let lp = &summary.logprocessor;
    writeln!(out)?;
    writeln!(out, "File: {}", summary.path)?;
    match summary.format {
        Some(format) => writeln!(out, "{}Format    : {}", indent1, format)?,
        None => writeln!(out, "{}Format    : unknown", indent1)?,
    }
    writeln!(out, "{}Read:", indent1)?;
    writeln!(out, "{}mode            : {}", indent2, sr.streamreader_mode)?;
    writeln!(out, "{}filesz          : {}", indent2, filesz_to_string(sr.streamreader_filesz))?;
    writeln!(out, "{}bytes           : {}", indent2, sr.streamreader_bytes)?;
    writeln!(out, "{}chunks          : {}", indent2, sr.streamreader_chunks)?;
    writeln!(out, "{}Assembled:", indent1)?;
    writeln!(out, "{}fragments       : {}", indent2, fa.fragmentassembler_fragments)?;
    writeln!(out, "{}peak buffered   : {} (bytes)", indent2, fa.fragmentassembler_peak_buffered)?;
    writeln!(out, "{}interstitial    : {} (bytes)", indent2, fa.fragmentassembler_interstitial_bytes)?;
    writeln!(out, "{}truncated tail  : {} (bytes)", indent2, fa.fragmentassembler_discarded_bytes)?;
    writeln!(out, "{}Processed:", indent1)?;
    writeln!(out, "{}records         : {}", indent2, lp.logprocessor_records_decoded)?;
    writeln!(out, "{}decode errors   : {}", indent2, lp.logprocessor_decode_errors)?;
    if let Some(err) = lp.logprocessor_decode_error_first.as_ref() {
        writeln!(out, "{}first error     : {}", indent2, err)?;
    }
    writeln!(out, "{}records passed  : {}", indent2, lp.logprocessor_records_passed)?;
    writeln!(out, "{}records rejected: {}", indent2, summary.records_rejected())?;
    for (outcome, count) in lp.logprocessor_records_rejected.iter() {
        writeln!(out, "{}  {:<14}: {}", indent2, outcome.to_string(), count)?;
    }
    if lp.logprocessor_unique_values > 0 {
        writeln!(out, "{}unique values   : {}", indent2, lp.logprocessor_unique_values)?;
    }
    writeln!(out, "{}Printed:", indent1)?;
    writeln!(out, "{}lines           : {}", indent2, summary.lines_printed)?;

    Ok(())
}

/// Print the summary of a scan to stderr.
pub fn print_summary(summary: &Summary) {
    let mut stderr_lock = std::io::stderr().lock();
    // stderr is the last resort for messages, nothing to do on failure
    let _ = write_summary(summary, &mut stderr_lock);
}
