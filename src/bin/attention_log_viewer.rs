// src/bin/attention_log_viewer.rs

//! Driver program _attention-log-viewer_.
//!
//! Reads an Oracle Database 21c attention log and prints each entry as
//! `KEY : value` lines, optionally only the entries of one attention type
//! and/or urgency.

#![allow(non_camel_case_types)]

mod cli;

use std::process::ExitCode;

use ::clap::Parser;
use ::const_format::concatcp;
use ::olslib::common::{
    FPath,
    PATH_STDIN,
};
use ::olslib::data::attention::{
    AttentionType,
    Urgency,
};
use ::olslib::data::common::RecordFormat;
use ::olslib::filter::filterspec::{
    AttentionFilter,
    RecordFilter,
};
use ::olslib::readers::logprocessor::{
    ScanConfig,
    ScanMode,
};
use ::olslib::readers::streamreader::{
    BlockSz,
    ReadMode,
    ReadModeKind,
    BLOCKSZ_DEF,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
    stack::stack_offset_set,
};

use cli::{
    cli_parse_blocksz,
    exit_code,
    process_path,
    CLI_HELP_AFTER_READ_MODE,
    CLI_VERSION,
};

/// Printed first when no filter is given.
const HEADER_ALL_ENTRIES: &str = "Printing all attention log entries.";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
An entry matches ATTENTION_TYPE when one of its keys is that type, e.g.
\"ERROR\". An entry matches URGENCY when one of its values is that urgency,
e.g. \"URGENCY\" : \"IMMEDIATE\", or begins with it, e.g. \"IMMEDIATE: …\".
Both are case-insensitive.

",
    CLI_HELP_AFTER_READ_MODE,
);

#[derive(Parser, Debug)]
#[clap(
    name = "attention-log-viewer",
    about = "Oracle Database 21c Attention Log Viewer Filter",
    version = CLI_VERSION,
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Location of the attention.log. Pass "-" to read STDIN.
    #[clap(short = 'f', long, default_value = PATH_STDIN)]
    file: FPath,

    /// Type of notification.
    #[clap(short = 'n', long = "attention_type", value_enum, ignore_case = true)]
    attention_type: Option<AttentionType>,

    /// Type of urgency.
    #[clap(short = 'u', long, value_enum, ignore_case = true)]
    urgency: Option<Urgency>,

    /// How the log is read.
    #[clap(long = "read-mode", value_enum, default_value_t = ReadModeKind::Lines)]
    read_mode: ReadModeKind,

    /// Read block size in bytes, for "--read-mode blocks".
    #[clap(long, default_value_t = BLOCKSZ_DEF, value_parser = cli_parse_blocksz)]
    blocksz: BlockSz,

    /// Print a summary of processing to stderr.
    #[clap(short, long)]
    summary: bool,
}

/// Turn the parsed arguments into a [`ScanConfig`] and optional header
/// line.
fn cli_process_args(args: &CLI_Args) -> (ScanConfig, Option<&'static str>) {
    let filter = AttentionFilter {
        attention_type: args.attention_type,
        urgency: args.urgency,
    };
    let header: Option<&'static str> = match filter.is_empty() {
        true => Some(HEADER_ALL_ENTRIES),
        false => None,
    };
    let config = ScanConfig {
        format: RecordFormat::Attention,
        read_mode: ReadMode::new(args.read_mode, args.blocksz),
        mode: ScanMode::Project(RecordFilter::Attention(filter)),
    };

    (config, header)
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args = CLI_Args::parse();
    defo!("{:?}", args);
    let (config, header) = cli_process_args(&args);
    let exitcode: ExitCode = exit_code(process_path(&args.file, config, header, args.summary));
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ---------------------------------------------------------------------------
