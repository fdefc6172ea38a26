// src/bin/listener_log_filter.rs

//! Driver program _listener-log-filter_.
//!
//! Processes user-passed command-line arguments.
//! Then reads an Oracle Database XML formatted listener log, printing one
//! line per `<msg>` record that passes the filters.
//!
//! With `--list-hosts`, prints the sorted unique `host_addr` values instead.
//!
//! With `--recent-errors`, prints only records whose text has an error
//! marker and whose time is within the last `--error-hours` hours.

#![allow(non_camel_case_types)]

mod cli;

use std::process::ExitCode;

use ::clap::Parser;
use ::const_format::concatcp;
use ::olslib::common::FPath;
use ::olslib::data::common::RecordFormat;
use ::olslib::debug::printers::e_wrn;
use ::olslib::filter::filterspec::{
    ListenerFilter,
    RecencyWindow,
    RecordFilter,
    HORIZON_HOURS_DEFAULT,
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

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Each printed line looks like:
    time=2023-09-11 14:02:33 org_id=oracle comp_id=tnslsnr type=UNKNOWN level=16 host_id=db01 host_addr=10.0.0.1 pid=None <text>

Absent attributes print as \"None\".

",
    CLI_HELP_AFTER_READ_MODE,
);

#[derive(Parser, Debug)]
#[clap(
    name = "listener-log-filter",
    about = "Filter and print XML messages from the Oracle Database XML formatted listener log",
    version = CLI_VERSION,
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path to the XML formatted listener log. Pass "-" to read STDIN.
    #[clap(short = 'f', long, required = true)]
    file: FPath,

    /// Filter by host address.
    #[clap(short = 'a', long = "host_addr")]
    host_addr: Option<String>,

    /// Filter by comp_id.
    #[clap(short = 'c', long = "comp_id")]
    comp_id: Option<String>,

    /// Filter by host_id.
    #[clap(long = "host_id", visible_alias = "hid")]
    host_id: Option<String>,

    /// Filter by org_id.
    #[clap(short = 'o', long = "org_id")]
    org_id: Option<String>,

    /// Filter by pid.
    #[clap(short = 'p', long)]
    pid: Option<String>,

    /// Filter by message type.
    #[clap(short = 't', long = "type")]
    msg_type: Option<String>,

    /// List all unique host addresses from the log. Other filters are
    /// ignored.
    #[clap(long = "list-hosts", visible_alias = "lh", conflicts_with = "recent_errors")]
    list_hosts: bool,

    /// Show only recent errors from the log.
    #[clap(long = "recent-errors", visible_alias = "re")]
    recent_errors: bool,

    /// Hours to look back for recent errors.
    #[clap(
        long = "error-hours",
        visible_alias = "eh",
        requires = "recent_errors",
        default_value_t = HORIZON_HOURS_DEFAULT,
        value_parser = cli_parse_error_hours,
    )]
    error_hours: i64,

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

/// `clap` argument parser for `--error-hours`.
fn cli_parse_error_hours(hours: &str) -> std::result::Result<i64, String> {
    match hours.parse::<i64>() {
        Ok(val) if val >= 0 => Ok(val),
        Ok(val) => Err(format!("--error-hours must be 0 or more, it was {}", val)),
        Err(err) => Err(format!("Unable to parse a number for --error-hours {:?} {}", hours, err)),
    }
}

/// Turn the parsed arguments into a [`ScanConfig`].
fn cli_process_args(args: &CLI_Args) -> ScanConfig {
    defn!();
    let read_mode = ReadMode::new(args.read_mode, args.blocksz);
    let filter = ListenerFilter {
        host_addr: args.host_addr.clone(),
        pid: args.pid.clone(),
        org_id: args.org_id.clone(),
        comp_id: args.comp_id.clone(),
        msg_type: args.msg_type.clone(),
        host_id: args.host_id.clone(),
        recent_errors: match args.recent_errors {
            true => Some(RecencyWindow::from_now(args.error_hours)),
            false => None,
        },
    };
    let mode: ScanMode = match args.list_hosts {
        true => {
            if filter.has_field_constraints() {
                e_wrn!("--list-hosts ignores the other filter arguments");
            }
            ScanMode::UniqueHosts
        }
        false => ScanMode::Project(RecordFilter::Listener(filter)),
    };
    defx!("{:?}", mode);

    ScanConfig {
        format: RecordFormat::Listener,
        read_mode,
        mode,
    }
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args = CLI_Args::parse();
    defo!("{:?}", args);
    let config: ScanConfig = cli_process_args(&args);
    let exitcode: ExitCode = exit_code(process_path(&args.file, config, None, args.summary));
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CLI_Args {
        CLI_Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse(&["listener-log-filter", "-f", "listener.log"]);
        assert_eq!(args.file, "listener.log");
        assert_eq!(args.error_hours, HORIZON_HOURS_DEFAULT);
        assert_eq!(args.read_mode, ReadModeKind::Lines);
        assert_eq!(args.blocksz, BLOCKSZ_DEF);
        let config = cli_process_args(&args);
        assert_eq!(config.read_mode, ReadMode::Lines);
        assert_eq!(config.mode, ScanMode::Project(RecordFilter::Listener(ListenerFilter::default())));
    }

    #[test]
    fn test_cli_file_required() {
        assert!(CLI_Args::try_parse_from(["listener-log-filter"]).is_err());
    }

    #[test]
    fn test_cli_filters() {
        let args = parse(&[
            "listener-log-filter", "-f", "-", "-a", "10.0.0.1", "-p", "42", "--hid", "db01", "-t", "UNKNOWN",
            "-o", "oracle", "-c", "tnslsnr",
        ]);
        let config = cli_process_args(&args);
        let filter = match config.mode {
            ScanMode::Project(RecordFilter::Listener(filter)) => filter,
            mode => panic!("unexpected mode {:?}", mode),
        };
        assert_eq!(filter.host_addr.as_deref(), Some("10.0.0.1"));
        assert_eq!(filter.pid.as_deref(), Some("42"));
        assert_eq!(filter.host_id.as_deref(), Some("db01"));
        assert_eq!(filter.msg_type.as_deref(), Some("UNKNOWN"));
        assert_eq!(filter.org_id.as_deref(), Some("oracle"));
        assert_eq!(filter.comp_id.as_deref(), Some("tnslsnr"));
        assert!(filter.recent_errors.is_none());
    }

    #[test]
    fn test_cli_error_hours_requires_recent_errors() {
        assert!(CLI_Args::try_parse_from(["listener-log-filter", "-f", "x", "--error-hours", "2"]).is_err());
        let args = parse(&["listener-log-filter", "-f", "x", "--re", "--eh", "2"]);
        let config = cli_process_args(&args);
        match config.mode {
            ScanMode::Project(RecordFilter::Listener(filter)) => {
                assert_eq!(filter.recent_errors.map(|w| w.horizon_hours), Some(2));
            }
            mode => panic!("unexpected mode {:?}", mode),
        }
    }

    #[test]
    fn test_cli_error_hours_negative() {
        assert!(CLI_Args::try_parse_from(["listener-log-filter", "-f", "x", "--re", "--error-hours=-1"]).is_err());
    }

    #[test]
    fn test_cli_list_hosts() {
        let args = parse(&["listener-log-filter", "-f", "x", "--lh", "-a", "10.0.0.1"]);
        let config = cli_process_args(&args);
        assert_eq!(config.mode, ScanMode::UniqueHosts);
        assert!(CLI_Args::try_parse_from(["listener-log-filter", "-f", "x", "--list-hosts", "--recent-errors"]).is_err());
    }

    #[test]
    fn test_cli_blocks() {
        let args = parse(&["listener-log-filter", "-f", "x", "--read-mode", "blocks", "--blocksz", "0x40"]);
        let config = cli_process_args(&args);
        assert_eq!(config.read_mode, ReadMode::Blocks(0x40));
        assert!(CLI_Args::try_parse_from(["listener-log-filter", "-f", "x", "--blocksz", "0"]).is_err());
    }
}
