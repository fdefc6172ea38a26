// src/readers/logprocessor.rs

//! Implements a [`LogProcessor`], the driver of one scan of one log.
//!
//! A `LogProcessor` pulls chunks from a [`StreamReader`], assembles them into
//! [`Fragment`s] with a [`FragmentAssembler`], decodes each fragment, and
//! then either projects records that pass its filter to a
//! [`PrinterRecord`], or aggregates their unique host addresses.
//!
//! A fragment that fails to decode is counted and skipped; the scan goes on.
//! Reading stops early, successfully, if the printer output closes.
//!
//! [`Fragment`s]: crate::data::fragment::Fragment

use crate::common::{
    Count,
    ResultS3,
};
use crate::data::common::{
    decode_fragment,
    DecodeError,
    LogRecord,
    RecordFormat,
};
use crate::data::fragment::Fragment;
use crate::filter::filterspec::{
    FilterOutcome,
    RecordFilter,
};
use crate::printer::printers::{
    PrinterRecord,
    SinkResult,
};
use crate::printer::projector::{
    attention_lines,
    listener_line,
};
use crate::readers::fragmentassembler::FragmentAssembler;
use crate::readers::streamreader::{
    ReadMode,
    StreamReader,
};
use crate::readers::summary::Summary;

use std::collections::{
    BTreeMap,
    HashSet,
};
use std::fmt;
use std::io::Write;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ScanConfig
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What a scan does with decoded records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanMode {
    /// Print each record that passes the filter.
    Project(RecordFilter),
    /// Print the sorted unique `host_addr` values of all records. Listener
    /// logs only.
    UniqueHosts,
}

/// Everything that configures one scan. Built once, then read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    pub format: RecordFormat,
    pub read_mode: ReadMode,
    pub mode: ScanMode,
}

/// An invalid [`ScanConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// the filter is for a different record format than the scan
    FilterFormatMismatch {
        format: RecordFormat,
        filter: RecordFormat,
    },
    /// unique host listing requires listener records
    UniqueHostsUnsupported(RecordFormat),
    /// `ReadMode::Blocks(0)`
    ZeroBlockSize,
    /// a recency horizon below zero hours
    NegativeHorizon(i64),
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ConfigError::FilterFormatMismatch { format, filter } => {
                write!(f, "a {} filter cannot be applied to a {} log", filter, format)
            }
            ConfigError::UniqueHostsUnsupported(format) => {
                write!(f, "listing unique hosts is not supported for a {} log", format)
            }
            ConfigError::ZeroBlockSize => write!(f, "block size must be greater than zero"),
            ConfigError::NegativeHorizon(hours) => {
                write!(f, "error hours must not be negative, got {}", hours)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ScanConfig {
    /// A configuration that prints every record of `format`.
    pub fn new(
        format: RecordFormat,
        read_mode: ReadMode,
    ) -> ScanConfig {
        ScanConfig {
            format,
            read_mode,
            mode: ScanMode::Project(RecordFilter::pass_all(format)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ReadMode::Blocks(0) = self.read_mode {
            return Err(ConfigError::ZeroBlockSize);
        }
        match &self.mode {
            ScanMode::Project(filter) => {
                if filter.format() != self.format {
                    return Err(ConfigError::FilterFormatMismatch {
                        format: self.format,
                        filter: filter.format(),
                    });
                }
                if let RecordFilter::Listener(listener_filter) = filter {
                    if let Some(window) = listener_filter.recent_errors.as_ref() {
                        if window.horizon_hours < 0 {
                            return Err(ConfigError::NegativeHorizon(window.horizon_hours));
                        }
                    }
                }
            }
            ScanMode::UniqueHosts => {
                if self.format != RecordFormat::Listener {
                    return Err(ConfigError::UniqueHostsUnsupported(self.format));
                }
            }
        }

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UniqueValues
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A set of strings, emitted in lexicographic order.
#[derive(Clone, Debug, Default)]
pub struct UniqueValues {
    values: HashSet<String>,
}

impl UniqueValues {
    /// Add `value`; empty strings are ignored.
    pub fn insert(
        &mut self,
        value: &str,
    ) {
        if value.is_empty() || self.values.contains(value) {
            return;
        }
        self.values.insert(String::from(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values, sorted.
    pub fn sorted(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .values
            .iter()
            .map(String::as_str)
            .collect();
        values.sort_unstable();

        values
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How a [`LogProcessor::run`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStatus {
    /// the whole stream was read
    Completed,
    /// the output closed; the rest of the stream was not read
    OutputClosed,
}

/// Statistics of a [`LogProcessor`], for CLI option `--summary`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryLogProcessor {
    pub logprocessor_records_decoded: Count,
    pub logprocessor_decode_errors: Count,
    /// the first decode error, if any
    pub logprocessor_decode_error_first: Option<String>,
    pub logprocessor_records_passed: Count,
    /// rejected records counted per reason
    pub logprocessor_records_rejected: BTreeMap<FilterOutcome, Count>,
    pub logprocessor_unique_values: usize,
}

/// Drives one scan according to a [`ScanConfig`].
pub struct LogProcessor {
    config: ScanConfig,
    assembler: FragmentAssembler,
    unique: UniqueValues,
    records_decoded: Count,
    decode_errors: Count,
    decode_error_first: Option<DecodeError>,
    records_passed: Count,
    records_rejected: BTreeMap<FilterOutcome, Count>,
}

impl fmt::Debug for LogProcessor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LogProcessor")
            .field("config", &self.config)
            .field("assembler", &self.assembler)
            .field("records_decoded", &self.records_decoded)
            .field("decode_errors", &self.decode_errors)
            .field("records_passed", &self.records_passed)
            .finish()
    }
}

impl LogProcessor {
    /// Create a `LogProcessor` for a validated `config`.
    pub fn new(config: ScanConfig) -> Result<LogProcessor, ConfigError> {
        defn!("({:?})", config);
        config.validate()?;
        let assembler = FragmentAssembler::new(config.format);
        defx!();

        Ok(LogProcessor {
            config,
            assembler,
            unique: UniqueValues::default(),
            records_decoded: 0,
            decode_errors: 0,
            decode_error_first: None,
            records_passed: 0,
            records_rejected: BTreeMap::new(),
        })
    }

    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub const fn assembler(&self) -> &FragmentAssembler {
        &self.assembler
    }

    /// The values gathered in [`ScanMode::UniqueHosts`].
    pub const fn unique_values(&self) -> &UniqueValues {
        &self.unique
    }

    /// Read all of `reader`, writing output to `printer`.
    ///
    /// An `Err` is an I/O failure reading input or writing output, and the
    /// scan is abandoned. A closed output is not an error.
    pub fn run<W: Write>(
        &mut self,
        reader: &mut StreamReader,
        printer: &mut PrinterRecord<W>,
    ) -> std::io::Result<ScanStatus> {
        defn!("({:?})", reader);
        loop {
            match reader.next_chunk() {
                ResultS3::Found(chunk) => self.assembler.push(chunk),
                ResultS3::Done => break,
                ResultS3::Err(err) => {
                    defx!("read error {}", err);
                    return Err(err);
                }
            }
            while let Some(fragment) = self.assembler.pop_fragment() {
                if self.process_fragment(&fragment, printer)? == SinkResult::Closed {
                    defx!("return OutputClosed");
                    return Ok(ScanStatus::OutputClosed);
                }
            }
        }
        if let Some(fragment) = self.assembler.finish() {
            if self.process_fragment(&fragment, printer)? == SinkResult::Closed {
                defx!("return OutputClosed");
                return Ok(ScanStatus::OutputClosed);
            }
        }
        if self.config.mode == ScanMode::UniqueHosts
            && printer.print_lines(&self.unique.sorted())? == SinkResult::Closed
        {
            defx!("return OutputClosed");
            return Ok(ScanStatus::OutputClosed);
        }
        if printer.flush()? == SinkResult::Closed {
            defx!("return OutputClosed");
            return Ok(ScanStatus::OutputClosed);
        }
        defx!("return Completed");

        Ok(ScanStatus::Completed)
    }

    /// Decode one fragment, then aggregate it or filter and print it.
    fn process_fragment<W: Write>(
        &mut self,
        fragment: &Fragment,
        printer: &mut PrinterRecord<W>,
    ) -> std::io::Result<SinkResult> {
        let record: LogRecord = match decode_fragment(self.config.format, fragment) {
            Ok(record) => record,
            Err(err) => {
                defo!("decode error at {}: {}", fragment.fileoffset(), err);
                self.decode_errors += 1;
                if self.decode_error_first.is_none() {
                    self.decode_error_first = Some(err);
                }
                return Ok(SinkResult::Written);
            }
        };
        self.records_decoded += 1;
        let filter: &RecordFilter = match &self.config.mode {
            ScanMode::UniqueHosts => {
                if let LogRecord::Listener(listener) = &record {
                    if let Some(host_addr) = listener.host_addr() {
                        self.unique.insert(host_addr);
                    }
                }
                return Ok(SinkResult::Written);
            }
            ScanMode::Project(filter) => filter,
        };
        let outcome: FilterOutcome = filter.evaluate(&record);
        if !outcome.is_pass() {
            defo!("rejected at {}: {}", fragment.fileoffset(), outcome);
            *self
                .records_rejected
                .entry(outcome)
                .or_insert(0) += 1;
            return Ok(SinkResult::Written);
        }
        self.records_passed += 1;
        match &record {
            LogRecord::Listener(listener) => printer.print_line(listener_line(listener).as_bytes()),
            LogRecord::Attention(attention) => printer.print_lines(&attention_lines(attention)),
        }
    }

    pub fn summary(&self) -> SummaryLogProcessor {
        SummaryLogProcessor {
            logprocessor_records_decoded: self.records_decoded,
            logprocessor_decode_errors: self.decode_errors,
            logprocessor_decode_error_first: self
                .decode_error_first
                .as_ref()
                .map(|err| err.to_string()),
            logprocessor_records_passed: self.records_passed,
            logprocessor_records_rejected: self.records_rejected.clone(),
            logprocessor_unique_values: self.unique.len(),
        }
    }

    /// Return an up-to-date [`Summary`] of this scan and its `reader` and
    /// `printer`.
    pub fn summary_complete<W: Write>(
        &self,
        reader: &StreamReader,
        printer: &PrinterRecord<W>,
    ) -> Summary {
        Summary::new(
            reader.path().clone(),
            self.config.format,
            reader.summary(),
            self.assembler.summary(),
            self.summary(),
            printer.lines_printed(),
        )
    }
}
