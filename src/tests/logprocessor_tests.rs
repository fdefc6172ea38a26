// src/tests/logprocessor_tests.rs

//! tests for `logprocessor.rs`

use crate::common::FPath;
use crate::data::attention::{
    AttentionType,
    Urgency,
};
use crate::data::common::RecordFormat;
use crate::filter::filterspec::{
    AttentionFilter,
    FilterOutcome,
    ListenerFilter,
    RecencyWindow,
    RecordFilter,
};
use crate::data::listener::ListenerField;
use crate::printer::printers::PrinterRecord;
use crate::printer::summary::write_summary;
use crate::readers::logprocessor::{
    ConfigError,
    LogProcessor,
    ScanConfig,
    ScanMode,
    ScanStatus,
    UniqueValues,
};
use crate::readers::streamreader::{
    ReadMode,
    StreamReader,
};
use crate::tests::common::{
    dt,
    listener_msg,
    scan_all,
    scan_bytes,
    ATTENTION_LOG_3,
    LISTENER_LOG_3,
    LISTENER_LOG_3_LINES,
};

use std::io::{
    Error,
    ErrorKind,
    Write,
};

use ::more_asserts::assert_le;
use ::test_case::test_case;

fn listener_config(
    filter: ListenerFilter,
    read_mode: ReadMode,
) -> ScanConfig {
    ScanConfig {
        format: RecordFormat::Listener,
        read_mode,
        mode: ScanMode::Project(RecordFilter::Listener(filter)),
    }
}

#[test]
fn test_project_all_listener() {
    let output = scan_all(LISTENER_LOG_3.as_bytes(), RecordFormat::Listener, ReadMode::Lines);
    assert_eq!(output.status, ScanStatus::Completed);
    assert_eq!(output.lines(), LISTENER_LOG_3_LINES.to_vec());
    assert_eq!(output.summary.logprocessor.logprocessor_records_decoded, 3);
    assert_eq!(output.summary.logprocessor.logprocessor_records_passed, 3);
    assert_eq!(output.summary.lines_printed, 3);
}

/// eager and incremental reading print the same output
#[test_case(ReadMode::Lines)]
#[test_case(ReadMode::Blocks(1))]
#[test_case(ReadMode::Blocks(5))]
#[test_case(ReadMode::Blocks(64))]
#[test_case(ReadMode::Blocks(0x10000))]
fn test_eager_equals_incremental(read_mode: ReadMode) {
    let eager = scan_all(LISTENER_LOG_3.as_bytes(), RecordFormat::Listener, ReadMode::Eager);
    let incremental = scan_all(LISTENER_LOG_3.as_bytes(), RecordFormat::Listener, read_mode);
    assert_eq!(eager.output, incremental.output);

    let eager = scan_all(ATTENTION_LOG_3.as_bytes(), RecordFormat::Attention, ReadMode::Eager);
    let incremental = scan_all(ATTENTION_LOG_3.as_bytes(), RecordFormat::Attention, read_mode);
    assert_eq!(eager.output, incremental.output);
    assert!(!eager.output.is_empty());
}

/// peak buffered bytes do not grow with the count of records
#[test]
fn test_bounded_memory() {
    let record = listener_msg("2023-09-11T14:02:33", "10.0.0.1", "TNS-12541: TNS:no listener");
    let small = record.repeat(50);
    let large = record.repeat(5000);
    let small_output = scan_all(small.as_bytes(), RecordFormat::Listener, ReadMode::Lines);
    let large_output = scan_all(large.as_bytes(), RecordFormat::Listener, ReadMode::Lines);
    assert_eq!(large_output.summary.logprocessor.logprocessor_records_decoded, 5000);
    let small_peak = small_output.summary.fragmentassembler.fragmentassembler_peak_buffered;
    let large_peak = large_output.summary.fragmentassembler.fragmentassembler_peak_buffered;
    assert_eq!(small_peak, large_peak);
    assert_le!(large_peak, record.len());
}

#[test]
fn test_field_filter() {
    let filter = ListenerFilter {
        host_addr: Some(String::from("10.0.0.2")),
        ..Default::default()
    };
    let output = scan_bytes(LISTENER_LOG_3.as_bytes(), listener_config(filter, ReadMode::Lines));
    assert_eq!(output.lines(), vec![LISTENER_LOG_3_LINES[0], LISTENER_LOG_3_LINES[2]]);
    assert_eq!(
        output
            .summary
            .logprocessor
            .logprocessor_records_rejected
            .get(&FilterOutcome::FieldMismatch(ListenerField::HostAddr)),
        Some(&1)
    );
    assert_eq!(output.summary.records_rejected(), 1);
}

/// the second record has no pid; a pid filter never matches it
#[test_case("4242", 1)]
#[test_case("None", 0)]
#[test_case("", 3; "empty is no constraint")]
fn test_missing_field_never_matches(
    pid: &str,
    expect_lines: usize,
) {
    let filter = ListenerFilter {
        pid: Some(String::from(pid)),
        ..Default::default()
    };
    let output = scan_bytes(LISTENER_LOG_3.as_bytes(), listener_config(filter, ReadMode::Lines));
    assert_eq!(output.lines().len(), expect_lines);
    if !pid.is_empty() {
        assert!(!output.output.contains("host_addr=10.0.0.1 "), "{:?}", output.output);
    }
}

#[test]
fn test_unique_hosts() {
    let config = ScanConfig {
        format: RecordFormat::Listener,
        read_mode: ReadMode::Lines,
        mode: ScanMode::UniqueHosts,
    };
    let output = scan_bytes(LISTENER_LOG_3.as_bytes(), config);
    assert_eq!(output.lines(), vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(output.summary.logprocessor.logprocessor_unique_values, 2);
}

#[test]
fn test_unique_hosts_skips_missing_and_bad() {
    let data = format!(
        "{}<msg pid='1'><txt>no host</txt></msg>\n<msg host_addr='10.9.9.9'><txt>unclosed</msg>\n{}{}",
        listener_msg("2023-09-11T14:02:33", "10.0.0.3", "a"),
        listener_msg("2023-09-11T14:02:33", "", "b"),
        listener_msg("2023-09-11T14:02:33", "10.0.0.3", "c"),
    );
    let config = ScanConfig {
        format: RecordFormat::Listener,
        read_mode: ReadMode::Blocks(7),
        mode: ScanMode::UniqueHosts,
    };
    let output = scan_bytes(data.as_bytes(), config);
    assert_eq!(output.lines(), vec!["10.0.0.3"]);
    assert_eq!(output.summary.logprocessor.logprocessor_decode_errors, 1);
}

#[test]
fn test_unique_values_sorted() {
    let mut unique = UniqueValues::default();
    for value in ["10.0.0.2", "10.0.0.1", "", "10.0.0.2", "10.0.0.10"].iter() {
        unique.insert(value);
    }
    assert_eq!(unique.len(), 3);
    assert_eq!(unique.sorted(), vec!["10.0.0.1", "10.0.0.10", "10.0.0.2"]);
}

/// a log cut off in the middle of a record is read successfully, without the
/// partial record
#[test_case(ReadMode::Eager)]
#[test_case(ReadMode::Lines)]
#[test_case(ReadMode::Blocks(3))]
fn test_truncated_trailing_record(read_mode: ReadMode) {
    let data = format!("{}<msg time='2023-09-11T14:02:33' host_addr='10.0.0.7'>\n <txt>TNS-", LISTENER_LOG_3);
    let output = scan_all(data.as_bytes(), RecordFormat::Listener, read_mode);
    assert_eq!(output.status, ScanStatus::Completed);
    assert_eq!(output.lines(), LISTENER_LOG_3_LINES.to_vec());
    assert!(output.summary.fragmentassembler.fragmentassembler_discarded_bytes > 0);
    assert_eq!(output.summary.logprocessor.logprocessor_decode_errors, 0);
}

/// records one hour and two days before the reference time; only the first
/// is a recent error
#[test]
fn test_recent_errors_one_hour_two_days() {
    let data = format!(
        "{}{}",
        listener_msg("2024-01-02T23:00:00.000-05:00", "10.0.0.1", "TNS-12541: TNS:no listener"),
        listener_msg("2024-01-01T00:00:00.000-05:00", "10.0.0.1", "TNS-12541: TNS:no listener"),
    );
    let filter = ListenerFilter {
        recent_errors: Some(RecencyWindow::new(dt("2024-01-03T00:00:00"), 24)),
        ..Default::default()
    };
    let output = scan_bytes(data.as_bytes(), listener_config(filter, ReadMode::Lines));
    assert_eq!(output.lines().len(), 1);
    assert!(output.lines()[0].starts_with("time=2024-01-02 23:00:00 "), "{:?}", output.lines());
    assert_eq!(
        output
            .summary
            .logprocessor
            .logprocessor_records_rejected
            .get(&FilterOutcome::OutsideWindow),
        Some(&1)
    );
}

/// a malformed record between two good ones is skipped
#[test_case(ReadMode::Eager)]
#[test_case(ReadMode::Lines)]
#[test_case(ReadMode::Blocks(4))]
fn test_malformed_between_good(read_mode: ReadMode) {
    let data = format!(
        "{}<msg time='2023-09-11T14:02:33' pid=unquoted>\n <txt>broken</txt>\n</msg>\n{}",
        listener_msg("2023-09-11T14:02:33", "10.0.0.1", "first"),
        listener_msg("2023-09-11T14:02:34", "10.0.0.2", "second"),
    );
    let output = scan_all(data.as_bytes(), RecordFormat::Listener, read_mode);
    assert_eq!(output.status, ScanStatus::Completed);
    let lines = output.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" first"), "{:?}", lines[0]);
    assert!(lines[1].ends_with(" second"), "{:?}", lines[1]);
    assert_eq!(output.summary.logprocessor.logprocessor_decode_errors, 1);
    assert!(output
        .summary
        .logprocessor
        .logprocessor_decode_error_first
        .is_some());
}

#[test]
fn test_attention_all() {
    let output = scan_all(ATTENTION_LOG_3.as_bytes(), RecordFormat::Attention, ReadMode::Lines);
    let lines = output.lines();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "NOTIFICATION : Starting ORACLE instance (normal) (OS id: 32412)");
    assert_eq!(lines[5], "CAUSE : An internal error was raised");
    assert_eq!(lines[9], "TIME : 2022-08-15T10:03:44.120-04:00");
}

#[test_case(Some(AttentionType::Error), None, 3; "error type")]
#[test_case(None, Some(Urgency::Soon), 3; "soon urgency")]
#[test_case(None, Some(Urgency::Info), 4; "info urgency")]
#[test_case(Some(AttentionType::Warning), Some(Urgency::Soon), 3; "warning and soon")]
#[test_case(Some(AttentionType::Warning), Some(Urgency::Immediate), 0; "warning and immediate")]
#[test_case(Some(AttentionType::Additional), None, 0; "nothing additional")]
fn test_attention_filter(
    attention_type: Option<AttentionType>,
    urgency: Option<Urgency>,
    expect_lines: usize,
) {
    let config = ScanConfig {
        format: RecordFormat::Attention,
        read_mode: ReadMode::Blocks(16),
        mode: ScanMode::Project(RecordFilter::Attention(AttentionFilter {
            attention_type,
            urgency,
        })),
    };
    let output = scan_bytes(ATTENTION_LOG_3.as_bytes(), config);
    assert_eq!(output.lines().len(), expect_lines);
}

#[test]
fn test_attention_malformed_skipped() {
    let data = "{\n \"A\" : \"1\"\n}\n{\n \"B\" : \n}\n{\n \"C\" : \"3\"\n}\n";
    let output = scan_all(data.as_bytes(), RecordFormat::Attention, ReadMode::Lines);
    assert_eq!(output.lines(), vec!["A : 1", "C : 3"]);
    assert_eq!(output.summary.logprocessor.logprocessor_decode_errors, 1);
}

#[test]
fn test_empty_input() {
    let output = scan_all(b"", RecordFormat::Listener, ReadMode::Lines);
    assert_eq!(output.status, ScanStatus::Completed);
    assert!(output.output.is_empty());
}

#[test]
fn test_validate() {
    let mut config = ScanConfig::new(RecordFormat::Listener, ReadMode::Blocks(0));
    assert_eq!(config.validate(), Err(ConfigError::ZeroBlockSize));
    config.read_mode = ReadMode::Lines;
    assert_eq!(config.validate(), Ok(()));
    config.mode = ScanMode::Project(RecordFilter::pass_all(RecordFormat::Attention));
    assert_eq!(
        config.validate(),
        Err(ConfigError::FilterFormatMismatch {
            format: RecordFormat::Listener,
            filter: RecordFormat::Attention,
        })
    );
    config.mode = ScanMode::Project(RecordFilter::Listener(ListenerFilter {
        recent_errors: Some(RecencyWindow::new(dt("2024-01-03T00:00:00"), -1)),
        ..Default::default()
    }));
    assert_eq!(config.validate(), Err(ConfigError::NegativeHorizon(-1)));
    let config = ScanConfig {
        format: RecordFormat::Attention,
        read_mode: ReadMode::Lines,
        mode: ScanMode::UniqueHosts,
    };
    assert_eq!(config.validate(), Err(ConfigError::UniqueHostsUnsupported(RecordFormat::Attention)));
    assert!(LogProcessor::new(config).is_err());
}

/// A writer that accepts `limit` bytes, then reports a broken pipe.
struct ClosingWriter {
    limit: usize,
    written: usize,
}

impl Write for ClosingWriter {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> std::io::Result<usize> {
        if self.written + buf.len() > self.limit {
            return Err(Error::new(ErrorKind::BrokenPipe, "closed"));
        }
        self.written += buf.len();

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// the scan stops successfully when the output closes
#[test]
fn test_output_closed() {
    let record = listener_msg("2023-09-11T14:02:33", "10.0.0.1", "hello");
    let data: String = record.repeat(20000);
    let mut streamreader = StreamReader::new(
        Box::new(std::io::Cursor::new(data.into_bytes())),
        FPath::from("test"),
        ReadMode::Lines,
    );
    let mut processor = LogProcessor::new(ScanConfig::new(RecordFormat::Listener, ReadMode::Lines)).unwrap();
    let mut printer = PrinterRecord::new(ClosingWriter {
        limit: 100,
        written: 0,
    });
    let status = processor
        .run(&mut streamreader, &mut printer)
        .unwrap();
    assert_eq!(status, ScanStatus::OutputClosed);
    assert!(printer.is_closed());
    // stopped reading well before the end
    let summary = processor.summary();
    assert!(summary.logprocessor_records_decoded < 20000);
}

#[test]
fn test_write_summary() {
    let data = format!("{}<msg host_addr='10.0.0.9'>", LISTENER_LOG_3);
    let filter = ListenerFilter {
        host_addr: Some(String::from("10.0.0.1")),
        ..Default::default()
    };
    let output = scan_bytes(data.as_bytes(), listener_config(filter, ReadMode::Blocks(32)));
    assert_eq!(output.summary.fragmentassembler.fragmentassembler_fragments, 3);
    assert_eq!(output.summary.streamreader.streamreader_bytes as usize, data.len());
    let mut buffer: Vec<u8> = Vec::new();
    write_summary(&output.summary, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains("File: test"), "{}", text);
    assert!(text.contains("fragments       : 3"), "{}", text);
    assert!(text.contains("records passed  : 1"), "{}", text);
    assert!(text.contains("records rejected: 2"), "{}", text);
    assert!(text.contains("lines           : 1"), "{}", text);
}

/// a record cut off mid-write does not take the next record with it
#[test_case(ReadMode::Eager)]
#[test_case(ReadMode::Lines)]
#[test_case(ReadMode::Blocks(5))]
fn test_interrupted_write_keeps_next_record(read_mode: ReadMode) {
    let data = format!(
        "<msg time='2023-09-11T14:02:33' pid='1'>\n <txt>partial\n{}{}",
        listener_msg("2023-09-11T14:02:34", "10.0.0.2", "good"),
        listener_msg("2023-09-11T14:02:35", "10.0.0.3", "after"),
    );
    let output = scan_all(data.as_bytes(), RecordFormat::Listener, read_mode);
    let lines = output.lines();
    assert_eq!(lines.len(), 2, "{:?}", lines);
    assert!(lines[0].ends_with("host_addr=10.0.0.2 pid=None good"), "{:?}", lines[0]);
    assert!(lines[1].ends_with("host_addr=10.0.0.3 pid=None after"), "{:?}", lines[1]);
    assert_eq!(output.summary.logprocessor.logprocessor_decode_errors, 0);
    assert!(output.summary.fragmentassembler.fragmentassembler_discarded_bytes > 0);
}

/// an attention log with CRLF line endings prints as with LF line endings,
/// in bounded memory
#[test_case(ReadMode::Lines)]
#[test_case(ReadMode::Blocks(3))]
fn test_attention_crlf(read_mode: ReadMode) {
    let record: &str = "{\r\n  \"ERROR\" : \"IMMEDIATE: ORA-00600\",\r\n  \"TIME\" : \"2022-08-15T10:02:01.000-04:00\"\r\n}\r\n";
    let data: String = record.repeat(200);
    let output = scan_all(data.as_bytes(), RecordFormat::Attention, read_mode);
    let lf = scan_all(data.replace("\r\n", "\n").as_bytes(), RecordFormat::Attention, read_mode);
    assert_eq!(output.lines().len(), 400);
    assert_eq!(output.output, lf.output);
    assert_eq!(output.summary.logprocessor.logprocessor_decode_errors, 0);
    assert_le!(output.summary.fragmentassembler.fragmentassembler_peak_buffered, record.len() + 3);
}
