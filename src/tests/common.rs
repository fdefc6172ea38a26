// src/tests/common.rs

//! Sample logs and helpers shared by tests.

#![allow(non_upper_case_globals)]

use crate::common::FPath;
use crate::data::common::RecordFormat;
use crate::data::datetime::{
    DateTimeL,
    NaiveDateTime,
    LISTENER_TIME_PATTERN,
};
use crate::printer::printers::PrinterRecord;
use crate::readers::logprocessor::{
    LogProcessor,
    ScanConfig,
    ScanStatus,
};
use crate::readers::streamreader::{
    ReadMode,
    StreamReader,
};
use crate::readers::summary::Summary;

/// A listener log of three records, two hosts, one error.
pub const LISTENER_LOG_3: &str = r#"<msg time='2023-09-11T14:02:33.120-04:00' org_id='oracle' comp_id='tnslsnr'
 type='UNKNOWN' level='16' host_id='db01'
 host_addr='10.0.0.2' pid='4242'>
 <txt>TNS-12514: TNS:listener does not currently know of service
 </txt>
</msg>
<msg time='2023-09-11T14:05:00.000-04:00' org_id='oracle' comp_id='tnslsnr'
 type='UNKNOWN' level='16' host_id='db01'
 host_addr='10.0.0.1'>
 <txt>11-SEP-2023 14:05:00 * service_update * ORCL * 0
 </txt>
</msg>
<msg time='2023-09-11T14:06:10.500-04:00' org_id='oracle' comp_id='tnslsnr'
 type='UNKNOWN' level='16' host_id='db01'
 host_addr='10.0.0.2' pid='4243'>
 <txt>Listener completed notification to CRS on start
 </txt>
</msg>
"#;

/// Projection lines of [`LISTENER_LOG_3`], in order.
pub const LISTENER_LOG_3_LINES: [&str; 3] = [
    "time=2023-09-11 14:02:33 org_id=oracle comp_id=tnslsnr type=UNKNOWN level=16 host_id=db01 host_addr=10.0.0.2 pid=4242 TNS-12514: TNS:listener does not currently know of service  ",
    "time=2023-09-11 14:05:00 org_id=oracle comp_id=tnslsnr type=UNKNOWN level=16 host_id=db01 host_addr=10.0.0.1 pid=None 11-SEP-2023 14:05:00 * service_update * ORCL * 0  ",
    "time=2023-09-11 14:06:10 org_id=oracle comp_id=tnslsnr type=UNKNOWN level=16 host_id=db01 host_addr=10.0.0.2 pid=4243 Listener completed notification to CRS on start  ",
];

/// An attention log of three entries.
pub const ATTENTION_LOG_3: &str = r#"{
  "NOTIFICATION"       : "Starting ORACLE instance (normal) (OS id: 32412)",
  "URGENCY"            : "INFO",
  "INFO"               : "OCI_DB_ID:32412",
  "TIME"               : "2022-08-15T10:01:26.873-04:00"
}
{
  "ERROR"              : "IMMEDIATE: ORA-00600: internal error code",
  "CAUSE"              : "An internal error\nwas raised",
  "TIME"               : "2022-08-15T10:02:01.000-04:00"
}
{
  "WARNING"            : "Soon: The disk group is almost full",
  "URGENCY"            : "SOON",
  "TIME"               : "2022-08-15T10:03:44.120-04:00"
}
"#;

/// Parse a `%Y-%m-%dT%H:%M:%S` datetime.
pub fn dt(value: &str) -> DateTimeL {
    NaiveDateTime::parse_from_str(value, LISTENER_TIME_PATTERN).unwrap()
}

/// One `<msg>` record with `time`, `host_addr`, and text.
pub fn listener_msg(
    time: &str,
    host_addr: &str,
    txt: &str,
) -> String {
    format!(
        "<msg time='{}' org_id='oracle' comp_id='tnslsnr' type='UNKNOWN' level='16' host_id='db01'\n host_addr='{}'>\n <txt>{}</txt>\n</msg>\n",
        time, host_addr, txt,
    )
}

/// Result of [`scan_bytes`].
pub struct ScanOutput {
    pub status: ScanStatus,
    pub output: String,
    pub summary: Summary,
}

impl ScanOutput {
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

/// Scan `data` per `config`, capturing the output.
pub fn scan_bytes(
    data: &[u8],
    config: ScanConfig,
) -> ScanOutput {
    let mut streamreader = StreamReader::new(
        Box::new(std::io::Cursor::new(data.to_vec())),
        FPath::from("test"),
        config.read_mode,
    );
    let mut processor = LogProcessor::new(config).unwrap();
    let mut printer = PrinterRecord::new(Vec::<u8>::new());
    let status = processor
        .run(&mut streamreader, &mut printer)
        .unwrap();
    let summary = processor.summary_complete(&streamreader, &printer);
    let output = String::from_utf8(printer.into_inner().unwrap()).unwrap();

    ScanOutput {
        status,
        output,
        summary,
    }
}

/// Scan `data` printing every record of `format`.
pub fn scan_all(
    data: &[u8],
    format: RecordFormat,
    read_mode: ReadMode,
) -> ScanOutput {
    scan_bytes(data, ScanConfig::new(format, read_mode))
}
