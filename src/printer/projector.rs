// src/printer/projector.rs

//! Render decoded records as output text lines.
//!
//! A listener record is one line:
//!
//! ```text
//! time=2023-09-11 14:02:33 org_id=oracle comp_id=tnslsnr type=UNKNOWN level=16 host_id=db01 host_addr=10.0.0.1 pid=None TNS-12514: …
//! ```
//!
//! An attention record is one line per entry, `KEY : value`.

use crate::data::attention::AttentionRecord;
use crate::data::datetime::dt_to_string;
use crate::data::listener::{
    ListenerField,
    ListenerRecord,
};

use std::fmt::Write;

/// Printed in place of an absent attribute or unparseable time.
pub const ABSENT: &str = "None";

/// Attributes printed after `time`, in order.
const LISTENER_LINE_FIELDS: [ListenerField; 7] = [
    ListenerField::OrgId,
    ListenerField::CompId,
    ListenerField::MsgType,
    ListenerField::Level,
    ListenerField::HostId,
    ListenerField::HostAddr,
    ListenerField::Pid,
];

/// Replace line breaks so the text prints on one line.
pub fn flatten_newlines(text: &str) -> String {
    text.replace(&['\r', '\n'][..], " ")
}

/// The projection line of a [`ListenerRecord`]. An absent `txt` prints as
/// nothing.
pub fn listener_line(record: &ListenerRecord) -> String {
    let mut line = String::with_capacity(160);
    let time: String = match record.time_parsed() {
        Some(dt) => dt_to_string(&dt),
        None => String::from(ABSENT),
    };
    line.push_str("time=");
    line.push_str(time.as_str());
    for field in LISTENER_LINE_FIELDS.iter() {
        // writing to a `String` cannot fail
        let _ = write!(line, " {}={}", field, record.field(*field).unwrap_or(ABSENT));
    }
    line.push(' ');
    line.push_str(flatten_newlines(record.txt().unwrap_or("")).as_str());

    line
}

/// The projection lines of an [`AttentionRecord`], one per entry in file
/// order.
pub fn attention_lines(record: &AttentionRecord) -> Vec<String> {
    record
        .entries()
        .iter()
        .map(|(key, value)| format!("{} : {}", key, flatten_newlines(value)))
        .collect()
}
