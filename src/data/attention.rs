// src/data/attention.rs

//! Implement [`AttentionRecord`], one entry of an Oracle Database 21c
//! attention log, and the decoder that builds it from a [`Fragment`].
//!
//! The attention log is "pseudo JSON": a concatenation of JSON objects with
//! no enclosing array, e.g.
//!
//! ```lang-json
//! {
//!   "NOTIFICATION"       : "Starting ORACLE instance (normal) (OS id: 32412)",
//!   "URGENCY"            : "INFO",
//!   "INFO"               : "Some additional data on error PID:32436 data: 21",
//!   "TIME"               : "2022-08-15T10:01:26.873-04:00"
//! }
//! ```
//!
//! The key naming the kind of entry (`ERROR`, `WARNING`, `NOTIFICATION`,
//! `ADDITIONAL`) is the "attention type". The urgency is carried in a value,
//! either on its own (`"URGENCY" : "INFO"`) or as the prefix of a message
//! (`"ERROR" : "IMMEDIATE: ORA-00600 …"`).
//!
//! [`Fragment`]: crate::data::fragment::Fragment

use std::fmt;
use std::str::FromStr;

use ::clap::ValueEnum;
use ::serde_json::{
    Map,
    Value,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::data::common::DecodeError;
use crate::data::fragment::Fragment;

/// Start marker of an attention record.
pub const ATTENTION_START: &[u8] = b"{";
/// End marker of an attention record; a closing brace ending its line.
pub const ATTENTION_END: &[u8] = b"}\n";
/// [`ATTENTION_END`] of a log written with CRLF line endings.
pub const ATTENTION_END_CRLF: &[u8] = b"}\r\n";

/// The classifier key of an attention log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum AttentionType {
    Error,
    Warning,
    Notification,
    Additional,
}

impl AttentionType {
    /// Lowercase name, used for case-insensitive comparison.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AttentionType::Error => "error",
            AttentionType::Warning => "warning",
            AttentionType::Notification => "notification",
            AttentionType::Additional => "additional",
        }
    }
}

impl fmt::Display for AttentionType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttentionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <AttentionType as ValueEnum>::from_str(s, true)
    }
}

/// The urgency of an attention log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Urgency {
    Immediate,
    Soon,
    Deferrable,
    Info,
}

impl Urgency {
    /// Lowercase name, used for case-insensitive comparison.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Urgency::Immediate => "immediate",
            Urgency::Soon => "soon",
            Urgency::Deferrable => "deferrable",
            Urgency::Info => "info",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Urgency as ValueEnum>::from_str(s, true)
    }
}

/// A decoded attention log entry; its keys and values in file order.
///
/// String values are kept verbatim. Any other JSON value is kept as its JSON
/// text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttentionRecord {
    entries: Vec<(String, String)>,
}

impl AttentionRecord {
    /// Decode one attention [`Fragment`]; it must be a single JSON object.
    pub fn from_fragment(fragment: &Fragment) -> Result<AttentionRecord, DecodeError> {
        defn!("({:?})", fragment);
        let map: Map<String, Value> = match ::serde_json::from_slice::<Value>(fragment.as_bytes()) {
            Ok(Value::Object(map)) => map,
            Ok(_value) => {
                defx!("return NotAnObject");
                return Err(DecodeError::NotAnObject);
            }
            Err(err) => {
                defx!("return Json({})", err);
                return Err(DecodeError::Json(err.to_string()));
            }
        };
        let entries: Vec<(String, String)> = map
            .into_iter()
            .map(|(key, value)| {
                let value: String = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        defx!("return {} entries", entries.len());

        Ok(AttentionRecord { entries })
    }

    /// For testing and callers assembling records by hand.
    pub fn new_with(entries: &[(&str, &str)]) -> AttentionRecord {
        AttentionRecord {
            entries: entries
                .iter()
                .map(|(k, v)| (String::from(*k), String::from(*v)))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        self.entries.as_slice()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Does any key name `attention_type` (case-insensitive)?
    pub fn has_attention_type(
        &self,
        attention_type: AttentionType,
    ) -> bool {
        self.entries
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(attention_type.as_str()))
    }

    /// Does any value carry `urgency` (case-insensitive), either as the whole
    /// value or as the `"<urgency>: <message>"` prefix?
    pub fn has_urgency(
        &self,
        urgency: Urgency,
    ) -> bool {
        self.entries
            .iter()
            .any(|(_, value)| value_urgency_is(value, urgency))
    }
}

fn value_urgency_is(
    value: &str,
    urgency: Urgency,
) -> bool {
    let value: &str = value.trim();
    if value.eq_ignore_ascii_case(urgency.as_str()) {
        return true;
    }
    match value.split_once(':') {
        Some((prefix, _message)) => prefix
            .trim()
            .eq_ignore_ascii_case(urgency.as_str()),
        None => false,
    }
}
