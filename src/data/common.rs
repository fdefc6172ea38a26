// src/data/common.rs

//! Common types for decoding [`Fragment`]s into records:
//! [`RecordFormat`], [`LogRecord`], and [`DecodeError`].
//!
//! [`Fragment`]: crate::data::fragment::Fragment

use std::fmt;

use crate::data::attention::{
    AttentionRecord,
    ATTENTION_END,
    ATTENTION_END_CRLF,
    ATTENTION_START,
};
use crate::data::fragment::Fragment;
use crate::data::listener::{
    ListenerRecord,
    MSG_END,
    MSG_START,
};

/// The record format of a log; selects the fragment markers and the
/// decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    /// Oracle listener XML log, `<msg …>…</msg>` elements.
    Listener,
    /// Oracle 21c attention log, `{ … }` objects.
    Attention,
}

impl RecordFormat {
    /// The bytes that begin a record.
    pub const fn start_marker(&self) -> &'static [u8] {
        match self {
            RecordFormat::Listener => MSG_START,
            RecordFormat::Attention => ATTENTION_START,
        }
    }

    /// The bytes that end a record.
    ///
    /// The end marker is assumed never to occur inside record content.
    /// That is a precondition of the input format; it is not verified.
    pub const fn end_marker(&self) -> &'static [u8] {
        match self {
            RecordFormat::Listener => MSG_END,
            RecordFormat::Attention => ATTENTION_END,
        }
    }

    /// The end marker of a log written with CRLF line endings, if it differs
    /// from [`end_marker`](Self::end_marker).
    pub const fn end_marker_crlf(&self) -> Option<&'static [u8]> {
        match self {
            RecordFormat::Listener => None,
            RecordFormat::Attention => Some(ATTENTION_END_CRLF),
        }
    }

    /// Can the start marker only occur at the start of a record?
    ///
    /// If so, a span holding several start markers before one end marker
    /// holds unterminated records ahead of the last start marker.
    /// A `{` may occur in attention values, a raw `<msg` never occurs inside
    /// a listener record.
    pub const fn start_marker_exclusive(&self) -> bool {
        match self {
            RecordFormat::Listener => true,
            RecordFormat::Attention => false,
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            RecordFormat::Listener => write!(f, "listener"),
            RecordFormat::Attention => write!(f, "attention"),
        }
    }
}

/// A decoded record of either format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogRecord {
    Listener(ListenerRecord),
    Attention(AttentionRecord),
}

/// Why a [`Fragment`] could not be decoded.
///
/// Expected and non-fatal; the fragment is skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// the fragment does not begin with the format's start marker
    MissingStartMarker,
    /// the fragment violates the element grammar at byte `offset`
    Malformed {
        offset: usize,
        reason: &'static str,
    },
    /// the fragment's root element is not `<msg>`
    UnexpectedRoot(String),
    /// the fragment is not valid JSON
    Json(String),
    /// the fragment is valid JSON but not an object
    NotAnObject,
}

impl fmt::Display for DecodeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            DecodeError::MissingStartMarker => write!(f, "missing start marker"),
            DecodeError::Malformed { offset, reason } => {
                write!(f, "malformed element at byte {}: {}", offset, reason)
            }
            DecodeError::UnexpectedRoot(name) => write!(f, "unexpected root element {:?}", name),
            DecodeError::Json(err) => write!(f, "invalid JSON: {}", err),
            DecodeError::NotAnObject => write!(f, "JSON value is not an object"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode `fragment` with the decoder for `format`.
pub fn decode_fragment(
    format: RecordFormat,
    fragment: &Fragment,
) -> Result<LogRecord, DecodeError> {
    match format {
        RecordFormat::Listener => ListenerRecord::from_fragment(fragment).map(LogRecord::Listener),
        RecordFormat::Attention => AttentionRecord::from_fragment(fragment).map(LogRecord::Attention),
    }
}
