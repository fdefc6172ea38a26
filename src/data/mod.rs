// src/data/mod.rs

//! The `data` module is specialized data containers for
//! [`Fragment`]s, [`ListenerRecord`]s, and [`AttentionRecord`]s.
//!
//! ## Definitions of data
//!
//! ### Fragment
//!
//! A "fragment" is a sequence of contiguous bytes in a log that:
//!
//! * begins with the start marker of the log's record format
//!   (or after the previous fragment)
//! * ends with the end marker of the log's record format
//!
//! A "fragment" is represented by a [`Fragment`] and found by a
//! [`FragmentAssembler`]. It is undecoded.
//!
//! ### Record
//!
//! A "record" is the decoded form of one fragment, a fixed set of optional
//! fields. It is represented by a [`LogRecord`].
//!
//! A listener log record is a [`ListenerRecord`], decoded from an XML-ish
//! `<msg>` element. An attention log record is an [`AttentionRecord`],
//! decoded from a JSON-ish object.
//!
//! A record represents a "log message".
//!
//! [`Fragment`]: crate::data::fragment::Fragment
//! [`FragmentAssembler`]: crate::readers::fragmentassembler::FragmentAssembler
//! [`LogRecord`]: crate::data::common::LogRecord
//! [`ListenerRecord`]: crate::data::listener::ListenerRecord
//! [`AttentionRecord`]: crate::data::attention::AttentionRecord

pub mod attention;
pub mod common;
pub mod datetime;
pub mod fragment;
pub mod listener;
