// src/printer/mod.rs

//! The `printer` module is for printing user-facing output: projected
//! [`ListenerRecord`s], [`AttentionRecord`s], and aggregated values.
//!
//! [`projector`] renders records as text lines. [`printers`] writes lines
//! to stdout and notices when the reader of stdout goes away. [`summary`]
//! prints the `--summary` statistics.
//!
//! [`ListenerRecord`s]: crate::data::listener::ListenerRecord
//! [`AttentionRecord`s]: crate::data::attention::AttentionRecord

pub mod printers;
pub mod projector;
pub mod summary;
