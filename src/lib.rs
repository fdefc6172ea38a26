// src/lib.rs

//! _olslib_ is the library behind the `listener-log-filter` and
//! `attention-log-viewer` tools. It reads Oracle Database listener XML logs
//! and attention logs as streams, finds each record, decodes it, and prints
//! the records that pass a filter, all in bounded memory.
//!
//! A scan is a pipeline:
//!
//! ```text
//! StreamReader → FragmentAssembler → decode_fragment → RecordFilter → projector → PrinterRecord
//! ```
//!
//! Start with [`LogProcessor`].
//!
//! [`LogProcessor`]: crate::readers::logprocessor::LogProcessor

pub mod common;
pub mod data;
pub mod debug;
pub mod filter;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
