// src/readers/mod.rs

//! "Reader" objects for reading a log and finding its records.
//!
//! A [`StreamReader`] reads a log as chunks of bytes.
//! A [`FragmentAssembler`] finds complete records in those chunks.
//! A [`LogProcessor`] drives both, then decodes, filters, and prints the
//! records.
//!
//! [`StreamReader`]: crate::readers::streamreader::StreamReader
//! [`FragmentAssembler`]: crate::readers::fragmentassembler::FragmentAssembler
//! [`LogProcessor`]: crate::readers::logprocessor::LogProcessor

pub mod fragmentassembler;
pub mod logprocessor;
pub mod streamreader;
pub mod summary;
