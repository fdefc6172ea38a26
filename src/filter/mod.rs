// src/filter/mod.rs

//! Decide which decoded records are printed.
//!
//! A filter is built once from user options and applied to each record;
//! see [`RecordFilter`].
//!
//! [`RecordFilter`]: crate::filter::filterspec::RecordFilter

pub mod filterspec;
