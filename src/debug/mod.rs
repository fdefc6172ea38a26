// src/debug/mod.rs

//! The `debug` module is diagnostic macros for stderr and helper
//! functions for test builds.

#[cfg(test)]
pub mod helpers;

pub mod printers;
