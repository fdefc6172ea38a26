// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

//! Common imports, type aliases, and other globals for _olslib_.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;
pub use std::path::Path;

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FileMetadata = std::fs::Metadata;
pub type FileOpenOptions = std::fs::OpenOptions;
/// File size in bytes
pub type FileSz = u64;
/// Offset into a file (or stream) in bytes
pub type FileOffset = u64;
/// A general-purpose counting type, typically used for internal statistics
/// (i.e. `--summary`)
pub type Count = u64;

/// Sequence of Bytes
pub type Bytes = Vec<u8>;

/// user-passed path that signifies the log is read from STDIN
pub const PATH_STDIN: &str = "-";

/// Input files larger than this print an advisory warning; processing
/// continues.
pub const FILESZ_ADVISORY: FileSz = 1 << 30;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results enums for various *Reader functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The outcome of reading the next chunk of a stream: a chunk, the end of
/// the stream, or an error.
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the success data
    Found(T),
    /// End of stream, nothing to return, but no bad errors happened
    Done,
    /// Contains the error value, something bad happened
    Err(E),
}

impl<T, E> ResultS3<T, E> {
    /// Returns `true` if the result is `Found`.
    #[inline(always)]
    pub const fn is_found(&self) -> bool {
        matches!(*self, ResultS3::Found(_))
    }

    /// Returns `true` if the result is `Done`.
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultS3::Done)
    }

    /// Returns `true` if the result is `Err`.
    #[inline(always)]
    pub const fn is_err(&self) -> bool {
        matches!(*self, ResultS3::Err(_))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;
/// Newline in a byte buffer
#[allow(non_upper_case_globals)]
pub const NLu8a: [u8; 1] = [NLu8];
