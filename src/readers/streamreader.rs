// src/readers/streamreader.rs

//! Implements a [`StreamReader`], the driver of reading a log as a sequence
//! of byte chunks.
//!
//! A `StreamReader` never interprets the bytes it reads. In the incremental
//! [`ReadMode`]s it holds at most one chunk at a time.

use crate::common::{
    Bytes,
    Count,
    FPath,
    File,
    FileMetadata,
    FileOpenOptions,
    FileSz,
    NLu8,
    Path,
    ResultS3,
    PATH_STDIN,
};

use std::fmt;
use std::io::{
    BufRead,
    BufReader,
    Read,
};

use ::clap::ValueEnum;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ReadMode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Block Size in bytes
pub type BlockSz = usize;

/// Default chunk size of [`ReadMode::Blocks`].
pub const BLOCKSZ_DEF: BlockSz = 0x10000;

/// How a [`StreamReader`] divides its input into chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// The entire stream is one chunk. Memory grows with the stream.
    Eager,
    /// Each chunk is one line, terminator included.
    Lines,
    /// Each chunk is at most this many bytes. A chunk may split a record
    /// marker.
    Blocks(BlockSz),
}

/// The CLI-facing name of a [`ReadMode`]; see [`ReadMode::new`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReadModeKind {
    Eager,
    #[default]
    Lines,
    Blocks,
}

impl ReadMode {
    /// Create a `ReadMode` from its CLI name. `blocksz` only applies to
    /// [`ReadModeKind::Blocks`].
    pub const fn new(
        kind: ReadModeKind,
        blocksz: BlockSz,
    ) -> ReadMode {
        match kind {
            ReadModeKind::Eager => ReadMode::Eager,
            ReadModeKind::Lines => ReadMode::Lines,
            ReadModeKind::Blocks => ReadMode::Blocks(blocksz),
        }
    }
}

impl Default for ReadMode {
    fn default() -> Self {
        ReadMode::Lines
    }
}

impl fmt::Display for ReadMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ReadMode::Eager => write!(f, "eager"),
            ReadMode::Lines => write!(f, "lines"),
            ReadMode::Blocks(sz) => write!(f, "blocks({})", sz),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StreamReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of [`StreamReader::next_chunk`].
pub type ResultS3Chunk<'a> = ResultS3<&'a [u8], std::io::Error>;

/// Statistics of a [`StreamReader`], for CLI option `--summary`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryStreamReader {
    pub streamreader_bytes: Count,
    pub streamreader_chunks: Count,
    pub streamreader_filesz: Option<FileSz>,
    pub streamreader_mode: ReadMode,
}

/// Reads a log file, or stdin, as a sequence of chunks per its [`ReadMode`].
///
/// The returned chunk borrows the reader's one buffer; it is overwritten by
/// the next call to [`next_chunk`].
///
/// [`next_chunk`]: StreamReader::next_chunk
pub struct StreamReader {
    /// the underlying byte source
    reader: Box<dyn BufRead>,
    /// `FPath` of the source, or [`PATH_STDIN`]
    path: FPath,
    mode: ReadMode,
    /// the current chunk
    chunk: Bytes,
    /// file size when known; stdin and pipes are unknown
    filesz: Option<FileSz>,
    /// `Done` has been returned
    done: bool,
    /// summary statistic, total bytes read
    bytes_read: Count,
    /// summary statistic, total non-empty chunks read
    chunks_read: Count,
}

impl fmt::Debug for StreamReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("StreamReader")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("filesz", &self.filesz)
            .field("done", &self.done)
            .field("bytes_read", &self.bytes_read)
            .field("chunks_read", &self.chunks_read)
            .finish()
    }
}

impl StreamReader {
    /// Create a `StreamReader` over any byte source. `path` is only used
    /// for messages.
    pub fn new(
        input: Box<dyn Read>,
        path: FPath,
        mode: ReadMode,
    ) -> StreamReader {
        defñ!("({:?}, {:?})", path, mode);
        let capacity: usize = match mode {
            ReadMode::Blocks(sz) if sz > 0 => sz,
            _ => 0x2000,
        };
        StreamReader {
            reader: Box::new(BufReader::with_capacity(capacity, input)),
            path,
            mode,
            chunk: Bytes::new(),
            filesz: None,
            done: false,
            bytes_read: 0,
            chunks_read: 0,
        }
    }

    /// Open `path` for reading; [`PATH_STDIN`] reads stdin.
    pub fn open(
        path: &FPath,
        mode: ReadMode,
    ) -> std::io::Result<StreamReader> {
        defn!("({:?}, {:?})", path, mode);
        if path.as_str() == PATH_STDIN {
            defx!("stdin");
            return Ok(StreamReader::new(Box::new(std::io::stdin()), path.clone(), mode));
        }
        let mut open_options = FileOpenOptions::new();
        let file: File = open_options
            .read(true)
            .open(Path::new(path))?;
        let metadata: FileMetadata = file.metadata()?;
        if metadata.is_dir() {
            defx!("is a directory");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{:?} is a directory", path),
            ));
        }
        let mut streamreader = StreamReader::new(Box::new(file), path.clone(), mode);
        if metadata.is_file() {
            streamreader.filesz = Some(metadata.len());
        }
        defx!("filesz {:?}", streamreader.filesz);

        Ok(streamreader)
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub const fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Size of the source file, if it is a regular file.
    pub const fn filesz(&self) -> Option<FileSz> {
        self.filesz
    }

    pub const fn bytes_read(&self) -> Count {
        self.bytes_read
    }

    pub const fn chunks_read(&self) -> Count {
        self.chunks_read
    }

    /// Read the next chunk.
    ///
    /// Returns `Found(chunk)` with a non-empty chunk, then `Done` at end of
    /// stream (and on every call after). An `Err` is an I/O failure and the
    /// stream should not be read further.
    pub fn next_chunk(&mut self) -> ResultS3Chunk<'_> {
        defn!("{:?}", self.mode);
        if self.done {
            defx!("return Done (again)");
            return ResultS3::Done;
        }
        self.chunk.clear();
        let result: std::io::Result<usize> = match self.mode {
            ReadMode::Eager => {
                // one chunk; the next call is `Done`
                let result = self.reader.read_to_end(&mut self.chunk);
                self.done = true;
                result
            }
            ReadMode::Lines => self.reader.read_until(NLu8, &mut self.chunk),
            ReadMode::Blocks(sz) => (&mut self.reader)
                .take(sz as u64)
                .read_to_end(&mut self.chunk),
        };
        match result {
            Ok(0) => {
                self.done = true;
                defx!("return Done");

                ResultS3::Done
            }
            Ok(len) => {
                self.bytes_read += len as Count;
                self.chunks_read += 1;
                defx!("return Found({} bytes)", len);

                ResultS3::Found(self.chunk.as_slice())
            }
            Err(err) => {
                self.done = true;
                defx!("return Err({})", err);

                ResultS3::Err(err)
            }
        }
    }

    pub fn summary(&self) -> SummaryStreamReader {
        SummaryStreamReader {
            streamreader_bytes: self.bytes_read,
            streamreader_chunks: self.chunks_read,
            streamreader_filesz: self.filesz,
            streamreader_mode: self.mode,
        }
    }
}
