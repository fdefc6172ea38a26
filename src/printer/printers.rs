// src/printer/printers.rs

//! Specialized printer struct [`PrinterRecord`] for writing projected
//! record lines.
//!
//! Byte-oriented printing (no `char`s).

use crate::common::{
    Count,
    NLu8a,
};

use std::io::{
    BufWriter,
    ErrorKind,
    Result,
    StdoutLock,
    Write,
};

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// Result of writing to a [`PrinterRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkResult {
    /// the line was written
    Written,
    /// the reader of the output went away (e.g. `… | head`); nothing more
    /// should be written
    Closed,
}

/// Writes lines to an output, typically stdout.
///
/// A broken pipe is not an error; it becomes [`SinkResult::Closed`].
pub struct PrinterRecord<W: Write> {
    writer: BufWriter<W>,
    closed: bool,
    /// summary statistic
    lines_printed: Count,
    /// summary statistic
    bytes_printed: Count,
}

impl PrinterRecord<StdoutLock<'static>> {
    /// A `PrinterRecord` holding the stdout lock for its lifetime.
    pub fn stdout() -> PrinterRecord<StdoutLock<'static>> {
        PrinterRecord::new(std::io::stdout().lock())
    }
}

impl<W: Write> PrinterRecord<W> {
    pub fn new(writer: W) -> PrinterRecord<W> {
        PrinterRecord {
            writer: BufWriter::new(writer),
            closed: false,
            lines_printed: 0,
            bytes_printed: 0,
        }
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub const fn lines_printed(&self) -> Count {
        self.lines_printed
    }

    pub const fn bytes_printed(&self) -> Count {
        self.bytes_printed
    }

    fn closed_or_err(
        &mut self,
        err: std::io::Error,
    ) -> Result<SinkResult> {
        if err.kind() == ErrorKind::BrokenPipe {
            defo!("output closed: {}", err);
            self.closed = true;
            return Ok(SinkResult::Closed);
        }

        Err(err)
    }

    /// Write `line` and a newline.
    pub fn print_line(
        &mut self,
        line: &[u8],
    ) -> Result<SinkResult> {
        if self.closed {
            return Ok(SinkResult::Closed);
        }
        if let Err(err) = self
            .writer
            .write_all(line)
            .and_then(|_| self.writer.write_all(&NLu8a))
        {
            return self.closed_or_err(err);
        }
        self.lines_printed += 1;
        self.bytes_printed += (line.len() + NLu8a.len()) as Count;

        Ok(SinkResult::Written)
    }

    /// Write each of `lines`. Stops early if the output closes.
    pub fn print_lines<S: AsRef<str>>(
        &mut self,
        lines: &[S],
    ) -> Result<SinkResult> {
        for line in lines.iter() {
            if self.print_line(line.as_ref().as_bytes())? == SinkResult::Closed {
                return Ok(SinkResult::Closed);
            }
        }

        Ok(SinkResult::Written)
    }

    pub fn flush(&mut self) -> Result<SinkResult> {
        if self.closed {
            return Ok(SinkResult::Closed);
        }
        match self.writer.flush() {
            Ok(_) => Ok(SinkResult::Written),
            Err(err) => self.closed_or_err(err),
        }
    }

    /// Flush, then return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error())
    }
}
