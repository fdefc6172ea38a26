// src/readers/summary.rs

//! Implements `Summary` statistics tracking struct.

use crate::common::{
    Count,
    FPath,
};
use crate::data::common::RecordFormat;
use crate::readers::fragmentassembler::SummaryFragmentAssembler;
use crate::readers::logprocessor::SummaryLogProcessor;
use crate::readers::streamreader::SummaryStreamReader;

use std::fmt;

use ::more_asserts::debug_assert_ge;

/// Accumulated statistics about reading, assembling, decoding, filtering, and
/// printing of a single log processed by a [`LogProcessor`].
///
/// For CLI option `--summary`.
///
/// [`LogProcessor`]: crate::readers::logprocessor::LogProcessor
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// the `FPath` of the processed log
    pub path: FPath,
    pub format: Option<RecordFormat>,
    pub streamreader: SummaryStreamReader,
    pub fragmentassembler: SummaryFragmentAssembler,
    pub logprocessor: SummaryLogProcessor,
    /// lines written to the output
    pub lines_printed: Count,
}

impl Summary {
    /// Create a new `Summary`
    pub fn new(
        path: FPath,
        format: RecordFormat,
        streamreader: SummaryStreamReader,
        fragmentassembler: SummaryFragmentAssembler,
        logprocessor: SummaryLogProcessor,
        lines_printed: Count,
    ) -> Summary {
        // some sanity checks
        debug_assert_ge!(
            streamreader.streamreader_bytes,
            streamreader.streamreader_chunks,
            "There are less bytes than chunks"
        );
        debug_assert_ge!(
            fragmentassembler.fragmentassembler_fragments,
            logprocessor.logprocessor_records_decoded + logprocessor.logprocessor_decode_errors,
            "There are less fragments than decode attempts"
        );
        Summary {
            path,
            format: Some(format),
            streamreader,
            fragmentassembler,
            logprocessor,
            lines_printed,
        }
    }

    /// Total records rejected by the filter, for all reasons.
    pub fn records_rejected(&self) -> Count {
        self.logprocessor
            .logprocessor_records_rejected
            .values()
            .sum()
    }
}

impl fmt::Debug for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("bytes", &self.streamreader.streamreader_bytes)
            .field("chunks", &self.streamreader.streamreader_chunks)
            .field("fragments", &self.fragmentassembler.fragmentassembler_fragments)
            .field("peak buffered", &self.fragmentassembler.fragmentassembler_peak_buffered)
            .field("records", &self.logprocessor.logprocessor_records_decoded)
            .field("decode errors", &self.logprocessor.logprocessor_decode_errors)
            .field("records passed", &self.logprocessor.logprocessor_records_passed)
            .field("records rejected", &self.records_rejected())
            .field("lines printed", &self.lines_printed)
            .finish()
    }
}
