// src/readers/fragmentassembler.rs

//! Implements a [`FragmentAssembler`], which turns a sequence of byte chunks
//! into a sequence of [`Fragment`s], one per record.
//!
//! Chunks are pushed with [`push`], and complete fragments are taken with
//! [`pop_fragment`] until it returns `None`. At end of stream, [`finish`]
//! handles whatever remains buffered.
//!
//! ```text
//!   chunk     chunk          chunk      chunk
//! ┌────────┬──────────────┬───────────┬──────┐
//! │\n<msg a│="1"><txt>x</t│xt></msg>\n│<msg b│ …
//! └────────┴──────────────┴───────────┴──────┘
//!    └─────────── Fragment ──────────┘  └─ Accumulating
//! ```
//!
//! Memory held by a `FragmentAssembler` is bounded by the largest record
//! plus the largest chunk, regardless of how many records pass through.
//!
//! [`Fragment`s]: crate::data::fragment::Fragment
//! [`push`]: FragmentAssembler::push
//! [`pop_fragment`]: FragmentAssembler::pop_fragment
//! [`finish`]: FragmentAssembler::finish

use crate::common::{
    Bytes,
    Count,
    FileOffset,
};
use crate::data::common::RecordFormat;
use crate::data::fragment::Fragment;

use std::fmt;

use ::bstr::ByteSlice;
use ::memchr::memmem::{
    Finder,
    FinderRev,
};
use ::more_asserts::{
    debug_assert_ge,
    debug_assert_le,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// Buffers with spare capacity beyond this after compaction are shrunk.
/// Eager reading pushes the entire stream at once; this releases it.
pub const BUFFER_SHRINK_AT: usize = 0x100000;

/// The state of a [`FragmentAssembler`] between chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblerState {
    /// No record has begun.
    Idle,
    /// A start marker was seen, and its end marker not yet.
    Accumulating,
}

/// Statistics of a [`FragmentAssembler`], for CLI option `--summary`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryFragmentAssembler {
    pub fragmentassembler_fragments: Count,
    pub fragmentassembler_interstitial_bytes: Count,
    pub fragmentassembler_discarded_bytes: Count,
    pub fragmentassembler_peak_buffered: usize,
}

/// Find complete records within a stream of byte chunks.
///
/// A record spans from its format's start marker through its end marker,
/// inclusive. Bytes between records (whitespace, noise) are dropped.
/// The end marker must not appear inside a record's content.
///
/// Where the start marker is exclusive to record starts (see
/// [`RecordFormat::start_marker_exclusive`]), a record cut short by an
/// interrupted write is dropped and the complete record after it is kept.
pub struct FragmentAssembler {
    format: RecordFormat,
    start_finder: Finder<'static>,
    /// set if the start marker is exclusive to record starts
    start_finder_rev: Option<FinderRev<'static>>,
    end_finder: Finder<'static>,
    end_finder_crlf: Option<Finder<'static>>,
    /// longest end marker
    end_marker_len: usize,
    /// buffered bytes; `buffer[..consumed]` is already handled
    buffer: Bytes,
    consumed: usize,
    /// end marker search resumes here
    search_at: usize,
    /// stream offset of `buffer[0]`
    buffer_fileoffset: FileOffset,
    /// high-water mark of unhandled buffered bytes
    peak_buffered: usize,
    /// summary statistic
    fragments_emitted: Count,
    /// summary statistic, non-whitespace bytes dropped between records
    interstitial_bytes: Count,
    /// summary statistic, non-whitespace bytes of an unterminated trailing
    /// record dropped by `finish`
    discarded_bytes: Count,
}

impl fmt::Debug for FragmentAssembler {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("FragmentAssembler")
            .field("format", &self.format)
            .field("buffered", &self.buffered())
            .field("consumed", &self.consumed)
            .field("search_at", &self.search_at)
            .field("buffer_fileoffset", &self.buffer_fileoffset)
            .field("peak_buffered", &self.peak_buffered)
            .field("fragments_emitted", &self.fragments_emitted)
            .finish()
    }
}

/// Count of bytes that are not ASCII whitespace.
fn count_nonwhitespace(data: &[u8]) -> Count {
    data.iter()
        .filter(|b| !b.is_ascii_whitespace())
        .count() as Count
}

impl FragmentAssembler {
    pub fn new(format: RecordFormat) -> FragmentAssembler {
        defñ!("({:?})", format);
        FragmentAssembler {
            format,
            start_finder: Finder::new(format.start_marker()),
            start_finder_rev: match format.start_marker_exclusive() {
                true => Some(FinderRev::new(format.start_marker())),
                false => None,
            },
            end_finder: Finder::new(format.end_marker()),
            end_finder_crlf: format
                .end_marker_crlf()
                .map(|marker| Finder::new(marker)),
            end_marker_len: match format.end_marker_crlf() {
                Some(crlf) if crlf.len() > format.end_marker().len() => crlf.len(),
                _ => format.end_marker().len(),
            },
            buffer: Bytes::new(),
            consumed: 0,
            search_at: 0,
            buffer_fileoffset: 0,
            peak_buffered: 0,
            fragments_emitted: 0,
            interstitial_bytes: 0,
            discarded_bytes: 0,
        }
    }

    pub const fn format(&self) -> RecordFormat {
        self.format
    }

    /// Count of buffered bytes not yet emitted or dropped.
    pub fn buffered(&self) -> usize {
        self.buffer.len() - self.consumed
    }

    /// High-water mark of [`buffered`](Self::buffered) bytes.
    pub const fn peak_buffered(&self) -> usize {
        self.peak_buffered
    }

    pub const fn fragments_emitted(&self) -> Count {
        self.fragments_emitted
    }

    pub const fn interstitial_bytes(&self) -> Count {
        self.interstitial_bytes
    }

    pub const fn discarded_bytes(&self) -> Count {
        self.discarded_bytes
    }

    pub fn summary(&self) -> SummaryFragmentAssembler {
        SummaryFragmentAssembler {
            fragmentassembler_fragments: self.fragments_emitted,
            fragmentassembler_interstitial_bytes: self.interstitial_bytes,
            fragmentassembler_discarded_bytes: self.discarded_bytes,
            fragmentassembler_peak_buffered: self.peak_buffered,
        }
    }

    /// `Accumulating` if a record has begun and not yet ended.
    pub fn state(&self) -> AssemblerState {
        match self
            .start_finder
            .find(&self.buffer[self.consumed..])
        {
            Some(_) => AssemblerState::Accumulating,
            None => AssemblerState::Idle,
        }
    }

    /// Append a chunk. Call [`pop_fragment`](Self::pop_fragment) until it
    /// returns `None` before pushing the next chunk.
    pub fn push(
        &mut self,
        chunk: &[u8],
    ) {
        defñ!("({} bytes)", chunk.len());
        self.buffer.extend_from_slice(chunk);
        let buffered: usize = self.buffered();
        if buffered > self.peak_buffered {
            self.peak_buffered = buffered;
        }
    }

    /// Return the next complete [`Fragment`], if the buffered bytes hold
    /// one. A single chunk may complete many fragments.
    pub fn pop_fragment(&mut self) -> Option<Fragment> {
        defn!("search_at {}, consumed {}, len {}", self.search_at, self.consumed, self.buffer.len());
        loop {
            debug_assert_le!(self.consumed, self.search_at, "consumed past search_at");
            let end: usize = match self.find_end() {
                Some(end) => end,
                None => {
                    self.compact();
                    defx!("return None");
                    return None;
                }
            };
            let span: &[u8] = &self.buffer[self.consumed..end];
            match self.find_start(span) {
                Some((first, start)) => {
                    self.interstitial_bytes += count_nonwhitespace(&span[..first]);
                    if first < start {
                        defo!("unterminated record [{}‥{})", self.consumed + first, self.consumed + start);
                        self.discarded_bytes += count_nonwhitespace(&span[first..start]);
                    }
                    let fileoffset: FileOffset = self.buffer_fileoffset + (self.consumed + start) as FileOffset;
                    let fragment = Fragment::new(span[start..].to_vec(), fileoffset);
                    self.consumed = end;
                    self.search_at = end;
                    self.fragments_emitted += 1;
                    defx!("return {:?}", fragment);

                    return Some(fragment);
                }
                None => {
                    // an end marker with no record before it
                    defo!("noise [{}‥{})", self.consumed, end);
                    self.interstitial_bytes += count_nonwhitespace(span);
                    self.consumed = end;
                    self.search_at = end;
                }
            }
        }
    }

    /// Offset just past the earliest end marker at or after `search_at`.
    fn find_end(&self) -> Option<usize> {
        let haystack: &[u8] = &self.buffer[self.search_at..];
        let lf: Option<usize> = self
            .end_finder
            .find(haystack)
            .map(|at| at + self.format.end_marker().len());
        let crlf: Option<usize> = match (&self.end_finder_crlf, self.format.end_marker_crlf()) {
            (Some(finder), Some(marker)) => finder
                .find(haystack)
                .map(|at| at + marker.len()),
            _ => None,
        };
        let end: usize = match (lf, crlf) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => return None,
        };

        Some(self.search_at + end)
    }

    /// Offsets of the first start marker in `span`, and of the start marker
    /// that begins the record ending `span`.
    fn find_start(
        &self,
        span: &[u8],
    ) -> Option<(usize, usize)> {
        let first: usize = self.start_finder.find(span)?;
        let start: usize = match &self.start_finder_rev {
            Some(finder_rev) => finder_rev
                .rfind(span)
                .unwrap_or(first),
            None => first,
        };

        Some((first, start))
    }

    /// Remove handled bytes and any noise ahead of the next start marker.
    /// The end marker search resumes where a marker split across chunks
    /// would begin.
    fn compact(&mut self) {
        let start_marker_len: usize = self.format.start_marker().len();
        let pending: &[u8] = &self.buffer[self.consumed..];
        let noise: usize = match self.start_finder.find(pending) {
            Some(start) => start,
            // keep a tail that may be the front of a split start marker
            None => pending
                .len()
                .saturating_sub(start_marker_len - 1),
        };
        self.interstitial_bytes += count_nonwhitespace(&pending[..noise]);
        let drop: usize = self.consumed + noise;
        defo!("drop {} bytes", drop);
        self.buffer.drain(..drop);
        self.buffer_fileoffset += drop as FileOffset;
        self.consumed = 0;
        self.search_at = self
            .buffer
            .len()
            .saturating_sub(self.end_marker_len - 1);
        if self.buffer.capacity() > BUFFER_SHRINK_AT && self.buffer.capacity() > self.buffer.len() * 4 {
            defo!("shrink capacity {}", self.buffer.capacity());
            self.buffer.shrink_to(self.buffer.len() * 2);
        }
        debug_assert_ge!(self.buffer.len(), self.search_at);
    }

    /// At end of stream, handle the remaining buffered bytes.
    ///
    /// A trailing record whose end marker is only missing its trailing
    /// whitespace (e.g. a final `}` with no newline) is returned. Any other
    /// remainder is an unterminated record and is dropped; see
    /// [`discarded_bytes`](Self::discarded_bytes).
    pub fn finish(&mut self) -> Option<Fragment> {
        defn!("buffered {}", self.buffered());
        let pending: &[u8] = &self.buffer[self.consumed..];
        let end_marker: &[u8] = self.format.end_marker().trim_end();
        let trimmed: &[u8] = pending.trim_end();
        let mut result: Option<Fragment> = None;
        match self.find_start(trimmed) {
            Some((first, start)) if !end_marker.is_empty() && trimmed[start..].ends_with(end_marker) => {
                self.interstitial_bytes += count_nonwhitespace(&trimmed[..first]);
                self.discarded_bytes += count_nonwhitespace(&trimmed[first..start]);
                let fileoffset: FileOffset = self.buffer_fileoffset + (self.consumed + start) as FileOffset;
                result = Some(Fragment::new(trimmed[start..].to_vec(), fileoffset));
                self.fragments_emitted += 1;
            }
            _ => {
                self.discarded_bytes += count_nonwhitespace(pending);
            }
        }
        self.buffer_fileoffset += self.buffer.len() as FileOffset;
        self.buffer.clear();
        self.consumed = 0;
        self.search_at = 0;
        defx!("return {:?}", result);

        result
    }
}
