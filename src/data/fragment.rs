// src/data/fragment.rs

//! Implement [`Fragment`], the raw undecoded bytes of one record.

use std::fmt;

use crate::common::{
    Bytes,
    FileOffset,
};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::buffer_to_String_noraw_trunc;

/// A `Fragment` is a contiguous span of bytes from a log stream believed to
/// hold exactly one record, from its start marker through its end marker.
///
/// A `Fragment` is created by a [`FragmentAssembler`] and consumed by a
/// record decoder, e.g. [`decode_fragment`].
///
/// [`FragmentAssembler`]: crate::readers::fragmentassembler::FragmentAssembler
/// [`decode_fragment`]: crate::data::common::decode_fragment
#[derive(Clone, PartialEq, Eq)]
pub struct Fragment {
    data: Bytes,
    /// byte offset of `data[0]` within the stream
    fileoffset: FileOffset,
}

impl fmt::Debug for Fragment {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        let mut ds = f.debug_struct("Fragment");
        ds.field("fileoffset", &self.fileoffset)
            .field("len", &self.data.len());
        #[cfg(any(debug_assertions, test))]
        ds.field("data", &buffer_to_String_noraw_trunc(&self.data, 60));
        ds.finish()
    }
}

impl Fragment {
    pub fn new(
        data: Bytes,
        fileoffset: FileOffset,
    ) -> Fragment {
        Fragment {
            data,
            fileoffset,
        }
    }

    /// Length of this `Fragment` in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Clippy recommends `fn is_empty` since there is a `len()`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub const fn fileoffset(&self) -> FileOffset {
        self.fileoffset
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}
