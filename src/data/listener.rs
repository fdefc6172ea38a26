// src/data/listener.rs

//! Implement [`ListenerRecord`], one `<msg>` element of an Oracle Database
//! XML listener log, and the decoder that builds it from a [`Fragment`].
//!
//! A listener log is not one XML document. It is many `<msg>` elements
//! appended one after another, e.g.
//!
//! ```lang-xml
//! <msg time='2023-09-11T14:02:33.120-04:00' org_id='oracle' comp_id='tnslsnr'
//!  type='UNKNOWN' level='16' host_id='dbhost1'
//!  host_addr='10.1.1.1' pid='4242'>
//!  <txt>TNS-12541: TNS:no listener
//!  </txt>
//! </msg>
//! ```
//!
//! The decoder is a small hand-written element scanner. It accepts the
//! subset of XML the listener writes (elements, attributes, text, entity and
//! character references, CDATA, comments, processing instructions) and
//! rejects a fragment that is not one well-nested element rooted at `<msg>`.
//!
//! [`Fragment`]: crate::data::fragment::Fragment

use std::fmt;

use ::bstr::ByteSlice;
use ::memchr::memchr;
use ::memchr::memmem;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::data::common::DecodeError;
use crate::data::datetime::{
    listener_time_parse,
    DateTimeLOpt,
};
use crate::data::fragment::Fragment;

/// Start marker of a listener record.
pub const MSG_START: &[u8] = b"<msg";
/// End marker of a listener record.
pub const MSG_END: &[u8] = b"</msg>";

const MSG_NAME: &[u8] = b"msg";
const TXT_NAME: &[u8] = b"txt";

/// Nesting deeper than this is rejected.
const ELEMENT_DEPTH_MAX: usize = 64;

/// The attributes of a `<msg>` element, named after how they are filtered
/// and printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerField {
    HostAddr,
    Pid,
    Time,
    OrgId,
    CompId,
    MsgType,
    Level,
    HostId,
}

impl ListenerField {
    pub const ALL: [ListenerField; 8] = [
        ListenerField::HostAddr,
        ListenerField::Pid,
        ListenerField::Time,
        ListenerField::OrgId,
        ListenerField::CompId,
        ListenerField::MsgType,
        ListenerField::Level,
        ListenerField::HostId,
    ];

    /// The XML attribute name.
    pub const fn attr_name(&self) -> &'static str {
        match self {
            ListenerField::HostAddr => "host_addr",
            ListenerField::Pid => "pid",
            ListenerField::Time => "time",
            ListenerField::OrgId => "org_id",
            ListenerField::CompId => "comp_id",
            ListenerField::MsgType => "type",
            ListenerField::Level => "level",
            ListenerField::HostId => "host_id",
        }
    }

    fn from_attr_name(name: &[u8]) -> Option<ListenerField> {
        ListenerField::ALL
            .iter()
            .find(|field| field.attr_name().as_bytes() == name)
            .copied()
    }
}

impl fmt::Display for ListenerField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.attr_name())
    }
}

/// A decoded listener log `<msg>` element.
///
/// Every attribute is optional; an absent attribute is `None`, never an
/// empty string. `txt` is the text of the first direct `<txt>` child.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ListenerRecord {
    host_addr: Option<String>,
    pid: Option<String>,
    time: Option<String>,
    org_id: Option<String>,
    comp_id: Option<String>,
    msg_type: Option<String>,
    level: Option<String>,
    host_id: Option<String>,
    txt: Option<String>,
}

impl fmt::Debug for ListenerRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("ListenerRecord")
            .field("time", &self.time)
            .field("host_addr", &self.host_addr)
            .field("pid", &self.pid)
            .field("type", &self.msg_type)
            .field("txt", &self.txt)
            .finish()
    }
}

impl ListenerRecord {
    /// Decode one listener [`Fragment`].
    ///
    /// Leading whitespace is skipped. The fragment must hold exactly one
    /// `<msg>` element followed by nothing but whitespace.
    pub fn from_fragment(fragment: &Fragment) -> Result<ListenerRecord, DecodeError> {
        defn!("({:?})", fragment);
        let data: &[u8] = fragment.as_bytes();
        let at: usize = data.len() - data.trim_start().len();
        if !data[at..].starts_with(MSG_START) {
            defx!("return MissingStartMarker");
            return Err(DecodeError::MissingStartMarker);
        }
        let mut scanner = ElementScanner::new(data, at);
        let element: Element = scanner.element(0)?;
        scanner.skip_whitespace();
        if !scanner.at_end() {
            defx!("return Malformed; trailing content");
            return Err(scanner.malformed("content after the root element"));
        }
        if element.name != MSG_NAME {
            defx!("return UnexpectedRoot");
            return Err(DecodeError::UnexpectedRoot(String::from_utf8_lossy(&element.name).into_owned()));
        }

        let mut record = ListenerRecord::default();
        for (name, value) in element.attrs.into_iter() {
            if let Some(field) = ListenerField::from_attr_name(&name) {
                record.set(field, value);
            }
        }
        record.txt = element
            .children
            .into_iter()
            .find(|child| child.name == TXT_NAME)
            .and_then(|child| child.text);
        defx!("return {:?}", record);

        Ok(record)
    }

    /// For testing and callers assembling records by hand.
    pub fn new_with(
        fields: &[(ListenerField, &str)],
        txt: Option<&str>,
    ) -> ListenerRecord {
        let mut record = ListenerRecord::default();
        for (field, value) in fields.iter() {
            record.set(*field, String::from(*value));
        }
        record.txt = txt.map(String::from);

        record
    }

    fn set(
        &mut self,
        field: ListenerField,
        value: String,
    ) {
        let slot: &mut Option<String> = match field {
            ListenerField::HostAddr => &mut self.host_addr,
            ListenerField::Pid => &mut self.pid,
            ListenerField::Time => &mut self.time,
            ListenerField::OrgId => &mut self.org_id,
            ListenerField::CompId => &mut self.comp_id,
            ListenerField::MsgType => &mut self.msg_type,
            ListenerField::Level => &mut self.level,
            ListenerField::HostId => &mut self.host_id,
        };
        *slot = Some(value);
    }

    /// The value of attribute `field`, if present.
    pub fn field(
        &self,
        field: ListenerField,
    ) -> Option<&str> {
        match field {
            ListenerField::HostAddr => self.host_addr.as_deref(),
            ListenerField::Pid => self.pid.as_deref(),
            ListenerField::Time => self.time.as_deref(),
            ListenerField::OrgId => self.org_id.as_deref(),
            ListenerField::CompId => self.comp_id.as_deref(),
            ListenerField::MsgType => self.msg_type.as_deref(),
            ListenerField::Level => self.level.as_deref(),
            ListenerField::HostId => self.host_id.as_deref(),
        }
    }

    pub fn host_addr(&self) -> Option<&str> {
        self.host_addr.as_deref()
    }

    pub fn pid(&self) -> Option<&str> {
        self.pid.as_deref()
    }

    pub fn txt(&self) -> Option<&str> {
        self.txt.as_deref()
    }

    /// The `time` attribute parsed by [`listener_time_parse`].
    pub fn time_parsed(&self) -> DateTimeLOpt {
        match self.time.as_deref() {
            Some(value) => listener_time_parse(value),
            None => None,
        }
    }
}

// ----------------------------------------------------------------------------
// ElementScanner

/// One parsed element. Only what the listener decoder needs is kept.
#[derive(Debug, Default)]
struct Element {
    name: Vec<u8>,
    attrs: Vec<(Vec<u8>, String)>,
    /// character data before the first child element; `None` if there is
    /// none, like an `ElementTree` `.text`
    text: Option<String>,
    children: Vec<Element>,
}

/// Cursor over the bytes of one fragment.
struct ElementScanner<'a> {
    data: &'a [u8],
    at: usize,
}

impl<'a> ElementScanner<'a> {
    fn new(
        data: &'a [u8],
        at: usize,
    ) -> ElementScanner<'a> {
        ElementScanner { data, at }
    }

    fn malformed(
        &self,
        reason: &'static str,
    ) -> DecodeError {
        DecodeError::Malformed {
            offset: self.at,
            reason,
        }
    }

    #[inline(always)]
    fn at_end(&self) -> bool {
        self.at >= self.data.len()
    }

    #[inline(always)]
    fn rest(&self) -> &'a [u8] {
        let data: &'a [u8] = self.data;
        &data[self.at.min(data.len())..]
    }

    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.data.get(self.at).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.at += 1;
        }
    }

    fn expect(
        &mut self,
        token: &[u8],
        reason: &'static str,
    ) -> Result<(), DecodeError> {
        if !self.rest().starts_with(token) {
            return Err(self.malformed(reason));
        }
        self.at += token.len();

        Ok(())
    }

    /// Advance past the next `terminator`.
    fn skip_past(
        &mut self,
        terminator: &[u8],
        reason: &'static str,
    ) -> Result<(), DecodeError> {
        match memmem::find(self.rest(), terminator) {
            Some(i) => {
                self.at += i + terminator.len();
                Ok(())
            }
            None => Err(self.malformed(reason)),
        }
    }

    fn name(&mut self) -> Result<&'a [u8], DecodeError> {
        let beg = self.at;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80 => {}
            _ => return Err(self.malformed("expected a name")),
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'.' | b'-') || b >= 0x80 {
                self.at += 1;
            } else {
                break;
            }
        }

        let data: &'a [u8] = self.data;

        Ok(&data[beg..self.at])
    }

    /// Parse an element starting at `<`.
    fn element(
        &mut self,
        depth: usize,
    ) -> Result<Element, DecodeError> {
        if depth > ELEMENT_DEPTH_MAX {
            return Err(self.malformed("elements nested too deeply"));
        }
        self.expect(b"<", "expected '<'")?;
        let mut element = Element {
            name: self.name()?.to_vec(),
            ..Default::default()
        };
        // attributes
        loop {
            let had_space: bool = matches!(self.peek(), Some(b) if b.is_ascii_whitespace());
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') => {
                    self.at += 1;
                    break;
                }
                Some(b'/') => {
                    self.expect(b"/>", "expected '/>'")?;
                    return Ok(element);
                }
                Some(_) => {
                    if !had_space {
                        return Err(self.malformed("attributes must be separated by whitespace"));
                    }
                    let name: &[u8] = self.name()?;
                    if element.attrs.iter().any(|(n, _)| n.as_slice() == name) {
                        return Err(self.malformed("duplicate attribute"));
                    }
                    self.skip_whitespace();
                    self.expect(b"=", "expected '=' after attribute name")?;
                    self.skip_whitespace();
                    let value: String = self.attr_value()?;
                    element.attrs.push((name.to_vec(), value));
                }
                None => return Err(self.malformed("unterminated start tag")),
            }
        }
        // content
        let mut text: Vec<u8> = Vec::new();
        let mut text_done: bool = false;
        let mut text_seen: bool = false;
        loop {
            let rest: &[u8] = self.rest();
            let lt: usize = match memchr(b'<', rest) {
                Some(i) => i,
                None => return Err(self.malformed("unterminated element")),
            };
            if lt > 0 {
                let chars: &[u8] = &rest[..lt];
                if !text_done {
                    unescape_into(chars, &mut text).map_err(|reason| self.malformed(reason))?;
                    text_seen = true;
                } else {
                    // validate references in tail text too
                    let mut sink: Vec<u8> = Vec::new();
                    unescape_into(chars, &mut sink).map_err(|reason| self.malformed(reason))?;
                }
                self.at += lt;
            }
            let rest: &[u8] = self.rest();
            if rest.starts_with(b"</") {
                self.at += 2;
                let name: &[u8] = self.name()?;
                if name != element.name.as_slice() {
                    return Err(self.malformed("mismatched end tag"));
                }
                self.skip_whitespace();
                self.expect(b">", "expected '>' closing end tag")?;
                break;
            } else if rest.starts_with(b"<!--") {
                self.skip_past(b"-->", "unterminated comment")?;
                // leading text ends at any child node
                text_done = true;
            } else if rest.starts_with(b"<![CDATA[") {
                self.at += 9;
                let beg = self.at;
                self.skip_past(b"]]>", "unterminated CDATA section")?;
                if !text_done {
                    text.extend_from_slice(&self.data[beg..self.at - 3]);
                    text_seen = true;
                }
            } else if rest.starts_with(b"<?") {
                self.skip_past(b"?>", "unterminated processing instruction")?;
                text_done = true;
            } else if rest.starts_with(b"<!") {
                return Err(self.malformed("unexpected markup declaration"));
            } else {
                let child: Element = self.element(depth + 1)?;
                element.children.push(child);
                text_done = true;
            }
        }
        if text_seen {
            element.text = Some(String::from_utf8_lossy(&text).into_owned());
        }

        Ok(element)
    }

    /// Parse a quoted attribute value, entity references decoded.
    fn attr_value(&mut self) -> Result<String, DecodeError> {
        let quote: u8 = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.malformed("attribute value must be quoted")),
        };
        self.at += 1;
        let rest: &[u8] = self.rest();
        let end: usize = match memchr(quote, rest) {
            Some(i) => i,
            None => return Err(self.malformed("unterminated attribute value")),
        };
        let raw: &[u8] = &rest[..end];
        if memchr(b'<', raw).is_some() {
            return Err(self.malformed("'<' in attribute value"));
        }
        let mut value: Vec<u8> = Vec::with_capacity(raw.len());
        unescape_into(raw, &mut value).map_err(|reason| self.malformed(reason))?;
        self.at += end + 1;

        Ok(String::from_utf8_lossy(&value).into_owned())
    }
}

/// Append `raw` to `out` with the predefined entities and character
/// references replaced.
fn unescape_into(
    raw: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), &'static str> {
    let mut at: usize = 0;
    while let Some(i) = memchr(b'&', &raw[at..]) {
        out.extend_from_slice(&raw[at..at + i]);
        at += i + 1;
        let semi: usize = match memchr(b';', &raw[at..]) {
            Some(j) => j,
            None => return Err("unterminated entity reference"),
        };
        let entity: &[u8] = &raw[at..at + semi];
        match entity {
            b"lt" => out.push(b'<'),
            b"gt" => out.push(b'>'),
            b"amp" => out.push(b'&'),
            b"quot" => out.push(b'"'),
            b"apos" => out.push(b'\''),
            _ => {
                let c: char = char_reference(entity).ok_or("undefined entity reference")?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
        at += semi + 1;
    }
    out.extend_from_slice(&raw[at..]);

    Ok(())
}

/// Decode `#NN` or `#xHH` (without the `&` and `;`).
fn char_reference(entity: &[u8]) -> Option<char> {
    let digits: &[u8] = entity.strip_prefix(b"#")?;
    let (digits, radix): (&[u8], u32) = match digits.strip_prefix(b"x") {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };
    if digits.is_empty() {
        return None;
    }
    let digits: &str = std::str::from_utf8(digits).ok()?;
    let value: u32 = u32::from_str_radix(digits, radix).ok()?;
    match char::from_u32(value) {
        Some('\0') => None,
        c => c,
    }
}
