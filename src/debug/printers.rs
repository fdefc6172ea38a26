// src/debug/printers.rs

//! Diagnostic macros for user-facing stderr messages and helpers for
//! rendering raw log bytes in debug and test builds.

#[doc(hidden)]
#[allow(unused_imports)]
use ::utf8_iter::Utf8CharsEx; // provides `.chars()` on `&[u8]`

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `warn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions - byte rendering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// turn passed char into a pictoral representation if it is a control
/// character, e.g. '\n' returns '␊'.
///
/// Keeps the printing width of a control character to 1 so traced
/// fragments stay on one line.
#[cfg(any(debug_assertions, test))]
pub const fn char_to_char_noraw(c: char) -> char {
    // https://en.wikipedia.org/wiki/C0_and_C1_control_codes#C0_controls
    match c as u32 {
        0 => '␀',
        9 => '␉',  // '\t'
        10 => '␊', // '\n'
        11 => '␋', // '\v'
        12 => '␌', // '\f'
        13 => '␍', // '\r'
        27 => '␛', // '\e'
        127 => '␡',
        1..=31 => '·',
        _ => c,
    }
}

/// Transform buffer of bytes to a non-raw `String` of the first `max` chars,
/// with a trailing `…` when truncated. Bytes may be invalid UTF-8.
///
/// Used when tracing whole fragments that may be large.
#[doc(hidden)]
#[allow(non_snake_case)]
#[cfg(any(debug_assertions, test))]
pub fn buffer_to_String_noraw_trunc(buffer: &[u8], max: usize) -> String {
    let mut s2: String = String::with_capacity(max + 4);
    for (i, c) in buffer.chars().enumerate() {
        if i == max {
            s2.push('…');
            break;
        }
        s2.push(char_to_char_noraw(c));
    }
    s2
}
