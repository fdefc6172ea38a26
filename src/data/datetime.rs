// src/data/datetime.rs

//! Parse and compare the timestamps carried by listener log records.
//!
//! The listener writes a `time` attribute like
//! `2023-09-11T14:02:33.120-04:00`. Only the wall-clock portion before the
//! first `.` is used, parsed with chrono [`strftime`] pattern
//! [`LISTENER_TIME_PATTERN`], as a [`NaiveDateTime`] in local time.
//!
//! [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html

#[doc(hidden)]
pub use ::chrono::{
    Duration,
    Local,
    NaiveDateTime,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// A record timestamp. Listener timestamps are local wall-clock times.
pub type DateTimeL = NaiveDateTime;
pub type DateTimeLOpt = Option<DateTimeL>;

/// chrono `strftime` pattern of the listener `time` attribute, after the
/// fractional seconds are removed.
pub const LISTENER_TIME_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// chrono `strftime` pattern used when printing a parsed timestamp.
pub const PRINT_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a listener `time` attribute value.
///
/// Everything from the first `.` onwards is ignored. Returns `None` when the
/// remainder does not match [`LISTENER_TIME_PATTERN`] exactly, including
/// surrounding whitespace.
pub fn listener_time_parse(value: &str) -> DateTimeLOpt {
    let wallclock: &str = match value.split('.').next() {
        Some(s) => s,
        None => return None,
    };
    // chrono skips whitespace ahead of a number
    if wallclock.starts_with(|c: char| c.is_whitespace()) {
        defñ!("leading whitespace {:?}", wallclock);
        return None;
    }
    match NaiveDateTime::parse_from_str(wallclock, LISTENER_TIME_PATTERN) {
        Ok(dt) => Some(dt),
        Err(_err) => {
            defñ!("parse_from_str({:?}) failed {}", wallclock, _err);

            None
        }
    }
}

/// Current local wall-clock time.
pub fn now_local() -> DateTimeL {
    Local::now().naive_local()
}

/// Is `dt` no more than `horizon_hours` before `reference`?
///
/// The boundary is inclusive. A `dt` after `reference` is always within.
/// A horizon too large for chrono to represent means "no limit".
pub fn dt_within_horizon(
    dt: &DateTimeL,
    reference: &DateTimeL,
    horizon_hours: i64,
) -> bool {
    let delta: Duration = reference.signed_duration_since(*dt);
    match Duration::try_hours(horizon_hours) {
        Some(horizon) => delta <= horizon,
        None => true,
    }
}

/// Render a parsed timestamp the way projected output lines show it.
pub fn dt_to_string(dt: &DateTimeL) -> String {
    dt.format(PRINT_TIME_PATTERN).to_string()
}
