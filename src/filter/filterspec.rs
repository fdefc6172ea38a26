// src/filter/filterspec.rs

//! Implements the record filters [`ListenerFilter`] and [`AttentionFilter`],
//! their sum [`RecordFilter`], and the [`RecencyWindow`] used by
//! "recent errors" mode.
//!
//! An empty filter matches every record. Only a supplied constraint can
//! reject a record, and a record lacking the constrained field is always
//! rejected by it.

use crate::data::attention::{
    AttentionRecord,
    AttentionType,
    Urgency,
};
use crate::data::common::{
    LogRecord,
    RecordFormat,
};
use crate::data::datetime::{
    dt_within_horizon,
    now_local,
    DateTimeL,
};
use crate::data::listener::{
    ListenerField,
    ListenerRecord,
};

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

/// A record body containing any of these (case-sensitive) is an error.
pub const ERROR_MARKERS: [&str; 2] = ["TNS-", "Error"];

/// Default look-back of [`RecencyWindow`], in hours.
pub const HORIZON_HOURS_DEFAULT: i64 = 24;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FilterOutcome
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of applying a filter to a record. Every variant but `Pass` is a
/// reason for rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterOutcome {
    Pass,
    /// a supplied attribute constraint did not match, or the attribute is
    /// absent
    FieldMismatch(ListenerField),
    /// no key names the requested attention type
    AttentionTypeMismatch,
    /// no value carries the requested urgency
    UrgencyMismatch,
    /// recent-errors mode; the body has no [`ERROR_MARKERS`]
    NoErrorMarker,
    /// recent-errors mode; the `time` attribute is absent or unparseable
    BadTimestamp,
    /// recent-errors mode; the record is older than the horizon
    OutsideWindow,
    /// the filter is for the other record format
    FormatMismatch,
}

impl FilterOutcome {
    pub const fn is_pass(&self) -> bool {
        matches!(self, FilterOutcome::Pass)
    }
}

impl fmt::Display for FilterOutcome {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            FilterOutcome::Pass => write!(f, "pass"),
            FilterOutcome::FieldMismatch(field) => write!(f, "{} mismatch", field),
            FilterOutcome::AttentionTypeMismatch => write!(f, "attention type mismatch"),
            FilterOutcome::UrgencyMismatch => write!(f, "urgency mismatch"),
            FilterOutcome::NoErrorMarker => write!(f, "no error marker"),
            FilterOutcome::BadTimestamp => write!(f, "bad timestamp"),
            FilterOutcome::OutsideWindow => write!(f, "outside window"),
            FilterOutcome::FormatMismatch => write!(f, "format mismatch"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RecencyWindow
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The span of time a record must fall in to be "recent".
///
/// `reference_time` is fixed when the window is created so every record of
/// a scan is judged against the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecencyWindow {
    pub reference_time: DateTimeL,
    pub horizon_hours: i64,
}

impl RecencyWindow {
    pub const fn new(
        reference_time: DateTimeL,
        horizon_hours: i64,
    ) -> RecencyWindow {
        RecencyWindow {
            reference_time,
            horizon_hours,
        }
    }

    /// A window ending at the current local time.
    pub fn from_now(horizon_hours: i64) -> RecencyWindow {
        RecencyWindow::new(now_local(), horizon_hours)
    }

    /// Is `dt` within the window? Inclusive of the horizon boundary.
    pub fn contains(
        &self,
        dt: &DateTimeL,
    ) -> bool {
        dt_within_horizon(dt, &self.reference_time, self.horizon_hours)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ListenerFilter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Exact-match attribute constraints on a [`ListenerRecord`], plus the
/// optional recent-errors check.
///
/// An empty string constraint is the same as no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerFilter {
    pub host_addr: Option<String>,
    pub pid: Option<String>,
    pub org_id: Option<String>,
    pub comp_id: Option<String>,
    pub msg_type: Option<String>,
    pub host_id: Option<String>,
    /// when set, only recent error records pass
    pub recent_errors: Option<RecencyWindow>,
}

impl ListenerFilter {
    /// The attribute constraints in evaluation order.
    fn constraints(&self) -> [(ListenerField, Option<&str>); 6] {
        [
            (ListenerField::HostAddr, self.host_addr.as_deref()),
            (ListenerField::Pid, self.pid.as_deref()),
            (ListenerField::OrgId, self.org_id.as_deref()),
            (ListenerField::CompId, self.comp_id.as_deref()),
            (ListenerField::MsgType, self.msg_type.as_deref()),
            (ListenerField::HostId, self.host_id.as_deref()),
        ]
    }

    /// Does any attribute constraint apply? The recency check is not an
    /// attribute constraint.
    pub fn has_field_constraints(&self) -> bool {
        self.constraints()
            .iter()
            .any(|(_, want)| matches!(want, Some(s) if !s.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        !self.has_field_constraints() && self.recent_errors.is_none()
    }

    pub fn evaluate(
        &self,
        record: &ListenerRecord,
    ) -> FilterOutcome {
        for (field, want) in self.constraints().iter() {
            let want: &str = match want {
                Some(s) if !s.is_empty() => s,
                _ => continue,
            };
            match record.field(*field) {
                Some(have) if have == want => {}
                _ => {
                    defñ!("FieldMismatch({})", field);
                    return FilterOutcome::FieldMismatch(*field);
                }
            }
        }
        if let Some(window) = self.recent_errors.as_ref() {
            let txt: &str = record.txt().unwrap_or("");
            if !ERROR_MARKERS
                .iter()
                .any(|marker| txt.contains(marker))
            {
                return FilterOutcome::NoErrorMarker;
            }
            let dt: DateTimeL = match record.time_parsed() {
                Some(dt) => dt,
                None => return FilterOutcome::BadTimestamp,
            };
            if !window.contains(&dt) {
                return FilterOutcome::OutsideWindow;
            }
        }

        FilterOutcome::Pass
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AttentionFilter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Constraints on an [`AttentionRecord`]. When both are supplied, both must
/// hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttentionFilter {
    pub attention_type: Option<AttentionType>,
    pub urgency: Option<Urgency>,
}

impl AttentionFilter {
    pub const fn is_empty(&self) -> bool {
        self.attention_type.is_none() && self.urgency.is_none()
    }

    pub fn evaluate(
        &self,
        record: &AttentionRecord,
    ) -> FilterOutcome {
        if let Some(attention_type) = self.attention_type {
            if !record.has_attention_type(attention_type) {
                return FilterOutcome::AttentionTypeMismatch;
            }
        }
        if let Some(urgency) = self.urgency {
            if !record.has_urgency(urgency) {
                return FilterOutcome::UrgencyMismatch;
            }
        }

        FilterOutcome::Pass
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RecordFilter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A filter for one [`RecordFormat`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordFilter {
    Listener(ListenerFilter),
    Attention(AttentionFilter),
}

impl RecordFilter {
    pub const fn format(&self) -> RecordFormat {
        match self {
            RecordFilter::Listener(_) => RecordFormat::Listener,
            RecordFilter::Attention(_) => RecordFormat::Attention,
        }
    }

    /// A filter that matches every record of `format`.
    pub fn pass_all(format: RecordFormat) -> RecordFilter {
        match format {
            RecordFormat::Listener => RecordFilter::Listener(ListenerFilter::default()),
            RecordFormat::Attention => RecordFilter::Attention(AttentionFilter::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RecordFilter::Listener(filter) => filter.is_empty(),
            RecordFilter::Attention(filter) => filter.is_empty(),
        }
    }

    /// Apply this filter to `record`.
    pub fn evaluate(
        &self,
        record: &LogRecord,
    ) -> FilterOutcome {
        match (self, record) {
            (RecordFilter::Listener(filter), LogRecord::Listener(record)) => filter.evaluate(record),
            (RecordFilter::Attention(filter), LogRecord::Attention(record)) => filter.evaluate(record),
            _ => FilterOutcome::FormatMismatch,
        }
    }
}

