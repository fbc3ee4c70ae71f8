use crate::utils::time::{resolve_local, DATE_FORMAT};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

/// Seconds from midnight to the inclusive end of the query (23:59:59)
const QUERY_END_SECONDS: i64 = 24 * 60 * 60 - 1;

/// Query range and labels for one target date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayWindow {
    /// Midnight at the start of the day before the target date
    pub query_start: DateTime<FixedOffset>,
    /// 23:59:59 on the target date
    pub query_end: DateTime<FixedOffset>,
    /// Midnight at the start of the target date (`query_start` plus one calendar day)
    pub day_start: DateTime<FixedOffset>,
    pub target_date: NaiveDate,
    /// Target date as `YYYY-MM-DD`
    pub target_date_label: String,
}

/// Compute the query window for `target_date` in `tz`.
///
/// The window reaches back to the start of the previous day so that events
/// which start the evening before and run past midnight are returned by the
/// event source. The end is one second before the next midnight.
pub fn compute_window<Tz: TimeZone>(target_date: NaiveDate, tz: &Tz) -> DisplayWindow {
    let previous_date = target_date.pred_opt().unwrap_or(target_date);
    let target_midnight = target_date.and_time(NaiveTime::MIN);

    DisplayWindow {
        query_start: resolve_local(tz, previous_date.and_time(NaiveTime::MIN)),
        query_end: resolve_local(tz, target_midnight + Duration::seconds(QUERY_END_SECONDS)),
        day_start: resolve_local(tz, target_midnight),
        target_date,
        target_date_label: target_date.format(DATE_FORMAT).to_string(),
    }
}

impl DisplayWindow {
    /// Offset used to pin date-only event bounds to an instant
    pub fn offset(&self) -> FixedOffset {
        *self.day_start.offset()
    }
}
