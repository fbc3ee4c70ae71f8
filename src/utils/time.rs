use crate::error::{AgendaResult, Error};
use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Date format accepted on the command line and used for agenda labels
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, falling back to `today` when no date was given
pub fn parse_target_date(date_str: Option<&str>, today: NaiveDate) -> AgendaResult<NaiveDate> {
    match date_str.map(str::trim) {
        None | Some("") => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|e| Error::InvalidDate(format!("{:?}: {}", s, e))),
    }
}

/// Pin a wall-clock time to an instant in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times that fall
/// into a DST gap move forward to the first wall-clock time that exists.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<FixedOffset> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.fixed_offset(),
        LocalResult::Ambiguous(earliest, _) => earliest.fixed_offset(),
        LocalResult::None => {
            let mut probe = naive;
            // No zone has a gap longer than a day
            for _ in 0..(24 * 4) {
                probe += Duration::minutes(15);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt.fixed_offset();
                }
            }
            tz.from_utc_datetime(&naive).fixed_offset()
        }
    }
}
