use super::window::DisplayWindow;
use crate::components::google_calendar::models::{CalendarEvent, EventTime};
use crate::utils::time::{resolve_local, DATE_FORMAT};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use tracing::debug;

/// An event's start and end pinned to instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveSpan {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Instant used for bounds that fail to parse
pub fn epoch() -> DateTime<FixedOffset> {
    DateTime::<Utc>::default().fixed_offset()
}

/// Resolve one bound of an event.
///
/// `dateTime` wins when present; otherwise `date` is read as midnight at
/// `offset`. Anything unparsable becomes [`epoch`].
pub fn effective_time(time: &EventTime, offset: &FixedOffset) -> DateTime<FixedOffset> {
    if let Some(date_time) = time.date_time() {
        return DateTime::parse_from_rfc3339(date_time).unwrap_or_else(|e| {
            debug!("Unparsable dateTime {:?}: {}", date_time, e);
            epoch()
        });
    }

    match time.date() {
        Some(date) => match NaiveDate::parse_from_str(date, DATE_FORMAT) {
            Ok(date) => resolve_local(offset, date.and_time(NaiveTime::MIN)),
            Err(e) => {
                debug!("Unparsable date {:?}: {}", date, e);
                epoch()
            }
        },
        None => {
            debug!("Event bound has neither dateTime nor date");
            epoch()
        }
    }
}

/// Resolve both bounds of an event against the window's offset
pub fn effective_span(event: &CalendarEvent, window: &DisplayWindow) -> EffectiveSpan {
    let offset = window.offset();
    EffectiveSpan {
        start: effective_time(&event.start, &offset),
        end: effective_time(&event.end, &offset),
    }
}

/// Decide whether an event belongs to the window's agenda.
///
/// An event is shown when it ends on the target date (in its own offset), or
/// when it starts before the end of the query and ends after the target day
/// has begun.
pub fn is_included(span: &EffectiveSpan, window: &DisplayWindow) -> bool {
    let ends_on_target = span.end.date_naive() == window.target_date;
    let spans_into_target = span.start < window.query_end && span.end > window.day_start;
    ends_on_target || spans_into_target
}

/// Events of the agenda, in source order, with their resolved spans
pub fn select_events<'a>(
    events: &'a [CalendarEvent],
    window: &DisplayWindow,
) -> Vec<(&'a CalendarEvent, EffectiveSpan)> {
    events
        .iter()
        .filter_map(|event| {
            let span = effective_span(event, window);
            if is_included(&span, window) {
                Some((event, span))
            } else {
                debug!("Skipping {:?}, outside {}", event.summary, window.target_date_label);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agenda::window::compute_window;
    use chrono_tz::Asia::Tokyo;

    fn window(y: i32, m: u32, d: u32) -> DisplayWindow {
        compute_window(NaiveDate::from_ymd_opt(y, m, d).unwrap(), &Tokyo)
    }

    fn included(event: &CalendarEvent, window: &DisplayWindow) -> bool {
        is_included(&effective_span(event, window), window)
    }

    #[test]
    fn test_effective_time_prefers_date_time() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let time = EventTime {
            date_time: Some("2024-03-10T09:00:00-05:00".to_string()),
            date: Some("2024-01-01".to_string()),
            time_zone: None,
        };
        // The event's own offset is kept
        assert_eq!(effective_time(&time, &offset).to_rfc3339(), "2024-03-10T09:00:00-05:00");
    }

    #[test]
    fn test_effective_time_date_only_is_midnight() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let time = EventTime::all_day("2024-03-10");
        assert_eq!(effective_time(&time, &offset).to_rfc3339(), "2024-03-10T00:00:00+09:00");
    }

    #[test]
    fn test_effective_time_falls_back_to_epoch() {
        let offset = FixedOffset::east_opt(0).unwrap();
        assert_eq!(effective_time(&EventTime::timed("not a time"), &offset), epoch());
        assert_eq!(effective_time(&EventTime::all_day("2024-13-01"), &offset), epoch());
        assert_eq!(effective_time(&EventTime::default(), &offset), epoch());
        assert_eq!(epoch().timestamp(), 0);
    }

    #[test]
    fn test_event_on_target_day() {
        let event = CalendarEvent::timed(
            "Standup",
            "2024-03-10T09:00:00+09:00",
            "2024-03-10T09:30:00+09:00",
        );
        assert!(included(&event, &window(2024, 3, 10)));
        assert!(!included(&event, &window(2024, 3, 9)));
        assert!(!included(&event, &window(2024, 3, 11)));
    }

    #[test]
    fn test_all_day_event_on_target_day() {
        let event = CalendarEvent::all_day("Trip", "2024-03-10", "2024-03-11");
        assert!(included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_all_day_event_ending_on_target_day() {
        // Date-only ends are exclusive, but the end date still matches
        let event = CalendarEvent::all_day("Holiday", "2024-03-09", "2024-03-10");
        assert!(included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_multi_day_all_day_event() {
        let event = CalendarEvent::all_day("Conference", "2024-03-08", "2024-03-12");
        assert!(included(&event, &window(2024, 3, 10)));
        assert!(!included(&event, &window(2024, 3, 13)));
    }

    #[test]
    fn test_overnight_event() {
        let event = CalendarEvent::timed(
            "Night shift",
            "2024-03-09T22:00:00+09:00",
            "2024-03-10T01:00:00+09:00",
        );
        assert!(included(&event, &window(2024, 3, 10)));
        assert!(!included(&event, &window(2024, 3, 8)));
    }

    #[test]
    fn test_previous_day_event_is_excluded() {
        let event = CalendarEvent::timed(
            "Dinner",
            "2024-03-09T19:00:00+09:00",
            "2024-03-09T21:00:00+09:00",
        );
        assert!(!included(&event, &window(2024, 3, 10)));

        let event = CalendarEvent::timed(
            "Old",
            "2024-03-08T10:00:00+09:00",
            "2024-03-08T11:00:00+09:00",
        );
        assert!(!included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_event_ending_at_midnight() {
        // Ends at the target day's midnight in its own offset: the end date matches
        let event = CalendarEvent::timed(
            "Late",
            "2024-03-09T23:00:00+09:00",
            "2024-03-10T00:00:00+09:00",
        );
        assert!(included(&event, &window(2024, 3, 10)));

        // Same instant written in UTC: the end date is the day before and the
        // overlap check is strict
        let event = CalendarEvent::timed(
            "Late UTC",
            "2024-03-09T14:00:00Z",
            "2024-03-09T15:00:00Z",
        );
        assert!(!included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_start_before_query_end_is_included() {
        let event = CalendarEvent::timed(
            "Late start",
            "2024-03-10T23:59:30+09:00",
            "2024-03-11T00:30:00+09:00",
        );
        assert!(included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_start_at_query_end_is_excluded() {
        // The query ends at 23:59:59 and the comparison is strict
        let event = CalendarEvent::timed(
            "Too late",
            "2024-03-10T23:59:59+09:00",
            "2024-03-11T00:30:00+09:00",
        );
        assert!(!included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_end_date_uses_event_offset() {
        // 2024-03-10 20:00 in New York is already 2024-03-11 in Tokyo
        let event = CalendarEvent::timed(
            "Call",
            "2024-03-10T19:00:00-04:00",
            "2024-03-10T20:00:00-04:00",
        );
        let target = window(2024, 3, 10);
        let span = effective_span(&event, &target);
        assert_eq!(span.end.date_naive(), target.target_date);
        assert!(is_included(&span, &target));
    }

    #[test]
    fn test_malformed_event_does_not_panic() {
        let event = CalendarEvent::timed("Broken", "garbage", "garbage");
        assert!(!included(&event, &window(2024, 3, 10)));

        // Start unparsable, end fine: still shown because it ends on the day
        let event = CalendarEvent::timed("Half", "garbage", "2024-03-10T10:00:00+09:00");
        assert!(included(&event, &window(2024, 3, 10)));
    }

    #[test]
    fn test_select_events_keeps_source_order() {
        let events = vec![
            CalendarEvent::timed("B", "2024-03-10T12:00:00+09:00", "2024-03-10T13:00:00+09:00"),
            CalendarEvent::timed("skip", "2024-03-08T12:00:00+09:00", "2024-03-08T13:00:00+09:00"),
            CalendarEvent::timed("A", "2024-03-10T08:00:00+09:00", "2024-03-10T09:00:00+09:00"),
        ];
        let selected = select_events(&events, &window(2024, 3, 10));
        let names: Vec<&str> = selected.iter().map(|(e, _)| e.summary.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
