//! Visible-window selection and merging over a user's timeline.
//!
//! A boundary splits the timeline in two: entries strictly before it are
//! frozen history, entries on or after it form the window the client
//! displays and re-submits wholesale.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{DateEvent, Timeline};

/// Entries dated on or after `boundary`, in stored order.
pub fn select<Tz: TimeZone>(timeline: Timeline, boundary: &DateTime<Tz>) -> Vec<DateEvent> {
    let boundary = boundary.with_timezone(&Utc);
    timeline
        .into_iter()
        .filter(|day| day.date >= boundary)
        .collect()
}

/// Frozen history of `existing` followed by every `incoming` entry.
///
/// `incoming` is appended verbatim, including entries dated before the
/// boundary.
pub fn merge<Tz: TimeZone>(
    existing: Timeline,
    boundary: &DateTime<Tz>,
    incoming: Vec<DateEvent>,
) -> Timeline {
    let boundary = boundary.with_timezone(&Utc);
    let mut merged: Timeline = existing
        .into_iter()
        .filter(|day| day.date < boundary)
        .collect();
    merged.extend(incoming);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::month::month_boundary;

    fn day(y: i32, m: u32, d: u32, events: &[(&str, &str)]) -> DateEvent {
        DateEvent {
            date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            events: events.iter().map(|(n, t)| Event::new(*n, *t)).collect(),
            working_day: true,
        }
    }

    fn sample() -> Timeline {
        vec![
            day(2022, 6, 20, &[("出勤", "commute")]),
            day(2022, 6, 24, &[("在宅", "remote")]),
            day(2022, 6, 27, &[("出勤", "commute"), ("徒歩", "walking")]),
            day(2022, 6, 28, &[]),
            day(2022, 7, 1, &[("飲酒", "drinking")]),
        ]
    }

    #[test]
    fn test_select_keeps_window_in_order() {
        let boundary = month_boundary("2022-7").unwrap();
        let window = select(sample(), &boundary);
        let dates: Vec<_> = window.iter().map(|d| d.date.format("%m-%d").to_string()).collect();
        assert_eq!(dates, vec!["06-27", "06-28", "07-01"]);
    }

    #[test]
    fn test_select_uses_jst_boundary() {
        // 2022-06-26T15:00:00Z is midnight on the 27th in UTC+9
        let boundary = month_boundary("2022-7").unwrap();
        let edge = DateEvent {
            date: Utc.with_ymd_and_hms(2022, 6, 26, 15, 0, 0).unwrap(),
            events: vec![],
            working_day: false,
        };
        let before = DateEvent {
            date: Utc.with_ymd_and_hms(2022, 6, 26, 14, 59, 59).unwrap(),
            ..edge.clone()
        };

        let window = select(vec![before, edge.clone()], &boundary);
        assert_eq!(window, vec![edge]);
    }

    #[test]
    fn test_select_and_frozen_partition_reconstruct_timeline() {
        let timeline = sample();
        for selector in ["2022-6", "2022-7", "2022-8"] {
            let boundary = month_boundary(selector).unwrap();
            let utc = boundary.with_timezone(&Utc);
            let frozen: Vec<_> = timeline.iter().filter(|d| d.date < utc).cloned().collect();
            let window = select(timeline.clone(), &boundary);

            let mut rebuilt = frozen;
            rebuilt.extend(window);
            assert_eq!(rebuilt, timeline, "{}", selector);
        }
    }

    #[test]
    fn test_merge_replaces_window_and_keeps_history() {
        let boundary = month_boundary("2022-7").unwrap();
        let existing = vec![
            day(2022, 6, 20, &[("出勤", "commute")]),
            day(2022, 6, 28, &[("在宅", "remote")]),
        ];
        let incoming = vec![day(2022, 6, 28, &[("出勤", "commute"), ("GS", "geek-seek")])];

        let merged = merge(existing.clone(), &boundary, incoming.clone());

        assert_eq!(merged, vec![existing[0].clone(), incoming[0].clone()]);
    }

    #[test]
    fn test_merge_then_select_returns_incoming() {
        let boundary = month_boundary("2022-7").unwrap();
        let incoming = vec![
            day(2022, 6, 27, &[("在宅", "remote")]),
            day(2022, 7, 4, &[]),
            day(2022, 7, 2, &[("ENG", "energy")]),
        ];

        let merged = merge(sample(), &boundary, incoming.clone());

        assert_eq!(select(merged, &boundary), incoming);
    }

    #[test]
    fn test_merge_never_touches_frozen_history() {
        let boundary = month_boundary("2022-7").unwrap();
        let frozen = vec![sample()[0].clone(), sample()[1].clone()];

        for incoming in [
            vec![],
            vec![day(2022, 6, 20, &[("overwrite", "remote")])],
            sample(),
        ] {
            let merged = merge(sample(), &boundary, incoming);
            assert_eq!(&merged[..2], frozen.as_slice());
        }
    }

    #[test]
    fn test_merge_appends_back_dated_entries_as_is() {
        let boundary = month_boundary("2022-7").unwrap();
        let back_dated = day(2022, 5, 2, &[("出勤", "commute")]);

        let merged = merge(sample(), &boundary, vec![back_dated.clone()]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2], back_dated);
        assert!(merged[2].date < merged[1].date);
    }

    #[test]
    fn test_merge_into_empty_timeline() {
        let boundary = month_boundary("2022-7").unwrap();
        let incoming = vec![day(2022, 7, 1, &[])];
        assert_eq!(merge(Vec::new(), &boundary, incoming.clone()), incoming);
    }
}
