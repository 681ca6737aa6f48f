//! Generate a sample timeline for local development.
//!
//! Reads an existing timeline (JSON array) from stdin, fills in generated
//! days for the requested range, and prints the result to stdout:
//!
//! ```text
//! echo '[]' | gen_events --start 2022-06-27 --days 42 > data/date-events/alice.json
//! ```

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use clap::Parser;
use shared::{DateEvent, Event, Timeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `gen_events` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gen_events",
    about = "Fill a timeline read from stdin with generated sample days",
    version
)]
struct CliArgs {
    /// First generated day (UTC midnight).
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "2022-06-27")]
    start: NaiveDate,
    /// Number of consecutive days to generate.
    #[arg(long, default_value_t = 42)]
    days: u32,
}

/// Sample events for one day, keyed off weekday (Sunday = 0) and day of year.
fn sample_events(date: DateTime<Utc>) -> Vec<Event> {
    let weekday = date.weekday().num_days_from_sunday();
    let day_of_year = date.ordinal();
    let mut events = Vec::new();

    if (2..=4).contains(&weekday) {
        events.push(Event::new("出勤", "commute"));
    }
    if weekday == 1 || weekday == 5 {
        events.push(Event::new("在宅", "remote"));
    }
    if (2..=4).contains(&weekday) && day_of_year % 3 == 2 {
        events.push(Event::new("徒歩", "walking"));
    }
    if day_of_year % 3 == 0 {
        events.push(Event::new("飲酒", "drinking"));
    }
    if day_of_year % 4 == 0 {
        events.push(Event::new("ENG", "energy"));
    }

    events
}

fn is_working_day(date: DateTime<Utc>) -> bool {
    (1..=5).contains(&date.weekday().num_days_from_sunday())
}

/// Existing days first, in input order, then generated days they do not cover.
///
/// Existing days inside the range keep their events; `workingDay` is recomputed.
fn fill(mut timeline: Timeline, start: NaiveDate, days: u32) -> Result<Timeline> {
    let first = start
        .and_hms_opt(0, 0, 0)
        .context("invalid start date")?
        .and_utc();

    for offset in 0..days {
        let date = first
            .checked_add_days(Days::new(u64::from(offset)))
            .context("date range overflows")?;

        match timeline.iter_mut().find(|day| day.date == date) {
            Some(existing) => existing.working_day = is_working_day(date),
            None => timeline.push(DateEvent {
                date,
                events: sample_events(date),
                working_day: is_working_day(date),
            }),
        }
    }

    Ok(timeline)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let existing: Timeline = if input.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&input).context("stdin is not a timeline JSON array")?
    };

    let existing_len = existing.len();
    let timeline = fill(existing, args.start, args.days)?;
    info!(
        existing = existing_len,
        total = timeline.len(),
        start = %args.start,
        days = args.days,
        "Generated timeline"
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &timeline).context("failed to write timeline")?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn kinds(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.event_type.as_str()).collect()
    }

    #[test]
    fn test_sample_events() {
        // Monday, day 178
        assert_eq!(kinds(&sample_events(utc(2022, 6, 27))), vec!["remote"]);
        // Tuesday, day 179: 179 % 3 == 2
        assert_eq!(
            kinds(&sample_events(utc(2022, 6, 28))),
            vec!["commute", "walking"]
        );
        // Wednesday, day 180: divisible by 3 and 4
        assert_eq!(
            kinds(&sample_events(utc(2022, 6, 29))),
            vec!["commute", "drinking", "energy"]
        );
        // Sunday, day 184: divisible by 4
        assert_eq!(kinds(&sample_events(utc(2022, 7, 3))), vec!["energy"]);
    }

    #[test]
    fn test_fill_generates_consecutive_days() {
        let start = NaiveDate::from_ymd_opt(2022, 6, 27).unwrap();
        let timeline = fill(Vec::new(), start, 42).unwrap();

        assert_eq!(timeline.len(), 42);
        assert_eq!(timeline[0].date, utc(2022, 6, 27));
        assert_eq!(timeline[41].date, utc(2022, 8, 7));
        assert!(timeline[0].working_day);
        assert!(!timeline[6].working_day);
    }

    #[test]
    fn test_fill_keeps_existing_events_first() {
        let start = NaiveDate::from_ymd_opt(2022, 6, 27).unwrap();
        let kept = DateEvent {
            date: utc(2022, 6, 28),
            events: vec![Event::new("GS", "geek-seek")],
            working_day: false,
        };
        let outside = DateEvent {
            date: utc(2022, 1, 3),
            events: vec![],
            working_day: true,
        };

        let timeline = fill(vec![kept.clone(), outside.clone()], start, 3).unwrap();

        let dates: Vec<_> = timeline.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![utc(2022, 6, 28), utc(2022, 1, 3), utc(2022, 6, 27), utc(2022, 6, 29)]
        );
        assert_eq!(timeline[0].events, kept.events);
        assert!(timeline[0].working_day);
        assert_eq!(timeline[1], outside);
    }
}
