//! Year-month selectors and the week-aligned boundary they map to.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeZone};

use crate::{Error, Result};

/// Calendar offset used for every boundary (JST).
const OFFSET_SECONDS: i32 = 9 * 3600;

/// A parsed `YYYY-M` / `YYYY-MM` selector.
///
/// The month is kept as given; values outside 1..=12 roll into the
/// neighbouring years when the boundary is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i64,
    pub month: i64,
}

/// Parse a `currentMonth` selector.
pub fn parse_year_month(selector: &str) -> Result<YearMonth> {
    let parts: Vec<&str> = selector.split('-').collect();
    let [year, month] = parts.as_slice() else {
        return Err(Error::InvalidInput(format!(
            "currentMonth must look like YYYY-MM, got {:?}",
            selector
        )));
    };

    let parse = |part: &str| {
        part.parse::<i64>().map_err(|_| {
            Error::InvalidInput(format!(
                "currentMonth must look like YYYY-MM, got {:?}",
                selector
            ))
        })
    };

    Ok(YearMonth {
        year: parse(*year)?,
        month: parse(*month)?,
    })
}

impl YearMonth {
    /// Midnight UTC+9 on the Monday on or before the 1st of this month.
    pub fn boundary(&self) -> Result<DateTime<FixedOffset>> {
        let out_of_range = || Error::InvalidInput(format!("{:?} is out of range", self));

        // Normalise like calendar arithmetic does: month 13 is next January.
        let months = self
            .year
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.month))
            .and_then(|m| m.checked_sub(1))
            .ok_or_else(out_of_range)?;
        let year = i32::try_from(months.div_euclid(12)).map_err(|_| out_of_range())?;
        let month = (months.rem_euclid(12) + 1) as u32;

        let offset = FixedOffset::east_opt(OFFSET_SECONDS).ok_or_else(out_of_range)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|d| offset.from_local_datetime(&d).single())
            .ok_or_else(out_of_range)?;

        let back = u64::from(first.weekday().num_days_from_monday());
        first.checked_sub_days(Days::new(back)).ok_or_else(out_of_range)
    }
}

/// Parse a selector and compute its boundary in one step.
pub fn month_boundary(selector: &str) -> Result<DateTime<FixedOffset>> {
    parse_year_month(selector)?.boundary()
}
