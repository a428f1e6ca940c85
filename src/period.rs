use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};

/// half-open date interval [from, to)
///
/// Periods built through [`Period::new`] are never empty. A loan's remaining
/// period can become empty (`from == to`) once payments reach its end date;
/// an empty period yields no monthly sub-intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = CalculatorError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        if raw.from > raw.to {
            return Err(CalculatorError::InvalidPeriod {
                from: raw.from,
                to: raw.to,
            });
        }
        Ok(Self {
            from: raw.from,
            to: raw.to,
        })
    }
}

impl Period {
    /// create a period, requires `from < to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from >= to {
            return Err(CalculatorError::InvalidPeriod { from, to });
        }
        Ok(Self { from, to })
    }

    /// period of `months` calendar months starting at `start`
    ///
    /// The end is reached one month at a time, the same way [`Period::each`]
    /// steps, so the period splits into exactly `months` sub-intervals.
    pub fn months_from(start: NaiveDate, months: u32) -> Result<Self> {
        if months == 0 {
            return Err(CalculatorError::InvalidPeriodCount { count: months });
        }
        let mut end = start;
        for _ in 0..months {
            end = add_months(end, 1)?;
        }
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.from
    }

    pub fn end(&self) -> NaiveDate {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// number of monthly sub-intervals
    pub fn month_count(&self) -> u32 {
        self.each().count() as u32
    }

    /// same end date, starting at `date`; clamped to an empty period when
    /// `date` is at or past the end
    pub fn remaining_from(&self, date: NaiveDate) -> Self {
        Self {
            from: date.min(self.to),
            to: self.to,
        }
    }

    /// lazy monthly sub-intervals, restartable since the period is untouched
    pub fn each(&self) -> MonthlyIntervals {
        MonthlyIntervals {
            cursor: self.from,
            end: self.to,
        }
    }
}

impl<'a> IntoIterator for &'a Period {
    type Item = Period;
    type IntoIter = MonthlyIntervals;

    fn into_iter(self) -> MonthlyIntervals {
        self.each()
    }
}

/// iterator over consecutive one-month sub-intervals of a period
///
/// Each sub-interval ends one calendar month after it starts and the next
/// one starts where it ended, so restarting from any sub-interval boundary
/// reproduces the remaining sub-intervals. Iteration continues while a
/// sub-interval starts before the period end, so the final sub-interval may
/// end after it.
#[derive(Debug, Clone)]
pub struct MonthlyIntervals {
    cursor: NaiveDate,
    end: NaiveDate,
}

impl Iterator for MonthlyIntervals {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        let from = self.cursor;
        if from >= self.end {
            return None;
        }
        let to = from.checked_add_months(Months::new(1))?;
        self.cursor = to;
        Some(Period { from, to })
    }
}

/// add calendar months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| CalculatorError::InvalidDate {
            message: format!("{} + {} months is out of range", date, months),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_or_empty_period() {
        assert!(Period::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        assert!(Period::new(date(2024, 1, 1), date(2024, 1, 1)).is_err());
        assert!(Period::months_from(date(2024, 1, 1), 0).is_err());
    }

    #[test]
    fn test_whole_year_splits_into_twelve_months() {
        let period = Period::months_from(date(2024, 1, 1), 12).unwrap();
        let months: Vec<Period> = period.each().collect();

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].start(), date(2024, 1, 1));
        assert_eq!(months[0].end(), date(2024, 2, 1));
        assert_eq!((months[1].end() - months[1].start()).num_days(), 29); // leap february
        assert_eq!(months[11].end(), date(2025, 1, 1));

        // contiguous
        for pair in months.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn test_month_end_clamping() {
        let period = Period::months_from(date(2024, 1, 31), 3).unwrap();
        let months: Vec<Period> = period.each().collect();

        assert_eq!(months.len(), 3);
        assert_eq!(months[0].end(), date(2024, 2, 29));
        assert_eq!(months[1].start(), date(2024, 2, 29));
        assert_eq!(months[1].end(), date(2024, 3, 29));
        assert_eq!(months[2].end(), date(2024, 4, 29));
        assert_eq!(period.end(), date(2024, 4, 29));

        let non_leap = Period::months_from(date(2023, 1, 31), 1).unwrap();
        assert_eq!(non_leap.end(), date(2023, 2, 28));
    }

    #[test]
    fn test_restart_at_boundary_matches_tail() {
        let period = Period::months_from(date(2023, 8, 31), 12).unwrap();
        let months: Vec<Period> = period.each().collect();
        assert_eq!(months.len(), 12);

        for (i, boundary) in months.iter().enumerate() {
            let rest: Vec<Period> = period.remaining_from(boundary.end()).each().collect();
            assert_eq!(rest.as_slice(), &months[i + 1..]);
        }
    }

    #[test]
    fn test_partial_final_month_extends_past_end() {
        let period = Period::new(date(2024, 1, 1), date(2024, 3, 15)).unwrap();
        let months: Vec<Period> = period.each().collect();

        assert_eq!(months.len(), 3);
        assert_eq!(months[2].start(), date(2024, 3, 1));
        assert_eq!(months[2].end(), date(2024, 4, 1));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let period = Period::months_from(date(2024, 5, 10), 6).unwrap();
        let first: Vec<Period> = period.each().collect();
        let second: Vec<Period> = (&period).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(period.month_count(), 6);
    }

    #[test]
    fn test_remaining_from_clamps_to_end() {
        let period = Period::months_from(date(2024, 1, 1), 12).unwrap();

        let rest = period.remaining_from(date(2024, 7, 1));
        assert_eq!(rest.start(), date(2024, 7, 1));
        assert_eq!(rest.month_count(), 6);

        let done = period.remaining_from(date(2025, 2, 1));
        assert!(done.is_empty());
        assert_eq!(done.each().count(), 0);
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let ok: Period = serde_json::from_str(r#"{"from":"2024-01-01","to":"2024-06-01"}"#).unwrap();
        assert_eq!(ok.month_count(), 5);

        let bad = serde_json::from_str::<Period>(r#"{"from":"2024-06-01","to":"2024-01-01"}"#);
        assert!(bad.is_err());
    }
}
