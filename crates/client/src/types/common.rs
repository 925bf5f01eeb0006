//! Shared display types: pages of results, reporting periods and date ranges.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matching records across all pages.
    pub count: u64,
    pub current_page: u32,
    pub num_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// A single page holding every item (for endpoints that do not paginate).
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Self {
            items,
            count,
            current_page: 1,
            num_pages: 1,
            has_next: false,
            has_previous: false,
        }
    }

    /// Map every item, keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            current_page: self.current_page,
            num_pages: self.num_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }

    /// Fallible [`Page::map`]; the first error aborts the whole page.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            count: self.count,
            current_page: self.current_page,
            num_pages: self.num_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        })
    }
}

/// Reporting window used by dashboard and analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Today,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl ReportPeriod {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Parse a period name. Unknown names fall back to `Month`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Self::Today,
            "week" => Self::Week,
            "quarter" => Self::Quarter,
            "year" => Self::Year,
            _ => Self::Month,
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity of a sales trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendGranularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TrendGranularity {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Calendar range containing `today` for the given period.
    ///
    /// Weeks run Sunday to Saturday.
    #[must_use]
    pub fn for_period(period: ReportPeriod, today: NaiveDate) -> Self {
        match period {
            ReportPeriod::Today => Self {
                start: today,
                end: today,
            },
            ReportPeriod::Week => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let start = today - Days::new(back);
                Self {
                    start,
                    end: start + Days::new(6),
                }
            }
            ReportPeriod::Month => Self::current_month(today),
            ReportPeriod::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                let start = first_of_month(today.year(), first_month).unwrap_or(today);
                Self {
                    start,
                    end: last_day_after(start, 3).unwrap_or(today),
                }
            }
            ReportPeriod::Year => {
                let start = first_of_month(today.year(), 1).unwrap_or(today);
                Self {
                    start,
                    end: last_day_after(start, 12).unwrap_or(today),
                }
            }
        }
    }

    /// First to last day of the month containing `today`.
    #[must_use]
    pub fn current_month(today: NaiveDate) -> Self {
        let start = first_of_month(today.year(), today.month()).unwrap_or(today);
        Self {
            start,
            end: last_day_after(start, 1).unwrap_or(today),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Day before `start + months`.
fn last_day_after(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))?.pred_opt()
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline yields 100 when there is any growth and 0 otherwise.
#[must_use]
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) / previous * 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2024-03-13 is a Wednesday
        let range = DateRange::for_period(ReportPeriod::Week, date(2024, 3, 13));
        assert_eq!(range.start, date(2024, 3, 10));
        assert_eq!(range.end, date(2024, 3, 16));
    }

    #[test]
    fn test_month_handles_leap_february() {
        let range = DateRange::for_period(ReportPeriod::Month, date(2024, 2, 10));
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
    }

    #[test]
    fn test_quarter_and_year() {
        let q = DateRange::for_period(ReportPeriod::Quarter, date(2024, 8, 20));
        assert_eq!((q.start, q.end), (date(2024, 7, 1), date(2024, 9, 30)));

        let y = DateRange::for_period(ReportPeriod::Year, date(2024, 8, 20));
        assert_eq!((y.start, y.end), (date(2024, 1, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_today() {
        let d = date(2024, 12, 31);
        let range = DateRange::for_period(ReportPeriod::Today, d);
        assert_eq!((range.start, range.end), (d, d));
    }

    #[test]
    fn test_period_parse_falls_back_to_month() {
        assert_eq!(ReportPeriod::parse_lenient("WEEK"), ReportPeriod::Week);
        assert_eq!(ReportPeriod::parse_lenient("fortnight"), ReportPeriod::Month);
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(150.0, 100.0), 50.0);
        assert_eq!(percentage_change(5.0, 0.0), 100.0);
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
        assert_eq!(percentage_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn test_page_try_map() {
        let page = Page::single(vec!["1", "2"]);
        let mapped = page.clone().try_map(str::parse::<u8>).unwrap();
        assert_eq!(mapped.items, vec![1, 2]);
        assert_eq!(mapped.count, 2);
        assert!(Page::single(vec!["x"]).try_map(str::parse::<u8>).is_err());
    }
}
