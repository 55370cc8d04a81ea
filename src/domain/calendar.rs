use super::store::TaskStore;
use chrono::{Datelike, Duration, NaiveDate};

/// Number of cells in a month grid (6 weeks x 7 days)
pub const GRID_CELLS: usize = 42;

/// Weekday header row, Monday first
pub const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A validated year/month pair (month is 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    #[cfg(test)]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Previous month, wrapping into the previous year after January
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Next month, wrapping into the next year after December
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit valid months
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Header label, e.g. "March 2024"
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

/// One day cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub has_tasks: bool,
}

/// Build the 42-cell, Monday-first grid for a month.
///
/// Covers the trailing days of the previous month, the whole target month and
/// leading days of the next month. Pure: reads the store, mutates nothing.
pub fn build_month_grid(month: CalendarMonth, store: &TaskStore, today: NaiveDate) -> Vec<CalendarCell> {
    let first = month.first_day();
    let lead = first.weekday().num_days_from_monday() as i64;
    let start = first - Duration::days(lead);

    (0..GRID_CELLS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let in_month = month.contains(date);
            CalendarCell {
                date,
                in_month,
                is_today: in_month && date == today,
                has_tasks: store.has_tasks_on(date),
            }
        })
        .collect()
}
