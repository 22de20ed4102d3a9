//! Month grid for the calendar view.
//!
//! A grid always has 42 cells (6 weeks × 7 days) and starts on the Monday on
//! or before the 1st of the month, so leading and trailing cells belong to the
//! neighbouring months.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::constants::GRID_CELLS;
use crate::error::{ScheduleError, ScheduleResult};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> ScheduleResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ScheduleError::Validation(format!(
                "Invalid month {}-{:02}",
                year, month
            )));
        }
        Ok(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> ScheduleResult<Self> {
        let invalid = || ScheduleError::Validation(format!("Invalid month '{}'. Expected YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        YearMonth::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated in constructor")
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            YearMonth { year: self.year + 1, month: 1 }
        } else {
            YearMonth { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            YearMonth { year: self.year - 1, month: 12 }
        } else {
            YearMonth { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// One day slot in the month grid. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_other_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_events: bool,
}

/// Build the 42 cells for `month`.
pub fn build_grid<F>(
    month: YearMonth,
    today: NaiveDate,
    selected: NaiveDate,
    has_events: F,
) -> Vec<CalendarCell>
where
    F: Fn(NaiveDate) -> bool,
{
    let first = month.first_day();
    let start = first - Duration::days(first.weekday().num_days_from_monday() as i64);

    start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| CalendarCell {
            date,
            is_other_month: !month.contains(date),
            is_today: date == today,
            is_selected: date == selected,
            has_events: has_events(date),
        })
        .collect()
}

/// Split a grid into week rows.
pub fn weeks(cells: &[CalendarCell]) -> impl Iterator<Item = &[CalendarCell]> {
    cells.chunks(7)
}

/// Navigation state: which month is shown and which day is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    month: YearMonth,
    selected: NaiveDate,
}

impl CalendarView {
    /// Today's month with today selected.
    pub fn new(today: NaiveDate) -> Self {
        CalendarView {
            month: YearMonth::of(today),
            selected: today,
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
    }

    pub fn prev_month(&mut self) {
        self.month = self.month.prev();
    }

    /// Jump to a month without changing the selection.
    pub fn show(&mut self, month: YearMonth) {
        self.month = month;
    }

    /// Select a day of the shown month. Days that belong to a neighbouring
    /// month are rejected and leave the selection unchanged.
    pub fn select(&mut self, date: NaiveDate) -> bool {
        if !self.month.contains(date) {
            return false;
        }
        self.selected = date;
        true
    }

    pub fn grid<F>(&self, today: NaiveDate, has_events: F) -> Vec<CalendarCell>
    where
        F: Fn(NaiveDate) -> bool,
    {
        build_grid(self.month, today, self.selected, has_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_always_has_42_cells_starting_monday() {
        for year in [1999, 2023, 2024, 2025] {
            for month in 1..=12 {
                let ym = YearMonth::new(year, month).unwrap();
                let cells = build_grid(ym, date(2024, 3, 10), date(2024, 3, 10), |_| false);

                assert_eq!(cells.len(), 42, "{}", ym);
                assert_eq!(cells[0].date.weekday(), Weekday::Mon, "{}", ym);
                assert!(cells[0].date <= ym.first_day());
                assert!(ym.first_day() - cells[0].date < Duration::days(7));
            }
        }
    }

    #[test]
    fn test_month_starting_on_sunday_backs_up_six_days() {
        // 2024-09-01 is a Sunday
        let cells = build_grid(
            YearMonth::new(2024, 9).unwrap(),
            date(2024, 9, 1),
            date(2024, 9, 1),
            |_| false,
        );
        assert_eq!(cells[0].date, date(2024, 8, 26));
        assert!(cells[0].is_other_month);
        assert_eq!(cells[6].date, date(2024, 9, 1));
        assert!(!cells[6].is_other_month);
    }

    #[test]
    fn test_month_starting_on_monday_has_no_leading_days() {
        // 2024-01-01 is a Monday
        let cells = build_grid(
            YearMonth::new(2024, 1).unwrap(),
            date(2024, 1, 15),
            date(2024, 1, 15),
            |_| false,
        );
        assert_eq!(cells[0].date, date(2024, 1, 1));
        assert_eq!(cells[41].date, date(2024, 2, 11));
        assert!(cells[41].is_other_month);
    }

    #[test]
    fn test_cell_flags() {
        let today = date(2024, 3, 12);
        let selected = date(2024, 3, 10);
        let cells = build_grid(YearMonth::new(2024, 3).unwrap(), today, selected, |d| {
            d == date(2024, 3, 10) || d == date(2024, 4, 1)
        });

        let find = |d: NaiveDate| cells.iter().find(|c| c.date == d).unwrap();

        assert!(find(today).is_today);
        assert!(!find(today).is_selected);
        assert!(find(selected).is_selected);
        assert!(find(selected).has_events);
        assert!(find(date(2024, 4, 1)).has_events);
        assert!(find(date(2024, 4, 1)).is_other_month);
        assert_eq!(cells.iter().filter(|c| c.is_today).count(), 1);
        assert_eq!(cells.iter().filter(|c| c.is_selected).count(), 1);
    }

    #[test]
    fn test_navigation_rolls_over_years() {
        let mut view = CalendarView::new(date(2024, 12, 31));
        view.next_month();
        assert_eq!(view.month(), YearMonth::new(2025, 1).unwrap());

        view.prev_month();
        view.prev_month();
        assert_eq!(view.month(), YearMonth::new(2024, 11).unwrap());

        let mut view = CalendarView::new(date(2024, 1, 5));
        view.prev_month();
        assert_eq!(view.month(), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn test_selecting_other_month_day_is_rejected() {
        let mut view = CalendarView::new(date(2024, 3, 10));

        assert!(!view.select(date(2024, 2, 26)));
        assert_eq!(view.selected(), date(2024, 3, 10));

        assert!(view.select(date(2024, 3, 20)));
        assert_eq!(view.selected(), date(2024, 3, 20));
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(YearMonth::parse("2024-03").unwrap().to_string(), "2024-03");
        assert!(YearMonth::parse("2024-13").is_err());
        assert!(YearMonth::parse("March").is_err());
    }

    #[test]
    fn test_weeks_chunks_grid_into_six_rows() {
        let cells = build_grid(YearMonth::new(2024, 3).unwrap(), date(2024, 3, 1), date(2024, 3, 1), |_| false);
        let rows: Vec<_> = weeks(&cells).collect();

        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.len() == 7 && r[0].date.weekday() == Weekday::Mon));
    }
}
