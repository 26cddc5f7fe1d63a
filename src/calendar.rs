use chrono::{Datelike, NaiveDate};
use itertools::repeat_n;
use serde::Serialize;

use crate::datetime::{self, WeekStart};
use crate::error::{Error, Result};
use crate::events::EventMapping;

pub const DAYS_PER_WEEK: usize = 7;

/// Years that render as four digits.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// One position of a month grid: either padding outside the month or a civil day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub is_blank: bool,
    pub title: String,
    pub content: String,
}

impl DayCell {
    pub fn blank() -> Self {
        DayCell {
            is_blank: true,
            ..Default::default()
        }
    }

    pub fn day(title: String, content: String) -> Self {
        DayCell {
            is_blank: false,
            title,
            content,
        }
    }
}

/// A month laid out in complete weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Month {
    pub name: String,
    pub year: String,
    pub days: Vec<DayCell>,
}

impl Month {
    /// Cells that belong to the month, in calendar order.
    pub fn real_days(&self) -> impl Iterator<Item = &DayCell> {
        self.days.iter().filter(|cell| !cell.is_blank)
    }
}

pub struct CalendarBuilder<'a> {
    year: i32,
    num_months: i32,
    start_month: u32,
    week_start: WeekStart,
    show_day_number: bool,
    events: &'a EventMapping,
}

impl<'a> CalendarBuilder<'a> {
    pub fn new(year: i32, num_months: i32, events: &'a EventMapping) -> Self {
        CalendarBuilder {
            year,
            num_months,
            start_month: 1,
            week_start: WeekStart::default(),
            show_day_number: false,
            events,
        }
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn start_month(mut self, month: u32) -> Self {
        self.start_month = month;
        self
    }

    pub fn show_day_number(mut self, show: bool) -> Self {
        self.show_day_number = show;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_months < 0 {
            return Err(Error::invalid_config(&format!(
                "month count must not be negative, got {}",
                self.num_months
            )));
        }

        if !(1..=12).contains(&self.start_month) {
            return Err(Error::invalid_config(&format!(
                "start month must be between 1 and 12, got {}",
                self.start_month
            )));
        }

        let last_index0 = (self.start_month as i64 - 1 + self.num_months as i64 - 1).max(0);
        let last_year = self.year as i64 + last_index0 / 12;
        if self.year < MIN_YEAR || last_year > MAX_YEAR as i64 {
            return Err(Error::invalid_config(&format!(
                "years must lie between {} and {}, got {}",
                MIN_YEAR, MAX_YEAR, self.year
            )));
        }

        Ok(())
    }

    /// Builds `num_months` consecutive months starting at `start_month` of `year`.
    pub fn generate(&self) -> Result<Vec<Month>> {
        self.validate()?;

        (0..self.num_months as u32)
            .map(|i| {
                let index0 = self.start_month - 1 + i;
                let year = self.year + (index0 / 12) as i32;
                let month = index0 % 12 + 1;
                self.build_month(year, month)
            })
            .collect()
    }

    pub fn build_month(&self, year: i32, month: u32) -> Result<Month> {
        let invalid = || Error::invalid_config(&format!("no such month {}-{:02}", year, month));

        let num_days = datetime::days_of_month(year, month).ok_or_else(invalid)?;
        let name = datetime::month_name(month).ok_or_else(invalid)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = NaiveDate::from_ymd_opt(year, month, num_days).ok_or_else(invalid)?;

        let leading = (self.week_start.offset(first.weekday()) % 7) as usize;
        let trailing = ((6 - self.week_start.offset(last.weekday())) % 7) as usize;
        let num_days = num_days as usize;

        debug_assert_eq!(
            (leading + num_days + trailing) % DAYS_PER_WEEK,
            0,
            "{}-{:02} does not fill complete weeks",
            year,
            month
        );

        let mut days = Vec::with_capacity(leading + num_days + trailing);
        days.extend(repeat_n(DayCell::blank(), leading));
        days.extend((1..=num_days).map(|day| self.day_cell(year, month, day)));
        days.extend(repeat_n(DayCell::blank(), trailing));

        log::debug!(
            "{} {}: {} leading, {} days, {} trailing",
            name,
            year,
            leading,
            num_days,
            trailing
        );

        Ok(Month {
            name: name.to_owned(),
            year: format!("{:04}", year),
            days,
        })
    }

    fn day_cell(&self, year: i32, month: u32, day: usize) -> DayCell {
        let key = format!("{:04}-{:02}-{:02}", year, month, day);
        let content = self.events.content(&key).unwrap_or_default().to_owned();
        let title = if self.show_day_number {
            day.to_string()
        } else {
            String::new()
        };

        DayCell::day(title, content)
    }
}
