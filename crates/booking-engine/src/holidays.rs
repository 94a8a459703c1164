//! Holiday tables.
//!
//! Holidays are configuration data: loaded once, never mutated while serving
//! requests. A date present here is bookable even when it falls on a weekday.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::temporal::find_nth_weekday_in_month;

/// A single named holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// An ordered, de-duplicated set of holidays keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = Holiday>) -> Self {
        let mut calendar = Self::default();
        calendar.extend(holidays);
        calendar
    }

    /// US federal holidays observed on their actual dates for `year`.
    ///
    /// Fixed-date holidays are listed on the calendar date itself, not the
    /// Friday/Monday a federal office would observe them on.
    pub fn us_federal(year: i32) -> Self {
        let fixed = [
            (1, 1, "New Year's Day"),
            (6, 19, "Juneteenth"),
            (7, 4, "Independence Day"),
            (11, 11, "Veterans Day"),
            (12, 25, "Christmas Day"),
        ];
        let floating = [
            (1, Weekday::Mon, 3, "Martin Luther King Jr. Day"),
            (2, Weekday::Mon, 3, "Presidents' Day"),
            (5, Weekday::Mon, -1, "Memorial Day"),
            (9, Weekday::Mon, 1, "Labor Day"),
            (10, Weekday::Mon, 2, "Columbus Day"),
            (11, Weekday::Thu, 4, "Thanksgiving Day"),
        ];

        let fixed = fixed.into_iter().filter_map(|(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| Holiday {
                date,
                name: name.to_string(),
            })
        });
        let floating = floating
            .into_iter()
            .filter_map(|(month, weekday, ordinal, name)| {
                find_nth_weekday_in_month(year, month, weekday, ordinal).map(|date| Holiday {
                    date,
                    name: name.to_string(),
                })
            });

        Self::new(fixed.chain(floating))
    }

    /// Later entries win when two holidays share a date.
    pub fn extend(&mut self, holidays: impl IntoIterator<Item = Holiday>) {
        for holiday in holidays {
            self.days.insert(holiday.date, holiday.name);
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn name_of(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Holidays in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = Holiday> + '_ {
        self.days.iter().map(|(date, name)| Holiday {
            date: *date,
            name: name.clone(),
        })
    }
}

impl<'de> Deserialize<'de> for HolidayCalendar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Holiday>::deserialize(deserializer).map(HolidayCalendar::new)
    }
}

impl Serialize for HolidayCalendar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
