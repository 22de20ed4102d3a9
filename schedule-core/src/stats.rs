//! Dashboard statistics derived from a user's events.
//!
//! Nothing here is cached: every call rescans the whole collection.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::WEEK_WINDOW_DAYS;
use crate::event::Event;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    /// Events dated within the last 7 days, today included.
    pub week: usize,
    /// Events dated from the 1st of the current month up to today.
    pub month: usize,
    pub days_with_events: usize,
    pub avg_per_day: f64,
    /// Sum of event durations. Events ending before they start count negative.
    pub total_hours: f64,
    pub avg_hours_per_day: f64,
    pub tag_distribution: Distribution<u32>,
    pub time_distribution: Distribution<f64>,
}

impl Stats {
    pub fn compute(events: &[Event], today: NaiveDate) -> Self {
        let week_start = today - Duration::days(WEEK_WINDOW_DAYS);
        let month_start = today.with_day(1).unwrap_or(today);

        let total = events.len();
        let week = events
            .iter()
            .filter(|e| e.date >= week_start && e.date <= today)
            .count();
        let month = events
            .iter()
            .filter(|e| e.date >= month_start && e.date <= today)
            .count();

        let days_with_events = events.iter().map(|e| e.date).collect::<HashSet<_>>().len();

        let mut total_hours = 0.0;
        let mut tag_distribution = Distribution::new();
        let mut time_distribution = Distribution::new();

        for event in events {
            let hours = event.duration_hours();
            total_hours += hours;
            tag_distribution.add(&event.tag, 1);
            time_distribution.add(&event.tag, hours);
        }

        let per_day = |value: f64| {
            if days_with_events > 0 {
                value / days_with_events as f64
            } else {
                0.0
            }
        };

        Stats {
            total,
            week,
            month,
            days_with_events,
            avg_per_day: per_day(total as f64),
            total_hours,
            avg_hours_per_day: per_day(total_hours),
            tag_distribution,
            time_distribution,
        }
    }
}

/// Tag → aggregate, in the order tags were first seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution<T> {
    entries: Vec<(String, T)>,
}

impl<T> Distribution<T>
where
    T: Copy + PartialOrd + std::ops::Add<Output = T> + Default + Into<f64>,
{
    pub fn new() -> Self {
        Distribution { entries: Vec::new() }
    }

    pub fn add(&mut self, tag: &str, amount: T) {
        match self.entries.iter_mut().find(|(t, _)| t == tag) {
            Some((_, value)) => *value = *value + amount,
            None => self.entries.push((tag.to_string(), amount)),
        }
    }

    pub fn get(&self, tag: &str) -> Option<T> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), *v))
    }

    pub fn total(&self) -> T {
        self.entries
            .iter()
            .fold(T::default(), |sum, (_, value)| sum + *value)
    }

    /// Largest first; ties keep first-seen order.
    pub fn sorted_desc(&self) -> Vec<(&str, T)> {
        let mut sorted: Vec<(&str, T)> = self.iter().collect();
        sorted.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Rounded percentage of the distribution total, 0 when the total is 0.
    pub fn share(&self, tag: &str) -> i64 {
        let total: f64 = self.total().into();
        match self.get(tag) {
            Some(value) if total != 0.0 => (value.into() / total * 100.0).round() as i64,
            _ => 0,
        }
    }
}

impl<T: Serialize> Serialize for Distribution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, value) in &self.entries {
            map.serialize_entry(tag, value)?;
        }
        map.end()
    }
}
