//! Terminal rendering for schedule types.
//!
//! Extension traits and helpers that add colored output to schedule-core
//! types using owo_colors.

use chrono::Datelike;
use owo_colors::OwoColorize;
use schedule_core::event::Event;
use schedule_core::grid::{CalendarCell, YearMonth, weeks};
use schedule_core::stats::Distribution;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} - {}  {} {}  {}",
            self.start_time,
            self.end_time,
            self.name.bold(),
            render_tag(&self.tag),
            self.id.dimmed()
        )
    }
}

impl Render for CalendarCell {
    fn render(&self) -> String {
        let day = format!("{:>3}", self.date.day());
        let marker = if self.has_events { "•" } else { " " };

        let day = if self.is_other_month {
            day.dimmed().to_string()
        } else if self.is_selected {
            day.reversed().to_string()
        } else if self.is_today {
            day.bold().underline().to_string()
        } else {
            day
        };

        format!("{}{}", day, marker.cyan())
    }
}

impl Render for YearMonth {
    fn render(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// Color of a tag: the built-in tags have fixed colors, custom tags are gray.
pub fn tag_color(tag: &str) -> (u8, u8, u8) {
    match tag {
        "Work" => (0x66, 0x7e, 0xea),
        "Study" => (0x4c, 0xaf, 0x50),
        "Life" => (0xf5, 0x7c, 0x00),
        "Fitness" => (0xd3, 0x2f, 0x2f),
        _ => (0x9e, 0x9e, 0x9e),
    }
}

pub fn render_tag(tag: &str) -> String {
    let (r, g, b) = tag_color(tag);
    format!("[{}]", tag).truecolor(r, g, b).to_string()
}

pub fn render_month(month: YearMonth, cells: &[CalendarCell]) -> String {
    let mut lines = vec![format!("  {}", month.render().bold())];
    lines.push(
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
            .iter()
            .map(|d| format!("{:>3} ", d))
            .collect::<String>()
            .dimmed()
            .to_string(),
    );

    for week in weeks(cells) {
        lines.push(week.iter().map(Render::render).collect::<String>());
    }

    lines.join("\n")
}

const BAR_WIDTH: usize = 24;

/// One bar per tag, largest first.
pub fn render_distribution<T, F>(distribution: &Distribution<T>, format_value: F) -> Vec<String>
where
    T: Copy + PartialOrd + std::ops::Add<Output = T> + Default + Into<f64>,
    F: Fn(T) -> String,
{
    if distribution.is_empty() {
        return vec![format!("   {}", "No data".dimmed())];
    }

    let label_width = distribution.iter().map(|(tag, _)| tag.chars().count()).max().unwrap_or(0);

    distribution
        .sorted_desc()
        .into_iter()
        .map(|(tag, value)| {
            let percentage = distribution.share(tag).clamp(0, 100) as usize;
            let filled = percentage * BAR_WIDTH / 100;
            let (r, g, b) = tag_color(tag);
            let bar = format!(
                "{}{}",
                "█".repeat(filled).truecolor(r, g, b),
                "░".repeat(BAR_WIDTH - filled).dimmed()
            );

            format!(
                "   {:<width$}  {} {:>3}%  {}",
                tag,
                bar,
                percentage,
                format_value(value),
                width = label_width
            )
        })
        .collect()
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
