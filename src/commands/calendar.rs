use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use schedule_core::grid::YearMonth;
use schedule_core::session::{Command, Outcome, Session};

use crate::context::{Context, parse_date};
use crate::render::{Render, pluralize, render_month};

pub fn month(ctx: &Context, month: Option<&str>, date: Option<&str>) -> Result<()> {
    let mut session = ctx.session()?;
    let selected = parse_date(date, ctx.today)?;

    session.dispatch(Command::ShowMonth(YearMonth::of(selected)))?;
    session.dispatch(Command::SelectDate(selected))?;

    if let Some(m) = month {
        session.dispatch(Command::ShowMonth(YearMonth::parse(m)?))?;
    }

    let shown = session.view().month();
    println!("{}", render_month(shown, &session.grid(ctx.today)));

    if !shown.contains(selected) {
        return Ok(());
    }

    let events = session.day_events();
    println!();
    println!(
        "{} {}",
        selected.format("%A, %B %-d").to_string().bold(),
        format!("({} {})", events.len(), pluralize("event", events.len())).dimmed()
    );
    for event in events {
        println!("  {}", event.render());
    }

    Ok(())
}

/// Show `date`'s month and select it.
pub fn select_day(session: &mut Session, date: NaiveDate) -> Result<()> {
    session.dispatch(Command::ShowMonth(YearMonth::of(date)))?;
    match session.dispatch(Command::SelectDate(date))? {
        Outcome::Selected(_) => Ok(()),
        other => anyhow::bail!("Could not select {}: {:?}", date, other),
    }
}
