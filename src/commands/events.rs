use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use schedule_core::event::EventFields;
use schedule_core::session::{Command, Outcome};

use crate::commands::calendar::select_day;
use crate::context::{Context, done, parse_date};
use crate::render::Render;

pub fn day(ctx: &Context, date: Option<&str>) -> Result<()> {
    let mut session = ctx.session()?;
    let date = parse_date(date, ctx.today)?;
    select_day(&mut session, date)?;

    let label = match (date - ctx.today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    };
    println!("{}", label.bold());

    let events = session.day_events();
    if events.is_empty() {
        println!("  {}", "Nothing scheduled".dimmed());
        return Ok(());
    }

    for event in events {
        println!("  {}", event.render());
    }
    Ok(())
}

pub fn add(
    ctx: &Context,
    name: &str,
    tag: &str,
    start: &str,
    end: &str,
    date: Option<&str>,
) -> Result<()> {
    let mut session = ctx.session()?;
    let date = parse_date(date, ctx.today)?;
    select_day(&mut session, date)?;

    let fields = EventFields::parse(name, tag, start, end)?;

    if let Outcome::Created(event) = session.dispatch(Command::CreateEvent(fields))? {
        if event.end_time < event.start_time {
            eprintln!(
                "  {}",
                "Note: end time is before start time, this event counts negative hours".yellow()
            );
        }
        done(format!("Created: {}", event.render()));
    }
    Ok(())
}

pub fn edit(
    ctx: &Context,
    id: &str,
    name: Option<String>,
    tag: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let mut session = ctx.session()?;

    let Some(current) = session.events().get(id).cloned() else {
        anyhow::bail!("Event not found: {}", id);
    };

    let fields = EventFields::parse(
        name.as_deref().unwrap_or(&current.name),
        tag.as_deref().unwrap_or(&current.tag),
        start.as_deref().unwrap_or(&current.start_time.to_string()),
        end.as_deref().unwrap_or(&current.end_time.to_string()),
    )?;

    if let Outcome::Updated(event) = session.dispatch(Command::UpdateEvent {
        id: id.to_string(),
        fields,
    })? {
        done(format!("Updated: {}", event.render()));
    }
    Ok(())
}

pub fn delete(ctx: &Context, id: &str, force: bool) -> Result<()> {
    let mut session = ctx.session()?;
    let request = session.delete_request(id)?;

    println!("  {} {}", request.event.date, request.event.render());

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Delete this event?")
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    if session.confirm_delete(request)? {
        done("Deleted");
    }
    Ok(())
}
