use anyhow::Result;
use owo_colors::OwoColorize;
use schedule_core::session::{Command, Outcome};

use crate::context::{Context, done};
use crate::render::render_tag;

pub fn list(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;

    for tag in session.tags().tags() {
        println!("  {}", render_tag(tag));
    }
    Ok(())
}

pub fn add(ctx: &Context, name: &str) -> Result<()> {
    let mut session = ctx.session()?;

    match session.dispatch(Command::AddTag(name.to_string()))? {
        Outcome::TagAdded(tag) => done(format!("Added tag {}", render_tag(&tag))),
        _ => println!("{}", "Tag is empty or already exists".dimmed()),
    }
    Ok(())
}
