use anyhow::Result;
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::render_distribution;

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let session = ctx.session()?;
    let stats = session.stats(ctx.today);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let rows = [
        ("Total events", stats.total.to_string()),
        ("This week", stats.week.to_string()),
        ("This month", stats.month.to_string()),
        ("Avg per day", format!("{:.1}", stats.avg_per_day)),
        ("Total hours", format!("{:.1}h", stats.total_hours)),
        ("Avg hours per day", format!("{:.1}h", stats.avg_hours_per_day)),
    ];

    for (label, value) in rows {
        println!("  {:<18} {}", label.dimmed(), value.bold());
    }

    println!();
    println!("  {}", "Events by tag".bold());
    for line in render_distribution(&stats.tag_distribution, |count| count.to_string()) {
        println!("{}", line);
    }

    println!();
    println!("  {}", "Hours by tag".bold());
    for line in render_distribution(&stats.time_distribution, |hours| format!("{:.1}h", hours)) {
        println!("{}", line);
    }

    Ok(())
}
