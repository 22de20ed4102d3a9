use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::context::{Context, done};

pub fn register(ctx: &Context, username: Option<String>, phone: Option<String>) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("  Username")
            .interact_text()?,
    };

    let phone = match phone {
        Some(p) => p,
        None => Input::<String>::new()
            .with_prompt("  Phone number")
            .interact_text()?,
    };

    let password = rpassword::prompt_password("  Password: ")?;
    let confirm = rpassword::prompt_password("  Confirm password: ")?;

    let mut accounts = ctx.accounts()?;
    let account = accounts.register(&username, &phone, &password, &confirm)?;

    done(format!("Registered and signed in as {}", account.username));
    Ok(())
}

pub fn login(ctx: &Context, phone: Option<String>) -> Result<()> {
    let phone = match phone {
        Some(p) => p,
        None => Input::<String>::new()
            .with_prompt("  Phone number")
            .interact_text()?,
    };

    let password = rpassword::prompt_password("  Password: ")?;

    let mut accounts = ctx.accounts()?;
    let account = accounts.login(&phone, &password)?;

    done(format!("Signed in as {}", account.username));
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let mut accounts = ctx.accounts()?;

    if accounts.current().is_none() {
        println!("{}", "Not signed in".dimmed());
        return Ok(());
    }

    accounts.logout()?;
    done("Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let accounts = ctx.accounts()?;

    match accounts.current() {
        Some(account) => println!(
            "{} {}",
            account.username.bold(),
            format!("({})", account.phone).dimmed()
        ),
        None => println!("{}", "Not signed in".dimmed()),
    }
    Ok(())
}

pub fn rename(ctx: &Context, username: &str) -> Result<()> {
    let mut accounts = ctx.accounts()?;
    let account = accounts.rename(username)?;

    done(format!("Username changed to {}", account.username));
    Ok(())
}
