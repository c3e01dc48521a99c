use anyhow::Result;
use daybook_core::{Session, User};
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::context::{self, Context, NEW_PASSWORD_ENV, PASSWORD_ENV};

fn name_or_prompt(name: Option<String>) -> Result<String> {
    match name {
        Some(name) => Ok(name),
        None => Ok(Input::<String>::new()
            .with_prompt("  Name")
            .interact_text()?),
    }
}

pub fn register(ctx: &mut Context, name: Option<String>) -> Result<()> {
    let name = name_or_prompt(name)?;
    let password = context::new_password(PASSWORD_ENV)?;

    let user = User::new(name.clone(), password);
    if Session::register(ctx.transport()?, user)?.is_none() {
        anyhow::bail!("The name '{name}' is already used");
    }

    ctx.config.user = Some(name.clone());
    ctx.save()?;
    println!("{}", format!("  Registered and logged in as {name}").green());
    Ok(())
}

pub fn login(ctx: &mut Context, name: Option<String>) -> Result<()> {
    let name = name_or_prompt(name)?;
    let password = context::password("  Password")?;

    if Session::login(ctx.transport()?, User::new(name.clone(), password))?.is_none() {
        anyhow::bail!("Invalid name or password");
    }

    ctx.config.user = Some(name.clone());
    ctx.save()?;
    println!("{}", format!("  Logged in as {name}").green());
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    match ctx.config.user.take() {
        Some(name) => {
            ctx.save()?;
            println!("  Logged out {name}");
        }
        None => println!("{}", "  Not logged in".dimmed()),
    }
    Ok(())
}

pub fn change_name(ctx: &mut Context, new_name: Option<String>) -> Result<()> {
    let mut session = ctx.session()?;
    let new_name = match new_name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("  New name")
            .interact_text()?,
    };

    if !session.rename(&new_name)? {
        anyhow::bail!("The name '{new_name}' is already used");
    }

    ctx.config.user = Some(session.user().name.clone());
    ctx.save()?;
    println!("{}", format!("  Renamed to {new_name}").green());
    Ok(())
}

pub fn change_password(ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    let password = context::new_password(NEW_PASSWORD_ENV)?;
    session.change_password(&password)?;
    println!("{}", "  Password changed".green());
    Ok(())
}
