//! Listing and moving through views.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use daybook_core::ViewSpan;
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render;

/// Which way to move the shown date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
    Current,
}

/// Print a view without changing the saved state.
pub fn list(ctx: &Context, date: Option<NaiveDate>, view: Option<ViewSpan>) -> Result<()> {
    let shown = date.unwrap_or_else(|| ctx.shown_date());
    let view = view.unwrap_or(ctx.config.view);
    print_view(ctx, view, shown)
}

/// Switch the saved view and print it.
pub fn set_view(ctx: &mut Context, view: ViewSpan) -> Result<()> {
    ctx.config.view = view;
    ctx.save()?;
    print_view(ctx, view, ctx.shown_date())
}

/// Move the saved date and print the view there.
pub fn step(ctx: &mut Context, step: Step) -> Result<()> {
    let view = ctx.config.view;
    let shown = stepped(view, ctx.shown_date(), step, Local::now().date_naive());

    ctx.config.shown_date = Some(shown);
    ctx.save()?;
    print_view(ctx, view, shown)
}

fn stepped(view: ViewSpan, shown: NaiveDate, step: Step, today: NaiveDate) -> NaiveDate {
    match step {
        Step::Next => view.next(shown),
        Step::Previous => view.previous(shown),
        Step::Current => today,
    }
}

fn print_view(ctx: &Context, view: ViewSpan, shown: NaiveDate) -> Result<()> {
    let session = ctx.session()?;
    let events = session.list(view, shown);

    println!("{}", render::view_title(view, shown).bold().underline());
    println!();
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }
    for line in render::render_days(&events) {
        println!("{line}");
    }
    Ok(())
}
