//! Creating, inspecting and changing single events.

use anyhow::{Context as _, Result};
use chrono::{NaiveDate, NaiveDateTime};
use daybook_core::{Event, EventId, EventSummary};
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::Render;
use crate::utils::when::{apply_duration, default_end, parse_datetime, parse_end};

const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Event properties given on the command line; missing ones are asked for
#[derive(clap::Args, Debug, Default)]
pub struct EventFields {
    /// Event name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Start, e.g. "2025-03-20 15:00" or "friday 3pm"
    #[arg(short, long)]
    pub start: Option<String>,

    /// End, as a date/time or a duration
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Length, e.g. "45m" or "2h"
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Where it takes place
    #[arg(short, long)]
    pub place: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

impl EventFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.duration.is_none()
            && self.place.is_none()
            && self.description.is_none()
    }
}

pub fn add(ctx: &Context, fields: EventFields) -> Result<()> {
    let session = ctx.session()?;
    let interactive = fields.name.is_none() || fields.start.is_none();

    let event = build_event(fields, None, interactive)?;
    let id = session.add(&event)?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Created: {}", describe(&event.summary, id)).green());
    Ok(())
}

pub fn show(ctx: &Context, date: NaiveDate, id: EventId) -> Result<()> {
    let session = ctx.session()?;
    let event = session.get(date, id)?.with_context(|| not_found(date, id))?;
    println!("{}", event.render());
    Ok(())
}

pub fn edit(ctx: &Context, date: NaiveDate, id: EventId, fields: EventFields) -> Result<()> {
    let session = ctx.session()?;
    let old = session.get(date, id)?.with_context(|| not_found(date, id))?;

    let interactive = fields.is_empty();
    let new = build_event(fields, Some(&old), interactive)?;
    let new_id = session.edit(&old, &new)?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Updated: {}", describe(&new.summary, new_id)).green());
    Ok(())
}

pub fn duplicate(ctx: &Context, date: NaiveDate, id: EventId, start: Option<String>) -> Result<()> {
    let session = ctx.session()?;
    let original = session.get(date, id)?.with_context(|| not_found(date, id))?;

    let mut copy = original.clone();
    if let Some(start) = start {
        let beginning = parse_datetime(&start)?;
        copy.summary.end = beginning + (original.summary.end - original.summary.beginning);
        copy.summary.beginning = beginning;
    }
    let new_id = session.duplicate(&copy)?;

    println!("{}", format!("  Created: {}", describe(&copy.summary, new_id)).green());
    Ok(())
}

pub fn delete(ctx: &Context, date: NaiveDate, id: EventId, yes: bool) -> Result<()> {
    let session = ctx.session()?;
    let event = session.get(date, id)?.with_context(|| not_found(date, id))?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("  Delete '{}'?", event.summary.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "  Nothing deleted".dimmed());
            return Ok(());
        }
    }

    session.delete(&event.summary)?;
    println!("{}", format!("  Deleted: {}", event.summary.name).red());
    Ok(())
}

fn not_found(date: NaiveDate, id: EventId) -> String {
    format!("No event #{id} on {date}")
}

fn describe(summary: &EventSummary, id: EventId) -> String {
    format!(
        "{} on {} (#{id})",
        summary.name,
        summary.beginning.format("%a %b %-d %Y, %H:%M")
    )
}

/// Fill in an event from the given fields, prompting for the rest when
/// interactive. With a `base`, unspecified fields keep its values and a
/// moved start keeps its length.
fn build_event(fields: EventFields, base: Option<&Event>, interactive: bool) -> Result<Event> {
    // --- Name ---
    let name = match fields.name {
        Some(name) => name,
        None if interactive => prompt_text("  Title", base.map(|e| e.summary.name.clone()))?,
        None => base
            .map(|e| e.summary.name.clone())
            .context("An event name is required")?,
    };

    // --- Start ---
    let start = match fields.start.as_deref() {
        Some(input) => parse_datetime(input)?,
        None if interactive => prompt_parsed(
            "  When?",
            base.map(|e| e.summary.beginning.format(INPUT_FORMAT).to_string()),
            parse_datetime,
        )?,
        None => base
            .map(|e| e.summary.beginning)
            .context("A start time is required")?,
    };

    // --- End ---
    let length = base.map(|e| e.summary.end - e.summary.beginning);
    let fallback_end = length.map_or_else(|| default_end(start), |length| start + length);
    let end = if let Some(input) = fields.end.as_deref() {
        parse_end(start, input)?
    } else if let Some(input) = fields.duration.as_deref() {
        apply_duration(start, input)?
    } else if interactive {
        prompt_end(start, fallback_end)?
    } else {
        fallback_end
    };

    // --- Place and description ---
    let current_place = base.map(|e| e.place.clone()).unwrap_or_default();
    let place = match fields.place {
        Some(place) => place,
        None if interactive => prompt_optional("  Where? (skip)", &current_place)?,
        None => current_place,
    };
    let current_description = base.map(|e| e.description.clone()).unwrap_or_default();
    let description = match fields.description {
        Some(description) => description,
        None if interactive => prompt_optional("  Notes? (skip)", &current_description)?,
        None => current_description,
    };

    let mut event = Event::new(name, start, end);
    event.summary.id = base.and_then(Event::id);
    event.place = place;
    event.description = description;
    event.summary.validate()?;
    Ok(event)
}

fn prompt_text(prompt: &str, default: Option<String>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default);
    }
    Ok(input.interact_text()?)
}

fn prompt_optional(prompt: &str, current: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .default(current.to_string())
        .show_default(!current.is_empty())
        .allow_empty(true)
        .interact_text()?)
}

/// Prompt the user with retry on parse errors.
fn prompt_parsed<T>(
    prompt: &str,
    default: Option<String>,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<T> {
    loop {
        let input = prompt_text(prompt, default.clone())?;
        match parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn prompt_end(start: NaiveDateTime, fallback: NaiveDateTime) -> Result<NaiveDateTime> {
    let hint = humantime::format_duration(
        (fallback - start).to_std().unwrap_or_default(),
    );
    loop {
        let input: String = Input::new()
            .with_prompt(format!("  How long? ({hint})"))
            .default(String::new())
            .show_default(false)
            .allow_empty(true)
            .interact_text()?;
        if input.is_empty() {
            return Ok(fallback);
        }
        match parse_end(start, &input) {
            Ok(end) => return Ok(end),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn saved_standup() -> Event {
        let mut event = Event::new("standup", at(20, 9, 0), at(20, 9, 15));
        event.summary.id = Some(3);
        event.place = "room 4".into();
        event
    }

    #[test]
    fn new_event_from_flags() {
        let fields = EventFields {
            name: Some("review".into()),
            start: Some("2026-03-20 15:00".into()),
            duration: Some("45m".into()),
            ..Default::default()
        };
        let event = build_event(fields, None, false).unwrap();

        assert_eq!(event.id(), None);
        assert_eq!(event.summary.beginning, at(20, 15, 0));
        assert_eq!(event.summary.end, at(20, 15, 45));
        assert!(event.place.is_empty());
    }

    #[test]
    fn new_event_defaults_to_one_hour() {
        let fields = EventFields {
            name: Some("review".into()),
            start: Some("2026-03-20 15:00".into()),
            ..Default::default()
        };
        let event = build_event(fields, None, false).unwrap();
        assert_eq!(event.summary.end, at(20, 16, 0));
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let base = saved_standup();
        let fields = EventFields {
            name: Some("sync".into()),
            ..Default::default()
        };
        let event = build_event(fields, Some(&base), false).unwrap();

        assert_eq!(event.id(), Some(3));
        assert_eq!(event.summary.name, "sync");
        assert_eq!(event.summary.beginning, base.summary.beginning);
        assert_eq!(event.summary.end, base.summary.end);
        assert_eq!(event.place, "room 4");
    }

    #[test]
    fn edit_moving_start_keeps_length() {
        let base = saved_standup();
        let fields = EventFields {
            start: Some("2026-03-22 10:00".into()),
            ..Default::default()
        };
        let event = build_event(fields, Some(&base), false).unwrap();

        assert_eq!(event.summary.beginning, at(22, 10, 0));
        assert_eq!(event.summary.end, at(22, 10, 15));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let fields = EventFields {
            name: Some("review".into()),
            start: Some("2026-03-20 15:00".into()),
            end: Some("2026-03-20 14:00".into()),
            ..Default::default()
        };
        assert!(build_event(fields, None, false).is_err());
    }

    #[test]
    fn empty_fields() {
        assert!(EventFields::default().is_empty());
        let fields = EventFields {
            place: Some(String::new()),
            ..Default::default()
        };
        assert!(!fields.is_empty());
    }
}
