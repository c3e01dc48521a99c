//! Colored terminal rendering for daybook types.

use chrono::{Local, NaiveDate};
use daybook_core::{Event, EventSummary, ViewSpan};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventSummary {
    fn render(&self) -> String {
        let time = format!(
            "{:>5}-{}",
            self.beginning.format("%H:%M"),
            self.end.format("%H:%M")
        );
        let id = self.id.map(|id| format!("#{id}")).unwrap_or_default();
        format!("  {} {} {}", time, self.name, id.dimmed())
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut lines = vec![
            self.summary.name.bold().to_string(),
            format!(
                "  {} {}",
                "When:".dimmed(),
                format_span(&self.summary)
            ),
        ];
        if !self.place.is_empty() {
            lines.push(format!("  {} {}", "Where:".dimmed(), self.place));
        }
        if !self.description.is_empty() {
            lines.push(String::new());
            lines.extend(self.description.lines().map(|line| format!("  {line}")));
        }
        if let Some(id) = self.id() {
            lines.push(format!("  {}", format!("#{id}").dimmed()));
        }
        lines.join("\n")
    }
}

fn format_span(summary: &EventSummary) -> String {
    let beginning = summary.beginning.format("%a %b %-d %Y, %H:%M");
    if summary.end.date() == summary.beginning.date() {
        format!("{beginning}-{}", summary.end.format("%H:%M"))
    } else {
        format!("{beginning} - {}", summary.end.format("%a %b %-d %Y, %H:%M"))
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Title line for a view, e.g. "Week of Mon Mar 4 2024".
pub fn view_title(view: ViewSpan, shown: NaiveDate) -> String {
    let beginning = view.beginning_date(shown);
    match view {
        ViewSpan::Week => format!("Week of {}", beginning.format("%a %b %-d %Y")),
        ViewSpan::Month => beginning.format("%B %Y").to_string(),
        ViewSpan::Upcoming => format!("Upcoming from {}", beginning.format("%a %b %-d %Y")),
    }
}

/// Events grouped under one heading per day.
pub fn render_days(events: &[EventSummary]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<NaiveDate> = None;

    for event in events {
        let date = event.bucket_date();
        if current != Some(date) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(date_label(date).bold().to_string());
            current = Some(date);
        }
        lines.push(event.render());
    }

    lines
}
