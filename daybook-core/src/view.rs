//! Calendar views: which window of days the client is looking at, and how
//! to move it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cursor::{RangePredicate, RangedEvents};
use crate::event::EventSummary;
use crate::transport::Transport;
use crate::user::User;

/// How many events the upcoming view shows.
pub const UPCOMING_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSpan {
    /// Monday to Sunday of the shown date's week
    #[default]
    Week,
    /// The whole month of the shown date
    Month,
    /// The next few events from the shown date onwards
    Upcoming,
}

impl ViewSpan {
    /// First day shown for `shown`.
    pub fn beginning_date(self, shown: NaiveDate) -> NaiveDate {
        match self {
            ViewSpan::Week => {
                let back = u64::from(shown.weekday().num_days_from_monday());
                shown.checked_sub_days(Days::new(back)).unwrap_or(shown)
            }
            ViewSpan::Month => shown.with_day(1).unwrap_or(shown),
            ViewSpan::Upcoming => shown,
        }
    }

    /// Number of days covered, `None` for the open-ended upcoming view.
    pub fn number_of_days(self, shown: NaiveDate) -> Option<u64> {
        match self {
            ViewSpan::Week => Some(7),
            ViewSpan::Month => {
                let first = self.beginning_date(shown);
                let days = first
                    .checked_add_months(Months::new(1))
                    .map(|next| next.signed_duration_since(first).num_days())
                    // December of the last representable year
                    .unwrap_or(31);
                Some(days as u64)
            }
            ViewSpan::Upcoming => None,
        }
    }

    /// The shown date one step forward.
    pub fn next(self, shown: NaiveDate) -> NaiveDate {
        match self {
            ViewSpan::Month => shown.checked_add_months(Months::new(1)),
            ViewSpan::Week | ViewSpan::Upcoming => shown.checked_add_days(Days::new(7)),
        }
        .unwrap_or(shown)
    }

    /// The shown date one step back.
    pub fn previous(self, shown: NaiveDate) -> NaiveDate {
        match self {
            ViewSpan::Month => shown.checked_sub_months(Months::new(1)),
            ViewSpan::Week | ViewSpan::Upcoming => shown.checked_sub_days(Days::new(7)),
        }
        .unwrap_or(shown)
    }

    /// The events this view shows for `shown`.
    pub fn list<T: Transport + ?Sized>(
        self,
        transport: &T,
        user: &User,
        shown: NaiveDate,
    ) -> Vec<EventSummary> {
        let beginning = self.beginning_date(shown);
        let events = RangedEvents::new(transport, user, beginning);

        match self.number_of_days(shown) {
            Some(days) => {
                let end = beginning
                    .checked_add_days(Days::new(days))
                    .unwrap_or(NaiveDate::MAX);
                events
                    .narrow(RangePredicate::BeginningBefore(end))
                    .iter()
                    .collect()
            }
            None => events.first_n(UPCOMING_LIMIT),
        }
    }
}

impl fmt::Display for ViewSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewSpan::Week => "week",
            ViewSpan::Month => "month",
            ViewSpan::Upcoming => "upcoming",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewSpan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" | "w" => Ok(ViewSpan::Week),
            "month" | "m" => Ok(ViewSpan::Month),
            "upcoming" | "u" => Ok(ViewSpan::Upcoming),
            other => Err(format!(
                "unknown view '{other}', expected week, month or upcoming"
            )),
        }
    }
}
