//! Lazy, day-by-day event listing over a transport.
//!
//! `RangedEvents` describes a date window; iterating it yields the
//! window's events in order, fetching one calendar day per transport call.
//! At most one day's batch is held in memory at a time.

use std::iter::FusedIterator;

use chrono::NaiveDate;

use crate::event::EventSummary;
use crate::transport::Transport;
use crate::user::User;

/// Upper limit on the number of days a single walk will fetch.
pub const MAX_DAYS_SCANNED: u32 = 100;

/// Bound adjustments understood by [`RangedEvents::narrow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePredicate {
    /// `beginning >= date`
    BeginningAtLeast(NaiveDate),
    /// `beginning < date`
    BeginningBefore(NaiveDate),
}

/// The events of one user between `lower` (inclusive) and `upper`
/// (exclusive).
pub struct RangedEvents<'a, T: ?Sized> {
    transport: &'a T,
    user: &'a User,
    lower: NaiveDate,
    upper: NaiveDate,
}

impl<T: ?Sized> Clone for RangedEvents<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for RangedEvents<'_, T> {}

impl<'a, T: Transport + ?Sized> RangedEvents<'a, T> {
    /// Events from `lower` onwards, with no upper bound.
    pub fn new(transport: &'a T, user: &'a User, lower: NaiveDate) -> Self {
        Self::between(transport, user, lower, NaiveDate::MAX)
    }

    pub fn between(transport: &'a T, user: &'a User, lower: NaiveDate, upper: NaiveDate) -> Self {
        RangedEvents {
            transport,
            user,
            lower,
            upper,
        }
    }

    pub fn lower(&self) -> NaiveDate {
        self.lower
    }

    pub fn upper(&self) -> NaiveDate {
        self.upper
    }

    /// A new window with one bound replaced. `self` is left untouched.
    pub fn narrow(&self, predicate: RangePredicate) -> Self {
        let mut narrowed = *self;
        match predicate {
            RangePredicate::BeginningAtLeast(date) => narrowed.lower = date,
            RangePredicate::BeginningBefore(date) => narrowed.upper = date,
        }
        narrowed
    }

    /// Start a fresh walk from the lower bound.
    pub fn iter(&self) -> EventCursor<'a, T> {
        EventCursor {
            transport: self.transport,
            user: self.user,
            upper: self.upper,
            day: Some(self.lower),
            days_scanned: 0,
            buffer: Vec::new().into_iter(),
        }
    }

    /// The first `n` events of the window. Fetching stops at the day that
    /// completes the count; the rest of that day's batch is dropped.
    pub fn first_n(&self, n: usize) -> Vec<EventSummary> {
        self.iter().take(n).collect()
    }
}

impl<'a, T: Transport + ?Sized> IntoIterator for &RangedEvents<'a, T> {
    type Item = EventSummary;
    type IntoIter = EventCursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Transport + ?Sized> IntoIterator for RangedEvents<'a, T> {
    type Item = EventSummary;
    type IntoIter = EventCursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One walk over a [`RangedEvents`] window.
pub struct EventCursor<'a, T: ?Sized> {
    transport: &'a T,
    user: &'a User,
    upper: NaiveDate,
    /// Next day to fetch; `None` once the walk is over
    day: Option<NaiveDate>,
    days_scanned: u32,
    buffer: std::vec::IntoIter<EventSummary>,
}

impl<T: Transport + ?Sized> EventCursor<'_, T> {
    /// Number of days fetched so far.
    pub fn days_scanned(&self) -> u32 {
        self.days_scanned
    }

    /// A failed fetch counts as a day without events.
    fn fetch(&self, day: NaiveDate) -> Vec<EventSummary> {
        match self.transport.get_events(self.user, day) {
            Ok(Some(mut events)) => {
                events.sort();
                events
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%day, error = %err, "failed to fetch events, skipping day");
                Vec::new()
            }
        }
    }
}

impl<T: Transport + ?Sized> Iterator for EventCursor<'_, T> {
    type Item = EventSummary;

    fn next(&mut self) -> Option<EventSummary> {
        loop {
            if let Some(event) = self.buffer.next() {
                return Some(event);
            }

            let day = self.day?;
            if day >= self.upper || self.days_scanned >= MAX_DAYS_SCANNED {
                self.day = None;
                return None;
            }

            self.buffer = self.fetch(day).into_iter();
            self.days_scanned += 1;
            self.day = day.succ_opt();
        }
    }
}

impl<T: Transport + ?Sized> FusedIterator for EventCursor<'_, T> {}
