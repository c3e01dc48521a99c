//! A logged-in user and the transport they talk through.

use chrono::{Local, NaiveDate};

use crate::cursor::RangedEvents;
use crate::error::TransportError;
use crate::event::{Event, EventId, EventSummary};
use crate::transport::Transport;
use crate::user::User;
use crate::view::ViewSpan;

pub struct Session<T> {
    transport: T,
    user: User,
}

impl<T: Transport> Session<T> {
    /// Authenticates `user`; `None` when the credentials are rejected.
    pub fn login(transport: T, user: User) -> Result<Option<Self>, TransportError> {
        if transport.authenticate(&user)? {
            tracing::debug!(user = %user.name, "logged in");
            Ok(Some(Session { transport, user }))
        } else {
            Ok(None)
        }
    }

    /// Creates the account and logs into it; `None` when the name is taken.
    pub fn register(transport: T, user: User) -> Result<Option<Self>, TransportError> {
        if transport.create_user(&user)? {
            tracing::debug!(user = %user.name, "registered");
            Ok(Some(Session { transport, user }))
        } else {
            Ok(None)
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// All events from today onwards.
    pub fn events(&self) -> RangedEvents<'_, T> {
        self.events_from(Local::now().date_naive())
    }

    pub fn events_from(&self, date: NaiveDate) -> RangedEvents<'_, T> {
        RangedEvents::new(&self.transport, &self.user, date)
    }

    pub fn list(&self, view: ViewSpan, shown: NaiveDate) -> Vec<EventSummary> {
        view.list(&self.transport, &self.user, shown)
    }

    pub fn get(&self, date: NaiveDate, id: EventId) -> Result<Option<Event>, TransportError> {
        self.transport.get_event(&self.user, date, id)
    }

    /// Saves a new event and returns its identifier.
    pub fn add(&self, event: &Event) -> Result<EventId, TransportError> {
        if event.id().is_some() {
            return Err(TransportError::BadRequest(
                "a new event must not carry an id".into(),
            ));
        }
        self.transport.save_event(&self.user, event)
    }

    /// Replaces `old` with `new`.
    ///
    /// Events are bucketed by beginning date, so moving an event to another
    /// day stores it as a fresh event there and removes the old copy. The
    /// returned id is the one the edited event now lives under.
    pub fn edit(&self, old: &Event, new: &Event) -> Result<EventId, TransportError> {
        let id = old
            .id()
            .ok_or_else(|| TransportError::BadRequest("only saved events can be edited".into()))?;

        if new.bucket_date() == old.bucket_date() {
            let mut updated = new.clone();
            updated.summary.id = Some(id);
            return self.transport.save_event(&self.user, &updated);
        }

        let new_id = self.transport.save_event(&self.user, &new.unsaved())?;
        self.transport
            .delete_event(&self.user, old.bucket_date(), id)?;
        tracing::debug!(old_id = id, new_id, date = %new.bucket_date(), "moved event");
        Ok(new_id)
    }

    /// Saves a copy of `event` under a fresh identifier.
    pub fn duplicate(&self, event: &Event) -> Result<EventId, TransportError> {
        self.transport.save_event(&self.user, &event.unsaved())
    }

    pub fn delete(&self, summary: &EventSummary) -> Result<(), TransportError> {
        match summary.id {
            Some(id) if summary.is_valid() => {
                self.transport
                    .delete_event(&self.user, summary.bucket_date(), id)
            }
            _ => Err(TransportError::BadRequest(
                "only saved events can be deleted".into(),
            )),
        }
    }

    /// Returns false, leaving the session untouched, if the name is taken.
    pub fn rename(&mut self, new_name: &str) -> Result<bool, TransportError> {
        let renamed = self.user.renamed(new_name);
        if !self.transport.change_user_name(&self.user, &renamed)? {
            return Ok(false);
        }
        self.user = renamed;
        Ok(true)
    }

    pub fn change_password(&mut self, new_password: &str) -> Result<(), TransportError> {
        let updated = self.user.with_password(new_password);
        self.transport.change_password(&self.user, &updated)?;
        self.user = updated;
        Ok(())
    }
}
