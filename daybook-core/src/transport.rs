//! The contract between the client-side code and wherever events live.
//!
//! One call per method, each carrying the caller's identity explicitly.
//! `LocalTransport` serves the contract straight from an [`EventStore`],
//! applying the same authentication rules as the HTTP server.

use chrono::NaiveDate;

use crate::error::TransportError;
use crate::event::{Event, EventId, EventSummary};
use crate::store::EventStore;
use crate::user::User;

pub trait Transport {
    /// False when the name is already used.
    fn create_user(&self, user: &User) -> Result<bool, TransportError>;

    fn authenticate(&self, user: &User) -> Result<bool, TransportError>;

    fn save_event(&self, user: &User, event: &Event) -> Result<EventId, TransportError>;

    fn delete_event(&self, user: &User, date: NaiveDate, id: EventId)
    -> Result<(), TransportError>;

    fn get_event(
        &self,
        user: &User,
        date: NaiveDate,
        id: EventId,
    ) -> Result<Option<Event>, TransportError>;

    /// One day's events. `None` when the day has no bucket at all.
    fn get_events(
        &self,
        user: &User,
        date: NaiveDate,
    ) -> Result<Option<Vec<EventSummary>>, TransportError>;

    /// False when the new name is already used.
    fn change_user_name(&self, old: &User, new: &User) -> Result<bool, TransportError>;

    fn change_password(&self, old: &User, new: &User) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn create_user(&self, user: &User) -> Result<bool, TransportError> {
        (**self).create_user(user)
    }

    fn authenticate(&self, user: &User) -> Result<bool, TransportError> {
        (**self).authenticate(user)
    }

    fn save_event(&self, user: &User, event: &Event) -> Result<EventId, TransportError> {
        (**self).save_event(user, event)
    }

    fn delete_event(
        &self,
        user: &User,
        date: NaiveDate,
        id: EventId,
    ) -> Result<(), TransportError> {
        (**self).delete_event(user, date, id)
    }

    fn get_event(
        &self,
        user: &User,
        date: NaiveDate,
        id: EventId,
    ) -> Result<Option<Event>, TransportError> {
        (**self).get_event(user, date, id)
    }

    fn get_events(
        &self,
        user: &User,
        date: NaiveDate,
    ) -> Result<Option<Vec<EventSummary>>, TransportError> {
        (**self).get_events(user, date)
    }

    fn change_user_name(&self, old: &User, new: &User) -> Result<bool, TransportError> {
        (**self).change_user_name(old, new)
    }

    fn change_password(&self, old: &User, new: &User) -> Result<(), TransportError> {
        (**self).change_password(old, new)
    }
}

/// In-process transport over a store.
pub struct LocalTransport<S> {
    store: S,
}

impl<S: EventStore> LocalTransport<S> {
    pub fn new(store: S) -> Self {
        LocalTransport { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn require_auth(&self, user: &User) -> Result<(), TransportError> {
        if self.store.authenticate_user(user)? {
            Ok(())
        } else {
            Err(TransportError::Unauthorized)
        }
    }
}

impl<S: EventStore> Transport for LocalTransport<S> {
    fn create_user(&self, user: &User) -> Result<bool, TransportError> {
        Ok(self.store.create_user(user)?)
    }

    fn authenticate(&self, user: &User) -> Result<bool, TransportError> {
        Ok(self.store.authenticate_user(user)?)
    }

    fn save_event(&self, user: &User, event: &Event) -> Result<EventId, TransportError> {
        self.require_auth(user)?;
        Ok(self.store.save_event(event, user)?)
    }

    fn delete_event(
        &self,
        user: &User,
        date: NaiveDate,
        id: EventId,
    ) -> Result<(), TransportError> {
        self.require_auth(user)?;
        Ok(self.store.delete_event(date, id, user)?)
    }

    fn get_event(
        &self,
        user: &User,
        date: NaiveDate,
        id: EventId,
    ) -> Result<Option<Event>, TransportError> {
        self.require_auth(user)?;
        Ok(self.store.get_event(date, id, user)?)
    }

    fn get_events(
        &self,
        user: &User,
        date: NaiveDate,
    ) -> Result<Option<Vec<EventSummary>>, TransportError> {
        self.require_auth(user)?;
        Ok(self.store.get_events(date, user)?)
    }

    fn change_user_name(&self, old: &User, new: &User) -> Result<bool, TransportError> {
        self.require_auth(old)?;
        Ok(self.store.update_user_name(old, new)?)
    }

    fn change_password(&self, old: &User, new: &User) -> Result<(), TransportError> {
        self.require_auth(old)?;
        self.store.update_user_password(old, new)?;
        Ok(())
    }
}
