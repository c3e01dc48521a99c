//! Durable, user-partitioned event storage.
//!
//! Every event lives in exactly one bucket, keyed by its owner and the
//! calendar date of its beginning. Identifiers come from a per-user
//! counter and are never reused.

mod counter;
mod file;
mod locks;

use std::path::Path;

use chrono::NaiveDate;

use crate::error::StoreResult;
use crate::event::{Event, EventId, EventSummary};
use crate::user::User;

pub use file::FileStore;

/// Data access operations for users and their events.
///
/// Expected conditions come back as `bool`/`Option`; an `Err` always means
/// the store itself is broken (I/O failure, corrupt record) or the request
/// was malformed.
pub trait EventStore: Send + Sync {
    /// Creates the user's namespace. Returns false if the name is taken.
    fn create_user(&self, user: &User) -> StoreResult<bool>;

    /// True iff the user exists and the password matches exactly.
    fn authenticate_user(&self, user: &User) -> StoreResult<bool>;

    /// Moves the whole namespace of `old` to `new.name`. Returns false if
    /// the new name is taken.
    fn update_user_name(&self, old: &User, new: &User) -> StoreResult<bool>;

    /// Replaces the stored password of `old` with the one in `new`.
    fn update_user_password(&self, old: &User, new: &User) -> StoreResult<bool>;

    /// Persists the event in the bucket of its beginning date.
    ///
    /// An event without an id gets the next one from the user's counter;
    /// an event with an id overwrites the stored copy. Returns the id used.
    fn save_event(&self, event: &Event, user: &User) -> StoreResult<EventId>;

    /// Removes the event if present. Deleting a missing event is a no-op.
    fn delete_event(&self, date: NaiveDate, id: EventId, user: &User) -> StoreResult<()>;

    fn get_event(&self, date: NaiveDate, id: EventId, user: &User) -> StoreResult<Option<Event>>;

    /// All events of one bucket, in canonical order. `None` when the
    /// bucket has never been created.
    fn get_events(&self, date: NaiveDate, user: &User) -> StoreResult<Option<Vec<EventSummary>>>;
}

/// Write via a sibling temp file and rename, so readers never observe a
/// partially written record.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> StoreResult<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");

    std::fs::write(&temp, contents)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}
