//! Filesystem-backed event store.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<user>/userInfo                  credential record (JSON)
//! <root>/<user>/IDCounter                 next identifier to allocate
//! <root>/<user>/<year>/<month>/<day>/<id> full event (JSON)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{StoreError, StoreResult};
use crate::event::{Event, EventId, EventSummary};
use crate::store::counter::IdCounter;
use crate::store::locks::UserLocks;
use crate::store::{EventStore, write_atomic};
use crate::user::User;

const USER_INFO_FILE: &str = "userInfo";

pub struct FileStore {
    root: PathBuf,
    locks: UserLocks,
}

impl FileStore {
    /// Open a store rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::MissingRoot(root));
        }

        tracing::info!(root = %root.display(), "opened event store");
        Ok(FileStore {
            root,
            locks: UserLocks::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn bucket_dir(&self, name: &str, date: NaiveDate) -> PathBuf {
        self.user_dir(name)
            .join(date.year().to_string())
            .join(date.month().to_string())
            .join(date.day().to_string())
    }

    fn event_path(&self, name: &str, date: NaiveDate, id: EventId) -> PathBuf {
        self.bucket_dir(name, date).join(id.to_string())
    }

    fn read_user(&self, name: &str) -> StoreResult<Option<User>> {
        read_json(&self.user_dir(name).join(USER_INFO_FILE))
    }

    fn write_user(&self, user: &User) -> StoreResult<()> {
        write_json(&self.user_dir(&user.name).join(USER_INFO_FILE), user)
    }

    /// Users are never deleted, so the number of namespaces is a fresh id.
    fn next_user_id(&self) -> StoreResult<u64> {
        let mut count = 0;
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !hidden && entry.file_type()?.is_dir() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Pick the id an event is written under. Call with the user's lock held.
    fn assign_id(&self, user: &User, event: &Event) -> StoreResult<EventId> {
        match event.id() {
            None => IdCounter::for_user(&self.user_dir(&user.name))
                .allocate()?
                .ok_or_else(|| StoreError::UnknownUser(user.name.clone())),
            // An id only ever rewrites the record it already names
            Some(id) => {
                let date = event.bucket_date();
                if self.event_path(&user.name, date, id).is_file() {
                    Ok(id)
                } else {
                    Err(StoreError::UnknownEvent {
                        user: user.name.clone(),
                        date,
                        id,
                    })
                }
            }
        }
    }
}

impl EventStore for FileStore {
    fn create_user(&self, user: &User) -> StoreResult<bool> {
        User::validate_name(&user.name)?;
        let _accounts = self.locks.accounts();

        let id = self.next_user_id()?;
        let dir = self.user_dir(&user.name);
        match std::fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let record = User {
            id: Some(id),
            ..user.clone()
        };
        self.write_user(&record)?;
        IdCounter::for_user(&dir).create()?;

        tracing::info!(user = %user.name, id, "user created");
        Ok(true)
    }

    fn authenticate_user(&self, user: &User) -> StoreResult<bool> {
        if User::validate_name(&user.name).is_err() {
            return Ok(false);
        }

        Ok(self
            .read_user(&user.name)?
            .is_some_and(|stored| stored.password == user.password))
    }

    fn update_user_name(&self, old: &User, new: &User) -> StoreResult<bool> {
        User::validate_name(&new.name)?;
        if User::validate_name(&old.name).is_err() {
            return Err(StoreError::UnknownUser(old.name.clone()));
        }

        let _accounts = self.locks.accounts();
        let lock = self.locks.user(&old.name);
        let _guard = lock.lock();

        let old_dir = self.user_dir(&old.name);
        let new_dir = self.user_dir(&new.name);
        if new_dir.exists() {
            return Ok(false);
        }
        let stored = self
            .read_user(&old.name)?
            .ok_or_else(|| StoreError::UnknownUser(old.name.clone()))?;

        std::fs::rename(&old_dir, &new_dir)?;
        self.write_user(&User {
            id: stored.id,
            name: new.name.clone(),
            password: new.password.clone(),
        })?;

        tracing::info!(from = %old.name, to = %new.name, "user renamed");
        Ok(true)
    }

    fn update_user_password(&self, old: &User, new: &User) -> StoreResult<bool> {
        if User::validate_name(&old.name).is_err() {
            return Err(StoreError::UnknownUser(old.name.clone()));
        }

        let lock = self.locks.user(&old.name);
        let _guard = lock.lock();

        let mut stored = self
            .read_user(&old.name)?
            .ok_or_else(|| StoreError::UnknownUser(old.name.clone()))?;
        stored.password = new.password.clone();
        self.write_user(&stored)?;

        tracing::info!(user = %old.name, "password changed");
        Ok(true)
    }

    fn save_event(&self, event: &Event, user: &User) -> StoreResult<EventId> {
        if User::validate_name(&user.name).is_err() {
            return Err(StoreError::UnknownUser(user.name.clone()));
        }
        event.summary.validate()?;

        let lock = self.locks.user(&user.name);
        let _guard = lock.lock();

        // A rename may have moved the namespace away while we waited
        if !self.user_dir(&user.name).is_dir() {
            return Err(StoreError::UnknownUser(user.name.clone()));
        }
        let id = self.assign_id(user, event)?;

        let mut stored = event.clone();
        stored.summary.id = Some(id);

        let dir = self.bucket_dir(&user.name, event.bucket_date());
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(id.to_string());
        write_json(&path, &stored)?;

        tracing::debug!(user = %user.name, id, path = %path.display(), "event saved");
        Ok(id)
    }

    fn delete_event(&self, date: NaiveDate, id: EventId, user: &User) -> StoreResult<()> {
        if User::validate_name(&user.name).is_err() {
            return Ok(());
        }

        let path = self.event_path(&user.name, date, id);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(user = %user.name, id, path = %path.display(), "event deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get_event(&self, date: NaiveDate, id: EventId, user: &User) -> StoreResult<Option<Event>> {
        if User::validate_name(&user.name).is_err() {
            return Ok(None);
        }

        let event: Option<Event> = read_json(&self.event_path(&user.name, date, id))?;
        Ok(event.map(|mut event| {
            event.summary.id = Some(id);
            event
        }))
    }

    fn get_events(&self, date: NaiveDate, user: &User) -> StoreResult<Option<Vec<EventSummary>>> {
        if User::validate_name(&user.name).is_err() {
            return Ok(None);
        }

        let dir = self.bucket_dir(&user.name, date);
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut summaries = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            // Skip temp files and anything else that is not an event record
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<EventId>().ok())
            else {
                continue;
            };

            if let Some(event) = read_json::<Event>(&entry.path())? {
                let mut summary = event.summary;
                summary.id = Some(id);
                summaries.push(summary);
            }
        }

        summaries.sort();
        Ok(Some(summaries))
    }
}

/// Read a JSON record. A missing file is `None`; an unparsable one is
/// corruption.
fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &content)
}
