//! Per-user identifier counter.
//!
//! The counter file holds the next identifier to hand out as a decimal
//! integer. Callers must hold the owner's lock around `allocate`.

use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::event::EventId;
use crate::store::write_atomic;

const ID_COUNTER_FILE: &str = "IDCounter";

pub(crate) struct IdCounter {
    path: PathBuf,
}

impl IdCounter {
    pub fn for_user(user_dir: &Path) -> Self {
        IdCounter {
            path: user_dir.join(ID_COUNTER_FILE),
        }
    }

    pub fn create(&self) -> StoreResult<()> {
        write_atomic(&self.path, "0")
    }

    /// The next identifier that would be allocated, or `None` if the
    /// counter file does not exist.
    pub fn current(&self) -> StoreResult<Option<EventId>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        content
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StoreError::CorruptCounter(self.path.clone()))
    }

    /// Returns the current value and persists its successor.
    pub fn allocate(&self) -> StoreResult<Option<EventId>> {
        let Some(id) = self.current()? else {
            return Ok(None);
        };
        let next = id
            .checked_add(1)
            .ok_or_else(|| StoreError::CorruptCounter(self.path.clone()))?;

        write_atomic(&self.path, &next.to_string())?;
        Ok(Some(id))
    }
}
