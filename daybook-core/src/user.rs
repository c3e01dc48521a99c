//! User credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A calendar user. The name doubles as the partition key of the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl User {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        User {
            id: None,
            name: name.into(),
            password: password.into(),
        }
    }

    /// Same user under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        User {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Same user with a different password.
    pub fn with_password(&self, password: impl Into<String>) -> Self {
        User {
            password: password.into(),
            ..self.clone()
        }
    }

    /// A name must be usable as a single directory name and as the user
    /// part of Basic credentials.
    pub fn validate_name(name: &str) -> StoreResult<()> {
        let valid = !name.is_empty()
            && name.trim() == name
            && !name.starts_with('.')
            && !name.contains(['/', '\\', '\0', ':']);

        if valid {
            Ok(())
        } else {
            Err(StoreError::InvalidUserName(name.to_string()))
        }
    }
}
