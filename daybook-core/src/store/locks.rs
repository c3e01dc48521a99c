//! In-process exclusive sections keyed by user name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

#[derive(Default)]
pub(crate) struct UserLocks {
    /// Serializes creation and renaming of namespaces
    accounts: Mutex<()>,
    users: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn accounts(&self) -> MutexGuard<'_, ()> {
        self.accounts.lock()
    }

    /// The lock guarding one user's counter and credential record.
    pub fn user(&self, name: &str) -> Arc<Mutex<()>> {
        self.users.lock().entry(name.to_string()).or_default().clone()
    }
}
