use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::role::Role;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// String key-value persistence backing a session.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String);
    fn remove_item(&mut self, key: &str);
}

/// Backend-issued user identifier. The backend may send either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

/// Profile snapshot captured at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn write(&mut self, token: &str, user: &UserProfile) {
        self.storage.set_item(TOKEN_KEY, token.to_string());
        match serde_json::to_string(user) {
            Ok(text) => self.storage.set_item(USER_KEY, text),
            Err(e) => tracing::error!("Failed to serialize user profile: {e}"),
        }
    }

    /// Read the stored session. A user entry that does not parse is
    /// reported as absent.
    pub fn read(&self) -> Session {
        let user = self.storage.get_item(USER_KEY).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| tracing::debug!("Ignoring malformed stored user: {e}"))
                .ok()
        });

        Session {
            token: self.token(),
            user,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get_item(TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn clear(&mut self) {
        self.storage.remove_item(TOKEN_KEY);
        self.storage.remove_item(USER_KEY);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// In-process storage, used by tools and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
