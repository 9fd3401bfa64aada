use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A portal role. Parsed once when a profile enters the system and never
/// re-derived from free text afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Admin,
    SeniorLeader,
    Leader,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Lowercase and collapse `_`, `-` and whitespace runs into single spaces.
pub fn normalize_role(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::SeniorLeader, Role::Leader, Role::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SeniorLeader => "senior leader",
            Role::Leader => "leader",
            Role::Member => "member",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::SeniorLeader => "Senior Leader",
            Role::Leader => "Leader",
            Role::Member => "Member",
        }
    }

    /// URL prefix of the portal owned by this role.
    pub fn portal_prefix(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::SeniorLeader => "/senior-leader",
            Role::Leader => "/leader",
            Role::Member => "/member",
        }
    }

    pub fn home_path(&self) -> String {
        format!("{}/dashboard", self.portal_prefix())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_role(s).as_str() {
            "admin" => Ok(Role::Admin),
            "senior leader" => Ok(Role::SeniorLeader),
            "leader" => Ok(Role::Leader),
            "member" => Ok(Role::Member),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}
