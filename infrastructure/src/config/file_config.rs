//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use crate::notification::DEFAULT_CHANNEL_CAPACITY;
use chamber_domain::{Member, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("notifications.channel_capacity cannot be 0")]
    InvalidChannelCapacity,

    #[error("member id cannot be empty")]
    EmptyMemberId,

    #[error("member id '{0}' is listed more than once")]
    DuplicateMemberId(String),
}

/// Where chamber state is kept (`[storage]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// JSON snapshot of sessions, initiatives and votes; in-memory when unset
    pub snapshot_path: Option<String>,
    /// JSONL audit trail; in-memory when unset
    pub audit_log_path: Option<String>,
}

/// Real-time notification settings (`[notifications]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    /// Broadcast buffer size per subscriber
    pub channel_capacity: usize,
    /// Also write every notification to the operation log
    pub trace_events: bool,
}

impl Default for FileNotificationsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            trace_events: true,
        }
    }
}

/// Operation log settings (`[logging]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also append the operation log to this file
    pub file: Option<String>,
}

/// Output format selectable from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    #[default]
    Text,
    Json,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// One roster entry (`[[members]]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMemberConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FileMemberConfig {
    pub fn to_member(&self) -> Member {
        let mut member = Member::new(self.id.trim(), self.name.trim(), self.role);
        if let Some(party) = &self.party {
            member = member.with_party(party.clone());
        }
        if !self.active {
            member = member.inactive();
        }
        member
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub storage: FileStorageConfig,
    pub notifications: FileNotificationsConfig,
    pub logging: FileLoggingConfig,
    pub output: FileOutputConfig,
    pub members: Vec<FileMemberConfig>,
}

impl FileConfig {
    /// Roster declared in the config file
    pub fn roster(&self) -> Vec<Member> {
        self.members.iter().map(FileMemberConfig::to_member).collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.notifications.channel_capacity == 0 {
            return Err(ConfigValidationError::InvalidChannelCapacity);
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            let id = member.id.trim();
            if id.is_empty() {
                return Err(ConfigValidationError::EmptyMemberId);
            }
            if !seen.insert(id) {
                return Err(ConfigValidationError::DuplicateMemberId(id.to_string()));
            }
        }

        Ok(())
    }
}
