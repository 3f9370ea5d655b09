//! Command domain model.
//!
//! A command is one instruction (action + parameter) addressed to a single
//! field controller. It starts `Pendente` and is acknowledged exactly once,
//! as either `Executado` or `Falha`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use shared::pagination::Page;
use shared::validation::{validate_action, validate_parameter};
use uuid::Uuid;
use validator::Validate;

/// Command lifecycle status.
///
/// Serialized with the controller protocol names (`Pendente`, `Executado`,
/// `Falha`). Parsing is case-insensitive and also accepts the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Executado")]
    Executed,
    #[serde(rename = "Falha")]
    Failed,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Executed => "Executado",
            Self::Failed => "Falha",
        }
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: CommandStatus) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommandStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendente" | "pending" => Ok(Self::Pending),
            "executado" | "executed" => Ok(Self::Executed),
            "falha" | "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid command status: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for CommandStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A command addressed to one controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Command {
    pub id: Uuid,
    pub controller_id: Uuid,
    pub action: String,
    pub parameter: String,
    pub status: CommandStatus,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl Command {
    pub fn is_pending(&self) -> bool {
        self.status == CommandStatus::Pending
    }

    /// Checks the record-level invariants: `executed_at` is present exactly
    /// when the command is terminal, and never precedes `created_at`.
    pub fn invariant_violation(&self) -> Option<String> {
        match (self.status.is_terminal(), self.executed_at) {
            (true, None) => Some(format!(
                "command {} is {} but has no executed_at",
                self.id, self.status
            )),
            (false, Some(_)) => Some(format!(
                "command {} is pending but has executed_at set",
                self.id
            )),
            (true, Some(executed_at)) if executed_at < self.created_at => Some(format!(
                "command {} executed_at {} precedes created_at {}",
                self.id, executed_at, self.created_at
            )),
            _ => None,
        }
    }
}

/// Request to enqueue a command for a controller.
///
/// Field aliases accept the payloads older operator tooling sends.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EnqueueCommandRequest {
    #[serde(alias = "controlador_id")]
    pub controller_id: Uuid,

    #[serde(alias = "comando")]
    #[validate(custom(function = "validate_action"))]
    pub action: String,

    #[serde(alias = "param", default)]
    #[validate(custom(function = "validate_parameter"))]
    pub parameter: String,
}

/// Request to acknowledge (complete or fail) a pending command.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AcknowledgeCommandRequest {
    /// Outcome reported by the controller or operator
    pub status: Option<CommandStatus>,
    /// Completion time; defaults to the server time when omitted
    #[serde(alias = "timestamp_executado")]
    pub executed_at: Option<DateTime<Utc>>,
}

/// Paging query for command listings.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ListCommandsQuery {
    /// Number of commands to skip
    pub skip: Option<u32>,
    /// Maximum number of commands to return
    #[validate(range(max = 1000))]
    pub limit: Option<u32>,
}

/// Command listing response: one page plus the count of the whole query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommandListResponse {
    pub data: Vec<Command>,
    pub count: u64,
}

impl From<Page<Command>> for CommandListResponse {
    fn from(page: Page<Command>) -> Self {
        Self {
            data: page.items,
            count: page.total,
        }
    }
}

/// Response for a deleted command.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteCommandResponse {
    pub message: String,
}

impl DeleteCommandResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Command deleted successfully".to_string(),
        }
    }
}
