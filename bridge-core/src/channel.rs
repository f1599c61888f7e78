//! Request discriminators selecting a backend.
//!
//! `channel` picks the messaging provider on `sendMessage`; `task` picks the
//! scheduled job on `scheduled-task`. Both are closed enums so an unhandled
//! variant is a compile error at the dispatch `match`, not a silent string
//! mismatch.

use std::str::FromStr;

/// Messaging provider selected by the `channel` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Telegram,
    Whatsapp,
}

/// The `channel` value named no known provider.
#[derive(Debug, thiserror::Error)]
#[error("unknown channel '{0}'")]
pub struct UnknownChannel(pub String);

impl Channel {
    /// The wire name of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Telegram => "telegram",
            Channel::Whatsapp => "whatsapp",
        }
    }
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telegram" => Ok(Channel::Telegram),
            "whatsapp" => Ok(Channel::Whatsapp),
            other => Err(UnknownChannel(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduled job selected by the `task` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    DailySummary,
}

/// The `task` value named no known scheduled job.
#[derive(Debug, thiserror::Error)]
#[error("unknown task '{0}'")]
pub struct UnknownTask(pub String);

impl Task {
    /// The wire name of the task.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Task::DailySummary => "daily-summary",
        }
    }
}

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily-summary" => Ok(Task::DailySummary),
            other => Err(UnknownTask(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
