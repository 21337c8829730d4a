//! User activity log entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::environment::UnknownVariant;

/// Kind of interaction recorded against a generated track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Generate,
    Play,
    Skip,
    Like,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Play => "play",
            Self::Skip => "skip",
            Self::Like => "like",
        }
    }

    /// Feedback with a skip reason counts as a skip, anything else as a like.
    pub fn from_feedback(skip_reason: Option<&str>) -> Self {
        match skip_reason {
            Some(reason) if !reason.trim().is_empty() => Self::Skip,
            _ => Self::Like,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Self::Generate),
            "play" => Ok(Self::Play),
            "skip" => Ok(Self::Skip),
            "like" => Ok(Self::Like),
            other => Err(UnknownVariant {
                kind: "activity type",
                value: other.to_owned(),
            }),
        }
    }
}
