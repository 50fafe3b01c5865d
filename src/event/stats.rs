//! Stats event payloads
//!
//! Tagged variants for the stats endpoint. Each carries an optional
//! integer value (score, streak length, new rating) that is omitted from
//! the JSON when absent.

use serde::{Deserialize, Serialize};

/// A stats state-change event delivered to a user's stats stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatsEvent {
    /// A quiz was scored; value is the score
    QuizCompleted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
    },
    /// An achievement was unlocked; value is the achievement id
    AchievementGranted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
    },
    /// Daily streak changed; value is the new streak length
    StreakUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
    },
    /// Elo rating changed; value is the new rating
    EloUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
    },
    /// Medal counts changed
    MedalsUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i64>,
    },
    /// Synthetic connect event: the client should refetch its stats view
    Refresh,
}

impl StatsEvent {
    /// Create a quiz-completed event with a score
    pub fn quiz_completed(value: impl Into<Option<i64>>) -> Self {
        StatsEvent::QuizCompleted {
            value: value.into(),
        }
    }

    /// Create an achievement-granted event
    pub fn achievement_granted(value: impl Into<Option<i64>>) -> Self {
        StatsEvent::AchievementGranted {
            value: value.into(),
        }
    }

    /// Create a streak-updated event
    pub fn streak_updated(value: impl Into<Option<i64>>) -> Self {
        StatsEvent::StreakUpdated {
            value: value.into(),
        }
    }

    /// Create an elo-updated event
    pub fn elo_updated(value: impl Into<Option<i64>>) -> Self {
        StatsEvent::EloUpdated {
            value: value.into(),
        }
    }

    /// Create a medals-updated event
    pub fn medals_updated(value: impl Into<Option<i64>>) -> Self {
        StatsEvent::MedalsUpdated {
            value: value.into(),
        }
    }
}
