//! Leaderboard snapshot types
//!
//! Scores and durations are carried as decimal strings so clients never see a
//! rounded double.

use serde::{Deserialize, Serialize};

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position, dense and unique.
    pub rank: usize,
    pub player: String,
    pub score: String,
    pub play_time: String,
}

/// Ordered leaderboard, best score first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub total_players: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl LeaderboardSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_shape() {
        let json = serde_json::to_value(LeaderboardSnapshot::empty()).unwrap();
        assert_eq!(json, serde_json::json!({"totalPlayers": 0, "leaderboard": []}));
    }

    #[test]
    fn test_entry_camel_case() {
        let entry = LeaderboardEntry {
            rank: 1,
            player: "0xabc".to_string(),
            score: "100".to_string(),
            play_time: "30".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["playTime"], "30");
        assert_eq!(json["rank"], 1);
    }
}
