//! Leaderboard ranking
//!
//! Sorts best records by score, highest first, and numbers them 1..N.
//! The sort is stable, so equal scores keep the table's first-seen order and
//! still get distinct consecutive ranks.

use types::leaderboard::{LeaderboardEntry, LeaderboardSnapshot};
use types::record::Record;

use crate::dedup::BestRecordTable;

/// Build a snapshot from a deduplicated table.
pub fn rank(table: &BestRecordTable) -> LeaderboardSnapshot {
    let mut ordered: Vec<&Record> = table.iter().collect();
    ordered.sort_by(|a, b| b.score.cmp(&a.score));

    let leaderboard: Vec<LeaderboardEntry> = ordered
        .into_iter()
        .enumerate()
        .map(|(index, record)| LeaderboardEntry {
            rank: index + 1,
            player: record.identity.clone(),
            score: record.score.to_decimal_string(),
            play_time: record.duration.to_decimal_string(),
        })
        .collect();

    LeaderboardSnapshot {
        total_players: leaderboard.len(),
        leaderboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::best_by_identity;
    use types::uint::Uint256;

    fn rec(identity: &str, score: u64, duration: u64) -> Record {
        Record::new(identity, Uint256::from(score), Uint256::from(duration))
    }

    #[test]
    fn test_rank_descending() {
        let table = best_by_identity(vec![rec("A", 10, 1), rec("B", 30, 2), rec("C", 20, 3)]);
        let snapshot = rank(&table);

        let players: Vec<&str> = snapshot.leaderboard.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(players, vec!["B", "C", "A"]);
        assert_eq!(snapshot.total_players, 3);
        assert_eq!(snapshot.leaderboard[0].rank, 1);
        assert_eq!(snapshot.leaderboard[2].rank, 3);
        assert_eq!(snapshot.leaderboard[0].score, "30");
        assert_eq!(snapshot.leaderboard[0].play_time, "2");
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let table = best_by_identity(vec![rec("A", 100, 1), rec("B", 100, 2)]);
        let snapshot = rank(&table);

        assert_eq!(snapshot.leaderboard[0].player, "A");
        assert_eq!(snapshot.leaderboard[0].rank, 1);
        assert_eq!(snapshot.leaderboard[1].player, "B");
        assert_eq!(snapshot.leaderboard[1].rank, 2);
        assert!(snapshot.leaderboard.iter().all(|e| e.score == "100"));
    }

    #[test]
    fn test_empty_table() {
        let snapshot = rank(&BestRecordTable::new());
        assert_eq!(snapshot, LeaderboardSnapshot::empty());
        assert_eq!(snapshot.total_players, 0);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let table = best_by_identity(vec![rec("A", 5, 1), rec("B", 7, 1), rec("C", 5, 1)]);
        assert_eq!(rank(&table), rank(&table));
    }

    #[test]
    fn test_large_scores_render_exactly() {
        let big = Uint256::parse("123456789012345678901234567890").unwrap();
        let table = best_by_identity(vec![Record::new("A", big, Uint256::ZERO)]);
        assert_eq!(rank(&table).leaderboard[0].score, "123456789012345678901234567890");
    }
}
