//! Rank snapshot store: append-only point-in-time rank observations.

use sqlx::SqliteConnection;

use super::models::{NewSnapshot, RankSnapshot};
use crate::error::AppError;
use crate::rank::QueueType;

const SNAPSHOT_COLUMNS: &str = "id, player_id, match_id, queue_type, taken_at, tier, division, \
                                league_points, wins, losses, lp_change";

/// Most recent snapshot of a queue taken at or before `at`.
pub async fn latest_before(
    conn: &mut SqliteConnection,
    player_id: i64,
    queue: QueueType,
    at: i64,
) -> Result<Option<RankSnapshot>, AppError> {
    let snapshot = sqlx::query_as::<_, RankSnapshot>(&format!(
        r#"
        SELECT {SNAPSHOT_COLUMNS}
        FROM rank_snapshots
        WHERE player_id = ? AND queue_type = ? AND taken_at <= ?
        ORDER BY taken_at DESC, id DESC
        LIMIT 1
        "#
    ))
    .bind(player_id)
    .bind(queue.as_str())
    .bind(at)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(snapshot)
}

/// Append a snapshot. Returns `None` when one already exists for the same match.
pub async fn insert(
    conn: &mut SqliteConnection,
    new: &NewSnapshot,
) -> Result<Option<RankSnapshot>, AppError> {
    let snapshot = sqlx::query_as::<_, RankSnapshot>(&format!(
        r#"
        INSERT INTO rank_snapshots (
            player_id, match_id, queue_type, taken_at, tier, division,
            league_points, wins, losses, lp_change
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(player_id, match_id) DO NOTHING
        RETURNING {SNAPSHOT_COLUMNS}
        "#
    ))
    .bind(new.player_id)
    .bind(&new.match_id)
    .bind(new.queue_type.as_str())
    .bind(new.taken_at)
    .bind(&new.tier)
    .bind(&new.division)
    .bind(new.league_points)
    .bind(new.wins)
    .bind(new.losses)
    .bind(new.lp_change)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(snapshot)
}

pub async fn for_match(
    conn: &mut SqliteConnection,
    player_id: i64,
    match_id: &str,
) -> Result<Option<RankSnapshot>, AppError> {
    let snapshot = sqlx::query_as::<_, RankSnapshot>(&format!(
        "SELECT {SNAPSHOT_COLUMNS} FROM rank_snapshots WHERE player_id = ? AND match_id = ?"
    ))
    .bind(player_id)
    .bind(match_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(snapshot)
}

/// All snapshots of a queue, oldest first.
pub async fn history(
    conn: &mut SqliteConnection,
    player_id: i64,
    queue: QueueType,
) -> Result<Vec<RankSnapshot>, AppError> {
    let snapshots = sqlx::query_as::<_, RankSnapshot>(&format!(
        r#"
        SELECT {SNAPSHOT_COLUMNS}
        FROM rank_snapshots
        WHERE player_id = ? AND queue_type = ?
        ORDER BY taken_at ASC, id ASC
        "#
    ))
    .bind(player_id)
    .bind(queue.as_str())
    .fetch_all(&mut *conn)
    .await?;
    Ok(snapshots)
}

pub async fn count(conn: &mut SqliteConnection, player_id: i64) -> Result<i64, AppError> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rank_snapshots WHERE player_id = ?")
        .bind(player_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Repository, test_pool};
    use crate::riot::Platform;

    fn snapshot(player_id: i64, match_id: &str, taken_at: i64, lp: i32) -> NewSnapshot {
        NewSnapshot {
            player_id,
            match_id: Some(match_id.to_string()),
            queue_type: QueueType::SoloDuo,
            taken_at,
            tier: "GOLD".into(),
            division: Some("II".into()),
            league_points: Some(lp),
            wins: Some(10),
            losses: Some(9),
            lp_change: None,
        }
    }

    #[tokio::test]
    async fn snapshots_are_ordered_by_time_per_queue() {
        let repo = Repository::new(test_pool().await);
        let player = repo
            .register_player("puuid-1", "Game", "Tag", Platform::EUW1)
            .await
            .unwrap();
        let mut conn = repo.acquire().await.unwrap();

        insert(&mut conn, &snapshot(player.id, "m2", 2_000, 40))
            .await
            .unwrap();
        insert(&mut conn, &snapshot(player.id, "m1", 1_000, 20))
            .await
            .unwrap();
        let mut flex = snapshot(player.id, "m3", 3_000, 70);
        flex.queue_type = QueueType::Flex;
        insert(&mut conn, &flex).await.unwrap();

        let solo = history(&mut conn, player.id, QueueType::SoloDuo)
            .await
            .unwrap();
        let ids: Vec<_> = solo.iter().filter_map(|s| s.match_id.as_deref()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);

        let prior = latest_before(&mut conn, player.id, QueueType::SoloDuo, 1_500)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prior.match_id.as_deref(), Some("m1"));

        let none = latest_before(&mut conn, player.id, QueueType::Flex, 2_999)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn second_snapshot_for_a_match_is_ignored() {
        let repo = Repository::new(test_pool().await);
        let player = repo
            .register_player("puuid-1", "Game", "Tag", Platform::EUW1)
            .await
            .unwrap();
        let mut conn = repo.acquire().await.unwrap();

        let first = insert(&mut conn, &snapshot(player.id, "m1", 1_000, 20))
            .await
            .unwrap();
        let second = insert(&mut conn, &snapshot(player.id, "m1", 1_000, 99))
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(count(&mut conn, player.id).await.unwrap(), 1);
        let stored = for_match(&mut conn, player.id, "m1").await.unwrap().unwrap();
        assert_eq!(stored.league_points, Some(20));
    }
}
