//! Rank snapshot recorder: turns a reconstructed standing into an append-only snapshot.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::db::{NewSnapshot, RankSnapshot, snapshots};
use crate::error::AppError;
use crate::rank::QueueType;
use crate::rank::trajectory::RankState;

/// The match a snapshot is recorded for.
#[derive(Debug, Clone, Copy)]
pub struct Trigger<'a> {
    pub match_id: &'a str,
    pub queue_id: i32,
    pub ended_at: Option<i64>,
}

/// Standing to record. Every field may be unknown; a missing tier means unranked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub tier: Option<String>,
    pub division: Option<String>,
    pub league_points: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
}

impl From<&RankState> for Observation {
    fn from(state: &RankState) -> Self {
        Self {
            tier: Some(state.rung.tier.as_str().to_string()),
            division: state.rung.division.map(|d| d.as_str().to_string()),
            league_points: Some(state.league_points),
            wins: state.wins,
            losses: state.losses,
        }
    }
}

/// Write a snapshot for `trigger`, with its LP change against the previous
/// snapshot of the same queue.
///
/// Returns `None` without writing when the observation has no tier, or when a
/// snapshot already exists for this match.
pub async fn record(
    conn: &mut SqliteConnection,
    player_id: i64,
    trigger: Trigger<'_>,
    observation: &Observation,
) -> Result<Option<RankSnapshot>, AppError> {
    let Some(tier) = observation.tier.clone() else {
        debug!(match_id = trigger.match_id, "🗄️ Unranked match, no snapshot");
        return Ok(None);
    };

    let queue_type = QueueType::from_queue_id(trigger.queue_id);
    let taken_at = trigger.ended_at.unwrap_or_else(|| Utc::now().timestamp());

    let previous = snapshots::latest_before(&mut *conn, player_id, queue_type, taken_at).await?;
    let lp_change = match (
        observation.league_points,
        previous.and_then(|p| p.league_points),
    ) {
        (Some(current), Some(previous)) => Some(current - previous),
        _ => None,
    };

    let snapshot = snapshots::insert(
        &mut *conn,
        &NewSnapshot {
            player_id,
            match_id: Some(trigger.match_id.to_string()),
            queue_type,
            taken_at,
            tier,
            division: observation.division.clone(),
            league_points: observation.league_points,
            wins: observation.wins,
            losses: observation.losses,
            lp_change,
        },
    )
    .await?;

    if let Some(snapshot) = &snapshot {
        debug!(
            match_id = trigger.match_id,
            queue = %queue_type,
            lp = ?snapshot.league_points,
            lp_change = ?snapshot.lp_change,
            "🗄️ Snapshot recorded"
        );
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Repository, test_pool};
    use crate::riot::Platform;

    fn gold(lp: Option<i32>) -> Observation {
        Observation {
            tier: Some("GOLD".into()),
            division: Some("II".into()),
            league_points: lp,
            wins: Some(12),
            losses: Some(10),
        }
    }

    fn trigger(match_id: &str, queue_id: i32, ended_at: i64) -> Trigger<'_> {
        Trigger {
            match_id,
            queue_id,
            ended_at: Some(ended_at),
        }
    }

    async fn setup() -> (Repository, i64) {
        let repo = Repository::new(test_pool().await);
        let player = repo
            .register_player("puuid-1", "Game", "Tag", Platform::NA1)
            .await
            .unwrap();
        (repo, player.id)
    }

    #[tokio::test]
    async fn lp_change_is_relative_to_the_previous_snapshot() {
        let (repo, player_id) = setup().await;
        let mut conn = repo.acquire().await.unwrap();

        let first = record(&mut conn, player_id, trigger("m1", 420, 1_000), &gold(Some(50)))
            .await
            .unwrap()
            .unwrap();
        let second = record(&mut conn, player_id, trigger("m2", 420, 2_000), &gold(Some(65)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.lp_change, None);
        assert_eq!(second.lp_change, Some(15));
        assert_eq!(second.queue_type, "RANKED_SOLO_5x5");
    }

    #[tokio::test]
    async fn unknown_previous_lp_leaves_the_change_empty() {
        let (repo, player_id) = setup().await;
        let mut conn = repo.acquire().await.unwrap();

        record(&mut conn, player_id, trigger("m1", 420, 1_000), &gold(None))
            .await
            .unwrap();
        let second = record(&mut conn, player_id, trigger("m2", 420, 2_000), &gold(Some(65)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(second.lp_change, None);
    }

    #[tokio::test]
    async fn unranked_observation_writes_nothing() {
        let (repo, player_id) = setup().await;
        let mut conn = repo.acquire().await.unwrap();

        let skipped = record(
            &mut conn,
            player_id,
            trigger("m1", 420, 1_000),
            &Observation::default(),
        )
        .await
        .unwrap();

        assert!(skipped.is_none());
        assert_eq!(snapshots::count(&mut conn, player_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn queues_progress_independently() {
        let (repo, player_id) = setup().await;
        let mut conn = repo.acquire().await.unwrap();

        record(&mut conn, player_id, trigger("m1", 420, 1_000), &gold(Some(50)))
            .await
            .unwrap();
        let flex = record(&mut conn, player_id, trigger("m2", 440, 2_000), &gold(Some(80)))
            .await
            .unwrap()
            .unwrap();
        // Unknown queues are filed under solo/duo.
        let other = record(&mut conn, player_id, trigger("m3", 450, 3_000), &gold(Some(40)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(flex.queue_type, "RANKED_FLEX_SR");
        assert_eq!(flex.lp_change, None);
        assert_eq!(other.queue_type, "RANKED_SOLO_5x5");
        assert_eq!(other.lp_change, Some(-10));
    }

    #[tokio::test]
    async fn missing_end_time_uses_the_current_time() {
        let (repo, player_id) = setup().await;
        let mut conn = repo.acquire().await.unwrap();
        let before = Utc::now().timestamp();

        let snapshot = record(
            &mut conn,
            player_id,
            Trigger {
                match_id: "m1",
                queue_id: 420,
                ended_at: None,
            },
            &gold(Some(10)),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(snapshot.taken_at >= before);
    }
}
