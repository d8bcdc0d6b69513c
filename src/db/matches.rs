//! Match store: one row per (player, match), upserted by match identifier.

use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::models::{MatchRecord, MatchWithSnapshot, NewMatch, WalkRow};
use crate::error::AppError;
use crate::rank::trajectory::RankState;

const MATCH_COLUMN_NAMES: [&str; 16] = [
    "id",
    "player_id",
    "match_id",
    "queue_id",
    "champion_id",
    "champion_name",
    "team_position",
    "win",
    "kills",
    "deaths",
    "assists",
    "duration_secs",
    "ended_at",
    "approx_lp",
    "tier_at_match",
    "division_at_match",
];

fn match_columns(alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
    MATCH_COLUMN_NAMES
        .iter()
        .map(|col| format!("{prefix}{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Newest first; matches without an end time sort last.
const NEWEST_FIRST: &str = "m.ended_at IS NULL, m.ended_at DESC, m.id DESC";

/// Insert a match or refresh the upstream fields of an existing one.
///
/// Reconstructed rank fields are left untouched on conflict.
pub async fn upsert(conn: &mut SqliteConnection, new: &NewMatch) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO matches (
            player_id, match_id, queue_id, champion_id, champion_name, team_position,
            win, kills, deaths, assists, duration_secs, ended_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(player_id, match_id) DO UPDATE SET
            queue_id = excluded.queue_id,
            champion_id = excluded.champion_id,
            champion_name = excluded.champion_name,
            team_position = excluded.team_position,
            win = excluded.win,
            kills = excluded.kills,
            deaths = excluded.deaths,
            assists = excluded.assists,
            duration_secs = excluded.duration_secs,
            ended_at = excluded.ended_at
        "#,
    )
    .bind(new.player_id)
    .bind(&new.match_id)
    .bind(new.queue_id)
    .bind(new.champion_id)
    .bind(&new.champion_name)
    .bind(&new.team_position)
    .bind(new.win)
    .bind(new.kills)
    .bind(new.deaths)
    .bind(new.assists)
    .bind(new.duration_secs)
    .bind(new.ended_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Which of `match_ids` are already stored for the player, in a single query.
pub async fn existing_ids(
    conn: &mut SqliteConnection,
    player_id: i64,
    match_ids: &[String],
) -> Result<HashSet<String>, AppError> {
    if match_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new("SELECT match_id FROM matches WHERE player_id = ");
    query.push_bind(player_id).push(" AND match_id IN (");
    let mut ids = query.separated(", ");
    for match_id in match_ids {
        ids.push_bind(match_id);
    }
    ids.push_unseparated(")");

    let found = query
        .build_query_scalar::<String>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(found.into_iter().collect())
}

pub async fn latest_match_id(
    conn: &mut SqliteConnection,
    player_id: i64,
) -> Result<Option<String>, AppError> {
    let id = sqlx::query_scalar::<_, String>(&format!(
        "SELECT m.match_id FROM matches m WHERE m.player_id = ? ORDER BY {NEWEST_FIRST} LIMIT 1"
    ))
    .bind(player_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn find(
    conn: &mut SqliteConnection,
    player_id: i64,
    match_id: &str,
) -> Result<Option<MatchRecord>, AppError> {
    let columns = match_columns(None);
    let record = sqlx::query_as::<_, MatchRecord>(&format!(
        "SELECT {columns} FROM matches WHERE player_id = ? AND match_id = ?"
    ))
    .bind(player_id)
    .bind(match_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(record)
}

/// Number of stored matches, optionally restricted to one queue.
pub async fn count(
    conn: &mut SqliteConnection,
    player_id: i64,
    queue_id: Option<i32>,
) -> Result<i64, AppError> {
    let n = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM matches WHERE player_id = ? AND (? IS NULL OR queue_id = ?)",
    )
    .bind(player_id)
    .bind(queue_id)
    .bind(queue_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(n)
}

/// A page of matches, newest first, each with the snapshot recorded for it.
pub async fn page(
    conn: &mut SqliteConnection,
    player_id: i64,
    queue_id: Option<i32>,
    offset: u32,
    limit: u32,
) -> Result<Vec<MatchWithSnapshot>, AppError> {
    let columns = match_columns(Some("m"));
    let rows = sqlx::query_as::<_, MatchWithSnapshot>(&format!(
        r#"
        SELECT {columns}, s.id AS snapshot_id, s.lp_change
        FROM matches m
        LEFT JOIN rank_snapshots s ON s.player_id = m.player_id AND s.match_id = m.match_id
        WHERE m.player_id = ? AND (? IS NULL OR m.queue_id = ?)
        ORDER BY {NEWEST_FIRST}
        LIMIT ? OFFSET ?
        "#
    ))
    .bind(player_id)
    .bind(queue_id)
    .bind(queue_id)
    .bind(limit as i64)
    .bind(offset as i64)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Every stored match of one queue, newest first, as input to the backward walk.
pub async fn walk_rows(
    conn: &mut SqliteConnection,
    player_id: i64,
    queue_id: i32,
) -> Result<Vec<WalkRow>, AppError> {
    let rows = sqlx::query_as::<_, WalkRow>(&format!(
        r#"
        SELECT m.match_id, m.win, m.approx_lp, m.tier_at_match, m.division_at_match, m.ended_at,
               s.wins AS snapshot_wins, s.losses AS snapshot_losses
        FROM matches m
        LEFT JOIN rank_snapshots s ON s.player_id = m.player_id AND s.match_id = m.match_id
        WHERE m.player_id = ? AND m.queue_id = ?
        ORDER BY {NEWEST_FIRST}
        "#
    ))
    .bind(player_id)
    .bind(queue_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn set_rank_at_match(
    conn: &mut SqliteConnection,
    player_id: i64,
    match_id: &str,
    state: &RankState,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE matches SET
            approx_lp = ?,
            tier_at_match = ?,
            division_at_match = ?
        WHERE player_id = ? AND match_id = ?
        "#,
    )
    .bind(state.league_points)
    .bind(state.rung.tier.as_str())
    .bind(state.rung.division.map(|d| d.as_str()))
    .bind(player_id)
    .bind(match_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Matches of one queue that ended at or after `since`, oldest first.
pub async fn since(
    conn: &mut SqliteConnection,
    player_id: i64,
    queue_id: i32,
    since: i64,
) -> Result<Vec<MatchWithSnapshot>, AppError> {
    let columns = match_columns(Some("m"));
    let rows = sqlx::query_as::<_, MatchWithSnapshot>(&format!(
        r#"
        SELECT {columns}, s.id AS snapshot_id, s.lp_change
        FROM matches m
        LEFT JOIN rank_snapshots s ON s.player_id = m.player_id AND s.match_id = m.match_id
        WHERE m.player_id = ? AND m.queue_id = ? AND m.ended_at >= ?
        ORDER BY m.ended_at ASC, m.id ASC
        "#
    ))
    .bind(player_id)
    .bind(queue_id)
    .bind(since)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Team positions of the most recent matches, newest first.
pub async fn recent_positions(
    conn: &mut SqliteConnection,
    player_id: i64,
    limit: u32,
) -> Result<Vec<String>, AppError> {
    let positions = sqlx::query_scalar::<_, String>(&format!(
        "SELECT m.team_position FROM matches m WHERE m.player_id = ? ORDER BY {NEWEST_FIRST} LIMIT ?"
    ))
    .bind(player_id)
    .bind(limit as i64)
    .fetch_all(&mut *conn)
    .await?;
    Ok(positions)
}

/// Name under which a champion was last played, for resolving mastery entries.
pub async fn champion_name(
    conn: &mut SqliteConnection,
    player_id: i64,
    champion_id: i64,
) -> Result<Option<String>, AppError> {
    let name = sqlx::query_scalar::<_, String>(&format!(
        "SELECT m.champion_name FROM matches m WHERE m.player_id = ? AND m.champion_id = ? \
         ORDER BY {NEWEST_FIRST} LIMIT 1"
    ))
    .bind(player_id)
    .bind(champion_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(name)
}

/// The champion with the most stored games, the most recently played winning ties.
pub async fn most_played_champion(
    conn: &mut SqliteConnection,
    player_id: i64,
) -> Result<Option<(i64, String, i64)>, AppError> {
    let row = sqlx::query_as::<_, (i64, String, i64)>(
        r#"
        SELECT champion_id, champion_name, COUNT(*) AS games
        FROM matches
        WHERE player_id = ?
        GROUP BY champion_id, champion_name
        ORDER BY games DESC, MAX(ended_at) DESC
        LIMIT 1
        "#,
    )
    .bind(player_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}
