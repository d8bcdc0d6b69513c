use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    puuid TEXT UNIQUE NOT NULL,
    game_name TEXT NOT NULL,
    tag_line TEXT NOT NULL,
    platform TEXT NOT NULL,
    last_rank_solo_tier TEXT,
    last_rank_solo_division TEXT,
    last_rank_solo_lp INTEGER,
    last_rank_solo_wins INTEGER,
    last_rank_solo_losses INTEGER,
    last_rank_flex_tier TEXT,
    last_rank_flex_division TEXT,
    last_rank_flex_lp INTEGER,
    last_rank_flex_wins INTEGER,
    last_rank_flex_losses INTEGER,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
);

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL,
    match_id TEXT NOT NULL,
    queue_id INTEGER NOT NULL,
    champion_id INTEGER NOT NULL,
    champion_name TEXT NOT NULL,
    team_position TEXT NOT NULL DEFAULT '',
    win INTEGER NOT NULL,
    kills INTEGER NOT NULL,
    deaths INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    duration_secs INTEGER NOT NULL,
    ended_at INTEGER,
    approx_lp INTEGER,
    tier_at_match TEXT,
    division_at_match TEXT,
    ingested_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE (player_id, match_id),
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS rank_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL,
    match_id TEXT,
    queue_type TEXT NOT NULL,
    taken_at INTEGER NOT NULL,
    tier TEXT NOT NULL,
    division TEXT,
    league_points INTEGER,
    wins INTEGER,
    losses INTEGER,
    lp_change INTEGER,
    UNIQUE (player_id, match_id),
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_players_puuid ON players(puuid);
CREATE INDEX IF NOT EXISTS idx_matches_player_time ON matches(player_id, ended_at);
CREATE INDEX IF NOT EXISTS idx_snapshots_player_queue_time
    ON rank_snapshots(player_id, queue_type, taken_at);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("🗄️ Database migrations completed");
    Ok(())
}
