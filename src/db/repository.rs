use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::models::{Player, RankInfo};
use crate::error::AppError;
use crate::riot::Platform;

const PLAYER_COLUMN_NAMES: [&str; 15] = [
    "id",
    "puuid",
    "game_name",
    "tag_line",
    "platform",
    "last_rank_solo_tier",
    "last_rank_solo_division",
    "last_rank_solo_lp",
    "last_rank_solo_wins",
    "last_rank_solo_losses",
    "last_rank_flex_tier",
    "last_rank_flex_division",
    "last_rank_flex_lp",
    "last_rank_flex_wins",
    "last_rank_flex_losses",
];

fn player_columns() -> String {
    PLAYER_COLUMN_NAMES.join(", ")
}

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, AppError> {
        Ok(self.pool.acquire().await?)
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.pool.begin().await?)
    }

    // === Player operations ===

    pub async fn register_player(
        &self,
        puuid: &str,
        game_name: &str,
        tag_line: &str,
        platform: Platform,
    ) -> Result<Player, AppError> {
        let columns = player_columns();
        let query = format!(
            r#"
            INSERT INTO players (puuid, game_name, tag_line, platform)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(puuid) DO UPDATE SET
                game_name = excluded.game_name,
                tag_line = excluded.tag_line,
                platform = excluded.platform
            RETURNING {columns}
            "#
        );

        let player = sqlx::query_as::<_, Player>(&query)
            .bind(puuid)
            .bind(game_name)
            .bind(tag_line)
            .bind(platform.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(player)
    }

    pub async fn get_player_by_puuid(&self, puuid: &str) -> Result<Option<Player>, AppError> {
        let columns = player_columns();
        let player = sqlx::query_as::<_, Player>(&format!(
            "SELECT {columns} FROM players WHERE puuid = ?"
        ))
        .bind(puuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(player)
    }

    pub async fn update_player_rank(
        &self,
        player_id: i64,
        solo: Option<&RankInfo>,
        flex: Option<&RankInfo>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE players SET
                last_rank_solo_tier = ?,
                last_rank_solo_division = ?,
                last_rank_solo_lp = ?,
                last_rank_solo_wins = ?,
                last_rank_solo_losses = ?,
                last_rank_flex_tier = ?,
                last_rank_flex_division = ?,
                last_rank_flex_lp = ?,
                last_rank_flex_wins = ?,
                last_rank_flex_losses = ?
            WHERE id = ?
            "#,
        )
        .bind(solo.map(|r| &r.tier))
        .bind(solo.and_then(|r| r.division.as_ref()))
        .bind(solo.map(|r| r.lp))
        .bind(solo.and_then(|r| r.wins))
        .bind(solo.and_then(|r| r.losses))
        .bind(flex.map(|r| &r.tier))
        .bind(flex.and_then(|r| r.division.as_ref()))
        .bind(flex.map(|r| r.lp))
        .bind(flex.and_then(|r| r.wins))
        .bind(flex.and_then(|r| r.losses))
        .bind(player_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
