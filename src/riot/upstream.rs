//! Narrow view of the game-data upstream consumed by the history engine.
//!
//! [`RiotClient`] is the production implementation; tests plug in fakes.

use async_trait::async_trait;

use super::client::RiotClient;
use super::region::Platform;
use super::types::{AccountDto, ChampionMasteryDto, LeagueEntryDto, MatchDto};
use crate::error::UpstreamError;

/// What the upstream needs to find a player: its PUUID and home platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerKey {
    pub puuid: String,
    pub platform: Platform,
}

impl PlayerKey {
    pub fn new(puuid: impl Into<String>, platform: Platform) -> Self {
        Self {
            puuid: puuid.into(),
            platform,
        }
    }
}

#[async_trait]
pub trait GameDataSource: Send + Sync {
    async fn fetch_account(
        &self,
        platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, UpstreamError>;

    /// Match identifiers, newest first.
    async fn fetch_recent_match_ids(
        &self,
        player: &PlayerKey,
        offset: u32,
        count: u32,
    ) -> Result<Vec<String>, UpstreamError>;

    async fn fetch_match_detail(
        &self,
        player: &PlayerKey,
        match_id: &str,
    ) -> Result<MatchDto, UpstreamError>;

    /// One entry per ranked queue the player is placed in; empty when unranked.
    async fn fetch_current_rank(
        &self,
        player: &PlayerKey,
    ) -> Result<Vec<LeagueEntryDto>, UpstreamError>;

    async fn fetch_top_champion(
        &self,
        player: &PlayerKey,
    ) -> Result<Option<ChampionMasteryDto>, UpstreamError>;
}

#[async_trait]
impl GameDataSource for RiotClient {
    async fn fetch_account(
        &self,
        platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, UpstreamError> {
        Ok(self
            .get_account_by_riot_id(platform.to_region(), game_name, tag_line)
            .await?)
    }

    async fn fetch_recent_match_ids(
        &self,
        player: &PlayerKey,
        offset: u32,
        count: u32,
    ) -> Result<Vec<String>, UpstreamError> {
        Ok(self
            .get_match_ids(player.platform.to_region(), &player.puuid, offset, count)
            .await?)
    }

    async fn fetch_match_detail(
        &self,
        player: &PlayerKey,
        match_id: &str,
    ) -> Result<MatchDto, UpstreamError> {
        Ok(self
            .get_match(player.platform.to_region(), match_id)
            .await?)
    }

    async fn fetch_current_rank(
        &self,
        player: &PlayerKey,
    ) -> Result<Vec<LeagueEntryDto>, UpstreamError> {
        Ok(self
            .get_league_entries_by_puuid(player.platform, &player.puuid)
            .await?)
    }

    async fn fetch_top_champion(
        &self,
        player: &PlayerKey,
    ) -> Result<Option<ChampionMasteryDto>, UpstreamError> {
        let masteries = self
            .get_top_champion_masteries(player.platform, &player.puuid, 1)
            .await?;
        Ok(masteries.into_iter().next())
    }
}
