#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lptrail::db::{self, Repository};
use lptrail::error::UpstreamError;
use lptrail::history::{HistoryService, HistorySettings};
use lptrail::rank::trajectory::LpModel;
use lptrail::riot::{
    AccountDto, ChampionMasteryDto, GameDataSource, LeagueEntryDto, MatchDto, Platform, PlayerKey,
};
use serde_json::json;

pub const PUUID: &str = "puuid-1";

/// In-process upstream holding a newest-first match list, with call counters.
#[derive(Default)]
pub struct FakeSource {
    matches: Mutex<Vec<MatchDto>>,
    ranks: Mutex<Vec<LeagueEntryDto>>,
    top_champion: Mutex<Option<ChampionMasteryDto>>,
    failing_details: Mutex<HashSet<String>>,
    pub unavailable: AtomicBool,
    pub not_found: AtomicBool,
    pub id_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub rank_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add a game on top of the history.
    pub fn play(&self, game: MatchDto) {
        self.matches.lock().unwrap().insert(0, game);
    }

    pub fn set_ranks(&self, entries: Vec<LeagueEntryDto>) {
        *self.ranks.lock().unwrap() = entries;
    }

    pub fn set_top_champion(&self, mastery: Option<ChampionMasteryDto>) {
        *self.top_champion.lock().unwrap() = mastery;
    }

    pub fn fail_detail(&self, match_id: &str) {
        self.failing_details
            .lock()
            .unwrap()
            .insert(match_id.to_string());
    }

    pub fn heal_details(&self) {
        self.failing_details.lock().unwrap().clear();
    }

    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    pub fn set_not_found(&self, value: bool) {
        self.not_found.store(value, Ordering::SeqCst);
    }

    pub fn details(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn id_requests(&self) -> usize {
        self.id_calls.load(Ordering::SeqCst)
    }

    pub fn rank_requests(&self) -> usize {
        self.rank_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), UpstreamError> {
        if self.not_found.load(Ordering::SeqCst) {
            return Err(UpstreamError::NotFound);
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(UpstreamError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GameDataSource for FakeSource {
    async fn fetch_account(
        &self,
        _platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, UpstreamError> {
        self.check()?;
        Ok(serde_json::from_value(json!({
            "puuid": PUUID,
            "gameName": game_name,
            "tagLine": tag_line,
        }))
        .unwrap())
    }

    async fn fetch_recent_match_ids(
        &self,
        _player: &PlayerKey,
        offset: u32,
        count: u32,
    ) -> Result<Vec<String>, UpstreamError> {
        self.id_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .matches
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(count as usize)
            .map(|m| m.metadata.match_id.clone())
            .collect())
    }

    async fn fetch_match_detail(
        &self,
        _player: &PlayerKey,
        match_id: &str,
    ) -> Result<MatchDto, UpstreamError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if self.failing_details.lock().unwrap().contains(match_id) {
            return Err(UpstreamError::Unavailable("timeout".into()));
        }
        self.matches
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.metadata.match_id == match_id)
            .cloned()
            .ok_or(UpstreamError::NotFound)
    }

    async fn fetch_current_rank(
        &self,
        _player: &PlayerKey,
    ) -> Result<Vec<LeagueEntryDto>, UpstreamError> {
        self.rank_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.ranks.lock().unwrap().clone())
    }

    async fn fetch_top_champion(
        &self,
        _player: &PlayerKey,
    ) -> Result<Option<ChampionMasteryDto>, UpstreamError> {
        self.check()?;
        Ok(self.top_champion.lock().unwrap().clone())
    }
}

pub fn game(match_id: &str, queue_id: i32, win: bool, position: &str, ended_at: i64) -> MatchDto {
    serde_json::from_value(json!({
        "metadata": { "matchId": match_id },
        "info": {
            "gameCreation": (ended_at - 1_800) * 1_000,
            "gameStartTimestamp": (ended_at - 1_800) * 1_000,
            "gameEndTimestamp": ended_at * 1_000,
            "gameDuration": 1_800,
            "queueId": queue_id,
            "participants": [
                {
                    "puuid": PUUID,
                    "championId": 99,
                    "championName": "Lux",
                    "teamPosition": position,
                    "kills": 5,
                    "deaths": 2,
                    "assists": 7,
                    "win": win
                },
                {
                    "puuid": "someone-else",
                    "championId": 103,
                    "championName": "Ahri",
                    "teamPosition": "MIDDLE",
                    "kills": 2,
                    "deaths": 5,
                    "assists": 1,
                    "win": !win
                }
            ]
        }
    }))
    .unwrap()
}

pub fn ranked(match_id: &str, win: bool, ended_at: i64) -> MatchDto {
    game(match_id, 420, win, "MIDDLE", ended_at)
}

pub fn league_entry(queue: &str, tier: &str, rank: &str, lp: i32, wins: i32, losses: i32) -> LeagueEntryDto {
    serde_json::from_value(json!({
        "queueType": queue,
        "tier": tier,
        "rank": rank,
        "leaguePoints": lp,
        "wins": wins,
        "losses": losses,
    }))
    .unwrap()
}

pub fn solo(tier: &str, rank: &str, lp: i32, wins: i32, losses: i32) -> LeagueEntryDto {
    league_entry("RANKED_SOLO_5x5", tier, rank, lp, wins, losses)
}

pub fn mastery(champion_id: i64, points: i64) -> ChampionMasteryDto {
    serde_json::from_value(json!({
        "championId": champion_id,
        "championLevel": 7,
        "championPoints": points,
    }))
    .unwrap()
}

pub async fn service(source: Arc<FakeSource>) -> HistoryService {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    HistoryService::new(
        Repository::new(pool),
        source,
        LpModel::default(),
        HistorySettings::default(),
    )
}

/// A service with the fake player already registered.
pub async fn registered(source: Arc<FakeSource>) -> HistoryService {
    let service = service(source).await;
    service
        .register_player("Game", "Tag", Platform::EUW1)
        .await
        .unwrap();
    service
}
