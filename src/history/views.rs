//! Read-only view objects handed to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{MatchWithSnapshot, Player, RankSnapshot};
use crate::rank::{QueueType, rank_label};

/// How the match data behind a response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// The store already held the upstream's latest match.
    Fresh,
    /// New matches were pulled from the upstream during this request.
    Refreshed,
    /// The upstream could not be reached; stored data only.
    Cached,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub puuid: String,
    pub riot_id: String,
    pub game_name: String,
    pub tag_line: String,
    pub platform: String,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            puuid: player.puuid.clone(),
            riot_id: player.riot_id(),
            game_name: player.game_name.clone(),
            tag_line: player.tag_line.clone(),
            platform: player.platform.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub match_id: String,
    pub champion_id: i64,
    pub champion_name: String,
    pub team_position: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub kda: f64,
    pub duration_secs: i64,
    pub ended_at: Option<DateTime<Utc>>,
    pub queue_id: i32,
    pub queue: Option<QueueType>,
    pub approx_lp: Option<i32>,
    pub tier: Option<String>,
    pub division: Option<String>,
    pub rank_label: Option<String>,
    pub lp_change: Option<i32>,
}

impl From<MatchWithSnapshot> for MatchView {
    fn from(row: MatchWithSnapshot) -> Self {
        let m = row.record;
        let rank_label = m
            .tier_at_match
            .as_deref()
            .map(|tier| rank_label(tier, m.division_at_match.as_deref()));

        Self {
            kda: kda(m.kills, m.deaths, m.assists),
            ended_at: m.ended_at.and_then(|t| DateTime::from_timestamp(t, 0)),
            queue: QueueType::ranked_from_queue_id(m.queue_id),
            match_id: m.match_id,
            champion_id: m.champion_id,
            champion_name: m.champion_name,
            team_position: m.team_position,
            win: m.win,
            kills: m.kills,
            deaths: m.deaths,
            assists: m.assists,
            duration_secs: m.duration_secs,
            queue_id: m.queue_id,
            approx_lp: m.approx_lp,
            tier: m.tier_at_match,
            division: m.division_at_match,
            rank_label,
            lp_change: row.lp_change,
        }
    }
}

/// (kills + assists) / deaths, with a deathless game counting deaths as one.
pub fn kda(kills: i32, deaths: i32, assists: i32) -> f64 {
    let ratio = f64::from(kills + assists) / f64::from(deaths.max(1));
    (ratio * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchPage {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub freshness: Freshness,
    pub matches: Vec<MatchView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankHistoryPoint {
    pub date: Option<DateTime<Utc>>,
    pub match_id: Option<String>,
    pub tier: String,
    pub division: Option<String>,
    pub league_points: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
    pub label: String,
    pub win_rate: Option<f64>,
    pub lp_change: Option<i32>,
}

impl From<RankSnapshot> for RankHistoryPoint {
    fn from(s: RankSnapshot) -> Self {
        Self {
            date: DateTime::from_timestamp(s.taken_at, 0),
            label: rank_label(&s.tier, s.division.as_deref()),
            win_rate: win_rate(s.wins, s.losses),
            match_id: s.match_id,
            tier: s.tier,
            division: s.division,
            league_points: s.league_points,
            wins: s.wins,
            losses: s.losses,
            lp_change: s.lp_change,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankHistory {
    pub queue: QueueType,
    pub freshness: Freshness,
    pub points: Vec<RankHistoryPoint>,
}

/// Win percentage rounded to one decimal; `None` without games.
pub fn win_rate(wins: Option<i32>, losses: Option<i32>) -> Option<f64> {
    let (wins, losses) = (wins?, losses?);
    let games = wins + losses;
    if games <= 0 {
        return None;
    }
    let rate = f64::from(wins) * 100.0 / f64::from(games);
    Some((rate * 10.0).round() / 10.0)
}

/// Where the dashboard's rank or champion figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Upstream,
    Cache,
    MostPlayed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentRankView {
    pub label: String,
    pub league_points: i32,
    pub source: Source,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteChampion {
    pub champion_id: i64,
    pub champion_name: Option<String>,
    pub mastery_points: Option<i64>,
    pub games: Option<i64>,
    pub source: Source,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub player: PlayerView,
    pub freshness: Freshness,
    pub current_rank: Option<CurrentRankView>,
    pub lp_last_7_days: i32,
    pub lp_counted_matches: usize,
    pub main_role: Option<String>,
    pub favorite_champion: Option<FavoriteChampion>,
}
