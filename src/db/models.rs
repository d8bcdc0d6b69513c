use sqlx::FromRow;

use crate::error::AppError;
use crate::rank::trajectory::RankState;
use crate::rank::{QueueType, Rung};
use crate::riot::{Platform, PlayerKey};

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: i64,
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub platform: String,
    pub last_rank_solo_tier: Option<String>,
    pub last_rank_solo_division: Option<String>,
    pub last_rank_solo_lp: Option<i32>,
    pub last_rank_solo_wins: Option<i32>,
    pub last_rank_solo_losses: Option<i32>,
    pub last_rank_flex_tier: Option<String>,
    pub last_rank_flex_division: Option<String>,
    pub last_rank_flex_lp: Option<i32>,
    pub last_rank_flex_wins: Option<i32>,
    pub last_rank_flex_losses: Option<i32>,
}

impl Player {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    pub fn platform(&self) -> Result<Platform, AppError> {
        self.platform.parse()
    }

    pub fn key(&self) -> Result<PlayerKey, AppError> {
        Ok(PlayerKey::new(self.puuid.clone(), self.platform()?))
    }

    pub fn rank_info(&self, queue: QueueType) -> Option<RankInfo> {
        let (tier, division, lp, wins, losses) = match queue {
            QueueType::SoloDuo => (
                &self.last_rank_solo_tier,
                &self.last_rank_solo_division,
                self.last_rank_solo_lp,
                self.last_rank_solo_wins,
                self.last_rank_solo_losses,
            ),
            QueueType::Flex => (
                &self.last_rank_flex_tier,
                &self.last_rank_flex_division,
                self.last_rank_flex_lp,
                self.last_rank_flex_wins,
                self.last_rank_flex_losses,
            ),
            QueueType::Other => return None,
        };

        match (tier, lp) {
            (Some(tier), Some(lp)) => Some(RankInfo {
                tier: tier.clone(),
                division: division.clone(),
                lp,
                wins,
                losses,
            }),
            _ => None,
        }
    }
}

/// Cached copy of a player's last known standing in one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankInfo {
    pub tier: String,
    pub division: Option<String>,
    pub lp: i32,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRecord {
    pub id: i64,
    pub player_id: i64,
    pub match_id: String,
    pub queue_id: i32,
    pub champion_id: i64,
    pub champion_name: String,
    pub team_position: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub duration_secs: i64,
    pub ended_at: Option<i64>,
    pub approx_lp: Option<i32>,
    pub tier_at_match: Option<String>,
    pub division_at_match: Option<String>,
}

impl MatchRecord {
    pub fn rung_at_match(&self) -> Option<Rung> {
        let tier = self.tier_at_match.as_deref()?;
        Rung::parse(tier, self.division_at_match.as_deref()).ok()
    }
}

/// Match fields as observed upstream, before any reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub player_id: i64,
    pub match_id: String,
    pub queue_id: i32,
    pub champion_id: i64,
    pub champion_name: String,
    pub team_position: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub duration_secs: i64,
    pub ended_at: Option<i64>,
}

/// A stored match joined with the snapshot recorded for it, if any.
#[derive(Debug, Clone, FromRow)]
pub struct MatchWithSnapshot {
    #[sqlx(flatten)]
    pub record: MatchRecord,
    pub snapshot_id: Option<i64>,
    pub lp_change: Option<i32>,
}

/// Row fed to the backward walk.
#[derive(Debug, Clone, FromRow)]
pub struct WalkRow {
    pub match_id: String,
    pub win: bool,
    pub approx_lp: Option<i32>,
    pub tier_at_match: Option<String>,
    pub division_at_match: Option<String>,
    pub ended_at: Option<i64>,
    pub snapshot_wins: Option<i32>,
    pub snapshot_losses: Option<i32>,
}

impl WalkRow {
    /// Standing reconstructed by an earlier pass, when complete enough to anchor on.
    pub fn known_state(&self) -> Option<RankState> {
        let tier = self.tier_at_match.as_deref()?;
        let rung = Rung::parse(tier, self.division_at_match.as_deref()).ok()?;
        Some(RankState {
            rung,
            league_points: self.approx_lp?,
            wins: self.snapshot_wins,
            losses: self.snapshot_losses,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RankSnapshot {
    pub id: i64,
    pub player_id: i64,
    pub match_id: Option<String>,
    pub queue_type: String,
    pub taken_at: i64,
    pub tier: String,
    pub division: Option<String>,
    pub league_points: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
    pub lp_change: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnapshot {
    pub player_id: i64,
    pub match_id: Option<String>,
    pub queue_type: QueueType,
    pub taken_at: i64,
    pub tier: String,
    pub division: Option<String>,
    pub league_points: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
    pub lp_change: Option<i32>,
}
