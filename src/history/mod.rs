//! Match-history reconciliation and the read paths built on top of it.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::db::{Player, RankInfo, Repository, matches, snapshots};
use crate::error::{AppError, UpstreamError};
use crate::rank::trajectory::LpModel;
use crate::rank::{CurrentRank, QueueType};
use crate::riot::{GameDataSource, LeagueEntryDto, Platform};

pub mod dashboard;
mod reconciler;
pub mod recorder;
pub mod views;

pub use reconciler::Reconciliation;
use views::{MatchPage, MatchView, PlayerView, RankHistory, RankHistoryPoint};

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    App(#[from] AppError),
}

/// Tuning knobs of the reconciliation pass.
#[derive(Debug, Clone, Copy)]
pub struct HistorySettings {
    /// Upper bound on match ids pulled from the upstream in one pass.
    pub match_fetch_cap: u32,
    pub detail_fetch_concurrency: usize,
    pub dashboard_role_sample: u32,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            match_fetch_cap: 50,
            detail_fetch_concurrency: 4,
            dashboard_role_sample: 20,
        }
    }
}

impl From<&Config> for HistorySettings {
    fn from(config: &Config) -> Self {
        Self {
            match_fetch_cap: config.match_fetch_cap,
            detail_fetch_concurrency: config.detail_fetch_concurrency,
            dashboard_role_sample: config.dashboard_role_sample,
        }
    }
}

#[derive(Clone)]
pub struct HistoryService {
    repo: Repository,
    source: Arc<dyn GameDataSource>,
    model: LpModel,
    settings: HistorySettings,
}

impl HistoryService {
    pub fn new(
        repo: Repository,
        source: Arc<dyn GameDataSource>,
        model: LpModel,
        settings: HistorySettings,
    ) -> Self {
        Self {
            repo,
            source,
            model,
            settings,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Resolve a Riot ID upstream and add (or refresh) the player in the registry.
    #[instrument(skip(self), fields(riot_id = %format!("{game_name}#{tag_line}")))]
    pub async fn register_player(
        &self,
        game_name: &str,
        tag_line: &str,
        platform: Platform,
    ) -> Result<PlayerView, HistoryError> {
        let account = self
            .source
            .fetch_account(platform, game_name, tag_line)
            .await
            .map_err(|e| match e {
                UpstreamError::NotFound => {
                    HistoryError::PlayerNotFound(format!("{game_name}#{tag_line}"))
                }
                other => HistoryError::Upstream(other),
            })?;

        let player = self
            .repo
            .register_player(
                &account.puuid,
                account.game_name.as_deref().unwrap_or(game_name),
                account.tag_line.as_deref().unwrap_or(tag_line),
                platform,
            )
            .await?;

        info!(puuid = %player.puuid, platform = %platform, "🗄️ Player registered");

        Ok(PlayerView::from(&player))
    }

    pub async fn player(&self, puuid: &str) -> Result<Player, HistoryError> {
        self.repo
            .get_player_by_puuid(puuid)
            .await?
            .ok_or_else(|| HistoryError::PlayerNotFound(puuid.to_string()))
    }

    /// A page of the player's matches, newest first, reconciled with the upstream beforehand.
    ///
    /// `page` is zero-based. `queue` restricts the page to one ranked queue.
    pub async fn match_page(
        &self,
        puuid: &str,
        page: u32,
        page_size: u32,
        queue: Option<QueueType>,
    ) -> Result<MatchPage, HistoryError> {
        let player = self.player(puuid).await?;
        let page_size = page_size.max(1);
        let wanted = page.saturating_add(1).saturating_mul(page_size);

        let reconciliation = self.reconcile(&player, wanted).await?;

        let queue_id = queue.and_then(|q| q.queue_id());
        let mut conn = self.repo.acquire().await?;
        let total = matches::count(&mut conn, player.id, queue_id).await?;
        let rows = matches::page(
            &mut conn,
            player.id,
            queue_id,
            page.saturating_mul(page_size),
            page_size,
        )
        .await?;

        Ok(MatchPage {
            page,
            page_size,
            total,
            freshness: reconciliation.freshness,
            matches: rows.into_iter().map(MatchView::from).collect(),
        })
    }

    /// Snapshot series of one queue, oldest first.
    pub async fn rank_history(
        &self,
        puuid: &str,
        queue: QueueType,
    ) -> Result<RankHistory, HistoryError> {
        let player = self.player(puuid).await?;
        let reconciliation = self
            .reconcile(&player, self.settings.match_fetch_cap)
            .await?;

        let mut conn = self.repo.acquire().await?;
        let points = snapshots::history(&mut conn, player.id, queue)
            .await?
            .into_iter()
            .map(RankHistoryPoint::from)
            .collect();

        Ok(RankHistory {
            queue,
            freshness: reconciliation.freshness,
            points,
        })
    }

    /// Store the freshly fetched standings as the player's cached rank.
    async fn cache_ranks(&self, player: &Player, ranks: &[CurrentRank]) {
        let info = |queue: QueueType| {
            ranks
                .iter()
                .find(|r| r.queue == queue)
                .and_then(|r| {
                    Some(RankInfo {
                        tier: r.rung.tier.as_str().to_string(),
                        division: r.rung.division.map(|d| d.as_str().to_string()),
                        lp: r.league_points?,
                        wins: r.wins,
                        losses: r.losses,
                    })
                })
        };

        let solo = info(QueueType::SoloDuo);
        let flex = info(QueueType::Flex);

        if let Err(e) = self
            .repo
            .update_player_rank(player.id, solo.as_ref(), flex.as_ref())
            .await
        {
            warn!(error = ?e, puuid = %player.puuid, "🗄️ ⚠️ Failed to cache current rank");
        }
    }
}

/// Ranked standings out of League-v4 entries; unparsable or non-ranked entries are dropped.
fn current_ranks(entries: &[LeagueEntryDto]) -> Vec<CurrentRank> {
    entries
        .iter()
        .filter_map(|entry| match CurrentRank::try_from(entry) {
            Ok(rank) if rank.queue != QueueType::Other => Some(rank),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, queue = %entry.queue_type, "🛰️ ⚠️ Unreadable league entry");
                None
            }
        })
        .collect()
}
