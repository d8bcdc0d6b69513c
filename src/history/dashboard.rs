//! Dashboard aggregation over the stored matches and snapshots.

use chrono::{Duration, Utc};
use tracing::warn;

use super::views::{CurrentRankView, DashboardView, FavoriteChampion, PlayerView, Source};
use super::{HistoryError, HistoryService, current_ranks};
use crate::db::{MatchWithSnapshot, Player, matches};
use crate::rank::{CurrentRank, QueueType, SOLO_DUO_QUEUE_ID, rank_label};

const LP_WINDOW_DAYS: i64 = 7;

/// LP gained over a window, and how many matches contributed to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LpGain {
    pub total: i32,
    pub counted: usize,
}

/// Sum of the recorded LP changes of `rows`, oldest first.
///
/// Matches without a snapshot, or whose snapshot has no change, are left out
/// rather than counted as zero.
pub fn lp_gained(rows: &[MatchWithSnapshot]) -> LpGain {
    rows.iter()
        .filter(|row| row.snapshot_id.is_some())
        .filter_map(|row| row.lp_change)
        .fold(LpGain::default(), |acc, change| LpGain {
            total: acc.total + change,
            counted: acc.counted + 1,
        })
}

/// Most frequent non-empty position; ties go to the position seen first.
pub fn main_role(positions: &[String]) -> Option<String> {
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for position in positions.iter().filter(|p| !p.is_empty()) {
        match counts.iter_mut().find(|(p, _)| *p == position.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((position.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, u32)> = None;
    for (position, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((position, n));
        }
    }

    best.map(|(position, _)| position.to_string())
}

impl HistoryService {
    pub async fn dashboard(&self, puuid: &str) -> Result<DashboardView, HistoryError> {
        let player = self.player(puuid).await?;
        let key = player.key()?;
        let reconciliation = self
            .reconcile(&player, self.settings.dashboard_role_sample)
            .await?;

        let ranks = match reconciliation.ranks {
            Some(ranks) => Some(ranks),
            None => match self.source.fetch_current_rank(&key).await {
                Ok(entries) => {
                    let ranks = current_ranks(&entries);
                    self.cache_ranks(&player, &ranks).await;
                    Some(ranks)
                }
                Err(e) => {
                    warn!(error = %e, "🛰️ ⚠️ Current rank unavailable, using cached rank");
                    None
                }
            },
        };
        let current_rank = current_rank_view(&player, ranks.as_deref());

        let mut conn = self.repo.acquire().await?;

        let since = (Utc::now() - Duration::days(LP_WINDOW_DAYS)).timestamp();
        let window = matches::since(&mut conn, player.id, SOLO_DUO_QUEUE_ID, since).await?;
        let gain = lp_gained(&window);

        let positions =
            matches::recent_positions(&mut conn, player.id, self.settings.dashboard_role_sample)
                .await?;

        let favorite_champion = match self.source.fetch_top_champion(&key).await {
            Ok(Some(mastery)) => Some(FavoriteChampion {
                champion_id: mastery.champion_id,
                champion_name: matches::champion_name(&mut conn, player.id, mastery.champion_id)
                    .await?,
                mastery_points: Some(mastery.champion_points),
                games: None,
                source: Source::Upstream,
            }),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "🛰️ ⚠️ Champion mastery unavailable, using most played");
                matches::most_played_champion(&mut conn, player.id)
                    .await?
                    .map(|(champion_id, name, games)| FavoriteChampion {
                        champion_id,
                        champion_name: Some(name),
                        mastery_points: None,
                        games: Some(games),
                        source: Source::MostPlayed,
                    })
            }
        };

        Ok(DashboardView {
            player: PlayerView::from(&player),
            freshness: reconciliation.freshness,
            current_rank,
            lp_last_7_days: gain.total,
            lp_counted_matches: gain.counted,
            main_role: main_role(&positions),
            favorite_champion,
        })
    }
}

/// Solo/duo standing from the upstream when available, else the cached one.
fn current_rank_view(player: &Player, ranks: Option<&[CurrentRank]>) -> Option<CurrentRankView> {
    if let Some(ranks) = ranks {
        let solo = ranks.iter().find(|r| r.queue == QueueType::SoloDuo)?;
        return Some(CurrentRankView {
            label: solo.rung.label(),
            league_points: solo.league_points.unwrap_or(0),
            source: Source::Upstream,
        });
    }

    player
        .rank_info(QueueType::SoloDuo)
        .map(|info| CurrentRankView {
            label: rank_label(&info.tier, info.division.as_deref()),
            league_points: info.lp,
            source: Source::Cache,
        })
}
