use std::collections::HashMap;
use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{Span, debug, info, instrument, warn};

use super::recorder::{self, Observation, Trigger};
use super::views::Freshness;
use super::{HistoryError, HistoryService, current_ranks};
use crate::db::{NewMatch, Player, matches, snapshots};
use crate::error::{AppError, UpstreamError};
use crate::rank::trajectory::{self, WalkEntry};
use crate::rank::CurrentRank;
use crate::riot::{MatchDto, PlayerKey};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub freshness: Freshness,
    /// Current standings fetched during the pass, if the pass had to fetch them.
    pub ranks: Option<Vec<CurrentRank>>,
    /// Matches inserted by this pass.
    pub ingested: usize,
    /// Matches that received a reconstructed rank in this pass.
    pub labeled: usize,
}

impl Reconciliation {
    fn without_changes(freshness: Freshness) -> Self {
        Self {
            freshness,
            ranks: None,
            ingested: 0,
            labeled: 0,
        }
    }
}

impl HistoryService {
    /// Bring the stored matches of `player` up to date with the upstream.
    ///
    /// A single probe for the latest match decides freshness. When stale, up to
    /// `wanted` recent ids (bounded by the fetch cap) are pulled, the missing
    /// ones ingested, and LP history is reconstructed from the current rank.
    /// Upstream failures degrade to the stored data; `NotFound` is only
    /// surfaced when nothing is stored for the player.
    #[instrument(
        skip(self, player),
        fields(puuid = %player.puuid, riot_id = %player.riot_id(), freshness)
    )]
    pub async fn reconcile(
        &self,
        player: &Player,
        wanted: u32,
    ) -> Result<Reconciliation, HistoryError> {
        let key = player.key()?;

        let latest_upstream = match self.source.fetch_recent_match_ids(&key, 0, 1).await {
            Ok(ids) => ids.into_iter().next(),
            Err(e) => return self.fall_back(player, e).await,
        };

        let latest_stored = {
            let mut conn = self.repo.acquire().await?;
            matches::latest_match_id(&mut conn, player.id).await?
        };

        let Some(latest_upstream) = latest_upstream else {
            debug!("🔄 No matches upstream");
            Span::current().record("freshness", "fresh");
            return Ok(Reconciliation::without_changes(Freshness::Fresh));
        };

        if latest_stored.as_deref() == Some(latest_upstream.as_str()) {
            debug!(match_id = %latest_upstream, "🔄 Stored matches are fresh");
            Span::current().record("freshness", "fresh");
            return Ok(Reconciliation::without_changes(Freshness::Fresh));
        }

        Span::current().record("freshness", "stale");
        info!(
            latest_upstream = %latest_upstream,
            latest_stored = ?latest_stored,
            "🔄 Stored matches are stale, reconciling"
        );

        match self.ingest(player, &key, wanted).await {
            Ok(reconciliation) => Ok(reconciliation),
            Err(HistoryError::Upstream(e)) => self.fall_back(player, e).await,
            Err(e) => Err(e),
        }
    }

    async fn fall_back(
        &self,
        player: &Player,
        error: UpstreamError,
    ) -> Result<Reconciliation, HistoryError> {
        if matches!(error, UpstreamError::NotFound) {
            let mut conn = self.repo.acquire().await?;
            if matches::count(&mut conn, player.id, None).await? == 0 {
                return Err(HistoryError::PlayerNotFound(player.puuid.clone()));
            }
        }

        warn!(
            error = %error,
            puuid = %player.puuid,
            "🔄 ⚠️ Upstream unavailable, serving stored matches"
        );
        Ok(Reconciliation::without_changes(Freshness::Cached))
    }

    async fn ingest(
        &self,
        player: &Player,
        key: &PlayerKey,
        wanted: u32,
    ) -> Result<Reconciliation, HistoryError> {
        let count = wanted.clamp(1, self.settings.match_fetch_cap.max(1));
        let ids = self.source.fetch_recent_match_ids(key, 0, count).await?;

        let existing = {
            let mut conn = self.repo.acquire().await?;
            matches::existing_ids(&mut conn, player.id, &ids).await?
        };
        let missing: Vec<String> = ids
            .into_iter()
            .filter(|id| !existing.contains(id))
            .collect();

        debug!(
            fetched = existing.len() + missing.len(),
            missing = missing.len(),
            "🔄 Fetching missing match details"
        );

        let DetailBatch {
            loaded: new_matches,
            failed,
        } = self.fetch_details(player, key, missing).await;

        let ranks = match self.source.fetch_current_rank(key).await {
            Ok(entries) => Some(current_ranks(&entries)),
            Err(e) => {
                warn!(error = %e, "🛰️ ⚠️ Current rank unavailable, skipping reconstruction");
                None
            }
        };
        // The walk needs every recent match in place; wait for the retry.
        let anchors = if failed > 0 {
            warn!(failed, "🔄 ⚠️ Match details missing, skipping reconstruction");
            None
        } else {
            ranks.as_deref()
        };

        let mut tx = self.repo.begin().await?;

        for new in &new_matches {
            matches::upsert(&mut *tx, new).await?;
        }

        let mut labeled = 0;
        for anchor in anchors.into_iter().flatten() {
            let Some(queue_id) = anchor.queue.queue_id() else {
                continue;
            };

            let rows = matches::walk_rows(&mut *tx, player.id, queue_id).await?;
            let entries: Vec<WalkEntry> = rows
                .iter()
                .map(|row| WalkEntry {
                    match_id: row.match_id.clone(),
                    win: row.win,
                    known: row.known_state(),
                })
                .collect();

            let points = trajectory::reconstruct(anchor, &entries, &self.model);
            if points.is_empty() {
                continue;
            }

            let ended_at_by_id: HashMap<&str, Option<i64>> = rows
                .iter()
                .map(|row| (row.match_id.as_str(), row.ended_at))
                .collect();

            // Backfilled matches older than the last snapshot are labeled only,
            // so existing deltas stay chained to their direct predecessor.
            let last_snapshot_at =
                snapshots::latest_before(&mut *tx, player.id, anchor.queue, i64::MAX)
                    .await?
                    .map(|s| s.taken_at);

            for point in &points {
                matches::set_rank_at_match(&mut *tx, player.id, &point.match_id, &point.state)
                    .await?;

                let ended_at = ended_at_by_id
                    .get(point.match_id.as_str())
                    .copied()
                    .flatten();
                if matches!((last_snapshot_at, ended_at), (Some(last), Some(at)) if at <= last) {
                    continue;
                }

                recorder::record(
                    &mut *tx,
                    player.id,
                    Trigger {
                        match_id: &point.match_id,
                        queue_id,
                        ended_at,
                    },
                    &Observation::from(&point.state),
                )
                .await?;
            }

            debug!(
                queue = %anchor.queue,
                anchor = %anchor.rung.label(),
                labeled = points.len(),
                "🔄 LP history reconstructed"
            );
            labeled += points.len();
        }

        tx.commit().await.map_err(AppError::from)?;

        if let Some(ranks) = &ranks {
            self.cache_ranks(player, ranks).await;
        }

        info!(
            ingested = new_matches.len(),
            labeled,
            "🔄 ✅ Reconciliation complete"
        );

        Ok(Reconciliation {
            freshness: if failed > 0 {
                Freshness::Cached
            } else {
                Freshness::Refreshed
            },
            ranks,
            ingested: new_matches.len(),
            labeled,
        })
    }

    /// Fetch details for `match_ids` (newest first) with bounded concurrency, keeping their order.
    ///
    /// Matches that do not include the player are skipped. When a fetch fails,
    /// the matches newer than it are dropped too, so the stored newest id stays
    /// behind the upstream and the next probe retries the gap.
    async fn fetch_details(
        &self,
        player: &Player,
        key: &PlayerKey,
        match_ids: Vec<String>,
    ) -> DetailBatch {
        let results: Vec<_> = stream::iter(match_ids)
            .map(|match_id| {
                let source = Arc::clone(&self.source);
                let key = key.clone();
                async move {
                    let result = source.fetch_match_detail(&key, &match_id).await;
                    (match_id, result)
                }
            })
            .buffered(self.settings.detail_fetch_concurrency.max(1))
            .collect()
            .await;

        let mut batch = DetailBatch::default();
        for (match_id, result) in results {
            match result {
                Ok(detail) => batch.loaded.extend(to_new_match(player, &detail)),
                Err(e) => {
                    warn!(error = %e, match_id = %match_id, "🛰️ ⚠️ Failed to fetch match detail");
                    batch.failed += 1;
                    batch.loaded.clear();
                }
            }
        }
        batch
    }
}

#[derive(Debug, Default)]
struct DetailBatch {
    loaded: Vec<NewMatch>,
    failed: usize,
}

fn to_new_match(player: &Player, detail: &MatchDto) -> Option<NewMatch> {
    let Some(participant) = detail.info.participant(&player.puuid) else {
        warn!(
            match_id = %detail.metadata.match_id,
            "🛰️ ⚠️ Player missing from match participants"
        );
        return None;
    };

    Some(NewMatch {
        player_id: player.id,
        match_id: detail.metadata.match_id.clone(),
        queue_id: detail.info.queue_id,
        champion_id: participant.champion_id,
        champion_name: participant.champion_name.clone(),
        team_position: participant.team_position.clone(),
        win: participant.win,
        kills: participant.kills,
        deaths: participant.deaths,
        assists: participant.assists,
        duration_secs: detail.info.duration_secs(),
        ended_at: detail.info.ended_at(),
    })
}
