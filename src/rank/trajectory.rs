//! Backward reconstruction of a player's LP history.
//!
//! The upstream only exposes the current standing, so the history is rebuilt
//! by walking matches newest-first from that anchor and undoing a nominal LP
//! swing per game.

use super::{CurrentRank, Rung};

/// LP the backward walk attributes to a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpModel {
    pub win_gain: i32,
    pub loss_penalty: i32,
}

impl Default for LpModel {
    fn default() -> Self {
        Self {
            win_gain: 20,
            loss_penalty: 20,
        }
    }
}

/// Rank standing right after a given match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankState {
    pub rung: Rung,
    pub league_points: i32,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
}

impl RankState {
    /// Standing before a game that ended in `win` and led to `self`.
    pub fn before(&self, win: bool, model: &LpModel) -> RankState {
        if !win {
            return RankState {
                league_points: self.league_points + model.loss_penalty,
                losses: self.losses.map(|l| (l - 1).max(0)),
                ..*self
            };
        }

        let wins = self.wins.map(|w| (w - 1).max(0));
        let league_points = self.league_points - model.win_gain;

        if league_points >= 0 {
            return RankState {
                league_points,
                wins,
                ..*self
            };
        }

        match self.rung.demoted() {
            // The win crossed a division boundary: the overflow came from the top of the rung below.
            Some(rung) => RankState {
                rung,
                league_points: (100 + league_points).max(0),
                wins,
                losses: self.losses,
            },
            None => RankState {
                league_points: 0,
                wins,
                ..*self
            },
        }
    }
}

/// One match in the walk, newest first.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub match_id: String,
    pub win: bool,
    /// Standing already reconstructed for this match by an earlier pass.
    pub known: Option<RankState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryPoint {
    pub match_id: String,
    pub state: RankState,
}

/// Assign an approximate post-match standing to every match of `newest_first`
/// that has none yet.
///
/// A match that already carries a standing re-anchors the walk for the older
/// matches below it and is never relabeled. Points are returned oldest first.
/// Nothing is produced when the anchor's LP is unknown.
pub fn reconstruct(
    anchor: &CurrentRank,
    newest_first: &[WalkEntry],
    model: &LpModel,
) -> Vec<TrajectoryPoint> {
    let Some(league_points) = anchor.league_points else {
        return Vec::new();
    };

    let mut state = RankState {
        rung: anchor.rung,
        league_points,
        wins: anchor.wins,
        losses: anchor.losses,
    };

    let mut points = Vec::new();

    for entry in newest_first {
        match entry.known {
            Some(known) => state = known,
            None => points.push(TrajectoryPoint {
                match_id: entry.match_id.clone(),
                state,
            }),
        }

        state = state.before(entry.win, model);
    }

    points.reverse();
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{Division, QueueType, Tier};

    fn anchor(tier: Tier, division: Option<Division>, lp: Option<i32>) -> CurrentRank {
        CurrentRank {
            queue: QueueType::SoloDuo,
            rung: Rung::new(tier, division),
            league_points: lp,
            wins: Some(10),
            losses: Some(8),
        }
    }

    fn game(id: &str, win: bool) -> WalkEntry {
        WalkEntry {
            match_id: id.to_string(),
            win,
            known: None,
        }
    }

    #[test]
    fn win_below_zero_demotes_one_division() {
        let current = anchor(Tier::Gold, Some(Division::Three), Some(10));
        let state = RankState {
            rung: current.rung,
            league_points: 10,
            wins: Some(10),
            losses: Some(8),
        };

        let before = state.before(true, &LpModel::default());

        assert_eq!(before.rung, Rung::new(Tier::Gold, Some(Division::Four)));
        assert_eq!(before.league_points, 90);
        assert_eq!(before.wins, Some(9));
        assert_eq!(before.losses, Some(8));
    }

    #[test]
    fn apex_tier_clamps_at_zero() {
        let state = RankState {
            rung: Rung::new(Tier::Master, None),
            league_points: 5,
            wins: None,
            losses: None,
        };

        let before = state.before(true, &LpModel::default());

        assert_eq!(before.rung, Rung::new(Tier::Master, None));
        assert_eq!(before.league_points, 0);
    }

    #[test]
    fn ladder_floor_clamps_at_zero() {
        let state = RankState {
            rung: Rung::new(Tier::Iron, Some(Division::Four)),
            league_points: 12,
            wins: Some(0),
            losses: Some(3),
        };

        let before = state.before(true, &LpModel::default());

        assert_eq!(before.rung, state.rung);
        assert_eq!(before.league_points, 0);
        assert_eq!(before.wins, Some(0));
    }

    #[test]
    fn division_four_demotes_into_the_tier_below() {
        let state = RankState {
            rung: Rung::new(Tier::Gold, Some(Division::Four)),
            league_points: 3,
            wins: None,
            losses: None,
        };

        let before = state.before(true, &LpModel::default());

        assert_eq!(before.rung, Rung::new(Tier::Silver, Some(Division::One)));
        assert_eq!(before.league_points, 83);
    }

    #[test]
    fn loss_adds_back_the_penalty_without_promoting() {
        let state = RankState {
            rung: Rung::new(Tier::Gold, Some(Division::One)),
            league_points: 95,
            wins: Some(4),
            losses: Some(4),
        };

        let before = state.before(false, &LpModel::default());

        assert_eq!(before.rung, state.rung);
        assert_eq!(before.league_points, 115);
        assert_eq!(before.losses, Some(3));
    }

    #[test]
    fn walk_labels_each_match_with_its_post_game_standing() {
        let current = anchor(Tier::Gold, Some(Division::Three), Some(10));
        // Newest first: a win that promoted from IV, then an older loss.
        let matches = [game("m3", true), game("m2", false), game("m1", true)];

        let points = reconstruct(&current, &matches, &LpModel::default());

        let ids: Vec<_> = points.iter().map(|p| p.match_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);

        // m3 is the anchor itself.
        assert_eq!(points[2].state.rung.label(), "GOLD III");
        assert_eq!(points[2].state.league_points, 10);
        // Before m3: GOLD IV 90, which is the standing after m2.
        assert_eq!(points[1].state.rung.label(), "GOLD IV");
        assert_eq!(points[1].state.league_points, 90);
        // Before m2 (a loss): GOLD IV 110.
        assert_eq!(points[0].state.league_points, 110);
        assert_eq!(points[0].state.losses, Some(7));
        assert_eq!(points[0].state.wins, Some(9));
    }

    #[test]
    fn unknown_anchor_lp_skips_reconstruction() {
        let current = anchor(Tier::Gold, Some(Division::Three), None);
        let points = reconstruct(&current, &[game("m1", true)], &LpModel::default());
        assert!(points.is_empty());
    }

    #[test]
    fn single_match_gets_the_anchor_only() {
        let current = anchor(Tier::Silver, Some(Division::Two), Some(44));
        let points = reconstruct(&current, &[game("m1", false)], &LpModel::default());

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].state.league_points, 44);
        assert_eq!(points[0].state.losses, Some(8));
    }

    #[test]
    fn labeled_match_reanchors_older_ones() {
        let current = anchor(Tier::Platinum, Some(Division::One), Some(50));
        let known = RankState {
            rung: Rung::new(Tier::Gold, Some(Division::One)),
            league_points: 30,
            wins: None,
            losses: None,
        };
        let matches = [
            game("m3", true),
            WalkEntry {
                match_id: "m2".into(),
                win: false,
                known: Some(known),
            },
            game("m1", true),
        ];

        let points = reconstruct(&current, &matches, &LpModel::default());

        let ids: Vec<_> = points.iter().map(|p| p.match_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m3"]);
        // m1 follows from m2's stored GOLD I 30, undoing a loss.
        assert_eq!(points[0].state.rung.label(), "GOLD I");
        assert_eq!(points[0].state.league_points, 50);
        assert_eq!(points[1].state.league_points, 50);
        assert_eq!(points[1].state.rung.label(), "PLATINUM I");
    }

    #[test]
    fn custom_model_changes_the_swing() {
        let current = anchor(Tier::Gold, Some(Division::Two), Some(60));
        let model = LpModel {
            win_gain: 25,
            loss_penalty: 15,
        };

        let points = reconstruct(&current, &[game("m2", true), game("m1", true)], &model);

        assert_eq!(points[1].state.league_points, 60);
        assert_eq!(points[0].state.league_points, 35);
    }
}
