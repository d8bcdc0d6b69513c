//! Ranked ladder vocabulary: tiers, divisions, queues and the player's current standing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::riot::LeagueEntryDto;

pub mod trajectory;

/// A named rank band, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iron => "IRON",
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Emerald => "EMERALD",
            Self::Diamond => "DIAMOND",
            Self::Master => "MASTER",
            Self::Grandmaster => "GRANDMASTER",
            Self::Challenger => "CHALLENGER",
        }
    }

    /// Apex tiers have no divisions.
    pub fn is_apex(&self) -> bool {
        matches!(self, Self::Master | Self::Grandmaster | Self::Challenger)
    }

    pub fn below(&self) -> Option<Tier> {
        match self {
            Self::Iron => None,
            Self::Bronze => Some(Self::Iron),
            Self::Silver => Some(Self::Bronze),
            Self::Gold => Some(Self::Silver),
            Self::Platinum => Some(Self::Gold),
            Self::Emerald => Some(Self::Platinum),
            Self::Diamond => Some(Self::Emerald),
            Self::Master => Some(Self::Diamond),
            Self::Grandmaster => Some(Self::Master),
            Self::Challenger => Some(Self::Grandmaster),
        }
    }
}

impl FromStr for Tier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IRON" => Ok(Self::Iron),
            "BRONZE" => Ok(Self::Bronze),
            "SILVER" => Ok(Self::Silver),
            "GOLD" => Ok(Self::Gold),
            "PLATINUM" => Ok(Self::Platinum),
            "EMERALD" => Ok(Self::Emerald),
            "DIAMOND" => Ok(Self::Diamond),
            "MASTER" => Ok(Self::Master),
            "GRANDMASTER" => Ok(Self::Grandmaster),
            "CHALLENGER" => Ok(Self::Challenger),
            _ => Err(AppError::InvalidRank(s.to_string())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-rank within a non-apex tier, IV being the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "IV")]
    Four,
    #[serde(rename = "III")]
    Three,
    #[serde(rename = "II")]
    Two,
    #[serde(rename = "I")]
    One,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Four => "IV",
            Self::Three => "III",
            Self::Two => "II",
            Self::One => "I",
        }
    }

    pub fn below(&self) -> Option<Division> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => Some(Self::Four),
            Self::Four => None,
        }
    }
}

impl FromStr for Division {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IV" | "4" => Ok(Self::Four),
            "III" | "3" => Ok(Self::Three),
            "II" | "2" => Ok(Self::Two),
            "I" | "1" => Ok(Self::One),
            _ => Err(AppError::InvalidRank(s.to_string())),
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier plus division, the part of a rank that promotions and demotions move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rung {
    pub tier: Tier,
    pub division: Option<Division>,
}

impl Rung {
    pub fn new(tier: Tier, division: Option<Division>) -> Self {
        // The upstream reports "I" for apex tiers.
        let division = if tier.is_apex() { None } else { division };
        Self { tier, division }
    }

    /// Parse the raw tier/division strings stored or returned upstream.
    pub fn parse(tier: &str, division: Option<&str>) -> Result<Self, AppError> {
        let tier: Tier = tier.parse()?;
        let division = match division.filter(|d| !d.is_empty()) {
            Some(d) if !tier.is_apex() => Some(d.parse()?),
            _ => None,
        };
        Ok(Self::new(tier, division))
    }

    /// Whether a backward walk may move this rung down, which apex tiers and the ladder floor never do.
    pub fn can_demote(&self) -> bool {
        self.demoted().is_some()
    }

    /// The rung one division lower, crossing into the tier below from division IV.
    pub fn demoted(&self) -> Option<Rung> {
        if self.tier.is_apex() {
            return None;
        }

        match self.division.unwrap_or(Division::Four).below() {
            Some(division) => Some(Rung::new(self.tier, Some(division))),
            None => self
                .tier
                .below()
                .map(|tier| Rung::new(tier, Some(Division::One))),
        }
    }

    /// "GOLD III", or just "MASTER" for apex tiers.
    pub fn label(&self) -> String {
        rank_label(self.tier.as_str(), self.division.map(|d| d.as_str()))
    }
}

/// "TIER DIVISION" label from raw strings, dropping the division when absent.
pub fn rank_label(tier: &str, division: Option<&str>) -> String {
    match division.filter(|d| !d.is_empty()) {
        Some(division) => format!("{tier} {division}"),
        None => tier.to_string(),
    }
}

/// Ranked matchmaking category, each with its own progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueType {
    #[serde(rename = "RANKED_SOLO_5x5")]
    SoloDuo,
    #[serde(rename = "RANKED_FLEX_SR")]
    Flex,
    #[serde(rename = "OTHER")]
    Other,
}

pub const SOLO_DUO_QUEUE_ID: i32 = 420;
pub const FLEX_QUEUE_ID: i32 = 440;

impl QueueType {
    pub const RANKED: [QueueType; 2] = [QueueType::SoloDuo, QueueType::Flex];

    /// Queue type under which a match's snapshot is filed; unknown queues count as solo/duo.
    pub fn from_queue_id(queue_id: i32) -> Self {
        match queue_id {
            FLEX_QUEUE_ID => Self::Flex,
            _ => Self::SoloDuo,
        }
    }

    /// Strict classification: only ranked Summoner's Rift queues qualify.
    pub fn ranked_from_queue_id(queue_id: i32) -> Option<Self> {
        match queue_id {
            SOLO_DUO_QUEUE_ID => Some(Self::SoloDuo),
            FLEX_QUEUE_ID => Some(Self::Flex),
            _ => None,
        }
    }

    pub fn queue_id(&self) -> Option<i32> {
        match self {
            Self::SoloDuo => Some(SOLO_DUO_QUEUE_ID),
            Self::Flex => Some(FLEX_QUEUE_ID),
            Self::Other => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoloDuo => "RANKED_SOLO_5x5",
            Self::Flex => "RANKED_FLEX_SR",
            Self::Other => "OTHER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SoloDuo => "Ranked Solo/Duo",
            Self::Flex => "Ranked Flex",
            Self::Other => "Other",
        }
    }
}

impl FromStr for QueueType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RANKED_SOLO_5X5" | "SOLO" | "SOLODUO" | "SOLO_DUO" | "420" => Ok(Self::SoloDuo),
            "RANKED_FLEX_SR" | "FLEX" | "440" => Ok(Self::Flex),
            "OTHER" => Ok(Self::Other),
            _ => Err(AppError::InvalidRank(format!("unknown queue type {s}"))),
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative standing of a player in one queue, as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRank {
    pub queue: QueueType,
    pub rung: Rung,
    pub league_points: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
}

impl TryFrom<&LeagueEntryDto> for CurrentRank {
    type Error = AppError;

    fn try_from(entry: &LeagueEntryDto) -> Result<Self, Self::Error> {
        let queue = entry.queue_type.parse().unwrap_or(QueueType::Other);
        Ok(Self {
            queue,
            rung: Rung::parse(&entry.tier, Some(&entry.rank))?,
            league_points: Some(entry.league_points),
            wins: Some(entry.wins),
            losses: Some(entry.losses),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_mapping_defaults_to_solo() {
        assert_eq!(QueueType::from_queue_id(420), QueueType::SoloDuo);
        assert_eq!(QueueType::from_queue_id(440), QueueType::Flex);
        assert_eq!(QueueType::from_queue_id(450), QueueType::SoloDuo);
        assert_eq!(QueueType::from_queue_id(0), QueueType::SoloDuo);

        assert_eq!(QueueType::ranked_from_queue_id(450), None);
        assert_eq!(
            QueueType::ranked_from_queue_id(440),
            Some(QueueType::Flex)
        );
    }

    #[test]
    fn queue_type_parses_league_and_short_names() {
        assert_eq!(
            "RANKED_SOLO_5x5".parse::<QueueType>().unwrap(),
            QueueType::SoloDuo
        );
        assert_eq!("flex".parse::<QueueType>().unwrap(), QueueType::Flex);
        assert!("CHERRY".parse::<QueueType>().is_err());
    }

    #[test]
    fn apex_tiers_drop_their_division() {
        let rung = Rung::parse("MASTER", Some("I")).unwrap();
        assert_eq!(rung.division, None);
        assert_eq!(rung.label(), "MASTER");
        assert!(!rung.can_demote());
    }

    #[test]
    fn demotion_walks_divisions_then_tiers() {
        let gold_three = Rung::parse("GOLD", Some("III")).unwrap();
        assert_eq!(
            gold_three.demoted(),
            Some(Rung::new(Tier::Gold, Some(Division::Four)))
        );

        let gold_four = Rung::new(Tier::Gold, Some(Division::Four));
        assert_eq!(
            gold_four.demoted(),
            Some(Rung::new(Tier::Silver, Some(Division::One)))
        );

        let floor = Rung::new(Tier::Iron, Some(Division::Four));
        assert_eq!(floor.demoted(), None);
    }

    #[test]
    fn labels_join_tier_and_division() {
        assert_eq!(
            Rung::new(Tier::Emerald, Some(Division::Two)).label(),
            "EMERALD II"
        );
        assert_eq!(rank_label("GOLD", None), "GOLD");
        assert_eq!(rank_label("GOLD", Some("")), "GOLD");
    }

    #[test]
    fn unknown_tier_is_rejected() {
        assert!(matches!(
            Rung::parse("WOOD", Some("IV")),
            Err(AppError::InvalidRank(_))
        ));
    }

    #[test]
    fn current_rank_from_league_entry() {
        let entry = LeagueEntryDto {
            queue_type: "RANKED_FLEX_SR".into(),
            tier: "PLATINUM".into(),
            rank: "II".into(),
            league_points: 47,
            wins: 30,
            losses: 25,
        };

        let rank = CurrentRank::try_from(&entry).unwrap();
        assert_eq!(rank.queue, QueueType::Flex);
        assert_eq!(rank.rung, Rung::new(Tier::Platinum, Some(Division::Two)));
        assert_eq!(rank.league_points, Some(47));
        assert_eq!(rank.wins, Some(30));
    }
}
