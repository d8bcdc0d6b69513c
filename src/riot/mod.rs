mod client;
mod endpoints;
mod metrics;
mod region;
pub mod types;
mod upstream;

pub use client::RiotClient;
pub use metrics::{MetricsSnapshot, RequestMetrics};
pub use region::{Platform, Region};
pub use types::{AccountDto, ChampionMasteryDto, LeagueEntryDto, MatchDto, ParticipantDto};
pub use upstream::{GameDataSource, PlayerKey};
