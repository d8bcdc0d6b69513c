//! Ranked match-history tracker: ingests a player's games from the Riot API,
//! reconstructs an approximate LP history and serves it over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod logging;
pub mod rank;
pub mod riot;
