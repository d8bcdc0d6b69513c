mod account;
mod champion_mastery;
mod league;
mod match_v5;
