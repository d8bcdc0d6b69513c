use serde::Deserialize;

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// League-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
}

// ============================================================================
// Champion-Mastery-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionMasteryDto {
    pub champion_id: i64,
    pub champion_level: i32,
    pub champion_points: i64,
}

// ============================================================================
// Match-v5
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub game_creation: i64,
    pub game_duration: i64,
    #[serde(default)]
    pub game_start_timestamp: Option<i64>,
    #[serde(default)]
    pub game_end_timestamp: Option<i64>,
    pub participants: Vec<ParticipantDto>,
    pub queue_id: i32,
}

impl InfoDto {
    /// Game length in seconds.
    ///
    /// Before patch 11.20 `gameDuration` was reported in milliseconds, and
    /// those payloads never carry `gameEndTimestamp`.
    pub fn duration_secs(&self) -> i64 {
        if self.game_end_timestamp.is_some() {
            self.game_duration
        } else {
            self.game_duration / 1_000
        }
    }

    /// Unix timestamp (seconds) at which the game ended.
    pub fn ended_at(&self) -> Option<i64> {
        if let Some(end_ms) = self.game_end_timestamp {
            return Some(end_ms / 1_000);
        }

        let start_ms = self.game_start_timestamp.unwrap_or(self.game_creation);
        (start_ms > 0).then(|| start_ms / 1_000 + self.duration_secs())
    }

    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_id: i64,
    pub champion_name: String,
    #[serde(default)]
    pub team_position: String,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub win: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(duration: i64, end: Option<i64>) -> InfoDto {
        InfoDto {
            game_creation: 1_700_000_000_000,
            game_duration: duration,
            game_start_timestamp: Some(1_700_000_030_000),
            game_end_timestamp: end,
            participants: vec![],
            queue_id: 420,
        }
    }

    #[test]
    fn modern_payload_uses_end_timestamp() {
        let info = info(1_800, Some(1_700_001_830_000));
        assert_eq!(info.duration_secs(), 1_800);
        assert_eq!(info.ended_at(), Some(1_700_001_830));
    }

    #[test]
    fn legacy_payload_reports_duration_in_millis() {
        let info = info(1_800_000, None);
        assert_eq!(info.duration_secs(), 1_800);
        assert_eq!(info.ended_at(), Some(1_700_000_030 + 1_800));
    }

    #[test]
    fn match_payload_deserializes() {
        let raw = r#"{
            "metadata": { "matchId": "EUW1_7349112729", "participants": [] },
            "info": {
                "gameCreation": 1700000000000,
                "gameDuration": 1650,
                "gameEndTimestamp": 1700001700000,
                "queueId": 440,
                "participants": [{
                    "puuid": "abc",
                    "championId": 99,
                    "championName": "Lux",
                    "teamPosition": "UTILITY",
                    "kills": 2, "deaths": 3, "assists": 17,
                    "win": false
                }]
            }
        }"#;

        let dto: MatchDto = serde_json::from_str(raw).unwrap();
        assert_eq!(dto.metadata.match_id, "EUW1_7349112729");
        assert_eq!(dto.info.queue_id, 440);
        let p = dto.info.participant("abc").unwrap();
        assert_eq!(p.champion_name, "Lux");
        assert!(!p.win);
        assert!(dto.info.participant("nobody").is_none());
    }
}
