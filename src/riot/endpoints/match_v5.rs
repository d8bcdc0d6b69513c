use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Region;
use crate::riot::types::MatchDto;

impl RiotClient {
    /// Get a page of match IDs by PUUID, newest first
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match_ids(
        &self,
        region: Region,
        puuid: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?start={}&count={}",
            self.region_url(region),
            puuid,
            start,
            count
        );

        self.get(&url).await
    }

    /// Get match details by match ID
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match(&self, region: Region, match_id: &str) -> Result<MatchDto, AppError> {
        let url = format!(
            "{}/lol/match/v5/matches/{}",
            self.region_url(region),
            match_id
        );

        self.get(&url).await
    }
}
