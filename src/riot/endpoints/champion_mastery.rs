use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::ChampionMasteryDto;

impl RiotClient {
    /// Get the champions with the highest mastery for a player, best first
    pub async fn get_top_champion_masteries(
        &self,
        platform: Platform,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<ChampionMasteryDto>, AppError> {
        let url = format!(
            "{}/lol/champion-mastery/v4/champion-masteries/by-puuid/{}/top?count={}",
            self.platform_url(platform),
            puuid,
            count
        );

        self.get(&url).await
    }
}
