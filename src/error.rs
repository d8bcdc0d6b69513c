use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Riot API error: {status} - {message}")]
    RiotApi { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Player not found: {game_name}#{tag_line}")]
    PlayerNotFound { game_name: String, tag_line: String },

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid rank value: {0}")]
    InvalidRank(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure talking to the game-data upstream, classified by how the caller recovers from it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("upstream rate limit reached")]
    RateLimited,

    #[error("not found upstream")]
    NotFound,
}

impl From<AppError> for UpstreamError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::RiotApi { status: 404, .. } | AppError::PlayerNotFound { .. } => {
                UpstreamError::NotFound
            }
            AppError::RiotApi { status: 429, .. } => UpstreamError::RateLimited,
            other => UpstreamError::Unavailable(other.to_string()),
        }
    }
}
