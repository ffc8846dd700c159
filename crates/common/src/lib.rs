use thiserror::Error;

pub mod env;
pub mod types;
pub mod utils;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub mod probe {
    use super::*;

    /// Fire a single liveness probe against `url` and return the HTTP status.
    /// Callers decide what to do with failures; this never retries.
    pub async fn ping(client: &reqwest::Client, url: &str) -> Result<u16, CoreError> {
        let resp = client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Ok(resp.status().as_u16())
    }
}
