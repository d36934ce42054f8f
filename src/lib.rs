pub mod cli;
pub mod models;
pub mod operations;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub mod common {
    use crate::Result;
    use reqwest::Client;
    use std::time::Duration;

    /// Per-request ceiling applied uniformly to every outbound call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn create_client() -> Result<Client> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(client)
    }
}
