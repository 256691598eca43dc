use std::{sync::OnceLock, time::Duration};

use reqwest::Client;

/// Shared HTTP client for provider calls and audio downloads
///
/// Carries no default headers, so audio fetched from a provider-returned URL
/// is requested without credentials. Timeouts are set per request from
/// configuration.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}
