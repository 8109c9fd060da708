//! Shared HTTP client construction.

use reqwest::Client;
use tracing::warn;

/// Build the client used for feeds, images, summarization and speech.
///
/// Library default timeouts apply. With `insecure_tls` every certificate is
/// accepted, including expired and mismatched ones.
///
/// # Errors
///
/// Returns the `reqwest` error if the TLS backend cannot be initialized.
pub fn build_client(user_agent: &str, insecure_tls: bool) -> Result<Client, reqwest::Error> {
    if insecure_tls {
        warn!("TLS certificate verification is disabled for all requests");
    }
    Client::builder()
        .user_agent(user_agent)
        .danger_accept_invalid_certs(insecure_tls)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_secure_and_insecure_clients() {
        assert!(build_client("newsreel-test", false).is_ok());
        assert!(build_client("newsreel-test", true).is_ok());
    }
}
