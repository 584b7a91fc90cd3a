//! CEP address lookup
//!
//! Wraps the public ViaCEP service behind a uniform result contract with
//! a session-scoped cache. The adapter only resolves addresses — filling
//! form fields and moving focus is the caller's job (see
//! [`crate::form::FormEngine::apply_address`]).

use serde::{Deserialize, Serialize};

/// Address record resolved for a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter UF sigla (e.g. `SP`).
    pub state: String,
}

#[cfg(feature = "lookup")]
pub use client::{AddressLookup, LookupError, ViaCepClient};

#[cfg(feature = "lookup")]
mod client {
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::Deserialize;
    use thiserror::Error;
    use url::Url;

    use super::Address;

    const DEFAULT_BASE_URL: &str = "https://viacep.com.br";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Lookup failures, ordered from local to remote.
    #[derive(Debug, Error)]
    pub enum LookupError {
        /// The postal code is not exactly 8 digits; no request was made.
        #[error("CEP must have exactly 8 digits")]
        InvalidFormat,
        /// The service answered but reported no match for the code.
        #[error("CEP not found")]
        NotFound,
        /// The service answered with a non-success HTTP status.
        #[error("lookup service returned status {0}")]
        Service(u16),
        /// The request could not complete.
        #[error("lookup request failed: {0}")]
        Network(#[source] reqwest::Error),
    }

    /// Anything that can resolve a postal code into an [`Address`].
    ///
    /// The form orchestrator takes this as an injected dependency so tests
    /// can swap the real client for a canned one.
    #[async_trait]
    pub trait AddressLookup: Send + Sync {
        async fn lookup(&self, postal_code: &str) -> Result<Address, LookupError>;
    }

    /// ViaCEP response body. `erro` is only present on miss.
    #[derive(Debug, Deserialize)]
    struct ViaCepBody {
        #[serde(default)]
        logradouro: String,
        #[serde(default)]
        bairro: String,
        #[serde(default)]
        localidade: String,
        #[serde(default)]
        uf: String,
        #[serde(default)]
        erro: bool,
    }

    /// ViaCEP client with a per-session address cache.
    ///
    /// The cache is keyed by the 8-digit code and never evicted — a page
    /// session looks up a handful of codes at most.
    #[derive(Debug)]
    pub struct ViaCepClient {
        http: reqwest::Client,
        base_url: String,
        cache: Mutex<HashMap<String, Address>>,
    }

    impl Default for ViaCepClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ViaCepClient {
        pub fn new() -> Self {
            let http = reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default();
            Self {
                http,
                base_url: DEFAULT_BASE_URL.to_string(),
                cache: Mutex::new(HashMap::new()),
            }
        }

        /// Point the client at a different base URL (mock servers in tests).
        pub fn with_base_url(mut self, base_url: &Url) -> Self {
            self.base_url = base_url.as_str().trim_end_matches('/').to_string();
            self
        }

        fn cache(&self) -> MutexGuard<'_, HashMap<String, Address>> {
            match self.cache.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            }
        }

        /// Number of addresses currently cached.
        pub fn cached_len(&self) -> usize {
            self.cache().len()
        }
    }

    #[async_trait]
    impl AddressLookup for ViaCepClient {
        async fn lookup(&self, postal_code: &str) -> Result<Address, LookupError> {
            let digits: String = postal_code
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            if digits.len() != 8 {
                return Err(LookupError::InvalidFormat);
            }

            if let Some(address) = self.cache().get(&digits).cloned() {
                tracing::debug!(cep = %digits, "address cache hit");
                return Ok(address);
            }

            let url = format!("{}/ws/{}/json/", self.base_url, digits);
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(LookupError::Network)?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(cep = %digits, status = %status, "CEP lookup failed");
                return Err(LookupError::Service(status.as_u16()));
            }

            let body: ViaCepBody = response.json().await.map_err(LookupError::Network)?;
            if body.erro {
                return Err(LookupError::NotFound);
            }

            let address = Address {
                street: body.logradouro,
                neighborhood: body.bairro,
                city: body.localidade,
                state: body.uf,
            };
            self.cache().insert(digits.clone(), address.clone());
            tracing::debug!(cep = %digits, city = %address.city, "address resolved");
            Ok(address)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn short_codes_are_rejected_before_any_request() {
            let client = ViaCepClient::new();
            assert!(matches!(
                client.lookup("0131").await,
                Err(LookupError::InvalidFormat)
            ));
            assert!(matches!(
                client.lookup("").await,
                Err(LookupError::InvalidFormat)
            ));
            assert!(matches!(
                client.lookup("013101000").await,
                Err(LookupError::InvalidFormat)
            ));
        }

        #[test]
        fn formatted_codes_normalize_to_digits() {
            // "01310-100" and "01310100" must share a cache entry; the
            // normalization is the digit filter exercised above.
            let formatted: String = "01310-100"
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            assert_eq!(formatted, "01310100");
        }
    }
}
