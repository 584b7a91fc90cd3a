//! Brazilian states and municipalities
//!
//! The static UF table used to seed the state select, and a client for
//! the IBGE localities API that backs the birthplace autocomplete.

/// The 27 federative units, `(sigla, nome)`, ordered by sigla.
pub const BRAZILIAN_STATES: [(&str, &str); 27] = [
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

/// Full state name for a UF sigla, case-insensitive.
pub fn state_name(uf: &str) -> Option<&'static str> {
    let uf = uf.trim().to_uppercase();
    BRAZILIAN_STATES
        .iter()
        .find(|(sigla, _)| *sigla == uf)
        .map(|(_, nome)| *nome)
}

#[cfg(feature = "lookup")]
pub use client::{IbgeClient, IbgeMunicipality, IbgeState, Suggestion, SuggestionKind};

#[cfg(feature = "lookup")]
mod client {
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    use serde::Deserialize;
    use url::Url;

    use crate::cep::LookupError;

    const DEFAULT_BASE_URL: &str = "https://servicodados.ibge.gov.br";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Minimum query length before the autocomplete suggests anything.
    const MIN_QUERY_LEN: usize = 3;
    /// Suggestion list cap, as in the form's dropdown.
    const MAX_SUGGESTIONS: usize = 10;

    #[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
    pub struct IbgeState {
        pub id: u64,
        pub nome: String,
        pub sigla: String,
    }

    #[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
    pub struct IbgeMunicipality {
        pub id: u64,
        pub nome: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SuggestionKind {
        State,
        Municipality,
    }

    /// One birthplace autocomplete entry.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Suggestion {
        pub id: u64,
        pub text: String,
        pub kind: SuggestionKind,
    }

    /// IBGE localities client. States are fetched once, municipalities
    /// cached per UF for the session.
    #[derive(Debug)]
    pub struct IbgeClient {
        http: reqwest::Client,
        base_url: String,
        states: Mutex<Option<Vec<IbgeState>>>,
        municipalities: Mutex<HashMap<String, Vec<IbgeMunicipality>>>,
    }

    impl Default for IbgeClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IbgeClient {
        pub fn new() -> Self {
            let http = reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default();
            Self {
                http,
                base_url: DEFAULT_BASE_URL.to_string(),
                states: Mutex::new(None),
                municipalities: Mutex::new(HashMap::new()),
            }
        }

        pub fn with_base_url(mut self, base_url: &Url) -> Self {
            self.base_url = base_url.as_str().trim_end_matches('/').to_string();
            self
        }

        fn states_cache(&self) -> MutexGuard<'_, Option<Vec<IbgeState>>> {
            match self.states.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            }
        }

        fn municipalities_cache(&self) -> MutexGuard<'_, HashMap<String, Vec<IbgeMunicipality>>> {
            match self.municipalities.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            }
        }

        /// List the federative units, ordered by name.
        pub async fn states(&self) -> Result<Vec<IbgeState>, LookupError> {
            if let Some(states) = self.states_cache().clone() {
                return Ok(states);
            }

            let url = format!(
                "{}/api/v1/localidades/estados?orderBy=nome",
                self.base_url
            );
            let states: Vec<IbgeState> = self.fetch(&url).await?;
            *self.states_cache() = Some(states.clone());
            Ok(states)
        }

        /// List a state's municipalities, ordered by name. Cached per UF.
        pub async fn municipalities(
            &self,
            uf: &str,
        ) -> Result<Vec<IbgeMunicipality>, LookupError> {
            let uf = uf.trim().to_uppercase();
            if let Some(cached) = self.municipalities_cache().get(&uf).cloned() {
                return Ok(cached);
            }

            let url = format!(
                "{}/api/v1/localidades/estados/{}/municipios?orderBy=nome",
                self.base_url, uf
            );
            let municipalities: Vec<IbgeMunicipality> = self.fetch(&url).await?;
            self.municipalities_cache()
                .insert(uf, municipalities.clone());
            Ok(municipalities)
        }

        async fn fetch<T: serde::de::DeserializeOwned>(
            &self,
            url: &str,
        ) -> Result<T, LookupError> {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(LookupError::Network)?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(%url, status = %status, "IBGE request failed");
                return Err(LookupError::Service(status.as_u16()));
            }

            response.json().await.map_err(LookupError::Network)
        }

        /// Autocomplete over the data loaded so far. Queries shorter than
        /// three characters yield nothing; at most ten entries come back,
        /// states first.
        pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
            let query = query.trim().to_lowercase();
            if query.chars().count() < MIN_QUERY_LEN {
                return Vec::new();
            }

            let mut matches = Vec::new();

            if let Some(states) = self.states_cache().as_ref() {
                for state in states {
                    if state.nome.to_lowercase().contains(&query) {
                        matches.push(Suggestion {
                            id: state.id,
                            text: format!("{} (Estado)", state.nome),
                            kind: SuggestionKind::State,
                        });
                    }
                }
            }

            for (uf, municipalities) in self.municipalities_cache().iter() {
                for municipality in municipalities {
                    if municipality.nome.to_lowercase().contains(&query) {
                        matches.push(Suggestion {
                            id: municipality.id,
                            text: format!("{}, {}", municipality.nome, uf),
                            kind: SuggestionKind::Municipality,
                        });
                    }
                }
            }

            matches.truncate(MAX_SUGGESTIONS);
            matches
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_table_is_complete() {
        assert_eq!(BRAZILIAN_STATES.len(), 27);
        assert_eq!(state_name("SP"), Some("São Paulo"));
        assert_eq!(state_name("sp"), Some("São Paulo"));
        assert_eq!(state_name("XX"), None);
    }
}
