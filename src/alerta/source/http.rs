use super::RecordSource;
use crate::config::AlertaConfig;
use crate::error::{AlertaError, Result};
use crate::model::OccurrenceDraft;
use crate::normalize::{RawLogEntry, RawOccurrence, RawProfile};
use crate::session::Session;
use serde::de::DeserializeOwned;

/// Reads records from the dispatch center's JSON API.
pub struct HttpSource {
    base_url: String,
    occurrences_path: String,
    logs_path: String,
    profile_path: String,
    session: Session,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(config: &AlertaConfig, session: Session) -> Self {
        // Non-2xx responses are read so their body can be reported.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            occurrences_path: config.occurrences_path.clone(),
            logs_path: config.logs_path.clone(),
            profile_path: config.profile_path.clone(),
            session,
            agent,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::info!(%url, "fetching");

        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(auth) = self.session.authorization_header() {
            request = request.header("Authorization", &auth);
        }
        let response = request.call()?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response
                .into_body()
                .read_to_string()
                .unwrap_or_default();
            tracing::warn!(%url, status, "fetch failed");
            return Err(AlertaError::Fetch { status, body });
        }

        let parsed = response
            .into_body()
            .read_json::<T>()
            .map_err(|e| AlertaError::Source(format!("could not parse {}: {}", url, e)))?;
        tracing::info!(%url, "fetch finished");
        Ok(parsed)
    }
}

impl RecordSource for HttpSource {
    fn fetch_occurrences(&self) -> Result<Vec<RawOccurrence>> {
        self.get_json(&self.occurrences_path)
    }

    fn fetch_logs(&self) -> Result<Vec<RawLogEntry>> {
        self.get_json(&self.logs_path)
    }

    fn fetch_profile(&self) -> Result<RawProfile> {
        self.get_json(&self.profile_path)
    }

    fn submit_occurrence(&mut self, _draft: &OccurrenceDraft) -> Result<u64> {
        Err(AlertaError::Source(
            "the API does not accept registrations from this client".to_string(),
        ))
    }
}
