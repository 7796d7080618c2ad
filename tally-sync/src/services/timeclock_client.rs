//! Time-tracking provider API client
//!
//! Talks to the provider's three endpoints: identity (OAuth2 token),
//! time-tracking (one day's entries) and workspace (people profiles).
//! Fetched entries are enriched with each person's email and normalized
//! full name before the pipeline sees them.

use crate::models::{Coordinates, EventKind, ExternalEvent};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tally_common::config::TomlConfig;
use thiserror::Error;

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identity.prod.jibble.io";
const DEFAULT_TRACKING_BASE_URL: &str = "https://time-tracking.prod.jibble.io/v1";
const DEFAULT_WORKSPACE_BASE_URL: &str = "https://workspace.prod.jibble.io/v1";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Longest response-body excerpt carried in an error
const BODY_SNIPPET_LEN: usize = 300;

/// Provider client errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// OData-style list envelope used by the provider
#[derive(Debug, Deserialize)]
struct ODataList<T> {
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// One raw time entry as returned by the tracking endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimeEntry {
    pub person_id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub time: String,
    pub coordinates: Option<Coordinates>,
}

/// One person profile as returned by the workspace endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Provider API client
pub struct TimeclockClient {
    http_client: reqwest::Client,
    identity_base_url: String,
    tracking_base_url: String,
    workspace_base_url: String,
    client_id: String,
    client_secret: String,
}

impl TimeclockClient {
    pub fn new(
        config: &TomlConfig,
        client_id: String,
        client_secret: String,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            identity_base_url: config
                .identity_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string()),
            tracking_base_url: config
                .tracking_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TRACKING_BASE_URL.to_string()),
            workspace_base_url: config
                .workspace_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_WORKSPACE_BASE_URL.to_string()),
            client_id,
            client_secret,
        })
    }

    /// Obtain an OAuth2 access token via client credentials
    pub async fn get_access_token(&self) -> Result<String, ProviderError> {
        let url = format!("{}/connect/token", self.identity_base_url);

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                snippet(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(token.access_token)
    }

    /// Fetch one calendar day's time entries, archived excluded, ordered
    /// ascending by time
    pub async fn fetch_time_entries(
        &self,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<RawTimeEntry>, ProviderError> {
        let url = format!("{}/TimeEntries", self.tracking_base_url);
        let filter = format!("(belongsToDate eq {} and status ne 'Archived')", date);

        tracing::debug!(date = %date, "Fetching time entries");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("$count", "true"),
                ("$filter", filter.as_str()),
                ("$orderby", "time asc"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), snippet(&body)));
        }

        let list: ODataList<RawTimeEntry> = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(list.value)
    }

    /// Fetch all people profiles in the workspace
    pub async fn fetch_people(&self, token: &str) -> Result<Vec<PersonProfile>, ProviderError> {
        let url = format!("{}/People", self.workspace_base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), snippet(&body)));
        }

        let list: ODataList<PersonProfile> = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(list.value)
    }

    /// Fetch one day's events, enriched with each person's email and
    /// normalized full name from the people profiles
    pub async fn fetch_day_events(
        &self,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<ExternalEvent>, ProviderError> {
        let people = self.fetch_people(token).await?;
        let entries = self.fetch_time_entries(date, token).await?;

        tracing::info!(
            date = %date,
            entries = entries.len(),
            people = people.len(),
            "Fetched provider data"
        );

        Ok(enrich_entries(entries, &people))
    }
}

/// Attach provider-side identity (email, normalized name) to each raw entry
pub fn enrich_entries(entries: Vec<RawTimeEntry>, people: &[PersonProfile]) -> Vec<ExternalEvent> {
    let email_by_person: HashMap<&str, &str> = people
        .iter()
        .filter_map(|p| p.email.as_deref().map(|e| (p.id.as_str(), e)))
        .collect();
    let name_by_person: HashMap<&str, &str> = people
        .iter()
        .filter_map(|p| p.full_name.as_deref().map(|n| (p.id.as_str(), n)))
        .collect();

    entries
        .into_iter()
        .map(|entry| ExternalEvent {
            resolved_email: email_by_person
                .get(entry.person_id.as_str())
                .map(|e| e.to_string()),
            fallback_name: name_by_person
                .get(entry.person_id.as_str())
                .map(|n| n.trim().to_lowercase()),
            kind: EventKind::parse(&entry.entry_type),
            person_id: entry.person_id,
            time: entry.time,
            coordinates: entry.coordinates,
        })
        .collect()
}

/// Bounded response-body excerpt for error messages
fn snippet(body: &str) -> String {
    if body.chars().count() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, email: Option<&str>, name: Option<&str>) -> PersonProfile {
        PersonProfile {
            id: id.to_string(),
            email: email.map(str::to_string),
            full_name: name.map(str::to_string),
        }
    }

    fn raw(person_id: &str, entry_type: &str, time: &str) -> RawTimeEntry {
        RawTimeEntry {
            person_id: person_id.to_string(),
            entry_type: entry_type.to_string(),
            time: time.to_string(),
            coordinates: None,
        }
    }

    #[test]
    fn test_client_uses_default_urls() {
        let client =
            TimeclockClient::new(&TomlConfig::default(), "id".into(), "secret".into()).unwrap();
        assert_eq!(client.identity_base_url, DEFAULT_IDENTITY_BASE_URL);
        assert_eq!(client.tracking_base_url, DEFAULT_TRACKING_BASE_URL);
        assert_eq!(client.workspace_base_url, DEFAULT_WORKSPACE_BASE_URL);
    }

    #[test]
    fn test_client_honors_url_overrides() {
        let config = TomlConfig {
            identity_base_url: Some("http://localhost:9001".to_string()),
            tracking_base_url: Some("http://localhost:9002/v1".to_string()),
            workspace_base_url: Some("http://localhost:9003/v1".to_string()),
            ..Default::default()
        };
        let client = TimeclockClient::new(&config, "id".into(), "secret".into()).unwrap();
        assert_eq!(client.identity_base_url, "http://localhost:9001");
    }

    #[test]
    fn test_enrich_attaches_email_and_name() {
        let people = vec![profile("p1", Some("a@x.com"), Some("  Alice Ahmed "))];
        let events = enrich_entries(vec![raw("p1", "In", "2024-01-01T08:00:00Z")], &people);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].resolved_email.as_deref(), Some("a@x.com"));
        assert_eq!(events[0].fallback_name.as_deref(), Some("alice ahmed"));
        assert_eq!(events[0].kind, EventKind::In);
    }

    #[test]
    fn test_enrich_unknown_person_left_bare() {
        let people = vec![profile("p1", Some("a@x.com"), Some("Alice"))];
        let events = enrich_entries(vec![raw("p9", "Out", "2024-01-01T16:00:00Z")], &people);

        assert_eq!(events[0].resolved_email, None);
        assert_eq!(events[0].fallback_name, None);
    }

    #[test]
    fn test_enrich_person_without_email_keeps_name() {
        let people = vec![profile("p1", None, Some("Alice Ahmed"))];
        let events = enrich_entries(vec![raw("p1", "In", "2024-01-01T08:00:00Z")], &people);

        assert_eq!(events[0].resolved_email, None);
        assert_eq!(events[0].fallback_name.as_deref(), Some("alice ahmed"));
    }

    #[test]
    fn test_time_entry_wire_shape() {
        let json = r#"{
            "personId": "p1",
            "type": "In",
            "time": "2024-01-01T08:00:00.1234567Z",
            "coordinates": {"latitude": 30.0, "longitude": 31.2}
        }"#;
        let entry: RawTimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.person_id, "p1");
        assert_eq!(entry.entry_type, "In");
        assert_eq!(entry.coordinates.unwrap().latitude, 30.0);
    }

    #[test]
    fn test_person_wire_shape_with_nulls() {
        let json = r#"{"id": "p1", "email": null, "fullName": "Alice"}"#;
        let person: PersonProfile = serde_json::from_str(json).unwrap();
        assert_eq!(person.email, None);
        assert_eq!(person.full_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_snippet_bounds_body() {
        let body = "y".repeat(1000);
        assert_eq!(snippet(&body).len(), BODY_SNIPPET_LEN);
        assert_eq!(snippet("short"), "short");
    }
}
