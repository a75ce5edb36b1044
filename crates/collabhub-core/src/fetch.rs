//! Work record retrieval.
//!
//! [`WorkSource`] is the seam between the graph builder and the outside
//! world. [`OpenAlexClient`] fetches records over blocking HTTP;
//! [`RecordSet`] serves them from memory (offline runs and tests). Any
//! `Fn(&str) -> Result<WorkRecord, FetchError>` closure is also a source.
//!
//! A source never retries: a failed id is reported once and the caller
//! decides what to do with it.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, instrument};

use crate::config::FetchConfig;
use crate::model::WorkRecord;

/// Reasons a single work record could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("empty work id")]
    EmptyId,

    #[error("API returned HTTP {status} for {work_id}")]
    Status { work_id: String, status: u16 },

    #[error("request for {work_id} failed: {message}")]
    Transport { work_id: String, message: String },

    #[error("malformed record for {work_id}: {source}")]
    Decode {
        work_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no record for {0}")]
    NotFound(String),
}

/// Anything that can resolve a work id to its record.
pub trait WorkSource {
    /// Fetch the record for one work id.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing why this id produced no record.
    fn fetch(&self, work_id: &str) -> Result<WorkRecord, FetchError>;
}

impl<F> WorkSource for F
where
    F: Fn(&str) -> Result<WorkRecord, FetchError>,
{
    fn fetch(&self, work_id: &str) -> Result<WorkRecord, FetchError> {
        self(work_id)
    }
}

/// Reduce a work id to its bare key.
///
/// Accepts `W123`, `https://openalex.org/W123`, or `openalex.org/W123/`
/// and returns `W123`. Surrounding whitespace is ignored.
#[must_use]
pub fn work_key(work_id: &str) -> &str {
    let trimmed = work_id.trim().trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

// ---------------------------------------------------------------------------
// OpenAlexClient
// ---------------------------------------------------------------------------

/// Blocking client for `GET {api_base}/works/{id}`.
pub struct OpenAlexClient {
    agent: ureq::Agent,
    api_base: String,
    mailto: Option<String>,
}

impl OpenAlexClient {
    #[must_use]
    pub fn new(config: &FetchConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build();

        Self {
            agent,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            mailto: config.mailto.clone(),
        }
    }

    fn work_url(&self, key: &str) -> String {
        format!("{}/works/{key}", self.api_base)
    }
}

impl WorkSource for OpenAlexClient {
    #[instrument(skip(self))]
    fn fetch(&self, work_id: &str) -> Result<WorkRecord, FetchError> {
        let key = work_key(work_id);
        if key.is_empty() {
            return Err(FetchError::EmptyId);
        }

        let url = self.work_url(key);
        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(mailto) = &self.mailto {
            request = request.query("mailto", mailto);
        }

        let response = request.call().map_err(|err| match err {
            ureq::Error::Status(status, _) => FetchError::Status {
                work_id: key.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => FetchError::Transport {
                work_id: key.to_string(),
                message: transport.to_string(),
            },
        })?;

        let record = response
            .into_json::<WorkRecord>()
            .map_err(|source| FetchError::Decode {
                work_id: key.to_string(),
                source,
            })?;

        debug!(
            work_id = key,
            authors = record.authorships.as_ref().map_or(0, Vec::len),
            "fetched work record"
        );
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// RecordSet
// ---------------------------------------------------------------------------

/// In-memory records keyed by bare work key.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: HashMap<String, WorkRecord>,
}

impl RecordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, work_id: &str, record: WorkRecord) {
        self.records.insert(work_key(work_id).to_string(), record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load a JSON object mapping work ids to API-shaped records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not such an object.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw: HashMap<String, WorkRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse records in {}", path.display()))?;

        let mut set = Self::new();
        for (id, record) in raw {
            set.insert(&id, record);
        }
        Ok(set)
    }
}

impl WorkSource for RecordSet {
    fn fetch(&self, work_id: &str) -> Result<WorkRecord, FetchError> {
        let key = work_key(work_id);
        if key.is_empty() {
            return Err(FetchError::EmptyId);
        }
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Authorship;

    #[test]
    fn work_key_strips_url_prefix() {
        assert_eq!(work_key("W3036371598"), "W3036371598");
        assert_eq!(work_key("https://openalex.org/W3036371598"), "W3036371598");
        assert_eq!(work_key("  https://openalex.org/W42/ "), "W42");
        assert_eq!(work_key(""), "");
    }

    #[test]
    fn record_set_matches_by_key() {
        let mut set = RecordSet::new();
        set.insert(
            "https://openalex.org/W1",
            WorkRecord::new(vec![Authorship::new(Some("Ada"), &[])]),
        );

        assert_eq!(set.len(), 1);
        assert!(set.fetch("W1").is_ok());
        assert!(set.fetch("openalex.org/W1").is_ok());
        assert!(matches!(set.fetch("W2"), Err(FetchError::NotFound(_))));
        assert!(matches!(set.fetch("  "), Err(FetchError::EmptyId)));
    }

    #[test]
    fn closures_are_sources() {
        let source = |id: &str| -> Result<WorkRecord, FetchError> {
            if id == "ok" {
                Ok(WorkRecord::default())
            } else {
                Err(FetchError::NotFound(id.to_string()))
            }
        };

        assert!(source.fetch("ok").is_ok());
        assert!(source.fetch("missing").is_err());
    }

    #[test]
    fn record_set_loads_json_map() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"{"https://openalex.org/W9": {"authorships": [{"author": {"display_name": "Ada"}}]}}"#,
        )
        .expect("write records");

        let set = RecordSet::from_json_file(&path).expect("load");
        let record = set.fetch("W9").expect("W9 present");
        assert_eq!(record.affiliations().len(), 1);
    }

    #[test]
    fn client_builds_work_url_without_double_slash() {
        let config = FetchConfig {
            api_base: "https://api.example.org/".to_string(),
            ..FetchConfig::default()
        };
        let client = OpenAlexClient::new(&config);
        assert_eq!(client.work_url("W1"), "https://api.example.org/works/W1");
    }
}
