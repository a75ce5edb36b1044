//! Work records as returned by the bibliographic API.
//!
//! Only the fields the collaboration graph needs are modeled. Every field is
//! optional on the wire: a missing or `null` value is treated as absent, never
//! as a decode error.

use serde::{Deserialize, Serialize};

/// Institution name recorded for authors with no listed affiliation.
pub const UNKNOWN_INSTITUTION: &str = "Unknown";

/// One work (publication) and its ordered author list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub authorships: Option<Vec<Authorship>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub institutions: Option<Vec<InstitutionRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A named author paired with the single institution kept for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorAffiliation {
    pub author: String,
    pub institution: String,
}

impl Authorship {
    /// Convenience constructor used by tests and synthetic sources.
    #[must_use]
    pub fn new(author: Option<&str>, institutions: &[&str]) -> Self {
        Self {
            author: Some(AuthorRef {
                display_name: author.map(str::to_string),
            }),
            institutions: Some(
                institutions
                    .iter()
                    .map(|name| InstitutionRef {
                        display_name: Some((*name).to_string()),
                    })
                    .collect(),
            ),
        }
    }

    /// The author's display name, if present and non-empty.
    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.display_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// First listed institution's name, or [`UNKNOWN_INSTITUTION`].
    ///
    /// Only the first entry is consulted; a first entry with a missing or
    /// empty name yields `"Unknown"` even if later entries are named.
    #[must_use]
    pub fn primary_institution(&self) -> &str {
        self.institutions
            .as_deref()
            .and_then(<[InstitutionRef]>::first)
            .and_then(|inst| inst.display_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_INSTITUTION)
    }
}

impl WorkRecord {
    #[must_use]
    pub fn new(authorships: Vec<Authorship>) -> Self {
        Self {
            id: None,
            authorships: Some(authorships),
        }
    }

    /// Named authors in listed order, each with their normalized institution.
    /// Authorships without a name are dropped.
    #[must_use]
    pub fn affiliations(&self) -> Vec<AuthorAffiliation> {
        self.authorships
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|authorship| {
                authorship.author_name().map(|name| AuthorAffiliation {
                    author: name.to_string(),
                    institution: authorship.primary_institution().to_string(),
                })
            })
            .collect()
    }
}
