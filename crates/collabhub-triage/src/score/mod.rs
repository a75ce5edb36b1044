//! Hub scoring and ranking.

pub mod hub;

pub use hub::{AuthorScore, HubScores, hub_score, rank_authors, score_authors, select_hubs};
