//! Hub placement overrides.
//!
//! After the spring layout, hubs are moved so the picture reads from the
//! middle out: the center author, when selected, sits at the origin, and every
//! other hub at rank position `i` (0-based, counting the center author if it
//! is a hub) sits on the spiral `r = 1 + 0.1 i`, `θ = 0.5 i`. Non-hub nodes
//! keep their spring positions.

use collabhub_core::config::LayoutConfig;
use tracing::{debug, instrument};

use super::{Layout, Position, spring_layout};
use crate::graph::CollabGraph;
use crate::score::{AuthorScore, HubScores, select_hubs};

const SPIRAL_BASE_RADIUS: f64 = 1.0;
const SPIRAL_RADIUS_STEP: f64 = 0.1;
const SPIRAL_ANGLE_STEP: f64 = 0.5;

/// Spiral slot for the hub at 0-based rank position `i`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn spiral_position(i: usize) -> Position {
    let i = i as f64;
    let r = SPIRAL_RADIUS_STEP.mul_add(i, SPIRAL_BASE_RADIUS);
    let theta = SPIRAL_ANGLE_STEP * i;
    Position::new(r * theta.cos(), r * theta.sin())
}

/// Pin `center_author` to the origin if it is one of `hubs`, and move every
/// other hub to its spiral slot. Nodes outside `hubs` are left untouched.
#[instrument(skip(layout, g, hubs), fields(hubs = hubs.len()))]
pub fn apply_hub_overrides(
    layout: &mut Layout,
    g: &CollabGraph,
    hubs: &[AuthorScore],
    center_author: &str,
) {
    let mut center_pinned = false;

    for (i, hub) in hubs.iter().enumerate() {
        let Some(idx) = g.node_index(&hub.name) else {
            continue;
        };
        if hub.name == center_author {
            layout.set(idx, Position::ORIGIN);
            center_pinned = true;
        } else {
            layout.set(idx, spiral_position(i));
        }
    }

    if !center_pinned {
        debug!(center_author, "center author is not a selected hub");
    }
}

/// Selected hubs in rank order plus final positions for every node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubLayout {
    pub ranked: Vec<AuthorScore>,
    pub layout: Layout,
}

/// Rank authors, keep the top `min(k, n)`, lay out the whole graph, and apply
/// the hub overrides.
#[must_use]
#[instrument(skip(g, scores, config))]
pub fn select_and_layout(
    g: &CollabGraph,
    scores: &HubScores,
    center_author: &str,
    k: usize,
    config: &LayoutConfig,
) -> HubLayout {
    let ranked = select_hubs(scores, k);
    let mut layout = spring_layout(g, config);
    apply_hub_overrides(&mut layout, g, &ranked, center_author);
    HubLayout { ranked, layout }
}
