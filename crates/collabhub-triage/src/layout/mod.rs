//! 2-D node placement.
//!
//! [`spring::spring_layout`] positions every node with a seeded force-directed
//! pass; [`hubs::apply_hub_overrides`] then pins a selected center author to the
//! origin and places the other hubs on an outward spiral.

pub mod hubs;
pub mod spring;

use petgraph::graph::NodeIndex;
use serde::Serialize;

pub use hubs::{HubLayout, apply_hub_overrides, select_and_layout, spiral_position};
pub use spring::spring_layout;

/// A point in layout space. Spring output spans roughly `[-1, 1]` per axis;
/// spiral overrides extend beyond that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const ORIGIN: Self = Self::new(0.0, 0.0);
}

/// Positions indexed by node index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<Position>,
}

impl Layout {
    #[must_use]
    pub const fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: NodeIndex) -> Option<Position> {
        self.positions.get(idx.index()).copied()
    }

    pub fn set(&mut self, idx: NodeIndex, pos: Position) {
        if let Some(slot) = self.positions.get_mut(idx.index()) {
            *slot = pos;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Position)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (NodeIndex::new(i), *p))
    }
}
