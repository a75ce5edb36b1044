//! Visual styling and the render scene.
//!
//! Everything here is a pure function of hub rank, institution, and the
//! center author, so a picture can be reproduced from the hub table alone.
//! [`build_scene`] turns a scored, laid-out graph into a [`RenderScene`]: a
//! flat list of edges, node discs, and labels in draw order, with no
//! dependency on any raster library.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::CollabGraph;
use crate::graph::build::Affiliations;
use crate::layout::{Layout, Position};
use crate::score::AuthorScore;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// An sRGB color with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }
}

/// The ten-color categorical palette ("tab10").
pub const PALETTE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

pub const GOLD: Color = Color::rgb(0xff, 0xd7, 0x00);
pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
pub const LIGHT_GRAY: Color = Color::rgb(0xd3, 0xd3, 0xd3);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

pub const EDGE_ALPHA: f64 = 0.2;
pub const EDGE_WIDTH: f64 = 0.5;
pub const REGULAR_NODE_SIZE: f64 = 20.0;
pub const REGULAR_NODE_ALPHA: f64 = 0.6;
pub const HUB_OUTLINE_WIDTH: f64 = 1.0;
pub const LABEL_OFFSET: f64 = 0.1;
pub const TITLE_FONT_SIZE: f64 = 18.0;
pub const LEGEND_TITLE: &str = "Institutions";
pub const LEGEND_FONT_SIZE: f64 = 10.0;

#[must_use]
pub const fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Institution → palette index: sorted unique names, index modulo 10.
#[must_use]
pub fn institution_colors(affiliations: &Affiliations) -> BTreeMap<String, usize> {
    let mut names: Vec<&String> = affiliations.values().collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i % PALETTE.len()))
        .collect()
}

// ---------------------------------------------------------------------------
// Rank tiers
// ---------------------------------------------------------------------------

/// Marker area (points²) for the hub at 0-based rank position `i`.
///
/// Never smaller than a regular node, however many hubs are selected.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hub_node_size(i: usize) -> f64 {
    let size = if i < 10 {
        15.0f64.mul_add(-(i as f64), 300.0)
    } else {
        5.0f64.mul_add(-((i - 10) as f64), 150.0)
    };
    size.max(REGULAR_NODE_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    pub font_size: f64,
    pub box_alpha: f64,
    pub edge_color: Color,
    /// Box padding, in multiples of the font size.
    pub pad: f64,
}

/// Label styling for a 1-based rank.
#[must_use]
pub const fn label_style(rank: usize) -> LabelStyle {
    if rank <= 10 {
        LabelStyle {
            font_size: 12.0,
            box_alpha: 0.8,
            edge_color: GRAY,
            pad: 0.2,
        }
    } else {
        LabelStyle {
            font_size: 10.0,
            box_alpha: 0.6,
            edge_color: LIGHT_GRAY,
            pad: 0.1,
        }
    }
}

#[must_use]
pub fn label_text(rank: usize, name: &str) -> String {
    format!("{rank}. {name}")
}

#[must_use]
pub fn title(hub_count: usize) -> String {
    format!("Top {hub_count} Hub Nodes in Collaboration Network")
}

/// Fill color for a hub: gold for the center author, else its institution's
/// palette color (index 0 for an unlisted institution).
#[must_use]
pub fn hub_color(
    name: &str,
    institution: Option<&str>,
    colors: &BTreeMap<String, usize>,
    center_author: &str,
) -> Color {
    if name == center_author {
        return GOLD;
    }
    let index = institution.and_then(|inst| colors.get(inst)).copied().unwrap_or(0);
    palette_color(index)
}

// ---------------------------------------------------------------------------
// RenderScene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneEdge {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneNode {
    pub position: Position,
    /// Marker area in points².
    pub size: f64,
    pub fill: Color,
    pub outline: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLabel {
    /// Where the label box is centered.
    pub anchor: Position,
    pub text: String,
    pub style: LabelStyle,
}

/// One institution swatch in the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub institution: String,
    pub color: Color,
}

/// Everything a renderer needs, in draw order: edges, regular nodes, hub
/// nodes, labels, then the institution legend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderScene {
    pub title: String,
    pub edges: Vec<SceneEdge>,
    pub edge_color: Option<Color>,
    pub edge_width: f64,
    pub nodes: Vec<SceneNode>,
    pub labels: Vec<SceneLabel>,
    /// Institutions that color at least one regular node, in palette order.
    pub legend: Vec<LegendEntry>,
}

/// Lay out the full picture for a ranked, positioned graph.
#[must_use]
pub fn build_scene(
    g: &CollabGraph,
    layout: &Layout,
    hubs: &[AuthorScore],
    affiliations: &Affiliations,
    center_author: &str,
) -> RenderScene {
    let colors = institution_colors(affiliations);
    let position = |name: &str| g.node_index(name).and_then(|idx| layout.get(idx));

    let edges = g
        .edge_pairs()
        .filter_map(|(a, b)| Some(SceneEdge { from: position(a)?, to: position(b)? }))
        .collect();

    let is_hub = |name: &str| hubs.iter().any(|h| h.name == name);

    let legend = colors
        .iter()
        .filter(|&(inst, _)| {
            g.authors()
                .any(|name| !is_hub(name) && affiliations.get(name) == Some(inst))
        })
        .map(|(inst, &index)| LegendEntry {
            institution: inst.clone(),
            color: palette_color(index).with_alpha(REGULAR_NODE_ALPHA),
        })
        .collect();

    let mut nodes: Vec<SceneNode> = g
        .authors()
        .filter(|&name| !is_hub(name))
        .filter_map(|name| {
            let index = affiliations
                .get(name)
                .and_then(|inst| colors.get(inst))
                .copied()
                .unwrap_or(0);
            Some(SceneNode {
                position: position(name)?,
                size: REGULAR_NODE_SIZE,
                fill: palette_color(index).with_alpha(REGULAR_NODE_ALPHA),
                outline: None,
            })
        })
        .collect();

    let mut labels = Vec::with_capacity(hubs.len());
    for (i, hub) in hubs.iter().enumerate() {
        let Some(pos) = position(&hub.name) else {
            continue;
        };
        let institution = affiliations.get(&hub.name).map(String::as_str);
        nodes.push(SceneNode {
            position: pos,
            size: hub_node_size(i),
            fill: hub_color(&hub.name, institution, &colors, center_author),
            outline: Some(BLACK),
        });

        let rank = i + 1;
        labels.push(SceneLabel {
            anchor: Position::new(pos.x, pos.y + LABEL_OFFSET),
            text: label_text(rank, &hub.name),
            style: label_style(rank),
        });
    }

    RenderScene {
        title: title(hubs.len()),
        edges,
        edge_color: Some(GRAY.with_alpha(EDGE_ALPHA)),
        edge_width: EDGE_WIDTH,
        nodes,
        labels,
        legend,
    }
}
