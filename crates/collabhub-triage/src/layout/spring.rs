//! Seeded Fruchterman–Reingold spring layout.
//!
//! # Algorithm
//!
//! 1. Place every node uniformly at random in the unit square using a
//!    [`StdRng`] seeded from the config.
//! 2. For `iterations` rounds, push every pair of nodes apart with force
//!    `k² / d` and pull every connected pair together with force `d² / k`,
//!    where `k` is the configured spacing and `d` the pair distance (clipped
//!    below at 0.01).
//! 3. Each node moves along its net displacement by the current temperature,
//!    which starts at a tenth of the initial spread and falls linearly.
//!    Iteration stops early once the mean step is below `1e-4`.
//! 4. Recenter on the mean and rescale so the largest absolute coordinate is 1.
//!
//! # Determinism
//!
//! All passes run over nodes sorted by author name, so two graphs with the same
//! authors and collaborations produce bit-identical layouts regardless of
//! insertion order.

use collabhub_core::config::LayoutConfig;
use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use super::{Layout, Position};
use crate::graph::CollabGraph;

const MIN_DISTANCE: f64 = 0.01;
const MIN_DISPLACEMENT: f64 = 0.01;
const STALLED_DISPLACEMENT: f64 = 0.1;
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// Compute positions for every node of `g`.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn spring_layout(g: &CollabGraph, config: &LayoutConfig) -> Layout {
    let n = g.node_count();
    if n == 0 {
        return Layout::default();
    }
    if n == 1 {
        return Layout::from_positions(vec![Position::ORIGIN]);
    }

    // order[i] = node index of the i-th author by name.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        g.author(NodeIndex::new(a))
            .cmp(g.author(NodeIndex::new(b)))
    });
    let mut rank = vec![0usize; n];
    for (i, &node) in order.iter().enumerate() {
        rank[node] = i;
    }

    // Neighbor lists in sorted-name space.
    let adjacency = g.adjacency();
    let neighbors: Vec<Vec<usize>> = order
        .iter()
        .map(|&node| {
            let mut nbrs: Vec<usize> = adjacency[node].iter().map(|&u| rank[u]).collect();
            nbrs.sort_unstable();
            nbrs
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.r#gen::<f64>(), rng.r#gen::<f64>()]).collect();

    let k = config.spacing;
    let mut t = initial_temperature(&pos);
    let dt = t / (config.iterations as f64 + 1.0);

    let mut displacement = vec![[0.0_f64; 2]; n];
    let mut rounds = 0;

    for _ in 0..config.iterations {
        rounds += 1;

        for i in 0..n {
            let mut disp = [0.0, 0.0];

            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let push = k * k / (dist * dist);
                disp[0] += dx * push;
                disp[1] += dy * push;
            }

            for &j in &neighbors[i] {
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let pull = dist / k;
                disp[0] -= dx * pull;
                disp[1] -= dy * pull;
            }

            displacement[i] = disp;
        }

        let mut step_norm_sq = 0.0;
        for (p, &[dx, dy]) in pos.iter_mut().zip(&displacement) {
            let mut length = dx.hypot(dy);
            if length < MIN_DISPLACEMENT {
                length = STALLED_DISPLACEMENT;
            }
            let sx = dx * t / length;
            let sy = dy * t / length;
            p[0] += sx;
            p[1] += sy;
            step_norm_sq += sx * sx + sy * sy;
        }

        t -= dt;
        if step_norm_sq.sqrt() / (n as f64) < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    rescale(&mut pos);
    debug!(rounds, "spring layout finished");

    let mut positions = vec![Position::ORIGIN; n];
    for (i, &node) in order.iter().enumerate() {
        positions[node] = Position::new(pos[i][0], pos[i][1]);
    }
    Layout::from_positions(positions)
}

fn initial_temperature(pos: &[[f64; 2]]) -> f64 {
    let span = |axis: usize| {
        let (lo, hi) = pos
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
        hi - lo
    };
    span(0).max(span(1)) * 0.1
}

/// Center on the mean and scale so the largest absolute coordinate is 1.
#[allow(clippy::cast_precision_loss)]
fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut lim = 0.0_f64;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }

    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= lim;
            p[1] /= lim;
        }
    }
}
