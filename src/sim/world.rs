//! Island layout generation
//!
//! Islands are scattered by rejection sampling, connected to every island
//! within `neighbour_distance`, and each directed edge gets a precomputed
//! travel curve between docking points.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bezier::CubicBezier;
use super::economy::PriceTable;
use super::overrides::OverrideTable;
use super::rng::{STREAM_PLACEMENT, STREAM_PRICES, SimRng};
use crate::config::WorldConfig;

/// Island names handed out in generation order
pub const ISLAND_NAMES: [&str; 10] = [
    "Azure Atoll",
    "Borealis Bay",
    "Garnet Grotto",
    "Ivory Isle",
    "Kraken's Key",
    "Lapis Lagoon",
    "Port Peregrine",
    "Riptide Rock",
    "Silver Shoals",
    "Wake of Whispers",
];

/// Docking point relative to the island center when not overridden
pub const DEFAULT_DOCKING_POINT: Vec2 = Vec2::new(-3.0, 0.0);

/// Terrain generator inputs (consumed by the renderer only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub seed: u64,
    pub elevation: f32,
    pub size: f32,
    pub noise: f32,
    pub curve: f32,
}

impl Terrain {
    fn for_island(world_seed: u64, index: usize) -> Self {
        Self {
            seed: world_seed.wrapping_add(index as u64),
            elevation: 1.0,
            size: 1.3,
            noise: 9.0,
            curve: 1.1,
        }
    }
}

/// Lighthouse marker relative to the island position (render only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Lighthouse {
    pub position: Vec2,
    pub rotation: f32,
}

/// A generated island
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Island {
    pub index: usize,
    pub name: String,
    /// Generated position
    pub position: Vec2,
    /// Hand-tuned shift on top of `position`
    pub offset: Vec2,
    pub terrain: Terrain,
    /// Boat attachment point relative to `world_position()`
    pub docking_point: Vec2,
    pub lighthouse: Lighthouse,
    /// Neighbour indices, nearest first
    pub neighbours: Vec<usize>,
    /// Travel curve for each outgoing edge
    pub beziers: BTreeMap<usize, CubicBezier>,
    pub prices: PriceTable,
}

impl Island {
    /// Position after overrides
    pub fn world_position(&self) -> Vec2 {
        self.position + self.offset
    }

    /// Where the boat moors, in world coordinates
    pub fn dock_position(&self) -> Vec2 {
        self.world_position() + self.docking_point
    }

    pub fn is_neighbour(&self, other: usize) -> bool {
        self.neighbours.contains(&other)
    }

    pub fn curve_to(&self, other: usize) -> Option<&CubicBezier> {
        self.beziers.get(&other)
    }
}

/// Name for the island at `index`
pub fn island_name(index: usize) -> String {
    ISLAND_NAMES
        .get(index)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| format!("Island {}", index + 1))
}

/// Rejection-sample island centers
///
/// Islands that cannot be placed within `max_tries` attempts are skipped, so
/// the result may hold fewer than `count` positions.
pub fn place_islands(config: &WorldConfig, rng: &mut SimRng) -> Vec<Vec2> {
    let mut placed: Vec<Vec2> = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let mut accepted = None;
        for _ in 0..config.max_tries {
            let x = (rng.next_f32() - 0.5) * config.spread;
            let y = (rng.next_f32() - 0.5) * config.spread;
            let candidate = Vec2::new(x, y);
            if placed.iter().all(|p| p.distance(candidate) >= config.buffer) {
                accepted = Some(candidate);
                break;
            }
        }
        if let Some(pos) = accepted {
            placed.push(pos);
        }
    }
    placed
}

/// Generate the full archipelago
pub fn generate_islands(config: &WorldConfig, overrides: &OverrideTable) -> Vec<Island> {
    let mut placement = SimRng::new(config.seed, STREAM_PLACEMENT);
    let mut prices = SimRng::new(config.seed, STREAM_PRICES);

    let positions = place_islands(config, &mut placement);
    if positions.len() < config.count {
        log::warn!(
            "Placed {} of {} islands (spread={}, buffer={}, max_tries={})",
            positions.len(),
            config.count,
            config.spread,
            config.buffer,
            config.max_tries
        );
    }
    if let Some(max) = overrides.max_index() {
        if max >= positions.len() {
            log::warn!(
                "Override table mentions island {} but only {} were generated; extra entries ignored",
                max,
                positions.len()
            );
        }
    }

    let mut islands: Vec<Island> = positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| {
            let entry = overrides.get(index);
            Island {
                index,
                name: island_name(index),
                position,
                offset: overrides.offset(index),
                terrain: Terrain::for_island(config.seed, index),
                docking_point: entry
                    .and_then(|o| o.docking_point)
                    .unwrap_or(DEFAULT_DOCKING_POINT),
                lighthouse: entry
                    .and_then(|o| o.lighthouse)
                    .map(|l| Lighthouse {
                        position: l.position,
                        rotation: l.rotation,
                    })
                    .unwrap_or_default(),
                neighbours: Vec::new(),
                beziers: BTreeMap::new(),
                prices: PriceTable::roll(&mut prices),
            }
        })
        .collect();

    connect_neighbours(&mut islands, config.neighbour_distance);
    build_curves(&mut islands, overrides);

    log::info!(
        "Generated {} islands, {} edges (seed={})",
        islands.len(),
        islands.iter().map(|i| i.neighbours.len()).sum::<usize>() / 2,
        config.seed
    );
    islands
}

/// Link islands closer than `threshold`, nearest first, then enforce symmetry
pub fn connect_neighbours(islands: &mut [Island], threshold: f32) {
    let positions: Vec<Vec2> = islands.iter().map(Island::world_position).collect();
    for (i, island) in islands.iter_mut().enumerate() {
        let mut near: Vec<(usize, f32)> = positions
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, p)| (j, positions[i].distance(*p)))
            .filter(|&(_, d)| d < threshold)
            .collect();
        near.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        island.neighbours = near.into_iter().map(|(j, _)| j).collect();
    }

    let one_sided = asymmetric_edges(islands);
    if !one_sided.is_empty() {
        log::warn!("Dropping {} one-sided neighbour edges", one_sided.len());
        for (i, j) in one_sided {
            islands[i].neighbours.retain(|&n| n != j);
        }
    }
}

/// Edges `(i, j)` where `j` lists as a neighbour of `i` but not the reverse
pub fn asymmetric_edges(islands: &[Island]) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for (i, island) in islands.iter().enumerate() {
        for &j in &island.neighbours {
            let mutual = islands.get(j).is_some_and(|other| other.is_neighbour(i));
            if !mutual {
                edges.push((i, j));
            }
        }
    }
    edges
}

/// Precompute a curve for every directed edge
pub fn build_curves(islands: &mut [Island], overrides: &OverrideTable) {
    let docks: Vec<Vec2> = islands.iter().map(Island::dock_position).collect();
    for (i, island) in islands.iter_mut().enumerate() {
        island.beziers = island
            .neighbours
            .iter()
            .map(|&j| {
                let curve = match overrides.control_points(i, j) {
                    Some(cp) => CubicBezier::new(docks[i], cp.control1, cp.control2, docks[j]),
                    None => CubicBezier::between(docks[i], docks[j]),
                };
                (j, curve)
            })
            .collect();
    }
}
