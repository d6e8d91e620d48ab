//! Hand-built worlds for tests

use std::collections::BTreeMap;

use glam::Vec2;

use super::bezier::CubicBezier;
use super::economy::{PriceTable, Resource};
use super::world::{Island, Lighthouse, Terrain, island_name};
use crate::config::GameConfig;

/// Default config with encounters switched off
pub(crate) fn line_config() -> GameConfig {
    GameConfig {
        encounter_chance: 0.0,
        ..GameConfig::default()
    }
}

/// `n` islands on the x axis, `gap` apart, each linked to the next with a straight curve
pub(crate) fn line_islands(n: usize, gap: f32) -> Vec<Island> {
    let mut islands: Vec<Island> = (0..n)
        .map(|index| Island {
            index,
            name: island_name(index),
            position: Vec2::new(index as f32 * gap, 0.0),
            offset: Vec2::ZERO,
            terrain: Terrain {
                seed: index as u64,
                elevation: 1.0,
                size: 1.3,
                noise: 9.0,
                curve: 1.1,
            },
            docking_point: Vec2::ZERO,
            lighthouse: Lighthouse::default(),
            neighbours: Vec::new(),
            beziers: BTreeMap::new(),
            prices: PriceTable {
                base: Resource::ALL.into_iter().map(|r| (r, r.base_value())).collect(),
                cheap: None,
                expensive: None,
            },
        })
        .collect();

    for i in 0..n {
        let mut neighbours = Vec::new();
        if i > 0 {
            neighbours.push(i - 1);
        }
        if i + 1 < n {
            neighbours.push(i + 1);
        }
        let from = islands[i].dock_position();
        let beziers = neighbours
            .iter()
            .map(|&j| (j, CubicBezier::straight(from, islands[j].dock_position())))
            .collect();
        islands[i].beziers = beziers;
        islands[i].neighbours = neighbours;
    }
    islands
}
