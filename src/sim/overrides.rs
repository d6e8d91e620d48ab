//! Hand-tuned per-island placement tweaks
//!
//! The table is keyed by island index in generation order. Any index that is
//! absent, and any field that is absent, falls back to the generated default.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lighthouse placement relative to the island position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LighthouseOverride {
    pub position: Vec2,
    #[serde(default)]
    pub rotation: f32,
}

/// Explicit control points for one directed edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    pub control1: Vec2,
    pub control2: Vec2,
}

/// Optional tweaks for a single island
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandOverride {
    /// Shift applied to the generated position
    pub offset: Option<Vec2>,
    /// Docking point relative to the (offset) island position
    pub docking_point: Option<Vec2>,
    pub lighthouse: Option<LighthouseOverride>,
    /// Control points for edges leaving this island, keyed by destination
    pub beziers: BTreeMap<usize, ControlPoints>,
}

/// Validated override table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideTable {
    #[serde(default)]
    islands: BTreeMap<usize, IslandOverride>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate an override document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Builder-style insert (validated)
    pub fn with_island(mut self, index: usize, entry: IslandOverride) -> Result<Self, ConfigError> {
        validate_entry(index, &entry)?;
        self.islands.insert(index, entry);
        Ok(self)
    }

    pub fn get(&self, index: usize) -> Option<&IslandOverride> {
        self.islands.get(&index)
    }

    pub fn offset(&self, index: usize) -> Vec2 {
        self.get(index).and_then(|o| o.offset).unwrap_or(Vec2::ZERO)
    }

    pub fn control_points(&self, from: usize, to: usize) -> Option<ControlPoints> {
        self.get(from).and_then(|o| o.beziers.get(&to)).copied()
    }

    /// Highest island index mentioned, if any
    pub fn max_index(&self) -> Option<usize> {
        self.islands.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&index, entry) in &self.islands {
            validate_entry(index, entry)?;
        }
        Ok(())
    }
}

fn check_vec(field: String, v: Vec2) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{v} is not finite")))
    }
}

fn validate_entry(index: usize, entry: &IslandOverride) -> Result<(), ConfigError> {
    if let Some(offset) = entry.offset {
        check_vec(format!("islands.{index}.offset"), offset)?;
    }
    if let Some(dock) = entry.docking_point {
        check_vec(format!("islands.{index}.docking_point"), dock)?;
    }
    if let Some(lighthouse) = entry.lighthouse {
        check_vec(format!("islands.{index}.lighthouse.position"), lighthouse.position)?;
        if !lighthouse.rotation.is_finite() {
            return Err(ConfigError::invalid(
                format!("islands.{index}.lighthouse.rotation"),
                "not finite",
            ));
        }
    }
    for (&to, cp) in &entry.beziers {
        if to == index {
            return Err(ConfigError::invalid(
                format!("islands.{index}.beziers.{to}"),
                "an island cannot be its own neighbour",
            ));
        }
        check_vec(format!("islands.{index}.beziers.{to}.control1"), cp.control1)?;
        check_vec(format!("islands.{index}.beziers.{to}.control2"), cp.control2)?;
    }
    Ok(())
}
