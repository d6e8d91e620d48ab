//! Resources, inventory and island price tables
//!
//! Prices are stored once per island as base values. The discount/premium
//! for the current voyage is applied when a price is read.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::rng::SimRng;

/// Everything that can sit in the hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Fuel,
    Fish,
    Timber,
    Rum,
    Spices,
    Silk,
}

impl Resource {
    /// Fuel first, then commodities by base value
    pub const ALL: [Resource; 6] = [
        Resource::Fuel,
        Resource::Fish,
        Resource::Timber,
        Resource::Rum,
        Resource::Spices,
        Resource::Silk,
    ];

    /// Tradable goods that take part in deals
    pub const COMMODITIES: [Resource; 5] = [
        Resource::Fish,
        Resource::Timber,
        Resource::Rum,
        Resource::Spices,
        Resource::Silk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Fuel => "fuel",
            Resource::Fish => "fish",
            Resource::Timber => "timber",
            Resource::Rum => "rum",
            Resource::Spices => "spices",
            Resource::Silk => "silk",
        }
    }

    /// Nominal commodity value before the ±20% island roll (fuel is dynamic)
    pub fn base_value(&self) -> u32 {
        match self {
            Resource::Fuel => FUEL_BASE_PRICE,
            Resource::Fish => 8,
            Resource::Timber => 12,
            Resource::Rum => 15,
            Resource::Spices => 25,
            Resource::Silk => 40,
        }
    }

    pub fn is_commodity(&self) -> bool {
        *self != Resource::Fuel
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fuel price before any voyage has been made
pub const FUEL_BASE_PRICE: u32 = 10;
/// Range of the per-island fuel price rolled at generation
pub const FUEL_GENERATION_RANGE: (u32, u32) = (8, 12);
/// Commodity prices vary by this fraction around their base value
pub const COMMODITY_VARIANCE: f32 = 0.2;
/// Divisor applied to the cheap commodity, multiplier to the expensive one
pub const DEAL_FACTOR: u32 = 3;

/// Fuel price after `move_count` completed voyages
///
/// Linear for the first ten voyages, then convex.
pub fn fuel_price(move_count: u32) -> u32 {
    let m = move_count as f64;
    let late = (m - 10.0).max(0.0);
    (10.0 + 5.0 * m + 0.75 * late * late).round() as u32
}

/// One inventory line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub resource: Resource,
    pub quantity: u32,
}

/// Quantities held, one slot per resource in `Resource::ALL` order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: Resource::ALL
                .into_iter()
                .map(|resource| InventorySlot {
                    resource,
                    quantity: 0,
                })
                .collect(),
        }
    }
}

impl Inventory {
    /// Empty hold with `fuel` units of fuel
    pub fn with_fuel(fuel: u32) -> Self {
        let mut inventory = Self::default();
        inventory.set(Resource::Fuel, fuel);
        inventory
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn get(&self, resource: Resource) -> u32 {
        self.slots
            .iter()
            .find(|s| s.resource == resource)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut InventorySlot {
        let idx = match self.slots.iter().position(|s| s.resource == resource) {
            Some(idx) => idx,
            None => {
                self.slots.push(InventorySlot {
                    resource,
                    quantity: 0,
                });
                self.slots.len() - 1
            }
        };
        &mut self.slots[idx]
    }

    pub fn set(&mut self, resource: Resource, quantity: u32) {
        self.slot_mut(resource).quantity = quantity;
    }

    /// Add `delta` (may be negative), clamping at zero. Returns the new quantity.
    pub fn adjust(&mut self, resource: Resource, delta: i64) -> u32 {
        let slot = self.slot_mut(resource);
        let next = (slot.quantity as i64)
            .saturating_add(delta)
            .clamp(0, u32::MAX as i64);
        slot.quantity = next as u32;
        slot.quantity
    }

    /// Remove one unit if any is held
    pub fn take_one(&mut self, resource: Resource) -> bool {
        let slot = self.slot_mut(resource);
        if slot.quantity == 0 {
            return false;
        }
        slot.quantity -= 1;
        true
    }
}

/// An island's market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    /// Base prices; always contains fuel
    pub base: BTreeMap<Resource, u32>,
    /// Commodity sold at a third of its price this voyage
    pub cheap: Option<Resource>,
    /// Commodity fetching triple its price this voyage
    pub expensive: Option<Resource>,
}

impl PriceTable {
    /// Roll a fresh market from the price stream
    pub fn roll(rng: &mut SimRng) -> Self {
        let (lo, hi) = FUEL_GENERATION_RANGE;
        let mut base = BTreeMap::new();
        base.insert(Resource::Fuel, lo + rng.below((hi - lo + 1) as usize) as u32);
        for resource in Resource::COMMODITIES {
            let factor = 1.0 - COMMODITY_VARIANCE + 2.0 * COMMODITY_VARIANCE * rng.next_f32();
            let price = (resource.base_value() as f32 * factor).round().max(1.0) as u32;
            base.insert(resource, price);
        }
        Self {
            base,
            cheap: None,
            expensive: None,
        }
    }

    /// Current trading price (deal applied), if the island trades it
    pub fn price(&self, resource: Resource) -> Option<u32> {
        let base = *self.base.get(&resource)?;
        let price = if self.cheap == Some(resource) {
            ((base as f32 / DEAL_FACTOR as f32).round() as u32).max(1)
        } else if self.expensive == Some(resource) {
            base.saturating_mul(DEAL_FACTOR)
        } else {
            base
        };
        Some(price)
    }

    pub fn set_fuel_price(&mut self, price: u32) {
        self.base.insert(Resource::Fuel, price);
    }

    /// Draw a cheap and a different expensive commodity
    pub fn reroll_deals(&mut self, rng: &mut SimRng) {
        let goods: Vec<Resource> = Resource::COMMODITIES
            .into_iter()
            .filter(|r| self.base.contains_key(r))
            .collect();
        if goods.len() < 2 {
            self.cheap = None;
            self.expensive = None;
            return;
        }
        let cheap = rng.below(goods.len());
        // Draw from the remaining goods so the two never coincide
        let mut expensive = rng.below(goods.len() - 1);
        if expensive >= cheap {
            expensive += 1;
        }
        self.cheap = Some(goods[cheap]);
        self.expensive = Some(goods[expensive]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{STREAM_PRICES, STREAM_SESSION};

    #[test]
    fn test_fuel_price_schedule() {
        assert_eq!(fuel_price(0), 10);
        assert_eq!(fuel_price(1), 15);
        assert_eq!(fuel_price(10), 60);
        assert_eq!(fuel_price(11), 66); // 65 + 0.75
        assert_eq!(fuel_price(12), 73); // 70 + 3
        assert_eq!(fuel_price(20), 185);
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(Resource::Timber.to_string(), "timber");
        assert_eq!(
            serde_json::to_string(&Resource::Spices).expect("serialize"),
            "\"spices\""
        );
    }

    #[test]
    fn test_rolled_prices_within_variance() {
        let mut rng = SimRng::new(42, STREAM_PRICES);
        for _ in 0..50 {
            let table = PriceTable::roll(&mut rng);
            let fuel = table.base[&Resource::Fuel];
            assert!((8..=12).contains(&fuel));
            for r in Resource::COMMODITIES {
                let price = table.base[&r] as f32;
                let base = r.base_value() as f32;
                assert!(price >= (base * 0.8).floor() && price <= (base * 1.2).ceil());
            }
        }
    }

    #[test]
    fn test_deals_never_coincide_and_skip_fuel() {
        let mut prices = SimRng::new(3, STREAM_PRICES);
        let mut session = SimRng::new(3, STREAM_SESSION);
        let mut table = PriceTable::roll(&mut prices);
        for _ in 0..200 {
            table.reroll_deals(&mut session);
            let cheap = table.cheap.expect("cheap drawn");
            let expensive = table.expensive.expect("expensive drawn");
            assert_ne!(cheap, expensive);
            assert!(cheap.is_commodity() && expensive.is_commodity());
        }
    }

    #[test]
    fn test_deal_pricing() {
        let mut base = BTreeMap::new();
        base.insert(Resource::Fuel, 10);
        base.insert(Resource::Fish, 9);
        base.insert(Resource::Silk, 40);
        base.insert(Resource::Rum, 1);
        let mut table = PriceTable {
            base,
            cheap: Some(Resource::Fish),
            expensive: Some(Resource::Silk),
        };
        assert_eq!(table.price(Resource::Fish), Some(3));
        assert_eq!(table.price(Resource::Silk), Some(120));
        assert_eq!(table.price(Resource::Fuel), Some(10));
        assert_eq!(table.price(Resource::Timber), None);

        table.cheap = Some(Resource::Rum);
        assert_eq!(table.price(Resource::Rum), Some(1));
    }

    #[test]
    fn test_inventory_clamps() {
        let mut inv = Inventory::with_fuel(2);
        assert_eq!(inv.adjust(Resource::Fuel, -5), 0);
        assert!(!inv.take_one(Resource::Fuel));
        assert_eq!(inv.adjust(Resource::Rum, 3), 3);
        assert!(inv.take_one(Resource::Rum));
        assert_eq!(inv.get(Resource::Rum), 2);
        assert_eq!(inv.slots().len(), Resource::ALL.len());
    }

    #[test]
    fn test_inventory_adjust_saturates_on_huge_deltas() {
        let mut inv = Inventory::with_fuel(5);
        assert_eq!(inv.adjust(Resource::Fuel, i64::MAX), u32::MAX);
        assert_eq!(inv.adjust(Resource::Fuel, i64::MAX), u32::MAX);
        assert_eq!(inv.adjust(Resource::Fuel, i64::MIN), 0);
        assert_eq!(inv.adjust(Resource::Silk, i64::MIN), 0);
    }
}
