//! Random events at sea
//!
//! Encounters come from a fixed catalog. Each option is a list of effects,
//! which are plain data so the active encounter can be snapshotted along
//! with the rest of the state.

use serde::{Deserialize, Serialize};

use super::economy::Resource;
use super::rng::SimRng;

/// A single mutation applied when an option is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Add (or remove, when negative) units; clamped at zero
    Inventory { resource: Resource, delta: i32 },
    /// Add (or remove) coins; money never drops below zero
    Money(i32),
}

/// A choice offered by an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterOption {
    pub label: String,
    pub effects: Vec<Effect>,
}

/// An encounter waiting for the player's decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub text: String,
    pub options: Vec<EncounterOption>,
}

impl Encounter {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.label.as_str())
    }
}

/// Catalog entry with static text
struct Template {
    text: &'static str,
    options: &'static [(&'static str, &'static [Effect])],
}

const IGNORE: (&str, &[Effect]) = ("Ignore it", &[]);

const CATALOG: &[Template] = &[
    Template {
        text: "You find a floating crate. What do you do?",
        options: &[
            (
                "Open it (gain fuel)",
                &[Effect::Inventory {
                    resource: Resource::Fuel,
                    delta: 2,
                }],
            ),
            IGNORE,
        ],
    },
    Template {
        text: "A sudden storm appears. What do you do?",
        options: &[
            (
                "Wait it out (lose fuel)",
                &[Effect::Inventory {
                    resource: Resource::Fuel,
                    delta: -1,
                }],
            ),
            ("Sail through (no effect)", &[]),
        ],
    },
    Template {
        text: "A pirate sloop signals you to heave to.",
        options: &[
            ("Pay them off (lose 10 coins)", &[Effect::Money(-10)]),
            (
                "Dump some fish",
                &[Effect::Inventory {
                    resource: Resource::Fish,
                    delta: -2,
                }],
            ),
            IGNORE,
        ],
    },
    Template {
        text: "A drifting trader offers fuel for a barrel of rum.",
        options: &[
            (
                "Trade rum for fuel",
                &[
                    Effect::Inventory {
                        resource: Resource::Rum,
                        delta: -1,
                    },
                    Effect::Inventory {
                        resource: Resource::Fuel,
                        delta: 2,
                    },
                ],
            ),
            IGNORE,
        ],
    },
    Template {
        text: "A message in a bottle bobs past the bow.",
        options: &[("Read it (find coins)", &[Effect::Money(15)]), IGNORE],
    },
];

impl Template {
    fn build(&self) -> Encounter {
        Encounter {
            text: self.text.to_string(),
            options: self
                .options
                .iter()
                .map(|(label, effects)| EncounterOption {
                    label: (*label).to_string(),
                    effects: effects.to_vec(),
                })
                .collect(),
        }
    }
}

/// Pick a catalog entry uniformly
pub fn random_encounter(rng: &mut SimRng) -> Encounter {
    CATALOG[rng.below(CATALOG.len())].build()
}
