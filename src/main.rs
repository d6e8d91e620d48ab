//! Sea Trader entry point
//!
//! The browser build is driven from JavaScript through the library. Natively
//! this runs a headless autopilot over a seeded world and logs how it went:
//!
//! ```text
//! sea-trader [seed] [voyages] [config.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use sea_trader::consts::*;
    use sea_trader::platform::MemoryStore;
    use sea_trader::sim::{GameEvent, OverrideTable, Resource};
    use sea_trader::{ConfigError, GameConfig, Session};

    /// Keep at least this much fuel before leaving port
    const FUEL_RESERVE: u32 = 8;
    /// Give up on a voyage that takes longer than this (simulated seconds)
    const VOYAGE_TIMEOUT: f32 = 600.0;

    pub struct Summary {
        pub voyages: u32,
        pub money: u32,
        pub fuel: u32,
        pub encounters: u32,
        pub game_over: bool,
    }

    pub fn load_config(path: Option<&str>) -> Result<GameConfig, ConfigError> {
        match path {
            Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?),
            None => Ok(GameConfig::default()),
        }
    }

    pub fn run(config: GameConfig, voyages: u32) -> Summary {
        let mut session = Session::new(config, &OverrideTable::new(), MemoryStore::new());
        let mut summary = Summary {
            voyages: 0,
            money: 0,
            fuel: 0,
            encounters: 0,
            game_over: false,
        };
        if session.start_session().is_err() {
            return summary;
        }

        'voyages: for leg in 0..voyages {
            trade(&mut session);

            let Some(next) = pick_destination(&session, leg) else {
                log::warn!("Island {} has no neighbours; stopping", session.state().current_dock());
                break;
            };
            if session.select_destination(next).is_err() {
                break;
            }

            let mut elapsed = 0.0;
            while elapsed < VOYAGE_TIMEOUT {
                elapsed += SIM_DT;
                for event in session.tick(SIM_DT) {
                    match event {
                        GameEvent::EncounterStarted { .. } => summary.encounters += 1,
                        GameEvent::GameOver { move_count, money } => {
                            summary.voyages = move_count;
                            summary.money = money;
                            summary.game_over = true;
                            break 'voyages;
                        }
                        _ => {}
                    }
                }
                if let Some(encounter) = session.state().active_encounter() {
                    log::info!(
                        "{} [{}] -> taking the first option",
                        encounter.text,
                        encounter.labels().collect::<Vec<_>>().join(" / ")
                    );
                    if let Err(e) = session.resolve_encounter(0) {
                        log::debug!("Autopilot could not resolve encounter: {}", e);
                    }
                }
                if session.state().is_docked() {
                    break;
                }
            }
        }

        let state = session.state();
        if !summary.game_over {
            summary.voyages = state.move_count();
            summary.money = state.money();
        }
        summary.fuel = state.fuel();
        summary
    }

    /// Sell whatever fetches a premium here, then top up fuel and buy a bargain
    fn trade(session: &mut Session<MemoryStore>) {
        let (cheap, expensive) = match session.state().current_island() {
            Some(island) => (island.prices.cheap, island.prices.expensive),
            None => return,
        };
        if let Some(resource) = expensive {
            while session.sell(resource).is_ok() {}
        }
        while session.state().fuel() < FUEL_RESERVE {
            if session.buy(Resource::Fuel).is_err() {
                break;
            }
        }
        if let Some(resource) = cheap {
            if let Err(e) = session.buy(resource) {
                log::debug!("Autopilot skipped bargain {}: {}", resource, e);
            }
        }
    }

    fn pick_destination(session: &Session<MemoryStore>, leg: u32) -> Option<usize> {
        let neighbours = &session.state().current_island()?.neighbours;
        if neighbours.is_empty() {
            return None;
        }
        Some(neighbours[leg as usize % neighbours.len()])
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    sea_trader::platform::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok());
    let voyages = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);

    let config = match autopilot::load_config(args.get(3).map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Bad configuration: {}", e);
            std::process::exit(1);
        }
    };
    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };

    log::info!(
        "Sea Trader (native) autopilot: seed {}, {} voyages",
        config.world.seed,
        voyages
    );
    let summary = autopilot::run(config, voyages);
    log::info!(
        "Finished: {} voyages, {} coins, {} fuel, {} encounters{}",
        summary.voyages,
        summary.money,
        summary.fuel,
        summary.encounters,
        if summary.game_over { " (ran out of fuel)" } else { "" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `wasm_start` in the library
}
