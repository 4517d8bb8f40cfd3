//! Flag Royale entry point
//!
//! The browser build is driven from JS through `flag_royale::web`. The native
//! binary plays headless rounds of both games at a fixed 60 Hz frame rate and
//! logs the results.
//!
//! Usage: `flag-royale [rounds] [seed] [elimination.json] [combat.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flag Royale (native) starting...");

    if let Err(err) = headless::run(std::env::args().skip(1).collect()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is flag_royale::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flag_royale::consts::FRAME_MS;
    use flag_royale::sim::{Candidate, CombatSim, EliminationSim, RoundPhase, RoundSim, Session};
    use flag_royale::{CombatConfig, ConfigError, EliminationConfig};

    /// Two simulated minutes at 60 Hz
    const FRAME_CAP: u32 = 60 * 120;

    const ROSTER: &[(&str, &str, &str)] = &[
        ("ar", "Argentina", "🇦🇷"),
        ("au", "Australia", "🇦🇺"),
        ("br", "Brazil", "🇧🇷"),
        ("ca", "Canada", "🇨🇦"),
        ("de", "Germany", "🇩🇪"),
        ("es", "Spain", "🇪🇸"),
        ("fr", "France", "🇫🇷"),
        ("gb", "United Kingdom", "🇬🇧"),
        ("in", "India", "🇮🇳"),
        ("it", "Italy", "🇮🇹"),
        ("jp", "Japan", "🇯🇵"),
        ("kr", "South Korea", "🇰🇷"),
        ("mx", "Mexico", "🇲🇽"),
        ("ng", "Nigeria", "🇳🇬"),
        ("nl", "Netherlands", "🇳🇱"),
        ("pt", "Portugal", "🇵🇹"),
        ("se", "Sweden", "🇸🇪"),
        ("us", "United States", "🇺🇸"),
    ];

    pub fn run(args: Vec<String>) -> Result<(), String> {
        let rounds: u32 = match args.first() {
            Some(arg) => arg.parse().map_err(|_| format!("Invalid round count: {}", arg))?,
            None => 3,
        };
        let seed: u64 = match args.get(1) {
            Some(arg) => arg.parse().map_err(|_| format!("Invalid seed: {}", arg))?,
            None => 42,
        };
        let elimination_config = match args.get(2) {
            Some(path) => load(path, EliminationConfig::from_json)?,
            None => EliminationConfig::default(),
        };
        let combat_config = match args.get(3) {
            Some(path) => load(path, CombatConfig::from_json)?,
            None => CombatConfig::default(),
        };

        let roster: Vec<Candidate> = ROSTER
            .iter()
            .map(|(id, name, glyph)| Candidate::new(*id, *name, *glyph))
            .collect();

        let sim = EliminationSim::new(elimination_config, seed).map_err(|e| e.to_string())?;
        let mut session = Session::new(sim);
        for round in 1..=rounds {
            play(&mut session, &roster, 12).map_err(|e| e.to_string())?;
            let sim = session.sim();
            log::info!(
                "Elimination round {}: winner {:?} after {:.1}s, order {:?}",
                round,
                sim.winner(),
                sim.elapsed_ms() / 1000.0,
                sim.eliminated()
            );
        }
        log::info!("Elimination tally: {:?}", session.wins());

        let sim = CombatSim::new(combat_config, seed).map_err(|e| e.to_string())?;
        let mut session = Session::new(sim);
        for round in 1..=rounds {
            play(&mut session, &roster, 10).map_err(|e| e.to_string())?;
            let sim = session.sim();
            log::info!(
                "Combat round {}: winner {:?} at frame {}, defeated {:?}",
                round,
                sim.winner(),
                sim.frame(),
                sim.defeated()
            );
        }
        log::info!("Combat tally: {:?}", session.wins());

        Ok(())
    }

    fn load<T>(path: &str, parse: fn(&str) -> Result<T, ConfigError>) -> Result<T, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path, e))?;
        parse(&json).map_err(|e| format!("{}: {}", path, e))
    }

    /// Play one round to completion (or until the frame cap)
    fn play<S: RoundSim>(
        session: &mut Session<S>,
        roster: &[Candidate],
        count: usize,
    ) -> Result<(), ConfigError> {
        session.start(roster.to_vec(), count)?;
        let mut frames = 0;
        while session.phase() == RoundPhase::Playing && frames < FRAME_CAP {
            session.step(FRAME_MS);
            frames += 1;
        }
        if session.phase() == RoundPhase::Playing {
            log::warn!("Round still running after {} frames", FRAME_CAP);
        }
        Ok(())
    }
}
