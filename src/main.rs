//! Color Miner headless runner
//!
//! The browser build is driven from JS through `platform::WebSim`. Natively
//! this walks the player along a scripted route and logs what happened.
//!
//! Usage: `color-miner [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use color_miner::Settings;
    use color_miner::consts::FRAME_DT;
    use color_miner::sim::{ControlInput, SimState, tick};

    env_logger::init();
    log::info!("Color Miner (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let mut state = match SimState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut dug = 0u32;
    let mut blocked = 0usize;
    let mut off_grid = 0u32;
    for frame in 0..frames {
        // Walk forward, turning every 40 frames to carve a polygon
        let input = ControlInput {
            forward: true,
            turn_left: frame % 40 == 39,
            turn_right: false,
        };
        let report = tick(&mut state, &input, frame as f32 * FRAME_DT);
        if report.dug() {
            dug += 1;
        }
        if matches!(report.player, color_miner::sim::PlayerOutcome::OffGrid) {
            off_grid += 1;
        }
        blocked += report.blocked();
    }

    let p = state.player.position;
    log::info!(
        "{} frames: player at ({:.2}, {:.2}, {:.3}), {} cells dug, {} off-grid frames, \
         {} bot moves blocked",
        frames,
        p.x,
        p.y,
        p.z,
        dug,
        off_grid,
        blocked
    );
    for bot in &state.bots {
        log::info!(
            "{} at ({:.2}, {:.2}), {:.2} from player",
            bot.id,
            bot.position.x,
            bot.position.y,
            (bot.position - p).truncate().length()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
