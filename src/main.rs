//! Gem Crossing entry point
//!
//! Runs the game headless: the autopilot presses keys and the board is
//! printed as text once a second.
//!
//! Usage: `gem-crossing [settings.json] [max-frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use gem_crossing::audio::AudioManager;
    use gem_crossing::input::Autopilot;
    use gem_crossing::render::AsciiRenderer;
    use gem_crossing::sim::LevelCatalog;
    use gem_crossing::{Engine, Settings};

    env_logger::init();
    log::info!("Gem Crossing (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let max_frames = args.next().and_then(|s| s.parse::<u64>().ok());

    let settings = Settings::load(settings_path.as_deref());
    let catalog = match &settings.level_pack {
        Some(path) => LevelCatalog::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using built-in levels");
            LevelCatalog::builtin()
        }),
        None => LevelCatalog::builtin(),
    };

    let audio = AudioManager::from_settings(&settings);
    let mut engine = Engine::new(settings.clone(), catalog, AsciiRenderer::new(), audio);

    let clock = Instant::now();
    if let Err(e) = engine.start(0.0) {
        log::error!("{e}");
        std::process::exit(1);
    }

    let mut autopilot = Autopilot::new(settings.autopilot_seed, settings.autopilot_interval);
    let interval = settings.frame_interval();
    let print_every = u64::from(settings.target_fps.max(1));
    let mut last = 0.0;

    let result = engine.run(|engine| {
        if max_frames.is_some_and(|max| engine.frames() >= max) {
            return None;
        }
        if engine.frames() > 0 && engine.frames() % print_every == 0 {
            println!("{}\n", engine.renderer().frame());
        }

        // Wait for the next frame slot
        let target = last + interval;
        let now = clock.elapsed().as_secs_f64();
        if target > now {
            std::thread::sleep(Duration::from_secs_f64(target - now));
        }
        let now = clock.elapsed().as_secs_f64();

        if let Some(direction) = autopilot.poll((now - last) as f32) {
            engine.push_direction(direction);
        }
        last = now;
        Some(now)
    });

    match result {
        Ok(frames) => {
            let player = &engine.world().player;
            log::info!(
                "Stopped after {} frames: level {}, {} points, {} lives",
                frames,
                player.level,
                player.points,
                player.lives
            );
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host yet; the library is driven by an embedding page
}
