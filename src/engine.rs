//! Frame loop
//!
//! The engine owns the world and its collaborators. Each frame measures the
//! time since the previous one, runs one simulation tick, forwards the tick's
//! events, then renders. The host decides when the next frame happens.

use thiserror::Error;

use crate::assets::{AssetError, AssetLoader, SpriteId};
use crate::audio::{AudioSink, SoundCue};
use crate::input::Direction;
use crate::render::{HudState, Renderer, render_world};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, LevelCatalog, TickInput, TickOutcome, VictoryPolicy, World, tick,
};

/// Frames kept for the FPS estimate
const FPS_WINDOW: usize = 60;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("asset preload failed: {0}")]
    Preload(#[from] AssetError),
    #[error("frame requested before assets were preloaded")]
    NotStarted,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Victory with `VictoryPolicy::Halt`; no more frames will tick
    Halted,
}

/// Game instance holding all state
pub struct Engine<R, A> {
    world: World,
    catalog: LevelCatalog,
    settings: Settings,
    renderer: R,
    audio: A,
    hud: HudState,
    /// Moves received since the last frame
    pending: Vec<Direction>,
    last_time: Option<f64>,
    halted: bool,
    frames: u64,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
    last_fps_log: f64,
}

impl<R: Renderer, A: AudioSink> Engine<R, A> {
    pub fn new(settings: Settings, catalog: LevelCatalog, renderer: R, audio: A) -> Self {
        let world = World::new(&catalog, settings.character).with_victory(settings.on_victory);
        Self {
            world,
            catalog,
            settings,
            renderer,
            audio,
            hud: HudState::default(),
            pending: Vec::new(),
            last_time: None,
            halted: false,
            frames: 0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
            last_fps_log: 0.0,
        }
    }

    /// Preload sprites through `loader`, then arm the loop at time `now` (seconds)
    pub fn start_with(&mut self, loader: &mut dyn AssetLoader, now: f64) -> Result<(), EngineError> {
        loader.load(&SpriteId::preload_for(self.settings.character))?;
        self.arm(now);
        Ok(())
    }

    fn arm(&mut self, now: f64) {
        self.last_time = Some(now);
        self.last_fps_log = now;
        if self.settings.effective_music() {
            self.audio.play(SoundCue::Theme);
        }
        self.dispatch_events();
        log::info!(
            "Starting at level 1 of {} as {:?}",
            self.catalog.last_level(),
            self.settings.character
        );
    }

    pub fn is_started(&self) -> bool {
        self.last_time.is_some()
    }

    /// Queue a raw input token; anything but a direction is ignored
    pub fn handle_input(&mut self, token: &str) {
        if let Some(direction) = Direction::from_token(token) {
            self.push_direction(direction);
        }
    }

    pub fn push_direction(&mut self, direction: Direction) {
        self.pending.push(direction);
    }

    /// Run one frame at time `now` (seconds, same clock as `start`)
    pub fn frame(&mut self, now: f64) -> Result<FrameOutcome, EngineError> {
        let Some(last_time) = self.last_time else {
            return Err(EngineError::NotStarted);
        };
        if self.halted {
            return Ok(FrameOutcome::Halted);
        }

        let dt = (now - last_time).max(0.0) as f32;
        self.last_time = Some(now);
        self.frames += 1;
        self.track_fps(now);

        let input = TickInput {
            moves: std::mem::take(&mut self.pending),
        };
        let outcome = tick(&mut self.world, &self.catalog, &input, dt);
        if outcome == TickOutcome::Won && self.world.victory == VictoryPolicy::Halt {
            log::info!(
                "All levels cleared with {} points, halting",
                self.world.player.points
            );
            self.halted = true;
        }

        self.dispatch_events();
        self.audio.advance(dt);

        let stats = self.hud.update(&self.world.player);
        render_world(&self.world, &stats, &mut self.renderer);

        Ok(if self.halted {
            FrameOutcome::Halted
        } else {
            FrameOutcome::Continue
        })
    }

    /// Keep running frames while `next_frame` yields timestamps. The callback
    /// is where the host waits for its next display refresh and feeds input.
    /// Returns the number of frames run.
    pub fn run<F>(&mut self, mut next_frame: F) -> Result<u64, EngineError>
    where
        F: FnMut(&mut Self) -> Option<f64>,
    {
        let mut count = 0;
        while let Some(now) = next_frame(self) {
            count += 1;
            if self.frame(now)? == FrameOutcome::Halted {
                break;
            }
        }
        Ok(count)
    }

    fn dispatch_events(&mut self) {
        for event in self.world.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio.play(cue),
                GameEvent::LevelStarted { level } => log::info!("Level {} started", level),
                GameEvent::KeyRevealed => log::info!("Key revealed"),
                GameEvent::GameOver => log::info!("Game over! Restarted at level 1"),
                GameEvent::GameWon => log::info!("Congratulations, you won!"),
                GameEvent::Died { lives_left } => log::debug!("Died, {} lives left", lives_left),
                GameEvent::Collected { kind, points } => {
                    log::debug!("Collected {:?} (+{})", kind, points)
                }
            }
        }
    }

    fn track_fps(&mut self, now: f64) {
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest entry sits at the next write position
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = now - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }

        if self.settings.show_fps && now - self.last_fps_log >= 1.0 {
            log::info!("FPS: {}", self.fps);
            self.last_fps_log = now;
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl<R: Renderer + AssetLoader, A: AudioSink> Engine<R, A> {
    /// Preload sprites through the renderer itself
    pub fn start(&mut self, now: f64) -> Result<(), EngineError> {
        self.renderer
            .load(&SpriteId::preload_for(self.settings.character))?;
        self.arm(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::render::AsciiRenderer;
    use glam::Vec2;

    #[derive(Default)]
    struct NullRenderer {
        frames: u32,
    }

    impl Renderer for NullRenderer {
        fn draw(&mut self, _sprite: SpriteId, _pos: Vec2, _clip: Option<crate::render::Clip>) {}

        fn end_frame(&mut self) {
            self.frames += 1;
        }
    }

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<SoundCue>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: SoundCue) {
            self.played.push(cue);
        }
    }

    struct FailingLoader;

    impl AssetLoader for FailingLoader {
        fn load(&mut self, _sprites: &[SpriteId]) -> Result<(), AssetError> {
            Err(AssetError::Backend("offline".to_string()))
        }
    }

    fn engine(settings: Settings) -> Engine<NullRenderer, RecordingAudio> {
        Engine::new(
            settings,
            LevelCatalog::builtin(),
            NullRenderer::default(),
            RecordingAudio::default(),
        )
    }

    #[test]
    fn test_frame_before_start_is_refused() {
        let mut engine = engine(Settings::default());
        assert!(matches!(engine.frame(0.1), Err(EngineError::NotStarted)));
    }

    #[test]
    fn test_failed_preload_never_arms() {
        let mut engine = engine(Settings::default());
        let err = engine.start_with(&mut FailingLoader, 0.0).unwrap_err();
        assert!(matches!(err, EngineError::Preload(_)));
        assert!(!engine.is_started());
        assert!(engine.frame(0.1).is_err());
    }

    #[test]
    fn test_dt_drives_hazards() {
        let mut engine = engine(Settings::default());
        let mut ascii = AsciiRenderer::new();
        engine.start_with(&mut ascii, 10.0).unwrap();
        let before = engine.world().hazards[0].pos().x;
        engine.frame(10.5).unwrap();
        let after = engine.world().hazards[0].pos().x;
        // First bug moves 2 * 100 px/s
        assert!((after - before - 100.0).abs() < 1e-3);
        assert_eq!(engine.renderer().frames, 1);
    }

    #[test]
    fn test_theme_plays_on_start() {
        let mut engine = engine(Settings::default());
        engine.start_with(&mut AsciiRenderer::new(), 0.0).unwrap();
        assert_eq!(engine.audio().played, vec![SoundCue::Theme]);

        let mut quiet = engine_with_music_off();
        quiet.start_with(&mut AsciiRenderer::new(), 0.0).unwrap();
        assert!(quiet.audio().played.is_empty());
    }

    fn engine_with_music_off() -> Engine<NullRenderer, RecordingAudio> {
        engine(Settings {
            music_enabled: false,
            ..Settings::default()
        })
    }

    #[test]
    fn test_input_tokens_apply_on_next_frame() {
        let mut engine = engine_with_music_off();
        engine.start_with(&mut AsciiRenderer::new(), 0.0).unwrap();
        engine.world_mut().hazards.clear();
        engine.handle_input("left");
        engine.handle_input("jump");
        assert_eq!(engine.world().player.cell(), (5, 2));
        engine.frame(0.016).unwrap();
        assert_eq!(engine.world().player.cell(), (5, 1));
    }

    #[test]
    fn test_sounds_forwarded() {
        let mut engine = engine_with_music_off();
        engine.start_with(&mut AsciiRenderer::new(), 0.0).unwrap();
        engine.world_mut().hazards.clear();
        // Off the safe tile on the top row
        engine.world_mut().player.entity.bounds.pos = crate::cell_to_world(0, 0);
        engine.frame(0.016).unwrap();
        assert_eq!(engine.audio().played, vec![SoundCue::Die]);
    }

    #[test]
    fn test_halt_on_victory_stops_loop() {
        let mut engine = engine(Settings {
            on_victory: VictoryPolicy::Halt,
            ..Settings::default()
        });
        engine.start_with(&mut AsciiRenderer::new(), 0.0).unwrap();
        engine.world_mut().player.level = 5;

        let mut t = 0.0;
        let frames = engine
            .run(|_| {
                t += 0.016;
                Some(t)
            })
            .unwrap();
        assert_eq!(frames, 1);
        assert!(engine.is_halted());
        assert_eq!(engine.frame(1.0).unwrap(), FrameOutcome::Halted);
    }

    #[test]
    fn test_run_until_host_stops() {
        let mut engine = Engine::new(
            Settings::default(),
            LevelCatalog::builtin(),
            AsciiRenderer::new(),
            AudioManager::new(),
        );
        engine.start(0.0).unwrap();

        let mut t = 0.0;
        let frames = engine
            .run(|_| {
                t += 1.0 / 60.0;
                (t < 2.0).then_some(t)
            })
            .unwrap();
        assert_eq!(frames, engine.frames());
        assert!(frames >= 119);
        assert!((55..=65).contains(&engine.fps()));
        assert!(engine.renderer().frame().lines().count() > 0);
    }
}
