//! Game engines
//!
//! An `Engine` owns one simulation, the surface it draws on and the two
//! feedback sinks. The host constructs it once and calls `tick` from its
//! frame driver.

use crate::driver::FrameTarget;
use crate::feedback::{ScoreSink, SoundCue, SoundSink};
use crate::renderer::{Surface, render_next_piece, render_puzzle, render_shooter};
use crate::sim::{GameEvent, GamePhase, InputCode, InputSet, PuzzleState, ShooterState};

/// A simulation the engine can drive
pub trait Game {
    /// Whether the final score goes to the score sink on game over
    const REPORTS_FINAL_SCORE: bool;

    fn start(&mut self);
    fn toggle_pause(&mut self);
    fn phase(&self) -> GamePhase;
    fn score(&self) -> u64;
    fn level(&self) -> u32;

    /// Advance one frame. Edge-triggered games consume codes from `input`.
    fn update(&mut self, input: &mut InputSet, dt_ms: f32, events: &mut Vec<GameEvent>);

    fn render(&self, surface: &mut dyn Surface);

    /// Secondary surface (next-piece preview)
    fn render_preview(&self, _surface: &mut dyn Surface) {}
}

impl Game for ShooterState {
    const REPORTS_FINAL_SCORE: bool = true;

    fn start(&mut self) {
        ShooterState::start(self);
    }

    fn toggle_pause(&mut self) {
        ShooterState::toggle_pause(self);
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn level(&self) -> u32 {
        self.level
    }

    /// Tick-based: elapsed time is ignored and input is level-triggered
    fn update(&mut self, input: &mut InputSet, _dt_ms: f32, events: &mut Vec<GameEvent>) {
        crate::sim::shooter::tick(self, input, events);
    }

    fn render(&self, surface: &mut dyn Surface) {
        render_shooter(self, surface);
    }
}

impl Game for PuzzleState {
    const REPORTS_FINAL_SCORE: bool = false;

    fn start(&mut self) {
        PuzzleState::start(self);
    }

    fn toggle_pause(&mut self) {
        PuzzleState::toggle_pause(self);
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn update(&mut self, input: &mut InputSet, dt_ms: f32, events: &mut Vec<GameEvent>) {
        crate::sim::puzzle::tick(self, input, dt_ms, events);
    }

    fn render(&self, surface: &mut dyn Surface) {
        render_puzzle(self, surface);
    }

    fn render_preview(&self, surface: &mut dyn Surface) {
        render_next_piece(self, surface);
    }
}

pub struct Engine<G: Game, S: Surface> {
    game: G,
    surface: S,
    preview: Option<S>,
    input: InputSet,
    score_sink: Box<dyn ScoreSink>,
    sound_sink: Box<dyn SoundSink>,
    events: Vec<GameEvent>,
    final_score: Option<u64>,
}

pub type ShooterEngine<S> = Engine<ShooterState, S>;
pub type PuzzleEngine<S> = Engine<PuzzleState, S>;

impl<G: Game, S: Surface> Engine<G, S> {
    pub fn new(
        game: G,
        surface: S,
        score_sink: Box<dyn ScoreSink>,
        sound_sink: Box<dyn SoundSink>,
    ) -> Self {
        Self {
            game,
            surface,
            preview: None,
            input: InputSet::new(),
            score_sink,
            sound_sink,
            events: Vec::new(),
            final_score: None,
        }
    }

    /// Attach a preview surface, drawn after the main surface every frame
    pub fn with_preview(mut self, preview: S) -> Self {
        self.preview = Some(preview);
        self
    }

    /// (Re)initialize the game, enter playing and draw the first frame
    pub fn start(&mut self) {
        self.input.clear();
        self.events.clear();
        self.final_score = None;
        self.game.start();
        self.render();
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
        log::debug!("Pause toggled -> {}", self.game.phase().as_str());
    }

    pub fn press(&mut self, code: InputCode) {
        self.input.press(code);
    }

    pub fn release(&mut self, code: InputCode) {
        self.input.release(code);
    }

    pub fn set_input(&mut self, input: InputSet) {
        self.input = input;
    }

    pub fn input(&self) -> InputSet {
        self.input
    }

    /// Advance one frame and render. No-op unless playing.
    pub fn tick(&mut self, elapsed_ms: f32) {
        if self.game.phase() != GamePhase::Playing {
            return;
        }
        self.events.clear();
        self.game.update(&mut self.input, elapsed_ms, &mut self.events);
        self.dispatch_events();
        self.render();
    }

    fn render(&mut self) {
        self.game.render(&mut self.surface);
        if let Some(preview) = self.preview.as_mut() {
            self.game.render_preview(preview);
        }
    }

    fn dispatch_events(&mut self) {
        for event in &self.events {
            match *event {
                GameEvent::Shot => self.sound_sink.play(SoundCue::Shoot),
                GameEvent::Explosion { .. } => self.sound_sink.play(SoundCue::Explosion),
                GameEvent::EnemyDestroyed { .. } | GameEvent::PlayerHit { .. } => {}
                GameEvent::PowerUpCollected { kind, points } => {
                    log::debug!("Power-up {:?} collected", kind);
                    self.score_sink.report_points(points);
                    self.sound_sink.play(SoundCue::PowerUp);
                }
                GameEvent::LinesCleared { count, .. } => {
                    log::debug!("{} line(s) cleared", count);
                    self.score_sink.report_points(self.game.score());
                    self.sound_sink.play(SoundCue::LineClear);
                }
                GameEvent::LevelUp { level } => {
                    log::info!("Level {}", level);
                    self.sound_sink.play(SoundCue::LevelUp);
                }
                GameEvent::GameOver { final_score } => {
                    log::info!("Game over, final score {}", final_score);
                    self.final_score = Some(final_score);
                    if G::REPORTS_FINAL_SCORE {
                        self.score_sink.report_points(final_score);
                    }
                    self.sound_sink.play(SoundCue::GameOver);
                }
            }
        }
    }

    /// Events produced by the most recent tick
    pub fn last_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Final score of a run that just ended, reported once
    pub fn take_final_score(&mut self) -> Option<u64> {
        self.final_score.take()
    }

    pub fn score(&self) -> u64 {
        self.game.score()
    }

    pub fn level(&self) -> u32 {
        self.game.level()
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn preview(&self) -> Option<&S> {
        self.preview.as_ref()
    }
}

impl<S: Surface> Engine<ShooterState, S> {
    pub fn lives(&self) -> u32 {
        self.game.lives
    }

    /// Cap the explosion particle pool (0 disables particles)
    pub fn set_max_particles(&mut self, max: usize) {
        self.game.max_particles = max;
    }
}

impl<S: Surface> Engine<PuzzleState, S> {
    pub fn lines(&self) -> u32 {
        self.game.lines
    }
}

impl<G: Game, S: Surface> FrameTarget for Engine<G, S> {
    fn tick(&mut self, elapsed_ms: f32) {
        Engine::tick(self, elapsed_ms);
    }
}
