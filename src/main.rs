//! Retro Arcade entry point
//!
//! Wires both minigames to the page (or to a headless demo on native) and
//! runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_arcade {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent};

    use retro_arcade::audio::{AudioManager, SoundCue};
    use retro_arcade::driver::{FrameDriver, FrameTarget};
    use retro_arcade::engine::{Engine, PuzzleEngine, ShooterEngine};
    use retro_arcade::feedback::SoundSink;
    use retro_arcade::highscores::{GameKind, HighScores};
    use retro_arcade::persistence::{LocalStorage, MemoryStorage, Snapshotter, Storage};
    use retro_arcade::platform::{entropy_seed, init_logging, key_to_input, now_ms, suppresses_default};
    use retro_arcade::renderer::{CanvasSurface, Surface};
    use retro_arcade::scoreboard::{ScoreEvent, Scoreboard};
    use retro_arcade::settings::Settings;
    use retro_arcade::sim::{GamePhase, PuzzleState, ShooterState};

    /// Page element ids for one minigame
    struct Chrome {
        overlay: &'static str,
        start_btn: &'static str,
        pause_btn: &'static str,
        score: &'static str,
        level: &'static str,
        /// Lives for the shooter, lines for the puzzle
        counter: &'static str,
    }

    const SHOOTER_CHROME: Chrome = Chrome {
        overlay: "gameOverlay",
        start_btn: "startGameBtn",
        pause_btn: "pauseGameBtn",
        score: "gameScore",
        level: "gameLevel",
        counter: "gameLives",
    };

    const PUZZLE_CHROME: Chrome = Chrome {
        overlay: "tetrisOverlay",
        start_btn: "startTetrisBtn",
        pause_btn: "pauseTetrisBtn",
        score: "tetrisScore",
        level: "tetrisLevel",
        counter: "tetrisLines",
    };

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(doc: &Document, id: &str, visible: bool) {
        if let Some(el) = doc
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            el.set_hidden(!visible);
        }
    }

    fn set_overlay_message(doc: &Document, chrome: &Chrome, title: &str, detail: &str) {
        let heading = format!("#{} .game-message h2", chrome.overlay);
        let body = format!("#{} .game-message p", chrome.overlay);
        if let Ok(Some(el)) = doc.query_selector(&heading) {
            el.set_text_content(Some(title));
        }
        if let Ok(Some(el)) = doc.query_selector(&body) {
            el.set_text_content(Some(detail));
        }
    }

    /// Overlay and buttons for a phase change
    fn show_phase(doc: &Document, chrome: &Chrome, phase: GamePhase, score: u64) {
        let Some(overlay) = doc.get_element_by_id(chrome.overlay) else {
            return;
        };
        let classes = overlay.class_list();
        let _ = classes.remove_2("game-paused", "game-over");
        match phase {
            GamePhase::Menu => {}
            GamePhase::Playing => {
                let _ = classes.add_1("hidden");
                set_visible(doc, chrome.start_btn, false);
                set_visible(doc, chrome.pause_btn, true);
            }
            GamePhase::Paused => {
                let _ = classes.remove_1("hidden");
                let _ = classes.add_1("game-paused");
                set_overlay_message(doc, chrome, "PAUSED", "");
            }
            GamePhase::GameOver => {
                let _ = classes.remove_1("hidden");
                let _ = classes.add_1("game-over");
                set_overlay_message(doc, chrome, "GAME OVER", &format!("Final Score: {}", score));
                set_visible(doc, chrome.start_btn, true);
                set_visible(doc, chrome.pause_btn, false);
            }
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}, nothing will persist this session", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    /// Everything the page loop owns
    struct Arcade {
        driver: FrameDriver,
        shooter: Option<ShooterEngine<CanvasSurface>>,
        puzzle: Option<PuzzleEngine<CanvasSurface>>,
        snapshotter: Snapshotter,
        audio: Rc<RefCell<AudioManager>>,
        settings: Settings,
        storage: Box<dyn Storage>,
        shooter_scores: HighScores,
        puzzle_scores: HighScores,
        shown_phases: (GamePhase, GamePhase),
    }

    impl Arcade {
        fn frame(&mut self, time: f64) {
            {
                let mut targets: Vec<&mut dyn FrameTarget> = Vec::with_capacity(3);
                if let Some(engine) = self.shooter.as_mut() {
                    targets.push(engine);
                }
                if let Some(engine) = self.puzzle.as_mut() {
                    targets.push(engine);
                }
                targets.push(&mut self.snapshotter);
                self.driver.frame(time, &mut targets);
            }
            self.record_final_scores();
            self.update_hud();
        }

        fn press(&mut self, code: retro_arcade::sim::InputCode) {
            if let Some(engine) = self.shooter.as_mut() {
                engine.press(code);
            }
            if let Some(engine) = self.puzzle.as_mut() {
                engine.press(code);
            }
        }

        fn release(&mut self, code: retro_arcade::sim::InputCode) {
            if let Some(engine) = self.shooter.as_mut() {
                engine.release(code);
            }
            if let Some(engine) = self.puzzle.as_mut() {
                engine.release(code);
            }
        }

        fn any_playing(&self) -> bool {
            self.shooter.as_ref().is_some_and(|e| e.phase() == GamePhase::Playing)
                || self.puzzle.as_ref().is_some_and(|e| e.phase() == GamePhase::Playing)
        }

        fn button_feedback(&self) {
            let mut audio = Rc::clone(&self.audio);
            audio.borrow().resume();
            audio.play(SoundCue::Button);
        }

        fn record_final_scores(&mut self) {
            let mut new_best = false;
            if let Some(score) = self.shooter.as_mut().and_then(|e| e.take_final_score()) {
                let level = self.shooter.as_ref().map_or(1, |e| e.level());
                if self.shooter_scores.add_score(score, level, now_ms()) == Some(1) {
                    new_best = true;
                }
                self.shooter_scores.save(self.storage.as_mut());
            }
            if let Some(score) = self.puzzle.as_mut().and_then(|e| e.take_final_score()) {
                let level = self.puzzle.as_ref().map_or(1, |e| e.level());
                if self.puzzle_scores.add_score(score, level, now_ms()) == Some(1) {
                    new_best = true;
                }
                self.puzzle_scores.save(self.storage.as_mut());
            }
            if new_best {
                Rc::clone(&self.audio).play(SoundCue::HighScore);
            }
        }

        fn update_hud(&mut self) {
            let Some(doc) = document() else { return };

            if let Some(engine) = &self.shooter {
                set_text(&doc, SHOOTER_CHROME.score, &engine.score().to_string());
                set_text(&doc, SHOOTER_CHROME.level, &engine.level().to_string());
                set_text(&doc, SHOOTER_CHROME.counter, &engine.lives().to_string());
                if engine.phase() != self.shown_phases.0 {
                    self.shown_phases.0 = engine.phase();
                    show_phase(&doc, &SHOOTER_CHROME, engine.phase(), engine.score());
                }
            }
            if let Some(engine) = &self.puzzle {
                set_text(&doc, PUZZLE_CHROME.score, &engine.score().to_string());
                set_text(&doc, PUZZLE_CHROME.level, &engine.level().to_string());
                set_text(&doc, PUZZLE_CHROME.counter, &engine.lines().to_string());
                if engine.phase() != self.shown_phases.1 {
                    self.shown_phases.1 = engine.phase();
                    show_phase(&doc, &PUZZLE_CHROME, engine.phase(), engine.score());
                }
            }
        }
    }

    /// Mirror scoreboard changes into the page header
    fn subscribe_hud(scoreboard: &Rc<RefCell<Scoreboard>>, doc: Document) {
        scoreboard.borrow_mut().subscribe(move |event| match event {
            ScoreEvent::ScoreChanged { score, .. } => {
                set_text(&doc, "scoreValue", &score.to_string());
            }
            ScoreEvent::LevelUp { level } => {
                set_text(&doc, "levelValue", &level.to_string());
            }
            ScoreEvent::HealthChanged { health, max_health } => {
                set_bar(&doc, "healthFill", *health, *max_health);
            }
            ScoreEvent::XpChanged { xp, max_xp } => {
                set_bar(&doc, "xpFill", *xp, *max_xp);
            }
            ScoreEvent::AchievementUnlocked(achievement) => {
                set_text(&doc, "achievementName", achievement.name());
            }
            ScoreEvent::Restored(snapshot) => {
                set_text(&doc, "scoreValue", &snapshot.score.to_string());
                set_text(&doc, "levelValue", &snapshot.level.to_string());
            }
        });
    }

    fn set_bar(doc: &Document, id: &str, value: u32, max: u32) {
        if let Some(el) = doc.get_element_by_id(id) {
            let pct = if max == 0 { 0.0 } else { value as f32 / max as f32 * 100.0 };
            let _ = el.set_attribute("style", &format!("width: {}%", pct));
        }
    }

    pub fn run() {
        init_logging();
        log::info!("Retro Arcade starting...");

        let Some(doc) = document() else {
            log::error!("No document, nothing to run");
            return;
        };

        let storage = open_storage();
        let settings = Settings::load(storage.as_ref());

        let scoreboard = Rc::new(RefCell::new(Scoreboard::new()));
        subscribe_hud(&scoreboard, doc.clone());
        let snapshotter = Snapshotter::new(open_storage(), Rc::clone(&scoreboard))
            .with_interval(settings.snapshot_interval_ms);
        snapshotter.restore();

        let audio = Rc::new(RefCell::new(AudioManager::from_settings(&settings)));

        let seed = entropy_seed();
        let shooter = CanvasSurface::from_element_id("gameCanvas").map(|surface| {
            let area = surface.size();
            let mut engine = Engine::new(
                ShooterState::new(seed, area),
                surface,
                Box::new(Rc::clone(&scoreboard)),
                Box::new(Rc::clone(&audio)),
            );
            engine.set_max_particles(settings.max_particles());
            engine
        });
        let puzzle = CanvasSurface::from_element_id("tetrisCanvas").map(|surface| {
            let engine = Engine::new(
                PuzzleState::new(seed.wrapping_add(1)),
                surface,
                Box::new(Rc::clone(&scoreboard)),
                Box::new(Rc::clone(&audio)),
            );
            match CanvasSurface::from_element_id("nextCanvas") {
                Some(preview) => engine.with_preview(preview),
                None => engine,
            }
        });
        if shooter.is_none() && puzzle.is_none() {
            log::warn!("No game canvases on this page");
        }
        log::info!("Engines initialized with seed: {}", seed);

        let arcade = Rc::new(RefCell::new(Arcade {
            driver: FrameDriver::new(),
            shooter,
            puzzle,
            snapshotter,
            audio,
            settings,
            shooter_scores: HighScores::load(GameKind::Shooter, storage.as_ref()),
            puzzle_scores: HighScores::load(GameKind::Puzzle, storage.as_ref()),
            storage,
            shown_phases: (GamePhase::Menu, GamePhase::Menu),
        }));

        setup_buttons(&doc, Rc::clone(&arcade));
        setup_keyboard(&doc, Rc::clone(&arcade));
        setup_auto_pause(&doc, Rc::clone(&arcade));

        request_animation_frame(arcade);
        log::info!("Retro Arcade running!");
    }

    fn on_click(
        doc: &Document,
        id: &str,
        audio: &Rc<RefCell<AudioManager>>,
        mut handler: impl FnMut() + 'static,
    ) {
        let Some(btn) = doc.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();

        let mut audio = Rc::clone(audio);
        let hover = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            audio.play(SoundCue::Hover);
        });
        let _ = btn.add_event_listener_with_callback("mouseenter", hover.as_ref().unchecked_ref());
        hover.forget();
    }

    fn setup_buttons(doc: &Document, arcade: Rc<RefCell<Arcade>>) {
        let audio = Rc::clone(&arcade.borrow().audio);
        {
            let arcade = Rc::clone(&arcade);
            on_click(doc, SHOOTER_CHROME.start_btn, &audio, move || {
                let mut a = arcade.borrow_mut();
                a.button_feedback();
                if let Some(engine) = a.shooter.as_mut() {
                    engine.start();
                }
            });
        }
        {
            let arcade = Rc::clone(&arcade);
            on_click(doc, SHOOTER_CHROME.pause_btn, &audio, move || {
                let mut a = arcade.borrow_mut();
                a.button_feedback();
                if let Some(engine) = a.shooter.as_mut() {
                    engine.toggle_pause();
                }
            });
        }
        {
            let arcade = Rc::clone(&arcade);
            on_click(doc, PUZZLE_CHROME.start_btn, &audio, move || {
                let mut a = arcade.borrow_mut();
                a.button_feedback();
                if let Some(engine) = a.puzzle.as_mut() {
                    engine.start();
                }
            });
        }
        on_click(doc, PUZZLE_CHROME.pause_btn, &audio, move || {
            let mut a = arcade.borrow_mut();
            a.button_feedback();
            if let Some(engine) = a.puzzle.as_mut() {
                engine.toggle_pause();
            }
        });
    }

    fn setup_keyboard(doc: &Document, arcade: Rc<RefCell<Arcade>>) {
        {
            let arcade = Rc::clone(&arcade);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                let Some(input) = key_to_input(&code) else {
                    return;
                };
                let mut a = arcade.borrow_mut();
                if suppresses_default(&code) && a.any_playing() {
                    event.prevent_default();
                }
                a.press(input);
            });
            let _ = doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(input) = key_to_input(&event.code()) {
                arcade.borrow_mut().release(input);
            }
        });
        let _ = doc.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pause running games when the tab is hidden and restart frame timing
    /// when it comes back
    fn setup_auto_pause(doc: &Document, arcade: Rc<RefCell<Arcade>>) {
        let document = doc.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = arcade.borrow_mut();
            let hidden = document.visibility_state() == web_sys::VisibilityState::Hidden;
            if a.settings.mute_on_blur {
                let muted = hidden || a.settings.muted;
                if let Ok(mut audio) = a.audio.try_borrow_mut() {
                    audio.set_muted(muted);
                }
            }
            if !hidden {
                a.driver.reset();
                return;
            }
            if let Some(engine) = a.shooter.as_mut().filter(|e| e.phase() == GamePhase::Playing) {
                engine.toggle_pause();
                log::info!("Shooter auto-paused (tab hidden)");
            }
            if let Some(engine) = a.puzzle.as_mut().filter(|e| e.phase() == GamePhase::Playing) {
                engine.toggle_pause();
                log::info!("Puzzle auto-paused (tab hidden)");
            }
        });
        let _ = doc.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(arcade: Rc<RefCell<Arcade>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(arcade, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(arcade: Rc<RefCell<Arcade>>, time: f64) {
        arcade.borrow_mut().frame(time);
        request_animation_frame(arcade);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_arcade::run();
}

/// Scripted headless session: both engines run against recording surfaces
/// with a fake 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use retro_arcade::audio::AudioManager;
    use retro_arcade::consts::*;
    use retro_arcade::driver::{FrameDriver, FrameTarget};
    use retro_arcade::engine::Engine;
    use retro_arcade::highscores::{GameKind, HighScores};
    use retro_arcade::persistence::{MemoryStorage, Snapshotter};
    use retro_arcade::renderer::DrawList;
    use retro_arcade::scoreboard::Scoreboard;
    use retro_arcade::sim::{GamePhase, InputCode, PuzzleState, ShooterState};

    const FRAMES: u32 = 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let scoreboard = Rc::new(RefCell::new(Scoreboard::new()));
    let audio = Rc::new(RefCell::new(AudioManager::new()));
    let mut storage = MemoryStorage::new();
    let mut snapshotter = Snapshotter::new(Box::new(MemoryStorage::new()), Rc::clone(&scoreboard));

    let area = Vec2::new(PLAY_AREA_WIDTH, PLAY_AREA_HEIGHT);
    let mut shooter = Engine::new(
        ShooterState::new(42, area),
        DrawList::new(area.x, area.y),
        Box::new(Rc::clone(&scoreboard)),
        Box::new(Rc::clone(&audio)),
    );
    let mut puzzle = Engine::new(
        PuzzleState::new(43),
        DrawList::new(BOARD_COLS as f32 * BLOCK_SIZE, BOARD_ROWS as f32 * BLOCK_SIZE),
        Box::new(Rc::clone(&scoreboard)),
        Box::new(Rc::clone(&audio)),
    )
    .with_preview(DrawList::new(120.0, 120.0));

    let mut shooter_scores = HighScores::new(GameKind::Shooter);
    let mut puzzle_scores = HighScores::new(GameKind::Puzzle);
    let mut driver = FrameDriver::new();

    shooter.start();
    puzzle.start();
    shooter.press(InputCode::Fire);

    for frame in 0..FRAMES {
        // Sweep the ship back and forth
        if frame % 120 == 0 {
            shooter.release(InputCode::Right);
            shooter.press(InputCode::Left);
        } else if frame % 120 == 60 {
            shooter.release(InputCode::Left);
            shooter.press(InputCode::Right);
        }
        // Shuffle and turn the falling piece now and then
        match frame % 45 {
            0 => puzzle.press(InputCode::Left),
            15 => puzzle.press(InputCode::Up),
            30 => puzzle.press(InputCode::Right),
            _ => {}
        }

        {
            let mut targets: [&mut dyn FrameTarget; 3] = [&mut shooter, &mut puzzle, &mut snapshotter];
            driver.frame(frame as f64 * FRAME_MS, &mut targets);
        }

        if let Some(score) = shooter.take_final_score() {
            shooter_scores.add_score(score, shooter.level(), frame as f64);
            log::info!("Shooter run ended with {}", score);
            shooter.start();
            shooter.press(InputCode::Fire);
        }
        if let Some(score) = puzzle.take_final_score() {
            puzzle_scores.add_score(score, puzzle.level(), frame as f64);
            log::info!("Puzzle run ended with {}", score);
            puzzle.start();
        }
    }

    shooter_scores.save(&mut storage);
    puzzle_scores.save(&mut storage);

    println!("\nHeadless session: {} frames", driver.frames());
    println!(
        "Shooter: phase {}, score {}, lives {}, level {}",
        shooter.phase().as_str(),
        shooter.score(),
        shooter.lives(),
        shooter.level()
    );
    println!(
        "Puzzle:  phase {}, score {}, lines {}, level {}",
        puzzle.phase().as_str(),
        puzzle.score(),
        puzzle.lines(),
        puzzle.level()
    );
    let board = scoreboard.borrow();
    println!(
        "Scoreboard: score {}, level {}, achievements {:?}",
        board.score(),
        board.level(),
        board.achievements().unlocked()
    );
    println!(
        "Best runs: shooter {:?}, puzzle {:?}",
        shooter_scores.top_score(),
        puzzle_scores.top_score()
    );
    println!(
        "Snapshots saved: {}, sounds played: {}, last shooter frame: {} draw calls",
        snapshotter.saves(),
        audio.borrow().played(),
        shooter.surface().commands().len()
    );
    if shooter.phase() == GamePhase::Playing {
        println!("Shooter still alive after {} ticks", shooter.game().time_ticks);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    retro_arcade::platform::init_logging();
    log::info!("Retro Arcade (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");
    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
