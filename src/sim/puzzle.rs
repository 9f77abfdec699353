//! Falling-block puzzle simulation
//!
//! Gravity runs on wall-clock milliseconds; player input is edge-triggered
//! and consumed from the input set each tick.

use rand_pcg::Pcg32;

use super::board::Board;
use super::input::{InputCode, InputSet};
use super::state::{GameEvent, GamePhase, seeded_rng};
use super::tetromino::{Piece, TetrominoKind};
use crate::consts::*;

/// Complete puzzle state. Owned by exactly one engine.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    pub phase: GamePhase,
    pub board: Board,
    /// Falling piece; present whenever a run has started
    pub current: Option<Piece>,
    /// Preview of the piece that spawns next
    pub next: Option<TetrominoKind>,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Milliseconds between gravity steps
    pub drop_interval: f32,
    /// Milliseconds accumulated toward the next gravity step
    pub drop_counter: f32,
    rng: Pcg32,
}

impl PuzzleState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            board: Board::new(),
            current: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            drop_interval: BASE_DROP_INTERVAL_MS,
            drop_counter: 0.0,
            rng: seeded_rng(seed),
        }
    }

    /// Clear the board, reset counters and begin playing
    pub fn start(&mut self) {
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.drop_interval = BASE_DROP_INTERVAL_MS;
        self.drop_counter = 0.0;
        self.next = None;
        self.spawn_piece();
        self.phase = GamePhase::Playing;
        log::info!("Puzzle started");
    }

    pub fn toggle_pause(&mut self) {
        self.phase = self.phase.toggled();
    }

    /// Promote the preview piece to current and sample a new preview
    pub fn spawn_piece(&mut self) {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => TetrominoKind::random(&mut self.rng),
        };
        self.current = Some(Piece::spawn(kind));
        self.next = Some(TetrominoKind::random(&mut self.rng));
    }

    /// Shift the current piece. A blocked downward move lands it instead.
    /// Returns whether the piece moved.
    pub fn move_piece(&mut self, dx: i32, dy: i32, events: &mut Vec<GameEvent>) -> bool {
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if self.board.fits(piece, dx, dy) {
            piece.x += dx;
            piece.y += dy;
            return true;
        }
        if dy > 0 {
            self.land(events);
        }
        false
    }

    /// Rotate clockwise in place; rejected if the result does not fit
    pub fn rotate_piece(&mut self) -> bool {
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        let rotated = piece.shape.rotated();
        let original = std::mem::replace(&mut piece.shape, rotated);
        if self.board.fits(piece, 0, 0) {
            true
        } else {
            piece.shape = original;
            false
        }
    }

    fn land(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(piece) = self.current.take() {
            self.board.lock(&piece);
        }
        self.clear_lines(events);
        self.spawn_piece();

        if self.board.top_row_occupied() {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Puzzle over, final score {} ({} lines)",
                self.score,
                self.lines
            );
            events.push(GameEvent::GameOver {
                final_score: self.score,
            });
        }
    }

    fn clear_lines(&mut self, events: &mut Vec<GameEvent>) {
        let cleared = self.board.clear_lines();
        if cleared == 0 {
            return;
        }
        let points = line_clear_points(cleared, self.level);
        self.lines += cleared;
        self.score += points;
        events.push(GameEvent::LinesCleared {
            count: cleared,
            points,
        });

        let level = level_for_lines(self.lines);
        if level > self.level {
            self.level = level;
            self.drop_interval = drop_interval_for_level(level);
            log::debug!("Puzzle level {} ({}ms drop)", level, self.drop_interval);
            events.push(GameEvent::LevelUp { level });
        }
    }
}

/// Score for clearing `lines` rows at once
pub fn line_clear_points(lines: u32, level: u32) -> u64 {
    let base = LINE_CLEAR_POINTS
        .get(lines as usize)
        .copied()
        .unwrap_or(LINE_CLEAR_POINTS[LINE_CLEAR_POINTS.len() - 1]);
    base * level as u64
}

pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level, floored so the game stays playable
pub fn drop_interval_for_level(level: u32) -> f32 {
    let faster = level.saturating_sub(1) as f32 * DROP_INTERVAL_STEP_MS;
    (BASE_DROP_INTERVAL_MS - faster).max(MIN_DROP_INTERVAL_MS)
}

/// Advance the puzzle by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut PuzzleState, input: &mut InputSet, dt_ms: f32, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if input.take(InputCode::Left) {
        state.move_piece(-1, 0, events);
    }
    if input.take(InputCode::Right) {
        state.move_piece(1, 0, events);
    }
    if input.take(InputCode::Down) {
        state.move_piece(0, 1, events);
    }
    if input.take(InputCode::Up) {
        state.rotate_piece();
    }
    if input.take(InputCode::Pause) {
        state.toggle_pause();
    }
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.drop_counter += dt_ms;
    if state.drop_counter > state.drop_interval {
        state.move_piece(0, 1, events);
        state.drop_counter = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BOARD_COLS, BOARD_ROWS};
    use crate::sim::state::Color;

    const GRAY: Color = Color::hex(0x808080);

    fn playing(seed: u64) -> PuzzleState {
        let mut state = PuzzleState::new(seed);
        state.start();
        state
    }

    fn with_current(state: &mut PuzzleState, kind: TetrominoKind) {
        state.current = Some(Piece::spawn(kind));
    }

    fn hard_drop(state: &mut PuzzleState, events: &mut Vec<GameEvent>) {
        while state.move_piece(0, 1, events) {}
    }

    #[test]
    fn test_start_prepares_pieces() {
        let mut state = PuzzleState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.current.is_none());

        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.current.is_some());
        assert!(state.next.is_some());
        assert_eq!(state.drop_interval, 1000.0);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_spawn_promotes_next() {
        let mut state = playing(2);
        let next = state.next.unwrap();
        state.spawn_piece();
        assert_eq!(state.current.as_ref().unwrap().kind, next);
        assert_eq!(state.current.as_ref().unwrap().y, 0);
    }

    #[test]
    fn test_i_piece_lands_on_floor() {
        let mut state = playing(3);
        with_current(&mut state, TetrominoKind::I);
        let mut events = Vec::new();
        hard_drop(&mut state, &mut events);

        let color = TetrominoKind::I.color();
        let row = state.board.row(BOARD_ROWS - 1);
        for (x, cell) in row.iter().enumerate() {
            if (3..7).contains(&x) {
                assert_eq!(*cell, Some(color));
            } else {
                assert_eq!(*cell, None);
            }
        }
        assert_eq!(state.board.occupied_count(), 4);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_horizontal_moves_rejected_at_wall() {
        let mut state = playing(4);
        with_current(&mut state, TetrominoKind::O);
        let mut events = Vec::new();
        for _ in 0..10 {
            state.move_piece(-1, 0, &mut events);
        }
        assert_eq!(state.current.as_ref().unwrap().x, 0);
        assert!(!state.move_piece(-1, 0, &mut events));
        assert_eq!(state.current.as_ref().unwrap().x, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_rotation_rejected_against_wall() {
        let mut state = playing(5);
        with_current(&mut state, TetrominoKind::I);
        // Vertical I on the right wall cannot turn flat
        assert!(state.rotate_piece());
        state.current.as_mut().unwrap().x = BOARD_COLS as i32 - 1;
        let before = state.current.clone();
        assert!(!state.rotate_piece());
        assert_eq!(state.current, before);
    }

    #[test]
    fn test_rotation_rejected_by_stacked_blocks() {
        let mut state = playing(5);
        with_current(&mut state, TetrominoKind::I);
        // Flat I at columns 3..7, row 5; turning upright needs (3, 7)
        state.current.as_mut().unwrap().y = 5;
        state.board.set(3, 7, Some(GRAY));
        let before = state.current.clone();
        assert!(!state.rotate_piece());
        assert_eq!(state.current, before);

        state.board.set(3, 7, None);
        assert!(state.rotate_piece());
    }

    #[test]
    fn test_double_half_turn_restores_shape() {
        let mut state = playing(6);
        with_current(&mut state, TetrominoKind::S);
        state.current.as_mut().unwrap().y = 5;
        let original = state.current.as_ref().unwrap().shape.clone();
        for _ in 0..4 {
            assert!(state.rotate_piece());
        }
        assert_eq!(state.current.as_ref().unwrap().shape, original);
    }

    #[test]
    fn test_single_line_clear_scores() {
        let mut state = playing(7);
        state.level = 2;
        for x in 0..BOARD_COLS {
            if !(3..7).contains(&x) {
                state.board.set(x, BOARD_ROWS - 1, Some(GRAY));
            }
        }
        let before = state.board.occupied_count();
        with_current(&mut state, TetrominoKind::I);
        let mut events = Vec::new();
        hard_drop(&mut state, &mut events);

        assert_eq!(state.lines, 1);
        assert_eq!(state.score, 40 * 2);
        // 4 cells placed, 10 removed
        assert_eq!(state.board.occupied_count(), before + 4 - 10);
        assert!(events.contains(&GameEvent::LinesCleared {
            count: 1,
            points: 80
        }));
    }

    #[test]
    fn test_tetris_scores_1200() {
        let mut state = playing(8);
        for y in BOARD_ROWS - 4..BOARD_ROWS {
            for x in 1..BOARD_COLS {
                state.board.set(x, y, Some(GRAY));
            }
        }
        with_current(&mut state, TetrominoKind::I);
        assert!(state.rotate_piece());
        state.current.as_mut().unwrap().x = 0;
        let mut events = Vec::new();
        hard_drop(&mut state, &mut events);

        assert_eq!(state.lines, 4);
        assert_eq!(state.score, 1200);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut state = playing(9);
        state.lines = 9;
        for x in 0..BOARD_COLS {
            if !(3..7).contains(&x) {
                state.board.set(x, BOARD_ROWS - 1, Some(GRAY));
            }
        }
        with_current(&mut state, TetrominoKind::I);
        let mut events = Vec::new();
        hard_drop(&mut state, &mut events);

        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 2);
        assert_eq!(state.drop_interval, 950.0);
        // Points use the level before the clear
        assert_eq!(state.score, 40);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_speed_curve() {
        assert_eq!(drop_interval_for_level(1), 1000.0);
        assert_eq!(drop_interval_for_level(2), 950.0);
        assert_eq!(drop_interval_for_level(19), 100.0);
        assert_eq!(drop_interval_for_level(20), 50.0);
        assert_eq!(drop_interval_for_level(40), 50.0);
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(25), 3);
        assert_eq!(line_clear_points(3, 3), 900);
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let mut state = playing(10);
        let mut events = Vec::new();
        let mut input = InputSet::new();
        let y0 = state.current.as_ref().unwrap().y;

        tick(&mut state, &mut input, 600.0, &mut events);
        assert_eq!(state.current.as_ref().unwrap().y, y0);
        // Must exceed, not reach
        tick(&mut state, &mut input, 400.0, &mut events);
        assert_eq!(state.current.as_ref().unwrap().y, y0);
        tick(&mut state, &mut input, 1.0, &mut events);
        assert_eq!(state.current.as_ref().unwrap().y, y0 + 1);
        assert_eq!(state.drop_counter, 0.0);
    }

    #[test]
    fn test_input_is_consumed_each_tick() {
        let mut state = playing(11);
        with_current(&mut state, TetrominoKind::T);
        let mut events = Vec::new();
        let mut input = InputSet::from_codes(&[InputCode::Left]);

        tick(&mut state, &mut input, 0.0, &mut events);
        assert_eq!(state.current.as_ref().unwrap().x, 3);
        assert!(!input.is_held(InputCode::Left));

        tick(&mut state, &mut input, 0.0, &mut events);
        assert_eq!(state.current.as_ref().unwrap().x, 3);
    }

    #[test]
    fn test_pause_input_toggles() {
        let mut state = playing(12);
        let mut events = Vec::new();
        let mut input = InputSet::from_codes(&[InputCode::Pause]);
        tick(&mut state, &mut input, 16.0, &mut events);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let mut state = playing(13);
        state.toggle_pause();
        let board = state.board.clone();
        let current = state.current.clone();
        let mut events = Vec::new();
        let mut input = InputSet::from_codes(&[InputCode::Left, InputCode::Down]);

        tick(&mut state, &mut input, 5000.0, &mut events);
        assert_eq!(state.board, board);
        assert_eq!(state.current, current);
        assert_eq!(state.drop_counter, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_stack_to_top_ends_game() {
        let mut state = playing(14);
        let mut events = Vec::new();
        let mut guard = 0;
        while state.phase == GamePhase::Playing && guard < 200 {
            with_current(&mut state, TetrominoKind::O);
            hard_drop(&mut state, &mut events);
            guard += 1;
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.board.top_row_occupied());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );

        // Frozen
        let board = state.board.clone();
        let mut input = InputSet::from_codes(&[InputCode::Down]);
        tick(&mut state, &mut input, 5000.0, &mut events);
        assert_eq!(state.board, board);
    }
}
