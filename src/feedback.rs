//! Score and sound sinks
//!
//! Engines report points and request sound cues through these traits. Both
//! are fire-and-forget: nothing is returned and failures stay inside the
//! sink.

use std::cell::RefCell;
use std::rc::Rc;

pub use crate::audio::SoundCue;
use crate::scoreboard::Scoreboard;

pub trait ScoreSink {
    fn report_points(&mut self, points: u64);
}

pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScore;

impl ScoreSink for NullScore {
    fn report_points(&mut self, _points: u64) {}
}

/// Silent sound sink
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&mut self, _cue: SoundCue) {}
}

impl ScoreSink for Scoreboard {
    fn report_points(&mut self, points: u64) {
        self.update_score(points);
    }
}

/// Shared scoreboard fed by several engines
impl ScoreSink for Rc<RefCell<Scoreboard>> {
    fn report_points(&mut self, points: u64) {
        match self.try_borrow_mut() {
            Ok(mut board) => board.update_score(points),
            Err(_) => log::warn!("Scoreboard busy, dropped {} points", points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_scoreboard_sink() {
        let board = Rc::new(RefCell::new(Scoreboard::new()));
        let mut a: Box<dyn ScoreSink> = Box::new(Rc::clone(&board));
        let mut b: Box<dyn ScoreSink> = Box::new(Rc::clone(&board));

        a.report_points(25);
        b.report_points(100);

        assert_eq!(board.borrow().score(), 2024 + 125);
    }

    #[test]
    fn test_busy_scoreboard_drops_report() {
        let board = Rc::new(RefCell::new(Scoreboard::new()));
        let mut sink = Rc::clone(&board);
        let guard = board.borrow();

        sink.report_points(10);

        assert_eq!(guard.score(), 2024);
    }

    #[test]
    fn test_null_sinks_accept_everything() {
        let mut score = NullScore;
        let mut sound = NullSound;
        score.report_points(u64::MAX);
        sound.play(SoundCue::GameOver);
    }
}
