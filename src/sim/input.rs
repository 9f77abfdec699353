//! Logical input codes
//!
//! The host translates physical keys into these codes; the simulations only
//! ever see an `InputSet`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCode {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Pause,
}

impl InputCode {
    pub const ALL: [InputCode; 6] = [
        InputCode::Left,
        InputCode::Right,
        InputCode::Up,
        InputCode::Down,
        InputCode::Fire,
        InputCode::Pause,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of currently asserted input codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSet(u8);

impl InputSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn from_codes(codes: &[InputCode]) -> Self {
        let mut set = Self::new();
        for &code in codes {
            set.press(code);
        }
        set
    }

    pub fn press(&mut self, code: InputCode) {
        self.0 |= code.bit();
    }

    pub fn release(&mut self, code: InputCode) {
        self.0 &= !code.bit();
    }

    #[inline]
    pub fn is_held(&self, code: InputCode) -> bool {
        self.0 & code.bit() != 0
    }

    /// Edge-triggered read: reports the code once and clears it
    pub fn take(&mut self, code: InputCode) -> bool {
        let held = self.is_held(code);
        self.release(code);
        held
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = InputCode> + '_ {
        InputCode::ALL.into_iter().filter(move |c| self.is_held(*c))
    }
}
