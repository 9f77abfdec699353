//! Sound cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each cue is a short list of oscillator tones; native builds keep the
//! volume state and log what would have played.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::SoundSink;
use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player fired
    Shoot,
    /// Particle burst
    Explosion,
    /// Power-up collected
    PowerUp,
    /// Puzzle rows cleared
    LineClear,
    /// Difficulty went up
    LevelUp,
    /// Run ended
    GameOver,
    /// New high score entry
    HighScore,
    /// Page button pressed
    Button,
    /// Pointer over a button
    Hover,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator voice: frequency sweep with an exponential gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq: f32,
    /// Sweep target; equal to `freq` for a steady pitch
    pub freq_end: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Start offset in seconds
    pub delay: f64,
    /// Seconds until the voice stops
    pub duration: f64,
}

const fn tone(wave: Wave, freq: f32, freq_end: f32, gain: f32, delay: f64, duration: f64) -> Tone {
    Tone {
        wave,
        freq,
        freq_end,
        gain,
        delay,
        duration,
    }
}

const SHOOT: &[Tone] = &[tone(Wave::Square, 880.0, 220.0, 0.15, 0.0, 0.08)];
const EXPLOSION: &[Tone] = &[
    tone(Wave::Sawtooth, 100.0, 30.0, 0.5, 0.0, 0.4),
    tone(Wave::Square, 1500.0, 1500.0, 0.2, 0.0, 0.1),
];
const POWER_UP: &[Tone] = &[
    tone(Wave::Sine, 600.0, 1200.0, 0.3, 0.0, 0.12),
    tone(Wave::Sine, 900.0, 1800.0, 0.2, 0.06, 0.12),
];
const LINE_CLEAR: &[Tone] = &[
    tone(Wave::Triangle, 523.0, 523.0, 0.3, 0.0, 0.1),
    tone(Wave::Triangle, 659.0, 659.0, 0.3, 0.08, 0.1),
    tone(Wave::Triangle, 784.0, 784.0, 0.3, 0.16, 0.15),
];
const LEVEL_UP: &[Tone] = &[
    tone(Wave::Square, 392.0, 392.0, 0.2, 0.0, 0.1),
    tone(Wave::Square, 523.0, 523.0, 0.2, 0.1, 0.1),
    tone(Wave::Square, 659.0, 659.0, 0.2, 0.2, 0.1),
    tone(Wave::Square, 784.0, 784.0, 0.25, 0.3, 0.25),
];
const GAME_OVER: &[Tone] = &[
    tone(Wave::Sawtooth, 400.0, 300.0, 0.3, 0.0, 0.25),
    tone(Wave::Sawtooth, 300.0, 200.0, 0.3, 0.25, 0.25),
    tone(Wave::Sawtooth, 200.0, 80.0, 0.3, 0.5, 0.6),
];
const HIGH_SCORE: &[Tone] = &[
    tone(Wave::Triangle, 784.0, 784.0, 0.25, 0.0, 0.12),
    tone(Wave::Triangle, 988.0, 988.0, 0.25, 0.12, 0.12),
    tone(Wave::Triangle, 1175.0, 1175.0, 0.25, 0.24, 0.12),
    tone(Wave::Triangle, 1568.0, 1568.0, 0.3, 0.36, 0.4),
];
const BUTTON: &[Tone] = &[tone(Wave::Square, 660.0, 660.0, 0.15, 0.0, 0.05)];
const HOVER: &[Tone] = &[tone(Wave::Sine, 1200.0, 1200.0, 0.05, 0.0, 0.03)];

impl SoundCue {
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundCue::Shoot => SHOOT,
            SoundCue::Explosion => EXPLOSION,
            SoundCue::PowerUp => POWER_UP,
            SoundCue::LineClear => LINE_CLEAR,
            SoundCue::LevelUp => LEVEL_UP,
            SoundCue::GameOver => GAME_OVER,
            SoundCue::HighScore => HIGH_SCORE,
            SoundCue::Button => BUTTON,
            SoundCue::Hover => HOVER,
        }
    }
}

/// Audio manager shared by the minigames and page chrome
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Cues requested while audible
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: Self::create_context(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    #[cfg(target_arch = "wasm32")]
    fn create_context() -> Option<AudioContext> {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        ctx
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Resume audio context (required after user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn played(&self) -> u64 {
        self.played
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play_cue(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        self.emit(cue, vol);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn emit(&self, cue: SoundCue, vol: f32) {
        log::debug!("sound {:?} at volume {:.2}", cue, vol);
    }

    #[cfg(target_arch = "wasm32")]
    fn emit(&self, cue: SoundCue, vol: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let t = ctx.current_time();
        for tone in cue.tones() {
            self.play_tone(ctx, tone, t, vol);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn play_tone(&self, ctx: &AudioContext, tone: &Tone, now: f64, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.wave) else {
            return;
        };
        let start = now + tone.delay;
        let end = start + tone.duration;

        gain.gain().set_value_at_time(0.0, now).ok();
        gain.gain().set_value_at_time(vol * tone.gain, start).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if tone.freq_end != tone.freq {
            osc.frequency().set_value_at_time(tone.freq, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.freq_end, end)
                .ok();
        }

        osc.start_with_when(start).ok();
        osc.stop_with_when(end + 0.05).ok();
    }

    /// Create an oscillator routed through its own gain node
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        wave: Wave,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
            Wave::Triangle => OscillatorType::Triangle,
        });
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        self.play_cue(cue);
    }
}

/// One audio manager shared by both engines
impl SoundSink for std::rc::Rc<std::cell::RefCell<AudioManager>> {
    fn play(&mut self, cue: SoundCue) {
        if let Ok(mut audio) = self.try_borrow_mut() {
            audio.play_cue(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SoundCue; 9] = [
        SoundCue::Shoot,
        SoundCue::Explosion,
        SoundCue::PowerUp,
        SoundCue::LineClear,
        SoundCue::LevelUp,
        SoundCue::GameOver,
        SoundCue::HighScore,
        SoundCue::Button,
        SoundCue::Hover,
    ];

    #[test]
    fn test_every_cue_has_audible_tones() {
        for cue in ALL {
            let tones = cue.tones();
            assert!(!tones.is_empty(), "{cue:?}");
            for tone in tones {
                assert!(tone.freq > 0.0 && tone.freq_end > 0.0, "{cue:?}");
                assert!(tone.gain > 0.0 && tone.gain <= 1.0, "{cue:?}");
                assert!(tone.duration > 0.0, "{cue:?}");
            }
        }
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        audio.play(SoundCue::Explosion);
        assert_eq!(audio.played(), 0);

        audio.set_muted(false);
        audio.play(SoundCue::Explosion);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);

        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let audio = AudioManager::from_settings(&settings);
        assert!(audio.is_muted());
    }
}
