//! Procedural sound effects
//!
//! Each effect is described by a compact parameter vector (volume,
//! randomness, frequency, envelope, waveform, slides and jumps). Playback
//! turns a vector plus a position and pitch into a [`Voice`], which the Web
//! Audio backend synthesizes with an oscillator, a gain envelope and a stereo
//! panner. Native builds have no audio output and only log what would play.

use glam::Vec2;

use crate::consts::{CAMERA_SCALE, CANVAS_SIZE};
use crate::settings::Settings;
use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball bounces off anything
    Bounce,
    /// Ball spawned
    Start,
    /// Brick destroyed
    Break,
    /// Ball fell out
    Lose,
    /// Level cleared
    Win,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
    Noise,
}

impl Waveform {
    fn from_index(shape: f32) -> Self {
        match shape as u32 {
            0 => Waveform::Sine,
            1 => Waveform::Triangle,
            2 => Waveform::Sawtooth,
            3 => Waveform::Square,
            _ => Waveform::Noise,
        }
    }
}

/// Decoded sound parameter vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundParams {
    pub volume: f32,
    pub randomness: f32,
    pub frequency: f32,
    pub attack: f32,
    pub sustain: f32,
    pub release: f32,
    pub waveform: Waveform,
    /// Frequency change in Hz per second
    pub slide: f32,
    pub pitch_jump: f32,
    pub pitch_jump_time: f32,
    pub sustain_volume: f32,
    pub decay: f32,
}

/// Defaults for slots left empty in a parameter vector
const DEFAULTS: [f32; 19] = [
    1.0,   // volume
    0.05,  // randomness
    220.0, // frequency
    0.0,   // attack
    0.0,   // sustain
    0.1,   // release
    0.0,   // shape
    1.0,   // shape curve
    0.0,   // slide
    0.0,   // delta slide
    0.0,   // pitch jump
    0.0,   // pitch jump time
    0.0,   // repeat time
    0.0,   // noise
    0.0,   // modulation
    0.0,   // bit crush
    0.0,   // delay
    1.0,   // sustain volume
    0.0,   // decay
];

/// Slide units in the vectors are Hz per sample step at 44.1 kHz / 100
const SLIDE_SCALE: f32 = 441.0;

impl SoundParams {
    /// Decode a parameter vector; `None` slots take the default value
    pub fn from_vector(params: &[Option<f32>]) -> Self {
        let get = |i: usize| params.get(i).copied().flatten().unwrap_or(DEFAULTS[i]);
        Self {
            volume: get(0),
            randomness: get(1),
            frequency: get(2),
            attack: get(3),
            sustain: get(4),
            release: get(5),
            waveform: Waveform::from_index(get(6)),
            slide: (get(8) + get(9) * 0.5) * SLIDE_SCALE,
            pitch_jump: get(10),
            pitch_jump_time: get(11),
            sustain_volume: get(17),
            decay: get(18),
        }
    }

    /// Total length in seconds
    pub fn duration(&self) -> f32 {
        self.attack + self.decay + self.sustain + self.release
    }
}

const BOUNCE: [Option<f32>; 20] = [
    None, None, Some(180.0), None, Some(0.03), Some(0.01), Some(1.0), Some(3.3), None,
    Some(-85.0), None, None, None, None, Some(0.7), None, None, Some(0.88), Some(0.02),
    Some(0.03),
];
const START: [Option<f32>; 20] = [
    None, None, Some(272.0), Some(0.08), Some(0.29), Some(0.47), Some(1.0), Some(3.3), None,
    Some(-139.0), Some(198.0), Some(0.07), Some(0.06), None, None, None, None, Some(0.78),
    Some(0.28), Some(0.07),
];
const BREAK: [Option<f32>; 21] = [
    Some(1.7), None, Some(31.0), Some(0.01), Some(0.02), Some(0.32), Some(4.0), Some(3.8),
    None, Some(4.0), None, None, None, Some(0.7), None, Some(0.9), Some(0.1), Some(0.32),
    Some(0.2), Some(0.37), Some(1555.0),
];
const LOSE: [Option<f32>; 20] = [
    Some(1.2), None, Some(84.0), Some(0.1), Some(0.3), Some(0.6), None, Some(0.5), Some(-6.0),
    Some(2.0), None, None, Some(0.22), Some(0.3), None, Some(0.7), None, Some(0.37),
    Some(0.23), Some(0.25),
];
const WIN: [Option<f32>; 19] = [
    None, None, Some(557.0), Some(0.06), Some(0.29), Some(0.37), None, Some(3.1), None, None,
    Some(490.0), Some(0.08), Some(0.06), None, None, None, None, Some(0.9), Some(0.15),
];

impl SoundEffect {
    pub fn params(self) -> SoundParams {
        match self {
            SoundEffect::Bounce => SoundParams::from_vector(&BOUNCE),
            SoundEffect::Start => SoundParams::from_vector(&START),
            SoundEffect::Break => SoundParams::from_vector(&BREAK),
            SoundEffect::Lose => SoundParams::from_vector(&LOSE),
            SoundEffect::Win => SoundParams::from_vector(&WIN),
        }
    }
}

/// Which sound an event makes: effect, world position, pitch
pub fn sound_for_event(event: &GameEvent) -> Option<(SoundEffect, Option<Vec2>, f32)> {
    match *event {
        GameEvent::Bounce { pos, hits } => {
            Some((SoundEffect::Bounce, Some(pos), 1.0 + hits as f32 / 16.0))
        }
        GameEvent::BrickBroken { pos } => Some((SoundEffect::Break, Some(pos), 1.0)),
        GameEvent::BallSpawned => Some((SoundEffect::Start, None, 1.0)),
        GameEvent::BallLost { .. } => Some((SoundEffect::Lose, None, 1.0)),
        GameEvent::Won { .. } => Some((SoundEffect::Win, None, 1.0)),
        GameEvent::LevelReset => None,
    }
}

/// Full stereo pan width
const PAN_WIDTH: f32 = 0.7;
/// Distance in world units beyond which positional sounds are silent
const SOUND_RANGE: f32 = 40.0;
/// Fraction of the range played at full volume
const SOUND_TAPER: f32 = 0.7;

/// A ready-to-synthesize sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub frequency: f32,
    /// Frequency after the slide, at the end of the sound
    pub end_frequency: f32,
    pub gain: f32,
    pub pan: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub sustain_gain: f32,
    /// (seconds after start, frequency offset)
    pub pitch_jump: Option<(f32, f32)>,
}

/// Build a voice for `params` heard from `camera`
///
/// `jitter` in [-1, 1] spreads the frequency by the params' randomness.
pub fn voice(
    params: &SoundParams,
    pos: Option<Vec2>,
    camera: Vec2,
    volume: f32,
    pitch: f32,
    jitter: f32,
) -> Voice {
    let (pan, distance_gain) = match pos {
        Some(pos) => {
            let half_width = CANVAS_SIZE.0 as f32 / 2.0;
            let screen_x = (pos.x - camera.x) * CAMERA_SCALE / half_width;
            let pan = screen_x.clamp(-1.0, 1.0) * PAN_WIDTH;
            let distance = pos.distance(camera);
            let full = SOUND_RANGE * SOUND_TAPER;
            let gain = ((SOUND_RANGE - distance) / (SOUND_RANGE - full)).clamp(0.0, 1.0);
            (pan, gain)
        }
        None => (0.0, 1.0),
    };

    let frequency = params.frequency * pitch * (1.0 + params.randomness * jitter.clamp(-1.0, 1.0));
    let end_frequency = (frequency + params.slide * params.duration()).max(20.0);
    let pitch_jump = (params.pitch_jump != 0.0)
        .then_some((params.pitch_jump_time, params.pitch_jump * pitch));

    Voice {
        waveform: params.waveform,
        frequency,
        end_frequency,
        gain: params.volume * volume * distance_gain,
        pan,
        attack: params.attack,
        decay: params.decay,
        sustain: params.sustain,
        release: params.release,
        sustain_gain: params.volume * volume * distance_gain * params.sustain_volume,
        pitch_jump,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    volume: f32,
    camera: Vec2,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };

        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            volume: settings.effective_volume(),
            camera: crate::level_center(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play the sounds for a frame's events
    pub fn handle_events(&self, events: &[GameEvent]) {
        for event in events {
            if let Some((effect, pos, pitch)) = sound_for_event(event) {
                self.play(effect, pos, pitch);
            }
        }
    }

    /// Play a sound effect, optionally positioned in the world
    pub fn play(&self, effect: SoundEffect, pos: Option<Vec2>, pitch: f32) {
        if self.volume <= 0.0 {
            return;
        }
        let jitter = rand::random_range(-1.0f32..=1.0);
        let voice = voice(&effect.params(), pos, self.camera, self.volume, pitch, jitter);
        self.play_voice(effect, &voice);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play_voice(&self, effect: SoundEffect, voice: &Voice) {
        log::trace!(
            "{:?}: {:.0} Hz, gain {:.2}, pan {:.2}",
            effect,
            voice.frequency,
            voice.gain,
            voice.pan
        );
    }

    #[cfg(target_arch = "wasm32")]
    fn play_voice(&self, _effect: SoundEffect, voice: &Voice) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Ok(osc) = ctx.create_oscillator() else { return };
        let Ok(gain) = ctx.create_gain() else { return };
        let Ok(panner) = ctx.create_stereo_panner() else { return };

        osc.set_type(match voice.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Square | Waveform::Noise => OscillatorType::Square,
        });
        if osc.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&panner).is_err()
            || panner.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }
        panner.pan().set_value(voice.pan);

        let t = ctx.current_time();
        let attack_end = t + voice.attack as f64;
        let decay_end = attack_end + voice.decay as f64;
        let sustain_end = decay_end + voice.sustain as f64;
        let end = sustain_end + voice.release as f64;

        // Envelope
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(voice.gain, attack_end.max(t + 0.001))
            .ok();
        gain.gain()
            .linear_ramp_to_value_at_time(voice.sustain_gain, decay_end.max(t + 0.002))
            .ok();
        gain.gain()
            .set_value_at_time(voice.sustain_gain, sustain_end.max(t + 0.002))
            .ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();

        // Pitch
        osc.frequency().set_value_at_time(voice.frequency, t).ok();
        if let Some((at, offset)) = voice.pitch_jump {
            osc.frequency()
                .set_value_at_time(voice.frequency + offset, t + at as f64)
                .ok();
        }
        osc.frequency()
            .linear_ramp_to_value_at_time(voice.end_frequency, end)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_defaults() {
        let params = SoundEffect::Bounce.params();
        assert_eq!(params.volume, 1.0);
        assert_eq!(params.randomness, 0.05);
        assert_eq!(params.frequency, 180.0);
        assert_eq!(params.attack, 0.0);
        assert_eq!(params.waveform, Waveform::Triangle);
        assert_eq!(params.sustain_volume, 0.88);

        let params = SoundEffect::Break.params();
        assert_eq!(params.volume, 1.7);
        assert_eq!(params.waveform, Waveform::Noise);

        let params = SoundParams::from_vector(&[]);
        assert_eq!(params.frequency, 220.0);
        assert_eq!(params.release, 0.1);
    }

    #[test]
    fn test_event_sounds() {
        let bounce = GameEvent::Bounce {
            pos: Vec2::new(1.0, 2.0),
            hits: 8,
        };
        assert_eq!(
            sound_for_event(&bounce),
            Some((SoundEffect::Bounce, Some(Vec2::new(1.0, 2.0)), 1.5))
        );
        assert_eq!(
            sound_for_event(&GameEvent::Won { score: 10 }).map(|s| s.0),
            Some(SoundEffect::Win)
        );
        assert_eq!(sound_for_event(&GameEvent::LevelReset), None);
    }

    #[test]
    fn test_pitch_scales_frequency() {
        let params = SoundEffect::Bounce.params();
        let camera = crate::level_center();
        let low = voice(&params, None, camera, 1.0, 1.0, 0.0);
        let high = voice(&params, None, camera, 1.0, 1.5, 0.0);
        assert!((high.frequency - low.frequency * 1.5).abs() < 1e-3);
        assert_eq!(low.pan, 0.0);
    }

    #[test]
    fn test_position_pans() {
        let params = SoundEffect::Break.params();
        let camera = crate::level_center();
        let left = voice(&params, Some(Vec2::new(0.0, 10.0)), camera, 1.0, 1.0, 0.0);
        let right = voice(&params, Some(Vec2::new(38.0, 10.0)), camera, 1.0, 1.0, 0.0);
        let center = voice(&params, Some(camera), camera, 1.0, 1.0, 0.0);
        assert!(left.pan < 0.0 && right.pan > 0.0);
        assert!(left.pan >= -PAN_WIDTH && right.pan <= PAN_WIDTH);
        assert_eq!(center.pan, 0.0);
        // Everything inside the level is within full-volume range
        assert_eq!(left.gain, center.gain);
    }

    #[test]
    fn test_far_sounds_are_silent() {
        let params = SoundEffect::Bounce.params();
        let v = voice(&params, Some(Vec2::new(500.0, 0.0)), Vec2::ZERO, 1.0, 1.0, 0.0);
        assert_eq!(v.gain, 0.0);
    }

    #[test]
    fn test_muted_manager_plays_nothing() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let manager = AudioManager::new(&settings);
        // No backend natively; must not panic
        manager.handle_events(&[GameEvent::BallSpawned, GameEvent::LevelReset]);
    }
}
