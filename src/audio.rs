//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a looping ambient drone - no
//! external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy destroyed by a bullet
    Explosion,
    /// Enemy rammed the player
    PlayerHit,
    /// Wave cleared
    WaveClear,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Sound to play for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Shot => SoundEffect::Shoot,
            GameEvent::EnemyDestroyed { .. } => SoundEffect::Explosion,
            GameEvent::PlayerHit => SoundEffect::PlayerHit,
            GameEvent::WaveCleared { .. } => SoundEffect::WaveClear,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

/// Running background music voices
struct Music {
    voices: Vec<OscillatorNode>,
    gain: GainNode,
    swell: Option<GainNode>,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music: Option<Music>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            muted: false,
            music: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let level = self.music_level();
        if let Some(music) = &self.music {
            music.gain.gain().set_value(level);
            if let Some(swell) = &music.swell {
                swell.gain().set_value(level * 0.5);
            }
        }
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.music_volume * 0.25
        }
    }

    /// Play the effect for each simulation event
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            self.play(SoundEffect::for_event(event));
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = if self.muted { 0.0 } else { self.sfx_volume };
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Shoot => self.play_shoot(ctx, vol),
            SoundEffect::Explosion => self.play_explosion(ctx, vol),
            SoundEffect::PlayerHit => self.play_player_hit(ctx, vol),
            SoundEffect::WaveClear => self.play_wave_clear(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    /// Start the looping ambient drone (no-op if already playing)
    pub fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Ok(gain) = ctx.create_gain() else { return };
        gain.gain().set_value(self.music_level());
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let mut voices = Vec::new();
        for (freq, osc_type) in [
            (55.0, OscillatorType::Sawtooth),
            (55.4, OscillatorType::Sawtooth),
            (82.5, OscillatorType::Sine),
        ] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                voices.push(osc);
            }
        }

        // Slow swell on the drone
        let mut swell = None;
        if let (Ok(lfo), Ok(depth)) = (ctx.create_oscillator(), ctx.create_gain()) {
            lfo.frequency().set_value(0.08);
            depth.gain().set_value(self.music_level() * 0.5);
            let wired = lfo.connect_with_audio_node(&depth).is_ok()
                && depth.connect_with_audio_param(&gain.gain()).is_ok();
            if wired && lfo.start().is_ok() {
                voices.push(lfo);
                swell = Some(depth);
            }
        }

        log::info!("Music started ({} voices)", voices.len());
        self.music = Some(Music { voices, gain, swell });
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Shot - short falling zap
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.12, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Enemy explosion - low rumble with a crack on top
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(100.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();

        if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain2.gain().set_value_at_time(vol * 0.2, t).ok();
            gain2
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc2.start().ok();
            osc2.stop_with_when(t + 0.15).ok();
        }
    }

    /// Player hit - harsh descending buzz
    fn play_player_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Wave cleared - rising arpeggio
    fn play_wave_clear(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Game over - falling tones
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
