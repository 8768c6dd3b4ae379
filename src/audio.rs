//! Audio collaborator
//!
//! The simulation only talks to an [`AudioSink`]. Every call is fire-and-forget:
//! autoplay rejections and missing devices are swallowed (and logged) by the
//! sink, never surfaced to the frame update.

use std::cell::RefCell;
use std::rc::Rc;

/// Named audio tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Looping start-screen music
    IntroMusic,
    /// Looping in-game music
    StageMusic,
    /// Player missile launch
    Shoot,
    /// Enemy/player explosion
    Explosion,
}

impl Track {
    pub fn path(&self) -> &'static str {
        match self {
            Track::IntroMusic => "audio/intro.ogg",
            Track::StageMusic => "audio/stage01.ogg",
            Track::Shoot => "audio/shoot.ogg",
            Track::Explosion => "audio/explosion-enemy01.ogg",
        }
    }
}

/// Call contract the game core requires from an audio backend
pub trait AudioSink {
    /// Replace the current music with a looping track
    fn play_music(&mut self, track: Track);
    /// Fire a one-shot effect
    fn play_sfx(&mut self, track: Track);
    /// Short synthesized "ding"
    fn play_coin_sound(&mut self);
    /// Fade the current music to silence, then stop it
    fn fade_out(&mut self, duration_secs: f32);
    fn pause(&mut self);
    fn resume(&mut self);

    /// True while the host has refused playback (autoplay policy)
    fn is_locked(&self) -> bool {
        false
    }

    /// Retry playback after a user gesture
    fn unlock(&mut self) {}

    /// Advance time-based effects (fades). `now` is wall-clock seconds.
    fn tick(&mut self, _now: f64) {}
}

/// Discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_music(&mut self, _track: Track) {}
    fn play_sfx(&mut self, _track: Track) {}
    fn play_coin_sound(&mut self) {}
    fn fade_out(&mut self, _duration_secs: f32) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
}

/// A single call made against a [`RecordingAudio`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCall {
    Music(Track),
    Sfx(Track),
    Coin,
    FadeOut(f32),
    Pause,
    Resume,
    Unlock,
}

/// Records calls into a shared log so tests can inspect them after handing
/// the sink to the game.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    log: Rc<RefCell<Vec<AudioCall>>>,
    locked: bool,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in the locked (autoplay refused) state
    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Self::default()
        }
    }

    /// Handle to the shared call log
    pub fn log(&self) -> Rc<RefCell<Vec<AudioCall>>> {
        Rc::clone(&self.log)
    }

    fn push(&self, call: AudioCall) {
        self.log.borrow_mut().push(call);
    }
}

impl AudioSink for RecordingAudio {
    fn play_music(&mut self, track: Track) {
        self.push(AudioCall::Music(track));
    }

    fn play_sfx(&mut self, track: Track) {
        self.push(AudioCall::Sfx(track));
    }

    fn play_coin_sound(&mut self) {
        self.push(AudioCall::Coin);
    }

    fn fade_out(&mut self, duration_secs: f32) {
        self.push(AudioCall::FadeOut(duration_secs));
    }

    fn pause(&mut self) {
        self.push(AudioCall::Pause);
    }

    fn resume(&mut self) {
        self.push(AudioCall::Resume);
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn unlock(&mut self) {
        self.locked = false;
        self.push(AudioCall::Unlock);
    }
}

/// Linear music fade in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicFade {
    /// Wall-clock start (seconds); `None` until the first tick observes it
    pub started: Option<f64>,
    pub duration: f64,
    pub from_volume: f64,
}

impl MusicFade {
    pub fn new(duration_secs: f32, from_volume: f64) -> Self {
        Self {
            started: None,
            duration: f64::from(duration_secs.max(0.0)),
            from_volume,
        }
    }

    /// Volume at `now`, or `None` once the fade has finished
    pub fn volume_at(&mut self, now: f64) -> Option<f64> {
        let start = *self.started.get_or_insert(now);
        if self.duration <= 0.0 {
            return None;
        }
        let t = ((now - start) / self.duration).clamp(0.0, 1.0);
        if t >= 1.0 {
            None
        } else {
            Some(self.from_volume * (1.0 - t))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioSink, MusicFade, Track};

    /// Seconds between unlock attempts after a refusal
    const UNLOCK_RETRY_SECS: f64 = 1.0;

    /// HTML media elements for music/effects plus a shared Web Audio context
    /// for synthesized sounds.
    pub struct AudioManager {
        base_url: String,
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        music_volume: f64,
        sfx_volume: f64,
        fade: Option<MusicFade>,
        locked: Rc<Cell<bool>>,
        next_unlock_attempt: f64,
        now: f64,
    }

    impl AudioManager {
        pub fn new(base_url: &str, music_volume: f32, sfx_volume: f32) -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - synthesized sounds disabled");
            }
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                ctx,
                music: None,
                music_volume: f64::from(music_volume.clamp(0.0, 1.0)),
                sfx_volume: f64::from(sfx_volume.clamp(0.0, 1.0)),
                fade: None,
                locked: Rc::new(Cell::new(false)),
                next_unlock_attempt: 0.0,
                now: 0.0,
            }
        }

        fn url(&self, track: Track) -> String {
            format!("{}/{}", self.base_url, track.path())
        }

        fn stop_music(&mut self) {
            if let Some(music) = &self.music {
                music.pause().ok();
                music.set_current_time(0.0);
            }
        }

        /// Start playback; a rejected promise flips us into the locked state
        fn try_play_music(&self) {
            let Some(music) = &self.music else { return };
            let Ok(promise) = music.play() else {
                self.locked.set(true);
                return;
            };
            let locked = Rc::clone(&self.locked);
            wasm_bindgen_futures::spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => locked.set(false),
                    Err(e) => {
                        log::warn!("Audio autoplay blocked, waiting for interaction: {e:?}");
                        locked.set(true);
                    }
                }
            });
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
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
    }

    impl AudioSink for AudioManager {
        fn play_music(&mut self, track: Track) {
            self.fade = None;
            self.stop_music();

            let music = match HtmlAudioElement::new_with_src(&self.url(track)) {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("Could not create audio element for {track:?}: {e:?}");
                    self.music = None;
                    return;
                }
            };
            music.set_loop(true);
            music.set_volume(self.music_volume);
            self.music = Some(music);
            self.locked.set(true);
            self.try_play_music();
        }

        fn play_sfx(&mut self, track: Track) {
            if self.sfx_volume <= 0.0 {
                return;
            }
            if let Ok(sfx) = HtmlAudioElement::new_with_src(&self.url(track)) {
                sfx.set_volume(self.sfx_volume);
                // Rapid-fire effects routinely hit autoplay limits; drop them
                let _ = sfx.play();
            }
        }

        fn play_coin_sound(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let Some((osc, gain)) = Self::create_osc(ctx, 1000.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(1000.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(3000.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        fn fade_out(&mut self, duration_secs: f32) {
            let Some(music) = &self.music else { return };
            self.fade = Some(MusicFade::new(duration_secs, music.volume()));
        }

        fn pause(&mut self) {
            if let Some(music) = &self.music {
                music.pause().ok();
            }
        }

        fn resume(&mut self) {
            self.try_play_music();
        }

        fn is_locked(&self) -> bool {
            self.locked.get()
        }

        fn unlock(&mut self) {
            if self.now < self.next_unlock_attempt {
                return;
            }
            self.next_unlock_attempt = self.now + UNLOCK_RETRY_SECS;
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
            self.try_play_music();
        }

        fn tick(&mut self, now: f64) {
            self.now = now;
            let Some(fade) = self.fade.as_mut() else { return };
            match fade.volume_at(now) {
                Some(volume) => {
                    if let Some(music) = &self.music {
                        music.set_volume(volume);
                    }
                }
                None => {
                    self.fade = None;
                    if let Some(music) = &self.music {
                        music.set_volume(0.0);
                    }
                    self.stop_music();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_audio_shares_log() {
        let audio = RecordingAudio::new();
        let log = audio.log();
        let mut sink: Box<dyn AudioSink> = Box::new(audio);
        sink.play_music(Track::IntroMusic);
        sink.play_sfx(Track::Shoot);
        sink.fade_out(2.0);
        assert_eq!(
            *log.borrow(),
            vec![
                AudioCall::Music(Track::IntroMusic),
                AudioCall::Sfx(Track::Shoot),
                AudioCall::FadeOut(2.0),
            ]
        );
    }

    #[test]
    fn test_unlock_clears_lock() {
        let mut audio = RecordingAudio::locked();
        assert!(audio.is_locked());
        audio.unlock();
        assert!(!audio.is_locked());
    }

    #[test]
    fn test_music_fade_is_linear_then_ends() {
        let mut fade = MusicFade::new(2.0, 0.5);
        assert_eq!(fade.volume_at(10.0), Some(0.5));
        let mid = fade.volume_at(11.0).unwrap();
        assert!((mid - 0.25).abs() < 1e-9);
        assert_eq!(fade.volume_at(12.0), None);
    }

    #[test]
    fn test_zero_length_fade_ends_immediately() {
        let mut fade = MusicFade::new(0.0, 0.5);
        assert_eq!(fade.volume_at(1.0), None);
    }
}
