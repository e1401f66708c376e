//! Audio cues
//!
//! Procedurally generated tones, no sound files needed. Real output needs the
//! `sound` feature; without it every cue is only logged.

use crate::app::AudioSink;
use crate::settings::Settings;
use crate::sim::AudioCue;

/// One tone: frequency (Hz), duration (ms), relative gain
pub type Tone = (f32, u64, f32);

/// Tone sequence a cue is played as
pub fn tones(cue: AudioCue) -> &'static [Tone] {
    match cue {
        // Short chirp
        AudioCue::Jump => &[(880.0, 70, 0.35)],
        // Descending thud
        AudioCue::Collision => &[(220.0, 90, 0.6), (110.0, 160, 0.5)],
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<backend::ToneBackend>,
    volume: f32,
}

impl AudioManager {
    /// Open the output once; a silent configuration never touches the device
    pub fn new(settings: &Settings) -> Self {
        let volume = settings.effective_volume();
        let backend = if volume > 0.0 {
            backend::ToneBackend::open()
        } else {
            log::debug!("Audio muted - output not opened");
            None
        };
        Self { backend, volume }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: AudioCue) {
        if self.volume <= 0.0 {
            return;
        }
        match &self.backend {
            Some(backend) => backend.play(tones(cue), self.volume),
            None => log::debug!("Audio cue {cue:?} (no output)"),
        }
    }
}

#[cfg(feature = "sound")]
mod backend {
    use std::time::Duration;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source, source::SineWave};

    use super::Tone;

    pub struct ToneBackend {
        // Output stops when the stream is dropped
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl ToneBackend {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                }),
                Err(e) => {
                    log::warn!("Failed to open audio output - audio disabled: {e}");
                    None
                }
            }
        }

        pub fn play(&self, tones: &[Tone], vol: f32) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    log::warn!("Failed to create audio sink: {e}");
                    return;
                }
            };
            for &(freq, ms, gain) in tones {
                sink.append(
                    SineWave::new(freq)
                        .take_duration(Duration::from_millis(ms))
                        .amplify(gain * vol),
                );
            }
            sink.detach();
        }
    }
}

#[cfg(not(feature = "sound"))]
mod backend {
    use super::Tone;

    pub struct ToneBackend;

    impl ToneBackend {
        pub fn open() -> Option<Self> {
            log::info!("Built without the sound feature - audio cues are logged only");
            None
        }

        pub fn play(&self, _tones: &[Tone], _vol: f32) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_manager_stays_closed() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(&settings);
        assert_eq!(audio.volume, 0.0);
        assert!(audio.backend.is_none());
        audio.play(AudioCue::Jump);
        audio.play(AudioCue::Collision);
    }

    #[test]
    fn test_volume_follows_settings() {
        // Zero master volume counts as silent like mute does
        let settings = Settings {
            master_volume: 0.0,
            ..Default::default()
        };
        let audio = AudioManager::new(&settings);
        assert_eq!(audio.volume, settings.effective_volume());
        assert!(audio.backend.is_none());
    }

    #[test]
    fn test_collision_descends() {
        let t = tones(AudioCue::Collision);
        assert!(t.windows(2).all(|w| w[0].0 > w[1].0));
        assert_eq!(tones(AudioCue::Jump).len(), 1);
    }
}
