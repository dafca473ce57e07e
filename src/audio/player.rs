use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::quiz::{PreviewPlayer, PreviewSource};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let audio_handle = spawn_audio_thread(rx, audio_settings);

        Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// A sender the game session uses to drive playback.
    pub fn handle(&self) -> AudioHandle {
        AudioHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// Cheap command handle to the audio thread.
#[derive(Clone)]
pub struct AudioHandle {
    tx: Sender<AudioCmd>,
}

impl PreviewPlayer for AudioHandle {
    fn play(&mut self, source: PreviewSource) {
        if self.tx.send(AudioCmd::Play(source)).is_err() {
            tracing::debug!("audio thread gone, skipping preview");
        }
    }

    fn stop(&mut self) {
        if self.tx.send(AudioCmd::Stop).is_err() {
            tracing::debug!("audio thread gone, nothing to stop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_forwards_play_and_stop_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut handle = AudioHandle { tx };

        handle.play(PreviewSource::OnDemand { uri: "/m/a.mp3".into() });
        handle.stop();

        assert!(matches!(rx.try_recv(), Ok(AudioCmd::Play(PreviewSource::OnDemand { uri })) if uri == "/m/a.mp3"));
        assert!(matches!(rx.try_recv(), Ok(AudioCmd::Stop)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn handle_survives_a_gone_audio_thread() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut handle = AudioHandle { tx };

        // Both commands are dropped and logged; the game carries on silently.
        handle.play(PreviewSource::OnDemand { uri: "/m/a.mp3".into() });
        handle.stop();
        handle.stop();
    }
}
