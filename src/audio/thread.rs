use std::sync::mpsc::Receiver;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::create_preview_sink;
use super::types::AudioCmd;

fn fade_out_sink(sink: &Sink, volume: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Spawn the thread that owns the output stream and plays previews.
///
/// Playback failures (no output device, undecodable preview) are logged and
/// leave the thread silent; commands keep being consumed so the game never
/// blocks on audio.
pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, settings: AudioSettings) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "no audio output device, previews will be silent");
                None
            }
        };
        // rodio logs to stderr when OutputStream is dropped; that would scribble over the TUI.
        if let Some(s) = stream.as_mut() {
            s.log_on_drop(false);
        }

        let preview_length = Duration::from_secs(settings.preview_seconds.max(1));
        let mut sink: Option<Sink> = None;

        while let Ok(cmd) = rx.recv() {
            match cmd {
                AudioCmd::Play(source) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    let Some(stream) = stream.as_ref() else {
                        continue;
                    };
                    match create_preview_sink(stream, &source, preview_length, settings.volume) {
                        Ok(new_sink) => {
                            new_sink.play();
                            sink = Some(new_sink);
                        }
                        Err(e) => {
                            tracing::warn!(uri = source.uri(), error = %e, "preview playback failed")
                        }
                    }
                }
                AudioCmd::Stop => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                }
                AudioCmd::Quit { fade_out_ms } => {
                    if let Some(s) = sink.take() {
                        fade_out_sink(&s, settings.volume, fade_out_ms);
                        s.stop();
                    }
                    break;
                }
            }
        }
    })
}
