//! Sound cue played while the keys are shuffled.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

use crate::config::Settings;
use crate::game::AudioCue;

const SOUND_EXTENSION: &str = "mp3";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sound asset {} not found", .0.display())]
    MissingAsset(PathBuf),
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode sound: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("no audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to start playback: {0}")]
    Play(#[from] rodio::PlayError),
}

pub fn asset_path(sound_dir: &Path, asset: &str) -> PathBuf {
    sound_dir.join(format!("{asset}.{SOUND_EXTENSION}"))
}

pub struct RodioCue {
    enabled: bool,
    volume: f32,
    sound_dir: PathBuf,
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl RodioCue {
    pub fn new(settings: &Settings) -> Self {
        RodioCue {
            enabled: settings.sound_enabled,
            volume: settings.volume,
            sound_dir: settings.sound_dir(),
            output: None,
            sink: None,
        }
    }

    fn open_asset(&self, asset: &str) -> Result<BufReader<File>, AudioError> {
        let path = asset_path(&self.sound_dir, asset);
        if !path.is_file() {
            return Err(AudioError::MissingAsset(path));
        }
        let file = File::open(&path).map_err(|source| AudioError::Open { path, source })?;
        Ok(BufReader::new(file))
    }

    fn output_handle(&mut self) -> Result<&OutputStreamHandle, AudioError> {
        if self.output.is_none() {
            self.output = Some(OutputStream::try_default()?);
        }
        match &self.output {
            Some((_, handle)) => Ok(handle),
            None => Err(AudioError::Stream(rodio::StreamError::NoDevice)),
        }
    }

    fn try_play(&mut self, asset: &str) -> Result<(), AudioError> {
        let reader = self.open_asset(asset)?;
        let source = Decoder::new(reader)?;
        let sink = Sink::try_new(self.output_handle()?)?;
        sink.set_volume(self.volume);
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }
}

impl AudioCue for RodioCue {
    fn play(&mut self, asset: &str) {
        if !self.enabled {
            tracing::debug!(asset, "Sound disabled, skipping cue");
            return;
        }
        if let Err(err) = self.try_play(asset) {
            tracing::warn!(asset, %err, "Sound cue unavailable");
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue_for(dir: &Path) -> RodioCue {
        RodioCue::new(&Settings {
            sound_dir: Some(dir.to_path_buf()),
            ..Settings::default()
        })
    }

    #[test]
    fn asset_names_map_to_mp3_files() {
        assert_eq!(
            asset_path(Path::new("data/sounds"), "Song"),
            PathBuf::from("data/sounds/Song.mp3")
        );
    }

    #[test]
    fn missing_asset_is_reported_before_touching_the_device() {
        let dir = std::env::temp_dir().join("limbokeys-no-such-sounds");
        let cue = cue_for(&dir);
        match cue.open_asset("Song") {
            Err(AudioError::MissingAsset(path)) => assert_eq!(path, dir.join("Song.mp3")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("asset should be missing"),
        }
    }

    #[test]
    fn failed_play_is_swallowed() {
        let mut cue = cue_for(&std::env::temp_dir().join("limbokeys-no-such-sounds"));
        cue.play("Song");
        assert!(cue.sink.is_none());
        cue.stop();
    }
}
