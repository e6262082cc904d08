use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
};

use tracing::debug;

use crate::{
    audio::{constants::TARGET_SAMPLE_RATE, pipeline::SymphoniaDecoder},
    common::errors::LoadError,
    configs::{AudioConfig, DecoderKind},
};

/// Raw interleaved s16le, 48 kHz, stereo.
pub type PcmStream = Box<dyn Read + Send>;

/// Opens a named asset as a PCM stream.
pub trait PcmDecoder: Send + Sync {
    fn open(&self, name: &str) -> Result<PcmStream, LoadError>;
}

pub fn decoder_from_config(config: &AudioConfig) -> Box<dyn PcmDecoder> {
    match config.decoder {
        DecoderKind::Ffmpeg => Box::new(FfmpegDecoder::from_config(config)),
        DecoderKind::Symphonia => Box::new(SymphoniaDecoder::from_config(config)),
    }
}

pub(crate) fn asset_path(asset_dir: &Path, name: &str, extension: &str) -> PathBuf {
    asset_dir.join(format!("{name}.{extension}"))
}

/// Spawns `ffmpeg` per asset and reads its stdout.
pub struct FfmpegDecoder {
    program: String,
    asset_dir: PathBuf,
    extension: String,
    volume: u32,
}

impl FfmpegDecoder {
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            program: config.ffmpeg_path.clone(),
            asset_dir: PathBuf::from(&config.asset_dir),
            extension: config.extension.clone(),
            volume: config.volume,
        }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-i")
            .arg(path)
            .args(["-vol", &self.volume.to_string()])
            .args(["-f", "s16le"])
            .args(["-ar", &TARGET_SAMPLE_RATE.to_string()])
            .args(["-ac", "2"])
            .args(["-loglevel", "error"])
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl PcmDecoder for FfmpegDecoder {
    fn open(&self, name: &str) -> Result<PcmStream, LoadError> {
        let path = asset_path(&self.asset_dir, name, &self.extension);
        if !path.is_file() {
            return Err(LoadError::AssetNotFound(path.display().to_string()));
        }

        debug!("Spawning {} for {}", self.program, path.display());
        let mut child = self.command(&path).spawn().map_err(LoadError::DecoderSpawn)?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LoadError::MissingOutput);
        };

        Ok(Box::new(FfmpegStream { child, stdout }))
    }
}

/// ffmpeg stdout; the child is reaped when the stream is dropped.
///
/// End of output is only reported as EOF when ffmpeg exited cleanly. A failed
/// exit becomes a read error so the load is not mistaken for an empty asset.
struct FfmpegStream {
    child: Child,
    stdout: ChildStdout,
}

impl Read for FfmpegStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.stdout.read(buf)?;
        if n == 0 && !buf.is_empty() {
            let status = self.child.wait()?;
            if !status.success() {
                return Err(io::Error::other(format!("decoder exited with {status}")));
            }
        }
        Ok(n)
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_asset_is_reported_before_spawning() {
        let config = AudioConfig {
            asset_dir: "/nonexistent/airhorn".to_string(),
            ..AudioConfig::default()
        };
        let decoder = FfmpegDecoder::from_config(&config);
        match decoder.open("airhorn1") {
            Err(LoadError::AssetNotFound(path)) => assert!(path.ends_with("airhorn1.wav")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a missing asset"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failed_decoder_exit_is_a_read_error() {
        use crate::audio::pipeline::transcode::{tests::MarkerEncoder, transcode};

        let dir = std::env::temp_dir().join(format!("airhorn-decoder-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("asset dir");
        std::fs::write(dir.join("airhorn1.wav"), b"not really audio").expect("asset");

        let config = AudioConfig {
            asset_dir: dir.display().to_string(),
            ffmpeg_path: "false".to_string(),
            ..AudioConfig::default()
        };
        let pcm = FfmpegDecoder::from_config(&config)
            .open("airhorn1")
            .expect("spawns");
        let err = transcode(pcm, MarkerEncoder::new()).expect_err("exit status is checked");
        assert!(matches!(err.source, LoadError::ChunkRead(_)));
        assert!(err.frames.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn command_requests_raw_stereo_pcm() {
        let decoder = FfmpegDecoder::from_config(&AudioConfig::default());
        let cmd = decoder.command(Path::new("audio/airhorn1.wav"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            [
                "-i",
                "audio/airhorn1.wav",
                "-vol",
                "256",
                "-f",
                "s16le",
                "-ar",
                "48000",
                "-ac",
                "2",
                "-loglevel",
                "error",
                "pipe:1"
            ]
        );
    }
}
