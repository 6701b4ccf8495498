//! Screenshots and recordings of the live output.
//!
//! A screenshot is the current ASCII frame as a UTF-8 text file. A
//! recording writes two files side by side: the mirrored camera stream
//! encoded by an ffmpeg helper, and every ASCII frame appended to a text
//! file with form-feed separators.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ChildStdin;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::ascii::AsciiFrame;
use crate::camera::{Frame, Resolution};
use crate::ffmpeg::{HelperProcess, Pipes, ProcessError};
use crate::pipeline::TickOutput;

/// Frames buffered for the encoder before new ones are dropped.
const ENCODER_QUEUE: usize = 16;

/// How long ffmpeg gets to finish the file after its input closes.
const ENCODER_FINISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Separator written between frames in the recording text file.
pub const FRAME_SEPARATOR: &str = "\n\x0c\n";

/// Errors from writing screenshots or recordings.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("video encoder error: {0}")]
    Encoder(#[from] ProcessError),
}

impl RecorderError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        RecorderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File name for a capture taken at `now`, e.g.
/// `ascii_capture_20240131_235959_123.txt`.
pub fn timestamped_name(prefix: &str, extension: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.{}", prefix, now.format("%Y%m%d_%H%M%S_%3f"), extension)
}

/// Build ffmpeg arguments encoding rawvideo from stdin to `output`.
pub fn encoder_args(resolution: Resolution, fps: u32, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pixel_format".to_string(),
        "rgb24".to_string(),
        "-video_size".to_string(),
        resolution.to_string(),
        "-framerate".to_string(),
        fps.to_string(),
        "-i".to_string(),
        "pipe:0".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Files produced by one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingPaths {
    pub text: PathBuf,
    /// Absent when the video encoder could not be started
    pub video: Option<PathBuf>,
}

/// Outcome of a start/stop toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    Started(RecordingPaths),
    Stopped { paths: RecordingPaths, frames: u64 },
}

struct VideoEncoder {
    frames: Option<SyncSender<Arc<Frame>>>,
    feeder: Option<JoinHandle<()>>,
    process: HelperProcess,
    resolution: Resolution,
    dropped: u64,
}

impl VideoEncoder {
    fn start(resolution: Resolution, fps: u32, path: &Path) -> Result<Self, ProcessError> {
        let args = encoder_args(resolution, fps, path);
        let mut process = HelperProcess::spawn("ffmpeg", &args, Pipes::INPUT)?;
        let stdin = process.take_stdin().ok_or_else(|| {
            ProcessError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "encoder has no stdin",
            ))
        })?;

        let (tx, rx) = mpsc::sync_channel(ENCODER_QUEUE);
        let feeder = thread::spawn(move || feed_encoder(stdin, rx));

        Ok(Self {
            frames: Some(tx),
            feeder: Some(feeder),
            process,
            resolution,
            dropped: 0,
        })
    }

    fn push(&mut self, frame: Arc<Frame>) -> bool {
        if frame.resolution() != self.resolution {
            return true;
        }
        let Some(frames) = &self.frames else {
            return false;
        };
        match frames.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                self.frames = None;
                false
            }
        }
    }

    fn finish(mut self) -> Result<(), ProcessError> {
        // Closing the channel lets the feeder drain the queue and close
        // stdin; ffmpeg then writes the trailer and exits by itself
        self.frames = None;
        if let Some(feeder) = self.feeder.take() {
            let _ = feeder.join();
        }
        if self.dropped > 0 {
            log::warn!("Encoder fell behind; {} frames dropped", self.dropped);
        }
        if self.process.wait_timeout(ENCODER_FINISH_TIMEOUT)?.is_none() {
            self.process.shutdown()?;
        }
        Ok(())
    }
}

fn feed_encoder(mut stdin: ChildStdin, frames: Receiver<Arc<Frame>>) {
    for frame in frames {
        if let Err(e) = stdin.write_all(&frame.data) {
            log::warn!("Video encoder stopped accepting frames: {}", e);
            break;
        }
    }
}

struct Session {
    paths: RecordingPaths,
    text: BufWriter<File>,
    video: Option<VideoEncoder>,
    frames: u64,
}

/// Screenshot and recording writer.
pub struct Recorder {
    dir: PathBuf,
    fps: u32,
    session: Option<Session>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("dir", &self.dir)
            .field("fps", &self.fps)
            .field("recording", &self.is_recording())
            .finish()
    }
}

impl Recorder {
    /// Create a recorder writing into `dir` at `fps` frames per second.
    pub fn new(dir: impl Into<PathBuf>, fps: u32) -> Self {
        Self {
            dir: dir.into(),
            fps: fps.max(1),
            session: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Write `ascii` to a new screenshot file.
    pub fn screenshot(&self, ascii: &AsciiFrame) -> Result<PathBuf, RecorderError> {
        let path = self
            .dir
            .join(timestamped_name("ascii_capture", "txt", Local::now()));
        let mut contents = ascii.to_string_display();
        contents.push('\n');
        std::fs::write(&path, contents).map_err(|e| RecorderError::io(&path, e))?;
        log::info!("Screenshot saved to {}", path.display());
        Ok(path)
    }

    /// Start a recording of frames at `resolution`.
    ///
    /// If the video encoder cannot be started, the ASCII text recording
    /// still runs and the returned paths have no video.
    pub fn start(&mut self, resolution: Resolution) -> Result<RecordingPaths, RecorderError> {
        if let Some(session) = &self.session {
            return Ok(session.paths.clone());
        }

        let now = Local::now();
        let text_path = self
            .dir
            .join(timestamped_name("ascii_recording", "txt", now));
        let video_path = self
            .dir
            .join(timestamped_name("ascii_recording", "mp4", now));

        let file = File::create(&text_path).map_err(|e| RecorderError::io(&text_path, e))?;

        let video = match VideoEncoder::start(resolution, self.fps, &video_path) {
            Ok(encoder) => Some(encoder),
            Err(e) => {
                log::warn!("Recording ASCII text only; video encoder failed: {}", e);
                None
            }
        };

        let paths = RecordingPaths {
            text: text_path,
            video: video.as_ref().map(|_| video_path),
        };
        log::info!("Recording started: {:?}", paths);

        self.session = Some(Session {
            paths: paths.clone(),
            text: BufWriter::new(file),
            video,
            frames: 0,
        });
        Ok(paths)
    }

    /// Stop the current recording, if any.
    ///
    /// # Returns
    /// The finished files and number of frames written.
    pub fn stop(&mut self) -> Result<Option<(RecordingPaths, u64)>, RecorderError> {
        let Some(mut session) = self.session.take() else {
            return Ok(None);
        };

        session
            .text
            .flush()
            .map_err(|e| RecorderError::io(&session.paths.text, e))?;
        if let Some(video) = session.video.take() {
            video.finish()?;
        }

        log::info!(
            "Recording stopped after {} frames: {:?}",
            session.frames,
            session.paths
        );
        Ok(Some((session.paths, session.frames)))
    }

    /// Start recording if idle, stop if recording.
    pub fn toggle(&mut self, resolution: Resolution) -> Result<RecorderEvent, RecorderError> {
        match self.stop()? {
            Some((paths, frames)) => Ok(RecorderEvent::Stopped { paths, frames }),
            None => self.start(resolution).map(RecorderEvent::Started),
        }
    }

    /// Append one tick to the running recording. No-op when idle.
    ///
    /// Repeated (non-fresh) ticks are written too, so the recording keeps
    /// wall-clock pace when the camera stalls.
    pub fn record(&mut self, output: &TickOutput) -> Result<(), RecorderError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        let text_path = &session.paths.text;
        let write = |text: &mut BufWriter<File>| -> std::io::Result<()> {
            text.write_all(output.ascii.to_string_display().as_bytes())?;
            text.write_all(FRAME_SEPARATOR.as_bytes())
        };
        write(&mut session.text).map_err(|e| RecorderError::io(text_path, e))?;
        session.frames += 1;

        if let Some(video) = session.video.as_mut() {
            if !video.push(Arc::clone(&output.frame)) {
                log::warn!("Video encoder exited; continuing with ASCII text only");
                session.video = None;
            }
        }
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Failed to finish recording: {}", e);
        }
    }
}
