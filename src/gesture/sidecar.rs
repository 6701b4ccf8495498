//! Landmark detection through an external sidecar process.
//!
//! The hand model runs out of process (for example a MediaPipe script).
//! Each request is one JSON header line followed by the raw RGB bytes:
//!
//! ```text
//! {"seq":7,"width":640,"height":480}\n<640*480*3 bytes>
//! ```
//!
//! and the sidecar answers with one JSON line per request, landmarks in
//! normalized `[x, y, z, confidence]` form:
//!
//! ```text
//! {"seq":7,"hands":[{"score":0.97,"landmarks":[[0.51,0.83,0.0,0.99], ...]}]}
//! ```
//!
//! Replies are awaited for a bounded time only. At most one request is
//! outstanding: while the sidecar is still working on a frame, later
//! `detect` calls keep waiting for that reply instead of queueing new
//! frames, so a slow sidecar lags behind the camera but its answers are
//! still used. A reply with an unexpected `seq` is discarded.

use std::io::{BufRead, BufReader, Write};
use std::process::ChildStdin;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::detector::{DetectorError, LandmarkDetector};
use super::landmarks::{Landmark, LandmarkSet};
use crate::camera::Frame;
use crate::ffmpeg::{HelperProcess, Pipes};

#[derive(Debug, Serialize)]
struct RequestHeader {
    seq: u64,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct Reply {
    seq: u64,
    #[serde(default)]
    hands: Vec<ReplyHand>,
}

#[derive(Debug, Deserialize)]
struct ReplyHand {
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<[f32; 4]>,
}

fn full_score() -> f32 {
    1.0
}

struct Request {
    seq: u64,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Parse one reply line into its sequence number and first hand.
///
/// Normalized coordinates are scaled to a `width` x `height` frame.
pub fn parse_reply(
    line: &str,
    width: u32,
    height: u32,
) -> Result<(u64, Option<LandmarkSet>), serde_json::Error> {
    let reply: Reply = serde_json::from_str(line)?;
    let hand = reply.hands.into_iter().next().map(|hand| {
        let points = hand
            .landmarks
            .iter()
            .map(|&[x, y, z, c]| Landmark::new(x * width as f32, y * height as f32, z, c))
            .collect();
        LandmarkSet::new(points, hand.score)
    });
    Ok((reply.seq, hand))
}

/// Consecutive timeouts after which a slow sidecar is reported.
const SLOW_SIDECAR_TIMEOUTS: u32 = 30;
/// A request unanswered for this long is given up and a new frame sent.
const ABANDON_AFTER: Duration = Duration::from_secs(2);

/// [`LandmarkDetector`] backed by a sidecar process.
pub struct SidecarDetector {
    requests: Option<SyncSender<Request>>,
    replies: Receiver<String>,
    process: HelperProcess,
    seq: u64,
    /// Request sent but not yet answered, with its send time
    pending: Option<(u64, Instant)>,
    timeouts: u32,
    timeout: Duration,
}

impl std::fmt::Debug for SidecarDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidecarDetector")
            .field("process", &self.process)
            .field("seq", &self.seq)
            .field("pending", &self.pending)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SidecarDetector {
    /// Start the sidecar given as an argv vector.
    ///
    /// # Arguments
    /// * `command` - Program followed by its arguments
    /// * `timeout` - Longest time a single `detect` call waits for a reply
    pub fn spawn(command: &[String], timeout: Duration) -> Result<Self, DetectorError> {
        let (program, args) = command.split_first().ok_or(DetectorError::EmptyCommand)?;
        let mut process = HelperProcess::spawn(program, args, Pipes::DUPLEX)?;

        let stdin = process.take_stdin().ok_or(DetectorError::Exited)?;
        let stdout = process.take_stdout().ok_or(DetectorError::Exited)?;

        // One request in flight at most; a busy sidecar makes detect() skip
        let (request_tx, request_rx) = mpsc::sync_channel::<Request>(1);
        thread::spawn(move || write_requests(stdin, request_rx));

        let (reply_tx, reply_rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if reply_tx.send(line).is_err() {
                    break;
                }
            }
        });

        log::info!("Landmark sidecar started: {}", command.join(" "));

        Ok(Self {
            requests: Some(request_tx),
            replies: reply_rx,
            process,
            seq: 0,
            pending: None,
            timeouts: 0,
            timeout,
        })
    }

    fn submit(&mut self, frame: &Frame) -> Result<u64, DetectorError> {
        let requests = self.requests.as_ref().ok_or(DetectorError::Exited)?;
        self.seq += 1;
        let request = Request {
            seq: self.seq,
            width: frame.width,
            height: frame.height,
            data: frame.data.clone(),
        };
        match requests.try_send(request) {
            Ok(()) => Ok(self.seq),
            Err(TrySendError::Full(_)) => Err(DetectorError::Busy),
            Err(TrySendError::Disconnected(_)) => {
                self.requests = None;
                Err(DetectorError::Exited)
            }
        }
    }
}

fn write_requests(mut stdin: ChildStdin, requests: Receiver<Request>) {
    for request in requests {
        let header = RequestHeader {
            seq: request.seq,
            width: request.width,
            height: request.height,
        };
        let result = serde_json::to_vec(&header)
            .map_err(std::io::Error::from)
            .and_then(|mut line| {
                line.push(b'\n');
                stdin.write_all(&line)?;
                stdin.write_all(&request.data)?;
                stdin.flush()
            });
        if let Err(e) = result {
            log::warn!("Landmark sidecar stopped accepting frames: {}", e);
            break;
        }
    }
}

impl LandmarkDetector for SidecarDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError> {
        if let Some((seq, sent)) = self.pending {
            if sent.elapsed() >= ABANDON_AFTER {
                log::warn!("Landmark sidecar never answered request {}; sending a new frame", seq);
                self.pending = None;
            }
        }
        let seq = match self.pending {
            Some((seq, _)) => seq,
            None => {
                let seq = self.submit(frame)?;
                self.pending = Some((seq, Instant::now()));
                seq
            }
        };
        let deadline = Instant::now() + self.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let line = match self.replies.recv_timeout(remaining) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => {
                    self.timeouts = self.timeouts.saturating_add(1);
                    if self.timeouts == SLOW_SIDECAR_TIMEOUTS {
                        log::warn!(
                            "Landmark sidecar keeps missing its {} ms budget; gestures will lag",
                            self.timeout.as_millis()
                        );
                    }
                    return Err(DetectorError::Timeout(self.timeout.as_millis() as u64));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.pending = None;
                    return Err(DetectorError::Exited);
                }
            };

            let (reply_seq, hand) = match parse_reply(&line, frame.width, frame.height) {
                Ok(reply) => reply,
                Err(e) => {
                    self.pending = None;
                    return Err(e.into());
                }
            };
            if reply_seq == seq {
                self.pending = None;
                self.timeouts = 0;
                return Ok(hand);
            }
            log::debug!("Discarding stale sidecar reply {} (waiting for {})", reply_seq, seq);
        }
    }
}

impl Drop for SidecarDetector {
    fn drop(&mut self) {
        // Closing the request channel ends the writer thread and the
        // sidecar's stdin with it
        self.requests = None;
        if let Err(e) = self.process.shutdown() {
            log::warn!("Failed to stop landmark sidecar: {}", e);
        }
    }
}
