//! Background reader thread for the capture helper's frame stream.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::types::{Frame, Resolution};

/// Read fixed-size RGB frames from `stream` until it ends.
///
/// Every complete frame replaces whatever is in `slot` (latest-value-wins);
/// a slow consumer only ever sees the newest frame. When the stream ends or
/// fails, `ended` is raised so the consumer can report the device as lost.
pub fn run_capture_loop<R: Read>(
    mut stream: R,
    resolution: Resolution,
    slot: Arc<Mutex<Option<Frame>>>,
    ended: Arc<AtomicBool>,
) {
    let frame_bytes = resolution.frame_bytes();
    let mut frames = 0u64;

    loop {
        let mut data = vec![0u8; frame_bytes];
        if let Err(e) = stream.read_exact(&mut data) {
            log::warn!("Camera stream ended after {} frames: {}", frames, e);
            break;
        }

        let frame = Frame::new(data, resolution.width, resolution.height, Instant::now());
        match slot.lock() {
            Ok(mut latest) => *latest = Some(frame),
            Err(_) => {
                log::error!("Frame buffer poisoned; stopping camera reader");
                break;
            }
        }

        frames += 1;
        if frames == 1 {
            log::info!("First camera frame received ({})", resolution);
        }
    }

    ended.store(true, Ordering::SeqCst);
}
