//! Hand skeleton drawn over the camera window.

use crate::camera::Frame;
use crate::gesture::{Landmark, LandmarkSet, HAND_CONNECTIONS};

/// Bone color (RGB).
pub const BONE_COLOR: [u8; 3] = [224, 224, 224];
/// Keypoint color (RGB).
pub const JOINT_COLOR: [u8; 3] = [255, 48, 48];
/// Keypoint square half-size in pixels.
const JOINT_RADIUS: i64 = 2;

/// Copy of `frame` with the hand's bones and keypoints drawn on it.
///
/// `frame` itself is left untouched. Points are in the frame's pixel
/// coordinates; anything outside the frame is clipped.
pub fn draw_landmarks(frame: &Frame, hand: &LandmarkSet) -> Frame {
    let mut canvas = Canvas {
        data: frame.data.clone(),
        width: frame.width as i64,
        height: frame.height as i64,
    };

    for (a, b) in HAND_CONNECTIONS {
        if let (Some(from), Some(to)) = (hand.get(a), hand.get(b)) {
            if let (Some(from), Some(to)) = (canvas.point(from), canvas.point(to)) {
                canvas.line(from, to, BONE_COLOR);
            }
        }
    }
    for landmark in &hand.points {
        if let Some((x, y)) = canvas.point(landmark) {
            canvas.square(x, y, JOINT_RADIUS, JOINT_COLOR);
        }
    }

    Frame::new(canvas.data, frame.width, frame.height, frame.timestamp)
}

struct Canvas {
    data: Vec<u8>,
    width: i64,
    height: i64,
}

impl Canvas {
    /// Pixel position of a landmark. Far off-frame positions are pulled
    /// to within one frame size of the edges so lines stay short.
    fn point(&self, landmark: &Landmark) -> Option<(i64, i64)> {
        if !landmark.x.is_finite() || !landmark.y.is_finite() {
            return None;
        }
        let x = (landmark.x.round() as i64).clamp(-self.width, 2 * self.width);
        let y = (landmark.y.round() as i64).clamp(-self.height, 2 * self.height);
        Some((x, y))
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let offset = ((y * self.width + x) * 3) as usize;
        self.data[offset..offset + 3].copy_from_slice(&color);
    }

    fn square(&mut self, cx: i64, cy: i64, r: i64, color: [u8; 3]) {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Bresenham line, both ends included.
    fn line(&mut self, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: [u8; 3]) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{HandLandmark, HAND_LANDMARK_COUNT};
    use std::time::Instant;

    fn black(width: u32, height: u32) -> Frame {
        Frame::new(
            vec![0; (width * height * 3) as usize],
            width,
            height,
            Instant::now(),
        )
    }

    /// Wrist at (2, 2), every other keypoint stacked at (10, 10).
    fn hand() -> LandmarkSet {
        let mut points = vec![Landmark::new(10.0, 10.0, 0.0, 1.0); HAND_LANDMARK_COUNT];
        points[HandLandmark::Wrist as usize] = Landmark::new(2.0, 2.0, 0.0, 1.0);
        LandmarkSet::new(points, 0.9)
    }

    #[test]
    fn test_marks_keypoints_and_bones() {
        let frame = black(20, 20);
        let drawn = draw_landmarks(&frame, &hand());

        assert_eq!(drawn.pixel(2, 2), JOINT_COLOR);
        assert_eq!(drawn.pixel(10, 10), JOINT_COLOR);
        assert_eq!(drawn.pixel(12, 8), JOINT_COLOR);
        // On the wrist-to-knuckle diagonal, clear of both joints
        assert_eq!(drawn.pixel(6, 6), BONE_COLOR);
        // Untouched background
        assert_eq!(drawn.pixel(18, 1), [0, 0, 0]);
        assert_eq!(drawn.timestamp, frame.timestamp);
    }

    #[test]
    fn test_source_frame_is_unchanged() {
        let frame = black(20, 20);
        draw_landmarks(&frame, &hand());
        assert!(frame.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_off_frame_points_are_clipped() {
        let frame = black(8, 8);
        let mut far = LandmarkSet::new(
            vec![Landmark::new(6.0, 4.0, 0.0, 1.0); HAND_LANDMARK_COUNT],
            0.9,
        );
        far.points[HandLandmark::Wrist as usize] = Landmark::new(-1.0e9, 4.0, 0.0, 1.0);
        far.points[HandLandmark::IndexTip as usize] = Landmark::new(f32::NAN, 0.0, 0.0, 1.0);
        let drawn = draw_landmarks(&frame, &far);
        assert_eq!(drawn.data.len(), frame.data.len());
        // The clipped wrist bones still cross the frame
        assert_eq!(drawn.pixel(0, 4), BONE_COLOR);
        assert_eq!(drawn.pixel(6, 4), JOINT_COLOR);
    }

    #[test]
    fn test_partial_hand_draws_what_it_has() {
        let frame = black(10, 10);
        let partial = LandmarkSet::new(vec![Landmark::new(5.0, 5.0, 0.0, 1.0)], 0.5);
        let drawn = draw_landmarks(&frame, &partial);
        assert_eq!(drawn.pixel(5, 5), JOINT_COLOR);
    }
}
