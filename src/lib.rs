//! ascii-gesture library crate.
//!
//! This module exposes the internal components for the binary and for
//! integration testing.

pub mod ascii;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controller;
pub mod event_loop;
pub mod ffmpeg;
pub mod gesture;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod recorder;
pub mod render;
