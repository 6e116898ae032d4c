//! Interactive viewer for recorded radar point-cloud replays.
//!
//! This crate provides tools for:
//! - Loading and validating JSON replay files of per-frame point clouds
//! - Flipping sensor coordinates into height above the floor
//! - Building a slider-controlled 3D scatter figure, one trace per frame
//! - Presenting the figure as an HTML page in the default browser
//!
//! # Example
//!
//! ```no_run
//! use radar_replay::{core::loaders::load_replay, visualization, ViewerConfig};
//!
//! let config = ViewerConfig::default();
//! let frames = load_replay("replay_1.json").unwrap();
//! let scene = visualization::assemble_scene(&frames, &config);
//! visualization::present(&scene, &config.display, &Default::default()).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod visualization;

pub use config::{ColorBy, DisplayConfig, RadarMountConfig, ViewerConfig};
pub use crate::core::loaders::{Frame, PointTable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
