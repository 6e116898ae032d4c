//! Per-frame coordinate transforms and color selection.
//!
//! Raw sensor rows measure `y` downwards from the radar. The viewer plots
//! distance above the floor instead, so every point is flipped against the
//! configured mount height before display.

use serde::Serialize;

use crate::config::{ColorBy, RadarMountConfig};

use super::loaders::Frame;

/// Marker color used when no scalar field drives the coloring.
pub const FIXED_MARKER_COLOR: &str = "blue";

/// Marker coloring for one frame.
///
/// Serializes to what plotly expects in `marker.color`: an array of
/// scalars or a single color name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorValues {
    /// One scalar per point, mapped through the mode's color scale.
    Scalars(Vec<f64>),
    /// A single named color for all points.
    Fixed(&'static str),
}

/// A frame reshaped for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedFrame {
    /// Position in the replay.
    pub index: usize,
    /// Frame number shown to the user.
    pub display_number: u64,
    /// Lateral offset in meters.
    pub x: Vec<f64>,
    /// Range along boresight in meters.
    pub z: Vec<f64>,
    /// Height above the floor in meters.
    pub height: Vec<f64>,
    /// Radial velocity in m/s.
    pub velocity: Vec<f64>,
    /// Return intensity.
    pub intensity: Vec<f64>,
    /// Marker coloring, `None` for frames without points.
    pub color: Option<ColorValues>,
}

impl TransformedFrame {
    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the frame carries no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Convert a downward sensor offset into height above the floor.
#[inline]
pub fn flip_height(mount_height: f64, raw_y: f64) -> f64 {
    mount_height - raw_y
}

/// Pick the marker coloring for a set of points.
pub fn select_colors(color_by: ColorBy, velocity: &[f64], intensity: &[f64]) -> ColorValues {
    match color_by {
        ColorBy::Velocity => ColorValues::Scalars(velocity.to_vec()),
        ColorBy::Intensity => ColorValues::Scalars(intensity.to_vec()),
        ColorBy::None => ColorValues::Fixed(FIXED_MARKER_COLOR),
    }
}

/// Transform a single frame for display.
///
/// Empty frames come back as an empty placeholder with no coloring.
pub fn transform_frame(frame: &Frame, radar: &RadarMountConfig, color_by: ColorBy) -> TransformedFrame {
    let points = &frame.points;

    if points.is_empty() {
        return TransformedFrame {
            index: frame.index,
            display_number: frame.display_number(),
            x: Vec::new(),
            z: Vec::new(),
            height: Vec::new(),
            velocity: Vec::new(),
            intensity: Vec::new(),
            color: None,
        };
    }

    let height = points
        .y
        .iter()
        .map(|&y| flip_height(radar.height_m, y))
        .collect();

    TransformedFrame {
        index: frame.index,
        display_number: frame.display_number(),
        x: points.x.clone(),
        z: points.z.clone(),
        height,
        velocity: points.velocity.clone(),
        intensity: points.intensity.clone(),
        color: Some(select_colors(color_by, &points.velocity, &points.intensity)),
    }
}

/// Transform every frame, preserving replay order.
pub fn transform_frames(
    frames: &[Frame],
    radar: &RadarMountConfig,
    color_by: ColorBy,
) -> Vec<TransformedFrame> {
    frames
        .iter()
        .map(|frame| transform_frame(frame, radar, color_by))
        .collect()
}
