//! One 3D scatter trace per replay frame.

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::core::transforms::{ColorValues, TransformedFrame};

/// Hover template shared by every populated trace. `text` carries the
/// per-point attributes that are not on an axis.
pub const HOVER_TEMPLATE: &str =
    "X: %{x:.2f}m<br>Z: %{y:.2f}m<br>Height: %{z:.2f}m<br>%{text}<extra></extra>";

/// Plotly text object, used for axis, colorbar and figure titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLine {
    pub width: u32,
}

/// Marker styling of a populated trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: ColorValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<&'static str>,
    pub showscale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    pub line: MarkerLine,
}

/// A plotly `scatter3d` trace.
///
/// Axis mapping: plot `x` is sensor x, plot `y` is sensor z (range) and
/// plot `z` is height above the floor, so the vertical axis of the plot
/// matches the physical one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3dTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub name: String,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<&'static str>,
}

impl Scatter3dTrace {
    /// Returns the number of plotted points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Hover text for one point.
pub fn hover_text(point: usize, velocity: f64, intensity: f64) -> String {
    format!("Point {}<br>Vel: {:.2}<br>Int: {:.2}", point, velocity, intensity)
}

/// Build the trace for the frame at `index`.
///
/// Only the trace at index 0 starts visible and only it shows the
/// colorbar, so switching frames never stacks legends.
pub fn build_trace(frame: &TransformedFrame, index: usize, display: &DisplayConfig) -> Scatter3dTrace {
    let first = index == 0;

    let color = match &frame.color {
        Some(color) if !frame.is_empty() => color.clone(),
        _ => {
            return Scatter3dTrace {
                kind: "scatter3d",
                mode: "markers",
                x: Vec::new(),
                y: Vec::new(),
                z: Vec::new(),
                name: format!("Frame {} (no data)", frame.display_number),
                visible: first,
                marker: None,
                text: Vec::new(),
                hovertemplate: None,
            };
        }
    };

    let color_by = display.color_by;
    let marker = Marker {
        size: display.marker_size,
        color,
        colorscale: color_by.color_scale(),
        showscale: first,
        colorbar: color_by.colorbar_title().map(|title| ColorBar {
            title: Title::new(title),
        }),
        line: MarkerLine { width: 0 },
    };

    let text = frame
        .velocity
        .iter()
        .zip(&frame.intensity)
        .enumerate()
        .map(|(i, (&vel, &int))| hover_text(i, vel, int))
        .collect();

    Scatter3dTrace {
        kind: "scatter3d",
        mode: "markers",
        x: frame.x.clone(),
        y: frame.z.clone(),
        z: frame.height.clone(),
        name: format!("Frame {}", frame.display_number),
        visible: first,
        marker: Some(marker),
        text,
        hovertemplate: Some(HOVER_TEMPLATE),
    }
}

/// Build one trace per frame, in replay order.
pub fn build_traces(frames: &[TransformedFrame], display: &DisplayConfig) -> Vec<Scatter3dTrace> {
    frames
        .iter()
        .enumerate()
        .map(|(index, frame)| build_trace(frame, index, display))
        .collect()
}
