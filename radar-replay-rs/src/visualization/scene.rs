//! Scene assembly: traces, slider and a fixed 3D layout sized from the
//! radar mount.

use log::debug;
use serde::Serialize;

use crate::config::ViewerConfig;
use crate::core::loaders::Frame;
use crate::core::transforms::transform_frames;

use super::slider::{build_slider, build_steps, frame_title, Slider};
use super::trace::{build_traces, Scatter3dTrace, Title};

/// Title used when the replay holds no frames.
pub const EMPTY_REPLAY_TITLE: &str = "3D Point Cloud - no frames";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectRatio {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The 3D scene block of the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneAxes {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
    pub aspectmode: &'static str,
    pub aspectratio: AspectRatio,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub sliders: Vec<Slider>,
    pub scene: SceneAxes,
    pub title: Title,
    pub showlegend: bool,
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
}

/// A complete plotly figure: `{"data": [...], "layout": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub data: Vec<Scatter3dTrace>,
    pub layout: Layout,
}

impl Scene {
    /// Indices of the traces visible when the figure first opens.
    pub fn visible_traces(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, trace)| trace.visible)
            .map(|(i, _)| i)
            .collect()
    }

    /// Trace visibility after the user moves the slider to `step`.
    pub fn visibility_at(&self, step: usize) -> Option<&[bool]> {
        self.layout
            .sliders
            .first()
            .and_then(|slider| slider.steps.get(step))
            .map(|step| step.args.0.visible.as_slice())
    }

    pub fn frame_count(&self) -> usize {
        self.data.len()
    }

    /// Serialize as a plotly figure.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn scene_axes(config: &ViewerConfig) -> SceneAxes {
    let horizontal = config.radar.horizontal_limit();
    let vertical = config.radar.vertical_limit();

    SceneAxes {
        xaxis: Axis {
            title: Title::new("X (m)"),
            range: [-horizontal, horizontal],
        },
        yaxis: Axis {
            title: Title::new("Z (m)"),
            range: [-horizontal, horizontal],
        },
        zaxis: Axis {
            title: Title::new("Height (m)"),
            range: [0.0, vertical],
        },
        aspectmode: "manual",
        aspectratio: AspectRatio {
            x: 1.0,
            y: 1.0,
            z: 0.5,
        },
    }
}

/// Assemble the full scene for a replay.
///
/// Deterministic in `frames` and `config`. An empty replay yields a scene
/// with no traces and no slider.
pub fn assemble_scene(frames: &[Frame], config: &ViewerConfig) -> Scene {
    let color_by = config.display.color_by;
    let transformed = transform_frames(frames, &config.radar, color_by);
    let data = build_traces(&transformed, &config.display);

    let steps = build_steps(frames);
    let sliders = if steps.is_empty() {
        Vec::new()
    } else {
        vec![build_slider(steps)]
    };

    let title = frames
        .first()
        .map(frame_title)
        .unwrap_or_else(|| EMPTY_REPLAY_TITLE.to_string());

    debug!(
        "Assembled scene: {} traces, horizontal limit {} m, vertical limit {} m",
        data.len(),
        config.radar.horizontal_limit(),
        config.radar.vertical_limit()
    );

    Scene {
        data,
        layout: Layout {
            sliders,
            scene: scene_axes(config),
            title: Title::new(title),
            showlegend: false,
            width: config.display.width,
            height: config.display.height,
            margin: Margin {
                l: 0,
                r: 0,
                b: 100,
                t: 40,
            },
        },
    }
}
