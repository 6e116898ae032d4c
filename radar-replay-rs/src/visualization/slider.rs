//! Frame slider: one step per frame, each showing exactly one trace.

use serde::Serialize;

use crate::core::loaders::Frame;

use super::trace::Title;

/// Trace-level half of a step's `update` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityUpdate {
    pub visible: Vec<bool>,
}

/// Layout-level half of a step's `update` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleUpdate {
    pub title: Title,
}

/// A slider step. Serializes to
/// `{"method": "update", "args": [{"visible": [...]}, {"title": {...}}], "label": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderStep {
    pub method: &'static str,
    pub args: (VisibilityUpdate, TitleUpdate),
    pub label: String,
}

impl SliderStep {
    /// Index of the trace this step reveals.
    pub fn visible_trace(&self) -> Option<usize> {
        self.args.0.visible.iter().position(|&v| v)
    }

    pub fn title(&self) -> &str {
        &self.args.1.title.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentValue {
    pub prefix: &'static str,
    pub visible: bool,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pad {
    pub b: u32,
    pub t: u32,
}

/// Slider placed under the plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slider {
    pub active: usize,
    pub yanchor: &'static str,
    pub y: f64,
    pub xanchor: &'static str,
    pub currentvalue: CurrentValue,
    pub pad: Pad,
    pub len: f64,
    pub x: f64,
    pub steps: Vec<SliderStep>,
}

/// Figure title shown while `frame` is selected.
pub fn frame_title(frame: &Frame) -> String {
    format!(
        "3D Point Cloud - Frame {} ({} points)",
        frame.display_number(),
        frame.reported_points()
    )
}

/// Build the step for position `index` out of `total` frames.
pub fn build_step(frame: &Frame, index: usize, total: usize) -> SliderStep {
    let mut visible = vec![false; total];
    if let Some(slot) = visible.get_mut(index) {
        *slot = true;
    }

    SliderStep {
        method: "update",
        args: (
            VisibilityUpdate { visible },
            TitleUpdate {
                title: Title::new(frame_title(frame)),
            },
        ),
        label: frame.display_number().to_string(),
    }
}

/// Build one step per frame, in replay order.
pub fn build_steps(frames: &[Frame]) -> Vec<SliderStep> {
    let total = frames.len();
    frames
        .iter()
        .enumerate()
        .map(|(index, frame)| build_step(frame, index, total))
        .collect()
}

/// Wrap steps into the slider widget, starting at the first frame.
pub fn build_slider(steps: Vec<SliderStep>) -> Slider {
    Slider {
        active: 0,
        yanchor: "top",
        y: 0.0,
        xanchor: "left",
        currentvalue: CurrentValue {
            prefix: "Frame: ",
            visible: true,
            xanchor: "right",
        },
        pad: Pad { b: 10, t: 50 },
        len: 0.9,
        x: 0.1,
        steps,
    }
}
