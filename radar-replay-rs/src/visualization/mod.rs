//! Interactive 3D visualization of replay frames.
//!
//! The figure follows plotly's JSON schema: one `scatter3d` trace per
//! frame, a slider whose steps toggle trace visibility, and a fixed scene
//! layout. Building the figure is pure; only the presenter touches the
//! filesystem and the browser.

pub mod presenter;
pub mod scene;
pub mod slider;
pub mod trace;

pub use presenter::{present, render_html, write_html, PresentError, PresentOptions};
pub use scene::{assemble_scene, Scene};
pub use slider::{build_slider, build_steps, Slider, SliderStep};
pub use trace::{build_trace, build_traces, Scatter3dTrace};
