//! Core data types and I/O operations.

pub mod loaders;
pub mod transforms;
pub mod writers;

pub use loaders::{load_replay, Frame, LoaderError, PointTable, ReplayStats};
pub use transforms::{transform_frame, transform_frames, ColorValues, TransformedFrame};
pub use writers::{write_text, WriteError};
