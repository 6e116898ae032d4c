//! Loader for recorded radar replay files.
//!
//! A replay is a JSON document whose top-level `data` list holds one entry
//! per radar frame:
//!
//! ```json
//! { "data": [ { "frameData": { "frameNum": 7,
//!                              "numDetectedPoints": 2,
//!                              "pointCloud": [[x, y, z, vel, int, ...], ...] } } ] }
//! ```
//!
//! Every field below `data` is optional. The document is validated once
//! here so later stages work on plain numeric tables.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Number, Value};
use thiserror::Error;

/// Number of leading columns of a point row that carry data.
pub const POINT_COLUMNS: usize = 5;

const COLUMN_NAMES: [&str; POINT_COLUMNS] = ["x", "y", "z", "velocity", "intensity"];

/// Errors that can occur while loading a replay.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame {frame}, point {row}: expected at least five columns, found {columns}")]
    ShortRow {
        frame: usize,
        row: usize,
        columns: usize,
    },

    #[error("frame {frame}, point {row}: column '{column}' is not a number")]
    NonNumeric {
        frame: usize,
        row: usize,
        column: &'static str,
    },

    #[error("frame {frame}: '{field}' must be a non-negative whole number, got {value}")]
    InvalidCount {
        frame: usize,
        field: &'static str,
        value: Number,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Debug, Deserialize)]
struct ReplayDocument {
    data: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    #[serde(rename = "frameData", default)]
    frame_data: Option<FrameData>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameData {
    #[serde(rename = "pointCloud", default)]
    point_cloud: Option<Vec<Vec<Value>>>,
    #[serde(rename = "frameNum", default)]
    frame_num: Option<Number>,
    #[serde(rename = "numDetectedPoints", default)]
    num_detected_points: Option<Number>,
}

/// Per-frame point attributes in columnar layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTable {
    /// Lateral offset in meters.
    pub x: Vec<f64>,
    /// Vertical offset from the sensor in meters (positive downwards).
    pub y: Vec<f64>,
    /// Range along boresight in meters.
    pub z: Vec<f64>,
    /// Radial velocity in m/s.
    pub velocity: Vec<f64>,
    /// Return intensity.
    pub intensity: Vec<f64>,
}

impl PointTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            intensity: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Appends one `(x, y, z, velocity, intensity)` row.
    pub fn push(&mut self, row: [f64; POINT_COLUMNS]) {
        let [x, y, z, velocity, intensity] = row;
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.velocity.push(velocity);
        self.intensity.push(intensity);
    }

    /// Returns row `i` as a tuple-like array.
    pub fn row(&self, i: usize) -> [f64; POINT_COLUMNS] {
        [
            self.x[i],
            self.y[i],
            self.z[i],
            self.velocity[i],
            self.intensity[i],
        ]
    }
}

/// One recorded radar scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in the replay, starting at 0.
    pub index: usize,
    /// Frame number stamped by the sensor, if recorded.
    pub frame_num: Option<u64>,
    /// Point count reported by the sensor, if recorded.
    pub num_detected_points: Option<u64>,
    /// Detected points.
    pub points: PointTable,
}

impl Frame {
    /// Frame number shown to the user; falls back to the 1-based position.
    pub fn display_number(&self) -> u64 {
        self.frame_num.unwrap_or(self.index as u64 + 1)
    }

    /// Point count shown to the user.
    pub fn reported_points(&self) -> u64 {
        self.num_detected_points.unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Aggregate counts over a whole replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: usize,
    pub total_points: usize,
    pub max_points: usize,
    pub empty_frames: usize,
    /// Populated frames whose row count differs from the reported count.
    pub count_mismatches: usize,
    /// First and last displayed frame numbers.
    pub frame_span: Option<(u64, u64)>,
}

impl ReplayStats {
    pub fn from_frames(frames: &[Frame]) -> Self {
        let mut stats = ReplayStats {
            frames: frames.len(),
            ..Default::default()
        };

        for frame in frames {
            let n = frame.points.len();
            stats.total_points += n;
            stats.max_points = stats.max_points.max(n);
            if n == 0 {
                stats.empty_frames += 1;
            } else if frame.num_detected_points.is_some_and(|reported| reported != n as u64) {
                stats.count_mismatches += 1;
            }
        }

        if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
            stats.frame_span = Some((first.display_number(), last.display_number()));
        }

        stats
    }
}

/// Load and validate a replay file.
///
/// # Errors
///
/// Fails if the file cannot be read, is not a replay document, contains a
/// point row that is shorter than five columns or not numeric, or carries a
/// negative or fractional `frameNum` / `numDetectedPoints`.
pub fn load_replay<P: AsRef<Path>>(path: P) -> Result<Vec<Frame>> {
    let path = path.as_ref();
    debug!("Reading replay from {}", path.display());
    let file = File::open(path)?;
    let frames = parse_replay_reader(BufReader::new(file))?;
    info!("Loaded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

/// Parse and validate a replay from any reader.
pub fn parse_replay_reader<R: Read>(reader: R) -> Result<Vec<Frame>> {
    let document: ReplayDocument = serde_json::from_reader(reader)?;
    validate_document(document)
}

/// Parse and validate a replay held in memory.
pub fn parse_replay(json: &str) -> Result<Vec<Frame>> {
    let document: ReplayDocument = serde_json::from_str(json)?;
    validate_document(document)
}

fn validate_document(document: ReplayDocument) -> Result<Vec<Frame>> {
    document
        .data
        .into_iter()
        .enumerate()
        .map(|(index, entry)| validate_frame(index, entry.frame_data.unwrap_or_default()))
        .collect()
}

/// Accept counters written as integers or as integral floats (`3.0`).
fn whole_number(frame: usize, field: &'static str, value: Option<Number>) -> Result<Option<u64>> {
    let Some(value) = value else {
        return Ok(None);
    };

    if let Some(n) = value.as_u64() {
        return Ok(Some(n));
    }

    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(LoaderError::InvalidCount {
            frame,
            field,
            value,
        }),
    }
}

fn validate_frame(index: usize, data: FrameData) -> Result<Frame> {
    let frame_num = whole_number(index, "frameNum", data.frame_num)?;
    let num_detected_points = whole_number(index, "numDetectedPoints", data.num_detected_points)?;

    let rows = data.point_cloud.unwrap_or_default();
    let mut points = PointTable::with_capacity(rows.len());

    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() < POINT_COLUMNS {
            return Err(LoaderError::ShortRow {
                frame: index,
                row: row_idx,
                columns: row.len(),
            });
        }

        let mut values = [0.0; POINT_COLUMNS];
        for (col, value) in row.iter().take(POINT_COLUMNS).enumerate() {
            values[col] = value.as_f64().ok_or(LoaderError::NonNumeric {
                frame: index,
                row: row_idx,
                column: COLUMN_NAMES[col],
            })?;
        }
        points.push(values);
    }

    if let Some(reported) = num_detected_points {
        if !points.is_empty() && reported != points.len() as u64 {
            warn!(
                "Frame {} reports {} points but carries {}",
                frame_num.unwrap_or(index as u64 + 1),
                reported,
                points.len()
            );
        }
    }

    Ok(Frame {
        index,
        frame_num,
        num_detected_points,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "data": [
            { "frameData": { "frameNum": 41, "numDetectedPoints": 2,
                             "pointCloud": [[1.0, 1.2, 0.5, -2.0, 10.0, 99],
                                            [0, 0, 1, 0.5, 3]] } },
            { "frameData": { "frameNum": 42, "numDetectedPoints": 0, "pointCloud": [] } },
            { }
        ]
    }"#;

    #[test]
    fn test_parse_replay_frames_in_order() -> Result<()> {
        let frames = parse_replay(SAMPLE)?;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[0].frame_num, Some(41));
        assert_eq!(frames[1].frame_num, Some(42));
        assert_eq!(frames[2].frame_num, None);
        Ok(())
    }

    #[test]
    fn test_row_count_matches_reported_points() -> Result<()> {
        let frames = parse_replay(SAMPLE)?;
        assert_eq!(frames[0].points.len() as u64, frames[0].reported_points());
        Ok(())
    }

    #[test]
    fn test_extra_columns_are_dropped() -> Result<()> {
        let frames = parse_replay(SAMPLE)?;
        assert_eq!(frames[0].points.row(0), [1.0, 1.2, 0.5, -2.0, 10.0]);
        // integers are coerced to floating point
        assert_eq!(frames[0].points.row(1), [0.0, 0.0, 1.0, 0.5, 3.0]);
        Ok(())
    }

    #[test]
    fn test_missing_frame_data_yields_empty_frame() -> Result<()> {
        let frames = parse_replay(SAMPLE)?;
        assert!(frames[1].is_empty());
        assert!(frames[2].is_empty());
        assert_eq!(frames[2].reported_points(), 0);
        Ok(())
    }

    #[test]
    fn test_display_number_falls_back_to_position() -> Result<()> {
        let frames = parse_replay(SAMPLE)?;
        assert_eq!(frames[0].display_number(), 41);
        assert_eq!(frames[2].display_number(), 3);
        Ok(())
    }

    #[test]
    fn test_short_row_is_rejected() {
        let json = r#"{ "data": [ { "frameData": { "pointCloud": [[1, 2, 3, 4, 5], [1, 2, 3]] } } ] }"#;
        match parse_replay(json) {
            Err(LoaderError::ShortRow { frame, row, columns }) => {
                assert_eq!(frame, 0);
                assert_eq!(row, 1);
                assert_eq!(columns, 3);
            }
            other => panic!("Expected ShortRow, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let json = r#"{ "data": [ {}, { "frameData": { "pointCloud": [[1, 2, 3, "fast", 5]] } } ] }"#;
        match parse_replay(json) {
            Err(LoaderError::NonNumeric { frame, row, column }) => {
                assert_eq!(frame, 1);
                assert_eq!(row, 0);
                assert_eq!(column, "velocity");
            }
            other => panic!("Expected NonNumeric, got {:?}", other),
        }
    }

    #[test]
    fn test_integral_float_counters_are_accepted() -> Result<()> {
        let json = r#"{ "data": [ { "frameData": { "frameNum": 3.0, "numDetectedPoints": 1.0,
                                                   "pointCloud": [[1, 2, 3, 4, 5]] } } ] }"#;
        let frames = parse_replay(json)?;
        assert_eq!(frames[0].frame_num, Some(3));
        assert_eq!(frames[0].num_detected_points, Some(1));
        assert_eq!(frames[0].display_number(), 3);
        Ok(())
    }

    #[test]
    fn test_negative_point_count_is_rejected() {
        let json = r#"{ "data": [ {}, { "frameData": { "numDetectedPoints": -1 } } ] }"#;
        match parse_replay(json) {
            Err(LoaderError::InvalidCount { frame, field, .. }) => {
                assert_eq!(frame, 1);
                assert_eq!(field, "numDetectedPoints");
            }
            other => panic!("Expected InvalidCount, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_frame_number_is_rejected() {
        let json = r#"{ "data": [ { "frameData": { "frameNum": 2.5 } } ] }"#;
        assert!(matches!(
            parse_replay(json),
            Err(LoaderError::InvalidCount { field: "frameNum", .. })
        ));
    }

    #[test]
    fn test_missing_data_field_is_a_parse_error() {
        let result = parse_replay(r#"{ "frames": [] }"#);
        assert!(matches!(result, Err(LoaderError::Json(_))));
    }

    #[test]
    fn test_null_point_cloud_is_empty() -> Result<()> {
        let frames = parse_replay(r#"{ "data": [ { "frameData": { "pointCloud": null } } ] }"#)?;
        assert!(frames[0].is_empty());
        Ok(())
    }

    #[test]
    fn test_load_replay_from_file() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        file.flush().unwrap();

        let frames = load_replay(file.path())?;
        assert_eq!(frames.len(), 3);
        Ok(())
    }

    #[test]
    fn test_load_replay_missing_file() {
        let result = load_replay("/nonexistent/replay_1.json");
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }

    #[test]
    fn test_point_table_operations() {
        let mut table = PointTable::new();
        assert!(table.is_empty());

        table.push([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.velocity[0], 4.0);
        assert_eq!(table.row(0), [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_replay_stats() -> Result<()> {
        let json = r#"{ "data": [
            { "frameData": { "frameNum": 8, "numDetectedPoints": 2, "pointCloud": [[0,0,0,0,0],[1,1,1,1,1]] } },
            { "frameData": { "frameNum": 9, "numDetectedPoints": 5, "pointCloud": [[0,0,0,0,0]] } },
            { "frameData": { "frameNum": 10 } }
        ] }"#;
        let stats = ReplayStats::from_frames(&parse_replay(json)?);

        assert_eq!(stats.frames, 3);
        assert_eq!(stats.total_points, 3);
        assert_eq!(stats.max_points, 2);
        assert_eq!(stats.empty_frames, 1);
        assert_eq!(stats.count_mismatches, 1);
        assert_eq!(stats.frame_span, Some((8, 10)));
        Ok(())
    }

    #[test]
    fn test_replay_stats_empty() {
        let stats = ReplayStats::from_frames(&[]);
        assert_eq!(stats, ReplayStats::default());
    }
}
