//! Rendering configuration.
//!
//! A flat record of every knob the renderer understands. Owned by the
//! caller and passed by reference into the pipeline; no stage mutates it.
//! Serialized as camelCase JSON so configurations can cross the FFI
//! boundary as plain text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Song;

/// Options controlling the piano roll output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Bars laid out in each row
    pub bars_per_row: u32,
    /// Beats per bar, used for bar-length math and guide lines
    pub bar_subdivisions: u32,
    /// Row canvas width in px-equivalent units
    pub width: u32,
    /// Vertical unit per pitch step
    pub line_height: u32,
    /// Vertical gap between rows
    pub row_spacing: u32,
    /// Track selection for the merge stage, keyed by track index
    pub tracks_to_render: HashMap<usize, bool>,
    /// Per-track pitch shift in semitones, keyed by track index
    pub transpose_tracks: HashMap<usize, i32>,
    /// Staggered (piano-key) vs grid (uniform) vertical layout
    pub staggered: bool,
    /// Emit one self-contained SVG per row instead of a single document
    pub split_svgs: bool,
    /// First bar to render; `None` means the song start
    pub trim_start: Option<u32>,
    /// Bar to stop at; `None` means the song end
    pub trim_end: Option<u32>,
    /// Override of the song's native ticks-per-beat for bar-length math
    pub time_division: Option<u32>,
    /// Minimum kept fragment length in ticks after row splitting
    pub remove_shorter_than: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bars_per_row: 4,
            bar_subdivisions: 4,
            width: 960,
            line_height: 10,
            row_spacing: 48,
            tracks_to_render: HashMap::from([(0, true)]),
            transpose_tracks: HashMap::new(),
            staggered: true,
            split_svgs: false,
            trim_start: None,
            trim_end: None,
            time_division: None,
            remove_shorter_than: 4,
        }
    }
}

impl RenderConfig {
    /// Ticks per beat used for layout math — the override if set,
    /// otherwise the song's native resolution.
    pub fn time_division_used(&self, song: &Song) -> u32 {
        self.time_division.unwrap_or(song.time_division)
    }

    /// Length of one bar in ticks.
    pub fn bar_duration(&self, song: &Song) -> u32 {
        self.time_division_used(song) * self.bar_subdivisions
    }

    /// Length of one row in ticks.
    pub fn row_duration(&self, song: &Song) -> u32 {
        self.bar_duration(song) * self.bars_per_row
    }

    /// Whether the track at `index` is selected for rendering.
    pub fn is_track_rendered(&self, index: usize) -> bool {
        self.tracks_to_render.get(&index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RenderConfig::default();
        assert_eq!(config.bars_per_row, 4);
        assert_eq!(config.bar_subdivisions, 4);
        assert_eq!(config.width, 960);
        assert_eq!(config.line_height, 10);
        assert_eq!(config.row_spacing, 48);
        assert!(config.is_track_rendered(0));
        assert!(!config.is_track_rendered(1));
        assert!(config.staggered);
        assert!(!config.split_svgs);
        assert_eq!(config.trim_start, None);
        assert_eq!(config.trim_end, None);
        assert_eq!(config.time_division, None);
        assert_eq!(config.remove_shorter_than, 4);
    }

    #[test]
    fn bar_math_honors_time_division_override() {
        let song = Song {
            time_division: 96,
            duration: 96,
            tracks: Vec::new(),
        };
        let mut config = RenderConfig::default();
        assert_eq!(config.bar_duration(&song), 384);
        assert_eq!(config.row_duration(&song), 1536);

        config.time_division = Some(4);
        assert_eq!(config.bar_duration(&song), 16);
        assert_eq!(config.row_duration(&song), 64);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"barsPerRow": 2, "staggered": false}"#).unwrap();
        assert_eq!(config.bars_per_row, 2);
        assert!(!config.staggered);
        assert_eq!(config.width, 960);
        assert_eq!(config.remove_shorter_than, 4);
    }
}
