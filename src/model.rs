//! Data model for a decoded MIDI song.
//!
//! These structures capture the note intervals needed for piano roll
//! rendering. Everything else in the source file (controllers, pitch
//! bends, channel data) is discarded during decoding.

use serde::{Deserialize, Serialize};

/// Pitch assigned to the min/max range of a row with no notes, so that
/// downstream range math never sees an inverted empty range.
pub const EMPTY_RANGE_PITCH: i32 = 48;

/// A complete song decoded from a Standard MIDI File.
///
/// Immutable after construction: every render call derives its own
/// working data from the song and leaves it untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Ticks per beat, from the SMF header
    pub time_division: u32,
    /// Total length in ticks — max over all notes of (time + duration),
    /// floored at one `time_division` unit
    pub duration: u32,
    /// Tracks that contained at least one complete note
    pub tracks: Vec<Track>,
}

/// One named track of a song.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track-name meta event text, or a positional fallback
    pub title: String,
    /// Lowest pitch seen on the track; `min_pitch > max_pitch` means
    /// "no pitch range" and callers must treat the track as empty
    pub min_pitch: i32,
    /// Highest pitch seen on the track
    pub max_pitch: i32,
    /// Completed notes, in note-off order (not necessarily time-ascending)
    pub notes: Vec<Note>,
}

/// A single note interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Start time in ticks (absolute, or row-relative inside a `Row`)
    pub time: u32,
    /// MIDI pitch. Decoded values are 0..=127; transposition may push
    /// a pitch outside that range and no stage clamps it back
    pub pitch: i32,
    /// Length in ticks; zero-length notes are valid markers
    pub duration: u32,
    /// Note-on velocity
    pub velocity_on: u8,
    /// Note-off velocity (0 when the off event was a zero-velocity note-on)
    pub velocity_off: u8,
}

/// One horizontal strip of the rendered output.
///
/// Produced by the row slicer; note times are relative to the row start
/// and note fragments are copies, never shared with other rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub min_pitch: i32,
    pub max_pitch: i32,
    pub notes: Vec<Note>,
}

impl Song {
    /// Number of bars the song spans for a given bar length in ticks,
    /// rounded up. This is the natural upper bound for a trim window.
    pub fn bar_count(&self, bar_duration: u32) -> u32 {
        if bar_duration == 0 {
            return 0;
        }
        self.duration.div_ceil(bar_duration)
    }
}

impl Note {
    /// End time in ticks (start + duration).
    pub fn end(&self) -> u32 {
        self.time + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_count_rounds_up() {
        let song = Song {
            time_division: 4,
            duration: 33,
            tracks: Vec::new(),
        };
        assert_eq!(song.bar_count(16), 3);
        assert_eq!(song.bar_count(33), 1);
        assert_eq!(song.bar_count(0), 0);
    }
}
