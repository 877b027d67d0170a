//! Row layout — maps pitches to vertical and times to horizontal
//! coordinates within one row.
//!
//! Vertical spacing follows one of two modes. Grid mode gives every
//! semitone one uniform line height, like a DAW piano roll. Staggered
//! mode mimics the physical keyboard: descending past C or F — the two
//! white keys with no black key below them — costs a full line height,
//! every other semitone costs half.

use crate::config::RenderConfig;
use crate::model::Row;

/// Pitch classes with a raised (black) key: C#, D#, F#, G#, A#.
const BLACK_KEYS: [bool; 12] = [
    false, true, false, true, false, false, true, false, true, false, true, false,
];

/// Pitch classes taking a full vertical step in staggered mode: C and F.
const FULL_STEPS: [bool; 12] = [
    true, false, false, false, false, true, false, false, false, false, false, false,
];

/// Whether a pitch falls on a black key. Any integer pitch classifies,
/// including values transposed outside 0..=127.
pub(super) fn is_black_key(pitch: i32) -> bool {
    BLACK_KEYS[pitch.rem_euclid(12) as usize]
}

pub(super) fn is_full_step(pitch: i32) -> bool {
    FULL_STEPS[pitch.rem_euclid(12) as usize]
}

/// Coordinate mapping for one row.
pub(super) struct RowLayout {
    /// Row minimum snapped down to the nearest C or F
    pub(super) min_pitch: i32,
    /// Row maximum, extended so the row covers at least a full octave
    pub(super) max_pitch: i32,
    staggered: bool,
    line_height: f64,
    width: f64,
    row_duration: f64,
}

impl RowLayout {
    pub(super) fn new(row: &Row, config: &RenderConfig, row_duration: u32) -> Self {
        // Snap to the C of the row minimum's octave, or to F when the
        // minimum sits within the 5 semitones above it
        let min_pitch = (row.min_pitch.div_euclid(12) * 12)
            .max((row.min_pitch - 5).div_euclid(12) * 12 + 5);
        let max_pitch = if row.max_pitch - min_pitch < 11 {
            min_pitch + 11
        } else {
            row.max_pitch
        };

        Self {
            min_pitch,
            max_pitch,
            staggered: config.staggered,
            line_height: f64::from(config.line_height),
            width: f64::from(config.width),
            row_duration: f64::from(row_duration),
        }
    }

    /// Top edge of the line occupied by `pitch`, measured down from the
    /// row top. Pitches above the row maximum have no coordinate;
    /// asking for one is a bug in the caller.
    pub(super) fn y_top(&self, pitch: i32) -> f64 {
        if pitch > self.max_pitch {
            panic!(
                "pitch {pitch} is above the row maximum {}",
                self.max_pitch
            );
        }

        if self.staggered {
            let mut y = 0.0;
            for step in (pitch + 1)..=self.max_pitch {
                y += if is_full_step(step) { 1.0 } else { 0.5 };
            }
            y * self.line_height
        } else {
            f64::from(self.max_pitch - pitch) * self.line_height
        }
    }

    pub(super) fn y_bottom(&self, pitch: i32) -> f64 {
        self.y_top(pitch) + self.line_height
    }

    /// Total row height: the bottom edge of the snapped minimum.
    pub(super) fn height(&self) -> f64 {
        self.y_bottom(self.min_pitch)
    }

    /// Horizontal position of a time value. Linear and unclamped.
    pub(super) fn x(&self, time: f64) -> f64 {
        time / self.row_duration * self.width
    }

    pub(super) fn line_height(&self) -> f64 {
        self.line_height
    }

    pub(super) fn width(&self) -> f64 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn layout(min_pitch: i32, max_pitch: i32, staggered: bool) -> RowLayout {
        let row = Row {
            min_pitch,
            max_pitch,
            notes: Vec::new(),
        };
        let config = RenderConfig {
            staggered,
            ..RenderConfig::default()
        };
        RowLayout::new(&row, &config, 64)
    }

    #[test]
    fn snaps_row_minimum_to_c_or_f() {
        assert_eq!(layout(50, 70, true).min_pitch, 48); // below F → C
        assert_eq!(layout(53, 70, true).min_pitch, 53); // F exactly
        assert_eq!(layout(57, 70, true).min_pitch, 53); // within 5 above F
        assert_eq!(layout(48, 70, true).min_pitch, 48); // C exactly
        assert_eq!(layout(-3, 20, true).min_pitch, -7); // negative pitches snap too
    }

    #[test]
    fn extends_narrow_rows_to_a_full_octave() {
        let narrow = layout(60, 63, true);
        assert_eq!(narrow.min_pitch, 60);
        assert_eq!(narrow.max_pitch, 71);

        let wide = layout(60, 80, true);
        assert_eq!(wide.max_pitch, 80);
    }

    #[test]
    fn grid_mode_steps_uniformly() {
        let layout = layout(48, 72, false);
        assert_eq!(layout.y_top(72), 0.0);
        assert_eq!(layout.y_top(71), 10.0);
        assert_eq!(layout.y_top(48), 240.0);
        assert_eq!(layout.y_bottom(48), 250.0);
        assert_eq!(layout.height(), 250.0);
    }

    #[test]
    fn staggered_mode_steps_by_key_class() {
        let layout = layout(48, 72, true);
        // Descending a semitone costs a full unit when the pitch left
        // behind is C or F, half a unit otherwise
        for pitch in 48..72 {
            let step = layout.y_top(pitch) - layout.y_top(pitch + 1);
            let expected = if is_full_step(pitch + 1) { 10.0 } else { 5.0 };
            assert_eq!(step, expected, "step below pitch {}", pitch + 1);
        }
        // One octave = 2 full + 10 half steps = 7 line heights
        assert_eq!(layout.y_top(60), 70.0);
    }

    #[test]
    fn vertical_coordinate_is_monotonic_in_pitch() {
        for staggered in [false, true] {
            let layout = layout(36, 84, staggered);
            let mut previous = f64::MAX;
            for pitch in 36..=84 {
                let y = layout.y_top(pitch);
                assert!(y < previous, "y must decrease as pitch increases");
                previous = y;
            }
        }
    }

    #[test]
    #[should_panic(expected = "above the row maximum")]
    fn pitch_above_row_maximum_is_a_contract_violation() {
        let layout = layout(48, 72, true);
        let _ = layout.y_top(73);
    }

    #[test]
    fn horizontal_coordinate_is_linear_and_unclamped() {
        let layout = layout(48, 72, true);
        assert_eq!(layout.x(0.0), 0.0);
        assert_eq!(layout.x(32.0), 480.0);
        assert_eq!(layout.x(64.0), 960.0);
        assert_eq!(layout.x(80.0), 1200.0);
    }

    #[test]
    fn key_class_tables_match_the_keyboard() {
        let black: Vec<i32> = (0..12).filter(|&pc| is_black_key(pc)).collect();
        assert_eq!(black, vec![1, 3, 6, 8, 10]);
        let full: Vec<i32> = (0..12).filter(|&pc| is_full_step(pc)).collect();
        assert_eq!(full, vec![0, 5]);
        // Negative pitches classify by true pitch class
        assert!(is_black_key(-2)); // -2 ≡ 10 (A#)
        assert!(is_full_step(-12)); // -12 ≡ 0 (C)
    }
}
