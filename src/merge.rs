//! Track merging and trimming — the transform stages between the decoded
//! song and row slicing.
//!
//! Merging combines the selected tracks into one synthetic working track,
//! applying per-track transposition. Trimming clips that track to a
//! bar-aligned window and renormalizes note times to start at zero.

use crate::config::RenderConfig;
use crate::model::{Note, Song, Track};

/// Combine the selected song tracks into a single track, transposing
/// their notes where a transpose amount is configured.
///
/// The merged pitch range covers included notes only: transposed tracks
/// contribute their post-transpose per-note range, untransposed tracks
/// contribute their recorded track range. Selection order (ascending
/// track index) determines note concatenation order; notes are not
/// re-sorted by time.
pub fn merge_tracks(song: &Song, config: &RenderConfig) -> Track {
    let mut notes: Vec<Note> = Vec::new();
    let mut min_pitch = 127i32;
    let mut max_pitch = 0i32;

    for (i, track) in song.tracks.iter().enumerate() {
        if !config.is_track_rendered(i) {
            continue;
        }

        match config.transpose_tracks.get(&i) {
            Some(&amount) => {
                for note in &track.notes {
                    // Transposed pitches are not clamped to 0..=127
                    let pitch = note.pitch + amount;
                    min_pitch = min_pitch.min(pitch);
                    max_pitch = max_pitch.max(pitch);
                    notes.push(Note { pitch, ..*note });
                }
            }
            None => {
                min_pitch = min_pitch.min(track.min_pitch);
                max_pitch = max_pitch.max(track.max_pitch);
                notes.extend(track.notes.iter().copied());
            }
        }
    }

    Track {
        title: "Merged".to_string(),
        min_pitch,
        max_pitch,
        notes,
    }
}

/// Clip a track to the configured trim window and renormalize note times
/// to the window start.
///
/// No-op when both trim bounds are absent. A note fully outside the
/// window, or reduced to nothing by clipping, is dropped; a straddling
/// note is shortened to fit.
pub fn trim_track(track: Track, song: &Song, config: &RenderConfig) -> Track {
    if config.trim_start.is_none() && config.trim_end.is_none() {
        return track;
    }

    let bar_duration = i64::from(config.bar_duration(song));
    let start = i64::from(config.trim_start.unwrap_or(0)) * bar_duration;
    let end = config
        .trim_end
        .map_or(i64::from(song.duration), |e| {
            i64::from(song.duration).min(i64::from(e) * bar_duration)
        })
        - start;

    let mut notes = Vec::new();
    for note in &track.notes {
        let note_start = (i64::from(note.time) - start).max(0);
        let note_end = (end - 1).min(i64::from(note.time) + i64::from(note.duration) - start);
        if note_end - note_start <= 0 {
            continue;
        }

        notes.push(Note {
            time: note_start as u32,
            duration: (note_end - note_start) as u32,
            ..*note
        });
    }

    Track { notes, ..track }
}

/// Length in ticks of the portion of the song the renderer covers —
/// the trim window when one is configured, the full song otherwise.
/// Row slicing runs until this offset is reached.
pub fn trimmed_duration(song: &Song, config: &RenderConfig) -> u32 {
    let bar_duration = i64::from(config.bar_duration(song));
    let start = i64::from(config.trim_start.unwrap_or(0)) * bar_duration;
    let end = config.trim_end.map_or(i64::from(song.duration), |e| {
        i64::from(song.duration).min(i64::from(e) * bar_duration)
    });
    (end - start).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(time: u32, pitch: i32, duration: u32) -> Note {
        Note {
            time,
            pitch,
            duration,
            velocity_on: 100,
            velocity_off: 64,
        }
    }

    fn song_with_tracks(tracks: Vec<Track>) -> Song {
        Song {
            time_division: 4,
            duration: 32,
            tracks,
        }
    }

    fn track(title: &str, min_pitch: i32, max_pitch: i32, notes: Vec<Note>) -> Track {
        Track {
            title: title.to_string(),
            min_pitch,
            max_pitch,
            notes,
        }
    }

    #[test]
    fn merge_selects_and_transposes() {
        let song = song_with_tracks(vec![
            track("a", 50, 55, vec![note(0, 50, 8), note(8, 55, 8)]),
            track("b", 30, 40, vec![note(0, 30, 8)]),
            track("c", 60, 60, vec![note(4, 60, 4)]),
        ]);
        let mut config = RenderConfig::default();
        config.tracks_to_render = [(0, true), (1, false), (2, true)].into();
        config.transpose_tracks = [(2, 12)].into();

        let merged = merge_tracks(&song, &config);

        // Track 0 unchanged, track 1 skipped, track 2 up an octave
        assert_eq!(merged.notes.len(), 3);
        assert_eq!(merged.notes[0].pitch, 50);
        assert_eq!(merged.notes[1].pitch, 55);
        assert_eq!(merged.notes[2].pitch, 72);
        assert_eq!(merged.min_pitch, 50);
        assert_eq!(merged.max_pitch, 72);
    }

    #[test]
    fn merge_transpose_is_unclamped() {
        let song = song_with_tracks(vec![track("a", 120, 125, vec![note(0, 125, 8)])]);
        let mut config = RenderConfig::default();
        config.transpose_tracks = [(0, 24)].into();

        let merged = merge_tracks(&song, &config);
        assert_eq!(merged.notes[0].pitch, 149);
        assert_eq!(merged.max_pitch, 149);
    }

    #[test]
    fn merge_with_nothing_selected_yields_inverted_range() {
        let song = song_with_tracks(vec![track("a", 50, 55, vec![note(0, 50, 8)])]);
        let mut config = RenderConfig::default();
        config.tracks_to_render.clear();

        let merged = merge_tracks(&song, &config);
        assert!(merged.notes.is_empty());
        assert!(merged.min_pitch > merged.max_pitch);
    }

    #[test]
    fn trim_is_noop_without_bounds() {
        let song = song_with_tracks(Vec::new());
        let config = RenderConfig {
            time_division: Some(4),
            ..RenderConfig::default()
        };
        let original = track("m", 60, 62, vec![note(0, 60, 4), note(28, 62, 4)]);

        let trimmed = trim_track(original.clone(), &song, &config);
        assert_eq!(trimmed.notes.len(), original.notes.len());
        assert_eq!(trimmed.notes[1].time, 28);
        assert_eq!(trimmed.notes[1].duration, 4);
    }

    #[test]
    fn trim_clips_and_renormalizes_straddling_note() {
        // barDuration = 4 * 4 = 16; window = bars [1, 3) over a
        // 32-tick song: start = 16, end = 16
        let song = song_with_tracks(Vec::new());
        let config = RenderConfig {
            time_division: Some(4),
            trim_start: Some(1),
            trim_end: Some(3),
            ..RenderConfig::default()
        };
        let original = track("m", 60, 60, vec![note(10, 60, 20)]);

        let trimmed = trim_track(original, &song, &config);
        assert_eq!(trimmed.notes.len(), 1);
        assert_eq!(trimmed.notes[0].time, 0);
        assert_eq!(trimmed.notes[0].duration, 14);
    }

    #[test]
    fn trim_drops_notes_outside_window() {
        let song = song_with_tracks(Vec::new());
        let config = RenderConfig {
            time_division: Some(4),
            trim_start: Some(1),
            trim_end: Some(2),
            ..RenderConfig::default()
        };
        // One note before the window, one after its end
        let original = track("m", 60, 62, vec![note(0, 60, 16), note(32, 62, 4)]);

        let trimmed = trim_track(original, &song, &config);
        assert!(trimmed.notes.is_empty());
    }

    #[test]
    fn trimmed_duration_follows_window() {
        let song = song_with_tracks(Vec::new());
        let mut config = RenderConfig {
            time_division: Some(4),
            ..RenderConfig::default()
        };
        assert_eq!(trimmed_duration(&song, &config), 32);

        config.trim_start = Some(1);
        config.trim_end = Some(3);
        assert_eq!(trimmed_duration(&song, &config), 16);

        // A window past the song end clamps to the song duration
        config.trim_start = None;
        config.trim_end = Some(10);
        assert_eq!(trimmed_duration(&song, &config), 32);
    }
}
