//! Row slicing — partitions the trimmed track into fixed-duration rows,
//! splitting notes that straddle a row boundary.
//!
//! The track's notes form a pool consumed row by row, left to right.
//! Each pass moves the pool into the row being built: contained notes are
//! placed, straddling notes are split with their right fragment carried
//! forward, and everything else is carried unchanged. The carry list
//! becomes the pool for the next row, so the single-pass chronological
//! order is structural.

use crate::model::{Note, Row, Track, EMPTY_RANGE_PITCH};

/// A pool entry. `fragment` marks notes produced by a boundary split;
/// only those are subject to the minimum-length policy.
struct PooledNote {
    note: Note,
    fragment: bool,
}

/// Slice a trimmed track into rows of `row_duration` ticks, covering
/// `track_duration` ticks of content.
///
/// Fragments with length of at most `min_fragment_len` are dropped from
/// whichever row they would land in; the notes they were split from are
/// otherwise preserved exactly, so the kept fragments of a split note
/// always sum to its original duration minus the dropped remainder.
pub fn slice_into_rows(
    track: Track,
    row_duration: u32,
    track_duration: u32,
    min_fragment_len: u32,
) -> Vec<Row> {
    let mut rows = Vec::new();
    if row_duration == 0 {
        return rows;
    }

    let mut pool: Vec<PooledNote> = track
        .notes
        .into_iter()
        .map(|note| PooledNote {
            note,
            fragment: false,
        })
        .collect();

    let mut start = 0u32;
    while start < track_duration {
        let end = start + row_duration;
        let mut notes: Vec<Note> = Vec::new();
        let mut carry: Vec<PooledNote> = Vec::new();
        let mut min_pitch = 127i32;
        let mut max_pitch = 0i32;

        for pooled in pool {
            let note = pooled.note;
            let note_end = note.end();

            if note.time >= start && note_end <= end {
                // Contained within the row; short split fragments are
                // dropped here rather than carried any further
                if pooled.fragment && note.duration <= min_fragment_len {
                    continue;
                }
                min_pitch = min_pitch.min(note.pitch);
                max_pitch = max_pitch.max(note.pitch);
                notes.push(Note {
                    time: note.time - start,
                    ..note
                });
            } else if note.time >= start && note.time < end && note_end > end {
                // Sticks out of the row; split at the boundary
                let left = Note {
                    time: note.time - start,
                    duration: end - note.time,
                    ..note
                };
                let right = Note {
                    time: end,
                    duration: note.duration - left.duration,
                    ..note
                };

                if left.duration > min_fragment_len {
                    min_pitch = min_pitch.min(left.pitch);
                    max_pitch = max_pitch.max(left.pitch);
                    notes.push(left);
                }

                carry.push(PooledNote {
                    note: right,
                    fragment: true,
                });
            } else {
                // Outside the row; stays pooled for a later row
                carry.push(pooled);
            }
        }

        if min_pitch > max_pitch {
            min_pitch = EMPTY_RANGE_PITCH;
            max_pitch = EMPTY_RANGE_PITCH;
        }

        pool = carry;
        rows.push(Row {
            min_pitch,
            max_pitch,
            notes,
        });
        start += row_duration;
    }

    rows
}
