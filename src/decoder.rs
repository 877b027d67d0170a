//! MIDI decoder — converts a Standard MIDI File into the Song data model.
//!
//! SMF parsing itself is `midly`'s job; this module consumes its event
//! stream: delta times are accumulated into absolute tick offsets, the
//! tracks are normalized per SMF format (format 0 is demultiplexed by
//! channel, format 2 drops the leading metadata track), and note-on/off
//! events are paired into note intervals.

use log::debug;
use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::model::{Note, Song, Track};

/// A track event with its cumulative time offset, reduced to the kinds
/// the pairing algorithm cares about.
#[derive(Debug, Clone)]
struct TimedEvent {
    time: u32,
    kind: EventKind,
}

#[derive(Debug, Clone)]
enum EventKind {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8, velocity: u8 },
}

/// An event track awaiting note pairing.
struct EventTrack {
    title: String,
    events: Vec<TimedEvent>,
}

/// Decode SMF bytes into a Song.
pub fn parse_song(data: &[u8]) -> Result<Song, String> {
    let smf = Smf::parse(data).map_err(|e| format!("MIDI parse error: {e}"))?;
    song_from_smf(&smf)
}

/// Build a Song from an already-parsed SMF.
pub fn song_from_smf(smf: &Smf) -> Result<Song, String> {
    let time_division = match smf.header.timing {
        Timing::Metrical(ticks) => u32::from(ticks.as_int()),
        Timing::Timecode(..) => {
            return Err("SMPTE timecode timing is not supported".to_string());
        }
    };

    let event_tracks = collect_event_tracks(smf);

    let mut duration = time_division;
    let mut orphan_offs = 0usize;
    let mut tracks = Vec::new();

    for event_track in event_tracks {
        let paired = pair_notes(event_track);
        duration = duration.max(paired.max_end);
        orphan_offs += paired.orphan_offs;
        // A track with no complete notes carries nothing to render
        if !paired.track.notes.is_empty() {
            tracks.push(paired.track);
        }
    }

    if orphan_offs > 0 {
        debug!("discarded {orphan_offs} note-off event(s) with no held note");
    }
    debug!(
        "decoded song: {} track(s), {} ticks at {} ticks/beat",
        tracks.len(),
        duration,
        time_division
    );

    Ok(Song {
        time_division,
        duration,
        tracks,
    })
}

/// Normalize the SMF's tracks into per-track event sequences with
/// cumulative times.
///
/// Format 0 stores all channels in one stream, so it is demultiplexed
/// into up to 16 synthetic channel tracks. Format 2's first track holds
/// only metadata and is excluded from pairing.
fn collect_event_tracks(smf: &Smf) -> Vec<EventTrack> {
    match smf.header.format {
        Format::SingleTrack => {
            let mut channels: Vec<EventTrack> = (0..16)
                .map(|i| EventTrack {
                    title: format!("Channel {i}"),
                    events: Vec::new(),
                })
                .collect();

            if let Some(track) = smf.tracks.first() {
                let mut time = 0u32;
                for event in track {
                    time += event.delta.as_int();
                    if let TrackEventKind::Midi { channel, message } = event.kind {
                        if let Some(kind) = note_event(message) {
                            channels[channel.as_int() as usize]
                                .events
                                .push(TimedEvent { time, kind });
                        }
                    }
                }
            }

            channels
        }
        Format::Parallel | Format::Sequential => {
            let mut event_tracks: Vec<EventTrack> = smf
                .tracks
                .iter()
                .enumerate()
                .map(|(i, track)| {
                    let mut title = None;
                    let mut events = Vec::new();
                    let mut time = 0u32;

                    for event in track {
                        time += event.delta.as_int();
                        match event.kind {
                            TrackEventKind::Midi { message, .. } => {
                                if let Some(kind) = note_event(message) {
                                    events.push(TimedEvent { time, kind });
                                }
                            }
                            TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                                if title.is_none() {
                                    title =
                                        Some(String::from_utf8_lossy(name).into_owned());
                                }
                            }
                            _ => {}
                        }
                    }

                    EventTrack {
                        title: title.unwrap_or_else(|| format!("Track {}", i + 1)),
                        events,
                    }
                })
                .collect();

            if smf.header.format == Format::Sequential && !event_tracks.is_empty() {
                event_tracks.remove(0);
            }

            event_tracks
        }
    }
}

fn note_event(message: MidiMessage) -> Option<EventKind> {
    match message {
        MidiMessage::NoteOn { key, vel } => Some(EventKind::NoteOn {
            pitch: key.as_int(),
            velocity: vel.as_int(),
        }),
        MidiMessage::NoteOff { key, vel } => Some(EventKind::NoteOff {
            pitch: key.as_int(),
            velocity: vel.as_int(),
        }),
        _ => None,
    }
}

/// A note-on waiting for its note-off.
#[derive(Debug, Clone, Copy)]
struct HeldNote {
    time: u32,
    velocity_on: u8,
}

struct PairedTrack {
    track: Track,
    /// Latest note end time on this track, 0 if none
    max_end: u32,
    orphan_offs: usize,
}

/// Pair note-on/note-off events into note intervals.
///
/// A note-on with velocity 0 is the standard alternate encoding for
/// note-off. A second note-on at a held pitch silently replaces the
/// first (last start wins). An off event with no held note is dropped.
fn pair_notes(event_track: EventTrack) -> PairedTrack {
    let mut held: [Option<HeldNote>; 128] = [None; 128];
    let mut notes = Vec::new();
    let mut min_pitch = 127i32;
    let mut max_pitch = 0i32;
    let mut max_end = 0u32;
    let mut orphan_offs = 0usize;

    for event in &event_track.events {
        match event.kind {
            EventKind::NoteOn { pitch, velocity } if velocity > 0 => {
                held[pitch as usize] = Some(HeldNote {
                    time: event.time,
                    velocity_on: velocity,
                });
                min_pitch = min_pitch.min(i32::from(pitch));
                max_pitch = max_pitch.max(i32::from(pitch));
            }
            EventKind::NoteOn { pitch, velocity } | EventKind::NoteOff { pitch, velocity } => {
                match held[pitch as usize].take() {
                    Some(start) => {
                        let note = Note {
                            time: start.time,
                            pitch: i32::from(pitch),
                            duration: event.time - start.time,
                            velocity_on: start.velocity_on,
                            velocity_off: velocity,
                        };
                        max_end = max_end.max(note.end());
                        notes.push(note);
                    }
                    None => orphan_offs += 1,
                }
            }
        }
    }

    PairedTrack {
        track: Track {
            title: event_track.title,
            min_pitch,
            max_pitch,
            notes,
        },
        max_end,
        orphan_offs,
    }
}
