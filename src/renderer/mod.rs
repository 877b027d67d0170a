//! Piano roll renderer — converts a decoded Song into SVG output.
//!
//! Each render call runs the whole pipeline: merge the selected tracks,
//! trim to the configured window, slice into rows, then assemble one
//! scene-node group per row (guide lines, key stripes, octave labels,
//! note rectangles) and serialize. Configuration may change between
//! calls; nothing is cached and the song is never mutated.

mod constants;
mod layout;
mod svg_builder;

use log::debug;

use crate::config::RenderConfig;
use crate::merge::{merge_tracks, trim_track, trimmed_duration};
use crate::model::{Row, Song, Track};
use crate::rows::slice_into_rows;

use constants::*;
use layout::{is_black_key, RowLayout};
use svg_builder::SvgNode;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a song into piano roll SVG.
///
/// Returns a single document, or — with `split_svgs` — one self-contained
/// document per row, joined by newlines, for independent pagination.
pub fn render_song_to_svg(song: &Song, config: &RenderConfig) -> String {
    let doc_width = config.width + 1;
    let rendered = render_rows(song, config, !config.split_svgs);
    debug!(
        "rendered {} row(s), total height {}",
        rendered.rows.len(),
        rendered.total_height
    );

    if config.split_svgs {
        let fragments: Vec<String> = rendered
            .rows
            .into_iter()
            .map(|row| {
                let row_height = row.height + 1.0;
                SvgNode::elm(format!(
                    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {doc_width} {row_height}" width="{doc_width}" class="pianoRoll" style="margin-bottom: {}px">"#,
                    config.row_spacing
                ))
                .child(SvgNode::text(STYLE_BLOCK))
                .child(row.group)
                .serialize()
            })
            .collect();

        fragments.join("\n")
    } else {
        let mut svg = SvgNode::elm(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {doc_width} {}" width="{doc_width}" class="pianoRoll">"#,
            rendered.total_height
        ));
        svg.push(SvgNode::text(STYLE_BLOCK));
        for row in rendered.rows {
            svg.push(row.group);
        }

        svg.serialize()
    }
}

/// Render a condensed single-track preview — each note mapped straight
/// onto a small fixed-aspect canvas using the track's own time and pitch
/// extent, with no row slicing.
pub fn render_track_preview(song: &Song, track: &Track) -> String {
    let lowest = (track.min_pitch - 1).max(0);
    let highest = (lowest + 12).max((track.max_pitch + 1).min(127));
    let range = highest - lowest;
    let duration = f64::from(song.duration);

    let mut svg = SvgNode::elm(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {PREVIEW_WIDTH} {range}" height="{}" preserveAspectRatio="none" class="previewRoll">"#,
        range * 2
    ));

    let mut bars = SvgNode::elm(r#"<g class="previewRoll__bars">"#);
    if song.time_division > 0 {
        let mut i = 0u32;
        while i < song.duration {
            let x = f64::from(i) / duration * PREVIEW_WIDTH;
            bars.push_text(format!(r#"<path d="M{x} 0 v{range}" />"#));
            i += song.time_division;
        }
    }
    svg.push(bars);

    for note in &track.notes {
        let width = (f64::from(note.duration) / duration * PREVIEW_WIDTH)
            .max(PREVIEW_MIN_NOTE_WIDTH);
        let x = f64::from(note.time) / duration * PREVIEW_WIDTH;
        let y = highest - note.pitch;
        svg.push_text(format!(
            r#"<rect class="previewRoll__note" width="{width}" height="1" transform="translate({x} {y})"/>"#
        ));
    }

    svg.serialize()
}

// ═══════════════════════════════════════════════════════════════════════
// Row assembly
// ═══════════════════════════════════════════════════════════════════════

struct RenderedRow {
    group: SvgNode,
    height: f64,
}

struct RenderedRows {
    rows: Vec<RenderedRow>,
    /// Running sum of row heights and row gaps
    total_height: f64,
}

/// Run the transform pipeline and build one scene group per row.
///
/// With `translate` set, each group carries its vertical offset in the
/// stacked document; without it the groups are position-free, ready to
/// be wrapped into standalone per-row documents.
fn render_rows(song: &Song, config: &RenderConfig, translate: bool) -> RenderedRows {
    let merged = merge_tracks(song, config);
    let trimmed = trim_track(merged, song, config);
    let row_duration = config.row_duration(song);
    let rows = slice_into_rows(
        trimmed,
        row_duration,
        trimmed_duration(song, config),
        config.remove_shorter_than,
    );

    let time_division = config.time_division_used(song);
    let mut rendered = Vec::new();
    let mut cur_y = 0.0;

    for row in &rows {
        let layout = RowLayout::new(row, config, row_duration);
        let height = layout.height();
        let y = if translate { cur_y } else { 0.0 };

        let mut group = SvgNode::elm(row_group_opening(y, height));
        push_guide_lines(&mut group, &layout, config, time_division, row_duration, height);
        push_key_stripes(&mut group, &layout, config);
        push_octave_labels(&mut group, &layout);
        push_horizontal_guides(&mut group, &layout);
        push_notes(&mut group, &layout, config, row);

        rendered.push(RenderedRow { group, height });
        cur_y += height + f64::from(config.row_spacing);
    }

    RenderedRows {
        rows: rendered,
        total_height: cur_y,
    }
}

fn row_group_opening(y: f64, height: f64) -> String {
    if y == 0.0 {
        format!(r#"<g class="row" data-height="{height}">"#)
    } else {
        format!(r#"<g class="row" transform="translate(0 {y})" data-height="{height}">"#)
    }
}

/// Vertical guide lines, one per beat, with a heavier style on bar
/// boundaries.
fn push_guide_lines(
    group: &mut SvgNode,
    layout: &RowLayout,
    config: &RenderConfig,
    time_division: u32,
    row_duration: u32,
    height: f64,
) {
    let mut i = 0u32;
    while i <= row_duration {
        let x = layout.x(f64::from(i)) + 0.5;
        let mut classes = vec!["line"];
        if (i / time_division) % config.bar_subdivisions == 0 {
            classes.push("line_verse");
        }
        group.push_text(format!(
            r#"<line class="{}" x1="{x}" y1="0" x2="{x}" y2="{height}" />"#,
            classes.join(" ")
        ));
        i += time_division;
    }
}

/// Background marks for black-key pitches: thin separator lines in
/// staggered mode, filled bands in grid mode (darker below pitch
/// class 4).
fn push_key_stripes(group: &mut SvgNode, layout: &RowLayout, config: &RenderConfig) {
    if config.staggered {
        let half = layout.line_height() / 2.0;
        for pitch in ((layout.min_pitch - 1)..=layout.max_pitch).rev() {
            if !is_black_key(pitch) {
                continue;
            }
            let y = layout.y_top(pitch) + half + 0.5;
            group.push_text(format!(
                r#"<line class="line line_blackKey" x1="0" y1="{y}" x2="{}" y2="{y}" />"#,
                layout.width()
            ));
        }
    } else {
        for pitch in layout.min_pitch..=layout.max_pitch {
            if !is_black_key(pitch) {
                continue;
            }
            let mut classes = vec!["blackRow"];
            if pitch.rem_euclid(12) < 4 {
                classes.push("blackRow_lower");
            }
            let y = layout.y_top(pitch) + 0.5;
            group.push_text(format!(
                r#"<rect class="{}" x="1" y="{y}" width="{}" height="{}" />"#,
                classes.join(" "),
                layout.width() - 1.0,
                layout.line_height()
            ));
        }
    }
}

/// Octave number at each C boundary (MIDI octave numbering: C4 = 60).
fn push_octave_labels(group: &mut SvgNode, layout: &RowLayout) {
    let half = layout.line_height() / 2.0;
    for pitch in layout.min_pitch..(layout.max_pitch - 2) {
        if pitch.rem_euclid(12) != 0 {
            continue;
        }
        let x = layout.width() / LABEL_BASE_WIDTH * LABEL_BASE_OFFSET;
        let y = layout.y_bottom(pitch) - half;
        group.push_text(format!(
            r#"<text class="octaveText" x="{x}" y="{y}">{}</text>"#,
            pitch.div_euclid(12) - 1
        ));
    }
}

/// Horizontal guides: one at the row top, a heavy line under each C and
/// a lighter one under each F.
fn push_horizontal_guides(group: &mut SvgNode, layout: &RowLayout) {
    for pitch in (layout.min_pitch..=layout.max_pitch + 1).rev() {
        let class = pitch.rem_euclid(12);
        if pitch != layout.max_pitch + 1 && class != 0 && class != 5 {
            continue;
        }

        let y = if pitch == layout.max_pitch + 1 {
            0.0
        } else {
            layout.y_bottom(pitch) + 0.5
        };
        let style = if class == 0 { "line line_C" } else { "line line_F" };
        group.push_text(format!(
            r#"<line class="{style}" x1="0" y1="{y}" x2="{}" y2="{y}" />"#,
            layout.width()
        ));
    }
}

fn push_notes(group: &mut SvgNode, layout: &RowLayout, config: &RenderConfig, row: &Row) {
    for note in &row.notes {
        let black = is_black_key(note.pitch);
        let mut classes = vec!["note"];
        if black {
            classes.push("note_black");
        }
        if config.staggered {
            classes.push("note_staggered");
            if black {
                classes.push("note_black_staggered");
            }
        }

        let x = layout.x(f64::from(note.time)) + 0.5;
        let y = layout.y_top(note.pitch) + 0.5 + if config.staggered { 1.0 } else { 0.0 };
        let width = layout.x(f64::from(note.duration));
        let height = layout.line_height() - if config.staggered { 2.0 } else { 0.0 };
        group.push_text(format!(
            r#"<rect class="{}" x="{x}" y="{y}" width="{width}" height="{height}" />"#,
            classes.join(" ")
        ));
    }
}
