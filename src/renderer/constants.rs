//! Shared constants for the piano roll renderer.

/// Style block embedded in every output document (and copied into each
/// fragment in split mode).
pub(super) const STYLE_BLOCK: &str = r#"<style>
  svg { background-color: #fff; }
  .line { stroke: #eee; stroke-width: 1px; }
  .line_verse { stroke: #bbb; }
  .line_C { stroke: #333; stroke-width: 2px }
  .line_F { stroke: #333; }
  .line_blackKey { stroke: #ddd; }
  .note { fill: #fff; stroke: #000; }
  .note_black { fill: #666; }
  .note_staggered { fill-opacity: 0.6; }
  .note_black_staggered { fill: #000; fill-opacity: 0.5; }
  .blackRow { fill: #ddd; }
  .blackRow_lower { fill: #bbb; }
  .octaveText { font-weight: bold; font-size: 24px; font-family: 'Helvetica Neue', Helvetica, sans-serif; fill: #aaa; }
</style>"#;

// ── Octave labels ───────────────────────────────────────────────────
/// Reference width the label x-offset is scaled against.
pub(super) const LABEL_BASE_WIDTH: f64 = 960.0;
pub(super) const LABEL_BASE_OFFSET: f64 = 4.0;

// ── Track preview ───────────────────────────────────────────────────
/// Preview viewBox width in user units.
pub(super) const PREVIEW_WIDTH: f64 = 100.0;
/// Floor for preview note widths so short notes stay visible.
pub(super) const PREVIEW_MIN_NOTE_WIDTH: f64 = 0.1;
