//! rollsvg — MIDI piano roll SVG rendering library.
//!
//! Decodes a Standard MIDI File into a song of note intervals and renders
//! it as a printable piano roll: rows of bars with one rectangle per note,
//! pitch mapped to vertical position. Rendering is a pure function of
//! (song, configuration) — re-render with new options at will.
//!
//! # Example
//! ```no_run
//! use rollsvg::{parse_file, render_song_to_svg, RenderConfig};
//!
//! let song = parse_file("path/to/song.mid").unwrap();
//! println!("Tracks: {}", song.tracks.len());
//! println!("Duration: {} ticks", song.duration);
//!
//! let svg = render_song_to_svg(&song, &RenderConfig::default());
//! ```

pub mod config;
pub mod decoder;
pub mod merge;
pub mod model;
pub mod renderer;
pub mod rows;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use config::RenderConfig;
pub use decoder::parse_song;
pub use model::*;
pub use renderer::{render_song_to_svg, render_track_preview};

/// Parse a Standard MIDI File from a file path.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Song, String> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| format!("Failed to read file '{}': {e}", path.display()))?;

    parse_song(&data)
}

/// Convert a decoded song to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn song_to_json(song: &Song) -> Result<String, String> {
    serde_json::to_string_pretty(song).map_err(|e| format!("JSON serialization error: {e}"))
}

/// Parse SMF bytes and render to piano roll SVG.
pub fn render_bytes_to_svg(data: &[u8], config: &RenderConfig) -> Result<String, String> {
    let song = parse_song(data)?;
    Ok(render_song_to_svg(&song, config))
}

/// Parse a MIDI file and render it directly to SVG.
/// Convenience function combining decoding and rendering.
pub fn render_file_to_svg<P: AsRef<Path>>(
    path: P,
    config: &RenderConfig,
) -> Result<String, String> {
    let song = parse_file(path)?;
    Ok(render_song_to_svg(&song, config))
}

/// Build a configuration from optional JSON text — `None` or blank text
/// means the defaults. Unspecified fields fall back to their defaults.
pub(crate) fn config_from_json(json: Option<&str>) -> Result<RenderConfig, String> {
    match json {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(text).map_err(|e| format!("Invalid config JSON: {e}"))
        }
        _ => Ok(RenderConfig::default()),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and other embedders
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Render a MIDI file to piano roll SVG and return it as a C string.
/// The caller must free the returned string with `rollsvg_free_string`.
///
/// `config_json` is a camelCase JSON configuration object; pass null for
/// the defaults.
///
/// # Safety
/// `path` must be a valid null-terminated UTF-8 C string; `config_json`
/// must be one too, or null.
#[no_mangle]
pub unsafe extern "C" fn rollsvg_render_file(
    path: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(path) };
    let path_str = match c_str.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let config = match unsafe { ffi_config(config_json) } {
        Ok(c) => c,
        Err(_) => return std::ptr::null_mut(),
    };

    match render_file_to_svg(path_str, &config) {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Render SMF bytes to piano roll SVG and return it as a C string.
/// The caller must free the returned string with `rollsvg_free_string`.
///
/// # Safety
/// `data` must point to `len` valid bytes. `config_json` may be null.
#[no_mangle]
pub unsafe extern "C" fn rollsvg_render_bytes(
    data: *const u8,
    len: usize,
    config_json: *const c_char,
) -> *mut c_char {
    if data.is_null() || len == 0 {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };

    let config = match unsafe { ffi_config(config_json) } {
        Ok(c) => c,
        Err(_) => return std::ptr::null_mut(),
    };

    match render_bytes_to_svg(bytes, &config) {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Decode SMF bytes and return the song as a JSON C string — track
/// titles, pitch ranges and note lists for building a track picker.
/// The caller must free the returned string with `rollsvg_free_string`.
///
/// # Safety
/// `data` must point to `len` valid bytes.
#[no_mangle]
pub unsafe extern "C" fn rollsvg_song_json(data: *const u8, len: usize) -> *mut c_char {
    if data.is_null() || len == 0 {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };

    let json = parse_song(bytes).and_then(|song| song_to_json(&song));
    match json {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by rollsvg functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a rollsvg function, or null.
#[no_mangle]
pub unsafe extern "C" fn rollsvg_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

/// # Safety
/// `config_json` must be a valid null-terminated C string, or null.
unsafe fn ffi_config(config_json: *const c_char) -> Result<RenderConfig, String> {
    let json = if config_json.is_null() {
        None
    } else {
        unsafe { CStr::from_ptr(config_json) }.to_str().ok()
    };
    config_from_json(json)
}
