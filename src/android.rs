//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JByteArray, JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::{config_from_json, render_bytes_to_svg, render_file_to_svg};

/// Render a MIDI file at the given path to piano roll SVG.
///
/// Called from Kotlin as:
///   external fun renderFile(path: String, configJson: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_rollsvg_app_RollSvg_renderFile(
    mut env: JNIEnv,
    _class: JClass,
    path: JString,
    config_json: JString,
) -> jstring {
    let path_str: String = match env.get_string(&path) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let json: Option<String> = if config_json.is_null() {
        None
    } else {
        env.get_string(&config_json).ok().map(|s| s.into())
    };
    let config = match config_from_json(json.as_deref()) {
        Ok(c) => c,
        Err(_) => return std::ptr::null_mut(),
    };

    match render_file_to_svg(&path_str, &config) {
        Ok(svg) => match env.new_string(&svg) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(_) => std::ptr::null_mut(),
    }
}

/// Render SMF bytes to piano roll SVG.
///
/// Called from Kotlin as:
///   external fun renderBytes(data: ByteArray, configJson: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_rollsvg_app_RollSvg_renderBytes(
    mut env: JNIEnv,
    _class: JClass,
    data: JByteArray,
    config_json: JString,
) -> jstring {
    let bytes = match env.convert_byte_array(&data) {
        Ok(b) => b,
        Err(_) => return std::ptr::null_mut(),
    };

    let json: Option<String> = if config_json.is_null() {
        None
    } else {
        env.get_string(&config_json).ok().map(|s| s.into())
    };
    let config = match config_from_json(json.as_deref()) {
        Ok(c) => c,
        Err(_) => return std::ptr::null_mut(),
    };

    match render_bytes_to_svg(&bytes, &config) {
        Ok(svg) => match env.new_string(&svg) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(_) => std::ptr::null_mut(),
    }
}
