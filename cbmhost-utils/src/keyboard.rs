/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Keyboard related utilities.
//!
//! To make use of one of the event loop dependent implementation of the keyboard utilities add one of the
//! available features to the `[dependencies]` section in the Cargo configuration file.
//!
//! The DOM key code mapping is always available, so key events forwarded as strings, e.g. from
//! a web page, can be translated without any additional dependencies.
use log::trace;
use cbmhost::{HostHandle, HostKey, KeyState, RawKeyInfo, SendEventError};

#[cfg(feature = "sdl2")]
pub mod sdl2;

#[cfg(feature = "winit")]
pub mod winit;

#[cfg(feature = "web-sys")]
pub mod web_sys;

/// Returns the host key identity corresponding to the DOM `KeyboardEvent.code` value.
///
/// The modifier keys are returned with their side, e.g. `"ShiftRight"` is [HostKey::ShiftRight].
///
/// Returns `None` if the code doesn't correspond to any of the keys known to [HostKey].
pub fn map_dom_code(code: &str) -> Option<HostKey> {
    use HostKey::*;
    Some(match code {
        "KeyA" => KeyA,
        "KeyB" => KeyB,
        "KeyC" => KeyC,
        "KeyD" => KeyD,
        "KeyE" => KeyE,
        "KeyF" => KeyF,
        "KeyG" => KeyG,
        "KeyH" => KeyH,
        "KeyI" => KeyI,
        "KeyJ" => KeyJ,
        "KeyK" => KeyK,
        "KeyL" => KeyL,
        "KeyM" => KeyM,
        "KeyN" => KeyN,
        "KeyO" => KeyO,
        "KeyP" => KeyP,
        "KeyQ" => KeyQ,
        "KeyR" => KeyR,
        "KeyS" => KeyS,
        "KeyT" => KeyT,
        "KeyU" => KeyU,
        "KeyV" => KeyV,
        "KeyW" => KeyW,
        "KeyX" => KeyX,
        "KeyY" => KeyY,
        "KeyZ" => KeyZ,
        "Digit0" => Digit0,
        "Digit1" => Digit1,
        "Digit2" => Digit2,
        "Digit3" => Digit3,
        "Digit4" => Digit4,
        "Digit5" => Digit5,
        "Digit6" => Digit6,
        "Digit7" => Digit7,
        "Digit8" => Digit8,
        "Digit9" => Digit9,
        "Minus" => Minus,
        "Equal" => Equal,
        "BracketLeft" => BracketLeft,
        "BracketRight" => BracketRight,
        "Backslash"|"IntlBackslash" => Backslash,
        "Semicolon" => Semicolon,
        "Quote" => Quote,
        "Backquote" => Backquote,
        "Comma" => Comma,
        "Period" => Period,
        "Slash" => Slash,
        "Space" => Space,
        "Enter" => Enter,
        "Tab" => Tab,
        "Backspace" => Backspace,
        "Delete" => Delete,
        "Insert" => Insert,
        "Home" => Home,
        "End" => End,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "ArrowUp" => ArrowUp,
        "ArrowDown" => ArrowDown,
        "ArrowLeft" => ArrowLeft,
        "ArrowRight" => ArrowRight,
        "Escape" => Escape,
        "Pause" => Pause,
        "ScrollLock" => ScrollLock,
        "CapsLock" => CapsLock,
        "NumpadClear" => Clear,
        "F1" => F1,
        "F2" => F2,
        "F3" => F3,
        "F4" => F4,
        "F5" => F5,
        "F6" => F6,
        "F7" => F7,
        "F8" => F8,
        "F9" => F9,
        "F10" => F10,
        "F11" => F11,
        "F12" => F12,
        "ShiftLeft" => ShiftLeft,
        "ShiftRight" => ShiftRight,
        "ControlLeft" => ControlLeft,
        "ControlRight" => ControlRight,
        "AltLeft" => AltLeft,
        "AltRight" => AltRight,
        "Numpad0" => Numpad0,
        "Numpad1" => Numpad1,
        "Numpad2" => Numpad2,
        "Numpad3" => Numpad3,
        "Numpad4" => Numpad4,
        "Numpad5" => Numpad5,
        "Numpad6" => Numpad6,
        "Numpad7" => Numpad7,
        "Numpad8" => Numpad8,
        "Numpad9" => Numpad9,
        "NumpadAdd" => NumpadAdd,
        "NumpadSubtract" => NumpadSubtract,
        "NumpadMultiply" => NumpadMultiply,
        "NumpadDivide" => NumpadDivide,
        "NumpadDecimal" => NumpadDecimal,
        "NumpadEnter" => NumpadEnter,
        _ => return None
    })
}

/// Sends a key down or up event to the emulator session if the `key` was recognized.
///
/// Returns `Ok(true)` if the event was sent and `Ok(false)` if `key` is `None`.
///
/// * `key` is the result of one of the key mapping functions.
/// * `pressed` indicates if the key was pressed (`true`) or released (`false`).
/// * `raw` is the additional information about the event.
///
/// # Errors
/// Returns an error if the session has been dropped.
pub fn send_key_event(
            handle: &HostHandle,
            key: Option<HostKey>,
            pressed: bool,
            raw: RawKeyInfo
        ) -> Result<bool, SendEventError>
{
    match key {
        Some(key) => {
            let state = if pressed { KeyState::Pressed } else { KeyState::Released };
            handle.key_event(key, state, raw)?;
            Ok(true)
        }
        None => {
            trace!("unrecognized host key ignored");
            Ok(false)
        }
    }
}

/// Sends a key down or up event to the emulator session from the DOM `KeyboardEvent` properties.
///
/// * `code` is the `KeyboardEvent.code` value.
/// * `repeat` is the `KeyboardEvent.repeat` value.
pub fn send_dom_key_event(
            handle: &HostHandle,
            code: &str,
            pressed: bool,
            repeat: bool
        ) -> Result<bool, SendEventError>
{
    let raw = RawKeyInfo { repeat, ..RawKeyInfo::default() };
    send_key_event(handle, map_dom_code(code), pressed, raw)
}
