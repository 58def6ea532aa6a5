/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Keyboard related functions to be used with [SDL2](https://crates.io/crates/sdl2).
//!
//! Requires "sdl2" feature to be enabled.
use sdl2::keyboard::Keycode;
use cbmhost::{HostHandle, HostKey, RawKeyInfo, SendEventError};

/// Returns the host key identity corresponding to the provided `key` code.
///
/// Returns `None` if the key is not known to [HostKey].
pub fn map_keycode(key: Keycode) -> Option<HostKey> {
    Some(match key {
        Keycode::Num1 => HostKey::Digit1,
        Keycode::Num2 => HostKey::Digit2,
        Keycode::Num3 => HostKey::Digit3,
        Keycode::Num4 => HostKey::Digit4,
        Keycode::Num5 => HostKey::Digit5,
        Keycode::Num6 => HostKey::Digit6,
        Keycode::Num7 => HostKey::Digit7,
        Keycode::Num8 => HostKey::Digit8,
        Keycode::Num9 => HostKey::Digit9,
        Keycode::Num0 => HostKey::Digit0,
        Keycode::A => HostKey::KeyA,
        Keycode::B => HostKey::KeyB,
        Keycode::C => HostKey::KeyC,
        Keycode::D => HostKey::KeyD,
        Keycode::E => HostKey::KeyE,
        Keycode::F => HostKey::KeyF,
        Keycode::G => HostKey::KeyG,
        Keycode::H => HostKey::KeyH,
        Keycode::I => HostKey::KeyI,
        Keycode::J => HostKey::KeyJ,
        Keycode::K => HostKey::KeyK,
        Keycode::L => HostKey::KeyL,
        Keycode::M => HostKey::KeyM,
        Keycode::N => HostKey::KeyN,
        Keycode::O => HostKey::KeyO,
        Keycode::P => HostKey::KeyP,
        Keycode::Q => HostKey::KeyQ,
        Keycode::R => HostKey::KeyR,
        Keycode::S => HostKey::KeyS,
        Keycode::T => HostKey::KeyT,
        Keycode::U => HostKey::KeyU,
        Keycode::V => HostKey::KeyV,
        Keycode::W => HostKey::KeyW,
        Keycode::X => HostKey::KeyX,
        Keycode::Y => HostKey::KeyY,
        Keycode::Z => HostKey::KeyZ,
        Keycode::Minus => HostKey::Minus,
        Keycode::Equals => HostKey::Equal,
        Keycode::LeftBracket => HostKey::BracketLeft,
        Keycode::RightBracket => HostKey::BracketRight,
        Keycode::Backslash => HostKey::Backslash,
        Keycode::Semicolon => HostKey::Semicolon,
        Keycode::Quote => HostKey::Quote,
        Keycode::Backquote => HostKey::Backquote,
        Keycode::Comma => HostKey::Comma,
        Keycode::Period => HostKey::Period,
        Keycode::Slash => HostKey::Slash,
        Keycode::Space => HostKey::Space,
        Keycode::Return => HostKey::Enter,
        Keycode::Tab => HostKey::Tab,
        Keycode::Backspace => HostKey::Backspace,
        Keycode::Delete => HostKey::Delete,
        Keycode::Insert => HostKey::Insert,
        Keycode::Home => HostKey::Home,
        Keycode::End => HostKey::End,
        Keycode::PageUp => HostKey::PageUp,
        Keycode::PageDown => HostKey::PageDown,
        Keycode::Up => HostKey::ArrowUp,
        Keycode::Down => HostKey::ArrowDown,
        Keycode::Left => HostKey::ArrowLeft,
        Keycode::Right => HostKey::ArrowRight,
        Keycode::Escape => HostKey::Escape,
        Keycode::Cancel => HostKey::Cancel,
        Keycode::Pause => HostKey::Pause,
        Keycode::ScrollLock => HostKey::ScrollLock,
        Keycode::CapsLock => HostKey::CapsLock,
        Keycode::Clear => HostKey::Clear,
        Keycode::F1 => HostKey::F1,
        Keycode::F2 => HostKey::F2,
        Keycode::F3 => HostKey::F3,
        Keycode::F4 => HostKey::F4,
        Keycode::F5 => HostKey::F5,
        Keycode::F6 => HostKey::F6,
        Keycode::F7 => HostKey::F7,
        Keycode::F8 => HostKey::F8,
        Keycode::F9 => HostKey::F9,
        Keycode::F10 => HostKey::F10,
        Keycode::F11 => HostKey::F11,
        Keycode::F12 => HostKey::F12,
        Keycode::LShift => HostKey::ShiftLeft,
        Keycode::RShift => HostKey::ShiftRight,
        Keycode::LCtrl => HostKey::ControlLeft,
        Keycode::RCtrl => HostKey::ControlRight,
        Keycode::LAlt => HostKey::AltLeft,
        Keycode::RAlt => HostKey::AltRight,
        Keycode::Kp0 => HostKey::Numpad0,
        Keycode::Kp1 => HostKey::Numpad1,
        Keycode::Kp2 => HostKey::Numpad2,
        Keycode::Kp3 => HostKey::Numpad3,
        Keycode::Kp4 => HostKey::Numpad4,
        Keycode::Kp5 => HostKey::Numpad5,
        Keycode::Kp6 => HostKey::Numpad6,
        Keycode::Kp7 => HostKey::Numpad7,
        Keycode::Kp8 => HostKey::Numpad8,
        Keycode::Kp9 => HostKey::Numpad9,
        Keycode::KpPlus => HostKey::NumpadAdd,
        Keycode::KpMinus => HostKey::NumpadSubtract,
        Keycode::KpMultiply => HostKey::NumpadMultiply,
        Keycode::KpDivide => HostKey::NumpadDivide,
        Keycode::KpPeriod => HostKey::NumpadDecimal,
        Keycode::KpEnter => HostKey::NumpadEnter,
        _ => return None
    })
}

/// Sends the SDL2 `KeyDown` or `KeyUp` event properties to the emulator session.
///
/// * `keycode` is the `keycode` property of the event.
/// * `pressed` should be `true` for `KeyDown` and `false` for `KeyUp`.
/// * `repeat` is the `repeat` property of the event.
///
/// Returns `Ok(false)` if there is no key code or the key is not recognized.
pub fn send_key_event(
            handle: &HostHandle,
            keycode: Option<Keycode>,
            pressed: bool,
            repeat: bool
        ) -> Result<bool, SendEventError>
{
    let raw = RawKeyInfo { repeat, ..RawKeyInfo::default() };
    super::send_key_event(handle, keycode.and_then(map_keycode), pressed, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keycodes() {
        assert_eq!(map_keycode(Keycode::Num5), Some(HostKey::Digit5));
        assert_eq!(map_keycode(Keycode::RShift), Some(HostKey::ShiftRight));
        assert_eq!(map_keycode(Keycode::KpEnter), Some(HostKey::NumpadEnter));
        assert_eq!(map_keycode(Keycode::LGui), None);
    }
}
