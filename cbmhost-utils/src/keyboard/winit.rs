/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Keyboard related functions to be used with [winit](https://crates.io/crates/winit).
//!
//! Requires "winit" feature to be enabled.
use winit::event::{VirtualKeyCode, ElementState, KeyboardInput};
use cbmhost::{HostHandle, HostKey, RawKeyInfo, SendEventError};

/// Returns the host key identity corresponding to the provided `key` code.
///
/// Returns `None` if the key is not known to [HostKey].
pub fn map_virtual_key(key: VirtualKeyCode) -> Option<HostKey> {
    use VirtualKeyCode as V;
    Some(match key {
        V::Key1 => HostKey::Digit1,
        V::Key2 => HostKey::Digit2,
        V::Key3 => HostKey::Digit3,
        V::Key4 => HostKey::Digit4,
        V::Key5 => HostKey::Digit5,
        V::Key6 => HostKey::Digit6,
        V::Key7 => HostKey::Digit7,
        V::Key8 => HostKey::Digit8,
        V::Key9 => HostKey::Digit9,
        V::Key0 => HostKey::Digit0,
        V::A => HostKey::KeyA,
        V::B => HostKey::KeyB,
        V::C => HostKey::KeyC,
        V::D => HostKey::KeyD,
        V::E => HostKey::KeyE,
        V::F => HostKey::KeyF,
        V::G => HostKey::KeyG,
        V::H => HostKey::KeyH,
        V::I => HostKey::KeyI,
        V::J => HostKey::KeyJ,
        V::K => HostKey::KeyK,
        V::L => HostKey::KeyL,
        V::M => HostKey::KeyM,
        V::N => HostKey::KeyN,
        V::O => HostKey::KeyO,
        V::P => HostKey::KeyP,
        V::Q => HostKey::KeyQ,
        V::R => HostKey::KeyR,
        V::S => HostKey::KeyS,
        V::T => HostKey::KeyT,
        V::U => HostKey::KeyU,
        V::V => HostKey::KeyV,
        V::W => HostKey::KeyW,
        V::X => HostKey::KeyX,
        V::Y => HostKey::KeyY,
        V::Z => HostKey::KeyZ,
        V::Minus => HostKey::Minus,
        V::Equals => HostKey::Equal,
        V::LBracket => HostKey::BracketLeft,
        V::RBracket => HostKey::BracketRight,
        V::Backslash|V::OEM102 => HostKey::Backslash,
        V::Semicolon => HostKey::Semicolon,
        V::Apostrophe => HostKey::Quote,
        V::Grave => HostKey::Backquote,
        V::Comma => HostKey::Comma,
        V::Period => HostKey::Period,
        V::Slash => HostKey::Slash,
        V::Space => HostKey::Space,
        V::Return => HostKey::Enter,
        V::Tab => HostKey::Tab,
        V::Back => HostKey::Backspace,
        V::Delete => HostKey::Delete,
        V::Insert => HostKey::Insert,
        V::Home => HostKey::Home,
        V::End => HostKey::End,
        V::PageUp => HostKey::PageUp,
        V::PageDown => HostKey::PageDown,
        V::Up => HostKey::ArrowUp,
        V::Down => HostKey::ArrowDown,
        V::Left => HostKey::ArrowLeft,
        V::Right => HostKey::ArrowRight,
        V::Escape => HostKey::Escape,
        V::Pause => HostKey::Pause,
        V::Scroll => HostKey::ScrollLock,
        V::Capital => HostKey::CapsLock,
        V::F1 => HostKey::F1,
        V::F2 => HostKey::F2,
        V::F3 => HostKey::F3,
        V::F4 => HostKey::F4,
        V::F5 => HostKey::F5,
        V::F6 => HostKey::F6,
        V::F7 => HostKey::F7,
        V::F8 => HostKey::F8,
        V::F9 => HostKey::F9,
        V::F10 => HostKey::F10,
        V::F11 => HostKey::F11,
        V::F12 => HostKey::F12,
        V::LShift => HostKey::ShiftLeft,
        V::RShift => HostKey::ShiftRight,
        V::LControl => HostKey::ControlLeft,
        V::RControl => HostKey::ControlRight,
        V::LAlt => HostKey::AltLeft,
        V::RAlt => HostKey::AltRight,
        V::Numpad0 => HostKey::Numpad0,
        V::Numpad1 => HostKey::Numpad1,
        V::Numpad2 => HostKey::Numpad2,
        V::Numpad3 => HostKey::Numpad3,
        V::Numpad4 => HostKey::Numpad4,
        V::Numpad5 => HostKey::Numpad5,
        V::Numpad6 => HostKey::Numpad6,
        V::Numpad7 => HostKey::Numpad7,
        V::Numpad8 => HostKey::Numpad8,
        V::Numpad9 => HostKey::Numpad9,
        V::NumpadAdd => HostKey::NumpadAdd,
        V::NumpadSubtract => HostKey::NumpadSubtract,
        V::NumpadMultiply => HostKey::NumpadMultiply,
        V::NumpadDivide => HostKey::NumpadDivide,
        V::NumpadDecimal => HostKey::NumpadDecimal,
        V::NumpadEnter => HostKey::NumpadEnter,
        _ => return None
    })
}

/// Sends the winit keyboard input to the emulator session.
///
/// Returns `Ok(false)` if the input has no virtual key code or the key is not recognized.
pub fn send_keyboard_input(handle: &HostHandle, input: &KeyboardInput) -> Result<bool, SendEventError> {
    let key = input.virtual_keycode.and_then(map_virtual_key);
    let pressed = input.state == ElementState::Pressed;
    // platform dependent, only informative here as the modifiers are already sided
    let raw = RawKeyInfo::new(input.scancode as u16);
    super::send_key_event(handle, key, pressed, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_virtual_keys() {
        assert_eq!(map_virtual_key(VirtualKeyCode::Key0), Some(HostKey::Digit0));
        assert_eq!(map_virtual_key(VirtualKeyCode::Back), Some(HostKey::Backspace));
        assert_eq!(map_virtual_key(VirtualKeyCode::RControl), Some(HostKey::ControlRight));
        assert_eq!(map_virtual_key(VirtualKeyCode::LWin), None);
    }
}
