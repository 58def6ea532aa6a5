/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Host keyboard identities and the host modifier state.
use core::fmt;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use bitflags::bitflags;

use crate::bitflags_masks;
use crate::scan::ScanCode;

/// A physical host key, named after its position on a PC (US) keyboard.
///
/// Generic [HostKey::Shift], [HostKey::Control] and [HostKey::Alt] are reported by hosts that
/// don't distinguish sides in the key identity itself. They are resolved to the sided variants
/// with [HostKey::resolve] using the [RawKeyInfo] that came with the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
pub enum HostKey {
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Backquote,
    Comma,
    Period,
    Slash,
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Cancel,
    Pause,
    ScrollLock,
    CapsLock,
    Clear,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Shift,
    ShiftLeft,
    ShiftRight,
    Control,
    ControlLeft,
    ControlRight,
    Alt,
    AltLeft,
    AltRight,
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadDecimal,
    NumpadEnter,
}

/// Whether a key event is a press or a release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
pub enum KeyState {
    Pressed,
    Released
}

/// The raw, host specific information that accompanies a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
pub struct RawKeyInfo {
    /// The hardware (set 1) scan code of the key.
    pub scancode: u16,
    /// Set for keys with the extended (`0xE0`) prefix, e.g. the right `CTRL` and `ALT`.
    pub extended: bool,
    /// Set if the event is an auto-repeat of a key that is already down.
    pub repeat: bool,
}

/// The set 1 scan code of the right `SHIFT` key.
pub const RSHIFT_SCANCODE: u16 = 0x36;

bitflags! {
    /// The state of the host modifier keys.
    ///
    /// The `ANY_*` bits are maintained by [ModifierState::update] and the `u16` conversion:
    /// each one is set if and only if at least one of the corresponding sided bits is set.
    #[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "snapshot", serde(from = "u16", into = "u16"))]
    #[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct ModifierState: u16 {
        const ANY_SHIFT = 0b0_0000_0001;
        const ANY_CTRL  = 0b0_0000_0010;
        const ANY_ALT   = 0b0_0000_0100;
        const LSHIFT    = 0b0_0000_1000;
        const RSHIFT    = 0b0_0001_0000;
        const LCTRL     = 0b0_0010_0000;
        const RCTRL     = 0b0_0100_0000;
        const LALT      = 0b0_1000_0000;
        const RALT      = 0b1_0000_0000;
    }
}
bitflags_masks!(ModifierState {
    /// Both `SHIFT` keys.
    pub const SHIFT_MASK = LSHIFT|RSHIFT;
    /// Both `CTRL` keys.
    pub const CTRL_MASK  = LCTRL|RCTRL;
    /// Both `ALT` keys.
    pub const ALT_MASK   = LALT|RALT;
});

impl RawKeyInfo {
    /// Creates a new instance for a non-repeated, non-extended key.
    pub fn new(scancode: u16) -> Self {
        RawKeyInfo { scancode, ..Default::default() }
    }
    /// Returns a copy with the `repeat` flag set.
    pub fn repeated(self) -> Self {
        RawKeyInfo { repeat: true, ..self }
    }
    /// Returns a copy with the `extended` flag set.
    pub fn extended(self) -> Self {
        RawKeyInfo { extended: true, ..self }
    }
    /// Decodes the `lParam` of the Win32 `WM_KEYDOWN` / `WM_KEYUP` messages.
    ///
    /// * bits 16-23: the scan code,
    /// * bit 24: the extended key flag,
    /// * bit 30: the previous key state, which is 1 for auto-repeated key down messages.
    pub fn from_win32_lparam(lparam: u32) -> Self {
        RawKeyInfo {
            scancode: ((lparam >> 16) & 0xFF) as u16,
            extended: lparam & (1 << 24) != 0,
            repeat: lparam & (1 << 30) != 0,
        }
    }
}

impl HostKey {
    /// Resolves the generic modifier keys to their sided variants.
    ///
    /// Other keys are returned unchanged.
    pub fn resolve(self, raw: RawKeyInfo) -> HostKey {
        match self {
            HostKey::Shift if raw.scancode == RSHIFT_SCANCODE => HostKey::ShiftRight,
            HostKey::Shift => HostKey::ShiftLeft,
            HostKey::Control if raw.extended => HostKey::ControlRight,
            HostKey::Control => HostKey::ControlLeft,
            HostKey::Alt if raw.extended => HostKey::AltRight,
            HostKey::Alt => HostKey::AltLeft,
            key => key
        }
    }
    /// Returns the sided modifier bit of this key or an empty set if the key is not a sided
    /// modifier key.
    pub fn modifier(self) -> ModifierState {
        match self {
            HostKey::ShiftLeft    => ModifierState::LSHIFT,
            HostKey::ShiftRight   => ModifierState::RSHIFT,
            HostKey::ControlLeft  => ModifierState::LCTRL,
            HostKey::ControlRight => ModifierState::RCTRL,
            HostKey::AltLeft      => ModifierState::LALT,
            HostKey::AltRight     => ModifierState::RALT,
            _ => ModifierState::empty()
        }
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl ModifierState {
    /// Updates the state from a press or release of `key`.
    ///
    /// Returns `true` if `key` is a (resolved) modifier key.
    pub fn update(&mut self, key: HostKey, state: KeyState) -> bool {
        let side = key.modifier();
        if side.is_empty() {
            return false
        }
        self.set(side, state == KeyState::Pressed);
        self.update_any();
        true
    }

    fn update_any(&mut self) {
        self.set(ModifierState::ANY_SHIFT, self.intersects(ModifierState::SHIFT_MASK));
        self.set(ModifierState::ANY_CTRL, self.intersects(ModifierState::CTRL_MASK));
        self.set(ModifierState::ANY_ALT, self.intersects(ModifierState::ALT_MASK));
    }
    /// Returns `true` if any `SHIFT` key is being held.
    #[inline]
    pub fn is_shift(self) -> bool {
        self.contains(ModifierState::ANY_SHIFT)
    }
    /// Returns the matrix code of the held `SHIFT` key, preferring the left one.
    ///
    /// Returns `None` if no `SHIFT` key is being held.
    pub fn shift_code(self) -> Option<ScanCode> {
        if self.contains(ModifierState::LSHIFT) {
            Some(ScanCode::LSHIFT)
        }
        else if self.contains(ModifierState::RSHIFT) {
            Some(ScanCode::RSHIFT)
        }
        else {
            None
        }
    }
}

/// The `ANY_*` bits are rebuilt from the sided bits.
impl From<u16> for ModifierState {
    fn from(flags: u16) -> Self {
        let mut state = ModifierState::from_bits_truncate(flags);
        state.update_any();
        state
    }
}

impl From<ModifierState> for u16 {
    fn from(flags: ModifierState) -> Self {
        flags.bits()
    }
}
