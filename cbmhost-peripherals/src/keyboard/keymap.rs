/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use cbmhost_core::{HostKey, KeyOverrides, ModifierState, ScanCode};

/// A matrix code together with the extra effects of a host key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
pub struct KeyMapping {
    pub code: ScanCode,
    pub overrides: KeyOverrides,
}

/// A single entry of the host to matrix key map.
///
/// The entry matches if the `key` is the one being pressed or released and all of the
/// `modifiers` bits are present in the current host modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyMapEntry {
    pub modifiers: ModifierState,
    pub key: HostKey,
    pub mapping: KeyMapping,
}

impl KeyMapping {
    pub const fn new(code: ScanCode, overrides: KeyOverrides) -> Self {
        KeyMapping { code, overrides }
    }
}

impl KeyMapEntry {
    #[inline]
    pub fn matches(&self, key: HostKey, modifiers: ModifierState) -> bool {
        self.key == key && modifiers.contains(self.modifiers)
    }
}

/// Returns the mapping of the first entry of the `keymap` matching `key` and `modifiers`.
pub fn find_mapping(keymap: &[KeyMapEntry], key: HostKey, modifiers: ModifierState) -> Option<KeyMapping> {
    keymap.iter().find(|entry| entry.matches(key, modifiers)).map(|entry| entry.mapping)
}

macro_rules! key_modifiers {
    (_) => { ModifierState::empty() };
    (SHIFT) => { ModifierState::ANY_SHIFT };
}

macro_rules! key_map {
    ($($mods:tt $key:ident => $code:ident $(+ $flag:ident)*;)*) => {
        &[$(
            KeyMapEntry {
                modifiers: key_modifiers!($mods),
                key: HostKey::$key,
                mapping: KeyMapping::new(
                    ScanCode::$code,
                    KeyOverrides::empty()$(.union(KeyOverrides::$flag))*
                )
            }
        ),*]
    };
}

/// The default map of the PC (US) keyboard layout to the Commodore 128 keyboard.
///
/// The unshifted host keys are mostly mapped to the Commodore keys at the same position.
/// The shifted punctuation is mapped to the Commodore key combination producing the same
/// character, e.g. `SHIFT`+`'` produces `SHIFT`+`2` (`"`) and `SHIFT`+`8` produces the
/// unshifted `*`. The shift gated entries precede the unconditional ones for the same key.
///
/// * `F2`, `F4`, `F6` and `F8` are the shifted `F1`, `F3`, `F5` and `F7`.
/// * `INSERT` is the shifted `INST/DEL`.
/// * `ESC` and `CANCEL` are `RUN/STOP`.
/// * `TAB` is `CTRL` and `CTRL` is `C=`.
/// * `PAGE UP` is `RESTORE`.
/// * `[`, `]`, `\`, `` ` `` and their shifted counterparts produce graphic glyphs via `C=`.
/// * The numeric keypad and `ALT` are the extra C128 keys.
pub static DEFAULT_KEY_MAP: &[KeyMapEntry] = key_map! {
    _     Enter => RETURN;
    _     Backspace => BACKSPACE;
    _     Delete => BACKSPACE;
    _     Insert => BACKSPACE + FORCE_SHIFT;
    _     ArrowRight => RIGHT;
    _     F7 => F7;
    _     F8 => F7 + FORCE_SHIFT;
    _     F1 => F1;
    _     F2 => F1 + FORCE_SHIFT;
    _     F3 => F3;
    _     F4 => F3 + FORCE_SHIFT;
    _     F5 => F5;
    _     F6 => F5 + FORCE_SHIFT;
    _     ArrowDown => DOWN;
    _     Digit3 => N3;
    _     KeyW => W;
    _     KeyA => A;
    _     Digit4 => N4;
    _     KeyZ => Z;
    _     KeyS => S;
    _     KeyE => E;
    _     ShiftLeft => LSHIFT;
    _     Digit5 => N5;
    _     KeyR => R;
    _     KeyD => D;
    SHIFT Digit6 => UPARROW + FORCE_NO_SHIFT;
    _     Digit6 => N6;
    _     KeyC => C;
    _     KeyF => F;
    _     KeyT => T;
    _     KeyX => X;
    SHIFT Digit7 => N6;
    _     Digit7 => N7;
    SHIFT Quote => N2;
    _     Quote => N7 + FORCE_SHIFT;
    _     KeyY => Y;
    _     KeyG => G;
    SHIFT Digit8 => ASTERISK + FORCE_NO_SHIFT;
    _     Digit8 => N8;
    _     KeyB => B;
    _     KeyH => H;
    _     KeyU => U;
    _     KeyV => V;
    SHIFT Digit9 => N8;
    _     Digit9 => N9;
    _     KeyI => I;
    _     KeyJ => J;
    SHIFT Digit0 => N9;
    _     Digit0 => N0;
    _     KeyM => M;
    _     KeyK => K;
    _     KeyO => O;
    _     KeyN => N;
    SHIFT Equal => PLUS + FORCE_NO_SHIFT;
    _     Equal => EQUALS;
    _     KeyP => P;
    _     KeyL => L;
    SHIFT Minus => LTARROW + FORCE_NO_SHIFT;
    _     Minus => MINUS;
    _     Period => PERIOD;
    SHIFT BracketLeft => Q + FORCE_COMMODORE + FORCE_NO_SHIFT;
    _     BracketLeft => COLON + FORCE_SHIFT;
    _     Comma => COMMA;
    SHIFT Backslash => MINUS + FORCE_COMMODORE + FORCE_NO_SHIFT;
    _     Backslash => POUND;
    SHIFT Semicolon => COLON + FORCE_NO_SHIFT;
    _     Semicolon => SEMICOLON;
    SHIFT BracketRight => W + FORCE_COMMODORE + FORCE_NO_SHIFT;
    _     BracketRight => SEMICOLON + FORCE_SHIFT;
    _     Home => HOME;
    _     ShiftRight => RSHIFT;
    _     Slash => SLASH;
    _     Digit1 => N1;
    _     Tab => CTRL;
    SHIFT Digit2 => AT + FORCE_NO_SHIFT;
    _     Digit2 => N2;
    _     Space => SPACE;
    _     ControlLeft => COMMODORE;
    _     ControlRight => COMMODORE;
    _     KeyQ => Q;
    _     Cancel => STOP;
    _     Escape => STOP;
    _     Numpad8 => NUM_8;
    _     Numpad5 => NUM_5;
    _     Numpad2 => NUM_2;
    _     Numpad4 => NUM_4;
    _     Numpad7 => NUM_7;
    _     Numpad1 => NUM_1;
    _     NumpadAdd => NUM_PLUS;
    _     NumpadSubtract => NUM_MINUS;
    _     NumpadDivide => SLASH;
    _     NumpadMultiply => ASTERISK;
    _     NumpadEnter => ENTER;
    _     Numpad6 => NUM_6;
    _     Numpad9 => NUM_9;
    _     Numpad3 => NUM_3;
    _     AltLeft => ALT;
    _     AltRight => ALT;
    _     Numpad0 => NUM_0;
    _     NumpadDecimal => NUM_DECIMAL;
    _     ArrowUp => CURSOR_UP + FORCE_SHIFT;
    _     ArrowLeft => CURSOR_LEFT + FORCE_SHIFT;
    _     ScrollLock => NO_SCROLL;
    _     Pause => NO_SCROLL;
    _     PageUp => NO_KEY + RESTORE;
    SHIFT Backquote => E + FORCE_COMMODORE + FORCE_NO_SHIFT;
    _     Backquote => R + FORCE_COMMODORE;
    _     Clear => EQUALS;
};
