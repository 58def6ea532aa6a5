/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;

use arrayvec::ArrayVec;
use log::{debug, trace};

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use cbmhost_core::{
    HostKey, KeyOverrides, KeyState, MachineModel, ModifierState, RawKeyInfo, ScanCode
};

use super::keymap::{find_mapping, KeyMapEntry, KeyMapping, DEFAULT_KEY_MAP};

/// The number of matrix slots.
pub const MATRIX_SLOTS: usize = 16;
/// The index of the slot reserved for the synthesized `SHIFT` or `C=` key.
pub const RESERVED_SLOT: usize = MATRIX_SLOTS - 1;
/// The maximum number of host keys for which the key down mapping is remembered.
pub const MAX_HELD_KEYS: usize = 32;

/// A host key being held with the mapping resolved when it was pressed.
///
/// Records what the key down actually changed, so the key up reverts exactly that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
pub struct HeldKey {
    pub key: HostKey,
    pub mapping: KeyMapping,
    /// The mapped code is asserted on behalf of this key.
    pub owns_code: bool,
    /// The mapping overrides were applied by the key down.
    pub applied: bool,
    /// The shift code removed from the first slot by [KeyOverrides::FORCE_NO_SHIFT].
    pub suppressed: Option<ScanCode>,
}

impl HeldKey {
    /// Returns the code this key synthesizes in the reserved slot.
    fn reserved_code(&self) -> Option<ScanCode> {
        let overrides = self.mapping.overrides;
        if !self.applied {
            None
        }
        else if overrides.contains(KeyOverrides::FORCE_COMMODORE) {
            Some(ScanCode::COMMODORE)
        }
        else if overrides.contains(KeyOverrides::FORCE_SHIFT) {
            Some(ScanCode::LSHIFT)
        }
        else {
            None
        }
    }
}

/// The keyboard scan matrix emulator.
///
/// Translates host key events to a short list of Commodore 128 matrix codes being held,
/// which is what the keyboard scan routine of the emulated machine reads.
///
/// The list has [MATRIX_SLOTS] slots. Every code appears at most once in the slots below
/// [RESERVED_SLOT]. The reserved slot holds a `SHIFT` or a `C=` synthesized by a key
/// mapping with [KeyOverrides::FORCE_SHIFT] or [KeyOverrides::FORCE_COMMODORE]. When more
/// such keys are held, the most recently pressed one decides. Empty slots hold
/// [ScanCode::NO_KEY].
///
/// Pressing and then releasing a key leaves the slots as they were before the press, as long
/// as no more than [MAX_HELD_KEYS] keys are being held.
#[derive(Clone)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
pub struct ScanMatrix {
    slots: [ScanCode; MATRIX_SLOTS],
    restore: bool,
    modifiers: ModifierState,
    held: ArrayVec<HeldKey, MAX_HELD_KEYS>,
    #[cfg_attr(feature = "snapshot", serde(skip, default = "default_keymap"))]
    keymap: &'static [KeyMapEntry],
}

#[cfg(feature = "snapshot")]
fn default_keymap() -> &'static [KeyMapEntry] {
    DEFAULT_KEY_MAP
}

impl Default for ScanMatrix {
    fn default() -> Self {
        ScanMatrix::with_keymap(DEFAULT_KEY_MAP)
    }
}

impl fmt::Debug for ScanMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanMatrix")
            .field("slots", &self.slots)
            .field("restore", &self.restore)
            .field("modifiers", &self.modifiers)
            .field("held", &self.held.len())
            .finish()
    }
}

impl ScanMatrix {
    /// Creates a new instance with a custom host key map.
    pub fn with_keymap(keymap: &'static [KeyMapEntry]) -> Self {
        ScanMatrix {
            slots: [ScanCode::NO_KEY; MATRIX_SLOTS],
            restore: false,
            modifiers: ModifierState::empty(),
            held: ArrayVec::new(),
            keymap
        }
    }
    /// Replaces the host key map.
    pub fn set_keymap(&mut self, keymap: &'static [KeyMapEntry]) {
        self.keymap = keymap;
    }
    /// Returns the current state of the host modifier keys.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }
    /// Returns `true` if the `RESTORE` key is being held.
    pub fn is_restore_pressed(&self) -> bool {
        self.restore
    }
    /// Returns a reference to the matrix slots.
    pub fn slots(&self) -> &[ScanCode; MATRIX_SLOTS] {
        &self.slots
    }
    /// Returns `true` if no matrix code nor `RESTORE` is being asserted.
    pub fn is_empty(&self) -> bool {
        !self.restore && self.slots.iter().all(|code| code.is_no_key())
    }
    /// Resolves `key` against the key map and the current modifier state.
    pub fn lookup(&self, key: HostKey) -> Option<KeyMapping> {
        find_mapping(self.keymap, key, self.modifiers)
    }
    /// Handles a host key press.
    ///
    /// Auto-repeated presses are ignored. The generic `SHIFT`, `CTRL` and `ALT` keys are
    /// resolved to their left or right variants using `raw`.
    ///
    /// Returns `true` if the key was found in the key map.
    pub fn on_key_down(&mut self, key: HostKey, raw: RawKeyInfo) -> bool {
        if raw.repeat {
            return false
        }
        let key = key.resolve(raw);
        let found = if self.held.iter().any(|held| held.key == key) {
            // a press without the repeat flag
            true
        }
        else if let Some(mapping) = self.lookup(key) {
            let held = self.press(key, mapping);
            if self.held.try_push(held).is_err() {
                debug!("too many keys held, {} will be resolved again on release", key);
            }
            true
        }
        else {
            trace!("key down: {} is not mapped", key);
            false
        };
        self.modifiers.update(key, KeyState::Pressed);
        found
    }
    /// Handles a host key release.
    ///
    /// Releases the mapping that was resolved when the key was pressed. If there is no such
    /// mapping the key is resolved anew against the current modifier state.
    ///
    /// Returns `true` if a mapping for the key was found.
    pub fn on_key_up(&mut self, key: HostKey, raw: RawKeyInfo) -> bool {
        let key = key.resolve(raw);
        let found = if let Some(index) = self.held.iter().position(|held| held.key == key) {
            let held = self.held.remove(index);
            self.release(held);
            true
        }
        else if let Some(mapping) = self.lookup(key) {
            self.release_unremembered(mapping);
            true
        }
        else {
            trace!("key up: {} is not mapped", key);
            false
        };
        self.modifiers.update(key, KeyState::Released);
        found
    }
    /// Handles a host key event.
    pub fn on_key_event(&mut self, key: HostKey, state: KeyState, raw: RawKeyInfo) -> bool {
        match state {
            KeyState::Pressed => self.on_key_down(key, raw),
            KeyState::Released => self.on_key_up(key, raw)
        }
    }
    /// Releases all keys and resets the modifier state.
    pub fn release_all(&mut self) {
        self.slots = [ScanCode::NO_KEY; MATRIX_SLOTS];
        self.restore = false;
        self.modifiers = ModifierState::empty();
        self.held.clear();
    }
    /// Copies the matrix codes into `out`.
    ///
    /// Slots beyond [MATRIX_SLOTS] are filled with [ScanCode::NO_KEY].
    pub fn snapshot(&self, out: &mut [ScanCode]) {
        for (index, target) in out.iter_mut().enumerate() {
            *target = self.slots.get(index).copied().unwrap_or(ScanCode::NO_KEY);
        }
    }
    /// Copies the matrix codes into `out` translated to the raw codes of the `model`.
    ///
    /// If `RESTORE` is being held, the [RESTORE_FLAG][cbmhost_core::scan::RESTORE_FLAG] is
    /// added to the first empty slot. Slots beyond [MATRIX_SLOTS] are filled with the
    /// model's "no key" code.
    pub fn encode(&self, model: MachineModel, out: &mut [u16]) {
        let mut restore = self.restore;
        for (index, target) in out.iter_mut().enumerate() {
            *target = match self.slots.get(index) {
                Some(&code) => {
                    let flag = restore && code.is_no_key();
                    if flag {
                        restore = false;
                    }
                    model.encode(code, flag)
                }
                None => model.no_key()
            };
        }
    }

    fn contains(&self, code: ScanCode) -> bool {
        self.slots[..RESERVED_SLOT].contains(&code)
    }

    fn insert(&mut self, code: ScanCode) -> bool {
        match self.slots[..RESERVED_SLOT].iter_mut().find(|slot| slot.is_no_key()) {
            Some(slot) => {
                *slot = code;
                true
            }
            None => false
        }
    }

    fn remove(&mut self, code: ScanCode) {
        if let Some(slot) = self.slots[..RESERVED_SLOT].iter_mut().find(|slot| **slot == code) {
            *slot = ScanCode::NO_KEY;
        }
    }

    fn press(&mut self, key: HostKey, mapping: KeyMapping) -> HeldKey {
        let KeyMapping { code, overrides } = mapping;
        let mut held = HeldKey { key, mapping, owns_code: false, applied: false, suppressed: None };
        if !code.is_no_key() {
            if self.contains(code) {
                return held
            }
            if !self.insert(code) {
                debug!("matrix full, dropped: {}", code);
                return held
            }
            held.owns_code = true;
        }
        held.applied = true;
        if overrides.contains(KeyOverrides::FORCE_SHIFT) {
            self.slots[RESERVED_SLOT] = ScanCode::LSHIFT;
        }
        if overrides.contains(KeyOverrides::FORCE_NO_SHIFT) && self.slots[0].is_shift() {
            held.suppressed = Some(self.slots[0]);
            self.slots[0] = ScanCode::NO_KEY;
        }
        if overrides.contains(KeyOverrides::FORCE_COMMODORE) {
            self.slots[RESERVED_SLOT] = ScanCode::COMMODORE;
        }
        if overrides.contains(KeyOverrides::RESTORE) {
            self.restore = true;
        }
        held
    }
    /// Reverts the key down of a key that has been already removed from the held keys.
    fn release(&mut self, held: HeldKey) {
        let KeyMapping { code, overrides } = held.mapping;
        if held.owns_code && !self.pass_code(code) {
            self.remove(code);
        }
        if held.applied {
            if overrides.intersects(KeyOverrides::FORCE_SHIFT|KeyOverrides::FORCE_COMMODORE) {
                self.update_reserved();
            }
            if overrides.contains(KeyOverrides::RESTORE) {
                self.update_restore();
            }
            if let Some(shift) = held.suppressed {
                self.unsuppress(shift);
            }
        }
    }
    /// Releases a key whose key down wasn't remembered.
    fn release_unremembered(&mut self, KeyMapping { code, overrides }: KeyMapping) {
        let owned = self.held.iter().any(|held| held.owns_code && held.mapping.code == code);
        let released = !code.is_no_key() && !owned && self.contains(code);
        if released {
            self.remove(code);
        }
        if overrides.intersects(KeyOverrides::FORCE_SHIFT|KeyOverrides::FORCE_COMMODORE) {
            self.update_reserved();
        }
        if overrides.contains(KeyOverrides::RESTORE) {
            self.update_restore();
        }
        if released && overrides.contains(KeyOverrides::FORCE_NO_SHIFT) {
            if let Some(shift) = self.modifiers.shift_code() {
                if !self.contains(shift) && !self.insert(shift) {
                    debug!("matrix full, dropped: {}", shift);
                }
            }
        }
    }
    /// Hands the asserted `code` over to another held key mapped to it.
    ///
    /// Returns `false` if there is no such key.
    fn pass_code(&mut self, code: ScanCode) -> bool {
        if !self.contains(code) {
            return false
        }
        match self.held.iter_mut().find(|held| !held.owns_code && held.mapping.code == code) {
            Some(held) => {
                held.owns_code = true;
                true
            }
            None => false
        }
    }
    /// Puts back the shift code removed by a key down, if its key is still being held.
    fn unsuppress(&mut self, shift: ScanCode) {
        let owner = match self.held.iter().position(|held| held.mapping.code == shift) {
            Some(index) => index,
            None => return
        };
        if self.contains(shift) {
            return
        }
        if self.insert(shift) {
            self.held[owner].owns_code = true;
        }
        else {
            debug!("matrix full, dropped: {}", shift);
        }
    }

    fn update_reserved(&mut self) {
        self.slots[RESERVED_SLOT] = self.held.iter().rev()
                                        .find_map(HeldKey::reserved_code)
                                        .unwrap_or(ScanCode::NO_KEY);
    }

    fn update_restore(&mut self) {
        self.restore = self.held.iter().any(|held|
            held.applied && held.mapping.overrides.contains(KeyOverrides::RESTORE)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::SmallRng;

    fn down(matrix: &mut ScanMatrix, key: HostKey) -> bool {
        matrix.on_key_down(key, RawKeyInfo::default())
    }

    fn up(matrix: &mut ScanMatrix, key: HostKey) -> bool {
        matrix.on_key_up(key, RawKeyInfo::default())
    }

    fn codes(matrix: &ScanMatrix) -> Vec<ScanCode> {
        let mut out = [ScanCode::default(); MATRIX_SLOTS];
        matrix.snapshot(&mut out);
        out.to_vec()
    }

    fn expect(slots: &[(usize, ScanCode)]) -> Vec<ScanCode> {
        let mut out = vec![ScanCode::NO_KEY; MATRIX_SLOTS];
        for &(index, code) in slots {
            out[index] = code;
        }
        out
    }

    #[test]
    fn press_and_release_letter() {
        let mut matrix = ScanMatrix::default();
        assert!(matrix.is_empty());
        assert!(down(&mut matrix, HostKey::KeyA));
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::A)]));
        assert!(up(&mut matrix, HostKey::KeyA));
        assert!(matrix.is_empty());
    }

    #[test]
    fn repeated_presses_are_ignored() {
        let mut matrix = ScanMatrix::default();
        assert!(!matrix.on_key_down(HostKey::KeyQ, RawKeyInfo::default().repeated()));
        assert!(matrix.is_empty());
        down(&mut matrix, HostKey::KeyQ);
        down(&mut matrix, HostKey::KeyQ);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::Q)]));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut matrix = ScanMatrix::default();
        assert!(!down(&mut matrix, HostKey::F12));
        assert!(!up(&mut matrix, HostKey::F12));
        assert!(matrix.is_empty());
    }

    #[test]
    fn codes_fill_the_first_empty_slot() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::KeyA);
        down(&mut matrix, HostKey::KeyB);
        down(&mut matrix, HostKey::KeyC);
        up(&mut matrix, HostKey::KeyA);
        assert_eq!(codes(&matrix), expect(&[(1, ScanCode::B), (2, ScanCode::C)]));
        down(&mut matrix, HostKey::KeyD);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::D), (1, ScanCode::B), (2, ScanCode::C)]));
    }

    #[test]
    fn same_code_is_stored_once() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::Backspace);
        down(&mut matrix, HostKey::Delete);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::BACKSPACE)]));
        // the overrides of an already present code are not applied
        down(&mut matrix, HostKey::Insert);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::BACKSPACE)]));
    }

    #[test]
    fn full_matrix_drops_presses() {
        use HostKey::*;
        let mut matrix = ScanMatrix::default();
        let keys = [KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH,
                    KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO];
        for &key in keys.iter() {
            down(&mut matrix, key);
        }
        assert!(matrix.slots()[..RESERVED_SLOT].iter().all(|c| !c.is_no_key()));
        down(&mut matrix, KeyP);
        assert!(!matrix.slots()[..RESERVED_SLOT].contains(&ScanCode::P));
        down(&mut matrix, Insert);
        assert!(matrix.slots()[RESERVED_SLOT].is_no_key());
        up(&mut matrix, KeyA);
        down(&mut matrix, KeyQ);
        assert_eq!(matrix.slots()[0], ScanCode::Q);
    }

    #[test]
    fn force_shift_uses_reserved_slot() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::F2);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::F1), (RESERVED_SLOT, ScanCode::LSHIFT)]));
        up(&mut matrix, HostKey::F2);
        assert!(matrix.is_empty());
    }

    #[test]
    fn force_commodore_uses_reserved_slot() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::Backquote);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::R), (RESERVED_SLOT, ScanCode::COMMODORE)]));
        up(&mut matrix, HostKey::Backquote);
        assert!(matrix.is_empty());
    }

    #[test]
    fn force_no_shift_suppresses_and_restores_shift() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ShiftLeft);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::LSHIFT)]));
        assert!(matrix.modifiers().contains(ModifierState::ANY_SHIFT|ModifierState::LSHIFT));
        // shift + 8 is the unshifted asterisk
        down(&mut matrix, HostKey::Digit8);
        assert_eq!(codes(&matrix), expect(&[(1, ScanCode::ASTERISK)]));
        up(&mut matrix, HostKey::Digit8);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::LSHIFT)]));
        up(&mut matrix, HostKey::ShiftLeft);
        assert!(matrix.is_empty());
        assert!(matrix.modifiers().is_empty());
    }

    #[test]
    fn force_no_shift_restores_right_shift() {
        let mut matrix = ScanMatrix::default();
        matrix.on_key_down(HostKey::Shift, RawKeyInfo::new(0x36));
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::RSHIFT)]));
        down(&mut matrix, HostKey::Digit2);
        assert_eq!(codes(&matrix), expect(&[(1, ScanCode::AT)]));
        up(&mut matrix, HostKey::Digit2);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::RSHIFT)]));
        matrix.on_key_up(HostKey::Shift, RawKeyInfo::new(0x36));
        assert!(matrix.is_empty());
    }

    #[test]
    fn shift_is_not_restored_twice() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::KeyA);
        down(&mut matrix, HostKey::ShiftLeft);
        // the shift is not in the first slot so it stays
        down(&mut matrix, HostKey::Digit6);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::A), (1, ScanCode::LSHIFT),
                                            (2, ScanCode::UPARROW)]));
        up(&mut matrix, HostKey::Digit6);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::A), (1, ScanCode::LSHIFT)]));
    }

    #[test]
    fn shift_gated_key_released_after_shift() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ShiftLeft);
        down(&mut matrix, HostKey::Digit7);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::LSHIFT), (1, ScanCode::N6)]));
        up(&mut matrix, HostKey::ShiftLeft);
        // the key is released with the mapping chosen on the key down
        up(&mut matrix, HostKey::Digit7);
        assert!(matrix.is_empty());
    }

    #[test]
    fn modifier_sides_are_tracked() {
        let mut matrix = ScanMatrix::default();
        matrix.on_key_down(HostKey::Shift, RawKeyInfo::new(0x2A));
        matrix.on_key_down(HostKey::Shift, RawKeyInfo::new(0x36));
        matrix.on_key_down(HostKey::Control, RawKeyInfo::new(0x1D).extended());
        matrix.on_key_down(HostKey::Alt, RawKeyInfo::new(0x38));
        assert_eq!(matrix.modifiers(), ModifierState::ANY_SHIFT|ModifierState::SHIFT_MASK|
                                       ModifierState::ANY_CTRL|ModifierState::RCTRL|
                                       ModifierState::ANY_ALT|ModifierState::LALT);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::LSHIFT), (1, ScanCode::RSHIFT),
                                            (2, ScanCode::COMMODORE), (3, ScanCode::ALT)]));
        matrix.on_key_up(HostKey::Shift, RawKeyInfo::new(0x2A));
        assert!(matrix.modifiers().contains(ModifierState::ANY_SHIFT|ModifierState::RSHIFT));
        assert!(!matrix.modifiers().contains(ModifierState::LSHIFT));
        matrix.on_key_up(HostKey::Shift, RawKeyInfo::new(0x36));
        assert!(!matrix.modifiers().intersects(ModifierState::ANY_SHIFT|ModifierState::SHIFT_MASK));
        assert_eq!(matrix.modifiers(), ModifierState::ANY_CTRL|ModifierState::RCTRL|
                                       ModifierState::ANY_ALT|ModifierState::LALT);
    }

    #[test]
    fn restore_line() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::KeyA);
        down(&mut matrix, HostKey::PageUp);
        assert!(matrix.is_restore_pressed());
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::A)]));
        let mut raw = [0u16; 18];
        matrix.encode(MachineModel::C128, &mut raw);
        assert_eq!(&raw[..3], &[10, 0x458, 88]);
        assert_eq!(&raw[16..], &[88, 88]);
        matrix.encode(MachineModel::C64, &mut raw);
        assert_eq!(&raw[..3], &[10, 0x440, 64]);
        assert_eq!(&raw[16..], &[64, 64]);
        up(&mut matrix, HostKey::PageUp);
        assert!(!matrix.is_restore_pressed());
        matrix.encode(MachineModel::C64, &mut raw);
        assert_eq!(&raw[..2], &[10, 64]);
    }

    #[test]
    fn encode_translates_extended_keys() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ArrowUp);
        let mut raw = [0u16; MATRIX_SLOTS];
        matrix.encode(MachineModel::C64, &mut raw);
        // cursor up on the C64 is shift + cursor down
        assert_eq!(raw[0], u16::from(ScanCode::DOWN));
        assert_eq!(raw[RESERVED_SLOT], u16::from(ScanCode::LSHIFT));
        matrix.encode(MachineModel::Vic20, &mut raw);
        assert_eq!(raw[RESERVED_SLOT], 25);
        matrix.encode(MachineModel::C128, &mut raw);
        assert_eq!(raw[0], u16::from(ScanCode::CURSOR_UP));
    }

    #[test]
    fn snapshot_of_any_length() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::KeyZ);
        down(&mut matrix, HostKey::KeyX);
        let mut short = [ScanCode::default(); 1];
        matrix.snapshot(&mut short);
        assert_eq!(short, [ScanCode::Z]);
        let mut long = [ScanCode::A; 20];
        matrix.snapshot(&mut long);
        assert_eq!(&long[..2], &[ScanCode::Z, ScanCode::X]);
        assert!(long[2..].iter().all(|c| c.is_no_key()));
        matrix.snapshot(&mut []);
    }

    #[test]
    fn release_all_clears_everything() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ShiftLeft);
        down(&mut matrix, HostKey::F4);
        down(&mut matrix, HostKey::PageUp);
        matrix.release_all();
        assert!(matrix.is_empty());
        assert!(matrix.modifiers().is_empty());
        assert!(down(&mut matrix, HostKey::Digit6));
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::N6)]));
    }

    #[test]
    fn random_key_sequences_release_cleanly() {
        use HostKey::*;
        const KEYS: &[HostKey] = &[
            KeyA, KeyQ, Digit2, Digit6, Digit7, Digit8, Quote, Backquote, Backslash,
            BracketLeft, BracketRight, Equal, Minus, Semicolon, Insert, Delete, Backspace,
            F2, F8, ArrowUp, ArrowLeft, ArrowDown, PageUp, Numpad5, NumpadEnter, Tab,
            ShiftLeft, ShiftRight, ControlLeft, AltRight
        ];
        let mut rng = SmallRng::seed_from_u64(0xC64);
        let mut matrix = ScanMatrix::default();
        for _ in 0..500 {
            let mut held: Vec<HostKey> = Vec::new();
            for _ in 0..rng.gen_range(1..40) {
                let key = *KEYS.choose(&mut rng).unwrap();
                if let Some(index) = held.iter().position(|&k| k == key) {
                    if rng.gen_bool(0.5) {
                        held.swap_remove(index);
                        up(&mut matrix, key);
                    }
                }
                else {
                    held.push(key);
                    down(&mut matrix, key);
                }
                let slots = &matrix.slots()[..RESERVED_SLOT];
                for (i, code) in slots.iter().enumerate() {
                    assert!(code.is_no_key() || !slots[i + 1..].contains(code), "{:?}", slots);
                }
                let reserved = matrix.slots()[RESERVED_SLOT];
                assert!(reserved.is_no_key() || reserved == ScanCode::LSHIFT ||
                        reserved == ScanCode::COMMODORE);
            }
            held.shuffle(&mut rng);
            for key in held {
                up(&mut matrix, key);
            }
            assert!(matrix.is_empty(), "{:?}", matrix);
            assert!(matrix.modifiers().is_empty());
        }
    }

    #[test]
    fn shared_code_stays_with_the_held_key() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::Backspace);
        down(&mut matrix, HostKey::Insert);
        up(&mut matrix, HostKey::Insert);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::BACKSPACE)]));
        // the code is handed over to the other key mapped to it
        down(&mut matrix, HostKey::Delete);
        up(&mut matrix, HostKey::Backspace);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::BACKSPACE)]));
        up(&mut matrix, HostKey::Delete);
        assert!(matrix.is_empty());
    }

    #[test]
    fn force_no_shift_restores_the_suppressed_shift() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ShiftRight);
        down(&mut matrix, HostKey::ShiftLeft);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::RSHIFT), (1, ScanCode::LSHIFT)]));
        down(&mut matrix, HostKey::Digit8);
        assert_eq!(codes(&matrix), expect(&[(1, ScanCode::LSHIFT), (2, ScanCode::ASTERISK)]));
        up(&mut matrix, HostKey::Digit8);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::RSHIFT), (1, ScanCode::LSHIFT)]));
        up(&mut matrix, HostKey::ShiftRight);
        up(&mut matrix, HostKey::ShiftLeft);
        assert!(matrix.is_empty());
    }

    #[test]
    fn suppressed_shift_is_not_restored_after_its_release() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ShiftLeft);
        down(&mut matrix, HostKey::Digit8);
        up(&mut matrix, HostKey::ShiftLeft);
        assert_eq!(codes(&matrix), expect(&[(1, ScanCode::ASTERISK)]));
        up(&mut matrix, HostKey::Digit8);
        assert!(matrix.is_empty());
    }

    #[test]
    fn reserved_slot_follows_the_latest_held_key() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::Backquote);
        down(&mut matrix, HostKey::F2);
        assert_eq!(matrix.slots()[RESERVED_SLOT], ScanCode::LSHIFT);
        up(&mut matrix, HostKey::F2);
        assert_eq!(codes(&matrix), expect(&[(0, ScanCode::R), (RESERVED_SLOT, ScanCode::COMMODORE)]));
        // released out of order
        down(&mut matrix, HostKey::F2);
        up(&mut matrix, HostKey::Backquote);
        assert_eq!(codes(&matrix), expect(&[(1, ScanCode::F1), (RESERVED_SLOT, ScanCode::LSHIFT)]));
        up(&mut matrix, HostKey::F2);
        assert!(matrix.is_empty());
    }

    #[test]
    fn restore_stays_while_held() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::PageUp);
        up(&mut matrix, HostKey::KeyA);
        assert!(matrix.is_restore_pressed());
        up(&mut matrix, HostKey::PageUp);
        assert!(!matrix.is_restore_pressed());
    }

    #[test]
    fn press_and_release_restores_the_matrix() {
        use HostKey::*;
        const KEYS: &[HostKey] = &[
            KeyA, KeyQ, KeyR, Digit2, Digit6, Digit7, Digit8, Quote, Backquote, Backslash,
            BracketLeft, Equal, Semicolon, Insert, Delete, Backspace, F2, F8, ArrowUp,
            ArrowLeft, PageUp, Numpad5, Tab, ShiftLeft, ShiftRight, ControlLeft, AltRight
        ];
        let mut rng = SmallRng::seed_from_u64(0x128);
        for _ in 0..500 {
            let mut matrix = ScanMatrix::default();
            let mut held: Vec<HostKey> = Vec::new();
            for _ in 0..rng.gen_range(0..20) {
                let key = *KEYS.choose(&mut rng).unwrap();
                if !held.contains(&key) {
                    held.push(key);
                    down(&mut matrix, key);
                }
            }
            let slots = *matrix.slots();
            let restore = matrix.is_restore_pressed();
            let modifiers = matrix.modifiers();
            for &key in KEYS.iter().filter(|key| !held.contains(key)) {
                down(&mut matrix, key);
                up(&mut matrix, key);
                assert_eq!(*matrix.slots(), slots, "{} after {:?}", key, held);
                assert_eq!(matrix.is_restore_pressed(), restore);
                assert_eq!(matrix.modifiers(), modifiers);
            }
        }
    }

    #[cfg(feature = "snapshot")]
    #[test]
    fn matrix_serde() {
        let mut matrix = ScanMatrix::default();
        down(&mut matrix, HostKey::ShiftLeft);
        down(&mut matrix, HostKey::Digit7);
        let json = serde_json::to_string(&matrix).unwrap();
        let mut matrix2: ScanMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(matrix2.slots(), matrix.slots());
        assert_eq!(matrix2.modifiers(), matrix.modifiers());
        up(&mut matrix2, HostKey::ShiftLeft);
        up(&mut matrix2, HostKey::Digit7);
        assert!(matrix2.is_empty());
    }
}
