/*
    test_snapshot: tests for the CBMHOST library.
    Copyright (C) 2024  CBMHOST contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.

    Author contact information: see Cargo.toml file, section [package.authors].
*/
//! Tests restoring the keyboard and console state from the serialized snapshots.
#![cfg(feature = "snapshot")]
use cbmhost::*;
use cbmhost::console::{CbmConsole, ConsoleConfig, ConsoleFlags, TextScreen};
use cbmhost::keyboard::ScanMatrix;

fn held_matrix() -> ScanMatrix {
    let mut matrix = ScanMatrix::default();
    let raw = RawKeyInfo::default();
    matrix.on_key_down(HostKey::ShiftRight, raw);
    matrix.on_key_down(HostKey::Quote, raw);
    matrix.on_key_down(HostKey::ArrowLeft, raw);
    matrix.on_key_down(HostKey::PageUp, raw);
    matrix
}

fn release_all_keys(matrix: &mut ScanMatrix) {
    let raw = RawKeyInfo::default();
    for &key in &[HostKey::PageUp, HostKey::Quote, HostKey::ArrowLeft, HostKey::ShiftRight] {
        matrix.on_key_up(key, raw);
    }
}

#[test]
fn test_matrix_bincode_snapshot() {
    let matrix = held_matrix();
    let data = bincode::serialize(&matrix).unwrap();
    let mut restored: ScanMatrix = bincode::deserialize(&data).unwrap();
    assert_eq!(restored.slots(), matrix.slots());
    assert_eq!(restored.modifiers(), matrix.modifiers());
    assert!(restored.is_restore_pressed());
    let mut raw = [0u16; 16];
    let mut raw_restored = [0u16; 16];
    matrix.encode(MachineModel::Vic20, &mut raw);
    restored.encode(MachineModel::Vic20, &mut raw_restored);
    assert_eq!(raw, raw_restored);
    // the held keys are released with the mappings resolved before the snapshot
    release_all_keys(&mut restored);
    assert!(restored.is_empty(), "{:?}", restored);
}

#[test]
fn test_console_json_snapshot() {
    let config = ConsoleConfig { suppress_first_clear: false, end_of_line: petscii::RETURN };
    let mut console = CbmConsole::new(TextScreen::default(), config);
    console.inject_text(b"RUN\r");
    console.write_output_byte(petscii::REVERSE_ON, false);
    console.write_output_byte(b'X', true);
    let json = serde_json::to_string(&console).unwrap();
    let mut restored: CbmConsole<TextScreen> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_reverse());
    assert!(restored.flags().contains(ConsoleFlags::SUPPRESS_NEXT_HOME));
    assert_eq!(restored.buffer().iter().collect::<Vec<_>>(), b"RUN\r");
    let read: Vec<u8> = (0..4).map(|_| restored.read_input_byte().unwrap()).collect();
    assert_eq!(read, b"RUN\r");
}

#[test]
fn test_session_config_formats() {
    let config: SessionConfig = serde_json::from_str(
        r#"{ "model": "Vic20", "console": { "suppressFirstClear": false } }"#).unwrap();
    assert_eq!(config.model, MachineModel::Vic20);
    assert!(!config.console.suppress_first_clear);
    assert_eq!(config.console.end_of_line, petscii::RETURN);
    let data = bincode::serialize(&config).unwrap();
    let config2: SessionConfig = bincode::deserialize(&data).unwrap();
    assert_eq!(config, config2);
}
