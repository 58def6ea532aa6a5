/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    CBMHOST is free software: you can redistribute it and/or modify it under
    the terms of the GNU Lesser General Public License (LGPL) as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    CBMHOST is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Lesser General Public License for more details.

    You should have received a copy of the GNU Lesser General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.

    Author contact information: see Cargo.toml file, section [package.authors].
*/
//! CBMHOST connects an emulated Commodore 8-bit computer with the host's keyboard and
//! terminal.
//!
//! * [keyboard] translates the host key events into the Commodore keyboard matrix codes.
//! * [console] interprets the PETSCII characters printed by the emulated machine on a host
//!   terminal and feeds the host input lines back as keystrokes.
//! * [session] ties both together with a message passing handle for the host UI context.
//! * [thread] runs the emulator on its own thread with a bounded shutdown.
//!
//! ```no_run
//! use core::time::Duration;
//! use cbmhost::{MachineModel, Session, SessionConfig, spawn_emulator};
//!
//! let session = Session::stdio(&SessionConfig::new(MachineModel::C64));
//! let emu = spawn_emulator(session, |session| {
//!     for &byte in b"READY.\r" {
//!         session.write_char(byte, false);
//!     }
//!     while session.is_running() {
//!         match session.read_char() {
//!             Ok(byte) => session.write_char(byte, false),
//!             Err(_) => break
//!         }
//!     }
//! }).unwrap();
//! emu.handle().inject_text("PRINT 1\r").unwrap();
//! let _ = emu.stop(Duration::from_secs(1));
//! ```
pub mod config;
pub mod session;
pub mod thread;

pub use cbmhost_core::{flags, host, model, petscii, scan};
pub use cbmhost_core::{HostKey, KeyState, ModifierState, RawKeyInfo, MachineModel, KeyOverrides, ScanCode};
pub use cbmhost_peripherals::{console, keyboard};

pub use config::SessionConfig;
pub use session::{HostEvent, HostHandle, RunState, SendEventError, Session};
pub use thread::{spawn_emulator, EmulatorThread, ShutdownError};
