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
//! The core types of the CBMHOST library.
//!
//! Everything here is plain data shared by the keyboard matrix emulator, the console
//! interpreter and the host adapters: Commodore scan codes, host key identities, the host
//! modifier state, PETSCII control bytes and the emulated machine model.
pub mod flags;
pub mod host;
pub mod model;
pub mod petscii;
pub mod scan;

pub use host::{HostKey, KeyState, ModifierState, RawKeyInfo};
pub use model::MachineModel;
pub use scan::{KeyOverrides, ScanCode};
