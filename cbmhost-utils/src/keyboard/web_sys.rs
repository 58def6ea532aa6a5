/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Keyboard related functions to be used with [web-sys](https://crates.io/crates/web-sys).
//!
//! Requires "web-sys" feature to be enabled.
use web_sys::KeyboardEvent;
use cbmhost::{HostHandle, HostKey, SendEventError};

use super::{map_dom_code, send_dom_key_event};

/// Returns the host key identity of the `event`.
pub fn map_key_event(event: &KeyboardEvent) -> Option<HostKey> {
    map_dom_code(&event.code())
}

/// Sends a `keydown` or `keyup` event to the emulator session.
///
/// * `pressed` should be `true` for `keydown` and `false` for `keyup`.
///
/// Returns `Ok(false)` if the key is not recognized.
pub fn send_keyboard_event(
            handle: &HostHandle,
            event: &KeyboardEvent,
            pressed: bool
        ) -> Result<bool, SendEventError>
{
    send_dom_key_event(handle, &event.code(), pressed, event.repeat())
}
