/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Running the emulator on its own thread.
use core::fmt;
use core::time::Duration;
use std::error;
use std::io;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::session::{HostHandle, Session};

/// The name of the thread spawned by [spawn_emulator].
pub const EMULATOR_THREAD_NAME: &str = "cbmhost-emulator";

/// The error returned by [EmulatorThread::stop].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownError {
    /// The emulator didn't finish in time. The thread has been left running detached.
    Timeout,
    /// The emulator body has panicked.
    Panicked,
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShutdownError::Timeout => "the emulator thread did not finish in time",
            ShutdownError::Panicked => "the emulator thread has panicked"
        })
    }
}

impl error::Error for ShutdownError {}

/// A running emulator thread.
///
/// Dropping the `EmulatorThread` requests the emulator to stop, but doesn't wait for it.
#[derive(Debug)]
pub struct EmulatorThread<T> {
    handle: HostHandle,
    join: Option<JoinHandle<()>>,
    done: Receiver<T>,
}

/// Spawns a thread running `body` with the `session`.
///
/// The `body` should return once [Session::is_running] reports `false`. The value it returns
/// is passed back by [EmulatorThread::stop].
pub fn spawn_emulator<H, T, F>(mut session: Session<H>, body: F) -> io::Result<EmulatorThread<T>>
    where H: Send + 'static,
          T: Send + 'static,
          F: FnOnce(&mut Session<H>) -> T + Send + 'static
{
    let handle = session.handle();
    let (done_tx, done) = sync_channel(1);
    let join = thread::Builder::new().name(EMULATOR_THREAD_NAME.into())
    .spawn(move || {
        info!("emulator started");
        let result = body(&mut session);
        info!("emulator finished");
        // the receiver is gone if the thread has been detached
        let _ = done_tx.send(result);
    })?;
    Ok(EmulatorThread { handle, join: Some(join), done })
}

impl<T> EmulatorThread<T> {
    /// Returns a new handle for the host UI context.
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }
    /// Returns `true` if the emulator body has returned or panicked.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |join| join.is_finished())
    }
    /// Requests the emulator to stop and waits up to `timeout` for the body to finish.
    ///
    /// On success returns the value returned by the body.
    ///
    /// # Errors
    /// [ShutdownError::Timeout] if the body didn't finish in time, e.g. because it's blocked
    /// waiting for the host input. The thread is detached in this instance.
    /// [ShutdownError::Panicked] if the body has panicked.
    pub fn stop(mut self, timeout: Duration) -> Result<T, ShutdownError> {
        self.handle.request_stop();
        match self.done.recv_timeout(timeout) {
            Ok(result) => {
                if let Some(join) = self.join.take() {
                    if join.join().is_err() {
                        return Err(ShutdownError::Panicked)
                    }
                }
                Ok(result)
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("emulator did not stop within {:?}, detaching", timeout);
                self.join = None;
                Err(ShutdownError::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => {
                if let Some(join) = self.join.take() {
                    let _ = join.join();
                }
                warn!("emulator panicked");
                Err(ShutdownError::Panicked)
            }
        }
    }
}

impl<T> Drop for EmulatorThread<T> {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.handle.request_stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use cbmhost_core::{HostKey, RawKeyInfo, ScanCode};
    use cbmhost_peripherals::console::TextScreen;
    use crate::config::SessionConfig;

    fn session() -> Session<TextScreen> {
        Session::new(TextScreen::default(), &SessionConfig::default())
    }

    #[test]
    fn stops_the_polling_loop() {
        let emu = spawn_emulator(session(), |session| {
            let mut polls = 0u32;
            let mut codes = [ScanCode::NO_KEY; 1];
            while session.is_running() {
                session.poll_keyboard(&mut codes);
                if codes[0] == ScanCode::A {
                    session.write_char(b'A', false);
                }
                polls += 1;
                thread::sleep(Duration::from_millis(1));
            }
            (polls, session.console().host.row_text(0).len() > 0)
        }).unwrap();
        let handle = emu.handle();
        handle.key_down(HostKey::KeyA, RawKeyInfo::default()).unwrap();
        thread::sleep(Duration::from_millis(20));
        assert!(!emu.is_finished());
        let (polls, printed) = emu.stop(Duration::from_secs(10)).unwrap();
        assert!(polls > 0);
        assert!(printed);
        assert!(!handle.is_running());
    }

    #[test]
    fn blocked_body_times_out() {
        let (release_tx, release_rx) = channel::<()>();
        let emu = spawn_emulator(session(), move |_session| {
            // blocked regardless of the run flag
            let _ = release_rx.recv();
        }).unwrap();
        assert_eq!(emu.stop(Duration::from_millis(50)), Err(ShutdownError::Timeout));
        release_tx.send(()).unwrap();
    }

    #[test]
    fn panicking_body() {
        let emu = spawn_emulator(session(), |_session| -> u8 {
            panic!("emulator crash");
        }).unwrap();
        assert_eq!(emu.stop(Duration::from_secs(10)), Err(ShutdownError::Panicked));
    }

    #[test]
    fn drop_requests_stop() {
        let session = session();
        let handle = session.handle();
        let emu = spawn_emulator(session, |session| {
            while session.is_running() {
                thread::sleep(Duration::from_millis(1));
            }
        }).unwrap();
        drop(emu);
        assert!(!handle.is_running());
        assert_eq!(ShutdownError::Timeout.to_string(), "the emulator thread did not finish in time");
    }
}
