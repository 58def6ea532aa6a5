/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! The emulator session and the host side handle.
//!
//! The [Session] is owned by the context running the emulated machine. All of the keyboard
//! and console state lives there. The host UI context sends key events and text injections
//! through a [HostHandle]. The pending events are applied by the session before each keyboard
//! poll and before each input read, so the state is only ever touched by its owner.
use core::fmt;
use std::error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender, Receiver, SendError, TryRecvError};

use log::{debug, info, trace};

use cbmhost_core::{HostKey, KeyState, MachineModel, RawKeyInfo, ScanCode};
use cbmhost_peripherals::console::{CbmConsole, ConsoleError, HostConsole, StdioConsole};
use cbmhost_peripherals::keyboard::ScanMatrix;

use crate::config::SessionConfig;

/// An event sent from the host UI context to the [Session].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A key was pressed or released.
    Key { key: HostKey, state: KeyState, raw: RawKeyInfo },
    /// A text to be typed into the emulated machine.
    Inject(Vec<u8>),
}

/// The error returned by [HostHandle] methods when the [Session] has been dropped.
#[derive(Debug, Clone)]
pub struct SendEventError;

impl fmt::Display for SendEventError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "the emulator session has been terminated")
    }
}

impl error::Error for SendEventError {}

impl<T> From<SendError<T>> for SendEventError {
    fn from(_error: SendError<T>) -> Self {
        SendEventError
    }
}

/// A shared flag indicating if the emulator should keep running.
#[derive(Clone, Debug)]
pub struct RunState(Arc<AtomicBool>);

impl Default for RunState {
    fn default() -> Self {
        RunState(Arc::new(AtomicBool::new(true)))
    }
}

impl RunState {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
    /// Requests the emulator to stop. The request can't be withdrawn.
    #[inline]
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A cloneable handle for the host UI context to deliver events to the [Session].
///
/// None of the methods block.
#[derive(Clone, Debug)]
pub struct HostHandle {
    tx: Sender<HostEvent>,
    run: RunState,
}

impl HostHandle {
    /// Sends a key press event.
    pub fn key_down(&self, key: HostKey, raw: RawKeyInfo) -> Result<(), SendEventError> {
        self.key_event(key, KeyState::Pressed, raw)
    }
    /// Sends a key release event.
    pub fn key_up(&self, key: HostKey, raw: RawKeyInfo) -> Result<(), SendEventError> {
        self.key_event(key, KeyState::Released, raw)
    }
    /// Sends a key event.
    pub fn key_event(&self, key: HostKey, state: KeyState, raw: RawKeyInfo) -> Result<(), SendEventError> {
        self.send(HostEvent::Key { key, state, raw })
    }
    /// Sends a text to be typed into the emulated machine.
    ///
    /// The text is queued when the session next reads or polls. Whatever doesn't fit into the
    /// keystroke buffer at that moment is dropped.
    pub fn inject_text<T: Into<Vec<u8>>>(&self, text: T) -> Result<(), SendEventError> {
        self.send(HostEvent::Inject(text.into()))
    }
    /// Sends an event.
    pub fn send(&self, event: HostEvent) -> Result<(), SendEventError> {
        self.tx.send(event)?;
        Ok(())
    }
    /// Requests the emulator to stop.
    pub fn request_stop(&self) {
        info!("stop requested");
        self.run.stop();
    }
    /// Returns `false` once the stop has been requested.
    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }
}

/// The emulator side of the host I/O: the keyboard matrix, the console and the event queue.
///
/// The emulated machine's engine calls [Session::write_char] for each character printed,
/// [Session::read_char] when it expects a keystroke and [Session::poll_keyboard] or
/// [Session::poll_keyboard_raw] when it scans the keyboard.
pub struct Session<H> {
    model: MachineModel,
    matrix: ScanMatrix,
    console: CbmConsole<H>,
    tx: Sender<HostEvent>,
    rx: Receiver<HostEvent>,
    run: RunState,
}

impl<H: fmt::Debug> fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("model", &self.model)
            .field("matrix", &self.matrix)
            .field("console", &self.console)
            .field("running", &self.run.is_running())
            .finish()
    }
}

impl Session<StdioConsole> {
    /// Creates a session on the process standard output and input.
    pub fn stdio(config: &SessionConfig) -> Self {
        Session::new(StdioConsole::stdio(), config)
    }
}

impl<H> Session<H> {
    pub fn new(host: H, config: &SessionConfig) -> Self {
        let (tx, rx) = channel();
        Session {
            model: config.model,
            matrix: ScanMatrix::default(),
            console: CbmConsole::new(host, config.console),
            tx,
            rx,
            run: RunState::default()
        }
    }
    /// Returns a new handle for the host UI context.
    pub fn handle(&self) -> HostHandle {
        HostHandle { tx: self.tx.clone(), run: self.run.clone() }
    }
    /// Returns `false` once the stop has been requested.
    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn model(&self) -> MachineModel {
        self.model
    }
    /// Changes the emulated model and releases all keys.
    pub fn set_model(&mut self, model: MachineModel) {
        if model != self.model {
            info!("model changed to {}", model);
            self.model = model;
            self.matrix.release_all();
        }
    }

    pub fn matrix(&self) -> &ScanMatrix {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut ScanMatrix {
        &mut self.matrix
    }

    pub fn console(&self) -> &CbmConsole<H> {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut CbmConsole<H> {
        &mut self.console
    }
    /// Applies all of the pending host events.
    ///
    /// Returns the number of events applied.
    pub fn process_events(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                // the session holds a sender itself
                Err(TryRecvError::Disconnected) => break
            }
        }
        if count != 0 {
            trace!("applied {} host events", count);
        }
        count
    }
    /// Fills `out` with the matrix codes after applying the pending host events.
    pub fn poll_keyboard(&mut self, out: &mut [ScanCode]) {
        self.process_events();
        self.matrix.snapshot(out);
    }
    /// Fills `out` with the matrix codes translated to the raw codes of the emulated model
    /// after applying the pending host events.
    pub fn poll_keyboard_raw(&mut self, out: &mut [u16]) {
        self.process_events();
        self.matrix.encode(self.model, out);
    }

    fn apply(&mut self, event: HostEvent) {
        match event {
            HostEvent::Key { key, state, raw } => {
                self.matrix.on_key_event(key, state, raw);
            }
            HostEvent::Inject(text) => {
                let count = self.console.inject_text(&text);
                debug!("injected {} of {} bytes", count, text.len());
            }
        }
    }
}

impl<H: HostConsole> Session<H> {
    /// Prints a character of the emulated machine on the host console.
    pub fn write_char(&mut self, byte: u8, suppress_next_home: bool) {
        self.console.write_output_byte(byte, suppress_next_home);
    }
    /// Returns the next keystroke for the emulated machine after applying the pending host
    /// events.
    ///
    /// Blocks reading a line from the host console if no keystrokes are queued.
    pub fn read_char(&mut self) -> Result<u8, ConsoleError> {
        self.process_events();
        self.console.read_input_byte()
    }
}
