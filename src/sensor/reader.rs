//! # Background Poll Loop
//!
//! [`SensorReader`] owns the serial port on a dedicated thread. The thread
//! keeps framing and parsing incoming lines; every time the poll delay elapses
//! it posts the last good [`Reading`] into a mailbox of size one:
//!
//! ```text
//! ┌──────────────┐  bytes   ┌──────────────┐  Reading  ┌───────────┐
//! │ Serial port  │ ───────► │ Poll thread  │ ────────► │ Mailbox   │ ──► UI thread
//! │ (9600 8N1)   │          │ LineBuffer + │  every    │ (cap. 1,  │
//! └──────────────┘          │ SensorState  │  delay    │ newest)   │
//!                           └──────────────┘           └───────────┘
//! ```
//!
//! The posted reading is not necessarily fresh: if the device went quiet the
//! previous values are posted again. Nothing is posted until temperature,
//! humidity and pressure have all been non-zero at least once. When the UI
//! falls behind, an unread reading is replaced by the newer one.
//!
//! Stopping clears the running flag; the loop notices within one read timeout,
//! exits, and dropping the source closes the port. An I/O error other than a
//! timeout ends the loop and is kept for [`SensorReader::last_error`].

use crate::config::PollDelay;
use crate::constants::SERIAL_READ_TIMEOUT_MS;
use crate::logger::log;
use crate::sensor::ports::open_port;
use crate::sensor::{LineBuffer, Reading, SensorState};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Anything the poll loop can read sensor bytes from
pub type ByteSource = Box<dyn Read + Send>;

/// Opens the byte source for a port name
///
/// The serial implementation is [`SerialOpener`]; tests substitute scripted
/// sources.
pub trait SourceOpener {
    fn open(&self, port: &str) -> io::Result<ByteSource>;
}

pub struct SerialOpener;

impl SourceOpener for SerialOpener {
    fn open(&self, port: &str) -> io::Result<ByteSource> {
        let port = open_port(port)?;
        Ok(Box::new(port))
    }
}

/// Single-slot channel where a new value displaces an unread one
#[derive(Clone)]
struct Mailbox {
    tx: Sender<Reading>,
    rx: Receiver<Reading>,
}

impl Mailbox {
    fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    fn post(&self, reading: Reading) {
        match self.tx.try_send(reading) {
            Ok(()) => {}
            Err(TrySendError::Full(reading)) => {
                let _ = self.rx.try_recv();
                let _ = self.tx.try_send(reading);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

pub struct SensorReader {
    port: String,
    thread: Option<thread::JoinHandle<()>>,
    running: Arc<AtomicBool>,
    mailbox: Receiver<Reading>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl SensorReader {
    /// Open `port` with the given opener and start polling it
    pub fn open(opener: &dyn SourceOpener, port: &str, delay: PollDelay) -> io::Result<Self> {
        let source = opener.open(port)?;
        Ok(Self::spawn(port, source, delay))
    }

    /// Start the poll thread on an already opened source
    pub fn spawn(port: &str, source: ByteSource, delay: PollDelay) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let last_error = Arc::new(Mutex::new(None));
        let mailbox = Mailbox::new();
        let receiver = mailbox.rx.clone();

        let running_clone = running.clone();
        let last_error_clone = last_error.clone();
        let port_clone = port.to_string();
        let interval = delay.as_duration();

        log::info!("Starting sensor reader on {} every {:?}", port, interval);
        let thread = thread::spawn(move || {
            let outcome = poll_loop(source, interval, &running_clone, &mailbox);
            if let Err(e) = outcome {
                log::warn!("Sensor reader on {} stopped: {}", port_clone, e);
                if let Ok(mut slot) = last_error_clone.lock() {
                    *slot = Some(e.to_string());
                }
            } else {
                log::info!("Sensor reader on {} stopped", port_clone);
            }
            running_clone.store(false, Ordering::Relaxed);
        });

        Self {
            port: port.to_string(),
            thread: Some(thread),
            running,
            mailbox: receiver,
            last_error,
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Take the pending reading, if the thread posted one since the last call
    pub fn try_recv(&self) -> Option<Reading> {
        self.mailbox.try_recv().ok()
    }

    /// Whether the poll thread is still alive
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Error that ended the poll loop, if any
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    /// Ask the thread to exit and wait for it. Closes the port.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("Sensor reader thread on {} panicked", self.port);
            }
        }
    }
}

impl Drop for SensorReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(
    mut source: ByteSource,
    interval: Duration,
    running: &AtomicBool,
    mailbox: &Mailbox,
) -> io::Result<()> {
    let mut state = SensorState::new();
    let mut lines = LineBuffer::new();
    let mut chunk = [0u8; 256];
    let mut next_emit = Instant::now() + interval;

    while running.load(Ordering::Relaxed) {
        match source.read(&mut chunk) {
            Ok(0) => thread::sleep(Duration::from_millis(SERIAL_READ_TIMEOUT_MS)),
            Ok(n) => {
                lines.extend(&chunk[..n]);
                while let Some(line) = lines.next_line() {
                    state.apply_line(&line);
                }
            }
            Err(e) if is_idle(&e) => {}
            Err(e) => return Err(e),
        }

        if Instant::now() >= next_emit {
            if let Some(reading) = state.publishable() {
                log::debug!("Posting reading {}", reading);
                mailbox.post(reading);
            }
            next_emit = Instant::now() + interval;
        }
    }
    Ok(())
}

/// Errors that only mean "nothing arrived yet"
fn is_idle(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_keeps_only_newest() {
        let mailbox = Mailbox::new();
        mailbox.post(Reading::new(1.0, 1.0, 1.0));
        mailbox.post(Reading::new(2.0, 2.0, 2.0));
        assert_eq!(mailbox.rx.try_recv().unwrap(), Reading::new(2.0, 2.0, 2.0));
        assert!(mailbox.rx.try_recv().is_err());
    }

    #[test]
    fn timeouts_are_idle() {
        assert!(is_idle(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_idle(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }
}
