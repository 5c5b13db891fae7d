//! Event handling for the TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Text was pasted (from bracketed paste mode).
    Paste(String),
}

/// Handles events from the terminal.
pub struct EventHandler {
    /// Sender for events.
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a sender for injecting events.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Start the terminal event pump on a blocking thread.
    ///
    /// The pump checks its stop flag between polls and never reads an event
    /// once stopped, so input typed after [`EventLoopHandle::stop`] stays in
    /// the terminal.
    pub fn start(&self) -> EventLoopHandle {
        let sender = self.sender.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);
        let handle = tokio::task::spawn_blocking(move || {
            let poll_rate = Duration::from_millis(50);

            loop {
                if stopped.load(Ordering::Acquire) || sender.is_closed() {
                    break;
                }
                match event::poll(poll_rate) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        tracing::warn!("Event poll failed, stopping pump: {}", e);
                        break;
                    }
                }
                if stopped.load(Ordering::Acquire) {
                    break;
                }

                let forwarded = match event::read() {
                    // Windows reports releases too; act on presses only.
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        sender.send(Event::Key(key))
                    }
                    Ok(CrosstermEvent::Mouse(mouse)) => sender.send(Event::Mouse(mouse)),
                    Ok(CrosstermEvent::Resize(w, h)) => sender.send(Event::Resize(w, h)),
                    Ok(CrosstermEvent::Paste(text)) => {
                        tracing::debug!("Paste received: {} bytes", text.len());
                        sender.send(Event::Paste(text))
                    }
                    Ok(_) => Ok(()),
                    Err(e) => {
                        tracing::warn!("Error reading event: {}", e);
                        Ok(())
                    }
                };

                if forwarded.is_err() {
                    break;
                }
            }
        });

        EventLoopHandle { handle, stop }
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the event pump task.
pub struct EventLoopHandle {
    handle: tokio::task::JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

impl EventLoopHandle {
    /// Stop the event pump and wait for its thread to finish.
    pub async fn stop(self) {
        self.stop.store(true, Ordering::Release);
        if let Err(e) = self.handle.await {
            tracing::warn!("Event pump ended abnormally: {}", e);
        }
    }
}

/// Check if a key event is Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
