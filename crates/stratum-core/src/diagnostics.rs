// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The error/diagnostic channel.
//!
//! Failures that the native API reports through a callback surface here as
//! [`Diagnostic`] events on a [`flume`] channel. Publishing never blocks and
//! never waits for acknowledgement; the application drains the receiver when it
//! wants to. Only [`DiagnosticKind::DeviceLost`] is fatal.

use std::fmt;

/// Classification of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A non-fatal check failed (bad handle, missing program, range overflow...).
    /// Execution continues; the offending call is ignored.
    DebugCheck,
    /// The backend does not meet the configured minimum capabilities.
    MinimumSpecsUnmet,
    /// The backend failed to initialize.
    UnableToInitialize,
    /// Texture creation failed; the creation returned the invalid handle.
    UnableToCreateTexture,
    /// Shader or program creation failed; the creation returned the invalid handle.
    InvalidShader,
    /// The device is gone. The caller must tear down.
    DeviceLost,
}

impl DiagnosticKind {
    /// Returns `true` for failures the caller must treat as terminal.
    pub const fn is_fatal(self) -> bool {
        matches!(self, DiagnosticKind::DeviceLost)
    }
}

/// One reported failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Human-readable details.
    pub message: String,
    /// The frame being recorded when the failure was reported.
    pub frame: u32,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[frame {}] {:?}: {}", self.frame, self.kind, self.message)
    }
}

/// Fire-and-forget channel carrying [`Diagnostic`]s from the sequencer to the application.
#[derive(Debug)]
pub struct DiagnosticBus {
    sender: flume::Sender<Diagnostic>,
    receiver: flume::Receiver<Diagnostic>,
}

impl DiagnosticBus {
    /// Creates a bus backed by an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Logs and publishes a diagnostic.
    pub fn publish(&self, kind: DiagnosticKind, frame: u32, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
            frame,
        };

        if kind.is_fatal() {
            log::error!("{diagnostic}");
        } else {
            log::warn!("{diagnostic}");
        }

        if let Err(e) = self.sender.send(diagnostic) {
            log::error!("Failed to publish diagnostic: {e}. Receiver dropped.");
        }
    }

    /// A sender that other threads can publish through.
    pub fn sender(&self) -> flume::Sender<Diagnostic> {
        self.sender.clone()
    }

    /// The receiving end, for the application to poll.
    pub fn receiver(&self) -> &flume::Receiver<Diagnostic> {
        &self.receiver
    }

    /// Takes every pending diagnostic without blocking.
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.receiver.try_iter().collect()
    }
}

impl Default for DiagnosticBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;
    use std::thread;

    #[test]
    fn publish_then_drain_keeps_order() {
        let bus = DiagnosticBus::new();
        bus.publish(DiagnosticKind::DebugCheck, 1, "first");
        bus.publish(DiagnosticKind::InvalidShader, 1, "second");

        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].kind, DiagnosticKind::InvalidShader);
        assert_eq!(bus.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn only_device_lost_is_fatal() {
        assert!(DiagnosticKind::DeviceLost.is_fatal());
        assert!(!DiagnosticKind::DebugCheck.is_fatal());
        assert!(!DiagnosticKind::UnableToCreateTexture.is_fatal());
    }

    #[test]
    fn sender_works_from_another_thread() {
        let bus = DiagnosticBus::new();
        let sender = bus.sender();
        thread::spawn(move || {
            sender
                .send(Diagnostic {
                    kind: DiagnosticKind::DeviceLost,
                    message: "gone".into(),
                    frame: 9,
                })
                .expect("receiver alive");
        })
        .join()
        .expect("thread panicked");

        let received = bus.drain();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].to_string(), "[frame 9] DeviceLost: gone");
    }

    #[test]
    fn publish_after_receiver_drop_does_not_panic() {
        let bus = DiagnosticBus::new();
        let sender = bus.sender();
        drop(bus);
        assert!(sender
            .send(Diagnostic {
                kind: DiagnosticKind::DebugCheck,
                message: String::new(),
                frame: 0,
            })
            .is_err());
    }
}
