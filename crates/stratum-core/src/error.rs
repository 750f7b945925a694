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

//! Defines the error types of the sequencer and its backends.
//!
//! Only [`crate::Context::init`] and backend calls return these directly. Everything
//! recorded through the context reports failures as diagnostics instead, using
//! [`RenderError::diagnostic_kind`] / [`ResourceError::diagnostic_kind`] to classify them.

use crate::diagnostics::DiagnosticKind;
use std::fmt;

/// An error related to creating, resolving or updating a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The handle is the invalid sentinel, was destroyed, or never existed.
    InvalidHandle {
        /// The kind of resource the handle refers to.
        kind: &'static str,
    },
    /// The pool for this resource kind is full.
    PoolExhausted {
        /// The kind of resource.
        kind: &'static str,
        /// The configured maximum.
        capacity: usize,
    },
    /// The shader binary or program link was rejected.
    InvalidShader(String),
    /// Texture dimensions or data were rejected.
    TextureCreation(String),
    /// Buffer data does not match its layout or index width.
    LayoutMismatch(String),
    /// A draw range reaches past the end of its buffer.
    RangeOutOfBounds {
        /// The kind of buffer.
        kind: &'static str,
        /// One past the last element the range touches.
        end: u64,
        /// Elements in the buffer.
        len: u32,
    },
    /// Data shorter than the element count requires.
    OutOfBounds {
        /// Bytes required.
        required: usize,
        /// Bytes supplied.
        supplied: usize,
    },
}

impl ResourceError {
    /// How this error is reported on the diagnostics channel.
    pub const fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            ResourceError::InvalidShader(_) => DiagnosticKind::InvalidShader,
            ResourceError::TextureCreation(_) => DiagnosticKind::UnableToCreateTexture,
            _ => DiagnosticKind::DebugCheck,
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidHandle { kind } => {
                write!(f, "Invalid or destroyed {kind} handle.")
            }
            ResourceError::PoolExhausted { kind, capacity } => {
                write!(f, "Cannot create more than {capacity} {kind} handles.")
            }
            ResourceError::InvalidShader(msg) => write!(f, "Invalid shader: {msg}"),
            ResourceError::TextureCreation(msg) => {
                write!(f, "Unable to create texture: {msg}")
            }
            ResourceError::LayoutMismatch(msg) => write!(f, "Layout mismatch: {msg}"),
            ResourceError::RangeOutOfBounds { kind, end, len } => {
                write!(f, "Range ends at {end} but the {kind} holds {len} elements.")
            }
            ResourceError::OutOfBounds { required, supplied } => {
                write!(
                    f,
                    "Data out of bounds: {required} bytes required, {supplied} supplied."
                )
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error raised by initialization or by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The backend failed to initialize.
    InitializationFailed(String),
    /// The backend capabilities are below the configured limits.
    MinimumSpecsUnmet(String),
    /// A resource operation failed inside the backend.
    ResourceError(ResourceError),
    /// The graphics device was lost. Unrecoverable.
    DeviceLost,
    /// The submission thread is gone.
    BackendDisconnected,
    /// An unexpected internal error.
    Internal(String),
}

impl RenderError {
    /// How this error is reported on the diagnostics channel.
    pub const fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            RenderError::InitializationFailed(_) => DiagnosticKind::UnableToInitialize,
            RenderError::MinimumSpecsUnmet(_) => DiagnosticKind::MinimumSpecsUnmet,
            RenderError::ResourceError(err) => err.diagnostic_kind(),
            RenderError::DeviceLost | RenderError::BackendDisconnected => {
                DiagnosticKind::DeviceLost
            }
            RenderError::Internal(_) => DiagnosticKind::DebugCheck,
        }
    }

    /// Returns `true` if rendering cannot continue after this error.
    pub const fn is_fatal(&self) -> bool {
        self.diagnostic_kind().is_fatal()
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize rendering backend: {msg}")
            }
            RenderError::MinimumSpecsUnmet(msg) => {
                write!(f, "Backend does not meet minimum specs: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Resource operation failed: {err}")
            }
            RenderError::DeviceLost => write!(
                f,
                "The graphics device was lost and needs to be reinitialized."
            ),
            RenderError::BackendDisconnected => {
                write!(f, "The submission thread has stopped.")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}
