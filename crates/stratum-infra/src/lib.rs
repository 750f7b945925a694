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

//! # Stratum Infra
//!
//! Concrete [`RenderBackend`] implementations for the Stratum sequencer.
//!
//! - [`ImmediateBackend`] executes each list synchronously inside `frame()`.
//! - [`ThreadedBackend`] runs any other backend on a submission thread.

#![warn(missing_docs)]

pub mod immediate;
mod mirror;
pub mod threaded;

pub use immediate::{FrameObserver, ImmediateBackend};
pub use mirror::ResourceMirror;
pub use threaded::ThreadedBackend;

use stratum_core::{BackendKind, RenderBackend};

/// Builds the backend selected by [`BackendKind`].
pub fn create_backend(kind: BackendKind) -> Box<dyn RenderBackend> {
    match kind {
        BackendKind::Immediate => Box::new(ImmediateBackend::new()),
        BackendKind::Threaded => Box::new(ThreadedBackend::new(ImmediateBackend::new())),
    }
}
