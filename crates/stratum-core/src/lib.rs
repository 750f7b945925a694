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

//! # Stratum Core
//!
//! Render-state encoding and submission bookkeeping for a view-based,
//! draw-call oriented rendering API.
//!
//! The crate is organised leaves first:
//!
//! - **[`state`]**: the packed [`RenderState`] and [`StencilState`] words and the
//!   blend function composer.
//! - **[`uniform`]**: the named uniform binding table.
//! - **[`view`]** and **[`draw`]**: per-view configuration and the explicit
//!   draw-call accumulator.
//! - **[`context`]**: the submission sequencer that turns views and draw calls
//!   into one [`CommandList`] per frame and hands it to a [`RenderBackend`].
//!
//! Rasterization itself is out of scope; it happens behind the
//! [`RenderBackend`] contract.

#![warn(missing_docs)]

pub mod bitflags;
pub mod backend;
pub mod command;
pub mod context;
pub mod diagnostics;
pub mod draw;
pub mod error;
pub mod handle;
pub mod resource;
pub mod settings;
pub mod state;
pub mod stats;
pub mod uniform;
pub mod vertex;
pub mod view;

pub use backend::{BackendCaps, RenderBackend};
pub use command::{
    ClearCommand, CommandList, DrawCommand, IndexRange, ResourceCommand, UniformUpload,
    VertexRange, ViewPass,
};
pub use context::Context;
pub use diagnostics::{Diagnostic, DiagnosticBus, DiagnosticKind};
pub use draw::{DrawCall, TextureBinding};
pub use error::{RenderError, ResourceError};
pub use handle::{
    IndexBufferHandle, ProgramHandle, ShaderHandle, TextureHandle, UniformHandle,
    VertexBufferHandle,
};
pub use resource::{ShaderStage, TextureDescriptor, TextureFormat};
pub use settings::{BackendKind, DebugFlags, Limits, ResetFlags, Settings};
pub use state::{
    BlendEquation, BlendFactor, CompareFunction, CullMode, PrimitiveTopology, RenderState,
    StencilOperation, StencilState,
};
pub use stats::RenderStats;
pub use uniform::{UniformInfo, UniformType};
pub use vertex::{Attrib, AttribType, VertexAttribute, VertexLayout, VertexLayoutBuilder};
pub use view::{ClearFlags, Matrix4, Rect, ViewId, ViewMode, ViewState};
