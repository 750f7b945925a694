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

//! The per-frame command list handed to a [`crate::RenderBackend`].
//!
//! A list is self-contained: resource creations to apply first, then one pass
//! per touched view in ascending id, then resource destructions. Everything a
//! draw needs is resolved into plain values, so a backend on another thread
//! never has to reach back into the sequencer.

use crate::draw::TextureBinding;
use crate::handle::{
    IndexBufferHandle, ProgramHandle, ShaderHandle, TextureHandle, UniformHandle,
    VertexBufferHandle,
};
use crate::resource::{ShaderStage, TextureDescriptor};
use crate::settings::{DebugFlags, ResetFlags};
use crate::state::{PrimitiveTopology, RenderState, StencilState};
use crate::uniform::UniformType;
use crate::vertex::VertexLayout;
use crate::view::{ClearFlags, Matrix4, Rect, ViewId, ViewMode};

/// A contiguous run of vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexRange {
    /// First vertex.
    pub start: u32,
    /// Number of vertices.
    pub count: u32,
}

/// A contiguous run of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRange {
    /// First index.
    pub start: u32,
    /// Number of indices.
    pub count: u32,
}

/// A uniform value snapshotted at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformUpload {
    /// Target uniform.
    pub handle: UniformHandle,
    /// Element type.
    pub ty: UniformType,
    /// Elements uploaded, already clamped to the array size.
    pub count: u16,
    /// `ty.size() * count` bytes.
    pub data: Vec<u8>,
}

/// The realized clear of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearCommand {
    /// Attachments to clear.
    pub flags: ClearFlags,
    /// Packed `0xRRGGBBAA`.
    pub rgba: u32,
    /// Depth clear value.
    pub depth: f32,
    /// Stencil clear value.
    pub stencil: u8,
}

/// A validated draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Submission index within the frame, across all views.
    pub sequence: u32,
    /// Sort depth passed to `submit`.
    pub depth: u32,
    /// Linked program.
    pub program: ProgramHandle,
    /// Packed pipeline state.
    pub state: RenderState,
    /// Constant blend color used by `BlendFactor::Factor`, `0xRRGGBBAA`.
    pub blend_factor: u32,
    /// Front-face stencil.
    pub stencil_front: StencilState,
    /// Back-face stencil; `NONE` mirrors the front face.
    pub stencil_back: StencilState,
    /// Model transform.
    pub transform: Matrix4,
    /// Bound vertex buffer, if any.
    pub vertex_buffer: Option<VertexBufferHandle>,
    /// Vertices to draw. Without a vertex buffer this is a bufferless draw.
    pub vertices: VertexRange,
    /// Bound index buffer and the range drawn from it.
    pub index_buffer: Option<(IndexBufferHandle, IndexRange)>,
    /// Instance count, at least 1.
    pub instances: u32,
    /// Texture bindings, ordered by stage.
    pub textures: Vec<TextureBinding>,
    /// Uniform values, one per handle.
    pub uniforms: Vec<UniformUpload>,
    /// Per-draw scissor overriding the view's.
    pub scissor: Option<Rect>,
}

impl DrawCommand {
    /// Vertices or indices the draw consumes per instance.
    pub fn element_count(&self) -> u32 {
        match self.index_buffer {
            Some((_, range)) => range.count,
            None => self.vertices.count,
        }
    }

    /// Primitives the draw produces, across all instances.
    pub fn primitive_count(&self) -> u64 {
        let topology = self
            .state
            .primitive_topology()
            .unwrap_or(PrimitiveTopology::Triangles);
        topology.primitive_count(self.element_count()) as u64 * self.instances as u64
    }
}

/// Everything executed for one view in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPass {
    /// View id.
    pub id: ViewId,
    /// Debug name.
    pub name: Option<String>,
    /// Viewport; empty means the whole back buffer.
    pub rect: Rect,
    /// Scissor; empty disables scissoring.
    pub scissor: Rect,
    /// View matrix.
    pub view: Matrix4,
    /// Projection matrix.
    pub projection: Matrix4,
    /// The ordering the draws were sorted with.
    pub mode: ViewMode,
    /// Clear executed before the draws.
    pub clear: Option<ClearCommand>,
    /// Draws in execution order.
    pub draws: Vec<DrawCommand>,
}

/// Resource lifetime changes recorded between two frames.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceCommand {
    /// Compile a shader binary.
    CreateShader {
        /// New handle.
        handle: ShaderHandle,
        /// Stage read from the binary header.
        stage: ShaderStage,
        /// The binary.
        code: Vec<u8>,
    },
    /// Link a program.
    CreateProgram {
        /// New handle.
        handle: ProgramHandle,
        /// Vertex stage.
        vertex: ShaderHandle,
        /// Fragment stage.
        fragment: ShaderHandle,
    },
    /// Upload an immutable vertex buffer.
    CreateVertexBuffer {
        /// New handle.
        handle: VertexBufferHandle,
        /// Vertex layout of `data`.
        layout: VertexLayout,
        /// Vertex data.
        data: Vec<u8>,
    },
    /// Upload an immutable index buffer.
    CreateIndexBuffer {
        /// New handle.
        handle: IndexBufferHandle,
        /// 32-bit indices instead of 16-bit.
        index32: bool,
        /// Index data.
        data: Vec<u8>,
    },
    /// Create a texture, optionally with initial contents.
    CreateTexture {
        /// New handle.
        handle: TextureHandle,
        /// Dimensions and format.
        descriptor: TextureDescriptor,
        /// Initial texel data.
        data: Option<Vec<u8>>,
    },
    /// Declare a uniform.
    CreateUniform {
        /// New handle.
        handle: UniformHandle,
        /// Shader-visible name.
        name: String,
        /// Element type.
        ty: UniformType,
        /// Array size.
        num: u16,
    },
    /// Release a shader.
    DestroyShader(ShaderHandle),
    /// Release a program.
    DestroyProgram(ProgramHandle),
    /// Release a vertex buffer.
    DestroyVertexBuffer(VertexBufferHandle),
    /// Release an index buffer.
    DestroyIndexBuffer(IndexBufferHandle),
    /// Release a texture.
    DestroyTexture(TextureHandle),
    /// Release a uniform.
    DestroyUniform(UniformHandle),
}

impl ResourceCommand {
    /// Returns `true` for the `Destroy*` variants.
    pub fn is_destroy(&self) -> bool {
        matches!(
            self,
            ResourceCommand::DestroyShader(_)
                | ResourceCommand::DestroyProgram(_)
                | ResourceCommand::DestroyVertexBuffer(_)
                | ResourceCommand::DestroyIndexBuffer(_)
                | ResourceCommand::DestroyTexture(_)
                | ResourceCommand::DestroyUniform(_)
        )
    }
}

/// One frame's worth of work.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandList {
    /// The frame number `frame()` returned for this list.
    pub frame_number: u32,
    /// Back-buffer width.
    pub width: u32,
    /// Back-buffer height.
    pub height: u32,
    /// Back-buffer options.
    pub reset: ResetFlags,
    /// Debug aids.
    pub debug: DebugFlags,
    /// Creations, applied before any view.
    pub pre: Vec<ResourceCommand>,
    /// Touched views, ascending id.
    pub views: Vec<ViewPass>,
    /// Destructions, applied after every view.
    pub post: Vec<ResourceCommand>,
}

impl CommandList {
    /// Total draw calls across views.
    pub fn draw_count(&self) -> usize {
        self.views.iter().map(|v| v.draws.len()).sum()
    }

    /// Total clears across views.
    pub fn clear_count(&self) -> usize {
        self.views.iter().filter(|v| v.clear.is_some()).count()
    }
}
