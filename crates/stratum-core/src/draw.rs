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

//! The draw-call accumulator.
//!
//! A [`DrawCall`] collects everything one draw needs and is consumed by
//! [`crate::Context::submit`]. Nothing is validated here; handles, ranges and
//! uniform sizes are checked at submit, where failures become diagnostics.

use crate::handle::{
    IndexBufferHandle, ProgramHandle, TextureHandle, UniformHandle, VertexBufferHandle,
};
use crate::state::{RenderState, StencilState};
use crate::view::{Matrix4, Rect};

/// A texture bound to a sampler stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    /// Sampler stage.
    pub stage: u8,
    /// The `Int1` uniform naming the sampler in the shader.
    pub sampler: UniformHandle,
    /// Bound texture.
    pub texture: TextureHandle,
    /// Opaque sampler flags; 0 uses the texture's own.
    pub flags: u32,
}

/// Pending uniform value set on a draw call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingUniform {
    pub handle: UniformHandle,
    pub count: u16,
    pub data: Vec<u8>,
}

/// State and bindings for one draw, built up then passed to `submit`.
///
/// ```
/// use stratum_core::{DrawCall, ProgramHandle, RenderState};
///
/// let draw = DrawCall::new()
///     .with_program(ProgramHandle::INVALID)
///     .with_state(RenderState::DEFAULT | RenderState::BLEND_ALPHA)
///     .with_instances(4);
/// assert_eq!(draw.state(), RenderState::DEFAULT | RenderState::BLEND_ALPHA);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub(crate) program: ProgramHandle,
    pub(crate) state: RenderState,
    pub(crate) blend_factor: u32,
    pub(crate) stencil_front: StencilState,
    pub(crate) stencil_back: StencilState,
    pub(crate) transform: Option<Matrix4>,
    pub(crate) vertex_buffer: Option<VertexBufferHandle>,
    pub(crate) vertex_range: Option<(u32, u32)>,
    pub(crate) vertex_count: u32,
    pub(crate) index_buffer: Option<IndexBufferHandle>,
    pub(crate) index_range: Option<(u32, u32)>,
    pub(crate) instances: u32,
    pub(crate) textures: Vec<TextureBinding>,
    pub(crate) uniforms: Vec<PendingUniform>,
    pub(crate) scissor: Option<Rect>,
}

impl Default for DrawCall {
    fn default() -> Self {
        Self {
            program: ProgramHandle::INVALID,
            state: RenderState::DEFAULT,
            blend_factor: 0,
            stencil_front: StencilState::NONE,
            stencil_back: StencilState::NONE,
            transform: None,
            vertex_buffer: None,
            vertex_range: None,
            vertex_count: 0,
            index_buffer: None,
            index_range: None,
            instances: 1,
            textures: Vec::new(),
            uniforms: Vec::new(),
            scissor: None,
        }
    }
}

impl DrawCall {
    /// An empty draw with [`RenderState::DEFAULT`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the program.
    pub fn with_program(mut self, program: ProgramHandle) -> Self {
        self.program = program;
        self
    }

    /// Replaces the whole render state word.
    pub fn with_state(mut self, state: RenderState) -> Self {
        self.state = state;
        self
    }

    /// Replaces the render state and sets the constant blend color (`0xRRGGBBAA`).
    pub fn with_state_and_factor(mut self, state: RenderState, rgba: u32) -> Self {
        self.state = state;
        self.blend_factor = rgba;
        self
    }

    /// Sets the stencil words. A `NONE` back face mirrors the front face.
    pub fn with_stencil(mut self, front: StencilState, back: StencilState) -> Self {
        self.stencil_front = front;
        self.stencil_back = back;
        self
    }

    /// Sets the model transform.
    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Binds a whole vertex buffer.
    pub fn with_vertex_buffer(mut self, buffer: VertexBufferHandle) -> Self {
        self.vertex_buffer = Some(buffer);
        self.vertex_range = None;
        self
    }

    /// Binds `count` vertices of a buffer starting at `start`.
    pub fn with_vertex_buffer_range(
        mut self,
        buffer: VertexBufferHandle,
        start: u32,
        count: u32,
    ) -> Self {
        self.vertex_buffer = Some(buffer);
        self.vertex_range = Some((start, count));
        self
    }

    /// Draws `count` vertices without a vertex buffer; the shader generates them.
    pub fn with_vertex_count(mut self, count: u32) -> Self {
        self.vertex_count = count;
        self
    }

    /// Binds a whole index buffer.
    pub fn with_index_buffer(mut self, buffer: IndexBufferHandle) -> Self {
        self.index_buffer = Some(buffer);
        self.index_range = None;
        self
    }

    /// Binds `count` indices of a buffer starting at `start`.
    pub fn with_index_buffer_range(
        mut self,
        buffer: IndexBufferHandle,
        start: u32,
        count: u32,
    ) -> Self {
        self.index_buffer = Some(buffer);
        self.index_range = Some((start, count));
        self
    }

    /// Sets the instance count. Zero is treated as one.
    pub fn with_instances(mut self, instances: u32) -> Self {
        self.instances = instances.max(1);
        self
    }

    /// Binds a texture to a sampler stage, replacing whatever the stage held.
    pub fn with_texture(
        mut self,
        stage: u8,
        sampler: UniformHandle,
        texture: TextureHandle,
        flags: u32,
    ) -> Self {
        let binding = TextureBinding {
            stage,
            sampler,
            texture,
            flags,
        };
        match self.textures.iter_mut().find(|b| b.stage == stage) {
            Some(existing) => *existing = binding,
            None => self.textures.push(binding),
        }
        self
    }

    /// Sets `count` elements of a uniform. The last value set per handle wins.
    pub fn with_uniform<T: bytemuck::Pod>(
        mut self,
        uniform: UniformHandle,
        values: &[T],
        count: u16,
    ) -> Self {
        let pending = PendingUniform {
            handle: uniform,
            count,
            data: bytemuck::cast_slice(values).to_vec(),
        };
        match self.uniforms.iter_mut().find(|u| u.handle == uniform) {
            Some(existing) => *existing = pending,
            None => self.uniforms.push(pending),
        }
        self
    }

    /// Sets a scissor for this draw only.
    pub fn with_scissor(mut self, scissor: Rect) -> Self {
        self.scissor = Some(scissor);
        self
    }

    /// The program set on this draw.
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// The render state word.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Returns `true` if any vertex source is bound.
    pub fn has_geometry(&self) -> bool {
        self.vertex_buffer.is_some() || self.index_buffer.is_some() || self.vertex_count > 0
    }
}
