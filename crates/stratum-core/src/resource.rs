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

//! Shaders, programs, buffers and textures.
//!
//! The sequencer only tracks what it needs to validate draw calls: shader
//! stage, buffer element counts and texture dimensions. Payloads travel to
//! the backend inside [`crate::ResourceCommand`]s.

use crate::error::ResourceError;
use crate::handle::{
    HandlePool, IndexBufferHandle, ProgramHandle, RawHandle, ShaderHandle, TextureHandle,
    VertexBufferHandle,
};
use crate::settings::Limits;
use crate::vertex::VertexLayout;
use serde::{Deserialize, Serialize};

/// Highest shader binary version understood.
pub const SHADER_BIN_VERSION: u8 = 11;

/// Pipeline stage of a shader binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl ShaderStage {
    /// The three-byte magic a binary of this stage starts with.
    pub const fn magic(self) -> [u8; 3] {
        match self {
            ShaderStage::Vertex => *b"VSH",
            ShaderStage::Fragment => *b"FSH",
            ShaderStage::Compute => *b"CSH",
        }
    }

    /// Reads the stage from a shader binary header: three magic bytes followed by a version byte.
    pub fn from_binary(code: &[u8]) -> Result<Self, ResourceError> {
        let [a, b, c, version, ..] = code else {
            return Err(ResourceError::InvalidShader(format!(
                "binary of {} bytes is too short for a header",
                code.len()
            )));
        };

        let stage = [Self::Vertex, Self::Fragment, Self::Compute]
            .into_iter()
            .find(|stage| stage.magic() == [*a, *b, *c])
            .ok_or_else(|| {
                ResourceError::InvalidShader(format!(
                    "unknown magic {:?}",
                    String::from_utf8_lossy(&[*a, *b, *c])
                ))
            })?;

        if *version == 0 || *version > SHADER_BIN_VERSION {
            return Err(ResourceError::InvalidShader(format!(
                "unsupported {stage:?} binary version {version}"
            )));
        }
        Ok(stage)
    }
}

/// An opaque texture format code, forwarded to the backend unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureFormat(pub u32);

impl TextureFormat {
    /// 8-bit RGBA, the format used when none is specified.
    pub const RGBA8: Self = Self(0);
}

/// Parameters of a 2D texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Array layers, at least 1.
    pub layers: u16,
    /// Whether the texture has a mip chain.
    pub has_mips: bool,
    /// Opaque format code.
    pub format: TextureFormat,
    /// Opaque sampler and texture flags.
    pub flags: u64,
}

impl TextureDescriptor {
    /// A single-layer texture without mips.
    pub const fn new_2d(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            layers: 1,
            has_mips: false,
            format,
            flags: 0,
        }
    }

    fn validate(&self, max_size: u32) -> Result<(), ResourceError> {
        if self.width == 0 || self.height == 0 || self.layers == 0 {
            return Err(ResourceError::TextureCreation(format!(
                "empty texture {}x{}x{}",
                self.width, self.height, self.layers
            )));
        }
        if self.width > max_size || self.height > max_size {
            return Err(ResourceError::TextureCreation(format!(
                "{}x{} exceeds the maximum texture size of {max_size}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct ShaderRecord {
    pub stage: ShaderStage,
    /// Programs linking this shader.
    pub refs: u32,
}

#[derive(Debug)]
pub(crate) struct ProgramRecord {
    pub vertex: ShaderHandle,
    pub fragment: ShaderHandle,
}

#[derive(Debug)]
pub(crate) struct VertexBufferRecord {
    pub vertex_count: u32,
}

#[derive(Debug)]
pub(crate) struct IndexBufferRecord {
    pub index_count: u32,
}

/// Live resources, one generational pool per kind.
#[derive(Debug)]
pub(crate) struct ResourceTables {
    shaders: HandlePool<ShaderRecord>,
    programs: HandlePool<ProgramRecord>,
    vertex_buffers: HandlePool<VertexBufferRecord>,
    index_buffers: HandlePool<IndexBufferRecord>,
    textures: HandlePool<TextureDescriptor>,
    limits: Limits,
}

fn exhausted(kind: &'static str, capacity: u16) -> ResourceError {
    ResourceError::PoolExhausted {
        kind,
        capacity: capacity as usize,
    }
}

impl ResourceTables {
    pub fn new(limits: &Limits) -> Self {
        Self {
            shaders: HandlePool::new(limits.max_shaders),
            programs: HandlePool::new(limits.max_programs),
            vertex_buffers: HandlePool::new(limits.max_vertex_buffers),
            index_buffers: HandlePool::new(limits.max_index_buffers),
            textures: HandlePool::new(limits.max_textures),
            limits: limits.clone(),
        }
    }

    pub fn create_shader(
        &mut self,
        code: &[u8],
    ) -> Result<(ShaderHandle, ShaderStage), ResourceError> {
        let stage = ShaderStage::from_binary(code)?;
        let raw = self
            .shaders
            .insert(ShaderRecord { stage, refs: 0 })
            .map_err(|_| exhausted("shader", self.limits.max_shaders))?;
        Ok((ShaderHandle::from_raw(raw), stage))
    }

    pub fn create_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, ResourceError> {
        self.expect_stage(vertex, ShaderStage::Vertex)?;
        self.expect_stage(fragment, ShaderStage::Fragment)?;

        let raw = self
            .programs
            .insert(ProgramRecord { vertex, fragment })
            .map_err(|_| exhausted("program", self.limits.max_programs))?;
        for shader in [vertex, fragment] {
            if let Some(record) = self.shaders.get_mut(shader.raw()) {
                record.refs += 1;
            }
        }
        Ok(ProgramHandle::from_raw(raw))
    }

    fn expect_stage(
        &self,
        shader: ShaderHandle,
        expected: ShaderStage,
    ) -> Result<(), ResourceError> {
        match self.shaders.get(shader.raw()) {
            Some(record) if record.stage == expected => Ok(()),
            Some(record) => Err(ResourceError::InvalidShader(format!(
                "expected a {expected:?} shader, got {:?}",
                record.stage
            ))),
            None => Err(ResourceError::InvalidShader(format!(
                "{expected:?} shader handle is invalid or destroyed"
            ))),
        }
    }

    pub fn create_vertex_buffer(
        &mut self,
        bytes: usize,
        layout: &VertexLayout,
    ) -> Result<(VertexBufferHandle, u32), ResourceError> {
        let vertex_count = layout.vertex_count(bytes)?;
        let raw = self
            .vertex_buffers
            .insert(VertexBufferRecord { vertex_count })
            .map_err(|_| exhausted("vertex buffer", self.limits.max_vertex_buffers))?;
        Ok((VertexBufferHandle::from_raw(raw), vertex_count))
    }

    pub fn create_index_buffer(
        &mut self,
        bytes: usize,
        index32: bool,
    ) -> Result<(IndexBufferHandle, u32), ResourceError> {
        let width = if index32 { 4 } else { 2 };
        if bytes % width != 0 {
            return Err(ResourceError::LayoutMismatch(format!(
                "{bytes} bytes is not a multiple of the {width}-byte index size"
            )));
        }
        let index_count = (bytes / width) as u32;
        let raw = self
            .index_buffers
            .insert(IndexBufferRecord { index_count })
            .map_err(|_| exhausted("index buffer", self.limits.max_index_buffers))?;
        Ok((IndexBufferHandle::from_raw(raw), index_count))
    }

    pub fn create_texture(
        &mut self,
        descriptor: TextureDescriptor,
    ) -> Result<TextureHandle, ResourceError> {
        descriptor.validate(self.limits.max_texture_size)?;
        let raw = self
            .textures
            .insert(descriptor)
            .map_err(|_| exhausted("texture", self.limits.max_textures))?;
        Ok(TextureHandle::from_raw(raw))
    }

    pub fn destroy_shader(&mut self, handle: ShaderHandle) -> Result<(), ResourceError> {
        let record = self
            .shaders
            .remove(handle.raw())
            .ok_or(ResourceError::InvalidHandle { kind: "shader" })?;
        if record.refs > 0 {
            log::debug!(
                "Shader {:?} destroyed while linked into {} program(s); programs stay valid.",
                handle.raw(),
                record.refs
            );
        }
        Ok(())
    }

    pub fn destroy_program(&mut self, handle: ProgramHandle) -> Result<(), ResourceError> {
        let record = self
            .programs
            .remove(handle.raw())
            .ok_or(ResourceError::InvalidHandle { kind: "program" })?;
        for shader in [record.vertex, record.fragment] {
            if let Some(shader) = self.shaders.get_mut(shader.raw()) {
                shader.refs = shader.refs.saturating_sub(1);
            }
        }
        Ok(())
    }

    pub fn destroy_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
    ) -> Result<(), ResourceError> {
        remove_raw(&mut self.vertex_buffers, handle.raw(), "vertex buffer")
    }

    pub fn destroy_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
    ) -> Result<(), ResourceError> {
        remove_raw(&mut self.index_buffers, handle.raw(), "index buffer")
    }

    pub fn destroy_texture(&mut self, handle: TextureHandle) -> Result<(), ResourceError> {
        remove_raw(&mut self.textures, handle.raw(), "texture")
    }

    pub fn has_program(&self, handle: ProgramHandle) -> bool {
        self.programs.contains(handle.raw())
    }

    pub fn has_texture(&self, handle: TextureHandle) -> bool {
        self.textures.contains(handle.raw())
    }

    pub fn vertex_count(&self, handle: VertexBufferHandle) -> Result<u32, ResourceError> {
        self.vertex_buffers
            .get(handle.raw())
            .map(|r| r.vertex_count)
            .ok_or(ResourceError::InvalidHandle {
                kind: "vertex buffer",
            })
    }

    pub fn index_count(&self, handle: IndexBufferHandle) -> Result<u32, ResourceError> {
        self.index_buffers
            .get(handle.raw())
            .map(|r| r.index_count)
            .ok_or(ResourceError::InvalidHandle {
                kind: "index buffer",
            })
    }

    /// Live handle counts per kind, for leak reports.
    pub fn live_counts(&self) -> [(&'static str, usize); 5] {
        [
            ("shader", self.shaders.len()),
            ("program", self.programs.len()),
            ("vertex buffer", self.vertex_buffers.len()),
            ("index buffer", self.index_buffers.len()),
            ("texture", self.textures.len()),
        ]
    }
}

fn remove_raw<T>(
    pool: &mut HandlePool<T>,
    raw: RawHandle,
    kind: &'static str,
) -> Result<(), ResourceError> {
    pool.remove(raw)
        .map(|_| ())
        .ok_or(ResourceError::InvalidHandle { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::{Attrib, AttribType};

    fn shader(magic: &[u8; 3]) -> Vec<u8> {
        let mut code = magic.to_vec();
        code.push(SHADER_BIN_VERSION);
        code.extend_from_slice(&[0xde, 0xad]);
        code
    }

    #[test]
    fn shader_magic() {
        assert_eq!(ShaderStage::from_binary(&shader(b"VSH")), Ok(ShaderStage::Vertex));
        assert_eq!(ShaderStage::from_binary(&shader(b"FSH")), Ok(ShaderStage::Fragment));
        assert!(ShaderStage::from_binary(b"VS").is_err());
        assert!(ShaderStage::from_binary(&shader(b"XYZ")).is_err());
        assert!(ShaderStage::from_binary(b"VSH\0").is_err());
    }

    #[test]
    fn program_requires_matching_stages() {
        let mut tables = ResourceTables::new(&Limits::default());
        let (vs, _) = tables.create_shader(&shader(b"VSH")).unwrap();
        let (fs, _) = tables.create_shader(&shader(b"FSH")).unwrap();

        assert!(tables.create_program(fs, vs).is_err());
        let program = tables.create_program(vs, fs).unwrap();
        assert!(tables.has_program(program));

        tables.destroy_shader(vs).unwrap();
        assert!(tables.has_program(program));
        assert!(tables.create_program(vs, fs).is_err());
    }

    #[test]
    fn buffers_track_element_counts() {
        let mut tables = ResourceTables::new(&Limits::default());
        let layout = VertexLayout::builder()
            .add(Attrib::Position, 2, AttribType::Float)
            .build();

        let (vb, count) = tables.create_vertex_buffer(8 * 6, &layout).unwrap();
        assert_eq!(count, 6);
        assert_eq!(tables.vertex_count(vb), Ok(6));

        let (ib, count) = tables.create_index_buffer(12, false).unwrap();
        assert_eq!(count, 6);
        assert!(tables.create_index_buffer(6, true).is_err());

        tables.destroy_index_buffer(ib).unwrap();
        assert!(tables.index_count(ib).is_err());
        assert!(tables.destroy_index_buffer(ib).is_err());
    }

    #[test]
    fn texture_size_is_limited() {
        let limits = Limits {
            max_texture_size: 256,
            ..Limits::default()
        };
        let mut tables = ResourceTables::new(&limits);
        assert!(tables
            .create_texture(TextureDescriptor::new_2d(256, 256, TextureFormat::RGBA8))
            .is_ok());
        assert!(matches!(
            tables.create_texture(TextureDescriptor::new_2d(512, 16, TextureFormat::RGBA8)),
            Err(ResourceError::TextureCreation(_))
        ));
        assert!(tables
            .create_texture(TextureDescriptor::new_2d(0, 16, TextureFormat::RGBA8))
            .is_err());
    }
}
