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

//! Backend-side bookkeeping of live resources.

use ahash::AHashMap;
use anyhow::{anyhow, bail, Context, Result};
use stratum_core::command::DrawCommand;
use stratum_core::{
    IndexBufferHandle, ProgramHandle, ResourceCommand, ShaderHandle, ShaderStage,
    TextureDescriptor, TextureHandle, UniformHandle, UniformType, VertexBufferHandle,
    VertexLayout,
};

#[derive(Debug, Clone)]
pub(crate) struct MirroredUniform {
    pub name: String,
    pub ty: UniformType,
    pub num: u16,
}

/// Everything the sequencer has created and not yet destroyed, as seen by a backend.
///
/// Kept in step by applying each list's `pre` commands before its views and
/// its `post` commands after.
#[derive(Debug, Default)]
pub struct ResourceMirror {
    shaders: AHashMap<ShaderHandle, ShaderStage>,
    programs: AHashMap<ProgramHandle, (ShaderHandle, ShaderHandle)>,
    vertex_buffers: AHashMap<VertexBufferHandle, (VertexLayout, usize)>,
    index_buffers: AHashMap<IndexBufferHandle, usize>,
    textures: AHashMap<TextureHandle, TextureDescriptor>,
    uniforms: AHashMap<UniformHandle, MirroredUniform>,
    resident_bytes: usize,
}

impl ResourceMirror {
    /// Applies one creation or destruction.
    pub fn apply(&mut self, command: &ResourceCommand) -> Result<()> {
        match command {
            ResourceCommand::CreateShader { handle, stage, .. } => {
                insert_new(&mut self.shaders, *handle, *stage, "shader")
            }
            ResourceCommand::CreateProgram {
                handle,
                vertex,
                fragment,
            } => {
                for shader in [vertex, fragment] {
                    if !self.shaders.contains_key(shader) {
                        bail!("program {handle:?} links unknown shader {shader:?}");
                    }
                }
                insert_new(&mut self.programs, *handle, (*vertex, *fragment), "program")
            }
            ResourceCommand::CreateVertexBuffer {
                handle,
                layout,
                data,
            } => {
                self.resident_bytes += data.len();
                insert_new(
                    &mut self.vertex_buffers,
                    *handle,
                    (layout.clone(), data.len()),
                    "vertex buffer",
                )
            }
            ResourceCommand::CreateIndexBuffer { handle, data, .. } => {
                self.resident_bytes += data.len();
                insert_new(&mut self.index_buffers, *handle, data.len(), "index buffer")
            }
            ResourceCommand::CreateTexture {
                handle,
                descriptor,
                data,
            } => {
                self.resident_bytes += data.as_ref().map_or(0, Vec::len);
                insert_new(&mut self.textures, *handle, *descriptor, "texture")
            }
            ResourceCommand::CreateUniform {
                handle,
                name,
                ty,
                num,
            } => insert_new(
                &mut self.uniforms,
                *handle,
                MirroredUniform {
                    name: name.clone(),
                    ty: *ty,
                    num: *num,
                },
                "uniform",
            ),
            ResourceCommand::DestroyShader(handle) => {
                remove_known(&mut self.shaders, handle, "shader").map(drop)
            }
            ResourceCommand::DestroyProgram(handle) => {
                remove_known(&mut self.programs, handle, "program").map(drop)
            }
            ResourceCommand::DestroyVertexBuffer(handle) => {
                let (_, bytes) = remove_known(&mut self.vertex_buffers, handle, "vertex buffer")?;
                self.resident_bytes -= bytes;
                Ok(())
            }
            ResourceCommand::DestroyIndexBuffer(handle) => {
                let bytes = remove_known(&mut self.index_buffers, handle, "index buffer")?;
                self.resident_bytes -= bytes;
                Ok(())
            }
            ResourceCommand::DestroyTexture(handle) => {
                remove_known(&mut self.textures, handle, "texture").map(drop)
            }
            ResourceCommand::DestroyUniform(handle) => {
                remove_known(&mut self.uniforms, handle, "uniform").map(drop)
            }
        }
    }

    /// Checks that everything a draw references is live.
    pub fn check_draw(&self, draw: &DrawCommand) -> Result<()> {
        if !self.programs.contains_key(&draw.program) {
            bail!("draw #{} uses unknown program {:?}", draw.sequence, draw.program);
        }
        if let Some(vb) = draw.vertex_buffer {
            let (layout, bytes) = self.vertex_buffers.get(&vb).ok_or_else(|| {
                anyhow!("draw #{} uses unknown vertex buffer {vb:?}", draw.sequence)
            })?;
            let needed = (draw.vertices.start as usize + draw.vertices.count as usize)
                * layout.stride() as usize;
            if needed > *bytes {
                bail!(
                    "draw #{} reads {needed} bytes from a {bytes}-byte vertex buffer",
                    draw.sequence
                );
            }
        }
        if let Some((ib, _)) = draw.index_buffer {
            if !self.index_buffers.contains_key(&ib) {
                bail!("draw #{} uses unknown index buffer {ib:?}", draw.sequence);
            }
        }
        for binding in &draw.textures {
            if !self.textures.contains_key(&binding.texture) {
                bail!(
                    "draw #{} binds unknown texture {:?} at stage {}",
                    draw.sequence,
                    binding.texture,
                    binding.stage
                );
            }
        }
        for upload in &draw.uniforms {
            let uniform = self
                .uniforms
                .get(&upload.handle)
                .with_context(|| format!("draw #{} sets unknown uniform", draw.sequence))?;
            if uniform.ty != upload.ty || upload.count > uniform.num {
                bail!(
                    "upload to '{}' does not match {:?}[{}]",
                    uniform.name,
                    uniform.ty,
                    uniform.num
                );
            }
        }
        Ok(())
    }

    /// Bytes of buffer and texture data uploaded and not yet released.
    pub fn resident_bytes(&self) -> usize {
        self.resident_bytes
    }

    /// Number of live resources of every kind.
    pub fn live(&self) -> usize {
        self.shaders.len()
            + self.programs.len()
            + self.vertex_buffers.len()
            + self.index_buffers.len()
            + self.textures.len()
            + self.uniforms.len()
    }

    /// Shader-visible name of a live uniform.
    pub fn uniform_name(&self, handle: UniformHandle) -> Option<&str> {
        self.uniforms.get(&handle).map(|u| u.name.as_str())
    }
}

fn insert_new<K, V>(map: &mut AHashMap<K, V>, key: K, value: V, kind: &str) -> Result<()>
where
    K: std::hash::Hash + Eq + std::fmt::Debug,
{
    if map.contains_key(&key) {
        bail!("{kind} {key:?} created twice");
    }
    map.insert(key, value);
    Ok(())
}

fn remove_known<K, V>(map: &mut AHashMap<K, V>, key: &K, kind: &str) -> Result<V>
where
    K: std::hash::Hash + Eq + std::fmt::Debug,
{
    map.remove(key)
        .ok_or_else(|| anyhow!("{kind} {key:?} destroyed but never created"))
}
