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

//! Initialization settings for the sequencer and its backend.

use crate::stratum_bitflags;
use serde::{Deserialize, Serialize};

stratum_bitflags! {
    /// Back-buffer options applied at init and on [`crate::Context::reset`].
    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ResetFlags: u32 {
        /// Wait for vertical blank.
        const VSYNC = 1 << 0;
        /// 4x multisampled back buffer.
        const MSAA_X4 = 1 << 1;
        /// Keep the back buffer's contents in sRGB.
        const SRGB_BACKBUFFER = 1 << 2;
        /// Skip the automatic back-buffer flip.
        const FLIP_AFTER_RENDER = 1 << 3;
    }
}

stratum_bitflags! {
    /// Backend debugging aids.
    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct DebugFlags: u32 {
        /// Render every primitive as wireframe.
        const WIREFRAME = 1 << 0;
        /// Skip all draw calls while keeping clears.
        const IFH = 1 << 1;
        /// Display per-frame statistics.
        const STATS = 1 << 2;
        /// Display debug text.
        const TEXT = 1 << 3;
    }
}

/// Which backend implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Executes each frame synchronously inside `frame()`.
    Immediate,
    /// Hands each frame to a dedicated submission thread.
    #[default]
    Threaded,
}

/// Per-frame and per-pool limits. The backend must meet these at init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Draw calls accepted per frame; further submits are discarded.
    pub max_draw_calls: u32,
    /// Live uniform handles.
    pub max_uniforms: u16,
    /// Live shader handles.
    pub max_shaders: u16,
    /// Live program handles.
    pub max_programs: u16,
    /// Live vertex buffer handles.
    pub max_vertex_buffers: u16,
    /// Live index buffer handles.
    pub max_index_buffers: u16,
    /// Live texture handles.
    pub max_textures: u16,
    /// Largest texture edge in texels.
    pub max_texture_size: u32,
    /// Texture stages per draw call.
    pub max_texture_stages: u8,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_draw_calls: 65_535,
            max_uniforms: 512,
            max_shaders: 512,
            max_programs: 512,
            max_vertex_buffers: 4096,
            max_index_buffers: 4096,
            max_textures: 4096,
            max_texture_size: 16_384,
            max_texture_stages: 16,
        }
    }
}

/// Everything needed to bring up a [`crate::Context`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend implementation.
    pub backend: BackendKind,
    /// Back-buffer width in pixels.
    pub width: u32,
    /// Back-buffer height in pixels.
    pub height: u32,
    /// Back-buffer options.
    pub reset: ResetFlags,
    /// Debug aids.
    pub debug: DebugFlags,
    /// Resource and submission limits.
    pub limits: Limits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            width: 1280,
            height: 720,
            reset: ResetFlags::VSYNC,
            debug: DebugFlags::EMPTY,
            limits: Limits::default(),
        }
    }
}

impl Settings {
    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
