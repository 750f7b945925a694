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

//! The contract between the sequencer and whatever executes its command lists.

use crate::command::CommandList;
use crate::error::RenderError;
use crate::settings::Settings;
use crate::stats::RenderStats;

/// What a backend reports about itself at init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCaps {
    /// Addressable views.
    pub max_views: u16,
    /// Draw calls the backend can execute per frame.
    pub max_draw_calls: u32,
    /// Largest texture edge in texels.
    pub max_texture_size: u32,
    /// Texture stages per draw.
    pub max_texture_stages: u8,
    /// Whether lists are executed off the calling thread.
    pub threaded: bool,
}

impl BackendCaps {
    /// Checks these capabilities against the configured limits.
    ///
    /// Returns a description of the first unmet requirement.
    pub fn check(&self, settings: &Settings) -> Result<(), String> {
        let limits = &settings.limits;
        if (self.max_views as usize) < crate::view::MAX_VIEWS {
            return Err(format!(
                "{} views supported, {} required",
                self.max_views,
                crate::view::MAX_VIEWS
            ));
        }
        if self.max_draw_calls < limits.max_draw_calls {
            return Err(format!(
                "{} draw calls per frame supported, {} required",
                self.max_draw_calls, limits.max_draw_calls
            ));
        }
        if self.max_texture_size < limits.max_texture_size {
            return Err(format!(
                "texture size {} supported, {} required",
                self.max_texture_size, limits.max_texture_size
            ));
        }
        if self.max_texture_stages < limits.max_texture_stages {
            return Err(format!(
                "{} texture stages supported, {} required",
                self.max_texture_stages, limits.max_texture_stages
            ));
        }
        Ok(())
    }
}

/// Executes command lists produced by [`crate::Context::frame`].
///
/// The sequencer owns its backend through a `Box<dyn RenderBackend>` and calls
/// it from a single thread. Implementations that run work elsewhere must do
/// their own hand-off.
pub trait RenderBackend: std::fmt::Debug + Send {
    /// A short name for logs.
    fn name(&self) -> &str;

    /// Brings the backend up and reports its capabilities.
    fn init(&mut self, settings: &Settings) -> Result<BackendCaps, RenderError>;

    /// Executes one frame.
    ///
    /// Returns the statistics of the most recently completed frame, which for a
    /// pipelined backend may be an earlier one than `list`.
    fn execute(&mut self, list: CommandList) -> Result<RenderStats, RenderError>;

    /// Releases everything. Called once; `execute` is never called afterwards.
    fn shutdown(&mut self);
}
