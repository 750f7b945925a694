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

//! A backend that executes each command list synchronously on the calling thread.

use crate::mirror::ResourceMirror;
use std::fmt;
use std::time::Instant;
use stratum_core::{
    BackendCaps, CommandList, DebugFlags, RenderBackend, RenderError, RenderStats, Settings,
};

/// Receives every executed list together with the statistics it produced.
///
/// Implemented for any `FnMut(&CommandList, &RenderStats) + Send` closure.
pub trait FrameObserver: Send {
    /// Called after a list has been fully applied.
    fn on_frame(&mut self, list: &CommandList, stats: &RenderStats);
}

impl<F> FrameObserver for F
where
    F: FnMut(&CommandList, &RenderStats) + Send,
{
    fn on_frame(&mut self, list: &CommandList, stats: &RenderStats) {
        self(list, stats)
    }
}

/// Applies resource commands to a [`ResourceMirror`], validates every draw
/// against it and reports what a device would have executed.
pub struct ImmediateBackend {
    mirror: ResourceMirror,
    observers: Vec<Box<dyn FrameObserver>>,
    caps: BackendCaps,
    width: u32,
    height: u32,
    frame_count: u64,
    last_frame_stats: RenderStats,
    initialized: bool,
}

impl fmt::Debug for ImmediateBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmediateBackend")
            .field("mirror", &self.mirror)
            .field("observers", &self.observers.len())
            .field("caps", &self.caps)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frame_count", &self.frame_count)
            .field("last_frame_stats", &self.last_frame_stats)
            .finish()
    }
}

impl Default for ImmediateBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateBackend {
    /// Views, draw calls and texture sizes this backend accepts.
    pub const CAPS: BackendCaps = BackendCaps {
        max_views: 256,
        max_draw_calls: 1 << 20,
        max_texture_size: 16_384,
        max_texture_stages: 16,
        threaded: false,
    };

    /// Creates an uninitialized backend.
    pub fn new() -> Self {
        Self {
            mirror: ResourceMirror::default(),
            observers: Vec::new(),
            caps: Self::CAPS,
            width: 0,
            height: 0,
            frame_count: 0,
            last_frame_stats: RenderStats::default(),
            initialized: false,
        }
    }

    /// Creates a backend that advertises `caps` instead of [`Self::CAPS`].
    pub fn with_caps(caps: BackendCaps) -> Self {
        Self {
            caps,
            ..Self::new()
        }
    }

    /// Registers an observer called after every frame.
    pub fn add_observer(&mut self, observer: impl FrameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Builder form of [`Self::add_observer`].
    pub fn with_observer(mut self, observer: impl FrameObserver + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    /// The live-resource mirror.
    pub fn mirror(&self) -> &ResourceMirror {
        &self.mirror
    }

    /// Lists executed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn apply_all(&mut self, list: &CommandList, post: bool) -> Result<(), RenderError> {
        let commands = if post { &list.post } else { &list.pre };
        for command in commands {
            self.mirror
                .apply(command)
                .map_err(|err| RenderError::Internal(format!("{err:#}")))?;
        }
        Ok(())
    }
}

impl RenderBackend for ImmediateBackend {
    fn name(&self) -> &str {
        "immediate"
    }

    fn init(&mut self, settings: &Settings) -> Result<BackendCaps, RenderError> {
        if self.initialized {
            return Err(RenderError::InitializationFailed(
                "immediate backend is already initialized".to_string(),
            ));
        }
        self.width = settings.width;
        self.height = settings.height;
        self.initialized = true;
        log::info!(
            "Immediate backend ready at {}x{}.",
            self.width,
            self.height
        );
        Ok(self.caps.clone())
    }

    fn execute(&mut self, list: CommandList) -> Result<RenderStats, RenderError> {
        if !self.initialized {
            return Err(RenderError::Internal(
                "execute called before init".to_string(),
            ));
        }
        let started = Instant::now();

        if (list.width, list.height) != (self.width, self.height) {
            log::debug!(
                "Back buffer resized {}x{} -> {}x{}.",
                self.width,
                self.height,
                list.width,
                list.height
            );
            self.width = list.width;
            self.height = list.height;
        }

        self.apply_all(&list, false)?;

        let skip_draws = list.debug.contains(DebugFlags::IFH);
        let mut stats = RenderStats {
            frame_number: list.frame_number,
            ..Default::default()
        };
        for pass in &list.views {
            stats.views += 1;
            if pass.clear.is_some() {
                stats.clears += 1;
            }
            if skip_draws {
                continue;
            }
            for draw in &pass.draws {
                self.mirror
                    .check_draw(draw)
                    .map_err(|err| RenderError::Internal(format!("{}: {err:#}", pass.id)))?;
                stats.draw_calls += 1;
                stats.primitives += draw.primitive_count();
            }
        }

        self.apply_all(&list, true)?;
        stats.backend_time_ms = started.elapsed().as_secs_f32() * 1000.0;

        for observer in &mut self.observers {
            observer.on_frame(&list, &stats);
        }

        self.frame_count += 1;
        self.last_frame_stats = stats.clone();
        Ok(stats)
    }

    fn shutdown(&mut self) {
        if self.mirror.live() > 0 {
            log::debug!(
                "Immediate backend releasing {} resource(s), {} bytes.",
                self.mirror.live(),
                self.mirror.resident_bytes()
            );
        }
        self.mirror = ResourceMirror::default();
        self.initialized = false;
        log::info!("Immediate backend shut down after {} frame(s).", self.frame_count);
    }
}
