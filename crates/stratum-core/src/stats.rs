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

//! Per-frame statistics.

/// Counters for a single submitted frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderStats {
    /// The frame number this list was built for (1 for the first `frame()`).
    pub frame_number: u32,
    /// Views that had a clear or at least one draw.
    pub views: u32,
    /// Clears realized this frame.
    pub clears: u32,
    /// Draw calls forwarded to the backend.
    pub draw_calls: u32,
    /// Draw calls rejected at submit (missing program, bad handles, over the limit).
    pub discarded_draw_calls: u32,
    /// Primitives implied by the draw calls' topology and element counts.
    pub primitives: u64,
    /// CPU time spent building the command list inside `frame()`.
    pub cpu_submit_time_ms: f32,
    /// Time the backend spent executing the list.
    pub backend_time_ms: f32,
}

impl RenderStats {
    /// Folds the sequencer-side counters of `self` with the backend-side figures of `other`.
    pub fn merged_with_backend(mut self, backend: &RenderStats) -> Self {
        self.backend_time_ms = backend.backend_time_ms;
        if backend.primitives > 0 {
            self.primitives = backend.primitives;
        }
        self
    }
}
