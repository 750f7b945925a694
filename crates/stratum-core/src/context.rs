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

//! The view/frame submission sequencer.
//!
//! [`Context`] owns every piece of mutable rendering state: views, resource
//! tables, the uniform table and the draws queued for the current frame. Each
//! call to [`Context::frame`] turns that state into a [`CommandList`], hands it
//! to the backend and starts the next frame.
//!
//! Only [`Context::init`] returns an error. Everything else reports failures on
//! the [`DiagnosticBus`] and carries on: a failed creation returns the invalid
//! handle and a rejected draw is dropped, with its view still touched.

use crate::backend::{BackendCaps, RenderBackend};
use crate::command::{
    ClearCommand, CommandList, DrawCommand, IndexRange, ResourceCommand, VertexRange, ViewPass,
};
use crate::diagnostics::{DiagnosticBus, DiagnosticKind};
use crate::draw::DrawCall;
use crate::error::{RenderError, ResourceError};
use crate::handle::{
    IndexBufferHandle, ProgramHandle, ShaderHandle, TextureHandle, UniformHandle,
    VertexBufferHandle,
};
use crate::resource::{ResourceTables, TextureDescriptor};
use crate::settings::{DebugFlags, ResetFlags, Settings};
use crate::stats::RenderStats;
use crate::uniform::{Created, UniformInfo, UniformTable, UniformType};
use crate::vertex::VertexLayout;
use crate::view::{
    ClearFlags, Matrix4, Rect, ViewId, ViewMode, ViewState, ViewTable, IDENTITY, MAX_VIEWS,
};
use std::cmp::Reverse;
use std::time::Instant;

/// The rendering context. One per backend; not shared between threads.
#[derive(Debug)]
pub struct Context {
    backend: Box<dyn RenderBackend>,
    settings: Settings,
    caps: BackendCaps,
    views: ViewTable,
    queued: Vec<Vec<DrawCommand>>,
    resources: ResourceTables,
    uniforms: UniformTable,
    pre: Vec<ResourceCommand>,
    post: Vec<ResourceCommand>,
    diagnostics: DiagnosticBus,
    frame_number: u32,
    sequence: u32,
    draws_this_frame: u32,
    discarded_this_frame: u32,
    stats: RenderStats,
    device_lost: bool,
    shut_down: bool,
}

impl Context {
    /// Initializes `backend` and checks it against the configured limits.
    pub fn init(
        mut backend: Box<dyn RenderBackend>,
        settings: Settings,
    ) -> Result<Self, RenderError> {
        log::info!(
            "Initializing rendering context on '{}' backend ({}x{}).",
            backend.name(),
            settings.width,
            settings.height
        );

        let caps = backend.init(&settings)?;
        if let Err(reason) = caps.check(&settings) {
            log::error!("Backend '{}' rejected: {reason}", backend.name());
            backend.shutdown();
            return Err(RenderError::MinimumSpecsUnmet(reason));
        }
        log::debug!("Backend capabilities: {caps:?}");

        Ok(Self {
            backend,
            caps,
            views: ViewTable::new(),
            queued: vec![Vec::new(); MAX_VIEWS],
            resources: ResourceTables::new(&settings.limits),
            uniforms: UniformTable::new(settings.limits.max_uniforms),
            pre: Vec::new(),
            post: Vec::new(),
            diagnostics: DiagnosticBus::new(),
            frame_number: 0,
            sequence: 0,
            draws_this_frame: 0,
            discarded_this_frame: 0,
            stats: RenderStats::default(),
            device_lost: false,
            shut_down: false,
            settings,
        })
    }

    /// The settings in effect, including any [`Context::reset`].
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// What the backend reported at init.
    pub fn caps(&self) -> &BackendCaps {
        &self.caps
    }

    /// Frames completed so far.
    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    /// Statistics of the last frame.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The channel failures are reported on.
    pub fn diagnostics(&self) -> &DiagnosticBus {
        &self.diagnostics
    }

    /// Returns `true` once the backend has reported a lost device.
    pub fn is_device_lost(&self) -> bool {
        self.device_lost
    }

    fn report(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.publish(kind, self.frame_number, message);
    }

    fn report_error(&self, context: &str, err: &ResourceError) {
        self.report(err.diagnostic_kind(), format!("{context}: {err}"));
    }

    /// Changes the back-buffer size and options from the next frame on.
    pub fn reset(&mut self, width: u32, height: u32, flags: ResetFlags) {
        log::info!("Reset to {width}x{height} with {flags:?}.");
        self.settings.width = width;
        self.settings.height = height;
        self.settings.reset = flags;
    }

    /// Replaces the debug flags.
    pub fn set_debug(&mut self, flags: DebugFlags) {
        self.settings.debug = flags;
    }

    // --- Views ---

    /// Stores the clear for a view. It runs in frames where the view is touched.
    pub fn set_view_clear(
        &mut self,
        id: ViewId,
        flags: ClearFlags,
        rgba: u32,
        depth: f32,
        stencil: u8,
    ) {
        let clear = &mut self.views.configure(id).clear;
        clear.flags = flags;
        clear.rgba = rgba;
        clear.depth = depth;
        clear.stencil = stencil;
    }

    /// Sets the viewport.
    pub fn set_view_rect(&mut self, id: ViewId, x: u16, y: u16, width: u16, height: u16) {
        self.views.configure(id).rect = Rect::new(x, y, width, height);
    }

    /// Sets the scissor. A 0x0 rectangle disables scissoring.
    pub fn set_view_scissor(&mut self, id: ViewId, x: u16, y: u16, width: u16, height: u16) {
        self.views.configure(id).scissor = Rect::new(x, y, width, height);
    }

    /// Sets the view and projection matrices. `None` keeps the identity.
    pub fn set_view_transform(
        &mut self,
        id: ViewId,
        view: Option<&Matrix4>,
        projection: Option<&Matrix4>,
    ) {
        let entry = self.views.configure(id);
        entry.view = view.copied().unwrap_or(IDENTITY);
        entry.projection = projection.copied().unwrap_or(IDENTITY);
    }

    /// Sets how draws inside the view are ordered.
    pub fn set_view_mode(&mut self, id: ViewId, mode: ViewMode) {
        self.views.configure(id).mode = mode;
    }

    /// Shorthand for toggling [`ViewMode::Sequential`].
    pub fn set_view_sequential(&mut self, id: ViewId, sequential: bool) {
        let mode = if sequential {
            ViewMode::Sequential
        } else {
            ViewMode::Default
        };
        self.set_view_mode(id, mode);
    }

    /// Names the view for backend debug output.
    pub fn set_view_name(&mut self, id: ViewId, name: &str) {
        self.views.configure(id).name = Some(name.to_string());
    }

    /// Returns the view to its defaults. Draws already queued this frame are dropped.
    pub fn reset_view(&mut self, id: ViewId) {
        let dropped = std::mem::take(&mut self.queued[id.0 as usize]);
        if !dropped.is_empty() {
            log::debug!("{id} reset with {} queued draw(s).", dropped.len());
        }
        self.views.reset(id);
    }

    /// Lifecycle state of a view.
    pub fn view_state(&self, id: ViewId) -> ViewState {
        self.views.get(id).state
    }

    /// Includes the view in this frame so its clear runs, even without draws.
    pub fn touch(&mut self, id: ViewId) {
        self.views.configure(id);
        self.views.touch(id);
    }

    // --- Resources ---

    /// Creates a shader from a binary. Returns [`ShaderHandle::INVALID`] on failure.
    pub fn create_shader(&mut self, code: &[u8]) -> ShaderHandle {
        match self.resources.create_shader(code) {
            Ok((handle, stage)) => {
                self.pre.push(ResourceCommand::CreateShader {
                    handle,
                    stage,
                    code: code.to_vec(),
                });
                handle
            }
            Err(err) => {
                self.report_error("create_shader", &err);
                ShaderHandle::INVALID
            }
        }
    }

    /// Links a program. Returns [`ProgramHandle::INVALID`] on failure.
    pub fn create_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> ProgramHandle {
        match self.resources.create_program(vertex, fragment) {
            Ok(handle) => {
                self.pre.push(ResourceCommand::CreateProgram {
                    handle,
                    vertex,
                    fragment,
                });
                handle
            }
            Err(err) => {
                self.report_error("create_program", &err);
                ProgramHandle::INVALID
            }
        }
    }

    /// Creates an immutable vertex buffer. Returns [`VertexBufferHandle::INVALID`] on failure.
    pub fn create_vertex_buffer(
        &mut self,
        data: &[u8],
        layout: &VertexLayout,
    ) -> VertexBufferHandle {
        match self.resources.create_vertex_buffer(data.len(), layout) {
            Ok((handle, count)) => {
                log::trace!("Vertex buffer {:?} holds {count} vertices.", handle.raw());
                self.pre.push(ResourceCommand::CreateVertexBuffer {
                    handle,
                    layout: layout.clone(),
                    data: data.to_vec(),
                });
                handle
            }
            Err(err) => {
                self.report_error("create_vertex_buffer", &err);
                VertexBufferHandle::INVALID
            }
        }
    }

    /// Creates an immutable index buffer of 16-bit or 32-bit indices.
    /// Returns [`IndexBufferHandle::INVALID`] on failure.
    pub fn create_index_buffer(&mut self, data: &[u8], index32: bool) -> IndexBufferHandle {
        match self.resources.create_index_buffer(data.len(), index32) {
            Ok((handle, _)) => {
                self.pre.push(ResourceCommand::CreateIndexBuffer {
                    handle,
                    index32,
                    data: data.to_vec(),
                });
                handle
            }
            Err(err) => {
                self.report_error("create_index_buffer", &err);
                IndexBufferHandle::INVALID
            }
        }
    }

    /// Creates a texture. Returns [`TextureHandle::INVALID`] on failure.
    pub fn create_texture(
        &mut self,
        descriptor: TextureDescriptor,
        data: Option<&[u8]>,
    ) -> TextureHandle {
        match self.resources.create_texture(descriptor) {
            Ok(handle) => {
                self.pre.push(ResourceCommand::CreateTexture {
                    handle,
                    descriptor,
                    data: data.map(<[u8]>::to_vec),
                });
                handle
            }
            Err(err) => {
                self.report_error("create_texture", &err);
                TextureHandle::INVALID
            }
        }
    }

    /// Destroys a shader. Programs already linked from it stay valid.
    pub fn destroy_shader(&mut self, handle: ShaderHandle) {
        match self.resources.destroy_shader(handle) {
            Ok(()) => self.post.push(ResourceCommand::DestroyShader(handle)),
            Err(err) => self.report_error("destroy_shader", &err),
        }
    }

    /// Destroys a program.
    pub fn destroy_program(&mut self, handle: ProgramHandle) {
        match self.resources.destroy_program(handle) {
            Ok(()) => self.post.push(ResourceCommand::DestroyProgram(handle)),
            Err(err) => self.report_error("destroy_program", &err),
        }
    }

    /// Destroys a vertex buffer.
    pub fn destroy_vertex_buffer(&mut self, handle: VertexBufferHandle) {
        match self.resources.destroy_vertex_buffer(handle) {
            Ok(()) => self.post.push(ResourceCommand::DestroyVertexBuffer(handle)),
            Err(err) => self.report_error("destroy_vertex_buffer", &err),
        }
    }

    /// Destroys an index buffer.
    pub fn destroy_index_buffer(&mut self, handle: IndexBufferHandle) {
        match self.resources.destroy_index_buffer(handle) {
            Ok(()) => self.post.push(ResourceCommand::DestroyIndexBuffer(handle)),
            Err(err) => self.report_error("destroy_index_buffer", &err),
        }
    }

    /// Destroys a texture.
    pub fn destroy_texture(&mut self, handle: TextureHandle) {
        match self.resources.destroy_texture(handle) {
            Ok(()) => self.post.push(ResourceCommand::DestroyTexture(handle)),
            Err(err) => self.report_error("destroy_texture", &err),
        }
    }

    // --- Uniforms ---

    /// Creates or shares the uniform called `name`.
    ///
    /// If a uniform with that name is live, its handle is returned and its
    /// reference count incremented. Returns [`UniformHandle::INVALID`] when the
    /// table is full.
    pub fn create_uniform(&mut self, name: &str, ty: UniformType, num: u16) -> UniformHandle {
        match self.uniforms.create(name, ty, num) {
            Ok(Created::New(handle)) => {
                let num = num.max(1);
                self.pre.push(ResourceCommand::CreateUniform {
                    handle,
                    name: name.to_string(),
                    ty,
                    num,
                });
                handle
            }
            Ok(shared @ Created::Shared(_)) => shared.handle(),
            Err(err) => {
                self.report_error("create_uniform", &err);
                UniformHandle::INVALID
            }
        }
    }

    /// Drops one reference to a uniform; the last reference frees it.
    pub fn destroy_uniform(&mut self, handle: UniformHandle) {
        match self.uniforms.destroy(handle) {
            Ok(true) => self.post.push(ResourceCommand::DestroyUniform(handle)),
            Ok(false) => {}
            Err(err) => self.report_error("destroy_uniform", &err),
        }
    }

    /// Name, type and size of a live uniform.
    pub fn uniform_info(&self, handle: UniformHandle) -> Option<&UniformInfo> {
        self.uniforms.info(handle)
    }

    /// The value most recently submitted for a live uniform.
    pub fn uniform_value(&self, handle: UniformHandle) -> Option<&[u8]> {
        self.uniforms.value(handle)
    }

    // --- Submission ---

    /// Queues `draw` on view `id` and returns the number of draw calls accepted
    /// this frame.
    ///
    /// A draw with neither a program nor geometry only touches the view. A draw
    /// that fails validation is reported and dropped; the view is still touched.
    pub fn submit(&mut self, id: ViewId, draw: DrawCall, depth: u32) -> u32 {
        self.touch(id);

        if !draw.program.is_valid() && !draw.has_geometry() {
            log::trace!("Empty draw on {id} treated as a touch.");
            return self.draws_this_frame;
        }

        if self.draws_this_frame >= self.settings.limits.max_draw_calls {
            self.discarded_this_frame += 1;
            self.report(
                DiagnosticKind::DebugCheck,
                format!(
                    "submit on {id}: more than {} draw calls this frame",
                    self.settings.limits.max_draw_calls
                ),
            );
            return self.draws_this_frame;
        }

        match self.resolve_draw(draw, depth) {
            Ok(command) => {
                log::trace!(
                    "Draw #{} on {id} at depth {depth}: {:?}.",
                    command.sequence,
                    command.state
                );
                self.queued[id.0 as usize].push(command);
                self.sequence += 1;
                self.draws_this_frame += 1;
            }
            Err(err) => {
                self.discarded_this_frame += 1;
                self.report_error(&format!("submit on {id}"), &err);
            }
        }
        self.draws_this_frame
    }

    fn resolve_draw(
        &mut self,
        draw: DrawCall,
        depth: u32,
    ) -> Result<DrawCommand, ResourceError> {
        if !self.resources.has_program(draw.program) {
            return Err(ResourceError::InvalidHandle { kind: "program" });
        }

        let vertices = match draw.vertex_buffer {
            Some(buffer) => {
                let len = self.resources.vertex_count(buffer)?;
                let (start, count) = draw.vertex_range.unwrap_or((0, len));
                check_range("vertex buffer", start, count, len)?;
                VertexRange { start, count }
            }
            None => VertexRange {
                start: 0,
                count: draw.vertex_count,
            },
        };

        let index_buffer = match draw.index_buffer {
            Some(buffer) => {
                let len = self.resources.index_count(buffer)?;
                let (start, count) = draw.index_range.unwrap_or((0, len));
                check_range("index buffer", start, count, len)?;
                Some((buffer, IndexRange { start, count }))
            }
            None => None,
        };

        let mut textures = draw.textures;
        for binding in &textures {
            if binding.stage >= self.settings.limits.max_texture_stages {
                return Err(ResourceError::RangeOutOfBounds {
                    kind: "texture stage table",
                    end: binding.stage as u64 + 1,
                    len: self.settings.limits.max_texture_stages as u32,
                });
            }
            if !self.resources.has_texture(binding.texture) {
                return Err(ResourceError::InvalidHandle { kind: "texture" });
            }
            if self.uniforms.info(binding.sampler).is_none() {
                return Err(ResourceError::InvalidHandle { kind: "sampler uniform" });
            }
        }
        textures.sort_by_key(|b| b.stage);

        let uniforms = draw
            .uniforms
            .iter()
            .map(|pending| {
                self.uniforms
                    .resolve(pending.handle, pending.count, &pending.data)
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Values become current only once the whole draw is accepted.
        for upload in &uniforms {
            self.uniforms.record(upload);
        }

        Ok(DrawCommand {
            sequence: self.sequence,
            depth,
            program: draw.program,
            state: draw.state,
            blend_factor: draw.blend_factor,
            stencil_front: draw.stencil_front,
            stencil_back: draw.stencil_back,
            transform: draw.transform.unwrap_or(IDENTITY),
            vertex_buffer: draw.vertex_buffer,
            vertices,
            index_buffer,
            instances: draw.instances,
            textures,
            uniforms,
            scissor: draw.scissor,
        })
    }

    /// Closes the current frame and hands it to the backend. Returns the new
    /// frame number; the first call returns 1.
    ///
    /// Views are emitted in ascending id. Within a view, draws are sorted by
    /// ascending depth, descending depth, or kept in submission order, per the
    /// view's [`ViewMode`]. Sorts are stable, so equal depths keep submission
    /// order.
    pub fn frame(&mut self) -> u32 {
        let started = Instant::now();
        let frame_number = self.frame_number.wrapping_add(1);

        let mut stats = RenderStats {
            frame_number,
            discarded_draw_calls: self.discarded_this_frame,
            ..Default::default()
        };

        let pending: Vec<ViewId> = self.views.pending().collect();
        let mut passes = Vec::with_capacity(pending.len());
        for id in pending {
            let view = self.views.get(id);
            let mut draws = std::mem::take(&mut self.queued[id.0 as usize]);
            match view.mode {
                ViewMode::Default => draws.sort_by_key(|d| d.depth),
                ViewMode::Sequential => draws.sort_by_key(|d| d.sequence),
                ViewMode::DepthDescending => draws.sort_by_key(|d| Reverse(d.depth)),
            }

            let clear = (!view.clear.flags.is_empty()).then(|| ClearCommand {
                flags: view.clear.flags,
                rgba: view.clear.rgba,
                depth: view.clear.depth,
                stencil: view.clear.stencil,
            });

            stats.views += 1;
            stats.clears += u32::from(clear.is_some());
            stats.draw_calls += draws.len() as u32;
            stats.primitives += draws.iter().map(DrawCommand::primitive_count).sum::<u64>();

            passes.push(ViewPass {
                id,
                name: view.name.clone(),
                rect: view.rect,
                scissor: view.scissor,
                view: view.view,
                projection: view.projection,
                mode: view.mode,
                clear,
                draws,
            });
        }
        self.views.end_frame();

        let list = CommandList {
            frame_number,
            width: self.settings.width,
            height: self.settings.height,
            reset: self.settings.reset,
            debug: self.settings.debug,
            pre: std::mem::take(&mut self.pre),
            views: passes,
            post: std::mem::take(&mut self.post),
        };
        stats.cpu_submit_time_ms = started.elapsed().as_secs_f32() * 1000.0;

        self.frame_number = frame_number;
        self.sequence = 0;
        self.draws_this_frame = 0;
        self.discarded_this_frame = 0;

        if self.device_lost {
            log::debug!("Frame {frame_number} dropped: device lost.");
        } else {
            match self.backend.execute(list) {
                Ok(backend_stats) => stats = stats.merged_with_backend(&backend_stats),
                Err(err) => {
                    self.report(err.diagnostic_kind(), err.to_string());
                    if err.is_fatal() {
                        self.device_lost = true;
                    }
                }
            }
        }

        log::debug!(
            "Frame {frame_number}: {} view(s), {} clear(s), {} draw(s), {} discarded.",
            stats.views,
            stats.clears,
            stats.draw_calls,
            stats.discarded_draw_calls
        );
        self.stats = stats;
        frame_number
    }

    /// Shuts the backend down and reports any handles still alive.
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for (kind, live) in self.resources.live_counts() {
            if live > 0 {
                log::warn!("Leaked {live} {kind} handle(s) at shutdown.");
            }
        }
        for (name, refs) in self.uniforms.live() {
            log::warn!("Leaked uniform '{name}' ({refs} reference(s)) at shutdown.");
        }

        log::info!(
            "Shutting down '{}' backend after {} frame(s).",
            self.backend.name(),
            self.frame_number
        );
        self.backend.shutdown();
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.release();
    }
}

fn check_range(
    kind: &'static str,
    start: u32,
    count: u32,
    len: u32,
) -> Result<(), ResourceError> {
    let end = start as u64 + count as u64;
    if end > len as u64 {
        return Err(ResourceError::RangeOutOfBounds { kind, end, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct NullBackend {
        executed: u32,
    }

    impl RenderBackend for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        fn init(&mut self, settings: &Settings) -> Result<BackendCaps, RenderError> {
            Ok(BackendCaps {
                max_views: 256,
                max_draw_calls: settings.limits.max_draw_calls,
                max_texture_size: settings.limits.max_texture_size,
                max_texture_stages: settings.limits.max_texture_stages,
                threaded: false,
            })
        }

        fn execute(&mut self, _list: CommandList) -> Result<RenderStats, RenderError> {
            self.executed += 1;
            Ok(RenderStats::default())
        }

        fn shutdown(&mut self) {}
    }

    fn context() -> Context {
        Context::init(Box::new(NullBackend::default()), Settings::default()).unwrap()
    }

    #[test]
    fn view_state_machine() {
        let mut ctx = context();
        let id = ViewId(4);
        assert_eq!(ctx.view_state(id), ViewState::Uninitialized);

        ctx.set_view_rect(id, 0, 0, 640, 480);
        assert_eq!(ctx.view_state(id), ViewState::Configured);

        ctx.touch(id);
        assert_eq!(ctx.view_state(id), ViewState::PendingSubmit);

        ctx.frame();
        assert_eq!(ctx.view_state(id), ViewState::Configured);

        ctx.reset_view(id);
        assert_eq!(ctx.view_state(id), ViewState::Uninitialized);
    }

    #[test]
    fn empty_draw_is_a_touch() {
        let mut ctx = context();
        assert_eq!(ctx.submit(ViewId(0), DrawCall::new(), 0), 0);
        assert_eq!(ctx.view_state(ViewId(0)), ViewState::PendingSubmit);
        assert!(ctx.diagnostics().drain().is_empty());
    }

    #[test]
    fn geometry_without_program_is_reported() {
        let mut ctx = context();
        let draw = DrawCall::new().with_vertex_count(3);
        assert_eq!(ctx.submit(ViewId(0), draw, 0), 0);

        let reported = ctx.diagnostics().drain();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].kind, DiagnosticKind::DebugCheck);
        assert_eq!(ctx.view_state(ViewId(0)), ViewState::PendingSubmit);

        ctx.frame();
        assert_eq!(ctx.stats().discarded_draw_calls, 1);
    }

    #[test]
    fn failed_creation_returns_invalid_and_reports() {
        let mut ctx = context();
        assert_eq!(ctx.create_shader(b"nope"), ShaderHandle::INVALID);
        let texture = ctx.create_texture(
            TextureDescriptor::new_2d(0, 0, crate::resource::TextureFormat::RGBA8),
            None,
        );
        assert!(!texture.is_valid());

        let kinds: Vec<_> = ctx.diagnostics().drain().into_iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::InvalidShader, DiagnosticKind::UnableToCreateTexture]
        );
    }

    #[test]
    fn range_check() {
        assert!(check_range("vertex buffer", 0, 3, 3).is_ok());
        assert!(check_range("vertex buffer", 1, 3, 3).is_err());
        assert!(check_range("index buffer", u32::MAX, 1, 3).is_err());
    }
}
