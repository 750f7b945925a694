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

//! The public-facing SDK for Stratum.
//!
//! Applications implement [`Application`] and hand it to [`Engine::run`], which
//! owns the [`Context`] for the whole session, calls `frame()` after every
//! update and stops on the first fatal diagnostic.

#![warn(missing_docs)]

pub mod config;

use anyhow::{Context as _, Result};
use stratum_core::{Context, RenderBackend, Settings};

pub use config::{load_settings, load_settings_or_default, save_settings, SettingsError};

/// Everything an application usually needs.
pub mod prelude {
    pub use stratum_core::state::blend::{
        blend_equation, blend_equation_separate, blend_function, blend_function_separate,
    };
    pub use stratum_core::{
        Attrib, AttribType, BackendKind, BlendEquation, BlendFactor, ClearFlags, CommandList,
        CompareFunction, Context, CullMode, DebugFlags, Diagnostic, DiagnosticKind, DrawCall,
        IndexBufferHandle, PrimitiveTopology, ProgramHandle, Rect, RenderBackend, RenderState,
        RenderStats, ResetFlags, Settings, ShaderHandle, StencilOperation, StencilState,
        TextureDescriptor, TextureFormat, TextureHandle, UniformHandle, UniformType,
        VertexBufferHandle, VertexLayout, ViewId, ViewMode,
    };
    pub use stratum_infra::{create_backend, FrameObserver, ImmediateBackend, ThreadedBackend};

    pub use crate::{Application, Engine, RunSummary};
}

/// A program driven by [`Engine::run`].
pub trait Application: Sized + 'static {
    /// Called once after the context is up, to create resources and configure views.
    fn new(ctx: &mut Context) -> Result<Self>;

    /// Called once per frame to record views and draws. Return `false` to stop.
    fn update(&mut self, ctx: &mut Context) -> bool;

    /// Called once before the context shuts down, to release resources.
    fn shutdown(&mut self, _ctx: &mut Context) {}
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames submitted.
    pub frames: u32,
    /// Non-fatal diagnostics received over the run.
    pub diagnostics: usize,
}

/// The entry point.
pub struct Engine;

impl Engine {
    /// Runs `A` on the backend selected by `settings.backend` until its
    /// `update` returns `false`.
    pub fn run<A: Application>(settings: Settings) -> Result<RunSummary> {
        let backend = stratum_infra::create_backend(settings.backend);
        Self::run_with_backend::<A>(backend, settings)
    }

    /// Runs `A` on an explicit backend.
    ///
    /// Returns an error if the context cannot be created, if the application
    /// fails to start, or if a fatal diagnostic is reported.
    pub fn run_with_backend<A: Application>(
        backend: Box<dyn RenderBackend>,
        settings: Settings,
    ) -> Result<RunSummary> {
        Self::run_with(backend, settings, A::new)
    }

    /// Runs the application produced by `build` on an explicit backend.
    ///
    /// `build` replaces [`Application::new`] so the caller can capture its own
    /// configuration.
    pub fn run_with<A, F>(
        backend: Box<dyn RenderBackend>,
        settings: Settings,
        build: F,
    ) -> Result<RunSummary>
    where
        A: Application,
        F: FnOnce(&mut Context) -> Result<A>,
    {
        log::info!("Stratum SDK: Starting...");
        let mut ctx = Context::init(backend, settings).context("Failed to initialize renderer")?;
        let mut app = build(&mut ctx).context("Application failed to start")?;

        let mut summary = RunSummary {
            frames: 0,
            diagnostics: 0,
        };
        let mut fatal = None;

        while app.update(&mut ctx) {
            summary.frames = ctx.frame();

            for diagnostic in ctx.diagnostics().drain() {
                if diagnostic.kind.is_fatal() {
                    fatal = Some(diagnostic);
                    break;
                }
                summary.diagnostics += 1;
            }
            if fatal.is_some() {
                break;
            }
        }

        app.shutdown(&mut ctx);
        // Flush destructions recorded by the application.
        if fatal.is_none() {
            ctx.frame();
        }
        ctx.shutdown();

        match fatal {
            Some(diagnostic) => Err(anyhow::anyhow!("Rendering stopped: {diagnostic}")),
            None => {
                log::info!(
                    "Stratum SDK: Finished after {} frame(s), {} diagnostic(s).",
                    summary.frames,
                    summary.diagnostics
                );
                Ok(summary)
            }
        }
    }
}
