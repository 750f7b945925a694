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

// Stratum Sandbox
// Drives the sequencer through a few canned scenes and logs what reaches the backend.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stratum_sdk::prelude::*;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    abgr: u32,
}

impl Vertex {
    fn layout() -> VertexLayout {
        VertexLayout::builder()
            .add(Attrib::Position, 3, AttribType::Float)
            .add_normalized(Attrib::Color0, 4, AttribType::Uint8)
            .build()
    }
}

const QUAD: &[Vertex] = &[
    Vertex { position: [-0.5, 0.5, 0.0], abgr: 0xff00_00ff },
    Vertex { position: [0.5, 0.5, 0.0], abgr: 0xff00_ff00 },
    Vertex { position: [-0.5, -0.5, 0.0], abgr: 0xffff_0000 },
    Vertex { position: [0.5, -0.5, 0.0], abgr: 0xffff_ffff },
];

const QUAD_INDICES: &[u16] = &[0, 1, 2, 1, 3, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scene {
    /// One cleared view with a single quad.
    Hello,
    /// An opaque view sorted front to back and a transparent one sorted back to front.
    Sorted,
    /// A sequential overlay view drawn with stencil masking.
    Overlay,
    /// Per-frame uniform updates.
    Uniforms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Immediate,
    Threaded,
}

/// Runs a Stratum sandbox scene.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The scene to run.
    #[arg(long, value_enum, default_value_t = Scene::Hello)]
    scene: Scene,

    /// Number of frames to submit.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Overrides the backend from the settings file.
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// A JSON settings file. Defaults are used when it is missing.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log frame statistics every N frames.
    #[arg(long, default_value_t = 30)]
    report_every: u32,
}

/// Builds a placeholder shader binary the backends accept.
fn shader_blob(stage_magic: &[u8; 3]) -> Vec<u8> {
    let mut code = stage_magic.to_vec();
    code.push(11);
    code.extend_from_slice(&[0; 12]);
    code
}

/// Clamps a back-buffer dimension to the range a view rectangle can hold.
fn view_extent(size: u32) -> u16 {
    u16::try_from(size).unwrap_or(u16::MAX)
}

struct SandboxApp {
    scene: Scene,
    frames: u32,
    frame: u32,
    program: ProgramHandle,
    vertex_buffer: VertexBufferHandle,
    index_buffer: IndexBufferHandle,
    tint: UniformHandle,
    time: UniformHandle,
}

impl SandboxApp {
    fn build(ctx: &mut Context, args: &Args) -> Result<Self> {
        let vs = ctx.create_shader(&shader_blob(b"VSH"));
        let fs = ctx.create_shader(&shader_blob(b"FSH"));
        let program = ctx.create_program(vs, fs);
        // The program keeps both shaders alive.
        ctx.destroy_shader(vs);
        ctx.destroy_shader(fs);
        if !program.is_valid() {
            anyhow::bail!("failed to create the sandbox program");
        }

        let vertex_buffer =
            ctx.create_vertex_buffer(bytemuck::cast_slice(QUAD), &Vertex::layout());
        let index_buffer = ctx.create_index_buffer(bytemuck::cast_slice(QUAD_INDICES), false);
        let tint = ctx.create_uniform("u_tint", UniformType::Vec4, 1);
        let time = ctx.create_uniform("u_time", UniformType::Vec4, 1);

        let width = view_extent(ctx.settings().width);
        let height = view_extent(ctx.settings().height);
        ctx.set_view_name(ViewId(0), "scene");
        ctx.set_view_rect(ViewId(0), 0, 0, width, height);
        ctx.set_view_clear(
            ViewId(0),
            ClearFlags::COLOR | ClearFlags::DEPTH,
            0x3030_30ff,
            1.0,
            0,
        );

        match args.scene {
            Scene::Hello | Scene::Uniforms => {}
            Scene::Sorted => {
                ctx.set_view_name(ViewId(1), "transparent");
                ctx.set_view_rect(ViewId(1), 0, 0, width, height);
                ctx.set_view_mode(ViewId(1), ViewMode::DepthDescending);
            }
            Scene::Overlay => {
                ctx.set_view_clear(
                    ViewId(0),
                    ClearFlags::COLOR | ClearFlags::DEPTH | ClearFlags::STENCIL,
                    0x1010_10ff,
                    1.0,
                    0,
                );
                ctx.set_view_name(ViewId(2), "overlay");
                ctx.set_view_rect(ViewId(2), 0, 0, width, height);
                ctx.set_view_sequential(ViewId(2), true);
            }
        }

        log::info!("Sandbox scene {:?} ready for {} frame(s).", args.scene, args.frames);
        Ok(Self {
            scene: args.scene,
            frames: args.frames,
            frame: 0,
            program,
            vertex_buffer,
            index_buffer,
            tint,
            time,
        })
    }

    fn quad(&self) -> DrawCall {
        DrawCall::new()
            .with_program(self.program)
            .with_vertex_buffer(self.vertex_buffer)
            .with_index_buffer(self.index_buffer)
    }

    fn translated(x: f32, y: f32, z: f32) -> [f32; 16] {
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        m[12] = x;
        m[13] = y;
        m[14] = z;
        m
    }

    fn record_sorted(&self, ctx: &mut Context) {
        for i in 0..4u32 {
            let z = i as f32 * 0.25;
            let opaque = self
                .quad()
                .with_transform(Self::translated(-0.5 + z, 0.0, z))
                .with_uniform(self.tint, &[1.0f32, 1.0, 1.0, 1.0], 1);
            ctx.submit(ViewId(0), opaque, i * 100);

            let state = RenderState::DEFAULT.with_blend(RenderState::BLEND_ALPHA)
                & !RenderState::DEPTH_WRITE;
            let glass = self
                .quad()
                .with_state(state)
                .with_transform(Self::translated(0.5 - z, 0.0, z))
                .with_uniform(self.tint, &[0.2f32, 0.6, 1.0, 0.5], 1);
            ctx.submit(ViewId(1), glass, i * 100);
        }
    }

    fn record_overlay(&self, ctx: &mut Context) {
        let write_mask = StencilState::test(CompareFunction::Always)
            | StencilState::reference_value(1)
            | StencilState::read_mask(0xff)
            | StencilState::pass(StencilOperation::Replace);
        let mask = self
            .quad()
            .with_state(RenderState::NONE)
            .with_stencil(write_mask, StencilState::NONE);
        ctx.submit(ViewId(0), mask, 0);

        let read_mask = StencilState::test(CompareFunction::Equal)
            | StencilState::reference_value(1)
            | StencilState::read_mask(0xff);
        let panel_state = (RenderState::COLOR_WRITE | RenderState::ALPHA_WRITE)
            .with_blend(RenderState::BLEND_NORMAL);
        for (layer, depth) in [(0.0f32, 30u32), (0.1, 10), (0.2, 20)] {
            // Sequential views keep submission order whatever the depth.
            let panel = self
                .quad()
                .with_state(panel_state)
                .with_stencil(read_mask, StencilState::NONE)
                .with_transform(Self::translated(layer, layer, 0.0));
            ctx.submit(ViewId(2), panel, depth);
        }
    }

    fn record_uniforms(&self, ctx: &mut Context) {
        let t = self.frame as f32 / 60.0;
        let draw = self
            .quad()
            .with_state(RenderState::DEFAULT.with_blend(RenderState::BLEND_ADD))
            .with_uniform(self.time, &[t, t.sin(), t.cos(), 0.0], 1)
            .with_uniform(self.tint, &[t.sin().abs(), 0.5, 1.0, 1.0], 1);
        ctx.submit(ViewId(0), draw, 0);
    }
}

impl Application for SandboxApp {
    fn new(ctx: &mut Context) -> Result<Self> {
        Self::build(ctx, &Args::parse())
    }

    fn update(&mut self, ctx: &mut Context) -> bool {
        if self.frame >= self.frames {
            return false;
        }
        match self.scene {
            Scene::Hello => {
                ctx.submit(ViewId(0), self.quad(), 0);
            }
            Scene::Sorted => self.record_sorted(ctx),
            Scene::Overlay => self.record_overlay(ctx),
            Scene::Uniforms => self.record_uniforms(ctx),
        }
        self.frame += 1;
        true
    }

    fn shutdown(&mut self, ctx: &mut Context) {
        ctx.destroy_uniform(self.time);
        ctx.destroy_uniform(self.tint);
        ctx.destroy_index_buffer(self.index_buffer);
        ctx.destroy_vertex_buffer(self.vertex_buffer);
        ctx.destroy_program(self.program);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => stratum_sdk::load_settings_or_default(path),
        None => Settings::default(),
    };
    if let Some(backend) = args.backend {
        settings.backend = match backend {
            Backend::Immediate => BackendKind::Immediate,
            Backend::Threaded => BackendKind::Threaded,
        };
    }

    let report_every = args.report_every.max(1);
    let observer = move |list: &CommandList, stats: &RenderStats| {
        if list.frame_number % report_every == 0 {
            log::info!(
                "Frame {}: {} view(s), {} draw(s), {} primitive(s), backend {:.3} ms",
                list.frame_number,
                stats.views,
                stats.draw_calls,
                stats.primitives,
                stats.backend_time_ms
            );
        }
    };
    let immediate = ImmediateBackend::new().with_observer(observer);
    let backend: Box<dyn RenderBackend> = match settings.backend {
        BackendKind::Immediate => Box::new(immediate),
        BackendKind::Threaded => Box::new(ThreadedBackend::new(immediate)),
    };

    let summary = Engine::run_with(backend, settings, |ctx| SandboxApp::build(ctx, &args))?;
    log::info!(
        "Sandbox finished: {} frame(s), {} diagnostic(s).",
        summary.frames,
        summary.diagnostics
    );
    Ok(())
}
