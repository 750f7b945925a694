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

use approx::assert_relative_eq;
use std::sync::{Arc, Mutex};
use stratum_core::{
    Attrib, AttribType, BackendCaps, ClearFlags, CommandList, Context, DiagnosticKind, DrawCall,
    ProgramHandle, RenderBackend, RenderError, RenderState, RenderStats, ResourceCommand,
    Settings, UniformType, VertexLayout, ViewId, ViewMode,
};

// --- RECORDING BACKEND FOR THESE TESTS ---
#[derive(Debug, Clone, Default)]
struct RecordingBackend {
    lists: Arc<Mutex<Vec<CommandList>>>,
    fail_with: Option<RenderError>,
}

impl RecordingBackend {
    fn take(&self) -> Vec<CommandList> {
        std::mem::take(&mut *self.lists.lock().unwrap())
    }
}

impl RenderBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
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

    fn execute(&mut self, list: CommandList) -> Result<RenderStats, RenderError> {
        self.lists.lock().unwrap().push(list);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(RenderStats::default()),
        }
    }

    fn shutdown(&mut self) {}
}

fn setup() -> (Context, RecordingBackend) {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = RecordingBackend::default();
    let ctx = Context::init(Box::new(backend.clone()), Settings::default())
        .expect("recording backend always initializes");
    (ctx, backend)
}

fn shader(magic: &[u8; 3]) -> Vec<u8> {
    let mut code = magic.to_vec();
    code.push(11);
    code.extend_from_slice(&[0u8; 8]);
    code
}

fn program(ctx: &mut Context) -> ProgramHandle {
    let vs = ctx.create_shader(&shader(b"VSH"));
    let fs = ctx.create_shader(&shader(b"FSH"));
    let program = ctx.create_program(vs, fs);
    assert!(program.is_valid());
    program
}

fn triangle_draw(ctx: &mut Context, program: ProgramHandle) -> DrawCall {
    let layout = VertexLayout::builder()
        .add(Attrib::Position, 3, AttribType::Float)
        .build();
    let vertices: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let vb = ctx.create_vertex_buffer(bytemuck::cast_slice(&vertices), &layout);
    DrawCall::new().with_program(program).with_vertex_buffer(vb)
}

#[test]
fn test_touched_view_with_clear_produces_one_clear_and_no_draws() {
    // --- 1. ARRANGE ---
    let (mut ctx, backend) = setup();
    ctx.set_view_clear(
        ViewId(0),
        ClearFlags::COLOR | ClearFlags::DEPTH,
        0x3030_30ff,
        1.0,
        0,
    );

    // --- 2. ACT ---
    ctx.touch(ViewId(0));
    let frame = ctx.frame();

    // --- 3. ASSERT ---
    assert_eq!(frame, 1);
    let lists = backend.take();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].clear_count(), 1);
    assert_eq!(lists[0].draw_count(), 0);

    let clear = lists[0].views[0].clear.expect("touched view must clear");
    assert_eq!(clear.rgba, 0x3030_30ff);
    assert_relative_eq!(clear.depth, 1.0);
}

#[test]
fn test_untouched_view_does_not_clear() {
    let (mut ctx, backend) = setup();
    ctx.set_view_clear(ViewId(1), ClearFlags::COLOR, 0xff00_00ff, 1.0, 0);

    ctx.frame();

    let lists = backend.take();
    assert!(lists[0].views.is_empty());
    assert_eq!(ctx.stats().clears, 0);
}

#[test]
fn test_default_mode_sorts_by_ascending_depth() {
    let (mut ctx, backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);

    // A at depth 10, B at depth 5.
    ctx.submit(ViewId(0), draw.clone().with_state(RenderState::DEFAULT), 10);
    let count = ctx.submit(ViewId(0), draw.with_state(RenderState::BLEND_ALPHA), 5);
    assert_eq!(count, 2);
    ctx.frame();

    let lists = backend.take();
    let draws = &lists[0].views[0].draws;
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].depth, 5, "B must come first");
    assert_eq!(draws[0].state, RenderState::BLEND_ALPHA);
    assert_eq!(draws[1].depth, 10);
}

#[test]
fn test_sequential_mode_keeps_submission_order() {
    let (mut ctx, backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);
    ctx.set_view_mode(ViewId(0), ViewMode::Sequential);

    ctx.submit(ViewId(0), draw.clone(), 10);
    ctx.submit(ViewId(0), draw, 5);
    ctx.frame();

    let lists = backend.take();
    let depths: Vec<u32> = lists[0].views[0].draws.iter().map(|d| d.depth).collect();
    assert_eq!(depths, vec![10, 5]);
}

#[test]
fn test_depth_descending_mode_and_stable_ties() {
    let (mut ctx, backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);
    ctx.set_view_mode(ViewId(0), ViewMode::DepthDescending);

    ctx.submit(ViewId(0), draw.clone().with_instances(1), 3);
    ctx.submit(ViewId(0), draw.clone().with_instances(2), 7);
    ctx.submit(ViewId(0), draw.with_instances(3), 3);
    ctx.frame();

    let lists = backend.take();
    let order: Vec<(u32, u32)> = lists[0].views[0]
        .draws
        .iter()
        .map(|d| (d.depth, d.instances))
        .collect();
    assert_eq!(order, vec![(7, 2), (3, 1), (3, 3)]);
}

#[test]
fn test_views_are_emitted_in_ascending_id() {
    let (mut ctx, backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);

    ctx.submit(ViewId(9), draw.clone(), 0);
    ctx.touch(ViewId(2));
    ctx.submit(ViewId(0), draw, 0);
    ctx.frame();

    let lists = backend.take();
    let ids: Vec<u8> = lists[0].views.iter().map(|v| v.id.0).collect();
    assert_eq!(ids, vec![0, 2, 9]);
}

#[test]
fn test_uniform_create_set_submit_destroy_recreate() {
    // --- 1. ARRANGE ---
    let (mut ctx, backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);
    let u = ctx.create_uniform("u_color", UniformType::Vec4, 1);
    assert!(u.is_valid());

    // --- 2. ACT ---
    let color = [1.0f32, 0.0, 0.0, 1.0];
    ctx.submit(ViewId(0), draw.with_uniform(u, &color, 1), 0);
    ctx.frame();

    // --- 3. ASSERT ---
    let lists = backend.take();
    let uploads = &lists[0].views[0].draws[0].uniforms;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].handle, u);
    assert_eq!(uploads[0].data.as_slice(), bytemuck::cast_slice::<f32, u8>(&color));
    assert_eq!(ctx.uniform_value(u), Some(bytemuck::cast_slice::<f32, u8>(&color)));
    assert!(lists[0]
        .pre
        .iter()
        .any(|c| matches!(c, ResourceCommand::CreateUniform { name, .. } if name == "u_color")));

    // Destroy, then re-create the same name: a new, independent handle.
    ctx.destroy_uniform(u);
    assert!(ctx.uniform_info(u).is_none());
    let again = ctx.create_uniform("u_color", UniformType::Vec4, 1);
    assert!(again.is_valid());
    assert_ne!(again, u);
    assert_eq!(ctx.uniform_info(again).map(|i| i.name.as_str()), Some("u_color"));
}

#[test]
fn test_shared_uniform_survives_one_destroy() {
    let (mut ctx, _backend) = setup();
    let a = ctx.create_uniform("u_time", UniformType::Vec4, 1);
    let b = ctx.create_uniform("u_time", UniformType::Vec4, 1);
    assert_eq!(a, b);

    ctx.destroy_uniform(a);
    assert!(ctx.uniform_info(b).is_some());
    ctx.destroy_uniform(b);
    assert!(ctx.uniform_info(b).is_none());
}

#[test]
fn test_stale_uniform_in_draw_is_discarded() {
    let (mut ctx, _backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);
    let u = ctx.create_uniform("u_gone", UniformType::Vec4, 1);
    ctx.destroy_uniform(u);

    let count = ctx.submit(ViewId(0), draw.with_uniform(u, &[0.0f32; 4], 1), 0);

    assert_eq!(count, 0);
    let reported = ctx.diagnostics().drain();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].kind, DiagnosticKind::DebugCheck);
}

#[test]
fn test_discarded_draw_leaves_uniform_values_untouched() {
    // --- 1. ARRANGE ---
    let (mut ctx, _backend) = setup();
    let program = program(&mut ctx);
    let draw = triangle_draw(&mut ctx, program);
    let tint = ctx.create_uniform("u_tint", UniformType::Vec4, 1);
    let gone = ctx.create_uniform("u_gone", UniformType::Vec4, 1);
    ctx.destroy_uniform(gone);

    // --- 2. ACT ---
    let draw = draw
        .with_uniform(tint, &[1.0f32, 0.5, 0.25, 1.0], 1)
        .with_uniform(gone, &[0.0f32; 4], 1);
    let count = ctx.submit(ViewId(0), draw, 0);

    // --- 3. ASSERT ---
    assert_eq!(count, 0);
    assert_eq!(ctx.diagnostics().drain().len(), 1);
    // The valid uniform ahead of the stale one was never submitted.
    assert_eq!(ctx.uniform_value(tint), Some(&[0u8; 16][..]));
}

#[test]
fn test_vertex_range_past_buffer_end_is_discarded() {
    let (mut ctx, _backend) = setup();
    let program = program(&mut ctx);
    let layout = VertexLayout::builder()
        .add(Attrib::Position, 2, AttribType::Float)
        .build();
    let vb = ctx.create_vertex_buffer(&[0u8; 8 * 3], &layout);

    let ok = DrawCall::new()
        .with_program(program)
        .with_vertex_buffer_range(vb, 0, 3);
    let bad = DrawCall::new()
        .with_program(program)
        .with_vertex_buffer_range(vb, 1, 3);

    assert_eq!(ctx.submit(ViewId(0), ok, 0), 1);
    assert_eq!(ctx.submit(ViewId(0), bad, 0), 1);
    ctx.frame();
    assert_eq!(ctx.stats().draw_calls, 1);
    assert_eq!(ctx.stats().discarded_draw_calls, 1);
    assert_eq!(ctx.stats().primitives, 1);
}

#[test]
fn test_two_frames_advance_counter_by_two() {
    let (mut ctx, backend) = setup();
    let before = ctx.frame_number();

    ctx.frame();
    let after = ctx.frame();

    assert_eq!(after, before + 2);
    let frames: Vec<u32> = backend.take().iter().map(|l| l.frame_number).collect();
    assert_eq!(frames, vec![before + 1, before + 2]);
}

#[test]
fn test_resources_flow_through_pre_and_post() {
    let (mut ctx, backend) = setup();
    let program = program(&mut ctx);
    ctx.frame();
    let first = backend.take();
    assert_eq!(first[0].pre.len(), 3, "two shaders and a program");
    assert!(first[0].post.is_empty());

    ctx.destroy_program(program);
    ctx.frame();
    let second = backend.take();
    assert!(second[0].pre.is_empty());
    assert_eq!(
        second[0].post,
        vec![ResourceCommand::DestroyProgram(program)]
    );

    // The handle is gone at once, not at the next frame.
    let draw = DrawCall::new().with_program(program).with_vertex_count(3);
    assert_eq!(ctx.submit(ViewId(0), draw, 0), 0);
}

#[test]
fn test_device_lost_is_reported_once_and_stops_execution() {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = RecordingBackend {
        fail_with: Some(RenderError::DeviceLost),
        ..Default::default()
    };
    let mut ctx = Context::init(Box::new(backend.clone()), Settings::default()).unwrap();

    ctx.frame();
    assert!(ctx.is_device_lost());
    let reported = ctx.diagnostics().drain();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].kind.is_fatal());

    // The counter keeps moving; the backend is no longer called.
    assert_eq!(ctx.frame(), 2);
    assert_eq!(backend.take().len(), 1);
    assert!(ctx.diagnostics().drain().is_empty());
}

#[test]
fn test_reset_reaches_the_next_list() {
    let (mut ctx, backend) = setup();
    ctx.reset(800, 600, stratum_core::ResetFlags::MSAA_X4);
    ctx.frame();

    let lists = backend.take();
    assert_eq!((lists[0].width, lists[0].height), (800, 600));
    assert_eq!(lists[0].reset, stratum_core::ResetFlags::MSAA_X4);
}

#[test]
fn test_minimum_specs_are_enforced() {
    #[derive(Debug)]
    struct TinyBackend;

    impl RenderBackend for TinyBackend {
        fn name(&self) -> &str {
            "tiny"
        }
        fn init(&mut self, _settings: &Settings) -> Result<BackendCaps, RenderError> {
            Ok(BackendCaps {
                max_views: 256,
                max_draw_calls: 16,
                max_texture_size: 1024,
                max_texture_stages: 4,
                threaded: false,
            })
        }
        fn execute(&mut self, _list: CommandList) -> Result<RenderStats, RenderError> {
            Ok(RenderStats::default())
        }
        fn shutdown(&mut self) {}
    }

    let result = Context::init(Box::new(TinyBackend), Settings::default());
    assert!(matches!(result, Err(RenderError::MinimumSpecsUnmet(_))));
}
