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

use bytemuck::{Pod, Zeroable};
use std::sync::{Arc, Mutex};
use stratum_core::{
    Attrib, AttribType, BackendCaps, ClearFlags, CommandList, Context, DrawCall, RenderBackend,
    RenderError, RenderStats, ResourceCommand, Settings, UniformType, VertexLayout, ViewId,
};
use stratum_infra::{create_backend, ImmediateBackend, ThreadedBackend};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PosColorVertex {
    x: f32,
    y: f32,
    z: f32,
    abgr: u32,
}

const QUAD: [PosColorVertex; 4] = [
    PosColorVertex { x: -1.0, y: 1.0, z: 0.0, abgr: 0xff00_00ff },
    PosColorVertex { x: 1.0, y: 1.0, z: 0.0, abgr: 0xff00_ff00 },
    PosColorVertex { x: -1.0, y: -1.0, z: 0.0, abgr: 0xffff_0000 },
    PosColorVertex { x: 1.0, y: -1.0, z: 0.0, abgr: 0xffff_ffff },
];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 3, 2];

fn layout() -> VertexLayout {
    VertexLayout::builder()
        .add(Attrib::Position, 3, AttribType::Float)
        .add_normalized(Attrib::Color0, 4, AttribType::Uint8)
        .build()
}

fn shader(magic: &[u8; 3]) -> Vec<u8> {
    let mut code = magic.to_vec();
    code.extend_from_slice(&[11, 0, 0, 0, 0]);
    code
}

/// Records `(frame_number, draw_calls, primitives)` for every executed frame.
fn recorder() -> (
    Arc<Mutex<Vec<(u32, u32, u64)>>>,
    impl FnMut(&CommandList, &RenderStats) + Send + 'static,
) {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    let observer = move |list: &CommandList, stats: &RenderStats| {
        sink.lock()
            .unwrap()
            .push((list.frame_number, stats.draw_calls, stats.primitives));
    };
    (frames, observer)
}

fn draw_quad(ctx: &mut Context) {
    let vs = ctx.create_shader(&shader(b"VSH"));
    let fs = ctx.create_shader(&shader(b"FSH"));
    let program = ctx.create_program(vs, fs);
    let vb = ctx.create_vertex_buffer(bytemuck::cast_slice(&QUAD), &layout());
    let ib = ctx.create_index_buffer(bytemuck::cast_slice(&QUAD_INDICES), false);
    let tint = ctx.create_uniform("u_tint", UniformType::Vec4, 1);

    ctx.set_view_clear(ViewId(0), ClearFlags::COLOR, 0x3030_30ff, 1.0, 0);
    let draw = DrawCall::new()
        .with_program(program)
        .with_vertex_buffer(vb)
        .with_index_buffer(ib)
        .with_uniform(tint, &[1.0f32, 1.0, 1.0, 1.0], 1);
    ctx.submit(ViewId(0), draw, 0);
}

#[test]
fn test_immediate_backend_executes_inside_frame() {
    // --- 1. ARRANGE ---
    let (frames, observer) = recorder();
    let backend = ImmediateBackend::new().with_observer(observer);
    let mut ctx = Context::init(Box::new(backend), Settings::default()).unwrap();

    // --- 2. ACT ---
    draw_quad(&mut ctx);
    ctx.frame();

    // --- 3. ASSERT ---
    // The observer ran before frame() returned.
    assert_eq!(*frames.lock().unwrap(), vec![(1, 1, 2)]);
    assert!(ctx.diagnostics().drain().is_empty());
    assert!(ctx.stats().backend_time_ms >= 0.0);
}

#[test]
fn test_immediate_backend_rejects_duplicate_creation() {
    // --- 1. ARRANGE ---
    // A context hands out a real handle for the command below.
    let mut ctx = Context::init(Box::new(ImmediateBackend::new()), Settings::default()).unwrap();
    let handle = ctx.create_uniform("u_time", UniformType::Vec4, 1);
    let create = ResourceCommand::CreateUniform {
        handle,
        name: "u_time".to_string(),
        ty: UniformType::Vec4,
        num: 1,
    };

    let mut backend = ImmediateBackend::new();
    backend.init(&Settings::default()).unwrap();

    // --- 2. ACT ---
    let first = backend.execute(CommandList {
        frame_number: 1,
        pre: vec![create.clone()],
        ..Default::default()
    });
    let second = backend.execute(CommandList {
        frame_number: 2,
        pre: vec![create],
        ..Default::default()
    });

    // --- 3. ASSERT ---
    assert!(first.is_ok());
    assert_eq!(backend.mirror().uniform_name(handle), Some("u_time"));
    assert!(matches!(second, Err(RenderError::Internal(_))));

    backend.shutdown();
    ctx.destroy_uniform(handle);
    ctx.shutdown();
}

#[test]
fn test_threaded_backend_delivers_every_frame_in_order() {
    let (frames, observer) = recorder();
    let backend = ThreadedBackend::new(ImmediateBackend::new().with_observer(observer));
    let mut ctx = Context::init(Box::new(backend), Settings::default()).unwrap();
    assert!(ctx.caps().threaded);

    draw_quad(&mut ctx);
    for _ in 0..8 {
        ctx.touch(ViewId(0));
        ctx.frame();
    }
    // Joins the submission thread, so every queued list has run.
    ctx.shutdown();

    let seen: Vec<u32> = frames.lock().unwrap().iter().map(|f| f.0).collect();
    assert_eq!(seen, (1..=8).collect::<Vec<_>>());
}

#[test]
fn test_threaded_backend_reports_worker_errors_on_next_frame() {
    #[derive(Debug)]
    struct LosingBackend;

    impl RenderBackend for LosingBackend {
        fn name(&self) -> &str {
            "losing"
        }
        fn init(&mut self, _settings: &Settings) -> Result<BackendCaps, RenderError> {
            Ok(ImmediateBackend::CAPS)
        }
        fn execute(&mut self, _list: CommandList) -> Result<RenderStats, RenderError> {
            Err(RenderError::DeviceLost)
        }
        fn shutdown(&mut self) {}
    }

    let mut ctx = Context::init(
        Box::new(ThreadedBackend::new(LosingBackend)),
        Settings::default(),
    )
    .unwrap();

    ctx.frame();
    // The failure of frame 1 can only surface once the worker has run it.
    let mut lost = false;
    for _ in 0..100 {
        ctx.frame();
        if ctx.is_device_lost() {
            lost = true;
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    assert!(lost, "device loss never reached the caller");
    assert!(ctx.diagnostics().drain().iter().any(|d| d.kind.is_fatal()));
}

/// Records every frame it runs and fails the first one with a non-fatal error.
#[derive(Debug, Default)]
struct FlakyBackend {
    executed: Arc<Mutex<Vec<u32>>>,
}

impl RenderBackend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }
    fn init(&mut self, _settings: &Settings) -> Result<BackendCaps, RenderError> {
        Ok(ImmediateBackend::CAPS)
    }
    fn execute(&mut self, list: CommandList) -> Result<RenderStats, RenderError> {
        self.executed.lock().unwrap().push(list.frame_number);
        if list.frame_number == 1 {
            return Err(RenderError::Internal("transient failure".to_string()));
        }
        Ok(RenderStats {
            frame_number: list.frame_number,
            ..Default::default()
        })
    }
    fn shutdown(&mut self) {}
}

#[test]
fn test_threaded_backend_queues_frames_after_a_worker_error() {
    // --- 1. ARRANGE ---
    let inner = FlakyBackend::default();
    let executed = Arc::clone(&inner.executed);
    let mut backend = ThreadedBackend::new(inner);
    backend.init(&Settings::default()).unwrap();

    // --- 2. ACT ---
    let mut errors = 0;
    for frame_number in 1..=4 {
        let list = CommandList {
            frame_number,
            ..Default::default()
        };
        if backend.execute(list).is_err() {
            errors += 1;
        }
        // Give the worker time to report frame 1 before the next call.
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    backend.shutdown();

    // --- 3. ASSERT ---
    // The call that reports the failure still queues its own list.
    assert_eq!(*executed.lock().unwrap(), vec![1, 2, 3, 4]);
    assert!(errors <= 1);
}

#[test]
fn test_non_fatal_worker_error_keeps_frames_flowing() {
    // --- 1. ARRANGE ---
    let inner = FlakyBackend::default();
    let executed = Arc::clone(&inner.executed);
    let mut ctx = Context::init(
        Box::new(ThreadedBackend::new(inner)),
        Settings::default(),
    )
    .unwrap();

    // --- 2. ACT ---
    let mut reported = Vec::new();
    for _ in 0..100 {
        ctx.touch(ViewId(0));
        ctx.frame();
        reported = ctx.diagnostics().drain();
        if !reported.is_empty() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    // Two more frames after the failure came back.
    ctx.touch(ViewId(0));
    ctx.frame();
    ctx.touch(ViewId(0));
    let last = ctx.frame();
    ctx.shutdown();

    // --- 3. ASSERT ---
    assert_eq!(reported.len(), 1, "worker failure never reached the caller");
    assert!(!reported[0].kind.is_fatal());
    assert!(reported[0].message.contains("transient failure"));
    assert_eq!(*executed.lock().unwrap(), (1..=last).collect::<Vec<_>>());
}

#[test]
fn test_second_init_is_rejected() {
    let mut backend = ThreadedBackend::new(ImmediateBackend::new());
    backend.init(&Settings::default()).unwrap();
    assert!(matches!(
        backend.init(&Settings::default()),
        Err(RenderError::InitializationFailed(_))
    ));
    backend.shutdown();
}

#[test]
fn test_create_backend_follows_settings() {
    let immediate = create_backend(stratum_core::BackendKind::Immediate);
    assert_eq!(immediate.name(), "immediate");
    let threaded = create_backend(stratum_core::BackendKind::Threaded);
    assert_eq!(threaded.name(), "threaded(immediate)");
}
