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

use std::sync::{Arc, Mutex};
use stratum_core::{BackendCaps, RenderError};
use stratum_sdk::prelude::*;

/// Touches view 0 for `limit` frames and releases its uniform on shutdown.
struct CountingApp {
    limit: u32,
    updates: u32,
    tint: UniformHandle,
}

impl Application for CountingApp {
    fn new(ctx: &mut Context) -> anyhow::Result<Self> {
        let tint = ctx.create_uniform("u_tint", UniformType::Vec4, 1);
        ctx.set_view_clear(ViewId(0), ClearFlags::COLOR, 0x0000_00ff, 1.0, 0);
        Ok(Self {
            limit: 3,
            updates: 0,
            tint,
        })
    }

    fn update(&mut self, ctx: &mut Context) -> bool {
        if self.updates == self.limit {
            return false;
        }
        self.updates += 1;
        ctx.touch(ViewId(0));
        true
    }

    fn shutdown(&mut self, ctx: &mut Context) {
        ctx.destroy_uniform(self.tint);
    }
}

struct FailingApp;

impl Application for FailingApp {
    fn new(_ctx: &mut Context) -> anyhow::Result<Self> {
        anyhow::bail!("no assets")
    }

    fn update(&mut self, _ctx: &mut Context) -> bool {
        false
    }
}

#[test]
fn test_engine_runs_until_update_stops() {
    // --- 1. ARRANGE ---
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    let observer = move |list: &CommandList, _: &RenderStats| {
        sink.lock()
            .unwrap()
            .push((list.frame_number, list.clear_count(), list.post.len()));
    };
    let backend = ImmediateBackend::new().with_observer(observer);

    // --- 2. ACT ---
    let summary =
        Engine::run_with_backend::<CountingApp>(Box::new(backend), Settings::default()).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.diagnostics, 0);
    // Three cleared frames, then one flushing the uniform destruction.
    assert_eq!(
        *frames.lock().unwrap(),
        vec![(1, 1, 0), (2, 1, 0), (3, 1, 0), (4, 0, 1)]
    );
}

#[test]
fn test_engine_counts_non_fatal_diagnostics() {
    struct StaleDraws(u32);

    impl Application for StaleDraws {
        fn new(_ctx: &mut Context) -> anyhow::Result<Self> {
            Ok(Self(0))
        }

        fn update(&mut self, ctx: &mut Context) -> bool {
            self.0 += 1;
            let draw = DrawCall::new()
                .with_program(ProgramHandle::INVALID)
                .with_vertex_count(3);
            ctx.submit(ViewId(0), draw, 0);
            self.0 <= 2
        }
    }

    let settings = Settings {
        backend: BackendKind::Immediate,
        ..Settings::default()
    };
    let summary = Engine::run::<StaleDraws>(settings).unwrap();

    assert_eq!(summary.frames, 2);
    assert_eq!(summary.diagnostics, 2);
}

#[test]
fn test_engine_stops_on_device_loss() {
    #[derive(Debug)]
    struct LostDevice;

    impl RenderBackend for LostDevice {
        fn name(&self) -> &str {
            "lost"
        }
        fn init(&mut self, _settings: &Settings) -> Result<BackendCaps, RenderError> {
            Ok(ImmediateBackend::CAPS)
        }
        fn execute(&mut self, _list: CommandList) -> Result<RenderStats, RenderError> {
            Err(RenderError::DeviceLost)
        }
        fn shutdown(&mut self) {}
    }

    let err = Engine::run_with_backend::<CountingApp>(Box::new(LostDevice), Settings::default())
        .unwrap_err();
    assert!(err.to_string().contains("DeviceLost"), "{err}");
}

#[test]
fn test_engine_reports_failed_startup() {
    let err = Engine::run_with_backend::<FailingApp>(
        Box::new(ImmediateBackend::new()),
        Settings::default(),
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Application failed to start");
    assert_eq!(err.root_cause().to_string(), "no assets");
}

#[test]
fn test_engine_builds_app_from_closure() {
    let summary = Engine::run_with(
        Box::new(ImmediateBackend::new()),
        Settings::default(),
        |ctx| {
            let mut app = CountingApp::new(ctx)?;
            app.limit = 5;
            Ok(app)
        },
    )
    .unwrap();
    assert_eq!(summary.frames, 5);
}
