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

//! Views: the 256 render passes a frame is made of.
//!
//! A view is created on first reference and carries its clear, viewport,
//! scissor, transforms and ordering mode until reset. Its clear is only realized
//! in a frame where the view is touched, either explicitly or by a draw.

use crate::stratum_bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A column-major 4x4 matrix, passed through to the backend untouched.
pub type Matrix4 = [f32; 16];

/// The identity matrix.
pub const IDENTITY: Matrix4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
];

/// Number of addressable views.
pub const MAX_VIEWS: usize = 256;

/// Identifier of a view. Lower ids are executed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ViewId(pub u8);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view {}", self.0)
    }
}

impl From<u8> for ViewId {
    fn from(id: u8) -> Self {
        ViewId(id)
    }
}

/// A pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width; 0 with a height of 0 means "whole back buffer" for viewports
    /// and "disabled" for scissors.
    pub width: u16,
    /// Height.
    pub height: u16,
}

impl Rect {
    /// Creates a rectangle.
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` for a 0x0 rectangle.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

stratum_bitflags! {
    /// Which attachments a view clears.
    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ClearFlags: u16 {
        /// Clear the color attachment.
        const COLOR = 0x0001;
        /// Clear the depth attachment.
        const DEPTH = 0x0002;
        /// Clear the stencil attachment.
        const STENCIL = 0x0004;
    }
}

/// How draws inside one view are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Ascending depth; ties keep submission order.
    #[default]
    Default,
    /// Submission order, depth ignored.
    Sequential,
    /// Descending depth; ties keep submission order.
    DepthDescending,
}

/// Lifecycle of a view within the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    /// Never referenced, or reset.
    #[default]
    Uninitialized,
    /// Has configuration but nothing queued for the current frame.
    Configured,
    /// Touched or holding draws for the current frame.
    PendingSubmit,
}

/// The stored clear operation of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewClear {
    /// Attachments to clear.
    pub flags: ClearFlags,
    /// Packed `0xRRGGBBAA`.
    pub rgba: u32,
    /// Depth clear value in `[0, 1]`.
    pub depth: f32,
    /// Stencil clear value.
    pub stencil: u8,
}

impl Default for ViewClear {
    fn default() -> Self {
        Self {
            flags: ClearFlags::EMPTY,
            rgba: 0x0000_00ff,
            depth: 1.0,
            stencil: 0,
        }
    }
}

/// Full configuration of one view.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Lifecycle state.
    pub state: ViewState,
    /// Debug name shown by backends.
    pub name: Option<String>,
    /// Clear operation.
    pub clear: ViewClear,
    /// Viewport; empty means the whole back buffer.
    pub rect: Rect,
    /// Scissor; empty disables scissoring.
    pub scissor: Rect,
    /// View matrix.
    pub view: Matrix4,
    /// Projection matrix.
    pub projection: Matrix4,
    /// Draw ordering.
    pub mode: ViewMode,
}

impl Default for View {
    fn default() -> Self {
        Self {
            state: ViewState::Uninitialized,
            name: None,
            clear: ViewClear::default(),
            rect: Rect::default(),
            scissor: Rect::default(),
            view: IDENTITY,
            projection: IDENTITY,
            mode: ViewMode::Default,
        }
    }
}

/// All 256 views, indexed by [`ViewId`].
#[derive(Debug, Clone)]
pub(crate) struct ViewTable {
    views: Vec<View>,
}

impl ViewTable {
    pub fn new() -> Self {
        Self {
            views: vec![View::default(); MAX_VIEWS],
        }
    }

    pub fn get(&self, id: ViewId) -> &View {
        &self.views[id.0 as usize]
    }

    /// Returns the view for configuration, moving it out of `Uninitialized`.
    pub fn configure(&mut self, id: ViewId) -> &mut View {
        let view = &mut self.views[id.0 as usize];
        if view.state == ViewState::Uninitialized {
            view.state = ViewState::Configured;
        }
        view
    }

    /// Marks the view as taking part in the current frame.
    pub fn touch(&mut self, id: ViewId) {
        self.views[id.0 as usize].state = ViewState::PendingSubmit;
    }

    pub fn reset(&mut self, id: ViewId) {
        self.views[id.0 as usize] = View::default();
    }

    /// Ids of views touched this frame, ascending.
    pub fn pending(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state == ViewState::PendingSubmit)
            .map(|(i, _)| ViewId(i as u8))
    }

    /// Closes the frame: every pending view goes back to `Configured`.
    pub fn end_frame(&mut self) {
        for view in &mut self.views {
            if view.state == ViewState::PendingSubmit {
                view.state = ViewState::Configured;
            }
        }
    }
}
