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

//! Packed pipeline state: the 64-bit [`RenderState`] word, the 32-bit
//! [`StencilState`] word and the blend composer that fills the blend region.
//!
//! One fixed bit layout is supported. Field codes and shifts are listed on each
//! word type and are verified for disjointness by tests.

pub mod blend;
mod enums;
mod render_state;
mod stencil;

pub use self::blend::{
    blend_equation, blend_equation_separate, blend_function, blend_function_separate,
};
pub use self::enums::{
    BlendEquation, BlendFactor, CompareFunction, CullMode, PrimitiveTopology, StencilOperation,
};
pub use self::render_state::RenderState;
pub use self::stencil::StencilState;
