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

//! The packed 64-bit pipeline state word.

use super::blend;
use super::enums::{BlendEquation, BlendFactor, CompareFunction, CullMode, PrimitiveTopology};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Shl, Shr};

/// Graphics pipeline state packed into a single 64-bit word.
///
/// | Field              | Bits    |
/// |--------------------|---------|
/// | color write (RGB)  | 0       |
/// | alpha write        | 1       |
/// | depth write        | 2       |
/// | depth test         | 4..7    |
/// | blend factors      | 12..27  |
/// | blend equations    | 28..33  |
/// | blend independent  | 34      |
/// | cull mode          | 36..37  |
/// | alpha reference    | 40..47  |
/// | primitive topology | 48..50  |
/// | point size         | 52..59  |
/// | multisampling      | 60      |
///
/// Merging two words with `|` is only meaningful when they do not share a field.
/// Nothing validates field contents; use the `with_*` setters to replace a field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct RenderState(u64);

impl RenderState {
    /// No state bits set.
    pub const NONE: Self = Self(0);

    /// Write the RGB channels.
    pub const COLOR_WRITE: Self = Self(0x0000_0000_0000_0001);
    /// Write the alpha channel.
    pub const ALPHA_WRITE: Self = Self(0x0000_0000_0000_0002);
    /// Write the depth buffer.
    pub const DEPTH_WRITE: Self = Self(0x0000_0000_0000_0004);

    /// Depth test field shift.
    pub const DEPTH_TEST_SHIFT: u32 = 4;
    /// Depth test field mask.
    pub const DEPTH_TEST_MASK: u64 = 0x0000_0000_0000_00f0;
    /// Depth test `<`.
    pub const DEPTH_TEST_LESS: Self = Self::depth_test(CompareFunction::Less);
    /// Depth test `<=`.
    pub const DEPTH_TEST_LESS_EQUAL: Self = Self::depth_test(CompareFunction::LessEqual);
    /// Depth test `==`.
    pub const DEPTH_TEST_EQUAL: Self = Self::depth_test(CompareFunction::Equal);
    /// Depth test `>=`.
    pub const DEPTH_TEST_GREATER_EQUAL: Self = Self::depth_test(CompareFunction::GreaterEqual);
    /// Depth test `>`.
    pub const DEPTH_TEST_GREATER: Self = Self::depth_test(CompareFunction::Greater);
    /// Depth test `!=`.
    pub const DEPTH_TEST_NOT_EQUAL: Self = Self::depth_test(CompareFunction::NotEqual);
    /// Depth test that never passes.
    pub const DEPTH_TEST_NEVER: Self = Self::depth_test(CompareFunction::Never);
    /// Depth test that always passes.
    pub const DEPTH_TEST_ALWAYS: Self = Self::depth_test(CompareFunction::Always);

    /// Blend factor region shift.
    pub const BLEND_SHIFT: u32 = 12;
    /// Blend factor region mask (all four factors).
    pub const BLEND_MASK: u64 = 0x0000_0000_0fff_f000;
    /// Blend equation region shift.
    pub const BLEND_EQUATION_SHIFT: u32 = 28;
    /// Blend equation region mask (color and alpha).
    pub const BLEND_EQUATION_MASK: u64 = 0x0000_0003_f000_0000;
    /// Per-render-target blending.
    pub const BLEND_INDEPENDENT: Self = Self(0x0000_0004_0000_0000);

    /// Cull mode field shift.
    pub const CULL_SHIFT: u32 = 36;
    /// Cull mode field mask.
    pub const CULL_MASK: u64 = 0x0000_0030_0000_0000;
    /// Cull clockwise triangles.
    pub const CULL_CLOCKWISE: Self = Self::cull(CullMode::Clockwise);
    /// Cull counter-clockwise triangles.
    pub const CULL_COUNTER_CLOCKWISE: Self = Self::cull(CullMode::CounterClockwise);

    /// Alpha reference field shift.
    pub const ALPHA_REF_SHIFT: u32 = 40;
    /// Alpha reference field mask.
    pub const ALPHA_REF_MASK: u64 = 0x0000_ff00_0000_0000;

    /// Primitive topology field shift.
    pub const PRIMITIVE_SHIFT: u32 = 48;
    /// Primitive topology field mask.
    pub const PRIMITIVE_MASK: u64 = 0x0007_0000_0000_0000;
    /// Triangle strips.
    pub const PRIMITIVE_TRIANGLE_STRIP: Self = Self::primitive(PrimitiveTopology::TriangleStrip);
    /// Line lists.
    pub const PRIMITIVE_LINES: Self = Self::primitive(PrimitiveTopology::Lines);
    /// Line strips.
    pub const PRIMITIVE_LINE_STRIP: Self = Self::primitive(PrimitiveTopology::LineStrip);
    /// Point lists.
    pub const PRIMITIVE_POINTS: Self = Self::primitive(PrimitiveTopology::Points);

    /// Point size field shift.
    pub const POINT_SIZE_SHIFT: u32 = 52;
    /// Point size field mask.
    pub const POINT_SIZE_MASK: u64 = 0x0ff0_0000_0000_0000;

    /// Multisample rasterization.
    pub const MULTISAMPLING: Self = Self(0x1000_0000_0000_0000);

    /// Color, alpha and depth writes, `<` depth test, clockwise culling, multisampling.
    pub const DEFAULT: Self = Self(
        Self::COLOR_WRITE.0
            | Self::ALPHA_WRITE.0
            | Self::DEPTH_WRITE.0
            | Self::DEPTH_TEST_LESS.0
            | Self::CULL_CLOCKWISE.0
            | Self::MULTISAMPLING.0,
    );

    /// Additive blending.
    pub const BLEND_ADD: Self = blend::blend_function(BlendFactor::One, BlendFactor::One);
    /// Classic alpha blending.
    pub const BLEND_ALPHA: Self =
        blend::blend_function(BlendFactor::SourceAlpha, BlendFactor::InvSourceAlpha);
    /// Keeps the darker of source and destination.
    pub const BLEND_DARKEN: Self = Self(
        blend::blend_function(BlendFactor::One, BlendFactor::One).0
            | blend::blend_equation(BlendEquation::Min).0,
    );
    /// Keeps the lighter of source and destination.
    pub const BLEND_LIGHTEN: Self = Self(
        blend::blend_function(BlendFactor::One, BlendFactor::One).0
            | blend::blend_equation(BlendEquation::Max).0,
    );
    /// Multiplies source and destination.
    pub const BLEND_MULTIPLY: Self =
        blend::blend_function(BlendFactor::DestColor, BlendFactor::Zero);
    /// Premultiplied alpha "over".
    pub const BLEND_NORMAL: Self =
        blend::blend_function(BlendFactor::One, BlendFactor::InvSourceAlpha);
    /// Screen blending.
    pub const BLEND_SCREEN: Self =
        blend::blend_function(BlendFactor::One, BlendFactor::InvSourceColor);
    /// Linear burn.
    pub const BLEND_LINEAR_BURN: Self = Self(
        blend::blend_function(BlendFactor::DestColor, BlendFactor::InvDestColor).0
            | blend::blend_equation(BlendEquation::Subtract).0,
    );

    /// Every field mask, used to check that fields never overlap.
    pub const FIELD_MASKS: [(&'static str, u64); 12] = [
        ("color_write", Self::COLOR_WRITE.0),
        ("alpha_write", Self::ALPHA_WRITE.0),
        ("depth_write", Self::DEPTH_WRITE.0),
        ("depth_test", Self::DEPTH_TEST_MASK),
        ("blend", Self::BLEND_MASK),
        ("blend_equation", Self::BLEND_EQUATION_MASK),
        ("blend_independent", Self::BLEND_INDEPENDENT.0),
        ("cull", Self::CULL_MASK),
        ("alpha_ref", Self::ALPHA_REF_MASK),
        ("primitive", Self::PRIMITIVE_MASK),
        ("point_size", Self::POINT_SIZE_MASK),
        ("multisampling", Self::MULTISAMPLING.0),
    ];

    /// Wraps a raw word.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// The raw word.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    const fn field(self, mask: u64, shift: u32) -> u8 {
        ((self.0 & mask) >> shift) as u8
    }

    const fn replace_field(self, mask: u64, value: u64) -> Self {
        Self((self.0 & !mask) | (value & mask))
    }

    // --- Field constructors ---

    /// A word holding only the given depth test.
    pub const fn depth_test(function: CompareFunction) -> Self {
        Self(((function.code() as u64) << Self::DEPTH_TEST_SHIFT) & Self::DEPTH_TEST_MASK)
    }

    /// A word holding only the given cull mode.
    pub const fn cull(mode: CullMode) -> Self {
        Self(((mode.code() as u64) << Self::CULL_SHIFT) & Self::CULL_MASK)
    }

    /// A word holding only the given primitive topology.
    pub const fn primitive(topology: PrimitiveTopology) -> Self {
        Self(((topology.code() as u64) << Self::PRIMITIVE_SHIFT) & Self::PRIMITIVE_MASK)
    }

    /// A word holding only the alpha reference value.
    pub const fn alpha_ref(value: u8) -> Self {
        Self(((value as u64) << Self::ALPHA_REF_SHIFT) & Self::ALPHA_REF_MASK)
    }

    /// A word holding only the point size.
    pub const fn point_size(value: u8) -> Self {
        Self(((value as u64) << Self::POINT_SIZE_SHIFT) & Self::POINT_SIZE_MASK)
    }

    /// See [`blend::blend_function`].
    pub const fn blend_function(src: BlendFactor, dst: BlendFactor) -> Self {
        blend::blend_function(src, dst)
    }

    /// See [`blend::blend_function_separate`].
    pub const fn blend_function_separate(
        src_color: BlendFactor,
        dst_color: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        blend::blend_function_separate(src_color, dst_color, src_alpha, dst_alpha)
    }

    /// See [`blend::blend_equation`].
    pub const fn blend_equation(equation: BlendEquation) -> Self {
        blend::blend_equation(equation)
    }

    /// See [`blend::blend_equation_separate`].
    pub const fn blend_equation_separate(color: BlendEquation, alpha: BlendEquation) -> Self {
        blend::blend_equation_separate(color, alpha)
    }

    // --- Field replacement ---

    /// Replaces the depth test. `None` clears the field (no depth test).
    #[must_use]
    pub const fn with_depth_test(self, function: Option<CompareFunction>) -> Self {
        let value = match function {
            Some(f) => Self::depth_test(f).0,
            None => 0,
        };
        self.replace_field(Self::DEPTH_TEST_MASK, value)
    }

    /// Replaces the cull mode.
    #[must_use]
    pub const fn with_cull(self, mode: CullMode) -> Self {
        self.replace_field(Self::CULL_MASK, Self::cull(mode).0)
    }

    /// Replaces the primitive topology.
    #[must_use]
    pub const fn with_primitive(self, topology: PrimitiveTopology) -> Self {
        self.replace_field(Self::PRIMITIVE_MASK, Self::primitive(topology).0)
    }

    /// Replaces the whole blend factor region with the given word's region.
    #[must_use]
    pub const fn with_blend(self, blend: Self) -> Self {
        self.replace_field(Self::BLEND_MASK, blend.0)
    }

    /// Replaces the blend equation region with the given word's region.
    #[must_use]
    pub const fn with_blend_equation(self, equation: Self) -> Self {
        self.replace_field(Self::BLEND_EQUATION_MASK, equation.0)
    }

    /// Replaces the alpha reference value.
    #[must_use]
    pub const fn with_alpha_ref(self, value: u8) -> Self {
        self.replace_field(Self::ALPHA_REF_MASK, Self::alpha_ref(value).0)
    }

    /// Replaces the point size.
    #[must_use]
    pub const fn with_point_size(self, value: u8) -> Self {
        self.replace_field(Self::POINT_SIZE_MASK, Self::point_size(value).0)
    }

    // --- Field accessors ---

    /// The depth test, or `None` when the field is unset.
    pub const fn depth_test_function(self) -> Option<CompareFunction> {
        CompareFunction::from_code(self.field(Self::DEPTH_TEST_MASK, Self::DEPTH_TEST_SHIFT))
    }

    /// Source color factor, `None` when blending is disabled.
    pub const fn blend_source_color(self) -> Option<BlendFactor> {
        BlendFactor::from_code(self.field(Self::BLEND_MASK, Self::BLEND_SHIFT) & 0xf)
    }

    /// Destination color factor.
    pub const fn blend_dest_color(self) -> Option<BlendFactor> {
        BlendFactor::from_code(self.field(Self::BLEND_MASK, Self::BLEND_SHIFT) >> 4)
    }

    /// Source alpha factor.
    pub const fn blend_source_alpha(self) -> Option<BlendFactor> {
        BlendFactor::from_code(self.field(Self::BLEND_MASK, Self::BLEND_SHIFT + 8) & 0xf)
    }

    /// Destination alpha factor.
    pub const fn blend_dest_alpha(self) -> Option<BlendFactor> {
        BlendFactor::from_code(self.field(Self::BLEND_MASK, Self::BLEND_SHIFT + 8) >> 4)
    }

    /// Color blend equation.
    pub const fn blend_equation_color(self) -> Option<BlendEquation> {
        BlendEquation::from_code(
            self.field(Self::BLEND_EQUATION_MASK, Self::BLEND_EQUATION_SHIFT) & 0x7,
        )
    }

    /// Alpha blend equation.
    pub const fn blend_equation_alpha(self) -> Option<BlendEquation> {
        BlendEquation::from_code(
            self.field(Self::BLEND_EQUATION_MASK, Self::BLEND_EQUATION_SHIFT) >> 3,
        )
    }

    /// Returns `true` when any blend factor is set.
    pub const fn is_blending(self) -> bool {
        (self.0 & Self::BLEND_MASK) != 0
    }

    /// The cull mode. `None` only for the unassigned code `3`.
    pub const fn cull_mode(self) -> Option<CullMode> {
        CullMode::from_code(self.field(Self::CULL_MASK, Self::CULL_SHIFT))
    }

    /// The primitive topology. `None` for unassigned codes.
    pub const fn primitive_topology(self) -> Option<PrimitiveTopology> {
        PrimitiveTopology::from_code(self.field(Self::PRIMITIVE_MASK, Self::PRIMITIVE_SHIFT))
    }

    /// The alpha reference value.
    pub const fn alpha_ref_value(self) -> u8 {
        self.field(Self::ALPHA_REF_MASK, Self::ALPHA_REF_SHIFT)
    }

    /// The point size value.
    pub const fn point_size_value(self) -> u8 {
        self.field(Self::POINT_SIZE_MASK, Self::POINT_SIZE_SHIFT)
    }
}

impl fmt::Debug for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderState({:#018x})", self.0)
    }
}

impl From<RenderState> for u64 {
    fn from(state: RenderState) -> Self {
        state.0
    }
}

impl BitOr for RenderState {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RenderState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for RenderState {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for RenderState {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for RenderState {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl Shl<u32> for RenderState {
    type Output = Self;
    fn shl(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shl(rhs))
    }
}

impl Shr<u32> for RenderState {
    type Output = Self;
    fn shr(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shr(rhs))
    }
}
