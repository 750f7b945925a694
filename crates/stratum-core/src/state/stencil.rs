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

//! The packed 32-bit stencil state word.

use super::enums::{CompareFunction, StencilOperation};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Shl, Shr};

/// Stencil test configuration for one face, packed into 32 bits.
///
/// | Field            | Bits   |
/// |------------------|--------|
/// | reference value  | 0..7   |
/// | read mask        | 8..15  |
/// | test function    | 16..19 |
/// | stencil-fail op  | 20..23 |
/// | depth-fail op    | 24..27 |
/// | pass op          | 28..31 |
///
/// Front and back faces are separate words. A back-face word of
/// [`StencilState::NONE`] tells the backend to apply the front-face word to both
/// faces; that mirroring is done by the backend, not here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct StencilState(u32);

impl StencilState {
    /// Stencil disabled (or "same as front" when used as the back face).
    pub const NONE: Self = Self(0);

    /// Reference value mask.
    pub const REFERENCE_MASK: u32 = 0x0000_00ff;
    /// Read mask field shift.
    pub const READ_MASK_SHIFT: u32 = 8;
    /// Read mask field mask.
    pub const READ_MASK_MASK: u32 = 0x0000_ff00;
    /// Test function field shift.
    pub const TEST_SHIFT: u32 = 16;
    /// Test function field mask.
    pub const TEST_MASK: u32 = 0x000f_0000;
    /// Stencil-fail operation field shift.
    pub const FAIL_STENCIL_SHIFT: u32 = 20;
    /// Stencil-fail operation field mask.
    pub const FAIL_STENCIL_MASK: u32 = 0x00f0_0000;
    /// Depth-fail operation field shift.
    pub const FAIL_DEPTH_SHIFT: u32 = 24;
    /// Depth-fail operation field mask.
    pub const FAIL_DEPTH_MASK: u32 = 0x0f00_0000;
    /// Pass operation field shift.
    pub const PASS_SHIFT: u32 = 28;
    /// Pass operation field mask.
    pub const PASS_MASK: u32 = 0xf000_0000;

    /// Every field mask, used to check that fields never overlap.
    pub const FIELD_MASKS: [(&'static str, u32); 6] = [
        ("reference", Self::REFERENCE_MASK),
        ("read_mask", Self::READ_MASK_MASK),
        ("test", Self::TEST_MASK),
        ("fail_stencil", Self::FAIL_STENCIL_MASK),
        ("fail_depth", Self::FAIL_DEPTH_MASK),
        ("pass", Self::PASS_MASK),
    ];

    /// Wraps a raw word.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw word.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// A word holding only the reference value.
    pub const fn reference_value(value: u8) -> Self {
        Self((value as u32) & Self::REFERENCE_MASK)
    }

    /// A word holding only the read mask.
    pub const fn read_mask(value: u8) -> Self {
        Self(((value as u32) << Self::READ_MASK_SHIFT) & Self::READ_MASK_MASK)
    }

    /// A word holding only the test function.
    pub const fn test(function: CompareFunction) -> Self {
        Self(((function.code() as u32) << Self::TEST_SHIFT) & Self::TEST_MASK)
    }

    /// A word holding only the stencil-fail operation.
    pub const fn fail_stencil(op: StencilOperation) -> Self {
        Self(((op.code() as u32) << Self::FAIL_STENCIL_SHIFT) & Self::FAIL_STENCIL_MASK)
    }

    /// A word holding only the depth-fail operation.
    pub const fn fail_depth(op: StencilOperation) -> Self {
        Self(((op.code() as u32) << Self::FAIL_DEPTH_SHIFT) & Self::FAIL_DEPTH_MASK)
    }

    /// A word holding only the pass operation.
    pub const fn pass(op: StencilOperation) -> Self {
        Self(((op.code() as u32) << Self::PASS_SHIFT) & Self::PASS_MASK)
    }

    /// Builds a complete face description.
    pub const fn face(
        function: CompareFunction,
        reference: u8,
        read_mask: u8,
        fail_stencil: StencilOperation,
        fail_depth: StencilOperation,
        pass: StencilOperation,
    ) -> Self {
        Self(
            Self::test(function).0
                | Self::reference_value(reference).0
                | Self::read_mask(read_mask).0
                | Self::fail_stencil(fail_stencil).0
                | Self::fail_depth(fail_depth).0
                | Self::pass(pass).0,
        )
    }

    /// Returns `true` for [`StencilState::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The reference value.
    pub const fn reference(self) -> u8 {
        (self.0 & Self::REFERENCE_MASK) as u8
    }

    /// The read mask.
    pub const fn read_mask_value(self) -> u8 {
        ((self.0 & Self::READ_MASK_MASK) >> Self::READ_MASK_SHIFT) as u8
    }

    /// The test function, `None` when unset.
    pub const fn test_function(self) -> Option<CompareFunction> {
        CompareFunction::from_code(((self.0 & Self::TEST_MASK) >> Self::TEST_SHIFT) as u8)
    }

    /// The stencil-fail operation.
    pub const fn fail_stencil_op(self) -> Option<StencilOperation> {
        StencilOperation::from_code(
            ((self.0 & Self::FAIL_STENCIL_MASK) >> Self::FAIL_STENCIL_SHIFT) as u8,
        )
    }

    /// The depth-fail operation.
    pub const fn fail_depth_op(self) -> Option<StencilOperation> {
        StencilOperation::from_code(
            ((self.0 & Self::FAIL_DEPTH_MASK) >> Self::FAIL_DEPTH_SHIFT) as u8,
        )
    }

    /// The pass operation.
    pub const fn pass_op(self) -> Option<StencilOperation> {
        StencilOperation::from_code(((self.0 & Self::PASS_MASK) >> Self::PASS_SHIFT) as u8)
    }
}

impl fmt::Debug for StencilState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StencilState({:#010x})", self.0)
    }
}

impl From<StencilState> for u32 {
    fn from(state: StencilState) -> Self {
        state.0
    }
}

impl BitOr for StencilState {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StencilState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for StencilState {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for StencilState {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for StencilState {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl Shl<u32> for StencilState {
    type Output = Self;
    fn shl(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shl(rhs))
    }
}

impl Shr<u32> for StencilState {
    type Output = Self;
    fn shr(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shr(rhs))
    }
}
