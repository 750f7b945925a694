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

//! Generation-counted resource handles and the slot pool that issues them.
//!
//! A handle is a slot index plus a generation counter. When a slot is freed and
//! later reused, its generation is bumped, so a handle kept past `destroy`
//! no longer resolves. Lookups with stale handles return `None` instead of
//! aliasing the new occupant.

use serde::{Deserialize, Serialize};

/// Untyped index + generation pair shared by every handle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawHandle {
    /// Slot index inside its pool.
    pub index: u16,
    /// Generation of the slot at the time the handle was issued.
    pub generation: u16,
}

impl RawHandle {
    /// The sentinel returned by failed creations.
    pub const INVALID: Self = Self {
        index: u16::MAX,
        generation: 0,
    };

    /// Returns `false` for the sentinel.
    pub const fn is_valid(&self) -> bool {
        self.index != u16::MAX
    }
}

macro_rules! define_handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(RawHandle);

        impl $name {
            /// The sentinel returned when creation fails.
            pub const INVALID: Self = Self(RawHandle::INVALID);

            pub(crate) const fn from_raw(raw: RawHandle) -> Self {
                Self(raw)
            }

            /// The untyped index/generation pair.
            pub const fn raw(&self) -> RawHandle {
                self.0
            }

            /// Slot index of this handle.
            pub const fn index(&self) -> u16 {
                self.0.index
            }

            /// Returns `false` for [`Self::INVALID`]. A valid-looking handle may
            /// still be stale; only its owning table can tell.
            pub const fn is_valid(&self) -> bool {
                self.0.is_valid()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_handle!(
    /// A compiled shader stage.
    ShaderHandle
);
define_handle!(
    /// A linked vertex + fragment program.
    ProgramHandle
);
define_handle!(
    /// An immutable vertex buffer.
    VertexBufferHandle
);
define_handle!(
    /// An immutable index buffer.
    IndexBufferHandle
);
define_handle!(
    /// A texture.
    TextureHandle
);
define_handle!(
    /// A named uniform.
    UniformHandle
);

/// A fixed-capacity slot pool with free-list reuse and generation tagging.
#[derive(Debug, Clone)]
pub(crate) struct HandlePool<T> {
    slots: Vec<(RawHandle, Option<T>)>,
    free: Vec<u16>,
    capacity: u16,
    live: usize,
}

impl<T> HandlePool<T> {
    /// Creates a pool that never issues more than `capacity` live handles.
    /// The capacity is clamped below the sentinel index.
    pub fn new(capacity: u16) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            capacity: capacity.min(u16::MAX - 1),
            live: 0,
        }
    }

    /// Stores `value` and returns its handle, or gives the value back when full.
    pub fn insert(&mut self, value: T) -> Result<RawHandle, T> {
        if let Some(index) = self.free.pop() {
            let (id, slot) = &mut self.slots[index as usize];
            id.generation = id.generation.wrapping_add(1);
            *slot = Some(value);
            self.live += 1;
            return Ok(*id);
        }

        if self.slots.len() >= self.capacity as usize {
            return Err(value);
        }

        let id = RawHandle {
            index: self.slots.len() as u16,
            generation: 0,
        };
        self.slots.push((id, Some(value)));
        self.live += 1;
        Ok(id)
    }

    pub fn get(&self, handle: RawHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .and_then(|(id, value)| {
                if id.generation == handle.generation {
                    value.as_ref()
                } else {
                    None
                }
            })
    }

    pub fn get_mut(&mut self, handle: RawHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .and_then(|(id, value)| {
                if id.generation == handle.generation {
                    value.as_mut()
                } else {
                    None
                }
            })
    }

    /// Frees the slot behind `handle` and returns its value. Stale handles return `None`.
    pub fn remove(&mut self, handle: RawHandle) -> Option<T> {
        let (id, value) = self.slots.get_mut(handle.index as usize)?;
        if id.generation != handle.generation {
            return None;
        }
        let removed = value.take()?;
        self.free.push(handle.index);
        self.live -= 1;
        Some(removed)
    }

    pub fn contains(&self, handle: RawHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Iterates over live handles and their values.
    pub fn iter(&self) -> impl Iterator<Item = (RawHandle, &T)> {
        self.slots
            .iter()
            .filter_map(|(id, value)| value.as_ref().map(|v| (*id, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycled_slot_bumps_generation() {
        let mut pool = HandlePool::new(4);
        let a = pool.insert("a").unwrap();
        assert_eq!(pool.remove(a), Some("a"));

        let b = pool.insert("b").unwrap();
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
        assert_eq!(pool.get(a), None, "stale handle must not alias the new slot");
        assert_eq!(pool.get(b), Some(&"b"));
    }

    #[test]
    fn double_remove_is_rejected() {
        let mut pool = HandlePool::new(4);
        let a = pool.insert(1).unwrap();
        assert_eq!(pool.remove(a), Some(1));
        assert_eq!(pool.remove(a), None);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut pool = HandlePool::new(2);
        pool.insert(1).unwrap();
        pool.insert(2).unwrap();
        assert_eq!(pool.insert(3), Err(3));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn invalid_sentinel() {
        assert!(!VertexBufferHandle::INVALID.is_valid());
        assert_eq!(UniformHandle::default(), UniformHandle::INVALID);
        let pool: HandlePool<u8> = HandlePool::new(1);
        assert!(!pool.contains(RawHandle::INVALID));
    }
}
