//! The construction stack (spec.md §3): conceptually five parallel
//! stacks indexed together by nesting depth. `nodes`/`current` are kept
//! as one `ancestors: Vec<Value>` plus a `current: Option<Value>` pair
//! rather than literally re-pushing the not-yet-closed container, which
//! is the usual idiom for "stack of in-progress containers plus the one
//! on top" in a language with owned, moved-not-shared values.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use jschema::{TypeDescriptor, Value};

/// One open container frame: the `targetTypes`/`listIndices`/
/// `possibleTypes` stacks, unified per-depth since they always grow and
/// shrink together with nesting.
pub struct Frame<'t> {
    /// `impliedType` at this nesting level.
    pub target: &'t dyn TypeDescriptor,
    /// Next free index, for ARRAY/TUPLE frames.
    pub list_index: Option<usize>,
    /// Surviving union member candidates, for a union staged as a MAP.
    pub possible_types: Option<Vec<&'t dyn TypeDescriptor>>,
}

impl<'t> Frame<'t> {
    #[must_use]
    pub fn new(target: &'t dyn TypeDescriptor) -> Self {
        Self {
            target,
            list_index: None,
            possible_types: None,
        }
    }
}

/// The full construction-stack state for one parse.
pub struct Stacks<'t> {
    pub frames: Vec<Frame<'t>>,
    pub ancestors: Vec<Value>,
    pub current: Option<Value>,
    pub field_names: Vec<String>,
}

impl<'t> Stacks<'t> {
    #[must_use]
    pub fn new(root_target: &'t dyn TypeDescriptor) -> Self {
        Self {
            frames: alloc::vec![Frame::new(root_target)],
            ancestors: Vec::new(),
            current: None,
            field_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    #[must_use]
    pub fn top(&self) -> &Frame<'t> {
        self.frames.last().expect("root frame is never popped")
    }

    pub fn top_mut(&mut self) -> &mut Frame<'t> {
        self.frames.last_mut().expect("root frame is never popped")
    }

    /// Whether every stack is back at its pre-parse shape (spec.md §8
    /// invariant 3, checked by `reset()`).
    #[must_use]
    pub fn is_reset(&self) -> bool {
        self.frames.len() == 1
            && self.ancestors.is_empty()
            && self.current.is_none()
            && self.field_names.is_empty()
    }
}
