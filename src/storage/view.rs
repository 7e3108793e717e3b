use std::ops::Range;

use super::{FlatBuffer, MemoryOrder};
use crate::{InitErr, Result};

/// A non-owning window into a `FlatBuffer`.
///
/// The view is addressed by an offset and a length, reads and writes through it
/// alias the underlying buffer.
#[derive(Debug, Clone)]
pub struct ParamView {
    buffer: FlatBuffer,
    start: usize,
    len: usize,
}

impl ParamView {
    pub(super) fn new(buffer: FlatBuffer, start: usize, len: usize) -> Self {
        Self { buffer, start, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The shape of the view, always one dimensional.
    pub fn shape(&self) -> [usize; 1] {
        [self.len]
    }

    pub fn order(&self) -> MemoryOrder {
        self.buffer.order()
    }

    /// Returns the range this view covers inside its buffer.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// The buffer this view is a window of.
    pub fn buffer(&self) -> &FlatBuffer {
        &self.buffer
    }

    /// Creates a view of the `[start, end)` range of this view.
    ///
    /// # Arguments
    /// * `start` - The inclusive start, relative to this view.
    /// * `end` - The exclusive end, relative to this view.
    ///
    /// # Returns
    /// The sub view or a `SizeMismatch` if the range falls outside of this view.
    pub fn sub_view(&self, start: usize, end: usize) -> Result<ParamView> {
        if start > end || end > self.len {
            return Err(InitErr::SizeMismatch {
                what: "sub view end",
                got: end.max(start),
                expected: self.len,
            });
        }

        Ok(Self::new(self.buffer.clone(), self.start + start, end - start))
    }

    /// Copies `values` into the view.
    ///
    /// # Arguments
    /// * `values` - The new contents of the view.
    ///
    /// # Returns
    /// A `SizeMismatch` if `values` isn't the same length as the view, in that case
    /// nothing gets written.
    pub fn assign(&self, values: &[f32]) -> Result<()> {
        if values.len() != self.len {
            return Err(InitErr::SizeMismatch {
                what: "assigned values",
                got: values.len(),
                expected: self.len,
            });
        }

        let range = self.range();
        self.buffer
            .write(|data| data[range].copy_from_slice(values));

        Ok(())
    }

    /// Sets every element of the view to `value`.
    pub fn fill(&self, value: f32) {
        let range = self.range();
        self.buffer.write(|data| data[range].fill(value));
    }

    /// Copies the view's contents into a new vec.
    pub fn to_vec(&self) -> Vec<f32> {
        let range = self.range();
        self.buffer.read(|data| data[range].to_vec())
    }

    /// Whether both views cover at least one common element of the same buffer.
    pub fn overlaps(&self, other: &ParamView) -> bool {
        self.buffer.same_storage(&other.buffer)
            && self.start < other.start + other.len
            && other.start < self.start + self.len
    }
}
