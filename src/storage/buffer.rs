use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::ParamView;

/// The order in which a multi dimensional array is laid out in a flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryOrder {
    /// The last axis varies fastest (`'c'`).
    RowMajor,
    /// The first axis varies fastest (`'f'`).
    ColumnMajor,
}

impl MemoryOrder {
    /// Returns the single character tag of this order.
    pub fn as_char(self) -> char {
        match self {
            MemoryOrder::RowMajor => 'c',
            MemoryOrder::ColumnMajor => 'f',
        }
    }

    /// Whether this is the column major (`'f'`) order.
    pub fn is_column_major(self) -> bool {
        self == MemoryOrder::ColumnMajor
    }
}

/// The order parameters are flattened to when they get initialized.
pub const DEFAULT_WEIGHT_INIT_ORDER: MemoryOrder = MemoryOrder::ColumnMajor;

/// One contiguous region of parameters (or gradients) shared by an entire network.
///
/// Cloning a `FlatBuffer` clones the handle, not the storage: every clone and every
/// `ParamView` taken from it reads and writes the same values.
#[derive(Clone)]
pub struct FlatBuffer {
    data: Arc<RwLock<Box<[f32]>>>,
    order: MemoryOrder,
}

impl FlatBuffer {
    /// Creates a new zeroed `FlatBuffer`.
    ///
    /// # Arguments
    /// * `len` - The amount of elements in the buffer.
    /// * `order` - The memory order of the buffer.
    ///
    /// # Returns
    /// A new `FlatBuffer` instance.
    pub fn new(len: usize, order: MemoryOrder) -> Self {
        Self::from_vec(vec![0.; len], order)
    }

    /// Creates a new `FlatBuffer` taking ownership of `values`.
    ///
    /// # Arguments
    /// * `values` - The initial contents of the buffer.
    /// * `order` - The memory order of the buffer.
    ///
    /// # Returns
    /// A new `FlatBuffer` instance.
    pub fn from_vec(values: Vec<f32>, order: MemoryOrder) -> Self {
        Self {
            data: Arc::new(RwLock::new(values.into_boxed_slice())),
            order,
        }
    }

    /// Returns the amount of elements in the buffer.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn order(&self) -> MemoryOrder {
        self.order
    }

    /// Gives a view over the entire buffer.
    pub fn view(&self) -> ParamView {
        ParamView::new(self.clone(), 0, self.len())
    }

    /// Copies the buffer's contents into a new vec.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.read().to_vec()
    }

    /// Whether both handles point to the same storage.
    pub fn same_storage(&self, other: &FlatBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(super) fn read<T>(&self, f: impl FnOnce(&[f32]) -> T) -> T {
        f(&self.data.read())
    }

    pub(super) fn write<T>(&self, f: impl FnOnce(&mut [f32]) -> T) -> T {
        f(&mut self.data.write())
    }
}

impl fmt::Debug for FlatBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatBuffer")
            .field("len", &self.len())
            .field("order", &self.order)
            .finish()
    }
}
