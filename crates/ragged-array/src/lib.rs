//! ragged-array: a compact container for rows of unequal length.
//!
//! All rows share one contiguous buffer; a per-row length index locates them.
//! Rows can be read and written with numpy-style index expressions (scalars,
//! lists, slices and boolean masks on either axis), combined elementwise,
//! appended to, rendered and persisted as `.npz` archives.
//!
//! ```
//! use ragged_array::{Index, RaggedArray, Selection, SliceSpec};
//!
//! let a = RaggedArray::from_rows(vec![vec![1, 2, 3], vec![4, 5], vec![6]]);
//! assert_eq!(a.lengths(), &[3, 2, 1]);
//! assert_eq!(a.get(Index::at(1, 1)).unwrap(), Selection::Values(vec![5]));
//!
//! let tails = a
//!     .get(Index::pair(SliceSpec::full(), SliceSpec::start_at(1)))
//!     .unwrap()
//!     .into_ragged()
//!     .unwrap();
//! assert_eq!(tails.to_vecs(), vec![vec![2, 3], vec![5], vec![]]);
//! ```
pub mod array;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod io;
pub mod lengths;
pub mod ops;
pub mod storage;
pub mod stripe;
pub mod translate;

pub use array::{Entry, RaggedArray, RowInput, Selection, Shape, Values};
pub use config::{RaggedConfig, RenderStyle};
pub use error::{ErrorKind, RaggedError, Result};
pub use index::{Index, MaskIndex, Selector, SliceSpec};
pub use ops::{ArithmeticOp, BitwiseOp, CompareOp, Operand};
