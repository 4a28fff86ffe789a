//! Elementwise operators and whole-buffer aggregates.
//!
//! Every operator works on the flat buffer and hands back an array with the
//! same lengths as the left operand. The checked methods return
//! [`RaggedError::DataInvalid`] on a size mismatch; the `std::ops` impls
//! assert instead.
use std::ops::{BitAnd, BitOr, BitXor, Not};

use num_traits::{Num, Zero};

use crate::array::RaggedArray;
use crate::error::{RaggedError, Result};
use crate::index::MaskIndex;
use crate::storage::FlatStorage;
use crate::translate::{where_ragged, Coords};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    pub fn func<T: PartialOrd>(self) -> fn(&T, &T) -> bool {
        match self {
            CompareOp::Eq => |a, b| a == b,
            CompareOp::Ne => |a, b| a != b,
            CompareOp::Lt => |a, b| a < b,
            CompareOp::Le => |a, b| a <= b,
            CompareOp::Gt => |a, b| a > b,
            CompareOp::Ge => |a, b| a >= b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 5] = [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Mul,
        ArithmeticOp::Div,
        ArithmeticOp::Rem,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Rem => "%",
        }
    }

    pub fn func<T: Num>(self) -> fn(T, T) -> T {
        match self {
            ArithmeticOp::Add => |a, b| a + b,
            ArithmeticOp::Sub => |a, b| a - b,
            ArithmeticOp::Mul => |a, b| a * b,
            ArithmeticOp::Div => |a, b| a / b,
            ArithmeticOp::Rem => |a, b| a % b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

impl BitwiseOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BitwiseOp::And => "&",
            BitwiseOp::Or => "|",
            BitwiseOp::Xor => "^",
        }
    }

    pub fn func<T>(self) -> fn(T, T) -> T
    where
        T: BitAnd<Output = T> + BitOr<Output = T> + BitXor<Output = T>,
    {
        match self {
            BitwiseOp::And => |a, b| a & b,
            BitwiseOp::Or => |a, b| a | b,
            BitwiseOp::Xor => |a, b| a ^ b,
        }
    }
}

/// Right-hand side of a binary operator.
#[derive(Clone, Debug)]
pub enum Operand<'a, T> {
    Scalar(T),
    /// One value per buffer value.
    Flat(&'a [T]),
    /// Another array holding the same number of values.
    Ragged(&'a RaggedArray<T>),
}

impl<'a, T> From<&'a RaggedArray<T>> for Operand<'a, T> {
    fn from(array: &'a RaggedArray<T>) -> Self {
        Operand::Ragged(array)
    }
}

impl<'a, T> From<&'a [T]> for Operand<'a, T> {
    fn from(values: &'a [T]) -> Self {
        Operand::Flat(values)
    }
}

/// Truth value of an element, as used by [`RaggedArray::all`] and
/// [`RaggedArray::any`].
pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn truthy(&self) -> bool {
                    !Zero::is_zero(self)
                }
            }
        )*
    };
}

impl_truthy!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T> RaggedArray<T> {
    /// Apply `f` to every value, keeping the row layout.
    pub fn map<U, F>(&self, f: F) -> RaggedArray<U>
    where
        F: FnMut(&T) -> U,
    {
        RaggedArray::from_trusted(self.storage.mapv(f), self.index.clone())
    }

    fn with_storage<U>(&self, storage: FlatStorage<U>) -> RaggedArray<U> {
        RaggedArray::from_trusted(storage, self.index.clone())
    }

    fn zip_operand<U, F>(&self, operand: Operand<'_, T>, mut f: F) -> Result<RaggedArray<U>>
    where
        F: FnMut(&T, &T) -> U,
    {
        match operand {
            Operand::Scalar(value) => Ok(self.map(|a| f(a, &value))),
            Operand::Flat(values) => Ok(self.with_storage(self.storage.zip_map(values, f)?)),
            Operand::Ragged(other) => {
                if other.width() != self.width() {
                    return Err(RaggedError::invalid(format!(
                        "operand of width {:?} does not match array of width {:?}",
                        other.width(),
                        self.width()
                    )));
                }
                Ok(self.with_storage(self.storage.zip_map(other.flat(), f)?))
            }
        }
    }

    /// Unchecked pairing with an equally sized buffer; used by the operator
    /// impls after their size assertion.
    fn zip_values<U, F>(&self, other: &[T], mut f: F) -> RaggedArray<U>
    where
        F: FnMut(&T, &T) -> U,
    {
        let data = self
            .flat()
            .iter()
            .zip(other.iter())
            .map(|(a, b)| f(a, b))
            .collect();
        self.with_storage(FlatStorage::trusted(data, self.width()))
    }

    /// Number of buffer values; differs from [`size`](Self::size) when
    /// elements have a trailing width.
    fn value_count(&self) -> usize {
        self.flat().len()
    }
}

impl<T: PartialOrd> RaggedArray<T> {
    pub fn compare(&self, op: CompareOp, operand: Operand<'_, T>) -> Result<RaggedArray<bool>> {
        self.zip_operand(operand, op.func::<T>())
    }

    pub fn min(&self) -> Option<T>
    where
        T: Clone,
    {
        self.extremum(|candidate, best| candidate < best)
    }

    pub fn max(&self) -> Option<T>
    where
        T: Clone,
    {
        self.extremum(|candidate, best| candidate > best)
    }

    fn extremum<F>(&self, better: F) -> Option<T>
    where
        T: Clone,
        F: Fn(&T, &T) -> bool,
    {
        let mut values = self.flat().iter();
        let mut best = values.next()?;
        for value in values {
            if better(value, best) {
                best = value;
            }
        }
        Some(best.clone())
    }
}

impl<T: Num + Clone> RaggedArray<T> {
    /// `self <op> operand`.
    ///
    /// # Panics
    /// Integer division or remainder by zero panics, as it does for the
    /// element type.
    pub fn arithmetic(&self, op: ArithmeticOp, operand: Operand<'_, T>) -> Result<RaggedArray<T>> {
        let f = op.func::<T>();
        self.zip_operand(operand, |a, b| f(a.clone(), b.clone()))
    }

    /// `operand <op> self`.
    pub fn arithmetic_reflected(
        &self,
        op: ArithmeticOp,
        operand: Operand<'_, T>,
    ) -> Result<RaggedArray<T>> {
        let f = op.func::<T>();
        self.zip_operand(operand, |a, b| f(b.clone(), a.clone()))
    }
}

impl<T> RaggedArray<T>
where
    T: BitAnd<Output = T> + BitOr<Output = T> + BitXor<Output = T> + Clone,
{
    pub fn bitwise(&self, op: BitwiseOp, operand: Operand<'_, T>) -> Result<RaggedArray<T>> {
        let f = op.func::<T>();
        self.zip_operand(operand, |a, b| f(a.clone(), b.clone()))
    }
}

impl<T: Not<Output = T> + Clone> RaggedArray<T> {
    /// Elementwise complement: logical for `bool`, bitwise for integers.
    pub fn complement(&self) -> RaggedArray<T> {
        self.map(|v| !v.clone())
    }
}

impl<T: Truthy> RaggedArray<T> {
    /// True when every value is truthy; vacuously true when empty.
    pub fn all(&self) -> bool {
        self.flat().iter().all(Truthy::truthy)
    }

    pub fn any(&self) -> bool {
        self.flat().iter().any(Truthy::truthy)
    }
}

impl RaggedArray<bool> {
    /// `(row, col)` of every true value.
    pub fn where_true(&self) -> Coords {
        // lengths always partition the buffer here
        where_ragged(self.flat(), self.lengths()).unwrap_or_default()
    }

    /// This array as an index for [`RaggedArray::get`] and
    /// [`RaggedArray::set`].
    pub fn to_mask(&self) -> Result<MaskIndex> {
        MaskIndex::new(self.flat().to_vec(), self.lengths().to_vec())
    }
}

macro_rules! impl_arithmetic {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T: Num + Clone> std::ops::$trait<&RaggedArray<T>> for &RaggedArray<T> {
            type Output = RaggedArray<T>;

            fn $method(self, rhs: &RaggedArray<T>) -> RaggedArray<T> {
                assert_eq!(
                    self.value_count(),
                    rhs.value_count(),
                    "ragged arrays must hold the same number of values"
                );
                let f = $op.func::<T>();
                self.zip_values(rhs.flat(), |a, b| f(a.clone(), b.clone()))
            }
        }

        impl<T: Num + Clone> std::ops::$trait for RaggedArray<T> {
            type Output = RaggedArray<T>;

            fn $method(self, rhs: RaggedArray<T>) -> RaggedArray<T> {
                std::ops::$trait::$method(&self, &rhs)
            }
        }
    };
}

impl_arithmetic!(Add, add, ArithmeticOp::Add);
impl_arithmetic!(Sub, sub, ArithmeticOp::Sub);
impl_arithmetic!(Mul, mul, ArithmeticOp::Mul);
impl_arithmetic!(Div, div, ArithmeticOp::Div);
impl_arithmetic!(Rem, rem, ArithmeticOp::Rem);

macro_rules! impl_scalar_arithmetic {
    ($($t:ty),*) => {
        $(
            impl_scalar_arithmetic!(@op $t, Add, add, ArithmeticOp::Add);
            impl_scalar_arithmetic!(@op $t, Sub, sub, ArithmeticOp::Sub);
            impl_scalar_arithmetic!(@op $t, Mul, mul, ArithmeticOp::Mul);
            impl_scalar_arithmetic!(@op $t, Div, div, ArithmeticOp::Div);
            impl_scalar_arithmetic!(@op $t, Rem, rem, ArithmeticOp::Rem);
        )*
    };
    (@op $t:ty, $trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait<$t> for &RaggedArray<$t> {
            type Output = RaggedArray<$t>;

            fn $method(self, rhs: $t) -> RaggedArray<$t> {
                let f = $op.func::<$t>();
                self.map(|&a| f(a, rhs))
            }
        }

        impl std::ops::$trait<&RaggedArray<$t>> for $t {
            type Output = RaggedArray<$t>;

            fn $method(self, rhs: &RaggedArray<$t>) -> RaggedArray<$t> {
                let f = $op.func::<$t>();
                rhs.map(|&b| f(self, b))
            }
        }
    };
}

impl_scalar_arithmetic!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

macro_rules! impl_bitwise {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T> std::ops::$trait<&RaggedArray<T>> for &RaggedArray<T>
        where
            T: BitAnd<Output = T> + BitOr<Output = T> + BitXor<Output = T> + Clone,
        {
            type Output = RaggedArray<T>;

            fn $method(self, rhs: &RaggedArray<T>) -> RaggedArray<T> {
                assert_eq!(
                    self.value_count(),
                    rhs.value_count(),
                    "ragged arrays must hold the same number of values"
                );
                let f = $op.func::<T>();
                self.zip_values(rhs.flat(), |a, b| f(a.clone(), b.clone()))
            }
        }
    };
}

impl_bitwise!(BitAnd, bitand, BitwiseOp::And);
impl_bitwise!(BitOr, bitor, BitwiseOp::Or);
impl_bitwise!(BitXor, bitxor, BitwiseOp::Xor);

impl<T: Not<Output = T> + Clone> Not for &RaggedArray<T> {
    type Output = RaggedArray<T>;

    fn not(self) -> RaggedArray<T> {
        self.complement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_tables_match_symbols() {
        let lt = CompareOp::Lt.func::<i32>();
        assert!(lt(&1, &2));
        assert_eq!(CompareOp::Ge.symbol(), ">=");
        let rem = ArithmeticOp::Rem.func::<i64>();
        assert_eq!(rem(7, 3), 1);
        let xor = BitwiseOp::Xor.func::<u8>();
        assert_eq!(xor(0b1100, 0b1010), 0b0110);
    }

    #[test]
    fn truthy_numbers() {
        assert!(3i32.truthy());
        assert!(!0.0f64.truthy());
        assert!(!false.truthy());
    }
}
