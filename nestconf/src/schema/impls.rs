//! [`Describe`] and [`Field`] implementations for standard library types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;

use super::{AssignError, Describe, Field, Record, Shape, ShapeKind};
use crate::value::{ScalarKind, ScalarValue};

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn assign(&mut self, value: ScalarValue) -> Result<(), AssignError> {
                    match value {
                        ScalarValue::$variant(inner) => {
                            *self = inner;
                            Ok(())
                        }
                        other => Err(AssignError { offered: other.kind() }),
                    }
                }
            }

            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::scalar(ScalarKind::$variant)
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool,
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl<T: Describe> Field for Option<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(Field::as_record)
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_mut().and_then(Field::as_record_mut)
    }

    fn allocate(&mut self) -> Option<&mut dyn Record> {
        self.insert(T::default()).allocate()
    }

    fn assign(&mut self, value: ScalarValue) -> Result<(), AssignError> {
        let mut inner = T::default();
        inner.assign(value)?;
        *self = Some(inner);
        Ok(())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        T::shape().optional()
    }
}

// `Box` is an ownership detail, not a layer of optionality.
impl<T: Describe> Field for Box<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        T::as_record(self)
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        T::as_record_mut(self)
    }

    fn allocate(&mut self) -> Option<&mut dyn Record> {
        T::allocate(self)
    }

    fn assign(&mut self, value: ScalarValue) -> Result<(), AssignError> {
        T::assign(self, value)
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

macro_rules! opaque_field {
    ($kind:expr => $($ty:ty where [$($bounds:tt)*]),* $(,)?) => {
        $(
            impl<$($bounds)*> Field for $ty {}

            impl<$($bounds)*> Describe for $ty {
                fn shape() -> Shape {
                    Shape::new($kind)
                }
            }
        )*
    };
}

opaque_field! {
    ShapeKind::Sequence =>
        Vec<T> where [T: 'static],
        VecDeque<T> where [T: 'static],
        BTreeSet<T> where [T: 'static],
        HashSet<T, S> where [T: 'static, S: BuildHasher + Default + 'static],
}

opaque_field! {
    ShapeKind::Map =>
        BTreeMap<K, V> where [K: 'static, V: 'static],
        HashMap<K, V, S> where [K: 'static, V: 'static, S: BuildHasher + Default + 'static],
}

// Std types with no scalar coercion; fields of these types are skipped.
macro_rules! opaque_std {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Field for $ty {}

            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::new(ShapeKind::Opaque($name))
                }
            }
        )*
    };
}

opaque_std! {
    char => "char",
    std::path::PathBuf => "PathBuf",
    std::ffi::OsString => "OsString",
    std::time::Duration => "Duration",
}
