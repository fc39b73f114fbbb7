//! Scalar kinds, resolved scalar values and text coercion.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Primitive types a leaf field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ScalarKind {
    /// `bool`
    Bool,
    /// `String`
    String,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl ScalarKind {
    /// Rust spelling of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "String",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Parse `text` into a value of this kind.
    ///
    /// Integers are read as base 10. Booleans accept `1`, `t`, `T`, `TRUE`,
    /// `true`, `True` and their false counterparts `0`, `f`, `F`, `FALSE`,
    /// `false`, `False`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseScalarError`] when `text` is not a valid spelling of
    /// the kind, including integer overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestconf::{ScalarKind, ScalarValue};
    ///
    /// assert_eq!(ScalarKind::U32.coerce("42").ok(), Some(ScalarValue::U32(42)));
    /// assert!(ScalarKind::Bool.coerce("yes").is_err());
    /// ```
    pub fn coerce(self, text: &str) -> Result<ScalarValue, ParseScalarError> {
        let fail = |reason: String| ParseScalarError {
            kind: self,
            text: text.to_owned(),
            reason,
        };
        Ok(match self {
            Self::Bool => ScalarValue::Bool(parse_bool(text).ok_or_else(|| {
                fail("expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False".to_owned())
            })?),
            Self::String => ScalarValue::String(text.to_owned()),
            Self::I8 => ScalarValue::I8(parse_number(text).map_err(fail)?),
            Self::I16 => ScalarValue::I16(parse_number(text).map_err(fail)?),
            Self::I32 => ScalarValue::I32(parse_number(text).map_err(fail)?),
            Self::I64 => ScalarValue::I64(parse_number(text).map_err(fail)?),
            Self::Isize => ScalarValue::Isize(parse_number(text).map_err(fail)?),
            Self::U8 => ScalarValue::U8(parse_number(text).map_err(fail)?),
            Self::U16 => ScalarValue::U16(parse_number(text).map_err(fail)?),
            Self::U32 => ScalarValue::U32(parse_number(text).map_err(fail)?),
            Self::U64 => ScalarValue::U64(parse_number(text).map_err(fail)?),
            Self::Usize => ScalarValue::Usize(parse_number(text).map_err(fail)?),
            Self::F32 => ScalarValue::F32(parse_number(text).map_err(fail)?),
            Self::F64 => ScalarValue::F64(parse_number(text).map_err(fail)?),
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_number<N>(text: &str) -> Result<N, String>
where
    N: FromStr,
    N::Err: fmt::Display,
{
    text.parse::<N>().map_err(|err| err.to_string())
}

/// A fully coerced leaf value.
#[derive(Debug, Clone, PartialEq)]
#[expect(missing_docs, reason = "variants mirror ScalarKind one to one")]
pub enum ScalarValue {
    Bool(bool),
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
}

impl ScalarValue {
    /// Kind of the stored value.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::String(_) => ScalarKind::String,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::Isize(_) => ScalarKind::Isize,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::Usize(_) => ScalarKind::Usize,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
        }
    }
}

/// Text that could not be coerced into the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {text:?} as {kind}: {reason}")]
pub struct ParseScalarError {
    /// Destination kind.
    pub kind: ScalarKind,
    /// Offending input.
    pub text: String,
    /// Parser message.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("t", true)]
    #[case("TRUE", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("F", false)]
    #[case("false", false)]
    fn booleans_accept_canonical_spellings(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(
            ScalarKind::Bool.coerce(text),
            Ok(ScalarValue::Bool(expected))
        );
    }

    #[rstest]
    #[case(ScalarKind::Bool, "not_a_bool")]
    #[case(ScalarKind::Bool, "yes")]
    #[case(ScalarKind::I32, "12.5")]
    #[case(ScalarKind::I8, "128")]
    #[case(ScalarKind::U64, "-1")]
    #[case(ScalarKind::U32, "0x10")]
    #[case(ScalarKind::F64, "three")]
    fn malformed_text_is_rejected(#[case] kind: ScalarKind, #[case] text: &str) {
        let err = kind.coerce(text).expect_err("coercion should fail");
        assert_eq!(err.kind, kind);
        assert_eq!(err.text, text);
    }

    #[rstest]
    #[case(ScalarKind::I64, "-123456789", ScalarValue::I64(-123_456_789))]
    #[case(ScalarKind::U64, "123456789123456789", ScalarValue::U64(123_456_789_123_456_789))]
    #[case(ScalarKind::F64, "3.141592653589793", ScalarValue::F64(std::f64::consts::PI))]
    #[case(ScalarKind::F32, "1e3", ScalarValue::F32(1000.0))]
    #[case(ScalarKind::String, "", ScalarValue::String(String::new()))]
    fn well_formed_text_is_coerced(
        #[case] kind: ScalarKind,
        #[case] text: &str,
        #[case] expected: ScalarValue,
    ) {
        assert_eq!(kind.coerce(text), Ok(expected));
    }

    #[rstest]
    fn error_names_kind_and_input() {
        let err = ScalarKind::U8
            .coerce("300")
            .expect_err("300 overflows u8");
        let message = err.to_string();
        assert!(message.contains("u8"), "{message}");
        assert!(message.contains("\"300\""), "{message}");
    }
}
