use alloc::string::{String, ToString};
use core::{error, fmt};

use crate::Reflect;
use crate::info::ScalarKind;

// -----------------------------------------------------------------------------
// ScalarRef

/// A borrowed primitive value.
///
/// Signed integers widen to `Int`, unsigned ones to `Uint`, floats to `Float`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl ScalarRef<'_> {
    /// A short name of the variant, used in messages.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Uint(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarError

/// Failure to assign a [`ScalarRef`] to a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    /// The value does not fit the target type.
    OutOfRange { value: String, target: ScalarKind },
    /// The value has the wrong shape for the target type.
    Mismatch {
        found: &'static str,
        target: ScalarKind,
    },
}

impl ScalarError {
    pub fn out_of_range(value: ScalarRef<'_>, target: ScalarKind) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target,
        }
    }

    pub fn mismatch(value: ScalarRef<'_>, target: ScalarKind) -> Self {
        Self::Mismatch {
            found: value.describe(),
            target,
        }
    }
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { value, target } => {
                write!(f, "value {value} is out of range for {target}")
            }
            Self::Mismatch { found, target } => {
                write!(f, "cannot assign {found} to {target}")
            }
        }
    }
}

impl error::Error for ScalarError {}

// -----------------------------------------------------------------------------
// Scalar

/// Access to a primitive value.
///
/// # Examples
///
/// ```
/// use vc_reflect::ops::{Scalar, ScalarError, ScalarRef};
///
/// let mut x = 0_u8;
/// x.set_scalar(ScalarRef::Int(200)).unwrap();
/// assert_eq!(x, 200);
///
/// let err = x.set_scalar(ScalarRef::Int(300)).unwrap_err();
/// assert!(matches!(err, ScalarError::OutOfRange { .. }));
/// ```
pub trait Scalar: Reflect {
    fn scalar_kind(&self) -> ScalarKind;

    fn scalar_ref(&self) -> ScalarRef<'_>;

    /// Assigns `value`, converting between integer widths and from integers to floats.
    ///
    /// The target is unchanged on error.
    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError>;
}
