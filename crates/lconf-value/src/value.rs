use crate::error::AccessError;

/// The closed set of value kinds a parsed node can have.
///
/// `Undefined` is never produced by the parser; it exists so callers can
/// name the "no meaningful kind" case when probing with `assert_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Integral,
    Floating,
    Text,
    Section,
    Vector,
    Undefined,
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Integral => write!(f, "integral"),
            Self::Floating => write!(f, "floating"),
            Self::Text => write!(f, "text"),
            Self::Section => write!(f, "section"),
            Self::Vector => write!(f, "vector"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// One scalar payload. Vector elements are independently typed, so a
/// vector is simply an ordered sequence of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Integer(_) => Kind::Integral,
            Self::Float(_) => Kind::Floating,
            Self::Text(_) => Kind::Text,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Self::Integer(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        if let Self::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl core::fmt::Display for Scalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "\"{value}\""),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Conversion from a stored [`Scalar`] into a caller-requested Rust type.
///
/// Kinds are strict: an integral value does not convert into a float type
/// and vice versa. Integer narrowing that loses the value is an error.
pub trait FromScalar: Sized {
    /// Kind reported in mismatch errors for this target type.
    fn expected() -> Kind;

    fn from_scalar(key: &str, scalar: &Scalar) -> Result<Self, AccessError>;
}

impl FromScalar for bool {
    fn expected() -> Kind {
        Kind::Bool
    }

    fn from_scalar(key: &str, scalar: &Scalar) -> Result<Self, AccessError> {
        match scalar {
            Scalar::Bool(value) => Ok(*value),
            other => Err(AccessError::mismatch(key, Kind::Bool, other.kind())),
        }
    }
}

macro_rules! integral_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                fn expected() -> Kind {
                    Kind::Integral
                }

                fn from_scalar(key: &str, scalar: &Scalar) -> Result<Self, AccessError> {
                    match scalar {
                        Scalar::Integer(value) => (*value)
                            .try_into()
                            .map_err(|_| AccessError::OutOfRange { key: key.to_string() }),
                        other => Err(AccessError::mismatch(key, Kind::Integral, other.kind())),
                    }
                }
            }
        )*
    };
}

integral_from_scalar!(i64, i32, i16, u64, u32, u16, usize);

impl FromScalar for f64 {
    fn expected() -> Kind {
        Kind::Floating
    }

    fn from_scalar(key: &str, scalar: &Scalar) -> Result<Self, AccessError> {
        match scalar {
            Scalar::Float(value) => Ok(*value),
            other => Err(AccessError::mismatch(key, Kind::Floating, other.kind())),
        }
    }
}

impl FromScalar for f32 {
    fn expected() -> Kind {
        Kind::Floating
    }

    fn from_scalar(key: &str, scalar: &Scalar) -> Result<Self, AccessError> {
        match scalar {
            Scalar::Float(value) => Ok(*value as f32),
            other => Err(AccessError::mismatch(key, Kind::Floating, other.kind())),
        }
    }
}

impl FromScalar for String {
    fn expected() -> Kind {
        Kind::Text
    }

    fn from_scalar(key: &str, scalar: &Scalar) -> Result<Self, AccessError> {
        match scalar {
            Scalar::Text(value) => Ok(value.clone()),
            other => Err(AccessError::mismatch(key, Kind::Text, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(Scalar::Bool(true).kind(), Kind::Bool);
        assert_eq!(Scalar::Integer(1).kind(), Kind::Integral);
        assert_eq!(Scalar::Float(1.5).kind(), Kind::Floating);
        assert_eq!(Scalar::from("x").kind(), Kind::Text);
    }

    #[test]
    fn test_integral_conversion_narrows() {
        let scalar = Scalar::Integer(300);
        assert_eq!(i64::from_scalar("k", &scalar), Ok(300));
        assert_eq!(u32::from_scalar("k", &scalar), Ok(300));
        assert_eq!(
            u16::from_scalar("k", &Scalar::Integer(-300)),
            Err(AccessError::OutOfRange { key: "k".into() })
        );
    }

    #[test]
    fn test_strict_kind_mismatch() {
        let scalar = Scalar::Integer(5);
        assert_eq!(
            f64::from_scalar("k", &scalar),
            Err(AccessError::TypeMismatch {
                key: "k".into(),
                expected: Kind::Floating,
                found: Kind::Integral,
            })
        );
        assert_eq!(
            bool::from_scalar("k", &scalar),
            Err(AccessError::TypeMismatch {
                key: "k".into(),
                expected: Kind::Bool,
                found: Kind::Integral,
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::Integer(-300).to_string(), "-300");
        assert_eq!(Scalar::from("words").to_string(), "\"words\"");
        assert_eq!(Kind::Floating.to_string(), "floating");
    }
}
