//! Values accepted by the plain write path
//!
//! A write call takes a heterogeneous list of values. Byte sequences are copied
//! into the payload verbatim; everything else is rendered through `Display`.

use std::borrow::Cow;
use std::fmt;

/// One value of a write call
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// Raw bytes, copied verbatim
    Bytes(&'a [u8]),
    /// Text, copied verbatim
    Text(&'a str),
    /// Anything else, rendered with its `Display` implementation
    Display(&'a dyn fmt::Display),
}

impl<'a> Value<'a> {
    #[must_use]
    pub fn bytes(bytes: &'a [u8]) -> Self {
        Value::Bytes(bytes)
    }

    #[must_use]
    pub fn text(text: &'a str) -> Self {
        Value::Text(text)
    }

    #[must_use]
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        Value::Display(value)
    }

    /// True for values that bypass textual rendering
    #[must_use]
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Text(s.as_str())
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for Value<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Value::Bytes(b.as_slice())
    }
}

/// Conversion used by the `write_values!` and `write_print!` macros
///
/// Implemented for text, byte containers, the primitive types and
/// `dyn Display`, so any displayable value can be passed as
/// `&value as &dyn Display`. Numeric literals need a type suffix (`42_u32`).
pub trait AsLogValue {
    fn as_log_value(&self) -> Value<'_>;
}

impl AsLogValue for Value<'_> {
    fn as_log_value(&self) -> Value<'_> {
        *self
    }
}

impl AsLogValue for str {
    fn as_log_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl AsLogValue for String {
    fn as_log_value(&self) -> Value<'_> {
        Value::Text(self.as_str())
    }
}

impl AsLogValue for Cow<'_, str> {
    fn as_log_value(&self) -> Value<'_> {
        Value::Text(self.as_ref())
    }
}

impl AsLogValue for [u8] {
    fn as_log_value(&self) -> Value<'_> {
        Value::Bytes(self)
    }
}

impl AsLogValue for Vec<u8> {
    fn as_log_value(&self) -> Value<'_> {
        Value::Bytes(self.as_slice())
    }
}

impl<const N: usize> AsLogValue for [u8; N] {
    fn as_log_value(&self) -> Value<'_> {
        Value::Bytes(self.as_slice())
    }
}

impl AsLogValue for dyn fmt::Display + '_ {
    fn as_log_value(&self) -> Value<'_> {
        Value::Display(self)
    }
}

impl AsLogValue for fmt::Arguments<'_> {
    fn as_log_value(&self) -> Value<'_> {
        Value::Display(self)
    }
}

macro_rules! impl_display_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsLogValue for $ty {
                fn as_log_value(&self) -> Value<'_> {
                    Value::Display(self)
                }
            }
        )*
    };
}

impl_display_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    std::net::IpAddr, std::net::SocketAddr
);
