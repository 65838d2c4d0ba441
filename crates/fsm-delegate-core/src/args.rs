//! Ordered, heterogeneous transition arguments.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single transition argument.
///
/// Common scalar shapes get their own variant. Anything else travels as
/// [`Arg::Opaque`] and is recovered with [`Arg::downcast_ref`].
#[derive(Clone)]
pub enum Arg {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Any other value, shared by reference.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Arg {
    /// Wraps an arbitrary value as [`Arg::Opaque`].
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Arg::Opaque(Arc::new(value))
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Bool(_) => "bool",
            Arg::Int(_) => "int",
            Arg::Float(_) => "float",
            Arg::Str(_) => "str",
            Arg::Bytes(_) => "bytes",
            Arg::Opaque(_) => "opaque",
        }
    }

    /// Returns `true` for [`Arg::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }

    /// Returns the value of an [`Arg::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value of an [`Arg::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value of an [`Arg::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Arg::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the contents of an [`Arg::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contents of an [`Arg::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Arg::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the opaque payload as `T`.
    ///
    /// Returns `None` for non-opaque variants or when the type doesn't match.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Arg::Opaque(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => write!(f, "Null"),
            Arg::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Arg::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Arg::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Arg::Opaque(v) => write!(f, "Opaque({:p})", Arc::as_ptr(v)),
        }
    }
}

/// Opaque values are equal only when they share the same allocation.
impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Null, Arg::Null) => true,
            (Arg::Bool(a), Arg::Bool(b)) => a == b,
            (Arg::Int(a), Arg::Int(b)) => a == b,
            (Arg::Float(a), Arg::Float(b)) => a == b,
            (Arg::Str(a), Arg::Str(b)) => a == b,
            (Arg::Bytes(a), Arg::Bytes(b)) => a == b,
            (Arg::Opaque(a), Arg::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Null
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(i: $t) -> Self {
                    Arg::Int(i64::from(i))
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Arg {
    fn from(x: f32) -> Self {
        Arg::Float(f64::from(x))
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Float(x)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(b: Vec<u8>) -> Self {
        Arg::Bytes(b)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

/// The ordered argument list passed with a transition.
///
/// Callbacks receive it by reference, so every phase of a transition
/// sees the same list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Arg>);

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an argument.
    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.0.push(arg.into());
    }

    /// Returns the argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.0.get(index)
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the arguments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.0.iter()
    }

    /// Returns the arguments as a slice.
    pub fn as_slice(&self) -> &[Arg] {
        &self.0
    }

    /// Consumes the list and returns the arguments.
    pub fn into_vec(self) -> Vec<Arg> {
        self.0
    }
}

impl From<Vec<Arg>> for Args {
    fn from(args: Vec<Arg>) -> Self {
        Self(args)
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Args {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds an [`Args`] list from values convertible into [`Arg`].
///
/// # Example
///
/// ```rust
/// use fsm_delegate_core::{args, Arg};
///
/// let args = args![7, "order-1", true];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get(1), Some(&Arg::Str("order-1".to_string())));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::from(vec![$($crate::Arg::from($value)),+])
    };
}
