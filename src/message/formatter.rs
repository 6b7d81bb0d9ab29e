//! Formatting hooks and the conversions between Rust values and message
//! arguments/results.
//!
//! A type opts into custom rendering by implementing [`ParamFormatter`] or
//! [`ResultFormatter`] and returning itself from
//! [`MessageParam::as_param_formatter`] / [`MessageResult::as_result_formatter`].
//! The hooks are detected per value at call time.
//!
//! ```ignore
//! struct UserName(String);
//!
//! impl ParamFormatter for UserName {
//!     fn format_param(&self) -> String {
//!         format!("@{}", self.0)
//!     }
//! }
//!
//! impl MessageParam for UserName {
//!     fn to_arg(&self) -> Arg {
//!         Arg::Str(self.0.clone())
//!     }
//!     fn as_param_formatter(&self) -> Option<&dyn ParamFormatter> {
//!         Some(self)
//!     }
//! }
//! ```

use std::fmt;

/// A type that renders itself specially when passed to a message.
pub trait ParamFormatter {
    fn format_param(&self) -> String;
}

/// A type that post-processes a formatted message before it is returned.
pub trait ResultFormatter {
    fn format_result(&self, formatted: &str) -> String;
}

/// A single positional message argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Arg {
    /// Name of the argument's kind, used in malformed-pattern markers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Uint(n) => write!(f, "{}", n),
            Arg::Float(x) => write!(f, "{}", x),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Char(c) => write!(f, "{}", c),
        }
    }
}

// ==================== Parameters ====================

/// A value that can be passed to a message function.
pub trait MessageParam {
    /// Plain conversion used when the value has no parameter hook.
    fn to_arg(&self) -> Arg;

    /// The value's parameter hook, if it has one.
    fn as_param_formatter(&self) -> Option<&dyn ParamFormatter> {
        None
    }
}

/// Convert a parameter, substituting its hook output when present.
pub fn param_arg<P: MessageParam + ?Sized>(param: &P) -> Arg {
    match param.as_param_formatter() {
        Some(formatter) => Arg::Str(formatter.format_param()),
        None => param.to_arg(),
    }
}

impl MessageParam for String {
    fn to_arg(&self) -> Arg {
        Arg::Str(self.clone())
    }
}

impl MessageParam for bool {
    fn to_arg(&self) -> Arg {
        Arg::Bool(*self)
    }
}

impl MessageParam for char {
    fn to_arg(&self) -> Arg {
        Arg::Char(*self)
    }
}

macro_rules! impl_param {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl MessageParam for $ty {
                fn to_arg(&self) -> Arg {
                    Arg::$variant(*self as $wide)
                }
            }
        )*
    };
}

impl_param!(Int as i64: i8, i16, i32, i64, isize);
impl_param!(Uint as u64: u8, u16, u32, u64, usize);
impl_param!(Float as f64: f32, f64);

/// A caller-supplied value accepted where a `T` parameter is declared.
///
/// Lets `MessageFn<(String,)>` be called with `("Sam",)` and
/// `MessageFn<(Name,)>` with `(&name,)`.
pub trait Param<T> {
    fn to_param_arg(&self) -> Arg;
}

impl<T: MessageParam> Param<T> for T {
    fn to_param_arg(&self) -> Arg {
        param_arg(self)
    }
}

impl<T: MessageParam> Param<T> for &T {
    fn to_param_arg(&self) -> Arg {
        param_arg(*self)
    }
}

impl Param<String> for &str {
    fn to_param_arg(&self) -> Arg {
        Arg::Str((*self).to_string())
    }
}

/// An argument tuple accepted by a message function declared with
/// parameter tuple `S`.
pub trait CallArgs<S> {
    fn into_args(self) -> Vec<Arg>;
}

impl CallArgs<()> for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

macro_rules! impl_call_args {
    ($(($s:ident, $p:ident, $idx:tt)),+) => {
        impl<$($s, $p: Param<$s>),+> CallArgs<($($s,)+)> for ($($p,)+) {
            fn into_args(self) -> Vec<Arg> {
                vec![$(self.$idx.to_param_arg()),+]
            }
        }
    };
}

impl_call_args!((S0, P0, 0));
impl_call_args!((S0, P0, 0), (S1, P1, 1));
impl_call_args!((S0, P0, 0), (S1, P1, 1), (S2, P2, 2));
impl_call_args!((S0, P0, 0), (S1, P1, 1), (S2, P2, 2), (S3, P3, 3));
impl_call_args!((S0, P0, 0), (S1, P1, 1), (S2, P2, 2), (S3, P3, 3), (S4, P4, 4));
impl_call_args!(
    (S0, P0, 0),
    (S1, P1, 1),
    (S2, P2, 2),
    (S3, P3, 3),
    (S4, P4, 4),
    (S5, P5, 5)
);

// ==================== Results ====================

/// A value a message can produce.
///
/// `ARITY` is the number of results the type stands for. Message functions
/// must produce exactly one; `()` and tuples exist so that a declaration with
/// the wrong number of results is caught by the factory instead of compiling
/// into something meaningless.
pub trait MessageResult: Default + Send + Sync + 'static {
    const ARITY: usize = 1;

    fn from_message(message: String) -> Self;

    /// The value's result hook, if it has one.
    fn as_result_formatter(&self) -> Option<&dyn ResultFormatter> {
        None
    }
}

impl MessageResult for String {
    fn from_message(message: String) -> Self {
        message
    }
}

impl MessageResult for () {
    const ARITY: usize = 0;

    fn from_message(_message: String) -> Self {}
}

impl<A: MessageResult, B: MessageResult> MessageResult for (A, B) {
    const ARITY: usize = 2;

    fn from_message(message: String) -> Self {
        (A::from_message(message.clone()), B::from_message(message))
    }
}

impl<A: MessageResult, B: MessageResult, C: MessageResult> MessageResult for (A, B, C) {
    const ARITY: usize = 3;

    fn from_message(message: String) -> Self {
        (
            A::from_message(message.clone()),
            B::from_message(message.clone()),
            C::from_message(message),
        )
    }
}

/// Build a result from a formatted message, applying the result hook of
/// `receiver` when it has one.
pub fn apply_result_formatter<R: MessageResult>(receiver: &R, message: String) -> R {
    match receiver.as_result_formatter() {
        Some(formatter) => R::from_message(formatter.format_result(&message)),
        None => R::from_message(message),
    }
}
