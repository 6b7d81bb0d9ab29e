//! Record declarations: which fields a message record has, and how to reach
//! them on an instance.
//!
//! A record describes itself with a [`RecordDescriptor`], built once per type,
//! and hands out typed slots through [`MessageRecord::field_mut`]. The
//! [`message_record!`](crate::message_record) macro writes both for you:
//!
//! ```ignore
//! message_record! {
//!     pub struct Greeter {
//!         #[text("Welcome")]
//!         pub title: Text,
//!         #[message("Hello, %v!")]
//!         pub hello: MessageFn<(String,)>,
//!         #[embed]
//!         pub common: Common,
//!     }
//! }
//! ```
//!
//! Message keys are `"{Record}.{Field}"` with the field name in UpperCamelCase,
//! e.g. `Greeter.Hello` for the `hello` field above.

use heck::ToUpperCamelCase;

use crate::message::field::{MessageSlot, TextSlot};

/// How a declared field is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Localized string, rewritten on locale load
    Text,
    /// Parameterized message, resolved on every call
    Message,
    /// Nested record, initialized recursively
    Embedded,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Message => "message",
            FieldKind::Embedded => "embedded record",
        }
    }
}

/// One declared field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    default: String,
    key: String,
}

impl FieldDescriptor {
    /// Rust field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Default pattern, used when the active dictionary has no entry.
    pub fn default_pattern(&self) -> &str {
        &self.default
    }

    /// Dictionary key (empty for embedded records).
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// The declared fields of a record type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Start a descriptor for the record named `name`.
    ///
    /// The name is the first segment of every message key of the record.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Declare a text field.
    pub fn text(self, field: &'static str, default: impl Into<String>) -> Self {
        self.with_field(field, FieldKind::Text, default.into())
    }

    /// Declare a message function field.
    pub fn message(self, field: &'static str, default: impl Into<String>) -> Self {
        self.with_field(field, FieldKind::Message, default.into())
    }

    /// Declare an embedded record field.
    pub fn embed(mut self, field: &'static str) -> Self {
        self.fields.push(FieldDescriptor {
            name: field,
            kind: FieldKind::Embedded,
            default: String::new(),
            key: String::new(),
        });
        self
    }

    fn with_field(mut self, field: &'static str, kind: FieldKind, default: String) -> Self {
        self.fields.push(FieldDescriptor {
            name: field,
            kind,
            default,
            key: message_key(self.name, field),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Dictionary key for a field: `"{record}.{Field}"`.
pub fn message_key(record: &str, field: &str) -> String {
    format!("{}.{}", record, field.to_upper_camel_case())
}

/// Mutable access to one field of a record instance.
pub enum FieldMut<'a> {
    Text(&'a mut dyn TextSlot),
    Message(&'a mut dyn MessageSlot),
    Embedded(&'a mut dyn DynRecord),
}

impl FieldMut<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldMut::Text(_) => FieldKind::Text,
            FieldMut::Message(_) => FieldKind::Message,
            FieldMut::Embedded(_) => FieldKind::Embedded,
        }
    }
}

/// A record type whose fields a factory can initialize.
pub trait MessageRecord: Default + 'static {
    /// The record's declared fields. Built once per type.
    fn descriptor() -> &'static RecordDescriptor;

    /// Slot for the field called `name`, if the record has one.
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

/// Object-safe view of a [`MessageRecord`], used to walk nested records.
pub trait DynRecord {
    fn record_descriptor(&self) -> &'static RecordDescriptor;

    fn record_field(&mut self, name: &str) -> Option<FieldMut<'_>>;

    /// Replace the record with a fresh default instance.
    fn reset_record(&mut self);
}

impl<T: MessageRecord> DynRecord for T {
    fn record_descriptor(&self) -> &'static RecordDescriptor {
        T::descriptor()
    }

    fn record_field(&mut self, name: &str) -> Option<FieldMut<'_>> {
        self.field_mut(name)
    }

    fn reset_record(&mut self) {
        *self = T::default();
    }
}

/// Declare a message record.
///
/// Each field carries one attribute:
///
/// - `#[text("default")]` on a [`Text`](crate::Text) field
/// - `#[message("default")]` on a [`MessageFn`](crate::MessageFn) field
/// - `#[embed]` on a field whose type is itself a message record
///
/// The struct gets `#[derive(Default)]` and a [`MessageRecord`] impl. The
/// record name used in message keys is the struct name. Field attributes
/// other than the kind are not accepted; document the struct instead.
#[macro_export]
macro_rules! message_record {
    (@slot text, $place:expr) => {
        $crate::FieldMut::Text(&mut $place)
    };
    (@slot message, $place:expr) => {
        $crate::FieldMut::Message(&mut $place)
    };
    (@slot embed, $place:expr) => {
        $crate::FieldMut::Embedded(&mut $place)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                #[$kind:ident $( ($default:literal) )?]
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $name {
            $(
                $fvis $field: $fty,
            )*
        }

        impl $crate::MessageRecord for $name {
            fn descriptor() -> &'static $crate::RecordDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::RecordDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    $crate::RecordDescriptor::new(stringify!($name))
                        $( .$kind(stringify!($field) $(, $default)?) )*
                })
            }

            fn field_mut(&mut self, name: &str) -> Option<$crate::FieldMut<'_>> {
                match name {
                    $( stringify!($field) => Some($crate::message_record!(@slot $kind, self.$field)), )*
                    _ => None,
                }
            }
        }
    };
}
