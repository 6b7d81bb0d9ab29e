//! Message records and the factory that localizes them.
//!
//! # Architecture
//!
//! - `record`: record descriptors, field slots and the `message_record!` macro
//! - `field`: `Text` and `MessageFn` field types
//! - `formatter`: parameter/result hooks and value conversions
//! - `format`: printf-style pattern formatting
//! - `factory`: `MessageFactory`, which wires records and loads locales

mod factory;
mod field;
pub mod format;
mod formatter;
mod record;

pub use factory::MessageFactory;
pub use field::{MessageFn, MessageHandler, MessageSlot, Refresher, Text, TextSlot};
pub use formatter::{
    apply_result_formatter, param_arg, Arg, CallArgs, MessageParam, MessageResult, Param,
    ParamFormatter, ResultFormatter,
};
pub use record::{
    message_key, DynRecord, FieldDescriptor, FieldKind, FieldMut, MessageRecord, RecordDescriptor,
};
