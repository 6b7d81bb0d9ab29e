//! Message records with default patterns and hot-swappable locale dictionaries.
//!
//! Declare a record whose fields are user-facing strings ([`Text`]) or
//! parameterized messages ([`MessageFn`]), each with a default pattern.
//! A [`MessageFactory`] wires the fields, and loading a locale later switches
//! every initialized record to the translated text without re-initializing.
//!
//! ```rust,ignore
//! use message_records::{message_record, Locale, MessageFactory, MessageFn, Text};
//!
//! message_record! {
//!     pub struct Greeter {
//!         #[text("Welcome")]
//!         pub title: Text,
//!         #[message("Hello, %v!")]
//!         pub hello: MessageFn<(String,)>,
//!     }
//! }
//!
//! let mut factory = MessageFactory::new();
//! factory.register_locale(Locale::parse("fr")?, "json", "locales/fr.json");
//!
//! let greeter: Greeter = factory.create()?;
//! assert_eq!(greeter.hello.call(("Sam",)), "Hello, Sam!");
//!
//! factory.load_locale(&Locale::parse("fr")?)?;
//! assert_eq!(greeter.hello.call(("Sam",)), "Bonjour, Sam!");
//! ```

pub mod config;
pub mod error;
pub mod i18n;
pub mod message;

pub use error::{FactoryError, LoadError};
pub use i18n::{Dictionary, Loader, LoaderRegistry, Locale};
pub use message::{
    Arg, FieldMut, MessageFactory, MessageFn, MessageParam, MessageRecord, MessageResult,
    ParamFormatter, RecordDescriptor, ResultFormatter, Text,
};
