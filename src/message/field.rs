//! Message field types and the slots the factory wires them through.
//!
//! - [`Text`] holds a string that the factory rewrites on every locale load.
//! - [`MessageFn`] is a parameterized message; it reads the active dictionary
//!   on every call, so it never goes stale and needs no refresh.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::warn;

use crate::i18n::{Dictionary, FactoryMetrics};
use crate::message::format::sprintf;
use crate::message::formatter::{apply_result_formatter, Arg, CallArgs, MessageResult};

// ==================== Text ====================

/// A localized string field.
///
/// The value lives in a shared cell; the factory keeps only a weak reference
/// to it, so dropping the record releases the field.
pub struct Text<R = String> {
    cell: Arc<ArcSwap<R>>,
}

impl<R: MessageResult> Text<R> {
    /// Current value.
    pub fn get(&self) -> Arc<R> {
        self.cell.load_full()
    }
}

impl<R: MessageResult + Clone> Text<R> {
    /// Current value, cloned out of the cell.
    pub fn value(&self) -> R {
        R::clone(&self.cell.load())
    }
}

impl<R: MessageResult> Default for Text<R> {
    fn default() -> Self {
        Self {
            cell: Arc::new(ArcSwap::from_pointee(R::default())),
        }
    }
}

impl<R: MessageResult + fmt::Display> fmt::Display for Text<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self.cell.load(), f)
    }
}

impl<R: MessageResult + fmt::Debug> fmt::Debug for Text<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Text").field(&**self.cell.load()).finish()
    }
}

/// Re-applies the active dictionary to one text field.
pub struct Refresher {
    key: String,
    target: usize,
    apply: Box<dyn Fn(&Dictionary) -> bool + Send + Sync>,
}

impl Refresher {
    fn for_cell<R: MessageResult>(key: &str, default: &str, cell: &Arc<ArcSwap<R>>) -> Self {
        let weak = Arc::downgrade(cell);
        let lookup_key = key.to_string();
        let default = default.to_string();

        Self {
            key: key.to_string(),
            target: Arc::as_ptr(cell) as *const () as usize,
            // The result hook is not applied here, only on the initial value.
            apply: Box::new(move |dictionary: &Dictionary| match weak.upgrade() {
                Some(cell) => {
                    let message = dictionary.resolve(&lookup_key, &default).to_string();
                    cell.store(Arc::new(R::from_message(message)));
                    true
                }
                None => false,
            }),
        }
    }

    /// Rewrite the field from `dictionary`.
    ///
    /// # Returns
    /// `false` if the field has been dropped.
    pub fn run(&self, dictionary: &Dictionary) -> bool {
        (self.apply)(dictionary)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identity of the field cell this refresher writes to.
    pub(crate) fn target(&self) -> usize {
        self.target
    }
}

impl fmt::Debug for Refresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refresher").field("key", &self.key).finish_non_exhaustive()
    }
}

/// A field the factory can wire as localized text.
pub trait TextSlot {
    /// Number of results the field type stands for.
    fn result_arity(&self) -> usize;

    /// Assign the initial value and return the refresher for later loads.
    ///
    /// The initial value is `default`, passed through the field type's result
    /// hook when it has one. The dictionary is only consulted on refresh.
    fn bind(&mut self, key: &str, default: &str) -> Refresher;
}

impl<R: MessageResult> TextSlot for Text<R> {
    fn result_arity(&self) -> usize {
        R::ARITY
    }

    fn bind(&mut self, key: &str, default: &str) -> Refresher {
        let initial = apply_result_formatter(&**self.cell.load(), default.to_string());

        let refresher = Refresher::for_cell(key, default, &self.cell);
        self.cell.store(Arc::new(initial));
        refresher
    }
}

// ==================== MessageFn ====================

/// Resolves and formats one message key against the live dictionary.
pub struct MessageHandler {
    key: String,
    default: String,
    dictionary: Arc<ArcSwap<Dictionary>>,
    metrics: Arc<FactoryMetrics>,
}

impl MessageHandler {
    pub(crate) fn new(
        key: impl Into<String>,
        default: impl Into<String>,
        dictionary: Arc<ArcSwap<Dictionary>>,
        metrics: Arc<FactoryMetrics>,
    ) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
            dictionary,
            metrics,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Format the active pattern for this key with `args`.
    pub fn render(&self, args: &[Arg]) -> String {
        let dictionary = self.dictionary.load();
        let pattern = match dictionary.get(&self.key) {
            Some(pattern) => {
                self.metrics.record_hit();
                pattern
            }
            None => {
                self.metrics.record_fallback();
                self.default.as_str()
            }
        };
        sprintf(pattern, args)
    }
}

/// A parameterized message field.
///
/// `S` is the declared parameter tuple and `R` the result type:
///
/// ```ignore
/// pub greet: MessageFn<(String, u32)>,
///
/// record.greet.call(("Sam", 3));
/// ```
pub struct MessageFn<S, R = String> {
    handler: Option<Arc<MessageHandler>>,
    _signature: PhantomData<fn(S) -> R>,
}

impl<S, R: MessageResult> MessageFn<S, R> {
    /// Format the message with `args`.
    ///
    /// Arguments with a parameter hook are replaced by the hook's output; the
    /// formatted text goes through `R`'s result hook when it has one.
    pub fn call<A: CallArgs<S>>(&self, args: A) -> R {
        let Some(handler) = &self.handler else {
            warn!("Message function called before the record was initialized");
            return R::default();
        };

        let message = handler.render(&args.into_args());
        apply_result_formatter(&R::default(), message)
    }

    /// Message key this function is bound to, once initialized.
    pub fn key(&self) -> Option<&str> {
        self.handler.as_deref().map(MessageHandler::key)
    }

    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }
}

impl<S, R> Default for MessageFn<S, R> {
    fn default() -> Self {
        Self {
            handler: None,
            _signature: PhantomData,
        }
    }
}

impl<S, R> Clone for MessageFn<S, R> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            _signature: PhantomData,
        }
    }
}

impl<S, R> fmt::Debug for MessageFn<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFn")
            .field("key", &self.handler.as_deref().map(MessageHandler::key))
            .finish()
    }
}

/// A field the factory can wire as a parameterized message.
pub trait MessageSlot {
    /// Number of results the declared signature produces.
    fn result_arity(&self) -> usize;

    fn bind(&mut self, handler: Arc<MessageHandler>);
}

impl<S, R: MessageResult> MessageSlot for MessageFn<S, R> {
    fn result_arity(&self) -> usize {
        R::ARITY
    }

    fn bind(&mut self, handler: Arc<MessageHandler>) {
        self.handler = Some(handler);
    }
}
