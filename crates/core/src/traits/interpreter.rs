//! Interpreter trait
//!
//! Resolves raw end-user text into an intent and entities. The story reader
//! uses it in end-to-end mode for user turns that carry no intent label.

use async_trait::async_trait;

use crate::ParsedMessage;

/// Natural language interpreter
///
/// Implementations must be stateless with respect to `parse` so that a
/// single shared instance can serve concurrent readers.
///
/// # Example
///
/// ```ignore
/// struct FixedInterpreter;
///
/// #[async_trait]
/// impl Interpreter for FixedInterpreter {
///     async fn parse(&self, text: &str) -> ParsedMessage {
///         ParsedMessage::text_only(text)
///     }
/// }
/// ```
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Parse `text` into intent and entities
    async fn parse(&self, text: &str) -> ParsedMessage;

    /// Name for logging
    fn name(&self) -> &str {
        "interpreter"
    }
}
