//! Message-resolution pipeline
//!
//! Pure decision logic: given an incoming user message and the current
//! FAQ set, decide whether a curated answer applies or the message must
//! be deferred to the AI fallback. No I/O, no hidden state; the result
//! is deterministic for a fixed FAQ set and message.

use crate::storage::Faq;

/// Outcome of resolving a user message against the FAQ set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A FAQ question matched; carries the stored answer
    FaqMatch(String),
    /// No FAQ matched; the caller should consult the AI fallback
    NeedsAiFallback,
}

/// Resolve a user message against the FAQ set
///
/// The message is lowercased (case folding only, no trimming) and the
/// FAQs are scanned in their given order. The first FAQ whose
/// lowercased question is a substring of the normalized message wins;
/// there is no scoring and no token matching, so a short question
/// embedded anywhere inside a long message matches.
///
/// # Examples
///
/// ```
/// use faqrelay::resolve::{resolve, ReplyOutcome};
/// use faqrelay::storage::Faq;
///
/// let faqs = vec![Faq::new("operating hours", "9-5 Mon-Fri", vec![])];
/// let outcome = resolve("What are your operating hours?", &faqs);
/// assert_eq!(outcome, ReplyOutcome::FaqMatch("9-5 Mon-Fri".to_string()));
/// ```
pub fn resolve(message: &str, faqs: &[Faq]) -> ReplyOutcome {
    let normalized = message.to_lowercase();

    for faq in faqs {
        if normalized.contains(&faq.question.to_lowercase()) {
            return ReplyOutcome::FaqMatch(faq.answer.clone());
        }
    }

    ReplyOutcome::NeedsAiFallback
}
