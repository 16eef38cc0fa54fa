#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
//! Rust library to extract the reply part of email bodies, leaving
//! the quoted messages apart.
//!
//! Plain text bodies are split into lines, each line gets a marker
//! (empty, quoted, splitter, forward or text) and the marker sequence
//! is matched against known quotation layouts. HTML bodies are either
//! projected into plain text with checkpoints, so that the plain text
//! algorithm can run on them, or cut using the markup well-known mail
//! clients wrap quotations with.
//!
//! ```rust
//! let reply = quotes::extract_from_plain(concat!(
//!     "Thanks!\n",
//!     "\n",
//!     "On Mon, Apr 4, 2011 at 3:59 PM, bob@example.com wrote:\n",
//!     "> Hello\n",
//!     "> world\n",
//! ));
//!
//! assert!(reply.did_find_quote);
//! assert_eq!(reply.body, "Thanks!");
//! ```

pub mod config;
pub mod dom;
mod error;
pub mod extractor;
pub mod html;
pub mod message;
pub mod patterns;
pub mod plain;

#[doc(inline)]
pub use self::{
    config::QuotesConfig,
    error::{Error, Result},
    extractor::{HtmlReply, PlainReply, ReplyExtractor},
    message::{extract_from_message, Reply},
};

/// Extracts the reply part of the given plain text body, using the
/// default configuration.
pub fn extract_from_plain(body: impl AsRef<str>) -> PlainReply {
    ReplyExtractor::new().extract_from_plain(body)
}

/// Extracts the reply part of the given HTML body, using the default
/// configuration.
pub fn extract_from_html(body: impl AsRef<str>) -> Result<HtmlReply> {
    ReplyExtractor::new().extract_from_html(body)
}
