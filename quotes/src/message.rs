//! # Message
//!
//! Module dedicated to the extraction of the reply part of raw MIME
//! messages.

use mail_parser::{Message, MessageParser, PartType};
use tracing::debug;

use crate::{
    extractor::{HtmlReply, PlainReply, ReplyExtractor},
    Error, Result,
};

/// The reply extracted from a MIME message, depending on the type of
/// its body.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Reply {
    Plain(PlainReply),
    Html(HtmlReply),
}

impl Reply {
    pub fn body(&self) -> &str {
        match self {
            Self::Plain(reply) => &reply.body,
            Self::Html(reply) => &reply.body,
        }
    }

    pub fn did_find_quote(&self) -> bool {
        match self {
            Self::Plain(reply) => reply.did_find_quote,
            Self::Html(reply) => reply.did_find_quote,
        }
    }
}

/// Extracts the reply part of the given raw MIME message, using the
/// default configuration.
pub fn extract_from_message(raw: impl AsRef<[u8]>) -> Result<Option<Reply>> {
    ReplyExtractor::new().extract_from_message(raw)
}

impl ReplyExtractor {
    /// Extracts the reply part of the given raw MIME message.
    ///
    /// The first HTML body is preferred over the first plain text
    /// one. Returns `None` when the message has no text body.
    pub fn extract_from_message(&self, raw: impl AsRef<[u8]>) -> Result<Option<Reply>> {
        let msg = MessageParser::new()
            .parse(raw.as_ref())
            .ok_or(Error::ParseMessageError)?;

        if let Some(html) = find_html_body(&msg) {
            debug!("extracting reply from html body");
            return Ok(Some(Reply::Html(self.extract_from_html(html)?)));
        }

        if let Some(text) = find_plain_body(&msg) {
            debug!("extracting reply from plain text body");
            return Ok(Some(Reply::Plain(self.extract_from_plain(text))));
        }

        debug!("no text body found in message");
        Ok(None)
    }
}

fn find_html_body<'a>(msg: &'a Message) -> Option<&'a str> {
    match &msg.html_part(0)?.body {
        PartType::Html(html) if !html.trim().is_empty() => Some(html.as_ref()),
        _ => None,
    }
}

fn find_plain_body<'a>(msg: &'a Message) -> Option<&'a str> {
    match &msg.text_part(0)?.body {
        PartType::Text(text) => Some(text.as_ref()),
        _ => None,
    }
}
