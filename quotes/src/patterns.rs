//! # Patterns
//!
//! Module dedicated to the static tables the quotation detection
//! relies on: localized trigger words, splitter regular expressions,
//! forward headers and link shapes.
//!
//! All the regular expressions are compiled once, the first time
//! [`Patterns::get`] is called, then shared by reference.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words starting an "on <date>, <somebody> wrote:" splitter.
pub const ON_DATE_PREFIXES: &[&str] = &[
    "On",      // English
    "Le",      // French
    "W dniu",  // Polish
    "Op",      // Dutch
    "Am",      // German
    "Em",      // Portuguese
    "På",      // Norwegian
    "Den",     // Swedish, Danish
    "Vào",     // Vietnamese
];

/// Separators between the date and the sender address.
pub const ON_DATE_SEPARATORS: &[&str] = &[
    ",",          // most languages
    "użytkownik", // Polish
];

/// Verbs ending an "on <date>, <somebody> wrote:" splitter.
pub const ON_DATE_WROTE_SUFFIXES: &[&str] = &[
    "wrote",
    "sent",
    "a écrit",
    "napisał",
    "schreef",
    "verzond",
    "geschreven",
    "schrieb",
    "escreveu",
    "skrev",
    "đã viết",
];

/// Languages writing "on <date> wrote <somebody>:" instead.
pub const ON_DATE_WROTE_SMB_PREFIXES: &[&str] = &["Op", "Am"];

/// Verbs of the "on <date> wrote <somebody>:" splitter.
pub const ON_DATE_WROTE_SMB_SUFFIXES: &[&str] = &["schreef", "verzond", "geschreven", "schrieb"];

/// Titles of the `----- Original Message -----` banner.
pub const ORIGINAL_MESSAGE_TITLES: &[&str] = &[
    "Original Message",
    "Reply Message",
    "Ursprüngliche Nachricht",
    "Antwort Nachricht",
    "Oprindelig meddelelse",
];

/// Header names found in `From:` / `Date:` splitter blocks.
pub const HEADER_NAMES: &[&str] = &[
    // from
    "From", "Van", "De", "Von", "Fra", "Från",
    // date
    "Date", "Sent", "Datum", "Envoyé", "Skickat", "Sendt", "Gesendet",
    // subject
    "Subject", "Betreff", "Objet", "Emne", "Ämne",
    // to
    "To", "An", "Til", "À", "Till",
];

/// Titles of the dashed forward header, as written by webmails in
/// different languages.
pub const FORWARD_TITLES: &[&str] = &[
    "Forwarded message",
    "Weitergeleitete Nachricht",
    "Message transféré",
    "Mensaje reenviado",
    "Doorgestuurd bericht",
    "Messaggio inoltrato",
];

/// Identifiers of elements wrapping a quoted message.
pub const QUOTE_IDS: &[&str] = &["OLK_SRC_BODY_SECTION"];

/// Class marking an element as a quote container.
pub const QUOTE_CONTAINER_CLASS: &str = "gmail_quote";

pub const CHECKPOINT_PREFIX: &str = "#!%!";
pub const CHECKPOINT_SUFFIX: &str = "!%!#";

fn alternatives(words: &[&str]) -> String {
    words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|")
}

fn on_date_smb_wrote() -> String {
    format!(
        r"-*>? ?({}) .*({})(.*\n){{0,2}}.*({}):?-*",
        alternatives(ON_DATE_PREFIXES),
        alternatives(ON_DATE_SEPARATORS),
        alternatives(ON_DATE_WROTE_SUFFIXES),
    )
}

fn on_date_wrote_smb() -> String {
    format!(
        r"-*>? ?({}) .*(.*\n){{0,2}}.*({}) *.*:",
        alternatives(ON_DATE_WROTE_SMB_PREFIXES),
        alternatives(ON_DATE_WROTE_SMB_SUFFIXES),
    )
}

fn original_message() -> String {
    format!(
        r"(?i)\s*-+ *({}) *-+",
        alternatives(ORIGINAL_MESSAGE_TITLES)
    )
}

fn from_colon_or_date_colon() -> String {
    format!(
        r"(?i)((_+\r?\n)?\s*:?\*?({})\s?:\*?([^\n]+\n){{1,2}}){{2,}}",
        alternatives(HEADER_NAMES)
    )
}

/// Sources of the splitter patterns, in priority order. Each source
/// is anchored at the beginning of the window when compiled.
fn splitter_sources() -> Vec<String> {
    vec![
        original_message(),
        on_date_smb_wrote(),
        on_date_wrote_smb(),
        from_colon_or_date_colon(),
        // 02.04.2012 14:20 пользователь "bob@example.com" <
        // bob@xxx.mailgun.org> написал:
        r"(\d+/\d+/\d+|\d+\.\d+\.\d+)(?s:.*)\s\S+@\S+".into(),
        // 2014-10-17 11:28 GMT+03:00 Bob <
        // bob@example.com>:
        r"\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}\s+GMT(?s:.*)\s\S+@\S+".into(),
        // Thu, 26 Jun 2014 14:00:51 +0400 Bob <bob@example.com>:
        r"\S{3,10}, \d\d? \S{3,10} 20\d\d,? \d\d?:\d\d(:\d\d)?( \S+){3,6}@\S+:".into(),
        // Sent from Samsung MobileName <address@example.com> wrote:
        r"Sent from Samsung.* \S+@\S+> wrote".into(),
        // ---- John Smith wrote ----
        r"(?i)\s*-+.*wrote *-+".into(),
        // On Tue, Apr 11, 2017 at 10:07 PM, John Smith
        //
        // <
        // mailto:John Smith <johnsmith@gmail.com>
        // > wrote:
        r"(?i)On.*\s{2}<\smailto:.*\s> wrote:".into(),
    ]
}

/// Anchors the given pattern at the very beginning of the haystack,
/// keeping its leading inline flags in front.
fn anchored(pattern: &str) -> String {
    match pattern.strip_prefix("(?i)") {
        Some(rest) => format!(r"(?i)\A(?:{rest})"),
        None => format!(r"\A(?:{pattern})"),
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// The compiled pattern tables.
#[derive(Clone, Debug)]
pub struct Patterns {
    /// Splitter patterns, anchored, in priority order.
    pub splitters: Vec<Regex>,

    /// Unanchored "on <date>, <somebody> wrote:" splitter, used to
    /// detect splitters glued to the end of a reply line.
    pub on_date_smb_wrote: Regex,

    /// Forwarded message header.
    pub forward: Regex,

    /// Leading quotation marker(s).
    pub quote: Regex,

    /// Link wrapped in angle brackets.
    pub link: Regex,

    /// Link wrapped by the pre-processing step.
    pub normalized_link: Regex,

    /// Link wrapped in parenthesis or brackets.
    pub parenthesis_link: Regex,

    /// Checkpoint tag embedded in projected markup text.
    pub checkpoint: Regex,

    /// Outlook 2007, 2010 and 2013 splitter style attribute.
    pub outlook_splitter_style: Regex,
}

static PATTERNS: Lazy<Patterns> = Lazy::new(Patterns::compile);

impl Patterns {
    /// Gets the shared, compiled pattern tables.
    pub fn get() -> &'static Patterns {
        &PATTERNS
    }

    fn compile() -> Self {
        let splitters = splitter_sources()
            .iter()
            .map(|source| compile(&anchored(source)))
            .collect();

        let forward = format!(
            r"(?i)\A(-+ *({}) *-+|Begin forwarded message:?)\s*\z",
            alternatives(FORWARD_TITLES)
        );

        let checkpoint = format!(
            r"{}(\d+){}",
            regex::escape(CHECKPOINT_PREFIX),
            regex::escape(CHECKPOINT_SUFFIX),
        );

        Self {
            splitters,
            on_date_smb_wrote: compile(&on_date_smb_wrote()),
            forward: compile(&forward),
            quote: compile(r"\A>+ ?"),
            link: compile(r"<(https?://[^>]*)>"),
            normalized_link: compile(r"@@(https?://[^>@]*)@@"),
            parenthesis_link: compile(r"[(\[]https?://"),
            checkpoint: compile(&checkpoint),
            outlook_splitter_style: compile(
                r"(?i)border:none; ?border-top:solid #(E1E1E1|B5C4DF) 1\.0pt; ?padding:3\.0pt 0(in|cm|pt) 0(in|cm|pt) 0(in|cm|pt)",
            ),
        }
    }

    /// Matches the first splitter pattern at the beginning of the
    /// given window, and returns the matched text.
    pub fn find_splitter<'a>(&self, window: &'a str) -> Option<&'a str> {
        self.splitters
            .iter()
            .find_map(|splitter| splitter.find(window))
            .map(|m| m.as_str())
    }

    /// Returns `true` if the given text starts with a forwarded
    /// message header.
    pub fn is_forward(&self, line: &str) -> bool {
        self.forward.is_match(line.trim())
    }

    /// Returns `true` if the given text starts with a forwarded
    /// message header on its first non-blank line.
    pub fn starts_with_forward(&self, text: &str) -> bool {
        text.lines()
            .find(|line| !line.trim().is_empty())
            .map(|line| self.is_forward(line))
            .unwrap_or_default()
    }
}

/// Formats the checkpoint tag of the given counter.
pub fn checkpoint_tag(counter: usize) -> String {
    format!("{CHECKPOINT_PREFIX}{counter}{CHECKPOINT_SUFFIX}")
}
