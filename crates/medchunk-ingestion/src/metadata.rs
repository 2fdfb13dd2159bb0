//! Document-level metadata extraction.
//!
//! Clinical notes carry their identifiers in many layouts:
//!
//! ```text
//! * **Patient ID:** pat-123        list item, bold label
//! Pat. ID - pat-123                standalone line, abbreviated label
//! # Discharge Summary: DOC-88      identifier embedded in the title
//! ```
//!
//! Each field has an ordered list of [`Strategy`] matchers; the first one
//! that yields a non-empty value wins. Nothing is ever inferred: a field the
//! text does not literally carry stays `None`.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::{DocumentMetadata, MetadataField};

/// Emphasis markers that may wrap a label (`**Label:**`, `__Label__`, `*Label*`).
const EMPH: &str = r"\*\*|__|\*";
/// Colon, dash, or colon-dash combinations.
const SEP: &str = r":[ \t]*[-–—]|[:\-–—]";
/// Filler tolerated between the words of a label.
const W: &str = r"[ \t._-]*";

/// A stateless way of locating a field value in raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `- Patient ID: X`, `1. **Patient ID:** X`
    ListItem,
    /// `Patient ID: X`, `## Patient ID - X`
    StandaloneLine,
    /// `# Radiology Report RR-2291`, `# Discharge Summary: DOC-88`
    HeaderEmbedded,
}

impl Strategy {
    pub fn apply(self, text: &str, field: MetadataField) -> Option<String> {
        match self {
            Strategy::ListItem       => first_value(&patterns(field).list_item, text),
            Strategy::StandaloneLine => first_value(&patterns(field).standalone, text),
            Strategy::HeaderEmbedded => title_identifier(text),
        }
    }
}

/// Ordered strategies per field. Only the document id is looked for in the title.
pub fn strategies_for(field: MetadataField) -> &'static [Strategy] {
    match field {
        MetadataField::DocumentId => &[
            Strategy::ListItem,
            Strategy::StandaloneLine,
            Strategy::HeaderEmbedded,
        ],
        _ => &[Strategy::ListItem, Strategy::StandaloneLine],
    }
}

struct FieldPatterns {
    list_item: Regex,
    standalone: Regex,
}

impl FieldPatterns {
    fn new(labels: &[&str]) -> Self {
        let labels: Vec<String> = labels.iter().map(|l| l.replace("{W}", W)).collect();
        let label = format!("(?:{})", labels.join("|"));
        let tail = format!(
            r"[ \t]*(?:(?:{EMPH})[ \t]*(?:{SEP})?|(?:{SEP})[ \t]*(?:{EMPH})?)[ \t]*(?P<value>[^\r\n]*?)[ \t]*\r?$"
        );
        let list_item = format!(r"(?im)^[ \t]*(?:[-*+•]|\d{{1,3}}[.)])[ \t]+(?:{EMPH})?[ \t]*{label}{tail}");
        let standalone = format!(r"(?im)^[ \t]*(?:#{{1,6}}[ \t]+)?(?:{EMPH})?[ \t]*{label}{tail}");
        Self {
            list_item: Regex::new(&list_item).expect("valid list-item pattern"),
            standalone: Regex::new(&standalone).expect("valid standalone pattern"),
        }
    }
}

lazy_static! {
    static ref DOCUMENT_ID: FieldPatterns = FieldPatterns::new(&[
        r"document{W}(?:identifier|id|number|no\.?)",
        r"doc\.?{W}(?:id|number|no\.?)",
        r"report{W}id",
        r"record{W}id",
        r"id",
    ]);
    static ref PATIENT_ID: FieldPatterns = FieldPatterns::new(&[
        r"patient{W}(?:identifier|id|number|no\.?)",
        r"pat\.?{W}id",
        r"medical{W}record{W}(?:number|no\.?)",
        r"mrn",
    ]);
    static ref CLINICIAN_ID: FieldPatterns = FieldPatterns::new(&[
        r"clinician{W}id",
        r"clin\.?{W}id",
        r"provider{W}id",
        r"physician{W}id",
        r"doctor{W}id",
        r"practitioner{W}id",
        r"clinician",
    ]);
    static ref DATE_CREATED: FieldPatterns = FieldPatterns::new(&[
        r"date{W}created",
        r"created{W}date",
        r"creation{W}date",
        r"created{W}on",
        r"date{W}of{W}creation",
        r"document{W}date",
        r"created",
        r"date",
    ]);
    /// Whole-value dates (`2024-02-11`, `03/04/2024`, `March 3, 2024`, `3 Mar 2024`)
    /// and bare years. These are never document identifiers.
    static ref DATE_LIKE: Regex = Regex::new(concat!(
        r"(?i)^(?:",
        r"\d{4}[-/.]\d{1,2}[-/.]\d{1,2}",
        r"|\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}",
        r"|(?:19|20)\d{2}",
        r"|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}",
        r"|\d{1,2}(?:st|nd|rd|th)?\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}",
        r")$"
    ))
    .expect("valid date pattern");
    /// First level-1 heading.
    static ref TITLE_LINE: Regex =
        Regex::new(r"(?m)^[ ]{0,3}#[ \t]+(?P<title>[^\n]*)$").expect("valid title pattern");
}

fn patterns(field: MetadataField) -> &'static FieldPatterns {
    match field {
        MetadataField::DocumentId  => &*DOCUMENT_ID,
        MetadataField::PatientId   => &*PATIENT_ID,
        MetadataField::ClinicianId => &*CLINICIAN_ID,
        MetadataField::DateCreated => &*DATE_CREATED,
    }
}

/// First match whose value survives cleaning. A label with nothing after it
/// (`**Patient ID:**` on its own line) does not stop the search.
fn first_value(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.name("value").and_then(|m| clean_value(m.as_str())))
        .next()
}

/// Identifier carried by the document title, either after a separator or as
/// the trailing token. Only values containing a digit count as identifiers,
/// and dates do not.
fn title_identifier(text: &str) -> Option<String> {
    let caps = TITLE_LINE.captures(text)?;
    let title = caps.name("title")?.as_str().trim().trim_end_matches('#').trim();

    if let Some(value) = after_separator(title).and_then(clean_value) {
        if DATE_LIKE.is_match(&value) {
            return None;
        }
        if has_digit(&value) {
            return Some(value);
        }
    }

    let token = title
        .split_whitespace()
        .last()?
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')'));
    clean_value(token).filter(|v| has_digit(v) && !DATE_LIKE.is_match(v))
}

fn after_separator(title: &str) -> Option<&str> {
    if let Some(i) = title.find(':') {
        return Some(&title[i + 1..]);
    }
    [" - ", " – ", " — "]
        .iter()
        .find_map(|sep| title.find(sep).map(|i| &title[i + sep.len()..]))
}

fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

/// Strip markdown emphasis and stray separators; underscores are kept so
/// identifiers like `doc_123` survive.
pub fn clean_value(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '*' | '`')).collect();
    let cleaned = stripped
        .trim()
        .trim_start_matches(|c: char| c == '#' || c == ':')
        .trim_end_matches('\\')
        .trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Look up a single field, returning the value and the strategy that found it.
pub fn extract_field(text: &str, field: MetadataField) -> Option<(String, Strategy)> {
    strategies_for(field)
        .iter()
        .find_map(|s| s.apply(text, field).map(|v| (v, *s)))
}

/// Extract all document-level fields. Never fails; absent fields stay `None`.
pub fn extract_metadata(text: &str) -> DocumentMetadata {
    let mut meta = DocumentMetadata::default();
    for field in MetadataField::ALL {
        match extract_field(text, field) {
            Some((value, strategy)) => {
                debug!(field = field.as_str(), ?strategy, value = %value, "Metadata field extracted");
                meta.set(field, Some(value));
            }
            None => debug!(field = field.as_str(), "Metadata field absent"),
        }
    }
    meta
}
