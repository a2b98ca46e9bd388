// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Field-record: the flat tagged representation of a record in the index.
//!
//! # Wire format
//!
//! ```text
//! <record>
//!   <localControlNumber>Book:42</localControlNumber>
//!   <title>Dune</title>
//!   <author>Frank Herbert</author>
//! </record>
//! ```
//!
//! Raw records skip the envelope: the payload is the single field's text.

use thiserror::Error;
use tracing::warn;

use super::{IndexIdentity, RecordId};

/// Element carrying the index identity. The server maps it to the
/// bib-1 Local-number attribute.
pub const IDENTITY_FIELD: &str = "localControlNumber";

const RECORD_ELEMENT: &str = "record";

/// A hit payload that could not be turned into a primary key.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("hit payload is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("hit payload has no localControlNumber element")]
    MissingIdentity,
    #[error("identity '{identity}' does not end in a numeric primary key")]
    InvalidIdentity { identity: String },
}

/// Ordered `(name, value)` fields, identity first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    identity: IndexIdentity,
    fields: Vec<(String, String)>,
    raw: bool,
}

impl FieldRecord {
    /// A composed record holding only the identity field.
    pub fn new(identity: IndexIdentity) -> Self {
        let fields = vec![(IDENTITY_FIELD.to_string(), identity.to_string())];
        Self { identity, fields, raw: false }
    }

    /// A raw record: `body` is sent to the index as-is.
    pub fn raw(identity: IndexIdentity, name: impl Into<String>, body: impl Into<String>) -> Self {
        let mut record = Self::new(identity);
        record.fields.push((name.into(), body.into()));
        record.raw = true;
        record
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn identity(&self) -> &IndexIdentity {
        &self.identity
    }

    /// All fields including the leading identity field.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text handed to the index updater.
    #[must_use]
    pub fn to_payload(&self) -> String {
        if self.raw {
            return self
                .fields
                .get(1)
                .map(|(_, body)| body.clone())
                .unwrap_or_default();
        }

        let mut xml = String::with_capacity(64 + self.fields.iter().map(|(k, v)| 2 * k.len() + v.len() + 5).sum::<usize>());
        xml.push('<');
        xml.push_str(RECORD_ELEMENT);
        xml.push('>');
        for (name, value) in &self.fields {
            xml.push('<');
            xml.push_str(name);
            xml.push('>');
            let dropped = escape_text(value, &mut xml);
            if dropped > 0 {
                warn!(
                    identity = %self.identity,
                    field = %name,
                    dropped,
                    "Dropped characters not allowed in XML from field value"
                );
            }
            xml.push_str("</");
            xml.push_str(name);
            xml.push('>');
        }
        xml.push_str("</");
        xml.push_str(RECORD_ELEMENT);
        xml.push('>');
        xml
    }
}

/// Extract the primary key embedded in a hit's XML payload.
pub fn primary_key_from_payload(payload: &str) -> Result<RecordId, PayloadError> {
    let doc = roxmltree::Document::parse(payload)?;
    let identity = doc
        .descendants()
        .find(|node| node.has_tag_name(IDENTITY_FIELD))
        .ok_or(PayloadError::MissingIdentity)?;

    IndexIdentity::parse_primary_key(identity.text().unwrap_or_default())
}

/// Escape `value` into `out`, dropping characters XML 1.0 does not allow.
/// Returns the number of characters dropped.
fn escape_text(value: &str, out: &mut String) -> usize {
    let mut dropped = 0;
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => dropped += 1,
        }
    }
    dropped
}

// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Whether `name` can be used as a plain (unprefixed) XML element name.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_first_field() {
        let mut record = FieldRecord::new(IndexIdentity::new("Book", 1));
        record.push("title", "Dune");

        assert_eq!(record.fields()[0], (IDENTITY_FIELD.to_string(), "Book:1".to_string()));
        assert_eq!(record.get("title"), Some("Dune"));
        assert!(!record.is_raw());
    }

    #[test]
    fn test_xml_payload() {
        let mut record = FieldRecord::new(IndexIdentity::new("Book", 42));
        record.push("title", "Dune");
        record.push("author", "Frank Herbert");

        assert_eq!(
            record.to_payload(),
            "<record><localControlNumber>Book:42</localControlNumber>\
             <title>Dune</title><author>Frank Herbert</author></record>"
        );
    }

    #[test]
    fn test_xml_payload_escapes_text() {
        let mut record = FieldRecord::new(IndexIdentity::new("Book", 1));
        record.push("title", "Tom & Jerry <\"live\"> 'again'");

        let payload = record.to_payload();
        assert!(payload.contains("<title>Tom &amp; Jerry &lt;&quot;live&quot;&gt; &apos;again&apos;</title>"));

        let doc = roxmltree::Document::parse(&payload).unwrap();
        let title = doc.descendants().find(|n| n.has_tag_name("title")).unwrap();
        assert_eq!(title.text(), Some("Tom & Jerry <\"live\"> 'again'"));
    }

    #[test]
    fn test_raw_payload_is_body_verbatim() {
        let body = "<mods><title>Dune</title></mods>";
        let record = FieldRecord::raw(IndexIdentity::new("Item", 3), "marc", body);

        assert!(record.is_raw());
        assert_eq!(record.fields().len(), 2);
        assert_eq!(record.to_payload(), body);
    }

    #[test]
    fn test_primary_key_from_payload() {
        let mut record = FieldRecord::new(IndexIdentity::new("Book", 1234));
        record.push("title", "x");

        assert_eq!(primary_key_from_payload(&record.to_payload()).unwrap(), 1234);
    }

    #[test]
    fn test_primary_key_from_nested_payload() {
        let payload = r#"<zebra:record xmlns:zebra="http://www.indexdata.com/zebra/">
            <wrapper><localControlNumber> Topic:9 </localControlNumber></wrapper>
        </zebra:record>"#;

        assert_eq!(primary_key_from_payload(payload).unwrap(), 9);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(primary_key_from_payload("<record>"), Err(PayloadError::Xml(_))));
        assert!(matches!(
            primary_key_from_payload("<record><title>x</title></record>"),
            Err(PayloadError::MissingIdentity)
        ));
        assert!(matches!(
            primary_key_from_payload("<record><localControlNumber>Book:</localControlNumber></record>"),
            Err(PayloadError::InvalidIdentity { .. })
        ));
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let mut record = FieldRecord::new(IndexIdentity::new("Book", 77));
        record.push("title", "bell\u{7}\u{0} ring\u{FFFE}");
        record.push("notes", "line one\nline\ttwo");

        let payload = record.to_payload();
        assert!(payload.contains("<title>bell ring</title>"));
        assert!(payload.contains("<notes>line one\nline\ttwo</notes>"));
        assert_eq!(primary_key_from_payload(&payload).unwrap(), 77);
    }

    #[test]
    fn test_is_xml_name() {
        for name in ["title", "_private", "dc.title", "first-name", "naïve", "名前", "x1"] {
            assert!(is_xml_name(name), "{name} should be accepted");
        }
        for name in ["", "first name", "1st", "-x", "dc:title", "a<b", "ªb", "x\u{7}"] {
            assert!(!is_xml_name(name), "{name:?} should be rejected");
        }
    }
}
