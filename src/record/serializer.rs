// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Record → field-record serialization.

use tracing::{debug, warn};

use crate::metrics;
use crate::registry::SyncConfiguration;

use super::{is_xml_name, FieldRecord, IndexIdentity, IndexedRecord};

/// Builds the [`FieldRecord`] for a domain record according to its type's
/// [`SyncConfiguration`].
///
/// Serialization never fails: a field that cannot be resolved is logged and
/// indexed as an empty string.
pub struct RecordSerializer;

impl RecordSerializer {
    pub fn serialize<R: IndexedRecord + ?Sized>(record: &R, config: &SyncConfiguration) -> FieldRecord {
        let identity = IndexIdentity::of(record);

        if config.raw {
            // Only the first field is used in raw mode.
            return match config.fields.as_deref().and_then(<[String]>::first) {
                Some(field) => {
                    let body = Self::resolve(record, &identity, field);
                    FieldRecord::raw(identity, field.clone(), body)
                }
                None => {
                    warn!(%identity, "Raw mode without a configured field, indexing identity only");
                    FieldRecord::new(identity)
                }
            };
        }

        let mut field_record = FieldRecord::new(identity);
        match &config.fields {
            Some(fields) => {
                for field in fields {
                    let value = Self::resolve(record, field_record.identity(), field);
                    field_record.push(field.clone(), value);
                }
            }
            None => {
                let primary_key_attribute = record.primary_key_attribute();
                for (name, value) in record.attributes() {
                    if name == primary_key_attribute {
                        continue;
                    }
                    if !is_xml_name(&name) {
                        warn!(
                            identity = %field_record.identity(),
                            attribute = %name,
                            "Attribute name is not a valid XML element name, not indexing it"
                        );
                        metrics::record_field_failure(field_record.identity().type_name());
                        continue;
                    }
                    field_record.push(name, value);
                }
            }
        }

        debug!(
            identity = %field_record.identity(),
            fields = field_record.fields().len(),
            "Serialized record for index"
        );
        field_record
    }

    fn resolve<R: IndexedRecord + ?Sized>(record: &R, identity: &IndexIdentity, field: &str) -> String {
        match record.field_value(field) {
            Ok(value) => value,
            Err(e) => {
                warn!(%identity, field, error = %e, "Could not get field value, indexing empty string");
                metrics::record_field_failure(identity.type_name());
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{primary_key_from_payload, FieldAccessor, RecordId, IDENTITY_FIELD};

    struct Book {
        id: RecordId,
        title: Option<String>,
        author: String,
    }

    impl FieldAccessor for Book {
        fn stored_attribute(&self, name: &str) -> Option<String> {
            match name {
                "title" => self.title.clone(),
                "author" => Some(self.author.clone()),
                _ => None,
            }
        }

        fn computed_field(&self, name: &str) -> Option<Result<String, String>> {
            match name {
                "summary" => Some(Ok(format!("{} by {}", self.title.as_deref().unwrap_or("?"), self.author))),
                "isbn" => Some(Err("isbn lookup unavailable".to_string())),
                _ => None,
            }
        }
    }

    impl IndexedRecord for Book {
        fn type_name(&self) -> &str {
            "Book"
        }

        fn primary_key(&self) -> RecordId {
            self.id
        }

        fn attributes(&self) -> Vec<(String, String)> {
            vec![
                ("id".to_string(), self.id.to_string()),
                ("title".to_string(), self.title.clone().unwrap_or_default()),
                ("author".to_string(), self.author.clone()),
            ]
        }

        fn is_private(&self) -> bool {
            false
        }
    }

    fn dune() -> Book {
        Book { id: 7, title: Some("Dune".into()), author: "Frank Herbert".into() }
    }

    fn config(fields: Option<&[&str]>, raw: bool) -> SyncConfiguration {
        SyncConfiguration {
            type_name: "Book".into(),
            fields: fields.map(|f| f.iter().map(|s| s.to_string()).collect()),
            raw,
            public_target: None,
            private_target: None,
        }
    }

    fn names(record: &FieldRecord) -> Vec<&str> {
        record.fields().iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_configured_fields_in_order() {
        let record = RecordSerializer::serialize(&dune(), &config(Some(&["author", "summary", "title"]), false));

        assert_eq!(names(&record), vec![IDENTITY_FIELD, "author", "summary", "title"]);
        assert_eq!(record.get(IDENTITY_FIELD), Some("Book:7"));
        assert_eq!(record.get("summary"), Some("Dune by Frank Herbert"));
        assert!(!record.is_raw());
    }

    #[test]
    fn test_all_attributes_skip_primary_key() {
        let record = RecordSerializer::serialize(&dune(), &config(None, false));

        assert_eq!(names(&record), vec![IDENTITY_FIELD, "title", "author"]);
        assert_eq!(record.get("title"), Some("Dune"));
    }

    #[test]
    fn test_unresolvable_fields_become_empty() {
        let record = RecordSerializer::serialize(&dune(), &config(Some(&["isbn", "ghost", "title"]), false));

        assert_eq!(names(&record), vec![IDENTITY_FIELD, "isbn", "ghost", "title"]);
        assert_eq!(record.get("isbn"), Some(""));
        assert_eq!(record.get("ghost"), Some(""));
        assert_eq!(record.get("title"), Some("Dune"));
    }

    #[test]
    fn test_null_attribute_falls_through() {
        let book = Book { id: 1, title: None, author: "Anon".into() };
        let record = RecordSerializer::serialize(&book, &config(Some(&["title"]), false));
        assert_eq!(record.get("title"), Some(""));
    }

    #[test]
    fn test_raw_mode_uses_first_field_only() {
        let record = RecordSerializer::serialize(&dune(), &config(Some(&["summary", "title"]), true));

        assert!(record.is_raw());
        assert_eq!(names(&record), vec![IDENTITY_FIELD, "summary"]);
        assert_eq!(record.to_payload(), "Dune by Frank Herbert");
    }

    #[test]
    fn test_raw_mode_without_fields() {
        let record = RecordSerializer::serialize(&dune(), &config(None, true));
        assert_eq!(names(&record), vec![IDENTITY_FIELD]);
    }

    #[test]
    fn test_deterministic_output() {
        let config = config(Some(&["title", "author"]), false);
        let first = RecordSerializer::serialize(&dune(), &config);
        let second = RecordSerializer::serialize(&dune(), &config);
        assert_eq!(first, second);
        assert_eq!(first.to_payload(), second.to_payload());
    }

    struct Contact {
        id: RecordId,
    }

    impl FieldAccessor for Contact {
        fn stored_attribute(&self, _name: &str) -> Option<String> {
            None
        }
    }

    impl IndexedRecord for Contact {
        fn type_name(&self) -> &str {
            "Contact"
        }

        fn primary_key(&self) -> RecordId {
            self.id
        }

        fn attributes(&self) -> Vec<(String, String)> {
            vec![
                ("id".to_string(), self.id.to_string()),
                ("first name".to_string(), "Ada".to_string()),
                ("email".to_string(), "ada@example.org".to_string()),
                ("2fa".to_string(), "true".to_string()),
            ]
        }

        fn is_private(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_all_attributes_skip_invalid_element_names() {
        let record = RecordSerializer::serialize(&Contact { id: 5 }, &config(None, false));

        assert_eq!(names(&record), vec![IDENTITY_FIELD, "email"]);
        assert_eq!(primary_key_from_payload(&record.to_payload()).unwrap(), 5);
    }

    #[test]
    fn test_control_characters_keep_payload_parseable() {
        let book = Book { id: 11, title: Some("Dune\u{1}\u{1B}[0m".into()), author: "Frank Herbert".into() };
        let payload = RecordSerializer::serialize(&book, &config(Some(&["title"]), false)).to_payload();

        assert!(payload.contains("<title>Dune[0m</title>"));
        assert_eq!(primary_key_from_payload(&payload).unwrap(), 11);
    }
}
