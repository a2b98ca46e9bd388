// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Free text → PQF translator.
//!
//! # Generated query
//!
//! ```text
//! @and @attr 1=12 <TypeName> @attr 2=102 @attr 5=3 <token> <token> ...
//!      └── type scope ─────┘ └─ ranked ─┘ └ trunc ┘
//! ```
//!
//! - `1=12` matches the type name against the record's Local-number field
//! - `2=102` asks for relevance ranking
//! - `5=3` truncates left and right, which also makes matching case-insensitive
//!
//! Tokens are bare keywords first, then `"double"` phrases, then `'single'`
//! phrases. Phrases keep their inner spaces and are not re-quoted here.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Restricts hits to one domain type.
pub const TYPE_SCOPE_ATTRIBUTE: &str = "@attr 1=12";
/// Relevance ranking.
pub const RELEVANCE_ATTRIBUTE: &str = "@attr 2=102";
/// Left and right truncation.
pub const TRUNCATION_ATTRIBUTE: &str = "@attr 5=3";

fn double_quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""(.*?)""#).expect("Invalid double-quote regex"))
}

fn single_quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'(.*?)'").expect("Invalid single-quote regex"))
}

pub struct QueryTranslator;

impl QueryTranslator {
    /// Translate user input into a type-scoped, ranked, truncating PQF query.
    ///
    /// A `pqf_override` is returned untouched; the caller owns its correctness.
    ///
    /// ```
    /// use zoom_sync::search::QueryTranslator;
    ///
    /// let pqf = QueryTranslator::translate(r#"dune "frank herbert""#, "Book", None);
    /// assert_eq!(pqf, "@and @attr 1=12 Book @attr 2=102 @attr 5=3 dune frank herbert");
    ///
    /// let raw = QueryTranslator::translate("ignored", "Book", Some("@attr 1=4 dune"));
    /// assert_eq!(raw, "@attr 1=4 dune");
    /// ```
    pub fn translate(raw_input: &str, type_name: &str, pqf_override: Option<&str>) -> String {
        if let Some(pqf) = pqf_override {
            debug!(pqf, "Using caller-supplied PQF");
            return pqf.to_string();
        }

        let mut pqf = Self::scope_prefix(type_name);
        pqf.push_str(&Self::search_terms(raw_input).join(" "));

        debug!(pqf = %pqf, type_name, "Translated query to PQF");
        pqf
    }

    /// `@and @attr 1=12 <TypeName> @attr 2=102 @attr 5=3 `, trailing space included.
    #[must_use]
    pub fn scope_prefix(type_name: &str) -> String {
        format!(
            "@and {TYPE_SCOPE_ATTRIBUTE} {type_name} {RELEVANCE_ATTRIBUTE} {TRUNCATION_ATTRIBUTE} "
        )
    }

    /// Split input into keywords and quoted phrases.
    ///
    /// Both phrase kinds are scanned on the original input. Double-quoted
    /// spans are removed first, then single-quoted spans are removed from
    /// what is left; the remainder is split into keywords.
    ///
    /// ```
    /// use zoom_sync::search::QueryTranslator;
    ///
    /// assert_eq!(
    ///     QueryTranslator::search_terms(r#"foo "bar baz" 'qux'"#),
    ///     vec!["foo", "bar baz", "qux"]
    /// );
    /// ```
    #[must_use]
    pub fn search_terms(query: &str) -> Vec<String> {
        let double_phrases = Self::phrases(double_quoted_regex(), query);
        let single_phrases = Self::phrases(single_quoted_regex(), query);

        let left_over = squeeze(&double_quoted_regex().replace_all(query, ""));
        let left_over = squeeze(&single_quoted_regex().replace_all(&left_over, ""));

        let mut terms: Vec<String> = left_over
            .split(' ')
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect();
        terms.extend(double_phrases);
        terms.extend(single_phrases);
        terms
    }

    fn phrases(re: &Regex, query: &str) -> Vec<String> {
        re.captures_iter(query)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Collapse whitespace runs to one space and trim.
fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
