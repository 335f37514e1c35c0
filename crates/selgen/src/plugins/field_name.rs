//! Recovers the guarded field from the SQL text of a conditional-inclusion clause.
//!
//! The text is free-form template output, so this is a set of ordered heuristics rather
//! than a grammar. The first matching shape wins:
//!
//! 1. `column = #{...}` with an optional trailing comma yields `column`;
//! 2. a bare `#{property,...}` with an optional trailing comma yields `property`;
//! 3. anything else yields the text with every comma removed (`created_at,`).
//!
//! A placeholder without a comma-delimited first segment (`#{id}`) yields an empty name.

use std::sync::OnceLock;

use regex::Regex;

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*?)\s*=\s*#\{.*\},?$").expect("invalid built-in assignment regex")
    })
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\{.*\},?$").expect("invalid built-in placeholder regex"))
}

fn placeholder_head_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#\{(.*?),.*\},?$").expect("invalid built-in placeholder regex")
    })
}

/// Which rule produced a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `column = #{...}`
    Assignment,
    /// `#{property,...}`
    Placeholder,
    /// Anything else, taken literally.
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedField {
    pub name: String,
    pub shape: FieldShape,
}

impl ExtractedField {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Extracts the field guarded by `text`. Surrounding whitespace is ignored.
pub fn extract_field(text: &str) -> ExtractedField {
    let text = text.trim();

    // A placeholder whose options contain `=` (`#{id,jdbcType=INTEGER}`) must not be
    // read as an assignment; the left-hand side is required to sit outside of `#{`.
    if let Some(caps) = assignment_re().captures(text) {
        let lhs = caps.get(1).map_or("", |m| m.as_str());
        if !lhs.contains("#{") {
            return ExtractedField {
                name: lhs.trim().to_string(),
                shape: FieldShape::Assignment,
            };
        }
    }

    if placeholder_re().is_match(text) {
        let name = placeholder_head_re()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map_or("", |m| m.as_str())
            .trim()
            .to_string();
        return ExtractedField {
            name,
            shape: FieldShape::Placeholder,
        };
    }

    ExtractedField {
        name: text.replace(',', ""),
        shape: FieldShape::Bare,
    }
}
