//! Deterministic, human-friendly slugs.
//!
//! ASCII slugification comes from the `slug` crate; Chinese text is
//! transliterated through `pinyin` first so inputs like “基线对齐” become
//! `ji-xian-dui-qi`. Everything here is pure: the same input always yields
//! the same slug.

use std::collections::HashMap;

use pinyin::{Pinyin, ToPinyin};
use quire_api_types::CmsId;
use slug::slugify;
use thiserror::Error;

const ANONYMOUS_AUTHOR_SLUG: &str = "anonymous";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a slug: lower-case, runs of non-alphanumerics collapsed into a
/// single `-`, no leading or trailing `-`.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Slug for an author record. A usable explicit slug wins; otherwise it is
/// derived from the name, then from the id, and finally a fixed fallback.
/// The result is never empty.
pub fn author_slug(explicit: Option<&str>, name: Option<&str>, id: Option<CmsId>) -> String {
    if let Some(slug) = explicit.map(str::trim).filter(|slug| !slug.is_empty()) {
        return slug.to_string();
    }

    if let Some(slug) = name.and_then(|name| derive_slug(name).ok()) {
        return slug;
    }

    match id {
        Some(id) => format!("author-{id}"),
        None => ANONYMOUS_AUTHOR_SLUG.to_string(),
    }
}

/// Unique anchor slugs within a single document.
///
/// Headings processed in order receive monotonic suffixes when duplicates
/// occur (`section`, `section-2`, `section-3`).
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    occurrences: HashMap<String, usize>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self {
            occurrences: HashMap::new(),
        }
    }

    /// Anchor for the provided heading text, unique within this slugger.
    pub fn anchor_for(&mut self, heading: &str) -> Result<String, SlugError> {
        let base = derive_slug(heading)?;
        let count = self.occurrences.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            Ok(base)
        } else {
            Ok(format!("{base}-{}", *count))
        }
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}
