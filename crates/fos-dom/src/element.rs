//! Element Selectors
//!
//! Compound selectors for querySelector, querySelectorAll and matches.
//! Supported: `*`, `tag`, `.class`, `#id`, `[attr]`, `[attr="value"]`,
//! any compound of those, and comma-separated lists. Combinators are not.

use std::str::FromStr;

use crate::{DomError, DomResult, ElementData};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
}

impl SimpleSelector {
    pub fn matches(&self, el: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => el.tag() == tag,
            Self::Class(class) => el.has_class(class),
            Self::Id(id) => el.id() == Some(id.as_str()),
            Self::Attribute { name, value: None } => el.has_attr(name),
            Self::Attribute { name, value: Some(v) } => el.attr(name) == Some(v.as_str()),
        }
    }
}

/// Sequence of simple selectors that must all match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector(Vec<SimpleSelector>);

impl CompoundSelector {
    pub fn matches(&self, el: &ElementData) -> bool {
        self.0.iter().all(|s| s.matches(el))
    }

    pub fn parts(&self) -> &[SimpleSelector] {
        &self.0
    }

    fn parse(input: &str) -> DomResult<Self> {
        let invalid = || DomError::InvalidSelector(input.to_string());
        let s = input.trim();
        if s.is_empty() {
            return Err(invalid());
        }

        let mut parts = Vec::new();
        let mut rest = s;

        // Leading type selector
        let tag_len = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag == "*" {
                parts.push(SimpleSelector::Universal);
            } else if is_ident(tag) {
                parts.push(SimpleSelector::Tag(tag.to_ascii_lowercase()));
            } else {
                return Err(invalid());
            }
            rest = &rest[tag_len..];
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '.' | '#' => {
                    let body = &rest[1..];
                    let len = body.find(['.', '#', '[']).unwrap_or(body.len());
                    let name = &body[..len];
                    if !is_ident(name) {
                        return Err(invalid());
                    }
                    parts.push(if c == '.' {
                        SimpleSelector::Class(name.to_string())
                    } else {
                        SimpleSelector::Id(name.to_string())
                    });
                    rest = &body[len..];
                }
                '[' => {
                    let end = rest.find(']').ok_or_else(invalid)?;
                    parts.push(parse_attribute(&rest[1..end]).ok_or_else(invalid)?);
                    rest = &rest[end + 1..];
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self(parts))
    }
}

fn parse_attribute(body: &str) -> Option<SimpleSelector> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"').and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };
    is_ident(name).then(|| SimpleSelector::Attribute {
        name: name.to_ascii_lowercase(),
        value,
    })
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<CompoundSelector>);

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> DomResult<Self> {
        input.split(',')
            .map(CompoundSelector::parse)
            .collect::<DomResult<Vec<_>>>()
            .map(Self)
    }

    /// Check if an element matches any selector in the list
    pub fn matches(&self, el: &ElementData) -> bool {
        self.0.iter().any(|c| c.matches(el))
    }

    pub fn selectors(&self) -> &[CompoundSelector] {
        &self.0
    }
}

impl FromStr for SelectorList {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
