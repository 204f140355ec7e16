//! DOMTokenList (classList)
//!
//! Space-separated token sets. Elements store `class` as a plain attribute;
//! this type is the parsed working copy used to edit it.

/// DOMTokenList for managing space-separated tokens (e.g., classList)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_ascii_whitespace() {
            list.add(token);
        }
        list
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token, returns true if it was not present
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token, returns true if it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        before != self.tokens.len()
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let present = match force {
            Some(state) => state,
            None => !self.contains(token),
        };
        if present {
            self.add(token);
        } else {
            self.remove(token);
        }
        present
    }

    /// Get value as string
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let list = DOMTokenList::from_string("trix-button  trix-button--icon trix-button");
        assert_eq!(list.length(), 2);
        assert!(list.contains("trix-button--icon"));
        assert_eq!(list.value(), "trix-button trix-button--icon");
    }

    #[test]
    fn test_add_remove() {
        let mut list = DOMTokenList::new();
        assert!(list.add("trix-active"));
        assert!(!list.add("trix-active"));
        assert!(list.remove("trix-active"));
        assert!(!list.remove("trix-active"));
    }

    #[test]
    fn test_toggle() {
        let mut list = DOMTokenList::new();

        assert!(list.toggle("trix-active", None));
        assert!(list.contains("trix-active"));

        assert!(!list.toggle("trix-active", None));
        assert!(!list.contains("trix-active"));

        assert!(list.toggle("trix-active", Some(true)));
        assert!(list.toggle("trix-active", Some(true)));
        assert_eq!(list.length(), 1);
    }
}
