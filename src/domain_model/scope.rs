use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered set of scope names. Insertion order is kept, duplicates dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Scopes(Vec<String>);

impl Scopes {
    pub fn new() -> Self {
        Scopes(Vec::new())
    }

    /// Parse a space-delimited scope string.
    pub fn from_string(raw: &str) -> Self {
        raw.split_whitespace().collect()
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s == scope)
    }

    pub fn is_subset_of(&self, other: &Scopes) -> bool {
        self.0.iter().all(|s| other.contains(s))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Scopes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut scopes = Scopes::new();
        for scope in iter {
            let scope = scope.into();
            if !scopes.contains(&scope) {
                scopes.0.push(scope);
            }
        }
        scopes
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl From<Scopes> for String {
    fn from(scopes: Scopes) -> Self {
        scopes.to_string()
    }
}

impl From<String> for Scopes {
    fn from(raw: String) -> Self {
        Scopes::from_string(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_order_without_duplicates() {
        let scopes = Scopes::from_string("read  write read\tprofile");
        assert_eq!(scopes.iter().collect::<Vec<_>>(), vec!["read", "write", "profile"]);
        assert_eq!(scopes.to_string(), "read write profile");
    }

    #[test]
    fn blank_string_is_empty() {
        assert!(Scopes::from_string("   ").is_empty());
    }

    #[test]
    fn subset_ignores_order() {
        let granted = Scopes::from_string("read write profile");
        assert!(Scopes::from_string("profile read").is_subset_of(&granted));
        assert!(!Scopes::from_string("read admin").is_subset_of(&granted));
        assert!(Scopes::new().is_subset_of(&granted));
    }
}
