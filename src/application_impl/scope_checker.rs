use crate::domain_model::Scopes;
use crate::domain_port::ScopeValidator;

/// Rejects blank requests, requests containing control whitespace, and any
/// scope that was not granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeChecker;

impl ScopeChecker {
    pub fn new() -> Self {
        Self
    }

    fn is_well_formed(requested: &str) -> bool {
        !requested.trim().is_empty() && !requested.contains(['\r', '\n', '\t'])
    }
}

impl ScopeValidator for ScopeChecker {
    fn is_subset(&self, requested: &str, granted: &Scopes) -> bool {
        Self::is_well_formed(requested) && Scopes::from_string(requested).is_subset_of(granted)
    }
}
