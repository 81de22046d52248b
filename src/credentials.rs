// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Credential set sent with every request
//!
//! Headers are kept in capture order with case-sensitive names. The set is
//! immutable: dropping authentication headers yields a new value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    headers: Vec<(String, String)>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, replacing an existing header of the same name
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match self.headers.iter_mut().find(|(key, _)| key == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Names from `names` that are not present in this set
    pub fn missing<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// New set without the given header names
    pub fn without(&self, names: &[String]) -> CredentialSet {
        CredentialSet {
            headers: self
                .headers
                .iter()
                .filter(|(key, _)| !names.iter().any(|name| name == key))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<(String, String)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CredentialSet::new(), |set, (name, value)| set.with_header(&name, &value))
    }
}
