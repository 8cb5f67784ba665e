//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::fmt;

pub const NO_KEY: &str = "noKey";
pub const NO_VALUE: &str = "noValue";

/// Ordered attribute bag attached to drawn geometries.
/// Written as user properties into the PDF structure tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdditionalInfo {
    entries: Vec<(String, String)>,
}

impl AdditionalInfo {
    pub fn new() -> AdditionalInfo {
        AdditionalInfo {
            entries: Vec::new(),
        }
    }

    /// Append an entry. Empty keys and values are replaced by placeholders.
    pub fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        self.entries.push((
            if key.is_empty() { NO_KEY.to_string() } else { key },
            if value.is_empty() { NO_VALUE.to_string() } else { value },
        ));
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.add(key, value);
        self
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for AdditionalInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

#[test]
fn test_placeholders() {
    let info = AdditionalInfo::new()
        .with("Height", "101.5")
        .with("", "x")
        .with("Point Number", "");
    assert_eq!(info.len(), 3);
    assert_eq!(info.get("Height"), Some("101.5"));
    assert_eq!(info.get(NO_KEY), Some("x"));
    assert_eq!(info.get("Point Number"), Some(NO_VALUE));
    assert_eq!(format!("{}", info), "Height=101.5, noKey=x, Point Number=noValue");
}
