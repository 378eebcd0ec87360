// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Attribute maps shared by every record of a Cube network.

use std::collections::BTreeMap;
use std::fmt;

/// A value on the right side of `KEY=value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Bare numeric value, `10` or `0.5`
    Number(f64),
    /// Bare word, `T` or `ABC1`
    Text(String),
    /// Quoted string, rendered back with double quotes
    Quoted(String),
    /// Numeric sequence with ranges, `1-5,7`
    Sequence(String),
}

impl Value {
    /// Builds a value from the text of an attribute, quotes already removed.
    pub fn from_token(text: &str, quoted: bool) -> Self {
        if quoted {
            Value::Quoted(text.to_string())
        } else if is_numeric(text) {
            text.parse()
                .map(Value::Number)
                .unwrap_or_else(|_| Value::Text(text.to_string()))
        } else {
            Value::Text(text.to_string())
        }
    }

    /// Numeric reading of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) | Value::Quoted(s) => s.trim().parse().ok(),
            Value::Sequence(_) => None,
        }
    }

    /// Integer reading of the value, when it is a non-negative whole number.
    pub fn as_u32(&self) -> Option<u32> {
        self.as_f64()
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
    }

    /// Cube booleans are `T`/`F`, `Y`/`N` or `1`/`0`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Number(n) => Some(*n != 0.0),
            Value::Text(s) | Value::Quoted(s) => match s.to_ascii_uppercase().as_str() {
                "T" | "TRUE" | "Y" | "YES" => Some(true),
                "F" | "FALSE" | "N" | "NO" => Some(false),
                _ => None,
            },
            Value::Sequence(_) => None,
        }
    }

    /// Text of the value without quotes.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Value::Number(n) => n.to_string().into(),
            Value::Text(s) | Value::Quoted(s) | Value::Sequence(s) => s.as_str().into(),
        }
    }

    /// Expands a sequence (`1-3,7` gives `[1, 2, 3, 7]`).
    /// A plain number expands to itself, anything else to nothing.
    pub fn expand_sequence(&self) -> Vec<u32> {
        match self {
            Value::Sequence(s) => expand_sequence(s),
            other => other.as_u32().into_iter().collect(),
        }
    }

    /// Values that serialization may leave out altogether.
    pub fn is_zero(&self) -> bool {
        matches!(self, Value::Number(n) if *n == 0.0)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_token(s, false)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) | Value::Sequence(s) => write!(f, "{}", s),
            Value::Quoted(s) if s.contains('"') => write!(f, "'{}'", s),
            Value::Quoted(s) => write!(f, "\"{}\"", s),
        }
    }
}

fn is_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut parts = digits.splitn(2, '.');
    let int_part = parts.next().unwrap_or_default();
    let frac_part = parts.next();
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    all_digits(int_part)
        && frac_part.map_or(true, all_digits)
        && (int_part.len() + frac_part.map_or(0, str::len)) > 0
}

/// Expands the textual form of a numeric sequence.
pub fn expand_sequence(text: &str) -> Vec<u32> {
    let mut numbers = Vec::new();
    for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let mut bounds = item.splitn(2, '-').map(str::trim);
        let first = bounds.next().and_then(|b| b.parse::<u32>().ok());
        let last = bounds.next().and_then(|b| b.parse::<u32>().ok());
        match (first, last) {
            (Some(first), Some(last)) if first <= last => numbers.extend(first..=last),
            (Some(first), Some(last)) => numbers.extend((last..=first).rev()),
            (Some(first), None) => numbers.push(first),
            _ => {}
        }
    }
    numbers
}

/// Case-insensitive attribute map. Keys are stored upper-case and iterate
/// in lexical order, which is the order used on output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form of a key.
    pub fn canonical_key(key: &str) -> String {
        key.trim().to_ascii_uppercase()
    }

    /// Value of `key`, any case accepted.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&Self::canonical_key(key))
    }

    /// Sets `key`, returning the replaced value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(Self::canonical_key(key), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(&Self::canonical_key(key))
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&Self::canonical_key(key))
    }

    /// Iterates the entries in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds every entry of `other`, overwriting entries with the same key.
    pub fn extend(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }

    /// Renders `KEY=value` pairs separated by `", "`, skipping the keys
    /// rejected by `keep`.
    pub(crate) fn render<F>(&self, mut keep: F) -> String
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.iter()
            .filter(|(k, v)| keep(k, v))
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_are_case_insensitive() {
        let mut attributes = Attributes::new();
        attributes.set("mode", 11u32);
        assert_eq!(Some(&Value::Number(11.0)), attributes.get("MODE"));
        assert!(attributes.contains("Mode"));
        assert_eq!(vec!["MODE"], attributes.iter().map(|(k, _)| k).collect::<Vec<_>>());
    }

    #[test]
    fn numbers_and_words() {
        assert_eq!(Value::Number(10.0), Value::from_token("10", false));
        assert_eq!(Value::Number(-0.5), Value::from_token("-0.5", false));
        assert_eq!(Value::Text("T".into()), Value::from_token("T", false));
        assert_eq!(Value::Text("1E5".into()), Value::from_token("1E5", false));
        assert_eq!(Value::Quoted("10".into()), Value::from_token("10", true));
        assert_eq!("\"10\"", Value::Quoted("10".into()).to_string());
        assert_eq!("10", Value::Number(10.0).to_string());
        assert_eq!(Some(true), Value::Text("t".into()).as_bool());
    }

    #[test]
    fn sequences_expand_ranges() {
        assert_eq!(vec![1, 2, 3, 7], expand_sequence("1-3,7"));
        assert_eq!(vec![5, 4], expand_sequence("5-4"));
        assert_eq!(vec![12], Value::Number(12.0).expand_sequence());
    }
}
