//! Flat `application/x-www-form-urlencoded` bodies.
//!
//! The remote service treats a missing key as "use the server default", so
//! the `push_*` helpers drop absent values instead of sending a placeholder.
//! Empty strings and empty lists count as absent.

use url::form_urlencoded;

/// Ordered list of form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field unconditionally.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.fields.push((key.to_string(), value.into()));
    }

    /// Append a boolean as `"1"` / `"0"`.
    pub fn push_flag(&mut self, key: &str, value: Option<bool>) {
        if let Some(flag) = value {
            self.push(key, if flag { "1" } else { "0" });
        }
    }

    pub fn push_number<N: ToString>(&mut self, key: &str, value: Option<N>) {
        if let Some(n) = value {
            self.push(key, n.to_string());
        }
    }

    pub fn push_text(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(text) if !text.is_empty() => self.push(key, text),
            _ => {}
        }
    }

    /// Append a comma-joined list. Items are not escaped, so an item that
    /// itself contains a comma reads as two items on the server.
    pub fn push_list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.push(key, values.join(","));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Url-encode the fields in insertion order.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter())
            .finish()
    }
}
