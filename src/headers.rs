//! Response header mapping.
//!
//! Names compare case-insensitively. A header line without a `:` is kept with
//! no value. When a name repeats, the later value replaces the earlier one but
//! the entry keeps its original position.

/// Case-insensitive header name to optional value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Option<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing the value of an existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value for `name`. `None` if absent or present without a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_entry(name).and_then(|value| value.as_deref())
    }

    /// Value for `name`, or `default` if absent or valueless.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Raw entry: `Some(None)` means the header line had no value.
    pub fn get_entry(&self, name: &str) -> Option<&Option<String>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_entry(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        let pos = self
            .entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, Some(value.into()));
        }
        headers
    }
}
