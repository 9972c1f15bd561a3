//! Ordered, multi-valued header storage.
//!
//! Names are stored exactly as given and compared case-sensitively, except
//! through [`HeaderMap::get_ignore_case`]. Values for one name stay in the
//! order they were added and go on the wire as a single line joined with
//! [`VALUE_SEPARATOR`].

/// Separator used when several values share one header line.
pub const VALUE_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Replace every value stored under `name` with `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set_all(name, [value]);
    }

    /// Replace every value stored under `name` with `values`.
    pub fn set_all<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = values,
            None => self.entries.push((name, values)),
        }
    }

    /// Append `value` after any values already stored under `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.add_all(name, [value]);
    }

    pub fn add_all<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values = values.into_iter().map(Into::into);
        match self.position(&name) {
            Some(idx) => self.entries[idx].1.extend(values),
            None => self.entries.push((name, values.collect())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.entries[idx].1.as_slice())
    }

    pub fn get_ignore_case(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// The header line `name` would produce on the wire.
    pub fn joined(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| values.join(VALUE_SEPARATOR))
    }

    /// One `(name, line)` pair per stored name, in insertion order.
    pub fn lines(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, values)| (name.clone(), values.join(VALUE_SEPARATOR)))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
