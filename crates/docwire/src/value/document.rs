//! Ordered documents.

use std::fmt;

use super::BsonValue;

/// An ordered list of named elements.
///
/// Element order is preserved as inserted. Names are usually unique, but a
/// document read with duplicate names allowed may carry repeats; lookups
/// return the first match.
#[derive(Debug, Clone, Default)]
pub struct BsonDocument {
    elements: Vec<(String, BsonValue)>,
}

impl BsonDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&BsonValue> {
        self.elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BsonValue> {
        self.elements
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.elements.iter().any(|(n, _)| n == name)
    }

    /// Replaces the value of an existing element in place, or appends a new
    /// one. Returns the replaced value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<BsonValue>,
    ) -> Option<BsonValue> {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.elements.push((name, value));
                None
            }
        }
    }

    /// Appends an element without checking for an existing name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<BsonValue>) {
        self.elements.push((name.into(), value.into()));
    }

    pub fn remove(&mut self, name: &str) -> Option<BsonValue> {
        let pos = self.elements.iter().position(|(n, _)| n == name)?;
        Some(self.elements.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BsonValue)> {
        self.elements.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|(n, _)| n.as_str())
    }

    pub fn elements(&self) -> &[(String, BsonValue)] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<(String, BsonValue)> {
        self.elements
    }
}

impl<K: Into<String>, V: Into<BsonValue>> FromIterator<(K, V)> for BsonDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            elements: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for BsonDocument {
    type Item = (String, BsonValue);
    type IntoIter = std::vec::IntoIter<(String, BsonValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl fmt::Display for BsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for (i, (name, value)) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name:?} : {value}")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut doc = BsonDocument::new();
        doc.insert("a", 1);
        doc.insert("b", 2);
        assert_eq!(doc.insert("a", 3), Some(BsonValue::Int32(1)));
        assert_eq!(doc.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(doc.get("a"), Some(&BsonValue::Int32(3)));
    }

    #[test]
    fn push_keeps_duplicates_and_get_returns_first() {
        let mut doc = BsonDocument::new();
        doc.push("x", 1);
        doc.push("x", 2);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("x"), Some(&BsonValue::Int32(1)));
        assert_eq!(doc.remove("x"), Some(BsonValue::Int32(1)));
        assert_eq!(doc.get("x"), Some(&BsonValue::Int32(2)));
    }
}
