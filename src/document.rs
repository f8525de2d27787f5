//! A BSON document: an ordered, optionally-unique-keyed list of named
//! elements.

use std::fmt;

use indexmap::IndexMap;

use crate::bson::Bson;

/// One `(name, value)` pair inside a [`Document`].
#[derive(Clone, PartialEq, Debug)]
pub struct BsonElement {
    /// The element's key.
    pub name: String,
    /// The element's value.
    pub value: Bson,
}

impl BsonElement {
    /// Constructs a new element.
    pub fn new(name: impl Into<String>, value: impl Into<Bson>) -> Self {
        BsonElement {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<(String, Bson)> for BsonElement {
    fn from((name, value): (String, Bson)) -> Self {
        BsonElement { name, value }
    }
}

/// A BSON document: an ordered list of [`BsonElement`]s.
///
/// A document constructed via [`Document::new`] is a plain document: it
/// preserves insertion order and tolerates duplicate names (the element list
/// is the source of truth; [`Document::to_map`] is the total projection where
/// the *last* occurrence of a name wins). A document constructed via
/// [`Document::strict`] is a *strict document*: it additionally guarantees at
/// most one element per name by having every mutating operation replace the
/// prior element in place, so relative order follows first appearance.
///
/// Two documents compare equal iff they have the same name -> value map,
/// regardless of element order or duplicate bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Document {
    elements: Vec<BsonElement>,
    strict: bool,
}

impl Document {
    /// An empty, non-strict document.
    pub fn new() -> Self {
        Document {
            elements: Vec::new(),
            strict: false,
        }
    }

    /// An empty strict document: all subsequent mutations on it preserve name
    /// uniqueness.
    pub fn strict() -> Self {
        Document {
            elements: Vec::new(),
            strict: true,
        }
    }

    /// Whether this document enforces name uniqueness on mutation.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Builds a document from an ordered sequence of elements, preserving
    /// duplicates verbatim (a plain, non-strict document).
    pub fn from_elements(elements: impl IntoIterator<Item = BsonElement>) -> Self {
        Document {
            elements: elements.into_iter().collect(),
            strict: false,
        }
    }

    /// Builds a strict document from an ordered sequence of elements: a name
    /// that repeats later in the sequence overwrites the value at its first
    /// occurrence rather than appending a duplicate.
    pub fn strict_from_elements(elements: impl IntoIterator<Item = BsonElement>) -> Self {
        let mut doc = Document::strict();
        for element in elements {
            doc = doc.append(element.name, element.value);
        }
        doc
    }

    /// The number of elements in the document (including duplicates, for a
    /// non-strict document).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The ordered element list, in insertion order (first-appearance order
    /// for a strict document).
    pub fn elements(&self) -> &[BsonElement] {
        &self.elements
    }

    /// The first element, if any.
    pub fn head_option(&self) -> Option<&BsonElement> {
        self.elements.first()
    }

    /// Whether a given name appears in the document.
    pub fn contains(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    /// Looks up a value by name. When duplicates exist, the *last* matching
    /// element wins, consistent with [`Document::to_map`].
    pub fn get(&self, name: &str) -> Option<&Bson> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    /// Projects this document to a name -> value map. Total: if the same name
    /// appears more than once, the last occurrence wins.
    pub fn to_map(&self) -> IndexMap<String, Bson> {
        let mut map = IndexMap::with_capacity(self.elements.len());
        for element in &self.elements {
            map.insert(element.name.clone(), element.value.clone());
        }
        map
    }

    /// Returns a new document with `name: value` appended. On a strict
    /// document, an existing element with the same name is replaced in place
    /// (keeping its original position); on a plain document the element is
    /// always appended, even if the name already exists.
    #[must_use]
    pub fn append(&self, name: impl Into<String>, value: impl Into<Bson>) -> Self {
        let name = name.into();
        let value = value.into();
        let mut elements = self.elements.clone();

        if self.strict {
            if let Some(existing) = elements.iter_mut().find(|e| e.name == name) {
                existing.value = value;
            } else {
                elements.push(BsonElement::new(name, value));
            }
        } else {
            elements.push(BsonElement::new(name, value));
        }

        Document {
            elements,
            strict: self.strict,
        }
    }

    /// Folds [`Document::append`] over a sequence of elements.
    #[must_use]
    pub fn append_elements(&self, seq: impl IntoIterator<Item = BsonElement>) -> Self {
        let mut doc = self.clone();
        for element in seq {
            doc = doc.append(element.name, element.value);
        }
        doc
    }

    /// Returns a new document with `other`'s elements appended after this
    /// document's, subject to the same strictness rule as [`Document::append`].
    #[must_use]
    pub fn concat(&self, other: &Document) -> Self {
        self.append_elements(other.elements.iter().cloned())
    }

    /// Returns a new document with every element whose name is in `keys`
    /// removed.
    #[must_use]
    pub fn remove_keys(&self, keys: &[&str]) -> Self {
        Document {
            elements: self
                .elements
                .iter()
                .filter(|e| !keys.contains(&e.name.as_str()))
                .cloned()
                .collect(),
            strict: self.strict,
        }
    }

    /// The serialized byte size: the 4-byte total-length prefix, each
    /// element's type tag + cstring name + value bytes, and the trailing
    /// `0x00`.
    pub fn byte_size(&self) -> i32 {
        let elements: i32 = self
            .elements
            .iter()
            .map(|e| 1 + e.name.len() as i32 + 1 + e.value.byte_size())
            .sum();
        5 + elements
    }

    /// Renders this document using MongoDB-shell-like debug notation.
    pub fn pretty(&self) -> String {
        let mut out = String::from("{ ");
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&element.name);
            out.push_str(": ");
            out.push_str(&element.value.pretty());
        }
        out.push_str(" }");
        out
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.to_map() == other.to_map()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl FromIterator<BsonElement> for Document {
    fn from_iter<I: IntoIterator<Item = BsonElement>>(iter: I) -> Self {
        Document::from_elements(iter)
    }
}

impl IntoIterator for Document {
    type Item = BsonElement;
    type IntoIter = std::vec::IntoIter<BsonElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a BsonElement;
    type IntoIter = std::slice::Iter<'a, BsonElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_document_preserves_duplicates() {
        let doc = Document::new().append("a", 1i32).append("a", 2i32);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("a"), Some(&Bson::Int32(2)));
    }

    #[test]
    fn to_map_last_occurrence_wins() {
        let doc = Document::new().append("a", 1i32).append("a", 2i32);
        assert_eq!(doc.to_map().get("a"), Some(&Bson::Int32(2)));
    }

    #[test]
    fn strict_document_replaces_in_place() {
        let doc = Document::strict()
            .append("a", 1i32)
            .append("b", 2i32)
            .append("a", 3i32);
        assert_eq!(doc.len(), 2);
        let names: Vec<_> = doc.elements().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&Bson::Int32(3)));
    }

    #[test]
    fn equality_ignores_order_and_duplicate_bookkeeping() {
        let a = Document::new().append("x", 1i32).append("y", 2i32);
        let b = Document::new().append("y", 2i32).append("x", 1i32);
        assert_eq!(a, b);
    }

    #[test]
    fn remove_keys_drops_matching_elements() {
        let doc = Document::new().append("a", 1i32).append("b", 2i32);
        let removed = doc.remove_keys(&["a"]);
        assert!(!removed.contains("a"));
        assert!(removed.contains("b"));
    }

    #[test]
    fn byte_size_matches_wire_formula() {
        let doc = Document::new().append("a", 1i32);
        // 5 (len + trailing nul) + 1 (tag) + 2 ("a" cstring) + 4 (i32 value)
        assert_eq!(doc.byte_size(), 5 + 1 + 2 + 4);
    }

    #[test]
    fn concat_respects_strictness() {
        let a = Document::strict().append("a", 1i32);
        let b = Document::new().append("a", 2i32).append("b", 3i32);
        let combined = a.concat(&b);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.get("a"), Some(&Bson::Int32(2)));
    }
}
