//! Glossary terms and their substitution into source text.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An approved translation for a fixed source phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    #[serde(default)]
    pub translation: String,
}

/// Ordered term -> translation mapping.
///
/// Terms are unique. Re-inserting a term replaces its translation but keeps its
/// original position, so substitution order is the order terms were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Glossary {
    terms: Vec<GlossaryTerm>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a term. Empty terms are ignored.
    pub fn insert(&mut self, term: impl Into<String>, translation: impl Into<String>) {
        let term = term.into();
        if term.is_empty() {
            return;
        }
        let translation = translation.into();

        match self.terms.iter_mut().find(|t| t.term == term) {
            Some(existing) => existing.translation = translation,
            None => self.terms.push(GlossaryTerm { term, translation }),
        }
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| t.term == term)
            .map(|t| t.translation.as_str())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlossaryTerm> {
        self.terms.iter()
    }
}

impl<T: Into<String>, U: Into<String>> FromIterator<(T, U)> for Glossary {
    fn from_iter<I: IntoIterator<Item = (T, U)>>(iter: I) -> Self {
        let mut glossary = Glossary::new();
        for (term, translation) in iter {
            glossary.insert(term, translation);
        }
        glossary
    }
}

/// Accepts either `{"term": "translation", ...}` or `[{"term": ..., "translation": ...}, ...]`
/// (and `null` as empty), preserving document order.
impl<'de> Deserialize<'de> for Glossary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GlossaryVisitor;

        impl<'de> Visitor<'de> for GlossaryVisitor {
            type Value = Glossary;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of terms to translations or a list of glossary terms")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Glossary, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut glossary = Glossary::new();
                while let Some((term, translation)) = map.next_entry::<String, String>()? {
                    glossary.insert(term, translation);
                }
                Ok(glossary)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Glossary, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut glossary = Glossary::new();
                while let Some(entry) = seq.next_element::<GlossaryTerm>()? {
                    glossary.insert(entry.term, entry.translation);
                }
                Ok(glossary)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Glossary, E> {
                Ok(Glossary::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<Glossary, E> {
                Ok(Glossary::new())
            }
        }

        deserializer.deserialize_any(GlossaryVisitor)
    }
}

/// Substitute every glossary term into `text`, one term after another.
///
/// Plain substring replacement in glossary order. When terms overlap, an earlier
/// substitution can change what a later term matches.
pub fn apply_glossary(text: &str, glossary: &Glossary) -> String {
    glossary
        .iter()
        .fold(text.to_string(), |acc, entry| {
            acc.replace(&entry.term, &entry.translation)
        })
}
