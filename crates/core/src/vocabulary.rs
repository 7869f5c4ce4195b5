//! Coarse product-type hints (phone, laptop, ...) inferred from utterances.
//!
//! Each type carries two term lists: `detect` is matched against what the
//! shopper typed, `name_markers` against catalog product names. The lists are
//! allowed to differ; the defaults keep the historical pairs, where the laptop
//! markers include model families ("vostro", "vivobook") that are not
//! detection terms.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeVocabulary {
    pub kind: String,
    pub plural: String,
    pub detect: Vec<String>,
    pub name_markers: Vec<String>,
}

impl TypeVocabulary {
    pub fn new(kind: &str, plural: &str, detect: &[&str], name_markers: &[&str]) -> Self {
        Self {
            kind: kind.to_owned(),
            plural: plural.to_owned(),
            detect: detect.iter().map(|term| (*term).to_owned()).collect(),
            name_markers: name_markers.iter().map(|term| (*term).to_owned()).collect(),
        }
    }

    pub fn detected_in(&self, utterance: &str) -> bool {
        self.detect.iter().any(|term| utterance.contains(term.as_str()))
    }

    pub fn marks_name(&self, lowercase_name: &str) -> bool {
        self.name_markers.iter().any(|term| lowercase_name.contains(term.as_str()))
    }
}

pub fn default_vocabulary() -> Vec<TypeVocabulary> {
    vec![
        TypeVocabulary::new(
            "phone",
            "phones",
            &["phone", "smartphone", "iphone", "redmi", "galaxy"],
            &["phone", "iphone", "redmi", "galaxy"],
        ),
        TypeVocabulary::new(
            "laptop",
            "laptops",
            &["laptop", "notebook"],
            &["laptop", "notebook", "vostro", "vivobook"],
        ),
    ]
}

/// The type hints active for one utterance, in vocabulary order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeHints<'a> {
    active: Vec<&'a TypeVocabulary>,
}

impl<'a> TypeHints<'a> {
    pub fn detect(vocabulary: &'a [TypeVocabulary], utterance: &str) -> Self {
        Self { active: vocabulary.iter().filter(|entry| entry.detected_in(utterance)).collect() }
    }

    /// An entry survives only if its name carries a marker for every active hint.
    pub fn admits(&self, product_name: &str) -> bool {
        if self.active.is_empty() {
            return true;
        }
        let lowercase_name = product_name.to_lowercase();
        self.active.iter().all(|entry| entry.marks_name(&lowercase_name))
    }

    pub fn primary(&self) -> Option<&'a TypeVocabulary> {
        self.active.first().copied()
    }
}
