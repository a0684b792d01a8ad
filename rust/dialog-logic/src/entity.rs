//! Discourse entities.
//!
//! An [`Entity`] is the referent behind a constant such as `john`. Every
//! message that mentions `john` holds the same [`EntityRef`], and two
//! mentions corefer exactly when their references point at the same
//! allocation. Structural equality of the attributes is not enough: two
//! plans built from the same input produce distinct entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Grammatical gender, used to choose pronouns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    #[default]
    Neuter,
    /// Unknown or unspecified gender of a person ("they").
    Epicene,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Masculine => write!(f, "masculine"),
            Gender::Feminine => write!(f, "feminine"),
            Gender::Neuter => write!(f, "neuter"),
            Gender::Epicene => write!(f, "epicene"),
        }
    }
}

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Number {
    #[default]
    Singular,
    Plural,
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Singular => write!(f, "singular"),
            Number::Plural => write!(f, "plural"),
        }
    }
}

/// A discourse referent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// The canonical name: the constant used in formulas (`john`).
    pub name: String,
    pub gender: Gender,
    pub number: Number,
    /// The common noun for the kind of thing this is (`musician`,
    /// `guitar`). Definite descriptions are built from it.
    pub class: String,
    /// Whether the entity is named by a proper noun.
    pub proper: bool,
}

impl Entity {
    /// A neuter, singular, common entity whose class is its own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Entity {
            class: name.clone(),
            name,
            gender: Gender::default(),
            number: Number::default(),
            proper: false,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_number(mut self, number: Number) -> Self {
        self.number = number;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn proper(mut self) -> Self {
        self.proper = true;
        self
    }

    /// Returns `true` if a pronoun for `other` would also fit this entity.
    pub fn agrees_with(&self, other: &Entity) -> bool {
        self.gender == other.gender && self.number == other.number
    }
}

/// A shared handle to an [`Entity`] with identity semantics.
///
/// `PartialEq` and `Hash` compare the allocation, not the attributes.
/// Serializes as the entity's canonical name.
#[derive(Debug, Clone)]
pub struct EntityRef(Arc<Entity>);

impl EntityRef {
    pub fn new(entity: Entity) -> Self {
        EntityRef(Arc::new(entity))
    }
}

impl Deref for EntityRef {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.0
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for EntityRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
