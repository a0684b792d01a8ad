//! Syntax trees: the handoff format between planning and realisation.
//!
//! A [`SyntaxNode`] is a clause, phrase or template placeholder. Leaves
//! are [`Word`]s carrying a lemma, a [`Category`] and grammatical
//! [`Features`]. Nothing here is inflected. Turning a tree into text is
//! the job of an external [`Realiser`](crate::Realiser), so the `Display`
//! impls below only join lemmas for logs and tests.
//!
//! Trees serialize to JSON with serde. Noun phrases that point at a
//! discourse entity serialize the entity's name; deserializing such a
//! phrase is not supported, since entity identity only exists inside one
//! planning run.

use crate::plan::Relation;
use dialog_logic::{EntityRef, Gender, Number, Quantifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Part of speech of a [`Word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Noun,
    ProperNoun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Determiner,
    Preposition,
    Conjunction,
    /// Text with no lexical analysis, used when a lookup failed.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Present,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Definiteness {
    Definite,
    Indefinite,
}

/// Pronoun case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    Subjective,
    Objective,
    Reflexive,
}

/// Irregular word forms a realiser may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inflection {
    Plural,
    /// Third person singular present (`has`).
    PresentThird,
    Past,
    PastParticiple,
    PresentParticiple,
}

/// Grammatical features. Unset features are left to the realiser's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tense: Option<Tense>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definiteness: Option<Definiteness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
}

/// A lexical leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub lemma: String,
    pub category: Category,
    #[serde(default)]
    pub features: Features,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub forms: BTreeMap<Inflection, String>,
}

impl Word {
    pub fn new(lemma: impl Into<String>, category: Category) -> Self {
        Word {
            lemma: lemma.into(),
            category,
            features: Features::default(),
            forms: BTreeMap::new(),
        }
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// The irregular form for `inflection`, if one is recorded.
    pub fn form(&self, inflection: Inflection) -> Option<&str> {
        self.forms.get(&inflection).map(String::as_str)
    }
}

/// What a noun phrase refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Referent {
    #[serde(skip_deserializing)]
    Entity(EntityRef),
    /// A quantified variable (`everything`, `something`).
    Quantified(Quantifier),
    /// Fixed template text with no referent.
    #[default]
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounPhrase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifier: Option<Word>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub premodifiers: Vec<SyntaxNode>,
    pub head: Word,
    #[serde(default)]
    pub referent: Referent,
    #[serde(default)]
    pub features: Features,
}

impl NounPhrase {
    pub fn new(head: Word) -> Self {
        NounPhrase {
            specifier: None,
            premodifiers: Vec::new(),
            head,
            referent: Referent::Literal,
            features: Features::default(),
        }
    }

    pub fn with_specifier(mut self, specifier: Word) -> Self {
        self.specifier = Some(specifier);
        self
    }

    pub fn with_referent(mut self, referent: Referent) -> Self {
        self.referent = referent;
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// The entity this phrase refers to, if any.
    pub fn entity(&self) -> Option<&EntityRef> {
        match &self.referent {
            Referent::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbPhrase {
    pub head: Word,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub complements: Vec<SyntaxNode>,
    #[serde(default)]
    pub features: Features,
}

impl VerbPhrase {
    pub fn new(head: Word) -> Self {
        VerbPhrase {
            head,
            complements: Vec::new(),
            features: Features::default(),
        }
    }

    pub fn with_complement(mut self, complement: SyntaxNode) -> Self {
        self.complements.push(complement);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjectivePhrase {
    pub head: Word,
    #[serde(default)]
    pub features: Features,
}

/// Two or more phrases joined by a conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatedPhrase {
    pub conjunction: String,
    pub coordinates: Vec<SyntaxNode>,
    #[serde(default)]
    pub features: Features,
}

/// A numbered slot in a template, filled with the message argument at
/// `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceHolder {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Box<SyntaxNode>>,
    pub predicate: Box<SyntaxNode>,
    #[serde(default)]
    pub features: Features,
}

impl Clause {
    pub fn new(subject: SyntaxNode, predicate: SyntaxNode) -> Self {
        Clause {
            subject: Some(Box::new(subject)),
            predicate: Box::new(predicate),
            features: Features::default(),
        }
    }

    /// A clause with no subject.
    pub fn predicate_only(predicate: SyntaxNode) -> Self {
        Clause {
            subject: None,
            predicate: Box::new(predicate),
            features: Features::default(),
        }
    }
}

/// A node of a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyntaxNode {
    Clause(Clause),
    NounPhrase(NounPhrase),
    VerbPhrase(VerbPhrase),
    AdjectivePhrase(AdjectivePhrase),
    Coordinated(CoordinatedPhrase),
    PlaceHolder(PlaceHolder),
}

impl SyntaxNode {
    pub fn placeholder(index: usize) -> Self {
        SyntaxNode::PlaceHolder(PlaceHolder { index })
    }

    /// A noun phrase of fixed text.
    pub fn literal(text: impl Into<String>) -> Self {
        SyntaxNode::NounPhrase(NounPhrase::new(Word::new(text, Category::Literal)))
    }

    pub fn adjective(lemma: impl Into<String>) -> Self {
        SyntaxNode::AdjectivePhrase(AdjectivePhrase {
            head: Word::new(lemma, Category::Adjective),
            features: Features::default(),
        })
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&SyntaxNode> {
        match self {
            SyntaxNode::Clause(clause) => clause
                .subject
                .iter()
                .map(Box::as_ref)
                .chain(std::iter::once(clause.predicate.as_ref()))
                .collect(),
            SyntaxNode::NounPhrase(np) => np.premodifiers.iter().collect(),
            SyntaxNode::VerbPhrase(vp) => vp.complements.iter().collect(),
            SyntaxNode::Coordinated(coordinated) => coordinated.coordinates.iter().collect(),
            SyntaxNode::AdjectivePhrase(_) | SyntaxNode::PlaceHolder(_) => Vec::new(),
        }
    }

    pub fn features(&self) -> Option<&Features> {
        match self {
            SyntaxNode::Clause(clause) => Some(&clause.features),
            SyntaxNode::NounPhrase(np) => Some(&np.features),
            SyntaxNode::VerbPhrase(vp) => Some(&vp.features),
            SyntaxNode::AdjectivePhrase(ap) => Some(&ap.features),
            SyntaxNode::Coordinated(coordinated) => Some(&coordinated.features),
            SyntaxNode::PlaceHolder(_) => None,
        }
    }

    /// Returns `true` if `predicate` holds for this node or any node below it.
    pub fn any(&self, predicate: &impl Fn(&SyntaxNode) -> bool) -> bool {
        predicate(self) || self.children().into_iter().any(|child| child.any(predicate))
    }

    /// Placeholder indices in depth-first order.
    pub fn placeholders(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.collect_placeholders(&mut indices);
        indices
    }

    fn collect_placeholders(&self, indices: &mut Vec<usize>) {
        if let SyntaxNode::PlaceHolder(placeholder) = self {
            indices.push(placeholder.index);
        }
        for child in self.children() {
            child.collect_placeholders(indices);
        }
    }
}

impl From<Clause> for SyntaxNode {
    fn from(clause: Clause) -> Self {
        SyntaxNode::Clause(clause)
    }
}

impl From<NounPhrase> for SyntaxNode {
    fn from(np: NounPhrase) -> Self {
        SyntaxNode::NounPhrase(np)
    }
}

impl From<VerbPhrase> for SyntaxNode {
    fn from(vp: VerbPhrase) -> Self {
        SyntaxNode::VerbPhrase(vp)
    }
}

impl From<CoordinatedPhrase> for SyntaxNode {
    fn from(coordinated: CoordinatedPhrase) -> Self {
        SyntaxNode::Coordinated(coordinated)
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNode::Clause(clause) => {
                if let Some(subject) = &clause.subject {
                    write!(f, "{subject} ")?;
                }
                if clause.features.negated {
                    write!(f, "not ")?;
                }
                write!(f, "{}", clause.predicate)
            }
            SyntaxNode::NounPhrase(np) => {
                if let Some(specifier) = &np.specifier {
                    write!(f, "{} ", specifier.lemma)?;
                }
                for premodifier in &np.premodifiers {
                    write!(f, "{premodifier} ")?;
                }
                write!(f, "{}", np.head.lemma)
            }
            SyntaxNode::VerbPhrase(vp) => {
                write!(f, "{}", vp.head.lemma)?;
                for complement in &vp.complements {
                    write!(f, " {complement}")?;
                }
                Ok(())
            }
            SyntaxNode::AdjectivePhrase(ap) => write!(f, "{}", ap.head.lemma),
            SyntaxNode::Coordinated(coordinated) => {
                let last = coordinated.coordinates.len().saturating_sub(1);
                for (i, coordinate) in coordinated.coordinates.iter().enumerate() {
                    if i > 0 && i == last {
                        write!(f, " {} ", coordinated.conjunction)?;
                    } else if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{coordinate}")?;
                }
                Ok(())
            }
            SyntaxNode::PlaceHolder(placeholder) => write!(f, "{{{}}}", placeholder.index),
        }
    }
}

/// A run of clauses realised together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub relation: Relation,
    pub clauses: Vec<SyntaxNode>,
}

/// The planned document: one paragraph per top-level plan node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn clauses(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.paragraphs.iter().flat_map(|p| p.clauses.iter())
    }

    /// Every noun phrase in traversal order.
    pub fn noun_phrases(&self) -> Vec<&NounPhrase> {
        fn walk<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a NounPhrase>) {
            if let SyntaxNode::NounPhrase(np) = node {
                out.push(np);
            }
            for child in node.children() {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for clause in self.clauses() {
            walk(clause, &mut out);
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialog_logic::Entity;
    use pretty_assertions::assert_eq;

    fn play_template() -> SyntaxNode {
        Clause::new(
            SyntaxNode::placeholder(0),
            VerbPhrase::new(Word::new("play", Category::Verb))
                .with_complement(SyntaxNode::placeholder(1))
                .into(),
        )
        .into()
    }

    #[test]
    fn test_children_order() {
        let template = play_template();
        let children = template.children();
        assert_eq!(children.len(), 2);
        assert_eq!(*children[0], SyntaxNode::placeholder(0));
        assert!(matches!(children[1], SyntaxNode::VerbPhrase(_)));
        assert_eq!(template.placeholders(), vec![0, 1]);
    }

    #[test]
    fn test_display_joins_lemmas() {
        let coordinated = CoordinatedPhrase {
            conjunction: "and".into(),
            coordinates: vec![
                SyntaxNode::literal("John"),
                SyntaxNode::literal("Paul"),
                SyntaxNode::literal("George"),
            ],
            features: Features::default(),
        };
        let guitar = NounPhrase::new(Word::new("guitar", Category::Noun))
            .with_specifier(Word::new("the", Category::Determiner));
        let clause = SyntaxNode::from(Clause::new(
            coordinated.into(),
            VerbPhrase::new(Word::new("play", Category::Verb))
                .with_complement(guitar.into())
                .into(),
        ));
        assert_eq!(clause.to_string(), "John, Paul and George play the guitar");
    }

    #[test]
    fn test_template_json_roundtrip() {
        let template = play_template();
        let json = serde_json::to_string(&template).unwrap();
        let back: SyntaxNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn test_reads_template_json() {
        let json = r#"{
            "type": "clause",
            "subject": { "type": "place_holder", "index": 0 },
            "predicate": {
                "type": "verb_phrase",
                "head": { "lemma": "be", "category": "verb", "forms": { "present_third": "is" } },
                "complements": [{ "type": "adjective_phrase", "head": { "lemma": "happy", "category": "adjective" } }]
            }
        }"#;
        let node: SyntaxNode = serde_json::from_str(json).unwrap();
        let SyntaxNode::Clause(clause) = &node else {
            panic!("expected a clause");
        };
        let SyntaxNode::VerbPhrase(vp) = clause.predicate.as_ref() else {
            panic!("expected a verb phrase");
        };
        assert_eq!(vp.head.form(Inflection::PresentThird), Some("is"));
        assert_eq!(node.placeholders(), vec![0]);
    }

    #[test]
    fn test_entity_referent_serializes_as_name() {
        let john = EntityRef::new(Entity::new("john").proper());
        let np = NounPhrase::new(Word::new("John", Category::ProperNoun))
            .with_referent(Referent::Entity(john));
        let value = serde_json::to_value(SyntaxNode::from(np)).unwrap();
        assert_eq!(value["referent"]["entity"], "john");
    }
}
