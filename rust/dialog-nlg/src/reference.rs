//! Referring expression generation.
//!
//! Walks the document depth-first, left to right, and decides for every
//! entity mention whether it is realised in full, as a definite
//! description, or as a pronoun. The [`DiscourseState`] records each
//! entity's latest mention as the walk proceeds.
//!
//! ## Rules
//!
//! - **First mention** is full. A proper noun is its name. A common noun
//!   takes `the` when it is the only entity of its class in the document,
//!   and `a`/`an` otherwise (no determiner for plurals).
//! - **Pronoun** when the entity was mentioned within the last
//!   `pronoun_window + 1` mentions, no other entity of the same gender and
//!   number has been mentioned in the document so far, and the pronoun
//!   table has a form.
//! - **Definite description** otherwise: the name for proper nouns, `the`
//!   plus the class noun for common nouns. If another entity of the same
//!   class has already been mentioned, a [`ReferenceAmbiguity`] warning is
//!   recorded.
//!
//! Pronoun case follows position: subjects are subjective, a mention whose
//! antecedent is in the same clause is reflexive, anything else objective.

use crate::config::ReferenceConfig;
use crate::error::{ReferenceAmbiguity, Warning};
use crate::lexicon::Lexicon;
use crate::syntax::{
    Case, Category, Definiteness, Document, Features, NounPhrase, SyntaxNode, Word,
};
use dialog_logic::{EntityRef, Number};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// How a mention was realised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceForm {
    Full,
    Definite,
    Pronoun,
}

/// The most recent mention of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MentionRecord {
    pub form: ReferenceForm,
    /// Discourse position of the mention. Positions count every entity
    /// mention in the document.
    pub position: usize,
    /// Index of the top-level clause holding the mention.
    pub clause: usize,
    /// Mentions of this entity so far.
    pub count: usize,
}

/// What the reader has been told so far.
///
/// Built for one document with [`DiscourseState::for_document`] and
/// threaded through [`ReferringExpressionGenerator::generate_references`].
#[derive(Debug, Clone, Default)]
pub struct DiscourseState {
    mentions: HashMap<EntityRef, MentionRecord>,
    /// Entity at each discourse position.
    history: Vec<EntityRef>,
    clause: usize,
    /// Distinct entities per class in the document.
    census: HashMap<String, usize>,
}

impl DiscourseState {
    /// A fresh state knowing which entities the document mentions.
    pub fn for_document(document: &Document) -> Self {
        let mut seen = HashSet::new();
        let mut census: HashMap<String, usize> = HashMap::new();
        for np in document.noun_phrases() {
            if let Some(entity) = np.entity() {
                if seen.insert(entity.clone()) {
                    *census.entry(entity.class.clone()).or_default() += 1;
                }
            }
        }
        DiscourseState {
            census,
            ..DiscourseState::default()
        }
    }

    pub fn last_mention(&self, entity: &EntityRef) -> Option<&MentionRecord> {
        self.mentions.get(entity)
    }

    /// The next discourse position.
    pub fn position(&self) -> usize {
        self.history.len()
    }

    /// Entities mentioned after `position`, oldest first.
    pub fn mentioned_since(&self, position: usize) -> &[EntityRef] {
        self.history.get(position + 1..).unwrap_or(&[])
    }

    /// Entities mentioned so far, in order of first mention.
    pub fn entities(&self) -> Vec<&EntityRef> {
        let mut seen = HashSet::new();
        self.history.iter().filter(|e| seen.insert(*e)).collect()
    }

    fn class_size(&self, class: &str) -> usize {
        self.census.get(class).copied().unwrap_or(0)
    }

    fn record(&mut self, entity: &EntityRef, form: ReferenceForm) {
        let record = MentionRecord {
            form,
            position: self.history.len(),
            clause: self.clause,
            count: self.mentions.get(entity).map_or(0, |r| r.count) + 1,
        };
        self.mentions.insert(entity.clone(), record);
        self.history.push(entity.clone());
    }
}

/// Where a noun phrase sits in its clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Subject,
    Other,
}

/// Chooses the form of every entity mention in a document.
pub struct ReferringExpressionGenerator<'a> {
    config: ReferenceConfig,
    lexicon: &'a Lexicon,
}

impl<'a> ReferringExpressionGenerator<'a> {
    pub fn new(config: ReferenceConfig, lexicon: &'a Lexicon) -> Self {
        ReferringExpressionGenerator { config, lexicon }
    }

    /// Fill in the referring expression of every entity mention in place.
    pub fn generate_references(
        &self,
        document: &mut Document,
        state: DiscourseState,
    ) -> (DiscourseState, Vec<Warning>) {
        let mut walk = Walk {
            generator: self,
            state,
            warnings: Vec::new(),
        };
        for paragraph in &mut document.paragraphs {
            for clause in &mut paragraph.clauses {
                walk.visit(clause, Slot::Subject);
                walk.state.clause += 1;
            }
        }
        tracing::debug!(
            mentions = walk.state.history.len(),
            warnings = walk.warnings.len(),
            "generated references"
        );
        (walk.state, walk.warnings)
    }

    fn choose(&self, state: &DiscourseState, entity: &EntityRef, slot: Slot) -> Choice {
        let Some(previous) = state.last_mention(entity) else {
            return Choice::Full;
        };
        let since = state.mentioned_since(previous.position);
        // Once a rival is in the discourse, "he" could mean either of them
        let competing = state
            .mentions
            .keys()
            .any(|other| other != entity && other.agrees_with(entity));
        let case = match slot {
            Slot::Subject => Case::Subjective,
            Slot::Other if previous.clause == state.clause => Case::Reflexive,
            Slot::Other => Case::Objective,
        };
        let pronoun = self
            .lexicon
            .pronouns()
            .lookup(entity.gender, entity.number, case);
        match pronoun {
            Some(word) if since.len() <= self.config.pronoun_window && !competing => {
                Choice::Pronoun(word.to_string(), case)
            }
            _ => Choice::Definite,
        }
    }
}

enum Choice {
    Full,
    Definite,
    Pronoun(String, Case),
}

struct Walk<'g, 'a> {
    generator: &'g ReferringExpressionGenerator<'a>,
    state: DiscourseState,
    warnings: Vec<Warning>,
}

impl Walk<'_, '_> {
    fn visit(&mut self, node: &mut SyntaxNode, slot: Slot) {
        match node {
            SyntaxNode::Clause(clause) => {
                if let Some(subject) = clause.subject.as_deref_mut() {
                    self.visit(subject, Slot::Subject);
                }
                self.visit(&mut clause.predicate, Slot::Other);
            }
            SyntaxNode::NounPhrase(np) => {
                for premodifier in &mut np.premodifiers {
                    self.visit(premodifier, Slot::Other);
                }
                if let Some(entity) = np.entity().cloned() {
                    self.refer(np, &entity, slot);
                }
            }
            SyntaxNode::VerbPhrase(vp) => {
                for complement in &mut vp.complements {
                    self.visit(complement, Slot::Other);
                }
            }
            SyntaxNode::Coordinated(coordinated) => {
                for coordinate in &mut coordinated.coordinates {
                    self.visit(coordinate, slot);
                }
            }
            SyntaxNode::AdjectivePhrase(_) | SyntaxNode::PlaceHolder(_) => {}
        }
    }

    fn refer(&mut self, np: &mut NounPhrase, entity: &EntityRef, slot: Slot) {
        let form = match self.generator.choose(&self.state, entity, slot) {
            Choice::Full => {
                self.full(np, entity);
                ReferenceForm::Full
            }
            Choice::Definite => {
                self.definite(np, entity);
                ReferenceForm::Definite
            }
            Choice::Pronoun(word, case) => {
                pronoun(np, entity, word, case);
                ReferenceForm::Pronoun
            }
        };
        tracing::trace!(%entity, ?form, position = self.state.position(), "reference");
        self.state.record(entity, form);
    }

    fn full(&self, np: &mut NounPhrase, entity: &EntityRef) {
        if entity.proper {
            np.specifier = None;
            np.features.definiteness = Some(Definiteness::Definite);
        } else if self.state.class_size(&entity.class) <= 1 {
            np.specifier = Some(determiner("the"));
            np.features.definiteness = Some(Definiteness::Definite);
        } else {
            np.specifier = match entity.number {
                Number::Plural => None,
                Number::Singular => Some(determiner(indefinite_article(&np.head.lemma))),
            };
            np.features.definiteness = Some(Definiteness::Indefinite);
        }
    }

    fn definite(&mut self, np: &mut NounPhrase, entity: &EntityRef) {
        np.features.definiteness = Some(Definiteness::Definite);
        if entity.proper {
            np.specifier = None;
            return;
        }
        np.specifier = Some(determiner("the"));
        if np.head.lemma != entity.class {
            np.head = Word::new(entity.class.clone(), Category::Noun).with_features(Features {
                number: Some(entity.number),
                ..Features::default()
            });
        }
        let ambiguous = self.state.class_size(&entity.class) > 1
            && self
                .state
                .mentions
                .keys()
                .any(|other| other != entity && other.class == entity.class);
        if ambiguous {
            let warning = ReferenceAmbiguity {
                entity: entity.name.clone(),
                description: format!("the {}", entity.class),
            };
            tracing::warn!(%warning, "ambiguous reference");
            self.warnings.push(warning.into());
        }
    }
}

fn pronoun(np: &mut NounPhrase, entity: &EntityRef, word: String, case: Case) {
    np.specifier = None;
    np.premodifiers.clear();
    np.head = Word::new(word, Category::Pronoun).with_features(Features {
        number: Some(entity.number),
        gender: Some(entity.gender),
        case: Some(case),
        ..Features::default()
    });
    np.features.definiteness = Some(Definiteness::Definite);
    np.features.case = Some(case);
}

fn determiner(lemma: &str) -> Word {
    Word::new(lemma, Category::Determiner)
}

fn indefinite_article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicalise::Lexicaliser;
    use crate::lexicon::LexicalEntry;
    use crate::plan::Macroplanner;
    use crate::syntax::{Clause, VerbPhrase};
    use crate::template::Templates;
    use dialog_logic::{Gender, parse};
    use pretty_assertions::assert_eq;

    fn templates() -> Templates {
        let binary = |verb: &str| {
            Clause::new(
                SyntaxNode::placeholder(0),
                VerbPhrase::new(Word::new(verb, Category::Verb))
                    .with_complement(SyntaxNode::placeholder(1))
                    .into(),
            )
        };
        Templates::new()
            .with("Play", binary("play"))
            .unwrap()
            .with("Admire", binary("admire"))
            .unwrap()
            .with("Own", binary("own"))
            .unwrap()
            .with(
                "Sing",
                Clause::new(
                    SyntaxNode::placeholder(0),
                    VerbPhrase::new(Word::new("sing", Category::Verb)).into(),
                ),
            )
            .unwrap()
    }

    fn lexicon() -> Lexicon {
        let person = |name: &str, gender| {
            LexicalEntry::new(name, Category::ProperNoun)
                .with_gender(gender)
                .with_class("musician")
        };
        Lexicon::new()
            .with_entry("john", person("John", Gender::Masculine))
            .unwrap()
            .with_entry("paul", person("Paul", Gender::Masculine))
            .unwrap()
            .with_entry("yoko", person("Yoko", Gender::Feminine))
            .unwrap()
            .with_entry("guitar", LexicalEntry::new("guitar", Category::Noun))
            .unwrap()
            .with_entry(
                "gibson",
                LexicalEntry::new("electric guitar", Category::Noun).with_class("guitar"),
            )
            .unwrap()
            .with_entry(
                "fender",
                LexicalEntry::new("acoustic guitar", Category::Noun).with_class("guitar"),
            )
            .unwrap()
    }

    fn generate(input: &str, config: ReferenceConfig) -> (Document, DiscourseState, Vec<Warning>) {
        let templates = templates();
        let lexicon = lexicon();
        let plan = Macroplanner::new(&lexicon).plan(&parse(input).unwrap()).unwrap();
        let (mut document, _) = Lexicaliser::new(&templates, &lexicon).lexicalise(&plan);
        let state = DiscourseState::for_document(&document);
        let (state, warnings) = ReferringExpressionGenerator::new(config, &lexicon)
            .generate_references(&mut document, state);
        (document, state, warnings)
    }

    fn text(input: &str) -> String {
        generate(input, ReferenceConfig::default()).0.to_string()
    }

    #[test]
    fn test_first_mentions() {
        assert_eq!(text("Play(john, guitar)"), "John play the guitar");
        assert_eq!(
            text("Own(john, gibson); Own(paul, fender)"),
            "John own an electric guitar\nPaul own an acoustic guitar"
        );
    }

    #[test]
    fn test_pronoun_after_recent_mention() {
        assert_eq!(
            text("Play(john, guitar) & Sing(john)"),
            "John play the guitar\nhe sing"
        );
    }

    #[test]
    fn test_no_pronoun_with_competitor() {
        // paul intervenes and agrees with john
        assert_eq!(
            text("Admire(john, paul) & Sing(john)"),
            "John admire Paul\nJohn sing"
        );
        assert_eq!(
            text("Admire(john, yoko) & Sing(john)"),
            "John admire Yoko\nhe sing"
        );
    }

    #[test]
    fn test_no_pronoun_once_a_rival_was_mentioned() {
        // john was mentioned before paul's antecedent, not after it
        assert_eq!(
            text("Admire(john, paul) & Sing(paul)"),
            "John admire Paul\nPaul sing"
        );
        // yoko does not agree with either of them
        assert_eq!(
            text("Admire(yoko, john) & Sing(yoko)"),
            "Yoko admire John\nshe sing"
        );
    }

    #[test]
    fn test_reflexive_in_same_clause() {
        assert_eq!(text("Admire(john, john)"), "John admire himself");
        assert_eq!(text("Admire(yoko, john) & Admire(yoko, john)"), "Yoko admire John\nshe admire him");
    }

    #[test]
    fn test_window_limits_pronouns() {
        let strict = ReferenceConfig { pronoun_window: 0 };
        let (document, _, _) = generate("Admire(john, yoko) & Sing(john)", strict);
        assert_eq!(document.to_string(), "John admire Yoko\nJohn sing");
    }

    #[test]
    fn test_things_are_redescribed() {
        // The English table has no neuter pronoun
        assert_eq!(
            text("Own(john, gibson) & Play(john, gibson)"),
            "John own the electric guitar\nhe play the guitar"
        );
    }

    #[test]
    fn test_ambiguous_description() {
        let (document, _, warnings) = generate(
            "Own(john, gibson) & Own(john, fender) & Sing(paul) & Play(john, gibson)",
            ReferenceConfig::default(),
        );
        assert_eq!(
            document.to_string(),
            "John own an electric guitar\nhe own an acoustic guitar\nhe play the guitar\nPaul sing"
        );
        assert_eq!(
            warnings,
            vec![Warning::ReferenceAmbiguity(ReferenceAmbiguity {
                entity: "gibson".into(),
                description: "the guitar".into()
            })]
        );
    }

    #[test]
    fn test_state_records_mentions() {
        let (_, state, _) = generate("Play(john, guitar) & Sing(john)", ReferenceConfig::default());
        assert_eq!(state.position(), 3);
        let entities = state.entities();
        assert_eq!(entities.len(), 2);
        let john = entities[0];
        assert_eq!(
            state.last_mention(john),
            Some(&MentionRecord {
                form: ReferenceForm::Pronoun,
                position: 2,
                clause: 1,
                count: 2
            })
        );
    }

    #[test]
    fn test_indefinite_article() {
        assert_eq!(indefinite_article("electric guitar"), "an");
        assert_eq!(indefinite_article("guitar"), "a");
    }
}
