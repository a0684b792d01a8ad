//! Lexicalisation: messages to clause trees.
//!
//! Each message is rendered by filling its predicate's template with one
//! noun phrase per argument. Entity arguments become noun phrases headed
//! by the entity's lexicon word. Determiners are left for referring
//! expression generation. Quantified arguments become `everything` or
//! `something`.
//!
//! A missing template, arity mismatch or missing entry never stops the
//! run. The lexicaliser emits a literal placeholder in its place and
//! records a [`LexicalGap`].

use crate::error::{LexicalGap, Warning};
use crate::lexicon::Lexicon;
use crate::plan::{Argument, DocumentPlan, Message, PlanNode, Polarity};
use crate::syntax::{
    Category, Clause, Document, Features, NounPhrase, Paragraph, Person, Referent, SyntaxNode,
    Tense, VerbPhrase, Word,
};
use crate::template::Templates;
use dialog_logic::{EntityRef, Number, Quantifier};
use std::collections::HashSet;

/// Turns planned messages into clauses through the templates and lexicon.
pub struct Lexicaliser<'a> {
    templates: &'a Templates,
    lexicon: &'a Lexicon,
}

/// Warnings for one run, with repeats of the same missing entry dropped.
#[derive(Default)]
struct Gaps {
    warnings: Vec<Warning>,
    missing: HashSet<String>,
}

impl Gaps {
    fn report(&mut self, gap: LexicalGap) {
        if let LexicalGap::MissingEntry { key } = &gap {
            if !self.missing.insert(key.clone()) {
                return;
            }
        }
        tracing::warn!(%gap, "lexical gap");
        self.warnings.push(gap.into());
    }
}

impl<'a> Lexicaliser<'a> {
    pub fn new(templates: &'a Templates, lexicon: &'a Lexicon) -> Self {
        Lexicaliser { templates, lexicon }
    }

    /// Render every message of the plan, one paragraph per plan node.
    pub fn lexicalise(&self, plan: &DocumentPlan) -> (Document, Vec<Warning>) {
        let mut gaps = Gaps::default();
        let paragraphs = plan
            .nodes
            .iter()
            .map(|node| self.paragraph(node, &mut gaps))
            .collect();
        tracing::debug!(warnings = gaps.warnings.len(), "lexicalised plan");
        (Document { paragraphs }, gaps.warnings)
    }

    fn paragraph(&self, node: &PlanNode, gaps: &mut Gaps) -> Paragraph {
        Paragraph {
            relation: node.relation(),
            clauses: node
                .messages()
                .iter()
                .map(|message| self.clause(message, gaps))
                .collect(),
        }
    }

    fn clause(&self, message: &Message, gaps: &mut Gaps) -> SyntaxNode {
        let arguments: Vec<SyntaxNode> = message
            .arguments
            .iter()
            .map(|argument| self.noun_phrase(argument, gaps))
            .collect();

        let mut clause = match self.templates.get(&message.predicate) {
            None => {
                gaps.report(LexicalGap::MissingTemplate {
                    predicate: message.predicate.clone(),
                });
                fallback_clause(message, arguments)
            }
            Some(template) if template.arity() != arguments.len() => {
                gaps.report(LexicalGap::ArityMismatch {
                    predicate: message.predicate.clone(),
                    expected: template.arity(),
                    found: arguments.len(),
                });
                fallback_clause(message, arguments)
            }
            Some(template) => {
                let mut clause = template.clause().clone();
                if let Some(subject) = clause.subject.as_deref_mut() {
                    self.fill(subject, &arguments);
                }
                self.fill(&mut clause.predicate, &arguments);
                clause
            }
        };

        clause.features.tense.get_or_insert(Tense::Present);
        clause.features.person.get_or_insert(Person::Third);
        clause.features.negated = message.polarity == Polarity::Negative;
        if let Some(number) = clause.subject.as_deref().and_then(subject_number) {
            clause.features.number = Some(number);
        }
        clause.into()
    }

    /// Replace placeholders with argument phrases and attach irregular
    /// forms to template words.
    fn fill(&self, node: &mut SyntaxNode, arguments: &[SyntaxNode]) {
        match node {
            SyntaxNode::PlaceHolder(placeholder) => {
                let index = placeholder.index;
                // Arity is checked before filling
                if let Some(argument) = arguments.get(index) {
                    *node = argument.clone();
                }
            }
            SyntaxNode::Clause(clause) => {
                if let Some(subject) = clause.subject.as_deref_mut() {
                    self.fill(subject, arguments);
                }
                self.fill(&mut clause.predicate, arguments);
            }
            SyntaxNode::VerbPhrase(vp) => {
                self.attach_forms(&mut vp.head);
                for complement in &mut vp.complements {
                    self.fill(complement, arguments);
                }
            }
            SyntaxNode::AdjectivePhrase(ap) => self.attach_forms(&mut ap.head),
            SyntaxNode::NounPhrase(np) => {
                self.attach_forms(&mut np.head);
                for premodifier in &mut np.premodifiers {
                    self.fill(premodifier, arguments);
                }
            }
            SyntaxNode::Coordinated(coordinated) => {
                for coordinate in &mut coordinated.coordinates {
                    self.fill(coordinate, arguments);
                }
            }
        }
    }

    fn attach_forms(&self, word: &mut Word) {
        if !word.forms.is_empty() {
            return;
        }
        if let Some(entry) = self.lexicon.entry(&word.lemma) {
            word.forms = entry.forms.clone();
        }
    }

    fn noun_phrase(&self, argument: &Argument, gaps: &mut Gaps) -> SyntaxNode {
        match argument {
            Argument::Entity(entity) => self.entity_phrase(entity, gaps).into(),
            Argument::Bound(binding) => {
                let lemma = match binding.quantifier {
                    Quantifier::ForAll => "everything",
                    Quantifier::Exists => "something",
                };
                NounPhrase::new(Word::new(lemma, Category::Pronoun))
                    .with_referent(Referent::Quantified(binding.quantifier))
                    .with_features(Features {
                        number: Some(Number::Singular),
                        person: Some(Person::Third),
                        ..Features::default()
                    })
                    .into()
            }
        }
    }

    fn entity_phrase(&self, entity: &EntityRef, gaps: &mut Gaps) -> NounPhrase {
        let features = Features {
            number: Some(entity.number),
            gender: Some(entity.gender),
            person: Some(Person::Third),
            ..Features::default()
        };
        let head = match self.lexicon.entry(&entity.name) {
            Some(entry) => Word {
                lemma: entry.word.clone(),
                category: entry.category,
                features: Features {
                    number: Some(entity.number),
                    ..Features::default()
                },
                forms: entry.forms.clone(),
            },
            None => {
                gaps.report(LexicalGap::MissingEntry {
                    key: entity.name.clone(),
                });
                Word::new(entity.name.clone(), Category::Literal)
            }
        };
        NounPhrase::new(head)
            .with_referent(Referent::Entity(entity.clone()))
            .with_features(features)
    }
}

/// Stand-in for a message with no usable template: the predicate name as
/// a literal verb followed by the arguments.
fn fallback_clause(message: &Message, arguments: Vec<SyntaxNode>) -> Clause {
    let mut predicate = VerbPhrase::new(Word::new(message.predicate.clone(), Category::Literal));
    predicate.complements = arguments;
    Clause::predicate_only(predicate.into())
}

fn subject_number(subject: &SyntaxNode) -> Option<Number> {
    match subject {
        SyntaxNode::NounPhrase(np) => np.features.number,
        SyntaxNode::Coordinated(coordinated) => coordinated.features.number,
        _ => None,
    }
}
