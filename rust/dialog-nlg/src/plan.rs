//! Document planning: content selection and rhetorical structuring.
//!
//! The [`Macroplanner`] reads formulas in order and produces a
//! [`DocumentPlan`]:
//!
//! ```text
//! formulas → content selection → messages (one per predicate)
//!          → structuring       → clusters of related messages
//! ```
//!
//! Content selection splits conjunctions, folds negation into a message's
//! polarity and records the quantifiers that bind each variable. Constants
//! become shared [`EntityRef`]s, one per name for the whole plan.
//!
//! Structuring groups messages greedily in input order. A message joins
//! the cluster holding the earliest related message, or opens a new one.
//! Two messages are related when they talk about the same primary entity
//! (elaboration) or state the same predicate of different primaries
//! (joint).

use crate::error::ContentError;
use crate::lexicon::Lexicon;
use dialog_logic::{Entity, EntityRef, Formula, Quantifier, Term};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a message is asserted or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Positive,
    Negative,
}

impl Polarity {
    fn flip(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

/// How the parts of a plan relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Independent statements in input order.
    Sequence,
    /// Further statements about the same primary entity.
    Elaboration,
    /// The same statement about several entities.
    Joint,
}

/// A variable bound by a quantifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub quantifier: Quantifier,
    pub variable: String,
}

/// A message argument: a named entity or a quantified variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Argument {
    Entity(EntityRef),
    Bound(Binding),
}

impl Argument {
    pub fn entity(&self) -> Option<&EntityRef> {
        match self {
            Argument::Entity(entity) => Some(entity),
            Argument::Bound(_) => None,
        }
    }
}

/// One predicate applied to its arguments: the unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub predicate: String,
    pub arguments: Vec<Argument>,
    pub polarity: Polarity,
    /// Quantifiers binding variables among the arguments, outermost first.
    pub quantifiers: Vec<Binding>,
    /// How this message attaches to the one before it in its cluster.
    pub role: Option<Relation>,
    /// Index of the input formula this message came from.
    pub source: usize,
}

impl Message {
    /// The first argument's entity, the thing the message is about.
    pub fn primary(&self) -> Option<&EntityRef> {
        self.arguments.first().and_then(Argument::entity)
    }

    /// How `other` relates to this message, if at all.
    pub fn relation_to(&self, other: &Message) -> Option<Relation> {
        if self.primary().is_some() && self.primary() == other.primary() {
            return Some(Relation::Elaboration);
        }
        let joint = !self.arguments.is_empty()
            && self.predicate == other.predicate
            && self.polarity == other.polarity
            && self.quantifiers == other.quantifiers
            && self.arguments.len() == other.arguments.len()
            && self.arguments[1..] == other.arguments[1..];
        joint.then_some(Relation::Joint)
    }
}

/// A lone message, or messages grouped under one discourse relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanNode {
    Message(Message),
    Cluster {
        relation: Relation,
        messages: Vec<Message>,
    },
}

impl PlanNode {
    pub fn messages(&self) -> &[Message] {
        match self {
            PlanNode::Message(message) => std::slice::from_ref(message),
            PlanNode::Cluster { messages, .. } => messages,
        }
    }

    pub fn relation(&self) -> Relation {
        match self {
            PlanNode::Message(_) => Relation::Sequence,
            PlanNode::Cluster { relation, .. } => *relation,
        }
    }
}

/// The output of macroplanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPlan {
    pub relation: Relation,
    pub nodes: Vec<PlanNode>,
    /// Every entity in the plan, in order of first mention.
    pub entities: Vec<EntityRef>,
}

impl DocumentPlan {
    /// All messages, node by node.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.nodes.iter().flat_map(PlanNode::messages)
    }
}

/// Builds document plans. Holds only a borrowed lexicon, so one planner
/// can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Macroplanner<'a> {
    lexicon: &'a Lexicon,
}

/// Per-formula selection context.
struct Selection<'f> {
    index: usize,
    formula: &'f Formula,
}

impl Selection<'_> {
    fn text(&self) -> String {
        self.formula.to_string()
    }
}

impl<'a> Macroplanner<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Macroplanner { lexicon }
    }

    /// Plan a document from formulas in order.
    ///
    /// Fails on the first formula that cannot be expressed as messages.
    /// No partial plan is returned.
    pub fn plan(&self, formulas: &[Formula]) -> Result<DocumentPlan, ContentError> {
        let mut entities = EntityTable::default();
        let mut messages = Vec::new();

        // Stage 1: content selection
        for (index, formula) in formulas.iter().enumerate() {
            let selection = Selection { index, formula };
            if let Some(variable) = formula.free_variables().into_iter().next() {
                return Err(ContentError::FreeVariable {
                    index,
                    formula: selection.text(),
                    variable,
                });
            }
            self.select(
                &selection,
                formula,
                Polarity::Positive,
                &mut Vec::new(),
                &mut entities,
                &mut messages,
            )?;
        }
        tracing::debug!(
            formulas = formulas.len(),
            messages = messages.len(),
            entities = entities.order.len(),
            "selected content"
        );

        // Stage 2: rhetorical structuring
        let nodes = structure(messages);
        tracing::debug!(nodes = nodes.len(), "structured plan");

        Ok(DocumentPlan {
            relation: Relation::Sequence,
            nodes,
            entities: entities.order,
        })
    }

    fn select(
        &self,
        selection: &Selection<'_>,
        formula: &Formula,
        polarity: Polarity,
        bindings: &mut Vec<Binding>,
        entities: &mut EntityTable,
        messages: &mut Vec<Message>,
    ) -> Result<(), ContentError> {
        match formula {
            Formula::Predicate { name, args } => {
                let arguments = args
                    .iter()
                    .map(|arg| match arg {
                        Term::Constant(name) => {
                            Argument::Entity(entities.intern(name, || self.entity(name)))
                        }
                        // Free variables were rejected up front, so a binding exists
                        Term::Variable(variable) => Argument::Bound(
                            bindings
                                .iter()
                                .rev()
                                .find(|b| b.variable == *variable)
                                .cloned()
                                .unwrap_or(Binding {
                                    quantifier: Quantifier::Exists,
                                    variable: variable.clone(),
                                }),
                        ),
                    })
                    .collect::<Vec<_>>();
                let quantifiers = bindings
                    .iter()
                    .filter(|b| arguments.contains(&Argument::Bound((*b).clone())))
                    .cloned()
                    .collect();
                tracing::trace!(predicate = %name, ?polarity, source = selection.index, "message");
                messages.push(Message {
                    predicate: name.clone(),
                    arguments,
                    polarity,
                    quantifiers,
                    role: None,
                    source: selection.index,
                });
                Ok(())
            }
            Formula::Negation(inner) => match inner.as_ref() {
                // ~~A is A
                Formula::Negation(double) => {
                    self.select(selection, double, polarity, bindings, entities, messages)
                }
                Formula::Predicate { .. } => {
                    self.select(selection, inner, polarity.flip(), bindings, entities, messages)
                }
                _ => Err(ContentError::UnsupportedNegation {
                    index: selection.index,
                    formula: formula.to_string(),
                }),
            },
            Formula::Conjunction(parts) => {
                if let Some(binding) = bindings.iter().find(|b| b.quantifier == Quantifier::Exists) {
                    return Err(ContentError::UnsupportedExistential {
                        index: selection.index,
                        formula: selection.text(),
                        variable: binding.variable.clone(),
                    });
                }
                // A universal distributes over its conjuncts
                for part in parts {
                    self.select(selection, part, polarity, bindings, entities, messages)?;
                }
                Ok(())
            }
            Formula::Quantified {
                quantifier,
                variable,
                body,
            } => {
                if !body.mentions_variable(variable) {
                    return Err(ContentError::UngroundedQuantifier {
                        index: selection.index,
                        formula: formula.to_string(),
                        variable: variable.clone(),
                    });
                }
                bindings.push(Binding {
                    quantifier: *quantifier,
                    variable: variable.clone(),
                });
                let result = self.select(selection, body, polarity, bindings, entities, messages);
                bindings.pop();
                result
            }
        }
    }

    /// Attributes for the entity a constant names.
    ///
    /// Without a lexicon entry the entity is neuter and singular, its class
    /// is its own name, and a capitalised name marks it as proper.
    fn entity(&self, name: &str) -> Entity {
        match self.lexicon.entry(name) {
            Some(entry) => {
                let entity = Entity::new(name)
                    .with_gender(entry.gender)
                    .with_number(entry.number)
                    .with_class(entry.class());
                if entry.is_proper() { entity.proper() } else { entity }
            }
            None if name.starts_with(char::is_uppercase) => Entity::new(name).proper(),
            None => Entity::new(name),
        }
    }
}

/// One entity per constant name.
#[derive(Default)]
struct EntityTable {
    by_name: HashMap<String, EntityRef>,
    order: Vec<EntityRef>,
}

impl EntityTable {
    fn intern(&mut self, name: &str, make: impl FnOnce() -> Entity) -> EntityRef {
        if let Some(existing) = self.by_name.get(name) {
            return existing.clone();
        }
        let entity = EntityRef::new(make());
        self.by_name.insert(name.to_string(), entity.clone());
        self.order.push(entity.clone());
        entity
    }
}

/// Group messages into clusters, greedily and in input order.
fn structure(messages: Vec<Message>) -> Vec<PlanNode> {
    // Each cluster holds indices into `messages`
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut roles: Vec<Option<Relation>> = vec![None; messages.len()];

    for (i, message) in messages.iter().enumerate() {
        // Ties go to the cluster whose related message has the earliest
        // source formula, then the earliest position.
        let mut best: Option<((usize, usize), usize, Relation)> = None;
        for (c, cluster) in clusters.iter().enumerate() {
            for &j in cluster {
                let Some(relation) = messages[j].relation_to(message) else {
                    continue;
                };
                let key = (messages[j].source, j);
                if best.is_none_or(|(best_key, _, _)| key < best_key) {
                    best = Some((key, c, relation));
                }
            }
        }
        match best {
            Some((_, c, relation)) => {
                tracing::trace!(message = i, cluster = c, ?relation, "joined cluster");
                roles[i] = Some(relation);
                clusters[c].push(i);
            }
            None => clusters.push(vec![i]),
        }
    }

    let mut slots: Vec<Option<Message>> = messages
        .into_iter()
        .zip(roles)
        .map(|(message, role)| Some(Message { role, ..message }))
        .collect();

    clusters
        .into_iter()
        .map(|cluster| {
            let mut members: Vec<Message> =
                cluster.iter().filter_map(|&i| slots[i].take()).collect();
            if members.len() == 1 {
                return PlanNode::Message(members.remove(0));
            }
            let relation = if members[1..]
                .iter()
                .all(|m| m.role == Some(Relation::Elaboration))
            {
                Relation::Elaboration
            } else {
                Relation::Joint
            };
            PlanNode::Cluster {
                relation,
                messages: members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexicalEntry;
    use crate::syntax::Category;
    use dialog_logic::{Gender, Number, parse};
    use pretty_assertions::assert_eq;

    fn lexicon() -> Lexicon {
        Lexicon::new()
            .with_entry(
                "john",
                LexicalEntry::new("John", Category::ProperNoun)
                    .with_gender(Gender::Masculine)
                    .with_class("musician"),
            )
            .unwrap()
            .with_entry(
                "drums",
                LexicalEntry::new("drums", Category::Noun).with_number(Number::Plural),
            )
            .unwrap()
    }

    fn plan(input: &str) -> Result<DocumentPlan, ContentError> {
        let lexicon = lexicon();
        Macroplanner::new(&lexicon).plan(&parse(input).unwrap())
    }

    fn predicates(node: &PlanNode) -> Vec<&str> {
        node.messages().iter().map(|m| m.predicate.as_str()).collect()
    }

    #[test]
    fn test_one_message_per_conjunct() {
        let plan = plan("Play(john, guitar) & Sing(john); Play(george, bass)").unwrap();
        let messages: Vec<_> = plan.messages().collect();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].source, 0);
        assert_eq!(messages[1].source, 0);
        assert_eq!(messages[2].source, 1);
    }

    #[test]
    fn test_entities_are_shared() {
        let plan = plan("Play(john, guitar); Sing(john)").unwrap();
        let messages: Vec<_> = plan.messages().collect();
        assert_eq!(messages[0].primary(), messages[1].primary());
        assert_eq!(plan.entities.len(), 2);
        assert_eq!(plan.entities[0].name, "john");
    }

    #[test]
    fn test_entity_attributes() {
        let lexicon = lexicon();
        let play = |subject: &str, object: &str| {
            Formula::predicate("Play", vec![Term::constant(subject), Term::constant(object)])
        };
        let plan = Macroplanner::new(&lexicon)
            .plan(&[play("john", "drums"), play("Mary", "bass")])
            .unwrap();
        let [john, drums, mary, bass] = &plan.entities[..] else {
            panic!("expected four entities");
        };
        assert!(john.proper);
        assert_eq!(john.gender, Gender::Masculine);
        assert_eq!(john.class, "musician");
        assert_eq!(drums.number, Number::Plural);
        assert!(!drums.proper);
        assert!(mary.proper);
        assert_eq!(bass.class, "bass");
        assert_eq!(bass.gender, Gender::Neuter);
    }

    #[test]
    fn test_negation_sets_polarity() {
        let plan = plan("~Play(john, drums); ~~Play(john, guitar)").unwrap();
        let messages: Vec<_> = plan.messages().collect();
        assert_eq!(messages[0].polarity, Polarity::Negative);
        assert_eq!(messages[1].polarity, Polarity::Positive);
    }

    #[test]
    fn test_universal_distributes() {
        let plan = plan("forall x: Play(x, guitar) & Sing(x)").unwrap();
        let messages: Vec<_> = plan.messages().collect();
        assert_eq!(messages.len(), 2);
        let everyone = Binding {
            quantifier: Quantifier::ForAll,
            variable: "x".into(),
        };
        for message in messages {
            assert_eq!(message.quantifiers, vec![everyone.clone()]);
            assert_eq!(message.arguments[0], Argument::Bound(everyone.clone()));
        }
    }

    #[test]
    fn test_unused_bindings_are_not_recorded() {
        let plan = plan("forall x: Sing(x) & Happy(john)").unwrap();
        let messages: Vec<_> = plan.messages().collect();
        assert!(messages[1].quantifiers.is_empty());
    }

    #[test]
    fn test_content_errors() {
        assert!(matches!(
            plan("Happy(john); forall x: Happy(john)"),
            Err(ContentError::UngroundedQuantifier { index: 1, ref variable, .. }) if variable == "x"
        ));
        assert!(matches!(
            plan("Happy(?y)"),
            Err(ContentError::FreeVariable { ref variable, .. }) if variable == "y"
        ));
        let err = plan("~(Happy(john) & Sad(john))").unwrap_err();
        assert_eq!(
            err,
            ContentError::UnsupportedNegation {
                index: 0,
                formula: "~(Happy(john) & Sad(john))".into()
            }
        );
        let err = plan("exists x: Play(x, guitar) & Sing(x)").unwrap_err();
        assert!(matches!(err, ContentError::UnsupportedExistential { ref variable, .. } if variable == "x"));
        assert_eq!(err.formula(), "exists x: Play(x, guitar) & Sing(x)");
    }

    #[test]
    fn test_negated_quantifier_is_unsupported() {
        assert!(matches!(
            plan("~forall x: Happy(x)"),
            Err(ContentError::UnsupportedNegation { .. })
        ));
    }

    #[test]
    fn test_clusters_by_shared_predicate() {
        let plan =
            plan("Play(john, guitar) & Play(paul, guitar); Play(george, bass); Play(ringo, drums)")
                .unwrap();
        assert_eq!(plan.nodes.len(), 3);
        assert_eq!(
            plan.nodes[0],
            PlanNode::Cluster {
                relation: Relation::Joint,
                messages: plan.nodes[0].messages().to_vec(),
            }
        );
        assert_eq!(plan.nodes[0].messages()[1].role, Some(Relation::Joint));
        assert!(matches!(plan.nodes[1], PlanNode::Message(_)));
        assert!(matches!(plan.nodes[2], PlanNode::Message(_)));
    }

    #[test]
    fn test_clusters_by_primary_entity() {
        let plan = plan("Play(john, guitar); Play(george, bass); Sing(john)").unwrap();
        assert_eq!(plan.nodes.len(), 2);
        assert_eq!(predicates(&plan.nodes[0]), vec!["Play", "Sing"]);
        assert_eq!(plan.nodes[0].relation(), Relation::Elaboration);
        assert_eq!(plan.nodes[1].relation(), Relation::Sequence);
    }

    #[test]
    fn test_tie_goes_to_earliest_source() {
        // Sing(john) relates to cluster 0 via john and to cluster 1 via Sing
        let plan = plan("Play(john, guitar); Sing(paul); Sing(john)").unwrap();
        assert_eq!(plan.nodes.len(), 2);
        assert_eq!(predicates(&plan.nodes[0]), vec!["Play", "Sing"]);
        assert_eq!(plan.nodes[0].messages()[1].primary().unwrap().name, "john");
        assert_eq!(predicates(&plan.nodes[1]), vec!["Sing"]);
    }

    #[test]
    fn test_fresh_entities_per_plan() {
        let lexicon = lexicon();
        let formulas = parse("Happy(john)").unwrap();
        let planner = Macroplanner::new(&lexicon);
        let first = planner.plan(&formulas).unwrap();
        let second = planner.plan(&formulas).unwrap();
        assert!(first.entities[0] != second.entities[0]);
    }
}
