//! Clause aggregation.
//!
//! Merges adjacent clauses of a paragraph that share a part:
//!
//! ```text
//! John plays the guitar. John sings.        → John plays the guitar and sings.
//! John plays the guitar. Paul plays the guitar. → John and Paul play the guitar.
//! ```
//!
//! Runs after referring expressions are fixed, so a shared subject must be
//! the same entity realised the same way. One greedy pass, left to right:
//! a merged clause is emitted and never considered again.
//!
//! Negated clauses only share a predicate. Clause negation over coordinated
//! verb phrases would deny the conjunction rather than each conjunct.

use crate::config::AggregationConfig;
use crate::syntax::{Clause, CoordinatedPhrase, Document, Features, Paragraph, Referent, SyntaxNode};
use dialog_logic::{Number, Quantifier};

/// Merges adjacent clauses that share a subject or a predicate.
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Aggregator { config }
    }

    pub fn aggregate(&self, document: Document) -> Document {
        if !self.config.enabled {
            return document;
        }
        let paragraphs = document
            .paragraphs
            .into_iter()
            .map(|paragraph| Paragraph {
                relation: paragraph.relation,
                clauses: self.aggregate_clauses(paragraph.clauses),
            })
            .collect();
        Document { paragraphs }
    }

    fn aggregate_clauses(&self, clauses: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
        let before = clauses.len();
        let mut out = Vec::with_capacity(before);
        let mut rest = clauses.into_iter();
        let mut current = rest.next();
        while let Some(left) = current.take() {
            let Some(right) = rest.next() else {
                out.push(left);
                break;
            };
            match self.merge(&left, &right) {
                Some(merged) => {
                    out.push(merged);
                    current = rest.next();
                }
                None => {
                    out.push(left);
                    current = Some(right);
                }
            }
        }
        if out.len() < before {
            tracing::debug!(before, after = out.len(), "aggregated clauses");
        }
        out
    }

    fn merge(&self, left: &SyntaxNode, right: &SyntaxNode) -> Option<SyntaxNode> {
        let (SyntaxNode::Clause(left), SyntaxNode::Clause(right)) = (left, right) else {
            return None;
        };
        if left == right || left.features != right.features {
            return None;
        }
        let (Some(left_subject), Some(right_subject)) = (&left.subject, &right.subject) else {
            return None;
        };

        if left_subject == right_subject && !left.features.negated && shareable(left_subject) {
            let predicate = self.coordinate(
                (*left.predicate).clone(),
                (*right.predicate).clone(),
                Features::default(),
            );
            return Some(
                Clause {
                    subject: left.subject.clone(),
                    predicate: Box::new(predicate),
                    features: left.features.clone(),
                }
                .into(),
            );
        }

        if left.predicate == right.predicate
            && shareable(&left.predicate)
            && !corefer(left_subject, right_subject)
        {
            let plural = Features {
                number: Some(Number::Plural),
                ..Features::default()
            };
            let subject = self.coordinate(
                (**left_subject).clone(),
                (**right_subject).clone(),
                plural,
            );
            return Some(
                Clause {
                    subject: Some(Box::new(subject)),
                    predicate: left.predicate.clone(),
                    features: Features {
                        number: Some(Number::Plural),
                        ..left.features.clone()
                    },
                }
                .into(),
            );
        }

        None
    }

    fn coordinate(&self, left: SyntaxNode, right: SyntaxNode, features: Features) -> SyntaxNode {
        CoordinatedPhrase {
            conjunction: self.config.conjunction.clone(),
            coordinates: vec![left, right],
            features,
        }
        .into()
    }
}

/// An existential phrase cannot be shared: "something plays and sings"
/// says less than two separate clauses.
fn shareable(node: &SyntaxNode) -> bool {
    !node.any(&|n| {
        matches!(
            n,
            SyntaxNode::NounPhrase(np) if np.referent == Referent::Quantified(Quantifier::Exists)
        )
    })
}

/// Whether both phrases mention a common entity, whatever their forms.
fn corefer(left: &SyntaxNode, right: &SyntaxNode) -> bool {
    left.any(&|l| match l {
        SyntaxNode::NounPhrase(np) => np.entity().is_some_and(|entity| {
            right.any(&|r| {
                matches!(r, SyntaxNode::NounPhrase(other) if other.entity() == Some(entity))
            })
        }),
        _ => false,
    })
}
