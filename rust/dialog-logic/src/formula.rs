//! Formula types for first-order logic input.
//!
//! A formula like `"forall x: Play(x, guitar)"` is represented as a
//! [`Formula::Quantified`] whose body is a [`Formula::Predicate`] with the
//! arguments `[Variable("x"), Constant("guitar")]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An argument of a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named individual, e.g. `john`.
    Constant(String),
    /// A variable, bound by an enclosing quantifier or free (`?x`).
    Variable(String),
}

impl Term {
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// The name of the constant or variable.
    pub fn name(&self) -> &str {
        match self {
            Term::Constant(name) | Term::Variable(name) => name,
        }
    }

    /// Returns `true` if this term is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

/// The two quantifiers of first-order logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantifier {
    /// `forall`
    ForAll,
    /// `exists`
    Exists,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::ForAll => write!(f, "forall"),
            Quantifier::Exists => write!(f, "exists"),
        }
    }
}

/// A first-order logic formula. Immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// A predicate applied to ordered arguments: `Play(john, guitar)`.
    Predicate { name: String, args: Vec<Term> },
    /// Two or more formulas joined by `&`.
    Conjunction(Vec<Formula>),
    /// `~formula`
    Negation(Box<Formula>),
    /// `forall x: body` or `exists x: body`.
    Quantified {
        quantifier: Quantifier,
        variable: String,
        body: Box<Formula>,
    },
}

impl Formula {
    pub fn predicate(name: impl Into<String>, args: Vec<Term>) -> Self {
        Formula::Predicate {
            name: name.into(),
            args,
        }
    }

    pub fn negation(formula: Formula) -> Self {
        Formula::Negation(Box::new(formula))
    }

    pub fn quantified(quantifier: Quantifier, variable: impl Into<String>, body: Formula) -> Self {
        Formula::Quantified {
            quantifier,
            variable: variable.into(),
            body: Box::new(body),
        }
    }

    /// Join formulas with `&`, flattening nested conjunctions.
    ///
    /// A single formula is returned unchanged.
    pub fn conjunction(formulas: Vec<Formula>) -> Self {
        let mut flat = Vec::with_capacity(formulas.len());
        for formula in formulas {
            match formula {
                Formula::Conjunction(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Formula::Conjunction(flat)
        }
    }

    /// The top-level conjuncts of this formula.
    ///
    /// Nested conjunctions are flattened; anything else is its own single
    /// conjunct.
    pub fn conjuncts(&self) -> Vec<&Formula> {
        match self {
            Formula::Conjunction(parts) => parts.iter().flat_map(|part| part.conjuncts()).collect(),
            other => vec![other],
        }
    }

    /// Returns `true` if `variable` occurs free anywhere in this formula.
    pub fn mentions_variable(&self, variable: &str) -> bool {
        match self {
            Formula::Predicate { args, .. } => args
                .iter()
                .any(|arg| matches!(arg, Term::Variable(name) if name == variable)),
            Formula::Conjunction(parts) => parts.iter().any(|part| part.mentions_variable(variable)),
            Formula::Negation(inner) => inner.mentions_variable(variable),
            Formula::Quantified {
                variable: bound,
                body,
                ..
            } => bound != variable && body.mentions_variable(variable),
        }
    }

    /// Variables that occur in this formula without a binding quantifier,
    /// in order of first occurrence.
    pub fn free_variables(&self) -> Vec<String> {
        let mut free = Vec::new();
        self.collect_free(&mut Vec::new(), &mut free);
        free
    }

    fn collect_free<'a>(&'a self, bound: &mut Vec<&'a str>, free: &mut Vec<String>) {
        match self {
            Formula::Predicate { args, .. } => {
                for arg in args {
                    if let Term::Variable(name) = arg {
                        if !bound.contains(&name.as_str()) && !free.contains(name) {
                            free.push(name.clone());
                        }
                    }
                }
            }
            Formula::Conjunction(parts) => {
                for part in parts {
                    part.collect_free(bound, free);
                }
            }
            Formula::Negation(inner) => inner.collect_free(bound, free),
            Formula::Quantified { variable, body, .. } => {
                bound.push(variable);
                body.collect_free(bound, free);
                bound.pop();
            }
        }
    }

    fn write_scoped(&self, f: &mut fmt::Formatter<'_>, scope: &mut Vec<String>) -> fmt::Result {
        match self {
            Formula::Predicate { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        match arg {
                            Term::Constant(name) => write!(f, "{name}")?,
                            // A variable outside its quantifier only reads back as one with `?`.
                            Term::Variable(name) if scope.contains(name) => write!(f, "{name}")?,
                            Term::Variable(name) => write!(f, "?{name}")?,
                        }
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Formula::Conjunction(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    part.write_operand(f, scope)?;
                }
                Ok(())
            }
            Formula::Negation(inner) => {
                write!(f, "~")?;
                inner.write_operand(f, scope)
            }
            Formula::Quantified {
                quantifier,
                variable,
                body,
            } => {
                write!(f, "{quantifier} {variable}: ")?;
                scope.push(variable.clone());
                let result = body.write_scoped(f, scope);
                scope.pop();
                result
            }
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, scope: &mut Vec<String>) -> fmt::Result {
        match self {
            Formula::Conjunction(_) | Formula::Quantified { .. } => {
                write!(f, "(")?;
                self.write_scoped(f, scope)?;
                write!(f, ")")
            }
            _ => self.write_scoped(f, scope),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_scoped(f, &mut Vec::new())
    }
}
