//! # dialog-logic
//!
//! First-order logic formulas and the discourse entities they talk about.
//!
//! This crate is the input side of `dialog-nlg`: it provides the typed
//! [`Formula`] model that the text generation pipeline plans from, the
//! [`Entity`] referents that messages share, and a small reader for the
//! textual formula syntax.
//!
//! ## Syntax
//!
//! **Predicates** start with an uppercase letter and take ordered arguments:
//! ```text
//! Play(john, guitar)
//! Happy(ringo)
//! ```
//!
//! **Conjunction** uses `&` (or `and`), **negation** uses `~` (or `not`):
//! ```text
//! Play(john, guitar) & ~Play(john, drums)
//! ```
//!
//! **Quantifiers** bind lowercase variables over the formula to their right:
//! ```text
//! forall x: Mortal(x)
//! exists x, y: Loves(x, y)
//! ```
//!
//! **Statements** are separated by `;`:
//! ```text
//! Play(john, guitar) & Play(paul, guitar); Play(george, bass)
//! ```
//!
//! A lowercase argument is a variable when an enclosing quantifier binds
//! it and a constant otherwise. `?x` is always a variable, bound or not.
//!
//! ## Example
//!
//! ```
//! use dialog_logic::{parse, Formula, Term};
//!
//! let formulas = parse("Play(john, guitar) & Play(paul, guitar); Play(george, bass)").unwrap();
//! assert_eq!(formulas.len(), 2);
//! assert_eq!(formulas[0].conjuncts().len(), 2);
//!
//! // Display prints the same syntax back
//! assert_eq!(formulas[1].to_string(), "Play(george, bass)");
//! assert_eq!(
//!     formulas[1],
//!     Formula::predicate("Play", vec![Term::constant("george"), Term::constant("bass")])
//! );
//! ```

pub mod entity;
pub mod error;
pub mod formula;
pub mod parser;
pub mod tokenizer;

pub use entity::{Entity, EntityRef, Gender, Number};
pub use error::ParseError;
pub use formula::{Formula, Quantifier, Term};
pub use parser::{parse, parse_formula};
