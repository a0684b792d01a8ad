//! Parser for textual first-order logic.
//!
//! Converts a token stream (from [`crate::tokenizer`]) into [`Formula`]
//! values.
//!
//! ```text
//! document   = formula (';' formula)* ';'?
//! formula    = unary ('&' unary)*
//! unary      = '~' unary
//!            | quantified
//!            | '(' formula ')'
//!            | atom
//! quantified = quantifier variable (',' variable)* ':'? formula
//! atom       = Predicate ('(' term (',' term)* ')')?
//! term       = Identifier          → Variable if bound, else Constant
//!            | Variable            → always Variable
//! ```
//!
//! A quantifier's body extends as far right as possible, so
//! `forall x: A(x) & B(x)` quantifies the whole conjunction.

use crate::error::ParseError;
use crate::formula::{Formula, Quantifier, Term};
use crate::tokenizer::{Token, tokenize};

/// A token-stream parser.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Variables bound by the quantifiers enclosing the current position.
    scope: Vec<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            scope: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expected(&self, expected: &str) -> ParseError {
        ParseError::Expected {
            expected: expected.into(),
            found: self
                .peek()
                .map(|t| format!("'{t}'"))
                .unwrap_or("end of input".into()),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), ParseError> {
        if self.peek() == Some(&token) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    // --- Terms ---

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        match self.peek() {
            Some(Token::Identifier(_)) => {
                let Some(Token::Identifier(name)) = self.advance() else {
                    unreachable!()
                };
                if self.scope.contains(&name) {
                    Ok(Term::Variable(name))
                } else {
                    Ok(Term::Constant(name))
                }
            }
            Some(Token::Variable(_)) => {
                let Some(Token::Variable(name)) = self.advance() else {
                    unreachable!()
                };
                Ok(Term::Variable(name))
            }
            _ => Err(self.expected("argument")),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut args = Vec::new();
        if self.peek() != Some(&Token::OpenParen) {
            return Ok(args);
        }
        self.advance(); // consume `(`
        if self.peek() == Some(&Token::CloseParen) {
            self.advance();
            return Ok(args);
        }
        args.push(self.parse_term()?);
        while self.peek() == Some(&Token::Comma) {
            self.advance();
            args.push(self.parse_term()?);
        }
        match self.peek() {
            Some(Token::CloseParen) => {
                self.advance();
                Ok(args)
            }
            None => Err(ParseError::UnbalancedParenthesis),
            Some(_) => Err(self.expected("',' or ')'")),
        }
    }

    // --- Formulas ---

    fn parse_quantified(&mut self, quantifier: Quantifier) -> Result<Formula, ParseError> {
        let mut variables = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Identifier(name) | Token::Variable(name)) => {
                    variables.push(name.clone());
                    self.advance();
                }
                _ => return Err(self.expected("quantified variable")),
            }
            if self.peek() == Some(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some(&Token::Colon) {
            self.advance();
        }

        let depth = self.scope.len();
        self.scope.extend(variables.iter().cloned());
        let body = self.parse_formula();
        self.scope.truncate(depth);

        // `forall x, y: F` is `forall x: forall y: F`
        Ok(variables
            .into_iter()
            .rev()
            .fold(body?, |body, variable| Formula::quantified(quantifier, variable, body)))
    }

    fn parse_unary(&mut self) -> Result<Formula, ParseError> {
        match self.peek() {
            Some(Token::Not) => {
                self.advance();
                Ok(Formula::negation(self.parse_unary()?))
            }
            Some(Token::Quantifier(q)) => {
                let quantifier = *q;
                self.advance();
                self.parse_quantified(quantifier)
            }
            Some(Token::OpenParen) => {
                self.advance();
                let inner = self.parse_formula()?;
                match self.peek() {
                    Some(Token::CloseParen) => {
                        self.advance();
                        Ok(inner)
                    }
                    None => Err(ParseError::UnbalancedParenthesis),
                    Some(_) => Err(self.expected("')'")),
                }
            }
            Some(Token::Predicate(_)) => {
                let Some(Token::Predicate(name)) = self.advance() else {
                    unreachable!()
                };
                let args = self.parse_arguments()?;
                Ok(Formula::predicate(name, args))
            }
            _ => Err(self.expected("formula")),
        }
    }

    fn parse_formula(&mut self) -> Result<Formula, ParseError> {
        let mut conjuncts = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::And) {
            self.advance(); // consume `&`
            conjuncts.push(self.parse_unary()?);
        }
        Ok(Formula::conjunction(conjuncts))
    }

    // --- Document ---

    fn parse_document(&mut self) -> Result<Vec<Formula>, ParseError> {
        let mut formulas = Vec::new();
        loop {
            // Skip empty statements
            while self.peek() == Some(&Token::Separator) {
                self.advance();
            }
            if self.peek().is_none() {
                break;
            }
            formulas.push(self.parse_formula()?);
            match self.peek() {
                None => break,
                Some(Token::Separator) => continue,
                Some(_) => return Err(self.expected("'&' or ';'")),
            }
        }
        Ok(formulas)
    }
}

/// Parse `;`-separated formulas.
///
/// # Example
///
/// ```
/// use dialog_logic::parse;
///
/// let formulas = parse("Happy(john); forall x: Mortal(x)").unwrap();
/// assert_eq!(formulas.len(), 2);
/// ```
pub fn parse(input: &str) -> Result<Vec<Formula>, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);
    parser.parse_document()
}

/// Parse exactly one formula.
///
/// # Example
///
/// ```
/// use dialog_logic::{parse_formula, Formula};
///
/// let formula = parse_formula("~Happy(john)").unwrap();
/// assert!(matches!(formula, Formula::Negation(_)));
/// ```
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);
    let formula = parser.parse_formula()?;
    if parser.peek().is_some() {
        return Err(parser.expected("end of input"));
    }
    Ok(formula)
}
