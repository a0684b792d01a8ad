//! The boundary to surface realisation.
//!
//! Inflection, agreement, word order and punctuation belong to an
//! external realiser. The pipeline only hands over a finished
//! [`Document`] and passes any failure back unchanged.

use crate::error::RealisationError;
use crate::syntax::Document;

/// Turns a planned document into text.
pub trait Realiser {
    fn realise(&self, document: &Document) -> Result<String, RealisationError>;
}

impl<F> Realiser for F
where
    F: Fn(&Document) -> Result<String, RealisationError>,
{
    fn realise(&self, document: &Document) -> Result<String, RealisationError> {
        self(document)
    }
}
