//! The pipeline: formulas in, planned document out.
//!
//! ```text
//! formulas → Macroplanner → DocumentPlan
//!          → Lexicaliser  → Document (entity mentions unresolved)
//!          → ReferringExpressionGenerator → Document (references fixed)
//!          → Aggregator   → Document (clauses merged)
//!          → Realiser     → text (optional, external)
//! ```
//!
//! Only content errors stop a run. Lexical gaps and ambiguous references
//! are collected as warnings, in stage order, next to the document.

use crate::aggregate::Aggregator;
use crate::config::PipelineConfig;
use crate::error::{ContentError, NlgError, Warning};
use crate::lexicalise::Lexicaliser;
use crate::lexicon::Lexicon;
use crate::plan::Macroplanner;
use crate::realise::Realiser;
use crate::reference::{DiscourseState, ReferringExpressionGenerator};
use crate::syntax::Document;
use crate::template::Templates;
use dialog_logic::Formula;

/// A planned document and the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    pub document: Document,
    pub warnings: Vec<Warning>,
}

/// Realised text and the warnings raised while planning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realised {
    pub text: String,
    pub warnings: Vec<Warning>,
}

/// Runs the planning stages over borrowed templates and lexicon.
///
/// A pipeline holds no per-run state, so concurrent runs may share one
/// pipeline, or one set of templates and lexicon.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    templates: &'a Templates,
    lexicon: &'a Lexicon,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(templates: &'a Templates, lexicon: &'a Lexicon) -> Self {
        Pipeline {
            templates,
            lexicon,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Plan a document from formulas.
    pub fn realise_text(&self, formulas: &[Formula]) -> Result<Planned, ContentError> {
        // Stage 1: macroplanning
        let plan = Macroplanner::new(self.lexicon).plan(formulas)?;

        // Stage 2: lexicalisation
        let (mut document, mut warnings) =
            Lexicaliser::new(self.templates, self.lexicon).lexicalise(&plan);

        // Stage 3: referring expressions
        let state = DiscourseState::for_document(&document);
        let (_, reference_warnings) =
            ReferringExpressionGenerator::new(self.config.reference.clone(), self.lexicon)
                .generate_references(&mut document, state);
        warnings.extend(reference_warnings);

        // Stage 4: aggregation
        let document = Aggregator::new(self.config.aggregation.clone()).aggregate(document);

        tracing::debug!(
            formulas = formulas.len(),
            clauses = document.clauses().count(),
            warnings = warnings.len(),
            "planned document"
        );
        Ok(Planned { document, warnings })
    }

    /// Parse formula text, then plan it.
    pub fn realise_str(&self, input: &str) -> Result<Planned, NlgError> {
        let formulas = dialog_logic::parse(input)?;
        Ok(self.realise_text(&formulas)?)
    }

    /// Plan a document and hand it to `realiser`.
    pub fn realise<R>(&self, formulas: &[Formula], realiser: &R) -> Result<Realised, NlgError>
    where
        R: Realiser + ?Sized,
    {
        let Planned { document, warnings } = self.realise_text(formulas)?;
        let text = realiser.realise(&document)?;
        Ok(Realised { text, warnings })
    }
}

/// Plan a document with the default configuration.
pub fn realise_text(
    formulas: &[Formula],
    templates: &Templates,
    lexicon: &Lexicon,
) -> Result<Planned, ContentError> {
    Pipeline::new(templates, lexicon).realise_text(formulas)
}
