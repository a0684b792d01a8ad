#![allow(dead_code)]

use anyhow::Result;
use dialog_logic::Number;
use dialog_nlg::syntax::Inflection;
use dialog_nlg::{Document, Lexicon, RealisationError, SyntaxNode, Templates};

pub const BAND_TEMPLATES: &str = r#"{
    "Play": {
        "type": "clause",
        "subject": { "type": "place_holder", "index": 0 },
        "predicate": {
            "type": "verb_phrase",
            "head": { "lemma": "play", "category": "verb" },
            "complements": [{ "type": "place_holder", "index": 1 }]
        }
    },
    "Admire": {
        "type": "clause",
        "subject": { "type": "place_holder", "index": 0 },
        "predicate": {
            "type": "verb_phrase",
            "head": { "lemma": "admire", "category": "verb" },
            "complements": [{ "type": "place_holder", "index": 1 }]
        }
    },
    "Sing": {
        "type": "clause",
        "subject": { "type": "place_holder", "index": 0 },
        "predicate": {
            "type": "verb_phrase",
            "head": { "lemma": "sing", "category": "verb" }
        }
    },
    "Have": {
        "type": "clause",
        "subject": { "type": "place_holder", "index": 0 },
        "predicate": {
            "type": "verb_phrase",
            "head": { "lemma": "have", "category": "verb" },
            "complements": [{ "type": "place_holder", "index": 1 }]
        }
    }
}"#;

pub const BAND_LEXICON: &str = r#"{
    "entries": {
        "john": { "word": "John", "pos": "proper_noun", "gender": "masculine", "class": "musician" },
        "paul": { "word": "Paul", "pos": "proper_noun", "gender": "masculine", "class": "musician" },
        "george": { "word": "George", "pos": "proper_noun", "gender": "masculine", "class": "musician" },
        "ringo": { "word": "Ringo", "pos": "proper_noun", "gender": "masculine", "class": "musician" },
        "yoko": { "word": "Yoko", "pos": "proper_noun", "gender": "feminine", "class": "musician" },
        "guitar": { "word": "guitar", "pos": "noun" },
        "bass": { "word": "bass", "pos": "noun" },
        "drums": { "word": "drums", "pos": "noun", "number": "plural" },
        "gibson": { "word": "Gibson", "pos": "noun", "class": "guitar" },
        "fender": { "word": "Fender", "pos": "noun", "class": "guitar" },
        "have": { "word": "have", "pos": "verb", "forms": { "present_third": "has" } }
    }
}"#;

pub fn band() -> Result<(Templates, Lexicon)> {
    Ok((
        Templates::from_json(BAND_TEMPLATES)?,
        Lexicon::from_json(BAND_LEXICON)?,
    ))
}

/// Present-tense English, one sentence per line, no punctuation.
pub fn realise(document: &Document) -> Result<String, RealisationError> {
    let sentences = document
        .clauses()
        .map(sentence)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sentences.join("\n"))
}

fn sentence(node: &SyntaxNode) -> Result<String, RealisationError> {
    let SyntaxNode::Clause(clause) = node else {
        return Err(RealisationError::new("expected a clause"));
    };
    let singular = clause.features.number != Some(Number::Plural);
    let mut words = Vec::new();
    if let Some(subject) = &clause.subject {
        words.push(phrase(subject, singular));
    }
    if clause.features.negated {
        words.push(if singular { "does not" } else { "do not" }.to_string());
        words.push(phrase(&clause.predicate, false));
    } else {
        words.push(phrase(&clause.predicate, singular));
    }
    Ok(words.join(" "))
}

fn phrase(node: &SyntaxNode, singular: bool) -> String {
    match node {
        SyntaxNode::NounPhrase(_) | SyntaxNode::AdjectivePhrase(_) | SyntaxNode::PlaceHolder(_) => {
            node.to_string()
        }
        SyntaxNode::Clause(_) => sentence(node).unwrap_or_default(),
        SyntaxNode::VerbPhrase(vp) => {
            let verb = match (singular, vp.head.form(Inflection::PresentThird)) {
                (true, Some(form)) => form.to_string(),
                (true, None) => format!("{}s", vp.head.lemma),
                (false, _) => vp.head.lemma.clone(),
            };
            std::iter::once(verb)
                .chain(vp.complements.iter().map(|c| phrase(c, singular)))
                .collect::<Vec<_>>()
                .join(" ")
        }
        SyntaxNode::Coordinated(coordinated) => {
            let parts: Vec<String> = coordinated
                .coordinates
                .iter()
                .map(|c| phrase(c, singular))
                .collect();
            match parts.split_last() {
                Some((last, init)) if !init.is_empty() => {
                    format!("{} {} {last}", init.join(", "), coordinated.conjunction)
                }
                _ => parts.concat(),
            }
        }
    }
}
