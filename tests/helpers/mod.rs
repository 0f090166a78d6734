//! Shared helpers for integration tests
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use arranger::{
    ArrangeConfiguration, Arranger, CodeElement, FileContext, Language, SyntaxError, parse_source,
};

/// Parse source that must be valid.
pub fn parse(language: Language, source: &str) -> Vec<CodeElement> {
    parse_source(language, source).unwrap_or_else(|e| panic!("parse failed: {}", e.format()))
}

/// Parse source that must be rejected.
pub fn parse_err(language: Language, source: &str) -> SyntaxError {
    match parse_source(language, source) {
        Ok(elements) => panic!("expected an error, parsed {elements:?}"),
        Err(err) => err,
    }
}

/// Parse and arrange with the standard layout.
pub fn arrange_standard(language: Language, path: &str, source: &str) -> Vec<CodeElement> {
    let arranger = Arranger::new(&ArrangeConfiguration::standard()).unwrap();
    arranger.arrange(&parse(language, source), &FileContext::new(path))
}

pub fn names(elements: &[CodeElement]) -> Vec<&str> {
    elements.iter().map(|e| e.name.as_str()).collect()
}
