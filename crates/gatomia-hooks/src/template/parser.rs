//! Template syntax
//!
//! A reference is a variable name between braces: `feat({feature})`. Names match
//! `[A-Za-z_][A-Za-z0-9_]*`. Everything outside braces is literal text, including
//! `$`. There is no escape syntax, so a stray `{` or `}` is always an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{SyntaxErrorKind, TemplateSyntaxError};

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Variable {
        name: &'a str,
        /// Byte offset of the opening brace
        position: usize,
    },
}

/// Parse a template, failing on the first syntax error
pub fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateSyntaxError> {
    let (segments, errors) = scan(template);
    match errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(segments),
    }
}

/// Check a template, returning the first syntax error
pub fn validate_syntax(template: &str) -> Result<(), TemplateSyntaxError> {
    parse(template).map(|_| ())
}

/// Every syntax error in a template, in source order
pub fn syntax_errors(template: &str) -> Vec<TemplateSyntaxError> {
    scan(template).1
}

/// Names of well-formed references, in first-occurrence order without duplicates
///
/// Malformed references are skipped rather than reported.
pub fn extract_variables(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in scan(template).0 {
        if let Segment::Variable { name, .. } = segment {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Whether `name` is a legal variable name
pub fn is_valid_name(name: &str) -> bool {
    name_regex().is_match(name)
}

fn scan(template: &str) -> (Vec<Segment<'_>>, Vec<TemplateSyntaxError>) {
    let mut segments = Vec::new();
    let mut errors = Vec::new();
    let mut open: Option<usize> = None;
    // A nested brace poisons the open reference; `depth` counts its unclosed inner braces
    let mut poisoned = false;
    let mut depth = 0usize;
    let mut literal_start = 0;

    for (index, ch) in template.char_indices() {
        match ch {
            '{' => match open {
                Some(_) => {
                    if !poisoned {
                        errors.push(TemplateSyntaxError::new(
                            SyntaxErrorKind::NestedDelimiter,
                            index,
                        ));
                        poisoned = true;
                    }
                    depth += 1;
                }
                None => {
                    if literal_start < index {
                        segments.push(Segment::Literal(&template[literal_start..index]));
                    }
                    open = Some(index);
                }
            },
            '}' if depth > 0 => depth -= 1,
            '}' if poisoned => {
                open = None;
                poisoned = false;
                literal_start = index + 1;
            }
            '}' => match open.take() {
                None => errors.push(TemplateSyntaxError::new(
                    SyntaxErrorKind::UnexpectedClosingDelimiter,
                    index,
                )),
                Some(start) => {
                    let name = &template[start + 1..index];
                    if name.is_empty() {
                        errors.push(TemplateSyntaxError::new(
                            SyntaxErrorKind::EmptyVariable,
                            start,
                        ));
                    } else if !is_valid_name(name) {
                        errors.push(TemplateSyntaxError::new(
                            SyntaxErrorKind::InvalidVariableName(name.to_string()),
                            start,
                        ));
                    } else {
                        segments.push(Segment::Variable {
                            name,
                            position: start,
                        });
                    }
                    literal_start = index + 1;
                }
            },
            _ => {}
        }
    }

    if let Some(start) = open {
        errors.push(TemplateSyntaxError::new(
            SyntaxErrorKind::UnclosedDelimiter,
            start,
        ));
    } else if literal_start < template.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    (segments, errors)
}

fn name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // Matches a whole variable name, e.g. feature or _spec_id2
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex"))
}
