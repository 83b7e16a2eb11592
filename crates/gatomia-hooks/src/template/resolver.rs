//! Template resolution against a variable context

use tracing::debug;

use super::catalog::TemplateCatalog;
use super::parser::{self, Segment};
use crate::error::{HooksError, Result};
use crate::types::VariableContext;

/// Replace every reference in `template` with its context value
///
/// Supplied values are substituted whether or not the variable is in scope for the
/// firing operation. An unsupplied variable resolves to an empty string unless the
/// catalog marks it required, in which case resolution fails with
/// [`HooksError::MissingVariable`] naming the first such variable.
pub fn resolve(
    template: &str,
    context: &VariableContext,
    catalog: &TemplateCatalog,
) -> Result<String> {
    let segments = parser::parse(template)?;
    let mut resolved = String::with_capacity(template.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => resolved.push_str(text),
            Segment::Variable { name, .. } => match context.get(name) {
                Some(value) => resolved.push_str(value),
                None if catalog.is_required(name) => {
                    debug!(variable = %name, "Required template variable missing");
                    return Err(HooksError::MissingVariable(name.to_string()));
                }
                None => {
                    debug!(variable = %name, "Optional template variable missing, using empty value");
                }
            },
        }
    }

    Ok(resolved)
}
