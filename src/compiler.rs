//! Filter compiler that converts the typed AND/OR tree into a SQL restriction clause.

use thiserror::Error;

use crate::filter::{FilterNode, Operator, Scalar};

/// Compilation failure. Always caused by a malformed tree, never transient;
/// no partial clause is produced once one is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Leaf operator code outside the fixed operator table.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Node shape is neither a leaf nor an AND/OR combinator.
    #[error("invalid filter structure: {0}")]
    InvalidFilterStructure(String),
}

impl CompileError {
    pub(crate) fn invalid_structure(message: impl Into<String>) -> Self {
        CompileError::InvalidFilterStructure(message.into())
    }
}

/// Compiles filter trees into boolean restriction expressions.
///
/// Stateless, pure, and reentrant. The output is the bare expression; the
/// caller prefixes the restriction keyword (see the `statement` module).
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCompiler;

impl FilterCompiler {
    pub fn new() -> Self {
        FilterCompiler
    }

    /// Compile a filter tree. `None` means no restriction and yields the
    /// empty clause, which the caller omits entirely.
    pub fn compile(&self, filter: Option<&FilterNode>) -> Result<String, CompileError> {
        match filter {
            Some(node) => self.build_condition(node),
            None => Ok(String::new()),
        }
    }

    fn build_condition(&self, node: &FilterNode) -> Result<String, CompileError> {
        match node {
            FilterNode::Leaf { field, op, value } => self.build_leaf(field, op, value.as_ref()),
            FilterNode::And(children) => self.build_combinator(children, " AND ", "1=1"),
            FilterNode::Or(children) => self.build_combinator(children, " OR ", "1=0"),
        }
    }

    /// An empty AND restricts nothing and an empty OR matches nothing, the
    /// identity elements of the two combinators.
    fn build_combinator(
        &self,
        children: &[FilterNode],
        joiner: &str,
        identity: &str,
    ) -> Result<String, CompileError> {
        if children.is_empty() {
            return Ok(identity.to_string());
        }
        let conditions = children
            .iter()
            .map(|child| self.build_condition(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})", conditions.join(joiner)))
    }

    fn build_leaf(
        &self,
        field: &str,
        code: &str,
        value: Option<&Scalar>,
    ) -> Result<String, CompileError> {
        let op = Operator::from_code(code)
            .ok_or_else(|| CompileError::UnsupportedOperator(code.to_string()))?;

        let clause = match op {
            // Null checks ignore any supplied value.
            Operator::IsEmpty => format!("{} IS NULL", field),
            Operator::IsNotEmpty => format!("{} IS NOT NULL", field),
            Operator::Contains => {
                format!("{} LIKE '%{}%'", field, escape_pattern(required(code, value)?))
            }
            Operator::StartsWith => {
                format!("{} LIKE '{}%'", field, escape_pattern(required(code, value)?))
            }
            Operator::EndsWith => {
                format!("{} LIKE '%{}'", field, escape_pattern(required(code, value)?))
            }
            Operator::Eq => comparison(field, "=", required(code, value)?),
            Operator::Ne => comparison(field, "!=", required(code, value)?),
            Operator::Lt => comparison(field, "<", required(code, value)?),
            Operator::Le => comparison(field, "<=", required(code, value)?),
            Operator::Gt => comparison(field, ">", required(code, value)?),
            Operator::Ge => comparison(field, ">=", required(code, value)?),
        };

        Ok(clause)
    }
}

fn required<'a>(code: &str, value: Option<&'a Scalar>) -> Result<&'a Scalar, CompileError> {
    value.ok_or_else(|| {
        CompileError::invalid_structure(format!("operator `{}` requires a value", code))
    })
}

fn comparison(field: &str, symbol: &str, value: &Scalar) -> String {
    format!("{} {} {}", field, symbol, render_scalar(value))
}

/// Textual values are single-quoted with embedded quotes doubled;
/// numeric and boolean values are embedded unquoted.
fn render_scalar(value: &Scalar) -> String {
    match value {
        Scalar::Text(s) => format!("'{}'", s.replace('\'', "''")),
        other => other.to_string(),
    }
}

/// Neutralize a value for embedding inside a quoted LIKE pattern: double the
/// quote delimiter, then backslash-escape the `%` and `_` wildcards so literal
/// occurrences in the value stay literal.
fn escape_pattern(value: &Scalar) -> String {
    value
        .to_string()
        .replace('\'', "''")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
