//! Typed parameter binding
//!
//! Turns a [`QueryTemplate`], its typed parameters and a page into a
//! [`BoundStatement`] ready for the store: the pagination clause is appended,
//! `?` placeholders are numbered for PostgreSQL and the page size and offset
//! become the last two parameters.

use bridge_traits::database::{BoundStatement, Parameter};

use crate::error::BindError;
use crate::pagination::PageRequest;
use crate::templates::QueryTemplate;

/// Appended to every template before binding
pub const PAGINATION_SUFFIX: &str = " LIMIT ? OFFSET ?";

/// Number of parameters the pagination clause adds
const PAGINATION_PARAMS: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Rewrite `?` placeholders to `$1..$n` in textual order.
///
/// Question marks inside string literals, quoted identifiers and comments are
/// left alone. Returns the rewritten SQL and the number of placeholders.
pub fn rewrite_placeholders(sql: &str) -> (String, usize) {
    let mut out = String::with_capacity(sql.len() + 16);
    let mut count = 0;
    let mut state = Scan::Code;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Code => match c {
                '?' => {
                    count += 1;
                    out.push('$');
                    out.push_str(&count.to_string());
                    continue;
                }
                '\'' => state = Scan::SingleQuoted,
                '"' => state = Scan::DoubleQuoted,
                '-' if chars.peek() == Some(&'-') => state = Scan::LineComment,
                '/' if chars.peek() == Some(&'*') => state = Scan::BlockComment,
                _ => {}
            },
            // A doubled quote closes and immediately reopens, which is
            // exactly the escape rule.
            Scan::SingleQuoted if c == '\'' => state = Scan::Code,
            Scan::DoubleQuoted if c == '"' => state = Scan::Code,
            Scan::LineComment if c == '\n' => state = Scan::Code,
            Scan::BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                out.push(c);
                if let Some(slash) = chars.next() {
                    out.push(slash);
                }
                state = Scan::Code;
                continue;
            }
            _ => {}
        }
        out.push(c);
    }

    (out, count)
}

/// Bind a template for one page.
///
/// The bound parameter list is `params` in declaration order, then
/// `Int32(page_size)`, then `Int32(offset)`.
///
/// # Errors
///
/// - `BindError::ArityMismatch` if `params.len()` differs from the template arity
/// - `BindError::PlaceholderMismatch` if the SQL does not carry `arity` placeholders
/// - `BindError::OffsetOverflow` / `LimitOverflow` if the page does not fit `i32`
pub fn bind(
    template: &QueryTemplate,
    params: &[Parameter],
    page: PageRequest,
) -> Result<BoundStatement, BindError> {
    if params.len() != template.arity {
        return Err(BindError::ArityMismatch {
            template: template.name,
            expected: template.arity,
            actual: params.len(),
        });
    }

    let limit = page.limit()?;
    let offset = page.offset()?;

    let mut text = String::with_capacity(template.sql.len() + PAGINATION_SUFFIX.len());
    text.push_str(template.sql.trim_end());
    text.push_str(PAGINATION_SUFFIX);

    let (sql, found) = rewrite_placeholders(&text);
    let expected = template.arity + PAGINATION_PARAMS;
    if found != expected {
        return Err(BindError::PlaceholderMismatch {
            template: template.name,
            expected,
            found,
        });
    }

    let mut bound = Vec::with_capacity(expected);
    bound.extend_from_slice(params);
    bound.push(Parameter::Int32(limit));
    bound.push(Parameter::Int32(offset));

    Ok(BoundStatement::new(sql, bound))
}
