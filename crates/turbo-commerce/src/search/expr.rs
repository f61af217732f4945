//! Boolean search expressions and the tag directive parser.
//!
//! Expressions render to the storefront search grammar:
//! `field:"value"`, `field:value*`, `field:>=n`, `field:<=n`, `AND`, `OR`
//! and parenthesized groups.

use std::fmt;

/// Comparison operator for range clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `>=`
    Gte,
    /// `<=`
    Lte,
}

impl CmpOp {
    fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Gte => ">=",
            CmpOp::Lte => "<=",
        }
    }
}

/// A search expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Exact match on a quoted string value.
    Eq { field: &'static str, value: String },
    /// Boolean flag match.
    Flag { field: &'static str, value: bool },
    /// Prefix match (`field:value*`).
    Prefix { field: &'static str, value: String },
    /// Numeric comparison.
    Cmp {
        field: &'static str,
        op: CmpOp,
        value: String,
    },
    /// Conjunction.
    And(Vec<Expr>),
    /// Disjunction.
    Or(Vec<Expr>),
}

impl Expr {
    /// Exact-match clause.
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Expr::Eq {
            field,
            value: value.into(),
        }
    }

    /// Conjunction of `exprs`, flattening nested conjunctions and
    /// collapsing a single operand.
    pub fn and(exprs: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                Expr::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Expr::And(flat)
        }
    }

    /// Disjunction of `exprs`, collapsing a single operand.
    pub fn or(mut exprs: Vec<Expr>) -> Self {
        if exprs.len() == 1 {
            exprs.remove(0)
        } else {
            Expr::Or(exprs)
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_))
    }

    fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[Expr], sep: &str) -> fmt::Result {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            if expr.is_compound() {
                write!(f, "({})", expr)?;
            } else {
                write!(f, "{}", expr)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Eq { field, value } => write!(f, "{}:\"{}\"", field, escape(value)),
            Expr::Flag { field, value } => write!(f, "{}:{}", field, value),
            Expr::Prefix { field, value } => write!(f, "{}:{}*", field, escape_term(value)),
            Expr::Cmp { field, op, value } => write!(f, "{}:{}{}", field, op.as_str(), value),
            Expr::And(exprs) => Self::write_joined(f, exprs, " AND "),
            Expr::Or(exprs) => Self::write_joined(f, exprs, " OR "),
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Backslash-escape an unquoted term so it stays a single token: spaces,
/// field separators, grouping and wildcards lose their grammar meaning.
fn escape_term(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_whitespace() || matches!(c, '\\' | ':' | '(' | ')' | '"' | '*') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Parse a tag directive into an expression over `field`.
///
/// ```text
/// directive    := segment ("," segment)*
/// segment      := alternatives    (final non-empty segment)
///               | tag             (any other segment, pipes literal)
/// alternatives := tag ("|" tag)*
/// ```
///
/// Commas conjoin. A pipe only means OR inside the final segment, so
/// `"a,b|c"` is `a AND (b OR c)` while `"a|b,c"` is the literal tag `a|b`
/// AND `c`. Returns `None` when the directive names no tags.
pub fn parse_tags(field: &'static str, input: &str) -> Option<Expr> {
    let mut parser = TagParser {
        field,
        rest: input,
        clauses: Vec::new(),
    };
    parser.directive();
    if parser.clauses.is_empty() {
        None
    } else {
        Some(Expr::and(parser.clauses))
    }
}

struct TagParser<'a> {
    field: &'static str,
    rest: &'a str,
    clauses: Vec<Expr>,
}

impl<'a> TagParser<'a> {
    fn directive(&mut self) {
        while !self.rest.is_empty() {
            let segment = self.next_segment();
            if segment.trim().is_empty() {
                continue;
            }
            let clause = if self.at_final_segment() {
                self.alternatives(segment)
            } else {
                Some(self.tag(segment))
            };
            self.clauses.extend(clause);
        }
    }

    fn next_segment(&mut self) -> &'a str {
        match self.rest.split_once(',') {
            Some((segment, rest)) => {
                self.rest = rest;
                segment
            }
            None => std::mem::take(&mut self.rest),
        }
    }

    /// True when nothing but separators and whitespace remains.
    fn at_final_segment(&self) -> bool {
        self.rest.chars().all(|c| c == ',' || c.is_whitespace())
    }

    fn alternatives(&self, segment: &str) -> Option<Expr> {
        let tags: Vec<Expr> = segment
            .split('|')
            .filter(|t| !t.trim().is_empty())
            .map(|t| self.tag(t))
            .collect();
        if tags.is_empty() {
            None
        } else {
            Some(Expr::or(tags))
        }
    }

    fn tag(&self, raw: &str) -> Expr {
        Expr::eq(self.field, raw.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(input: &str) -> String {
        parse_tags("tag", input).map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_single_tag() {
        assert_eq!(tags("brushes"), "tag:\"brushes\"");
    }

    #[test]
    fn test_commas_conjoin_in_order() {
        assert_eq!(tags("a,b,c"), "tag:\"a\" AND tag:\"b\" AND tag:\"c\"");
    }

    #[test]
    fn test_pipe_scoped_to_final_segment() {
        assert_eq!(tags("a,b|c"), "tag:\"a\" AND (tag:\"b\" OR tag:\"c\")");
        assert_eq!(
            parse_tags("tag", "a,b|c"),
            Some(Expr::And(vec![
                Expr::eq("tag", "a"),
                Expr::Or(vec![Expr::eq("tag", "b"), Expr::eq("tag", "c")]),
            ]))
        );
    }

    #[test]
    fn test_pipe_in_earlier_segment_is_literal() {
        assert_eq!(tags("a|b,c"), "tag:\"a|b\" AND tag:\"c\"");
    }

    #[test]
    fn test_lone_disjunction() {
        assert_eq!(tags("b|c"), "tag:\"b\" OR tag:\"c\"");
    }

    #[test]
    fn test_whitespace_and_empty_segments() {
        assert_eq!(tags(" a , ,b | c ,"), "tag:\"a\" AND (tag:\"b\" OR tag:\"c\")");
        assert_eq!(tags("a,|"), "tag:\"a\"");
        assert!(parse_tags("tag", " , ").is_none());
        assert!(parse_tags("tag", "").is_none());
    }

    #[test]
    fn test_values_are_escaped() {
        assert_eq!(tags("say \"hi\""), "tag:\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_nested_rendering() {
        let expr = Expr::or(vec![
            Expr::and(vec![Expr::eq("vendor", "x"), Expr::eq("tag", "y")]),
            Expr::Flag {
                field: "available_for_sale",
                value: true,
            },
        ]);
        assert_eq!(
            expr.to_string(),
            "(vendor:\"x\" AND tag:\"y\") OR available_for_sale:true"
        );
    }
}
