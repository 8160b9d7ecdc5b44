//! Key Predicate Expressions
//!
//! Queries arrive as a URL path segment in conjunctive normal form:
//! `/`-separated clauses are AND-ed, `,`-separated terms within a clause are
//! OR-ed, and a `~` prefix negates a term. `a,b/~c` reads as
//! `(a OR b) AND (NOT c)`. The parsed form rides inside the iteration job
//! spec, so it must serialize.

use serde::{Deserialize, Serialize};

/// One term of a clause, optionally negated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Literal {
    pub term: String,
    #[serde(default)]
    pub negated: bool,
}

/// A disjunction of literals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

/// A conjunction of clauses: the full boolean expression over keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

impl Predicate {
    /// Parses the wire form described in the module docs.
    ///
    /// Empty expressions, empty clauses (`a//b`) and empty terms (`a,`) are
    /// rejected rather than treated as vacuous matches.
    pub fn parse(expr: &str) -> Result<Self, String> {
        if expr.is_empty() {
            return Err("empty query expression".to_string());
        }

        let mut clauses = Vec::new();
        for clause_expr in expr.split('/') {
            if clause_expr.is_empty() {
                return Err(format!("empty clause in query expression: {}", expr));
            }

            let mut literals = Vec::new();
            for term_expr in clause_expr.split(',') {
                let (negated, term) = match term_expr.strip_prefix('~') {
                    Some(rest) => (true, rest),
                    None => (false, term_expr),
                };

                if term.is_empty() {
                    return Err(format!("empty term in clause: {}", clause_expr));
                }

                literals.push(Literal {
                    term: term.to_string(),
                    negated,
                });
            }

            clauses.push(Clause { literals });
        }

        Ok(Self { clauses })
    }

    /// Evaluates the predicate against a record key.
    ///
    /// True iff every clause contains at least one satisfied literal.
    pub fn matches(&self, key: &str) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .literals
                .iter()
                .any(|literal| (literal.term == key) != literal.negated)
        })
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for (j, literal) in clause.literals.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                if literal.negated {
                    f.write_str("~")?;
                }
                f.write_str(&literal.term)?;
            }
        }
        Ok(())
    }
}
