//! FILENAME: core/parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for one expression segment.
//! CONTEXT: After the Lexer tokenizes a segment, the Parser converts those
//! tokens into this tree. The expansion pass (`expand.rs`) then turns the tree
//! into the flat list of variable groups for one table axis.
//!
//! SUPPORTED EXPRESSIONS:
//! - Variables: q1, a1_2, wave.2020
//! - Nesting (drill-down): q1 > q2 > q3
//! - Stacking: q1 + q2
//! - Parenthesized alternatives: (q1 + q2) > q3

/// Represents a parsed expression segment.
#[derive(Debug, PartialEq, Clone)]
pub enum GroupExpr {
    /// A single variable reference.
    Variable(String),

    /// A drill-down chain `a > b > c`. Always holds at least two items.
    Nest(Vec<GroupExpr>),

    /// Independent groups stacked side by side `a + b`. Always holds at least two items.
    Add(Vec<GroupExpr>),

    /// A parenthesized sub-expression. Inside a `Nest` it is a multi-valued slot
    /// when it contains an `Add`.
    Group(Box<GroupExpr>),
}

impl GroupExpr {
    pub fn variable(name: impl Into<String>) -> Self {
        GroupExpr::Variable(name.into())
    }

    /// Every variable referenced by the expression, left to right, duplicates included.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            GroupExpr::Variable(name) => out.push(name),
            GroupExpr::Nest(items) | GroupExpr::Add(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
            GroupExpr::Group(inner) => inner.collect_variables(out),
        }
    }
}

impl std::fmt::Display for GroupExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupExpr::Variable(name) => write!(f, "{}", name),
            GroupExpr::Nest(items) => write_joined(f, items, " > "),
            GroupExpr::Add(items) => write_joined(f, items, " + "),
            GroupExpr::Group(inner) => write!(f, "({})", inner),
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    items: &[GroupExpr],
    separator: &str,
) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
