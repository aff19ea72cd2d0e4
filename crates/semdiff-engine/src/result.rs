//! Hierarchical result of a function comparison.

use crate::coupling::Coupling;
use serde::Serialize;
use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

/// Verdict of a comparison. Variants are ordered by severity, which is what
/// [`DiffResult::add_inner`] uses to aggregate children into their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultKind {
    None,
    EqualSyntax,
    Equal,
    EqualUnderAssumptions,
    NotEqual,
    Unknown,
    Error,
    Timeout,
}

impl ResultKind {
    pub fn is_equal(self) -> bool {
        matches!(
            self,
            ResultKind::EqualSyntax | ResultKind::Equal | ResultKind::EqualUnderAssumptions
        )
    }
}

impl Display for ResultKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::None => "NONE",
            ResultKind::EqualSyntax => "EQUAL_SYNTAX",
            ResultKind::Equal => "EQUAL",
            ResultKind::EqualUnderAssumptions => "EQUAL_UNDER_ASSUMPTIONS",
            ResultKind::NotEqual => "NOT_EQUAL",
            ResultKind::Unknown => "UNKNOWN",
            ResultKind::Error => "ERROR",
            ResultKind::Timeout => "TIMEOUT",
        };
        f.write_str(name)
    }
}

/// A node of the result tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub kind: ResultKind,
    pub first_name: String,
    pub second_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_text: Option<String>,
    /// Couplings with a non-zero diff that were assumed to reach an
    /// `EqualUnderAssumptions` verdict.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub used_assumptions: Vec<Coupling>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DiffResult>,
}

impl DiffResult {
    pub fn new(kind: ResultKind, first_name: impl Into<String>, second_name: impl Into<String>) -> Self {
        Self {
            kind,
            first_name: first_name.into(),
            second_name: second_name.into(),
            first_file: None,
            second_file: None,
            diff_text: None,
            used_assumptions: vec![],
            children: vec![],
        }
    }

    pub fn with_files(mut self, first: impl Into<PathBuf>, second: impl Into<PathBuf>) -> Self {
        self.first_file = Some(first.into());
        self.second_file = Some(second.into());
        self
    }

    /// Appends a sub-comparison the verdict of this node depends on. The node
    /// takes the kind of the child when it has none yet or when the child is
    /// more severe; children of kind `None` never change it.
    pub fn add_inner(&mut self, child: DiffResult) {
        if child.kind != ResultKind::None
            && (self.kind == ResultKind::None || child.kind > self.kind)
        {
            self.kind = child.kind;
        }
        self.children.push(child);
    }

    /// Appends a child without touching the kind of this node.
    pub fn attach(&mut self, child: DiffResult) {
        self.children.push(child);
    }

    /// Display name of the compared pair.
    pub fn display_name(&self) -> String {
        if self.first_name == self.second_name {
            self.first_name.clone()
        } else {
            format!("{} and {}", self.first_name, self.second_name)
        }
    }

    /// Renders the tree, one indented line per node.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Writes the node at `depth`. Every line but the first starts with a
    /// newline, so the output has no trailing one.
    fn fmt_at(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}{}: {}", self.display_name(), self.kind)?;
        if !self.used_assumptions.is_empty() {
            write!(f, "\n{indent}  Used assumptions:")?;
            for coupling in &self.used_assumptions {
                write!(
                    f,
                    "\n{indent}    Functions {} and {} are same",
                    coupling.first, coupling.second
                )?;
            }
        }
        if let Some(diff) = &self.diff_text {
            write!(f, "\n{indent}  {{{{{{")?;
            for line in diff.lines() {
                write!(f, "\n{indent}  {line}")?;
            }
            write!(f, "\n{indent}  }}}}}}")?;
        }
        for child in &self.children {
            f.write_str("\n")?;
            child.fmt_at(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Display for DiffResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, 0)
    }
}
