use serde::{Deserialize, Serialize};
use std::fmt;

/// Procedure identity used to match call sites against local declarations
///
/// The owner takes part in equality, so `A.run()` and `B.run()` never collide;
/// the rendered form (`Display`) omits it to keep cluster labels short.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcedureSignature {
    #[serde(default)]
    pub owner: Option<String>,
    pub name: String,
    pub parameter_types: Vec<String>,
    /// `None` renders as `null` (constructors, `void`)
    #[serde(default)]
    pub return_type: Option<String>,
}

impl ProcedureSignature {
    pub fn new(
        name: impl Into<String>,
        parameter_types: impl IntoIterator<Item = impl Into<String>>,
        return_type: Option<&str>,
    ) -> Self {
        Self {
            owner: None,
            name: name.into(),
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
            return_type: return_type.map(str::to_string),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    /// `Owner.name <types> -> ret`
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}.{self}"),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for ProcedureSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> -> {}",
            self.name,
            self.parameter_types.join(","),
            self.return_type.as_deref().unwrap_or("null")
        )
    }
}
