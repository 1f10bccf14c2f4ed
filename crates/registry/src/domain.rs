use crate::compile::{CompiledExpr, DefinitionCompiler};
use crate::defs;
use crate::entity::{Entity, EntityKind};
use crate::error::CompileError;
use serde::{Deserialize, Serialize};

/// How a domain combines its two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    Product,
    Sum,
}

/// A typed domain: two component expressions under a product or sum tag.
#[derive(Debug, Clone)]
pub struct Domain {
    name: String,
    hidden: bool,
    kind: DomainKind,
    first: String,
    second: String,
    compiled_first: CompiledExpr,
    compiled_second: CompiledExpr,
}

impl Domain {
    /// Build from structured fields, compiling both components.
    pub fn new(
        name: impl Into<String>,
        kind: DomainKind,
        first: impl Into<String>,
        second: impl Into<String>,
        compiler: &dyn DefinitionCompiler,
    ) -> Result<Self, CompileError> {
        let first = first.into();
        let second = second.into();
        let compiled_first = compiler.compile(&first)?;
        let compiled_second = compiler.compile(&second)?;
        Ok(Self {
            name: name.into(),
            hidden: false,
            kind,
            first,
            second,
            compiled_first,
            compiled_second,
        })
    }

    /// Build from a textual definition `Name = First x Second` or
    /// `Name = First + Second`.
    pub fn from_def(def: &str, compiler: &dyn DefinitionCompiler) -> Result<Self, CompileError> {
        let (name, kind, first, second) = defs::split_domain_def(def)
            .ok_or_else(|| CompileError::new(format!("malformed domain definition: {def:?}")))?;
        Self::new(name, kind, first, second, compiler)
    }

    #[must_use]
    pub fn domain_kind(&self) -> DomainKind {
        self.kind
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    #[must_use]
    pub fn compiled_first(&self) -> &CompiledExpr {
        &self.compiled_first
    }

    #[must_use]
    pub fn compiled_second(&self) -> &CompiledExpr {
        &self.compiled_second
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

impl Entity for Domain {
    fn kind() -> EntityKind {
        EntityKind::Domain
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn hidden(&self) -> bool {
        self.hidden
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::NoopCompiler;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_def_extracts_all_parts() {
        let dom = Domain::from_def("Pairs = States x Labels", &NoopCompiler).unwrap();
        assert_eq!(dom.name(), "Pairs");
        assert_eq!(dom.domain_kind(), DomainKind::Product);
        assert_eq!(dom.first(), "States");
        assert_eq!(dom.second(), "Labels");
    }

    #[test]
    fn malformed_def_reports_a_message() {
        let err = Domain::from_def("nonsense", &NoopCompiler).unwrap_err();
        assert!(err.message.contains("malformed domain definition"));
    }
}
