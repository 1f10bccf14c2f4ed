use crate::compile::{CompiledExpr, DefinitionCompiler};
use crate::defs;
use crate::entity::{Entity, EntityKind};
use crate::error::CompileError;

/// A named relational function.
///
/// The canonical definition stays as written; the name and argument count
/// are extracted from its head by lightweight scanning.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    hidden: bool,
    def: String,
    arg_count: usize,
    local: bool,
    compiled: CompiledExpr,
}

impl Function {
    pub fn from_def(def: &str, compiler: &dyn DefinitionCompiler) -> Result<Self, CompileError> {
        let name = defs::base_name(def);
        if name.is_empty() {
            return Err(CompileError::new(format!(
                "function definition has no name: {def:?}"
            )));
        }
        let compiled = compiler.compile(def)?;
        Ok(Self {
            name: name.to_string(),
            hidden: false,
            def: def.to_string(),
            arg_count: defs::argument_count(def),
            local: false,
            compiled,
        })
    }

    /// The canonical textual definition.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.def
    }

    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Local functions exist only inside an evaluation and never persist.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn set_local(&mut self, local: bool) {
        self.local = local;
    }

    #[must_use]
    pub fn compiled(&self) -> &CompiledExpr {
        &self.compiled
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

impl Entity for Function {
    fn kind() -> EntityKind {
        EntityKind::Function
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
    fn from_def_extracts_name_and_arity() {
        let fun = Function::from_def("compose(R, S) = R * S", &NoopCompiler).unwrap();
        assert_eq!(fun.name(), "compose");
        assert_eq!(fun.arg_count(), 2);
        assert_eq!(fun.definition(), "compose(R, S) = R * S");
        assert!(!fun.is_local());
    }

    #[test]
    fn zero_argument_head() {
        let fun = Function::from_def("top() = L", &NoopCompiler).unwrap();
        assert_eq!(fun.arg_count(), 0);
    }

    #[test]
    fn nameless_def_is_rejected() {
        assert!(Function::from_def("(x) = x", &NoopCompiler).is_err());
    }
}
