use crate::compile::{CompiledExpr, DefinitionCompiler};
use crate::defs;
use crate::entity::{Entity, EntityKind};
use crate::error::CompileError;

/// A named relational program.
///
/// Like a function, plus a signature string: the definition head up to the
/// matching `)`, kept for display and persistence.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    hidden: bool,
    def: String,
    signature: String,
    arg_count: usize,
    compiled: CompiledExpr,
}

impl Program {
    pub fn from_def(def: &str, compiler: &dyn DefinitionCompiler) -> Result<Self, CompileError> {
        let name = defs::base_name(def);
        if name.is_empty() {
            return Err(CompileError::new(format!(
                "program definition has no name: {def:?}"
            )));
        }
        let compiled = compiler.compile(def)?;
        Ok(Self {
            name: name.to_string(),
            hidden: false,
            def: def.to_string(),
            signature: defs::signature(def),
            arg_count: defs::argument_count(def),
            compiled,
        })
    }

    /// The canonical textual definition.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.def
    }

    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    #[must_use]
    pub fn compiled(&self) -> &CompiledExpr {
        &self.compiled
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

impl Entity for Program {
    fn kind() -> EntityKind {
        EntityKind::Program
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
