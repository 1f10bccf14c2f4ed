use crate::error::CompileError;

/// Opaque compiled form of a textual definition.
///
/// The core never interprets it; it is produced by the scripting runtime
/// behind [`DefinitionCompiler`] and carried alongside the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExpr(String);

impl CompiledExpr {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Boundary to the embedded scripting runtime.
///
/// Consumes a definition string and returns the compiled form or a
/// structured error carrying the human-readable message.
pub trait DefinitionCompiler {
    fn compile(&self, source: &str) -> Result<CompiledExpr, CompileError>;
}

/// Pass-through compiler; accepts any non-blank definition verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompiler;

impl DefinitionCompiler for NoopCompiler {
    fn compile(&self, source: &str) -> Result<CompiledExpr, CompileError> {
        if source.trim().is_empty() {
            return Err(CompileError::new("empty definition"));
        }
        Ok(CompiledExpr::new(source))
    }
}
