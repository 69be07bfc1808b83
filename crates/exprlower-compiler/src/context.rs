//! CompilationContext - the collaborators of one lowering run.

use crate::config::CompilerConfig;
use crate::oracle::{EarlyExitOracle, ExceptionOracle, NameProvider, TypeOracle, TypeProvider};

/// Everything the expression compiler consults, passed explicitly.
#[derive(Clone, Copy)]
pub struct CompilationContext<'a> {
    pub types: &'a dyn TypeProvider,
    pub early_exits: &'a dyn EarlyExitOracle,
    pub exceptions: &'a dyn ExceptionOracle,
    pub type_oracle: &'a dyn TypeOracle,
    pub names: &'a dyn NameProvider,
    pub config: &'a CompilerConfig,
}

impl<'a> CompilationContext<'a> {
    pub fn new(
        types: &'a dyn TypeProvider,
        early_exits: &'a dyn EarlyExitOracle,
        exceptions: &'a dyn ExceptionOracle,
        type_oracle: &'a dyn TypeOracle,
        names: &'a dyn NameProvider,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            types,
            early_exits,
            exceptions,
            type_oracle,
            names,
            config,
        }
    }
}
