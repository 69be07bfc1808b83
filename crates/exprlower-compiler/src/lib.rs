//! exprlower Compiler
//!
//! Type inference and lowering of embedded-language expression trees to
//! host-language source.
//!
//! ## Architecture
//!
//! - **Inference**: a tree of computation states walks the expression once,
//!   pushing expected types down and merging resolved types into one table
//! - **Lowering**: each node is emitted inline where possible and hoisted into
//!   synthetic locals, blocks or function literals where not
//!
//! ## Modules
//!
//! - [`compiler`]: entry points combining both passes
//! - [`config`]: names and formatting of generated code
//! - [`context`]: the collaborators of one lowering run
//! - [`expr`]: the expression compiler
//! - [`inference`]: the state tree and typing rules
//! - [`keywords`]: host reserved words
//! - [`oracle`]: collaborator contracts and their defaults
//! - [`output`]: the scoped text sink
//! - [`registry`]: a class hierarchy answering type questions
//! - [`serializer`]: type references as host source
//! - [`type_resolver`]: type syntax to type references

pub mod compiler;
pub mod config;
pub mod context;
pub mod expr;
pub mod inference;
pub mod keywords;
pub mod oracle;
pub mod output;
pub mod registry;
pub mod serializer;
pub mod type_resolver;

pub use compiler::{Compiler, MethodSignature};
pub use config::CompilerConfig;
pub use context::CompilationContext;
pub use expr::{ExprCompiler, NamingSubject};
pub use inference::{ResolvedTypesSnapshot, TypeExpectation, TypeResolver};
pub use oracle::{
    CheckedExceptions, EarlyExitOracle, ExceptionOracle, InferredTypeProvider, NameProvider,
    SimpleNameProvider, StructuralEarlyExit, TypeOracle, TypeProvider,
};
pub use output::{NameKey, TraceRegion, TreeAppendable};
pub use registry::{ClassDecl, TypeRegistry};

// Re-export CompilationError from core for convenience
pub use exprlower_core::CompilationError;
