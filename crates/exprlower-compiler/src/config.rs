//! Compiler configuration.

/// Names and formatting used when generating host code.
///
/// The helper types are looked up through the type oracle at the point of
/// use, so a configuration may name types the registry does not know; the
/// generated code then carries an inline diagnostic instead.
///
/// # Example
///
/// ```
/// use exprlower_compiler::CompilerConfig;
///
/// let config = CompilerConfig::default()
///     .with_indent("\t")
///     .with_rethrow_helper("com.acme.Sneaky");
/// assert_eq!(config.rethrow_helper, "com.acme.Sneaky");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// One level of indentation
    pub indent: String,
    /// Type whose static `sneakyThrow` rethrows checked exceptions unchecked
    pub rethrow_helper: String,
    /// Zero-argument callable with no result (`void apply()`)
    pub procedure_type: String,
    /// Zero-argument callable with one result (`R apply()`)
    pub function_type: String,
    /// Proposed name for the variable of synthesized catch clauses
    pub catch_variable: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            rethrow_helper: "exprlower.lib.Exceptions".to_string(),
            procedure_type: "exprlower.lib.Procedures$Procedure0".to_string(),
            function_type: "exprlower.lib.Functions$Function0".to_string(),
            catch_variable: "_e".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_rethrow_helper(mut self, helper: impl Into<String>) -> Self {
        self.rethrow_helper = helper.into();
        self
    }

    pub fn with_procedure_type(mut self, name: impl Into<String>) -> Self {
        self.procedure_type = name.into();
        self
    }

    pub fn with_function_type(mut self, name: impl Into<String>) -> Self {
        self.function_type = name.into();
        self
    }

    pub fn with_catch_variable(mut self, name: impl Into<String>) -> Self {
        self.catch_variable = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.indent, "  ");
        assert_eq!(config.catch_variable, "_e");
        assert!(config.function_type.ends_with("Function0"));
        assert!(config.procedure_type.ends_with("Procedure0"));
    }

    #[test]
    fn builder_overrides() {
        let config = CompilerConfig::new()
            .with_procedure_type("a.Run")
            .with_function_type("a.Call")
            .with_catch_variable("ex");
        assert_eq!(config.procedure_type, "a.Run");
        assert_eq!(config.function_type, "a.Call");
        assert_eq!(config.catch_variable, "ex");
        assert_eq!(config.rethrow_helper, CompilerConfig::default().rethrow_helper);
    }
}
