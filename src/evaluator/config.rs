//! Interpreter configuration.

/// Default limit on nested function and macro calls.
///
/// Every Azalea call costs a stack of nested `execute`/`evaluate_expr` Rust
/// frames, so the limit has to trip well before a 2 MiB thread stack runs out
/// in a debug build.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Configuration for interpreter behavior.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Ask the collaborator for a fix after an unhandled runtime error
    pub suggest_fixes: bool,
    /// Print output lines to stdout as they are produced
    pub echo_output: bool,
    /// Maximum nesting of function and macro calls
    pub max_call_depth: usize,
    /// Instruction used by an `ai` statement that names none
    pub default_instruction: String,
}

impl EvalConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        EvalConfig {
            suggest_fixes: true,
            echo_output: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            default_instruction: "Improve this code".to_string(),
        }
    }

    /// No fix suggestions and no echo; useful for embedding and tests.
    pub fn quiet() -> Self {
        EvalConfig {
            suggest_fixes: false,
            ..Self::new()
        }
    }

    pub fn with_suggest_fixes(mut self, suggest_fixes: bool) -> Self {
        self.suggest_fixes = suggest_fixes;
        self
    }

    pub fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_default_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.default_instruction = instruction.into();
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new()
    }
}
