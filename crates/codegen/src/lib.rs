//! # Azalea Code Generation
//!
//! Text emitters that translate a parsed Azalea program into other
//! languages:
//!
//! - [`wat`]: a WebAssembly text module over `i32` values, with imported
//!   host functions for logging and UI primitives.
//! - [`cpp`]: a C++ translation unit with console stubs for the UI
//!   primitives.
//!
//! Both emitters skip the AI statements, which only have meaning at run time.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let program = azalea_lang::compile("fn main():\n    print(1 + 2)\n")?;
//! let wat = azalea_codegen::emit_wat(&program)?;
//! let cpp = azalea_codegen::emit_cpp(&program)?;
//! ```

pub mod cpp;
pub mod error;
pub mod wat;

pub use cpp::{emit_cpp, CppEmitter};
pub use error::{CodegenError, CodegenResult};
pub use wat::{emit_wat, WatEmitter};

use azalea_lang::Program;

/// Output language of an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Wat,
    Cpp,
}

impl Target {
    /// Conventional file extension for the target's output.
    pub fn extension(self) -> &'static str {
        match self {
            Target::Wat => "wat",
            Target::Cpp => "cpp",
        }
    }
}

/// Emit `program` for the given target.
pub fn emit(program: &Program, target: Target) -> CodegenResult<String> {
    match target {
        Target::Wat => emit_wat(program),
        Target::Cpp => emit_cpp(program),
    }
}
