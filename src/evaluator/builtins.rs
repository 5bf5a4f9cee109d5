use super::collaborator::Collaborator;
use super::renderer::Renderer;
use super::value::{Environment, Value};
use super::Interpreter;
use crate::debug_log;
use crate::error::RuntimeResult;

/// Functions provided by the host, stored in the global scope under their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Box,
    Text,
    Button,
    AiAsk,
    AiRemember,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Print,
        Builtin::Box,
        Builtin::Text,
        Builtin::Button,
        Builtin::AiAsk,
        Builtin::AiRemember,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Box => "box",
            Builtin::Text => "text",
            Builtin::Button => "button",
            Builtin::AiAsk => "ai_ask",
            Builtin::AiRemember => "ai_remember",
        }
    }
}

/// Bind every builtin into the global frame.
pub fn install(env: &mut Environment) {
    for builtin in Builtin::ALL {
        env.define_global(builtin.name(), Value::Builtin(builtin));
    }
}

impl<C: Collaborator, R: Renderer> Interpreter<C, R> {
    pub(super) fn call_builtin(&mut self, builtin: Builtin, args: Vec<Value>) -> RuntimeResult<Value> {
        match builtin {
            Builtin::Print => {
                let line = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.emit(line);
                Ok(Value::Undefined)
            }

            Builtin::Box => {
                self.renderer.create_box();
                Ok(Value::Undefined)
            }

            Builtin::Text => {
                if let Some(content) = args.first() {
                    self.renderer.create_text(&content.to_string());
                }
                Ok(Value::Undefined)
            }

            Builtin::Button => {
                let label = args
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "Button".to_string());
                self.renderer.create_button(&label);
                Ok(Value::Undefined)
            }

            Builtin::AiAsk => {
                let question = args.first().map(ToString::to_string).unwrap_or_default();
                self.emit(format!("[AI Asking]: {question}"));
                let answer = self.collaborator.process(&question, "")?.text();
                debug_log!("ai_ask answered with {} bytes", answer.len());
                Ok(Value::Text(answer))
            }

            Builtin::AiRemember => {
                let fact = args.first().map(ToString::to_string).unwrap_or_default();
                self.emit(format!("[AI Memory]: Remembered \"{fact}\""));
                self.facts.push(fact);
                Ok(Value::Undefined)
            }
        }
    }
}
