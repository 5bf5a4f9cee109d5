//! Shared harness: a scripted collaborator that records every request.
#![allow(dead_code)]

use azalea_lang::error::RuntimeResult;
use azalea_lang::evaluator::collaborator::{
    Collaborator, CollaboratorError, CollaboratorResult, Completion,
};
use azalea_lang::evaluator::renderer::RecordingRenderer;
use azalea_lang::evaluator::value::Value;
use azalea_lang::{EvalConfig, Interpreter, Program};
use std::collections::VecDeque;

/// A request as the interpreter made it.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GenerateFunction {
        name: String,
        params: Vec<String>,
        description: String,
    },
    OptimizeBlock(String),
    Process {
        instruction: String,
        context: String,
    },
    GenerateModule(String),
    RagSearch {
        query: String,
        facts: Vec<String>,
    },
    Inspect(Value),
}

/// Answers every operation from one queue, in order.
#[derive(Debug, Default)]
pub struct MockCollaborator {
    responses: VecDeque<Completion>,
    pub requests: Vec<Request>,
}

impl MockCollaborator {
    pub fn new(responses: &[&str]) -> Self {
        MockCollaborator {
            responses: responses.iter().map(|r| Completion::from(*r)).collect(),
            requests: Vec::new(),
        }
    }

    pub fn push(&mut self, response: impl Into<Completion>) {
        self.responses.push_back(response.into());
    }

    fn answer(&mut self, request: Request, operation: &'static str) -> CollaboratorResult {
        self.requests.push(request);
        self.responses
            .pop_front()
            .ok_or(CollaboratorError::Exhausted(operation))
    }
}

impl Collaborator for MockCollaborator {
    fn generate_function(
        &mut self,
        name: &str,
        params: &[String],
        description: &str,
    ) -> CollaboratorResult {
        let request = Request::GenerateFunction {
            name: name.to_string(),
            params: params.to_vec(),
            description: description.to_string(),
        };
        self.answer(request, "generate_function")
    }

    fn optimize_block(&mut self, source: &str) -> CollaboratorResult {
        self.answer(Request::OptimizeBlock(source.to_string()), "optimize_block")
    }

    fn process(&mut self, instruction: &str, context: &str) -> CollaboratorResult {
        let request = Request::Process {
            instruction: instruction.to_string(),
            context: context.to_string(),
        };
        self.answer(request, "process")
    }

    fn generate_module(&mut self, name: &str) -> CollaboratorResult {
        self.answer(Request::GenerateModule(name.to_string()), "generate_module")
    }

    fn rag_search(&mut self, query: &str, facts: &[String]) -> CollaboratorResult {
        let request = Request::RagSearch {
            query: query.to_string(),
            facts: facts.to_vec(),
        };
        self.answer(request, "rag_search")
    }

    fn inspect(&mut self, value: &Value) -> CollaboratorResult {
        self.answer(Request::Inspect(value.clone()), "inspect")
    }
}

pub type TestInterpreter = Interpreter<MockCollaborator, RecordingRenderer>;

/// An interpreter that neither echoes output nor asks for fixes.
pub fn interpreter(responses: &[&str]) -> TestInterpreter {
    Interpreter::with_config(
        MockCollaborator::new(responses),
        RecordingRenderer::new(),
        EvalConfig::quiet(),
    )
}

pub fn parse(source: &str) -> Program {
    azalea_lang::compile(source).expect("source should compile")
}

/// Compile and evaluate `source`, returning the interpreter for inspection.
pub fn run_with(source: &str, responses: &[&str]) -> (TestInterpreter, RuntimeResult<()>) {
    let program = parse(source);
    let mut interpreter = interpreter(responses);
    let result = interpreter.evaluate(&program);
    (interpreter, result)
}

/// Output of a program that must succeed without the collaborator.
pub fn output_of(source: &str) -> Vec<String> {
    let (interpreter, result) = run_with(source, &[]);
    if let Err(error) = result {
        panic!("program failed: {error}\noutput: {:?}", interpreter.output());
    }
    interpreter.output().to_vec()
}
