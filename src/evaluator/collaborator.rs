//! The text-generation collaborator seam.
//!
//! The interpreter only depends on [`Collaborator`]. [`PromptedCollaborator`]
//! turns each operation into a chat-style prompt and hands it to a
//! [`TextBackend`]; transports live outside this crate.

use super::value::Value;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("no scripted response left for {0}")]
    Exhausted(&'static str),

    #[error("{0}")]
    Backend(String),
}

/// Text returned by the collaborator, possibly delivered as several streamed
/// fragments. Consumers only ever look at the concatenation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    chunks: Vec<String>,
}

impl Completion {
    pub fn new() -> Self {
        Completion { chunks: Vec::new() }
    }

    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Completion {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push_chunk(&mut self, chunk: impl Into<String>) {
        self.chunks.push(chunk.into());
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn text(&self) -> String {
        self.chunks.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|c| c.is_empty())
    }
}

impl From<String> for Completion {
    fn from(text: String) -> Self {
        Completion { chunks: vec![text] }
    }
}

impl From<&str> for Completion {
    fn from(text: &str) -> Self {
        Completion::from(text.to_string())
    }
}

pub type CollaboratorResult = Result<Completion, CollaboratorError>;

/// Operations the interpreter requests from the external text generator.
pub trait Collaborator {
    fn generate_function(
        &mut self,
        name: &str,
        params: &[String],
        description: &str,
    ) -> CollaboratorResult;

    fn optimize_block(&mut self, source: &str) -> CollaboratorResult;

    fn process(&mut self, instruction: &str, context: &str) -> CollaboratorResult;

    fn generate_module(&mut self, name: &str) -> CollaboratorResult;

    fn rag_search(&mut self, query: &str, facts: &[String]) -> CollaboratorResult;

    fn inspect(&mut self, value: &Value) -> CollaboratorResult;
}

impl<T: Collaborator + ?Sized> Collaborator for Box<T> {
    fn generate_function(
        &mut self,
        name: &str,
        params: &[String],
        description: &str,
    ) -> CollaboratorResult {
        (**self).generate_function(name, params, description)
    }

    fn optimize_block(&mut self, source: &str) -> CollaboratorResult {
        (**self).optimize_block(source)
    }

    fn process(&mut self, instruction: &str, context: &str) -> CollaboratorResult {
        (**self).process(instruction, context)
    }

    fn generate_module(&mut self, name: &str) -> CollaboratorResult {
        (**self).generate_module(name)
    }

    fn rag_search(&mut self, query: &str, facts: &[String]) -> CollaboratorResult {
        (**self).rag_search(query, facts)
    }

    fn inspect(&mut self, value: &Value) -> CollaboratorResult {
        (**self).inspect(value)
    }
}

/// Which system prompt a request runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptContext {
    Coding,
    General,
}

impl PromptContext {
    pub fn system_prompt(self) -> &'static str {
        match self {
            PromptContext::Coding => CODING_SYSTEM_PROMPT,
            PromptContext::General => "You are a helpful, concise AI assistant.",
        }
    }
}

const CODING_SYSTEM_PROMPT: &str = "You are an expert AI coding assistant for Azalea.
Language: Azalea (Indentation-based, Python-like structure, UI primitives: box, text, button).
Rules:
1. Output ONLY valid code. No markdown blocks unless explicitly requested.
2. Be extremely concise.
3. Use best practices.
4. If fixing code, return the fixed code directly.";

/// Maximum number of remembered facts forwarded to a search request.
pub const RAG_CONTEXT_LIMIT: usize = 10;

/// A fully formatted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Name of the collaborator operation that produced the prompt.
    pub operation: &'static str,
    pub context: PromptContext,
    pub user: String,
}

impl Prompt {
    pub fn system(&self) -> &'static str {
        self.context.system_prompt()
    }
}

/// Something that can answer a formatted prompt.
pub trait TextBackend {
    fn complete(&mut self, prompt: &Prompt) -> CollaboratorResult;
}

/// A [`Collaborator`] that formats prompts and delegates to a backend.
pub struct PromptedCollaborator<B: TextBackend> {
    backend: B,
}

impl<B: TextBackend> PromptedCollaborator<B> {
    pub fn new(backend: B) -> Self {
        PromptedCollaborator { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn request(
        &mut self,
        operation: &'static str,
        context: PromptContext,
        user: String,
    ) -> CollaboratorResult {
        let prompt = Prompt {
            operation,
            context,
            user,
        };
        self.backend.complete(&prompt)
    }
}

impl<B: TextBackend> Collaborator for PromptedCollaborator<B> {
    fn generate_function(
        &mut self,
        name: &str,
        params: &[String],
        description: &str,
    ) -> CollaboratorResult {
        let user = format!(
            "Write a function '{}' with params ({}) that {}.",
            name,
            params.join(", "),
            description
        );
        self.request("generate_function", PromptContext::Coding, user)
    }

    fn optimize_block(&mut self, source: &str) -> CollaboratorResult {
        let user = format!(
            "Optimize this Azalea code block:\n\n{source}\n\nReturn ONLY the optimized code."
        );
        self.request("optimize_block", PromptContext::Coding, user)
    }

    fn process(&mut self, instruction: &str, context: &str) -> CollaboratorResult {
        let user = format!("Instruction: {instruction}\n\nContext Code:\n{context}");
        self.request("process", PromptContext::General, user)
    }

    fn generate_module(&mut self, name: &str) -> CollaboratorResult {
        let user = format!(
            "Generate a purely functional module named \"{name}\" in Azalea syntax. Include exported functions."
        );
        self.request("generate_module", PromptContext::Coding, user)
    }

    fn rag_search(&mut self, query: &str, facts: &[String]) -> CollaboratorResult {
        let limit = facts.len().min(RAG_CONTEXT_LIMIT);
        let context = facts[..limit].join("\n---\n");
        let user = format!(
            "Context:\n{context}\n\nQuery: {query}\n\nAnswer the query using the context provided. Be concise."
        );
        self.request("rag_search", PromptContext::General, user)
    }

    fn inspect(&mut self, value: &Value) -> CollaboratorResult {
        let user = format!(
            "Analyze this data structure:\n{}\n\nExplain what it is and how to access its data in Azalea.",
            value.repr()
        );
        self.request("inspect", PromptContext::General, user)
    }
}

/// Replays queued responses in order and records every prompt it receives.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: VecDeque<Completion>,
    prompts: Vec<Prompt>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedBackend {
            responses: responses
                .into_iter()
                .map(|r| Completion::from(r.into()))
                .collect(),
            prompts: Vec::new(),
        }
    }

    pub fn push_response(&mut self, response: impl Into<Completion>) {
        self.responses.push_back(response.into());
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl TextBackend for ScriptedBackend {
    fn complete(&mut self, prompt: &Prompt) -> CollaboratorResult {
        self.prompts.push(prompt.clone());
        self.responses
            .pop_front()
            .ok_or(CollaboratorError::Exhausted(prompt.operation))
    }
}

/// A backend that refuses every request.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableBackend {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableBackend {
    fn default() -> Self {
        Self::new("no text-generation backend configured")
    }
}

impl TextBackend for UnavailableBackend {
    fn complete(&mut self, _prompt: &Prompt) -> CollaboratorResult {
        Err(CollaboratorError::Unavailable(self.reason.clone()))
    }
}

/// Remove a Markdown code fence wrapped around generated code, if present.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text.to_string();
    };

    // Drop the opening fence line, which may carry a language tag.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => "",
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim_end_matches([' ', '\t']).to_string()
}
