use super::builtins::Builtin;
use crate::error::{RuntimeError, RuntimeResult};
use crate::parser::ast::BinaryOp;
use crate::parser::printer::format_number;
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Value of `var x` without an initialiser and of a bare `return`.
    Null,
    /// Missing arguments, calls that fall off the end, UI expressions.
    Undefined,
    Builtin(Builtin),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Undefined => write!(f, "undefined"),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Null | Value::Undefined => false,
            Value::Builtin(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Literal-like rendering used when describing a value to the collaborator.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }

    /// Apply a binary operator.
    ///
    /// `+` concatenates when either side is text. Other arithmetic needs two
    /// numbers, ordering needs two numbers or two texts, and equality is strict.
    pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> RuntimeResult<Value> {
        use Value::{Number, Text};

        let result = match (op, left, right) {
            (BinaryOp::Add, Number(a), Number(b)) => Number(a + b),
            (BinaryOp::Add, Text(_), _) | (BinaryOp::Add, _, Text(_)) => {
                Text(format!("{left}{right}"))
            }
            (BinaryOp::Sub, Number(a), Number(b)) => Number(a - b),
            (BinaryOp::Mul, Number(a), Number(b)) => Number(a * b),
            (BinaryOp::Div, Number(_), Number(b)) if *b == 0.0 => {
                return Err(RuntimeError::DivisionByZero);
            }
            (BinaryOp::Div, Number(a), Number(b)) => Number(a / b),
            (BinaryOp::Less, Number(a), Number(b)) => Value::Bool(a < b),
            (BinaryOp::Less, Text(a), Text(b)) => Value::Bool(a < b),
            (BinaryOp::Greater, Number(a), Number(b)) => Value::Bool(a > b),
            (BinaryOp::Greater, Text(a), Text(b)) => Value::Bool(a > b),
            (BinaryOp::Equal, _, _) => Value::Bool(left == right),
            (BinaryOp::NotEqual, _, _) => Value::Bool(left != right),
            _ => {
                return Err(RuntimeError::Type {
                    op: op.symbol().to_string(),
                    left: left.type_name(),
                    right: right.type_name(),
                });
            }
        };

        Ok(result)
    }
}

pub type Scope = IndexMap<String, Value>;

/// Variable storage as a stack of frames. Frame 0 holds the globals.
///
/// Frames are never chained: a function call starts from a copy of the
/// globals, so a callee cannot see its caller's locals.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    frames: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Scope::new()],
        }
    }

    /// Number of active call frames above the globals.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Enter a function: a copy of the globals plus the bound parameters.
    pub fn push_call_frame(&mut self, params: &[String], args: Vec<Value>) {
        let frame = self.frames[0].clone();
        self.push_with_params(frame, params, args);
    }

    /// Enter a macro: a copy of the current frame plus the bound parameters.
    pub fn push_macro_frame(&mut self, params: &[String], args: Vec<Value>) {
        let frame = self.current().clone();
        self.push_with_params(frame, params, args);
    }

    fn push_with_params(&mut self, mut frame: Scope, params: &[String], args: Vec<Value>) {
        let mut args = args.into_iter();
        for param in params {
            frame.insert(param.clone(), args.next().unwrap_or(Value::Undefined));
        }
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn current(&self) -> &Scope {
        &self.frames[self.frames.len() - 1]
    }

    pub fn globals(&self) -> &Scope {
        &self.frames[0]
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let last = self.frames.len() - 1;
        self.frames[last].insert(name.into(), value);
    }

    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        self.frames[0].insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.current().get(name)
    }
}
