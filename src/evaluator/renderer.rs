//! Rendering seam for the `box`, `text` and `button` primitives.

/// Receiver of UI side effects. Nothing it returns is consumed.
pub trait Renderer {
    fn create_box(&mut self);
    fn create_text(&mut self, content: &str);
    fn create_button(&mut self, label: &str);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn create_box(&mut self) {
        (**self).create_box()
    }

    fn create_text(&mut self, content: &str) {
        (**self).create_text(content)
    }

    fn create_button(&mut self, label: &str) {
        (**self).create_button(label)
    }
}

/// Writes textual stand-ins to stdout, matching the C++ backend's stubs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn create_box(&mut self) {
        println!("[BOX]");
    }

    fn create_text(&mut self, content: &str) {
        println!("{content}");
    }

    fn create_button(&mut self, label: &str) {
        println!("[BUTTON: {label}]");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Box,
    Text(String),
    Button(String),
}

/// Records every call, for tests and headless embedding.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Text(content) => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn create_box(&mut self) {
        self.calls.push(RenderCall::Box);
    }

    fn create_text(&mut self, content: &str) {
        self.calls.push(RenderCall::Text(content.to_string()));
    }

    fn create_button(&mut self, label: &str) {
        self.calls.push(RenderCall::Button(label.to_string()));
    }
}
