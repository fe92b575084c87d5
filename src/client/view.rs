//! The page the form handler reads from and writes to.

use std::collections::{HashMap, HashSet};

/// The handful of page operations the form handler needs.
pub trait FormView {
    /// Current value of the named input, `None` if there is no such input.
    fn field_value(&self, name: &str) -> Option<String>;

    /// Replace the text content of an element.
    fn set_text(&mut self, element: &str, text: &str);

    /// Make a hidden container visible.
    fn reveal(&mut self, container: &str);

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);
}

/// In-memory page, for headless use and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    pub fields: HashMap<String, String>,
    pub texts: HashMap<String, String>,
    pub visible: HashSet<String>,
    pub alerts: Vec<String>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn text(&self, element: &str) -> Option<&str> {
        self.texts.get(element).map(String::as_str)
    }

    pub fn is_visible(&self, container: &str) -> bool {
        self.visible.contains(container)
    }
}

impl FormView for MemoryView {
    fn field_value(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn set_text(&mut self, element: &str, text: &str) {
        self.texts.insert(element.to_string(), text.to_string());
    }

    fn reveal(&mut self, container: &str) {
        self.visible.insert(container.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
