use crate::{RenderMode, Surface};

/// Markup held in memory. Text reads strip tags and decode the basic
/// entities; text writes escape them, so the markup ends up tag-free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    markup: String,
    writes: usize,
}

impl MemorySurface {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            writes: 0,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn text(&self) -> String {
        markup_to_text(&self.markup)
    }

    /// Number of `set_content` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Surface for MemorySurface {
    fn content(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::Markup => self.markup.clone(),
            RenderMode::Text => self.text(),
        }
    }

    fn set_content(&mut self, mode: RenderMode, content: &str) {
        self.markup = match mode {
            RenderMode::Markup => content.to_string(),
            RenderMode::Text => escape_text(content),
        };
        self.writes += 1;
    }
}

pub fn markup_to_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
