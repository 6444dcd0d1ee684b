//! `%NAME%` placeholder templates bound to display surfaces.
//!
//! A [`TemplateBinder`] captures the content of a [`Surface`] once as its
//! template and re-renders it whenever values change, writing back only when
//! the rendered content differs from what the surface already shows.

use std::collections::BTreeMap;

use tracing::warn;

mod surface;

pub use surface::{escape_text, markup_to_text, MemorySurface};

pub const DELIMITER: char = '%';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Text,
    Markup,
}

/// A display target that owns a single piece of content, readable and
/// writable either as markup or as plain text.
pub trait Surface {
    fn content(&self, mode: RenderMode) -> String;
    fn set_content(&mut self, mode: RenderMode, content: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<String, String>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Overwrites entries present in `other`, keeps the rest.
    pub fn merge(&mut self, other: Values) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Values {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Source text split on [`DELIMITER`]. Even segments are literal text, odd
/// segments are placeholder names; an empty odd segment stands for a literal
/// `%`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<String>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        Self {
            segments: source.split(DELIMITER).map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in self.segments.iter().skip(1).step_by(2) {
            if !segment.is_empty() && !names.contains(&segment.as_str()) {
                names.push(segment);
            }
        }
        names
    }

    /// Substituted values are emitted verbatim and never re-scanned. A
    /// placeholder without a value renders as nothing.
    pub fn render(&self, values: &Values) -> String {
        let mut out = String::new();
        for (index, segment) in self.segments.iter().enumerate() {
            if index % 2 == 0 {
                out.push_str(segment);
            } else if segment.is_empty() {
                out.push(DELIMITER);
            } else if let Some(value) = values.get(segment) {
                out.push_str(value);
            } else {
                warn!(placeholder = %segment, "template placeholder has no value; rendering it empty");
            }
        }
        out
    }
}

pub struct TemplateBinder<S> {
    surface: Option<S>,
    mode: RenderMode,
    template: Template,
    values: Values,
}

impl<S: Surface> TemplateBinder<S> {
    pub fn new(surface: Option<S>, values: Values, mode: RenderMode) -> Self {
        let mut binder = Self {
            surface,
            mode,
            template: Template::default(),
            values,
        };
        binder.reload_template();
        binder
    }

    pub fn unbound(mode: RenderMode) -> Self {
        Self::new(None, Values::new(), mode)
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Binds a new surface (or none) and re-derives the template from its
    /// current content. Returns the previously bound surface.
    pub fn set_surface(&mut self, surface: Option<S>) -> Option<S> {
        let previous = std::mem::replace(&mut self.surface, surface);
        self.reload_template();
        previous
    }

    /// Re-reads the bound surface through the new accessor, which may yield a
    /// different template than the previous mode did.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
        self.reload_template();
    }

    /// Merges `partial` into the value map and re-renders. Returns `true` only
    /// when the surface was written.
    pub fn update(&mut self, partial: impl Into<Values>) -> bool {
        self.values.merge(partial.into());
        self.render()
    }

    pub fn rendered(&self) -> Option<String> {
        self.surface
            .as_ref()
            .map(|surface| surface.content(self.mode))
    }

    fn reload_template(&mut self) {
        let source = match &self.surface {
            Some(surface) => surface.content(self.mode),
            None => String::new(),
        };
        self.template = Template::parse(&source);
        self.render();
    }

    fn render(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let next = self.template.render(&self.values);
        if surface.content(self.mode) == next {
            return false;
        }
        surface.set_content(self.mode, &next);
        true
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
