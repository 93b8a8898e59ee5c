//! Inline style sets
//!
//! A `StyleMap` is applied to an element as a unit. Removal never undoes
//! individual properties: the whole `style` attribute is wiped.

/// Ordered set of CSS property/value pairs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any earlier value in place
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as the value of a `style` attribute
    pub fn to_css_text(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse a `style` attribute value. Declarations without a colon are dropped.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for declaration in css_text.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    style.set(name, value.trim());
                }
            }
        }
        style
    }
}

/// Format a pixel length the way CSS expects it (`12px`, `12.5px`)
pub fn px(value: f64) -> String {
    format!("{}px", value)
}
