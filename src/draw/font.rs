//! Font descriptor for panel text.

/// Font configuration for the result panel.
///
/// Family comes from `ui.font_family`; each label picks its own weight and size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Inter", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light")
    pub weight: String,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Same family, different weight.
    pub fn with_weight(&self, weight: &str) -> Self {
        Self::new(self.family.clone(), weight)
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Weight Size", e.g. "Sans Bold 32"
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.push(format!("{}", size.round() as i32));
        parts.join(" ")
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Sans", "normal")
    }
}

/// Capitalizes the first letter of a string.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pango_string_omits_normal_weight() {
        assert_eq!(FontDescriptor::default().to_pango_string(14.0), "Sans 14");
    }

    #[test]
    fn pango_string_includes_weight() {
        let font = FontDescriptor::new("JetBrains Mono", "bold");
        assert_eq!(font.to_pango_string(72.4), "JetBrains Mono Bold 72");
        assert_eq!(font.with_weight("light").to_pango_string(9.0), "JetBrains Mono Light 9");
    }
}
