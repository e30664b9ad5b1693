use crate::config::{StripConfig, ToggleMarker};
use crate::errors::Result;
use regex::Regex;

/// Compiled regexes for every marker a `StripConfig` names.
///
/// Marker names are taken literally; they are escaped before being spliced
/// into the patterns.
pub struct MarkerPatterns {
    /// Opening tag of the toggle control, through its closing `>`.
    pub toggle_open: Regex,
    /// Any opening or closing tag of the toggle's element type.
    pub toggle_tag: Regex,
    /// Secondary-language attributes with their leading whitespace.
    pub secondary: Option<Regex>,
    /// Primary-language shadow attributes with their leading whitespace.
    pub primary: Option<Regex>,
}

impl MarkerPatterns {
    /// Compiles the patterns for a configuration.
    pub fn compile(config: &StripConfig) -> Result<Self> {
        let ToggleMarker { tag, class } = &config.toggle;
        if tag.trim().is_empty() {
            return Err("toggle tag must not be empty".into());
        }

        let tag = regex::escape(tag.trim());
        let toggle_open = Regex::new(&format!(
            r#"<{tag}\s+class="{}"[^>]*>"#,
            regex::escape(class)
        ))?;
        // `(/?)` tells openings from closings when balancing nested elements.
        let toggle_tag = Regex::new(&format!(r"<(/?){tag}\b[^>]*>"))?;

        Ok(Self {
            toggle_open,
            toggle_tag,
            secondary: attribute_pattern(&config.secondary_attributes)?,
            primary: attribute_pattern(&config.primary_attributes)?,
        })
    }
}

/// Builds `\s+(?:a|b)="[^"]*"` for a list of attribute names, or `None` when
/// the list is empty.
fn attribute_pattern(names: &[String]) -> Result<Option<Regex>> {
    let names: Vec<String> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(regex::escape)
        .collect();
    if names.is_empty() {
        return Ok(None);
    }
    Ok(Some(Regex::new(&format!(
        r#"\s+(?:{})="[^"]*""#,
        names.join("|")
    ))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let patterns = MarkerPatterns::compile(&StripConfig::default()).unwrap();
        assert!(patterns.toggle_open.is_match(r#"<button class="lang-toggle" id="t">"#));
        assert!(!patterns.toggle_open.is_match(r#"<button class="menu">"#));
        assert!(patterns.toggle_tag.is_match("</button>"));
        assert!(!patterns.toggle_tag.is_match("<buttons>"));
        assert!(patterns.secondary.unwrap().is_match(r#"<p data-es="Hola">"#));
        assert!(patterns.primary.unwrap().is_match(r#"<p data-en="Hi">"#));
    }

    #[test]
    fn test_attribute_names_are_literal() {
        let config = StripConfig {
            secondary_attributes: vec!["data.es".into()],
            ..StripConfig::default()
        };
        let secondary = MarkerPatterns::compile(&config).unwrap().secondary.unwrap();
        assert!(secondary.is_match(r#"<p data.es="x">"#));
        assert!(!secondary.is_match(r#"<p data-es="x">"#));
    }

    #[test]
    fn test_empty_attribute_list_disables_rule() {
        let config = StripConfig {
            primary_attributes: vec![],
            ..StripConfig::default()
        };
        assert!(MarkerPatterns::compile(&config).unwrap().primary.is_none());
    }

    #[test]
    fn test_empty_toggle_tag_is_rejected() {
        let config = StripConfig {
            toggle: ToggleMarker {
                tag: " ".into(),
                class: "lang-toggle".into(),
            },
            ..StripConfig::default()
        };
        assert!(MarkerPatterns::compile(&config).is_err());
    }
}
