use crate::config::StripConfig;
use crate::errors::Result;
use crate::patterns::MarkerPatterns;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;

/// Removes bilingual scaffolding from markup text.
///
/// A `Transformer` is a pure text-to-text rewrite. It applies, in order:
/// 1. removal of every language toggle element, content included,
/// 2. removal of secondary-language attributes,
/// 3. removal of primary-language shadow attributes.
///
/// Attribute values are discarded; the element's visible text is left as is.
pub struct Transformer {
    patterns: MarkerPatterns,
}

/// Counts of what a single `transform` call removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub toggles: usize,
    pub secondary: usize,
    pub primary: usize,
}

impl RuleStats {
    /// Total number of removals across all rules.
    pub fn changes(&self) -> usize {
        self.toggles + self.secondary + self.primary
    }

    pub fn add(&mut self, other: RuleStats) {
        self.toggles += other.toggles;
        self.secondary += other.secondary;
        self.primary += other.primary;
    }
}

/// The rewritten text and what was removed from it.
pub struct Transformed<'a> {
    pub content: Cow<'a, str>,
    pub stats: RuleStats,
}

impl Transformed<'_> {
    pub fn modified(&self) -> bool {
        self.stats.changes() > 0
    }
}

impl Transformer {
    /// Creates a `Transformer` for the markers named in `config`.
    pub fn new(config: &StripConfig) -> Result<Self> {
        Ok(Self {
            patterns: MarkerPatterns::compile(config)?,
        })
    }

    /// Rewrites `text`, borrowing it unchanged when nothing matched.
    ///
    /// A removal can join the surrounding fragments into a new marker, e.g.
    /// `data-e` + ` data-en="x"` + `s="y"`. The rules are therefore repeated
    /// until a pass removes nothing, which makes the result a fixed point.
    /// Every removal shortens the text, so this terminates.
    pub fn transform<'a>(&self, text: &'a str) -> Transformed<'a> {
        let first = self.apply_rules(text);
        if !first.modified() {
            return first;
        }

        let mut stats = first.stats;
        let mut content = first.content.into_owned();
        loop {
            let next = self.apply_rules(&content);
            if !next.modified() {
                break;
            }
            stats.add(next.stats);
            let rewritten = next.content.into_owned();
            content = rewritten;
        }

        Transformed {
            content: Cow::Owned(content),
            stats,
        }
    }

    /// One pass of the three rules, in order.
    fn apply_rules<'a>(&self, text: &'a str) -> Transformed<'a> {
        let mut stats = RuleStats::default();

        let (content, toggles) = self.remove_toggles(text);
        stats.toggles = toggles;

        let (content, secondary) = remove_all(self.patterns.secondary.as_ref(), content);
        stats.secondary = secondary;

        let (content, primary) = remove_all(self.patterns.primary.as_ref(), content);
        stats.primary = primary;

        Transformed { content, stats }
    }

    /// Convenience wrapper returning only the rewritten text.
    pub fn transform_str(&self, text: &str) -> String {
        self.transform(text).content.into_owned()
    }

    /// Removes every toggle element from its opening marker to its matching
    /// closing tag.
    ///
    /// Same-named elements nested inside a toggle are balanced, so the span
    /// always ends at the toggle's own closing tag. A toggle with no closing
    /// tag is left in place.
    fn remove_toggles<'a>(&self, text: &'a str) -> (Cow<'a, str>, usize) {
        let mut out = String::new();
        let mut cursor = 0;
        let mut removed = 0;

        while let Some(open) = self.patterns.toggle_open.find_at(text, cursor) {
            match self.matching_close(text, open.end()) {
                Some(end) => {
                    out.push_str(&text[cursor..open.start()]);
                    cursor = end;
                    removed += 1;
                }
                None => {
                    out.push_str(&text[cursor..open.end()]);
                    cursor = open.end();
                }
            }
        }

        if removed == 0 {
            return (Cow::Borrowed(text), 0);
        }
        out.push_str(&text[cursor..]);
        (Cow::Owned(out), removed)
    }

    /// Byte offset just past the closing tag that balances an element opened
    /// before `from`.
    fn matching_close(&self, text: &str, from: usize) -> Option<usize> {
        let mut depth = 1usize;
        for caps in self.patterns.toggle_tag.captures_iter(&text[from..]) {
            let tag = caps.get(0)?;
            let closing = caps.get(1).is_some_and(|m| !m.is_empty());
            if closing {
                depth -= 1;
                if depth == 0 {
                    return Some(from + tag.end());
                }
            } else if !tag.as_str().ends_with("/>") {
                depth += 1;
            }
        }
        None
    }
}

/// Deletes every match of `pattern`, keeping the borrow when nothing matches.
fn remove_all<'a>(pattern: Option<&Regex>, text: Cow<'a, str>) -> (Cow<'a, str>, usize) {
    let Some(pattern) = pattern else {
        return (text, 0);
    };
    let count = pattern.find_iter(&text).count();
    if count == 0 {
        return (text, 0);
    }
    let replaced = pattern.replace_all(&text, "").into_owned();
    (Cow::Owned(replaced), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn transformer() -> Transformer {
        Transformer::new(&StripConfig::default()).unwrap()
    }

    #[test]
    fn test_span_with_both_markers() {
        let t = transformer();
        let out = t.transform(r#"<span data-en="Hello" data-es="Hola">Hello</span>"#);
        assert_eq!(out.content, "<span>Hello</span>");
        assert_eq!(out.stats, RuleStats { toggles: 0, secondary: 1, primary: 1 });
    }

    #[test]
    fn test_toggle_spanning_lines_is_removed() {
        let t = transformer();
        let input = "<nav>\n    <a href=\"/\">Home</a>\n    <button class=\"lang-toggle\" id=\"langToggle\">\n        <span>ES</span>\n    </button>\n</nav>\n";
        let out = t.transform(input);
        assert_eq!(out.content, "<nav>\n    <a href=\"/\">Home</a>\n    \n</nav>\n");
        assert_eq!(out.stats.toggles, 1);
    }

    #[test]
    fn test_each_toggle_matched_individually() {
        let t = transformer();
        let input = r#"a<button class="lang-toggle">EN</button>b<button class="menu">Menu</button>c<button class="lang-toggle">ES</button>d"#;
        let out = t.transform(input);
        assert_eq!(out.content, r#"ab<button class="menu">Menu</button>cd"#);
        assert_eq!(out.stats.toggles, 2);
    }

    #[test]
    fn test_nested_button_removed_with_toggle() {
        let t = transformer();
        let input = r#"x<button class="lang-toggle"><button>inner</button> tail</button>y"#;
        assert_eq!(t.transform_str(input), "xy");
    }

    #[test]
    fn test_unterminated_toggle_left_alone() {
        let t = transformer();
        let input = r#"<button class="lang-toggle">EN"#;
        let out = t.transform(input);
        assert_eq!(out.content, input);
        assert!(!out.modified());
    }

    #[test]
    fn test_secondary_attribute_removed_cleanly() {
        let t = transformer();
        let out = t.transform_str("<a href=\"/about\"\n   data-es=\"foo\" class=\"nav\">About</a>");
        assert_eq!(out, "<a href=\"/about\" class=\"nav\">About</a>");
        assert!(!out.contains("  "));
    }

    #[test]
    fn test_primary_attribute_value_discarded() {
        let t = transformer();
        let out = t.transform_str(r#"<h1 class="hero" data-en="bar">Our Services</h1>"#);
        assert_eq!(out, r#"<h1 class="hero">Our Services</h1>"#);
        assert!(!out.contains("bar"));
    }

    #[test]
    fn test_similar_attribute_names_untouched() {
        let t = transformer();
        let input = r#"<p data-esc="1" data-english="2" xdata-es="3">x</p>"#;
        assert_eq!(t.transform_str(input), input);
    }

    #[test]
    fn test_attribute_joined_by_removal_is_removed() {
        let t = transformer();
        let out = t.transform(r#"<p data-e data-en="x"s="y">t</p>"#);
        assert_eq!(out.content, "<p>t</p>");
        assert_eq!(out.stats, RuleStats { toggles: 0, secondary: 1, primary: 1 });
    }

    #[test]
    fn test_toggle_joined_by_removal_is_removed() {
        let t = transformer();
        let input = r#"<button class="lang-<button class="lang-toggle">x</button>toggle">y</button>z"#;
        let out = t.transform(input);
        assert_eq!(out.content, "z");
        assert_eq!(out.stats.toggles, 2);
        assert_eq!(t.transform_str(&out.content), "z");
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        let t = transformer();
        let out = t.transform("<p class=\"intro\">Hi</p>");
        assert!(matches!(out.content, Cow::Borrowed(_)));
        assert_eq!(out.stats.changes(), 0);
    }

    #[test]
    fn test_custom_markers() {
        let config = StripConfig {
            toggle: crate::config::ToggleMarker {
                tag: "div".into(),
                class: "lang-switch".into(),
            },
            secondary_attributes: vec!["data-fr".into()],
            primary_attributes: vec![],
            ..StripConfig::default()
        };
        let t = Transformer::new(&config).unwrap();
        let input = r#"<div class="lang-switch"><div>FR</div></div><p data-fr="Bonjour" data-en="Hi">Hi</p>"#;
        assert_eq!(t.transform_str(input), r#"<p data-en="Hi">Hi</p>"#);
    }

    proptest! {
        #[test]
        fn prop_identity_without_markers(text in "[a-zA-Z0-9 <>/=\"\n.-]{0,200}") {
            prop_assume!(!text.contains("data-es=") && !text.contains("data-en="));
            prop_assume!(!text.contains("lang-toggle"));
            let t = transformer();
            prop_assert_eq!(t.transform_str(&text), text);
        }

        #[test]
        fn prop_idempotent(
            parts in proptest::collection::vec(
                prop_oneof![
                    proptest::sample::select(vec![
                        "<button class=\"lang-toggle\">EN</button>",
                        "<button class=\"lang-toggle\">\n<button>x</button>\n</button>",
                        "<button class=\"lang-toggle\">",
                        "<button>",
                        "</button>",
                        " data-es=\"Hola\"",
                        " data-en=\"Hello\"",
                        "<span data-en=\"Hello\" data-es=\"Hola\">",
                        "<p>",
                        "</p>",
                        "<p data-e",
                        "s=\"y\">",
                        "<button class=\"lang-",
                        "toggle\">",
                    ])
                    .prop_map(str::to_string),
                    "[a-z <>/=\"\n-]{0,12}",
                ],
                0..12,
            )
        ) {
            let t = transformer();
            let text = parts.concat();
            let once = t.transform_str(&text);
            let twice = t.transform_str(&once);
            prop_assert_eq!(twice, once);
        }
    }
}
