use std::sync::LazyLock;

use regex::Regex;

use crate::model::Values;

/// `name (values)`, `name (values;)` or `name (values; Default: x)`.
static STRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prop>\S+)\s\((?P<values>[^;]*)(?:;\s[Dd]efault:\s?(?P<def>.*)|;)?\)$").unwrap()
});

/// Anything before the first `(`, then everything up to the last `)`.
static FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(?P<prop>[^(]+)\((?P<values>.*)\)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Strict,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDefinition {
    pub name: String,
    pub values: Option<Values>,
    pub default: Option<String>,
    pub pattern: Pattern,
}

/// Decompose the first cell of a property row into name, values and default.
///
/// The strict form is tried first. When it fails (stray `;` or parentheses in
/// the value text) the fallback keeps the whole parenthesized text as a single
/// value and never reports a default. Returns `None` when neither matches.
pub fn parse_definition(raw: &str) -> Option<ParsedDefinition> {
    let raw = raw.trim();
    parse_strict(raw).or_else(|| parse_fallback(raw))
}

fn parse_strict(raw: &str) -> Option<ParsedDefinition> {
    let caps = STRICT_RE.captures(raw)?;
    let segments: Vec<&str> = caps["values"].split('|').collect();
    let values = if segments.len() > 1 {
        Some(Values::List(
            segments.iter().map(|s| s.trim().to_string()).collect(),
        ))
    } else {
        non_empty(segments[0]).map(Values::Text)
    };
    let default = caps.name("def").and_then(|m| non_empty(m.as_str()));

    Some(ParsedDefinition {
        name: caps["prop"].to_string(),
        values,
        default,
        pattern: Pattern::Strict,
    })
}

fn parse_fallback(raw: &str) -> Option<ParsedDefinition> {
    let caps = FALLBACK_RE.captures(raw)?;
    let name = non_empty(&caps["prop"])?;

    Some(ParsedDefinition {
        name,
        values: non_empty(&caps["values"]).map(Values::Text),
        default: None,
        pattern: Pattern::Fallback,
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Option<Values> {
        Some(Values::List(items.iter().map(|s| s.to_string()).collect()))
    }

    #[test]
    fn piped_values_with_default() {
        let d = parse_definition("mtu (auto | 68..65535; Default: auto)").unwrap();
        assert_eq!(d.name, "mtu");
        assert_eq!(d.values, list(&["auto", "68..65535"]));
        assert_eq!(d.default.as_deref(), Some("auto"));
        assert_eq!(d.pattern, Pattern::Strict);
    }

    #[test]
    fn lowercase_default_keyword() {
        let d = parse_definition("arp (disabled | enabled | proxy-arp; default: enabled)").unwrap();
        assert_eq!(d.values, list(&["disabled", "enabled", "proxy-arp"]));
        assert_eq!(d.default.as_deref(), Some("enabled"));
    }

    #[test]
    fn single_value_no_default() {
        let d = parse_definition("name (string)").unwrap();
        assert_eq!(d.values, Some(Values::Text("string".into())));
        assert_eq!(d.default, None);
    }

    #[test]
    fn bare_trailing_semicolon() {
        let d = parse_definition("disabled (yes | no;)").unwrap();
        assert_eq!(d.values, list(&["yes", "no"]));
        assert_eq!(d.default, None);
        assert_eq!(d.pattern, Pattern::Strict);
    }

    #[test]
    fn empty_default_is_null() {
        let d = parse_definition("address (IP/netmask; Default: )").unwrap();
        assert_eq!(d.values, Some(Values::Text("IP/netmask".into())));
        assert_eq!(d.default, None);
    }

    #[test]
    fn empty_values_are_null() {
        let d = parse_definition("comment ()").unwrap();
        assert_eq!(d.values, None);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let d = parse_definition("\n  interface (name; Default: ether1)\n").unwrap();
        assert_eq!(d.name, "interface");
        assert_eq!(d.default.as_deref(), Some("ether1"));
    }

    #[test]
    fn fallback_never_has_default() {
        let d = parse_definition("comment (string; may contain ; Default: x and more)").unwrap();
        assert_eq!(d.pattern, Pattern::Fallback);
        assert_eq!(d.name, "comment");
        assert_eq!(d.default, None);
        assert_eq!(
            d.values,
            Some(Values::Text("string; may contain ; Default: x and more".into()))
        );
    }

    #[test]
    fn fallback_without_space_before_paren() {
        let d = parse_definition("mac-address(MAC; Default: 00:00:00:00:00:00)").unwrap();
        assert_eq!(d.pattern, Pattern::Fallback);
        assert_eq!(d.name, "mac-address");
        assert_eq!(d.default, None);
    }

    #[test]
    fn fallback_keeps_nested_parens() {
        let d = parse_definition("rate limit (rx (bits); tx (bits))").unwrap();
        assert_eq!(d.pattern, Pattern::Fallback);
        assert_eq!(d.name, "rate limit");
        assert_eq!(d.values, Some(Values::Text("rx (bits); tx (bits)".into())));
    }

    #[test]
    fn unparsable_rows() {
        assert!(parse_definition("no parentheses here").is_none());
        assert!(parse_definition("(values only)").is_none());
        assert!(parse_definition("").is_none());
    }
}
