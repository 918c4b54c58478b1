//! The three placeholder syntaxes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DOUBLE_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid double-brace pattern"));
static BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Z_]+)\]").expect("valid bracket pattern"));
static SINGLE_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Z_]+)\}").expect("valid single-brace pattern"));

/// A placeholder surface syntax.
///
/// The patterns are independent: one text can match several of them, and
/// `{{NAME}}` also contains a single-brace `{NAME}`. Scanning collects the
/// names from all three; substitution tries them in [`Syntax::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Syntax {
    /// `{{Name}}`, any characters except `}`
    DoubleBrace,
    /// `[NAME]`, uppercase letters and underscores
    Bracket,
    /// `{NAME}`, uppercase letters and underscores
    SingleBrace,
}

impl Syntax {
    /// All syntaxes in substitution priority order.
    pub const ALL: [Syntax; 3] = [Syntax::DoubleBrace, Syntax::Bracket, Syntax::SingleBrace];

    fn regex(&self) -> &'static Regex {
        match self {
            Syntax::DoubleBrace => &DOUBLE_BRACE,
            Syntax::Bracket => &BRACKET,
            Syntax::SingleBrace => &SINGLE_BRACE,
        }
    }

    /// The literal token for a field name in this syntax.
    pub fn token(&self, name: &str) -> String {
        match self {
            Syntax::DoubleBrace => format!("{{{{{}}}}}", name),
            Syntax::Bracket => format!("[{}]", name),
            Syntax::SingleBrace => format!("{{{}}}", name),
        }
    }

    /// Field names captured by this syntax in `text`, in order of appearance.
    pub fn captures<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Example of the syntax, for messages.
    pub fn example(&self) -> &'static str {
        match self {
            Syntax::DoubleBrace => "{{FieldName}}",
            Syntax::Bracket => "[FIELD_NAME]",
            Syntax::SingleBrace => "{FIELD_NAME}",
        }
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Syntax::DoubleBrace => "double-brace",
            Syntax::Bracket => "bracket",
            Syntax::SingleBrace => "single-brace",
        })
    }
}

/// Examples of every syntax in priority order, for messages:
/// `{{FieldName}}, [FIELD_NAME], or {FIELD_NAME}`.
pub fn syntax_examples() -> String {
    let examples: Vec<&str> = Syntax::ALL.iter().map(Syntax::example).collect();
    match examples.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        _ => examples.concat(),
    }
}

/// Every capture of every syntax in `text`, grouped by syntax.
pub fn captures(text: &str) -> impl Iterator<Item = (Syntax, &str)> + '_ {
    Syntax::ALL
        .into_iter()
        .flat_map(move |syntax| syntax.captures(text).map(move |name| (syntax, name)))
}

/// The first syntax, in priority order, whose token for `name` occurs in `text`.
pub fn first_matching(text: &str, name: &str) -> Option<(Syntax, String)> {
    Syntax::ALL.into_iter().find_map(|syntax| {
        let token = syntax.token(name);
        text.contains(&token).then_some((syntax, token))
    })
}
