/*!
 * The options mini-language used in annotation attribute values.
 *
 * An options string is a sequence of `name: value` pairs separated by `;`,
 * for example `hint: greeting; context: "Shown on the start page"`.
 *
 * - Names consist of `[a-z-]` and may not start or end with `-`.
 * - Values are either unquoted, running until the next unescaped `;` with
 *   trailing whitespace removed, or quoted with `"`, `'` or a backtick.
 * - A backslash escapes the following character.
 * - Only whitespace may follow a closing quote before the next `;`.
 */

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::OptionsError;
use crate::whitespace::WhitespaceOption;

/// Parses an options string into an ordered map of option names to values
pub fn parse_options(value: &str) -> Result<IndexMap<String, String>, OptionsError> {
    OptionsParser::new(value).parse()
}

/// Serializes an options map into an options string
pub fn stringify_options(options: &IndexMap<String, String>) -> String {
    options
        .iter()
        .map(|(name, value)| format!("{}: {}", name, escape_value(value)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Values that are empty, start with a quote, or start or end with whitespace
/// are written quoted, so they parse back unchanged.
fn escape_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.starts_with(['"', '\'', '`'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.replace('\\', "\\\\").replace(';', "\\;")
    }
}

struct OptionsParser<'a> {
    value: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> OptionsParser<'a> {
    fn new(value: &'a str) -> Self {
        Self {
            value,
            chars: value.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<IndexMap<String, String>, OptionsError> {
        let mut options = IndexMap::new();

        loop {
            self.skip_whitespace();

            if self.pos == self.chars.len() {
                return Ok(options);
            }

            let name = self.parse_name()?;
            self.skip_whitespace();
            let value = self.parse_value()?;

            options.insert(name, value);
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn parse_name(&mut self) -> Result<String, OptionsError> {
        let start = self.pos;

        while self.peek().is_some_and(|c| c.is_ascii_lowercase() || c == '-') {
            self.pos += 1;
        }

        if self.pos == start || self.chars[start] == '-' || self.chars[self.pos - 1] == '-' {
            return Err(OptionsError::ExpectedName {
                position: start,
                value: self.value.to_string(),
            });
        }

        let name: String = self.chars[start..self.pos].iter().collect();

        self.skip_whitespace();

        if self.peek() != Some(':') {
            return Err(OptionsError::ExpectedCharacter {
                expected: ':',
                position: self.pos,
                value: self.value.to_string(),
            });
        }

        self.pos += 1;

        Ok(name)
    }

    fn parse_value(&mut self) -> Result<String, OptionsError> {
        let start = self.pos;
        let quote = self.peek().filter(|c| matches!(*c, '"' | '\'' | '`'));

        if quote.is_some() {
            self.pos += 1;
        }

        let mut result = String::new();
        let mut trailing_whitespace = 0;
        let mut escape = false;
        let mut closed = false;

        while let Some(c) = self.peek() {
            if escape {
                result.push(c);
                trailing_whitespace = 0;
                escape = false;
            } else if closed {
                if c == ';' {
                    break;
                }
                if !c.is_whitespace() {
                    return Err(OptionsError::ExpectedCharacter {
                        expected: ';',
                        position: self.pos,
                        value: self.value.to_string(),
                    });
                }
            } else if c == '\\' {
                escape = true;
            } else if Some(c) == quote {
                closed = true;
            } else if quote.is_none() && c == ';' {
                break;
            } else {
                result.push(c);
                if c.is_whitespace() {
                    trailing_whitespace += 1;
                } else {
                    trailing_whitespace = 0;
                }
            }

            self.pos += 1;
        }

        if escape {
            return Err(OptionsError::TrailingEscape {
                position: self.pos,
                value: self.value.to_string(),
            });
        }

        if let Some(quote) = quote {
            if !closed {
                return Err(OptionsError::ExpectedCharacter {
                    expected: quote,
                    position: self.pos,
                    value: self.value.to_string(),
                });
            }
        } else {
            if self.pos == start {
                return Err(OptionsError::ExpectedValue {
                    position: start,
                    value: self.value.to_string(),
                });
            }

            // Trailing whitespace is only trimmed from unquoted values.
            let keep = result.chars().count() - trailing_whitespace;
            result = result.chars().take(keep).collect();
        }

        if self.peek() == Some(';') {
            self.pos += 1;
        }

        Ok(result)
    }
}

/// The options specified in a translate annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationOptions {
    /// Combined with the content before hashing, making the id differ from
    /// other instances of the same content. Never shown to translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Exported with the content as guidance for translators. Does not affect the id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// How whitespace in the content is handled on export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitespace: Option<WhitespaceOption>,

    /// Explicit id, used instead of the computed hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Overrides whether the content is exported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<bool>,
}

impl AnnotationOptions {
    /// Parses the options from an annotation attribute value.
    ///
    /// Empty option values are treated as absent and unknown names are ignored.
    pub fn parse(attr_value: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        if attr_value.is_empty() {
            return Ok(options);
        }

        let map = parse_options(attr_value)?;
        let get = |name: &str| map.get(name).filter(|v| !v.is_empty()).cloned();

        options.hint = get("hint");
        options.context = get("context");
        options.id = get("id");

        if let Some(whitespace) = get("whitespace") {
            options.whitespace = Some(whitespace.parse()?);
        }

        if let Some(export) = get("export") {
            options.export = match export.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => {
                    return Err(OptionsError::InvalidValue {
                        name: "export",
                        allowed: "'true' or 'false'",
                        value: export,
                    });
                }
            };
        }

        Ok(options)
    }
}

impl std::str::FromStr for AnnotationOptions {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parseOptions_withQuotedSemicolon_shouldKeepItInValue() {
        let options = parse_options(r#"hint: "a; b"; id: x-1"#).unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(options["hint"], "a; b");
        assert_eq!(options["id"], "x-1");
    }

    #[test]
    fn test_stringifyOptions_shouldEscapeSemicolonsAndReparse() {
        let options = parse_options(r#"hint: "a; b"; id: x-1"#).unwrap();
        let text = stringify_options(&options);

        assert_eq!(text, r"hint: a\; b; id: x-1");
        assert_eq!(parse_options(&text).unwrap(), options);
    }

    #[test]
    fn test_stringifyOptions_withQuotesAndPadding_shouldQuoteAndReparse() {
        let mut options = IndexMap::new();
        options.insert("hint".to_string(), r#""quoted" text"#.to_string());
        options.insert("context".to_string(), "  padded; ".to_string());
        options.insert("id".to_string(), "'x".to_string());
        options.insert("export".to_string(), String::new());

        let text = stringify_options(&options);

        assert_eq!(text, r#"hint: "\"quoted\" text"; context: "  padded; "; id: "'x"; export: """#);
        assert_eq!(parse_options(&text).unwrap(), options);
    }

    #[test]
    fn test_parseOptions_withVariousQuotesAndWhitespace_shouldParse() {
        let options = parse_options("  hint :  plain text   ;context:'it''s';x-y: `tick` ; ").unwrap_err();
        assert!(matches!(options, OptionsError::ExpectedCharacter { expected: ';', .. }));

        let options = parse_options(r"hint :  plain text   ;context:'it\'s';x-y: `tick` ; ").unwrap();
        assert_eq!(options["hint"], "plain text");
        assert_eq!(options["context"], "it's");
        assert_eq!(options["x-y"], "tick");
    }

    #[test]
    fn test_parseOptions_withEscapes_shouldUnescape() {
        let options = parse_options(r"hint: a\;b\\c\ ").unwrap();

        assert_eq!(options["hint"], r"a;b\c ");
    }

    #[test]
    fn test_parseOptions_withEmptyInput_shouldReturnEmptyMap() {
        assert!(parse_options("").unwrap().is_empty());
        assert!(parse_options("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parseOptions_withMalformedInput_shouldFail() {
        assert!(matches!(parse_options("Hint: x"), Err(OptionsError::ExpectedName { position: 0, .. })));
        assert!(matches!(parse_options("-hint: x"), Err(OptionsError::ExpectedName { .. })));
        assert!(matches!(parse_options("hint-: x"), Err(OptionsError::ExpectedName { .. })));
        assert!(matches!(
            parse_options("hint x"),
            Err(OptionsError::ExpectedCharacter { expected: ':', position: 5, .. })
        ));
        assert!(matches!(parse_options("hint: ;"), Err(OptionsError::ExpectedValue { .. })));
        assert!(matches!(parse_options("hint:"), Err(OptionsError::ExpectedValue { .. })));
        assert!(matches!(
            parse_options("hint: \"abc"),
            Err(OptionsError::ExpectedCharacter { expected: '"', .. })
        ));
        assert!(matches!(parse_options(r"hint: abc\"), Err(OptionsError::TrailingEscape { .. })));
    }

    #[test]
    fn test_annotationOptions_parse_shouldReadKnownOptions() {
        let options = AnnotationOptions::parse(
            "hint: greeting; context: Start page; whitespace: pre-line; id: home.title; export: false; other: x",
        )
        .unwrap();

        assert_eq!(options.hint.as_deref(), Some("greeting"));
        assert_eq!(options.context.as_deref(), Some("Start page"));
        assert_eq!(options.whitespace, Some(WhitespaceOption::PreLine));
        assert_eq!(options.id.as_deref(), Some("home.title"));
        assert_eq!(options.export, Some(false));
    }

    #[test]
    fn test_annotationOptions_parse_withInvalidValues_shouldFail() {
        assert!(matches!(
            AnnotationOptions::parse("whitespace: nowrap"),
            Err(OptionsError::InvalidValue { name: "whitespace", .. })
        ));
        assert!(matches!(
            AnnotationOptions::parse("export: yes"),
            Err(OptionsError::InvalidValue { name: "export", .. })
        ));
    }
}
