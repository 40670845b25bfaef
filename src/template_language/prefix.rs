/*!
 * Template language for `${expr}` interpolation bindings.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{QuoteScanner, TemplateLanguage, restore_placeholders};
use crate::errors::ExpressionError;

/// Regex for matching `${N}` placeholders
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\d+)\}").expect("Invalid prefix placeholder regex"));

/// Template language supporting `${expr}` bindings, replaced by `${N}` placeholders
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixTemplateLanguage;

impl TemplateLanguage for PrefixTemplateLanguage {
    fn to_standard_html(
        &self,
        template: &str,
        expressions: &mut Vec<String>,
    ) -> Result<String, ExpressionError> {
        let bytes = template.as_bytes();
        let mut result = String::with_capacity(template.len());
        let mut sequence_start = 0;
        let mut expect_open_brace = false;
        let mut brace_depth = 0usize;
        let mut quotes = QuoteScanner::default();

        for (i, &c) in bytes.iter().enumerate() {
            if brace_depth == 0 {
                if c == b'$' {
                    expect_open_brace = true;
                } else if expect_open_brace {
                    expect_open_brace = false;

                    if c == b'{' {
                        brace_depth += 1;

                        result.push_str(&template[sequence_start..i - 1]);
                        sequence_start = i - 1;
                    }
                }
                continue;
            }

            if quotes.feed(c) {
                continue;
            }

            match c {
                b'{' => brace_depth += 1,
                b'}' => {
                    brace_depth -= 1;

                    if brace_depth == 0 {
                        expressions.push(template[sequence_start..=i].to_string());
                        result.push_str(&format!("${{{}}}", expressions.len() - 1));
                        sequence_start = i + 1;
                    }
                }
                _ => {}
            }
        }

        if quotes.in_quote() {
            return Err(ExpressionError::UnbalancedQuotes {
                position: sequence_start,
            });
        }

        if brace_depth != 0 {
            return Err(ExpressionError::UnbalancedBraces {
                position: sequence_start,
            });
        }

        if quotes.in_escape() {
            return Err(ExpressionError::TrailingEscape {
                position: template.len(),
            });
        }

        result.push_str(&template[sequence_start..]);
        Ok(result)
    }

    fn to_template_html(&self, standard_html: &str, expressions: &[String]) -> String {
        restore_placeholders(&PLACEHOLDER_REGEX, standard_html, expressions)
    }

    fn placeholder_regex(&self) -> Option<&Regex> {
        Some(&PLACEHOLDER_REGEX)
    }
}
