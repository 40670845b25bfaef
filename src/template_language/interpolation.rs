/*!
 * Template language for `{{expr}}` interpolation bindings.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{QuoteScanner, TemplateLanguage, restore_placeholders};
use crate::errors::ExpressionError;

/// Regex for matching `{{N}}` placeholders
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(\d+)\}\}").expect("Invalid interpolation placeholder regex")
});

/// Template language supporting `{{expr}}` bindings, replaced by `{{N}}` placeholders
#[derive(Debug, Default, Clone, Copy)]
pub struct InterpolationTemplateLanguage;

impl TemplateLanguage for InterpolationTemplateLanguage {
    fn to_standard_html(
        &self,
        template: &str,
        expressions: &mut Vec<String>,
    ) -> Result<String, ExpressionError> {
        let bytes = template.as_bytes();
        let mut result = String::with_capacity(template.len());
        let mut sequence_start = 0;
        let mut expect_open_brace = false;
        let mut expect_close_brace = false;
        let mut brace_depth = 0usize;
        let mut quotes = QuoteScanner::default();

        for (i, &c) in bytes.iter().enumerate() {
            if brace_depth == 0 && !expect_close_brace {
                if c == b'{' {
                    if expect_open_brace {
                        expect_open_brace = false;
                        brace_depth += 1;

                        result.push_str(&template[sequence_start..i - 1]);
                        sequence_start = i - 1;
                    } else {
                        expect_open_brace = true;
                    }
                } else {
                    expect_open_brace = false;
                }
                continue;
            }

            // After the depth returns to zero, only the second closing brace may follow.
            if expect_close_brace && c != b'}' {
                return Err(ExpressionError::UnbalancedBraces {
                    position: sequence_start,
                });
            }

            if quotes.feed(c) {
                continue;
            }

            match c {
                b'{' => brace_depth += 1,
                b'}' if expect_close_brace => {
                    expect_close_brace = false;

                    expressions.push(template[sequence_start..=i].to_string());
                    result.push_str(&format!("{{{{{}}}}}", expressions.len() - 1));
                    sequence_start = i + 1;
                }
                b'}' => {
                    brace_depth -= 1;
                    if brace_depth == 0 {
                        expect_close_brace = true;
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

        if brace_depth != 0 || expect_close_brace {
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
