/*!
 * Lenient, lossless HTML tokenizer.
 *
 * Every token borrows the exact source text it was read from, so a document
 * built from the tokens can be written back byte for byte. Character
 * references are never decoded, and text and attribute values are kept as
 * written.
 *
 * Known limitations:
 * - Only `script` and `style` are treated as raw text elements.
 * - Markup that is not a tag, comment or doctype is kept as text.
 * - An unquoted attribute value ends before `/>`.
 */

use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// Elements whose content is never parsed as markup
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns true if `name` is a void element
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

/// Returns true if the content of `name` is raw text
pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|raw| raw.eq_ignore_ascii_case(name))
}

/// How an attribute value was quoted in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
    Unquoted,
}

/// An attribute as written in a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute<'a> {
    /// Name as written
    pub name: &'a str,
    /// Value between the quotes, or `None` for a bare attribute
    pub value: Option<&'a str>,
    pub quote: QuoteStyle,
    /// Source text, including the whitespace before the name
    pub raw: &'a str,
}

/// A start tag, split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    /// Name as written
    pub name: &'a str,
    pub attributes: Vec<RawAttribute<'a>>,
    /// Source text after the last attribute, such as ` />` or `>`
    pub tag_end: &'a str,
    pub self_closing: bool,
}

/// A token, borrowing its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    /// Full source text of the comment, including the delimiters
    Comment(&'a str),
    /// Full source text of the doctype
    Doctype(&'a str),
    StartTag(StartTag<'a>),
    EndTag {
        /// Lowercase name
        name: String,
        /// Full source text of the end tag
        raw: &'a str,
    },
}

/// Splits `input` into tokens. Concatenating the source text of all tokens yields `input`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while let Some(offset) = memchr(b'<', &bytes[i..]) {
        let start = i + offset;

        let Some((token, end)) = scan_markup(input, start) else {
            // A '<' that does not start markup is text.
            i = start + 1;
            continue;
        };

        if text_start < start {
            tokens.push(Token::Text(&input[text_start..start]));
        }

        let raw_text_name = match &token {
            Token::StartTag(tag) if !tag.self_closing && is_raw_text_element(tag.name) => {
                Some(tag.name.to_ascii_lowercase())
            }
            _ => None,
        };

        tokens.push(token);
        i = end;
        text_start = end;

        if let Some(name) = raw_text_name {
            match find_raw_text_close_tag(input, end, &name) {
                Some((close_start, close_end)) => {
                    if end < close_start {
                        tokens.push(Token::Text(&input[end..close_start]));
                    }
                    tokens.push(Token::EndTag {
                        name,
                        raw: &input[close_start..close_end],
                    });
                    i = close_end;
                    text_start = close_end;
                }
                None => {
                    // The rest of the input is the content of the element.
                    if end < input.len() {
                        tokens.push(Token::Text(&input[end..]));
                    }
                    return tokens;
                }
            }
        }

        if i >= bytes.len() {
            break;
        }
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }

    tokens
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

/// Position just after the next `>` at or after `from`, or the end of input
fn skip_past_gt(bytes: &[u8], from: usize) -> usize {
    match memchr(b'>', &bytes[from..]) {
        Some(offset) => from + offset + 1,
        None => bytes.len(),
    }
}

/// Reads the markup starting at the `<` at `start`, returning the token and the position after it.
fn scan_markup(input: &str, start: usize) -> Option<(Token<'_>, usize)> {
    let bytes = input.as_bytes();
    let next = *bytes.get(start + 1)?;

    if input[start..].starts_with(COMMENT_START) {
        let body_start = start + COMMENT_START.len();
        let end = match input[body_start..].find(COMMENT_END) {
            Some(offset) => body_start + offset + COMMENT_END.len(),
            None => input.len(),
        };
        return Some((Token::Comment(&input[start..end]), end));
    }

    if next == b'!' || next == b'?' {
        let end = skip_past_gt(bytes, start);
        let raw = &input[start..end];
        let token = if starts_with_ignore_ascii_case_at(bytes, start, b"<!doctype") {
            Token::Doctype(raw)
        } else {
            Token::Comment(raw)
        };
        return Some((token, end));
    }

    if next == b'/' {
        if !bytes.get(start + 2)?.is_ascii_alphabetic() {
            return None;
        }
        let name_end = scan_name(bytes, start + 2);
        let end = skip_past_gt(bytes, name_end);
        let token = Token::EndTag {
            name: input[start + 2..name_end].to_ascii_lowercase(),
            raw: &input[start..end],
        };
        return Some((token, end));
    }

    if next.is_ascii_alphabetic() {
        let (tag, end) = scan_start_tag(input, start);
        return Some((Token::StartTag(tag), end));
    }

    None
}

/// Position after a tag name beginning at `from`
fn scan_name(bytes: &[u8], from: usize) -> usize {
    let mut k = from;
    while k < bytes.len() && !bytes[k].is_ascii_whitespace() && bytes[k] != b'/' && bytes[k] != b'>' {
        k += 1;
    }
    k
}

fn scan_start_tag(input: &str, start: usize) -> (StartTag<'_>, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let name_end = scan_name(bytes, start + 1);
    let name = &input[start + 1..name_end];
    let mut attributes = Vec::new();
    let mut k = name_end;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        let attr_start = k;

        // Skip whitespace and stray slashes; they become part of the next attribute's source text.
        loop {
            skip_whitespace(&mut k);
            if k < len && bytes[k] == b'/' && !(k + 1 < len && bytes[k + 1] == b'>') {
                k += 1;
            } else {
                break;
            }
        }

        if k >= len {
            let tag = StartTag { name, attributes, tag_end: &input[attr_start..], self_closing: false };
            return (tag, len);
        }

        if bytes[k] == b'>' || bytes[k] == b'/' {
            let self_closing = bytes[k] == b'/';
            let end = if self_closing { k + 2 } else { k + 1 };
            let tag = StartTag { name, attributes, tag_end: &input[attr_start..end], self_closing };
            return (tag, end);
        }

        let name_start = k;
        // A leading '=' belongs to the name.
        k += 1;
        while k < len && !bytes[k].is_ascii_whitespace() && !matches!(bytes[k], b'/' | b'>' | b'=') {
            k += 1;
        }
        let attr_name = &input[name_start..k];
        let after_name = k;

        skip_whitespace(&mut k);

        let (value, quote) = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);

            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote_char = bytes[k];
                let value_start = k + 1;
                let value_end = match memchr(quote_char, &bytes[value_start..]) {
                    Some(offset) => value_start + offset,
                    None => len,
                };
                k = (value_end + 1).min(len);
                let quote = if quote_char == b'"' { QuoteStyle::Double } else { QuoteStyle::Single };
                (Some(&input[value_start..value_end]), quote)
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                (Some(&input[value_start..k]), QuoteStyle::Unquoted)
            }
        } else {
            k = after_name;
            (None, QuoteStyle::Unquoted)
        };

        attributes.push(RawAttribute {
            name: attr_name,
            value,
            quote,
            raw: &input[attr_start..k],
        });
    }
}

/// Finds the `</name ... >` that closes a raw text element whose content starts at `from`.
fn find_raw_text_close_tag(input: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = from;

    while i < len {
        i += memchr(b'<', &bytes[i..])?;

        if bytes.get(i + 1) == Some(&b'/') && starts_with_ignore_ascii_case_at(bytes, i + 2, name.as_bytes()) {
            let mut k = i + 2 + name.len();
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }

        i += 1;
    }

    None
}
