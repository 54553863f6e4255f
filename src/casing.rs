//! Identifier casing helpers shared by the registry and the generator.

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}

/// Upper-case the first letter of every word.
///
/// A word starts at the beginning of the string or after a separator (ASCII
/// punctuation or whitespace). Underscores and digits do not split words, so
/// `say_hello` becomes `Say_hello`. Applying it twice gives the same result as once.
///
/// ```rust
/// use grpc_agent_gen::casing::title_case;
///
/// assert_eq!(title_case("echo"), "Echo");
/// assert_eq!(title_case("say_hello"), "Say_hello");
/// ```
pub fn title_case(s: &str) -> String {
    let mut prev = ' ';
    s.chars()
        .flat_map(|c| {
            let starts_word = is_separator(prev);
            prev = c;
            let upper: Vec<char> = if starts_word {
                c.to_uppercase().collect()
            } else {
                vec![c]
            };
            upper
        })
        .collect()
}

/// Convert a proto field name to the exported Go identifier protoc-gen-go uses.
///
/// Underscores followed by a lower-case letter are dropped and the letter is
/// upper-cased; a leading underscore becomes `X`; digits are kept as-is.
///
/// ```rust
/// use grpc_agent_gen::casing::camel_case;
///
/// assert_eq!(camel_case("update_mask"), "UpdateMask");
/// assert_eq!(camel_case("_hidden"), "XHidden");
/// ```
pub fn camel_case(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    if bytes.first() == Some(&b'_') {
        out.push('X');
        i += 1;
    }
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'_' && bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase) {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c as char);
            i += 1;
            continue;
        }
        if c.is_ascii() {
            out.push(c.to_ascii_uppercase() as char);
            i += 1;
        } else {
            // Non-ASCII passes through unchanged, one full character at a time.
            let ch = s[i..].chars().next().unwrap_or_default();
            out.push(ch);
            i += ch.len_utf8().max(1);
            continue;
        }
        while i < bytes.len() && bytes[i].is_ascii_lowercase() {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}
