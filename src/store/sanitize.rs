//! Markup stripping for free-text touchpoint fields.
//!
//! Everything that looks like a tag is removed, `script` and `style` elements
//! are removed together with their contents, and the remaining text is
//! returned trimmed. A `<` that cannot start a tag (`1 < 2`) is kept, and
//! stripping repeats until no kept `<` has been joined onto new markup.

use super::types::TouchpointInput;

/// Elements whose body is code rather than text.
const DROPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// A [`TouchpointInput`] after sanitization: plain text only, no absent lists.
#[derive(Debug, Clone)]
pub(crate) struct CleanInput {
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub people_involved: Vec<String>,
    pub url: Option<String>,
}

/// Strip markup from description, URL and people; normalize absent lists.
///
/// Category and tags are vocabulary references and are validated verbatim.
pub(crate) fn clean_input(input: TouchpointInput) -> CleanInput {
    let people_involved = input
        .people_involved
        .unwrap_or_default()
        .iter()
        .map(|p| strip_markup(p))
        .filter(|p| !p.is_empty())
        .collect();

    let url = input
        .url
        .as_deref()
        .map(strip_markup)
        .filter(|u| !u.is_empty());

    CleanInput {
        description: strip_markup(&input.description),
        category: input.category,
        tags: input.tags.unwrap_or_default(),
        people_involved,
        url,
    }
}

/// Remove all markup from `raw`, leaving plain text.
///
/// A kept `<` can end up in front of text that a removed tag used to
/// separate it from (`<<b>script>`), forming new markup. Passes repeat until
/// the text is stable; no pass grows the text, so this terminates with no
/// `<` left that could open a tag.
pub fn strip_markup(raw: &str) -> String {
    let mut current = strip_pass(raw);
    loop {
        let next = strip_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_pass(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        if !starts_markup(tail) {
            out.push('<');
            rest = &tail[1..];
            continue;
        }

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        // An unterminated tag swallows the rest of the input.
        let Some(close) = tail.find('>') else {
            rest = "";
            break;
        };
        let tag = &tail[1..close];
        rest = &tail[close + 1..];

        if let Some(name) = dropped_element(tag) {
            rest = skip_element_body(rest, name);
        }
    }

    out.push_str(rest);
    out.trim().to_string()
}

fn starts_markup(tail: &str) -> bool {
    matches!(
        tail[1..].chars().next(),
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')
    )
}

/// The dropped element opened by `tag`, if any. `tag` excludes the angle brackets.
fn dropped_element(tag: &str) -> Option<&'static str> {
    if tag.starts_with('/') || tag.ends_with('/') {
        return None;
    }
    let name = tag
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or_default();
    DROPPED_ELEMENTS
        .into_iter()
        .find(|dropped| dropped.eq_ignore_ascii_case(name))
}

/// Skip past the closing tag of `name`; an unclosed element runs to the end.
fn skip_element_body<'a>(rest: &'a str, name: &str) -> &'a str {
    let lower = rest.to_ascii_lowercase();
    let closing = format!("</{name}");
    let Some(start) = lower.find(&closing) else {
        return "";
    };
    match rest[start..].find('>') {
        Some(end) => &rest[start + end + 1..],
        None => "",
    }
}
