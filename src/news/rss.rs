//! Minimal RSS 2.0 item extraction.
//!
//! Only `<item>` children `title`, `link` and `pubDate` are read. Attributes,
//! namespaces and nested markup inside those fields are not interpreted.

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
}

pub fn parse_items(xml: &str) -> Result<Vec<RawItem>, AppError> {
    if !xml.contains("<rss") && !xml.contains("<channel") {
        return Err(AppError::Feed("document is not an RSS feed".to_string()));
    }

    let mut items = Vec::new();
    let mut rest = xml;
    while let Some(body) = next_element(&mut rest, "item") {
        items.push(RawItem {
            title: child_text(body, "title"),
            link: child_text(body, "link"),
            pub_date: child_text(body, "pubDate"),
        });
    }
    Ok(items)
}

/// Returns the inner text of the next `<tag>` in `rest` and advances past it.
fn next_element<'a>(rest: &mut &'a str, tag: &str) -> Option<&'a str> {
    let open = find_open_tag(rest, tag)?;
    let after_open = &rest[open..];
    let content_start = open + after_open.find('>')? + 1;

    // Self-closing tags carry no content.
    if rest[..content_start].ends_with("/>") {
        *rest = &rest[content_start..];
        return Some("");
    }

    let close_tag = format!("</{}>", tag);
    let content_len = rest[content_start..].find(&close_tag)?;
    let body = &rest[content_start..content_start + content_len];
    *rest = &rest[content_start + content_len + close_tag.len()..];
    Some(body)
}

/// Byte offset of `<tag>` or `<tag ...>`, skipping tags that merely share a prefix.
fn find_open_tag(haystack: &str, tag: &str) -> Option<usize> {
    let needle = format!("<{}", tag);
    let mut offset = 0;
    while let Some(pos) = haystack[offset..].find(&needle) {
        let at = offset + pos;
        match haystack[at + needle.len()..].chars().next() {
            Some('>') | Some('/') | Some(' ') | Some('\t') | Some('\n') | Some('\r') => {
                return Some(at)
            }
            _ => offset = at + needle.len(),
        }
    }
    None
}

fn child_text(body: &str, tag: &str) -> String {
    let mut rest = body;
    next_element(&mut rest, tag)
        .map(|raw| decode_text(raw.trim()))
        .unwrap_or_default()
}

fn decode_text(raw: &str) -> String {
    if let Some(cdata) = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
    {
        return cdata.trim().to_string();
    }

    decode_entities(raw)
}

/// Decodes the predefined XML entities and numeric character references in one
/// pass, so decoded text is never decoded again. Unknown references stay as-is.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| entity_char(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        }
    }
}
