/// Suffix appended to payloads cut at the preview budget.
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Truncate a string to a maximum length
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect::<String>() + TRUNCATION_MARKER
    }
}

/// Plain search terms of a match-query, lowercased.
///
/// Boolean operators, quotes, wildcards and grouping are dropped; this only
/// feeds the substring-window fallback, never the index itself.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .filter(|t| !matches!(*t, "AND" | "OR" | "NOT" | "NEAR"))
        .map(|t| t.to_lowercase())
        .collect()
}

/// Excerpt of `text` centred on the earliest query term, with that term
/// wrapped in `open`/`close`.
///
/// Used when the index cannot produce its own snippet. Without any term hit
/// the excerpt is the head of the text.
pub fn context_excerpt(text: &str, query: &str, width: usize, open: &str, close: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let hit = query_terms(query)
        .iter()
        .filter_map(|term| {
            let needle: Vec<char> = term.chars().collect();
            find_chars(&folded, &needle).map(|pos| (pos, needle.len()))
        })
        .min_by_key(|(pos, _)| *pos);

    let len = chars.len();
    let (start, end) = match hit {
        Some((pos, term_len)) => {
            let start = pos.saturating_sub(width / 2);
            let end = (start + width).max(pos + term_len).min(len);
            (start, end)
        }
        None => (0, width.min(len)),
    };

    let mut out = String::new();
    if start > 0 {
        out.push_str("...");
    }
    match hit {
        Some((pos, term_len)) => {
            out.extend(&chars[start..pos]);
            out.push_str(open);
            out.extend(&chars[pos..pos + term_len]);
            out.push_str(close);
            out.extend(&chars[pos + term_len..end]);
        }
        None => out.extend(&chars[start..end]),
    }
    if end < len {
        out.push_str("...");
    }
    out
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
