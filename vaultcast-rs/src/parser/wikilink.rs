//! Wikilink and embed scanning.

use crate::parser::code_span::{find_code_ranges, is_in_code};
use crate::types::TagRef;
use regex::Regex;
use std::sync::LazyLock;

// [[target]], [[target#heading]], [[target|alias]], and the same with a leading ! for embeds.
//   (!?)              - embed marker (group 1)
//   \[\[              - opening [[
//   ([^\]\|#]+)       - target (group 2)
//   (?:#([^\]\|]+))?  - heading (group 3)
//   (?:\|([^\]]+))?   - alias, or size for embeds (group 4)
//   \]\]              - closing ]]
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#([^\]\|]+))?(?:\|([^\]]+))?\]\]").unwrap()
});

/// Scan all wikilinks and embeds outside code, in order of appearance.
pub fn scan_tags(content: &str) -> Vec<TagRef> {
    let code_ranges = find_code_ranges(content);
    let mut tags = Vec::new();

    for cap in WIKILINK.captures_iter(content) {
        let full = cap.get(0).unwrap();
        if is_in_code(full.start(), &code_ranges) {
            continue;
        }

        let target = cap.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        if target.is_empty() {
            continue;
        }

        tags.push(TagRef {
            target: target.to_string(),
            heading: cap.get(3).map(|m| m.as_str().to_string()),
            alias: cap.get(4).map(|m| m.as_str().to_string()),
            embed: cap.get(1).is_some_and(|m| !m.as_str().is_empty()),
            start: full.start(),
            end: full.end(),
            line: content[..full.start()].matches('\n').count() + 1,
        });
    }

    tags
}

/// `![[asset]]` embeds.
pub fn find_embeds(content: &str) -> Vec<TagRef> {
    scan_tags(content).into_iter().filter(|t| t.embed).collect()
}

/// `[[Note]]` links (embeds excluded).
pub fn find_links(content: &str) -> Vec<TagRef> {
    scan_tags(content).into_iter().filter(|t| !t.embed).collect()
}
