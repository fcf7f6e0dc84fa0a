//! Code detection, so tags inside code are left alone.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// Opening or closing fence: ``` or ~~~ (three or more) at the start of a line.
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(`{3,}|~{3,})").unwrap());

// Inline code: ``double`` (may hold single backticks) or `single`.
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``(?:[^`]|`[^`])*``|`[^`\n]+`").unwrap());

/// Byte ranges of fenced blocks and inline code spans, sorted by start.
pub fn find_code_ranges(content: &str) -> Vec<Range<usize>> {
    let mut ranges = fenced_blocks(content);

    for m in INLINE_CODE.find_iter(content) {
        if !ranges.iter().any(|r| overlaps(r, &m.range())) {
            ranges.push(m.range());
        }
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Check if a byte offset falls inside any code range.
pub fn is_in_code(offset: usize, ranges: &[Range<usize>]) -> bool {
    ranges.iter().any(|r| r.contains(&offset))
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn fenced_blocks(content: &str) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut open: Option<(usize, &str)> = None;

    for m in FENCE.find_iter(content) {
        let line_end = content[m.end()..]
            .find('\n')
            .map(|i| m.end() + i)
            .unwrap_or(content.len());

        match open {
            None => open = Some((m.start(), m.as_str())),
            Some((start, fence)) => {
                // A closing fence uses the same character, is at least as long,
                // and has nothing but whitespace after it.
                let same_kind = m.as_str().starts_with(&fence[..1]) && m.len() >= fence.len();
                if same_kind && content[m.end()..line_end].trim().is_empty() {
                    blocks.push(start..line_end);
                    open = None;
                }
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_code_block() {
        let content = "Some text\n\n```rust\nlet x = [[not a link]];\n```\n\nMore text";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        let inside = content.find("[[not").unwrap();
        assert!(is_in_code(inside, &ranges));
        assert!(!is_in_code(content.find("More").unwrap(), &ranges));
    }

    #[test]
    fn test_inline_code() {
        let content = "Some `inline [[code]]` here";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert!(is_in_code(content.find("[[").unwrap(), &ranges));
    }

    #[test]
    fn test_double_backtick_inline() {
        let content = "Some ``inline `code` with backticks`` here";
        assert_eq!(find_code_ranges(content).len(), 1);
    }

    #[test]
    fn test_tilde_and_backtick_fences() {
        let content = "```\nouter\n```\n\ntext\n\n~~~\ninner\n~~~";
        assert_eq!(find_code_ranges(content).len(), 2);
    }

    #[test]
    fn test_mismatched_fence_does_not_close() {
        let content = "```\ncode\n~~~\nstill code\n```\nafter";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert!(is_in_code(content.find("still").unwrap(), &ranges));
        assert!(!is_in_code(content.find("after").unwrap(), &ranges));
    }

    #[test]
    fn test_unclosed_fence_is_not_code() {
        let content = "```\nnever closed [[Link]]";
        let ranges = find_code_ranges(content);
        assert!(!is_in_code(content.find("[[").unwrap(), &ranges));
    }
}
