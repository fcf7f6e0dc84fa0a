//! Parsers for the note syntax the sync engine cares about.

pub mod code_span;
pub mod frontmatter;
pub mod wikilink;

pub use code_span::{find_code_ranges, is_in_code};
pub use frontmatter::{parse_frontmatter, split_frontmatter, FrontmatterSplit};
pub use wikilink::{find_embeds, find_links, scan_tags};
