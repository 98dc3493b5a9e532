//! Search query parser using nom.
//!
//! Tokenizes the filter syntax into a token tree:
//!
//! ```text
//! count():>23%  browser:"Firefox 94"  !user.email:*@example.com
//! ─┬──────────  ─┬─────────────────   ─┬──────────────────────
//!  │             │                     └── negated text filter (wildcard value)
//!  │             └── quoted text value
//!  └── aggregate filter (percentage value, checked against count's signature)
//! ```

pub mod grammar;
pub mod tokens;

#[cfg(test)]
mod tests;

use crate::error::SearchResult;
use crate::token::Token;
use crate::validator::SearchConfig;

/// Ordered top-level token sequence for one parsed query.
pub type ParseResult = Vec<Token>;

/// Parse a search query with the built-in aggregate registry.
pub fn parse_search(query: &str) -> SearchResult<ParseResult> {
    parse_search_with(query, &SearchConfig::default())
}

/// Parse a search query against a caller-supplied aggregate registry.
pub fn parse_search_with(query: &str, config: &SearchConfig) -> SearchResult<ParseResult> {
    grammar::Grammar::new(query, config).parse()
}
