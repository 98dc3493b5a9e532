//! Re-serialization of parsed token trees.

use crate::token::Token;

/// Reassemble the original query from the top-level token spans. For any
/// successfully parsed query this is the exact input string.
pub fn to_query_string(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}
