//! Search query parser for `key:value` filter syntax.
//!
//! Parses queries like `count():>23% browser:firefox !release:1.2.*` into a
//! typed token tree, validating aggregate filter values against declared
//! function signatures without failing the whole parse.
//!
//! ```ignore
//! use sift_core::prelude::*;
//! let tokens = parse_search("count():>23%")?;
//! ```

pub mod error;
pub mod fmt;
pub mod parser;
pub mod token;
pub mod transformer;
pub mod validator;

pub use parser::{ParseResult, parse_search, parse_search_with};
pub use validator::SearchConfig;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::parser::{ParseResult, parse_search, parse_search_with};
    pub use crate::token::*;
    pub use crate::validator::*;
}
