//! Filter expressions: node tree, literal coercion, translation and search.

mod literal;
mod node;
mod search;
mod translator;

pub use literal::LiteralConverter;
pub use node::*;
pub use search::search_expression;
pub use translator::{ROOT_QUALIFIER, Translator, translate};
