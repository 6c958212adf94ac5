//! Cell text markup: inline tags and author/affiliation entries.

mod inline;
mod names;

pub use inline::{strip_markup, tokenize, InlineMarkupRun, MarkupTag, MarkupTokenizer};
pub use names::{Affiliation, Author, NameParser};
