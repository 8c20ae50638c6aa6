//! Inline markup handling for message text.
//!
//! Message bodies may carry markdown emphasis/code and inline HTML tags
//! (`<b>`, `<i>`, `<code>`, `<mark>`, `<br>`, ...) plus entities, as produced
//! by the search backend. This module:
//! - finds byte offsets where a partial reveal cannot split markup
//!   (`reveal_checkpoints`)
//! - parses (possibly partial) markup into UI-agnostic styled lines
//!   (`parse_lines`)
//! - wraps styled lines to a column width (`wrap_line`)

mod checkpoints;
mod parse;
mod style;
mod wrap;

pub use checkpoints::reveal_checkpoints;
pub use parse::parse_lines;
pub use style::{Inline, Style, StyledLine, StyledSpan, Tone};
pub use wrap::wrap_line;
