//! Terminator-preserving line scanner for `key=value` configuration files.
//!
//! The scanner hands out each logical line as raw bytes together with a flag
//! recording whether the line ended in `\n`. A file whose last line has no
//! newline yields that line with `terminated == false`, so a writer can
//! reproduce the input byte-for-byte.

mod key;
mod scanner;

pub use key::{candidate_key, is_space};
pub use scanner::{Line, LineScanner};
