//! Stateless helpers, one module per kind of input.
//!
//! - `arrays` - Lookup, projection, merging, partitioning and key case over JSON collections
//! - `boolean` - Strict `true`/`false` parsing
//! - `file` - Directory content removal, idempotent delete, temp file creation
//! - `float` - Strict decimal float parsing
//! - `http` - Header block parsing and query string building/parsing
//! - `integer` - Strict decimal integer parsing
//! - `string` - Positional formatting, suffix checks, truncation, word casing
//! - `time` - SQL timestamp literals and millisecond clock

pub mod arrays;
pub mod boolean;
pub mod file;
pub mod float;
pub mod http;
pub mod integer;
pub mod string;
pub mod time;
