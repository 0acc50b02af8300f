//! Field references as written in query syntax.
//!
//! # Syntax
//!
//! `name` or `name<type>`
//!
//! - **name**: one or more characters other than `<`
//! - **type**: one of `text`, `string`, `int`, `long`, `float`, `double`,
//!   `date`, matched case-insensitively
//!
//! Without a suffix the field takes the configured default type (`text`).

mod parser;

pub use parser::FieldRef;
