//! CFQL Core - Storage-independent CFQL filter language compiler.
//!
//! CFQL is a compact postfix (stack-based) filter language: tokens are
//! comma-separated, operands come before their operator, and every literal
//! becomes a positional placeholder. This crate compiles an expression into
//! a parameterized SQL `WHERE` fragment plus its ordered argument list
//! without touching any storage engine, so both server and client code can
//! use it.
//!
//! # Main Components
//!
//! - **Lexer**: Scans an expression string into identifier, literal and
//!   operator tokens
//! - **Compiler**: Drives a value stack over the token stream, validates
//!   field references against an allow-list and collects arguments
//!
//! # Example
//!
//! ```rust
//! use cfql_core::{compile, Value};
//!
//! let filter = compile(&["name", "price"], r#"name,"Apple",=,price,100,<,or"#).unwrap();
//! assert_eq!(filter.expression, "(name = $1) or (price < $2)");
//! assert_eq!(
//!     filter.arguments,
//!     vec![Value::Text("Apple".to_string()), Value::Integer(100)]
//! );
//! ```

pub mod compiler;
pub mod error;
pub mod lexer;

// Re-export main types for convenience
pub use compiler::{compile, Filter};
pub use error::{CfqlError, CfqlResult};
pub use lexer::{Lexer, Token, Value};
