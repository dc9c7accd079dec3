//! Arithmetic expression evaluation through postfix (RPN) conversion.
//!
//! ```
//! use rpncalc::{evaluate_expression, Variables};
//!
//! let mut vars = Variables::new();
//! vars.insert("x".to_string(), 3.0);
//! assert_eq!(evaluate_expression("(x + 1) ^ 2", &vars).unwrap(), 16.0);
//! ```

pub mod calc_engine;
pub mod config;
pub mod display;
pub mod session;

pub use calc_engine::{evaluate_expression, ParseError, Variables};
