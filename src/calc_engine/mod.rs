//! The expression pipeline: [`tokenize`] → [`to_postfix`] → [`evaluate`].

mod error;
mod evaluator;
mod postfix;
mod token;
mod tokenizer;

use tracing::debug;

pub use error::{ErrorKind, EvalError, LexError, ParseError, SyntaxError};
pub use evaluator::{evaluate, evaluate_traced, EvaluationTrace, Step, Variables};
pub use postfix::{to_postfix, Postfix};
pub use token::{Associativity, Function, Operator, Token};
pub use tokenizer::tokenize;

/// Evaluates `expression` against `variables`.
///
/// Unbound variables read as `0.0`; use [`unbound_variables`] first to
/// find and bind them.
pub fn evaluate_expression(expression: &str, variables: &Variables) -> Result<f64, ParseError> {
    evaluate_with_trace(expression, variables, &mut EvaluationTrace::new(false))
}

pub fn evaluate_with_trace(
    expression: &str,
    variables: &Variables,
    trace: &mut EvaluationTrace,
) -> Result<f64, ParseError> {
    let tokens = tokenize(expression).map_err(|e| ParseError::new(expression, e))?;
    let postfix = to_postfix(&tokens).map_err(|e| ParseError::new(expression, e))?;
    debug!(tokens = tokens.len(), postfix = %postfix, "converted expression");

    if trace.detailed_mode {
        trace.postfix = Some(postfix.to_string());
    }

    evaluate_traced(&postfix, variables, trace).map_err(|e| ParseError::new(expression, e))
}

/// Names of the variables in `expression` that `variables` does not bind,
/// in order of first appearance.
pub fn unbound_variables(expression: &str, variables: &Variables) -> Result<Vec<String>, ParseError> {
    let tokens = tokenize(expression).map_err(|e| ParseError::new(expression, e))?;
    let mut names: Vec<String> = Vec::new();

    for token in tokens {
        if let Token::Identifier(name) = token {
            if Function::from_name(&name).is_none()
                && !variables.contains_key(&name)
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Re-renders an expression from its tokens with uniform spacing,
/// e.g. `sin( x)*2` becomes `sin(x) * 2`.
pub fn format_expression(expression: &str) -> Result<String, ParseError> {
    let tokens = tokenize(expression).map_err(|e| ParseError::new(expression, e))?;
    let mut result = String::new();
    let mut previous: Option<&Token> = None;

    for token in &tokens {
        let tight = match (previous, token) {
            (None, _) => true,
            (Some(Token::LeftParen), _) | (_, Token::RightParen) => true,
            (Some(Token::Identifier(name)), Token::LeftParen) => Function::from_name(name).is_some(),
            _ => false,
        };
        if !tight {
            result.push(' ');
        }
        result.push_str(&token.to_string());
        previous = Some(token);
    }
    Ok(result)
}
