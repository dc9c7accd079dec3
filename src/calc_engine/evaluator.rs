use std::collections::HashMap;

use tracing::{trace, warn};

use super::error::EvalError;
use super::postfix::Postfix;
use super::token::{Function, Token};

/// Variable name to value, supplied by the caller for one evaluation.
pub type Variables = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Records the stack machine's steps when `detailed_mode` is on.
#[derive(Debug, Clone, Default)]
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub postfix: Option<String>,
    /// Unbound variables that were read as 0, in order of first use.
    pub defaulted: Vec<String>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            postfix: None,
            defaulted: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        trace!(%operation, result, "step");
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }

    fn note_default(&mut self, name: &str) {
        if !self.defaulted.iter().any(|n| n == name) {
            self.defaulted.push(name.to_string());
        }
    }
}

fn pop(stack: &mut Vec<f64>, token: &Token) -> Result<f64, EvalError> {
    stack.pop().ok_or_else(|| EvalError::StackUnderflow {
        token: token.to_string(),
    })
}

pub fn evaluate(postfix: &Postfix, variables: &Variables) -> Result<f64, EvalError> {
    evaluate_traced(postfix, variables, &mut EvaluationTrace::new(false))
}

/// Runs a postfix sequence on a value stack.
///
/// An identifier that is not a function name reads from `variables` and
/// falls back to `0.0` when unbound. The fallback is logged and listed in
/// `trace.defaulted`, never reported as an error.
pub fn evaluate_traced(
    postfix: &Postfix,
    variables: &Variables,
    trace: &mut EvaluationTrace,
) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix.tokens() {
        match token {
            Token::Number(n) => stack.push(*n),
            Token::Identifier(name) => match Function::from_name(name) {
                Some(function) => {
                    let x = pop(&mut stack, token)?;
                    let result = function.apply(x);
                    trace.add_step(format!("{}({})", function, x), result);
                    stack.push(result);
                }
                None => {
                    let value = match variables.get(name) {
                        Some(value) => *value,
                        None => {
                            warn!(variable = %name, "unbound variable, using 0");
                            trace.note_default(name);
                            0.0
                        }
                    };
                    trace.add_step(name.clone(), value);
                    stack.push(value);
                }
            },
            Token::Operator(op) => {
                let b = pop(&mut stack, token)?;
                let a = pop(&mut stack, token)?;
                let result = op.apply(a, b);
                trace.add_step(format!("{} {} {}", a, op, b), result);
                stack.push(result);
            }
            Token::LeftParen | Token::RightParen => {
                return Err(EvalError::UnexpectedToken(token.to_string()));
            }
        }
    }

    match stack.as_slice() {
        [result] => Ok(*result),
        values => Err(EvalError::LeftoverOperands(values.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::token::Operator;

    fn num(n: f64) -> Token {
        Token::Number(n)
    }

    fn op(c: char) -> Token {
        Token::Operator(Operator::from_char(c).unwrap())
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }

    #[test]
    fn test_operand_order() {
        let postfix = Postfix::from(vec![num(6.0), num(3.0), op('/')]);
        assert_eq!(evaluate(&postfix, &Variables::new()), Ok(2.0));

        let postfix = Postfix::from(vec![num(3.0), num(2.0), op('-')]);
        assert_eq!(evaluate(&postfix, &Variables::new()), Ok(1.0));
    }

    #[test]
    fn test_variables_and_functions() {
        let mut vars = Variables::new();
        vars.insert("x".to_string(), 16.0);
        let postfix = Postfix::from(vec![ident("x"), ident("sqrt"), num(1.0), op('+')]);
        assert_eq!(evaluate(&postfix, &vars), Ok(5.0));
    }

    #[test]
    fn test_unbound_variable_defaults_to_zero() {
        let postfix = Postfix::from(vec![ident("y"), num(2.0), op('+'), ident("y"), op('*')]);
        let mut trace = EvaluationTrace::new(false);
        let result = evaluate_traced(&postfix, &Variables::new(), &mut trace);
        assert_eq!(result, Ok(0.0));
        assert_eq!(trace.defaulted, vec!["y".to_string()]);
        assert!(trace.steps.is_empty());
    }

    #[test]
    fn test_detailed_trace() {
        let postfix = Postfix::from(vec![num(2.0), num(3.0), op('^'), ident("cos")]);
        let mut trace = EvaluationTrace::new(true);
        let result = evaluate_traced(&postfix, &Variables::new(), &mut trace).unwrap();
        assert_eq!(result, 8.0f64.cos());
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0], Step { operation: "2 ^ 3".into(), result: 8.0 });
        assert_eq!(trace.steps[1].operation, "cos(8)");
    }

    #[test]
    fn test_stack_underflow() {
        let postfix = Postfix::from(vec![num(1.0), op('+')]);
        assert_eq!(
            evaluate(&postfix, &Variables::new()),
            Err(EvalError::StackUnderflow { token: "+".into() })
        );

        let postfix = Postfix::from(vec![ident("sin")]);
        assert_eq!(
            evaluate(&postfix, &Variables::new()),
            Err(EvalError::StackUnderflow { token: "sin".into() })
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let postfix = Postfix::from(vec![num(1.0), num(2.0)]);
        assert_eq!(evaluate(&postfix, &Variables::new()), Err(EvalError::LeftoverOperands(2)));
        assert_eq!(
            evaluate(&Postfix::from(Vec::new()), &Variables::new()),
            Err(EvalError::LeftoverOperands(0))
        );
    }

    #[test]
    fn test_parenthesis_rejected() {
        let postfix = Postfix::from(vec![Token::LeftParen, num(1.0)]);
        assert_eq!(
            evaluate(&postfix, &Variables::new()),
            Err(EvalError::UnexpectedToken("(".into()))
        );
    }
}
