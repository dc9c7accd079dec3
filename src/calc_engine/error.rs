use thiserror::Error;

/// A failure from any stage, together with the expression that caused it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid expression '{expression}': {kind}")]
pub struct ParseError {
    pub expression: String,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(expression: &str, kind: impl Into<ErrorKind>) -> Self {
        ParseError {
            expression: expression.to_string(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("missing operand before '{found}'")]
    MissingOperand { found: String },
    #[error("missing operator before '{found}'")]
    MissingOperator { found: String },
    #[error("unmatched '('")]
    UnmatchedLeftParen,
    #[error("unmatched ')'")]
    UnmatchedRightParen,
    #[error("empty parentheses")]
    EmptyParentheses,
    #[error("function '{0}' requires a parenthesized argument")]
    MissingFunctionArgument(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("not enough operands for '{token}'")]
    StackUnderflow { token: String },
    #[error("expected a single result, found {0} values")]
    LeftoverOperands(usize),
    #[error("unexpected '{0}' in postfix sequence")]
    UnexpectedToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_expression() {
        let err = ParseError::new("2 + * 3", SyntaxError::MissingOperand { found: "*".into() });
        assert_eq!(err.expression, "2 + * 3");
        assert_eq!(
            err.to_string(),
            "invalid expression '2 + * 3': missing operand before '*'"
        );
        assert!(matches!(err.kind, ErrorKind::Syntax(_)));
    }
}
