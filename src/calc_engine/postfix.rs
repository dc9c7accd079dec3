use std::fmt;

use super::error::SyntaxError;
use super::token::{Associativity, Function, Operator, Token};

/// A token sequence in evaluation order, free of parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Postfix(Vec<Token>);

impl Postfix {
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Token>> for Postfix {
    fn from(tokens: Vec<Token>) -> Self {
        Postfix(tokens)
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
            first = false;
        }
        Ok(())
    }
}

enum StackItem {
    Op(Operator),
    Func(Function),
    LeftParen,
}

fn should_pop(top: Operator, incoming: Operator) -> bool {
    match incoming.associativity() {
        Associativity::Left => top.precedence() >= incoming.precedence(),
        Associativity::Right => top.precedence() > incoming.precedence(),
    }
}

/// Shunting-yard conversion of infix tokens to postfix order.
///
/// Besides reordering, the converter tracks whether an operand or an
/// operator is expected next, so malformed input such as `2 + * 3` or
/// `(2 + 3` fails here instead of producing a wrong number later.
pub fn to_postfix(tokens: &[Token]) -> Result<Postfix, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }

    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackItem> = Vec::new();
    let mut expect_operand = true;
    // function name waiting for its opening parenthesis
    let mut pending_call: Option<Function> = None;
    let mut previous: Option<&Token> = None;

    for token in tokens {
        if let Some(function) = pending_call.take() {
            if *token != Token::LeftParen {
                return Err(SyntaxError::MissingFunctionArgument(function.name().to_string()));
            }
        }

        match token {
            Token::Number(_) => {
                if !expect_operand {
                    return Err(SyntaxError::MissingOperator { found: token.to_string() });
                }
                output.push(token.clone());
                expect_operand = false;
            }
            Token::Identifier(name) => {
                if !expect_operand {
                    return Err(SyntaxError::MissingOperator { found: name.clone() });
                }
                match Function::from_name(name) {
                    Some(function) => {
                        stack.push(StackItem::Func(function));
                        pending_call = Some(function);
                    }
                    None => {
                        output.push(token.clone());
                        expect_operand = false;
                    }
                }
            }
            Token::LeftParen => {
                if !expect_operand {
                    return Err(SyntaxError::MissingOperator { found: "(".to_string() });
                }
                stack.push(StackItem::LeftParen);
            }
            Token::RightParen => {
                if expect_operand {
                    return Err(match previous {
                        Some(Token::LeftParen) => SyntaxError::EmptyParentheses,
                        _ => SyntaxError::MissingOperand { found: ")".to_string() },
                    });
                }
                loop {
                    match stack.pop() {
                        Some(StackItem::Op(op)) => output.push(Token::Operator(op)),
                        Some(StackItem::LeftParen) => break,
                        // a function always sits below its own '(', so
                        // reaching one here means no '(' was open
                        Some(StackItem::Func(_)) | None => {
                            return Err(SyntaxError::UnmatchedRightParen)
                        }
                    }
                }
                if let Some(StackItem::Func(function)) = stack.last() {
                    output.push(Token::Identifier(function.name().to_string()));
                    stack.pop();
                }
            }
            Token::Operator(op) => {
                if expect_operand {
                    return Err(SyntaxError::MissingOperand { found: op.to_string() });
                }
                while let Some(StackItem::Op(top)) = stack.last() {
                    if !should_pop(*top, *op) {
                        break;
                    }
                    output.push(Token::Operator(*top));
                    stack.pop();
                }
                stack.push(StackItem::Op(*op));
                expect_operand = true;
            }
        }

        previous = Some(token);
    }

    if let Some(function) = pending_call {
        return Err(SyntaxError::MissingFunctionArgument(function.name().to_string()));
    }
    if expect_operand {
        return Err(SyntaxError::MissingOperand { found: "end of input".to_string() });
    }

    while let Some(item) = stack.pop() {
        match item {
            StackItem::Op(op) => output.push(Token::Operator(op)),
            StackItem::Func(function) => output.push(Token::Identifier(function.name().to_string())),
            StackItem::LeftParen => return Err(SyntaxError::UnmatchedLeftParen),
        }
    }

    Ok(Postfix(output))
}
