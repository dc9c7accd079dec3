use super::error::LexError;
use super::token::{Operator, Token};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.'
}

fn is_numeric_start(word: &str) -> bool {
    word.starts_with(|c: char| c.is_numeric() || c == '.')
}

/// `1e-3`: a sign right after the exponent marker belongs to the number.
fn is_exponent_sign(word: &str, c: char) -> bool {
    (c == '+' || c == '-') && is_numeric_start(word) && word.ends_with(['e', 'E'])
}

fn flush_word(word: &mut String, tokens: &mut Vec<Token>) -> Result<(), LexError> {
    if word.is_empty() {
        return Ok(());
    }

    let token = if is_numeric_start(word) {
        word.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| LexError::MalformedNumber(word.clone()))?
    } else if word.contains('.') {
        return Err(LexError::InvalidIdentifier(word.clone()));
    } else {
        Token::Identifier(word.clone())
    };

    tokens.push(token);
    word.clear();
    Ok(())
}

/// Splits an expression into tokens, left to right.
///
/// Runs of letters, digits and `.` form one word: a word starting with a
/// digit or `.` must be a valid number (so `2x` is rejected rather than
/// read as implicit multiplication), anything else is an identifier and
/// may not contain `.`.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for (offset, c) in expression.chars().enumerate() {
        if is_word_char(c) || is_exponent_sign(&word, c) {
            word.push(c);
            continue;
        }

        flush_word(&mut word, &mut tokens)?;

        match c {
            _ if c.is_whitespace() => {}
            '(' => tokens.push(Token::LeftParen),
            ')' => tokens.push(Token::RightParen),
            _ => match Operator::from_char(c) {
                Some(op) => tokens.push(Token::Operator(op)),
                None => return Err(LexError::UnexpectedCharacter { ch: c, offset }),
            },
        }
    }

    flush_word(&mut word, &mut tokens)?;
    Ok(tokens)
}
