//! Picture file lexer.
//!
//! Splits picture text into whitespace-separated [`Token`]s with their line
//! numbers. Line ends are significant, so each one that closes a non-empty
//! line becomes an [`Token::EndOfLine`].

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Upper-cased word starting with a letter, e.g. `CURVE`, `P`
    Keyword(String),
    /// Finite real literal, e.g. `3`, `-0.25`, `1.5e-3`
    Number(f64),
    /// Anything else; rejected by the parser with the record it belongs to.
    Invalid(String),
    EndOfLine,
}

/// A token and the 1-based line it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// Tokenize picture text.
///
/// Blank lines and `#` comments produce no tokens. Numbers are read with
/// Rust's own float parser, which always uses `.` as decimal separator.
pub fn tokenize(input: &str) -> Vec<Spanned> {
    let mut tokens = Vec::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line = index + 1;
        let content = match raw_line.find('#') {
            Some(comment) => &raw_line[..comment],
            None => raw_line,
        };

        let before = tokens.len();
        for word in content.split_ascii_whitespace() {
            tokens.push(Spanned {
                token: classify(word),
                line,
            });
        }
        if tokens.len() > before {
            tokens.push(Spanned {
                token: Token::EndOfLine,
                line,
            });
        }
    }

    tokens
}

fn classify(word: &str) -> Token {
    let first = word.as_bytes()[0];
    if first.is_ascii_alphabetic() {
        if word.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Token::Keyword(word.to_ascii_uppercase());
        }
        return Token::Invalid(word.to_string());
    }
    if first.is_ascii_digit() || matches!(first, b'-' | b'+' | b'.') {
        if let Ok(v) = word.parse::<f64>() {
            if v.is_finite() {
                return Token::Number(v);
            }
        }
    }
    Token::Invalid(word.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_keyword_is_uppercased() {
        assert_eq!(
            kinds("curve 3"),
            vec![Token::Keyword("CURVE".into()), Token::Number(3.0), Token::EndOfLine]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("P -1.5 +2 .25 1e-3"),
            vec![
                Token::Keyword("P".into()),
                Token::Number(-1.5),
                Token::Number(2.0),
                Token::Number(0.25),
                Token::Number(0.001),
                Token::EndOfLine,
            ]
        );
    }

    #[test]
    fn test_comma_decimal_is_invalid() {
        assert_eq!(kinds("1,5"), vec![Token::Invalid("1,5".into()), Token::EndOfLine]);
    }

    #[test]
    fn test_non_finite_is_invalid() {
        assert_eq!(kinds("1e999")[0], Token::Invalid("1e999".into()));
        assert_eq!(kinds("NaN")[0], Token::Keyword("NAN".into()));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let tokens = tokenize("# header\n\nPICTURE 1 # one curve\n\r\nEND\n");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens[2].token, Token::EndOfLine);
        assert_eq!(tokens[3].line, 5);
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = tokenize("P 1 2 3\r\nEND\r\n");
        assert_eq!(tokens[3].token, Token::Number(3.0));
        assert_eq!(tokens[4].token, Token::EndOfLine);
        assert_eq!(tokens[5].token, Token::Keyword("END".into()));
    }
}
