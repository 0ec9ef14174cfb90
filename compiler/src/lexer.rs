use phf::phf_set;
use std::iter::Peekable;
use std::str::Chars;

/// The closed keyword set of the language. An identifier-shaped lexeme
/// matching this set always lexes as a keyword.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "start", "stop", "iterate", "var", "exit", "read",
    "print", "iff", "then", "set", "func", "program",
};

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Identifier,
    Number,
    Keyword,
    Operator,
    EndOfInput,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

pub struct Lexer<'src> {
    cursor: Peekable<Chars<'src>>,
    line: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            cursor: text.chars().peekable(),
            line: 1,
        }
    }

    /// Returns the next token, advancing past the consumed input. Once
    /// the source is exhausted every further call returns `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            match self.cursor.peek() {
                None => {
                    return Token::new(TokenKind::EndOfInput, "EOF", self.line)
                }
                Some('@') => {
                    let line = self.line;
                    self.cursor.next();
                    if self.cursor.next_if_eq(&'@').is_some() {
                        self.skip_comment();
                    } else {
                        // a lone '@' opens no comment
                        return Token::new(TokenKind::Error, "@", line);
                    }
                }
                Some(&c) if c.is_ascii_alphabetic() => {
                    return self.scan_word()
                }
                Some(&c) if c.is_ascii_digit() => return self.scan_number(),
                Some(_) => return self.scan_operator(),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cursor.next_if(|c| c.is_whitespace()) {
            if c == '\n' {
                self.line += 1;
            }
        }
    }

    /// Consumes a `@@ ... @` comment body up to and including the
    /// closing `@`, still counting embedded newlines.
    fn skip_comment(&mut self) {
        while let Some(c) = self.cursor.next() {
            match c {
                '\n' => self.line += 1,
                '@' => break,
                _ => {}
            }
        }
    }

    fn scan_word(&mut self) -> Token {
        let line = self.line;
        let mut lexeme = String::new();
        while let Some(c) = self
            .cursor
            .next_if(|&c| c.is_ascii_alphanumeric() || c == '_')
        {
            lexeme.push(c);
        }
        let kind = if KEYWORDS.contains(lexeme.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, lexeme, line)
    }

    fn scan_number(&mut self) -> Token {
        let line = self.line;
        let mut lexeme = String::new();
        while let Some(c) = self.cursor.next_if(|c| c.is_ascii_digit()) {
            lexeme.push(c);
        }
        Token::new(TokenKind::Number, lexeme, line)
    }

    fn scan_operator(&mut self) -> Token {
        let line = self.line;
        let c = self.cursor.next().unwrap();
        match c {
            '~' | ':' | ';' | '+' | '-' | '/' | '%' | '(' | ')' | '{'
            | '}' | '[' | ']' | ',' | '=' => {
                Token::new(TokenKind::Operator, c.to_string(), line)
            }
            '*' => {
                if self.cursor.next_if_eq(&'*').is_some() {
                    Token::new(TokenKind::Operator, "**", line)
                } else {
                    // no standalone '*' exists in the grammar
                    Token::new(TokenKind::Error, "*", line)
                }
            }
            '.' => self.scan_relational(line),
            other => Token::new(TokenKind::Error, other.to_string(), line),
        }
    }

    /// Scans `.le.`, `.ge.`, `.lt.` or `.gt.`. A malformed prefix
    /// becomes one error token holding whatever was consumed; lexing
    /// resumes at the next unconsumed character.
    fn scan_relational(&mut self, line: usize) -> Token {
        let mut lexeme = String::from(".");
        let Some(side) = self.cursor.next_if(|&c| c == 'l' || c == 'g')
        else {
            return Token::new(TokenKind::Error, lexeme, line);
        };
        lexeme.push(side);
        let Some(order) = self.cursor.next_if(|&c| c == 'e' || c == 't')
        else {
            return Token::new(TokenKind::Error, lexeme, line);
        };
        lexeme.push(order);
        if self.cursor.next_if_eq(&'.').is_some() {
            lexeme.push('.');
            Token::new(TokenKind::Operator, lexeme, line)
        } else {
            Token::new(TokenKind::Error, lexeme, line)
        }
    }
}

#[cfg(test)]
mod test_lexer {
    use super::*;

    fn scan(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::EndOfInput;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn test_runner(src: &str, expected: &[(TokenKind, &str)]) -> bool {
        let output = scan(src)
            .iter()
            .map(|t| (t.kind, t.text.clone()))
            .collect::<Vec<_>>();
        let expected = expected
            .iter()
            .map(|&(kind, text)| (kind, text.to_string()))
            .collect::<Vec<_>>();
        output == expected
    }

    #[test]
    fn keywords_and_identifiers() {
        assert!(test_runner(
            "var count iterate x_1",
            &[
                (TokenKind::Keyword, "var"),
                (TokenKind::Identifier, "count"),
                (TokenKind::Keyword, "iterate"),
                (TokenKind::Identifier, "x_1"),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
    }

    #[test]
    fn numbers() {
        assert!(test_runner(
            "0 123",
            &[
                (TokenKind::Number, "0"),
                (TokenKind::Number, "123"),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
    }

    #[test]
    fn single_char_operators() {
        assert!(test_runner(
            "~ ; , [ ] ( ) + - / % =",
            &[
                (TokenKind::Operator, "~"),
                (TokenKind::Operator, ";"),
                (TokenKind::Operator, ","),
                (TokenKind::Operator, "["),
                (TokenKind::Operator, "]"),
                (TokenKind::Operator, "("),
                (TokenKind::Operator, ")"),
                (TokenKind::Operator, "+"),
                (TokenKind::Operator, "-"),
                (TokenKind::Operator, "/"),
                (TokenKind::Operator, "%"),
                (TokenKind::Operator, "="),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
    }

    #[test]
    fn relational_operators() {
        assert!(test_runner(
            ".le. .ge. .lt. .gt. **",
            &[
                (TokenKind::Operator, ".le."),
                (TokenKind::Operator, ".ge."),
                (TokenKind::Operator, ".lt."),
                (TokenKind::Operator, ".gt."),
                (TokenKind::Operator, "**"),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
    }

    #[test]
    fn malformed_relational_is_an_error_token() {
        assert!(test_runner(
            ".l x",
            &[
                (TokenKind::Error, ".l"),
                (TokenKind::Identifier, "x"),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
        assert!(test_runner(
            ".lt x",
            &[
                (TokenKind::Error, ".lt"),
                (TokenKind::Identifier, "x"),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
    }

    #[test]
    fn lone_star_and_at_are_error_tokens() {
        assert!(test_runner(
            "* @",
            &[
                (TokenKind::Error, "*"),
                (TokenKind::Error, "@"),
                (TokenKind::EndOfInput, "EOF"),
            ]
        ));
    }

    #[test]
    fn comments_are_invisible_to_the_token_stream() {
        let with_comment = scan("read @@ a note @ x ;");
        let without = scan("read x ;");
        assert_eq!(with_comment, without);
    }

    #[test]
    fn comment_newlines_still_count() {
        let tokens = scan("read @@ spans\ntwo lines @ x");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn line_numbers_advance_on_newline() {
        let tokens = scan("var\nx\n\ny");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn end_of_input_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfInput);
    }
}
