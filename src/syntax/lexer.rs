use crate::error::EmitError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Bool(bool),
    Ident(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Ellipsis,
    Pipe,
    Amp,
    At,
    Hash,
    Question,
    Equals,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source text.
    pub pos: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, EmitError> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some((idx, ch)) = chars.peek().copied() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let single = match ch {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '<' => Some(TokenKind::Lt),
            '>' => Some(TokenKind::Gt),
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            '|' => Some(TokenKind::Pipe),
            '&' => Some(TokenKind::Amp),
            '@' => Some(TokenKind::At),
            '#' => Some(TokenKind::Hash),
            '?' => Some(TokenKind::Question),
            '=' => Some(TokenKind::Equals),
            _ => None,
        };
        if let Some(kind) = single {
            chars.next();
            tokens.push(Token { kind, pos: idx });
            continue;
        }

        match ch {
            '/' => {
                chars.next();
                match chars.peek().copied() {
                    Some((_, '/')) => {
                        while let Some((_, c)) = chars.peek().copied() {
                            if c == '\n' {
                                break;
                            }
                            chars.next();
                        }
                    }
                    Some((_, '*')) => {
                        chars.next();
                        let mut closed = false;
                        while let Some((_, c)) = chars.next() {
                            if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                                chars.next();
                                closed = true;
                                break;
                            }
                        }
                        if !closed {
                            return Err(error_at(input, idx, "unterminated block comment"));
                        }
                    }
                    _ => return Err(error_at(input, idx, "unexpected character '/'")),
                }
            }
            '.' => {
                chars.next();
                let mut dots = 1;
                while dots < 3 && matches!(chars.peek(), Some((_, '.'))) {
                    chars.next();
                    dots += 1;
                }
                let kind = match dots {
                    1 => TokenKind::Dot,
                    3 => TokenKind::Ellipsis,
                    _ => return Err(error_at(input, idx, "unexpected '..'; expected '...'")),
                };
                tokens.push(Token { kind, pos: idx });
            }
            '0'..='9' | '-' => {
                let start = idx;
                let mut end = idx;
                chars.next();
                let mut seen_dot = false;
                while let Some((i, c)) = chars.peek().copied() {
                    if c.is_ascii_digit() {
                        end = i;
                        chars.next();
                    } else if c == '.' && !seen_dot {
                        seen_dot = true;
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let raw = &input[start..=end];
                let n: f64 = raw.parse().map_err(|e| {
                    error_at(input, start, format!("invalid number literal '{raw}': {e}"))
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(n),
                    pos: start,
                });
            }
            '"' => {
                chars.next();
                let start = idx;
                let mut out = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    if c == '\\' {
                        if let Some((_, esc)) = chars.next() {
                            match esc {
                                '"' => out.push('"'),
                                '\\' => out.push('\\'),
                                'n' => out.push('\n'),
                                't' => out.push('\t'),
                                'r' => out.push('\r'),
                                other => {
                                    out.push('\\');
                                    out.push(other);
                                }
                            }
                        } else {
                            return Err(error_at(input, start, "unterminated escape sequence"));
                        }
                    } else {
                        out.push(c);
                    }
                }

                if !closed {
                    return Err(error_at(input, start, "unterminated string literal"));
                }

                tokens.push(Token {
                    kind: TokenKind::String(out),
                    pos: start,
                });
            }
            c if is_ident_start(c) => {
                let start = idx;
                let mut end = idx;
                while let Some((i, cc)) = chars.peek().copied() {
                    if is_ident_continue(cc) {
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let raw = &input[start..=end];
                let kind = match raw {
                    "true" => TokenKind::Bool(true),
                    "false" => TokenKind::Bool(false),
                    _ => TokenKind::Ident(raw.to_string()),
                };
                tokens.push(Token { kind, pos: start });
            }
            _ => return Err(error_at(input, idx, format!("unexpected character '{ch}'"))),
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: input.len(),
    });
    Ok(tokens)
}

/// Converts a byte offset into a 1-based `(line, column)` pair.
pub fn line_col(input: &str, pos: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in input.char_indices() {
        if i >= pos {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

pub(crate) fn error_at(input: &str, pos: usize, message: impl Into<String>) -> EmitError {
    let (line, column) = line_col(input, pos);
    EmitError::parse(line, column, message)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
