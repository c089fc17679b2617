use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

use crate::result::prelude::*;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(concat!(
        r"^(?:",
        r"(?P<space>[ \t\r]+)|",
        r"(?P<comment>;.*)|",
        r"(?P<comma>,)|",
        r"(?P<register>[rR](?:1[0-5]|[0-9])\b)|",
        r"(?P<ident>[A-Za-z_][A-Za-z0-9_]*)|",
        r"(?P<int>0[xX][0-9A-Fa-f_]+|0[bB][01_]+|[0-9][0-9_]*)\b",
        r")"
    )).unwrap();
}

/// Defines the class of the token.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum TokenClass {
    /// Matches a register name, `r0` to `r15`.
    Register,
    /// Matches an identifier, that is, an instruction mnemonic or a directive.
    Ident,
    /// Matches a numeric literal: decimal, `0x` hexadecimal or `0b` binary.
    IntegerLiteral,
    /// Matches the token `,`.
    Comma
}
impl Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match *self {
            TokenClass::Register => "register",
            TokenClass::Ident => "identifier",
            TokenClass::IntegerLiteral => "integer",
            TokenClass::Comma => "`,`"
        };
        f.write_str(description)
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Token {
    class: TokenClass,
    text: String,
    location: Location
}
impl Token {
    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Value of an integer literal; `None` if it does not fit 64 bits or is not a literal.
    pub fn integer_value(&self) -> Option<u64> {
        if self.class != TokenClass::IntegerLiteral {
            return None;
        }
        let digits = self.text.replace('_', "");
        let lc = digits.to_lowercase();
        if let Some(hex) = lc.strip_prefix("0x") {
            u64::from_str_radix(hex, 16).ok()
        } else if let Some(bin) = lc.strip_prefix("0b") {
            u64::from_str_radix(bin, 2).ok()
        } else {
            lc.parse().ok()
        }
    }
}
impl Locate for Token {
    fn locate(&self) -> Location {
        self.location
    }
}
impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// The tokens of one source line, comments and whitespace stripped.
#[derive(Clone, Debug)]
pub struct TokenLine {
    line: usize,
    end: usize,
    tokens: Vec<Token>
}
impl TokenLine {
    /// Splits `source` into tokens, reporting every illegal symbol into `log`.
    ///
    /// Columns and lengths are counted in characters.
    pub fn tokenize(line: usize, source: &str, log: &mut AssemblerLog) -> Self {
        let mut tokens = Vec::new();
        let mut column = 0;
        let mut rest = source;

        while !rest.is_empty() {
            let captures = match TOKEN.captures(rest) {
                Some(captures) => captures,
                None => {
                    let len = rest.chars().next().map(|c| c.len_utf8()).unwrap_or(1);
                    let skip = match rest.find(|c: char| c.is_whitespace() || c == ',' || c == ';') {
                        Some(n) if n > 0 => n,
                        Some(_) => len,
                        None => rest.len()
                    };
                    let width = rest[..skip].chars().count();
                    log.err(Notification::error_lexer_illegal_symbol(Location::new(line, column, width)));
                    column += width;
                    rest = &rest[skip..];
                    continue;
                }
            };
            let whole = captures.get(0).map(|m| m.as_str()).unwrap_or("");
            let width = whole.chars().count();
            let class = if captures.name("comma").is_some() {
                Some(TokenClass::Comma)
            } else if captures.name("register").is_some() {
                Some(TokenClass::Register)
            } else if captures.name("ident").is_some() {
                Some(TokenClass::Ident)
            } else if captures.name("int").is_some() {
                Some(TokenClass::IntegerLiteral)
            } else {
                None
            };
            if let Some(class) = class {
                tokens.push(Token {
                    class,
                    text: whole.to_owned(),
                    location: Location::new(line, column, width)
                });
            }
            column += width;
            rest = &rest[whole.len()..];
        }

        let end = source.find(';').unwrap_or_else(|| source.len());
        let end = source[..end].trim_end().chars().count();
        TokenLine { line, end, tokens }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Location right after the last meaningful character of the line.
    pub fn end_of_line(&self) -> Location {
        Location::new(self.line, self.end, 1)
    }
}
