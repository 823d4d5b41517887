use super::{Expr, UnaryFn};
use crate::StrError;

/// Defines the tokens produced by the scanner
#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

/// Scans the source string into a list of tokens
fn scan(source: &str) -> Result<Vec<Token>, StrError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // scientific notation
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            match text.parse::<f64>() {
                Ok(n) => tokens.push(Token::Num(n)),
                Err(_) => return Err("cannot parse number in expression"),
            }
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else {
            let token = match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '(' => Token::LParen,
                ')' => Token::RParen,
                _ => return Err("expression contains an invalid character"),
            };
            tokens.push(token);
            i += 1;
        }
    }
    Ok(tokens)
}

/// Parses an expression string into a tree, resolving symbols by position
///
/// The position of each name in `symbols` becomes the variable index of the
/// corresponding [`Expr::Var`] node (and thus its parameter buffer slot).
pub fn parse_expr(source: &str, symbols: &[String]) -> Result<Expr, StrError> {
    let tokens = scan(source)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        symbols,
    };
    let root = parser.expression()?;
    if parser.position != parser.tokens.len() {
        return Err("expression has trailing tokens after a complete expression");
    }
    Ok(root)
}

/// Implements a recursive descent parser over the token list
struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    symbols: &'a [String],
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, token: Token, message: StrError) -> Result<(), StrError> {
        if self.advance().as_ref() == Some(&token) {
            Ok(())
        } else {
            Err(message)
        }
    }

    /// expression := term (('+'|'-') term)*
    fn expression(&mut self) -> Result<Expr, StrError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.advance();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    /// term := unary (('*'|'/') unary)*
    fn term(&mut self) -> Result<Expr, StrError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Slash) => {
                    self.advance();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    /// unary := '-' unary | power
    ///
    /// A leading minus wraps the whole power, so `-x^2` reads as `-(x^2)`;
    /// the other grouping stays reachable with parentheses, `(-x)^2`.
    fn unary(&mut self) -> Result<Expr, StrError> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.power()
    }

    /// power := primary ('^' unary)?  (right associative)
    fn power(&mut self) -> Result<Expr, StrError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    /// primary := number | name '(' expression ')' | name | '(' expression ')'
    fn primary(&mut self) -> Result<Expr, StrError> {
        match self.advance() {
            Some(Token::Num(n)) => Ok(Expr::Num(n)),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.advance();
                    let function = match name.as_str() {
                        "sin" => UnaryFn::Sin,
                        "cos" => UnaryFn::Cos,
                        "tan" => UnaryFn::Tan,
                        "exp" => UnaryFn::Exp,
                        "ln" | "log" => UnaryFn::Ln,
                        "sqrt" => UnaryFn::Sqrt,
                        "tanh" => UnaryFn::Tanh,
                        "abs" => UnaryFn::Abs,
                        _ => return Err("expression contains an unknown function"),
                    };
                    let argument = self.expression()?;
                    self.expect(Token::RParen, "expression has unbalanced parentheses")?;
                    Ok(Expr::Fun(function, Box::new(argument)))
                } else {
                    match self.symbols.iter().position(|s| *s == name) {
                        Some(index) => Ok(Expr::Var(index)),
                        None => Err("expression contains an unknown symbol"),
                    }
                }
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(Token::RParen, "expression has unbalanced parentheses")?;
                Ok(inner)
            }
            _ => Err("expression ends unexpectedly"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
