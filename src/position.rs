/*!
The position expression grammar from §4.1: `10`, `-3`, `25%`, `[12%+5]`, and
sums of those terms, parsed against a known container length into a signed
index.

```text
POS   ::= TERM (('+'|'-') TERM)*
TERM  ::= NUMBER | NUMBER '%' | '[' POS ']'
```

A `[…]`-wrapped term is evaluated first and truncated to `[0, len]` before
it participates in any enclosing arithmetic; nesting truncates
innermost-first. The crate never clamps for you outside of explicit `[…]`
wrapping — callers that want the final result clamped use
[`parse_position_clamped`].
*/

use crate::error::BuildError;

/// Parses a position expression, returning a (possibly negative,
/// possibly out-of-range) signed index.
///
/// `len` is the length of the container the position is relative to; it is
/// only consulted to resolve `%` terms and `[…]` clamps, never to reject an
/// otherwise well-formed expression.
pub fn parse_position(len: usize, expr: &str) -> Result<isize, BuildError> {
    let mut parser = Parser::new(expr, len);
    let value = parser.parse_sum()?;
    parser.expect_end()?;
    Ok(value)
}

/// Like [`parse_position`], but clamps the final result to `[0, len]` and
/// returns it as a `usize`.
pub fn parse_position_clamped(len: usize, expr: &str) -> Result<usize, BuildError> {
    let value = parse_position(len, expr)?;
    Ok(clamp(value, len))
}

fn clamp(value: isize, len: usize) -> usize {
    if value < 0 {
        0
    } else if value as usize > len {
        len
    } else {
        value as usize
    }
}

/// Rounds `numerator / 100` to the nearest integer, ties away from zero.
fn percent_of(numerator: isize, len: usize) -> isize {
    let num = numerator * len as isize;
    let sign = if num < 0 { -1 } else { 1 };
    let abs = num.abs();
    sign * ((abs + 50) / 100)
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    len: usize,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, len: usize) -> Parser<'a> {
        Parser { chars: src.chars().collect(), pos: 0, len, src }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn err(&self, msg: impl Into<String>) -> BuildError {
        BuildError::syntax(self.src, msg)
    }

    /// `POS ::= TERM (('+'|'-') TERM)*`
    fn parse_sum(&mut self) -> Result<isize, BuildError> {
        self.skip_ws();
        let mut acc = self.parse_term(true)?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('+') => {
                    self.bump();
                    self.skip_ws();
                    acc += self.parse_term(false)?;
                }
                Some('-') => {
                    self.bump();
                    self.skip_ws();
                    acc -= self.parse_term(false)?;
                }
                Some(c) if c.is_ascii_digit() || c == '[' => {
                    return Err(self.err(
                        "expected '+' or '-' between terms, found the start of a new term",
                    ));
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    /// `TERM ::= NUMBER | NUMBER '%' | '[' POS ']'`
    ///
    /// `allow_leading_sign` governs whether a bare `-` (or `+`) may prefix
    /// this term; only the first term in a sum may carry one, since later
    /// terms already consumed their sign as the binary operator.
    fn parse_term(&mut self, allow_leading_sign: bool) -> Result<isize, BuildError> {
        self.skip_ws();
        let negative = if allow_leading_sign {
            match self.peek() {
                Some('-') => {
                    self.bump();
                    true
                }
                Some('+') => {
                    self.bump();
                    false
                }
                _ => false,
            }
        } else {
            false
        };
        self.skip_ws();
        let magnitude = match self.peek() {
            Some('[') => {
                self.bump();
                let inner = self.parse_sum()?;
                self.skip_ws();
                match self.bump() {
                    Some(']') => {}
                    _ => return Err(self.err("unclosed '['")),
                }
                clamp(inner, self.len) as isize
            }
            Some(c) if c.is_ascii_digit() => {
                let n = self.parse_number()?;
                if self.peek() == Some('%') {
                    self.bump();
                    percent_of(n, self.len)
                } else {
                    n
                }
            }
            _ => return Err(self.err("expected a number or '['")),
        };
        Ok(if negative { -magnitude } else { magnitude })
    }

    fn parse_number(&mut self) -> Result<isize, BuildError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<isize>().map_err(|_| self.err("malformed integer literal"))
    }

    fn expect_end(&mut self) -> Result<(), BuildError> {
        self.skip_ws();
        match self.peek() {
            None => Ok(()),
            Some(']') => Err(self.err("unmatched ']'")),
            Some(_) => Err(self.err("trailing input after a complete expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_integer() {
        assert_eq!(parse_position(10, "3").unwrap(), 3);
        assert_eq!(parse_position(10, "-3").unwrap(), -3);
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        // 25% of 10 = 2.5 -> 3 (away from zero)
        assert_eq!(parse_position(10, "25%").unwrap(), 3);
        assert_eq!(parse_position(10, "-25%").unwrap(), -3);
    }

    #[test]
    fn bracket_clamps_before_outer_arithmetic() {
        // 30% of 10 = 3; 3 - 5 = -2, clamped to 0; 0 + 5 = 5.
        assert_eq!(parse_position(10, "[30%-5]+5").unwrap(), 5);
    }

    #[test]
    fn nested_brackets_clamp_innermost_first() {
        assert_eq!(parse_position(10, "[[30%-100]+2]").unwrap(), 2);
    }

    #[test]
    fn unclosed_bracket_is_syntax_error() {
        assert!(parse_position(10, "[5+3").is_err());
    }

    #[test]
    fn missing_operator_is_syntax_error() {
        assert!(parse_position(10, "5 3").is_err());
    }

    #[test]
    fn clamped_variant_truncates_final_result() {
        assert_eq!(parse_position_clamped(10, "-50%").unwrap(), 0);
        assert_eq!(parse_position_clamped(10, "500%").unwrap(), 10);
    }

    #[test]
    fn round_trip_for_in_range_integers() {
        for k in 0..=20isize {
            assert_eq!(parse_position(20, &k.to_string()).unwrap(), k);
        }
    }
}
