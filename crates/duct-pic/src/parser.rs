//! Picture file parser.
//!
//! Consumes [`Spanned`] tokens from the lexer and builds one [`Spline`] per
//! curve record. A file is accepted whole or rejected whole.
//!
//! ```text
//! PICTURE <curve count>
//! CURVE <knot count>
//! P <x> <y> <z>
//! B <dx> <dy> <dz> [magnitude]
//! A <dx> <dy> <dz> [magnitude]
//! BM <magnitude>
//! AM <magnitude>
//! END
//! ```
//!
//! Each `P` line starts a knot and may be followed by its incoming (`B`) and
//! outgoing (`A`) tangent. `BM` and `AM` carry a magnitude whose direction is
//! not resolved. The first knot takes no incoming tangent, the last no
//! outgoing one. Tangents read from a file are constrained.

use duct_core::{DuctError, Result, Side};
use duct_geometry::{Spline, SplinePoint, Tangent, TangentValue};
use duct_math::{Point3, Vector3};

use crate::lexer::{tokenize, Spanned, Token};

/// Parse every curve record in `input`.
pub fn parse_picture(input: &str) -> Result<Vec<Spline>> {
    Parser::new(tokenize(input)).parse_file()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Current curve record, 0 while reading the header.
    record: usize,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            pos: 0,
            record: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    /// Line of the next token, or of the last token at end of input.
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |s| s.line)
    }

    fn error(&self, message: impl Into<String>) -> DuctError {
        DuctError::format(self.record, self.line(), message)
    }

    fn advance(&mut self) -> Result<Token> {
        match self.tokens.get(self.pos) {
            Some(spanned) => {
                self.pos += 1;
                Ok(spanned.token.clone())
            }
            None => Err(self.error("unexpected end of file")),
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        match self.advance()? {
            Token::Keyword(k) if k == kw => Ok(()),
            other => {
                self.pos -= 1;
                Err(self.error(format!("expected '{kw}', got {}", describe(&other))))
            }
        }
    }

    fn expect_end_of_line(&mut self) -> Result<()> {
        match self.advance()? {
            Token::EndOfLine => Ok(()),
            other => {
                self.pos -= 1;
                Err(self.error(format!("unexpected {} at end of line", describe(&other))))
            }
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        match self.advance()? {
            Token::Number(v) => Ok(v),
            other => {
                self.pos -= 1;
                Err(self.error(format!("expected a number, got {}", describe(&other))))
            }
        }
    }

    /// Tokens left to read; a bound on how many records can still follow.
    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn expect_count(&mut self) -> Result<usize> {
        let v = self.expect_number()?;
        if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
            self.pos -= 1;
            return Err(self.error(format!("expected a count, got {v}")));
        }
        Ok(v as usize)
    }

    fn expect_vector(&mut self) -> Result<Vector3> {
        Ok(Vector3::new(
            self.expect_number()?,
            self.expect_number()?,
            self.expect_number()?,
        ))
    }

    /// Parse the whole file: `PICTURE <n>` followed by `n` curve records.
    fn parse_file(&mut self) -> Result<Vec<Spline>> {
        self.expect_keyword("PICTURE")?;
        let declared = self.expect_count()?;
        self.expect_end_of_line()?;

        let mut curves = Vec::with_capacity(declared.min(self.remaining()));
        while self.peek().is_some() {
            self.record += 1;
            if self.record > declared {
                return Err(self.error(format!("file declares {declared} curves but has more")));
            }
            curves.push(self.parse_curve()?);
        }

        if curves.len() != declared {
            self.record = 0;
            return Err(self.error(format!(
                "file declares {declared} curves but has {}",
                curves.len()
            )));
        }
        Ok(curves)
    }

    /// Parse one `CURVE <n> ... END` record.
    fn parse_curve(&mut self) -> Result<Spline> {
        self.expect_keyword("CURVE")?;
        let declared = self.expect_count()?;
        self.expect_end_of_line()?;

        let mut points: Vec<SplinePoint> = Vec::with_capacity(declared.min(self.remaining()));
        loop {
            let keyword = match self.peek() {
                Some(Token::Keyword(k)) => k.clone(),
                Some(other) => {
                    return Err(self.error(format!("expected a knot, tangent or END, got {}", describe(other))))
                }
                None => return Err(self.error("record is missing END")),
            };
            match keyword.as_str() {
                "P" => {
                    if points.len() == declared {
                        return Err(self.error(format!("record declares {declared} knots but has more")));
                    }
                    self.advance()?;
                    let position: Point3 = self.expect_vector()?;
                    self.expect_end_of_line()?;
                    points.push(SplinePoint::new(position));
                }
                "B" | "A" | "BM" | "AM" => {
                    let side = if keyword.starts_with('B') { Side::Before } else { Side::After };
                    self.parse_tangent(&mut points, declared, side, keyword.len() == 2)?;
                }
                "END" => {
                    self.advance()?;
                    self.expect_end_of_line()?;
                    break;
                }
                other => return Err(self.error(format!("unknown keyword '{other}'"))),
            }
        }

        if points.len() != declared {
            return Err(self.error(format!(
                "record declares {declared} knots but has {}",
                points.len()
            )));
        }
        Ok(Spline::from_points(points))
    }

    /// Parse `B|A dx dy dz [magnitude]` or `BM|AM magnitude` onto the most
    /// recent knot.
    fn parse_tangent(
        &mut self,
        points: &mut [SplinePoint],
        declared: usize,
        side: Side,
        magnitude_only: bool,
    ) -> Result<()> {
        let knot = points.len();
        let Some(point) = points.last_mut() else {
            return Err(self.error(format!("{side} tangent before any knot")));
        };
        if side == Side::Before && knot == 1 {
            return Err(self.error("first knot has a B tangent"));
        }
        if side == Side::After && knot == declared {
            return Err(self.error("last knot has an A tangent"));
        }
        if !point.tangent(side).is_unset() {
            return Err(self.error(format!("knot {} has two {side} tangents", knot - 1)));
        }

        self.advance()?;
        let tangent = if magnitude_only {
            Tangent {
                direction: TangentValue::Unset,
                magnitude: TangentValue::Constrained(self.expect_number()?),
            }
        } else {
            let direction = TangentValue::Constrained(self.expect_vector()?);
            let magnitude = match self.peek() {
                Some(Token::EndOfLine) => TangentValue::Unset,
                _ => TangentValue::Constrained(self.expect_number()?),
            };
            Tangent { direction, magnitude }
        };
        self.expect_end_of_line()?;

        match side {
            Side::Before => point.before = tangent,
            Side::After => point.after = tangent,
        }
        Ok(())
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Keyword(k) => format!("'{k}'"),
        Token::Number(v) => format!("number {v}"),
        Token::Invalid(s) => format!("invalid token '{s}'"),
        Token::EndOfLine => "end of line".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
