use std::collections::BTreeMap;

use thiserror::Error;

/// Why a `Citations Per Year` cell could not be read as a year → count mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationParseError {
    #[error("empty input")]
    Empty,

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expected: &'static str,
    },

    #[error("invalid year '{text}' at offset {offset}")]
    InvalidYear { text: String, offset: usize },

    #[error("invalid citation count '{text}' for year {year}")]
    InvalidCount { year: i32, text: String },

    #[error("year {year} appears more than once")]
    DuplicateYear { year: i32 },

    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

/// Parse a citation history written as a mapping literal, e.g. `{2019: 12, 2020: 30}`.
///
/// Accepted grammar (whitespace allowed between tokens):
///
/// ```text
/// mapping := '{' [ entry ( ',' entry )* [ ',' ] ] '}'
/// entry   := year ':' count
/// year    := digits | '\'' digits '\'' | '"' digits '"'
/// count   := digits [ '.' '0'* ]
/// ```
///
/// The text is only ever tokenized; nothing in it is evaluated.
pub fn parse_citation_history(text: &str) -> Result<BTreeMap<i32, u64>, CitationParseError> {
    if text.trim().is_empty() {
        return Err(CitationParseError::Empty);
    }

    let mut cur = Cursor::new(text);
    let mut map = BTreeMap::new();

    cur.skip_ws();
    cur.expect('{', "'{'")?;

    loop {
        cur.skip_ws();
        if cur.eat('}') {
            break;
        }

        let year = cur.year()?;
        cur.skip_ws();
        cur.expect(':', "':'")?;
        cur.skip_ws();
        let count = cur.count(year)?;

        if map.insert(year, count).is_some() {
            return Err(CitationParseError::DuplicateYear { year });
        }

        cur.skip_ws();
        if cur.eat(',') {
            continue;
        }
        cur.expect('}', "',' or '}'")?;
        break;
    }

    cur.skip_ws();
    if let Some((offset, _)) = cur.peek() {
        return Err(CitationParseError::TrailingInput { offset });
    }
    Ok(map)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.src[self.pos..].chars().next().map(|c| (self.pos, c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.src[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some((_, c)) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn eat(&mut self, want: char) -> bool {
        match self.peek() {
            Some((_, c)) if c == want => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), CitationParseError> {
        match self.peek() {
            Some((_, c)) if c == want => {
                self.bump();
                Ok(())
            }
            Some((offset, found)) => Err(CitationParseError::UnexpectedChar {
                found,
                offset,
                expected,
            }),
            None => Err(CitationParseError::UnexpectedEnd { expected }),
        }
    }

    /// Consume a run of characters that may belong to a number token.
    fn number_token(&mut self) -> &'a str {
        let start = self.pos;
        while let Some((_, c)) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_') {
                self.bump();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn year(&mut self) -> Result<i32, CitationParseError> {
        let quote = match self.peek() {
            Some((_, q @ ('\'' | '"'))) => {
                self.bump();
                Some(q)
            }
            Some(_) => None,
            None => {
                return Err(CitationParseError::UnexpectedEnd { expected: "a year" });
            }
        };

        let offset = self.pos;
        let text = self.number_token();
        if text.is_empty() {
            return match self.peek() {
                Some((offset, found)) => Err(CitationParseError::UnexpectedChar {
                    found,
                    offset,
                    expected: "a year",
                }),
                None => Err(CitationParseError::UnexpectedEnd { expected: "a year" }),
            };
        }

        let year = parse_digits(text)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| CitationParseError::InvalidYear {
                text: text.to_string(),
                offset,
            })?;

        if let Some(q) = quote {
            self.expect(q, "closing quote")?;
        }
        Ok(year)
    }

    fn count(&mut self, year: i32) -> Result<u64, CitationParseError> {
        let text = self.number_token();
        if text.is_empty() {
            return match self.peek() {
                Some((offset, found)) => Err(CitationParseError::UnexpectedChar {
                    found,
                    offset,
                    expected: "a citation count",
                }),
                None => Err(CitationParseError::UnexpectedEnd {
                    expected: "a citation count",
                }),
            };
        }

        // Spreadsheet exports sometimes write whole counts as `12.0`.
        let whole = match text.split_once('.') {
            Some((int, frac)) if frac.chars().all(|c| c == '0') => int,
            Some(_) => "",
            None => text,
        };

        parse_digits(whole).ok_or_else(|| CitationParseError::InvalidCount {
            year,
            text: text.to_string(),
        })
    }
}

/// Plain ASCII digits only: no sign, no separators.
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
