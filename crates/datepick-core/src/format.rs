//! Pattern codec for the dayjs-style format strings used by pickers.
//!
//! Patterns are tokenized once and then used in both directions: rendering a
//! [`DateFields`] record into text, and strictly parsing text back into
//! [`ParsedFields`]. Calendar resolution (turning parsed fields into a real
//! date) is left to the [`GenerateConfig`](crate::GenerateConfig) adapter.
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `YYYY` / `YY` | four / two digit year |
//! | `Q` | quarter 1-4 |
//! | `MMMM` / `MMM` | long / short month name from the locale |
//! | `MM` / `M` | month number, padded / unpadded |
//! | `DD` / `D` | day of month |
//! | `HH` / `H` | 24-hour clock |
//! | `hh` / `h` | 12-hour clock |
//! | `mm` / `m`, `ss` / `s` | minute, second |
//! | `SSS` | millisecond |
//! | `A` / `a` | meridiem label, upper / lower case |
//! | `ww` / `w` / `wo` | week of year, padded / plain / ordinal |
//! | `[text]` | literal text |

use crate::locale::Locale;

/// A single element of a tokenized pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Year4,
    Year2,
    Quarter,
    MonthLong,
    MonthShort,
    Month2,
    Month1,
    Day2,
    Day1,
    Hour2,
    Hour1,
    Hour12Padded,
    Hour12,
    Minute2,
    Minute1,
    Second2,
    Second1,
    Millisecond,
    MeridiemUpper,
    MeridiemLower,
    Week2,
    Week1,
    WeekOrdinal,
}

impl Token {
    /// Whether the token carries any time-of-day component.
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            Token::Hour2
                | Token::Hour1
                | Token::Hour12Padded
                | Token::Hour12
                | Token::Minute2
                | Token::Minute1
                | Token::Second2
                | Token::Second1
                | Token::Millisecond
                | Token::MeridiemUpper
                | Token::MeridiemLower
        )
    }

    fn is_week(&self) -> bool {
        matches!(self, Token::Week2 | Token::Week1 | Token::WeekOrdinal)
    }
}

// Longest patterns first so `YYYY` wins over `YY`.
const TOKEN_TABLE: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("MMMM", Token::MonthLong),
    ("SSS", Token::Millisecond),
    ("MMM", Token::MonthShort),
    ("YY", Token::Year2),
    ("MM", Token::Month2),
    ("DD", Token::Day2),
    ("HH", Token::Hour2),
    ("hh", Token::Hour12Padded),
    ("mm", Token::Minute2),
    ("ss", Token::Second2),
    ("ww", Token::Week2),
    ("wo", Token::WeekOrdinal),
    ("Q", Token::Quarter),
    ("M", Token::Month1),
    ("D", Token::Day1),
    ("H", Token::Hour1),
    ("h", Token::Hour12),
    ("m", Token::Minute1),
    ("s", Token::Second1),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
    ("w", Token::Week1),
];

/// Split a pattern into tokens. Unknown characters become literals and
/// adjacent literals are merged.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut rest = pattern;

    fn push_literal(tokens: &mut Vec<Token>, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Token::Literal(prev)) = tokens.last_mut() {
            prev.push_str(text);
        } else {
            tokens.push(Token::Literal(text.to_string()));
        }
    }

    'outer: while !rest.is_empty() {
        if let Some(body) = rest.strip_prefix('[') {
            match body.find(']') {
                Some(end) => {
                    push_literal(&mut tokens, &body[..end]);
                    rest = &body[end + 1..];
                }
                None => {
                    push_literal(&mut tokens, body);
                    rest = "";
                }
            }
            continue;
        }

        for (text, token) in TOKEN_TABLE {
            if let Some(after) = rest.strip_prefix(text) {
                tokens.push(token.clone());
                rest = after;
                continue 'outer;
            }
        }

        let ch_len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        push_literal(&mut tokens, &rest[..ch_len]);
        rest = &rest[ch_len..];
    }

    tokens
}

/// Whether a pattern contains any time-of-day token.
pub fn has_time(pattern: &str) -> bool {
    tokenize(pattern).iter().any(Token::is_time)
}

/// Calendar fields of a date, as needed for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateFields {
    pub year: i32,
    /// Zero-based month.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    pub week: u32,
    /// Year the week belongs to; differs from `year` around new year.
    pub week_year: i32,
}

/// Render `fields` with a tokenized pattern.
pub fn format_fields(tokens: &[Token], fields: &DateFields, locale: &Locale) -> String {
    let has_week = tokens.iter().any(Token::is_week);
    let year = if has_week { fields.week_year } else { fields.year };
    let hour12 = match fields.hour % 12 {
        0 => 12,
        h => h,
    };

    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Year4 => out.push_str(&format!("{:04}", year)),
            Token::Year2 => out.push_str(&format!("{:02}", year.rem_euclid(100))),
            Token::Quarter => out.push_str(&(fields.month / 3 + 1).to_string()),
            Token::MonthLong => out.push_str(locale.month_name(fields.month)),
            Token::MonthShort => out.push_str(locale.month_short(fields.month)),
            Token::Month2 => out.push_str(&format!("{:02}", fields.month + 1)),
            Token::Month1 => out.push_str(&(fields.month + 1).to_string()),
            Token::Day2 => out.push_str(&format!("{:02}", fields.day)),
            Token::Day1 => out.push_str(&fields.day.to_string()),
            Token::Hour2 => out.push_str(&format!("{:02}", fields.hour)),
            Token::Hour1 => out.push_str(&fields.hour.to_string()),
            Token::Hour12Padded => out.push_str(&format!("{:02}", hour12)),
            Token::Hour12 => out.push_str(&hour12.to_string()),
            Token::Minute2 => out.push_str(&format!("{:02}", fields.minute)),
            Token::Minute1 => out.push_str(&fields.minute.to_string()),
            Token::Second2 => out.push_str(&format!("{:02}", fields.second)),
            Token::Second1 => out.push_str(&fields.second.to_string()),
            Token::Millisecond => out.push_str(&format!("{:03}", fields.millisecond)),
            Token::MeridiemUpper => out.push_str(&locale.meridiem(fields.hour).to_uppercase()),
            Token::MeridiemLower => out.push_str(&locale.meridiem(fields.hour).to_lowercase()),
            Token::Week2 => out.push_str(&format!("{:02}", fields.week)),
            Token::Week1 => out.push_str(&fields.week.to_string()),
            Token::WeekOrdinal => out.push_str(&locale.ordinal(fields.week)),
        }
    }
    out
}

/// AM or PM, as parsed from a meridiem token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Meridiem of a 24-hour clock value.
    pub fn of_hour(hour: u32) -> Self {
        if hour < 12 {
            Meridiem::Am
        } else {
            Meridiem::Pm
        }
    }
}

/// Fields recovered from text. Absent fields were not part of the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedFields {
    pub year: Option<i32>,
    /// Zero-based month.
    pub month: Option<u32>,
    pub quarter: Option<u32>,
    pub day: Option<u32>,
    /// Raw hour as typed; combine with `meridiem` for 12-hour patterns.
    pub hour: Option<u32>,
    pub twelve_hour: bool,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub millisecond: Option<u32>,
    pub meridiem: Option<Meridiem>,
    pub week: Option<u32>,
}

impl ParsedFields {
    /// The hour on a 24-hour clock, resolving 12-hour input with its meridiem.
    pub fn hour24(&self) -> Option<u32> {
        let hour = self.hour?;
        if !self.twelve_hour {
            return Some(hour);
        }
        let base = hour % 12;
        Some(match self.meridiem {
            Some(Meridiem::Pm) => base + 12,
            _ => base,
        })
    }
}

/// Why text failed to parse against a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input text was empty.
    #[error("input is empty")]
    Empty,
    /// The text did not match the pattern at the given byte offset.
    #[error("expected {expected} at offset {offset}")]
    Mismatch {
        offset: usize,
        expected: &'static str,
    },
    /// The pattern was exhausted before the text.
    #[error("unexpected trailing input at offset {0}")]
    Trailing(usize),
    /// A field parsed but its value is impossible.
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
    /// None of the candidate patterns accepted the text.
    #[error("text does not match any of {0} formats")]
    NoMatch(usize),
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn digits(&mut self, min: usize, max: usize, expected: &'static str) -> Result<u32, ParseError> {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if len < min {
            return Err(ParseError::Mismatch {
                offset: self.pos,
                expected,
            });
        }
        let value = rest[..len].parse::<u32>().map_err(|_| ParseError::Mismatch {
            offset: self.pos,
            expected,
        })?;
        self.pos += len;
        Ok(value)
    }

    fn expect_ci(&mut self, word: &str) -> bool {
        match self.rest().get(..word.len()) {
            Some(head) if !word.is_empty() && head.to_lowercase() == word.to_lowercase() => {
                self.pos += word.len();
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }
}

fn ranged(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32, ParseError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParseError::OutOfRange {
            field,
            value: i64::from(value),
        })
    }
}

fn month_by_name<'n>(
    cursor: &mut Cursor<'_>,
    names: impl Iterator<Item = &'n str>,
) -> Option<u32> {
    // Prefer the longest matching name so "June" beats "Jun".
    let mut best: Option<(usize, u32)> = None;
    for (index, name) in names.enumerate() {
        if let Some(head) = cursor.rest().get(..name.len()) {
            if !name.is_empty() && head.to_lowercase() == name.to_lowercase() {
                let better = best.map(|(len, _)| name.len() > len).unwrap_or(true);
                if better {
                    best = Some((name.len(), index as u32));
                }
            }
        }
    }
    best.map(|(len, month)| {
        cursor.pos += len;
        month
    })
}

/// Strictly parse `text` with a tokenized pattern.
///
/// The whole text must be consumed. Padded tokens require their full width,
/// plain tokens accept one or two digits.
pub fn parse_fields(tokens: &[Token], text: &str, locale: &Locale) -> Result<ParsedFields, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut cursor = Cursor { text, pos: 0 };
    let mut fields = ParsedFields::default();

    for token in tokens {
        match token {
            Token::Literal(lit) => {
                if !cursor.expect(lit) {
                    return Err(ParseError::Mismatch {
                        offset: cursor.pos,
                        expected: "literal",
                    });
                }
            }
            Token::Year4 => fields.year = Some(cursor.digits(4, 4, "four digit year")? as i32),
            Token::Year2 => fields.year = Some(2000 + cursor.digits(2, 2, "two digit year")? as i32),
            Token::Quarter => {
                let q = cursor.digits(1, 1, "quarter")?;
                fields.quarter = Some(ranged("quarter", q, 1, 4)?);
            }
            Token::MonthLong | Token::MonthShort => {
                let names: Vec<&str> = (0..12)
                    .map(|m| {
                        if *token == Token::MonthLong {
                            locale.month_name(m)
                        } else {
                            locale.month_short(m)
                        }
                    })
                    .collect();
                let month = month_by_name(&mut cursor, names.into_iter()).ok_or(
                    ParseError::Mismatch {
                        offset: cursor.pos,
                        expected: "month name",
                    },
                )?;
                fields.month = Some(month);
            }
            Token::Month2 | Token::Month1 => {
                let min = if *token == Token::Month2 { 2 } else { 1 };
                let m = cursor.digits(min, 2, "month")?;
                fields.month = Some(ranged("month", m, 1, 12)? - 1);
            }
            Token::Day2 | Token::Day1 => {
                let min = if *token == Token::Day2 { 2 } else { 1 };
                let d = cursor.digits(min, 2, "day")?;
                fields.day = Some(ranged("day", d, 1, 31)?);
            }
            Token::Hour2 | Token::Hour1 => {
                let min = if *token == Token::Hour2 { 2 } else { 1 };
                let h = cursor.digits(min, 2, "hour")?;
                fields.hour = Some(ranged("hour", h, 0, 23)?);
            }
            Token::Hour12Padded | Token::Hour12 => {
                let min = if *token == Token::Hour12Padded { 2 } else { 1 };
                let h = cursor.digits(min, 2, "hour")?;
                fields.hour = Some(ranged("hour", h, 1, 12)?);
                fields.twelve_hour = true;
            }
            Token::Minute2 | Token::Minute1 => {
                let min = if *token == Token::Minute2 { 2 } else { 1 };
                let m = cursor.digits(min, 2, "minute")?;
                fields.minute = Some(ranged("minute", m, 0, 59)?);
            }
            Token::Second2 | Token::Second1 => {
                let min = if *token == Token::Second2 { 2 } else { 1 };
                let s = cursor.digits(min, 2, "second")?;
                fields.second = Some(ranged("second", s, 0, 59)?);
            }
            Token::Millisecond => fields.millisecond = Some(cursor.digits(3, 3, "millisecond")?),
            Token::MeridiemUpper | Token::MeridiemLower => {
                if cursor.expect_ci(locale.am()) {
                    fields.meridiem = Some(Meridiem::Am);
                } else if cursor.expect_ci(locale.pm()) {
                    fields.meridiem = Some(Meridiem::Pm);
                } else {
                    return Err(ParseError::Mismatch {
                        offset: cursor.pos,
                        expected: "meridiem",
                    });
                }
            }
            Token::Week2 | Token::Week1 => {
                let min = if *token == Token::Week2 { 2 } else { 1 };
                let w = cursor.digits(min, 2, "week")?;
                fields.week = Some(ranged("week", w, 1, 53)?);
            }
            Token::WeekOrdinal => {
                let start = cursor.pos;
                let w = cursor.digits(1, 2, "week")?;
                cursor.pos = start;
                let ordinal = locale.ordinal(w);
                if !cursor.expect(&ordinal) {
                    return Err(ParseError::Mismatch {
                        offset: start,
                        expected: "ordinal week",
                    });
                }
                fields.week = Some(ranged("week", w, 1, 53)?);
            }
        }
    }

    if cursor.pos != text.len() {
        return Err(ParseError::Trailing(cursor.pos));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_prefers_longest_token() {
        assert_eq!(
            tokenize("YYYY-MM-DD"),
            vec![
                Token::Year4,
                Token::Literal("-".into()),
                Token::Month2,
                Token::Literal("-".into()),
                Token::Day2,
            ]
        );
    }

    #[test]
    fn tokenize_handles_escapes() {
        assert_eq!(
            tokenize("YYYY-[Q]Q"),
            vec![Token::Year4, Token::Literal("-Q".into()), Token::Quarter]
        );
    }

    #[test]
    fn has_time_detects_time_tokens() {
        assert!(has_time("YYYY-MM-DD HH:mm"));
        assert!(!has_time("YYYY-MM-DD"));
        assert!(!has_time("[HH]YYYY"));
    }

    #[test]
    fn format_twelve_hour_clock() {
        let locale = Locale::default();
        let fields = DateFields {
            year: 2024,
            month: 0,
            day: 5,
            hour: 0,
            minute: 7,
            ..DateFields::default()
        };
        assert_eq!(format_fields(&tokenize("hh:mm A"), &fields, &locale), "12:07 AM");
        let fields = DateFields { hour: 15, ..fields };
        assert_eq!(format_fields(&tokenize("h:mm a"), &fields, &locale), "3:07 pm");
    }

    #[test]
    fn parse_rejects_partial_input() {
        let locale = Locale::default();
        let tokens = tokenize("YYYY-MM-DD");
        assert!(matches!(
            parse_fields(&tokens, "2024-01-1", &locale),
            Err(ParseError::Mismatch { .. })
        ));
        assert!(matches!(
            parse_fields(&tokens, "2024-01-011", &locale),
            Err(ParseError::Trailing(10))
        ));
    }

    #[test]
    fn parse_checks_ranges() {
        let locale = Locale::default();
        assert!(matches!(
            parse_fields(&tokenize("YYYY-MM"), "2024-13", &locale),
            Err(ParseError::OutOfRange { field: "month", .. })
        ));
    }

    #[test]
    fn parse_twelve_hour_with_meridiem() {
        let locale = Locale::default();
        let fields = parse_fields(&tokenize("hh:mm A"), "12:30 am", &locale).unwrap();
        assert_eq!(fields.hour24(), Some(0));
        let fields = parse_fields(&tokenize("hh:mm A"), "01:30 PM", &locale).unwrap();
        assert_eq!(fields.hour24(), Some(13));
    }

    #[test]
    fn parse_month_names_longest_first() {
        let locale = Locale::default();
        let fields = parse_fields(&tokenize("MMMM YYYY"), "June 2024", &locale).unwrap();
        assert_eq!(fields.month, Some(5));
        assert_eq!(fields.year, Some(2024));
    }

    #[test]
    fn parse_ordinal_week() {
        let locale = Locale::default();
        let fields = parse_fields(&tokenize("YYYY-wo"), "2024-23rd", &locale).unwrap();
        assert_eq!(fields.week, Some(23));
        assert!(parse_fields(&tokenize("YYYY-wo"), "2024-23th", &locale).is_err());
    }

    #[test]
    fn parse_empty_text() {
        let locale = Locale::default();
        assert_eq!(
            parse_fields(&tokenize("YYYY"), "  ", &locale),
            Err(ParseError::Empty)
        );
    }
}
