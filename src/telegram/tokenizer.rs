//! Data line tokenizer.
//!
//! Splits telegram content into data lines of the form
//! `<obis-code>(<payload>)[(<payload>)...]` using `nom`. Header, terminator
//! and blank lines do not match and are skipped. Composite lines such as the
//! gas reading `0-1:24.2.1(101209112500W)(12785.123*m3)` or the power failure
//! log yield one payload per parenthesised group. A line that opens a group
//! after its code but cannot be tokenized is reported as a [`MalformedLine`]
//! so the decoder can reject it when the code is catalogued.

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    multi::many1,
    sequence::{delimited, pair},
    IResult,
};

/// A tokenized data line, borrowing from the telegram content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine<'a> {
    pub code: &'a str,
    pub payloads: Vec<&'a str>,
}

impl<'a> DataLine<'a> {
    /// The first parenthesised group, which carries the value of simple fields.
    pub fn first_payload(&self) -> &'a str {
        self.payloads[0]
    }
}

/// A line that starts like a data line but has unbalanced groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine<'a> {
    pub code: &'a str,
    /// Everything after the code.
    pub text: &'a str,
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | ':' | '.')
}

fn obis_code(input: &str) -> IResult<&str, &str> {
    take_while1(is_code_char)(input)
}

fn payload(input: &str) -> IResult<&str, &str> {
    delimited(char('('), take_while(|c: char| c != ')' && c != '('), char(')'))(input)
}

/// Parses one data line; trailing text after the last group is ignored.
pub fn parse_data_line(input: &str) -> IResult<&str, DataLine<'_>> {
    let (rest, (code, payloads)) = pair(obis_code, many1(payload))(input)?;
    Ok((rest, DataLine { code, payloads }))
}

/// Classifies one trimmed line; `None` for lines that carry no field.
fn tokenize_line(line: &str) -> Option<Result<DataLine<'_>, MalformedLine<'_>>> {
    if let Ok((_, data)) = parse_data_line(line) {
        return Some(Ok(data));
    }
    let (text, code) = obis_code(line).ok()?;
    text.starts_with('(').then_some(Err(MalformedLine { code, text }))
}

/// Tokenizes every data line of the content, in order of appearance.
pub fn data_lines(
    content: &str,
) -> impl Iterator<Item = Result<DataLine<'_>, MalformedLine<'_>>> {
    content.lines().filter_map(|line| tokenize_line(line.trim()))
}
