use nom::{
    bytes::complete::take_till,
    character::complete::char,
    sequence::{preceded, tuple},
    IResult,
};

use itext_protocol::{PassageQuery, TextUnit};
use serde::Deserialize;

use crate::error::FeedError;

fn field(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == ' ')(input)
}

fn passage_fields(input: &str) -> IResult<&str, (&str, &str, &str)> {
    tuple((field, preceded(char(' '), field), preceded(char(' '), field)))(input)
}

/// Parses `"<text> <first> <last>"`, e.g. `"vergil.georgics 1.1 1.42"`.
///
/// Fields are split on single spaces; anything past the third field is
/// ignored. Fewer than three fields means there is no passage to load.
pub fn parse_passage(input: &str) -> Option<PassageQuery> {
    let (_, (name, first, last)) = passage_fields(input).ok()?;
    Some(PassageQuery {
        name: name.to_string(),
        first: first.to_string(),
        last: last.to_string(),
    })
}

/// Heading shown above the passage: `vergil.georgics 1.1 - 1.42`.
pub fn passage_title(query: &PassageQuery) -> String {
    format!("{} {} - {}", query.name, query.first, query.last)
}

#[derive(Debug, Deserialize)]
struct PassageResponse {
    response: Vec<TextUnit>,
}

/// Decodes the text endpoint's answer, `{"response": [{"id", "loc", "verse"}, ...]}`.
pub fn decode_passage_response(json: &str) -> Result<Vec<TextUnit>, FeedError> {
    let body: PassageResponse = serde_json::from_str(json)?;
    Ok(body.response)
}
