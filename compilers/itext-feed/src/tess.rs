use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, digit1, hex_digit1, multispace0, multispace1, one_of},
    combinator::{map_opt, map_res, value},
    multi::many0,
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

use itext_protocol::{Text, TextUnit, UnitId};
use tracing::{debug, info};

use crate::error::FeedError;

const UNIT_ELEMENT: &str = "TextUnit";
const UNIT_CLOSE: &str = "</TextUnit>";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Element and attribute names: letters, digits and `_ - : .`
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

#[derive(Debug, Clone)]
struct StartTag<'a> {
    name: &'a str,
    attributes: Vec<(&'a str, &'a str)>,
    self_closing: bool,
}

impl<'a> StartTag<'a> {
    fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        multispace1,
        separated_pair(
            take_while1(is_name_char),
            delimited(multispace0, char('='), multispace0),
            quoted,
        ),
    )(input)
}

fn start_tag(input: &str) -> IResult<&str, StartTag> {
    let (input, _) = char('<')(input)?;
    let (input, name) = take_while1(is_name_char)(input)?;
    let (input, attributes) = many0(attribute)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, close) = alt((tag("/>"), tag(">")))(input)?;

    Ok((
        input,
        StartTag {
            name,
            attributes,
            self_closing: close == "/>",
        },
    ))
}

/// Skips a declaration, comment, CDATA section or end tag starting at `input`.
fn skip_markup(input: &str) -> IResult<&str, &str> {
    if input.starts_with("<!--") {
        let (rest, body) = take_until("-->")(input)?;
        Ok((&rest[3..], body))
    } else if input.starts_with(CDATA_OPEN) {
        cdata(input)
    } else {
        let (rest, body) = take_until(">")(input)?;
        Ok((&rest[1..], body))
    }
}

/// `<![CDATA[...]]>`, yielding the body untouched.
fn cdata(input: &str) -> IResult<&str, &str> {
    delimited(tag(CDATA_OPEN), take_until(CDATA_CLOSE), tag(CDATA_CLOSE))(input)
}

fn code_point(digits: &str, radix: u32) -> Result<u32, std::num::ParseIntError> {
    u32::from_str_radix(digits, radix)
}

/// `&#NNN;`, `&#xHHHH;` or one of the five predefined entities.
fn reference(input: &str) -> IResult<&str, char> {
    let numeric = preceded(
        char('#'),
        map_opt(
            alt((
                preceded(one_of("xX"), map_res(hex_digit1, |h: &str| code_point(h, 16))),
                map_res(digit1, |d: &str| code_point(d, 10)),
            )),
            char::from_u32,
        ),
    );
    let named = alt((
        value('<', tag("lt")),
        value('>', tag("gt")),
        value('"', tag("quot")),
        value('\'', tag("apos")),
        value('&', tag("amp")),
    ));
    delimited(char('&'), alt((numeric, named)), char(';'))(input)
}

/// Replaces character and entity references in one pass. Anything that is
/// not a well-formed reference is kept as written.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match reference(rest) {
            Ok((after, c)) => {
                out.push(c);
                rest = after;
            }
            Err(_) => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Character data of an element: nested markup removed, references decoded,
/// CDATA sections kept verbatim.
fn inner_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(pos) = rest.find('<') {
        out.push_str(&decode_entities(&rest[..pos]));
        rest = &rest[pos..];
        if let Ok((after, body)) = cdata(rest) {
            out.push_str(body);
            rest = after;
            continue;
        }
        rest = match skip_markup(rest) {
            Ok((after, _)) => after,
            Err(_) => "",
        };
    }
    out.push_str(&decode_entities(rest));
    out
}

fn text_unit(tag: &StartTag, content: &str) -> Result<TextUnit, FeedError> {
    let raw_id = tag.attribute("id").ok_or(FeedError::MissingAttribute {
        element: UNIT_ELEMENT,
        attribute: "id",
    })?;
    let id: u32 = raw_id
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidId(raw_id.to_string()))?;
    let loc = tag.attribute("loc").ok_or(FeedError::MissingAttribute {
        element: UNIT_ELEMENT,
        attribute: "loc",
    })?;

    Ok(TextUnit {
        id: UnitId::new(id),
        loc: decode_entities(loc),
        verse: inner_text(content),
    })
}

/// Reads a Tesserae XML document. The root element's `id` names the text;
/// every `<TextUnit id=".." loc="..">` becomes one unit, in document order.
pub fn parse_tess(doc: &str) -> Result<Text, FeedError> {
    let offset = |rest: &str| doc.len() - rest.len();
    let malformed = |rest: &str, message: &str| FeedError::Xml {
        offset: offset(rest),
        message: message.to_string(),
    };

    let mut rest = doc;
    let mut name: Option<String> = None;
    let mut units = Vec::new();

    while let Some(pos) = rest.find('<') {
        rest = &rest[pos..];

        if rest.starts_with("<?") || rest.starts_with("<!") || rest.starts_with("</") {
            let (after, _) = skip_markup(rest).map_err(|_| malformed(rest, "unterminated markup"))?;
            rest = after;
            continue;
        }

        let (after, tag) = start_tag(rest).map_err(|_| malformed(rest, "unreadable start tag"))?;

        if name.is_none() {
            let id = tag.attribute("id").ok_or(FeedError::MissingAttribute {
                element: "document root",
                attribute: "id",
            })?;
            name = Some(decode_entities(id));
        }

        if tag.name == UNIT_ELEMENT {
            if tag.self_closing {
                units.push(text_unit(&tag, "")?);
                rest = after;
                continue;
            }
            let (after_content, content) = take_until::<_, _, nom::error::Error<&str>>(UNIT_CLOSE)(after)
                .map_err(|_| malformed(after, "unclosed <TextUnit>"))?;
            units.push(text_unit(&tag, content)?);
            rest = &after_content[UNIT_CLOSE.len()..];
            continue;
        }

        debug!(element = tag.name, "skipping container element");
        rest = after;
    }

    let name = name.ok_or_else(|| malformed(rest, "document has no root element"))?;
    info!(name = %name, units = units.len(), "parsed Tesserae document");
    Ok(Text { name, units })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEORGICS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- excerpt -->
<TessDocument id="vergil.georgics">
  <Text>
    <TextUnit id="0" loc="1.1">Quid faciat laetas segetes, quo sidere terram</TextUnit>
    <TextUnit id="1" loc='1.2'>vertere, <i>Maecenas</i>, ulmisque adiungere vitis</TextUnit>
    <TextUnit id="2" loc="1.3" >conveniat, quae cura boum, qui cultus habendo</TextUnit>
    <TextUnit id="3" loc="1.4"/>
    <TextUnit id="4" loc="1.5">sit pecori, apibus quanta experientia parcis, &amp; c.</TextUnit>
  </Text>
</TessDocument>
"#;

    #[test]
    fn test_parse_document() {
        let text = parse_tess(GEORGICS).unwrap();
        assert_eq!(text.name, "vergil.georgics");
        assert_eq!(text.units.len(), 5);
        assert_eq!(text.units[0].id, UnitId::new(0));
        assert_eq!(text.units[1].loc, "1.2");
        assert_eq!(text.units[1].verse, "vertere, Maecenas, ulmisque adiungere vitis");
        assert_eq!(text.units[2].loc, "1.3");
        assert_eq!(text.units[3].verse, "");
        assert!(text.units[4].verse.ends_with("& c."));
    }

    #[test]
    fn test_missing_root_id() {
        let err = parse_tess("<TessDocument><Text></Text></TessDocument>").unwrap_err();
        assert!(matches!(
            err,
            FeedError::MissingAttribute {
                attribute: "id",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_unit_id_and_unclosed_unit() {
        let doc = r#"<T id="x"><TextUnit id="one" loc="1.1">a</TextUnit></T>"#;
        assert!(matches!(parse_tess(doc), Err(FeedError::InvalidId(id)) if id == "one"));

        let doc = r#"<T id="x"><TextUnit id="1" loc="1.1">a</T>"#;
        assert!(matches!(parse_tess(doc), Err(FeedError::Xml { .. })));
    }

    #[test]
    fn test_character_references_and_cdata() {
        let doc = r#"<T id="aeneid"><TextUnit id="0" loc="1.1">Aene&#257;s &#x101; <![CDATA[a < b &amp; c]]> fin</TextUnit></T>"#;
        let text = parse_tess(doc).unwrap();
        assert_eq!(text.units[0].verse, "Aeneās ā a < b &amp; c fin");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&amp;lt; &#X41;&#66;"), "&lt; AB");
        // Malformed or unknown references stay as written.
        assert_eq!(decode_entities("&nbsp; &#xZZ; & &#1114112;"), "&nbsp; &#xZZ; & &#1114112;");
    }

    #[test]
    fn test_cdata_outside_units_is_skipped() {
        let doc = r#"<T id="x"><![CDATA[<TextUnit id="9" loc="9.9">no</TextUnit>]]><TextUnit id="0" loc="1.1">yes</TextUnit></T>"#;
        let text = parse_tess(doc).unwrap();
        assert_eq!(text.units.len(), 1);
        assert_eq!(text.units[0].verse, "yes");
    }

    #[test]
    fn test_start_tag_attributes() {
        let (rest, tag) = start_tag(r#"<TextUnit id="7"  loc = "2.10" >x"#).unwrap();
        assert_eq!(rest, "x");
        assert_eq!(tag.name, "TextUnit");
        assert_eq!(tag.attribute("loc"), Some("2.10"));
        assert!(!tag.self_closing);
    }
}
