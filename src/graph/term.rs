//! RDF term types: IRIs, blank nodes and literals.
//!
//! Terms are immutable value types. Equality follows RDF 1.1 literal
//! semantics: a literal typed [`XSD_STRING`] equals an untyped literal with
//! the same lexical value. The same normalization drives canonical keys in
//! [`super::key`], so `==` on terms and key equality always agree.
//!
//! Terms render in N-Triples syntax via `Display` and parse back via
//! `FromStr`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TermParseError;

/// `xsd:string`, the datatype of simple literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:integer`.
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// `xsd:dateTime`.
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// An absolute identifier naming a resource.
///
/// The value is not validated; callers are responsible for well-formedness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Characters N-Triples forbids inside `<...>`; they print as `\uXXXX`.
fn needs_uchar(c: char) -> bool {
    c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for c in self.0.chars() {
            if needs_uchar(c) {
                write!(f, "\\u{:04X}", u32::from(c))?;
            } else {
                write!(f, "{c}")?;
            }
        }
        f.write_str(">")
    }
}

/// A store-scoped identifier for an unnamed resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankNode(String);

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// The annotation carried by a literal: a datatype or a language tag, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralTag {
    Datatype(Iri),
    Language(String),
}

/// A lexical value with an optional datatype or language tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<LiteralTag>,
}

impl Literal {
    /// An untyped (simple) literal.
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: None,
        }
    }

    /// A literal with an explicit datatype IRI.
    pub fn typed(value: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            value: value.into(),
            tag: Some(LiteralTag::Datatype(datatype.into())),
        }
    }

    /// A language-tagged literal.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: Some(LiteralTag::Language(language.into())),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The datatype exactly as given, including an explicit `xsd:string`.
    pub fn datatype(&self) -> Option<&Iri> {
        match &self.tag {
            Some(LiteralTag::Datatype(dt)) => Some(dt),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.tag {
            Some(LiteralTag::Language(lang)) => Some(lang),
            _ => None,
        }
    }

    /// The tag after folding `xsd:string` into "no tag".
    pub(crate) fn normalized_tag(&self) -> Option<&LiteralTag> {
        match &self.tag {
            Some(LiteralTag::Datatype(dt)) if dt.as_str() == XSD_STRING => None,
            other => other.as_ref(),
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        if self.value != other.value {
            return false;
        }
        match (self.normalized_tag(), other.normalized_tag()) {
            (None, None) => true,
            (Some(LiteralTag::Datatype(a)), Some(LiteralTag::Datatype(b))) => a == b,
            (Some(LiteralTag::Language(a)), Some(LiteralTag::Language(b))) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        match self.normalized_tag() {
            None => 0u8.hash(state),
            Some(LiteralTag::Datatype(dt)) => {
                1u8.hash(state);
                dt.hash(state);
            }
            Some(LiteralTag::Language(lang)) => {
                2u8.hash(state);
                lang.hash(state);
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")?;
        match &self.tag {
            Some(LiteralTag::Datatype(dt)) => write!(f, "^^{dt}"),
            Some(LiteralTag::Language(lang)) => write!(f, "@{lang}"),
            None => Ok(()),
        }
    }
}

/// The subject position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Iri(Iri),
    Blank(BlankNode),
}

impl Subject {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(Iri::new(value))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(BlankNode::new(id))
    }
}

impl From<Iri> for Subject {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<BlankNode> for Subject {
    fn from(node: BlankNode) -> Self {
        Self::Blank(node)
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Self::iri(value)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Blank(node) => node.fmt(f),
        }
    }
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Object {
    Iri(Iri),
    Blank(BlankNode),
    Literal(Literal),
}

impl Object {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(Iri::new(value))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(BlankNode::new(id))
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::simple(value))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl From<Iri> for Object {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<BlankNode> for Object {
    fn from(node: BlankNode) -> Self {
        Self::Blank(node)
    }
}

impl From<Literal> for Object {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl From<Subject> for Object {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Iri(iri) => Self::Iri(iri),
            Subject::Blank(node) => Self::Blank(node),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => iri.fmt(f),
            Self::Blank(node) => node.fmt(f),
            Self::Literal(lit) => lit.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_error(input: &str, message: impl Into<String>) -> TermParseError {
    TermParseError::Invalid {
        input: input.to_string(),
        message: message.into(),
    }
}

/// Decode the `\uXXXX` and `\UXXXXXXXX` escapes of a bracketed IRI.
fn unescape_iri(input: &str, inner: &str) -> Result<String, TermParseError> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let width = match chars.next() {
            Some('u') => 4,
            Some('U') => 8,
            _ => return Err(parse_error(input, "IRIs only allow \\u and \\U escapes")),
        };
        let hex: String = chars.by_ref().take(width).collect();
        let decoded = (hex.len() == width && hex.chars().all(|h| h.is_ascii_hexdigit()))
            .then(|| u32::from_str_radix(&hex, 16).ok())
            .flatten()
            .and_then(char::from_u32)
            .ok_or_else(|| parse_error(input, format!("invalid IRI escape '{hex}'")))?;
        out.push(decoded);
    }
    Ok(out)
}

/// Parse `<iri>`, or a bare token taken as an IRI.
fn parse_iri(input: &str) -> Result<Iri, TermParseError> {
    if let Some(inner) = input.strip_prefix('<') {
        let inner = inner
            .strip_suffix('>')
            .ok_or_else(|| parse_error(input, "unterminated IRI, expected '>'"))?;
        if inner.contains(['<', '>']) {
            return Err(parse_error(input, "'<' and '>' must be written as \\u003C and \\u003E"));
        }
        return unescape_iri(input, inner).map(Iri::new);
    }
    if input.is_empty() {
        return Err(parse_error(input, "empty term"));
    }
    if input.contains(char::is_whitespace) || input.starts_with('"') {
        return Err(parse_error(input, "expected an IRI"));
    }
    Ok(Iri::new(input))
}

fn parse_blank(input: &str) -> Option<Result<BlankNode, TermParseError>> {
    let id = input.strip_prefix("_:")?;
    if id.is_empty() {
        return Some(Err(parse_error(input, "blank node label is empty")));
    }
    Some(Ok(BlankNode::new(id)))
}

fn parse_literal(input: &str) -> Result<Literal, TermParseError> {
    let body = &input[1..];
    let mut value = String::new();
    let mut chars = body.char_indices();
    let mut close = None;
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                close = Some(i);
                break;
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, other)) => {
                    return Err(parse_error(input, format!("unknown escape '\\{other}'")));
                }
                None => return Err(parse_error(input, "dangling escape")),
            },
            c => value.push(c),
        }
    }
    let close = close.ok_or_else(|| parse_error(input, "unterminated literal"))?;
    let rest = &body[close + 1..];

    if rest.is_empty() {
        Ok(Literal::simple(value))
    } else if let Some(lang) = rest.strip_prefix('@') {
        if lang.is_empty() {
            return Err(parse_error(input, "empty language tag"));
        }
        Ok(Literal::lang(value, lang))
    } else if let Some(dt) = rest.strip_prefix("^^") {
        Ok(Literal::typed(value, parse_iri(dt)?))
    } else {
        Err(parse_error(input, format!("unexpected trailing text '{rest}'")))
    }
}

impl FromStr for Iri {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_iri(s.trim())
    }
}

impl FromStr for Subject {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match parse_blank(s) {
            Some(node) => node.map(Subject::Blank),
            None => parse_iri(s).map(Subject::Iri),
        }
    }
}

impl FromStr for Object {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('"') {
            return parse_literal(s).map(Object::Literal);
        }
        match parse_blank(s) {
            Some(node) => node.map(Object::Blank),
            None => parse_iri(s).map(Object::Iri),
        }
    }
}
