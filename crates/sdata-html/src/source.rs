//! Locating directive attributes in the raw document source.

use std::borrow::Cow;
use std::ops::Range;

use regex::Regex;

use crate::engine::Substitution;

/// Elements whose content the HTML tokenizer reads as text, not markup.
const RAW_TEXT_ELEMENTS: [&str; 10] = [
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "textarea",
    "title",
    "xmp",
];

/// Replaces directive attributes in the source text.
pub(crate) enum SourceRewriter<'s> {
    /// Pairs elements, in document order, with their own attribute.
    Anchored(AnchoredRewriter<'s>),
    /// Legacy mode: edits a copy of the document in place.
    FirstMatch(String),
}

impl<'s> SourceRewriter<'s> {
    pub(crate) fn new(mode: Substitution, source: &'s str) -> Self {
        match mode {
            Substitution::Anchored => Self::Anchored(AnchoredRewriter::new(source)),
            Substitution::FirstMatch => Self::FirstMatch(source.to_owned()),
        }
    }

    /// Replace the `data-<suffix>` attribute carrying `value` with `fragment`.
    ///
    /// Returns `false` if no matching occurrence was found.
    pub(crate) fn replace(&mut self, suffix: &str, value: &str, fragment: &str) -> bool {
        match self {
            Self::Anchored(rewriter) => rewriter.replace(suffix, value, fragment),
            Self::FirstMatch(document) => match find_first_match(document, suffix, value) {
                Some(range) => {
                    document.replace_range(range, fragment);
                    true
                }
                None => false,
            },
        }
    }

    /// The rewritten document.
    pub(crate) fn finish(self) -> String {
        match self {
            Self::Anchored(rewriter) => rewriter.finish(),
            Self::FirstMatch(document) => document,
        }
    }
}

/// Legacy lookup: the first textual `data-<suffix>=?<value>?` anywhere,
/// with any single character standing in for the quotes.
fn find_first_match(source: &str, suffix: &str, value: &str) -> Option<Range<usize>> {
    let pattern = format!(
        "data-{}=.{}.",
        regex::escape(suffix),
        regex::escape(value)
    );
    let re = Regex::new(&pattern).ok()?;
    re.find(source).map(|m| m.range())
}

/// Single forward pass over the unmodified source.
///
/// Attributes are consumed in source order. The output is assembled from
/// untouched source slices and replacement fragments.
pub(crate) struct AnchoredRewriter<'s> {
    source: &'s str,
    scanner: AttributeScanner<'s>,
    output: String,
    copied: usize,
}

impl<'s> AnchoredRewriter<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            scanner: AttributeScanner::new(source),
            output: String::with_capacity(source.len()),
            copied: 0,
        }
    }

    fn replace(&mut self, suffix: &str, value: &str, fragment: &str) -> bool {
        let name = format!("data-{suffix}");
        let resume = self.scanner.clone();

        for attribute in self.scanner.by_ref() {
            if attribute.name.eq_ignore_ascii_case(&name) && value_matches(attribute.value, value) {
                self.output
                    .push_str(&self.source[self.copied..attribute.span.start]);
                self.output.push_str(fragment);
                self.copied = attribute.span.end;
                return true;
            }
        }

        // A miss must not consume the attributes of later elements.
        self.scanner = resume;
        false
    }

    fn finish(mut self) -> String {
        self.output.push_str(&self.source[self.copied..]);
        self.output
    }
}

/// An attribute of a start tag, as written in the source.
#[derive(Debug, PartialEq, Eq)]
struct Attribute<'s> {
    name: &'s str,
    /// Raw value, without quotes. Empty for a bare attribute.
    value: &'s str,
    /// Name, `=` and value, including quotes.
    span: Range<usize>,
}

/// Iterates over start tag attributes in source order.
///
/// Tracks quoting and raw text element bodies so that attributes stay in step
/// with the elements of the parsed tree.
#[derive(Debug, Clone)]
struct AttributeScanner<'s> {
    source: &'s str,
    pos: usize,
    /// Name of the start tag being read.
    tag: Option<&'s str>,
}

impl<'s> AttributeScanner<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            tag: None,
        }
    }

    /// Advance past text, comments and end tags to the next start tag and
    /// return its name.
    fn next_start_tag(&mut self) -> Option<&'s str> {
        let source = self.source;
        let bytes = source.as_bytes();
        loop {
            let open = self.pos + source[self.pos..].find('<')?;
            let rest = &bytes[open + 1..];
            match rest.first() {
                Some(c) if c.is_ascii_alphabetic() => {
                    let start = open + 1;
                    let end = source[start..]
                        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                        .map_or(source.len(), |i| start + i);
                    self.pos = end;
                    return Some(&source[start..end]);
                }
                Some(b'!') if rest.starts_with(b"!--") => {
                    // Searching from the first dash also ends `<!-->` and `<!--->`.
                    self.pos = source[open + 2..]
                        .find("-->")
                        .map_or(source.len(), |i| open + 2 + i + 3);
                }
                Some(b'!' | b'?' | b'/') => {
                    self.pos = source[open + 1..]
                        .find('>')
                        .map_or(source.len(), |i| open + 1 + i + 1);
                }
                _ => self.pos = open + 1,
            }
        }
    }

    /// Read the attribute starting at the current position.
    fn attribute(&mut self) -> Attribute<'s> {
        let source = self.source;
        let bytes = source.as_bytes();
        let start = self.pos;

        // A leading `=` is part of the name.
        let mut end = start + 1;
        while end < bytes.len() && !is_name_end(bytes[end]) {
            end += 1;
        }
        let name = &source[start..end];

        let mut cursor = skip_whitespace(bytes, end);
        if bytes.get(cursor) != Some(&b'=') {
            self.pos = end;
            return Attribute {
                name,
                value: "",
                span: start..end,
            };
        }
        cursor = skip_whitespace(bytes, cursor + 1);

        let (value, value_end) = match bytes.get(cursor) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let inner = cursor + 1;
                match source[inner..].find(char::from(quote)) {
                    Some(i) => (&source[inner..inner + i], inner + i + 1),
                    None => (&source[inner..], source.len()),
                }
            }
            _ => {
                let len = source[cursor..]
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(source.len() - cursor);
                (&source[cursor..cursor + len], cursor + len)
            }
        };

        self.pos = value_end;
        Attribute {
            name,
            value,
            span: start..value_end,
        }
    }

    /// Move past the body of a raw text element that just opened.
    fn skip_raw_text(&mut self, tag: &str) {
        if !RAW_TEXT_ELEMENTS
            .iter()
            .any(|raw| raw.eq_ignore_ascii_case(tag))
        {
            return;
        }
        if tag.eq_ignore_ascii_case("plaintext") {
            self.pos = self.source.len();
            return;
        }

        let source = self.source;
        let mut from = self.pos;
        while let Some(i) = source[from..].find("</") {
            let close = from + i;
            let name_end = close + 2 + tag.len();
            let same_name = source
                .get(close + 2..name_end)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag));
            let terminated = source
                .as_bytes()
                .get(name_end)
                .is_none_or(|&c| c.is_ascii_whitespace() || c == b'/' || c == b'>');
            if same_name && terminated {
                self.pos = close;
                return;
            }
            from = close + 2;
        }
        self.pos = source.len();
    }
}

impl<'s> Iterator for AttributeScanner<'s> {
    type Item = Attribute<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(tag) = self.tag else {
                self.tag = Some(self.next_start_tag()?);
                continue;
            };

            let source = self.source;
            let bytes = source.as_bytes();
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_whitespace() || bytes[self.pos] == b'/')
            {
                self.pos += 1;
            }

            match bytes.get(self.pos) {
                None => return None,
                Some(b'>') => {
                    self.pos += 1;
                    self.tag = None;
                    self.skip_raw_text(tag);
                }
                Some(_) => return Some(self.attribute()),
            }
        }
    }
}

fn is_name_end(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'=' | b'/' | b'>')
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

/// Compare a raw source value with the parser's attribute value.
///
/// A value holding a named reference outside the common set cannot be
/// decoded here and is accepted on its position alone.
fn value_matches(raw: &str, parsed: &str) -> bool {
    if raw == parsed {
        return true;
    }
    match normalize_value(raw) {
        Some(normalized) => normalized == parsed,
        None => true,
    }
}

/// Apply the parser's newline normalization and decode character references.
///
/// Returns `None` if the value contains an unknown named reference.
fn normalize_value(raw: &str) -> Option<Cow<'_, str>> {
    if !raw.contains(['\r', '&']) {
        return Some(Cow::Borrowed(raw));
    }
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_reference(rest) {
            Ok(Some((c, len))) => {
                decoded.push(c);
                rest = &rest[len..];
            }
            Ok(None) => {
                decoded.push('&');
                rest = &rest[1..];
            }
            Err(UnknownReference) => return None,
        }
    }
    decoded.push_str(rest);
    Some(Cow::Owned(decoded))
}

struct UnknownReference;

/// Decode the reference at the start of `text` (which begins with `&`).
///
/// `Ok(None)` means the `&` is literal text.
fn decode_reference(text: &str) -> Result<Option<(char, usize)>, UnknownReference> {
    let Some(end) = text.find(';') else {
        return Ok(None);
    };
    let body = &text[1..end];

    let c = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(decimal) = body.strip_prefix('#') {
        decimal.parse().ok().and_then(char::from_u32)
    } else if !body.is_empty() && body.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Some(named_reference(body).ok_or(UnknownReference)?)
    } else {
        None
    };

    Ok(c.map(|c| (c, end + 1)))
}

fn named_reference(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "Tab" => '\t',
        "NewLine" => '\n',
        _ => return None,
    };
    Some(c)
}
