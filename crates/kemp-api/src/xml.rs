// XML decoding for appliance responses.
//
// Every response is a single `<Response>` root holding either
// `<Error>text</Error>` or `<Success><Data>…</Data></Success>`. Bodies are
// transcoded to UTF-8 first, honouring a BOM or the charset declared in the
// prolog, then decoded one of two ways:
//
// - typed: serde via `quick_xml::de` into a fixed record
// - dynamic capture: every direct child of `Data` recorded as a
//   (tag name, text) pair, whatever the names are

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::DecodeError;

/// `<Response><Success><Data>T</Data></Success></Response>`
#[derive(Debug, Deserialize)]
pub struct SuccessDocument<T> {
    #[serde(rename = "Success", default = "Option::default")]
    success: Option<SuccessBody<T>>,
}

#[derive(Debug, Deserialize)]
struct SuccessBody<T> {
    #[serde(rename = "Data")]
    data: T,
}

impl<T> SuccessDocument<T> {
    /// The `Data` payload, or `MissingElement` when there is no `Success`.
    pub fn into_data(self) -> Result<T, DecodeError> {
        self.success
            .map(|success| success.data)
            .ok_or(DecodeError::MissingElement("Success"))
    }
}

/// `<Response><Error>message</Error></Response>`
#[derive(Debug, Deserialize)]
pub struct ErrorDocument {
    #[serde(rename = "Error")]
    pub error: String,
}

// ── Charset ─────────────────────────────────────────────────────────

/// Decode a response body to UTF-8.
///
/// A byte-order mark wins over the prolog; with neither, UTF-8 is assumed.
pub fn transcode(bytes: &[u8]) -> Result<Cow<'_, str>, DecodeError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, bytes.get(bom_len..).unwrap_or_default()),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };
    trace!(encoding = encoding.name(), "transcoding response body");

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(DecodeError::Charset(encoding.name()));
    }
    Ok(text)
}

/// The `encoding="…"` label of an ASCII-compatible `<?xml …?>` prolog.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>, DecodeError> {
    let Some(rest) = bytes.strip_prefix(b"<?xml") else {
        return Ok(None);
    };
    let Some(end) = rest.windows(2).position(|w| w == b"?>") else {
        return Ok(None);
    };
    let decl = rest.get(..end).unwrap_or_default();
    let Some(pos) = decl.windows(8).position(|w| w == b"encoding") else {
        return Ok(None);
    };

    let after = decl.get(pos + 8..).unwrap_or_default().trim_ascii_start();
    let Some(after) = after.strip_prefix(b"=") else {
        return Ok(None);
    };
    let after = after.trim_ascii_start();
    let Some((&quote, value)) = after.split_first() else {
        return Ok(None);
    };
    if quote != b'"' && quote != b'\'' {
        return Ok(None);
    }
    let label = value
        .iter()
        .position(|&b| b == quote)
        .and_then(|close| value.get(..close))
        .unwrap_or(value);

    // A prolog we could read as ASCII means the bytes are ASCII-compatible,
    // so a UTF-16 label here is a lie; output_encoding() maps it to UTF-8.
    Encoding::for_label(label)
        .map(|enc| Some(enc.output_encoding()))
        .ok_or_else(|| DecodeError::UnsupportedEncoding(String::from_utf8_lossy(label).into_owned()))
}

// ── Typed decoding ──────────────────────────────────────────────────

/// Decode a success body's `Data` section into a fixed-schema record.
pub fn decode_success<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let text = transcode(body)?;
    let doc: SuccessDocument<T> = quick_xml::de::from_str(&text)?;
    doc.into_data()
}

/// Decode an error body and return its `<Error>` text.
pub fn decode_error_document(body: &[u8]) -> Result<String, DecodeError> {
    let text = transcode(body)?;
    let doc: ErrorDocument = quick_xml::de::from_str(&text)?;
    Ok(doc.error)
}

// ── Dynamic capture ─────────────────────────────────────────────────

/// Transcode a success body and capture its `Data` children.
pub fn decode_parameters(body: &[u8]) -> Result<Vec<(String, String)>, DecodeError> {
    let text = transcode(body)?;
    capture_parameters(&text)
}

/// Record `(tag, text)` for every direct child of `Success > Data`, in
/// document order.
///
/// Only a child's own text is kept; anything nested below it is skipped.
/// A document without `Success` is rejected; `Success` without `Data`
/// (e.g. `<Success>Command completed ok</Success>`) captures nothing.
pub fn capture_parameters(xml: &str) -> Result<Vec<(String, String)>, DecodeError> {
    // No trimming: a value's own whitespace is part of the value.
    let mut reader = Reader::from_str(xml);

    let mut path: Vec<String> = Vec::new();
    let mut captured = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut seen_root = false;
    let mut seen_success = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e)?;
                enter(&path, &name, &mut seen_root, &mut seen_success)?;
                if is_data(&path) {
                    current = Some((name.clone(), String::new()));
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(&e)?;
                enter(&path, &name, &mut seen_root, &mut seen_success)?;
                if is_data(&path) {
                    captured.push((name, String::new()));
                }
            }
            Event::End(_) => {
                path.pop();
                if is_data(&path) {
                    captured.extend(current.take());
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| DecodeError::Malformed(e.to_string()))?;
                push_text(&path, &mut current, &text)?;
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c)
                    .map_err(|e| DecodeError::Malformed(e.to_string()))?;
                push_text(&path, &mut current, text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = path.last() {
        return Err(DecodeError::Malformed(format!(
            "unexpected end of document, <{open}> not closed"
        )));
    }
    if !seen_root {
        return Err(DecodeError::Malformed("no root element".into()));
    }
    if !seen_success {
        return Err(DecodeError::MissingElement("Success"));
    }

    trace!(count = captured.len(), "captured Data children");
    Ok(captured)
}

fn local_name(e: &BytesStart<'_>) -> Result<String, DecodeError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_owned)
        .map_err(|err| DecodeError::Malformed(err.to_string()))
}

fn enter(
    path: &[String],
    name: &str,
    seen_root: &mut bool,
    seen_success: &mut bool,
) -> Result<(), DecodeError> {
    match path {
        [] if *seen_root => Err(DecodeError::Malformed(format!(
            "second root element <{name}>"
        ))),
        [] => {
            *seen_root = true;
            Ok(())
        }
        [_] if name == "Success" => {
            *seen_success = true;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `path` is `[root, Success, Data]`.
fn is_data(path: &[String]) -> bool {
    matches!(path, [_, success, data] if success == "Success" && data == "Data")
}

fn push_text(
    path: &[String],
    current: &mut Option<(String, String)>,
    text: &str,
) -> Result<(), DecodeError> {
    match path {
        [] if text.trim().is_empty() => Ok(()),
        [] => Err(DecodeError::Malformed("text outside the root element".into())),
        [parent @ .., _] if is_data(parent) => {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(text);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// ── Encoding ────────────────────────────────────────────────────────

/// Write a success document whose `Data` holds one element per pair.
///
/// The inverse of [`capture_parameters`] for flat parameter lists.
pub fn encode_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<Response stat=\"200\" code=\"ok\"><Success><Data>");
    for (name, value) in params {
        out.push('<');
        out.push_str(name);
        out.push('>');
        out.push_str(&quick_xml::escape::escape(value));
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    out.push_str("</Data></Success></Response>\n");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn capture_records_every_data_child_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response stat="200" code="ok">
  <Success>
    <Data>
      <hostname>lb01</hostname>
      <Enable>N</Enable>
      <motd/>
    </Data>
  </Success>
</Response>"#;

        let captured = capture_parameters(xml).unwrap();
        assert_eq!(
            captured,
            pairs(&[("hostname", "lb01"), ("Enable", "N"), ("motd", "")])
        );
    }

    #[test]
    fn capture_keeps_surrounding_whitespace() {
        let xml = "<Response><Success><Data>\
                   <motd>  two  spaces  </motd><pad>   </pad>\
                   </Data></Success></Response>\n";

        let captured = capture_parameters(xml).unwrap();
        assert_eq!(captured, pairs(&[("motd", "  two  spaces  "), ("pad", "   ")]));
    }

    #[test]
    fn capture_unescapes_text_and_reads_cdata() {
        let xml = "<Response><Success><Data>\
                   <banner>a &amp; b</banner><raw><![CDATA[<x>]]></raw>\
                   </Data></Success></Response>";

        let captured = capture_parameters(xml).unwrap();
        assert_eq!(captured, pairs(&[("banner", "a & b"), ("raw", "<x>")]));
    }

    #[test]
    fn capture_skips_grandchildren() {
        let xml = "<Response><Success><Data>\
                   <dns>10.0.0.1<extra>ignored</extra></dns>\
                   </Data></Success></Response>";

        let captured = capture_parameters(xml).unwrap();
        assert_eq!(captured, pairs(&[("dns", "10.0.0.1")]));
    }

    #[test]
    fn capture_success_without_data_is_empty() {
        let xml = r#"<Response stat="200" code="ok"><Success>Command completed ok</Success></Response>"#;
        assert!(capture_parameters(xml).unwrap().is_empty());
    }

    #[test]
    fn capture_rejects_documents_without_success() {
        let err = capture_parameters("<Response><Error>nope</Error></Response>").unwrap_err();
        assert!(matches!(err, DecodeError::MissingElement("Success")));
    }

    #[test]
    fn capture_rejects_malformed_xml() {
        for xml in [
            "<Response><Success><Data><Enable>N</Data></Success></Response>",
            "<Response><Success><Data><Enable>N</Enable>",
            "this is not xml",
            "",
        ] {
            let err = capture_parameters(xml).unwrap_err();
            assert!(
                matches!(err, DecodeError::Malformed(_)),
                "expected Malformed for {xml:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn transcode_honours_declared_latin1() {
        let mut body = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><Response><Success><Data><owner>".to_vec();
        body.extend_from_slice(&[0x4A, 0xFC, 0x72, 0x67, 0x65, 0x6E]); // "Jürgen" in Latin-1
        body.extend_from_slice(b"</owner></Data></Success></Response>");

        let captured = decode_parameters(&body).unwrap();
        assert_eq!(captured, pairs(&[("owner", "Jürgen")]));
    }

    #[test]
    fn transcode_single_quoted_label() {
        let body = b"<?xml version='1.0' encoding='windows-1252'?><Response/>";
        assert_eq!(transcode(body).unwrap().as_ref(), std::str::from_utf8(body).unwrap());
    }

    #[test]
    fn transcode_defaults_to_utf8_and_rejects_invalid_bytes() {
        assert_eq!(transcode("<a>é</a>".as_bytes()).unwrap(), "<a>é</a>");

        let err = transcode(&[b'<', b'a', b'>', 0xFF, b'<', b'/', b'a', b'>']).unwrap_err();
        assert!(matches!(err, DecodeError::Charset("UTF-8")));
    }

    #[test]
    fn transcode_strips_bom() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(b"<Response/>");
        assert_eq!(transcode(&body).unwrap(), "<Response/>");
    }

    #[test]
    fn transcode_rejects_unknown_charset() {
        let err = transcode(b"<?xml version=\"1.0\" encoding=\"klingon\"?><Response/>").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedEncoding(ref l) if l == "klingon"));
    }

    #[test]
    fn decode_error_document_reads_message() {
        let body = br#"<Response stat="422" code="fail"><Error>Unknown parameter</Error></Response>"#;
        assert_eq!(decode_error_document(body).unwrap(), "Unknown parameter");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Version {
        version: String,
        build: u32,
    }

    #[test]
    fn decode_success_reads_typed_data() {
        let body = br#"<Response stat="200" code="ok"><Success><Data><version>7.2.54</version><build>19</build></Data></Success></Response>"#;
        let v: Version = decode_success(body).unwrap();
        assert_eq!(
            v,
            Version {
                version: "7.2.54".into(),
                build: 19
            }
        );
    }

    #[test]
    fn decode_success_without_success_is_missing_element() {
        let body = br#"<Response stat="200" code="ok"><Debug>none</Debug></Response>"#;
        let err = decode_success::<Version>(body).unwrap_err();
        assert!(matches!(err, DecodeError::MissingElement("Success")), "{err:?}");
    }

    #[test]
    fn decode_success_rejects_bad_integer() {
        let body = br#"<Response><Success><Data><version>7</version><build>many</build></Data></Success></Response>"#;
        assert!(decode_success::<Version>(body).is_err());
    }

    #[test]
    fn encode_then_capture_round_trips() {
        let original = pairs(&[("motd", "<hi> & \"bye\""), ("Enable", "Y"), ("empty", "")]);
        let xml = encode_parameters(original.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        assert_eq!(capture_parameters(&xml).unwrap(), original);
    }
}
