use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding: &'static str,
    /// Some byte sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decode a response body as text.
///
/// Encoding is picked from the BOM, then the Content-Type charset, then
/// chardetng. Malformed sequences are replaced, never rejected.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, lossy) = encoding.decode(bytes);
    DecodedBody {
        text: text.into_owned(),
        encoding: used.name(),
        lossy,
    }
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches(['"', '\'']))
        } else {
            None
        }
    })
}
