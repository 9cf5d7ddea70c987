use crate::domain::{AcdatError, ParserResult};
use encoding_rs::{EUC_JP, Encoding, ISO_2022_JP, SHIFT_JIS, UTF_8};
use std::fmt::{Display, Formatter};

/// Encodings tried in order; Japanese instrument PCs write any of these.
pub const CANDIDATE_ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Iso2022Jp,
    TextEncoding::EucJp,
    TextEncoding::ShiftJis,
    TextEncoding::Utf8,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Iso2022Jp,
    EucJp,
    ShiftJis,
    Utf8,
}

impl TextEncoding {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Iso2022Jp => "iso-2022-jp",
            Self::EucJp => "euc-jp",
            Self::ShiftJis => "shift_jis",
            Self::Utf8 => "utf-8",
        }
    }

    fn codec(self) -> &'static Encoding {
        match self {
            Self::Iso2022Jp => ISO_2022_JP,
            Self::EucJp => EUC_JP,
            Self::ShiftJis => SHIFT_JIS,
            Self::Utf8 => UTF_8,
        }
    }

    /// Strict decode: any malformed sequence yields `None`, never a replacement character.
    pub fn decode_strict(self, bytes: &[u8]) -> Option<String> {
        self.codec()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

impl Display for TextEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub encoding: TextEncoding,
    pub text: String,
}

pub fn decode_with_candidates(bytes: &[u8]) -> ParserResult<DecodedText> {
    for encoding in CANDIDATE_ENCODINGS {
        if let Some(text) = encoding.decode_strict(bytes) {
            tracing::debug!(encoding = encoding.label(), "resolved input encoding");
            return Ok(DecodedText { encoding, text });
        }
    }

    let tried = CANDIDATE_ENCODINGS
        .iter()
        .map(|encoding| encoding.label())
        .collect::<Vec<_>>()
        .join(", ");
    Err(AcdatError::encoding_undetermined(
        "INPUT.ENCODING_UNDETERMINED",
        format!("could not determine the text encoding (tried {tried})"),
    ))
}

#[cfg(test)]
mod tests {
    use super::{TextEncoding, decode_with_candidates};
    use crate::domain::AcdatErrorCategory;

    #[test]
    fn ascii_input_resolves_to_first_candidate() {
        let decoded = decode_with_candidates(b"AC-2,0.5\n").expect("ascii should decode");
        assert_eq!(decoded.encoding, TextEncoding::Iso2022Jp);
        assert_eq!(decoded.text, "AC-2,0.5\n");
    }

    #[test]
    fn euc_jp_bytes_resolve_to_euc_jp() {
        // "テスト" in EUC-JP
        let bytes = [0xa5, 0xc6, 0xa5, 0xb9, 0xa5, 0xc8, b'\n'];
        let decoded = decode_with_candidates(&bytes).expect("euc-jp should decode");
        assert_eq!(decoded.encoding, TextEncoding::EucJp);
        assert_eq!(decoded.text, "テスト\n");
    }

    #[test]
    fn shift_jis_bytes_resolve_to_shift_jis() {
        // "試料" in Shift_JIS
        let bytes = [0x8e, 0x8e, 0x97, 0xbf, b'\n'];
        let decoded = decode_with_candidates(&bytes).expect("shift_jis should decode");
        assert_eq!(decoded.encoding, TextEncoding::ShiftJis);
        assert_eq!(decoded.text, "試料\n");
    }

    #[test]
    fn utf8_bytes_fall_through_to_utf8() {
        let decoded =
            decode_with_candidates("試料\n".as_bytes()).expect("utf-8 should decode");
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "試料\n");
    }

    #[test]
    fn undecodable_bytes_fail_with_encoding_error() {
        let error = decode_with_candidates(&[0xff, 0xff, 0xff]).expect_err("should fail");
        assert_eq!(error.category(), AcdatErrorCategory::EncodingUndetermined);
        assert_eq!(error.placeholder(), "INPUT.ENCODING_UNDETERMINED");
        assert!(error.message().contains("iso-2022-jp, euc-jp, shift_jis, utf-8"));
    }
}
