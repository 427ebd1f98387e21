use async_trait::async_trait;
use encoding_rs::Encoding;

use super::EncodingConverter;
use crate::error::Result;

/// Character-set converter backed by encoding_rs.
///
/// Decodes entry bytes from a fixed source encoding (picked by WHATWG label,
/// e.g. `shift_jis`, `euc-kr`) into UTF-8 bytes. Malformed sequences decode
/// to replacement characters rather than failing, which is what the legacy
/// consumers of these archives expect.
pub struct EncodingRsConverter {
    encoding: &'static Encoding,
}

impl EncodingRsConverter {
    /// Look the encoding up by label; `None` for labels encoding_rs does not
    /// know.
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(|encoding| Self { encoding })
    }
}

#[async_trait]
impl EncodingConverter for EncodingRsConverter {
    async fn to_utf8(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let (text, _, _) = self.encoding.decode(&data);
        Ok(text.into_owned().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn converts_shift_jis_to_utf8() {
        let converter = EncodingRsConverter::for_label("shift_jis").unwrap();
        // "日本" in Shift_JIS.
        let out = converter.to_utf8(vec![0x93, 0xFA, 0x96, 0x7B]).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "日本");
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert!(EncodingRsConverter::for_label("no-such-charset").is_none());
    }
}
