//! Lenient base64 decoding for data-URI payloads.
//!
//! Browsers hand us archives as `data:<mime>;base64,<payload>` strings. The
//! decoder here is deliberately forgiving: characters outside the base64
//! alphabet (line breaks, stray whitespace, URI noise) are skipped rather
//! than rejected, matching how the payloads were produced historically.

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Index of the padding character `=` in [`ALPHABET`].
const PAD: usize = 64;

/// Return the payload portion of a data URI.
///
/// Everything after the first comma is payload; a string with no comma is
/// treated as bare payload.
pub fn data_uri_payload(data_uri: &str) -> &str {
    match data_uri.find(',') {
        Some(idx) => &data_uri[idx + 1..],
        None => data_uri,
    }
}

/// Decode a base64 payload into a buffer of exactly `expected_len` bytes.
///
/// Classic 4-characters-to-3-bytes table decode: 6-bit groups accumulate
/// into a rolling buffer and a byte is emitted each time at least 8 bits are
/// available. The padding character is consumed without emitting. The output
/// is always `expected_len` bytes long: decoded bytes beyond it are
/// discarded, and a shortfall leaves the tail zero-filled.
pub fn decode(payload: &str, expected_len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; expected_len];
    let mut emitted = 0usize;

    let mut acc: u32 = 0;
    let mut pending: i32 = -8;

    for ch in payload.bytes() {
        let Some(idx) = ALPHABET.iter().position(|&a| a == ch) else {
            // Out-of-alphabet characters are skipped, not rejected.
            continue;
        };
        acc = (acc << 6) | (idx as u32 & 0x3F);
        pending += 6;
        if pending >= 0 {
            if idx != PAD {
                let byte = (acc >> pending) as u8;
                if emitted < bytes.len() {
                    bytes[emitted] = byte;
                }
                emitted += 1;
            }
            acc &= 0x3F;
            pending -= 8;
        }
    }

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal encoder, used only to exercise the decoder.
    fn encode(data: &[u8]) -> String {
        let mut out = String::new();
        for chunk in data.chunks(3) {
            let b = [
                chunk[0],
                chunk.get(1).copied().unwrap_or(0),
                chunk.get(2).copied().unwrap_or(0),
            ];
            let n = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);
            let idx = [
                (n >> 18) & 0x3F,
                (n >> 12) & 0x3F,
                (n >> 6) & 0x3F,
                n & 0x3F,
            ];
            for (i, &v) in idx.iter().enumerate() {
                if i <= chunk.len() {
                    out.push(ALPHABET[v as usize] as char);
                } else {
                    out.push('=');
                }
            }
        }
        out
    }

    #[test]
    fn round_trips_arbitrary_buffers() {
        for len in [0usize, 1, 2, 3, 4, 57, 256] {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 % 251) as u8).collect();
            assert_eq!(decode(&encode(&data), data.len()), data, "len {len}");
        }
    }

    #[test]
    fn skips_characters_outside_the_alphabet() {
        let clean = encode(b"hello world");
        let noisy: String = clean
            .chars()
            .flat_map(|c| [c, '\n'])
            .chain("!!".chars())
            .collect();
        assert_eq!(decode(&noisy, 11), b"hello world");
    }

    #[test]
    fn padding_is_consumed_without_emitting() {
        // "hi" encodes to "aGk=" with one pad character.
        assert_eq!(decode("aGk=", 2), b"hi");
    }

    #[test]
    fn output_is_sized_to_the_expected_length() {
        let payload = encode(b"abcdef");
        // Shorter than decoded: excess discarded.
        assert_eq!(decode(&payload, 3), b"abc");
        // Longer than decoded: tail zero-filled.
        assert_eq!(decode(&payload, 8), b"abcdef\x00\x00");
    }

    #[test]
    fn payload_starts_after_the_first_comma() {
        assert_eq!(data_uri_payload("data:application/zip;base64,UEsF"), "UEsF");
        assert_eq!(data_uri_payload("UEsF"), "UEsF");
        assert_eq!(data_uri_payload("data:;base64,a,b"), "a,b");
    }
}
