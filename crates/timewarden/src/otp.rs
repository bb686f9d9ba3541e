use crate::util::random_bytes;

/// Generate a numeric one-time code of the configured length.
///
/// Each digit comes from the CSPRNG through rejection sampling: bytes in
/// 250..=255 are discarded so `b % 10` is uniform over the digit alphabet.
pub fn generate_code(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        for b in random_bytes(16) {
            if b >= 250 {
                continue;
            }
            out.push(char::from(b'0' + b % 10));
            if out.len() == len {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_requested_length_and_only_digits() {
        for len in [4, 6, 8] {
            let code = generate_code(len);
            assert_eq!(code.len(), len);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn codes_vary() {
        let codes: Vec<String> = (0..16).map(|_| generate_code(6)).collect();
        let first = &codes[0];
        assert!(
            codes.iter().any(|c| c != first),
            "16 consecutive codes were identical"
        );
    }
}
