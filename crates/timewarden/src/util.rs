use getrandom::fill;

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    fill(&mut out).expect("Failed to generate random bytes");
    out
}

pub fn hex_encode(bytes: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(LUT[(b >> 4) as usize] as char);
        out.push(LUT[(b & 0x0f) as usize] as char);
    }
    out
}

/// 128-bit random record id, hex-encoded.
pub fn new_id() -> String {
    hex_encode(&random_bytes(16))
}

/// Canonical form for email addresses everywhere in the service.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
