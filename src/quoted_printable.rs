use std::borrow::Cow;

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decodes quoted-printable content (RFC 2045).
///
/// Soft line breaks are removed, with either DOS or UNIX endings. Anything
/// that is not a valid escape is kept as-is, so this never fails.
pub fn qp_decode(s: &[u8]) -> Cow<[u8]> {
    if !s.contains(&b'=') {
        return Cow::Borrowed(s);
    }

    let mut out = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        if s[i] != b'=' {
            out.push(s[i]);
            i += 1;
            continue;
        }

        let rest = &s[i + 1..];
        if rest.starts_with(b"\r\n") {
            i += 3;
        } else if rest.starts_with(b"\n") {
            i += 2;
        } else if let (Some(&hi), Some(&lo)) = (rest.get(0), rest.get(1)) {
            match (hex_value(hi), hex_value(lo)) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'=');
                    i += 1;
                }
            }
        } else {
            out.push(b'=');
            i += 1;
        }
    }
    Cow::Owned(out)
}
