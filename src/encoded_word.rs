//! RFC 2047 "encoded word" decoding of header values.

use std::borrow::Cow;

use encoding_rs::Encoding;
use regex::Regex;

use quoted_printable::qp_decode;

lazy_static! {
    static ref ENCODED_WORD: Regex =
        Regex::new(r"=\?([^?\s]+)\?([bBqQ])\?([^?\s]*)\?=").unwrap();
}

/// Charset reported for text that was not inside an encoded word.
pub const DEFAULT_CHARSET: &str = "default";

/// One decoded piece of a header value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub charset: String,
    pub text: String,
}

impl Fragment {
    fn plain(text: &str) -> Fragment {
        Fragment {
            charset: DEFAULT_CHARSET.to_string(),
            text: text.to_string(),
        }
    }
}

/// Split `value` into plain and encoded fragments, decoding the latter.
///
/// Linear whitespace between two adjacent encoded words is dropped. An
/// encoded word that cannot be decoded (unknown charset, broken base64) is
/// kept verbatim as plain text.
pub fn decode(value: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last_end = 0;
    let mut last_was_encoded = false;

    for cap in ENCODED_WORD.captures_iter(value) {
        let whole = cap.get(0).unwrap();
        let decoded = decode_word(&cap[1], &cap[2], &cap[3]);

        let gap = &value[last_end..whole.start()];
        let skip_gap = last_was_encoded
            && decoded.is_some()
            && gap.chars().all(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');
        if !gap.is_empty() && !skip_gap {
            fragments.push(Fragment::plain(gap));
        }

        match decoded {
            Some(fragment) => {
                fragments.push(fragment);
                last_was_encoded = true;
            }
            None => {
                fragments.push(Fragment::plain(whole.as_str()));
                last_was_encoded = false;
            }
        }
        last_end = whole.end();
    }

    if last_end < value.len() || fragments.is_empty() {
        fragments.push(Fragment::plain(&value[last_end..]));
    }
    fragments
}

/// Decode `value` and concatenate the text of every fragment.
pub fn decode_to_string(value: &str) -> String {
    decode(value).into_iter().map(|f| f.text).collect()
}

fn decode_word(charset: &str, encoding: &str, content: &str) -> Option<Fragment> {
    // RFC 2231 allows a language suffix: =?utf-8*en?Q?...?=
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes: Cow<[u8]> = match encoding {
        "b" | "B" => Cow::Owned(base64::decode(content).ok()?),
        _ => {
            // _ stands for a space regardless of charset
            let content = content.replace('_', " ");
            Cow::Owned(qp_decode(content.as_bytes()).into_owned())
        }
    };

    let text = Encoding::for_label_no_replacement(charset.as_bytes())?
        .decode_with_bom_removal(&bytes)
        .0
        .into_owned();
    Some(Fragment {
        charset: charset.to_string(),
        text: text,
    })
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn plain_text_is_one_default_fragment() {
        assert_eq!(vec![Fragment::plain("hello world")], decode("hello world"));
        assert_eq!(vec![Fragment::plain("")], decode(""));
    }

    #[test]
    fn rfc2047_examples() {
        assert_eq!("hello", decode_to_string("=?UTF-8?B?aGVsbG8=?="));
        assert_eq!("Keith Moore", decode_to_string("=?US-ASCII?Q?Keith_Moore?="));
        assert_eq!(
            "Keld Jørn Simonsen",
            decode_to_string("=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?=")
        );
        assert_eq!("André", decode_to_string("=?ISO-8859-1?Q?Andr=E9?="));
        assert_eq!(
            "םולש ןב ילטפנ",
            decode_to_string("=?iso-8859-8?b?7eXs+SDv4SDp7Oj08A==?=")
        );
    }

    #[test]
    fn fragments_keep_charset_and_order() {
        assert_eq!(
            vec![
                Fragment::plain("Re: "),
                Fragment {
                    charset: "UTF-8".to_string(),
                    text: "héllo".to_string(),
                },
                Fragment::plain(" there"),
            ],
            decode("Re: =?UTF-8?Q?h=C3=A9llo?= there")
        );
    }

    #[test]
    fn whitespace_between_encoded_words_is_dropped() {
        assert_eq!("ab", decode_to_string("=?ISO-8859-1?Q?a?= =?ISO-8859-1?Q?b?="));
        assert_eq!("ab", decode_to_string("=?ISO-8859-1?Q?a?=\r\n =?ISO-8859-1?Q?b?="));
        assert_eq!("a b", decode_to_string("=?ISO-8859-1?Q?a?= b"));
        assert_eq!("a b", decode_to_string("=?ISO-8859-1?Q?a_b?="));
    }

    #[test]
    fn language_suffix_is_ignored() {
        assert_eq!("hi", decode_to_string("=?utf-8*en?Q?hi?="));
    }

    #[test]
    fn undecodable_words_pass_through() {
        assert_eq!(
            "=?x-unknown?Q?abc?=",
            decode_to_string("=?x-unknown?Q?abc?=")
        );
        assert_eq!("=?UTF-8?B?!!!?=", decode_to_string("=?UTF-8?B?!!!?="));
    }

    proptest! {
        #[test]
        fn decode_never_panics(s in r"(=\?.*\?.*\?.*\?= ?|[^=]*){0,4}") {
            decode(&s);
        }
    }
}
