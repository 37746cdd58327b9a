use std::io::{BufRead, Read};

use regex::Regex;

use errors::*;
use range::MessageId;

lazy_static! {
    static ref LITERAL_AT_EOL: Regex = Regex::new(r"\{(?P<len>\d+)\}\r?\n$").unwrap();
    static ref TAGGED: Regex =
        Regex::new(r"^(?P<tag>[A-Za-z0-9]+) (?P<status>OK|NO|BAD)\b ?(?P<text>.*)").unwrap();
    static ref EXISTS: Regex = Regex::new(r"^\* (?P<nmsg>\d+) EXISTS").unwrap();
    static ref FETCH: Regex = Regex::new(r"^\* (?P<id>\d+) FETCH ").unwrap();
    static ref QUOTED_SECTION: Regex =
        Regex::new(r#"BODY\[[^\]]*\] (?:(?P<nil>NIL)|"(?P<quoted>(?:[^"\\]|\\.)*)")"#).unwrap();
}

/// One server line, with the content of any literals it carried.
#[derive(Debug, PartialEq)]
pub struct IMAPLine {
    pub text: String,
    pub literals: Vec<Vec<u8>>,
}

/// Everything the server sent up to and including a successful tagged
/// completion.
#[derive(Debug, PartialEq)]
pub struct IMAPResponse {
    pub untagged: Vec<IMAPLine>,
    pub status_text: String,
}

/// Read one logical line, following `{n}` literals into the next line.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<IMAPLine> {
    let mut text = String::new();
    let mut literals = Vec::new();
    let mut buff = Vec::new();

    loop {
        buff.clear();
        if reader.read_until(b'\n', &mut buff)? == 0 {
            return Err(ErrorKind::Protocol("connection closed by server".to_string()).into());
        }
        let chunk = String::from_utf8_lossy(&buff).into_owned();
        let literal_len = LITERAL_AT_EOL
            .captures(&chunk)
            .map(|cap| cap["len"].parse::<u64>())
            .map_or(Ok(None), |len| len.map(Some))?;
        text.push_str(chunk.trim_end_matches(|c| c == '\r' || c == '\n'));

        match literal_len {
            Some(len) => {
                let mut literal = Vec::new();
                reader.by_ref().take(len).read_to_end(&mut literal)?;
                if (literal.len() as u64) < len {
                    return Err(ErrorKind::Protocol("literal cut short".to_string()).into());
                }
                literals.push(literal);
            }
            None => break,
        }
    }
    info!("S: {}", text);
    Ok(IMAPLine {
        text: text,
        literals: literals,
    })
}

/// Read lines until the completion tagged `tag`.
///
/// A `NO` or `BAD` completion is an error carrying the server's text.
pub fn read_response<R: BufRead>(reader: &mut R, tag: &str) -> Result<IMAPResponse> {
    let mut untagged = Vec::new();
    loop {
        let line = read_line(reader)?;
        let completion = TAGGED
            .captures(&line.text)
            .filter(|cap| &cap["tag"] == tag)
            .map(|cap| (cap["status"].to_string(), cap["text"].to_string()));
        match completion {
            Some((ref status, ref text)) if status == "OK" => {
                return Ok(IMAPResponse {
                    untagged: untagged,
                    status_text: text.clone(),
                })
            }
            Some((status, text)) => {
                return Err(ErrorKind::Protocol(format!("{} {}", status, text)).into())
            }
            None => untagged.push(line),
        }
    }
}

/// Check the server greeting. Returns `true` for `PREAUTH`, when the
/// connection is already authenticated.
pub fn parse_greeting(line: &IMAPLine) -> Result<bool> {
    if line.text.starts_with("* OK") {
        Ok(false)
    } else if line.text.starts_with("* PREAUTH") {
        Ok(true)
    } else {
        Err(ErrorKind::Protocol(line.text.clone()).into())
    }
}

impl IMAPResponse {
    /// The latest `* n EXISTS` count in this response.
    pub fn exists(&self) -> Option<u32> {
        self.untagged
            .iter()
            .filter_map(|line| EXISTS.captures(&line.text))
            .filter_map(|cap| cap["nmsg"].parse::<u32>().ok())
            .last()
    }

    /// The `BODY[section]` data of the `FETCH` response for message `id`.
    ///
    /// Other `FETCH` lines for the same message, such as unsolicited `FLAGS`
    /// updates, are skipped.
    pub fn fetch_data(&self, id: MessageId, section: &str) -> Option<Vec<u8>> {
        let item = format!("BODY[{}] ", section);
        let line = self.untagged.iter().find(|line| {
            line.text.contains(&item)
                && FETCH
                    .captures(&line.text)
                    .and_then(|cap| cap["id"].parse::<MessageId>().ok())
                    .map_or(false, |n| n == id)
        })?;

        if let Some(literal) = line.literals.first() {
            return Some(literal.clone());
        }
        let cap = QUOTED_SECTION.captures(&line.text)?;
        if cap.name("nil").is_some() {
            return Some(Vec::new());
        }
        Some(unquote(&cap["quoted"]).into_bytes())
    }
}

fn unquote(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut escaped = false;
    for c in quoted.chars() {
        if escaped || c != '\\' {
            out.push(c);
            escaped = false;
        } else {
            escaped = true;
        }
    }
    out
}

/// Quote `s` as an IMAP quoted string.
///
/// CR, LF and NUL cannot appear in a quoted string; a value carrying them
/// is refused rather than sent.
pub fn quote(s: &str) -> Result<String> {
    if s.contains(|c: char| c == '\r' || c == '\n' || c == '\0') {
        return Err(ErrorKind::Protocol("line break in quoted string".to_string()).into());
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Ok(out)
}
