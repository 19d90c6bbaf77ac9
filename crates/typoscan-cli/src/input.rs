// Reading input files line by line with a decoding policy

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::str::FromStr;

use encoding_rs::{CoderResult, Decoder, DecoderResult, Encoding, UTF_8};

/// Name that selects standard input.
pub const STDIN: &str = "-";

/// What to do with bytes that are not valid in the input encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeErrors {
    /// Stop reading the input and report it.
    Strict,
    /// Substitute U+FFFD and go on.
    #[default]
    Replace,
}

impl DecodeErrors {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "strict" => Some(DecodeErrors::Strict),
            "replace" => Some(DecodeErrors::Replace),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            DecodeErrors::Strict => "strict",
            DecodeErrors::Replace => "replace",
        }
    }
}

/// Input encoding as given on the command line: `LABEL[:strict|replace]`.
///
/// `LABEL` is any WHATWG encoding label (`utf-8`, `latin1`, `koi8-r`,
/// `utf-16le`, ...). Without an error policy, decoding is strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEncoding {
    pub encoding: &'static Encoding,
    pub errors: DecodeErrors,
}

impl Default for InputEncoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            errors: DecodeErrors::Replace,
        }
    }
}

/// Resolve an encoding label, also accepting `_` for `-` and spellings
/// without separators (`utf_8`, `latin-1`).
fn lookup_encoding(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes())
        .or_else(|| Encoding::for_label(label.replace('_', "-").as_bytes()))
        .or_else(|| {
            let bare: String = label.chars().filter(|c| !matches!(c, '-' | '_')).collect();
            Encoding::for_label(bare.as_bytes())
        })
}

impl FromStr for InputEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, errors) = match s.rsplit_once(':') {
            Some((label, policy)) => match DecodeErrors::from_name(policy) {
                Some(errors) => (label, errors),
                // Some labels contain a colon themselves (`iso_8859-1:1987`).
                None if lookup_encoding(s).is_some() => (s, DecodeErrors::Strict),
                None => {
                    return Err(format!(
                        "unknown error policy {policy:?}; expected strict or replace"
                    ));
                }
            },
            None => (s, DecodeErrors::Strict),
        };
        let encoding =
            lookup_encoding(label).ok_or_else(|| format!("unknown encoding {label:?}"))?;
        Ok(Self { encoding, errors })
    }
}

impl fmt::Display for InputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.encoding.name().to_ascii_lowercase(),
            self.errors.name()
        )
    }
}

/// An input that could not be read to the end.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}:{line}: invalid {encoding} byte sequence")]
    Decode {
        name: String,
        line: usize,
        encoding: &'static str,
    },
}

/// Open `path` for reading, or standard input for `-`.
pub fn open(path: &str) -> Result<Box<dyn BufRead>, InputError> {
    if path == STDIN {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).map_err(|source| InputError::Io {
        name: path.to_string(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Name of an input as shown in messages.
pub fn display_name(path: &str) -> &str {
    if path == STDIN { "<stdin>" } else { path }
}

/// Decoded lines of an input, line terminators included.
///
/// Bytes are decoded as a stream before lines are split, so encodings
/// that are not ASCII-compatible (UTF-16) work too. Lines completed
/// before a strict decoding error are still returned, then the error;
/// it ends the iteration.
pub struct InputLines<R> {
    reader: R,
    name: String,
    encoding: InputEncoding,
    decoder: Decoder,
    pending: String,
    line_no: usize,
    failure: Option<InputError>,
    eof: bool,
    done: bool,
}

impl<R: BufRead> InputLines<R> {
    pub fn new(reader: R, name: &str, encoding: InputEncoding) -> Self {
        Self {
            reader,
            name: name.to_string(),
            encoding,
            decoder: encoding.encoding.new_decoder_without_bom_handling(),
            pending: String::new(),
            line_no: 0,
            failure: None,
            eof: false,
            done: false,
        }
    }

    /// Decode the next chunk of the reader into `pending`.
    fn decode_chunk(&mut self) -> Result<(), InputError> {
        let chunk = self.reader.fill_buf().map_err(|source| InputError::Io {
            name: self.name.clone(),
            source,
        })?;
        let last = chunk.is_empty();
        let mut read = 0;
        loop {
            let rest = &chunk[read..];
            let room = self
                .decoder
                .max_utf8_buffer_length(rest.len())
                .unwrap_or(rest.len() * 3 + 16);
            self.pending.reserve(room);
            let finished = match self.encoding.errors {
                DecodeErrors::Replace => {
                    let (result, n, _) = self.decoder.decode_to_string(rest, &mut self.pending, last);
                    read += n;
                    result == CoderResult::InputEmpty
                }
                DecodeErrors::Strict => {
                    let (result, n) =
                        self.decoder
                            .decode_to_string_without_replacement(rest, &mut self.pending, last);
                    read += n;
                    match result {
                        DecoderResult::InputEmpty => true,
                        DecoderResult::OutputFull => false,
                        DecoderResult::Malformed(..) => {
                            let line = self.line_no + self.pending.matches('\n').count() + 1;
                            return Err(InputError::Decode {
                                name: self.name.clone(),
                                line,
                                encoding: self.encoding.encoding.name(),
                            });
                        }
                    }
                }
            };
            if finished {
                break;
            }
        }
        self.reader.consume(read);
        self.eof = last;
        Ok(())
    }

    fn take_line(&mut self, end: usize) -> String {
        self.line_no += 1;
        self.pending.drain(..end).collect()
    }
}

impl<R: BufRead> Iterator for InputLines<R> {
    type Item = Result<String, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(newline) = self.pending.find('\n') {
                return Some(Ok(self.take_line(newline + 1)));
            }
            if let Some(err) = self.failure.take() {
                self.done = true;
                return Some(Err(err));
            }
            if self.eof {
                self.done = true;
                if self.pending.is_empty() {
                    return None;
                }
                let end = self.pending.len();
                return Some(Ok(self.take_line(end)));
            }
            match self.decode_chunk() {
                Ok(()) => {}
                Err(err @ InputError::Decode { .. }) => self.failure = Some(err),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(bytes: &[u8], encoding: &str) -> Vec<Result<String, String>> {
        InputLines::new(bytes, "test", encoding.parse().unwrap())
            .map(|r| r.map_err(|e| e.to_string()))
            .collect()
    }

    #[test]
    fn parse_encodings() {
        let utf8 = |errors| InputEncoding {
            encoding: UTF_8,
            errors,
        };
        assert_eq!("utf-8".parse::<InputEncoding>(), Ok(utf8(DecodeErrors::Strict)));
        assert_eq!("UTF8:strict".parse::<InputEncoding>(), Ok(utf8(DecodeErrors::Strict)));
        assert_eq!("utf_8:replace".parse::<InputEncoding>(), Ok(utf8(DecodeErrors::Replace)));
        assert_eq!(InputEncoding::default(), utf8(DecodeErrors::Replace));
        assert!("utf-8:ignore".parse::<InputEncoding>().is_err());
        assert!("klingon".parse::<InputEncoding>().is_err());
    }

    #[test]
    fn parse_other_encodings() {
        for label in ["latin-1", "latin1", "iso-8859-1", "cp1252", "iso_8859-1:1987"] {
            let enc: InputEncoding = label.parse().unwrap();
            assert_eq!(enc.encoding, encoding_rs::WINDOWS_1252, "{label}");
            assert_eq!(enc.errors, DecodeErrors::Strict, "{label}");
        }
        let enc: InputEncoding = "koi8-r:replace".parse().unwrap();
        assert_eq!(enc.encoding, encoding_rs::KOI8_R);
        assert_eq!(enc.errors, DecodeErrors::Replace);
    }

    #[test]
    fn display_round_trips() {
        for label in ["utf-8", "latin1:replace"] {
            let enc: InputEncoding = label.parse().unwrap();
            assert_eq!(enc.to_string().parse::<InputEncoding>(), Ok(enc));
        }
        assert_eq!("utf-8".parse::<InputEncoding>().unwrap().to_string(), "utf-8:strict");
    }

    #[test]
    fn replace_substitutes_bad_bytes() {
        assert_eq!(
            lines(b"caf\xe9\nok", "utf-8:replace"),
            vec![Ok("caf\u{FFFD}\n".to_string()), Ok("ok".to_string())]
        );
    }

    #[test]
    fn strict_reports_line_and_stops() {
        assert_eq!(
            lines(b"ok\ncaf\xe9\nmore\n", "utf-8:strict"),
            vec![
                Ok("ok\n".to_string()),
                Err("test:2: invalid UTF-8 byte sequence".to_string()),
            ]
        );
    }

    #[test]
    fn strict_error_on_first_line() {
        assert_eq!(
            lines(b"\xff\xfe\xfd\n", "utf-8"),
            vec![Err("test:1: invalid UTF-8 byte sequence".to_string())]
        );
    }

    #[test]
    fn latin1_input_decodes() {
        assert_eq!(
            lines(b"caf\xe9 cr\xe8me\nna\xefve", "latin-1"),
            vec![Ok("caf\u{e9} cr\u{e8}me\n".to_string()), Ok("na\u{ef}ve".to_string())]
        );
    }

    #[test]
    fn utf16_input_splits_on_decoded_newlines() {
        let bytes: Vec<u8> = "\u{e9}t\u{e9}\nhiver\n"
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
        assert_eq!(
            lines(&bytes, "utf-16le"),
            vec![Ok("\u{e9}t\u{e9}\n".to_string()), Ok("hiver\n".to_string())]
        );
    }

    #[test]
    fn lines_span_reader_chunks() {
        let text = "first line\nsecond \u{e9}t\u{e9}\nthird";
        let reader = BufReader::with_capacity(4, text.as_bytes());
        let got: Vec<String> = InputLines::new(reader, "small", InputEncoding::default())
            .map(Result::unwrap)
            .collect();
        assert_eq!(got, vec!["first line\n", "second \u{e9}t\u{e9}\n", "third"]);
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = open(path.to_str().unwrap()).err().unwrap();
        assert!(err.to_string().starts_with(path.to_str().unwrap()));
    }

    #[test]
    fn stdin_display_name() {
        assert_eq!(display_name("-"), "<stdin>");
        assert_eq!(display_name("README"), "README");
    }
}
