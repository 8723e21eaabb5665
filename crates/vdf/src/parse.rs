use crate::VdfError;
use crate::value::{Object, Value};

/// Parses a KeyValues document into its top-level block.
///
/// Nesting depth is bounded only by memory; blocks are tracked on an explicit
/// stack rather than by recursion.
pub fn parse(input: &str) -> Result<Object, VdfError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    Parser::new(input).parse_document()
}

/// Parses a document from raw file contents, which must be UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<Object, VdfError> {
    match std::str::from_utf8(input) {
        Ok(text) => parse(text),
        Err(err) => {
            // Position of the first bad byte, counted over the valid prefix.
            let valid = &input[..err.valid_up_to()];
            let prefix = std::str::from_utf8(valid).unwrap_or_default();
            let line = prefix.matches('\n').count() + 1;
            let last_line = prefix.rsplit('\n').next().unwrap_or_default();
            Err(VdfError::InvalidUtf8 {
                line,
                column: last_line.chars().count() + 1,
            })
        }
    }
}

/// A block that has been opened but not yet closed.
struct Frame {
    key: String,
    parent: Object,
    line: usize,
    column: usize,
}

struct Parser<'a> {
    src: &'a str,
    data: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            data: src.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn parse_document(mut self) -> Result<Object, VdfError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut current = Object::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return match stack.pop() {
                        Some(frame) => Err(VdfError::UnclosedBlock {
                            key: frame.key,
                            line: frame.line,
                            column: frame.column,
                        }),
                        None => Ok(current),
                    };
                }
                Some(b'}') => {
                    let Some(frame) = stack.pop() else {
                        return Err(VdfError::UnmatchedClose {
                            line: self.line,
                            column: self.column,
                        });
                    };
                    self.advance();
                    let mut parent = frame.parent;
                    parent.insert(frame.key, Value::Object(current));
                    current = parent;
                }
                Some(b'"') => {
                    let key = self.read_string()?;
                    self.skip_whitespace();
                    match self.peek() {
                        Some(b'"') => {
                            let value = self.read_string()?;
                            current.insert(key, Value::String(value));
                        }
                        Some(b'{') => {
                            let (line, column) = (self.line, self.column);
                            self.advance();
                            stack.push(Frame {
                                key,
                                parent: std::mem::take(&mut current),
                                line,
                                column,
                            });
                        }
                        Some(_) => return Err(self.unexpected("quoted value or '{'")),
                        None => return Err(self.eof("quoted value or '{'")),
                    }
                }
                Some(_) => return Err(self.unexpected("quoted key or '}'")),
            }
        }
    }

    /// Reads a quoted string starting at the opening quote.
    fn read_string(&mut self) -> Result<String, VdfError> {
        let (line, column) = (self.line, self.column);
        self.advance();

        let mut buf: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None => return Err(VdfError::UnterminatedString { line, column }),
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    match self.peek() {
                        Some(b'\\') => buf.push(b'\\'),
                        Some(b'"') => buf.push(b'"'),
                        Some(b'n') => buf.push(b'\n'),
                        Some(b't') => buf.push(b'\t'),
                        // Unknown escapes are kept as written.
                        Some(_) => {
                            buf.push(b'\\');
                            continue;
                        }
                        None => return Err(VdfError::UnterminatedString { line, column }),
                    }
                    self.advance();
                }
                Some(b) => {
                    buf.push(b);
                    self.advance();
                }
            }
        }

        // Only ASCII bytes are ever substituted, so the buffer stays valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn advance(&mut self) {
        let Some(b) = self.peek() else {
            return;
        };
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b & 0xC0 != 0x80 {
            self.column += 1;
        }
    }

    fn unexpected(&self, expected: &'static str) -> VdfError {
        let found = self.src[self.pos..].chars().next().unwrap_or('\0');
        VdfError::UnexpectedChar {
            found,
            expected,
            line: self.line,
            column: self.column,
        }
    }

    fn eof(&self, expected: &'static str) -> VdfError {
        VdfError::UnexpectedEof {
            expected,
            line: self.line,
            column: self.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY_FOLDERS: &str = r#""libraryfolders"
{
	"0"
	{
		"path"		"C:\\Program Files (x86)\\Steam"
		"label"		""
		"apps"
		{
			"228980"		"402103511"
			"546430"		"1734016349"
		}
	}
	"1"
	{
		"path"		"D:\\SteamLibrary"
	}
}
"#;

    #[test]
    fn parse_library_folders() {
        let root = parse(LIBRARY_FOLDERS).unwrap();
        let folders = root.get_object("libraryfolders").unwrap();
        assert_eq!(folders.len(), 2);

        let first = folders.get_object("0").unwrap();
        assert_eq!(first.get_str("path"), Some(r"C:\Program Files (x86)\Steam"));
        assert_eq!(first.get_str("label"), Some(""));
        assert_eq!(
            first.get_object("apps").unwrap().get_str("546430"),
            Some("1734016349")
        );

        let second = folders.get_object("1").unwrap();
        assert_eq!(second.get_str("path"), Some(r"D:\SteamLibrary"));
    }

    #[test]
    fn parse_app_manifest() {
        let input = "\"AppState\"\n{\n\t\"appid\"\t\t\"546430\"\n\t\"name\"\t\t\"Pathway\"\n\t\"installdir\"\t\t\"Pathway\"\n}\n";
        let root = parse(input).unwrap();
        let state = root.get_object("AppState").unwrap();
        assert_eq!(state.get_str("appid"), Some("546430"));
        assert_eq!(state.get_str("name"), Some("Pathway"));
        assert_eq!(state.get_str("installdir"), Some("Pathway"));
    }

    #[test]
    fn parse_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \r\n\t ").unwrap().is_empty());
    }

    #[test]
    fn parse_whitespace_is_insignificant() {
        let root = parse(r#""a"{"b""c""d"{}}"#).unwrap();
        let a = root.get_object("a").unwrap();
        assert_eq!(a.get_str("b"), Some("c"));
        assert!(a.get_object("d").unwrap().is_empty());
    }

    #[test]
    fn parse_escapes() {
        let root = parse(r#""k" "say \"hi\"\n\ttab \\ \q""#).unwrap();
        assert_eq!(root.get_str("k"), Some("say \"hi\"\n\ttab \\ \\q"));
    }

    #[test]
    fn parse_multibyte_strings() {
        let root = parse("\"name\" \"ゲーム ü\"").unwrap();
        assert_eq!(root.get_str("name"), Some("ゲーム ü"));
    }

    #[test]
    fn parse_strips_bom() {
        let root = parse("\u{feff}\"a\" \"b\"").unwrap();
        assert_eq!(root.get_str("a"), Some("b"));
    }

    #[test]
    fn parse_deep_nesting() {
        let depth = 500;
        let mut input = String::new();
        for _ in 0..depth {
            input.push_str("\"n\" { ");
        }
        input.push_str("\"leaf\" \"x\"");
        for _ in 0..depth {
            input.push_str(" }");
        }

        let mut obj = &parse(&input).unwrap();
        for _ in 0..depth {
            obj = obj.get_object("n").unwrap();
        }
        assert_eq!(obj.get_str("leaf"), Some("x"));
    }

    #[test]
    fn reject_unclosed_block() {
        let err = parse("\"outer\"\n{\n\t\"k\" \"v\"\n").unwrap_err();
        assert_eq!(
            err,
            VdfError::UnclosedBlock {
                key: "outer".into(),
                line: 2,
                column: 1,
            }
        );
    }

    #[test]
    fn reject_unmatched_close() {
        let err = parse("\"k\" \"v\"\n}").unwrap_err();
        assert_eq!(err, VdfError::UnmatchedClose { line: 2, column: 1 });
    }

    #[test]
    fn reject_unterminated_string() {
        let err = parse("\"k\" \"never ends").unwrap_err();
        assert_eq!(err, VdfError::UnterminatedString { line: 1, column: 5 });
    }

    #[test]
    fn reject_key_without_value() {
        let err = parse("\"lonely\"").unwrap_err();
        assert!(matches!(err, VdfError::UnexpectedEof { .. }));
    }

    #[test]
    fn reject_comments() {
        let err = parse("// header\n\"k\" \"v\"").unwrap_err();
        assert!(matches!(
            err,
            VdfError::UnexpectedChar {
                found: '/',
                line: 1,
                column: 1,
                ..
            }
        ));
    }

    #[test]
    fn reject_unquoted_tokens() {
        let err = parse("\"k\" value").unwrap_err();
        assert!(matches!(
            err,
            VdfError::UnexpectedChar {
                found: 'v',
                column: 5,
                ..
            }
        ));
    }

    #[test]
    fn error_messages_carry_position() {
        let err = parse("\"a\"\n{\n  x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected character 'x' at 3:3, expected quoted key or '}'"
        );
    }

    #[test]
    fn parse_bytes_accepts_utf8() {
        let root = parse_bytes("\u{feff}\"k\" \"ü\"".as_bytes()).unwrap();
        assert_eq!(root.get_str("k"), Some("ü"));
    }

    #[test]
    fn parse_bytes_reports_invalid_utf8_position() {
        let err = parse_bytes(b"\"a\"\n{\n\t\"\xc3\xa9\xff\" \"v\"\n}").unwrap_err();
        assert_eq!(err, VdfError::InvalidUtf8 { line: 3, column: 4 });
        assert_eq!(err.to_string(), "invalid UTF-8 at 3:4");
    }
}
