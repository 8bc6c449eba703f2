//! Character-level transitions and the structural stack.

use crate::reader::RuneReader;
use crate::scanner::{LiteralKind, ScanCode, ScanError, Scanner};

/// Position of the lexer within the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    ExpectRoot,
    ExpectKeyOrClose,
    ExpectKey,
    ExpectColon,
    ExpectValueOrClose,
    ExpectValue,
    AfterValue,
    AfterRoot,
    InString,
    InEscape,
    /// Hex digits of a `\u` escape read so far.
    InUnicode(u8),
    Neg,
    Zero,
    Int,
    FracStart,
    Frac,
    ExpStart,
    ExpSign,
    Exp,
    InKeyword {
        word: &'static str,
        pos: u8,
    },
    End,
    Failed,
}

impl State {
    /// Returns `true` while a literal is open.
    pub(super) fn in_literal(self) -> bool {
        matches!(
            self,
            Self::InString
                | Self::InEscape
                | Self::InUnicode(_)
                | Self::Neg
                | Self::Zero
                | Self::Int
                | Self::FracStart
                | Self::Frac
                | Self::ExpStart
                | Self::ExpSign
                | Self::Exp
                | Self::InKeyword { .. }
        )
    }
}

#[inline]
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[inline]
fn closer(c: char) -> ScanCode {
    if c == '}' {
        ScanCode::StructEnd
    } else {
        ScanCode::ArrayEnd
    }
}

impl<R: RuneReader> Scanner<R> {
    /// Consumes one character and returns the raw lexical code.
    ///
    /// Raw codes only use `LiteralBegin` / `LiteralEnd` for literals.
    /// [`settle`](Self::settle) turns them into key codes where needed.
    pub(super) fn lex(&mut self) -> Result<ScanCode, ScanError> {
        use ScanCode::{ArrayEnd, LiteralEnd, Scanning, StructEnd, ToEnd};

        if self.state == State::End {
            return Ok(ToEnd);
        }
        let c = self.read()?;

        let Some(c) = c else {
            return match self.state {
                State::ExpectRoot | State::AfterRoot => {
                    self.state = State::End;
                    Ok(ToEnd)
                }
                State::Zero | State::Int | State::Frac | State::Exp => Ok(LiteralEnd),
                state => Err(ScanError::UnexpectedEnd {
                    context: end_context(state),
                }),
            };
        };

        match self.state {
            State::ExpectRoot => match c {
                _ if is_space(c) => Ok(Scanning),
                '}' | ']' => Ok(closer(c)),
                _ => self.begin_value(c, "looking for beginning of value"),
            },
            State::ExpectKeyOrClose | State::ExpectKey => match c {
                _ if is_space(c) => Ok(Scanning),
                '}' if self.state == State::ExpectKeyOrClose => Ok(StructEnd),
                '"' => Ok(self.begin_literal(State::InString, LiteralKind::String)),
                _ => Err(self.invalid(c, "looking for beginning of object key string")),
            },
            State::ExpectColon => match c {
                _ if is_space(c) => Ok(Scanning),
                ':' => {
                    self.state = State::ExpectValue;
                    Ok(Scanning)
                }
                _ => Err(self.invalid(c, "after object key")),
            },
            State::ExpectValueOrClose | State::ExpectValue => match c {
                _ if is_space(c) => Ok(Scanning),
                ']' if self.state == State::ExpectValueOrClose => Ok(ArrayEnd),
                _ => self.begin_value(c, "looking for beginning of value"),
            },
            State::AfterValue => match c {
                _ if is_space(c) => Ok(Scanning),
                ',' => {
                    self.state = if self.stack.last() == Some(&ScanCode::StructBegin) {
                        State::ExpectKey
                    } else {
                        State::ExpectValue
                    };
                    Ok(Scanning)
                }
                '}' | ']' => Ok(closer(c)),
                _ => Err(self.invalid(c, "after value")),
            },
            State::AfterRoot => match c {
                _ if is_space(c) => Ok(Scanning),
                '}' | ']' => Ok(closer(c)),
                _ => Err(self.invalid(c, "after top-level value")),
            },
            State::InString => match c {
                '"' => Ok(LiteralEnd),
                '\\' => {
                    self.state = State::InEscape;
                    Ok(Scanning)
                }
                _ if c < ' ' => Err(self.invalid(c, "in string literal")),
                _ => Ok(Scanning),
            },
            State::InEscape => match c {
                'b' | 'f' | 'n' | 'r' | 't' | '\\' | '/' | '"' => {
                    self.state = State::InString;
                    Ok(Scanning)
                }
                'u' => {
                    self.state = State::InUnicode(0);
                    Ok(Scanning)
                }
                _ => Err(self.invalid(c, "in string escape code")),
            },
            State::InUnicode(n) => {
                if !c.is_ascii_hexdigit() {
                    return Err(self.invalid(c, "in \\u hexadecimal character escape"));
                }
                self.state = if n == 3 {
                    State::InString
                } else {
                    State::InUnicode(n + 1)
                };
                Ok(Scanning)
            }
            State::Neg => match c {
                '0' => self.number(State::Zero),
                '1'..='9' => self.number(State::Int),
                _ => Err(self.invalid(c, "in numeric literal")),
            },
            State::Zero => self.after_integer(c),
            State::Int => match c {
                '0'..='9' => Ok(Scanning),
                _ => self.after_integer(c),
            },
            State::FracStart => match c {
                '0'..='9' => self.number(State::Frac),
                _ => Err(self.invalid(c, "after decimal point in numeric literal")),
            },
            State::Frac => match c {
                '0'..='9' => Ok(Scanning),
                'e' | 'E' => self.number(State::ExpStart),
                _ => self.end_number(),
            },
            State::ExpStart => match c {
                '+' | '-' => self.number(State::ExpSign),
                '0'..='9' => self.number(State::Exp),
                _ => Err(self.invalid(c, "in exponent of numeric literal")),
            },
            State::ExpSign => match c {
                '0'..='9' => self.number(State::Exp),
                _ => Err(self.invalid(c, "in exponent of numeric literal")),
            },
            State::Exp => match c {
                '0'..='9' => Ok(Scanning),
                _ => self.end_number(),
            },
            State::InKeyword { word, pos } => {
                let expected = char::from(word.as_bytes()[pos as usize]);
                if c != expected {
                    return Err(ScanError::InvalidKeyword {
                        found: c,
                        keyword: word,
                        expected,
                        offset: self.offset - 1,
                    });
                }
                if pos as usize + 1 == word.len() {
                    Ok(LiteralEnd)
                } else {
                    self.state = State::InKeyword { word, pos: pos + 1 };
                    Ok(Scanning)
                }
            }
            State::End => Ok(ToEnd),
            State::Failed => Err(ScanError::Inconsistent {
                code: ScanCode::Error,
                top: self.stack.last().copied(),
            }),
        }
    }

    fn begin_value(&mut self, c: char, context: &'static str) -> Result<ScanCode, ScanError> {
        let code = match c {
            '{' => ScanCode::StructBegin,
            '[' => ScanCode::ArrayBegin,
            '"' => self.begin_literal(State::InString, LiteralKind::String),
            '-' => self.begin_literal(State::Neg, LiteralKind::Int),
            '0' => self.begin_literal(State::Zero, LiteralKind::Int),
            '1'..='9' => self.begin_literal(State::Int, LiteralKind::Int),
            't' => self.begin_keyword("true", LiteralKind::Bool),
            'f' => self.begin_keyword("false", LiteralKind::Bool),
            'n' => self.begin_keyword("null", LiteralKind::Null),
            _ => return Err(self.invalid(c, context)),
        };
        Ok(code)
    }

    #[inline]
    fn begin_literal(&mut self, state: State, kind: LiteralKind) -> ScanCode {
        self.state = state;
        self.literal = kind;
        ScanCode::LiteralBegin
    }

    #[inline]
    fn begin_keyword(&mut self, word: &'static str, kind: LiteralKind) -> ScanCode {
        self.begin_literal(State::InKeyword { word, pos: 1 }, kind)
    }

    #[inline]
    fn number(&mut self, state: State) -> Result<ScanCode, ScanError> {
        if matches!(state, State::FracStart | State::ExpStart) {
            self.literal = LiteralKind::Float;
        }
        self.state = state;
        Ok(ScanCode::Scanning)
    }

    fn after_integer(&mut self, c: char) -> Result<ScanCode, ScanError> {
        match c {
            '.' => self.number(State::FracStart),
            'e' | 'E' => self.number(State::ExpStart),
            _ => self.end_number(),
        }
    }

    /// The current character terminates a number and is scanned again.
    fn end_number(&mut self) -> Result<ScanCode, ScanError> {
        self.unread()?;
        Ok(ScanCode::LiteralEnd)
    }

    #[inline]
    fn invalid(&self, found: char, context: &'static str) -> ScanError {
        ScanError::InvalidChar {
            found,
            context,
            offset: self.offset - 1,
        }
    }

    /// Applies a raw code to the structural stack.
    pub(super) fn settle(&mut self, raw: ScanCode) -> Result<ScanCode, ScanError> {
        use ScanCode::{
            ArrayBegin, ArrayEnd, KeyBegin, KeyEnd, LiteralBegin, LiteralEnd, MapBegin, MapEnd,
            StructBegin, StructEnd,
        };

        let top = self.stack.last().copied();
        match raw {
            LiteralBegin => {
                self.reader.mark();
                match top {
                    Some(StructBegin) => self.stack.push(KeyBegin),
                    Some(KeyEnd) => self.replace_top(LiteralBegin),
                    Some(ArrayBegin) => self.stack.push(LiteralBegin),
                    _ => return Err(ScanError::Inconsistent { code: raw, top }),
                }
                Ok(if top == Some(StructBegin) {
                    KeyBegin
                } else {
                    LiteralBegin
                })
            }
            LiteralEnd => match top {
                Some(KeyBegin) => {
                    self.replace_top(KeyEnd);
                    self.state = State::ExpectColon;
                    Ok(KeyEnd)
                }
                Some(LiteralBegin) => {
                    self.stack.pop();
                    self.after_close();
                    Ok(LiteralEnd)
                }
                _ => Err(ScanError::Inconsistent { code: raw, top }),
            },
            StructBegin | MapBegin | ArrayBegin => {
                if self.depth >= self.config.max_depth {
                    return Err(ScanError::TooDeep {
                        limit: self.config.max_depth,
                    });
                }
                self.depth += 1;

                if top == Some(KeyEnd) {
                    self.replace_top(raw);
                } else {
                    self.stack.push(raw);
                }
                self.state = if raw == ArrayBegin {
                    State::ExpectValueOrClose
                } else {
                    State::ExpectKeyOrClose
                };
                Ok(raw)
            }
            StructEnd | MapEnd | ArrayEnd => match top {
                Some(top) if top.reflection() == Some(raw) => {
                    self.stack.pop();
                    self.depth -= 1;
                    self.after_close();
                    Ok(raw)
                }
                Some(top) => Err(ScanError::Mismatched { found: raw, top }),
                None => Err(ScanError::Underflow { found: raw }),
            },
            _ => Ok(raw),
        }
    }

    #[inline]
    fn replace_top(&mut self, code: ScanCode) {
        if let Some(top) = self.stack.last_mut() {
            *top = code;
        }
    }

    #[inline]
    fn after_close(&mut self) {
        self.state = if self.stack.is_empty() {
            State::AfterRoot
        } else {
            State::AfterValue
        };
    }
}

fn end_context(state: State) -> &'static str {
    match state {
        State::InString | State::InEscape | State::InUnicode(_) => "in string literal",
        State::Neg | State::FracStart | State::ExpStart | State::ExpSign => "in numeric literal",
        State::InKeyword { .. } => "in literal",
        State::ExpectKeyOrClose | State::ExpectKey | State::ExpectColon => "in object",
        State::AfterValue => "after value",
        _ => "looking for beginning of value",
    }
}
