use super::Form;
use crate::error::SyntaxError;

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest list (or datum comment) nesting accepted before giving up.
pub(super) const MAX_DEPTH: usize = 256;

/// Characters that end a symbol or number token.
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '"' | ';')
}

/// A token that starts like a number must parse as one.
fn looks_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Cursor over the source text, tracking line and column for diagnostics.
pub(super) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(super) const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    const fn mark(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.line, self.column, message)
    }

    /// Enter one nesting level opened at `line`/`column`. Levels are only
    /// left on success; any error aborts the whole parse.
    fn descend(&mut self, (line, column): (usize, usize)) -> ParseResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::new(
                line,
                column,
                format!("nesting deeper than {MAX_DEPTH} levels"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Read every top-level form until end of input.
    pub(super) fn parse_all(&mut self) -> ParseResult<Vec<Form>> {
        let mut forms = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek().is_none() {
                return Ok(forms);
            }
            forms.push(self.parse_form()?);
        }
    }

    /// Skip whitespace, `;` line comments and `#;` datum comments.
    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some(';') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('#') if self.rest().starts_with("#;") => {
                    self.descend(self.mark())?;
                    self.bump();
                    self.bump();
                    self.skip_trivia()?;
                    if self.peek().is_none() {
                        return Err(self.error("datum comment at end of input"));
                    }
                    self.parse_form()?;
                    self.depth -= 1;
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_form(&mut self) -> ParseResult<Form> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('(') => self.parse_list(')'),
            Some('[') => self.parse_list(']'),
            Some(c @ (')' | ']')) => Err(self.error(format!("unexpected '{c}'"))),
            Some('"') => self.parse_string(),
            Some('#') => self.parse_hash(),
            Some(_) => self.parse_atom(),
        }
    }

    fn parse_list(&mut self, close: char) -> ParseResult<Form> {
        let (line, column) = self.mark();
        self.descend((line, column))?;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(SyntaxError::new(line, column, "unterminated list")),
                Some(c) if c == close => {
                    self.bump();
                    self.depth -= 1;
                    return Ok(Form::List(items));
                }
                Some(c @ (')' | ']')) => {
                    return Err(self.error(format!("expected '{close}' but found '{c}'")));
                }
                Some(_) => items.push(self.parse_form()?),
            }
        }
    }

    fn parse_string(&mut self) -> ParseResult<Form> {
        let (line, column) = self.mark();
        self.bump();
        let mut buf = String::new();
        loop {
            match self.bump() {
                None => return Err(SyntaxError::new(line, column, "unterminated string")),
                Some('"') => return Ok(Form::String(buf)),
                Some('\\') => buf.push(self.parse_escape()?),
                Some(c) => buf.push(c),
            }
        }
    }

    fn parse_escape(&mut self) -> ParseResult<char> {
        let escaped = self.bump().ok_or_else(|| self.error("incomplete escape"))?;
        match escaped {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            'x' => {
                let mut digits = String::new();
                loop {
                    match self.bump() {
                        Some(';') => break,
                        Some(c) if c.is_ascii_hexdigit() => digits.push(c),
                        _ => return Err(self.error("hex escape must look like \\x41;")),
                    }
                }
                u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(format!("invalid hex escape \\x{digits};")))
            }
            other => Err(self.error(format!("unknown escape \\{other}"))),
        }
    }

    fn read_token(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            self.bump();
        }
        self.src.get(start..self.pos).unwrap_or("")
    }

    fn parse_hash(&mut self) -> ParseResult<Form> {
        let (line, column) = self.mark();
        match self.read_token() {
            "#t" | "#true" => Ok(Form::Boolean(true)),
            "#f" | "#false" => Ok(Form::Boolean(false)),
            other => Err(SyntaxError::new(
                line,
                column,
                format!("unknown literal {other}"),
            )),
        }
    }

    fn parse_atom(&mut self) -> ParseResult<Form> {
        let (line, column) = self.mark();
        let token = self.read_token();
        if !looks_numeric(token) {
            return Ok(Form::Symbol(token.to_string()));
        }
        let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(SyntaxError::new(
                line,
                column,
                format!("malformed number {token}"),
            ));
        }
        token
            .parse::<i64>()
            .map(Form::Integer)
            .map_err(|_| SyntaxError::new(line, column, format!("integer out of range {token}")))
    }
}
