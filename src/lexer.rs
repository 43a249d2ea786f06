//! Lexical analysis for the shell: variable substitution and tokenization.
//!
//! A line goes through two passes. [`substitute`] expands `$name` references
//! using the [`VariableStore`], then [`split_into_tokens`] turns the result into
//! words and pipe operators. Substituted text is tokenized like typed text, so
//! a value containing spaces becomes several words.

use crate::env::VariableStore;
use thiserror::Error;

/// A piece of a word, remembering whether it came from a quoted span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted text.
    Literal(String),
    /// Text from inside `"..."` or `'...'`, quotes stripped.
    Quoted(String),
}

impl WordPart {
    pub fn text(&self) -> &str {
        match self {
            WordPart::Literal(s) | WordPart::Quoted(s) => s,
        }
    }
}

/// Represents a token resulting from lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word token, which may be glued together from quoted and unquoted parts.
    Word(Vec<WordPart>),
    /// The pipe operator, `|`.
    PipeOp,
}

/// Joins the parts of a word into the final argument string.
pub fn word_to_string(parts: &[WordPart]) -> String {
    parts.iter().map(WordPart::text).collect()
}

/// Errors that can occur during the lexical analysis process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexingError {
    /// A closing quote (single or double) was not found.
    #[error("unfinished quote")]
    UnfinishedQuote,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `$name` in `line` with the variable's value.
///
/// Unset variables expand to the empty string. A `$` not followed by a name
/// start is kept as is. Single-quoted spans are copied verbatim, but an
/// apostrophe inside `"..."` does not start one. The output is
/// not scanned again, so values containing `$` stay literal.
pub fn substitute(line: &str, vars: &VariableStore) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    while let Some(ch) = chars.next() {
        match ch {
            // A quote of one kind is plain text inside the other kind.
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                out.push(ch);
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                out.push(ch);
            }
            '$' if !in_single_quote && chars.peek().is_some_and(|&c| is_name_start(c)) => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                out.push_str(vars.get(&name).unwrap_or_default());
            }
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    current_word: Vec<WordPart>,
    buffer: String,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            current_word: Vec::new(),
            buffer: String::new(),
        }
    }

    fn make_tokens(&mut self) -> Result<Vec<Token>, LexingError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Start => self.handle_start(ch, &mut out),
                LexingState::ReadingWord => self.handle_word(ch, &mut out),
                LexingState::ReadingSingleQuote => self.handle_quoted(ch, '\''),
                LexingState::ReadingDoubleQuote => self.handle_quoted(ch, '"'),
            }
        }

        if matches!(
            self.state,
            LexingState::ReadingSingleQuote | LexingState::ReadingDoubleQuote
        ) {
            return Err(LexingError::UnfinishedQuote);
        }

        self.finish_word(&mut out);
        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_start(&mut self, ch: char, out: &mut Vec<Token>) {
        match ch {
            c if c.is_whitespace() => {}
            '|' => out.push(Token::PipeOp),
            '\'' => self.state = LexingState::ReadingSingleQuote,
            '"' => self.state = LexingState::ReadingDoubleQuote,
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<Token>) {
        match ch {
            c if c.is_whitespace() => {
                self.finish_word(out);
                self.state = LexingState::Start;
            }
            '|' => {
                self.finish_word(out);
                out.push(Token::PipeOp);
                self.state = LexingState::Start;
            }
            '\'' => {
                self.flush_literal();
                self.state = LexingState::ReadingSingleQuote;
            }
            '"' => {
                self.flush_literal();
                self.state = LexingState::ReadingDoubleQuote;
            }
            c => self.buffer.push(c),
        }
    }

    fn handle_quoted(&mut self, ch: char, closing: char) {
        if ch == closing {
            // An empty quoted span still makes a (possibly empty) word.
            self.current_word
                .push(WordPart::Quoted(std::mem::take(&mut self.buffer)));
            self.state = LexingState::ReadingWord;
        } else {
            self.buffer.push(ch);
        }
    }

    fn flush_literal(&mut self) {
        if !self.buffer.is_empty() {
            self.current_word
                .push(WordPart::Literal(std::mem::take(&mut self.buffer)));
        }
    }

    fn finish_word(&mut self, out: &mut Vec<Token>) {
        self.flush_literal();
        if !self.current_word.is_empty() {
            out.push(Token::Word(std::mem::take(&mut self.current_word)));
        }
    }
}

/// Splits an already substituted line into words and pipe operators.
///
/// # Returns
/// A vector of tokens on success, or [`LexingError::UnfinishedQuote`] if a
/// quoted span is never closed.
pub fn split_into_tokens(line: &str) -> Result<Vec<Token>, LexingError> {
    LexingFSM::new(line).make_tokens()
}
