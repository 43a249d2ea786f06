use crate::command::Command;
use crate::env::VariableStore;
use crate::lexer::{self, LexingError, Token, WordPart, word_to_string};
use log::trace;
use thiserror::Error;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name=value`: stores a variable, produces no output.
    Assignment { name: String, value: String },
    /// One or more commands joined by `|`, run left to right.
    Pipeline(Vec<Command>),
}

/// Errors that can occur while turning a line into a [`Statement`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsingError {
    #[error(transparent)]
    Lexing(#[from] LexingError),
    /// A pipe with nothing on one of its sides (e.g., `| cmd` or `cmd |`).
    #[error("syntax error: empty command in pipeline")]
    EmptyCommand,
}

struct StatementBuilder {
    tokens: Vec<Token>,
    pos: usize,
}

impl StatementBuilder {
    fn from(tokens: Vec<Token>) -> Self {
        StatementBuilder { tokens, pos: 0 }
    }

    fn build(mut self) -> Result<Statement, ParsingError> {
        if let Some(statement) = self.try_assignment() {
            return Ok(statement);
        }
        self.parse_pipeline()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// An assignment is a line made of a single word starting with `NAME=`.
    fn try_assignment(&self) -> Option<Statement> {
        let [Token::Word(parts)] = self.tokens.as_slice() else {
            return None;
        };
        let Some(WordPart::Literal(head)) = parts.first() else {
            return None;
        };
        let (name, value_head) = head.split_once('=')?;
        if !is_valid_name(name) {
            return None;
        }
        let value = format!("{}{}", value_head, word_to_string(&parts[1..]));
        Some(Statement::Assignment {
            name: name.to_string(),
            value,
        })
    }

    /// Parse a pipeline: command ('|' command)*
    fn parse_pipeline(&mut self) -> Result<Statement, ParsingError> {
        let mut commands = vec![self.parse_command()?];
        while let Some(Token::PipeOp) = self.peek() {
            self.consume();
            commands.push(self.parse_command()?);
        }
        Ok(Statement::Pipeline(commands))
    }

    /// Parse a command: word+, up to the next pipe or the end of the line.
    fn parse_command(&mut self) -> Result<Command, ParsingError> {
        let mut argv = Vec::new();
        while let Some(Token::Word(parts)) = self.peek() {
            argv.push(word_to_string(parts));
            self.consume();
        }

        let mut argv = argv.into_iter();
        let name = argv.next().ok_or(ParsingError::EmptyCommand)?;
        Ok(Command::from_argv(name, argv.collect()))
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses one input line into a [`Statement`].
///
/// Variables are substituted first, then the line is tokenized and split on
/// pipes. Returns `Ok(None)` for a blank line.
pub fn parse(line: &str, vars: &VariableStore) -> Result<Option<Statement>, ParsingError> {
    let substituted = lexer::substitute(line, vars);
    let tokens = lexer::split_into_tokens(&substituted)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let statement = StatementBuilder::from(tokens).build()?;
    trace!("parsed {:?} into {:?}", line, statement);
    Ok(Some(statement))
}
