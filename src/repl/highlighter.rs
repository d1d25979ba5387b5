use lazy_static::lazy_static;
use listlang::engine::ops;
use owo_colors::OwoColorize;
use regex::Regex;
use rustyline::highlight::Highlighter;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow::{self, Owned};

lazy_static! {
    // Operation names are only recognized as quoted strings, e.g. "array_get".
    static ref OPERATION_RE: Regex =
        Regex::new(&format!(r#""({})""#, ops::OPERATIONS.join("|"))).unwrap();
    static ref STRING_RE: Regex = Regex::new(r#""([^"\\]|\\.)*""#).unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"-?\d+").unwrap();
    static ref NULL_RE: Regex = Regex::new(r"\bnull\b").unwrap();
    static ref BRACKET_RE: Regex = Regex::new(r"[\[\]]").unwrap();
}

#[derive(Clone, Copy)]
enum Token {
    Operation,
    Name,
    Number,
    Null,
    Bracket,
}

impl Token {
    fn paint(self, text: &str) -> String {
        match self {
            Token::Operation => text.cyan().bold().to_string(),
            Token::Name => text.green().to_string(),
            Token::Number => text.magenta().to_string(),
            Token::Null => text.yellow().to_string(),
            Token::Bracket => text.blue().to_string(),
        }
    }
}

/// Colours one line of list-encoded program text.
pub fn highlight_line(line: &str) -> String {
    // Earlier entries win when several match at the same position.
    let tokens: [(&Regex, Token); 5] = [
        (&*OPERATION_RE, Token::Operation),
        (&*STRING_RE, Token::Name),
        (&*NUMBER_RE, Token::Number),
        (&*NULL_RE, Token::Null),
        (&*BRACKET_RE, Token::Bracket),
    ];

    let mut highlighted = String::with_capacity(line.len() * 2);
    let mut current_pos = 0;
    while current_pos < line.len() {
        let matched = tokens.iter().find_map(|(regex, token)| {
            regex
                .find_at(line, current_pos)
                .filter(|mat| mat.start() == current_pos && mat.end() > mat.start())
                .map(|mat| (mat.end(), *token))
        });

        match matched {
            Some((end, token)) => {
                highlighted.push_str(&token.paint(&line[current_pos..end]));
                current_pos = end;
            }
            None => {
                let end = line[current_pos..]
                    .chars()
                    .next()
                    .map_or(line.len(), |c| current_pos + c.len_utf8());
                highlighted.push_str(&line[current_pos..end]);
                current_pos = end;
            }
        }
    }
    highlighted
}

#[derive(Helper, Completer, Hinter, Validator, Default)]
pub struct ReplHelper;

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Owned(highlight_line(line))
    }

    // Colours depend on the whole line, so any edit re-highlights it.
    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        !line.is_empty()
    }
}
