//! Quote-aware word splitting.
//!
//! Words are separated by spaces and by `=`, so `name=a`, `name = a` and
//! `name =a` all produce the same two tokens. A word that starts with `"` or
//! `'` runs until the same quote character is followed by a space or the end
//! of the input; everything in between is kept verbatim. An unterminated
//! quote swallows the rest of the input.

use std::iter::Peekable;
use std::str::Chars;

/// A single word of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Literal text, without surrounding quotes.
    pub text: String,
    /// Quote character that delimited the word, if any.
    pub quote: Option<char>,
}

impl Token {
    fn new(text: String, quote: Option<char>) -> Self {
        Self { text, quote }
    }

    /// Quoted tokens are never matched against command or option names.
    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }

    /// The word as it appeared in the input, quotes included.
    pub fn raw(&self) -> String {
        match self.quote {
            Some(q) => format!("{q}{}{q}", self.text),
            None => self.text.clone(),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c == ' ' || c == '='
}

/// Lazy iterator over the [`Token`]s of a string.
///
/// # Examples
///
/// ```
/// use command_grammar_resolver::Tokenizer;
///
/// let words: Vec<String> = Tokenizer::new(r#"copy from="my file.txt" to=out"#)
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(words, vec!["copy", "from", "my file.txt", "to", "out"]);
/// ```
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn quoted(&mut self, quote: char) -> Token {
        let mut text = String::new();
        while let Some(c) = self.chars.next() {
            if c == quote {
                match self.chars.peek() {
                    None => break,
                    Some(' ') => {
                        self.chars.next();
                        break;
                    }
                    Some(_) => {}
                }
            }
            text.push(c);
        }
        Token::new(text, Some(quote))
    }

    fn unquoted(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if is_delimiter(c) {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        text.trim().to_string()
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            while self.chars.next_if(|&c| is_delimiter(c)).is_some() {}

            match *self.chars.peek()? {
                q @ ('"' | '\'') => {
                    self.chars.next();
                    return Some(self.quoted(q));
                }
                _ => {
                    let text = self.unquoted();
                    if !text.is_empty() {
                        return Some(Token::new(text, None));
                    }
                }
            }
        }
    }
}

/// Splits `text` into tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_equals_is_a_separator() {
        assert_eq!(texts("a=b"), vec!["a", "b"]);
        assert_eq!(texts("a = b"), vec!["a", "b"]);
        assert_eq!(texts("a =b"), vec!["a", "b"]);
        assert_eq!(texts("a==  b"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize(" = = ").is_empty());
    }

    #[test]
    fn test_quoted_region_keeps_spaces_and_equals() {
        let tokens = tokenize(r#"list "my file = x.txt" next"#);

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "my file = x.txt");
        assert_eq!(tokens[1].quote, Some('"'));
        assert!(!tokens[0].is_quoted());
        assert_eq!(tokens[2].text, "next");
    }

    #[test]
    fn test_quoted_content_is_verbatim() {
        let tokens = tokenize("' padded '");
        assert_eq!(tokens[0].text, " padded ");
    }

    #[test]
    fn test_inner_quotes_are_literal() {
        assert_eq!(texts(r#""it's" 'say "hi"'"#), vec!["it's", r#"say "hi""#]);
        // closing quote must be followed by a space or end of input
        assert_eq!(texts(r#""a"b c" d"#), vec![r#"a"b c"#, "d"]);
    }

    #[test]
    fn test_quote_inside_word_does_not_open_region() {
        assert_eq!(texts(r#"ab"c d"#), vec![r#"ab"c"#, "d"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let tokens = tokenize(r#"list "no end here"#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "no end here");
        assert!(tokens[1].is_quoted());
    }

    #[test]
    fn test_quoted_empty_token_is_kept() {
        let tokens = tokenize(r#"name "" x"#);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "");
        assert!(tokens[1].is_quoted());
    }

    #[test]
    fn test_raw_forms() {
        let tokens = tokenize(r#"List 'a b'"#);
        assert_eq!(tokens[0].text, "List");
        assert_eq!(tokens[0].raw(), "List");
        assert_eq!(tokens[1].raw(), "'a b'");
    }

    #[test]
    fn test_tokenizer_is_restartable() {
        let input = "one two";
        assert_eq!(texts(input), texts(input));
    }
}
