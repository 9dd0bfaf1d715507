//! Splitting of a raw input line into whitespace-delimited tokens.
//!
//! There is no quoting or escaping: a token is any maximal run of
//! non-delimiter characters. Tokens borrow from the line they were cut from,
//! so a [`TokenSequence`] can never outlive its input.

/// Characters that separate tokens: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Ordered tokens of one input line.
///
/// The first token is the command name, the rest are its arguments. Running
/// past the last token yields `None`, which plays the role of the
/// end-of-arguments marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> TokenSequence<'a> {
    /// Wraps already split tokens.
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self { tokens }
    }

    /// Command name, or `None` for a blank line.
    pub fn command(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'a str] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().copied()
    }
}

/// Splits `line` on [`DELIMITERS`], collapsing runs of delimiters.
///
/// A line made only of delimiters produces an empty sequence.
pub fn split_into_tokens(line: &str) -> TokenSequence<'_> {
    TokenSequence::new(
        line.split(DELIMITERS)
            .filter(|token| !token.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_has_no_command() {
        let tokens = split_into_tokens("");
        assert!(tokens.is_empty());
        assert_eq!(tokens.command(), None);
        assert_eq!(tokens.get(0), None);
    }

    #[test]
    fn test_only_delimiters_has_no_command() {
        for line in [" ", "\t\t", " \r\n", "\x07 \t\n", "    \n"] {
            let tokens = split_into_tokens(line);
            assert_eq!(tokens.command(), None, "line {:?}", line);
            assert!(tokens.args().is_empty());
        }
    }

    #[test]
    fn test_irregular_whitespace_is_collapsed() {
        let tokens = split_into_tokens("cd  /tmp");
        assert_eq!(tokens.as_slice(), &["cd", "/tmp"]);
    }

    #[test]
    fn test_all_delimiters_split() {
        let tokens = split_into_tokens("\tls\x07-la\r\n  /var \n");
        assert_eq!(tokens.as_slice(), &["ls", "-la", "/var"]);
        assert_eq!(tokens.command(), Some("ls"));
        assert_eq!(tokens.args(), &["-la", "/var"]);
    }

    #[test]
    fn test_order_and_operators_preserved() {
        let tokens = split_into_tokens("sort < in.txt > out.txt -r");
        assert_eq!(
            tokens.iter().collect::<Vec<_>>(),
            vec!["sort", "<", "in.txt", ">", "out.txt", "-r"]
        );
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_operators_are_not_split_from_words() {
        // Only whitespace separates tokens.
        let tokens = split_into_tokens("cat <in >out");
        assert_eq!(tokens.as_slice(), &["cat", "<in", ">out"]);
    }
}
