//! A deliberately tiny subset of markdown: `**bold**` and `*italic*` runs,
//! nothing else. Unmatched delimiters are kept as literal text.

use super::measure::Weight;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Emphasis {
    #[default]
    None,
    Bold,
}

impl Emphasis {
    pub fn weight(self) -> Weight {
        match self {
            Emphasis::None => Weight::Regular,
            Emphasis::Bold => Weight::Bold,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Space,
}

/// A maximal run of non-whitespace (a word) or whitespace (a space) text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub emphasis: Emphasis,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Split `input` into word and space tokens, resolving emphasis delimiters.
///
/// Words inside a `**…**` run are bold. Spaces never carry emphasis. Italic
/// runs are unwrapped but rendered upright since no italic face exists.
pub fn tokenize(input: &str) -> Vec<Token> {
    scan(input).0
}

/// Tokenise text that has no markup at all, giving every word `emphasis`
pub fn plain_tokens(input: &str, emphasis: Emphasis) -> Vec<Token> {
    let mut tokens = Vec::new();
    push_runs(input, emphasis, &mut tokens);
    tokens
}

/// Whether any emphasis delimiter in `input` would be consumed by [tokenize]
pub fn contains_markup(input: &str) -> bool {
    scan(input).1
}

/// Concatenated token text, i.e. the input with consumed delimiters removed
pub fn strip_markup(input: &str) -> String {
    tokenize(input).into_iter().map(|t| t.text).collect()
}

fn scan(input: &str) -> (Vec<Token>, bool) {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut consumed = false;
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                let inner = &after[..end];
                if !inner.trim().is_empty() {
                    push_runs(&literal, Emphasis::None, &mut tokens);
                    literal.clear();
                    push_runs(inner, Emphasis::Bold, &mut tokens);
                    consumed = true;
                    rest = &after[end + 2..];
                    continue;
                }
            }
            literal.push_str("**");
            rest = after;
            continue;
        }

        if let Some(after) = rest.strip_prefix('*') {
            if let Some(end) = after.find('*') {
                let inner = &after[..end];
                if flanked(inner) {
                    push_runs(&literal, Emphasis::None, &mut tokens);
                    literal.clear();
                    push_runs(inner, Emphasis::None, &mut tokens);
                    consumed = true;
                    rest = &after[end + 1..];
                    continue;
                }
            }
            literal.push('*');
            rest = after;
            continue;
        }

        literal.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    push_runs(&literal, Emphasis::None, &mut tokens);

    (coalesce(tokens), consumed)
}

// an italic run must hug its delimiters, so "5 * 3 * 2" stays literal
fn flanked(inner: &str) -> bool {
    match (inner.chars().next(), inner.chars().last()) {
        (Some(first), Some(last)) => !first.is_whitespace() && !last.is_whitespace(),
        _ => false,
    }
}

fn push_runs(text: &str, emphasis: Emphasis, tokens: &mut Vec<Token>) {
    let mut run = String::new();
    let mut run_is_space = false;
    for ch in text.chars() {
        let is_space = ch.is_whitespace();
        if !run.is_empty() && is_space != run_is_space {
            tokens.push(make_token(std::mem::take(&mut run), run_is_space, emphasis));
        }
        run_is_space = is_space;
        run.push(ch);
    }
    if !run.is_empty() {
        tokens.push(make_token(run, run_is_space, emphasis));
    }
}

fn make_token(text: String, is_space: bool, emphasis: Emphasis) -> Token {
    if is_space {
        Token {
            text,
            emphasis: Emphasis::None,
            kind: TokenKind::Space,
        }
    } else {
        Token {
            text,
            emphasis,
            kind: TokenKind::Word,
        }
    }
}

// spans pushed separately can leave adjacent space tokens, or adjacent words of
// the same emphasis (a literal "**" next to a word)
fn coalesce(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match out.last_mut() {
            Some(last) if last.kind == token.kind && last.emphasis == token.emphasis => {
                last.text.push_str(&token.text);
            }
            _ => out.push(token),
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<(&str, Emphasis)> {
        tokens
            .iter()
            .filter(|t| t.is_word())
            .map(|t| (t.text.as_str(), t.emphasis))
            .collect()
    }

    #[test]
    fn bold_runs_become_bold_words() {
        let tokens = tokenize("Built **fast parsers** in Rust");
        assert_eq!(
            words(&tokens),
            vec![
                ("Built", Emphasis::None),
                ("fast", Emphasis::Bold),
                ("parsers", Emphasis::Bold),
                ("in", Emphasis::None),
                ("Rust", Emphasis::None),
            ]
        );
        assert!(tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Space)
            .all(|t| t.emphasis == Emphasis::None));
    }

    #[test]
    fn token_text_reproduces_input_without_delimiters() {
        let input = "Led **5** teams across *three* regions";
        assert_eq!(strip_markup(input), "Led 5 teams across three regions");
    }

    #[test]
    fn unmatched_delimiters_are_literal() {
        assert_eq!(strip_markup("**unclosed bold"), "**unclosed bold");
        assert_eq!(strip_markup("5 * 3 * 2"), "5 * 3 * 2");
        assert_eq!(strip_markup("****"), "****");
        assert!(!contains_markup("**unclosed bold"));
        assert!(!contains_markup("- plain bullet"));
    }

    #[test]
    fn emphasis_glued_to_punctuation_stays_one_word_run() {
        let tokens = tokenize("**Python**, Go");
        assert_eq!(tokens[0].text, "Python");
        assert_eq!(tokens[0].emphasis, Emphasis::Bold);
        assert_eq!(tokens[1].text, ",");
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[2].kind, TokenKind::Space);
    }

    #[test]
    fn markup_detection() {
        assert!(contains_markup("a **b** c"));
        assert!(contains_markup("an *italic* word"));
        assert!(!contains_markup("no markup here"));
    }
}
