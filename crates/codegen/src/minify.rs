//! Query minification and the wire payload embedded at call sites.

use crate::quote;
use apollo_parser::{Lexer, TokenKind};

/// Strip insignificant characters from a GraphQL document.
///
/// Whitespace, commas and comments are dropped. A single space is kept
/// between two adjacent non-punctuator tokens (names, numbers, strings) and
/// before a `...` that follows one. Text that fails to lex is returned
/// trimmed but otherwise untouched.
#[must_use]
pub fn minify(query: &str) -> String {
    let mut minified = String::with_capacity(query.len());
    let mut last_was_word = false;

    for token in Lexer::new(query) {
        let Ok(token) = token else {
            return query.trim().to_string();
        };
        let kind = token.kind();
        let is_word = match kind {
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Comma | TokenKind::Eof => {
                continue
            }
            TokenKind::Name | TokenKind::StringValue | TokenKind::Int | TokenKind::Float => true,
            _ => false,
        };
        if last_was_word && (is_word || kind == TokenKind::Spread) {
            minified.push(' ');
        }
        minified.push_str(token.data());
        last_was_word = is_word;
    }

    minified
}

/// The JavaScript expression replacing a query literal: the minified query
/// encoded as a JSON string (the request body fragment), itself encoded as a
/// JavaScript string literal.
#[must_use]
pub fn wire_payload(query: &str) -> String {
    quote(&quote(&minify(query)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_whitespace_and_commas() {
        assert_eq!(
            minify("query {\n  allFilms {\n    films { title, director }\n  }\n}"),
            "query{allFilms{films{title director}}}"
        );
    }

    #[test]
    fn test_minify_comments_and_variables() {
        let query = "# load a ship\nquery Ship($id: ID!, $first: Int = 10) {\n  starship(id: $id) { name }\n}";
        assert_eq!(
            minify(query),
            "query Ship($id:ID!$first:Int=10){starship(id:$id){name}}"
        );
    }

    #[test]
    fn test_minify_spread_after_name() {
        assert_eq!(
            minify("{ search(text: \"a b\") { ... on Film { title } } }"),
            "{search(text:\"a b\"){...on Film{title}}}"
        );
        assert_eq!(
            minify("{ node(id: 1) { id ...F } }"),
            "{node(id:1){id ...F}}"
        );
    }

    #[test]
    fn test_minify_is_idempotent() {
        let once = minify("query { allFilms { films { title director } } }");
        assert_eq!(minify(&once), once);
    }

    #[test]
    fn test_wire_payload_double_encodes() {
        assert_eq!(
            wire_payload("{ film(id: \"1\") { title } }"),
            r#""\"{film(id:\\\"1\\\"){title}}\"""#
        );
    }
}
