//! Unit tests for the expression lexer

use cobalt_fhirpath::lexer::Lexer;
use cobalt_fhirpath::token::{Token, TokenType};

/// Helper function to tokenize input and collect all tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input.to_string());
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        match &token.token_type {
            TokenType::Eof | TokenType::Error => {
                tokens.push(token);
                break;
            }
            _ => tokens.push(token),
        }
    }
    tokens
}

#[test]
fn test_literal_integers() {
    let tokens = tokenize("42");
    assert_eq!(tokens.len(), 2); // NumberLiteral + EOF
    assert_eq!(tokens[0].token_type, TokenType::NumberLiteral);
    assert_eq!(tokens[0].value, "42");
}

#[test]
fn test_literal_decimals() {
    let tokens = tokenize("3.14");
    assert_eq!(tokens[0].token_type, TokenType::NumberLiteral);
    assert_eq!(tokens[0].value, "3.14");
}

#[test]
fn test_literal_strings() {
    let tokens = tokenize("'hello'");
    assert_eq!(tokens[0].token_type, TokenType::StringLiteral);
    assert_eq!(tokens[0].value, "hello");

    let tokens = tokenize("''");
    assert_eq!(tokens[0].token_type, TokenType::StringLiteral);
    assert_eq!(tokens[0].value, "");

    // Escaped quote
    let tokens = tokenize("'don\\'t'");
    assert_eq!(tokens[0].token_type, TokenType::StringLiteral);
    assert_eq!(tokens[0].value, "don't");
}

#[test]
fn test_unterminated_string_is_error() {
    let tokens = tokenize("'oops");
    assert_eq!(tokens[0].token_type, TokenType::Error);
}

#[test]
fn test_literal_dates() {
    let tokens = tokenize("@2024-03-01");
    assert_eq!(tokens[0].token_type, TokenType::DateLiteral);
    assert_eq!(tokens[0].value, "2024-03-01");
}

#[test]
fn test_keywords_and_identifiers() {
    let tokens = tokenize("status and value or implied");
    assert_eq!(tokens[0].token_type, TokenType::Identifier);
    assert_eq!(tokens[1].token_type, TokenType::And);
    assert_eq!(tokens[2].token_type, TokenType::Identifier);
    assert_eq!(tokens[3].token_type, TokenType::Or);
    // Prefix of a keyword is still an identifier
    assert_eq!(tokens[4].token_type, TokenType::Identifier);
    assert_eq!(tokens[4].value, "implied");
}

#[test]
fn test_booleans_and_this() {
    let tokens = tokenize("true false $this");
    assert_eq!(tokens[0].token_type, TokenType::True);
    assert_eq!(tokens[1].token_type, TokenType::False);
    assert_eq!(tokens[2].token_type, TokenType::This);
}

#[test]
fn test_unknown_context_reference_is_error() {
    let tokens = tokenize("$total");
    assert_eq!(tokens[0].token_type, TokenType::Error);
}

#[test]
fn test_comparison_operators() {
    let tokens = tokenize("a <= b < c >= d > e = f != g");
    let types: Vec<&TokenType> = tokens
        .iter()
        .map(|t| &t.token_type)
        .filter(|t| !matches!(t, TokenType::Identifier | TokenType::Eof))
        .collect();
    assert_eq!(
        types,
        vec![
            &TokenType::LessThanOrEqual,
            &TokenType::LessThan,
            &TokenType::GreaterThanOrEqual,
            &TokenType::GreaterThan,
            &TokenType::Equal,
            &TokenType::NotEqual,
        ]
    );
}

#[test]
fn test_navigation_tokens() {
    let tokens = tokenize("name.given[0].exists()");
    let types: Vec<&TokenType> = tokens.iter().map(|t| &t.token_type).collect();
    assert_eq!(
        types,
        vec![
            &TokenType::Identifier,
            &TokenType::Dot,
            &TokenType::Identifier,
            &TokenType::OpenBracket,
            &TokenType::NumberLiteral,
            &TokenType::CloseBracket,
            &TokenType::Dot,
            &TokenType::Identifier,
            &TokenType::OpenParen,
            &TokenType::CloseParen,
            &TokenType::Eof,
        ]
    );
}

#[test]
fn test_empty_collection_braces() {
    let tokens = tokenize("{}");
    assert_eq!(tokens[0].token_type, TokenType::OpenBrace);
    assert_eq!(tokens[1].token_type, TokenType::CloseBrace);
}

#[test]
fn test_bang_without_equals_is_error() {
    let tokens = tokenize("a ! b");
    assert_eq!(tokens[1].token_type, TokenType::Error);
}

#[test]
fn test_whitespace_is_insignificant() {
    let compact = tokenize("a=b");
    let spaced = tokenize("  a  =  b  ");
    assert_eq!(compact.len(), spaced.len());
    for (c, s) in compact.iter().zip(spaced.iter()) {
        assert_eq!(c.token_type, s.token_type);
        assert_eq!(c.value, s.value);
    }
}
