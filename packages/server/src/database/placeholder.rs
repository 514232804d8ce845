use sea_orm::Value;

use super::error::StoreError;

/// Bind-parameter syntax understood by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` markers bound in order (SQLite).
    Question,
    /// `$1`, `$2`, ... markers bound by index (PostgreSQL).
    Numbered,
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Question,
    Numbered(usize),
}

/// Split `sql` into literal text and placeholder markers.
///
/// Markers inside quoted strings, quoted identifiers and comments are left
/// untouched. A `$` that is not followed by a digit (dollar-quoted bodies,
/// identifiers) is treated as text.
fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // Doubled quote is an escaped quote, keep scanning.
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b'?' => {
                tokens.push(Token::Text(&sql[start..i]));
                tokens.push(Token::Question);
                i += 1;
                start = i;
            }
            b'$' if bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                let digits_start = i + 1;
                let mut end = digits_start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                // Digits are ASCII, so the slice boundaries are valid.
                let index = sql[digits_start..end].parse().unwrap_or(0);
                tokens.push(Token::Text(&sql[start..i]));
                tokens.push(Token::Numbered(index));
                i = end;
                start = i;
            }
            _ => i += 1,
        }
    }

    let tail = &sql[start.min(sql.len())..];
    if !tail.is_empty() {
        tokens.push(Token::Text(tail));
    }
    tokens
}

/// Rewrite `sql` so its placeholders use `target` syntax, returning the
/// rewritten query and the values in the order the backend will bind them.
///
/// Callers may write either style as long as a single query sticks to one.
/// Numbered markers may repeat or appear out of order; when targeting `?`
/// syntax the values are duplicated and reordered to match.
pub fn rewrite(
    sql: &str,
    values: Vec<Value>,
    target: PlaceholderStyle,
) -> Result<(String, Vec<Value>), StoreError> {
    let tokens = tokenize(sql);

    let questions = tokens.iter().filter(|t| **t == Token::Question).count();
    let numbered: Vec<usize> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Numbered(n) => Some(*n),
            _ => None,
        })
        .collect();

    if questions > 0 && !numbered.is_empty() {
        return Err(StoreError::MixedPlaceholders {
            sql: sql.to_owned(),
        });
    }

    if numbered.is_empty() {
        if questions != values.len() {
            return Err(StoreError::PlaceholderMismatch {
                expected: questions,
                supplied: values.len(),
            });
        }
        return Ok(match target {
            PlaceholderStyle::Question => (sql.to_owned(), values),
            PlaceholderStyle::Numbered => (render_numbered(&tokens), values),
        });
    }

    // Every supplied value must be referenced and no marker may point past the end.
    let highest = numbered.iter().copied().max().unwrap_or(0);
    let all_referenced = (1..=values.len()).all(|n| numbered.contains(&n));
    if numbered.contains(&0) || highest != values.len() || !all_referenced {
        return Err(StoreError::PlaceholderMismatch {
            expected: highest,
            supplied: values.len(),
        });
    }

    Ok(match target {
        PlaceholderStyle::Numbered => (sql.to_owned(), values),
        PlaceholderStyle::Question => {
            let mut out = String::with_capacity(sql.len());
            for token in &tokens {
                match token {
                    Token::Text(text) => out.push_str(text),
                    Token::Question | Token::Numbered(_) => out.push('?'),
                }
            }
            let ordered = numbered.iter().map(|n| values[n - 1].clone()).collect();
            (out, ordered)
        }
    })
}

fn render_numbered(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut next = 0;
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Question | Token::Numbered(_) => {
                next += 1;
                out.push('$');
                out.push_str(&next.to_string());
            }
        }
    }
    out
}
