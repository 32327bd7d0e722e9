//! SQL construction and light-weight SQL inspection.
//!
//! Builds the default primary-key ordered query, the composite-key cursor
//! predicate used for continuation, and the OFFSET form used for custom SQL.
//! Also extracts the target table and the explicit SELECT list from free-form
//! statements typed by the user.

use crate::api::models::{FieldValue, Row};
use crate::error::QueryError;

/// `SELECT * FROM <table> [ORDER BY pk1, pk2, ...]`
pub fn default_sql(table: &str, primary_keys: &[String]) -> String {
    let mut sql = format!("SELECT * FROM {}", table);
    if !primary_keys.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&primary_keys.join(", "));
    }
    sql
}

/// Render a value inline as a SQL literal.
///
/// Strings are single-quoted with embedded quotes doubled; numbers are bare;
/// anything else is quoted in its textual form.
pub fn format_literal(value: &FieldValue) -> String {
    match value {
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Primary-key values of `row`, in key order. `None` if any key is missing.
pub fn primary_key_values(row: &Row, primary_keys: &[String]) -> Option<Vec<FieldValue>> {
    primary_keys
        .iter()
        .map(|k| row.get(k).cloned())
        .collect::<Option<Vec<_>>>()
}

/// Cursor predicate selecting rows strictly after `last` in composite-key order:
///
/// `k1 > v1 OR (k1 = v1 AND k2 > v2) OR ... OR (k1 = v1 AND ... AND kn > vn)`
///
/// Returns `None` when there are no keys or the value count does not match.
pub fn cursor_where(primary_keys: &[String], last: &[FieldValue]) -> Option<String> {
    if primary_keys.is_empty() || primary_keys.len() != last.len() {
        return None;
    }

    let terms: Vec<String> = (0..primary_keys.len())
        .map(|i| {
            let mut parts: Vec<String> = (0..i)
                .map(|j| format!("{} = {}", primary_keys[j], format_literal(&last[j])))
                .collect();
            parts.push(format!("{} > {}", primary_keys[i], format_literal(&last[i])));
            if parts.len() == 1 {
                parts.remove(0)
            } else {
                format!("({})", parts.join(" AND "))
            }
        })
        .collect();

    Some(terms.join(" OR "))
}

/// `SELECT * FROM <table>[ WHERE ...][ ORDER BY ...] LIMIT <n>`
pub fn fetch_query(
    table: &str,
    primary_keys: &[String],
    where_clause: Option<&str>,
    limit: usize,
) -> String {
    let mut sql = format!("SELECT * FROM {}", table);
    if let Some(predicate) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(predicate);
    }
    if !primary_keys.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&primary_keys.join(", "));
    }
    sql.push_str(&format!(" LIMIT {}", limit));
    sql
}

/// Append `LIMIT n OFFSET m` to a user statement (trailing `;` removed).
///
/// The first page (`offset == 0`) carries no OFFSET clause.
pub fn offset_query(sql: &str, limit: usize, offset: usize) -> String {
    let limited = format!("{} LIMIT {}", strip_terminator(sql), limit);
    if offset == 0 {
        limited
    } else {
        format!("{} OFFSET {}", limited, offset)
    }
}

/// Trimmed statement without a trailing semicolon.
pub fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// Whether the statement already limits its own result size.
pub fn has_limit_clause(sql: &str) -> bool {
    let upper = strip_string_literals(sql).to_ascii_uppercase();
    find_word(&upper, "LIMIT").is_some() || find_word(&upper, "OFFSET").is_some()
}

/// Case- and whitespace-insensitive comparison of two statements.
pub fn same_statement(a: &str, b: &str) -> bool {
    normalize(a).eq_ignore_ascii_case(&normalize(b))
}

fn normalize(sql: &str) -> String {
    strip_terminator(sql)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Table named after the first whole-word `FROM`.
///
/// Accepts `name` or `parent.child` identifiers; returns `None` otherwise.
pub fn extract_table_name(sql: &str) -> Option<String> {
    let upper = sql.to_ascii_uppercase();
    let bytes = sql.as_bytes();
    let mut search_from = 0;

    while let Some(pos) = find_word(&upper[search_from..], "FROM").map(|p| p + search_from) {
        let mut i = pos + 4;
        let ws_start = i;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i > ws_start {
            if let Some(name) = read_table_identifier(&sql[i..]) {
                return Some(name);
            }
        }
        search_from = pos + 4;
    }
    None
}

/// Table name for execution, or why there is none.
pub fn target_table(sql: &str) -> Result<String, QueryError> {
    if sql.trim().is_empty() {
        return Err(QueryError::EmptyStatement);
    }
    extract_table_name(sql).ok_or(QueryError::NoTableName)
}

/// Explicit SELECT list column names.
///
/// Empty for `SELECT *` or when any item is not a plain (optionally
/// qualified or aliased) identifier.
pub fn extract_select_columns(sql: &str) -> Vec<String> {
    let upper = sql.to_ascii_uppercase();
    let Some(select_pos) = find_word(&upper, "SELECT") else {
        return Vec::new();
    };
    let list_start = select_pos + "SELECT".len();
    let Some(from_rel) = find_word(&upper[list_start..], "FROM") else {
        return Vec::new();
    };
    let list = sql[list_start..list_start + from_rel].trim();
    if list.is_empty() || list == "*" {
        return Vec::new();
    }

    let mut columns = Vec::new();
    for item in list.split(',') {
        match select_item_name(item.trim()) {
            Some(name) => columns.push(name),
            None => return Vec::new(),
        }
    }
    columns
}

fn select_item_name(item: &str) -> Option<String> {
    let tokens: Vec<&str> = item.split_whitespace().collect();
    let name = match tokens.as_slice() {
        [expr] => *expr,
        [_, kw, alias] if kw.eq_ignore_ascii_case("AS") => *alias,
        _ => return None,
    };
    if !is_identifier_path(name) {
        return None;
    }
    name.rsplit('.').next().map(str::to_string)
}

fn is_identifier_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?` at the start of `text`.
fn read_table_identifier(text: &str) -> Option<String> {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(text.len());
    let candidate = text[..end].trim_end_matches('.');
    let segments: Vec<&str> = candidate.split('.').collect();
    if segments.is_empty() || !is_identifier(segments[0]) {
        return None;
    }
    let take = if segments.len() >= 2 && is_identifier(segments[1]) {
        2
    } else {
        1
    };
    Some(segments[..take].join("."))
}

/// Byte position of `word` in `upper` as a whole word.
fn find_word(upper: &str, word: &str) -> Option<usize> {
    let bytes = upper.as_bytes();
    let mut start = 0;
    while let Some(rel) = upper[start..].find(word) {
        let pos = start + rel;
        let end = pos + word.len();
        let before_ok = pos == 0 || !is_word_byte(bytes[pos - 1]);
        let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + 1;
    }
    None
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Replace the contents of single-quoted literals with spaces.
fn strip_string_literals(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut in_string = false;
    for ch in sql.chars() {
        if ch == '\'' {
            in_string = !in_string;
            out.push(ch);
        } else if in_string {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_sql() {
        assert_eq!(default_sql("users", &[]), "SELECT * FROM users");
        assert_eq!(
            default_sql("users", &keys(&["id"])),
            "SELECT * FROM users ORDER BY id"
        );
        assert_eq!(
            default_sql("users.orders", &keys(&["a", "b"])),
            "SELECT * FROM users.orders ORDER BY a, b"
        );
    }

    #[test]
    fn test_format_literal() {
        assert_eq!(format_literal(&FieldValue::Integer(5)), "5");
        assert_eq!(format_literal(&FieldValue::Float(2.5)), "2.5");
        assert_eq!(
            format_literal(&FieldValue::String("O'Brien".to_string())),
            "'O''Brien'"
        );
        assert_eq!(format_literal(&FieldValue::Boolean(true)), "'true'");
    }

    #[test]
    fn test_cursor_where_single_key() {
        let clause = cursor_where(&keys(&["id"]), &[FieldValue::Integer(100)]).unwrap();
        assert_eq!(clause, "id > 100");
    }

    #[test]
    fn test_cursor_where_composite_key() {
        let clause = cursor_where(
            &keys(&["a", "b", "c"]),
            &[
                FieldValue::String("x".to_string()),
                FieldValue::Integer(2),
                FieldValue::Integer(3),
            ],
        )
        .unwrap();
        assert_eq!(
            clause,
            "a > 'x' OR (a = 'x' AND b > 2) OR (a = 'x' AND b = 2 AND c > 3)"
        );
    }

    #[test]
    fn test_cursor_where_mismatch() {
        assert!(cursor_where(&[], &[]).is_none());
        assert!(cursor_where(&keys(&["a", "b"]), &[FieldValue::Integer(1)]).is_none());
    }

    #[test]
    fn test_fetch_query() {
        assert_eq!(
            fetch_query("users", &keys(&["id"]), Some("id > 7"), 100),
            "SELECT * FROM users WHERE id > 7 ORDER BY id LIMIT 100"
        );
        assert_eq!(
            fetch_query("users", &[], None, 50),
            "SELECT * FROM users LIMIT 50"
        );
    }

    #[test]
    fn test_offset_query_strips_semicolon() {
        assert_eq!(
            offset_query("SELECT name FROM products;  ", 100, 200),
            "SELECT name FROM products LIMIT 100 OFFSET 200"
        );
        assert_eq!(
            offset_query("SELECT name FROM products", 100, 0),
            "SELECT name FROM products LIMIT 100"
        );
    }

    #[test]
    fn test_has_limit_clause() {
        assert!(has_limit_clause("select * from t limit 5"));
        assert!(has_limit_clause("SELECT * FROM t OFFSET 3"));
        assert!(!has_limit_clause("SELECT * FROM t WHERE note = 'no limit'"));
        assert!(!has_limit_clause("SELECT limits FROM t"));
    }

    #[test]
    fn test_extract_table_name() {
        assert_eq!(
            extract_table_name("SELECT * FROM users").as_deref(),
            Some("users")
        );
        assert_eq!(
            extract_table_name("select id from Users.Orders where x = 1").as_deref(),
            Some("Users.Orders")
        );
        assert_eq!(
            extract_table_name("SELECT fromage FROM\n  cheese").as_deref(),
            Some("cheese")
        );
        assert_eq!(extract_table_name("SELECT 1"), None);
        assert_eq!(extract_table_name("SELECT * FROM 123"), None);
    }

    #[test]
    fn test_target_table_errors() {
        assert_eq!(target_table("   "), Err(QueryError::EmptyStatement));
        assert_eq!(target_table("SELECT 1"), Err(QueryError::NoTableName));
        assert_eq!(target_table("SELECT * FROM t"), Ok("t".to_string()));
    }

    #[test]
    fn test_extract_select_columns() {
        assert_eq!(
            extract_select_columns("SELECT name, id FROM products"),
            vec!["name", "id"]
        );
        assert_eq!(
            extract_select_columns("select p.name, p.id as pid from products p"),
            vec!["name", "pid"]
        );
        assert!(extract_select_columns("SELECT * FROM products").is_empty());
        assert!(extract_select_columns("SELECT count(*) FROM products").is_empty());
        assert!(extract_select_columns("SELECT name").is_empty());
    }

    #[test]
    fn test_same_statement() {
        assert!(same_statement(
            "select *  from users\n order by id;",
            "SELECT * FROM users ORDER BY id"
        ));
        assert!(!same_statement(
            "SELECT name, id FROM products",
            "SELECT * FROM products ORDER BY id"
        ));
    }

    #[test]
    fn test_primary_key_values() {
        let mut row = Row::new();
        row.insert("id".to_string(), FieldValue::Integer(9));
        row.insert("name".to_string(), FieldValue::String("n".to_string()));
        assert_eq!(
            primary_key_values(&row, &keys(&["id"])),
            Some(vec![FieldValue::Integer(9)])
        );
        assert_eq!(primary_key_values(&row, &keys(&["id", "missing"])), None);
    }

    /// Walking a sorted composite-key data set with the cursor predicate
    /// visits every row exactly once.
    #[test]
    fn test_cursor_pagination_visits_each_row_once() {
        let mut data: Vec<(i64, i64)> = Vec::new();
        for a in 0..7 {
            for b in 0..5 {
                data.push((a, b));
            }
        }
        let pks = keys(&["a", "b"]);
        let page = 4;
        let mut seen = Vec::new();
        let mut last: Option<(i64, i64)> = None;

        loop {
            // Evaluate the predicate semantics directly: strict lexicographic ">".
            let batch: Vec<(i64, i64)> = data
                .iter()
                .filter(|row| last.is_none_or(|l| **row > l))
                .take(page)
                .cloned()
                .collect();
            if let Some(l) = last {
                let clause = cursor_where(
                    &pks,
                    &[FieldValue::Integer(l.0), FieldValue::Integer(l.1)],
                )
                .unwrap();
                assert_eq!(
                    clause,
                    format!("a > {} OR (a = {} AND b > {})", l.0, l.0, l.1)
                );
            }
            seen.extend(batch.iter().cloned());
            if batch.len() < page {
                break;
            }
            last = batch.last().cloned();
        }

        assert_eq!(seen, data);
    }
}
