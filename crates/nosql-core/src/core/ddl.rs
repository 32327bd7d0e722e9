//! CREATE TABLE parsing.
//!
//! This is deliberately not a SQL parser. It pulls out the three things the
//! UI needs from a DDL string: the primary-key tuple, the column list with
//! types, and the column display order. Parentheses inside column types are
//! tracked with a depth counter so `DECIMAL(10,2)` or `RECORD(a INTEGER, b
//! STRING)` stay in one piece.

/// A column as declared in the DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
    pub is_primary_key: bool,
}

/// Everything extracted from one CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSchema {
    pub columns: Vec<ColumnInfo>,
    pub primary_keys: Vec<String>,
}

impl TableSchema {
    pub fn parse(ddl: &str) -> Self {
        let primary_keys = parse_primary_keys(ddl);
        let columns = parse_columns(ddl, &primary_keys);
        Self {
            columns,
            primary_keys,
        }
    }

    /// Column names in declaration order.
    pub fn column_order(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Declared type of `column`, matched case-insensitively.
    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(column))
            .map(|c| c.type_name.as_str())
    }
}

/// Primary-key column names, in key order. `SHARD(...)` wrappers are removed.
///
/// Returns an empty list when the DDL carries no primary-key clause.
pub fn parse_primary_keys(ddl: &str) -> Vec<String> {
    let upper = ddl.to_ascii_uppercase();
    let Some(pk_pos) = find_keyword(&upper, "PRIMARY KEY", 0) else {
        return Vec::new();
    };
    let Some(open) = ddl[pk_pos..].find('(').map(|i| pk_pos + i) else {
        return Vec::new();
    };
    let Some(close) = matching_paren(ddl, open) else {
        return Vec::new();
    };

    let inner = &ddl[open + 1..close];
    strip_shard(inner)
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Columns declared in the table body. `primary_keys` marks key columns.
pub fn parse_columns(ddl: &str, primary_keys: &[String]) -> Vec<ColumnInfo> {
    let Some(open) = ddl.find('(') else {
        return Vec::new();
    };
    let close = matching_paren(ddl, open).unwrap_or(ddl.len());
    let body = &ddl[open + 1..close];

    split_top_level(body)
        .into_iter()
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() || part.to_ascii_uppercase().starts_with("PRIMARY KEY") {
                return None;
            }
            let (name, rest) = split_first_token(part);
            if name.is_empty() {
                return None;
            }
            let type_name = leading_type(rest);
            let is_primary_key = primary_keys.iter().any(|k| k.eq_ignore_ascii_case(name));
            Some(ColumnInfo {
                name: name.to_string(),
                type_name,
                is_primary_key,
            })
        })
        .collect()
}

/// Primary-key columns a child table inherits from its ancestors.
///
/// `ancestor_ddls` is ordered outermost first; columns the child declares
/// itself are skipped.
pub fn inherited_key_columns(ancestor_ddls: &[(String, String)], own: &TableSchema) -> Vec<ColumnInfo> {
    let mut inherited: Vec<ColumnInfo> = Vec::new();
    for (_, ddl) in ancestor_ddls {
        let ancestor = TableSchema::parse(ddl);
        for key in &ancestor.primary_keys {
            let declared = own.column_type(key).is_some()
                || inherited.iter().any(|c| c.name.eq_ignore_ascii_case(key));
            if declared {
                continue;
            }
            inherited.push(ColumnInfo {
                name: key.clone(),
                type_name: ancestor.column_type(key).unwrap_or_default().to_string(),
                is_primary_key: true,
            });
        }
    }
    inherited
}

/// Position of `keyword` in the (already upper-cased) text, as a whole word.
fn find_keyword(upper: &str, keyword: &str, from: usize) -> Option<usize> {
    let bytes = upper.as_bytes();
    let mut start = from;
    while let Some(rel) = upper[start..].find(keyword) {
        let pos = start + rel;
        let end = pos + keyword.len();
        let before_ok = pos == 0 || !is_ident_byte(bytes[pos - 1]);
        let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + 1;
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Index of the `)` that closes the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove a `SHARD(` wrapper and its closing parenthesis.
fn strip_shard(inner: &str) -> String {
    let upper = inner.to_ascii_uppercase();
    let Some(pos) = find_keyword(&upper, "SHARD", 0) else {
        return inner.to_string();
    };
    let Some(open) = inner[pos..].find('(').map(|i| pos + i) else {
        return inner.to_string();
    };
    let close = matching_paren(inner, open);

    let mut out = String::with_capacity(inner.len());
    out.push_str(&inner[..pos]);
    match close {
        Some(close) => {
            out.push_str(&inner[open + 1..close]);
            out.push_str(&inner[close + 1..]);
        }
        None => out.push_str(&inner[open + 1..]),
    }
    out
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn split_first_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    }
}

/// The type token at the start of `rest`, extended until its parentheses balance.
fn leading_type(rest: &str) -> String {
    let mut depth = 0usize;
    let mut end = rest.len();
    for (i, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    rest[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_DDL: &str =
        "CREATE TABLE users (id INTEGER, name STRING, email STRING, PRIMARY KEY(id))";

    #[test]
    fn test_primary_key_simple() {
        assert_eq!(parse_primary_keys(USERS_DDL), vec!["id"]);
    }

    #[test]
    fn test_primary_key_with_shard() {
        let ddl = "CREATE TABLE t (a STRING, b LONG, c STRING, primary key(shard(a), b))";
        assert_eq!(parse_primary_keys(ddl), vec!["a", "b"]);
    }

    #[test]
    fn test_primary_key_shard_only() {
        let ddl = "CREATE TABLE t (a STRING, b LONG, PRIMARY KEY(SHARD(a, b)))";
        assert_eq!(parse_primary_keys(ddl), vec!["a", "b"]);
    }

    #[test]
    fn test_primary_key_missing() {
        assert!(parse_primary_keys("CREATE TABLE t (a STRING)").is_empty());
        assert!(parse_primary_keys("").is_empty());
    }

    #[test]
    fn test_columns_and_types() {
        let schema = TableSchema::parse(USERS_DDL);
        assert_eq!(schema.column_order(), vec!["id", "name", "email"]);
        assert_eq!(schema.columns[0].type_name, "INTEGER");
        assert!(schema.columns[0].is_primary_key);
        assert!(!schema.columns[1].is_primary_key);
        assert_eq!(schema.column_type("EMAIL"), Some("STRING"));
    }

    #[test]
    fn test_columns_with_parenthesized_types() {
        let ddl = "CREATE TABLE prices (id INTEGER, amount NUMBER, ts TIMESTAMP(3), \
                   meta RECORD(a INTEGER, b STRING), PRIMARY KEY(id))";
        let schema = TableSchema::parse(ddl);
        assert_eq!(schema.column_order(), vec!["id", "amount", "ts", "meta"]);
        assert_eq!(schema.column_type("ts"), Some("TIMESTAMP(3)"));
        assert_eq!(schema.column_type("meta"), Some("RECORD(a INTEGER, b STRING)"));
    }

    #[test]
    fn test_child_table_and_whitespace() {
        let ddl = "CREATE TABLE IF NOT EXISTS users.orders (\n  order_id LONG,\n  \
                   total DOUBLE DEFAULT 0,\n  PRIMARY KEY ( order_id )\n) USING TTL 5 DAYS";
        let schema = TableSchema::parse(ddl);
        assert_eq!(schema.primary_keys, vec!["order_id"]);
        assert_eq!(schema.column_order(), vec!["order_id", "total"]);
        assert_eq!(schema.column_type("total"), Some("DOUBLE"));
    }

    #[test]
    fn test_inherited_key_columns() {
        let ancestors = vec![
            ("users".to_string(), USERS_DDL.to_string()),
            (
                "users.orders".to_string(),
                "CREATE TABLE users.orders (order_id LONG, PRIMARY KEY(order_id))".to_string(),
            ),
        ];
        let own = TableSchema::parse(
            "CREATE TABLE users.orders.items (item_id INTEGER, qty INTEGER, PRIMARY KEY(item_id))",
        );
        let inherited = inherited_key_columns(&ancestors, &own);
        assert_eq!(
            inherited,
            vec![
                ColumnInfo {
                    name: "id".to_string(),
                    type_name: "INTEGER".to_string(),
                    is_primary_key: true,
                },
                ColumnInfo {
                    name: "order_id".to_string(),
                    type_name: "LONG".to_string(),
                    is_primary_key: true,
                },
            ]
        );
        assert!(inherited_key_columns(&[], &own).is_empty());
    }

    #[test]
    fn test_column_named_like_keyword_is_not_primary_key_clause() {
        let ddl = "CREATE TABLE t (primary_key_hint STRING, id INTEGER, PRIMARY KEY(id))";
        let schema = TableSchema::parse(ddl);
        assert_eq!(schema.primary_keys, vec!["id"]);
        assert_eq!(schema.column_order(), vec!["primary_key_hint", "id"]);
    }
}
