//! # CREATE Statement Column Parsing
//!
//! The schema table stores the original CREATE SQL of every object, and
//! column definitions are derived from that text rather than from a full
//! SQL parse: take the parenthesized list, split it on top-level commas,
//! and read the first identifier of each clause as the column name.
//!
//! The splitter respects nested parentheses (type arguments, CHECK
//! expressions) and quoted strings, so a DEFAULT literal containing a
//! comma does not split a clause. Identifiers may be quoted with
//! backticks, double quotes, or square brackets; the quoting is
//! stripped.
//!
//! ## Rowid Alias Detection
//!
//! A column is the *rowid alias* when its clause contains the word
//! INTEGER (or the standalone word INT) together with PRIMARY and KEY.
//! The stored value of such a column is NULL and the real value is the
//! cell rowid. Table-level constraint clauses (`PRIMARY KEY (a, b)`,
//! `UNIQUE (...)`, `FOREIGN KEY ...`) are not columns and never qualify.
//! A table has at most one alias; the first qualifying column wins.

/// One parsed column clause of a CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub rowid_alias: bool,
}

const TABLE_CONSTRAINT_KEYWORDS: &[&str] =
    &["PRIMARY", "UNIQUE", "CHECK", "FOREIGN", "CONSTRAINT"];

/// Extracts the text between the first `(` and the last `)`.
fn parenthesized(sql: &str) -> Option<&str> {
    let start = sql.find('(')?;
    let end = sql.rfind(')')?;
    (end > start).then(|| &sql[start + 1..end])
}

/// Splits on commas at parenthesis depth zero, outside quotes.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut clause_start = 0;

    for (i, c) in body.char_indices() {
        match quote {
            Some(q) => {
                let closer = if q == '[' { ']' } else { q };
                if c == closer {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' | '[' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    clauses.push(&body[clause_start..i]);
                    clause_start = i + 1;
                }
                _ => {}
            },
        }
    }
    clauses.push(&body[clause_start..]);
    clauses
}

fn strip_quoting(identifier: &str) -> &str {
    identifier.trim_matches(|c| matches!(c, '`' | '"' | '[' | ']'))
}

fn words_upper(clause: &str) -> Vec<String> {
    clause
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_uppercase())
        .collect()
}

fn is_rowid_alias(clause: &str) -> bool {
    let words = words_upper(clause);
    let integer_typed = words.iter().any(|w| w == "INTEGER" || w == "INT");
    integer_typed
        && words.iter().any(|w| w == "PRIMARY")
        && words.iter().any(|w| w == "KEY")
}

/// Parses the column list of a CREATE TABLE statement.
pub fn parse_table_columns(create_sql: &str) -> Vec<ColumnDef> {
    let Some(body) = parenthesized(create_sql) else {
        return Vec::new();
    };

    let mut columns = Vec::new();
    let mut have_alias = false;

    for clause in split_top_level(body) {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }

        let Some(first) = clause.split_whitespace().next() else {
            continue;
        };
        if TABLE_CONSTRAINT_KEYWORDS.contains(&first.to_ascii_uppercase().as_str()) {
            continue;
        }

        let name = strip_quoting(first).to_string();
        let rowid_alias = !have_alias && is_rowid_alias(clause);
        have_alias |= rowid_alias;
        columns.push(ColumnDef { name, rowid_alias });
    }

    columns
}

/// Parses the first indexed column of a CREATE INDEX statement.
pub fn parse_index_column(create_sql: &str) -> Option<String> {
    let body = parenthesized(create_sql)?;
    let clause = split_top_level(body).first()?.trim().to_string();
    let first = clause.split_whitespace().next()?;
    Some(strip_quoting(first).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(columns: &[ColumnDef]) -> Vec<&str> {
        columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn parses_plain_columns() {
        let columns = parse_table_columns("CREATE TABLE t (id integer, name text, country text)");
        assert_eq!(names(&columns), vec!["id", "name", "country"]);
        assert!(columns.iter().all(|c| !c.rowid_alias));
    }

    #[test]
    fn detects_integer_primary_key() {
        let columns = parse_table_columns(
            "CREATE TABLE companies (id INTEGER PRIMARY KEY, name TEXT, country TEXT)",
        );
        assert!(columns[0].rowid_alias);
        assert!(!columns[1].rowid_alias);
    }

    #[test]
    fn detects_lowercase_autoincrement_clause() {
        let columns =
            parse_table_columns("CREATE TABLE t (id integer primary key autoincrement, v text)");
        assert!(columns[0].rowid_alias);
    }

    #[test]
    fn detects_standalone_int_primary_key() {
        let columns = parse_table_columns("CREATE TABLE t (id int primary key, v text)");
        assert!(columns[0].rowid_alias);
    }

    #[test]
    fn point_type_is_not_int() {
        let columns = parse_table_columns("CREATE TABLE t (p POINT PRIMARY KEY, v text)");
        assert!(!columns[0].rowid_alias);
    }

    #[test]
    fn table_level_primary_key_is_not_a_column() {
        let columns =
            parse_table_columns("CREATE TABLE t (a integer, b integer, PRIMARY KEY (a, b))");
        assert_eq!(names(&columns), vec!["a", "b"]);
        assert!(columns.iter().all(|c| !c.rowid_alias));
    }

    #[test]
    fn quoted_names_are_stripped() {
        let columns =
            parse_table_columns("CREATE TABLE t (`id` integer, \"name\" text, [size] integer)");
        assert_eq!(names(&columns), vec!["id", "name", "size"]);
    }

    #[test]
    fn nested_parens_do_not_split() {
        let columns = parse_table_columns(
            "CREATE TABLE t (v varchar(10, 2), w text CHECK (w IN ('a,b', 'c')))",
        );
        assert_eq!(names(&columns), vec!["v", "w"]);
    }

    #[test]
    fn quoted_comma_does_not_split() {
        let columns = parse_table_columns("CREATE TABLE t (a text DEFAULT 'x,y', b integer)");
        assert_eq!(names(&columns), vec!["a", "b"]);
    }

    #[test]
    fn only_first_alias_counts() {
        let columns = parse_table_columns(
            "CREATE TABLE t (a integer primary key, b integer primary key)",
        );
        assert!(columns[0].rowid_alias);
        assert!(!columns[1].rowid_alias);
    }

    #[test]
    fn no_parens_yields_no_columns() {
        assert!(parse_table_columns("CREATE TABLE t AS SELECT 1").is_empty());
    }

    #[test]
    fn multiline_definitions_parse() {
        let columns = parse_table_columns(
            "CREATE TABLE apples\n(\n\tid integer primary key autoincrement,\n\tname text,\n\tcolor text\n)",
        );
        assert_eq!(names(&columns), vec!["id", "name", "color"]);
        assert!(columns[0].rowid_alias);
    }

    #[test]
    fn index_column_is_first_identifier() {
        assert_eq!(
            parse_index_column("CREATE INDEX idx_companies_country ON companies (country)"),
            Some("country".to_string())
        );
        assert_eq!(
            parse_index_column("CREATE INDEX i ON t (a, b)"),
            Some("a".to_string())
        );
        assert_eq!(
            parse_index_column("CREATE INDEX i ON t (\"weird name\")"),
            Some("weird".to_string())
        );
    }

    #[test]
    fn index_without_parens_has_no_column() {
        assert_eq!(parse_index_column("CREATE INDEX broken ON t"), None);
    }
}
