//! End-to-end pagination against a real SQLite database.
//!
//! Rendered queries run through rusqlite, so the keyset predicate, ordering,
//! and probe limit are checked against an actual SQL engine.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chainidx_paging::prelude::*;
use chainidx_paging::{CursorParam, InvalidPagination};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params, params_from_iter};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Proposal {
    vega_time: i64,
    id: String,
    party_id: String,
}

impl Cursored for Proposal {
    fn cursor_key(&self) -> CursorKey {
        CursorKey::new(vec![
            Value::Timestamp(self.vega_time),
            Value::Text(self.id.clone()),
        ])
    }
}

/// Runs every page query against one table.
struct SqliteSource<'c> {
    conn: &'c Connection,
    table: &'static str,
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) | Value::Timestamp(i) => SqlValue::Integer(*i),
        Value::Text(s) => SqlValue::Text(s.clone()),
        _ => SqlValue::Null,
    }
}

impl RowSource for SqliteSource<'_> {
    type Row = Proposal;
    type Error = rusqlite::Error;

    fn fetch(&self, query: &PageQuery<'_>) -> Result<Vec<Proposal>, rusqlite::Error> {
        let rendered = query.to_sql(Sqlite, self.table, &["vega_time", "id", "party_id"]);
        let mut stmt = self.conn.prepare(&rendered.sql)?;
        let rows = stmt.query_map(params_from_iter(rendered.params.iter().map(to_sql_value)), |row| {
            Ok(Proposal {
                vega_time: row.get(0)?,
                id: row.get(1)?,
                party_id: row.get(2)?,
            })
        })?;
        rows.collect()
    }
}

fn spec() -> SortSpec {
    SortSpec::new([
        SortColumn::asc("vega_time", ValueKind::Timestamp),
        SortColumn::asc("id", ValueKind::Text).unique(),
    ])
    .unwrap()
}

/// 20 proposals, two per ledger timestamp, in ascending (vega_time, id) order.
fn fixture() -> (Connection, Vec<Proposal>) {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE proposals (
            vega_time INTEGER NOT NULL,
            id TEXT NOT NULL PRIMARY KEY,
            party_id TEXT NOT NULL
        )",
    )
    .unwrap();

    let rows: Vec<Proposal> = (0..20)
        .map(|i| Proposal {
            vega_time: 1_659_430_800_000_000_000 + (i / 2) * 1_000_000_000,
            id: format!("prop{i:02}"),
            party_id: if i % 3 == 0 { "p1" } else { "p2" }.to_string(),
        })
        .collect();

    // Insert out of order so the database has to sort
    for row in rows.iter().rev() {
        conn.execute(
            "INSERT INTO proposals (vega_time, id, party_id) VALUES (?1, ?2, ?3)",
            params![row.vega_time, row.id, row.party_id],
        )
        .unwrap();
    }
    (conn, rows)
}

fn fetch(
    conn: &Connection,
    first: Option<i64>,
    after: Option<&str>,
    last: Option<i64>,
    before: Option<&str>,
    newest_first: bool,
) -> Page<Proposal> {
    let spec = spec();
    let source = SqliteSource {
        conn,
        table: "proposals",
    };
    let request = Pagination::new(&spec, first, after, last, before, newest_first).unwrap();
    paginate(&spec, &request, &source, None).unwrap()
}

fn token(row: &Proposal) -> String {
    row.cursor_key().encode(&spec())
}

// =============================================================================
// Concrete Scenario
// =============================================================================

#[test]
fn test_first_page() {
    let (conn, rows) = fixture();
    let page = fetch(&conn, Some(3), None, None, None, false);
    assert_eq!(page.rows, rows[0..3]);
    assert!(page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
    assert_eq!(page.page_info.start_cursor, Some(token(&rows[0])));
    assert_eq!(page.page_info.end_cursor, Some(token(&rows[2])));
}

#[test]
fn test_second_page_after_cursor() {
    let (conn, rows) = fixture();
    let after = token(&rows[2]);
    let page = fetch(&conn, Some(3), Some(&after), None, None, false);
    assert_eq!(page.rows, rows[3..6]);
    assert!(page.page_info.has_next_page);
    assert!(page.page_info.has_previous_page);
}

#[test]
fn test_last_page() {
    let (conn, rows) = fixture();
    let page = fetch(&conn, None, None, Some(3), None, false);
    assert_eq!(page.rows, rows[17..20]);
    assert!(!page.page_info.has_next_page);
    assert!(page.page_info.has_previous_page);
}

#[test]
fn test_page_before_cursor() {
    let (conn, rows) = fixture();
    let before = token(&rows[17]);
    let page = fetch(&conn, None, None, Some(3), Some(&before), false);
    assert_eq!(page.rows, rows[14..17]);
    assert!(page.page_info.has_next_page);
    assert!(page.page_info.has_previous_page);
}

#[test]
fn test_newest_first() {
    let (conn, rows) = fixture();
    let page = fetch(&conn, Some(3), None, None, None, true);
    let expected = vec![rows[19].clone(), rows[18].clone(), rows[17].clone()];
    assert_eq!(page.rows, expected);
    assert!(page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
}

#[test]
fn test_cursor_inside_shared_timestamp() {
    let (conn, rows) = fixture();
    // rows[4] and rows[5] share a timestamp; resuming after rows[4] must not skip rows[5]
    let after = token(&rows[4]);
    let page = fetch(&conn, Some(2), Some(&after), None, None, false);
    assert_eq!(page.rows, rows[5..7]);
}

#[test]
fn test_no_limit_returns_everything() {
    let (conn, rows) = fixture();
    let page = fetch(&conn, None, None, None, None, false);
    assert_eq!(page.rows, rows);
    assert!(!page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
}

#[test]
fn test_walk_forward_then_back() {
    let (conn, rows) = fixture();
    let mut seen = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let page = fetch(&conn, Some(6), after.as_deref(), None, None, false);
        seen.extend(page.rows);
        if !page.page_info.has_next_page {
            break;
        }
        after = page.page_info.end_cursor;
    }
    assert_eq!(seen, rows);

    let mut pages = Vec::new();
    let mut before: Option<String> = None;
    loop {
        let page = fetch(&conn, None, None, Some(6), before.as_deref(), false);
        pages.push(page.rows);
        if !page.page_info.has_previous_page {
            break;
        }
        before = page.page_info.start_cursor;
    }
    let seen: Vec<Proposal> = pages.into_iter().rev().flatten().collect();
    assert_eq!(seen, rows);
}

#[test]
fn test_filtered_pages() {
    let (conn, rows) = fixture();
    let spec = spec();
    let source = SqliteSource {
        conn: &conn,
        table: "proposals",
    };
    let filter = simple("party_id", Operator::Eq, "p1");
    let request = Pagination::new(&spec, Some(4), None, None, None, false).unwrap();
    let page = paginate(&spec, &request, &source, Some(&filter)).unwrap();

    let expected: Vec<Proposal> = rows.into_iter().filter(|r| r.party_id == "p1").collect();
    assert_eq!(page.rows, expected[0..4]);
    assert!(page.page_info.has_next_page);
}

// =============================================================================
// Invalid Input
// =============================================================================

#[test]
fn test_both_limits_rejected() {
    let err = Pagination::new(&spec(), Some(3), None, Some(3), None, false).unwrap_err();
    assert!(matches!(
        err,
        PaginationError::InvalidPagination(InvalidPagination::BothLimits)
    ));
}

#[test]
fn test_foreign_token_rejected() {
    let other = SortSpec::composite([
        SortColumn::asc("block_height", ValueKind::Int),
        SortColumn::asc("node_id", ValueKind::Text),
    ])
    .unwrap();
    let foreign = CursorKey::new(vec![Value::Int(1), Value::Text("n1".into())]).encode(&other);
    let err = Pagination::new(&spec(), Some(3), Some(&foreign), None, None, false).unwrap_err();
    assert!(matches!(
        err,
        PaginationError::MalformedCursor {
            param: CursorParam::After,
            ..
        }
    ));
    assert!(err.is_client_error());
}

#[test]
fn test_database_failure_passes_through() {
    let (conn, _) = fixture();
    let source = SqliteSource {
        conn: &conn,
        table: "missing_table",
    };
    let err = paginate(&spec(), &Pagination::default(), &source, None).unwrap_err();
    assert!(err.is_source_error());
    assert!(err.to_string().contains("missing_table"));
}
