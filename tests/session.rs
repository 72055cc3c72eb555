use tabula::{
    BoxRenderer, Config, Error, PlainRenderer, ScriptSource, Session, State, Table, Value,
};

type PlainSession = Session<ScriptSource, PlainRenderer<Vec<u8>>, Vec<u8>>;

fn run(script: &str) -> PlainSession {
    let mut session = Session::new(
        ScriptSource::new(script),
        PlainRenderer::new(Vec::new()),
        Vec::new(),
        &Config::default(),
    );
    session.run().unwrap();
    session
}

fn stdout(session: &PlainSession) -> String {
    String::from_utf8(session.renderer().get_ref().clone()).unwrap()
}

fn stderr(session: &PlainSession) -> String {
    String::from_utf8(session.diagnostics().clone()).unwrap()
}

/// Result lines of the last SELECT, header excluded.
fn last_result(session: &PlainSession, header: &str) -> Vec<String> {
    let out = stdout(session);
    let marker = format!("\n{header}\n");
    let start = out.rfind(&marker).unwrap() + marker.len();
    out[start..].lines().map(str::to_string).collect()
}

fn column(table: &Table, name: &str) -> Vec<Option<String>> {
    let idx = table.column_position(name).unwrap();
    table
        .rows()
        .iter()
        .map(|row| row.get(idx).and_then(Value::canonical).map(str::to_string))
        .collect()
}

// ─── Test 1 : Full scenario ─────────────────────────────────────────────
#[test]
fn test_employee_scenario() {
    let s = run(r#"CREATE emp (id, name, salary INDEXED);
INSERT INTO emp ("1","Alice","75000");
INSERT INTO emp ("2","Bob","85000");
SELECT FROM emp WHERE salary > "75000";
QUIT"#);

    assert_eq!(s.state(), State::Halted);
    assert_eq!(last_result(&s, "id, name, salary"), vec!["2, Bob, 85000"]);
    assert_eq!(stderr(&s), "");
}

// ─── Test 2 : Values compare as strings ─────────────────────────────────
#[test]
fn test_string_ordering_pitfall() {
    let s = run(r#"CREATE t (v INDEXED);
INSERT t ("9000");
INSERT t ("10000");
SELECT FROM t WHERE v > "9000";
Q"#);

    // "10000" < "9000" lexicographically
    assert!(last_result(&s, "v").is_empty());
}

#[test]
fn test_indexed_and_unindexed_columns_agree() {
    let s = run(r#"CREATE t (a INDEXED, b);
INSERT t ("b", "b");
INSERT t ("d", "d");
INSERT t ("a", "a");
INSERT t ("c", "c");
SELECT FROM t WHERE a > "b" ORDER_BY a;
SELECT FROM t WHERE b > "b" ORDER_BY b;
Q"#);

    let out = stdout(&s);
    let results: Vec<&str> = out.split("a, b\n").skip(1).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], "c, c\nd, d\n");
}

// ─── Test 3 : Errors are isolated ───────────────────────────────────────
#[test]
fn test_syntax_error_does_not_stop_the_session() {
    let s = run(r#"CREATE t (;
CREATE t (a);
SELECT FROM t;
Q"#);

    assert_eq!(stderr(&s).lines().count(), 1);
    assert!(stderr(&s).starts_with("Error: "));
    assert!(stdout(&s).contains("Table 't' was successfully created"));
    assert!(s.catalog().get_table("t").unwrap().is_empty());
}

#[test]
fn test_unclosed_create_swallows_the_next_line() {
    let s = run(r#"CREATE t (a);
CREATE t (
SELECT FROM t;
SELECT FROM t;
Q"#);

    // the open statement continues onto the next line: `( SELECT FROM`
    // fails at FROM, the second SELECT runs normally
    let errors = stderr(&s);
    assert_eq!(errors.lines().count(), 1);
    assert!(errors.contains("found \"FROM\""));
    assert_eq!(stdout(&s).matches("\na\n").count(), 1);
    assert_eq!(s.catalog().list_tables(), vec!["t"]);
    assert_eq!(s.catalog().get_table("t").unwrap().columns(), ["a"]);
}

#[test]
fn test_arity_mismatch_changes_nothing() {
    let s = run(r#"CREATE t (a INDEXED, b);
INSERT t ("1", "2");
INSERT t ("1", "2", "3");
INSERT t ("1");
Q"#);

    let table = s.catalog().get_table("t").unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.index("a").unwrap().lookup("1").len(), 1);
    assert_eq!(stderr(&s).lines().count(), 2);
}

#[test]
fn test_duplicate_and_unknown_tables() {
    let s = run(r#"CREATE t (a);
CREATE T (b);
CREATE t (c);
INSERT INTO nope ("1");
SELECT FROM nope;
Q"#);

    let errors: Vec<String> = stderr(&s).lines().map(str::to_string).collect();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], format!("Error: {}", Error::DuplicateTable("t".into())));
    assert_eq!(errors[1], format!("Error: {}", Error::UnknownTable("nope".into())));
    // table names are case-sensitive
    assert_eq!(s.catalog().list_tables(), vec!["T", "t"]);
}

#[test]
fn test_unquoted_value_is_rejected() {
    let s = run(r#"CREATE t (a);
INSERT t (42);
Q"#);

    assert_eq!(
        stderr(&s).trim_end(),
        format!("Error: {}", Error::ValuesMustBeQuoted("42".into()))
    );
    assert!(s.catalog().get_table("t").unwrap().is_empty());
}

// ─── Test 4 : ORDER_BY ──────────────────────────────────────────────────
#[test]
fn test_order_by_last_key_is_most_significant() {
    let s = run(r#"CREATE t (a, b);
INSERT t ("1", "x");
INSERT t ("2", "y");
INSERT t ("3", "x");
INSERT t ("4", "y");
SELECT FROM t ORDER_BY a ASC, b DESC;
Q"#);

    assert_eq!(
        last_result(&s, "a, b"),
        vec!["2, y", "4, y", "1, x", "3, x"]
    );
}

#[test]
fn test_select_twice_gives_the_same_rows() {
    let s = run(r#"CREATE t (a, b);
INSERT t ("2", "p");
INSERT t ("1", "q");
INSERT t ("2", "r");
SELECT FROM t WHERE b > a ORDER_BY a DESC;
SELECT FROM t WHERE b > a ORDER_BY a DESC;
Q"#);

    let out = stdout(&s);
    let results: Vec<&str> = out.split("a, b\n").skip(1).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], "2, p\n2, r\n1, q\n");
}

#[test]
fn test_where_and_order_by_keywords_ignore_case() {
    let s = run(r#"create t (a indexed);
insert into t ("b");
insert into t ("c");
select from t where a > "a" order_by a desc;
quit"#);

    assert_eq!(last_result(&s, "a"), vec!["c", "b"]);
    assert_eq!(column(s.catalog().get_table("t").unwrap(), "a"), vec![
        Some("b".to_string()),
        Some("c".to_string())
    ]);
}

// ─── Test 5 : Multi-line statements and rendering ──────────────────────
#[test]
fn test_statement_spans_lines() {
    let s = run("CREATE t (\n  a,\n  b INDEXED\n)\n;\nQ");

    let table = s.catalog().get_table("t").unwrap();
    assert_eq!(table.columns(), ["a", "b"]);
    assert_eq!(table.indexed_columns(), vec!["b"]);
}

#[test]
fn test_box_renderer_session() {
    let mut s = Session::new(
        ScriptSource::new("CREATE t (id);\nINSERT t (\"1\");\nSELECT FROM t;\nQ"),
        BoxRenderer::new(Vec::new()),
        Vec::new(),
        &Config::default(),
    );
    s.run().unwrap();

    let out = String::from_utf8(s.renderer().get_ref().clone()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Table 't' was successfully created with columns: id.");
    assert_eq!(lines[1], "+================+");
    assert_eq!(lines[2], "║id              ║");
    assert_eq!(lines[4], "║1               ║");
    assert_eq!(lines[5], "+----------------+");
}

// ─── Test 6 : Quit sentinel ─────────────────────────────────────────────
#[test]
fn test_quit_line_ends_an_open_statement() {
    let mut s = Session::new(
        ScriptSource::new("CREATE t (a);\nSELECT FROM t\nQUIT"),
        PlainRenderer::new(Vec::new()),
        Vec::new(),
        &Config::default(),
    );

    assert_eq!(s.run(), Ok(()));
    assert_eq!(s.state(), State::Halted);
    assert!(s.diagnostics().is_empty());
}

#[test]
fn test_quit_must_be_alone_on_its_line() {
    let s = run(r#"CREATE t (a);
q INSERT INTO t ("1");
INSERT INTO t ("2");
SELECT FROM t;
Q"#);

    assert_eq!(
        stderr(&s).trim_end(),
        format!("Error: {}", Error::UnknownCommand("q".into()))
    );
    assert_eq!(last_result(&s, "a"), vec!["2"]);
}

#[test]
fn test_missing_quit_is_fatal() {
    let mut s = Session::new(
        ScriptSource::new("CREATE t (a);"),
        PlainRenderer::new(Vec::new()),
        Vec::new(),
        &Config::default(),
    );
    assert_eq!(s.run(), Err(Error::InputExhausted));
}
