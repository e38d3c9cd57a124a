mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new("test_creates_and_removes_db_files.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_connections_enforce_foreign_keys() {
    use diesel::RunQueryDsl;
    use diesel::connection::SimpleConnection;

    let test_db = common::TestDb::new("test_connections_enforce_foreign_keys.db");
    let mut conn = test_db.pool().get().unwrap();

    let orphan =
        conn.batch_execute("INSERT INTO clients (organization_id, name) VALUES (999, 'Orphan');");
    assert!(orphan.is_err());

    #[derive(diesel::QueryableByName)]
    struct Mode {
        #[diesel(sql_type = diesel::sql_types::Text)]
        journal_mode: String,
    }
    let mode = diesel::sql_query("PRAGMA journal_mode;")
        .get_result::<Mode>(&mut conn)
        .unwrap();
    assert_eq!(mode.journal_mode, "wal");
}

#[test]
fn test_repository_ping() {
    let test_db = common::TestDb::new("test_repository_ping.db");
    assert!(test_db.repo().ping().is_ok());
}
