//! Unit tests for the raw SQL denylist.

use crate::executor::domain::{DENYLIST, ForbiddenQuery, SqlSanitizer};
use rstest::{fixture, rstest};

#[fixture]
fn sanitizer() -> SqlSanitizer {
    SqlSanitizer::new().expect("denylist compiles")
}

#[rstest]
#[case("EXEC xp_cmdshell 'dir'", "xp_cmdshell")]
#[case("exec SP_EXECUTESQL N'select 1'", "sp_executesql")]
#[case("select pg_read_file('/etc/passwd')", "pg_read_file")]
#[case("select pg_read_binary_file('/etc/passwd')", "pg_read_file")]
#[case("select * from pg_ls_dir('.')", "pg_ls_dir")]
#[case("select lo_import('/tmp/x')", "lo_import")]
#[case("COPY t FROM PROGRAM 'curl evil'", "copy program")]
#[case("copy (select 1) to\n program 'sh'", "copy program")]
#[case("ALTER ROLE app WITH SUPERUSER", "alter role superuser")]
#[case("grant all privileges, superuser to app", "grant superuser")]
#[case("create role intruder login", "create role")]
fn dangerous_queries_are_rejected(
    sanitizer: SqlSanitizer,
    #[case] query: &str,
    #[case] pattern: &'static str,
) {
    assert_eq!(sanitizer.check(query), Err(ForbiddenQuery { pattern }));
}

#[rstest]
#[case("select master.dbo.xp_cmdshell_proxy('dir')", "xp_cmdshell")]
#[case("exec dbo.my_xp_cmdshell 'whoami'", "xp_cmdshell")]
#[case("select 'run' || xp_cmdshell", "xp_cmdshell")]
#[case("exec sp_executesql_wrapper N'select 1'", "sp_executesql")]
#[case("select pg_ls_dir_recursive('/')", "pg_ls_dir")]
#[case("select my_lo_import_helper('/tmp/x')", "lo_import")]
fn embedded_procedure_names_are_rejected(
    sanitizer: SqlSanitizer,
    #[case] query: &str,
    #[case] pattern: &'static str,
) {
    assert_eq!(sanitizer.check(query), Err(ForbiddenQuery { pattern }));
}

#[rstest]
#[case("select * from todos -- list everything")]
#[case("create table a (id int); create table b (id int);")]
#[case("/* block comment */ insert into todos (title) values ('copy this')")]
#[case("select 'xp_cmd' as partial")]
#[case("alter table todos add column done boolean")]
fn ordinary_queries_pass(sanitizer: SqlSanitizer, #[case] query: &str) {
    assert_eq!(sanitizer.check(query), Ok(()));
}

#[rstest]
fn every_pattern_has_a_name() {
    assert!(DENYLIST.iter().all(|(name, pattern)| !name.is_empty() && !pattern.is_empty()));
}
