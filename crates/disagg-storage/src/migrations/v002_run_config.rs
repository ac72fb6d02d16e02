//! V002: keep the resolved configuration alongside each run.

pub const MIGRATION_SQL: &str = r#"
ALTER TABLE disagg_run ADD COLUMN config_toml TEXT;
"#;
