// Table definitions, applied at startup with IF NOT EXISTS.
//
// Color rows reference their scheme with ON DELETE CASCADE, so removing a
// scheme header removes its colors in the same statement.

pub const POSTGRES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username      TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS color_schemes (
        id       TEXT PRIMARY KEY,
        name     TEXT NOT NULL,
        author   TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_color_schemes_author ON color_schemes (author)",
    r#"
    CREATE TABLE IF NOT EXISTS color_scheme_colors (
        scheme_id   TEXT NOT NULL REFERENCES color_schemes (id) ON DELETE CASCADE,
        color_key   TEXT NOT NULL,
        color_value TEXT NOT NULL,
        PRIMARY KEY (scheme_id, color_key)
    )
    "#,
];

pub const SQLITE: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username      TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS color_schemes (
        id       TEXT PRIMARY KEY NOT NULL,
        name     TEXT NOT NULL,
        author   TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_color_schemes_author ON color_schemes (author)",
    r#"
    CREATE TABLE IF NOT EXISTS color_scheme_colors (
        scheme_id   TEXT NOT NULL REFERENCES color_schemes (id) ON DELETE CASCADE,
        color_key   TEXT NOT NULL,
        color_value TEXT NOT NULL,
        PRIMARY KEY (scheme_id, color_key)
    )
    "#,
];
