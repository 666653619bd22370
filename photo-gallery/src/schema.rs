use rusqlite::{Connection, Result};

/// Initialize the local gallery database schema
pub fn init_gallery_schema(conn: &Connection) -> Result<()> {
    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    // Schema version table for future migrations
    conn.execute(
        "CREATE TABLE IF NOT EXISTS gallery_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM gallery_schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_gallery_schema_v1(conn)?;
        conn.execute("INSERT INTO gallery_schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Create gallery schema version 1
fn create_gallery_schema_v1(conn: &Connection) -> Result<()> {
    // Table: albums
    conn.execute(
        "CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK(length(trim(name)) > 0),
            description TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Table: photos. Deleting an album leaves its photos unsorted.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK(length(trim(title)) > 0),
            description TEXT,
            image_url TEXT NOT NULL,
            album_id INTEGER REFERENCES albums(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_photos_album_id ON photos(album_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_photos_created_at ON photos(created_at)",
        [],
    )?;

    Ok(())
}
