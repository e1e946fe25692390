//! Sqlite-backed persistence for settings and the media catalog.

use std::path::Path;

use anyhow::Context as _;
use galerie_core::{Catalog, Category, CategoryId, MediaItem, Settings, Theme};
use rusqlite::{Connection, OptionalExtension as _};

#[derive(Debug)]
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("open sqlite db at {}", path.as_ref().display()))?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    fn migrate(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                page_size INTEGER NOT NULL,
                theme TEXT NOT NULL DEFAULT 'dark'
            );
            INSERT OR IGNORE INTO settings (id, page_size)
            VALUES (1, 9);

            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                label TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS media_items (
                id INTEGER PRIMARY KEY,
                position INTEGER NOT NULL,
                source TEXT NOT NULL,
                category TEXT NOT NULL REFERENCES categories(id),
                title TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let row = self
            .conn
            .query_row(
                "SELECT page_size, theme FROM settings WHERE id = 1",
                [],
                |row| {
                    let page_size: i64 = row.get(0)?;
                    let theme: String = row.get(1)?;
                    Ok((page_size, theme))
                },
            )
            .optional()?;

        let defaults = Settings::default();
        let (page_size, theme) = match row {
            Some(value) => value,
            None => (defaults.page_size as i64, defaults.theme.as_str().to_string()),
        };

        let mut settings = Settings {
            page_size: usize::try_from(page_size).unwrap_or(defaults.page_size),
            theme: theme.parse::<Theme>().unwrap_or(defaults.theme),
        };
        settings.normalize();
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let mut settings = settings.clone();
        settings.normalize();

        self.conn.execute(
            "UPDATE settings SET page_size = ?, theme = ? WHERE id = 1",
            (settings.page_size as i64, settings.theme.as_str()),
        )?;
        Ok(())
    }

    /// Returns `None` while nothing has been stored yet.
    pub fn load_catalog(&self) -> anyhow::Result<Option<Catalog>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label FROM categories ORDER BY position")?;
        let categories = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                Ok(Category {
                    id: CategoryId(id),
                    label: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if categories.is_empty() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, source, category, title FROM media_items ORDER BY position",
        )?;
        let items = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let category: String = row.get(2)?;
                Ok((id, row.get::<_, String>(1)?, category, row.get::<_, String>(3)?))
            })?
            .map(|row| -> anyhow::Result<MediaItem> {
                let (id, source, category, title) = row?;
                let id = u32::try_from(id).with_context(|| format!("media item id {id}"))?;
                Ok(MediaItem {
                    id,
                    source,
                    category: CategoryId(category),
                    title,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let catalog = Catalog::new(categories, items).context("stored catalog is invalid")?;
        Ok(Some(catalog))
    }

    pub fn replace_catalog(&mut self, catalog: &Catalog) -> anyhow::Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM media_items", [])?;
        tx.execute("DELETE FROM categories", [])?;

        {
            let mut insert_category =
                tx.prepare("INSERT INTO categories (id, position, label) VALUES (?, ?, ?)")?;
            for (position, category) in catalog.categories().iter().enumerate() {
                insert_category.execute((category.id.as_str(), position as i64, &category.label))?;
            }

            let mut insert_item = tx.prepare(
                "INSERT INTO media_items (id, position, source, category, title) VALUES (?, ?, ?, ?, ?)",
            )?;
            for (position, item) in catalog.items().iter().enumerate() {
                insert_item.execute((
                    item.id as i64,
                    position as i64,
                    &item.source,
                    item.category.as_str(),
                    &item.title,
                ))?;
            }
        }

        tx.commit().context("commit catalog")?;
        log::info!(
            "stored catalog with {} categories and {} items",
            catalog.categories().len(),
            catalog.items().len()
        );
        Ok(())
    }

    /// Loads the stored catalog, seeding the built-in one on first run.
    pub fn load_or_seed_catalog(&mut self) -> anyhow::Result<Catalog> {
        if let Some(catalog) = self.load_catalog()? {
            return Ok(catalog);
        }
        log::info!("no catalog stored yet, seeding the built-in gallery");
        let catalog = Catalog::builtin();
        self.replace_catalog(&catalog)?;
        Ok(catalog)
    }
}

/// Reads a JSON catalog document (`{"categories": [...], "items": [...]}`).
pub fn read_catalog_file(path: impl AsRef<Path>) -> anyhow::Result<Catalog> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    parse_catalog_json(&raw).with_context(|| format!("parse catalog {}", path.display()))
}

pub fn parse_catalog_json(raw: &str) -> anyhow::Result<Catalog> {
    Ok(serde_json::from_str(raw)?)
}
