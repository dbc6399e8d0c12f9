//! SQLite-backed persistence for templates and their slot-data overlays.
//!
//! The store is created once in `main` and injected into handlers as
//! `web::Data<Store>`; a connection is opened per operation. Templates are
//! written once at detection time and never updated; the slot-data overlay
//! is a single JSON blob per template, replaced wholesale on save
//! (last writer wins).

use common::model::slot::TemplateSlot;
use common::model::template::{TemplateConfig, TemplateMeta};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Store {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, String> {
        Connection::open(&self.path).map_err(|e| e.to_string())
    }

    /// Create the schema if this is a fresh database.
    pub fn init(&self) -> Result<(), String> {
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS templates (
                 id           TEXT PRIMARY KEY,
                 name         TEXT NOT NULL,
                 html_body    TEXT NOT NULL,
                 css          TEXT,
                 head_content TEXT,
                 content_md5  TEXT NOT NULL,
                 created_at   TEXT NOT NULL,
                 slots        TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS slot_data (
                 template_id  TEXT PRIMARY KEY,
                 data         TEXT NOT NULL,
                 updated_at   TEXT NOT NULL
             );",
        )
        .map_err(|e| e.to_string())
    }

    pub fn save_template(&self, template: &TemplateConfig) -> Result<(), String> {
        if template.id.trim().is_empty() {
            return Err("Template id must not be empty".to_string());
        }
        let slots = serde_json::to_string(&template.slots).map_err(|e| e.to_string())?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO templates
                 (id, name, html_body, css, head_content, content_md5, created_at, slots)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &template.id,
                &template.name,
                &template.html_body,
                &template.css,
                &template.head_content,
                &template.content_md5,
                &template.created_at,
                &slots,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn get_template(&self, template_id: &str) -> Result<Option<TemplateConfig>, String> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT id, name, html_body, css, head_content, content_md5, created_at, slots
                 FROM templates WHERE id = ?1",
                params![template_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| e.to_string())?;

        let Some((id, name, html_body, css, head_content, content_md5, created_at, slots)) = row
        else {
            return Ok(None);
        };
        let slots: Vec<TemplateSlot> = serde_json::from_str(&slots).map_err(|e| e.to_string())?;
        Ok(Some(TemplateConfig {
            id,
            name,
            html_body,
            css,
            head_content,
            content_md5,
            created_at,
            slots,
        }))
    }

    /// Dedup lookup: a template created from byte-identical source markup.
    pub fn find_by_md5(&self, content_md5: &str) -> Result<Option<TemplateConfig>, String> {
        let conn = self.connect()?;
        let id: Option<String> = conn
            .query_row(
                "SELECT id FROM templates WHERE content_md5 = ?1 LIMIT 1",
                params![content_md5],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.to_string())?;
        match id {
            Some(id) => self.get_template(&id),
            None => Ok(None),
        }
    }

    pub fn list_templates(&self) -> Result<Vec<TemplateMeta>, String> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, name, created_at, slots FROM templates ORDER BY created_at DESC")
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| e.to_string())?;

        let mut templates = Vec::new();
        for row in rows.filter_map(Result::ok) {
            let (id, name, created_at, slots) = row;
            let slot_count = serde_json::from_str::<Vec<TemplateSlot>>(&slots)
                .map(|s| s.len())
                .unwrap_or(0);
            templates.push(TemplateMeta {
                id,
                name,
                slot_count,
                created_at,
            });
        }
        Ok(templates)
    }

    pub fn save_slot_data(
        &self,
        template_id: &str,
        data: &HashMap<String, String>,
    ) -> Result<(), String> {
        let json = serde_json::to_string(data).map_err(|e| e.to_string())?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO slot_data (template_id, data, updated_at) VALUES (?1, ?2, ?3)",
            params![template_id, &json, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// The overlay for a template; an empty map when nothing was saved yet.
    pub fn get_slot_data(&self, template_id: &str) -> Result<HashMap<String, String>, String> {
        let conn = self.connect()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT data FROM slot_data WHERE template_id = ?1",
                params![template_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.to_string())?;
        match json {
            Some(json) => serde_json::from_str(&json).map_err(|e| e.to_string()),
            None => Ok(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::slot::SlotType;

    fn scratch_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("test.sqlite"));
        store.init().unwrap();
        (dir, store)
    }

    fn sample_template(id: &str, md5: &str) -> TemplateConfig {
        TemplateConfig {
            id: id.to_string(),
            name: "Sample".to_string(),
            html_body: "<p data-slot=\"intro\">hi</p>".to_string(),
            css: Some("p { color: red; }".to_string()),
            head_content: None,
            content_md5: md5.to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            slots: vec![TemplateSlot {
                id: "intro".to_string(),
                slot_type: SlotType::Paragraph,
                label: "Intro".to_string(),
                tag_name: "p".to_string(),
                original_content: "hi".to_string(),
                attributes: None,
                max_length: Some(120),
                word_count: Some(1),
                width: None,
                height: None,
                list_template: None,
            }],
        }
    }

    #[test]
    fn template_round_trip() {
        let (_dir, store) = scratch_store();
        store.save_template(&sample_template("t1", "abc")).unwrap();
        let loaded = store.get_template("t1").unwrap().unwrap();
        assert_eq!(loaded.name, "Sample");
        assert_eq!(loaded.slots.len(), 1);
        assert_eq!(loaded.slots[0].id, "intro");
        assert_eq!(loaded.slots[0].max_length, Some(120));
    }

    #[test]
    fn missing_template_is_none() {
        let (_dir, store) = scratch_store();
        assert!(store.get_template("nope").unwrap().is_none());
    }

    #[test]
    fn md5_lookup_finds_duplicate_uploads() {
        let (_dir, store) = scratch_store();
        store.save_template(&sample_template("t1", "samehash")).unwrap();
        let found = store.find_by_md5("samehash").unwrap().unwrap();
        assert_eq!(found.id, "t1");
        assert!(store.find_by_md5("otherhash").unwrap().is_none());
    }

    #[test]
    fn slot_data_round_trip_and_overwrite() {
        let (_dir, store) = scratch_store();
        assert!(store.get_slot_data("t1").unwrap().is_empty());

        let first = HashMap::from([("intro".to_string(), "one".to_string())]);
        store.save_slot_data("t1", &first).unwrap();
        assert_eq!(store.get_slot_data("t1").unwrap()["intro"], "one");

        let second = HashMap::from([("intro".to_string(), "two".to_string())]);
        store.save_slot_data("t1", &second).unwrap();
        assert_eq!(store.get_slot_data("t1").unwrap()["intro"], "two");
    }

    #[test]
    fn listing_reports_slot_counts() {
        let (_dir, store) = scratch_store();
        store.save_template(&sample_template("t1", "a")).unwrap();
        store.save_template(&sample_template("t2", "b")).unwrap();
        let listed = store.list_templates().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|m| m.slot_count == 1));
    }
}
