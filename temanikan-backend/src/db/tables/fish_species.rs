//! Fishpedia catalog database operations
//!
//! Also the knowledge snapshot source for the AI chat: each chat request
//! reads a bounded page of records, never the whole table.

use chrono::{DateTime, Utc};
use rusqlite::Result as SqliteResult;

use super::super::Database;
use crate::models::fish_species::{FishSpecies, FishSpeciesInput};

const SELECT_COLUMNS: &str = "id, name, scientific_name, category, description, care_level,
     max_size, water_temp, ph_range, diet, image_url, created_at, updated_at";

/// Escape `%`, `_`, and `\` so user search terms match literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Database {
    pub fn insert_fish_species(&self, input: &FishSpeciesInput) -> SqliteResult<FishSpecies> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO fish_species (name, scientific_name, category, description, care_level,
             max_size, water_temp, ph_range, diet, image_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            rusqlite::params![
                &input.name,
                &input.scientific_name,
                &input.category,
                &input.description,
                &input.care_level,
                &input.max_size,
                &input.water_temp,
                &input.ph_range,
                &input.diet,
                &input.image_url,
                &now.to_rfc3339(),
            ],
        )?;

        Ok(FishSpecies {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            scientific_name: input.scientific_name.clone(),
            category: input.category.clone(),
            description: input.description.clone(),
            care_level: input.care_level.clone(),
            max_size: input.max_size.clone(),
            water_temp: input.water_temp.clone(),
            ph_range: input.ph_range.clone(),
            diet: input.diet.clone(),
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_fish_species(&self, id: i64) -> SqliteResult<Option<FishSpecies>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM fish_species WHERE id = ?1",
            SELECT_COLUMNS
        ))?;
        let species = stmt.query_row([id], Self::row_to_fish_species).ok();
        Ok(species)
    }

    /// Paged catalog listing with optional case-insensitive name search.
    pub fn list_fish_species(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> SqliteResult<Vec<FishSpecies>> {
        let conn = self.conn.lock().unwrap();

        let (sql, pattern);
        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            pattern = format!("%{}%", escape_like(term.trim()));
            sql = format!(
                "SELECT {} FROM fish_species
                 WHERE name LIKE ?1 ESCAPE '\\' OR scientific_name LIKE ?1 ESCAPE '\\'
                 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
                SELECT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let species = stmt
                .query_map(rusqlite::params![&pattern, limit, offset], Self::row_to_fish_species)?
                .filter_map(|r| r.ok())
                .collect();
            return Ok(species);
        }

        sql = format!(
            "SELECT {} FROM fish_species ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let species = stmt
            .query_map(rusqlite::params![limit, offset], Self::row_to_fish_species)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(species)
    }

    /// Bounded snapshot for grounding AI answers: the first `limit` records
    /// in default (id) order, read fresh per request.
    pub fn list_fish_species_snapshot(&self, limit: i64) -> SqliteResult<Vec<FishSpecies>> {
        self.list_fish_species(None, limit, 0)
    }

    pub fn count_fish_species(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM fish_species", [], |row| row.get(0))
    }

    pub fn update_fish_species(
        &self,
        id: i64,
        input: &FishSpeciesInput,
    ) -> SqliteResult<Option<FishSpecies>> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            "UPDATE fish_species SET name = ?1, scientific_name = ?2, category = ?3,
             description = ?4, care_level = ?5, max_size = ?6, water_temp = ?7,
             ph_range = ?8, diet = ?9, image_url = ?10, updated_at = ?11
             WHERE id = ?12",
            rusqlite::params![
                &input.name,
                &input.scientific_name,
                &input.category,
                &input.description,
                &input.care_level,
                &input.max_size,
                &input.water_temp,
                &input.ph_range,
                &input.diet,
                &input.image_url,
                &now,
                id,
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        self.get_fish_species(id)
    }

    pub fn delete_fish_species(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM fish_species WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    fn row_to_fish_species(row: &rusqlite::Row) -> rusqlite::Result<FishSpecies> {
        let created_at_str: String = row.get(11)?;
        let updated_at_str: String = row.get(12)?;

        Ok(FishSpecies {
            id: row.get(0)?,
            name: row.get(1)?,
            scientific_name: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            care_level: row.get(5)?,
            max_size: row.get(6)?,
            water_temp: row.get(7)?,
            ph_range: row.get(8)?,
            diet: row.get(9)?,
            image_url: row.get(10)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db").to_str().unwrap()).unwrap();
        (dir, db)
    }

    fn input(name: &str) -> FishSpeciesInput {
        FishSpeciesInput {
            name: name.to_string(),
            scientific_name: None,
            category: None,
            description: None,
            care_level: None,
            max_size: None,
            water_temp: None,
            ph_range: None,
            diet: None,
            image_url: None,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let (_dir, db) = test_db();
        let mut koi = input("Ikan Koi");
        koi.scientific_name = Some("Cyprinus rubrofuscus".to_string());
        koi.water_temp = Some("18-25 C".to_string());

        let created = db.insert_fish_species(&koi).unwrap();
        let fetched = db.get_fish_species(created.id).unwrap().unwrap();

        assert_eq!(fetched.name, "Ikan Koi");
        assert_eq!(fetched.scientific_name.as_deref(), Some("Cyprinus rubrofuscus"));
        assert_eq!(fetched.category, None);
    }

    #[test]
    fn snapshot_is_bounded_and_in_id_order() {
        let (_dir, db) = test_db();
        for i in 0..10 {
            db.insert_fish_species(&input(&format!("Ikan {}", i))).unwrap();
        }

        let snapshot = db.list_fish_species_snapshot(3).unwrap();
        let names: Vec<&str> = snapshot.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ikan 0", "Ikan 1", "Ikan 2"]);
    }

    #[test]
    fn insert_returns_row_without_rereading() {
        let (_dir, db) = test_db();
        let mut koi = input("Ikan Koi");
        koi.diet = Some("Pelet".to_string());

        let created = db.insert_fish_species(&koi).unwrap();

        assert!(created.id > 0);
        assert_eq!(created.name, "Ikan Koi");
        assert_eq!(created.diet.as_deref(), Some("Pelet"));
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn search_treats_like_metacharacters_literally() {
        let (_dir, db) = test_db();
        db.insert_fish_species(&input("100% Platinum Arwana")).unwrap();
        db.insert_fish_species(&input("Guppy")).unwrap();
        db.insert_fish_species(&input("Neon_Tetra")).unwrap();

        let found = db.list_fish_species(Some("100%"), 50, 0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "100% Platinum Arwana");

        // A bare wildcard matches nothing instead of everything.
        assert!(db.list_fish_species(Some("%"), 50, 0).unwrap().is_empty());

        let found = db.list_fish_species(Some("n_t"), 50, 0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Neon_Tetra");
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let (_dir, db) = test_db();
        db.insert_fish_species(&input("Ikan Koi")).unwrap();
        db.insert_fish_species(&input("Guppy")).unwrap();

        let found = db.list_fish_species(Some("koi"), 50, 0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ikan Koi");
    }

    #[test]
    fn update_and_delete() {
        let (_dir, db) = test_db();
        let created = db.insert_fish_species(&input("Guppy")).unwrap();

        let mut updated_input = input("Guppy");
        updated_input.diet = Some("Omnivora".to_string());
        let updated = db.update_fish_species(created.id, &updated_input).unwrap().unwrap();
        assert_eq!(updated.diet.as_deref(), Some("Omnivora"));

        assert!(db.delete_fish_species(created.id).unwrap());
        assert!(db.get_fish_species(created.id).unwrap().is_none());
        assert!(!db.delete_fish_species(created.id).unwrap());
        assert!(db.update_fish_species(9999, &updated_input).unwrap().is_none());
    }
}
