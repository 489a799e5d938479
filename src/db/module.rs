use color_eyre::{eyre::eyre, Result};
use sqlx::types::Json;
use uuid::Uuid;

use super::models::{NewReadingModule, Paragraph, ReadingModule};
use super::Db;

const MODULE_COLUMNS: &str = "id, title, structured_content, paragraph_count, level, module_type, genre, language, admin_id, is_active";

impl Db {
    /// Inserts a module, numbering its paragraphs from 1 and deriving `paragraph_count`.
    pub async fn create_reading_module(&self, module: NewReadingModule<'_>) -> Result<ReadingModule> {
        if module.paragraphs.is_empty() {
            return Err(eyre!("a reading module needs at least one paragraph"));
        }

        let paragraphs: Vec<Paragraph> = module
            .paragraphs
            .iter()
            .zip(1..)
            .map(|(text, index)| Paragraph {
                index,
                text: text.to_string(),
            })
            .collect();
        let paragraph_count = paragraphs.len() as i32;

        let created = sqlx::query_as::<_, ReadingModule>(&format!(
            r#"
            INSERT INTO reading_modules (title, structured_content, paragraph_count, level, module_type, genre, language, admin_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MODULE_COLUMNS}
            "#
        ))
        .bind(module.title)
        .bind(Json(paragraphs))
        .bind(paragraph_count)
        .bind(module.level)
        .bind(module.module_type)
        .bind(module.genre)
        .bind(module.language)
        .bind(module.admin_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(module_id = %created.id, paragraph_count, "reading module created");
        Ok(created)
    }

    pub async fn get_reading_module(&self, module_id: Uuid) -> Result<Option<ReadingModule>> {
        let module = sqlx::query_as::<_, ReadingModule>(&format!(
            "SELECT {MODULE_COLUMNS} FROM reading_modules WHERE id = $1"
        ))
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }
}
