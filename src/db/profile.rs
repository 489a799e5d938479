use color_eyre::Result;
use ulid::Ulid;
use uuid::Uuid;

use super::models::{NewProfile, Profile};
use super::Db;

const PROFILE_COLUMNS: &str = "id, role, admin_id, full_name, age, reading_level";

impl Db {
    pub async fn create_profile(&self, profile: NewProfile<'_>) -> Result<Profile> {
        let created = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (role, admin_id, full_name, pin, age, reading_level) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile.role)
        .bind(profile.admin_id)
        .bind(profile.full_name)
        .bind(profile.pin)
        .bind(profile.age)
        .bind(profile.reading_level)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(profile_id = %created.id, role = ?created.role, "profile created");
        Ok(created)
    }

    pub async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Ids of the students managed by the given admin.
    pub async fn managed_student_ids(&self, admin_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM profiles WHERE admin_id = $1 AND role = 'student' ORDER BY created_at",
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Registers a session token for a profile. Returns the token.
    pub async fn create_profile_session(&self, profile_id: Uuid) -> Result<String> {
        let token = Ulid::new().to_string();

        sqlx::query("INSERT INTO profile_sessions (token, profile_id) VALUES ($1, $2)")
            .bind(&token)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(%profile_id, "new profile session created");
        Ok(token)
    }

    pub async fn get_profile_by_session(&self, token: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT p.id, p.role, p.admin_id, p.full_name, p.age, p.reading_level
            FROM profile_sessions s
            JOIN profiles p ON p.id = s.profile_id
            WHERE s.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
