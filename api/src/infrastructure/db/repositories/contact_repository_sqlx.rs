use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::contact_repository::{ContactRepository, CreateContactError};
use crate::domain::contacts::contact::{
    Contact, ContactFilter, ContactPatch, NewContact, UserRole,
};
use crate::infrastructure::db::PgPool;

const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone, role, birth_day, data, \
     password, avatar, verified, verification_token, password_reset_token, created_at, updated_at";

pub struct SqlxContactRepository {
    pub pool: PgPool,
}

impl SqlxContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> anyhow::Result<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE {column} = $1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }
}

fn map_contact(row: &PgRow) -> anyhow::Result<Contact> {
    let role: String = row.get("role");
    Ok(Contact {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        role: role.parse::<UserRole>()?,
        birth_day: row.get("birth_day"),
        data: row.try_get("data").ok().flatten(),
        password_hash: row.get("password"),
        avatar: row.try_get("avatar").ok().flatten(),
        verified: row.get("verified"),
        verification_token: row.try_get("verification_token").ok().flatten(),
        password_reset_token: row.try_get("password_reset_token").ok().flatten(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

/// `%term%` for ILIKE with the LIKE metacharacters escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn list(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY id OFFSET $1 LIMIT $2");
        let rows = sqlx::query(&sql)
            .bind(skip)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_contact).collect()
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Contact>> {
        self.fetch_one_by("email", email).await
    }

    async fn find_by_verification_token(&self, token: &str) -> anyhow::Result<Option<Contact>> {
        self.fetch_one_by("verification_token", token).await
    }

    async fn find_by_reset_token(&self, token: &str) -> anyhow::Result<Option<Contact>> {
        self.fetch_one_by("password_reset_token", token).await
    }

    async fn search(&self, filter: &ContactFilter) -> anyhow::Result<Vec<Contact>> {
        let sql = format!(
            r#"SELECT {CONTACT_COLUMNS} FROM contacts
               WHERE ($1::text IS NULL OR first_name ILIKE $1)
                 AND ($2::text IS NULL OR last_name ILIKE $2)
                 AND ($3::text IS NULL OR email ILIKE $3)
               ORDER BY id"#
        );
        let rows = sqlx::query(&sql)
            .bind(filter.first_name.as_deref().map(contains_pattern))
            .bind(filter.last_name.as_deref().map(contains_pattern))
            .bind(filter.email.as_deref().map(contains_pattern))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_contact).collect()
    }

    async fn birthdays_within(&self, keys: &[String]) -> anyhow::Result<Vec<Contact>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"SELECT {CONTACT_COLUMNS} FROM contacts
               WHERE to_char(birth_day, 'MM-DD') = ANY($1)
               ORDER BY to_char(birth_day, 'MM-DD'), id"#
        );
        let rows = sqlx::query(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_contact).collect()
    }

    async fn create(&self, new: &NewContact) -> Result<Contact, CreateContactError> {
        let sql = format!(
            r#"INSERT INTO contacts
                 (first_name, last_name, email, phone, role, birth_day, data, password, avatar, verification_token)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING {CONTACT_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(new.role.as_str())
            .bind(new.birth_day)
            .bind(&new.data)
            .bind(&new.password_hash)
            .bind(&new.avatar)
            .bind(&new.verification_token)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    CreateContactError::DuplicateEmail
                } else {
                    CreateContactError::Other(err.into())
                }
            })?;
        Ok(map_contact(&row)?)
    }

    async fn update(&self, id: i32, patch: &ContactPatch) -> anyhow::Result<Option<Contact>> {
        let sql = format!(
            r#"UPDATE contacts SET
                 first_name = COALESCE($2, first_name),
                 last_name = COALESCE($3, last_name),
                 phone = COALESCE($4, phone),
                 birth_day = COALESCE($5, birth_day),
                 data = CASE WHEN $7 THEN $6 ELSE data END,
                 updated_at = now()
               WHERE id = $1
               RETURNING {CONTACT_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&patch.first_name)
            .bind(&patch.last_name)
            .bind(&patch.phone)
            .bind(patch.birth_day)
            .bind(patch.data.as_ref().filter(|v| !v.is_null()))
            .bind(patch.data.is_some())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<Contact>> {
        let sql = format!("DELETE FROM contacts WHERE id = $1 RETURNING {CONTACT_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }

    async fn mark_verified(&self, email: &str) -> anyhow::Result<Option<Contact>> {
        let sql = format!(
            r#"UPDATE contacts SET verified = TRUE, updated_at = now()
               WHERE email = $1
               RETURNING {CONTACT_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }

    async fn update_avatar(&self, id: i32, url: &str) -> anyhow::Result<Option<Contact>> {
        let sql = format!(
            r#"UPDATE contacts SET avatar = $2, updated_at = now()
               WHERE id = $1
               RETURNING {CONTACT_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }

    async fn issue_reset_token(
        &self,
        email: &str,
        token: &str,
    ) -> anyhow::Result<Option<Contact>> {
        let sql = format!(
            r#"UPDATE contacts SET password_reset_token = $2, updated_at = now()
               WHERE email = $1
               RETURNING {CONTACT_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }

    async fn set_password_by_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<Contact>> {
        let sql = format!(
            r#"UPDATE contacts SET password = $2, password_reset_token = NULL, updated_at = now()
               WHERE password_reset_token = $1
               RETURNING {CONTACT_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(token)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_contact(&r)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::{contains_pattern, is_unique_violation};

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(contains_pattern("john"), "%john%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn only_database_errors_count_as_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
