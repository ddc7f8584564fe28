use axum::extract::FromRef;
use chrono::Utc;
use shared::Member;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{MemberError, MemberFields, ValidMember};
use crate::AppState;

/// Sole owner of reads and writes against the `members` table.
///
/// Every operation is one terminal statement (plus an existence read for
/// `update`/`delete`), so SQLite's statement atomicity is all the isolation
/// the repository relies on.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: SqlitePool,
}

impl FromRef<AppState> for MemberRepository {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.db.clone())
    }
}

impl MemberRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<Member>, MemberError> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email, phone, membership_type, joining_date,
                   active, created_at, updated_at
            FROM members
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(members)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Member, MemberError> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, email, phone, membership_type, joining_date,
                   active, created_at, updated_at
            FROM members WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(MemberError::NotFound(id))
    }

    pub async fn create(&self, fields: MemberFields) -> Result<Member, MemberError> {
        let now = Utc::now();
        let ValidMember {
            name,
            email,
            phone,
            membership_type,
            joining_date,
            active,
        } = fields.validate_new(now)?;

        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, phone, membership_type, joining_date,
                                 active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, phone, membership_type, joining_date,
                      active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email.clone())
        .bind(phone)
        .bind(membership_type)
        .bind(joining_date)
        .bind(active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|err| duplicate_email_or(err, email))?;

        tracing::info!(id = member.id, "Created member");
        Ok(member)
    }

    /// Writes only the supplied columns, after checking the record they
    /// would produce.
    pub async fn update(&self, id: i64, fields: MemberFields) -> Result<Member, MemberError> {
        let current = self.get_by_id(id).await?;
        let valid = fields.clone().validate_update(&current)?;
        let now = Utc::now();

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE members SET ");
        let mut separated = query.separated(", ");
        if fields.name.is_some() {
            separated.push("name = ");
            separated.push_bind_unseparated(valid.name);
        }
        if fields.email.is_some() {
            separated.push("email = ");
            separated.push_bind_unseparated(valid.email.clone());
        }
        if fields.phone.is_some() {
            separated.push("phone = ");
            separated.push_bind_unseparated(valid.phone);
        }
        if fields.membership_type.is_some() {
            separated.push("membership_type = ");
            separated.push_bind_unseparated(valid.membership_type);
        }
        if fields.joining_date.is_some() {
            separated.push("joining_date = ");
            separated.push_bind_unseparated(valid.joining_date);
        }
        if fields.active.is_some() {
            separated.push("active = ");
            separated.push_bind_unseparated(valid.active);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(now);
        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(
            r#"
            RETURNING id, name, email, phone, membership_type, joining_date,
                      active, created_at, updated_at
            "#,
        );
        tracing::debug!("Query: {}", query.sql());

        let member = query
            .build_query_as::<Member>()
            .fetch_optional(&self.db)
            .await
            .map_err(|err| duplicate_email_or(err, valid.email))?
            .ok_or(MemberError::NotFound(id))?;

        tracing::info!(id, "Updated member");
        Ok(member)
    }

    /// Removes the row and hands back what it held.
    pub async fn delete(&self, id: i64) -> Result<Member, MemberError> {
        let member = self.get_by_id(id).await?;

        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        match result.rows_affected() {
            0 => Err(MemberError::NotFound(id)),
            _ => {
                tracing::info!(id, "Deleted member");
                Ok(member)
            }
        }
    }
}

fn duplicate_email_or(err: sqlx::Error, email: String) -> MemberError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err
                .message()
                .contains("UNIQUE constraint failed: members.email") =>
        {
            MemberError::DuplicateEmail(email)
        }
        _ => MemberError::Storage(err),
    }
}
