//! SQLite storage implementation
//!
//! Stores users, projects, teams, team membership and applications in a
//! SQLite database through an sqlx connection pool. References between tables
//! are plain integer columns without foreign-key constraints, so deleting a
//! referenced row leaves its dependents pointing at a missing id.

use super::{ApplicationStore, ProjectStore, TeamStore, UserStore};
use crate::{
    RegistryError,
    entities::*,
    error::Result,
    page::{Page, PageRequest},
};
use async_trait::async_trait;
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;
use tracing::debug;

const PROJECT_COLUMNS: &str = r#"
    SELECT p.id, p.name, p.description, p.user_id, u.name AS owner_name
    FROM projects p
    LEFT JOIN users u ON u.id = p.user_id
"#;

/// Wrap an sqlx error with the failed operation
fn storage_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> RegistryError {
    move |e| RegistryError::Storage(format!("{}: {}", context, e))
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: UserId(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password"),
    }
}

fn project_from_row(row: &SqliteRow) -> Project {
    Project {
        id: ProjectId(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        owner_id: UserId(row.get("user_id")),
        owner_name: row.get("owner_name"),
    }
}

fn application_from_row(row: &SqliteRow) -> Application {
    Application {
        id: ApplicationId(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        team_id: TeamId(row.get("appteam_id")),
        project_id: ProjectId(row.get("project_id")),
    }
}

/// SQLite-backed storage for every registry table
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to the database at `database_url`, creating file and schema if missing
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RegistryError::Storage(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(storage_err("Failed to connect to SQLite"))?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                password TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                user_id INTEGER NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS appteams (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS appteams_users (
                appteam_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (appteam_id, user_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                appteam_id INTEGER NOT NULL,
                project_id INTEGER NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_users_name ON users(name)",
            "CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage_err("Failed to initialize schema"))?;
        }

        Ok(())
    }

    async fn count(&self, table: &'static str) -> Result<u64> {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS total FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err("Failed to count rows"))?;
        Ok(row.get::<i64, _>("total") as u64)
    }

    /// Members of one team in membership order, skipping deleted users
    async fn load_members(&self, team_id: TeamId) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.password
            FROM appteams_users m
            JOIN users u ON u.id = m.user_id
            WHERE m.appteam_id = ?
            ORDER BY m.position ASC
            "#,
        )
        .bind(team_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err("Failed to load team members"))?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn team_from_row(&self, row: &SqliteRow) -> Result<Team> {
        let id = TeamId(row.get("id"));
        Ok(Team {
            id,
            name: row.get("name"),
            description: row.get("description"),
            members: self.load_members(id).await?,
        })
    }

    async fn write_members(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        team_id: TeamId,
        member_ids: &[UserId],
    ) -> Result<()> {
        for (position, member_id) in member_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO appteams_users (appteam_id, user_id, position) VALUES (?, ?, ?)",
            )
            .bind(team_id.0)
            .bind(member_id.0)
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(storage_err("Failed to save team member"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn insert_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(storage_err("Failed to save user"))?;

        Ok(User {
            id: UserId(result.last_insert_rowid()),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err("Failed to get user"))?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password FROM users WHERE name = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err("Failed to get user by name"))?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>> {
        let total = self.count("users").await?;
        let rows = sqlx::query(
            "SELECT id, name, email, password FROM users ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err("Failed to list users"))?;

        Ok(Page::new(rows.iter().map(user_from_row).collect(), page, total))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query("UPDATE users SET name = ?, email = ?, password = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_err("Failed to update user"))?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_err("Failed to delete user"))?;

        debug!("Deleted {} user row(s) for id {}", result.rows_affected(), id);
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for SqliteStorage {
    async fn insert_project(
        &self,
        name: &str,
        description: Option<&str>,
        owner_id: UserId,
    ) -> Result<Project> {
        let result =
            sqlx::query("INSERT INTO projects (name, description, user_id) VALUES (?, ?, ?)")
                .bind(name)
                .bind(description)
                .bind(owner_id.0)
                .execute(&self.pool)
                .await
                .map_err(storage_err("Failed to save project"))?;

        let id = ProjectId(result.last_insert_rowid());
        self.find_project(id)
            .await?
            .ok_or_else(|| RegistryError::project_not_found(id))
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>> {
        let row = sqlx::query(&format!("{} WHERE p.id = ?", PROJECT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err("Failed to get project"))?;

        Ok(row.as_ref().map(project_from_row))
    }

    async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "{} WHERE p.name = ? ORDER BY p.id ASC LIMIT 1",
            PROJECT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err("Failed to get project by name"))?;

        Ok(row.as_ref().map(project_from_row))
    }

    async fn list_projects(&self, page: PageRequest) -> Result<Page<Project>> {
        let total = self.count("projects").await?;
        let rows = sqlx::query(&format!(
            "{} ORDER BY p.id ASC LIMIT ? OFFSET ?",
            PROJECT_COLUMNS
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err("Failed to list projects"))?;

        Ok(Page::new(
            rows.iter().map(project_from_row).collect(),
            page,
            total,
        ))
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        sqlx::query("UPDATE projects SET name = ?, description = ?, user_id = ? WHERE id = ?")
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.owner_id.0)
            .bind(project.id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_err("Failed to update project"))?;

        self.find_project(project.id)
            .await?
            .ok_or_else(|| RegistryError::project_not_found(project.id))
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_err("Failed to delete project"))?;
        Ok(())
    }
}

#[async_trait]
impl TeamStore for SqliteStorage {
    async fn insert_team(
        &self,
        name: &str,
        description: Option<&str>,
        member_ids: &[UserId],
    ) -> Result<Team> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_err("Failed to begin transaction"))?;

        let result = sqlx::query("INSERT INTO appteams (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await
            .map_err(storage_err("Failed to save team"))?;
        let id = TeamId(result.last_insert_rowid());

        Self::write_members(&mut tx, id, member_ids).await?;

        tx.commit()
            .await
            .map_err(storage_err("Failed to commit team"))?;

        self.find_team(id)
            .await?
            .ok_or_else(|| RegistryError::team_not_found(id))
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>> {
        let row = sqlx::query("SELECT id, name, description FROM appteams WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err("Failed to get team"))?;

        match row {
            Some(row) => Ok(Some(self.team_from_row(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list_teams(&self, page: PageRequest) -> Result<Page<Team>> {
        let total = self.count("appteams").await?;
        let rows = sqlx::query(
            "SELECT id, name, description FROM appteams ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err("Failed to list teams"))?;

        let mut teams = Vec::with_capacity(rows.len());
        for row in &rows {
            teams.push(self.team_from_row(row).await?);
        }

        Ok(Page::new(teams, page, total))
    }

    async fn update_team(&self, team: &Team) -> Result<Team> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_err("Failed to begin transaction"))?;

        sqlx::query("UPDATE appteams SET name = ?, description = ? WHERE id = ?")
            .bind(&team.name)
            .bind(&team.description)
            .bind(team.id.0)
            .execute(&mut *tx)
            .await
            .map_err(storage_err("Failed to update team"))?;

        sqlx::query("DELETE FROM appteams_users WHERE appteam_id = ?")
            .bind(team.id.0)
            .execute(&mut *tx)
            .await
            .map_err(storage_err("Failed to clear team members"))?;

        Self::write_members(&mut tx, team.id, &team.member_ids()).await?;

        tx.commit()
            .await
            .map_err(storage_err("Failed to commit team"))?;

        self.find_team(team.id)
            .await?
            .ok_or_else(|| RegistryError::team_not_found(team.id))
    }

    async fn delete_team(&self, id: TeamId) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_err("Failed to begin transaction"))?;

        sqlx::query("DELETE FROM appteams_users WHERE appteam_id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(storage_err("Failed to delete team members"))?;

        sqlx::query("DELETE FROM appteams WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(storage_err("Failed to delete team"))?;

        tx.commit()
            .await
            .map_err(storage_err("Failed to commit team deletion"))
    }
}

#[async_trait]
impl ApplicationStore for SqliteStorage {
    async fn insert_application(
        &self,
        name: &str,
        description: Option<&str>,
        team_id: TeamId,
        project_id: ProjectId,
    ) -> Result<Application> {
        let result = sqlx::query(
            "INSERT INTO applications (name, description, appteam_id, project_id) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(team_id.0)
        .bind(project_id.0)
        .execute(&self.pool)
        .await
        .map_err(storage_err("Failed to save application"))?;

        Ok(Application {
            id: ApplicationId(result.last_insert_rowid()),
            name: name.to_string(),
            description: description.map(str::to_string),
            team_id,
            project_id,
        })
    }

    async fn find_application(&self, id: ApplicationId) -> Result<Option<Application>> {
        let row = sqlx::query(
            "SELECT id, name, description, appteam_id, project_id FROM applications WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err("Failed to get application"))?;

        Ok(row.as_ref().map(application_from_row))
    }

    async fn list_applications(&self, page: PageRequest) -> Result<Page<Application>> {
        let total = self.count("applications").await?;
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, appteam_id, project_id
            FROM applications
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err("Failed to list applications"))?;

        Ok(Page::new(
            rows.iter().map(application_from_row).collect(),
            page,
            total,
        ))
    }

    async fn update_application(&self, application: &Application) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE applications
            SET name = ?, description = ?, appteam_id = ?, project_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&application.name)
        .bind(&application.description)
        .bind(application.team_id.0)
        .bind(application.project_id.0)
        .bind(application.id.0)
        .execute(&self.pool)
        .await
        .map_err(storage_err("Failed to update application"))?;
        Ok(())
    }

    async fn delete_application(&self, id: ApplicationId) -> Result<()> {
        sqlx::query("DELETE FROM applications WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_err("Failed to delete application"))?;
        Ok(())
    }
}
