//! Database module - SQLite storage for profiles, program versions and set logs
//!
//! The store owns the "exactly one active version per user" invariant: the
//! deactivate/insert pair runs in one transaction, and a partial unique index
//! rejects a second active row outright.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use clap::ValueEnum;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::suggestion::{SetRating, Suggestion};
use crate::engine::weekly::{WeeklyCheckIn, WeeklyDecision};
use crate::profile::Profile;
use crate::program::{ChangeType, NewProgramVersion, ProgramData, ProgramVersion, VersionTransition};

/// One logged set, with the suggestion shown for the next one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLog {
    pub id: Option<i64>,
    pub user_id: String,
    pub logged_at: DateTime<Utc>,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub rating: SetRating,
    pub ai_suggestion: Option<Suggestion>,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

const VERSION_COLUMNS: &str = "id, user_id, version_number, program_data, active, created_at, reason_for_change, change_type";

type VersionRow = (i64, String, u32, String, bool, String, Option<String>, String);

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                profile TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS program_versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                version_number INTEGER NOT NULL,
                program_data TEXT NOT NULL,
                active INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                reason_for_change TEXT,
                change_type TEXT NOT NULL,
                UNIQUE (user_id, version_number)
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_program_versions_one_active
                ON program_versions (user_id) WHERE active = 1;

            CREATE TABLE IF NOT EXISTS set_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                logged_at TEXT NOT NULL,
                exercise TEXT NOT NULL,
                weight REAL NOT NULL,
                reps INTEGER NOT NULL,
                difficulty TEXT NOT NULL,
                form_quality TEXT NOT NULL,
                ai_suggestion TEXT
            );

            CREATE TABLE IF NOT EXISTS checkins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                adherence REAL NOT NULL,
                total_volume REAL NOT NULL,
                difficulty INTEGER NOT NULL,
                recovery INTEGER NOT NULL,
                stress INTEGER NOT NULL,
                action TEXT NOT NULL,
                reason TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    pub fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles (user_id, profile, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET profile = excluded.profile, updated_at = excluded.updated_at",
            params![user_id, serde_json::to_string(profile)?, timestamp(Utc::now())],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT profile FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).context("Stored profile is corrupt"))
            .transpose()
    }

    // ------------------------------------------------------------------
    // Program versions
    // ------------------------------------------------------------------

    /// Store version 1 for a user who has no history yet
    pub fn create_initial_version(&self, user_id: &str, program_data: ProgramData) -> Result<ProgramVersion> {
        let existing: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM program_versions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            bail!("User {} already has a program", user_id);
        }

        let version = NewProgramVersion::initial(user_id, program_data);
        let id = insert_version(&self.conn, &version)?;
        info!(user_id, id, "Stored initial program version");
        self.version_by_id(id)
    }

    pub fn active_version(&self, user_id: &str) -> Result<Option<ProgramVersion>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM program_versions WHERE user_id = ?1 AND active = 1",
                    VERSION_COLUMNS
                ),
                params![user_id],
                read_version_row,
            )
            .optional()?;
        row.map(version_from_row).transpose()
    }

    fn version_by_id(&self, id: i64) -> Result<ProgramVersion> {
        let row = self.conn.query_row(
            &format!("SELECT {} FROM program_versions WHERE id = ?1", VERSION_COLUMNS),
            params![id],
            read_version_row,
        )?;
        version_from_row(row)
    }

    /// Flip the old version inactive and insert the new one, atomically
    ///
    /// Fails without side effects if the old version is no longer active,
    /// which is how a second concurrent weekly analysis gets rejected.
    pub fn commit_transition(&self, transition: &VersionTransition) -> Result<ProgramVersion> {
        let tx = self.conn.unchecked_transaction()?;
        let id = swap_active_version(&tx, transition)?;
        tx.commit()?;

        log_committed(transition);
        self.version_by_id(id)
    }

    /// Record a weekly check-in and advance the program in one transaction
    ///
    /// Either both the check-in row and the new version land, or neither does.
    pub fn commit_weekly_checkin(
        &self,
        transition: &VersionTransition,
        checkin: &WeeklyCheckIn,
        decision: &WeeklyDecision,
    ) -> Result<ProgramVersion> {
        let tx = self.conn.unchecked_transaction()?;
        let id = swap_active_version(&tx, transition)?;
        insert_checkin(&tx, &transition.new_version.user_id, checkin, decision)
            .context("Failed to record check-in")?;
        tx.commit()?;

        log_committed(transition);
        self.version_by_id(id)
    }

    /// Overwrite the active version's tree without a new version (exercise swaps)
    pub fn patch_active_program(&self, user_id: &str, program_data: &ProgramData) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE program_versions SET program_data = ?1 WHERE user_id = ?2 AND active = 1",
            params![program_data.to_json()?, user_id],
        )?;
        if changed == 0 {
            bail!("No active program for {}", user_id);
        }
        Ok(())
    }

    /// All versions for a user, oldest first
    pub fn history(&self, user_id: &str) -> Result<Vec<ProgramVersion>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM program_versions WHERE user_id = ?1 ORDER BY version_number",
            VERSION_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![user_id], read_version_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(version_from_row).collect()
    }

    // ------------------------------------------------------------------
    // Set logs and check-ins
    // ------------------------------------------------------------------

    pub fn log_set(&self, log: &SetLog) -> Result<i64> {
        let suggestion = log.ai_suggestion.as_ref().map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT INTO set_logs (user_id, logged_at, exercise, weight, reps, difficulty, form_quality, ai_suggestion)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                log.user_id,
                timestamp(log.logged_at),
                log.exercise,
                log.weight,
                log.reps,
                enum_to_sql(&log.rating.difficulty)?,
                enum_to_sql(&log.rating.form_quality)?,
                suggestion,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Logged sets for one exercise, oldest first
    pub fn set_logs(&self, user_id: &str, exercise: &str) -> Result<Vec<SetLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, logged_at, exercise, weight, reps, difficulty, form_quality, ai_suggestion
             FROM set_logs WHERE user_id = ?1 AND exercise = ?2 COLLATE NOCASE
             ORDER BY logged_at, id",
        )?;
        let rows = stmt
            .query_map(params![user_id, exercise], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, Option<String>>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(id, user_id, logged_at, exercise, weight, reps, difficulty, form, suggestion)| -> Result<SetLog> {
                    Ok(SetLog {
                        id: Some(id),
                        user_id,
                        logged_at: parse_timestamp(&logged_at)
                            .with_context(|| format!("Set log {} has a corrupt timestamp", id))?,
                        exercise,
                        weight,
                        reps,
                        rating: SetRating {
                            difficulty: enum_from_sql(&difficulty)?,
                            form_quality: enum_from_sql(&form)?,
                        },
                        ai_suggestion: suggestion
                            .map(|s| serde_json::from_str(&s))
                            .transpose()?,
                    })
                },
            )
            .collect()
    }

    /// Sum of weight × reps over the 7 days before `now`
    pub fn weekly_volume(&self, user_id: &str, now: DateTime<Utc>) -> Result<f64> {
        let since = timestamp(now - Duration::days(7));
        let volume: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(weight * reps), 0.0) FROM set_logs
             WHERE user_id = ?1 AND logged_at >= ?2 AND logged_at <= ?3",
            params![user_id, since, timestamp(now)],
            |row| row.get(0),
        )?;
        Ok(volume)
    }

}

/// Flip the old version inactive and insert the new one on an open transaction
fn swap_active_version(conn: &Connection, transition: &VersionTransition) -> Result<i64> {
    let new = &transition.new_version;
    let changed = conn.execute(
        "UPDATE program_versions SET active = 0 WHERE id = ?1 AND user_id = ?2 AND active = 1",
        params![transition.deactivate_id, new.user_id],
    )?;
    if changed != 1 {
        bail!(
            "Version {} is not the active version for {}",
            transition.deactivate_id,
            new.user_id
        );
    }

    insert_version(conn, new).context("Failed to insert new program version")
}

fn log_committed(transition: &VersionTransition) {
    let new = &transition.new_version;
    info!(
        user_id = %new.user_id,
        version = new.version_number,
        change_type = %new.change_type,
        "Committed program version"
    );
}

fn insert_checkin(
    conn: &Connection,
    user_id: &str,
    checkin: &WeeklyCheckIn,
    decision: &WeeklyDecision,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO checkins (user_id, created_at, adherence, total_volume, difficulty, recovery, stress, action, reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user_id,
            timestamp(Utc::now()),
            checkin.adherence,
            checkin.total_volume,
            checkin.difficulty,
            checkin.recovery,
            checkin.stress,
            decision.action.to_string(),
            enum_to_sql(&decision.reason)?,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_version(conn: &Connection, version: &NewProgramVersion) -> Result<i64> {
    conn.execute(
        "INSERT INTO program_versions
            (user_id, version_number, program_data, active, created_at, reason_for_change, change_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            version.user_id,
            version.version_number,
            version.program_data.to_json()?,
            version.active,
            timestamp(Utc::now()),
            version.reason_for_change,
            version.change_type.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn read_version_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VersionRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn version_from_row(row: VersionRow) -> Result<ProgramVersion> {
    let (id, user_id, version_number, data, active, created_at, reason, change_type) = row;
    let program_data = ProgramData::from_json(&data)
        .with_context(|| format!("Program version {} has corrupt program_data", id))?;
    let change_type: ChangeType = change_type.parse().map_err(anyhow::Error::msg)?;

    Ok(ProgramVersion {
        id,
        user_id,
        version_number,
        program_data,
        active,
        created_at: parse_timestamp(&created_at)
            .with_context(|| format!("Program version {} has a corrupt created_at", id))?,
        reason_for_change: reason,
        change_type,
    })
}

/// Fixed-width UTC timestamps so text comparison matches time order
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp: {:?}", s))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Store a unit enum under its snake_case name ("too_easy", "poor", ...)
fn enum_to_sql<T: ValueEnum>(value: &T) -> Result<String> {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .context("Enum value has no stored name")
}

fn enum_from_sql<T: ValueEnum>(s: &str) -> Result<T> {
    T::from_str(s, false).map_err(anyhow::Error::msg)
}
