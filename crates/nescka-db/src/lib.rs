// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod seed;

pub use seed::seed_leads;

use anyhow::{Context, Result, anyhow, bail};
use nescka_app::{
    ChatAuthor, ChatMessage, ChatMessageId, DialogueTurn, DialogueTurnId, Lead, LeadAttribute,
    LeadFormInput, LeadId, Likelihood,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

pub const APP_NAME: &str = "nescka";
pub const DATA_DIR_ENV: &str = "NESCKA_DATA_DIR";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "leads",
        &[
            "id",
            "name",
            "source",
            "status",
            "priority",
            "message_summary",
            "next_action",
            "estimated_rate",
            "contract_duration",
            "conversion_likelihood",
            "ai_summary",
            "ai_recommendation",
        ],
    ),
    (
        "dialogue_turns",
        &["id", "lead_id", "sender", "message", "sent_at"],
    ),
    ("chat_messages", &["id", "author", "body", "created_at"]),
];

const LEAD_COLUMNS: &str = "
    id, name, source, status, priority, message_summary, next_action,
    estimated_rate, contract_duration, conversion_likelihood,
    ai_summary, ai_recommendation
";

/// Read access to the lead collection plus the (currently inert) add-lead path.
pub trait LeadRepository {
    fn list_leads(&self) -> Result<Vec<Lead>>;

    fn get_lead(&self, lead_id: LeadId) -> Result<Option<Lead>>;

    /// Accepts a submitted add-lead form. The collection is never modified.
    fn submit_lead_form(&self, input: &LeadFormInput) -> Result<()>;
}

/// Plain in-memory lead collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedLeads(pub Vec<Lead>);

impl Default for SeedLeads {
    fn default() -> Self {
        Self(seed_leads())
    }
}

impl LeadRepository for SeedLeads {
    fn list_leads(&self) -> Result<Vec<Lead>> {
        Ok(self.0.clone())
    }

    fn get_lead(&self, lead_id: LeadId) -> Result<Option<Lead>> {
        Ok(self.0.iter().find(|lead| lead.id == lead_id).cloned())
    }

    fn submit_lead_form(&self, input: &LeadFormInput) -> Result<()> {
        tracing::debug!(name = %input.name, "add-lead form submitted; not persisted");
        Ok(())
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    /// Insert the seed pipeline. Rows that already exist are left alone.
    pub fn seed_demo_data(&self) -> Result<()> {
        for lead in seed_leads() {
            self.insert_lead(&lead)?;
        }
        Ok(())
    }

    fn insert_lead(&self, lead: &Lead) -> Result<()> {
        self.conn
            .execute(
                "
                INSERT OR IGNORE INTO leads (
                  id, name, source, status, priority, message_summary, next_action,
                  estimated_rate, contract_duration, conversion_likelihood,
                  ai_summary, ai_recommendation
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
                params![
                    lead.id.get(),
                    lead.name,
                    lead.source.label(),
                    lead.status.label(),
                    lead.priority.label(),
                    lead.message_summary,
                    lead.next_action,
                    lead.estimated_rate,
                    lead.contract_duration,
                    lead.conversion_likelihood.map(Likelihood::get),
                    lead.ai_summary,
                    lead.ai_recommendation,
                ],
            )
            .with_context(|| format!("insert seed lead {}", lead.name))?;

        for turn in &lead.dialogue {
            self.conn
                .execute(
                    "
                    INSERT OR IGNORE INTO dialogue_turns (id, lead_id, sender, message, sent_at)
                    VALUES (?, ?, ?, ?, ?)
                    ",
                    params![
                        turn.id.get(),
                        lead.id.get(),
                        turn.sender,
                        turn.message,
                        format_turn_time(turn.sent_at)?,
                    ],
                )
                .with_context(|| format!("insert dialogue turn {} for {}", turn.id, lead.name))?;
        }
        Ok(())
    }

    pub fn list_leads(&self) -> Result<Vec<Lead>> {
        let mut dialogue = self.load_dialogue(None)?;
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY id ASC");
        let mut stmt = self.conn.prepare(&sql).context("prepare leads query")?;
        let rows = stmt.query_map([], decode_lead).context("query leads")?;
        let mut leads = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect leads")?;
        for lead in &mut leads {
            lead.dialogue = dialogue.remove(&lead.id.get()).unwrap_or_default();
        }
        Ok(leads)
    }

    pub fn get_lead(&self, lead_id: LeadId) -> Result<Option<Lead>> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?");
        let lead = self
            .conn
            .query_row(&sql, params![lead_id.get()], decode_lead)
            .optional()
            .with_context(|| format!("load lead {lead_id}"))?;
        let Some(mut lead) = lead else {
            return Ok(None);
        };
        lead.dialogue = self
            .load_dialogue(Some(lead_id))?
            .remove(&lead_id.get())
            .unwrap_or_default();
        Ok(Some(lead))
    }

    fn load_dialogue(&self, lead_id: Option<LeadId>) -> Result<BTreeMap<i64, Vec<DialogueTurn>>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT id, lead_id, sender, message, sent_at
                FROM dialogue_turns
                WHERE ?1 IS NULL OR lead_id = ?1
                ORDER BY lead_id ASC, id ASC
                ",
            )
            .context("prepare dialogue query")?;
        let rows = stmt
            .query_map(params![lead_id.map(LeadId::get)], |row| {
                let sent_at_raw: String = row.get(4)?;
                let turn = DialogueTurn {
                    id: DialogueTurnId::new(row.get(0)?),
                    sender: row.get(2)?,
                    message: row.get(3)?,
                    sent_at: parse_turn_time(&sent_at_raw).map_err(to_sql_error)?,
                };
                Ok((row.get::<_, i64>(1)?, turn))
            })
            .context("query dialogue turns")?;

        let mut grouped: BTreeMap<i64, Vec<DialogueTurn>> = BTreeMap::new();
        for row in rows {
            let (owner, turn) = row.context("decode dialogue turn")?;
            grouped.entry(owner).or_default().push(turn);
        }
        Ok(grouped)
    }

    pub fn append_chat_message(&self, author: ChatAuthor, body: &str) -> Result<ChatMessage> {
        let created_at = OffsetDateTime::now_utc();
        let created_at_raw = created_at
            .format(&Rfc3339)
            .context("format chat timestamp")?;
        self.conn
            .execute(
                "INSERT INTO chat_messages (author, body, created_at) VALUES (?, ?, ?)",
                params![author.as_str(), body, created_at_raw],
            )
            .context("insert chat message")?;
        Ok(ChatMessage {
            id: ChatMessageId::new(self.conn.last_insert_rowid()),
            author,
            body: body.to_owned(),
            created_at,
        })
    }

    pub fn load_transcript(&self) -> Result<Vec<ChatMessage>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, author, body, created_at FROM chat_messages ORDER BY id ASC")
            .context("prepare transcript query")?;

        let rows = stmt
            .query_map([], |row| {
                let author_raw: String = row.get(1)?;
                let author = ChatAuthor::parse(&author_raw).ok_or_else(|| {
                    invalid_column(1, format!("unknown chat author {author_raw}"))
                })?;
                let created_at_raw: String = row.get(3)?;
                Ok(ChatMessage {
                    id: ChatMessageId::new(row.get(0)?),
                    author,
                    body: row.get(2)?,
                    created_at: OffsetDateTime::parse(&created_at_raw, &Rfc3339)
                        .with_context(|| format!("parse chat timestamp {created_at_raw:?}"))
                        .map_err(to_sql_error)?,
                })
            })
            .context("query transcript")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect transcript")
    }

    pub fn submit_lead_form(&self, input: &LeadFormInput) -> Result<()> {
        tracing::debug!(name = %input.name, "add-lead form submitted; not persisted");
        Ok(())
    }
}

impl LeadRepository for Store {
    fn list_leads(&self) -> Result<Vec<Lead>> {
        Store::list_leads(self)
    }

    fn get_lead(&self, lead_id: LeadId) -> Result<Option<Lead>> {
        Store::get_lead(self, lead_id)
    }

    fn submit_lead_form(&self, input: &LeadFormInput) -> Result<()> {
        Store::submit_lead_form(self, input)
    }
}

/// Directory for logs and exported reports, created on demand.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(override_dir) = env::var_os(DATA_DIR_ENV) {
        let dir = PathBuf::from(override_dir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("create data directory {}", dir.display()))?;
        return Ok(dir);
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {DATA_DIR_ENV} to a writable directory")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

fn decode_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let likelihood_raw: Option<i64> = row.get(9)?;
    Ok(Lead {
        id: LeadId::new(row.get(0)?),
        name: row.get(1)?,
        source: decode_attribute(row, 2, "source")?,
        status: decode_attribute(row, 3, "status")?,
        priority: decode_attribute(row, 4, "priority")?,
        message_summary: row.get(5)?,
        next_action: row.get(6)?,
        estimated_rate: row.get(7)?,
        contract_duration: row.get(8)?,
        conversion_likelihood: decode_likelihood(likelihood_raw).map_err(to_sql_error)?,
        ai_summary: row.get(10)?,
        ai_recommendation: row.get(11)?,
        dialogue: Vec::new(),
    })
}

fn decode_attribute<T: LeadAttribute>(
    row: &Row<'_>,
    column: usize,
    what: &str,
) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    T::parse(&raw).ok_or_else(|| invalid_column(column, format!("unknown lead {what} {raw}")))
}

fn decode_likelihood(raw: Option<i64>) -> Result<Option<Likelihood>> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let likelihood = u8::try_from(value).ok().and_then(Likelihood::new);
    match likelihood {
        Some(likelihood) => Ok(Some(likelihood)),
        None => bail!("conversion likelihood {value} is outside 0..=100"),
    }
}

fn format_turn_time(value: PrimitiveDateTime) -> Result<String> {
    value
        .format(&format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .context("format dialogue timestamp")
}

fn parse_turn_time(raw: &str) -> Result<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day] [hour]:[minute]"),
    )
    .with_context(|| format!("unsupported dialogue timestamp {raw:?}"))
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; start from an empty database or recreate it"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; recreate the database before launching",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .context("configure sqlite pragmas")
}

fn invalid_column(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

fn to_sql_error(error: anyhow::Error) -> rusqlite::Error {
    invalid_column(0, format!("{error:#}"))
}
