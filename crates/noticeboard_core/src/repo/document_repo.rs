//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/get/query APIs over schema-flexible collections.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Document ids are generated here (UUID v4), never accepted from callers.
//! - Range filters only match fields whose stored type equals the bound type.
//! - String comparison is by code point (SQLite `BINARY` over UTF-8).
//! - Query results keep insertion order; the store applies no sort.

use crate::db::DbError;
use crate::repo::document::{Document, DocumentFields, DocumentId, FieldValue};
use crate::repo::query::{CollectionQuery, FieldFilter};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name regex"));

const DOCUMENT_SELECT_SQL: &str = "SELECT id, body FROM documents";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Collection or field name outside `[A-Za-z_][A-Za-z0-9_]*`.
    InvalidName {
        kind: &'static str,
        name: String,
    },
    /// Query cannot be executed as written.
    InvalidQuery(String),
    /// Stored row cannot be decoded.
    InvalidData(String),
    /// Document body cannot be encoded.
    Encoding(serde_json::Error),
    /// Connection is missing the schema this repository needs.
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidName { kind, name } => write!(f, "invalid {kind} name `{name}`"),
            Self::InvalidQuery(message) => write!(f, "invalid query: {message}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::Encoding(err) => write!(f, "failed to encode document: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for document collections.
pub trait DocumentRepository {
    /// Inserts one document and returns its store-assigned id.
    fn insert_document(&self, collection: &str, fields: &DocumentFields)
        -> RepoResult<DocumentId>;
    /// Gets one document by id within `collection`.
    fn get_document(&self, collection: &str, id: DocumentId) -> RepoResult<Option<Document>>;
    /// Runs a filtered read; all filters must hold.
    fn query_documents(&self, query: &CollectionQuery) -> RepoResult<Vec<Document>>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections that do not carry the `documents` schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn insert_document(
        &self,
        collection: &str,
        fields: &DocumentFields,
    ) -> RepoResult<DocumentId> {
        validate_name("collection", collection)?;
        for field in fields.keys() {
            validate_name("field", field)?;
        }

        let body = serde_json::to_string(fields).map_err(RepoError::Encoding)?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO documents (id, collection, body) VALUES (?1, ?2, ?3);",
            params![id.to_string(), collection, body],
        )?;

        Ok(id)
    }

    fn get_document(&self, collection: &str, id: DocumentId) -> RepoResult<Option<Document>> {
        validate_name("collection", collection)?;

        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE collection = ?1
               AND id = ?2;"
        ))?;
        let mut rows = stmt.query(params![collection, id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }

        Ok(None)
    }

    fn query_documents(&self, query: &CollectionQuery) -> RepoResult<Vec<Document>> {
        validate_name("collection", &query.collection)?;

        let mut sql = format!("{DOCUMENT_SELECT_SQL} WHERE collection = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.collection.clone())];

        for filter in &query.filters {
            push_filter_clause(&mut sql, &mut bind_values, filter)?;
        }

        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }

        Ok(documents)
    }
}

fn push_filter_clause(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    filter: &FieldFilter,
) -> RepoResult<()> {
    validate_name("field", &filter.field)?;
    let operator = filter.op.sql_operator();
    let field = filter.field.as_str();

    match &filter.value {
        FieldValue::Null => {
            return Err(RepoError::InvalidQuery(format!(
                "field `{field}` cannot be compared against null"
            )));
        }
        FieldValue::Boolean(value) => {
            sql.push_str(&format!(" AND json_extract(body, ?) {operator} ?"));
            bind_values.push(Value::Text(format!("$.{field}.boolean")));
            bind_values.push(Value::Integer(i64::from(*value)));
        }
        FieldValue::Integer(value) => {
            sql.push_str(&format!(" AND json_extract(body, ?) {operator} ?"));
            bind_values.push(Value::Text(format!("$.{field}.integer")));
            bind_values.push(Value::Integer(*value));
        }
        FieldValue::String(value) => {
            sql.push_str(&format!(" AND json_extract(body, ?) {operator} ?"));
            bind_values.push(Value::Text(format!("$.{field}.string")));
            bind_values.push(Value::Text(value.clone()));
        }
        FieldValue::Timestamp(value) => {
            sql.push_str(&format!(
                " AND (json_extract(body, ?) * 1000000 + json_extract(body, ?) / 1000) {operator} ?"
            ));
            bind_values.push(Value::Text(format!("$.{field}.timestamp.seconds")));
            bind_values.push(Value::Text(format!("$.{field}.timestamp.nanos")));
            bind_values.push(Value::Integer(value.as_micros()));
        }
    }

    Ok(())
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in documents.id"))
    })?;

    let body: String = row.get("body")?;
    let fields = serde_json::from_str::<DocumentFields>(&body).map_err(|err| {
        RepoError::InvalidData(format!("undecodable body for document `{id_text}`: {err}"))
    })?;

    Ok(Document { id, fields })
}

fn validate_name(kind: &'static str, name: &str) -> RepoResult<()> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(RepoError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "documents")? {
        return Err(RepoError::MissingRequiredTable("documents"));
    }

    for column in ["id", "collection", "body"] {
        if !table_has_column(conn, "documents", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "documents",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::validate_name;

    #[test]
    fn validate_name_accepts_identifiers() {
        assert!(validate_name("field", "publicationDate").is_ok());
        assert!(validate_name("collection", "_notices2").is_ok());
    }

    #[test]
    fn validate_name_rejects_path_syntax() {
        assert!(validate_name("field", "title.string").is_err());
        assert!(validate_name("field", "").is_err());
        assert!(validate_name("field", "$[0]").is_err());
    }
}
