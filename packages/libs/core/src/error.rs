//! 공통 에러 타입
//!
//! 스키마 선언과 DDL 합성 과정에서 발생하는 에러를 정의합니다.
//! 모두 선언 시점의 프로그래밍 에러이며, 부분 복구 없이 즉시 실패합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// cqlkit 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Declaration Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid type '{type_name}': {reason}")]
    InvalidType { type_name: String, reason: String },

    #[error("invalid column '{column}' in table '{table}': {reason}")]
    InvalidColumn {
        table: String,
        column: String,
        reason: String,
    },

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Table {name} conflicts a table with the same name")]
    DuplicateTable { name: String },

    #[error("User defined type {name} conflicts a type with the same name")]
    DuplicateType { name: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Synthesis Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("Table {table} doesn't have a partition key")]
    MissingPartitionKey { table: String },

    #[error(
        "Column {column} of table {table} can't be used in clustering ordering because previous \
         column {previous} ordering is undefined. Add an ordering for {previous} or swap the \
         columns initialization order in {table}"
    )]
    InconsistentClusteringOrder {
        table: String,
        column: String,
        previous: String,
    },

    #[error("column '{column}' of table '{table}' nests a non-frozen type inside a collection: {signature}")]
    NonFrozenNesting {
        table: String,
        column: String,
        signature: String,
    },

    // ─────────────────────────────────────────────────────────────────────────────
    // Parse/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema parse error: {message}")]
    SchemaParse { message: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// 에러 코드 (CLI 출력용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidType { .. } => "INVALID_TYPE",
            Error::InvalidColumn { .. } => "INVALID_COLUMN",
            Error::InvalidName { .. } => "INVALID_NAME",
            Error::DuplicateTable { .. } => "DUPLICATE_TABLE",
            Error::DuplicateType { .. } => "DUPLICATE_TYPE",
            Error::MissingPartitionKey { .. } => "MISSING_PARTITION_KEY",
            Error::InconsistentClusteringOrder { .. } => "INCONSISTENT_CLUSTERING_ORDER",
            Error::NonFrozenNesting { .. } => "NON_FROZEN_NESTING",
            Error::SchemaParse { .. } => "SCHEMA_PARSE_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
        }
    }

    /// 선언 자체가 잘못된 경우 (합성 이전 단계)
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidType { .. }
                | Error::InvalidColumn { .. }
                | Error::InvalidName { .. }
                | Error::DuplicateTable { .. }
                | Error::DuplicateType { .. }
                | Error::SchemaParse { .. }
                | Error::Yaml(_)
        )
    }

    pub(crate) fn invalid_type(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_column(
        table: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidColumn {
            table: table.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }
}
