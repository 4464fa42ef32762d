//! 테이블 정의 및 레지스트리
//!
//! 테이블 선언을 받아 컬럼 맵을 만들고, 외부 이름 중복을 검사한 뒤
//! 선언 순서대로 보관합니다. 이 순서가 DDL 출력 순서가 됩니다.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::column::Column;
use super::udt::is_identifier;
use crate::error::{Error, Result};

/// 테이블 정의
#[derive(Debug, Clone, Serialize)]
pub struct TableDefinition {
    /// 외부 테이블 이름
    pub name: String,

    /// 컬럼 맵 (선언 순서 = DDL 컬럼 순서 = 클러스터링 키 순서)
    pub columns: IndexMap<String, Column>,
}

impl TableDefinition {
    /// 컬럼 조회
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// 파티션 키 컬럼들 (선언 순서)
    pub fn partition_keys(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns
            .iter()
            .filter(|(_, column)| column.is_partition_key())
            .map(|(name, column)| (name.as_str(), column))
    }

    /// 클러스터링 키 컬럼들 (선언 순서)
    pub fn clustering_keys(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns
            .iter()
            .filter(|(_, column)| column.is_clustering_key())
            .map(|(name, column)| (name.as_str(), column))
    }
}

/// 테이블 선언
///
/// 선언 타입 이름과 (컬럼 이름, 컬럼) 목록을 선언 순서대로 담습니다.
#[derive(Debug, Clone)]
pub struct TableDeclaration {
    type_name: String,
    name: Option<String>,
    columns: Vec<(String, Column)>,
}

impl TableDeclaration {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
            columns: Vec::new(),
        }
    }

    /// 외부 테이블 이름 지정 (생략 시 선언 타입 이름)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 컬럼 추가
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    /// 외부 테이블 이름
    pub fn table_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_name)
    }

    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }
}

/// 테이블 레지스트리
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TableRegistry {
    tables: Vec<TableDefinition>,
    #[serde(skip)]
    names: HashSet<String>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 테이블 선언 등록
    pub fn declare(&mut self, declaration: TableDeclaration) -> Result<&TableDefinition> {
        let name = declaration.table_name().to_string();
        if !is_identifier(&name) {
            return Err(Error::invalid_name(name, "table name must be a plain identifier"));
        }

        let mut columns: IndexMap<String, Column> = IndexMap::new();
        for (column_name, column) in declaration.columns {
            if !is_identifier(&column_name) {
                return Err(Error::invalid_column(
                    &name,
                    column_name,
                    "column name must be a plain identifier",
                ));
            }
            if columns.keys().any(|existing: &String| existing.eq_ignore_ascii_case(&column_name)) {
                return Err(Error::invalid_column(&name, column_name, "duplicate column"));
            }
            columns.insert(column_name, column);
        }

        // 테이블 이름 중복 검사 (unquoted 이름은 소문자로 접힘)
        if !self.names.insert(name.to_ascii_lowercase()) {
            return Err(Error::DuplicateTable { name });
        }

        tracing::debug!("Declared table {} with {} columns", name, columns.len());

        self.tables.push(TableDefinition { name, columns });
        Ok(&self.tables[self.tables.len() - 1])
    }

    /// 테이블 조회
    pub fn get(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// 테이블 존재 여부 (대소문자 무시)
    pub fn has_table(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    /// 선언 순서대로 모든 테이블
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    /// 모든 테이블 이름 (선언 순서)
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
