//! DDL 생성기
//!
//! Catalog의 테이블과 UDT 레지스트리를 읽어 DDL 문 목록을 만듭니다.
//! 생성은 I/O 없는 순수 함수이며, 같은 입력에 대해 항상 같은 결과를 냅니다.
//!
//! # 출력 순서
//!
//! 1. `CREATE TYPE` (레지스트리 선언 순서, 사용된 타입만)
//! 2. `CREATE TABLE` (테이블 선언 순서)

use serde::Serialize;

use cqlkit_core::schema::{
    is_identifier, Catalog, ClusteringOrder, TableDefinition, UdtRef, UdtRegistry,
};
use cqlkit_core::{Error, Result};

/// 생성된 DDL 묶음
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaPlan {
    /// 대상 keyspace
    pub keyspace: String,

    /// `CREATE TYPE` 문들
    pub types: Vec<String>,

    /// `CREATE TABLE` 문들
    pub tables: Vec<String>,
}

impl SchemaPlan {
    /// 실행 순서대로 모든 문 (타입 먼저)
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .chain(self.tables.iter())
            .map(String::as_str)
    }

    pub fn into_statements(self) -> Vec<String> {
        let mut statements = self.types;
        statements.extend(self.tables);
        statements
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.tables.is_empty()
    }
}

/// 한 테이블의 컬럼 스캔 결과
#[derive(Debug, Default)]
struct ColumnScan<'a> {
    definitions: Vec<String>,
    partition_keys: Vec<&'a str>,
    clustering_keys: Vec<(&'a str, ClusteringOrder)>,
    udts: Vec<&'a UdtRef>,
}

pub struct DdlGenerator;

impl DdlGenerator {
    /// Catalog 전체에 대한 DDL 생성
    pub fn generate(keyspace: &str, catalog: &Catalog) -> Result<SchemaPlan> {
        Self::generate_tables(keyspace, catalog.types(), catalog.tables().tables())
    }

    /// 주어진 테이블들에 대한 DDL 생성
    pub fn generate_tables(
        keyspace: &str,
        types: &UdtRegistry,
        tables: &[TableDefinition],
    ) -> Result<SchemaPlan> {
        if !is_identifier(keyspace) {
            return Err(Error::InvalidName {
                name: keyspace.to_string(),
                reason: "keyspace name must be a plain identifier".to_string(),
            });
        }

        let mut found_udts = Vec::new();
        let mut table_statements = Vec::with_capacity(tables.len());

        for table in tables {
            let (statement, udts) = Self::create_table(keyspace, table)?;
            tracing::debug!("Synthesized {}", statement);
            found_udts.extend(udts);
            table_statements.push(statement);
        }

        // 테이블이 참조하는 타입이 먼저 존재해야 하므로 타입 문을 앞에 둔다.
        // 레지스트리에 없는 타입을 참조하면 InvalidType으로 실패
        let type_statements = types.render_create_statements(keyspace, &found_udts)?;

        Ok(SchemaPlan {
            keyspace: keyspace.to_string(),
            types: type_statements,
            tables: table_statements,
        })
    }

    /// 단일 테이블의 `CREATE TABLE` 문과 참조 UDT 목록
    pub fn create_table(keyspace: &str, table: &TableDefinition) -> Result<(String, Vec<UdtRef>)> {
        let scan = Self::scan_columns(table)?;

        if scan.partition_keys.is_empty() {
            return Err(Error::MissingPartitionKey {
                table: table.name.clone(),
            });
        }

        let primary_key = Self::primary_key(&scan.partition_keys, &scan.clustering_keys);
        let ordering = Self::clustering_order(&table.name, &scan.clustering_keys)?;

        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {}.{}({}) {}{};",
            keyspace,
            table.name,
            scan.definitions.join(", "),
            primary_key,
            ordering
        );

        Ok((statement, scan.udts.into_iter().cloned().collect()))
    }

    fn scan_columns(table: &TableDefinition) -> Result<ColumnScan<'_>> {
        let mut scan = ColumnScan::default();

        for (name, column) in &table.columns {
            if column.is_partition_key() {
                scan.partition_keys.push(name.as_str());
            } else if let Some(order) = column.clustering_order() {
                scan.clustering_keys.push((name.as_str(), order));
            }

            if column.datatype.non_frozen_nesting().is_some() {
                return Err(Error::NonFrozenNesting {
                    table: table.name.clone(),
                    column: name.clone(),
                    signature: column.datatype.typename(),
                });
            }

            scan.udts.extend(column.datatype.referenced_udts());
            scan.definitions.push(column.definition(name));
        }

        Ok(scan)
    }

    /// `PRIMARY KEY (pk[, ck...])`, 복합 파티션 키는 괄호로 묶음
    fn primary_key(partition_keys: &[&str], clustering_keys: &[(&str, ClusteringOrder)]) -> String {
        let partition = partition_keys.join(", ");
        let partition = if partition_keys.len() > 1 {
            format!("({})", partition)
        } else {
            partition
        };

        if clustering_keys.is_empty() {
            format!("PRIMARY KEY ({})", partition)
        } else {
            let clustering = clustering_keys
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ");
            format!("PRIMARY KEY ({}, {})", partition, clustering)
        }
    }

    /// ` WITH CLUSTERING ORDER BY (...)`, 정렬이 지정된 컬럼이 없으면 빈 문자열
    ///
    /// 정렬 미지정 컬럼 뒤에 정렬 지정 컬럼이 오면 에러입니다.
    fn clustering_order(table: &str, clustering_keys: &[(&str, ClusteringOrder)]) -> Result<String> {
        let mut entries = Vec::new();
        let mut undefined_since: Option<&str> = None;

        for &(name, order) in clustering_keys {
            match order.keyword() {
                Some(keyword) => {
                    if let Some(previous) = undefined_since {
                        return Err(Error::InconsistentClusteringOrder {
                            table: table.to_string(),
                            column: name.to_string(),
                            previous: previous.to_string(),
                        });
                    }
                    entries.push(format!("{} {}", name, keyword));
                }
                None => {
                    undefined_since.get_or_insert(name);
                }
            }
        }

        if entries.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WITH CLUSTERING ORDER BY ({})", entries.join(", ")))
        }
    }
}
