//! 스키마 모델
//!
//! # 개요
//!
//! CQL keyspace에 생성할 UDT와 테이블을 타입 안전하게 선언하는 모델입니다.
//! 선언은 `Catalog`에 누적되고, DDL 생성은 `cqlkit-cql` 크레이트가 담당합니다.
//!
//! # 모듈 구조
//!
//! - `types`: 스토리지 타입 (scalar, list/set/map, UDT)과 시그니처 렌더링/파싱
//! - `udt`: UDT 레지스트리
//! - `column`: 컬럼 정의 (파티션/클러스터링/static)
//! - `table`: 테이블 정의 및 레지스트리
//! - `catalog`: UDT + 테이블 레지스트리 묶음
//! - `parser`: YAML 선언 파싱

mod catalog;
mod column;
mod parser;
mod table;
mod types;
mod udt;

pub use catalog::Catalog;
pub use column::{ClusteringOrder, Column, ColumnRole};
pub use parser::SchemaParser;
pub use table::{TableDeclaration, TableDefinition, TableRegistry};
pub use types::{ScalarType, StorageType, TypeKind};
pub use udt::{is_identifier, UdtId, UdtRef, UdtRegistry, UserDefinedType};
