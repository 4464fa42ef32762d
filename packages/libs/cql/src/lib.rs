//! cqlkit-cql: CQL DDL 생성 및 적용 라이브러리
//!
//! Catalog를 기반으로 `CREATE TYPE` / `CREATE TABLE` 문을 결정적인 순서로 생성하고,
//! 외부 실행기(`SchemaApplier`)를 통해 순서대로 적용합니다.
//!
//! # 모듈 구조
//!
//! - `ddl`: DDL 생성기
//! - `apply`: 스키마 적용 (실행기 trait, `create_all`)

pub mod apply;
pub mod ddl;

pub use apply::{apply_plan, create_all, ApplyError, RecordingApplier, SchemaApplier};
pub use ddl::{DdlGenerator, SchemaPlan};
