//! cqlkit-core: CQL 스키마 모델 라이브러리
//!
//! 이 크레이트는 DDL 생성기와 CLI가 공유하는 스키마 모델을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `schema`: 스토리지 타입, UDT, 컬럼, 테이블 선언 및 YAML 파싱
//! - `error`: 공통 에러 타입

pub mod error;
pub mod schema;

pub use error::{Error, Result};
