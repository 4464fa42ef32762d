//! Catalog
//!
//! 한 번의 합성 대상이 되는 UDT 레지스트리와 테이블 레지스트리를 묶은 객체입니다.
//! 프로세스 전역 상태 대신 명시적으로 생성해 선언 호출과 DDL 생성기에 전달합니다.
//! 시작 시 한 번 선언하고, 합성이 시작된 뒤에는 새 선언을 추가하지 않는 것이 사용 규약입니다.

use serde::Serialize;

use super::table::{TableDeclaration, TableDefinition, TableRegistry};
use super::types::StorageType;
use super::udt::{UdtRef, UdtRegistry};
use crate::error::{Error, Result};

/// 선언된 UDT와 테이블의 집합
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// UDT 레지스트리
    types: UdtRegistry,

    /// 테이블 레지스트리
    tables: TableRegistry,
}

impl Catalog {
    /// 빈 카탈로그 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// UDT 선언
    pub fn declare_type(
        &mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, StorageType)>,
    ) -> Result<UdtRef> {
        self.types.register(name, fields)
    }

    /// 테이블 선언
    ///
    /// 컬럼 타입이 참조하는 UDT는 이 카탈로그에 선언되어 있어야 합니다.
    pub fn declare_table(&mut self, declaration: TableDeclaration) -> Result<&TableDefinition> {
        for (column_name, column) in declaration.columns() {
            for udt in column.datatype.referenced_udts() {
                if self.types.resolve(udt).is_none() {
                    return Err(Error::invalid_column(
                        declaration.table_name(),
                        column_name,
                        "references a user defined type that is not declared in this catalog",
                    ));
                }
            }
        }

        self.tables.declare(declaration)
    }

    /// UDT 레지스트리
    pub fn types(&self) -> &UdtRegistry {
        &self.types
    }

    /// 테이블 레지스트리
    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    /// 이름으로 UDT 핸들 조회
    pub fn lookup_type(&self, name: &str) -> Option<UdtRef> {
        self.types.lookup(name)
    }
}
