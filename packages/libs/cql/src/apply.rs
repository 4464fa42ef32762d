//! 스키마 적용
//!
//! 생성된 DDL 문을 외부 실행기로 순서대로 실행합니다.
//! 뒤의 문이 앞의 문을 참조할 수 있으므로 순서를 바꾸거나 병렬로 실행하지 않습니다.
//! 재시도/타임아웃은 실행기 구현의 몫입니다.

use std::convert::Infallible;

use thiserror::Error;

use cqlkit_core::schema::Catalog;

use crate::ddl::{DdlGenerator, SchemaPlan};

/// DDL 문 실행기
///
/// 실제 클러스터 연결/세션은 구현체가 소유합니다.
pub trait SchemaApplier {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 단일 문 실행
    fn execute(&mut self, statement: &str) -> Result<(), Self::Error>;
}

/// 적용 에러
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Schema(#[from] cqlkit_core::Error),

    #[error("statement #{index} failed: {statement}: {source}")]
    Execution {
        /// 실패한 문의 순번 (0부터)
        index: usize,
        statement: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// keyspace에 Catalog 전체를 생성 (합성 + 적용)
///
/// 실행된 문 개수를 반환합니다.
pub fn create_all<A: SchemaApplier>(
    keyspace: &str,
    catalog: &Catalog,
    applier: &mut A,
) -> Result<usize, ApplyError> {
    let plan = DdlGenerator::generate(keyspace, catalog)?;
    apply_plan(&plan, applier)
}

/// 생성된 DDL을 순서대로 실행
///
/// 첫 실패에서 중단하며 나머지 문은 실행하지 않습니다.
pub fn apply_plan<A: SchemaApplier>(plan: &SchemaPlan, applier: &mut A) -> Result<usize, ApplyError> {
    tracing::info!(
        "Applying {} statements to keyspace {} ({} types, {} tables)",
        plan.len(),
        plan.keyspace,
        plan.types.len(),
        plan.tables.len()
    );

    let mut executed = 0;
    for (index, statement) in plan.statements().enumerate() {
        tracing::debug!("Executing #{}: {}", index, statement);
        if let Err(e) = applier.execute(statement) {
            tracing::warn!("Statement #{} failed, aborting remaining statements: {}", index, e);
            return Err(ApplyError::Execution {
                index,
                statement: statement.to_string(),
                source: Box::new(e),
            });
        }
        executed += 1;
    }

    tracing::info!("Applied {} statements to keyspace {}", executed, plan.keyspace);
    Ok(executed)
}

/// 실행 대신 문을 기록하는 실행기 (dry run, 테스트용)
#[derive(Debug, Clone, Default)]
pub struct RecordingApplier {
    statements: Vec<String>,
}

impl RecordingApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 문들 (실행 순서)
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<String> {
        self.statements
    }
}

impl SchemaApplier for RecordingApplier {
    type Error = Infallible;

    fn execute(&mut self, statement: &str) -> Result<(), Self::Error> {
        self.statements.push(statement.to_string());
        Ok(())
    }
}
