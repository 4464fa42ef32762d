//! Schema 관련 명령어

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use cqlkit_core::schema::{Catalog, SchemaParser};
use cqlkit_core::Error as SchemaError;
use cqlkit_cql::{DdlGenerator, SchemaPlan};

use crate::context::EffectiveContext;
use crate::OutputFormat;

/// 스키마 파일들을 순서대로 읽어 하나의 Catalog로 구성
pub fn load_catalog(files: &[PathBuf]) -> anyhow::Result<Catalog> {
    let mut catalog = Catalog::new();

    for file in files {
        let yaml = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read schema file {}", file.display()))?;
        SchemaParser::parse_into(&mut catalog, &yaml)
            .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), describe(&e)))?;
        tracing::debug!("Loaded schema file {}", file.display());
    }

    Ok(catalog)
}

/// 컨텍스트 기준으로 DDL 생성
pub fn plan(ctx: &EffectiveContext) -> anyhow::Result<SchemaPlan> {
    let keyspace = ctx.require_keyspace()?;
    let catalog = load_catalog(ctx.require_schema_files()?)?;

    DdlGenerator::generate(keyspace, &catalog).map_err(|e| anyhow::anyhow!(describe(&e)))
}

/// `declaration error [CODE] message` 형식의 에러 설명
fn describe(e: &SchemaError) -> String {
    let stage = if e.is_declaration_error() {
        "declaration error"
    } else {
        "synthesis error"
    };
    format!("{} [{}] {}", stage, e.code(), e)
}

pub fn render(ctx: &EffectiveContext, out: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let plan = plan(ctx)?;

    let rendered = match format {
        OutputFormat::Text => {
            let mut script = plan.statements().collect::<Vec<_>>().join("\n");
            script.push('\n');
            script
        }
        OutputFormat::Json => serde_json::to_string_pretty(&plan)? + "\n",
    };

    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} statements to {}", plan.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

pub fn check(ctx: &EffectiveContext, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load_catalog(ctx.require_schema_files()?)?;
    // keyspace가 없으면 이름 검증용 임시 값으로 합성만 확인
    let keyspace = ctx.keyspace.as_deref().unwrap_or("cqlkit_check");
    let plan =
        DdlGenerator::generate(keyspace, &catalog).map_err(|e| anyhow::anyhow!(describe(&e)))?;

    match format {
        OutputFormat::Text => {
            println!(
                "Schema OK: {} types declared, {} tables declared",
                catalog.types().len(),
                catalog.tables().len()
            );
            println!(
                "  {} CREATE TYPE, {} CREATE TABLE statements",
                plan.types.len(),
                plan.tables.len()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }

    Ok(())
}
