//! 컨텍스트 명령어

use std::path::PathBuf;

use crate::context::RepoContext;

pub fn set(keyspace: Option<String>, schema: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut ctx = RepoContext::load().unwrap_or_default();

    if let Some(k) = keyspace {
        ctx.keyspace = Some(k);
    }
    if !schema.is_empty() {
        ctx.schema_files = schema;
    }

    ctx.save()?;
    println!("Context updated.");
    show()
}

pub fn show() -> anyhow::Result<()> {
    let ctx = RepoContext::load().unwrap_or_default();

    println!("Current context (.cqlkit/context.json):");
    println!("  keyspace: {}", ctx.keyspace.as_deref().unwrap_or("(not set)"));
    if ctx.schema_files.is_empty() {
        println!("  schema:   (not set)");
    } else {
        for file in &ctx.schema_files {
            println!("  schema:   {}", file.display());
        }
    }

    Ok(())
}

pub fn clear() -> anyhow::Result<()> {
    RepoContext::clear()?;
    println!("Context cleared.");
    Ok(())
}
