//! Apply 명령어
//!
//! 스키마 파일에서 생성한 DDL을 cqlsh로 순서대로 적용합니다.

use cqlkit_cql::{apply_plan, RecordingApplier};

use crate::commands::schema;
use crate::config::CliConfig;
use crate::context::EffectiveContext;
use crate::cqlsh::CqlshApplier;

pub fn apply(config: &CliConfig, ctx: &EffectiveContext, dry_run: bool) -> anyhow::Result<()> {
    let plan = schema::plan(ctx)?;

    if dry_run {
        let mut recorder = RecordingApplier::new();
        apply_plan(&plan, &mut recorder)?;

        println!("[DRY RUN] Would apply the following to {}:", plan.keyspace);
        for statement in recorder.statements() {
            println!("{}", statement);
        }
        return Ok(());
    }

    let target = config.cqlsh_target()?;
    println!(
        "Applying {} statements to {} via {}:{}",
        plan.len(),
        plan.keyspace,
        target.host,
        target.port
    );

    let mut applier = CqlshApplier::new(target);
    let executed = apply_plan(&plan, &mut applier)?;

    println!("Applied {} statements.", executed);
    Ok(())
}
