//! 사용자 설정 명령어

use crate::config::CliConfig;

pub fn set(
    config: &mut CliConfig,
    cqlsh: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(c) = cqlsh {
        config.cqlsh = Some(c);
    }
    if let Some(h) = host {
        config.host = Some(h);
    }
    if let Some(p) = port {
        config.port = Some(p);
    }

    config.save()?;
    println!("Config updated.");
    show(config)
}

pub fn show(config: &CliConfig) -> anyhow::Result<()> {
    let target = config.cqlsh_target()?;

    println!("Effective cqlsh target (~/.cqlkit/config.json, CQLKIT_* env):");
    println!("  cqlsh: {}", target.program);
    println!("  host:  {}", target.host);
    println!("  port:  {}", target.port);

    Ok(())
}
