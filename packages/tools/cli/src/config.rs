//! CLI 설정
//!
//! `~/.cqlkit/config.json`에 저장되며, 환경변수가 파일 값보다 우선합니다.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 기본 cqlsh 실행 파일
const DEFAULT_CQLSH: &str = "cqlsh";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9042;

/// CLI 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// cqlsh 실행 파일 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cqlsh: Option<String>,

    /// 접속 호스트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// 접속 포트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// 최종 결정된 cqlsh 접속 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqlshTarget {
    pub program: String,
    pub host: String,
    pub port: u16,
}

impl CliConfig {
    /// 설정 파일 경로
    fn config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".cqlkit").join("config.json"))
    }

    /// 설정 로드
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CliConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 설정 저장
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// cqlsh 접속 정보 결정 (환경변수 > 설정 파일 > 기본값)
    pub fn cqlsh_target(&self) -> anyhow::Result<CqlshTarget> {
        let port = match std::env::var("CQLKIT_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid CQLKIT_PORT '{}': {}", port, e))?,
            Err(_) => self.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(CqlshTarget {
            program: std::env::var("CQLKIT_CQLSH")
                .ok()
                .or_else(|| self.cqlsh.clone())
                .unwrap_or_else(|| DEFAULT_CQLSH.to_string()),
            host: std::env::var("CQLKIT_HOST")
                .ok()
                .or_else(|| self.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }
}
