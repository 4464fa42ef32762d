//! Repo Context 관리
//!
//! `.cqlkit/context.json` 파일을 통해 repo-local 컨텍스트를 관리합니다.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Repo Context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoContext {
    /// 기본 keyspace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyspace: Option<String>,

    /// 기본 스키마 파일 목록 (적용 순서)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_files: Vec<PathBuf>,
}

/// Effective Context (최종 결정된 컨텍스트)
#[derive(Debug, Clone)]
pub struct EffectiveContext {
    pub keyspace: Option<String>,
    pub schema_files: Vec<PathBuf>,
}

impl EffectiveContext {
    /// keyspace 필수 검증
    pub fn require_keyspace(&self) -> anyhow::Result<&str> {
        self.keyspace.as_deref().ok_or_else(|| {
            anyhow::anyhow!("Keyspace not specified. Use --keyspace or 'cqlkit context set'")
        })
    }

    /// 스키마 파일 필수 검증
    pub fn require_schema_files(&self) -> anyhow::Result<&[PathBuf]> {
        if self.schema_files.is_empty() {
            anyhow::bail!("No schema files given. Pass files or use 'cqlkit context set --schema'");
        }
        Ok(&self.schema_files)
    }
}

impl RepoContext {
    /// 컨텍스트 파일 경로
    fn context_path() -> PathBuf {
        PathBuf::from(".cqlkit/context.json")
    }

    /// 컨텍스트 로드
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::context_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let ctx: RepoContext = serde_json::from_str(&content)?;
            Ok(ctx)
        } else {
            Ok(Self::default())
        }
    }

    /// 컨텍스트 저장
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::context_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// 컨텍스트 삭제
    pub fn clear() -> anyhow::Result<()> {
        let path = Self::context_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// 컨텍스트 결정 (CLI 옵션 > repo context)
pub fn resolve_context(keyspace: Option<&str>, files: &[PathBuf]) -> EffectiveContext {
    let repo_ctx = RepoContext::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable repo context: {}", e);
        RepoContext::default()
    });

    EffectiveContext {
        keyspace: keyspace.map(|s| s.to_string()).or(repo_ctx.keyspace),
        schema_files: if files.is_empty() {
            repo_ctx.schema_files
        } else {
            files.to_vec()
        },
    }
}
