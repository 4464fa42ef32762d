//! 컬럼 정의
//!
//! 테이블 컬럼의 타입과 역할(파티션 키 / 클러스터링 키 / 일반)을 정의합니다.
//! 검증은 테이블 전체 문맥을 가진 DDL 생성 단계에서 수행합니다.

use serde::{Deserialize, Serialize};

use super::types::StorageType;

/// 클러스터링 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringOrder {
    Ascending,
    Descending,

    /// 정렬 미지정 (기본값)
    #[default]
    Undefined,
}

impl ClusteringOrder {
    /// CQL 키워드 (`Undefined`는 None)
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            ClusteringOrder::Ascending => Some("ASC"),
            ClusteringOrder::Descending => Some("DESC"),
            ClusteringOrder::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, ClusteringOrder::Undefined)
    }

    /// `asc` / `desc` 파싱 (대소문자 무시)
    pub fn from_keyword(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(ClusteringOrder::Ascending)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(ClusteringOrder::Descending)
        } else {
            None
        }
    }
}

/// 컬럼 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum ColumnRole {
    /// 파티션 키 (static 불가)
    Partition,

    /// 클러스터링 키
    Clustering { order: ClusteringOrder },

    /// 일반 컬럼
    Regular,
}

/// 컬럼 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// 컬럼 타입
    #[serde(rename = "type")]
    pub datatype: StorageType,

    /// 컬럼 역할
    #[serde(flatten)]
    pub role: ColumnRole,

    /// static 컬럼 여부
    #[serde(rename = "static")]
    is_static: bool,
}

impl Column {
    /// 일반 컬럼
    pub fn regular(datatype: impl Into<StorageType>) -> Self {
        Self {
            datatype: datatype.into(),
            role: ColumnRole::Regular,
            is_static: false,
        }
    }

    /// 파티션 키 컬럼
    pub fn partition_key(datatype: impl Into<StorageType>) -> Self {
        Self {
            datatype: datatype.into(),
            role: ColumnRole::Partition,
            is_static: false,
        }
    }

    /// 클러스터링 키 컬럼
    pub fn clustering_key(datatype: impl Into<StorageType>, order: ClusteringOrder) -> Self {
        Self {
            datatype: datatype.into(),
            role: ColumnRole::Clustering { order },
            is_static: false,
        }
    }

    /// static 표시
    ///
    /// 파티션 키에는 적용되지 않습니다.
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static && !self.is_partition_key();
        self
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_partition_key(&self) -> bool {
        matches!(self.role, ColumnRole::Partition)
    }

    pub fn is_clustering_key(&self) -> bool {
        matches!(self.role, ColumnRole::Clustering { .. })
    }

    /// 클러스터링 정렬 (클러스터링 키가 아니면 None)
    pub fn clustering_order(&self) -> Option<ClusteringOrder> {
        match self.role {
            ColumnRole::Clustering { order } => Some(order),
            _ => None,
        }
    }

    /// `name type[ static]`
    pub fn definition(&self, name: &str) -> String {
        if self.is_static {
            format!("{} {} static", name, self.datatype.typename())
        } else {
            format!("{} {}", name, self.datatype.typename())
        }
    }
}
