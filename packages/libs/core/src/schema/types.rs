//! 스토리지 타입 정의
//!
//! CQL 컬럼/필드에 쓰이는 타입과 그 텍스트 시그니처(`typename`)를 정의합니다.
//! 스칼라, 파라미터화된 컬렉션(list/set/map), 사용자 정의 타입(UDT)을 다루며
//! 각 타입은 frozen 여부를 가집니다.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::udt::{UdtRef, UdtRegistry};
use crate::error::{Error, Result};

/// 스칼라 타입
///
/// `keyword()`가 CQL 키워드를 반환합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Inet,
    Int,
    Text,
    Timestamp,
    TimeUuid,
    Uuid,
    VarChar,
    VarInt,
}

impl ScalarType {
    /// 모든 스칼라 타입 (선언 순서)
    pub const ALL: [ScalarType; 16] = [
        ScalarType::Ascii,
        ScalarType::BigInt,
        ScalarType::Blob,
        ScalarType::Boolean,
        ScalarType::Counter,
        ScalarType::Decimal,
        ScalarType::Double,
        ScalarType::Float,
        ScalarType::Inet,
        ScalarType::Int,
        ScalarType::Text,
        ScalarType::Timestamp,
        ScalarType::TimeUuid,
        ScalarType::Uuid,
        ScalarType::VarChar,
        ScalarType::VarInt,
    ];

    /// CQL 키워드
    pub fn keyword(&self) -> &'static str {
        match self {
            ScalarType::Ascii => "ascii",
            ScalarType::BigInt => "bigint",
            ScalarType::Blob => "blob",
            ScalarType::Boolean => "boolean",
            ScalarType::Counter => "counter",
            ScalarType::Decimal => "decimal",
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Inet => "inet",
            ScalarType::Int => "int",
            ScalarType::Text => "text",
            ScalarType::Timestamp => "timestamp",
            ScalarType::TimeUuid => "timeuuid",
            ScalarType::Uuid => "uuid",
            ScalarType::VarChar => "varchar",
            ScalarType::VarInt => "varint",
        }
    }

    /// 키워드에서 파싱 (대소문자 무시)
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|scalar| scalar.keyword().eq_ignore_ascii_case(s))
    }
}

/// 타입 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Scalar(ScalarType),
    List(Box<StorageType>),
    Set(Box<StorageType>),
    Map {
        key: Box<StorageType>,
        value: Box<StorageType>,
    },
    Udt(UdtRef),
}

/// 스토리지 타입
///
/// frozen 플래그는 자기 자신의 시그니처만 감쌉니다. 원소 타입의 frozen 여부와는
/// 독립적입니다.
///
/// # JSON 직렬화
///
/// 렌더링된 시그니처 문자열(`frozen<list<text>>` 등)로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageType {
    kind: TypeKind,
    frozen: bool,
}

impl StorageType {
    /// frozen이 아닌 타입 생성
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            frozen: false,
        }
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        Self::new(TypeKind::Scalar(scalar))
    }

    pub fn list(item: impl Into<StorageType>) -> Self {
        Self::new(TypeKind::List(Box::new(item.into())))
    }

    pub fn set(item: impl Into<StorageType>) -> Self {
        Self::new(TypeKind::Set(Box::new(item.into())))
    }

    pub fn map(key: impl Into<StorageType>, value: impl Into<StorageType>) -> Self {
        Self::new(TypeKind::Map {
            key: Box::new(key.into()),
            value: Box::new(value.into()),
        })
    }

    pub fn udt(udt: &UdtRef) -> Self {
        Self::new(TypeKind::Udt(udt.clone()))
    }

    /// frozen으로 표시한 타입 반환
    ///
    /// 스칼라에도 플래그는 설정되며 `frozen<keyword>`로 렌더링됩니다.
    pub fn frozen(self) -> Self {
        self.with_frozen(true)
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// list/set/map 여부
    pub fn is_collection(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::List(_) | TypeKind::Set(_) | TypeKind::Map { .. }
        )
    }

    pub fn is_udt(&self) -> bool {
        matches!(self.kind, TypeKind::Udt(_))
    }

    /// 텍스트 타입 시그니처
    pub fn typename(&self) -> String {
        let name = match &self.kind {
            TypeKind::Scalar(scalar) => scalar.keyword().to_string(),
            TypeKind::List(item) => format!("list<{}>", item.typename()),
            TypeKind::Set(item) => format!("set<{}>", item.typename()),
            TypeKind::Map { key, value } => {
                format!("map<{},{}>", key.typename(), value.typename())
            }
            TypeKind::Udt(udt) => udt.name().to_string(),
        };

        if self.frozen {
            format!("frozen<{}>", name)
        } else {
            name
        }
    }

    /// 직접 포함된 원소 타입들 (컬렉션이 아니면 비어 있음)
    pub fn elements(&self) -> Vec<&StorageType> {
        match &self.kind {
            TypeKind::List(item) | TypeKind::Set(item) => vec![item.as_ref()],
            TypeKind::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            TypeKind::Scalar(_) | TypeKind::Udt(_) => Vec::new(),
        }
    }

    /// 이 타입(중첩된 컬렉션 원소 포함)이 참조하는 UDT 목록
    ///
    /// 등장 순서대로 반환하며 중복을 포함할 수 있습니다.
    pub fn referenced_udts(&self) -> Vec<&UdtRef> {
        let mut udts = Vec::new();
        self.collect_udts(&mut udts);
        udts
    }

    fn collect_udts<'a>(&'a self, udts: &mut Vec<&'a UdtRef>) {
        if let TypeKind::Udt(udt) = &self.kind {
            udts.push(udt);
        }
        for element in self.elements() {
            element.collect_udts(udts);
        }
    }

    /// frozen이 아닌 컬렉션 안에 frozen이 아닌 컬렉션/UDT가 중첩된 첫 위치
    ///
    /// frozen 컬렉션 내부는 통째로 직렬화되므로 검사하지 않습니다.
    pub fn non_frozen_nesting(&self) -> Option<&StorageType> {
        if self.frozen || !self.is_collection() {
            return None;
        }
        for element in self.elements() {
            if (element.is_collection() || element.is_udt()) && !element.frozen {
                return Some(element);
            }
            if let Some(found) = element.non_frozen_nesting() {
                return Some(found);
            }
        }
        None
    }

    /// CQL 타입 시그니처 파싱
    ///
    /// 키워드는 대소문자를 무시하고, UDT 이름은 `registry`에 선언된 이름과
    /// 정확히 일치해야 합니다.
    pub fn parse(signature: &str, registry: &UdtRegistry) -> Result<Self> {
        let mut parser = SignatureParser {
            input: signature,
            pos: 0,
            registry,
        };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != signature.len() {
            return Err(Error::invalid_type(
                signature,
                format!("unexpected trailing input at offset {}", parser.pos),
            ));
        }
        Ok(parsed)
    }
}

impl From<ScalarType> for StorageType {
    fn from(scalar: ScalarType) -> Self {
        StorageType::scalar(scalar)
    }
}

impl From<&UdtRef> for StorageType {
    fn from(udt: &UdtRef) -> Self {
        StorageType::udt(udt)
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.typename())
    }
}

impl Serialize for StorageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 시그니처 파서
// ─────────────────────────────────────────────────────────────────────────────

struct SignatureParser<'a> {
    input: &'a str,
    pos: usize,
    registry: &'a UdtRegistry,
}

impl<'a> SignatureParser<'a> {
    fn parse_type(&mut self) -> Result<StorageType> {
        let ident = self.identifier()?;

        match ident.to_ascii_lowercase().as_str() {
            "frozen" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                Ok(inner.frozen())
            }
            "list" => {
                self.expect('<')?;
                let item = self.parse_type()?;
                self.expect('>')?;
                Ok(StorageType::list(item))
            }
            "set" => {
                self.expect('<')?;
                let item = self.parse_type()?;
                self.expect('>')?;
                Ok(StorageType::set(item))
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                Ok(StorageType::map(key, value))
            }
            lower => {
                if let Some(scalar) = ScalarType::from_keyword(lower) {
                    return Ok(StorageType::scalar(scalar));
                }
                self.registry
                    .lookup(ident)
                    .map(|udt| StorageType::udt(&udt))
                    .ok_or_else(|| {
                        Error::invalid_type(ident, "not a storage type or declared user defined type")
                    })
            }
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(Error::invalid_type(
                self.input,
                format!("expected a type name at offset {}", self.pos),
            ));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(Error::invalid_type(
                self.input,
                format!("expected '{}' at offset {}", expected, self.pos),
            ))
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }
}
