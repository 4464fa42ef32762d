//! 사용자 정의 타입(UDT) 레지스트리
//!
//! 선언된 UDT를 선언 순서대로 보관하고 `CREATE TYPE` 본문을 렌더링합니다.
//! 레지스트리는 append-only이며, 등록된 타입은 수정/삭제되지 않습니다.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::types::StorageType;
use crate::error::{Error, Result};

/// 레지스트리 내 UDT 식별자 (선언 순번)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UdtId(usize);

impl UdtId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// UDT 핸들
///
/// `StorageType::udt`로 컬럼/필드 타입을 만들 때 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdtRef {
    id: UdtId,
    name: String,
}

impl UdtRef {
    pub fn id(&self) -> UdtId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 선언된 UDT
#[derive(Debug, Clone, Serialize)]
pub struct UserDefinedType {
    #[serde(skip)]
    pub id: UdtId,

    /// 타입 이름 (CQL에 그대로 사용)
    pub name: String,

    /// 필드 맵 (선언 순서 유지)
    pub fields: IndexMap<String, StorageType>,
}

impl UserDefinedType {
    /// 이 타입을 가리키는 핸들
    pub fn handle(&self) -> UdtRef {
        UdtRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// `Name(field1 type1, field2 type2, ...)`
    pub fn definition(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty.typename()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, fields)
    }

    /// 필드가 참조하는 UDT들
    pub fn dependencies(&self) -> impl Iterator<Item = &UdtRef> + '_ {
        self.fields.values().flat_map(|ty| ty.referenced_udts())
    }
}

/// UDT 레지스트리
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct UdtRegistry {
    types: Vec<UserDefinedType>,
}

impl UdtRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// UDT 등록
    ///
    /// 필드 타입이 참조하는 UDT는 이 레지스트리에 먼저 등록되어 있어야 합니다.
    /// 따라서 선언 순서가 곧 의존 순서입니다.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, StorageType)>,
    ) -> Result<UdtRef> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(Error::invalid_type(&name, "type name must be a plain identifier"));
        }
        // unquoted identifier는 대소문자를 구분하지 않음
        if self.types.iter().any(|udt| udt.name.eq_ignore_ascii_case(&name)) {
            return Err(Error::DuplicateType { name });
        }

        let mut field_map: IndexMap<String, StorageType> = IndexMap::new();
        for (field, ty) in fields {
            if !is_identifier(&field) {
                return Err(Error::invalid_type(
                    &name,
                    format!("field name '{}' must be a plain identifier", field),
                ));
            }
            for dependency in ty.referenced_udts() {
                if self.resolve(dependency).is_none() {
                    return Err(Error::invalid_type(
                        &name,
                        format!("field '{}' references an undeclared user defined type", field),
                    ));
                }
            }
            if field_map.keys().any(|existing: &String| existing.eq_ignore_ascii_case(&field)) {
                return Err(Error::invalid_type(
                    &name,
                    format!("duplicate field '{}'", field),
                ));
            }
            field_map.insert(field, ty);
        }
        if field_map.is_empty() {
            return Err(Error::invalid_type(&name, "user defined type must declare at least one field"));
        }

        let udt = UserDefinedType {
            id: UdtId(self.types.len()),
            name,
            fields: field_map,
        };
        tracing::debug!("Registered user defined type {}", udt.definition());

        let handle = udt.handle();
        self.types.push(udt);
        Ok(handle)
    }

    pub fn get(&self, id: UdtId) -> Option<&UserDefinedType> {
        self.types.get(id.0)
    }

    /// 핸들이 이 레지스트리의 타입을 가리키는 경우에만 조회
    ///
    /// 순번만으로는 다른 레지스트리의 핸들과 구분되지 않으므로 이름까지 비교합니다.
    pub fn resolve(&self, udt: &UdtRef) -> Option<&UserDefinedType> {
        self.get(udt.id).filter(|found| found.name == udt.name)
    }

    /// 이름으로 조회 (대소문자 구분)
    pub fn lookup(&self, name: &str) -> Option<UdtRef> {
        self.types
            .iter()
            .find(|udt| udt.name == name)
            .map(UserDefinedType::handle)
    }

    /// 선언 순서대로 순회
    pub fn iter(&self) -> impl Iterator<Item = &UserDefinedType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `used`와 그 필드들이 (재귀적으로) 참조하는 모든 UDT
    ///
    /// 이 레지스트리에 없는 핸들이 있으면 `InvalidType`입니다.
    pub fn closure<'a>(
        &'a self,
        used: impl IntoIterator<Item = &'a UdtRef>,
    ) -> Result<BTreeSet<UdtId>> {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<&UdtRef> = used.into_iter().collect();

        while let Some(handle) = pending.pop() {
            let udt = self.resolve(handle).ok_or_else(|| {
                Error::invalid_type(
                    handle.name(),
                    "user defined type is not declared in this registry",
                )
            })?;
            if seen.insert(udt.id) {
                pending.extend(udt.dependencies());
            }
        }

        Ok(seen)
    }

    /// 사용된 UDT들의 `CREATE TYPE` 문
    ///
    /// 사용 순서가 아닌 레지스트리(선언) 순서를 따르며, 타입당 한 번만 생성합니다.
    pub fn render_create_statements<'a>(
        &'a self,
        keyspace: &str,
        used: impl IntoIterator<Item = &'a UdtRef>,
    ) -> Result<Vec<String>> {
        let wanted = self.closure(used)?;

        Ok(self
            .types
            .iter()
            .filter(|udt| wanted.contains(&udt.id))
            .map(|udt| format!("CREATE TYPE IF NOT EXISTS {}.{};", keyspace, udt.definition()))
            .collect())
    }
}

/// CQL unquoted identifier 규칙
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ScalarType;

    fn field(name: &str, ty: impl Into<StorageType>) -> (String, StorageType) {
        (name.to_string(), ty.into())
    }

    #[test]
    fn test_definition_keeps_field_order() {
        let mut registry = UdtRegistry::new();
        let employee = registry
            .register(
                "Employee",
                vec![field("num", ScalarType::Int), field("name", ScalarType::Text)],
            )
            .unwrap();

        let udt = registry.get(employee.id()).unwrap();
        assert_eq!(udt.definition(), "Employee(num int, name text)");
        assert_eq!(StorageType::udt(&employee).typename(), "Employee");
        assert_eq!(StorageType::udt(&employee).frozen().typename(), "frozen<Employee>");
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = UdtRegistry::new();
        registry
            .register("Address", vec![field("city", ScalarType::Text)])
            .unwrap();

        let err = registry
            .register("Address", vec![field("street", ScalarType::Text)])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateType { .. }));

        // CQL은 unquoted 이름을 소문자로 접으므로 같은 타입
        let err = registry
            .register("address", vec![field("street", ScalarType::Text)])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateType { ref name } if name == "address"));

        let err = registry
            .register(
                "Point",
                vec![field("x", ScalarType::Double), field("x", ScalarType::Double)],
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));

        let err = registry.register("Empty", Vec::<(String, StorageType)>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn test_register_rejects_foreign_udt() {
        let mut other = UdtRegistry::new();
        other
            .register("A", vec![field("x", ScalarType::Int)])
            .unwrap();
        let foreign = other
            .register("B", vec![field("y", ScalarType::Int)])
            .unwrap();

        let mut registry = UdtRegistry::new();
        let err = registry
            .register("C", vec![field("b", &foreign)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn test_render_filters_and_orders_by_declaration() {
        let mut registry = UdtRegistry::new();
        let phone = registry
            .register("Phone", vec![field("number", ScalarType::Text)])
            .unwrap();
        let address = registry
            .register("Address", vec![field("city", ScalarType::Text)])
            .unwrap();
        registry
            .register("Unused", vec![field("x", ScalarType::Int)])
            .unwrap();
        let contact = registry
            .register(
                "Contact",
                vec![field("phones", StorageType::set(StorageType::udt(&phone).frozen()))],
            )
            .unwrap();

        // 사용 순서와 무관하게 선언 순서, 의존 타입 포함, 중복 제거
        let statements = registry
            .render_create_statements("ks", vec![&contact, &address, &contact])
            .unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TYPE IF NOT EXISTS ks.Phone(number text);",
                "CREATE TYPE IF NOT EXISTS ks.Address(city text);",
                "CREATE TYPE IF NOT EXISTS ks.Contact(phones set<frozen<Phone>>);",
            ]
        );
    }

    #[test]
    fn test_handle_from_other_registry_at_same_position() {
        let mut other = UdtRegistry::new();
        let point = other.register("Point", vec![field("x", ScalarType::Int)]).unwrap();

        let mut registry = UdtRegistry::new();
        let address = registry
            .register("Address", vec![field("city", ScalarType::Text)])
            .unwrap();
        assert_eq!(point.id(), address.id());

        assert!(registry.resolve(&point).is_none());
        assert_eq!(registry.resolve(&address).map(|udt| udt.name.as_str()), Some("Address"));

        let err = registry
            .register("Place", vec![field("at", &point)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));

        let err = registry.render_create_statements("ks", vec![&point]).unwrap_err();
        assert!(matches!(err, Error::InvalidType { ref type_name, .. } if type_name == "Point"));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("sensor_data"));
        assert!(is_identifier("T1"));
        assert!(!is_identifier("1table"));
        assert!(!is_identifier("_hidden"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier(""));
    }
}
