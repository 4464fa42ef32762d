//! 스키마 YAML 파서
//!
//! `schema/*.yaml` 선언 파일을 파싱하여 Catalog를 구성합니다.
//! 맵의 키 순서가 곧 선언 순서이므로 `IndexMap`으로 역직렬화합니다.

use indexmap::IndexMap;
use serde::Deserialize;

use super::catalog::Catalog;
use super::column::{ClusteringOrder, Column};
use super::table::TableDeclaration;
use super::types::StorageType;
use crate::error::{Error, Result};

/// 지원하는 스키마 파일 버전
const SCHEMA_VERSION: u32 = 1;

/// 스키마 파서
pub struct SchemaParser;

impl SchemaParser {
    /// 단일 YAML 문자열 파싱
    pub fn parse_yaml(yaml: &str) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        Self::parse_into(&mut catalog, yaml)?;
        Ok(catalog)
    }

    /// 여러 YAML 파일을 순서대로 하나의 Catalog로 병합
    ///
    /// 뒤 파일은 앞 파일에서 선언한 UDT를 참조할 수 있습니다.
    pub fn parse_multiple(yamls: &[&str]) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        for yaml in yamls {
            Self::parse_into(&mut catalog, yaml)?;
        }
        Ok(catalog)
    }

    /// 기존 Catalog에 YAML 선언 추가
    pub fn parse_into(catalog: &mut Catalog, yaml: &str) -> Result<()> {
        let raw: RawSchema = serde_yaml::from_str(yaml)?;
        Self::convert_raw_schema(catalog, raw)
    }

    /// Raw 스키마를 Catalog에 반영 (UDT 먼저, 그다음 테이블)
    fn convert_raw_schema(catalog: &mut Catalog, raw: RawSchema) -> Result<()> {
        if raw.version != SCHEMA_VERSION {
            return Err(Error::SchemaParse {
                message: format!(
                    "unsupported schema version {} (expected {})",
                    raw.version, SCHEMA_VERSION
                ),
            });
        }

        for (name, raw_fields) in raw.types {
            let fields = Self::convert_raw_fields(catalog, &name, raw_fields)?;
            catalog.declare_type(name, fields)?;
        }

        for (type_name, raw_table) in raw.tables {
            let declaration = Self::convert_raw_table(catalog, type_name, raw_table)?;
            catalog.declare_table(declaration)?;
        }

        Ok(())
    }

    /// Raw UDT 필드들 변환
    fn convert_raw_fields(
        catalog: &Catalog,
        type_name: &str,
        raw: IndexMap<String, String>,
    ) -> Result<Vec<(String, StorageType)>> {
        raw.into_iter()
            .map(|(field, signature)| {
                let ty = StorageType::parse(&signature, catalog.types()).map_err(|e| match e {
                    Error::InvalidType { reason, .. } => Error::invalid_type(
                        type_name,
                        format!("field '{}' has type '{}': {}", field, signature, reason),
                    ),
                    other => other,
                })?;
                Ok((field, ty))
            })
            .collect()
    }

    /// Raw 테이블을 TableDeclaration으로 변환
    fn convert_raw_table(
        catalog: &Catalog,
        type_name: String,
        raw: RawTable,
    ) -> Result<TableDeclaration> {
        let mut declaration = TableDeclaration::new(type_name);
        if let Some(name) = raw.name {
            declaration = declaration.with_name(name);
        }

        let table_name = declaration.table_name().to_string();
        for (column_name, raw_column) in raw.columns {
            let column = Self::convert_raw_column(catalog, &table_name, &column_name, raw_column)?;
            declaration = declaration.column(column_name, column);
        }

        Ok(declaration)
    }

    /// Raw 컬럼 변환
    fn convert_raw_column(
        catalog: &Catalog,
        table: &str,
        name: &str,
        raw: RawColumn,
    ) -> Result<Column> {
        let detail = match raw {
            RawColumn::Type(signature) => RawColumnDetail {
                column_type: Some(signature),
                ..RawColumnDetail::default()
            },
            RawColumn::Detailed(detail) => detail,
        };

        if let Some(unknown) = detail.unknown.keys().next() {
            return Err(Error::invalid_column(
                table,
                name,
                format!(
                    "unknown field '{}' (expected type, key, order or static)",
                    unknown
                ),
            ));
        }
        let signature = detail
            .column_type
            .as_deref()
            .ok_or_else(|| Error::invalid_column(table, name, "missing field 'type'"))?;

        let datatype = StorageType::parse(signature, catalog.types())?;

        let order = match detail.order.as_deref() {
            None => ClusteringOrder::Undefined,
            Some(order) => ClusteringOrder::from_keyword(order).ok_or_else(|| {
                Error::invalid_column(
                    table,
                    name,
                    format!("unknown clustering order '{}' (expected asc or desc)", order),
                )
            })?,
        };

        let key = detail.key.as_deref().unwrap_or("regular");
        let column = match key {
            "partition" => {
                if detail.is_static == Some(true) {
                    return Err(Error::invalid_column(table, name, "partition key can't be static"));
                }
                Column::partition_key(datatype)
            }
            "clustering" => Column::clustering_key(datatype, order),
            "regular" => Column::regular(datatype),
            other => {
                return Err(Error::invalid_column(
                    table,
                    name,
                    format!(
                        "unknown column key '{}' (expected partition, clustering or regular)",
                        other
                    ),
                ))
            }
        };

        if order.is_defined() && !column.is_clustering_key() {
            return Err(Error::invalid_column(
                table,
                name,
                "order is only allowed on clustering columns",
            ));
        }

        Ok(column.with_static(detail.is_static.unwrap_or(false)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw YAML 구조체 (serde 역직렬화용)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    types: IndexMap<String, IndexMap<String, String>>,
    #[serde(default)]
    tables: IndexMap<String, RawTable>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    name: Option<String>,
    columns: IndexMap<String, RawColumn>,
}

/// `id: uuid` 축약형 또는 상세형
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Type(String),
    Detailed(RawColumnDetail),
}

/// 알 수 없는 키는 serde 에러 대신 `InvalidColumn`으로 보고하기 위해 모아 둠
#[derive(Debug, Default, Deserialize)]
struct RawColumnDetail {
    #[serde(rename = "type")]
    column_type: Option<String>,
    key: Option<String>,
    order: Option<String>,
    #[serde(rename = "static")]
    is_static: Option<bool>,
    #[serde(flatten)]
    unknown: IndexMap<String, serde_yaml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::ColumnRole;

    const SENSOR_SCHEMA: &str = r#"
version: 1
types:
  Employee:
    employee_num: int
    name: text
    surname: text
    phones: frozen<set<text>>
  Address:
    street: text
    city: text
    state: text
tables:
  Sensor:
    columns:
      id: { type: uuid, key: partition }
      capture: { type: timestamp, key: clustering, order: asc }
      installation: Address
      contact: frozen<set<Employee>>
      temperature: decimal
      humidity: decimal
"#;

    #[test]
    fn test_parse_sensor_schema() {
        let catalog = SchemaParser::parse_yaml(SENSOR_SCHEMA).unwrap();

        let types: Vec<_> = catalog.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(types, vec!["Employee", "Address"]);

        let sensor = catalog.tables().get("Sensor").unwrap();
        let columns: Vec<_> = sensor.columns.keys().map(String::as_str).collect();
        assert_eq!(
            columns,
            vec!["id", "capture", "installation", "contact", "temperature", "humidity"]
        );
        assert_eq!(
            sensor.find_column("capture").unwrap().role,
            ColumnRole::Clustering {
                order: ClusteringOrder::Ascending
            }
        );
        assert_eq!(
            sensor.find_column("contact").unwrap().datatype.typename(),
            "frozen<set<Employee>>"
        );
    }

    #[test]
    fn test_parse_table_name_override_and_static() {
        let yaml = r#"
tables:
  Reading:
    name: readings
    columns:
      sensor: { type: uuid, key: partition }
      at: { type: timeuuid, key: clustering }
      owner: { type: text, static: true }
"#;
        let catalog = SchemaParser::parse_yaml(yaml).unwrap();
        let readings = catalog.tables().get("readings").unwrap();
        assert!(readings.find_column("owner").unwrap().is_static());
        assert!(catalog.tables().get("Reading").is_none());
    }

    #[test]
    fn test_parse_multiple_shares_types() {
        let types = r#"
types:
  Address: { city: text }
"#;
        let tables = r#"
tables:
  users:
    columns:
      id: { type: uuid, key: partition }
      home: frozen<Address>
"#;
        let catalog = SchemaParser::parse_multiple(&[types, tables]).unwrap();
        assert_eq!(catalog.tables().len(), 1);

        // 순서가 바뀌면 UDT를 찾을 수 없음
        let err = SchemaParser::parse_multiple(&[tables, types]).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn test_invalid_column_declarations() {
        let unknown_key = r#"
tables:
  t:
    columns:
      id: { type: int, key: primary }
"#;
        let err = SchemaParser::parse_yaml(unknown_key).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { .. }));

        let static_partition = r#"
tables:
  t:
    columns:
      id: { type: int, key: partition, static: true }
"#;
        let err = SchemaParser::parse_yaml(static_partition).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { .. }));

        let misplaced_order = r#"
tables:
  t:
    columns:
      id: { type: int, key: partition }
      v: { type: int, order: desc }
"#;
        let err = SchemaParser::parse_yaml(misplaced_order).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { .. }));
    }

    #[test]
    fn test_misspelled_column_field_names_the_column() {
        let yaml = r#"
tables:
  t:
    columns:
      id: { type: int, kye: partition }
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        match err {
            Error::InvalidColumn {
                table,
                column,
                reason,
            } => {
                assert_eq!(table, "t");
                assert_eq!(column, "id");
                assert!(reason.contains("'kye'"));
            }
            other => panic!("Expected invalid column, got {other:?}"),
        }

        let missing_type = r#"
tables:
  t:
    columns:
      id: { key: partition }
"#;
        let err = SchemaParser::parse_yaml(missing_type).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_type_names_differing_in_case_conflict() {
        let yaml = r#"
types:
  Address: { city: text }
  address: { street: text }
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::DuplicateType { ref name } if name == "address"));
    }

    #[test]
    fn test_invalid_type_declarations() {
        let yaml = r#"
tables:
  t:
    columns:
      id: { type: integer, key: partition }
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));

        let yaml = r#"
types:
  Point:
    x: list<Nope>
"#;
        let err = SchemaParser::parse_yaml(yaml).unwrap_err();
        match err {
            Error::InvalidType { type_name, reason } => {
                assert_eq!(type_name, "Point");
                assert!(reason.contains("field 'x'"));
            }
            other => panic!("Expected invalid type, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_table_across_files() {
        let a = r#"
tables:
  Sensor:
    columns:
      id: { type: uuid, key: partition }
"#;
        let b = r#"
tables:
  Other:
    name: Sensor
    columns:
      id: { type: uuid, key: partition }
"#;
        let err = SchemaParser::parse_multiple(&[a, b]).unwrap_err();
        assert!(matches!(err, Error::DuplicateTable { .. }));
    }

    #[test]
    fn test_unsupported_version() {
        let err = SchemaParser::parse_yaml("version: 2\n").unwrap_err();
        assert!(matches!(err, Error::SchemaParse { .. }));
    }
}
