use cqlkit_core::schema::SchemaParser;
use cqlkit_core::Error;
use cqlkit_cql::{create_all, DdlGenerator, RecordingApplier};

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
fn test_sensor_schema_statements() {
    let catalog = SchemaParser::parse_yaml(SENSOR_SCHEMA).unwrap();
    let plan = DdlGenerator::generate("sensor_measurements", &catalog).unwrap();

    assert_eq!(
        plan.statements().collect::<Vec<_>>(),
        vec![
            "CREATE TYPE IF NOT EXISTS sensor_measurements.Employee(employee_num int, name text, surname text, phones frozen<set<text>>);",
            "CREATE TYPE IF NOT EXISTS sensor_measurements.Address(street text, city text, state text);",
            "CREATE TABLE IF NOT EXISTS sensor_measurements.Sensor(id uuid, capture timestamp, installation Address, contact frozen<set<Employee>>, temperature decimal, humidity decimal) PRIMARY KEY (id, capture) WITH CLUSTERING ORDER BY (capture ASC);",
        ]
    );
}

#[test]
fn test_only_referenced_types_are_created() {
    let yaml = r#"
types:
  Phone: { number: text }
  Address: { street: text, city: text }
tables:
  audit:
    columns:
      id: { type: timeuuid, key: partition }
      message: text
  sites:
    columns:
      id: { type: uuid, key: partition }
      location: frozen<Address>
"#;
    let catalog = SchemaParser::parse_yaml(yaml).unwrap();
    let statements = DdlGenerator::generate("geo", &catalog)
        .unwrap()
        .into_statements();

    let type_statements: Vec<_> = statements
        .iter()
        .filter(|s| s.starts_with("CREATE TYPE"))
        .collect();
    assert_eq!(type_statements.len(), 1);
    assert!(type_statements[0].contains("geo.Address("));

    let first_table = statements
        .iter()
        .position(|s| s.starts_with("CREATE TABLE"))
        .unwrap();
    assert_eq!(first_table, 1);
}

#[test]
fn test_synthesis_is_deterministic() {
    let catalog = SchemaParser::parse_yaml(SENSOR_SCHEMA).unwrap();

    let first = DdlGenerator::generate("ks", &catalog).unwrap();
    let second = DdlGenerator::generate("ks", &catalog).unwrap();
    assert_eq!(first, second);

    let reparsed = SchemaParser::parse_yaml(SENSOR_SCHEMA).unwrap();
    assert_eq!(first, DdlGenerator::generate("ks", &reparsed).unwrap());
}

#[test]
fn test_composite_partition_key() {
    let yaml = r#"
tables:
  metrics:
    columns:
      a: { type: text, key: partition }
      b: { type: int, key: partition }
      c: { type: timestamp, key: clustering, order: asc }
      value: double
"#;
    let catalog = SchemaParser::parse_yaml(yaml).unwrap();
    let plan = DdlGenerator::generate("ks", &catalog).unwrap();
    assert!(plan.tables[0].ends_with("PRIMARY KEY ((a, b), c) WITH CLUSTERING ORDER BY (c ASC);"));
}

#[test]
fn test_schema_errors_surface_from_synthesis() {
    let no_partition = r#"
tables:
  lonely:
    columns:
      value: text
"#;
    let catalog = SchemaParser::parse_yaml(no_partition).unwrap();
    let err = DdlGenerator::generate("ks", &catalog).unwrap_err();
    assert!(matches!(err, Error::MissingPartitionKey { ref table } if table == "lonely"));

    let inconsistent = r#"
tables:
  feed:
    columns:
      p: { type: int, key: partition }
      c1: { type: int, key: clustering }
      c2: { type: int, key: clustering, order: desc }
"#;
    let catalog = SchemaParser::parse_yaml(inconsistent).unwrap();
    let err = DdlGenerator::generate("ks", &catalog).unwrap_err();
    assert!(matches!(
        err,
        Error::InconsistentClusteringOrder { ref column, ref previous, .. }
            if column == "c2" && previous == "c1"
    ));
}

#[test]
fn test_create_all_with_recording_applier() {
    let catalog = SchemaParser::parse_yaml(SENSOR_SCHEMA).unwrap();
    let mut applier = RecordingApplier::new();

    let executed = create_all("sensor_measurements", &catalog, &mut applier).unwrap();
    assert_eq!(executed, 3);

    let plan = DdlGenerator::generate("sensor_measurements", &catalog).unwrap();
    assert_eq!(applier.into_statements(), plan.into_statements());
}
