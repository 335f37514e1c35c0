//! Table metadata consumed by the generators.
//!
//! [`DbSchema`] is the on-disk shape (a JSON schema snapshot or inline config tables);
//! [`IntrospectedTable`] is the resolved per-table view with Java names and types.

use crate::error::{GenError, GenResult};
use crate::java::JavaType;
use crate::type_mapper::TypeMapper;
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub default_expr: Option<String>,
    #[serde(default)]
    pub ordinal: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    #[serde(default = "default_schema")]
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

fn default_schema() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSchema {
    #[serde(default)]
    pub schemas: Vec<String>,
    pub tables: Vec<TableInfo>,
}

impl DbSchema {
    pub fn from_json(data: &str) -> GenResult<Self> {
        serde_json::from_str(data)
            .map_err(|e| GenError::Serialization(format!("Failed to parse schema: {e}")))
    }

    pub fn find_table(&self, schema: &str, table: &str) -> Option<&TableInfo> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == table)
    }
}

/// Per-table naming and packaging choices.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    pub model_package: String,
    pub mapper_package: String,
    /// Overrides the UpperCamelCase table name.
    pub domain_object_name: Option<String>,
    /// Overrides the `id` primary key default.
    pub primary_key: Option<String>,
    /// Render `schema.table` in SQL instead of the bare table name.
    pub qualify_table_name: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectedColumn {
    pub name: String,
    pub property: String,
    pub java_type: JavaType,
    pub jdbc_type: String,
    pub nullable: bool,
}

impl IntrospectedColumn {
    /// Parameter binding for this column, e.g. `#{userId,jdbcType=BIGINT}`.
    pub fn placeholder(&self) -> String {
        self.placeholder_with_prefix("")
    }

    pub fn placeholder_with_prefix(&self, prefix: &str) -> String {
        format!("#{{{prefix}{},jdbcType={}}}", self.property, self.jdbc_type)
    }

    pub fn getter_name(&self) -> String {
        format!("get{}", self.property.to_upper_camel_case())
    }

    pub fn setter_name(&self) -> String {
        format!("set{}", self.property.to_upper_camel_case())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectedTable {
    pub schema: String,
    pub name: String,
    pub domain_object_name: String,
    pub model_package: String,
    pub mapper_package: String,
    pub columns: Vec<IntrospectedColumn>,
    primary_key: Option<usize>,
    qualify_table_name: bool,
}

impl IntrospectedTable {
    pub fn new(info: &TableInfo, opts: &TableOptions, types: &TypeMapper) -> GenResult<Self> {
        if info.columns.is_empty() {
            return Err(GenError::table(&info.name, "table has no columns"));
        }

        let mut sorted = info.columns.clone();
        sorted.sort_by_key(|c| c.ordinal);

        let mut columns = Vec::with_capacity(sorted.len());
        for c in &sorted {
            let mapped = types.map(&c.data_type);
            columns.push(IntrospectedColumn {
                name: c.name.clone(),
                property: property_name(&c.name),
                java_type: JavaType::new(&mapped.java_type),
                jdbc_type: mapped.jdbc_type,
                nullable: !c.not_null,
            });
        }

        let primary_key = match opts.primary_key.as_deref() {
            Some(pk) => Some(
                columns
                    .iter()
                    .position(|c| c.name == pk)
                    .ok_or_else(|| {
                        GenError::table(&info.name, format!("primary key column not found: {pk}"))
                    })?,
            ),
            None => columns.iter().position(|c| c.name == "id"),
        };

        let domain_object_name = opts
            .domain_object_name
            .clone()
            .unwrap_or_else(|| info.name.to_upper_camel_case());

        Ok(Self {
            schema: info.schema.clone(),
            name: info.name.clone(),
            domain_object_name,
            model_package: opts.model_package.clone(),
            mapper_package: opts.mapper_package.clone(),
            columns,
            primary_key,
            qualify_table_name: opts.qualify_table_name,
        })
    }

    /// Table name as written into SQL.
    pub fn sql_table_name(&self) -> String {
        if self.qualify_table_name {
            format!("{}.{}", self.schema, self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn model_type(&self) -> JavaType {
        JavaType::new(&qualify(&self.model_package, &self.domain_object_name))
    }

    pub fn model_type_name(&self) -> String {
        qualify(&self.model_package, &self.domain_object_name)
    }

    pub fn mapper_name(&self) -> String {
        format!("{}Mapper", self.domain_object_name)
    }

    pub fn mapper_namespace(&self) -> String {
        qualify(&self.mapper_package, &self.mapper_name())
    }

    pub fn primary_key_column(&self) -> Option<&IntrospectedColumn> {
        self.primary_key.map(|i| &self.columns[i])
    }

    pub fn non_primary_key_columns(&self) -> impl Iterator<Item = &IntrospectedColumn> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != self.primary_key)
            .map(|(_, c)| c)
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// lowerCamelCase Java property for a column; leading digits get an underscore.
pub fn property_name(column: &str) -> String {
    let cleaned = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    let mut s = cleaned.to_lower_camel_case();
    if s.is_empty() {
        s.push('_');
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableInfo {
        TableInfo {
            schema: "public".to_string(),
            name: "user_accounts".to_string(),
            columns: vec![
                ColumnInfo {
                    name: "created_at".to_string(),
                    data_type: "timestamptz".to_string(),
                    not_null: false,
                    default_expr: None,
                    ordinal: 3,
                },
                ColumnInfo {
                    name: "id".to_string(),
                    data_type: "bigint".to_string(),
                    not_null: true,
                    default_expr: None,
                    ordinal: 1,
                },
                ColumnInfo {
                    name: "user_name".to_string(),
                    data_type: "varchar(64)".to_string(),
                    not_null: true,
                    default_expr: None,
                    ordinal: 2,
                },
            ],
        }
    }

    fn opts() -> TableOptions {
        TableOptions {
            model_package: "com.example.model".to_string(),
            mapper_package: "com.example.mapper".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn resolves_names_types_and_primary_key() {
        let t = IntrospectedTable::new(&users(), &opts(), &TypeMapper::default()).unwrap();

        assert_eq!(t.domain_object_name, "UserAccounts");
        assert_eq!(t.model_type_name(), "com.example.model.UserAccounts");
        assert_eq!(t.mapper_namespace(), "com.example.mapper.UserAccountsMapper");
        assert_eq!(
            t.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "user_name", "created_at"]
        );
        assert_eq!(t.primary_key_column().unwrap().name, "id");
        assert_eq!(t.non_primary_key_columns().count(), 2);

        let created = &t.columns[2];
        assert_eq!(created.property, "createdAt");
        assert_eq!(created.placeholder(), "#{createdAt,jdbcType=TIMESTAMP}");
        assert_eq!(created.getter_name(), "getCreatedAt");
        assert!(created.nullable);
    }

    #[test]
    fn unknown_primary_key_is_an_error() {
        let mut o = opts();
        o.primary_key = Some("uuid".to_string());
        let err = IntrospectedTable::new(&users(), &o, &TypeMapper::default()).unwrap_err();
        assert!(matches!(err, GenError::Table { .. }));
    }

    #[test]
    fn qualified_table_name() {
        let mut o = opts();
        o.qualify_table_name = true;
        let t = IntrospectedTable::new(&users(), &o, &TypeMapper::default()).unwrap();
        assert_eq!(t.sql_table_name(), "public.user_accounts");
    }

    #[test]
    fn property_names() {
        assert_eq!(property_name("user_id"), "userId");
        assert_eq!(property_name("1st"), "_1st");
        assert_eq!(property_name("Order-Total"), "orderTotal");
    }

    #[test]
    fn parses_schema_json() {
        let schema = DbSchema::from_json(
            r#"{"tables":[{"name":"t","columns":[{"name":"id","data_type":"int"}]}]}"#,
        )
        .unwrap();
        assert!(schema.find_table("public", "t").is_some());
    }
}
