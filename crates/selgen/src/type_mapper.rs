use std::collections::BTreeMap;

/// Java property type and JDBC type name for one SQL column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub java_type: String,
    pub jdbc_type: String,
}

impl MappedType {
    fn new(java_type: &str, jdbc_type: &str) -> Self {
        Self {
            java_type: java_type.to_string(),
            jdbc_type: jdbc_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    /// User overrides (normalized SQL type -> Java type). The JDBC type still comes from
    /// the builtin table.
    custom: BTreeMap<String, String>,
}

impl TypeMapper {
    pub fn new(custom: BTreeMap<String, String>) -> Self {
        let mut normalized = BTreeMap::new();
        for (k, v) in custom {
            normalized.insert(normalize_sql_type(&k), v);
        }
        Self { custom: normalized }
    }

    pub fn map(&self, sql_type: &str) -> MappedType {
        let normalized = normalize_sql_type(sql_type);
        let mut mapped = builtin(&normalized);
        if let Some(t) = self.custom.get(&normalized) {
            mapped.java_type = t.clone();
        }
        mapped
    }
}

fn builtin(normalized: &str) -> MappedType {
    match normalized {
        "bool" | "boolean" | "bit" => MappedType::new("java.lang.Boolean", "BIT"),

        "tinyint" => MappedType::new("java.lang.Byte", "TINYINT"),
        "int2" | "smallint" => MappedType::new("java.lang.Short", "SMALLINT"),
        "int" | "int4" | "integer" | "serial" | "mediumint" => {
            MappedType::new("java.lang.Integer", "INTEGER")
        }
        "int8" | "bigint" | "bigserial" => MappedType::new("java.lang.Long", "BIGINT"),

        "float4" | "real" => MappedType::new("java.lang.Float", "REAL"),
        "float8" | "float" | "double" | "double precision" => {
            MappedType::new("java.lang.Double", "DOUBLE")
        }
        "numeric" | "decimal" => MappedType::new("java.math.BigDecimal", "DECIMAL"),

        "char" | "character" => MappedType::new("java.lang.String", "CHAR"),
        "text" | "mediumtext" | "longtext" | "clob" => {
            MappedType::new("java.lang.String", "LONGVARCHAR")
        }

        "timestamptz" | "timestamp" | "datetime" | "timestamp without time zone" => {
            MappedType::new("java.util.Date", "TIMESTAMP")
        }
        "date" => MappedType::new("java.util.Date", "DATE"),
        "time" | "time without time zone" => MappedType::new("java.util.Date", "TIME"),

        "bytea" | "blob" | "binary" | "varbinary" => MappedType::new("byte[]", "BINARY"),

        // varchar and anything unknown.
        _ => MappedType::new("java.lang.String", "VARCHAR"),
    }
}

pub fn normalize_sql_type(sql_type: &str) -> String {
    // Lowercase, remove `(…)` typmods, compress spaces.
    let mut s = sql_type.trim().to_lowercase();

    while let Some(start) = s.find('(') {
        let Some(end) = s[start..].find(')') else {
            break;
        };
        s.replace_range(start..start + end + 1, "");
    }

    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    match s.as_str() {
        "character varying" => "varchar".to_string(),
        "timestamp with time zone" => "timestamptz".to_string(),
        _ => s,
    }
}
