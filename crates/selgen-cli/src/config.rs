use selgen::{ModelColumnPlugin, SelectiveEnhancedPlugin, TableInfo};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!("invalid config file {}: {e:#}", config_path.display())
        })?;

        Ok(Self { config_dir, file })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub target_runtime: Option<String>,

    /// JSON schema snapshot to read tables from.
    pub schema: Option<SchemaSource>,

    /// Inline tables, used instead of `schema`.
    #[serde(default)]
    pub tables: Vec<TableInfo>,

    pub output: OutputConfig,

    #[serde(default)]
    pub generate: GenerateConfig,

    /// Normalized SQL type -> Java type.
    #[serde(default)]
    pub types: BTreeMap<String, String>,

    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaSource {
    pub file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_java_dir")]
    pub java_dir: String,
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,
    pub model_package: String,
    pub mapper_package: String,
    #[serde(default = "default_true")]
    pub emit_client: bool,
}

fn default_java_dir() -> String {
    "src/main/java".to_string()
}

fn default_resources_dir() -> String {
    "src/main/resources".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateConfig {
    /// Items are "table" or "schema.table"; empty means every table.
    #[serde(default)]
    pub tables: Vec<String>,

    /// "table" or "schema.table" -> domain object name.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,

    /// "table" or "schema.table" -> primary key column.
    #[serde(default)]
    pub primary_key: BTreeMap<String, String>,

    #[serde(default)]
    pub qualify_table_name: bool,
}

impl GenerateConfig {
    pub fn includes(&self, table: &TableInfo) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|k| table_key_matches(k, table))
    }

    pub fn rename_for(&self, table: &TableInfo) -> Option<&str> {
        lookup(&self.rename, table)
    }

    pub fn primary_key_for(&self, table: &TableInfo) -> Option<&str> {
        lookup(&self.primary_key, table)
    }
}

/// Qualified keys win over bare table names.
fn lookup<'a>(map: &'a BTreeMap<String, String>, table: &TableInfo) -> Option<&'a str> {
    map.get(&format!("{}.{}", table.schema, table.name))
        .or_else(|| map.get(&table.name))
        .map(|s| s.as_str())
}

pub fn table_key_matches(key: &str, table: &TableInfo) -> bool {
    match key.split_once('.') {
        Some((schema, name)) => schema == table.schema && name == table.name,
        None => key == table.name,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    #[serde(default = "default_plugins")]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub selective_enhanced: SelectiveEnhancedConfig,
}

fn default_plugins() -> Vec<String> {
    vec![
        ModelColumnPlugin::NAME.to_string(),
        SelectiveEnhancedPlugin::NAME.to_string(),
    ]
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            enabled: default_plugins(),
            selective_enhanced: SelectiveEnhancedConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SelectiveEnhancedConfig {
    #[serde(default)]
    pub strict_field_names: bool,
}

const KNOWN_PLUGINS: [&str; 2] = [ModelColumnPlugin::NAME, SelectiveEnhancedPlugin::NAME];

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile =
            toml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse: {e}"))?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        if let Some(rt) = self.target_runtime.as_mut() {
            *rt = expand_env_vars(rt)?;
        }
        if let Some(schema) = self.schema.as_mut() {
            schema.file = expand_env_vars(&schema.file)?;
        }

        let o = &mut self.output;
        o.java_dir = expand_env_vars(&o.java_dir)?;
        o.resources_dir = expand_env_vars(&o.resources_dir)?;
        o.model_package = expand_env_vars(&o.model_package)?;
        o.mapper_package = expand_env_vars(&o.mapper_package)?;

        for v in self.types.values_mut() {
            *v = expand_env_vars(v)?;
        }

        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        match (&self.schema, self.tables.is_empty()) {
            (Some(_), false) => anyhow::bail!("use either [schema] or [[tables]], not both"),
            (None, true) => anyhow::bail!("no tables: set [schema].file or add [[tables]] entries"),
            (Some(s), true) if s.file.trim().is_empty() => {
                anyhow::bail!("schema.file must not be empty")
            }
            _ => {}
        }

        if self.output.model_package.trim().is_empty() {
            anyhow::bail!("output.model_package must not be empty");
        }
        if self.output.mapper_package.trim().is_empty() {
            anyhow::bail!("output.mapper_package must not be empty");
        }

        let mut seen = std::collections::HashSet::<&str>::new();
        for name in &self.plugins.enabled {
            if !KNOWN_PLUGINS.contains(&name.as_str()) {
                anyhow::bail!(
                    "unknown plugin: {name} (expected one of: {})",
                    KNOWN_PLUGINS.join(", ")
                );
            }
            if !seen.insert(name.as_str()) {
                anyhow::bail!("duplicate plugin: {name}");
            }
        }

        for t in &self.tables {
            if t.name.trim().is_empty() {
                anyhow::bail!("tables.name must not be empty");
            }
        }

        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INLINE: &str = r#"
version = "1"
target_runtime = "MyBatis3"

[output]
model_package = "com.example.model"
mapper_package = "com.example.mapper"

[generate]
rename."public.users" = "User"
primary_key.users = "user_id"

[[tables]]
name = "users"

[[tables.columns]]
name = "user_id"
data_type = "bigint"
not_null = true
ordinal = 1

[[tables.columns]]
name = "email"
data_type = "varchar(255)"
ordinal = 2
"#;

    #[test]
    fn parses_inline_tables_with_defaults() {
        let file = ConfigFile::parse(INLINE).unwrap();
        assert_eq!(file.target_runtime.as_deref(), Some("MyBatis3"));
        assert_eq!(file.output.java_dir, "src/main/java");
        assert!(file.output.emit_client);
        assert_eq!(file.plugins.enabled, vec!["model_column", "selective_enhanced"]);
        assert!(!file.plugins.selective_enhanced.strict_field_names);

        let users = &file.tables[0];
        assert_eq!(users.schema, "public");
        assert_eq!(users.columns.len(), 2);
        assert!(file.generate.includes(users));
        assert_eq!(file.generate.rename_for(users), Some("User"));
        assert_eq!(file.generate.primary_key_for(users), Some("user_id"));
    }

    #[test]
    fn parses_plugin_options() {
        let raw = r#"
version = "1"

[schema]
file = "schema.json"

[output]
model_package = "m"
mapper_package = "d"
emit_client = false

[plugins]
enabled = ["model_column", "selective_enhanced"]

[plugins.selective_enhanced]
strict_field_names = true
"#;
        let file = ConfigFile::parse(raw).unwrap();
        assert!(file.plugins.selective_enhanced.strict_field_names);
        assert!(!file.output.emit_client);
        assert_eq!(file.schema.unwrap().file, "schema.json");
    }

    #[test]
    fn rejects_invalid_files() {
        let bad_version = INLINE.replace("version = \"1\"", "version = \"2\"");
        assert!(ConfigFile::parse(&bad_version).is_err());

        let no_tables = "version = \"1\"\n[output]\nmodel_package = \"m\"\nmapper_package = \"d\"\n";
        assert!(ConfigFile::parse(no_tables).is_err());

        let unknown_plugin = format!("{INLINE}\n[plugins]\nenabled = [\"caching\"]\n");
        assert!(ConfigFile::parse(&unknown_plugin).is_err());

        let both = INLINE.replace("[output]", "[schema]\nfile = \"s.json\"\n\n[output]");
        assert!(ConfigFile::parse(&both).is_err());
    }

    #[test]
    fn table_keys_match_bare_or_qualified() {
        let t = TableInfo {
            schema: "audit".to_string(),
            name: "events".to_string(),
            columns: Vec::new(),
        };
        assert!(table_key_matches("events", &t));
        assert!(table_key_matches("audit.events", &t));
        assert!(!table_key_matches("public.events", &t));
    }

    #[test]
    fn env_expansion() {
        assert_eq!(expand_env_vars("plain $text").unwrap(), "plain $text");
        assert!(expand_env_vars("${UNTERMINATED").is_err());
        assert!(expand_env_vars("${}").is_err());
        assert!(expand_env_vars("${SELGEN_TEST_SURELY_UNSET_VAR}").is_err());
    }
}
