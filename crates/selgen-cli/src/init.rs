use crate::cli::InitArgs;
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

const TEMPLATE: &str = r#"
version = "1"
target_runtime = "MyBatis3"

# Tables come either from a JSON schema snapshot ...
[schema]
file = "schema.json"

# ... or inline (remove [schema] above when using these):
#
# [[tables]]
# schema = "public"
# name = "users"
#
# [[tables.columns]]
# name = "id"
# data_type = "bigint"
# not_null = true
# ordinal = 1

[output]
java_dir = "src/main/java"
resources_dir = "src/main/resources"
model_package = "com.example.model"
mapper_package = "com.example.mapper"
emit_client = true

[generate]
# If empty, generate all tables. Items can be "table" or "schema.table".
tables = []
qualify_table_name = false
# rename."public.users" = "User"
# primary_key."public.users" = "id"

# Normalized SQL type -> Java type.
[types]
# "uuid" = "java.util.UUID"
# "jsonb" = "java.lang.String"

[plugins]
# selective_enhanced requires model_column.
enabled = ["model_column", "selective_enhanced"]

[plugins.selective_enhanced]
# Fail instead of emitting `isSelective()` when a column name cannot be recovered.
strict_field_names = false
"#;

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    std::fs::write(path, TEMPLATE.trim_start_matches('\n'))
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    #[test]
    fn template_is_a_valid_config() {
        let file = ConfigFile::parse(TEMPLATE).unwrap();
        assert_eq!(file.schema.unwrap().file, "schema.json");
        assert_eq!(file.plugins.enabled.len(), 2);
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/selgen.toml");

        write_template(&path).unwrap();
        assert!(path.exists());
        assert!(write_template(&path).is_err());
    }
}
