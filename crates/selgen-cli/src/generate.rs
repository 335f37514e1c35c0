use crate::cli::GenArgs;
use crate::config::{PluginsConfig, ProjectConfig};
use crate::write::{WriteOptions, apply_generated_files};
use selgen::{
    DbSchema, GeneratedFile, Generator, GeneratorContext, IntrospectedTable, ModelColumnPlugin,
    OutputLayout, PluginChain, SelectiveEnhancedPlugin, TableInfo, TableOptions, TypeMapper,
};

pub fn run(args: GenArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config.clone())?;
    let files = generate_project(&project)?;

    apply_generated_files(
        &files,
        WriteOptions {
            dry_run: args.dry_run,
            check: args.check,
        },
    )?;

    Ok(())
}

pub fn generate_project(project: &ProjectConfig) -> anyhow::Result<Vec<GeneratedFile>> {
    let tables = load_tables(project)?;
    let file = &project.file;

    let generator = Generator::new(
        GeneratorContext::new(file.target_runtime.clone()),
        build_plugins(&file.plugins),
        OutputLayout {
            java_dir: project.resolve_path(&file.output.java_dir),
            resources_dir: project.resolve_path(&file.output.resources_dir),
            emit_client: file.output.emit_client,
        },
    );
    if !generator.warnings().is_empty() {
        eprintln!(
            "[WARN] {} plugin warning(s); active plugins: {:?}",
            generator.warnings().len(),
            generator.active_plugins()
        );
    }

    let mut files = Vec::new();
    for table in &tables {
        let mut table_files = generator.generate_table(table).map_err(|e| {
            anyhow::anyhow!("failed to generate table {}.{}: {e}", table.schema, table.name)
        })?;
        files.append(&mut table_files);
    }
    Ok(files)
}

fn build_plugins(cfg: &PluginsConfig) -> PluginChain {
    let mut chain = PluginChain::new();
    for name in &cfg.enabled {
        match name.as_str() {
            ModelColumnPlugin::NAME => {
                chain.add(ModelColumnPlugin);
            }
            SelectiveEnhancedPlugin::NAME => {
                chain.add(
                    SelectiveEnhancedPlugin::new()
                        .strict_field_names(cfg.selective_enhanced.strict_field_names),
                );
            }
            // Config validation rejects unknown names.
            _ => {}
        }
    }
    chain
}

fn load_tables(project: &ProjectConfig) -> anyhow::Result<Vec<IntrospectedTable>> {
    let file = &project.file;

    let infos: Vec<TableInfo> = match &file.schema {
        Some(source) => {
            let path = project.resolve_path(&source.file);
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                anyhow::anyhow!("failed to read schema file {}: {e}", path.display())
            })?;
            DbSchema::from_json(&raw)
                .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?
                .tables
        }
        None => file.tables.clone(),
    };

    for key in &file.generate.tables {
        if !infos.iter().any(|t| crate::config::table_key_matches(key, t)) {
            anyhow::bail!("table not found: {key}");
        }
    }

    let types = TypeMapper::new(file.types.clone());
    let mut tables = Vec::new();
    for info in infos.iter().filter(|t| file.generate.includes(t)) {
        let opts = TableOptions {
            model_package: file.output.model_package.clone(),
            mapper_package: file.output.mapper_package.clone(),
            domain_object_name: file.generate.rename_for(info).map(str::to_string),
            primary_key: file.generate.primary_key_for(info).map(str::to_string),
            qualify_table_name: file.generate.qualify_table_name,
        };
        tables.push(IntrospectedTable::new(info, &opts, &types)?);
    }

    if tables.is_empty() {
        anyhow::bail!("no tables selected for generation");
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
version = "1"

[schema]
file = "schema.json"

[output]
java_dir = "java"
resources_dir = "resources"
model_package = "com.example.model"
mapper_package = "com.example.mapper"

[generate]
tables = ["public.orders"]
rename.orders = "PurchaseOrder"
"#;

    const SCHEMA: &str = r#"{
  "schemas": ["public"],
  "tables": [
    {
      "schema": "public",
      "name": "orders",
      "columns": [
        { "name": "id", "data_type": "bigint", "not_null": true, "ordinal": 1 },
        { "name": "total_amount", "data_type": "numeric(10,2)", "ordinal": 2 }
      ]
    },
    {
      "schema": "public",
      "name": "ignored",
      "columns": [{ "name": "id", "data_type": "int", "ordinal": 1 }]
    }
  ]
}"#;

    fn project(config: &str) -> (tempfile::TempDir, ProjectConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.json"), SCHEMA).unwrap();
        let path = dir.path().join("selgen.toml");
        std::fs::write(&path, config).unwrap();
        let project = ProjectConfig::load(path).unwrap();
        (dir, project)
    }

    #[test]
    fn generates_selected_tables_with_selective_support() {
        let (dir, project) = project(CONFIG);
        let files = generate_project(&project).unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                dir.path().join("java/com/example/model/PurchaseOrder.java"),
                dir.path().join("resources/com/example/mapper/PurchaseOrderMapper.xml"),
                dir.path().join("java/com/example/mapper/PurchaseOrderMapper.java"),
            ]
        );

        assert!(files[0].content.contains("public PurchaseOrder selective(Column ... columns) {"));
        assert!(files[1].content.contains("<when test=\"_parameter.isSelective()\">"));
        assert!(files[1].content.contains("<if test=\"_parameter.isSelective(total_amount)\">"));
        assert!(files[1].content.contains("<if test=\"_parameter.isSelective(totalAmount)\">"));
    }

    #[test]
    fn without_selective_plugin_mapper_is_plain() {
        let config = format!("{CONFIG}\n[plugins]\nenabled = [\"model_column\"]\n");
        let (_dir, project) = project(&config);
        let files = generate_project(&project).unwrap();

        assert!(files[0].content.contains("public enum Column {"));
        assert!(!files[0].content.contains("isSelective"));
        assert!(!files[1].content.contains("<choose>"));
    }

    #[test]
    fn unknown_table_is_an_error() {
        let config = CONFIG.replace("public.orders", "public.missing");
        let (_dir, project) = project(&config);
        let err = generate_project(&project).unwrap_err();
        assert!(err.to_string().contains("table not found: public.missing"));
    }
}
