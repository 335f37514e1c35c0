//! The seam between the generation pipeline and its extensions.
//!
//! The pipeline calls each active plugin once per model class and once per SQL map
//! document. Returning `Ok(false)` disables the unit's contribution for the rest of the
//! chain; returning an error aborts the unit.

use crate::error::GenResult;
use crate::java::TopLevelClass;
use crate::table::IntrospectedTable;
use crate::xml::Document;

/// Runtime the generated code targets.
pub const TARGET_RUNTIME_MYBATIS3: &str = "MyBatis3";

/// Environment visible to plugins during validation.
#[derive(Debug, Clone, Default)]
pub struct GeneratorContext {
    pub target_runtime: Option<String>,
    plugin_names: Vec<String>,
}

impl GeneratorContext {
    pub fn new(target_runtime: Option<String>) -> Self {
        Self {
            target_runtime,
            plugin_names: Vec::new(),
        }
    }

    /// Returns `true` if a plugin named `name` is configured.
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugin_names.iter().any(|n| n == name)
    }
}

pub trait Plugin: Send + Sync {
    /// Stable plugin name, used for dependency checks.
    fn name(&self) -> &'static str;

    /// Checks preconditions; push a message and return `false` to disable the plugin.
    fn validate(&self, _ctx: &GeneratorContext, _warnings: &mut Vec<String>) -> bool {
        true
    }

    fn model_base_record_class_generated(
        &self,
        _class: &mut TopLevelClass,
        _table: &IntrospectedTable,
    ) -> GenResult<bool> {
        Ok(true)
    }

    fn sql_map_document_generated(
        &self,
        _document: &mut Document,
        _table: &IntrospectedTable,
    ) -> GenResult<bool> {
        Ok(true)
    }
}

/// Plugins in registration order.
#[derive(Default)]
pub struct PluginChain {
    plugins: Vec<Box<dyn Plugin>>,
}

impl std::fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

impl PluginChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, plugin: impl Plugin + 'static) -> &mut Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registers the chain's plugin names on `ctx`, then drops every plugin whose
    /// `validate` fails. Returns the collected warnings.
    pub fn validate(&mut self, ctx: &mut GeneratorContext) -> Vec<String> {
        ctx.plugin_names = self.plugins.iter().map(|p| p.name().to_string()).collect();

        let mut warnings = Vec::new();
        let ctx: &GeneratorContext = ctx;
        self.plugins.retain(|p| {
            let ok = p.validate(ctx, &mut warnings);
            if !ok {
                tracing::warn!(target: "selgen", plugin = p.name(), "plugin disabled by validation");
            }
            ok
        });
        for w in &warnings {
            tracing::warn!(target: "selgen", "{w}");
        }
        warnings
    }

    pub fn model_base_record_class_generated(
        &self,
        class: &mut TopLevelClass,
        table: &IntrospectedTable,
    ) -> GenResult<bool> {
        for p in &self.plugins {
            if !p.model_base_record_class_generated(class, table)? {
                tracing::debug!(target: "selgen", plugin = p.name(), table = %table.name, "model class disabled");
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn sql_map_document_generated(
        &self,
        document: &mut Document,
        table: &IntrospectedTable,
    ) -> GenResult<bool> {
        for p in &self.plugins {
            if !p.sql_map_document_generated(document, table)? {
                tracing::debug!(target: "selgen", plugin = p.name(), table = %table.name, "sql map disabled");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
