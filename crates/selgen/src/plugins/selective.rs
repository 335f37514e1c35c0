//! Selective column support for `insertSelective`.
//!
//! The model side gains a per-instance selection set:
//!
//! ```java
//! record.selective(Column.name, Column.email);
//! ```
//!
//! The SQL map side has every `<trim>` of the `insertSelective` statement rewritten from
//! a flat list of `<if test="x != null">` clauses into
//!
//! ```xml
//! <trim ...>
//!   <choose>
//!     <when test="_parameter.isSelective()">
//!       <if test="_parameter.isSelective(x)">x,</if>
//!     </when>
//!     <otherwise>
//!       <if test="x != null">x,</if>
//!     </otherwise>
//!   </choose>
//! </trim>
//! ```
//!
//! so a record with a selection writes exactly the selected columns, and a record
//! without one keeps the usual non-null behaviour.

use crate::error::{GenError, GenResult};
use crate::java::{Field, JavaType, Method, Parameter, TopLevelClass, Visibility};
use crate::plugin::{GeneratorContext, Plugin, TARGET_RUNTIME_MYBATIS3};
use crate::plugins::field_name::extract_field;
use crate::plugins::model_column::{ENUM_NAME, ModelColumnPlugin};
use crate::table::IntrospectedTable;
use crate::xml::{Document, TextElement, XmlElement, XmlNode};

/// Statement whose trimming wrappers are rewritten.
pub const INSERT_SELECTIVE_ID: &str = "insertSelective";
/// Tag of the trimming wrapper, matched ignoring case.
pub const TRIM_TAG: &str = "trim";
/// Receiver of the generated guard calls inside `insertSelective`.
pub const PARAMETER_PREFIX: &str = "_parameter.";
/// Model field holding the selection set.
pub const SELECTION_FIELD: &str = "selectiveColumns";

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectiveEnhancedPlugin {
    strict_field_names: bool,
}

impl SelectiveEnhancedPlugin {
    pub const NAME: &'static str = "selective_enhanced";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`GenError::FieldName`] instead of emitting `isSelective()` with an
    /// empty argument when a clause's field cannot be recovered.
    pub fn strict_field_names(mut self, strict: bool) -> Self {
        self.strict_field_names = strict;
        self
    }

    /// Rewrites every trimming wrapper of the `insertSelective` statement(s).
    /// Returns the number of wrappers rewritten.
    pub fn rewrite_document(&self, document: &mut Document) -> GenResult<usize> {
        let mut rewritten = 0;
        let mut found = false;
        for statement in document.root.child_elements_mut() {
            if statement.attribute("id") != Some(INSERT_SELECTIVE_ID) {
                continue;
            }
            found = true;
            rewritten += self.rewrite_wrappers_in(statement)?;
        }
        if !found {
            tracing::debug!(target: "selgen", "no {INSERT_SELECTIVE_ID} statement, nothing to rewrite");
        }
        Ok(rewritten)
    }

    fn rewrite_wrappers_in(&self, element: &mut XmlElement) -> GenResult<usize> {
        let mut rewritten = 0;
        for child in element.child_elements_mut() {
            if child.name.eq_ignore_ascii_case(TRIM_TAG) {
                if rewrite_wrapper(child, PARAMETER_PREFIX, self.strict_field_names)? {
                    rewritten += 1;
                }
            } else {
                rewritten += self.rewrite_wrappers_in(child)?;
            }
        }
        Ok(rewritten)
    }
}

impl Plugin for SelectiveEnhancedPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, ctx: &GeneratorContext, warnings: &mut Vec<String>) -> bool {
        if let Some(runtime) = ctx.target_runtime.as_deref() {
            if !runtime.trim().is_empty() && !runtime.eq_ignore_ascii_case(TARGET_RUNTIME_MYBATIS3)
            {
                warnings.push(format!(
                    "plugin {} requires target runtime {TARGET_RUNTIME_MYBATIS3} (got {runtime})",
                    Self::NAME
                ));
                return false;
            }
        }

        if !ctx.has_plugin(ModelColumnPlugin::NAME) {
            warnings.push(format!(
                "plugin {} requires plugin {} to be enabled",
                Self::NAME,
                ModelColumnPlugin::NAME
            ));
            return false;
        }

        true
    }

    fn model_base_record_class_generated(
        &self,
        class: &mut TopLevelClass,
        _table: &IntrospectedTable,
    ) -> GenResult<bool> {
        augment_model(class);
        Ok(true)
    }

    fn sql_map_document_generated(
        &self,
        document: &mut Document,
        table: &IntrospectedTable,
    ) -> GenResult<bool> {
        let rewritten = self.rewrite_document(document)?;
        tracing::debug!(target: "selgen", table = %table.name, rewritten, "selective rewrite done");
        Ok(true)
    }
}

/// Adds the selection set field plus `isSelective` and `selective` to a model class.
pub fn augment_model(class: &mut TopLevelClass) {
    class.add_import("java.util.Map");
    class.add_import("java.util.HashMap");

    let mut field = Field::new(SELECTION_FIELD, JavaType::new("Map<String, Boolean>"));
    field.visibility = Visibility::Private;
    field.initialization = Some("new HashMap<String, Boolean>()".to_string());
    class.add_field(field);

    let mut any = Method::new("isSelective");
    any.return_type = Some(JavaType::boolean_primitive());
    any.add_body_line(format!("return this.{SELECTION_FIELD}.size() > 0;"));
    class.add_method(any);

    let mut one = Method::new("isSelective");
    one.return_type = Some(JavaType::boolean_primitive());
    one.add_parameter(Parameter::new("column", JavaType::string()));
    one.add_body_line("if (column == null) {");
    one.add_body_line(format!("return this.{SELECTION_FIELD}.size() > 0;"));
    one.add_body_line("} else {");
    one.add_body_line(format!("return this.{SELECTION_FIELD}.get(column) != null;"));
    one.add_body_line("}");
    class.add_method(one);

    let mut selective = Method::new("selective");
    selective.return_type = Some(class.ty());
    selective.add_parameter(Parameter::varargs("columns", JavaType::verbatim(ENUM_NAME)));
    selective.add_body_line(format!("this.{SELECTION_FIELD}.clear();"));
    selective.add_body_line("if (columns != null) {");
    selective.add_body_line(format!("for ({ENUM_NAME} column : columns) {{"));
    selective.add_body_line(format!("this.{SELECTION_FIELD}.put(column.value(), true);"));
    selective.add_body_line("}");
    selective.add_body_line("}");
    selective.add_body_line("return this;");
    class.add_method(selective);
}

/// Rewrites one trimming wrapper in place.
///
/// Returns `Ok(false)` without touching the wrapper when it already holds a single
/// `<choose>` (a previous rewrite). Every child is checked before anything is moved, so
/// a structure error leaves the wrapper as it was.
pub fn rewrite_wrapper(wrapper: &mut XmlElement, prefix: &str, strict: bool) -> GenResult<bool> {
    if is_rewritten(wrapper) {
        tracing::debug!(target: "selgen", "trim already rewritten, skipping");
        return Ok(false);
    }

    let mut guards: Vec<(String, TextElement)> = Vec::with_capacity(wrapper.children.len());
    for child in &wrapper.children {
        let XmlNode::Element(clause) = child else {
            return Err(GenError::structure(
                &wrapper.name,
                "expected only conditional elements, found a text node",
            ));
        };
        let text = match clause.children.as_slice() {
            [XmlNode::Text(t)] => t,
            _ => {
                return Err(GenError::structure(
                    &clause.name,
                    "expected exactly one text child",
                ));
            }
        };

        let field = extract_field(text.content());
        if field.is_empty() {
            if strict {
                return Err(GenError::FieldName {
                    text: text.content().to_string(),
                });
            }
            tracing::warn!(
                target: "selgen",
                text = text.content(),
                "could not extract a field name; emitting an empty guard"
            );
        }
        guards.push((field.name, text.clone()));
    }

    let mut when = XmlElement::new("when").with_attribute("test", format!("{prefix}isSelective()"));
    for (field, text) in guards {
        let mut guard =
            XmlElement::new("if").with_attribute("test", format!("{prefix}isSelective({field})"));
        guard.add_node(text);
        when.add_element(guard);
    }

    let mut otherwise = XmlElement::new("otherwise");
    otherwise.children = std::mem::take(&mut wrapper.children);

    let mut choose = XmlElement::new("choose");
    choose.add_element(when);
    choose.add_element(otherwise);

    wrapper.add_element(choose);
    Ok(true)
}

fn is_rewritten(wrapper: &XmlElement) -> bool {
    matches!(
        wrapper.children.as_slice(),
        [XmlNode::Element(e)] if e.name == "choose"
    )
}
