//! Adds a `Column` enumeration to every model class.
//!
//! Each constant is named after the Java property and carries the SQL column name, which
//! `value()` returns. Other plugins take `Column` values to refer to columns type-safely.

use crate::error::GenResult;
use crate::java::{Field, InnerEnum, JavaType, Method, Parameter, TopLevelClass, Visibility};
use crate::plugin::Plugin;
use crate::table::IntrospectedTable;

/// Name of the generated inner enumeration.
pub const ENUM_NAME: &str = "Column";

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelColumnPlugin;

impl ModelColumnPlugin {
    pub const NAME: &'static str = "model_column";
}

impl Plugin for ModelColumnPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn model_base_record_class_generated(
        &self,
        class: &mut TopLevelClass,
        table: &IntrospectedTable,
    ) -> GenResult<bool> {
        class.add_inner_enum(column_enum(table));
        Ok(true)
    }
}

fn column_enum(table: &IntrospectedTable) -> InnerEnum {
    let mut e = InnerEnum::new(ENUM_NAME);

    for c in &table.columns {
        e.constants
            .push(format!("{}(\"{}\")", c.property, escape_java(&c.name)));
    }

    let mut column = Field::new("column", JavaType::string());
    column.is_final = true;
    e.fields.push(column);

    let mut value = Method::new("value");
    value.return_type = Some(JavaType::string());
    value.add_body_line("return this.column;");
    e.methods.push(value);

    let mut get_value = Method::new("getValue");
    get_value.return_type = Some(JavaType::string());
    get_value.add_body_line("return this.column;");
    e.methods.push(get_value);

    let mut ctor = Method::constructor(ENUM_NAME);
    ctor.visibility = Visibility::Default;
    ctor.add_parameter(Parameter::new("column", JavaType::string()));
    ctor.add_body_line("this.column = column;");
    e.methods.push(ctor);

    e
}

fn escape_java(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
