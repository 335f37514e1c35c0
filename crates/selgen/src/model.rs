use crate::java::{Field, Method, Parameter, TopLevelClass, Visibility};
use crate::table::IntrospectedTable;

/// The plain record class: one private field per column plus getters and setters.
pub fn base_record_class(table: &IntrospectedTable) -> TopLevelClass {
    let mut class = TopLevelClass::new(&table.model_package, &table.domain_object_name);

    for c in &table.columns {
        let mut f = Field::new(&c.property, c.java_type.clone());
        f.visibility = Visibility::Private;
        class.add_field(f);
    }

    for c in &table.columns {
        let mut getter = Method::new(c.getter_name());
        getter.return_type = Some(c.java_type.clone());
        getter.add_body_line(format!("return {};", c.property));
        class.add_method(getter);

        let mut setter = Method::new(c.setter_name());
        setter.add_parameter(Parameter::new(&c.property, c.java_type.clone()));
        setter.add_body_line(format!("this.{0} = {0};", c.property));
        class.add_method(setter);
    }

    class
}
