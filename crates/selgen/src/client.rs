use crate::java::{JavaType, Method, Parameter, TopLevelClass};
use crate::table::IntrospectedTable;

/// Mapper interface whose methods line up with the statements of the SQL map document.
pub fn mapper_interface(table: &IntrospectedTable) -> TopLevelClass {
    let mut iface = TopLevelClass::interface(&table.mapper_package, table.mapper_name());
    let record = table.model_type();

    let pk = table.primary_key_column();
    if let Some(pk) = pk {
        iface.add_method(method_with(
            "deleteByPrimaryKey",
            JavaType::int_primitive(),
            Parameter::new(&pk.property, pk.java_type.clone()),
        ));
    }

    iface.add_method(method_with(
        "insert",
        JavaType::int_primitive(),
        Parameter::new("record", record.clone()),
    ));
    iface.add_method(method_with(
        "insertSelective",
        JavaType::int_primitive(),
        Parameter::new("record", record.clone()),
    ));

    if let Some(pk) = pk {
        iface.add_method(method_with(
            "selectByPrimaryKey",
            record.clone(),
            Parameter::new(&pk.property, pk.java_type.clone()),
        ));
        if table.non_primary_key_columns().next().is_some() {
            iface.add_method(method_with(
                "updateByPrimaryKeySelective",
                JavaType::int_primitive(),
                Parameter::new("record", record.clone()),
            ));
            iface.add_method(method_with(
                "updateByPrimaryKey",
                JavaType::int_primitive(),
                Parameter::new("record", record),
            ));
        }
    }

    iface
}

fn method_with(name: &str, return_type: JavaType, param: Parameter) -> Method {
    let mut m = Method::new(name);
    m.return_type = Some(return_type);
    m.add_parameter(param);
    m
}
