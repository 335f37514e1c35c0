//! The SQL map document generated for each table before plugins run.

use crate::table::{IntrospectedColumn, IntrospectedTable};
use crate::xml::{Document, XmlElement};

pub const BASE_RESULT_MAP: &str = "BaseResultMap";
pub const BASE_COLUMN_LIST: &str = "Base_Column_List";

pub fn sql_map_document(table: &IntrospectedTable) -> Document {
    let mut root = XmlElement::new("mapper").with_attribute("namespace", table.mapper_namespace());

    root.add_element(result_map(table));
    root.add_element(base_column_list(table));
    if let Some(pk) = table.primary_key_column() {
        root.add_element(select_by_primary_key(table, pk));
        root.add_element(delete_by_primary_key(table, pk));
    }
    root.add_element(insert(table));
    root.add_element(insert_selective(table));
    if let Some(pk) = table.primary_key_column() {
        if table.non_primary_key_columns().next().is_some() {
            root.add_element(update_by_primary_key_selective(table, pk));
            root.add_element(update_by_primary_key(table, pk));
        }
    }

    Document::mapper(root)
}

fn result_map(table: &IntrospectedTable) -> XmlElement {
    let mut e = XmlElement::new("resultMap")
        .with_attribute("id", BASE_RESULT_MAP)
        .with_attribute("type", table.model_type_name());
    let pk = table.primary_key_column().map(|c| c.name.as_str());
    for c in &table.columns {
        let tag = if Some(c.name.as_str()) == pk { "id" } else { "result" };
        e.add_element(
            XmlElement::new(tag)
                .with_attribute("column", &c.name)
                .with_attribute("jdbcType", &c.jdbc_type)
                .with_attribute("property", &c.property),
        );
    }
    e
}

fn column_list(table: &IntrospectedTable) -> String {
    table
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn base_column_list(table: &IntrospectedTable) -> XmlElement {
    let mut e = XmlElement::new("sql").with_attribute("id", BASE_COLUMN_LIST);
    e.add_text(column_list(table));
    e
}

fn select_by_primary_key(table: &IntrospectedTable, pk: &IntrospectedColumn) -> XmlElement {
    let mut e = XmlElement::new("select")
        .with_attribute("id", "selectByPrimaryKey")
        .with_attribute("parameterType", pk.java_type.qualified_name())
        .with_attribute("resultMap", BASE_RESULT_MAP);
    e.add_text("select");
    e.add_element(XmlElement::new("include").with_attribute("refid", BASE_COLUMN_LIST));
    e.add_text(format!("from {}", table.sql_table_name()));
    e.add_text(format!("where {} = {}", pk.name, pk.placeholder()));
    e
}

fn delete_by_primary_key(table: &IntrospectedTable, pk: &IntrospectedColumn) -> XmlElement {
    let mut e = XmlElement::new("delete")
        .with_attribute("id", "deleteByPrimaryKey")
        .with_attribute("parameterType", pk.java_type.qualified_name());
    e.add_text(format!("delete from {}", table.sql_table_name()));
    e.add_text(format!("where {} = {}", pk.name, pk.placeholder()));
    e
}

fn insert(table: &IntrospectedTable) -> XmlElement {
    let mut e = XmlElement::new("insert")
        .with_attribute("id", "insert")
        .with_attribute("parameterType", table.model_type_name());
    e.add_text(format!(
        "insert into {} ({})",
        table.sql_table_name(),
        column_list(table)
    ));
    e.add_text(format!(
        "values ({})",
        table
            .columns
            .iter()
            .map(IntrospectedColumn::placeholder)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    e
}

fn if_not_null(c: &IntrospectedColumn, text: String) -> XmlElement {
    let mut e = XmlElement::new("if").with_attribute("test", format!("{} != null", c.property));
    e.add_text(text);
    e
}

fn insert_selective(table: &IntrospectedTable) -> XmlElement {
    let mut e = XmlElement::new("insert")
        .with_attribute("id", "insertSelective")
        .with_attribute("parameterType", table.model_type_name());
    e.add_text(format!("insert into {}", table.sql_table_name()));

    let mut columns = XmlElement::new("trim")
        .with_attribute("prefix", "(")
        .with_attribute("suffix", ")")
        .with_attribute("suffixOverrides", ",");
    let mut values = XmlElement::new("trim")
        .with_attribute("prefix", "values (")
        .with_attribute("suffix", ")")
        .with_attribute("suffixOverrides", ",");
    for c in &table.columns {
        columns.add_element(if_not_null(c, format!("{},", c.name)));
        values.add_element(if_not_null(c, format!("{},", c.placeholder())));
    }

    e.add_element(columns);
    e.add_element(values);
    e
}

fn update_by_primary_key_selective(
    table: &IntrospectedTable,
    pk: &IntrospectedColumn,
) -> XmlElement {
    let mut e = XmlElement::new("update")
        .with_attribute("id", "updateByPrimaryKeySelective")
        .with_attribute("parameterType", table.model_type_name());
    e.add_text(format!("update {}", table.sql_table_name()));

    let mut set = XmlElement::new("set");
    for c in table.non_primary_key_columns() {
        set.add_element(if_not_null(c, format!("{} = {},", c.name, c.placeholder())));
    }
    e.add_element(set);
    e.add_text(format!("where {} = {}", pk.name, pk.placeholder()));
    e
}

fn update_by_primary_key(table: &IntrospectedTable, pk: &IntrospectedColumn) -> XmlElement {
    let mut e = XmlElement::new("update")
        .with_attribute("id", "updateByPrimaryKey")
        .with_attribute("parameterType", table.model_type_name());
    e.add_text(format!("update {}", table.sql_table_name()));
    let assignments = table
        .non_primary_key_columns()
        .map(|c| format!("{} = {}", c.name, c.placeholder()))
        .collect::<Vec<_>>();
    e.add_text(format!("set {}", assignments.join(",\n  ")));
    e.add_text(format!("where {} = {}", pk.name, pk.placeholder()));
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnInfo, TableInfo, TableOptions};
    use crate::type_mapper::TypeMapper;

    fn table(with_id: bool) -> IntrospectedTable {
        let mut columns = vec![ColumnInfo {
            name: "user_name".to_string(),
            data_type: "varchar".to_string(),
            not_null: true,
            default_expr: None,
            ordinal: 2,
        }];
        if with_id {
            columns.push(ColumnInfo {
                name: "id".to_string(),
                data_type: "integer".to_string(),
                not_null: true,
                default_expr: None,
                ordinal: 1,
            });
        }
        let info = TableInfo {
            schema: "public".to_string(),
            name: "users".to_string(),
            columns,
        };
        let opts = TableOptions {
            model_package: "m".to_string(),
            mapper_package: "d".to_string(),
            ..Default::default()
        };
        IntrospectedTable::new(&info, &opts, &TypeMapper::default()).unwrap()
    }

    #[test]
    fn insert_selective_has_two_trims_of_if_clauses() {
        let doc = sql_map_document(&table(true));
        assert_eq!(doc.root.attribute("namespace"), Some("d.UsersMapper"));

        let stmt = doc.statement("insertSelective").unwrap();
        let trims = stmt.find_children("trim");
        assert_eq!(trims.len(), 2);

        let column_texts: Vec<&str> = trims[0]
            .child_elements()
            .map(|e| e.children[0].as_text().unwrap().content())
            .collect();
        assert_eq!(column_texts, vec!["id,", "user_name,"]);

        let value_texts: Vec<&str> = trims[1]
            .child_elements()
            .map(|e| e.children[0].as_text().unwrap().content())
            .collect();
        assert_eq!(
            value_texts,
            vec!["#{id,jdbcType=INTEGER},", "#{userName,jdbcType=VARCHAR},"]
        );
        assert_eq!(
            trims[1].child_elements().nth(1).unwrap().attribute("test"),
            Some("userName != null")
        );
    }

    #[test]
    fn update_selective_uses_assignments() {
        let doc = sql_map_document(&table(true));
        let stmt = doc.statement("updateByPrimaryKeySelective").unwrap();
        let set = stmt.find_children("set")[0];
        let text = set.child_elements().next().unwrap().children[0]
            .as_text()
            .unwrap()
            .content();
        assert_eq!(text, "user_name = #{userName,jdbcType=VARCHAR},");
    }

    #[test]
    fn primary_key_statements_need_a_primary_key() {
        let doc = sql_map_document(&table(false));
        assert!(doc.statement("insertSelective").is_some());
        assert!(doc.statement("selectByPrimaryKey").is_none());
        assert!(doc.statement("updateByPrimaryKeySelective").is_none());
    }

    #[test]
    fn renders_mapper_xml() {
        let xml = sql_map_document(&table(true)).formatted_content();
        assert!(xml.contains("<mapper namespace=\"d.UsersMapper\">\n"));
        assert!(xml.contains(
            "  <insert id=\"insertSelective\" parameterType=\"m.Users\">\n    insert into users\n    <trim prefix=\"(\" suffix=\")\" suffixOverrides=\",\">\n      <if test=\"id != null\">\n        id,\n      </if>\n"
        ));
        assert!(xml.contains("    <include refid=\"Base_Column_List\" />\n"));
    }
}
