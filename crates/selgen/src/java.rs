//! Minimal DOM for generated Java model classes and mapper interfaces.

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaType {
    /// Name as written in source (`Long`, `Map<String, Boolean>`, `Users`).
    short_name: String,
    /// Fully qualified name to import, if one is needed.
    import: Option<String>,
    /// Name as given, e.g. `java.lang.Long`.
    qualified_name: String,
}

impl JavaType {
    /// Parse a type name. Dotted names are imported unless they live in `java.lang`;
    /// generic or undotted names are used verbatim.
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        if name.contains('<') {
            return Self::verbatim(name);
        }
        match name.rsplit_once('.') {
            Some((package, short)) => Self {
                short_name: short.to_string(),
                import: (package != "java.lang").then(|| name.to_string()),
                qualified_name: name.to_string(),
            },
            None => Self::verbatim(name),
        }
    }

    pub fn verbatim(name: &str) -> Self {
        Self {
            short_name: name.to_string(),
            import: None,
            qualified_name: name.to_string(),
        }
    }

    pub fn boolean_primitive() -> Self {
        Self::verbatim("boolean")
    }

    pub fn int_primitive() -> Self {
        Self::verbatim("int")
    }

    pub fn string() -> Self {
        Self::verbatim("String")
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn import(&self) -> Option<&str> {
        self.import.as_deref()
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
    /// Package-private.
    Default,
}

impl Visibility {
    fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public ",
            Visibility::Protected => "protected ",
            Visibility::Private => "private ",
            Visibility::Default => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: JavaType,
    pub visibility: Visibility,
    pub initialization: Option<String>,
    pub is_static: bool,
    pub is_final: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: JavaType) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Private,
            initialization: None,
            is_static: false,
            is_final: false,
        }
    }

    fn render(&self) -> String {
        let mut s = String::from(self.visibility.keyword());
        if self.is_static {
            s.push_str("static ");
        }
        if self.is_final {
            s.push_str("final ");
        }
        s.push_str(&format!("{} {}", self.ty.short_name(), self.name));
        if let Some(init) = &self.initialization {
            s.push_str(&format!(" = {init}"));
        }
        s.push(';');
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: JavaType,
    pub varargs: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: JavaType) -> Self {
        Self {
            name: name.into(),
            ty,
            varargs: false,
        }
    }

    pub fn varargs(name: impl Into<String>, ty: JavaType) -> Self {
        Self {
            name: name.into(),
            ty,
            varargs: true,
        }
    }

    fn render(&self) -> String {
        if self.varargs {
            format!("{} ... {}", self.ty.short_name(), self.name)
        } else {
            format!("{} {}", self.ty.short_name(), self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    /// `None` renders `void` unless the method is a constructor.
    pub return_type: Option<JavaType>,
    pub constructor: bool,
    pub is_static: bool,
    pub parameters: Vec<Parameter>,
    pub body: Vec<String>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            return_type: None,
            constructor: false,
            is_static: false,
            parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn constructor(name: impl Into<String>) -> Self {
        Self {
            constructor: true,
            ..Self::new(name)
        }
    }

    pub fn add_parameter(&mut self, p: Parameter) {
        self.parameters.push(p);
    }

    pub fn add_body_line(&mut self, line: impl Into<String>) {
        self.body.push(line.into());
    }

    fn signature(&self, interface: bool) -> String {
        let mut s = String::new();
        if !interface {
            s.push_str(self.visibility.keyword());
        }
        if self.is_static {
            s.push_str("static ");
        }
        if !self.constructor {
            match &self.return_type {
                Some(t) => s.push_str(t.short_name()),
                None => s.push_str("void"),
            }
            s.push(' ');
        }
        s.push_str(&self.name);
        s.push('(');
        s.push_str(
            &self
                .parameters
                .iter()
                .map(Parameter::render)
                .collect::<Vec<_>>()
                .join(", "),
        );
        s.push(')');
        s
    }

    fn types(&self) -> impl Iterator<Item = &JavaType> {
        self.return_type
            .iter()
            .chain(self.parameters.iter().map(|p| &p.ty))
    }

    fn write(&self, out: &mut String, indent: usize, interface: bool) {
        write_line(out, indent, &self.signature(interface));
        if interface {
            out.push_str(";\n");
            return;
        }
        out.push_str(" {\n");
        let mut level = indent + 1;
        for line in &self.body {
            let line = line.trim();
            if line.starts_with('}') {
                level = level.saturating_sub(1).max(indent + 1);
            }
            write_line(out, level, line);
            out.push('\n');
            if line.ends_with('{') {
                level += 1;
            }
        }
        write_line(out, indent, "}");
        out.push('\n');
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerEnum {
    pub name: String,
    pub visibility: Visibility,
    pub constants: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl InnerEnum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            constants: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn write(&self, out: &mut String, indent: usize) {
        write_line(
            out,
            indent,
            &format!("{}enum {} {{\n", self.visibility.keyword(), self.name),
        );
        let last = self.constants.len().saturating_sub(1);
        for (i, c) in self.constants.iter().enumerate() {
            let sep = if i == last { ";" } else { "," };
            write_line(out, indent + 1, &format!("{c}{sep}\n"));
        }
        for f in &self.fields {
            out.push('\n');
            write_line(out, indent + 1, &f.render());
            out.push('\n');
        }
        for m in &self.methods {
            out.push('\n');
            m.write(out, indent + 1, false);
        }
        write_line(out, indent, "}\n");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelClass {
    pub package: String,
    pub name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub imports: BTreeSet<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub inner_enums: Vec<InnerEnum>,
}

impl TopLevelClass {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            kind: ClassKind::Class,
            visibility: Visibility::Public,
            imports: BTreeSet::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            inner_enums: Vec::new(),
        }
    }

    pub fn interface(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::new(package, name)
        }
    }

    /// The type of this class, as other generated code refers to it.
    pub fn ty(&self) -> JavaType {
        if self.package.is_empty() {
            JavaType::verbatim(&self.name)
        } else {
            JavaType::new(&format!("{}.{}", self.package, self.name))
        }
    }

    pub fn add_imported_type(&mut self, ty: &JavaType) {
        if let Some(import) = ty.import() {
            let own_package = import
                .rsplit_once('.')
                .is_some_and(|(package, _)| package == self.package);
            if !own_package {
                self.imports.insert(import.to_string());
            }
        }
    }

    pub fn add_import(&mut self, fully_qualified: &str) {
        self.add_imported_type(&JavaType::new(fully_qualified));
    }

    pub fn add_field(&mut self, field: Field) {
        self.add_imported_type(&field.ty);
        self.fields.push(field);
    }

    pub fn add_method(&mut self, method: Method) {
        for t in method.types() {
            self.add_imported_type(t);
        }
        self.methods.push(method);
    }

    pub fn add_inner_enum(&mut self, inner: InnerEnum) {
        self.inner_enums.push(inner);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Methods named `name`, in declaration order (overloads included).
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn formatted_content(&self) -> String {
        let mut out = String::new();
        if !self.package.is_empty() {
            out.push_str(&format!("package {};\n\n", self.package));
        }
        if !self.imports.is_empty() {
            for i in &self.imports {
                out.push_str(&format!("import {i};\n"));
            }
            out.push('\n');
        }

        let keyword = match self.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        };
        out.push_str(&format!(
            "{}{keyword} {} {{\n",
            self.visibility.keyword(),
            self.name
        ));

        let interface = self.kind == ClassKind::Interface;
        let mut first = true;
        for f in &self.fields {
            if !first {
                out.push('\n');
            }
            first = false;
            write_line(&mut out, 1, &f.render());
            out.push('\n');
        }
        for m in &self.methods {
            if !first {
                out.push('\n');
            }
            first = false;
            m.write(&mut out, 1, interface);
        }
        for e in &self.inner_enums {
            if !first {
                out.push('\n');
            }
            first = false;
            e.write(&mut out, 1);
        }

        out.push_str("}\n");
        out
    }
}

fn write_line(out: &mut String, indent: usize, s: &str) {
    for _ in 0..indent {
        out.push_str("    ");
    }
    out.push_str(s);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_type_imports() {
        assert_eq!(JavaType::new("java.lang.Long").import(), None);
        assert_eq!(JavaType::new("java.lang.Long").short_name(), "Long");
        assert_eq!(JavaType::new("java.util.Date").import(), Some("java.util.Date"));
        assert_eq!(
            JavaType::new("Map<String, Boolean>").short_name(),
            "Map<String, Boolean>"
        );
        assert_eq!(JavaType::new("byte[]").import(), None);
    }

    #[test]
    fn renders_class_with_nested_body_indentation() {
        let mut class = TopLevelClass::new("com.example.model", "Users");
        class.add_import("java.util.Map");

        let mut f = Field::new("id", JavaType::new("java.lang.Long"));
        f.visibility = Visibility::Private;
        class.add_field(f);

        let mut m = Method::new("check");
        m.return_type = Some(JavaType::boolean_primitive());
        m.add_parameter(Parameter::new("column", JavaType::string()));
        m.add_body_line("if (column == null) {");
        m.add_body_line("return false;");
        m.add_body_line("} else {");
        m.add_body_line("return true;");
        m.add_body_line("}");
        class.add_method(m);

        let src = class.formatted_content();
        assert!(src.starts_with("package com.example.model;\n\nimport java.util.Map;\n\n"));
        assert!(src.contains("public class Users {\n    private Long id;\n\n"));
        assert!(src.contains(
            "    public boolean check(String column) {\n        if (column == null) {\n            return false;\n        } else {\n            return true;\n        }\n    }\n"
        ));
        assert!(src.ends_with("}\n"));
    }

    #[test]
    fn own_package_is_not_imported() {
        let mut class = TopLevelClass::new("com.example.model", "Users");
        class.add_imported_type(&JavaType::new("com.example.model.Other"));
        assert!(class.imports.is_empty());
    }

    #[test]
    fn interface_methods_have_no_body() {
        let mut iface = TopLevelClass::interface("com.example.mapper", "UsersMapper");
        let mut m = Method::new("insert");
        m.return_type = Some(JavaType::int_primitive());
        m.add_parameter(Parameter::new("record", JavaType::new("com.example.model.Users")));
        iface.add_method(m);

        let src = iface.formatted_content();
        assert!(src.contains("import com.example.model.Users;\n"));
        assert!(src.contains("public interface UsersMapper {\n    int insert(Users record);\n}\n"));
    }

    #[test]
    fn renders_varargs_and_enums() {
        let mut class = TopLevelClass::new("", "Users");
        let mut m = Method::new("selective");
        m.return_type = Some(class.ty());
        m.add_parameter(Parameter::varargs("columns", JavaType::verbatim("Column")));
        m.add_body_line("return this;");
        class.add_method(m);

        let mut e = InnerEnum::new("Column");
        e.constants.push("id(\"id\")".to_string());
        e.constants.push("name(\"name\")".to_string());
        class.add_inner_enum(e);

        let src = class.formatted_content();
        assert!(src.contains("public Users selective(Column ... columns) {"));
        assert!(src.contains("    public enum Column {\n        id(\"id\"),\n        name(\"name\");\n    }\n"));
    }
}
