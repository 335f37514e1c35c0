//! selgen
//!
//! Generates MyBatis-style model classes and SQL map documents from table metadata, and
//! enhances them with selective column writes.
//!
//! The selective enhancement has two halves that meet only through the name
//! `isSelective`:
//!
//! - the model class gets a selection set plus `isSelective(...)` / `selective(...)`;
//! - the `insertSelective` statement has each `<trim>` rewritten into a `<choose>` that
//!   writes exactly the selected columns when a selection exists, and falls back to the
//!   usual non-null checks otherwise.
//!
//! # Example
//!
//! ```
//! use selgen::plugins::selective::{PARAMETER_PREFIX, rewrite_wrapper};
//! use selgen::xml::XmlElement;
//!
//! let mut clause = XmlElement::new("if").with_attribute("test", "name != null");
//! clause.add_text("name = #{name},");
//! let mut trim = XmlElement::new("trim").with_attribute("suffixOverrides", ",");
//! trim.add_element(clause);
//!
//! assert!(rewrite_wrapper(&mut trim, PARAMETER_PREFIX, false).unwrap());
//! let choose = trim.child_elements().next().unwrap();
//! let when = choose.child_elements().next().unwrap();
//! let guard = when.child_elements().next().unwrap();
//! assert_eq!(guard.attribute("test"), Some("_parameter.isSelective(name)"));
//! ```

pub mod client;
pub mod error;
pub mod generate;
pub mod java;
pub mod mapper;
pub mod model;
pub mod plugin;
pub mod plugins;
pub mod selection;
pub mod table;
pub mod type_mapper;
pub mod xml;

pub use error::{GenError, GenResult};
pub use generate::{GeneratedFile, Generator, OutputLayout};
pub use plugin::{GeneratorContext, Plugin, PluginChain, TARGET_RUNTIME_MYBATIS3};
pub use plugins::{ModelColumnPlugin, SelectiveEnhancedPlugin};
pub use selection::SelectionSet;
pub use table::{ColumnInfo, DbSchema, IntrospectedColumn, IntrospectedTable, TableInfo, TableOptions};
pub use type_mapper::TypeMapper;
pub use xml::{Document, TextElement, XmlElement, XmlNode};
