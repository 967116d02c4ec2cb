//! Built-in tag rules for taglint
//!
//! One checker per dialect (`json`, `bson`, `binding`), the type-shape predicates they
//! rely on, and [`TagLinter`], which runs the enabled dialects over a package.

pub mod builtin;
pub mod engine;

#[cfg(test)]
mod test_support;

pub use builtin::{
    BindingTagChecker, BsonTagChecker, JsonTagChecker, is_bson_inlineable, is_bson_minsizeable,
    is_json_scalar, is_pointer_or_interface, is_valid_name,
};
pub use engine::{BUILTIN_RULES, RuleMetadata, TagLinter, checker_for, rule_metadata};
