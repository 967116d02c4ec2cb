//! Built-in dialect rules

pub mod binding;
pub mod bson;
pub mod json;

pub use binding::{BindingTagChecker, is_pointer_or_interface};
pub use bson::{BsonTagChecker, is_bson_inlineable, is_bson_minsizeable};
pub use json::{JsonTagChecker, is_json_scalar, is_valid_name};
