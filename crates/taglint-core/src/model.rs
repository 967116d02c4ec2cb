//! Front-end model of the code being checked
//!
//! An external front end parses and type-checks the host sources and exports what the
//! checker needs: struct definitions, their fields, each field's raw tag literal and
//! resolved type, and byte spans for the tag and the type expression. The model is
//! plain serde data so exports can be exchanged as JSON or YAML.

use crate::error::TaglintError;
use crate::result::Result;
use crate::types::TypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Byte range `[start, end)` in a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Produces the exact source text for a span
pub trait Render {
    fn render(&self, span: Span) -> Option<String>;
}

/// Raw tag literal attached to a field, exactly as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagLiteral {
    /// Literal text including its quotes, e.g. `` `json:"a"` ``
    pub literal: String,
    pub span: Span,
}

/// One field of a struct definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field identifier; absent for embedded fields
    #[serde(default)]
    pub name: Option<String>,
    /// Resolved declared type; absent when resolution failed
    #[serde(default, rename = "type")]
    pub ty: Option<TypeDescriptor>,
    #[serde(default)]
    pub type_span: Span,
    #[serde(default)]
    pub tag: Option<TagLiteral>,
    /// Struct type literals appearing inside this field's type expression
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<StructDef>,
}

/// A struct type, named or anonymous
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// One source file and the structs declared in it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Full source text, used to render spans and compute line/column positions
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
}

impl Render for SourceFile {
    fn render(&self, span: Span) -> Option<String> {
        self.source
            .as_deref()
            .and_then(|src| src.get(span.range()))
            .map(str::to_string)
    }
}

/// A compilation unit: every file the front end exported together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Package {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl Package {
    /// Load an export written as JSON or YAML (chosen by file extension)
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TaglintError::io_error(path, e))?;
        Self::from_str_with_extension(&content, path)
    }

    fn from_str_with_extension(content: &str, path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str());
        match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(content)
                .map_err(|e| TaglintError::model_error(path, e.to_string())),
            Some("json") => serde_json::from_str(content)
                .map_err(|e| TaglintError::model_error(path, e.to_string())),
            _ => Err(TaglintError::model_error(
                path,
                "Unsupported file extension (expected .json, .yaml or .yml)",
            )),
        }
    }

    /// Total number of struct definitions, nested ones included
    pub fn struct_count(&self) -> usize {
        fn count(def: &StructDef) -> usize {
            1 + def
                .fields
                .iter()
                .flat_map(|f| f.nested.iter())
                .map(count)
                .sum::<usize>()
        }
        self.files
            .iter()
            .flat_map(|f| f.structs.iter())
            .map(count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_slices_source() {
        let file = SourceFile {
            path: PathBuf::from("a.go"),
            source: Some("A int `json:\"a\"`".to_string()),
            structs: Vec::new(),
        };
        assert_eq!(file.render(Span::new(2, 5)).as_deref(), Some("int"));
        assert_eq!(file.render(Span::new(6, 16)).as_deref(), Some("`json:\"a\"`"));
        assert_eq!(file.render(Span::new(6, 100)), None);
    }

    #[test]
    fn test_render_without_source() {
        let file = SourceFile::default();
        assert_eq!(file.render(Span::new(0, 1)), None);
    }

    #[test]
    fn test_load_json_export() {
        let json = r#"{
            "files": [{
                "path": "example/pkg.go",
                "structs": [{
                    "name": "Type3",
                    "fields": [{
                        "name": "B",
                        "type": {"kind": "basic", "basic": "bool"},
                        "typeSpan": {"start": 10, "end": 14},
                        "tag": {"literal": "`binding:\"exists\"`", "span": {"start": 15, "end": 33}},
                        "nested": [{"fields": []}]
                    }]
                }]
            }]
        }"#;
        let package =
            Package::from_str_with_extension(json, Path::new("pkg.taglint.json")).unwrap();
        let field = &package.files[0].structs[0].fields[0];
        assert_eq!(field.name.as_deref(), Some("B"));
        assert_eq!(field.type_span, Span::new(10, 14));
        assert_eq!(package.struct_count(), 2);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = Package::from_str_with_extension("{}", Path::new("pkg.txt")).unwrap_err();
        assert!(matches!(err, TaglintError::ModelError { .. }));
    }
}
