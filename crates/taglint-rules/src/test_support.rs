//! Helpers for building small packages in unit tests

use std::path::PathBuf;
use taglint_core::{
    DefaultDiagnosticCollector, Diagnostic, FieldDef, Package, SourceFile, Span, StructDef,
    TagChecker, TagLiteral, TypeDescriptor, run_tag_checker,
};

pub(crate) fn field(name: &str, ty: Option<TypeDescriptor>, literal: &str) -> FieldDef {
    FieldDef {
        name: Some(name.to_string()),
        ty,
        type_span: Span::default(),
        tag: Some(TagLiteral {
            literal: literal.to_string(),
            span: Span::default(),
        }),
        nested: Vec::new(),
    }
}

/// Type span given to the field at `index` by [`lint_fields`]
pub(crate) fn type_span(index: usize) -> Span {
    Span::new(index * 100, index * 100 + 10)
}

fn tag_span(index: usize, literal: &str) -> Span {
    Span::new(index * 100 + 20, index * 100 + 20 + literal.len())
}

/// Run `checker` over one struct holding `fields`, without source text
pub(crate) fn lint_fields(checker: &dyn TagChecker, mut fields: Vec<FieldDef>) -> Vec<Diagnostic> {
    for (index, field) in fields.iter_mut().enumerate() {
        field.type_span = type_span(index);
        if let Some(tag) = field.tag.as_mut() {
            tag.span = tag_span(index, &tag.literal);
        }
    }

    let package = Package {
        name: None,
        files: vec![SourceFile {
            path: PathBuf::from("test.go"),
            source: None,
            structs: vec![StructDef {
                name: Some("T".to_string()),
                span: Span::default(),
                fields,
            }],
        }],
    };

    let mut collector = DefaultDiagnosticCollector::new();
    run_tag_checker(&package, checker, &mut collector);
    collector.drain()
}
