//! Field traversal shared by every dialect
//!
//! [`run_tag_checker`] walks each struct definition of a [`Package`] in pre-order: the
//! struct's own fields in declaration order, then the struct types nested inside those
//! fields. For every tagged field the literal is unquoted and the checker's key looked
//! up; only fields that carry the key reach [`TagChecker::check_field`].

use crate::diagnostics::{Diagnostic, DiagnosticCollector, Location, Severity, SourceMap};
use crate::model::{FieldDef, Package, Render, SourceFile, Span, StructDef, TagLiteral};
use crate::tag;
use tracing::{debug, trace};

/// Rule id for tag literals that cannot be unquoted
pub const INVALID_TAG: &str = "tag/invalid-tag";

/// A per-dialect check over one field's tag value
pub trait TagChecker {
    /// Tag key this checker reads, e.g. `json`
    fn key(&self) -> &'static str;

    /// Check one field whose tag carries [`TagChecker::key`]; `value` is the raw
    /// dialect value such as `name,omitempty`
    fn check_field(&self, ctx: &mut FieldContext<'_>, value: &str);
}

/// Everything a checker may inspect or report about the field being visited
pub struct FieldContext<'a> {
    file: &'a SourceFile,
    source_map: Option<&'a SourceMap>,
    field: &'a FieldDef,
    tag: &'a TagLiteral,
    collector: &'a mut dyn DiagnosticCollector,
}

impl<'a> FieldContext<'a> {
    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    pub fn field(&self) -> &'a FieldDef {
        self.field
    }

    pub fn tag(&self) -> &'a TagLiteral {
        self.tag
    }

    /// Location of `span` in the current file
    pub fn location(&self, span: Span) -> Location {
        let source_map = match (self.source_map, self.file.source.as_deref()) {
            (Some(map), Some(source)) => Some((map, source)),
            _ => None,
        };
        Location::from_span(&self.file.path, span, source_map)
    }

    pub fn tag_location(&self) -> Location {
        self.location(self.tag.span)
    }

    pub fn type_location(&self) -> Location {
        self.location(self.field.type_span)
    }

    /// Source text of the tag literal, falling back to the literal itself
    pub fn render_tag(&self) -> String {
        self.file
            .render(self.tag.span)
            .unwrap_or_else(|| self.tag.literal.clone())
    }

    /// Source text of the type expression, falling back to the resolved type
    pub fn render_type(&self) -> String {
        self.file
            .render(self.field.type_span)
            .filter(|text| !text.is_empty())
            .or_else(|| self.field.ty.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "<unresolved>".to_string())
    }

    /// Build a diagnostic at the tag span with the rendered tag appended to `message`
    pub fn tag_diagnostic(&self, rule_id: &str, severity: Severity, message: &str) -> Diagnostic {
        Diagnostic::new(
            rule_id,
            severity,
            format!("{message}: {}", self.render_tag()),
            self.tag_location(),
        )
    }

    /// Build a diagnostic at the type span with the rendered type appended to `message`
    pub fn type_diagnostic(&self, rule_id: &str, severity: Severity, message: &str) -> Diagnostic {
        Diagnostic::new(
            rule_id,
            severity,
            format!("{message}: {}", self.render_type()),
            self.type_location(),
        )
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        trace!(rule = %diagnostic.rule_id, "reporting {}", diagnostic.location);
        self.collector.collect(diagnostic);
    }
}

/// Run `checker` over every tagged field in `package`
pub fn run_tag_checker(
    package: &Package,
    checker: &dyn TagChecker,
    collector: &mut dyn DiagnosticCollector,
) {
    let key = checker.key();
    for file in &package.files {
        debug!(file = %file.path.display(), key, "checking file");
        let source_map = file.source.as_deref().map(SourceMap::new);
        let mut walker = Walker {
            file,
            source_map: source_map.as_ref(),
            checker,
            collector: &mut *collector,
        };
        for def in &file.structs {
            walker.visit_struct(def);
        }
    }
}

struct Walker<'a, 'c> {
    file: &'a SourceFile,
    source_map: Option<&'a SourceMap>,
    checker: &'a dyn TagChecker,
    collector: &'c mut dyn DiagnosticCollector,
}

impl<'a> Walker<'a, '_> {
    fn visit_struct(&mut self, def: &'a StructDef) {
        debug!(
            name = def.name.as_deref().unwrap_or("<anonymous>"),
            fields = def.fields.len(),
            "visiting struct"
        );
        for field in &def.fields {
            self.visit_field(field);
        }
        for nested in def.fields.iter().flat_map(|f| f.nested.iter()) {
            self.visit_struct(nested);
        }
    }

    fn visit_field(&mut self, field: &'a FieldDef) {
        let Some(tag_literal) = &field.tag else {
            return;
        };

        let mut ctx = FieldContext {
            file: self.file,
            source_map: self.source_map,
            field,
            tag: tag_literal,
            collector: &mut *self.collector,
        };

        let tag_value = match tag::unquote(&tag_literal.literal) {
            Ok(value) => value,
            Err(err) => {
                debug!("{err}");
                let diagnostic = ctx.tag_diagnostic(INVALID_TAG, Severity::Error, "invalid tag");
                ctx.report(diagnostic);
                return;
            }
        };

        let key = self.checker.key();
        match tag::lookup(&tag_value, key) {
            Some(value) => {
                trace!(
                    field = field.name.as_deref().unwrap_or("<embedded>"),
                    key,
                    value = value.as_str(),
                    "checking field"
                );
                self.checker.check_field(&mut ctx, &value);
            }
            None => trace!(
                field = field.name.as_deref().unwrap_or("<embedded>"),
                key,
                "key absent, skipping"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DefaultDiagnosticCollector;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct Recorder {
        seen: RefCell<Vec<(String, String)>>,
    }

    impl TagChecker for Recorder {
        fn key(&self) -> &'static str {
            "json"
        }

        fn check_field(&self, ctx: &mut FieldContext<'_>, value: &str) {
            let name = ctx.field().name.clone().unwrap_or_default();
            self.seen.borrow_mut().push((name, value.to_string()));
        }
    }

    fn field(name: &str, literal: Option<&str>, nested: Vec<StructDef>) -> FieldDef {
        FieldDef {
            name: Some(name.to_string()),
            ty: None,
            type_span: Span::default(),
            tag: literal.map(|literal| TagLiteral {
                literal: literal.to_string(),
                span: Span::new(0, literal.len()),
            }),
            nested,
        }
    }

    fn package(structs: Vec<StructDef>) -> Package {
        Package {
            name: None,
            files: vec![SourceFile {
                path: PathBuf::from("a.go"),
                source: None,
                structs,
            }],
        }
    }

    #[test]
    fn test_preorder_walk_and_key_lookup() {
        let inner = StructDef {
            name: None,
            span: Span::default(),
            fields: vec![field("X", Some("`json:\"x\"`"), Vec::new())],
        };
        let outer = StructDef {
            name: Some("T".to_string()),
            span: Span::default(),
            fields: vec![
                field("A", Some("`json:\"a,omitempty\"`"), vec![inner]),
                field("B", Some("`bson:\"b\"`"), Vec::new()),
                field("C", None, Vec::new()),
                field("D", Some("`xml:\"d\" json:\"-\"`"), Vec::new()),
            ],
        };

        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };
        let mut collector = DefaultDiagnosticCollector::new();
        run_tag_checker(&package(vec![outer]), &recorder, &mut collector);

        let seen = recorder.seen.into_inner();
        assert_eq!(
            seen,
            vec![
                ("A".to_string(), "a,omitempty".to_string()),
                ("D".to_string(), "-".to_string()),
                ("X".to_string(), "x".to_string()),
            ]
        );
        assert_eq!(collector.total_count(), 0);
    }

    #[test]
    fn test_unquotable_literal_reports_and_continues() {
        let def = StructDef {
            name: Some("T".to_string()),
            span: Span::default(),
            fields: vec![
                field("A", Some("\"json:\\q\""), Vec::new()),
                field("B", Some("`json:\"b\"`"), Vec::new()),
            ],
        };
        let recorder = Recorder {
            seen: RefCell::new(Vec::new()),
        };
        let mut collector = DefaultDiagnosticCollector::new();
        run_tag_checker(&package(vec![def]), &recorder, &mut collector);

        assert_eq!(collector.total_count(), 1);
        let diagnostic = &collector.diagnostics()[0];
        assert_eq!(diagnostic.rule_id, INVALID_TAG);
        assert_eq!(diagnostic.message, "invalid tag: \"json:\\q\"");
        assert_eq!(recorder.seen.into_inner().len(), 1);
    }

    #[test]
    fn test_render_falls_back_without_source() {
        let mut collector = DefaultDiagnosticCollector::new();
        let file = SourceFile::default();
        let mut f = field("A", Some("`json:\"a\"`"), Vec::new());
        f.ty = Some(crate::types::TypeDescriptor::Interface);
        let ctx = FieldContext {
            file: &file,
            source_map: None,
            field: &f,
            tag: f.tag.as_ref().unwrap(),
            collector: &mut collector,
        };
        assert_eq!(ctx.render_tag(), "`json:\"a\"`");
        assert_eq!(ctx.render_type(), "interface{...}");
        assert_eq!(ctx.tag_location().line, 0);
    }
}
