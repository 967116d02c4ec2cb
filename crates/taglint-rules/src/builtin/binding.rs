//! `binding` tag rules
//!
//! A field marked `exists` must be able to hold "absent", so its declared type has to
//! be a pointer or an interface.

use taglint_core::{FieldContext, Severity, TagChecker, TagSet, TypeDescriptor, tag};
use tracing::debug;

/// Rule ID for `exists` on a field that is neither a pointer nor an interface
pub const EXISTS_NON_POINTER: &str = "binding/exists-non-pointer";

const KEY: &str = "binding";

const EXISTS: &str = "exists";

/// Check whether the underlying type of `ty` is a pointer or an interface
pub fn is_pointer_or_interface(ty: &TypeDescriptor) -> bool {
    let underlying = ty.underlying();
    underlying.is_pointer() || underlying.is_interface()
}

/// Checker for the `binding` dialect
#[derive(Debug, Default, Clone, Copy)]
pub struct BindingTagChecker;

impl TagChecker for BindingTagChecker {
    fn key(&self) -> &'static str {
        KEY
    }

    fn check_field(&self, ctx: &mut FieldContext<'_>, _value: &str) {
        // The whole literal must parse; a malformed tag gets no binding checks
        let parsed = tag::unquote(&ctx.tag().literal).and_then(|value| TagSet::parse(&value));
        let tags = match parsed {
            Ok(tags) => tags,
            Err(err) => {
                debug!(
                    field = ctx.field().name.as_deref().unwrap_or("<embedded>"),
                    "skipping binding checks: {err}"
                );
                return;
            }
        };
        let Some(entry) = tags.get(KEY) else {
            return;
        };
        if entry.name != EXISTS && !entry.options.iter().any(|o| o == EXISTS) {
            return;
        }

        // Nothing is known about an unresolved type
        let Some(ty) = ctx.field().ty.as_ref() else {
            return;
        };

        if !is_pointer_or_interface(ty) {
            let diagnostic = ctx.type_diagnostic(
                EXISTS_NON_POINTER,
                Severity::Error,
                "exists field must be pointer/interface",
            );
            ctx.report(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{field, lint_fields};
    use taglint_core::BasicKind;

    #[test]
    fn test_pointer_or_interface() {
        let named_ptr = TypeDescriptor::named("Ref", TypeDescriptor::pointer(TypeDescriptor::Struct));
        assert!(is_pointer_or_interface(&named_ptr));
        assert!(is_pointer_or_interface(&TypeDescriptor::named("Any", TypeDescriptor::Interface)));
        assert!(!is_pointer_or_interface(&TypeDescriptor::basic(BasicKind::Bool)));
        assert!(!is_pointer_or_interface(&TypeDescriptor::map(
            TypeDescriptor::basic(BasicKind::String),
            TypeDescriptor::Interface
        )));
    }

    #[test]
    fn test_exists_reported_at_type_span() {
        let bool_ty = TypeDescriptor::basic(BasicKind::Bool);
        let diagnostics = lint_fields(
            &BindingTagChecker,
            vec![
                field(
                    "C",
                    Some(TypeDescriptor::pointer(bool_ty.clone())),
                    "`binding:\"exists\"`",
                ),
                field("B", Some(bool_ty), "`binding:\"exists\"`"),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.rule_id, EXISTS_NON_POINTER);
        assert_eq!(diagnostic.message, "exists field must be pointer/interface: bool");
        assert_eq!(diagnostic.location.span(), crate::test_support::type_span(1));
    }

    #[test]
    fn test_exists_as_option_and_unresolved_type() {
        let diagnostics = lint_fields(
            &BindingTagChecker,
            vec![
                field(
                    "A",
                    Some(TypeDescriptor::basic(BasicKind::String)),
                    "`binding:\"required,exists\"`",
                ),
                field("D", None, "`binding:\"exists\"`"),
                field(
                    "E",
                    Some(TypeDescriptor::basic(BasicKind::Int)),
                    "`binding:\"required\"`",
                ),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "exists field must be pointer/interface: string");
    }

    #[test]
    fn test_malformed_tag_skips_field() {
        let bool_ty = TypeDescriptor::basic(BasicKind::Bool);
        let diagnostics = lint_fields(
            &BindingTagChecker,
            vec![
                field("B", Some(bool_ty.clone()), "`binding:\"exists\" bad`"),
                field("C", Some(bool_ty.clone()), "`json:\"c\"  binding:\"exists\"`"),
                field("D", Some(bool_ty), "\"binding:\\\"exists\\\" bad\""),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.span(), crate::test_support::type_span(1));
    }
}
