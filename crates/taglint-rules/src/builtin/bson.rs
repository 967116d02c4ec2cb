//! `bson` tag rules

use taglint_core::{BasicKind, FieldContext, ParsedTag, Severity, TagChecker, TypeDescriptor};

/// Rule ID for option tokens other than `omitempty`, `minsize` and `inline`
pub const INVALID_OPTIONS: &str = "bson/invalid-options";

/// Rule ID for a tag name equal to the lower-cased field name
pub const SAME_TAG_NAME: &str = "bson/same-tag-name";

/// Rule ID for `inline` on a field that cannot be inlined
pub const INLINE_SHAPE: &str = "bson/inline-shape";

/// Rule ID for `minsize` on a field that is not a 64-bit integer
pub const MINSIZE_SHAPE: &str = "bson/minsize-shape";

const KEY: &str = "bson";

/// Options recognized by the bson dialect
pub const KNOWN_OPTIONS: &[&str] = &["omitempty", "minsize", "inline"];

/// Check whether `inline` can apply to a field of type `ty`
///
/// Named layers are looked through. A pointer qualifies only when its element is a
/// struct type literal, and a map only when its key is the basic `string` type.
pub fn is_bson_inlineable(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Struct => true,
        TypeDescriptor::Pointer { elem } => elem.is_struct(),
        TypeDescriptor::Map { key, .. } => matches!(
            key.as_ref(),
            TypeDescriptor::Basic {
                basic: BasicKind::String
            }
        ),
        TypeDescriptor::Named { underlying, .. } => is_bson_inlineable(underlying),
        _ => false,
    }
}

/// Check whether `minsize` can apply: `int64`, `uint64` or `uintptr` behind any number
/// of pointer and named layers
pub fn is_bson_minsizeable(ty: &TypeDescriptor) -> bool {
    matches!(
        ty.basic_kind(),
        Some(BasicKind::Int64 | BasicKind::Uint64 | BasicKind::Uintptr)
    )
}

/// Checker for the `bson` dialect
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonTagChecker;

impl TagChecker for BsonTagChecker {
    fn key(&self) -> &'static str {
        KEY
    }

    fn check_field(&self, ctx: &mut FieldContext<'_>, value: &str) {
        let tag = ParsedTag::parse(value, KNOWN_OPTIONS);
        if tag.skip {
            return;
        }

        if !tag.invalid_options.is_empty() {
            let diagnostic =
                ctx.tag_diagnostic(INVALID_OPTIONS, Severity::Error, "invalid bson options");
            ctx.report(diagnostic);
        }

        if let Some(name) = ctx.field().name.as_deref()
            && tag.name == name.to_lowercase()
        {
            let diagnostic =
                ctx.tag_diagnostic(SAME_TAG_NAME, Severity::Warning, "same bson tag name");
            ctx.report(diagnostic);
        }

        let ty = ctx.field().ty.as_ref();

        if tag.has_option("inline") && !ty.is_some_and(is_bson_inlineable) {
            let diagnostic = ctx.tag_diagnostic(
                INLINE_SHAPE,
                Severity::Error,
                "inline must be struct, pointer to struct, map[string]*",
            );
            ctx.report(diagnostic);
        }

        if tag.has_option("minsize") && !ty.is_some_and(is_bson_minsizeable) {
            let diagnostic = ctx.tag_diagnostic(
                MINSIZE_SHAPE,
                Severity::Error,
                "minsize must be int64, uint64, uintptr",
            );
            ctx.report(diagnostic);
        }
    }
}
