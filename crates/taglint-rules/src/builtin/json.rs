//! `json` tag rules
//!
//! Checks, in order: the name only uses characters an encoder accepts, the `string`
//! option sits on a scalar field, and the name does not just repeat the field name.

use taglint_core::{
    CodeSuggestion, FieldContext, ParsedTag, Severity, TagChecker, TagSet, TypeDescriptor,
};
use tracing::debug;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Rule ID for names containing characters outside the accepted set
pub const INVALID_NAME: &str = "json/invalid-name";

/// Rule ID for the `string` option on a non-scalar field
pub const STRING_NON_SCALAR: &str = "json/string-non-scalar";

/// Rule ID for a tag name equal to the field name
pub const SAME_TAG_NAME: &str = "json/same-tag-name";

const KEY: &str = "json";

const KNOWN_OPTIONS: &[&str] = &["omitempty", "omitzero", "string"];

/// Punctuation allowed in a name besides letters and digits
const NAME_PUNCTUATION: &str = "!#$%&()*+-./:<=>?@[]^_{|}~ ";

/// Check whether every character of `name` is a letter, a decimal digit or allowed
/// punctuation
///
/// Letters are the `L*` general categories and digits the `Nd` category, so letter-like
/// numerals and superscripts are rejected. Quotes, backslashes, commas and semicolons
/// are never accepted. The empty name is valid: it means "use the field name".
pub fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| is_letter_or_digit(c) || NAME_PUNCTUATION.contains(c))
}

fn is_letter_or_digit(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

/// Check whether the `string` option can apply: bool, any integer, any float or string
/// after removing pointer and named layers
pub fn is_json_scalar(ty: Option<&TypeDescriptor>) -> bool {
    ty.and_then(TypeDescriptor::basic_kind).is_some_and(|kind| {
        kind.is_integer()
            || kind.is_float()
            || matches!(
                kind,
                taglint_core::BasicKind::Bool | taglint_core::BasicKind::String
            )
    })
}

/// Checker for the `json` dialect
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTagChecker;

impl TagChecker for JsonTagChecker {
    fn key(&self) -> &'static str {
        KEY
    }

    fn check_field(&self, ctx: &mut FieldContext<'_>, value: &str) {
        let tag = ParsedTag::parse(value, KNOWN_OPTIONS);
        if tag.skip {
            return;
        }

        if !is_valid_name(&tag.name) {
            let diagnostic = ctx.tag_diagnostic(INVALID_NAME, Severity::Error, "invalid name");
            ctx.report(diagnostic);
        }

        if tag.has_option("string") && !is_json_scalar(ctx.field().ty.as_ref()) {
            let diagnostic = ctx.tag_diagnostic(
                STRING_NON_SCALAR,
                Severity::Error,
                "string must use on scalar field",
            );
            ctx.report(diagnostic);
        }

        check_same_name(ctx, &tag);
    }
}

fn check_same_name(ctx: &mut FieldContext<'_>, tag: &ParsedTag) {
    let Some(field_name) = ctx.field().name.as_deref() else {
        return;
    };
    if tag.name != field_name {
        return;
    }

    let mut tags = match TagSet::parse_literal(&ctx.tag().literal) {
        Ok(tags) => tags,
        Err(err) => {
            debug!(field = field_name, "cannot build json fix: {err}");
            return;
        }
    };

    let has_options = tags.get(KEY).is_some_and(|entry| !entry.options.is_empty());
    let fix_message = if has_options {
        tags.clear_name(KEY);
        "drop the json tag name"
    } else {
        tags.delete(KEY);
        "remove the json tag"
    };

    let location = ctx.tag_location();
    let diagnostic = ctx
        .tag_diagnostic(SAME_TAG_NAME, Severity::Warning, "same json tag name")
        .with_suggestion(CodeSuggestion::safe(
            fix_message,
            tags.to_literal(),
            location,
        ));
    ctx.report(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{field, lint_fields};
    use taglint_core::BasicKind;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("a-b_c.d"));
        assert!(is_valid_name(""));
        assert!(is_valid_name("ÄÖü9 $x"));
        assert!(!is_valid_name("a\\b"));
        assert!(!is_valid_name("a\"b"));
        assert!(!is_valid_name("a;b"));
        assert!(!is_valid_name("a'b"));
        assert!(is_valid_name("٣x"));
        assert!(!is_valid_name("x\u{00B2}"));
        assert!(!is_valid_name("\u{216B}"));
    }

    #[test]
    fn test_is_json_scalar() {
        let int = TypeDescriptor::basic(BasicKind::Uintptr);
        let named_ptr = TypeDescriptor::pointer(TypeDescriptor::named(
            "Flag",
            TypeDescriptor::basic(BasicKind::Bool),
        ));
        assert!(is_json_scalar(Some(&int)));
        assert!(is_json_scalar(Some(&named_ptr)));
        assert!(!is_json_scalar(Some(&TypeDescriptor::Struct)));
        assert!(!is_json_scalar(Some(&TypeDescriptor::basic(BasicKind::Complex64))));
        assert!(!is_json_scalar(None));
    }

    #[test]
    fn test_same_name_without_options_removes_entry() {
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![field("B", Some(TypeDescriptor::basic(BasicKind::Int)), "`json:\"B\"`")],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, SAME_TAG_NAME);
        assert_eq!(diagnostics[0].message, "same json tag name: `json:\"B\"`");
        assert_eq!(diagnostics[0].suggestions[0].replacement, "");
    }

    #[test]
    fn test_same_name_with_options_clears_name() {
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![field(
                "Name",
                Some(TypeDescriptor::basic(BasicKind::String)),
                "`xml:\"n\"  json:\"Name,omitempty\" bson:\"name\"`",
            )],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].suggestions[0].replacement,
            "`xml:\"n\" json:\",omitempty\" bson:\"name\"`"
        );
    }

    #[test]
    fn test_same_name_is_case_sensitive() {
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![field("B", Some(TypeDescriptor::basic(BasicKind::Int)), "`json:\"b\"`")],
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_string_option_on_struct() {
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![field("E", Some(TypeDescriptor::Struct), "`json:\"e,string\"`")],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, STRING_NON_SCALAR);
        assert_eq!(
            diagnostics[0].message,
            "string must use on scalar field: `json:\"e,string\"`"
        );
    }

    #[test]
    fn test_all_rules_reported_in_order() {
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![field("a;b", None, "`json:\"a;b,string\"`")],
        );
        let rules: Vec<_> = diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(rules, vec![INVALID_NAME, STRING_NON_SCALAR, SAME_TAG_NAME]);
    }

    #[test]
    fn test_skip_marker_and_dash_name() {
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![
                field("A", Some(TypeDescriptor::Struct), "`json:\"-\"`"),
                field("B", Some(TypeDescriptor::Struct), "`json:\"-,string\"`"),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, STRING_NON_SCALAR);
    }

    #[test]
    fn test_malformed_structured_tag_skips_only_redundancy() {
        // `key:"value"` lookup stops at the malformed pair, so `json` comes first here
        let diagnostics = lint_fields(
            &JsonTagChecker,
            vec![field("C", Some(TypeDescriptor::Struct), "`json:\"C,string\" bad`")],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, STRING_NON_SCALAR);
    }
}
