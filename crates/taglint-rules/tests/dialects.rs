//! Runs every dialect over packages modelled on small annotated source files

use std::path::PathBuf;
use taglint_core::{
    BasicKind, Diagnostic, Dialect, FieldDef, Package, Severity, SourceFile, Span, StructDef,
    TagLiteral, TypeDescriptor, apply_fixes, autofix::Fix,
};
use taglint_rules::TagLinter;

/// Builds fields by locating their type and tag text in order within the source
struct Locator<'s> {
    source: &'s str,
    cursor: usize,
}

impl<'s> Locator<'s> {
    fn new(source: &'s str) -> Self {
        Self { source, cursor: 0 }
    }

    fn find(&mut self, needle: &str) -> Span {
        let start = self.cursor
            + self.source[self.cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("{needle:?} not found after {}", self.cursor));
        self.cursor = start + needle.len();
        Span::new(start, self.cursor)
    }

    fn field(&mut self, name: Option<&str>, ty_text: &str, ty: Option<TypeDescriptor>, tag: &str) -> FieldDef {
        if let Some(name) = name {
            self.find(name);
        }
        let type_span = self.find(ty_text);
        let tag = (!tag.is_empty()).then(|| TagLiteral {
            literal: tag.to_string(),
            span: self.find(tag),
        });
        FieldDef {
            name: name.map(str::to_string),
            ty,
            type_span,
            tag,
            nested: Vec::new(),
        }
    }
}

fn int() -> TypeDescriptor {
    TypeDescriptor::basic(BasicKind::Int)
}

fn error_code() -> TypeDescriptor {
    TypeDescriptor::named("errorCode", int())
}

fn package(path: &str, source: &str, structs: Vec<StructDef>) -> Package {
    Package {
        name: Some("example".to_string()),
        files: vec![SourceFile {
            path: PathBuf::from(path),
            source: Some(source.to_string()),
            structs,
        }],
    }
}

fn strukt(name: Option<&str>, fields: Vec<FieldDef>) -> StructDef {
    StructDef {
        name: name.map(str::to_string),
        span: Span::default(),
        fields,
    }
}

fn summary(diagnostics: &[Diagnostic]) -> Vec<(usize, &str)> {
    diagnostics
        .iter()
        .map(|d| (d.location.line, d.rule_id.as_str()))
        .collect()
}

const JSON_SOURCE: &str = r#"package example

type errorCode int

type Type1 struct {
	A int `json:"a"`
	B int `json:"B"`
	C int `json:"C,omitempty"`
	D int `json:",string"`
	E struct {
		A int
	} `json:"e,string"`
	F           int        `json:"-"`
	G           *int       `json:"-,string"`
	H           *errorCode `json:",string"`
	I           errorCode  `json:",string"`
	InvalidName errorCode  `json:"\\,string"`
}

type Type2 struct {
	D struct {
		E int `json:"E"`
		F int `json:"F,omitempty"`
	}
}
"#;

fn json_package() -> Package {
    let mut at = Locator::new(JSON_SOURCE);
    at.find("type Type1");
    let a = at.field(Some("A"), "int", Some(int()), "`json:\"a\"`");
    let b = at.field(Some("B"), "int", Some(int()), "`json:\"B\"`");
    let c = at.field(Some("C"), "int", Some(int()), "`json:\"C,omitempty\"`");
    let d = at.field(Some("D"), "int", Some(int()), "`json:\",string\"`");
    let mut e = at.field(Some("E"), "struct {", Some(TypeDescriptor::Struct), "");
    e.nested = vec![strukt(None, vec![at.field(Some("A"), "int", Some(int()), "")])];
    e.tag = Some(TagLiteral {
        literal: "`json:\"e,string\"`".to_string(),
        span: at.find("`json:\"e,string\"`"),
    });
    let f = at.field(Some("F"), "int", Some(int()), "`json:\"-\"`");
    let g = at.field(
        Some("G"),
        "*int",
        Some(TypeDescriptor::pointer(int())),
        "`json:\"-,string\"`",
    );
    let h = at.field(
        Some("H"),
        "*errorCode",
        Some(TypeDescriptor::pointer(error_code())),
        "`json:\",string\"`",
    );
    let i = at.field(Some("I"), "errorCode", Some(error_code()), "`json:\",string\"`");
    let invalid = at.field(
        Some("InvalidName"),
        "errorCode",
        Some(error_code()),
        "`json:\"\\\\,string\"`",
    );
    let type1 = strukt(Some("Type1"), vec![a, b, c, d, e, f, g, h, i, invalid]);

    at.find("type Type2");
    let mut outer = at.field(Some("D"), "struct {", Some(TypeDescriptor::Struct), "");
    let inner_e = at.field(Some("E"), "int", Some(int()), "`json:\"E\"`");
    let inner_f = at.field(Some("F"), "int", Some(int()), "`json:\"F,omitempty\"`");
    outer.nested = vec![strukt(None, vec![inner_e, inner_f])];
    let type2 = strukt(Some("Type2"), vec![outer]);

    package("example/json.go", JSON_SOURCE, vec![type1, type2])
}

#[test]
fn json_dialect_reports_example_file() {
    let diagnostics = TagLinter::new()
        .with_dialects(vec![Dialect::Json])
        .lint(&json_package());

    assert_eq!(
        summary(&diagnostics),
        vec![
            (7, "json/same-tag-name"),
            (8, "json/same-tag-name"),
            (12, "json/string-non-scalar"),
            (17, "json/invalid-name"),
            (22, "json/same-tag-name"),
            (23, "json/same-tag-name"),
        ]
    );

    assert_eq!(diagnostics[0].message, "same json tag name: `json:\"B\"`");
    assert_eq!(diagnostics[0].location.column, 8);
    assert_eq!(
        diagnostics[3].message,
        "invalid name: `json:\"\\\\,string\"`"
    );
    assert_eq!(diagnostics[2].severity, Severity::Error);
}

#[test]
fn json_fixes_rewrite_redundant_names() {
    let diagnostics = TagLinter::new()
        .with_dialects(vec![Dialect::Json])
        .lint(&json_package());
    let fixes = Fix::collect(&diagnostics, false);
    assert_eq!(fixes.len(), 4);

    let result = apply_fixes(JSON_SOURCE, &fixes);
    assert!(result.errors.is_empty());
    assert_eq!(result.applied_count, 4);
    assert!(result.content.contains("\tB int \n"));
    assert!(result.content.contains("\tC int `json:\",omitempty\"`\n"));
    assert!(result.content.contains("\t\tE int \n"));
    assert!(result.content.contains("\t\tF int `json:\",omitempty\"`\n"));
    assert!(result.content.contains("`json:\"a\"`"));
}

const BSON_SOURCE: &str = r#"package example

type BsonInlineType struct{}

type BsonType1 struct {
	BsonInlineType `bson:",inline"`
	Ignore         int `bson:"-"`
	SubKey         int `bson:"-,"`
	//same key
	A              int         `bson:"a,omitempty"`
	InvalidMinSize int         `bson:",minsize"`
	InvalidInline  int         `bson:",inline"`
	InvalidInline2 map[int]int `bson:",inline"`
	ValidInline    struct{}    `bson:",inline"`
}
"#;

fn bson_package() -> Package {
    let mut at = Locator::new(BSON_SOURCE);
    at.find("type BsonType1 struct {");
    let fields = vec![
        at.field(
            None,
            "BsonInlineType",
            Some(TypeDescriptor::named("BsonInlineType", TypeDescriptor::Struct)),
            "`bson:\",inline\"`",
        ),
        at.field(Some("Ignore"), "int", Some(int()), "`bson:\"-\"`"),
        at.field(Some("SubKey"), "int", Some(int()), "`bson:\"-,\"`"),
        at.field(Some("A"), "int", Some(int()), "`bson:\"a,omitempty\"`"),
        at.field(Some("InvalidMinSize"), "int", Some(int()), "`bson:\",minsize\"`"),
        at.field(Some("InvalidInline"), "int", Some(int()), "`bson:\",inline\"`"),
        at.field(
            Some("InvalidInline2"),
            "map[int]int",
            Some(TypeDescriptor::map(int(), int())),
            "`bson:\",inline\"`",
        ),
        at.field(
            Some("ValidInline"),
            "struct{}",
            Some(TypeDescriptor::Struct),
            "`bson:\",inline\"`",
        ),
    ];
    package("example/bson.go", BSON_SOURCE, vec![strukt(Some("BsonType1"), fields)])
}

#[test]
fn bson_dialect_reports_example_file() {
    let diagnostics = TagLinter::new()
        .with_dialects(vec![Dialect::Bson])
        .lint(&bson_package());

    assert_eq!(
        summary(&diagnostics),
        vec![
            (8, "bson/invalid-options"),
            (10, "bson/same-tag-name"),
            (11, "bson/minsize-shape"),
            (12, "bson/inline-shape"),
            (13, "bson/inline-shape"),
        ]
    );
    assert_eq!(
        diagnostics[4].message,
        "inline must be struct, pointer to struct, map[string]*: `bson:\",inline\"`"
    );
}

const PKG_SOURCE: &str = r#"package example

import "io"

type Type3 struct {
	A interface{}   `binding:"exists"`
	B bool          `binding:"exists"`
	C *bool         `binding:"exists"`
	D io.ByteReader `binding:"exists"`
}
"#;

#[test]
fn binding_dialect_reports_at_type_span() {
    let mut at = Locator::new(PKG_SOURCE);
    at.find("type Type3");
    let bool_ty = TypeDescriptor::basic(BasicKind::Bool);
    let fields = vec![
        at.field(Some("A"), "interface{}", Some(TypeDescriptor::Interface), "`binding:\"exists\"`"),
        at.field(Some("B"), "bool", Some(bool_ty.clone()), "`binding:\"exists\"`"),
        at.field(
            Some("C"),
            "*bool",
            Some(TypeDescriptor::pointer(bool_ty)),
            "`binding:\"exists\"`",
        ),
        at.field(
            Some("D"),
            "io.ByteReader",
            Some(TypeDescriptor::named("io.ByteReader", TypeDescriptor::Interface)),
            "`binding:\"exists\"`",
        ),
    ];
    let type_span = fields[1].type_span;
    let pkg = package("example/pkg.go", PKG_SOURCE, vec![strukt(Some("Type3"), fields)]);

    let diagnostics = TagLinter::new().lint(&pkg);
    assert_eq!(summary(&diagnostics), vec![(7, "binding/exists-non-pointer")]);
    assert_eq!(
        diagnostics[0].message,
        "exists field must be pointer/interface: bool"
    );
    assert_eq!(diagnostics[0].location.span(), type_span);
    assert_eq!(diagnostics[0].location.column, 4);
}

#[test]
fn package_round_trips_through_yaml_export() {
    let yaml = serde_yaml::to_string(&bson_package()).unwrap();
    let loaded: Package = serde_yaml::from_str(&yaml).unwrap();
    let diagnostics = TagLinter::new().lint(&loaded);
    assert_eq!(diagnostics.len(), 5);
}
