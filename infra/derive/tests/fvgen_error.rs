use fvgen_derive::fvgen_error;
use std::borrow::Cow;

#[fvgen_error]
pub enum SampleError {
    #[error("Parse failure{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Missing feature{}: {name}", format_context(.context))]
    Missing { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn fvgen_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/fvgen_error_pass.rs");
}

#[test]
fn question_mark_converts_source_errors() {
    fn parse(raw: &str) -> Result<u32, SampleError> {
        Ok(raw.parse::<u32>()?)
    }

    let err = parse("x").unwrap_err();
    assert!(matches!(err, SampleError::Parse { context: None, .. }));
}

#[test]
fn context_is_rendered_in_display() {
    let err: Result<(), SampleError> =
        Err(SampleError::Missing { name: "foo-1.0".to_owned(), context: None });
    let err = err.context("Expanding root").unwrap_err();

    assert_eq!(err.to_string(), "Missing feature (Expanding root): foo-1.0");
}

#[test]
fn context_on_foreign_result_wraps_into_variant() {
    let err = "nope".parse::<u32>().context("Reading version").unwrap_err();
    assert!(err.to_string().starts_with("Parse failure (Reading version): "));
}

#[test]
fn strings_become_internal_errors() {
    let from_static: SampleError = "boom".into();
    let from_owned: SampleError = format!("boom {}", 2).into();

    assert_eq!(from_static.to_string(), "Internal error: boom");
    assert_eq!(from_owned.to_string(), "Internal error: boom 2");
}
