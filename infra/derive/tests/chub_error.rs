use chub_derive::chub_error;
use std::borrow::Cow;

#[chub_error]
pub enum LookupError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i32, LookupError> {
    Ok(raw.parse::<i32>()?)
}

#[test]
fn chub_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/chub_error_pass.rs");
}

#[test]
fn source_errors_convert_without_context() {
    let err = parse("x").unwrap_err();
    assert!(matches!(err, LookupError::Parse { context: None, .. }));
    assert!(err.to_string().starts_with("Parse error: "));
}

#[test]
fn context_is_attached_to_existing_errors() {
    let missing: Result<(), LookupError> =
        Err(LookupError::Missing { message: "customer 7".into(), context: None });

    let err = missing.context("loading customer").unwrap_err();
    assert_eq!(err.to_string(), "Missing (loading customer): customer 7");
}

#[test]
fn strings_become_internal_errors() {
    let err = LookupError::from(String::from("unexpected"));
    assert_eq!(err.to_string(), "Internal error: unexpected");
}
