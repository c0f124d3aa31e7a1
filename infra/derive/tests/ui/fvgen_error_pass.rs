use fvgen_derive::fvgen_error;
use std::borrow::Cow;

#[fvgen_error]
pub enum DemoError {
    #[error("Parse failure{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unknown feature{}: {name}", format_context(.context))]
    Unknown { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, DemoError> {
    raw.parse::<u32>().context("Parsing a version")
}

fn main() {
    let _ = parse("1");
}
