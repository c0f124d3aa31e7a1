use crate::handlers::emit;
use anyhow::{Result, bail};
use fvgen::features::filter::{FilterError, parse, required_features};
use std::io::Write;

/// Prints the required feature sets of `filter`, or its clause sets with `clauses`.
///
/// # Errors
/// Fails with every parse error joined into one message.
pub(crate) fn run(filter: &str, clauses: bool, out: &mut impl Write) -> Result<()> {
    let outcome = if clauses {
        parse(filter).map(serde_json::to_value)
    } else {
        required_features(filter).map(serde_json::to_value)
    };

    match outcome {
        Ok(value) => emit(out, &value?),
        Err(errors) => bail!("Invalid filter: {}", describe(&errors)),
    }
}

fn describe(errors: &[FilterError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
