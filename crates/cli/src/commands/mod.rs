pub(crate) mod check;
pub(crate) mod parse;

use std::path::Path;
use std::process;

use crate::{report_error, OutputFormat};

/// Read `file`, exiting with an error report when it cannot be read.
pub(crate) fn read_source(file: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            report_error(
                &format!("cannot read {}: {}", file.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}
