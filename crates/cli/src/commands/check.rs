use std::path::Path;
use std::process;

use hyprls_core::{Configuration, DecodeError, ParseError};
use serde::Serialize;

use crate::OutputFormat;

/// Outcome of checking one file.
#[derive(Debug, Serialize)]
struct CheckReport {
    file: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Finding {
    kind: &'static str,
    /// 1-based, present for structural errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    message: String,
}

#[derive(Debug, Serialize)]
struct Summary {
    sections: usize,
    variables: usize,
    custom_variables: usize,
    statements: usize,
}

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let source = super::read_source(file, output, quiet);
    let report = check_source(file, &source);
    tracing::debug!(file = %file.display(), ok = report.ok, "checked");

    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => match (&report.error, &report.summary) {
                (Some(finding), _) => eprintln!("{}: {}", report.file, finding.message),
                (None, Some(summary)) => println!(
                    "{}: ok ({} sections, {} variables, {} custom variables, {} statements)",
                    report.file,
                    summary.sections,
                    summary.variables,
                    summary.custom_variables,
                    summary.statements
                ),
                (None, None) => println!("{}: ok", report.file),
            },
        }
    }
    if !report.ok {
        process::exit(1);
    }
}

fn check_source(file: &Path, source: &str) -> CheckReport {
    let file = file.display().to_string();
    let root = match hyprls_core::parse(source) {
        Ok(root) => root,
        Err(e) => return failed(file, nesting_finding(&e)),
    };
    match hyprls_core::decode(&root) {
        Ok(config) => CheckReport {
            file,
            ok: true,
            error: None,
            summary: Some(summarize(&config)),
        },
        Err(e) => failed(file, decode_finding(&e)),
    }
}

fn failed(file: String, finding: Finding) -> CheckReport {
    CheckReport {
        file,
        ok: false,
        error: Some(finding),
        summary: None,
    }
}

fn nesting_finding(e: &ParseError) -> Finding {
    Finding {
        kind: "nesting",
        line: Some(e.line() + 1),
        message: e.to_string(),
    }
}

fn decode_finding(e: &DecodeError) -> Finding {
    let kind = match e {
        DecodeError::UnknownVariable { .. } => "unknown-variable",
        DecodeError::TypeMismatch { .. } => "type-mismatch",
        DecodeError::UnresolvedCustomVariable { .. } => "unresolved-variable",
    };
    Finding {
        kind,
        line: None,
        message: e.to_string(),
    }
}

fn summarize(config: &Configuration) -> Summary {
    Summary {
        sections: config.sections.len(),
        variables: config.sections.values().map(|vars| vars.len()).sum(),
        custom_variables: config.custom_variables.len(),
        statements: config.statements.len(),
    }
}
