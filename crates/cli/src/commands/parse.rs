use std::path::Path;
use std::process;

use hyprls_core::{Section, Value, ValueData};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    let source = super::read_source(file, output, quiet);
    let root = match hyprls_core::parse(&source) {
        Ok(root) => root,
        Err(e) => {
            report_error(&format!("{}: {}", file.display(), e), output, quiet);
            process::exit(1);
        }
    };
    tracing::debug!(file = %file.display(), depth = root.max_depth(), "parsed");

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&root)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            let mut out = String::new();
            render_section(&root, 0, &mut out);
            print!("{}", out);
        }
    }
}

/// Indented outline: one line per section, variable, statement and
/// assignment, each with its 1-based line number.
fn render_section(section: &Section, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{} [{}-{}]\n",
        indent,
        section.name,
        section.start.line + 1,
        section.end.line + 1
    ));
    let inner = "  ".repeat(depth + 1);
    for variable in &section.variables {
        out.push_str(&format!(
            "{}${} = {}  (line {})\n",
            inner,
            variable.key,
            variable.value_raw,
            variable.position.line + 1
        ));
    }
    for statement in &section.statements {
        out.push_str(&format!(
            "{}{} = {}  (line {})\n",
            inner,
            statement.keyword,
            statement.value_raw,
            statement.position.line + 1
        ));
    }
    for assignment in &section.assignments {
        out.push_str(&format!(
            "{}{} = {}  ({}, line {})\n",
            inner,
            assignment.key,
            assignment.value_raw,
            describe(&assignment.value),
            assignment.position.line + 1
        ));
    }
    for subsection in &section.subsections {
        render_section(subsection, depth + 1, out);
    }
}

fn describe(value: &Value) -> String {
    match &value.data {
        ValueData::Gradient(gradient) => format!(
            "gradient of {} stops at {}deg",
            gradient.stops.len(),
            gradient.angle
        ),
        ValueData::Modmask(mods) => format!("modmask of {}", mods.len()),
        _ => value.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_lists_contents_by_section() {
        let root = hyprls_core::parse(
            "$mod = SUPER\nbind = $mod, Q, killactive\ngeneral {\n  gaps_in = 5\n  col.active_border = rgb(ff0000) rgb(00ff00) 90deg\n}\n",
        )
        .expect("parses");
        let mut out = String::new();
        render_section(&root, 0, &mut out);
        assert_eq!(
            out,
            "General [1-6]\n\
             \x20 $mod = SUPER  (line 1)\n\
             \x20 bind = $mod, Q, killactive  (line 2)\n\
             \x20 general [3-6]\n\
             \x20   gaps_in = 5  (integer, line 4)\n\
             \x20   col.active_border = rgb(ff0000) rgb(00ff00) 90deg  (gradient of 2 stops at 90deg, line 5)\n"
        );
    }
}
