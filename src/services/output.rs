use crate::domain::models::JsonOut;
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Write text output to `path`, or to stdout when no path is given.
pub fn write_text(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(p) => std::fs::write(p, text)
            .with_context(|| format!("cannot write output file {}", p.display())),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

/// Emit a CSV/text report, or the JSON form when `--json` is set.
pub fn emit_report<T: Serialize>(
    json: bool,
    path: Option<&Path>,
    data: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        let body = serde_json::to_string_pretty(&JsonOut { ok: true, data })?;
        write_text(path, &format!("{}\n", body))
    } else {
        write_text(path, &text())
    }
}
