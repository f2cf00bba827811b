use crate::error::{SheetpassError, SheetpassResult};
use crate::intake;
use crate::session::{Notice, NoticeLevel, Session};
use crate::types::{Document, SupportedFormat};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Execute the convert command: one load, one export
pub fn convert(
    input: PathBuf,
    output: PathBuf,
    to: Option<SupportedFormat>,
    verbose: bool,
) -> SheetpassResult<()> {
    println!("{}", "📄 sheetpass - Convert".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let format = to
        .or_else(|| SupportedFormat::from_path(&output))
        .ok_or_else(|| {
            SheetpassError::Usage(format!(
                "cannot tell the output format from '{}'; pass --to csv or --to xlsx",
                output.display()
            ))
        })?;

    let mut session = Session::new();

    if verbose {
        println!("{}", "📖 Reading input...".cyan());
    }
    let outcome = session.open(&input);
    print_notice(&mut io::stdout(), outcome.notice.as_ref())?;
    outcome.result?;

    if verbose {
        if let Some(doc) = session.active() {
            println!(
                "   {} columns, {} rows\n",
                doc.columns().len(),
                doc.row_count()
            );
        }
        println!("{}", format!("💾 Writing {}...", format.label()).cyan());
    }

    let outcome = session.save(&output, format);
    print_notice(&mut io::stdout(), outcome.notice.as_ref())?;
    outcome.result?;

    println!("{}", "✅ Convert Complete!".bold().green());
    Ok(())
}

/// Execute the inspect command: load and describe the table
pub fn inspect(input: PathBuf, rows: usize, json: bool) -> SheetpassResult<()> {
    let doc = intake::load(&input)?;

    if json {
        let preview: Vec<Vec<String>> = (0..rows.min(doc.row_count()))
            .map(|row| {
                (0..doc.columns().len())
                    .map(|col| doc.cell(row, col).to_string())
                    .collect()
            })
            .collect();
        let value = serde_json::json!({
            "summary": doc.summary(),
            "preview": preview,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "🔍 sheetpass - Inspect".bold().green());
    println!("   File: {}\n", input.display());
    let mut out = io::stdout();
    write_summary(&mut out, &doc)?;
    write_preview(&mut out, &doc, rows)?;
    Ok(())
}

/// Execute the session command on stdin/stdout
pub fn session() -> SheetpassResult<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(stdin.lock(), &mut stdout)
}

/// Run the interactive loop: one command per line, one session for the whole run.
///
/// Operation errors are reported as notices; only I/O on the terminal itself
/// ends the loop with an error.
pub fn run_session<R: BufRead, W: Write>(input: R, out: &mut W) -> SheetpassResult<()> {
    let mut session = Session::new();
    writeln!(out, "{}", "📄 sheetpass - Session".bold().green())?;
    writeln!(out, "   Type 'help' for commands.\n")?;
    write_status(out, &session)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "open" | "load" => {
                if rest.is_empty() {
                    writeln!(out, "usage: open <path>")?;
                    continue;
                }
                let outcome = session.open(Path::new(rest));
                print_notice(out, outcome.notice.as_ref())?;
                write_status(out, &session)?;
            }
            "drop" => {
                let outcome = session.drop_payload(rest);
                print_notice(out, outcome.notice.as_ref())?;
                write_status(out, &session)?;
            }
            "save" => {
                let Some((kind, path)) = rest.split_once(char::is_whitespace) else {
                    writeln!(out, "usage: save <csv|xlsx> <path>")?;
                    continue;
                };
                let format = match kind.parse::<SupportedFormat>() {
                    Ok(format) => format,
                    Err(e) => {
                        writeln!(out, "{}", e)?;
                        continue;
                    }
                };
                let outcome = session.save(Path::new(path.trim()), format);
                print_notice(out, outcome.notice.as_ref())?;
                write_status(out, &session)?;
            }
            "status" => write_status(out, &session)?,
            "preview" => {
                let rows = match rest {
                    "" => 5,
                    n => match n.parse() {
                        Ok(n) => n,
                        Err(_) => {
                            writeln!(out, "usage: preview [rows]")?;
                            continue;
                        }
                    },
                };
                match session.active() {
                    Some(doc) => {
                        write_summary(out, doc)?;
                        write_preview(out, doc, rows)?;
                    }
                    None => writeln!(out, "{}", "Nothing loaded.".yellow())?,
                }
            }
            "reset" => {
                session.reset();
                write_status(out, &session)?;
            }
            "help" | "?" => write_help(out)?,
            "quit" | "exit" => break,
            other => writeln!(out, "Unknown command '{}'. Type 'help' for commands.", other)?,
        }
    }

    Ok(())
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  open <path>              Load a .csv or .xlsx file")?;
    writeln!(out, "  drop <payload>           Load a drag-and-drop path ({{...}} quoting allowed)")?;
    writeln!(out, "  save <csv|xlsx> <path>   Save the loaded table, then clear it")?;
    writeln!(out, "  status                   Show the drop-zone status")?;
    writeln!(out, "  preview [rows]           Show columns and the first rows")?;
    writeln!(out, "  reset                    Discard the loaded table")?;
    writeln!(out, "  quit                     Leave the session")
}

fn print_notice<W: Write>(out: &mut W, notice: Option<&Notice>) -> io::Result<()> {
    let Some(notice) = notice else {
        return Ok(());
    };
    let line = notice.to_string();
    match notice.level {
        NoticeLevel::Info => writeln!(out, "ℹ️  {}", line.green()),
        NoticeLevel::Warning => writeln!(out, "⚠️  {}", line.yellow()),
        NoticeLevel::Error => writeln!(out, "❌ {}", line.red()),
    }
}

fn write_status<W: Write, T: crate::transform::Transform>(
    out: &mut W,
    session: &Session<T>,
) -> io::Result<()> {
    let status = session.status();
    let export = if session.export_enabled() {
        "export enabled".green()
    } else {
        "export disabled".dimmed()
    };
    writeln!(out, "[{}] {} ({})", status.background, status.text, export)
}

fn write_summary<W: Write>(out: &mut W, doc: &Document) -> io::Result<()> {
    writeln!(
        out,
        "   {} columns, {} rows",
        doc.columns().len(),
        doc.row_count()
    )?;
    for column in doc.columns() {
        writeln!(
            out,
            "      {} ({})",
            column.name.bright_blue(),
            column.values.type_name()
        )?;
    }
    writeln!(out)
}

fn write_preview<W: Write>(out: &mut W, doc: &Document, rows: usize) -> io::Result<()> {
    let shown = rows.min(doc.row_count());
    if shown == 0 || doc.columns().is_empty() {
        return Ok(());
    }
    let cells: Vec<Vec<String>> = (0..shown)
        .map(|row| {
            (0..doc.columns().len())
                .map(|col| doc.cell(row, col).to_string())
                .collect()
        })
        .collect();
    let widths: Vec<usize> = doc
        .columns()
        .iter()
        .enumerate()
        .map(|(col, column)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = doc
        .columns()
        .iter()
        .zip(&widths)
        .map(|(column, &w)| format!("{:<w$}", column.name, w = w))
        .collect();
    writeln!(out, "   {}", header.join(" | ").bold())?;
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect();
        writeln!(out, "   {}", line.join(" | "))?;
    }
    if doc.row_count() > shown {
        writeln!(out, "   ... {} more rows", doc.row_count() - shown)?;
    }
    writeln!(out)
}
