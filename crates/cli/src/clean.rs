//! `mushaf clean`: OCR noise removal for one text file or stdin.

use std::io::Read;
use std::path::PathBuf;

use serde_json::json;

use mushaf_recon::{CleanerConfig, OcrCleaner, TextCleaner};

use crate::exit_codes::{EXIT_ERROR, EXIT_IO};
use crate::job::JobConfig;
use crate::CliError;

pub fn cmd_clean(
    input: Option<PathBuf>,
    job: Option<PathBuf>,
    json_output: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = match job {
        Some(path) => JobConfig::load(&path)?.cleaner,
        None => CleanerConfig::default(),
    };

    let text = match input {
        Some(ref path) => mushaf_io::read_text_file(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::new(EXIT_IO, format!("cannot read stdin: {e}")))?;
            buf
        }
    };

    let cleaner = OcrCleaner::new(config);
    let cleaned = cleaner.clean(&text);
    let input_chars = text.chars().count();
    let output_chars = cleaned.chars().count();

    if let Some(ref path) = output {
        mushaf_io::write::write_text_atomic(path, &cleaned)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let doc = json!({
            "input_chars": input_chars,
            "output_chars": output_chars,
            "removed_chars": input_chars.saturating_sub(output_chars),
            "text": cleaned,
        });
        let json_str = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if output.is_none() {
        print!("{cleaned}");
        if !cleaned.ends_with('\n') {
            println!();
        }
    }

    eprintln!("cleaned: {input_chars} -> {output_chars} chars");
    Ok(())
}
