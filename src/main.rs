//! Command-line front end: import a clinical note, extract its fields and
//! print the review prompt.
//!
//! ```bash
//! geriatric-review notes.txt
//! geriatric-review notes.html --initials JD --doc-out ./exports
//! geriatric-review notes.txt --json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geriatric_review::export::{export_doc, CaseExport, DocConfig};
use geriatric_review::pipeline::import::{handle_file, ImportLibraries, SourceFile};
use geriatric_review::pipeline::prompt::build_magic_prompt;
use geriatric_review::{extract_clinical_data, format_medication_list, PromptRequest};

/// Build a geriatric case-review prompt from a clinical note
#[derive(Parser, Debug)]
#[command(name = "geriatric-review")]
#[command(version, about, long_about = None)]
struct Args {
    /// Clinical note (.txt, .html or .htm)
    input: PathBuf,

    /// Patient initials used in exports
    #[arg(long, default_value = "")]
    initials: String,

    /// Generate the prompt even when required fields are missing
    #[arg(long)]
    bypass: bool,

    /// Print the extracted record as JSON instead of the prompt
    #[arg(long)]
    json: bool,

    /// Write a Word document export into this directory
    #[arg(long)]
    doc_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    geriatric_review::init_tracing();
    let args = Args::parse();

    let file = SourceFile::from_path(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let text = handle_file(&file, &ImportLibraries::default(), |status| {
        eprintln!("{}", status.message());
    })?;

    let record = extract_clinical_data(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        let request = PromptRequest::from_record(&record).with_raw_text(text.as_str());
        let magic = build_magic_prompt(&request, args.bypass)?;
        println!("{}", magic.prompt);
        eprintln!("{}", magic.status_message);
    }

    if let Some(dir) = args.doc_out {
        let mut case = CaseExport::from_record(&record).with_initials(args.initials);
        case.meds = format_medication_list(&case.meds);
        let doc = export_doc(&case, &DocConfig::default(), None);
        let path = doc
            .write_to(&dir)
            .with_context(|| format!("Failed to write export into {}", dir.display()))?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}
