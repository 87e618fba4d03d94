// pdf_to_word
// Convert a PDF's text flow into a .docx file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use textprobe_lib::services::converter::convert_pdf_to_docx;

#[derive(Parser, Debug)]
#[command(name = "pdf_to_word")]
#[command(about = "Convert a PDF document to Word (.docx)", long_about = None)]
struct Cli {
    /// Source PDF file
    input: PathBuf,

    /// Destination .docx file
    output: PathBuf,
}

fn main() -> ExitCode {
    textprobe_lib::init_logging();
    let cli = Cli::parse();

    match convert_pdf_to_docx(&cli.input, &cli.output) {
        Ok(_) => {
            println!(
                "SUCCESS: Converted {} to {}",
                cli.input.display(),
                cli.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {:#}", anyhow::Error::from(e));
            ExitCode::FAILURE
        }
    }
}
