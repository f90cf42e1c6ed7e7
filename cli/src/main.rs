//! redoc CLI - Word document import, normalization and export
//!
//! A command-line front end for converting DOCX files to editor HTML,
//! inspecting heading outlines, exporting Word-compatible documents and
//! managing the upload store.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use redoc::{ConvertOptions, DocumentSession, ExportFormat, StoreConfig, UploadStore};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Word document import, HTML normalization and Word-compatible export
#[derive(Parser)]
#[command(
    name = "redoc",
    author = "iyulab",
    version,
    about = "Convert, normalize and export Word documents",
    long_about = "redoc - Word document import and export tool.\n\n\
                  Converts DOCX files to normalized HTML, prints heading outlines,\n\
                  exports Word-compatible documents and manages uploaded files."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DOCX file to normalized HTML
    Convert {
        /// Input DOCX file
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave images out instead of embedding them
        #[arg(long)]
        no_images: bool,

        /// Emit the document title as a leading heading
        #[arg(long)]
        title: bool,
    },

    /// Normalize an HTML file
    Normalize {
        /// Input HTML file
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the heading outline of a DOCX, HTML or text file
    Outline {
        /// Input file path
        input: PathBuf,

        /// Print the outline as JSON
        #[arg(long)]
        json: bool,

        /// Maximum label width in columns
        #[arg(long, default_value = "80")]
        width: usize,
    },

    /// Export a file as HTML or Word-compatible HTML
    Export {
        /// Input file path
        input: PathBuf,

        /// Export format (default: follows the input type)
        #[arg(short, long)]
        format: Option<FormatArg>,

        /// Font family for Word export
        #[arg(long)]
        font: Option<String>,

        /// Output file path (default: the export's file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a .doc/.docx file in the upload store
    Upload {
        /// File to upload
        input: PathBuf,

        /// Upload store directory
        #[arg(long, env = "REDOC_UPLOAD_DIR", default_value = "uploads")]
        store: PathBuf,
    },

    /// List files in the upload store
    Files {
        /// Upload store directory
        #[arg(long, env = "REDOC_UPLOAD_DIR", default_value = "uploads")]
        store: PathBuf,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a stored file by its stored name
    Download {
        /// Stored file name (see `redoc files`)
        name: String,

        /// Upload store directory
        #[arg(long, env = "REDOC_UPLOAD_DIR", default_value = "uploads")]
        store: PathBuf,

        /// Output file path (default: the stored name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Export format
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Standalone HTML document
    Html,
    /// Word-compatible HTML (.doc)
    Doc,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Doc => ExportFormat::Doc,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            no_images,
            title,
        } => {
            let pb = create_spinner("Converting document...");

            let data = fs::read(&input)?;
            let options = ConvertOptions::new()
                .with_embed_images(!no_images)
                .with_title(title);
            let html = redoc::convert_with_options(&data, &options)?;

            pb.set_message("Normalizing...");
            let doc = redoc::normalize(&html);

            pb.finish_and_clear();
            write_output(output.as_ref(), &doc.html)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to HTML: {} ({} headings, {})",
                    "✓".green().bold(),
                    path.display(),
                    doc.outline.len(),
                    doc.page_size
                );
            }
        }

        Commands::Normalize { input, output } => {
            let html = fs::read_to_string(&input)?;
            let doc = redoc::normalize(&html);
            write_output(output.as_ref(), &doc.html)?;

            if let Some(path) = output {
                println!("{} Normalized: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Outline { input, json, width } => {
            let session = open_session(&input)?;
            let outline = session.outline();

            if json {
                println!("{}", serde_json::to_string_pretty(&outline.entries)?);
            } else if outline.is_empty() {
                println!("{} No headings found", "!".yellow().bold());
            } else {
                println!("{}", "Outline".cyan().bold());
                println!("{}", "─".repeat(width.min(40)));
                for entry in &outline.entries {
                    println!("{}", entry.display_label(width));
                }
            }
        }

        Commands::Export {
            input,
            format,
            font,
            output,
        } => {
            let mut session = open_session(&input)?;
            if let Some(font) = font {
                session.set_font_family(font);
            }

            let blob = match format {
                Some(f) => session.export(f.into())?,
                None => session.export_default()?,
            };
            let path = output.unwrap_or_else(|| PathBuf::from(&blob.file_name));
            fs::write(&path, &blob.bytes)?;

            println!(
                "{} Exported {} ({})",
                "✓".green().bold(),
                path.display(),
                blob.mime_type
            );
        }

        Commands::Upload { input, store } => {
            let name = file_name_of(&input);
            let data = fs::read(&input)?;

            let store = UploadStore::open(StoreConfig::new(store))?;
            let receipt = store.upload(&name, &data)?;

            println!(
                "{} {} (id {})",
                "✓".green().bold(),
                receipt.message,
                receipt.file_id
            );
        }

        Commands::Files { store, json } => {
            let store = UploadStore::open(StoreConfig::new(store))?;
            let records = store.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("{} No files uploaded", "!".yellow().bold());
            } else {
                println!("{}", "Uploaded Files".cyan().bold());
                println!("{}", "─".repeat(40));
                for record in &records {
                    println!(
                        "{}  {}  {}",
                        record.upload_date.format("%Y-%m-%d %H:%M:%S"),
                        record.stored_name.bold(),
                        record.original_name
                    );
                }
            }
        }

        Commands::Download {
            name,
            store,
            output,
        } => {
            let store = UploadStore::open(StoreConfig::new(store))?;
            let data = store.download(&name)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&name));
            fs::write(&path, &data)?;

            println!(
                "{} Downloaded {} ({} bytes)",
                "✓".green().bold(),
                path.display(),
                data.len()
            );
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Import a file into a fresh session.
fn open_session(input: &Path) -> Result<DocumentSession, Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let mut session = DocumentSession::new();
    session.import(&file_name_of(input), None, &data)?;
    debug!(
        "Opened {} at revision {}",
        input.display(),
        session.revision()
    );
    Ok(session)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn print_version() {
    println!("{} {}", "redoc".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document import, HTML normalization and Word-compatible export");
    println!();
    println!("Import: DOCX, HTML, plain text");
    println!("Export: HTML, DOC (Word-compatible HTML)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_args() {
        let cli = Cli::try_parse_from(["redoc", "export", "a.docx", "--format", "doc", "--font", "Georgia"])
            .unwrap();
        match cli.command {
            Commands::Export { format, font, .. } => {
                assert!(matches!(format, Some(FormatArg::Doc)));
                assert_eq!(font.as_deref(), Some("Georgia"));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_store_flag() {
        let cli = Cli::try_parse_from(["redoc", "files", "--store", "/tmp/up", "--json"]).unwrap();
        match cli.command {
            Commands::Files { store, json } => {
                assert_eq!(store, PathBuf::from("/tmp/up"));
                assert!(json);
            }
            _ => panic!("expected files"),
        }
    }

    #[test]
    fn test_open_session_and_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.html");
        fs::write(&input, "<h1>Intro</h1>").unwrap();

        let session = open_session(&input).unwrap();
        assert_eq!(session.outline().entries[0].id, "heading-intro-0");

        let out = dir.path().join("out.html");
        write_output(Some(&out), session.content()).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), "<h1 id=\"heading-intro-0\">Intro</h1>");
    }
}
