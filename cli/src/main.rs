//! docstruct CLI - document structure extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docstruct::{
    detect_source_format_from_path, render, save_artifacts, source_hash, Extractor, JsonFormat,
    ParsedDocument, SourceFormat,
};

#[derive(Parser)]
#[command(name = "docstruct")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document structure from TEI XML and layout JSON", long_about = None)]
struct Cli {
    /// Tolerate a missing or malformed content list
    #[arg(long, global = true, env = "DOCSTRUCT_LENIENT")]
    lenient: bool,

    /// Disable level-skip repair in the catalogue
    #[arg(long, global = true)]
    no_repair: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse TEI XML into metadata and paragraph artifacts
    Tei {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the TEI header as JSON
    Header {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse an extracted layout-tool output directory
    Layout {
        /// Directory holding the content list, middle file and images
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Name of the image directory
        #[arg(long, value_name = "NAME", default_value = docstruct::DEFAULT_IMAGES_DIR)]
        images: String,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Parse many TEI files into one output directory
    Batch {
        /// Input TEI files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Show document information and the catalogue outline
    Info {
        /// TEI file or layout output directory
        #[arg(value_name = "FILE|DIR")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let extractor = build_extractor(cli.lenient, cli.no_repair);

    let result = match cli.command {
        Some(Commands::Tei {
            input,
            output,
            compact,
        }) => cmd_tei(&extractor, &input, output.as_deref(), compact),
        Some(Commands::Header { input }) => cmd_header(&input),
        Some(Commands::Layout {
            input,
            output,
            images,
            compact,
        }) => cmd_layout(
            extractor.with_images_dir(images),
            &input,
            output.as_deref(),
            compact,
        ),
        Some(Commands::Batch { inputs, output }) => cmd_batch(&extractor, &inputs, &output),
        Some(Commands::Info { input }) => cmd_info(&extractor, &input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docstruct <COMMAND> <FILE|DIR>".yellow());
            println!("       docstruct --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_extractor(lenient: bool, no_repair: bool) -> Extractor {
    let mut extractor = Extractor::new();
    if lenient {
        extractor = extractor.lenient();
    }
    if no_repair {
        let catalogue = extractor.options().catalogue.clone().with_repair(false);
        extractor = extractor.with_catalogue(catalogue);
    }
    extractor
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// Artifact key: the MD5 recorded by the extractor, else the MD5 of the input.
fn artifact_key(parsed: &ParsedDocument, source: &[u8]) -> String {
    let recorded = parsed.metadata.header.file_md5.trim();
    if recorded.is_empty() {
        source_hash(source)
    } else {
        recorded.to_lowercase()
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}_output", stem))
}

fn print_saved(paths: &[PathBuf]) {
    for path in paths {
        println!("{} {}", "Saved to".green(), path.display());
    }
}

fn cmd_tei(
    extractor: &Extractor,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let parsed = extractor.parse_tei(&data)?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));
    let key = artifact_key(&parsed, &data);
    let written = save_artifacts(&parsed, &output_dir, &key, json_format(compact))?;
    print_saved(&written);

    Ok(())
}

fn cmd_header(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let header = docstruct::parse_tei_header(&data)?;
    println!("{}", render::to_json(&header, JsonFormat::Pretty)?);

    Ok(())
}

fn cmd_layout(
    extractor: Extractor,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Parsing layout directory {}", input.display());
    let parsed = extractor.parse_layout_dir(input)?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));
    let key = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "layout".to_string());
    let written = save_artifacts(&parsed, &output_dir, &key, json_format(compact))?;
    print_saved(&written);

    Ok(())
}

fn cmd_batch(
    extractor: &Extractor,
    inputs: &[PathBuf],
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing...");
    let results = extractor.parse_tei_batch(inputs);

    let mut failed = 0;
    for (input, result) in inputs.iter().zip(results) {
        pb.set_message(input.display().to_string());
        let saved = result.map_err(|e| e.to_string()).and_then(|parsed| {
            let data = fs::read(input).map_err(|e| e.to_string())?;
            let key = artifact_key(&parsed, &data);
            save_artifacts(&parsed, output, &key, JsonFormat::Pretty).map_err(|e| e.to_string())
        });
        if let Err(e) = saved {
            pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            failed += 1;
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} parsed, {} failed",
        "Done!".green().bold(),
        inputs.len() - failed,
        failed
    );

    Ok(())
}

fn cmd_info(extractor: &Extractor, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (format, parsed) = if input.is_dir() {
        ("layout directory".to_string(), extractor.parse_layout_dir(input)?)
    } else {
        match detect_source_format_from_path(input)? {
            SourceFormat::Tei => (SourceFormat::Tei.to_string(), extractor.parse_tei_file(input)?),
            other => {
                let dir = input.parent().unwrap_or_else(|| Path::new("."));
                (other.to_string(), extractor.parse_layout_dir(dir)?)
            }
        }
    };

    let metadata = &parsed.metadata;
    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Input".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    if let Some(title) = parsed.title() {
        println!("{}: {}", "Title".bold(), title);
    }
    if !metadata.header.authors.is_empty() {
        let names: Vec<&str> = metadata
            .header
            .authors
            .iter()
            .map(|a| a.full_name.as_str())
            .collect();
        println!("{}: {}", "Authors".bold(), names.join(", "));
    }
    if !metadata.header.lang.is_empty() {
        println!("{}: {}", "Language".bold(), metadata.header.lang);
    }
    if !metadata.header.doi.is_empty() {
        println!("{}: {}", "DOI".bold(), metadata.header.doi);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Pages".bold(), metadata.pages.len());
    println!("{}: {}", "Paragraphs".bold(), parsed.paragraph_count());
    println!("{}: {}", "Figures/Tables".bold(), metadata.figures_and_tables.len());
    println!("{}: {}", "Formulas".bold(), metadata.formulas.len());
    println!("{}: {}", "References".bold(), metadata.references.len());
    println!("{}: {}", "Headings".bold(), metadata.catalogue_len());
    println!(
        "{}: {}",
        "Abstract".bold(),
        if metadata.header.abstract_text.is_some() { "Yes" } else { "No" }
    );

    if !metadata.catalogue.is_empty() {
        println!();
        println!("{}", "Catalogue".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        print!("{}", render::catalogue_outline(&metadata.catalogue));
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document structure extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docstruct".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_key_prefers_recorded_md5() {
        let mut parsed = ParsedDocument::default();
        assert_eq!(artifact_key(&parsed, b""), "d41d8cd98f00b204e9800998ecf8427e");

        parsed.metadata.header.file_md5 = "ABCDEF".to_string();
        assert_eq!(artifact_key(&parsed, b""), "abcdef");
    }

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output(Path::new("dir/paper.tei.xml")),
            PathBuf::from("paper.tei_output")
        );
    }

    #[test]
    fn test_build_extractor() {
        let extractor = build_extractor(true, true);
        assert!(extractor.options().is_lenient());
        assert!(!extractor.options().catalogue.repair_skipped_levels);
    }

    #[test]
    fn test_cmd_tei_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("paper.xml");
        fs::write(
            &input,
            r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader>
                <encodingDesc><appInfo><application version="0.8.0"/></appInfo></encodingDesc>
                <fileDesc><titleStmt><title>Paper</title></titleStmt></fileDesc>
            </teiHeader><text><body/></text></TEI>"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        cmd_tei(&Extractor::new(), &input, Some(&out), true).unwrap();

        let names: Vec<String> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n.ends_with("_meta.json")));
        assert!(names.iter().any(|n| n.ends_with("_paragraphs.json")));
    }
}
