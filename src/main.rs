//! spanrow - build spreadsheets from TOML layouts or CSV files

use anyhow::{Context, Result, bail};
use spanrow::config::{Config, load_config};
use spanrow::layout::{SheetKeys, build, load_layout};
use spanrow::{Spreadsheet, WriterFormat};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: spanrow [OPTIONS] <INPUT>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <INPUT>                   TOML layout file, or a .csv file to load");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>       Write the workbook (format from extension or --format)");
    eprintln!("  --format <NAME>           Writer format: Ods, Xlsx, Xls, Html, Csv");
    eprintln!("  --dump                    Print every sheet's rows, tab-separated");
    eprintln!("  --keys                    Print the key maps of every sheet");
    eprintln!("  --config <FILE>           Configuration file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Without --output, --dump or --keys the workbook is written to");
    eprintln!("<filename>.<ext> in the current directory, as set in the config.");
}

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    dump: bool,
    keys: bool,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                parsed.output = Some(PathBuf::from(&args[i]));
            }
            "--format" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --format requires a value");
                    std::process::exit(1);
                }
                parsed.format = Some(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                parsed.config = Some(PathBuf::from(&args[i]));
            }
            "--dump" => parsed.dump = true,
            "--keys" => parsed.keys = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if parsed.input.is_none() {
                    parsed.input = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    parsed
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn open_input(path: &Path) -> Result<(Spreadsheet, Vec<SheetKeys>)> {
    if is_csv(path) {
        let book = Spreadsheet::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        return Ok((book, Vec::new()));
    }
    let layout =
        load_layout(path).with_context(|| format!("failed to read layout {}", path.display()))?;
    build(&layout).with_context(|| format!("failed to build {}", path.display()))
}

fn output_format(args: &Args, output: Option<&Path>, config: &Config) -> Result<WriterFormat> {
    if let Some(name) = &args.format {
        return Ok(name.parse()?);
    }
    if let Some(format) = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(WriterFormat::from_extension)
    {
        return Ok(format);
    }
    Ok(config.output.writer_format()?)
}

fn print_keys(all_keys: &[SheetKeys]) {
    for sheet in all_keys {
        println!("# {}", sheet.title);
        for record in &sheet.keys {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                record.key, record.coordinate, record.column, record.row, record.range
            );
        }
    }
}

fn dump(book: &mut Spreadsheet, config: &Config) -> Result<()> {
    let options = config.read.options();
    let count = book.document().map(|doc| doc.sheet_count()).unwrap_or(0);
    for index in 0..count {
        book.set_sheet(index, None)?;
        println!("# {}", book.sheet()?.title());
        for row in book.get_rows(config.read.to_string, &options)? {
            let line: Vec<String> = row.iter().map(ToString::to_string).collect();
            println!("{}", line.join("\t"));
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let (config, warnings) = load_config(args.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let Some(input) = args.input.as_deref() else {
        print_usage();
        bail!("no input file given");
    };
    let (mut book, all_keys) = open_input(input)?;

    if args.keys {
        print_keys(&all_keys);
    }

    if let Some(output) = args.output.as_deref() {
        let format = output_format(&args, Some(output), &config)?;
        let doc = book
            .document()
            .context("no document was built")?;
        doc.save(output, format)
            .with_context(|| format!("failed to write {}", output.display()))?;
        eprintln!("Wrote {} ({})", output.display(), format);
    } else if !args.dump && !args.keys {
        let format = output_format(&args, None, &config)?;
        let dir = env::current_dir().context("cannot determine current directory")?;
        let path = book
            .save(&dir, &config.output.filename, format)
            .with_context(|| format!("failed to write {}{}", config.output.filename, format.extension()))?;
        eprintln!("Wrote {} ({})", path.display(), format);
    }

    if args.dump {
        dump(&mut book, &config)?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(err) = run(parse_args(&args)) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
