//! pdfsed CLI - positioned OCR layout conversion tool

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfsed::convert::{convert_file, convert_reader};
use pdfsed::{
    detect_format_from_path, parse_file_with_options, Command, ConvertOptions, JsonFormat,
    ParseOptions, RenderOptions, ScriptOptions, TextFormat, TreeStats,
};

#[derive(Parser)]
#[command(name = "pdfsed")]
#[command(version)]
#[command(about = "Convert positioned OCR layouts and check pdfsed scripts", long_about = None)]
struct Cli {
    /// Input djvused file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a layout between formats
    Convert {
        /// Input file (stdin if not specified)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Input format: djvused (detected from the extension if omitted)
        #[arg(short, long, value_parser = parse_format)]
        from: Option<TextFormat>,

        /// Output format: djvused, hocr, text or json
        #[arg(short, long, value_parser = parse_format, default_value = "hocr")]
        to: TextFormat,

        /// Scale the coordinates uniformly by FACTOR
        #[arg(short, long, value_name = "FACTOR", default_value = "1.0")]
        scale: f32,

        /// Shift the coordinates after scaling
        #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
        offset: Option<Vec<f32>>,

        /// Keep boxes as read instead of recomputing them
        #[arg(long, conflicts_with_all = ["scale", "offset"])]
        raw: bool,

        /// Skip stray tokens instead of failing
        #[arg(long)]
        lenient: bool,

        /// Spaces per nesting level in djvused and hOCR output
        #[arg(long, default_value = "2")]
        indent: usize,
    },

    /// Extract plain text from a layout
    Text {
        /// Input djvused file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert a layout to JSON
    Json {
        /// Input djvused file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show layout statistics
    Info {
        /// Input djvused file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Read a pdfsed script and list its commands
    Check {
        /// pdfsed script
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Skip unknown commands instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show version information
    Version,
}

fn parse_format(s: &str) -> Result<TextFormat, String> {
    s.parse::<TextFormat>().map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            from,
            to,
            scale,
            offset,
            raw,
            lenient,
            indent,
        }) => {
            let mut parse = ParseOptions::new();
            if raw {
                parse = parse.raw();
            } else {
                parse = parse.with_scale(scale);
                if let Some([dx, dy]) = offset.as_deref() {
                    parse = parse.with_offset(*dx, *dy);
                }
            }
            if lenient {
                parse = parse.lenient();
            }
            let options = ConvertOptions::new()
                .with_parse_options(parse)
                .with_render_options(RenderOptions::new().with_format(to).with_indent(indent));
            cmd_convert(input.as_deref(), output.as_deref(), from, options)
        }
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Check { script, lenient }) => cmd_check(&script, lenient),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert to hOCR if input is provided
            if let Some(input) = cli.input {
                let options = ConvertOptions::new().with_output_format(TextFormat::Hocr);
                cmd_convert(Some(&input), cli.output.as_deref(), None, options)
            } else {
                println!("{}", "Usage: pdfsed <FILE> [OUTPUT]".yellow());
                println!("       pdfsed --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: Option<&Path>,
    output: Option<&Path>,
    from: Option<TextFormat>,
    mut options: ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let from = match (from, input) {
        (Some(format), _) => format,
        (None, Some(path)) => detect_format_from_path(path).unwrap_or_default(),
        (None, None) => TextFormat::Djvused,
    };
    if !from.is_readable() {
        return Err(format!("can't read {}, need djvused", from).into());
    }
    options = options.with_input_format(from);

    log::info!(
        "Reading {} from {}, writing {} to {}, scaling to {:.1}%",
        from,
        input.map_or("stdin".into(), |p| p.display().to_string()),
        options.render.format,
        output.map_or("stdout".into(), |p| p.display().to_string()),
        options.parse.scale * 100.0
    );

    match (input, output) {
        (Some(input), Some(output)) => {
            convert_file(input, output, &options)?;
            println!("{} {}", "Saved to".green(), output.display());
        }
        (Some(input), None) => {
            let reader = BufReader::new(File::open(input)?);
            convert_reader(reader, &mut io::stdout().lock(), &options)?;
        }
        (None, Some(output)) => {
            let mut buf = Vec::new();
            convert_reader(io::stdin().lock(), &mut buf, &options)?;
            fs::write(output, &buf)?;
            println!("{} {}", "Saved to".green(), output.display());
        }
        (None, None) => {
            convert_reader(io::stdin().lock(), &mut io::stdout().lock(), &options)?;
        }
    }

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = pdfsed::to_text(input)?;
    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pdfsed::to_json(input, format)?;
    write_output(output, &json)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Raw boxes, so the page box shown is exactly what the file says
    let tree = parse_file_with_options(input, ParseOptions::new().raw())?;
    let stats = TreeStats::collect(&tree);

    println!("{}", "Layout Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), TextFormat::Djvused);
    if let Some(page) = stats.page {
        println!(
            "{}: {} × {} ({})",
            "Page".bold(),
            page.width(),
            page.height(),
            page
        );
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Columns".bold(), stats.column_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_check(script: &Path, lenient: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ScriptOptions::new();
    if lenient {
        options = options.lenient();
    }
    if let Some(dir) = script.parent().filter(|d| !d.as_os_str().is_empty()) {
        options = options.with_base_dir(dir);
    }
    let commands = pdfsed::script::read_script(BufReader::new(File::open(script)?), options)?;

    for command in &commands {
        println!("{}", describe(command));
    }
    println!(
        "\n{} {} commands",
        "OK".green().bold(),
        commands.len()
    );
    Ok(())
}

fn describe(command: &Command) -> String {
    let name = command.name().cyan();
    match command {
        Command::SetInfo { fields } => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(field, value)| format!("{:?}={:?}", field, value))
                .collect();
            format!("{} {}", name, fields.join(" "))
        }
        Command::CreatePage(page) => match page.size {
            Some((w, h)) => format!("{} {:.2} × {:.2} pt, {:.2}°", name, w, h, page.angle),
            None => format!("{} (previous size), {:.2}°", name, page.angle),
        },
        Command::DrawImage(image) => {
            let mut line = format!(
                "{} {} at {:.2} × {:.2} pt",
                name,
                image.path.display(),
                image.pos.0,
                image.pos.1
            );
            if let Some(dpi) = image.dpi {
                line.push_str(&format!(", {:.2} dpi", dpi));
            }
            if let Some((r, g, b)) = image.mask_rgb() {
                line.push_str(&format!(", mask {:02x}{:02x}{:02x}", r, g, b));
            }
            if let Some(mask) = &image.mask_image {
                line.push_str(&format!(", mask image {}", mask.display()));
            }
            line
        }
        Command::DrawText(text) => {
            let mut line = format!(
                "{} {} at {:.2} × {:.2} pt, scale {:.2}%",
                name,
                text.path.display(),
                text.pos.0,
                text.pos.1,
                text.scale * 100.0
            );
            if let Some(dpi) = text.dpi {
                line.push_str(&format!(", {:.2} dpi", dpi));
            }
            line
        }
    }
}

fn cmd_version() {
    println!("{} {}", "pdfsed".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Positioned OCR layout conversion tool");
    println!();
    println!("License: BSD-2-Clause");
}
