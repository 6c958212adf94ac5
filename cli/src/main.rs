//! abstractdoc CLI - render abstract spreadsheets into DOCX

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use abstractdoc::table::{SheetSelection, TableLoader};
use abstractdoc::{render, Assembler, JsonFormat, LoadOptions, RenderOptions, TemplateKind};

#[derive(Parser)]
#[command(name = "abstractdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Render conference-abstract spreadsheets into DOCX", long_about = None)]
struct Cli {
    /// Input spreadsheet
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output DOCX file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a spreadsheet to DOCX
    #[command(alias = "gen")]
    Generate {
        /// Input spreadsheet
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <input stem>.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render a spreadsheet to a plain-text preview
    Preview {
        /// Input spreadsheet
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render a spreadsheet to the JSON document model
    Json {
        /// Input spreadsheet
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show sheets, columns and record count of a spreadsheet
    Info {
        /// Input spreadsheet
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Worksheet name or 0-based index
        #[arg(long, value_name = "SHEET")]
        sheet: Option<String>,
    },

    /// Show version information
    Version,
}

/// Options shared by every rendering command.
#[derive(Args, Clone, Default)]
struct RenderArgs {
    /// Record layout
    #[arg(short, long, value_enum)]
    template: Option<TemplateArg>,

    /// Directory containing figure images
    #[arg(long, value_name = "DIR", env = "ABSTRACTDOC_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// DOCX whose styles are cloned into the output
    #[arg(long, value_name = "FILE")]
    base_docx: Option<PathBuf>,

    /// Maximum figure width in cm
    #[arg(long, value_name = "CM")]
    max_width: Option<f64>,

    /// Maximum figure height in cm
    #[arg(long, value_name = "CM")]
    max_height: Option<f64>,

    /// Resolution assumed for images without one
    #[arg(long)]
    dpi: Option<f64>,

    /// JSON options file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep raw markup tags in the output
    #[arg(long)]
    debug_markup: bool,

    /// Worksheet name or 0-based index
    #[arg(long, value_name = "SHEET")]
    sheet: Option<String>,
}

impl RenderArgs {
    fn render_options(&self) -> abstractdoc::Result<RenderOptions> {
        let mut options = match &self.config {
            Some(path) => {
                log::debug!("Loading options from {}", path.display());
                RenderOptions::from_json_file(path)?
            }
            None => RenderOptions::default(),
        };

        if let Some(template) = self.template {
            options = options.with_template(template.into());
        }
        if let Some(dir) = &self.image_dir {
            options = options.with_image_dir(dir);
        }
        if let Some(path) = &self.base_docx {
            options = options.with_base_template(path);
        }
        if self.max_width.is_some() || self.max_height.is_some() {
            let limits = options.figure_limits;
            options = options.with_figure_limits(
                self.max_width.unwrap_or(limits.max_width_cm),
                self.max_height.unwrap_or(limits.max_height_cm),
            );
        }
        if let Some(dpi) = self.dpi {
            options = options.with_default_dpi(dpi);
        }
        if self.debug_markup {
            options = options.with_debug_markup(true);
        }

        options.validate()?;
        Ok(options)
    }

    fn load_options(&self) -> LoadOptions {
        load_options(self.sheet.as_deref())
    }
}

fn load_options(sheet: Option<&str>) -> LoadOptions {
    let mut options = LoadOptions::new();
    if let Some(sheet) = sheet {
        options.sheet = SheetSelection::parse(sheet);
    }
    options
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TemplateArg {
    /// Full workshop layout (AINI 2016)
    Aini2016,
    /// Minimal layout (JSCPB 2016)
    Jscpb2016,
}

impl From<TemplateArg> for TemplateKind {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Aini2016 => TemplateKind::Aini2016,
            TemplateArg::Jscpb2016 => TemplateKind::Jscpb2016,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate {
            input,
            output,
            render,
        }) => cmd_generate(&input, output.as_deref(), &render),
        Some(Commands::Preview {
            input,
            output,
            render,
        }) => cmd_preview(&input, output.as_deref(), &render),
        Some(Commands::Json {
            input,
            output,
            compact,
            render,
        }) => cmd_json(&input, output.as_deref(), compact, &render),
        Some(Commands::Info { input, sheet }) => cmd_info(&input, sheet.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: generate if input is provided
            if let Some(input) = cli.input {
                cmd_generate(&input, cli.output.as_deref(), &cli.render)
            } else {
                println!("{}", "Usage: abstractdoc <FILE> [OUTPUT]".yellow());
                println!("       abstractdoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

fn cmd_generate(
    input: &Path,
    output: Option<&Path>,
    args: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.render_options()?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));
    if output == input {
        return Err(format!("output would overwrite the input: {}", input.display()).into());
    }

    let template = options.template;
    let pb = spinner(&format!("Rendering {} ({})...", input.display(), template));
    let assembler = Assembler::new(options).with_load_options(args.load_options());
    let result = match assembler.generate(input, &output) {
        Ok(result) => result,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    println!(
        "{} {} ({} records, {} figures, {} bytes)",
        "Saved to".green(),
        result.output.display(),
        result.metadata.record_count,
        result.stats.image_count,
        result.bytes_written
    );

    Ok(())
}

fn render_document(
    input: &Path,
    args: &RenderArgs,
) -> Result<abstractdoc::Document, Box<dyn std::error::Error>> {
    let options = args.render_options()?;
    let assembler = Assembler::new(options);
    let table = TableLoader::with_options(args.load_options()).load(input)?;
    assembler.check_columns(&table)?;
    Ok(assembler.assemble(&table.records)?)
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_preview(
    input: &Path,
    output: Option<&Path>,
    args: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = render_document(input, args)?;
    let text = render::to_text(&doc)?;
    write_or_print(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = render_document(input, args)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path, sheet: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let table = TableLoader::with_options(load_options(sheet)).load(input)?;

    println!("{}", "Spreadsheet Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Sheets".bold(), table.sheet_names.join(", "));
    println!("{}: {}", "Sheet".bold(), table.sheet_name);
    println!("{}: {}", "Records".bold(), table.len());

    println!();
    println!("{}", "Columns".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for column in &table.columns {
        println!("  {}", column);
    }

    println!();
    println!("{}", "Layouts".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for kind in TemplateKind::ALL {
        let missing = kind.build().missing_columns(&table.columns);
        if missing.is_empty() {
            println!("  {} {}", kind.to_string().bold(), "ready".green());
        } else {
            println!(
                "  {} {} {}",
                kind.to_string().bold(),
                "missing:".yellow(),
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "abstractdoc".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Conference-abstract DOCX renderer");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/abstractdoc".dimmed()
    );
    println!("License: MIT");
}
