use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ribbon_forge::{
    AssetLibrary, Capture, Editor, ExportOpts, FrameKind, Rgb8, StripeDraft, TextDeviceDraft,
    Warning,
};

#[derive(Parser, Debug)]
#[command(name = "ribbon-forge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty ribbon document.
    New(NewArgs),
    /// Add, edit, remove or mirror stripes.
    Stripe(StripeArgs),
    /// Add or remove devices, or list the icons in the asset library.
    Device(DeviceArgs),
    /// Set the background color.
    Background(BackgroundArgs),
    /// Select the frame tier.
    Frame(FrameArgs),
    /// Set or clear the logo.
    Logo(LogoArgs),
    /// Enable or disable the line texture.
    Texture(TextureArgs),
    /// Show or update the ribbon metadata.
    Info(InfoArgs),
    /// Reset the document to empty.
    Clear(DocArgs),
    /// Render the half-size preview (with outline) as a PNG.
    Preview(PreviewArgs),
    /// Export the published PNG.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DocArgs {
    /// Ribbon document JSON.
    #[arg(long)]
    doc: PathBuf,

    /// Asset library root.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

#[derive(Args, Debug)]
struct NewArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Background color as `#rrggbb`.
    #[arg(long, default_value = "#000000")]
    background: Rgb8,
}

#[derive(Args, Debug)]
struct StripeArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[command(subcommand)]
    action: StripeAction,
}

#[derive(Args, Debug)]
struct StripeFields {
    /// Left edge in canonical units (0..=1024).
    #[arg(long)]
    offset: i64,
    /// Width in canonical units (1..=1024).
    #[arg(long)]
    width: i64,
    /// Fill color as `#rrggbb`.
    #[arg(long)]
    color: Rgb8,
    /// Also paint the stripe mirrored about the center.
    #[arg(long, default_value_t = false)]
    mirrored: bool,
}

impl StripeFields {
    fn draft(&self) -> StripeDraft {
        StripeDraft {
            offset: self.offset,
            width: self.width,
            color: self.color,
            mirrored: self.mirrored,
        }
    }
}

#[derive(Subcommand, Debug)]
enum StripeAction {
    /// Append a stripe.
    Add(StripeFields),
    /// Replace the stripe at `--index`.
    Edit {
        #[arg(long)]
        index: usize,
        #[command(flatten)]
        fields: StripeFields,
    },
    /// Remove the stripe at `--index`.
    Remove {
        #[arg(long)]
        index: usize,
    },
    /// Toggle mirroring of the stripe at `--index`.
    Mirror {
        #[arg(long)]
        index: usize,
    },
}

#[derive(Args, Debug)]
struct DeviceArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[command(subcommand)]
    action: DeviceAction,
}

#[derive(Subcommand, Debug)]
enum DeviceAction {
    /// Add a text label.
    Text {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: Rgb8,
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
    },
    /// Add an icon from the asset library by name.
    Icon {
        #[arg(long)]
        name: String,
    },
    /// Remove the device at `--index`.
    Remove {
        #[arg(long)]
        index: usize,
    },
    /// List icons available in the asset library.
    List,
}

#[derive(Args, Debug)]
struct BackgroundArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[arg(long)]
    color: Rgb8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FrameChoice {
    None,
    Gold,
    Silver,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[arg(long, value_enum)]
    kind: FrameChoice,
}

#[derive(Args, Debug)]
struct LogoArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Logo image path.
    #[arg(long, conflicts_with_all = ["library", "none"])]
    path: Option<PathBuf>,

    /// Use `<assets>/logo/logo.png`.
    #[arg(long, default_value_t = false, conflicts_with = "none")]
    library: bool,

    /// Remove the logo.
    #[arg(long, default_value_t = false)]
    none: bool,
}

#[derive(Args, Debug)]
struct TextureArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[arg(long, action = clap::ArgAction::Set)]
    enabled: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    doc: DocArgs,

    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    award: Option<String>,
    #[arg(long)]
    device: Option<String>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = ExportOpts::default().width)]
    width: u32,

    #[arg(long, default_value_t = ExportOpts::default().height)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::New(args) => cmd_new(args),
        Command::Stripe(args) => cmd_stripe(args),
        Command::Device(args) => cmd_device(args),
        Command::Background(args) => edit(&args.doc, |ed| {
            ed.set_background(args.color);
            Ok(())
        }),
        Command::Frame(args) => cmd_frame(args),
        Command::Logo(args) => cmd_logo(args),
        Command::Texture(args) => edit(&args.doc, |ed| {
            ed.set_texture(args.enabled);
            Ok(())
        }),
        Command::Info(args) => cmd_info(args),
        Command::Clear(args) => edit(&args, |ed| {
            ed.clear();
            Ok(())
        }),
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn open(args: &DocArgs) -> anyhow::Result<Editor> {
    let mut editor = Editor::new(AssetLibrary::new(&args.assets));
    let warnings = editor
        .import(&args.doc)
        .with_context(|| format!("load ribbon '{}'", args.doc.display()))?;
    report(&warnings);
    Ok(editor)
}

fn edit(args: &DocArgs, f: impl FnOnce(&mut Editor) -> anyhow::Result<()>) -> anyhow::Result<()> {
    let mut editor = open(args)?;
    f(&mut editor)?;
    save(&editor, &args.doc)
}

fn save(editor: &Editor, path: &Path) -> anyhow::Result<()> {
    editor
        .save(path)
        .with_context(|| format!("save ribbon '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn report(warnings: &[Warning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}

fn cmd_new(args: NewArgs) -> anyhow::Result<()> {
    let mut editor = Editor::new(AssetLibrary::new(&args.doc.assets));
    editor.set_background(args.background);
    save(&editor, &args.doc.doc)
}

fn cmd_stripe(args: StripeArgs) -> anyhow::Result<()> {
    edit(&args.doc, |ed| {
        match &args.action {
            StripeAction::Add(fields) => {
                if let Some(index) = ed.add_stripe_capture(Capture::Confirmed(fields.draft()))? {
                    eprintln!("added stripe #{index}");
                }
            }
            StripeAction::Edit { index, fields } => {
                ed.edit_stripe_capture(*index, Capture::Confirmed(fields.draft()))?;
            }
            StripeAction::Remove { index } => {
                ed.remove_stripe(*index)?;
            }
            StripeAction::Mirror { index } => {
                let on = ed.toggle_stripe_mirror(*index)?;
                eprintln!("stripe #{index} mirrored: {on}");
            }
        }
        Ok(())
    })
}

fn cmd_device(args: DeviceArgs) -> anyhow::Result<()> {
    if let DeviceAction::List = args.action {
        let library = AssetLibrary::new(&args.doc.assets);
        for d in library.available_devices()? {
            println!("{}\t{}", d.name, d.path.display());
        }
        return Ok(());
    }

    edit(&args.doc, |ed| {
        match &args.action {
            DeviceAction::Text { name, color, x, y } => {
                let draft = TextDeviceDraft {
                    name: name.clone(),
                    color: *color,
                    x: *x,
                    y: *y,
                };
                if let Some(index) = ed.add_text_device_capture(Capture::Confirmed(draft))? {
                    eprintln!("added device #{index}");
                }
            }
            DeviceAction::Icon { name } => {
                let index = ed.add_library_device(name)?;
                eprintln!("added device #{index}");
            }
            DeviceAction::Remove { index } => {
                ed.remove_device(*index)?;
            }
            DeviceAction::List => {}
        }
        Ok(())
    })
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let wanted = match args.kind {
        FrameChoice::None => None,
        FrameChoice::Gold => Some(FrameKind::Gold),
        FrameChoice::Silver => Some(FrameKind::Silver),
    };
    edit(&args.doc, |ed| {
        let applied = ed.set_frame(wanted);
        if applied != wanted {
            eprintln!("warning: frame overlay missing from asset library, using no frame");
        }
        Ok(())
    })
}

fn cmd_logo(args: LogoArgs) -> anyhow::Result<()> {
    edit(&args.doc, |ed| {
        if args.none {
            ed.set_logo(None);
        } else if args.library {
            ed.use_library_logo()?;
        } else if let Some(path) = &args.path {
            let abs = std::path::absolute(path)
                .with_context(|| format!("resolve logo path '{}'", path.display()))?;
            ed.set_logo(Some(abs));
        } else {
            anyhow::bail!("one of --path, --library or --none is required");
        }
        Ok(())
    })
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    if args.name.is_none() && args.award.is_none() && args.device.is_none() {
        let editor = open(&args.doc)?;
        println!("{}", editor.document().info);
        return Ok(());
    }

    edit(&args.doc, |ed| {
        let current = ed.document().info.clone();
        ed.set_ribbon_info(
            args.name.clone().unwrap_or(current.name),
            args.award.clone().unwrap_or(current.award_details),
            args.device.clone().unwrap_or(current.device_details),
        );
        Ok(())
    })
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut editor = open(&args.doc)?;
    let rendered = editor.preview()?;
    report(&rendered.warnings);
    ribbon_forge::write_png(&rendered.frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut editor = open(&args.doc)?;
    let opts = ExportOpts {
        width: args.width,
        height: args.height,
    };
    let warnings = editor.export_png(&args.out, &opts)?;
    report(&warnings);
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
