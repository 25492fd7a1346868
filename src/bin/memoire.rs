use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "memoire", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit JSON log lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a session document into a JPEG export (or a preview image).
    Render(RenderArgs),
    /// List the built-in layout templates.
    Templates,
    /// List the built-in themes.
    Themes,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input session JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Directory asset references resolve against. Defaults to the session file's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Render a lenient preview instead of a strict export. Written as PNG unless `--out` ends
    /// in `.jpg`/`.jpeg`.
    #[arg(long)]
    preview: bool,

    /// Render config JSON. `MEMOIRE_*` environment overrides apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    memoire::logging::init_logging(&memoire::LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Templates => cmd_templates(),
        Command::Themes => cmd_themes(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<memoire::RenderConfig> {
    let cfg = match path {
        Some(p) => memoire::RenderConfig::from_path(p)?,
        None => memoire::RenderConfig::from_env()?,
    };
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let doc = memoire::SessionDocument::from_path(&args.in_path)?;
    let session = memoire::Session::from_document(doc, &config)?;

    let assets_root = match &args.assets {
        Some(dir) => dir.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let source: Arc<dyn memoire::ImageSource> = Arc::new(memoire::FsImageSource::new(assets_root));
    let loader = Arc::new(memoire::AssetLoader::new(source));
    let compositor = memoire::Compositor::new(loader, config)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    if args.preview {
        let preview = session.preview(&compositor)?;
        for reference in &preview.degraded {
            eprintln!("skipped {reference}");
        }
        let frame = &preview.frame;
        let format = match args.out.extension().and_then(|e| e.to_str()) {
            Some("jpg" | "jpeg") => image::ImageFormat::Jpeg,
            _ => image::ImageFormat::Png,
        };
        image::save_buffer_with_format(
            &args.out,
            &frame.to_rgb8_over_black(),
            frame.width,
            frame.height,
            image::ColorType::Rgb8,
            format,
        )
        .with_context(|| format!("write preview '{}'", args.out.display()))?;
    } else {
        let Some(img) = compositor.export(&session.render_inputs())?.into_image() else {
            anyhow::bail!("export was not started");
        };
        std::fs::write(&args.out, &img.bytes)
            .with_context(|| format!("write jpeg '{}'", args.out.display()))?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_templates() -> anyhow::Result<()> {
    for key in memoire::TemplateKey::ALL {
        let tpl = key.template();
        let listed = if memoire::TemplateKey::AVAILABLE.contains(&key) {
            ""
        } else {
            " (hidden)"
        };
        println!(
            "{:<14} {}x{} slots={}{listed}",
            key.as_str(),
            tpl.canvas_width,
            tpl.canvas_height,
            tpl.slot_count()
        );
    }
    Ok(())
}

fn cmd_themes() -> anyhow::Result<()> {
    for key in memoire::ThemeKey::ALL {
        let theme = key.config();
        println!(
            "{:<14} {:<14} stickers={}",
            key.as_str(),
            theme.name,
            theme.stickers.len()
        );
    }
    Ok(())
}
