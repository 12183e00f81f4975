use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "overlay-canvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a saved session blob as a PNG.
    Render(RenderArgs),
    /// Open an image, run an editor command script, and export the result.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Saved session JSON.
    #[arg(long)]
    session: PathBuf,

    /// Directory that image references resolve against. Defaults to the session's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Editor options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Base image, relative to `--assets`.
    #[arg(long)]
    image: String,

    /// Directory that image references resolve against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// JSON array of editor commands.
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also save the final session into this directory.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Editor options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn read_opts(path: Option<&Path>) -> anyhow::Result<overlay_canvas::EditorOpts> {
    let Some(path) = path else {
        return Ok(overlay_canvas::EditorOpts::default());
    };
    let f = File::open(path).with_context(|| format!("open options '{}'", path.display()))?;
    let opts = serde_json::from_reader(BufReader::new(f)).with_context(|| "parse options JSON")?;
    Ok(opts)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.opts.as_deref())?;
    let raw = std::fs::read_to_string(&args.session)
        .with_context(|| format!("read session '{}'", args.session.display()))?;
    let session = overlay_canvas::restore(&raw)
        .with_context(|| format!("restore session '{}'", args.session.display()))?;

    let assets_root = match args.assets {
        Some(dir) => dir,
        None => args
            .session
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };

    let mut editor = overlay_canvas::Editor::from_session(
        session,
        overlay_canvas::DirImageSource::new(assets_root),
        overlay_canvas::CpuRenderer::default(),
        opts,
    )?;

    editor.export_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.opts.as_deref())?;
    let f = File::open(&args.script)
        .with_context(|| format!("open script '{}'", args.script.display()))?;
    let script: Vec<overlay_canvas::EditorCommand> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse script JSON")?;

    let mut editor = overlay_canvas::Editor::open(
        overlay_canvas::ImageRef::new(args.image),
        overlay_canvas::DirImageSource::new(&args.assets),
        overlay_canvas::CpuRenderer::default(),
        opts,
    )?;
    for (i, cmd) in script.iter().enumerate() {
        editor
            .apply(cmd)
            .with_context(|| format!("script step {i} ({cmd:?})"))?;
    }

    if let Some(dir) = &args.save {
        let mut store = overlay_canvas::DirStore::new(dir);
        editor.save_project(&mut store)?;
        eprintln!("saved session to {}", dir.display());
    }

    editor.export_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
