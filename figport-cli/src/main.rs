use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use figport::{
    FigmaClient, FsAssetSink, ImageFormat, ImportConfig, ImportSession, ImportStatus, TextBackend,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "figport", version, about = "Import a Figma file into scene templates")]
struct Cli {
    /// Figma file key (the id segment of the file URL).
    #[arg(long)]
    file_key: String,

    /// Personal access token; read from FIGMA_TOKEN when not given.
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    token: String,

    /// Output directory for persisted images and templates.
    #[arg(long, default_value = "figma-import")]
    out: PathBuf,

    /// Output encoding for rasterized shape layers.
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Text materialization backend.
    #[arg(long, value_enum, default_value_t = TextArg::Plain)]
    text: TextArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Jpg,
    Png,
}

impl From<FormatArg> for ImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Jpg => ImageFormat::Jpg,
            FormatArg::Png => ImageFormat::Png,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TextArg {
    Plain,
    Rich,
}

impl From<TextArg> for TextBackend {
    fn from(v: TextArg) -> Self {
        match v {
            TextArg::Plain => TextBackend::Plain,
            TextArg::Rich => TextBackend::Rich,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = ImportConfig {
        file_key: cli.file_key,
        token: cli.token,
        image_format: cli.format.into(),
        text_backend: cli.text.into(),
    };

    let api = Arc::new(FigmaClient::new(&cfg.token)?);
    let sink = Arc::new(FsAssetSink::new(cli.out));
    let session = ImportSession::new(api, sink);

    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let report = session.import(&cfg).await?;
    match report.status {
        ImportStatus::Completed => eprintln!(
            "imported {} template(s), {} image(s) bound, {} failed",
            report.build.templates, report.images.bound, report.images.failed
        ),
        ImportStatus::Cancelled => eprintln!(
            "cancelled; kept {} node(s) materialized so far",
            report.scene.len()
        ),
    }
    Ok(())
}
