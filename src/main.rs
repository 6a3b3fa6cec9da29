use assist_media::grouping::Entity;
use assist_media::settings::{self, Settings, SettingsInput};
use assist_media::taxonomy::TaxonomyField;
use assist_media::types::{Attachment, Thumbnail, Video};
use assist_media::urls::{CropRequest, Size, TargetWidth, ViewportInfo};
use assist_media::{Helpers, config, logging, output};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Named crop flags shared by commands that build thumbnail URLs.
#[derive(clap::Args, Clone)]
struct CropArgs {
    /// Named crop on the thumbnail to apply
    #[arg(long)]
    crop: Option<String>,
    /// Gravity to use when the thumbnail has no such crop
    #[arg(long, requires = "crop")]
    crop_fallback: Option<String>,
}

impl CropArgs {
    fn request(&self) -> Option<CropRequest<'_>> {
        let request = CropRequest::new(self.crop.as_deref()?);
        Some(match self.crop_fallback.as_deref() {
            Some(gravity) => request.with_fallback(gravity),
            None => request,
        })
    }
}

#[derive(Parser)]
#[command(name = "assist-media")]
#[command(about = "Layout ratios, taxonomy terms and transform URLs for asset-service media")]
#[command(long_about = "\
Layout ratios, taxonomy terms and transform URLs for asset-service media

Media descriptors are read as JSON from a file, or from stdin when the
path is '-'. URLs are built under {assist_url}/{slug}, taken from
assist.toml and overridable with --assist-url and --slug.

Settings strings use ',' or ';' between tokens and ':' or '_' inside them:
  w:800;h:600    w_800,h_600

Run 'assist-media gen-config' to generate a documented assist.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "assist.toml", global = true)]
    config: PathBuf,

    /// Asset service base URL (overrides the config file)
    #[arg(long, global = true)]
    assist_url: Option<String>,

    /// Resource namespace (overrides the config file)
    #[arg(long, global = true)]
    slug: Option<String>,

    /// Log soft failures and decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// URL for a thumbnail (image, video frame or proxied remote image)
    Thumbnail {
        /// Thumbnail JSON
        input: PathBuf,
        /// Transform settings string
        #[arg(long, default_value = "")]
        settings: String,
        #[command(flatten)]
        crop: CropArgs,
    },
    /// Transform URL for a video file
    Video {
        /// Video JSON
        input: PathBuf,
        #[arg(long, default_value = "")]
        settings: String,
    },
    /// Responsive srcset, or one URL when --width is given
    Srcset {
        /// Thumbnail JSON
        input: PathBuf,
        /// JSON list of sizes, e.g. [{"400": "w:400"}, {"800": "w:800"}]
        #[arg(long)]
        sizes: PathBuf,
        /// Target width: pixels ("600") or viewport percentage ("50vw")
        #[arg(long)]
        width: Option<String>,
        /// Viewport width in CSS pixels, for percentage targets
        #[arg(long)]
        viewport_width: Option<f64>,
        /// Device pixel ratio, for percentage targets
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,
        #[command(flatten)]
        crop: CropArgs,
    },
    /// View or download URL for an attachment
    Attachment {
        /// Attachment JSON
        input: PathBuf,
        #[arg(long)]
        download: bool,
    },
    /// Group entities into rows with proportional ratios
    Group {
        /// JSON list of entities
        input: PathBuf,
        #[arg(long)]
        group_size: Option<usize>,
        /// Print the groups as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Display terms from a taxonomy field
    Terms {
        /// Taxonomy field JSON
        input: PathBuf,
        #[arg(long)]
        attr: Option<String>,
        #[arg(long)]
        depth: Option<usize>,
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Convert settings between string and JSON forms
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Print a stock assist.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Parse a settings string and list its parameters
    Decode { value: String },
    /// Encode a JSON settings object in canonical form
    Encode { input: PathBuf },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match &cli.command {
        Command::Thumbnail {
            input,
            settings,
            crop,
        } => {
            let thumbnail: Option<Thumbnail> = read_json(input)?;
            let src = load_helpers(&cli)?.thumbnail_src(
                thumbnail.as_ref(),
                &SettingsInput::from(settings.as_str()),
                crop.request().as_ref(),
            );
            println!("{}", src);
        }
        Command::Video { input, settings } => {
            let video: Option<Video> = read_json(input)?;
            let src = load_helpers(&cli)?
                .video_src(video.as_ref(), &SettingsInput::from(settings.as_str()));
            println!("{}", src);
        }
        Command::Srcset {
            input,
            sizes,
            width,
            viewport_width,
            dpr,
            crop,
        } => {
            let thumbnail: Option<Thumbnail> = read_json(input)?;
            let sizes: Vec<Size> = read_json(sizes)?;
            let target = match width {
                Some(w) => w.parse::<TargetWidth>()?,
                None => TargetWidth::Enumerate,
            };
            let viewport = viewport_width.map(|width| ViewportInfo {
                width,
                device_pixel_ratio: *dpr,
            });
            let srcset = load_helpers(&cli)?.thumbnail_srcset(
                thumbnail.as_ref(),
                &sizes,
                target,
                viewport.as_ref(),
                crop.request().as_ref(),
            );
            if target.resolve(viewport.as_ref()).is_some() {
                println!("{}", srcset);
            } else {
                output::print_srcset(&srcset);
            }
        }
        Command::Attachment { input, download } => {
            let attachment: Option<Attachment> = read_json(input)?;
            println!(
                "{}",
                load_helpers(&cli)?.attachment_url(attachment.as_ref(), *download)
            );
        }
        Command::Group {
            input,
            group_size,
            json,
        } => {
            let entities: Vec<Entity> = read_json(input)?;
            let groups = load_helpers(&cli)?.group_entities(&entities, *group_size);
            if *json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                output::print_groups(&groups);
            }
        }
        Command::Terms {
            input,
            attr,
            depth,
            prefix,
        } => {
            let field: Option<TaxonomyField> = read_json(input)?;
            let terms = load_helpers(&cli)?.terms(
                field.as_ref(),
                attr.as_deref(),
                *depth,
                prefix.as_deref(),
            );
            output::print_lines(&terms);
        }
        Command::Settings(SettingsCommand::Decode { value }) => {
            output::print_settings(&settings::decode(value));
        }
        Command::Settings(SettingsCommand::Encode { input }) => {
            let parsed: Settings = read_json(input)?;
            println!("{}", settings::encode(&parsed));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve config: stock defaults, then the config file, then CLI flags.
fn load_helpers(cli: &Cli) -> CliResult<Helpers> {
    let mut base = config::stock_defaults_value();
    if let Some(file) = config::load_raw_config(&cli.config)? {
        base = config::merge_toml(base, file);
    }

    let mut flags = toml::Table::new();
    if let Some(url) = &cli.assist_url {
        flags.insert("assist_url".into(), toml::Value::String(url.clone()));
    }
    if let Some(slug) = &cli.slug {
        flags.insert("slug".into(), toml::Value::String(slug.clone()));
    }

    let resolved = config::resolve_config(base, Some(toml::Value::Table(flags)))?;
    debug!(assist_url = %resolved.assist_url, slug = %resolved.slug, "config resolved");
    Ok(Helpers::new(&resolved))
}

/// Read JSON from `path`, or stdin when `path` is `-`.
fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}
