//! cvpress CLI - render résumé profiles to PDF

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use cvpress::{
    AccentColour, FontSize, FontSource, ProfileDocument, RenderOptions, Renderer, Selection,
    StyleConfig, TemplateId, TrueTypeFont,
};

#[derive(Parser)]
#[command(name = "cvpress")]
#[command(version)]
#[command(about = "Lay out a résumé profile and render it to PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a profile to a PDF file
    Render {
        /// Profile JSON file
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE", default_value = "resume.pdf")]
        output: PathBuf,

        /// Style JSON file; flags below override its fields
        #[arg(long, value_name = "FILE")]
        style: Option<PathBuf>,

        /// Template name (see `cvpress templates`)
        #[arg(short, long)]
        template: Option<TemplateId>,

        /// Body font size in points
        #[arg(long, value_parser = parse_font_size)]
        font_size: Option<FontSize>,

        /// Accent colour name
        #[arg(long)]
        accent: Option<AccentColour>,

        /// Indices of projects to include, in order (e.g. "0,2")
        #[arg(long, value_delimiter = ',')]
        projects: Vec<usize>,

        /// Indices of experiences to include, in order
        #[arg(long, value_delimiter = ',')]
        experiences: Vec<usize>,

        /// Regular TrueType font to embed instead of the standard fonts
        #[arg(long, value_name = "TTF", env = "CVPRESS_FONT", requires = "bold_font")]
        font: Option<PathBuf>,

        /// Bold TrueType font to pair with --font
        #[arg(long, value_name = "TTF", env = "CVPRESS_BOLD_FONT", requires = "font")]
        bold_font: Option<PathBuf>,
    },

    /// List the built-in templates
    Templates,
}

fn parse_font_size(s: &str) -> Result<FontSize, String> {
    let size: u8 = s.parse().map_err(|e| format!("{e}"))?;
    FontSize::try_from(size)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Templates => {
            for template in TemplateId::ALL {
                println!("{template}");
            }
            Ok(())
        }
        Commands::Render {
            profile,
            output,
            style,
            template,
            font_size,
            accent,
            projects,
            experiences,
            font,
            bold_font,
        } => {
            let profile: ProfileDocument = read_json(&profile)?;
            let mut style: StyleConfig = match style {
                Some(path) => read_json(&path)?,
                None => StyleConfig::default(),
            };
            if let Some(template) = template {
                style.template = template;
            }
            if let Some(size) = font_size {
                style.font_size_pt = size;
            }
            if let Some(accent) = accent {
                style.accent_color = accent;
            }

            let mut options = RenderOptions::default();
            if let (Some(regular), Some(bold)) = (font, bold_font) {
                options.fonts = FontSource::TrueType {
                    regular: Arc::new(TrueTypeFont::open(&regular).with_context(|| {
                        format!("failed to load font {}", regular.display())
                    })?),
                    bold: Arc::new(TrueTypeFont::open(&bold).with_context(|| {
                        format!("failed to load font {}", bold.display())
                    })?),
                };
            }

            let selection = Selection::new(projects, experiences);
            let pdf = Renderer::new(options)
                .render(&profile, &selection, &style)
                .map_err(|e| anyhow!("{:?} error: {e}", e.kind()))?;
            fs::write(&output, &pdf.bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            log::info!(
                "wrote {} ({} pages, {} bytes)",
                output.display(),
                pdf.page_count,
                pdf.bytes.len()
            );
            Ok(())
        }
    }
}
