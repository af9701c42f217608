//! Command line front end: draw a counter badge onto an image file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use drawable_badge::{
    Badge, BadgeBuilder, BadgePosition, BadgeStyle, Color, Configurable, FontFace, Gravity,
    HorizontalGravity, ImageSource, VerticalGravity,
};

#[derive(Debug, Parser)]
#[command(name = "badge", about = "Draw a numeric badge onto an image")]
struct Args {
    /// Base image (PNG, JPEG, ... or SVG).
    input: PathBuf,

    /// Where to write the rendered PNG.
    output: PathBuf,

    /// Counter to display. 0 writes the input unchanged.
    #[arg(short, long)]
    count: u32,

    /// JSON style file applied before the flags below.
    #[arg(long)]
    style: Option<PathBuf>,

    /// TrueType/OpenType font for the label.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    badge_size: Option<f32>,

    #[arg(long)]
    border_size: Option<f32>,

    #[arg(long)]
    margin: Option<f32>,

    /// Badge fill, `#rrggbb` or `#aarrggbb`.
    #[arg(long)]
    badge_color: Option<Color>,

    #[arg(long)]
    border_color: Option<Color>,

    #[arg(long)]
    text_color: Option<Color>,

    /// Legacy corner placement. Overrides --gravity.
    #[arg(long, value_enum)]
    position: Option<PositionArg>,

    #[arg(long, value_enum)]
    gravity: Option<GravityArg>,

    #[arg(long)]
    no_border: bool,

    #[arg(long)]
    hide_counter: bool,

    #[arg(long)]
    maximum: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PositionArg {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<PositionArg> for BadgePosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::TopLeft => Self::TopLeft,
            PositionArg::TopRight => Self::TopRight,
            PositionArg::BottomLeft => Self::BottomLeft,
            PositionArg::BottomRight => Self::BottomRight,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GravityArg {
    TopStart,
    Top,
    TopEnd,
    Start,
    Center,
    End,
    BottomStart,
    Bottom,
    BottomEnd,
}

impl From<GravityArg> for Gravity {
    fn from(arg: GravityArg) -> Self {
        use HorizontalGravity as H;
        use VerticalGravity as V;

        let (h, v) = match arg {
            GravityArg::TopStart => (H::Start, V::Top),
            GravityArg::Top => (H::Center, V::Top),
            GravityArg::TopEnd => (H::End, V::Top),
            GravityArg::Start => (H::Start, V::Center),
            GravityArg::Center => (H::Center, V::Center),
            GravityArg::End => (H::End, V::Center),
            GravityArg::BottomStart => (H::Start, V::Bottom),
            GravityArg::Bottom => (H::Center, V::Bottom),
            GravityArg::BottomEnd => (H::End, V::Bottom),
        };
        Gravity::new(h, v)
    }
}

fn builder(args: &Args) -> Result<BadgeBuilder, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&args.input)?;
    let is_svg = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let image = if is_svg {
        ImageSource::Svg(String::from_utf8(bytes)?)
    } else {
        ImageSource::Encoded(bytes)
    };

    let mut builder = Badge::builder();
    if let Some(path) = &args.style {
        let style = BadgeStyle::from_json(&std::fs::read_to_string(path)?)?;
        builder.apply_style(&style)?;
    }
    // The input file always wins over an image named in the style.
    builder = builder.image(image);

    if let Some(path) = &args.font {
        builder = builder.font_face(FontFace::from_bytes(std::fs::read(path)?)?);
    }
    if let Some(size) = args.badge_size {
        builder = builder.badge_size(size);
    }
    if let Some(size) = args.border_size {
        builder = builder.border_size(size);
    }
    if let Some(margin) = args.margin {
        builder = builder.margin(margin);
    }
    if let Some(color) = args.badge_color {
        builder = builder.badge_color(color);
    }
    if let Some(color) = args.border_color {
        builder = builder.border_color(color);
    }
    if let Some(color) = args.text_color {
        builder = builder.text_color(color);
    }
    if let Some(position) = args.position {
        builder = builder.badge_position(position.into());
    }
    if let Some(gravity) = args.gravity {
        builder = builder.badge_gravity(gravity.into());
    }
    if args.no_border {
        builder = builder.show_border(false);
    }
    if args.hide_counter {
        builder = builder.show_counter(false);
    }
    if let Some(maximum) = args.maximum {
        builder = builder.maximum_counter(maximum);
    }

    Ok(builder)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let badge = builder(args)?.build()?;
    let rendered = badge.render(args.count);
    rendered.data.save(&args.output)?;
    log::info!(
        "wrote {} ({}x{})",
        args.output.display(),
        rendered.data.width(),
        rendered.data.height()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("badge: {e}");
            ExitCode::FAILURE
        }
    }
}
