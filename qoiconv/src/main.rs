use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use image::{DynamicImage, ImageFormat};
use qoi_codec::{Channels, Colorspace, Header, RawBuffer};

/// Convert between QOI and any image format the `image` crate understands.
#[derive(Debug, Parser)]
struct Args {
    /// Input image. The format is picked from its extension; `.qoi` selects
    /// the QOI codec, anything else goes through `image`.
    input: PathBuf,

    /// Output image. Defaults to the input path with its extension swapped
    /// (`.qoi` for non-QOI input, `.png` for QOI input).
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let output = args.output.clone().unwrap_or_else(|| {
        if is_qoi(&args.input) {
            args.input.with_extension("png")
        } else {
            args.input.with_extension("qoi")
        }
    });

    if is_qoi(&args.input) {
        qoi_to_image(&args.input, &output)
    } else {
        image_to_qoi(&args.input, &output)
    }
}

fn is_qoi(path: &std::path::Path) -> bool {
    path.extension().is_some_and(|ext| ext == "qoi")
}

/// Decodes `input` as QOI and saves it through `image` under `output`'s
/// extension.
fn qoi_to_image(input: &std::path::Path, output: &std::path::Path) -> anyhow::Result<()> {
    let file = std::fs::File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let (header, pixels) = qoi_codec::decode_strict(std::io::BufReader::new(file))
        .with_context(|| format!("decoding QOI image {}", input.display()))?;

    let rgba: Vec<u8> = pixels.into_iter().flat_map(|p| p.to_rgba_bytes()).collect();
    let buf = image::RgbaImage::from_raw(header.width, header.height, rgba)
        .context("decoded pixel buffer does not match header dimensions")?;

    let dynamic_image = match header.channels {
        Channels::Rgba => DynamicImage::ImageRgba8(buf),
        Channels::Rgb => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(buf).to_rgb8()),
    };

    let format = ImageFormat::from_path(output)
        .with_context(|| format!("unrecognized output extension for {}", output.display()))?;
    dynamic_image
        .save_with_format(output, format)
        .with_context(|| format!("writing {}", output.display()))?;

    Ok(())
}

/// Loads `input` through `image` and encodes it as QOI at `output`.
fn image_to_qoi(input: &std::path::Path, output: &std::path::Path) -> anyhow::Result<()> {
    let dynamic_image =
        image::open(input).with_context(|| format!("opening {}", input.display()))?;
    let rgba = dynamic_image.to_rgba8();

    let header = Header::new(rgba.width(), rgba.height(), Channels::Rgba, Colorspace::Srgb);
    let source = RawBuffer::new(rgba.as_raw(), Channels::Rgba);

    qoi_codec::encode_file(output, &header, source)
        .with_context(|| format!("encoding {}", output.display()))?;

    Ok(())
}
