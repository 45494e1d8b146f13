use imageplate_rs::image_plate::{ImagePlatePipeline, PlateConfig, TiffCompression, scan_stems};
use imageplate_rs::logger;

use anyhow::{Context, bail};
use tracing::info;

fn main() -> anyhow::Result<()> {
    logger::init();

    let inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        bail!("usage: imageplate_rs <scan.inf|scan.img|stem>...");
    }

    let stems = scan_stems(&inputs);
    let output = match stems.first() {
        Some(stem) => {
            let mut path = stem.clone().into_os_string();
            path.push(".tiff");
            std::path::PathBuf::from(path)
        }
        None => bail!("no scans given"),
    };

    let config = PlateConfig::builder()
        .compression(TiffCompression::DeflateBalanced)
        .build();
    let pipeline = ImagePlatePipeline::new(config);

    info!("Image plate pipeline initialized");
    info!("Compression: {:?}", pipeline.config().compression);
    info!("Scans: {}", stems.len());

    let image = pipeline
        .convert_files(&stems, &output)
        .with_context(|| format!("failed to combine {} scans", stems.len()))?;

    info!(
        "Wrote {}x{} PSL image to {}",
        image.width(),
        image.height(),
        output.display()
    );
    Ok(())
}
