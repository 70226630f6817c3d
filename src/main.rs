// This file is an example runner for the `wallbrush` library: load a room
// photo, detect the wall mask, recolor it, and write the results next to the
// input. The main library entry point is `src/lib.rs`.

use wallbrush::core_modules::utils::image_helper::image_helper;
use wallbrush::{ColorSpec, PixelBuffer, RecolorConfig, RecolorPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: wallbrush <image> [#rrggbb] [sensitivity]");
        std::process::exit(2);
    };
    let color = ColorSpec::parse(&args.next().unwrap_or_else(|| "#3366ff".to_string()))?;
    let sensitivity: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1.0);

    let image = PixelBuffer::load(&path).await?;
    println!("loaded {} ({}x{})", path, image.width, image.height);

    let pipeline = RecolorPipeline::new(RecolorConfig::default());
    let mask = pipeline.detect_wall_mask(&image, sensitivity)?;
    println!("paintable coverage: {:.1}%", mask.coverage() * 100.0);

    let preview = pipeline.mask_preview(&mask);
    image_helper::save("wallbrush-mask.png", preview.width, preview.height, &preview.data)?;

    let recolored = pipeline.recolor(&image, &mask, &color)?;
    image_helper::save(
        "wallbrush-recolored.png",
        recolored.width,
        recolored.height,
        &recolored.data,
    )?;
    println!("wrote wallbrush-mask.png and wallbrush-recolored.png");

    Ok(())
}
