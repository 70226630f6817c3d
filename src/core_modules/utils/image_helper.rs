pub mod image_helper {
    use image::ImageEncoder;
    use std::path::Path;

    /// Write a raw RGBA buffer to disk as a PNG. Debug and visualization
    /// surface for intermediate pipeline buffers (masks, previews).
    pub fn save(
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        buffer: &[u8],
    ) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(buffer, width, height, image::ExtendedColorType::Rgba8)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::image_helper::*;

    #[test]
    fn save_white_file() {
        let height = 50u32;
        let width = 50u32;
        let buffer_size = (width * height * 4) as usize;
        let buffer = vec![255u8; buffer_size];
        let path = std::env::temp_dir().join("wallbrush_white_file.png");

        save(&path, width, height, &buffer).expect("Error Saving File.");
    }

    #[test]
    fn save_gradient_file() {
        let height = 50u32;
        let width = 80u32;
        let buffer_size = (width * height * 4) as usize;
        let mut buffer = vec![255u8; buffer_size];
        let path = std::env::temp_dir().join("wallbrush_gradient_file.png");
        let mut intensity = 0;

        for i in buffer.chunks_mut(4) {
            i[0] = intensity;
            i[1] = intensity;
            i[2] = intensity;
            intensity += 1;
            intensity %= 255;
        }

        save(&path, width, height, &buffer).expect("Error Saving File.");
    }
}
