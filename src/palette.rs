// THEORY:
// The `palette` module is the engine's only external collaborator surface. A
// provider (a remote suggestion service, in production) turns a room type and
// a style preference into named color palettes. The collaborator is allowed
// to be absent (no credential configured) or to fail (network, malformed
// response); in every such case `suggest_palettes` substitutes the built-in
// table below and logs the substitution. A palette failure is never allowed
// to reach the compositor or the user as an error.
//
// The built-in table is a fixed, deterministic lookup keyed by style
// preference, with "modern" as the catch-all, so offline behavior is fully
// reproducible. `extract_best_matches` supplements the suggestions with a
// cheap frequency palette sampled from the photograph itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core_modules::color_spec::ColorSpec;
use crate::core_modules::pixel_buffer::pixel_buffer::{PixelBuffer, CHANNELS};
use crate::error::{PaintError, Result};

/// One named color inside a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub hex: String,
}

/// A titled set of colors with a short style description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub title: String,
    pub description: String,
    pub colors: Vec<PaletteColor>,
}

/// The external palette suggestion collaborator, specified only at its
/// interface. Implementations may call out to anything; errors are recovered
/// by `suggest_palettes`.
pub trait PaletteProvider {
    fn fetch(&self, room_type: &str, style_preference: &str) -> Result<Vec<Palette>>;
}

/// Ask the provider for palettes, falling back to the built-in table when the
/// provider is missing, fails, or returns nothing. Never fails.
pub fn suggest_palettes(
    provider: Option<&dyn PaletteProvider>,
    room_type: &str,
    style_preference: &str,
) -> Vec<Palette> {
    match provider {
        Some(provider) => match provider.fetch(room_type, style_preference) {
            Ok(palettes) if !palettes.is_empty() => palettes,
            Ok(_) => {
                log::warn!("palette provider returned no palettes; using built-in table");
                builtin_palettes(style_preference)
            }
            Err(error) => {
                log::warn!("palette provider failed ({error}); using built-in table");
                builtin_palettes(style_preference)
            }
        },
        None => builtin_palettes(style_preference),
    }
}

/// Tolerantly extract a `{"palettes": [...]}` object embedded in a larger
/// text blob, the way a free-form service response carries it. Hex values are
/// normalized to lowercase. Malformed input is a palette service error, which
/// `suggest_palettes` recovers from.
pub fn parse_palettes_json(text: &str) -> Result<Vec<Palette>> {
    #[derive(Deserialize)]
    struct Envelope {
        palettes: Vec<Palette>,
    }

    let start = text
        .find('{')
        .ok_or_else(|| PaintError::palette_message("no JSON object in response"))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| PaintError::palette_message("unterminated JSON object in response"))?;
    if end < start {
        return Err(PaintError::palette_message("malformed JSON in response"));
    }

    let envelope: Envelope = serde_json::from_str(&text[start..=end])
        .map_err(|e| PaintError::palette("could not parse palette response", e))?;

    let mut palettes = envelope.palettes;
    for palette in &mut palettes {
        for color in &mut palette.colors {
            color.hex = color.hex.to_ascii_lowercase();
        }
    }
    Ok(palettes)
}

/// Sparse-sampled frequency palette of the photograph itself: the most common
/// colors, most frequent first, at most `count` entries. Deterministic for a
/// given image.
pub fn extract_best_matches(image: &PixelBuffer, count: usize) -> Vec<ColorSpec> {
    const SAMPLE_MAX_SIDE: u32 = 300;
    const SAMPLE_STRIDE: usize = 20;

    let small = image.downscaled(SAMPLE_MAX_SIDE);
    let mut frequency: HashMap<[u8; 3], usize> = HashMap::new();
    for px in small.data.chunks_exact(CHANNELS).step_by(SAMPLE_STRIDE) {
        *frequency.entry([px[0], px[1], px[2]]).or_insert(0) += 1;
    }

    let mut entries: Vec<([u8; 3], usize)> = frequency.into_iter().collect();
    // Frequency first; ties break on the channel values so the order is
    // stable across runs.
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    entries
        .into_iter()
        .take(count)
        .map(|(rgb, _)| ColorSpec::from_rgb(rgb))
        .collect()
}

fn palette(title: &str, description: &str, colors: &[(&str, &str)]) -> Palette {
    Palette {
        title: title.to_string(),
        description: description.to_string(),
        colors: colors
            .iter()
            .map(|(name, hex)| PaletteColor {
                name: (*name).to_string(),
                hex: (*hex).to_string(),
            })
            .collect(),
    }
}

/// The fixed offline palette table, keyed by style preference. Unknown styles
/// map to `modern`.
pub fn builtin_palettes(style_preference: &str) -> Vec<Palette> {
    match style_preference.to_ascii_lowercase().as_str() {
        "cozy" => vec![
            palette(
                "Warm & Cozy",
                "Inviting palette with warm earth tones and soft neutrals",
                &[
                    ("Cream", "#fef7e0"),
                    ("Taupe", "#8b7355"),
                    ("Terracotta", "#d97706"),
                    ("Sage", "#84cc16"),
                    ("Warm Gray", "#6b7280"),
                ],
            ),
            palette(
                "Comfortable Neutral",
                "Soft, welcoming colors that create a peaceful atmosphere",
                &[
                    ("Ivory", "#fafaf9"),
                    ("Mushroom", "#a8a29e"),
                    ("Dusty Rose", "#e11d48"),
                    ("Olive", "#65a30d"),
                    ("Warm Beige", "#f5f5dc"),
                ],
            ),
        ],
        "vibrant" => vec![
            palette(
                "Bold & Bright",
                "Energetic palette with vibrant colors and high contrast",
                &[
                    ("Electric Blue", "#3b82f6"),
                    ("Sunny Yellow", "#eab308"),
                    ("Hot Pink", "#ec4899"),
                    ("Lime Green", "#84cc16"),
                    ("Pure White", "#ffffff"),
                ],
            ),
            palette(
                "Tropical Paradise",
                "Vibrant tropical-inspired colors that bring energy to the space",
                &[
                    ("Turquoise", "#06b6d4"),
                    ("Coral", "#f97316"),
                    ("Lime", "#84cc16"),
                    ("Purple", "#8b5cf6"),
                    ("Warm White", "#fefefe"),
                ],
            ),
        ],
        "minimal" => vec![
            palette(
                "Pure Minimal",
                "Ultra-clean palette with maximum whites and subtle grays",
                &[
                    ("Pure White", "#ffffff"),
                    ("Off White", "#fafafa"),
                    ("Light Gray", "#f3f4f6"),
                    ("Charcoal", "#374151"),
                    ("Warm Gray", "#9ca3af"),
                ],
            ),
            palette(
                "Minimal Accent",
                "Clean minimal base with one carefully chosen accent color",
                &[
                    ("White", "#ffffff"),
                    ("Light Gray", "#f8fafc"),
                    ("Navy Blue", "#1e3a8a"),
                    ("Warm Gray", "#6b7280"),
                    ("Cream", "#fef7e0"),
                ],
            ),
        ],
        "rustic" => vec![
            palette(
                "Rustic Charm",
                "Natural, earthy palette inspired by rustic farmhouse style",
                &[
                    ("Warm White", "#fef7e0"),
                    ("Barn Red", "#dc2626"),
                    ("Sage Green", "#84cc16"),
                    ("Warm Brown", "#92400e"),
                    ("Stone Gray", "#6b7280"),
                ],
            ),
            palette(
                "Country Comfort",
                "Cozy rustic colors that evoke warmth and tradition",
                &[
                    ("Cream", "#fafaf9"),
                    ("Olive", "#65a30d"),
                    ("Terracotta", "#d97706"),
                    ("Navy", "#1e3a8a"),
                    ("Warm Gray", "#8b7355"),
                ],
            ),
        ],
        _ => vec![
            palette(
                "Modern Minimalist",
                "Clean, sophisticated palette with neutral tones and subtle accents",
                &[
                    ("Pure White", "#ffffff"),
                    ("Charcoal Gray", "#2c3e50"),
                    ("Warm Beige", "#f5f5dc"),
                    ("Navy Blue", "#1e3a8a"),
                    ("Sage Green", "#9ca3af"),
                ],
            ),
            palette(
                "Contemporary Cool",
                "Sleek palette featuring cool grays and bold accent colors",
                &[
                    ("Light Gray", "#f8fafc"),
                    ("Steel Blue", "#475569"),
                    ("Coral Accent", "#f97316"),
                    ("Deep Teal", "#0f766e"),
                    ("Warm White", "#fefefe"),
                ],
            ),
        ],
    }
}
