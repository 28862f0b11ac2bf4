// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Thumbnail colour sampling.
//!
//! The active track's thumbnail drives the ambient colours of the interface.
//! The image is scaled down to a small fixed square and averaged over five
//! regions, the four quadrants and a centred square, which is cheap and
//! fully deterministic for a given input.

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage, imageops::FilterType};

pub(crate) type Rgb = [u8; 3];

const SAMPLE_SIZE: u32 = 50;

const BACKGROUND_1_SCALE: f64 = 0.1;
const BACKGROUND_2_SCALE: f64 = 0.15;

/// Colours derived from a thumbnail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    /// Top-left, top-right, bottom-left, bottom-right, centre.
    pub(crate) colours: [Rgb; 5],
    pub(crate) background_1: Rgb,
    pub(crate) background_2: Rgb,
    pub(crate) interactive: Rgb,
}

impl Palette {
    pub(crate) fn from_regions(colours: [Rgb; 5]) -> Self {
        let dominant = colours[0];
        Self {
            colours,
            background_1: scale(dominant, BACKGROUND_1_SCALE),
            background_2: scale(dominant, BACKGROUND_2_SCALE),
            interactive: colours[4],
        }
    }

    /// Decodes an encoded thumbnail and samples its palette.
    pub(crate) fn from_encoded(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("Failed to decode thumbnail")?;
        Ok(Self::from_regions(extract_colours(&image)))
    }
}

/// Scales any image to the sampling square and averages its five regions.
pub(crate) fn extract_colours(image: &DynamicImage) -> [Rgb; 5] {
    let sample = image
        .resize_exact(SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle)
        .to_rgb8();
    sample_regions(&sample)
}

/// Averages the five regions of an image already at the sampling size.
pub(crate) fn sample_regions(image: &RgbImage) -> [Rgb; 5] {
    let size = SAMPLE_SIZE as f64;
    let half = size / 2.0;
    let quarter = size / 4.0;

    let regions = [
        (0.0, 0.0),
        (half, 0.0),
        (0.0, half),
        (half, half),
        (quarter, quarter),
    ];

    regions.map(|(x, y)| region_mean(image, x, y, half))
}

fn region_mean(image: &RgbImage, x: f64, y: f64, extent: f64) -> Rgb {
    let (x0, x1) = (x.floor() as u32, (x + extent).floor() as u32);
    let (y0, y1) = (y.floor() as u32, (y + extent).floor() as u32);

    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for py in y0..y1.min(image.height()) {
        for px in x0..x1.min(image.width()) {
            let pixel = image.get_pixel(px, py).0;
            for (sum, channel) in sums.iter_mut().zip(pixel) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    if count == 0 {
        return [0, 0, 0];
    }

    sums.map(|sum| (sum as f64 / count as f64).round() as u8)
}

fn scale(colour: Rgb, factor: f64) -> Rgb {
    colour.map(|channel| (f64::from(channel) * factor).round() as u8)
}

#[cfg(test)]
mod tests {
    use image::Rgb as Pixel;

    use super::*;

    fn quadrants() -> RgbImage {
        RgbImage::from_fn(SAMPLE_SIZE, SAMPLE_SIZE, |x, y| match (x < 25, y < 25) {
            (true, true) => Pixel([200, 0, 0]),
            (false, true) => Pixel([0, 200, 0]),
            (true, false) => Pixel([0, 0, 200]),
            (false, false) => Pixel([100, 100, 100]),
        })
    }

    #[test]
    fn quadrants_are_sampled_separately() {
        let colours = sample_regions(&quadrants());

        assert_eq!(colours[0], [200, 0, 0]);
        assert_eq!(colours[1], [0, 200, 0]);
        assert_eq!(colours[2], [0, 0, 200]);
        assert_eq!(colours[3], [100, 100, 100]);
        // The centre square spans pixels 12..37, so 13 columns and rows fall
        // in the first quadrant and 12 in the second
        assert_eq!(colours[4], [77, 73, 73]);
    }

    #[test]
    fn sampling_is_deterministic() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(320, 180, |x, y| {
            Pixel([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        }));

        let first = extract_colours(&image);
        for _ in 0..3 {
            assert_eq!(extract_colours(&image), first);
        }
    }

    #[test]
    fn solid_image_yields_solid_palette() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Pixel([120, 60, 40])));

        let palette = Palette::from_regions(extract_colours(&image));

        assert_eq!(palette.colours, [[120, 60, 40]; 5]);
        assert_eq!(palette.background_1, [12, 6, 4]);
        assert_eq!(palette.background_2, [18, 9, 6]);
        assert_eq!(palette.interactive, [120, 60, 40]);
    }

    #[test]
    fn backgrounds_darken_dominant_colour() {
        let palette = Palette::from_regions([[200, 100, 40], [0; 3], [0; 3], [0; 3], [9, 8, 7]]);

        assert_eq!(palette.background_1, [20, 10, 4]);
        assert_eq!(palette.background_2, [30, 15, 6]);
        assert_eq!(palette.interactive, [9, 8, 7]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(Palette::from_encoded(b"not an image").is_err());
    }
}
