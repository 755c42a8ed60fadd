// src/services/render.rs
use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, Rgb, RgbImage};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use reqwest::Client;

use crate::models::PriceComparison;
use crate::services::depreciation::{DepreciationModel, CURVE_SAMPLES};
use crate::BoxError;

pub type Result<T> = std::result::Result<T, BoxError>;

/// 10x2 inches at 120 dpi.
pub const PRICE_FIGURE_SIZE: (u32, u32) = (1200, 240);
pub const DEFAULT_MAX_IMGS: i64 = 4;
pub const GALLERY_TILE_HEIGHT: u32 = 480;
pub const GALLERY_GAP: u32 = 8;

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const FONT: &str = "sans-serif";

/// Draw the depreciation curve with the fair and real cost of one listing, next
/// to two text panels: mileage/price and the amount added or saved.
pub fn plot_price_info(
    path: &Path,
    comparison: &PriceComparison,
    model: &DepreciationModel,
    label: &str,
) -> Result<()> {
    let root = BitMapBackend::new(path, PRICE_FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    let (miles, prices) = model.curve(CURVE_SAMPLES);
    let m = comparison.actual_miles as f64;

    let x_max = (model.reference_miles as f64).max(m) * 1.05;
    let y_values = [0.0, model.reference_price, comparison.fair_price, comparison.actual_price];
    let y_min = y_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let y_max = y_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let y_pad = (y_max - y_min).max(1.0) * 0.05;

    let mut chart = ChartBuilder::on(&panels[0])
        .caption(format!("Cost of {}", label), (FONT, 16))
        .margin(6)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..x_max, (y_min - y_pad)..(y_max + y_pad))?;

    chart.configure_mesh()
        .x_desc("Milage")
        .y_desc("Price")
        .x_labels(4)
        .y_labels(4)
        .draw()?;

    chart.draw_series(LineSeries::new(
        miles.iter().copied().zip(prices.iter().copied()),
        &BLUE,
    ))?;

    chart.draw_series(std::iter::once(Circle::new((m, comparison.fair_price), 4, ORANGE.filled())))?
        .label("fair cost")
        .legend(|(x, y)| Circle::new((x, y), 4, ORANGE.filled()));

    chart.draw_series(std::iter::once(Circle::new((m, comparison.actual_price), 4, RED.filled())))?
        .label("real cost")
        .legend(|(x, y)| Circle::new((x, y), 4, RED.filled()));

    chart.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    draw_centered_text(&panels[1], &comparison.listing_label())?;
    draw_centered_text(&panels[2], &comparison.difference_label())?;

    root.present()?;
    info!("Price figure written to {}", path.display());
    Ok(())
}

fn draw_centered_text(area: &DrawingArea<BitMapBackend, Shift>, text: &str) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let style = TextStyle::from((FONT, 28).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(text.to_string(), ((w / 2) as i32, (h / 2) as i32), style))?;
    Ok(())
}

/// Number of gallery slots for `available` photos under a `max_imgs` cap. A zero
/// or negative cap yields an empty gallery.
pub fn gallery_size(available: usize, max_imgs: i64) -> usize {
    if max_imgs <= 0 {
        0
    } else {
        available.min(max_imgs as usize)
    }
}

/// Download and decode the photos that will make it into the gallery, in order.
pub async fn fetch_images(client: &Client, urls: &[String], max_imgs: i64) -> Result<Vec<DynamicImage>> {
    let n = gallery_size(urls.len(), max_imgs);
    let mut images = Vec::with_capacity(n);

    for url in urls.iter().take(n) {
        info!("Fetching image from URL: {}", url);
        let bytes = client.get(url).send().await?.bytes().await?;
        images.push(image::load_from_memory(&bytes)?);
    }

    Ok(images)
}

/// Lay up to `max_imgs` images side by side, each scaled to the tile height.
pub fn compose_gallery(images: &[DynamicImage], max_imgs: i64) -> Option<RgbImage> {
    let n = gallery_size(images.len(), max_imgs);
    if n == 0 {
        return None;
    }

    let tiles: Vec<RgbImage> = images[..n]
        .iter()
        .map(|img| {
            let rgb = img.to_rgb8();
            let width = (rgb.width() as u64 * GALLERY_TILE_HEIGHT as u64 / rgb.height().max(1) as u64).max(1);
            imageops::resize(&rgb, width as u32, GALLERY_TILE_HEIGHT, imageops::FilterType::Triangle)
        })
        .collect();

    let width = tiles.iter().map(|t| t.width()).sum::<u32>() + GALLERY_GAP * (n as u32 - 1);
    let mut canvas = RgbImage::from_pixel(width, GALLERY_TILE_HEIGHT, Rgb([255, 255, 255]));

    let mut x = 0i64;
    for tile in &tiles {
        imageops::overlay(&mut canvas, tile, x, 0);
        x += (tile.width() + GALLERY_GAP) as i64;
    }

    Some(canvas)
}

/// Write the gallery to `path`. Returns `None` when there was nothing to show.
pub fn image_gallery(path: &Path, images: &[DynamicImage], max_imgs: i64) -> Result<Option<PathBuf>> {
    match compose_gallery(images, max_imgs) {
        Some(canvas) => {
            canvas.save(path)?;
            info!("Gallery of {} images written to {}", gallery_size(images.len(), max_imgs), path.display());
            Ok(Some(path.to_path_buf()))
        }
        None => {
            warn!("No images to show, skipping gallery");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_gallery_size() {
        assert_eq!(gallery_size(6, 4), 4);
        assert_eq!(gallery_size(2, 4), 2);
        assert_eq!(gallery_size(0, 4), 0);
        assert_eq!(gallery_size(5, 0), 0);
        assert_eq!(gallery_size(5, -2), 0);
    }

    #[test]
    fn test_compose_caps_and_keeps_order() {
        let images = vec![
            solid(100, 100, [255, 0, 0]),
            solid(200, 100, [0, 255, 0]),
            solid(50, 100, [0, 0, 255]),
        ];
        let canvas = compose_gallery(&images, 2).unwrap();

        // 480x480 red tile, then a 960x480 green tile
        assert_eq!(canvas.height(), GALLERY_TILE_HEIGHT);
        assert_eq!(canvas.width(), 480 + GALLERY_GAP + 960);
        assert_eq!(canvas.get_pixel(10, 10), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(480 + GALLERY_GAP + 10, 10), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_compose_cap_above_available() {
        let images = vec![solid(64, 64, [10, 20, 30])];
        let canvas = compose_gallery(&images, 4).unwrap();
        assert_eq!(canvas.width(), GALLERY_TILE_HEIGHT);
    }

    #[test]
    fn test_compose_empty() {
        assert!(compose_gallery(&[], 4).is_none());
        assert!(compose_gallery(&[solid(8, 8, [0, 0, 0])], 0).is_none());
    }
}
