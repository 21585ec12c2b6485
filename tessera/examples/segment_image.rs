//! Example: segment an edge map and recolor the material under a point
//!
//! Reads an edge map and a normal map of the same size, segments them, writes
//! the region document and a false-color preview, then repaints every region
//! the smart grouping puts with the region under `X,Y`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example segment_image -- edges.png normals.png base.png 320,240 out/
//! ```
//!
//! Output:
//! ```text
//! out/
//!   regions.json
//!   regions_preview.png
//!   repainted.png
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use common::SerdeFormat;
use tessera::{
    compute_edge_distances, paint_region, painted_mask, BlendConfig, EngineConfig, Raster,
    RegionCache, RegionColors, Rgb, Segmenter,
};

const PAINT: Rgb = Rgb::new(46, 110, 170);

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [edges_path, normals_path, base_path, point, out_dir] = args.as_slice() else {
        bail!("usage: segment_image <edges.png> <normals.png> <base.png> <x,y> <out_dir>");
    };
    let out_dir = PathBuf::from(out_dir);
    common::log_setup::setup_logging("info", "segment_image", out_dir.join("logs"));

    let (x, y) = parse_point(point)?;
    let (edge_data, width, height) = load_rgb(edges_path)?;
    let (normal_data, ..) = load_rgb(normals_path)?;
    let (base_data, ..) = load_rgb(base_path)?;

    let edges = Raster::rgb(&edge_data, width, height)?;
    let normals = Raster::rgb(&normal_data, width, height)?;
    let base = Raster::rgb(&base_data, width, height)?;

    let config = EngineConfig {
        blend: BlendConfig::refined(),
        ..Default::default()
    };

    let start = Instant::now();
    let segmenter = Segmenter::new(config.segmentation.clone());
    let (set, stats) = segmenter.segment_with_stats("input", &edges, &normals)?;
    tracing::info!(
        "Segmented {}x{} into {} regions ({} edge, {} void pixels) in {:?}",
        width,
        height,
        stats.regions,
        stats.edge_pixels,
        stats.void_pixels,
        start.elapsed()
    );

    std::fs::write(
        out_dir.join("regions.json"),
        set.to_document(SerdeFormat::Json)?,
    )?;

    let cache = RegionCache::new();
    let set = cache.insert("input", set);
    let index = cache
        .ownership("input")
        .context("region set missing from cache")?;

    let mut preview = vec![0u8; width * height * 3];
    for region in set.regions() {
        let color = region.display_color;
        for &pixel in &region.pixel_indices {
            let i = pixel as usize * 3;
            preview[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
        }
    }
    save_rgb(&out_dir.join("regions_preview.png"), preview, width, height)?;

    let Some(seed) = index.owner(x, y) else {
        bail!("pixel ({x}, {y}) is an edge, noise or outside the image");
    };

    let colors = RegionColors::sample(&set, &base, config.segmentation.color_sample_limit)?;
    let group = tessera::smart_group(&set, seed, Some(&colors), &config.smart_group);
    tracing::info!("Region {} groups with {} regions", seed, group.len());

    let painted = painted_mask(&index, group.iter().copied());
    let mut output = base_data.clone();
    for &id in &group {
        let Some(region) = set.region(id) else {
            continue;
        };
        let distances =
            compute_edge_distances(region, &index, &painted, config.blend.edge_fade_radius);
        let pixels = paint_region(
            &set,
            region,
            &base,
            PAINT,
            Some(&normals),
            Some(distances.as_slice()),
            &config.blend,
        )?;
        for (pixel, color) in pixels {
            let i = pixel as usize * 3;
            output[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
        }
    }
    save_rgb(&out_dir.join("repainted.png"), output, width, height)?;

    Ok(())
}

fn parse_point(point: &str) -> anyhow::Result<(i64, i64)> {
    let (x, y) = point
        .split_once(',')
        .with_context(|| format!("expected X,Y but got {point:?}"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn load_rgb(path: impl AsRef<Path>) -> anyhow::Result<(Vec<u8>, usize, usize)> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    Ok((image.into_raw(), width as usize, height as usize))
}

fn save_rgb(path: &Path, data: Vec<u8>, width: usize, height: usize) -> anyhow::Result<()> {
    let image = image::RgbImage::from_raw(width as u32, height as u32, data)
        .context("pixel buffer does not match image size")?;
    image.save(path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
