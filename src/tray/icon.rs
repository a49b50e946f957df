//! Tray icon image

use anyhow::{Context, Result};
use image::GenericImageView;
use std::path::PathBuf;
use tracing::debug;
use tray_icon::Icon;

const ICON_ASSET: &str = "assets/icons/tray/widget.png";
const FALLBACK_SIZE: u32 = 32;

/// Load the tray icon, drawing a plain one if the asset is missing
pub fn load_tray_icon() -> Result<Icon> {
    match load_icon_from_file(ICON_ASSET) {
        Ok(icon) => Ok(icon),
        Err(e) => {
            debug!("Using built-in tray icon: {:#}", e);
            fallback_icon()
        }
    }
}

/// Get asset path relative to executable
///
/// Searches in order:
/// 1. Executable directory (production/MSIX)
/// 2. Current working directory (development)
fn get_asset_path(relative_path: &str) -> Result<PathBuf> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let path = exe_dir.join(relative_path);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    let cwd_path = std::env::current_dir()
        .context("Failed to get current directory")?
        .join(relative_path);

    if cwd_path.exists() {
        return Ok(cwd_path);
    }

    anyhow::bail!(
        "Asset not found: {} (searched in exe dir and current dir)",
        relative_path
    )
}

/// Load icon from PNG file
fn load_icon_from_file(path: &str) -> Result<Icon> {
    let full_path = get_asset_path(path)?;
    let img = image::open(&full_path)
        .with_context(|| format!("Failed to load icon: {:?}", full_path))?;
    let (width, height) = img.dimensions();
    let rgba = img.into_rgba8().into_raw();
    Ok(Icon::from_rgba(rgba, width, height)?)
}

/// Filled disc on a transparent background
fn fallback_icon() -> Result<Icon> {
    let size = FALLBACK_SIZE;
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;

    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let inside = (dx * dx + dy * dy).sqrt() <= radius;
            let alpha = if inside { 255 } else { 0 };
            rgba.extend_from_slice(&[0x3a, 0x86, 0xd4, alpha]);
        }
    }

    Ok(Icon::from_rgba(rgba, size, size)?)
}
