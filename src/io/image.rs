//! Heightmap acquisition from raster images.
//!
//! The steps mirror a simple tactile-graphics workflow:
//!
//! 1. [`crop_center`]: scale the image to cover a target frame and cut out
//!    the centered window
//! 2. [`to_depth`]: grayscale conversion; brightness stands in for depth,
//!    no depth estimation happens
//! 3. [`smooth`]: Gaussian blur to soften pixel noise before meshing
//! 4. [`heightmap_from_luma`]: map `0..=255` onto `[0, 1]`
//!
//! [`load_heightmap`] chains them for a file on disk.

use std::path::Path;

use ::image::imageops::{self, FilterType};
use ::image::{DynamicImage, GrayImage};

use crate::error::{ReliefError, Result};
use crate::mesh::Heightmap;

use super::ensure_parent_dir;

/// Blur radius applied by the plain "smooth" depth map.
pub const DEFAULT_SMOOTH_RADIUS: f32 = 5.0;

/// Options for turning an image into a heightmap.
#[derive(Debug, Clone, Default)]
pub struct AcquireOptions {
    /// Target frame `(width, height)`; `None` keeps the source size.
    pub size: Option<(u32, u32)>,

    /// Gaussian blur radius; 0 disables smoothing.
    pub blur_radius: f32,
}

impl AcquireOptions {
    /// Crop and resize to `width x height`.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Smooth with the given blur radius.
    pub fn with_blur(mut self, radius: f32) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some((w, h)) = self.size {
            if w < 2 || h < 2 {
                return Err(ReliefError::invalid_param(
                    "size",
                    format!("{}x{}", w, h),
                    "both dimensions must be at least 2",
                ));
            }
        }
        check_blur_radius(self.blur_radius)
    }
}

/// Open and decode an image file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = ::image::open(path).map_err(|e| ReliefError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::debug!("Opened image: {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Scale `img` to cover `width x height`, then crop the centered window.
///
/// Scaling preserves the aspect ratio and uses a Lanczos filter. The result
/// is exactly `width x height`.
pub fn crop_center(img: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(ReliefError::invalid_param(
            "size",
            format!("{}x{}", width, height),
            "crop dimensions must be non-zero",
        ));
    }
    let (src_w, src_h) = (img.width(), img.height());
    if src_w == 0 || src_h == 0 {
        return Err(ReliefError::InvalidHeightmap("source image is empty".to_string()));
    }

    let scale = f64::max(
        width as f64 / src_w as f64,
        height as f64 / src_h as f64,
    );
    let scaled_w = ((src_w as f64 * scale).round() as u32).max(width);
    let scaled_h = ((src_h as f64 * scale).round() as u32).max(height);

    let resized = img.resize_exact(scaled_w, scaled_h, FilterType::Lanczos3);
    let left = (scaled_w - width) / 2;
    let top = (scaled_h - height) / 2;
    Ok(resized.crop_imm(left, top, width, height))
}

/// Grayscale "depth" map of `img`.
pub fn to_depth(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Gaussian blur with the given radius; a radius of 0 returns a copy.
///
/// Fails with [`ReliefError::InvalidParameter`] for a negative or
/// non-finite radius.
pub fn smooth(gray: &GrayImage, radius: f32) -> Result<GrayImage> {
    check_blur_radius(radius)?;
    if radius == 0.0 {
        return Ok(gray.clone());
    }
    Ok(imageops::blur(gray, radius))
}

fn check_blur_radius(radius: f32) -> Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(ReliefError::invalid_param(
            "blur_radius",
            radius,
            "must be a finite value of at least 0",
        ));
    }
    Ok(())
}

/// Blur radius for a "super smooth" strength, clamped to `[2, 100]`.
pub fn supersmooth_radius(strength: u32) -> f32 {
    strength.clamp(2, 100) as f32 / 10.0
}

/// Heightmap with each pixel's luma scaled into `[0, 1]`.
pub fn heightmap_from_luma(gray: &GrayImage) -> Result<Heightmap> {
    let values = gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect();
    Heightmap::new(gray.width() as usize, gray.height() as usize, values)
}

/// Decode, crop, convert, and smooth an image into a heightmap.
///
/// # Example
///
/// ```no_run
/// use relief::io::image::{load_heightmap, AcquireOptions};
///
/// let map = load_heightmap("photo.png", &AcquireOptions::default().with_size(200, 200)).unwrap();
/// assert_eq!(map.width(), 200);
/// ```
pub fn load_heightmap<P: AsRef<Path>>(path: P, options: &AcquireOptions) -> Result<Heightmap> {
    options.validate()?;
    let img = open(path)?;
    heightmap_from_image(&img, options)
}

/// Run the acquisition steps on an already decoded image.
pub fn heightmap_from_image(img: &DynamicImage, options: &AcquireOptions) -> Result<Heightmap> {
    options.validate()?;
    let framed = match options.size {
        Some((w, h)) => crop_center(img, w, h)?,
        None => img.clone(),
    };
    let depth = smooth(&to_depth(&framed), options.blur_radius)?;
    heightmap_from_luma(&depth)
}

/// Save an image, creating parent directories as needed.
pub fn save_image<P: AsRef<Path>>(img: &DynamicImage, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    img.save(path).map_err(|e| ReliefError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("Image saved to: {}", path.display());
    Ok(())
}

/// Save a grayscale image, creating parent directories as needed.
pub fn save_gray<P: AsRef<Path>>(gray: &GrayImage, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    gray.save(path).map_err(|e| ReliefError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("Depth map saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_util::temp_path;
    use ::image::{Luma, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
            let v = (x * 255 / (width - 1)) as u8;
            Rgb([v, v, v])
        }))
    }

    #[test]
    fn test_crop_center_dimensions() {
        for (w, h) in [(200, 100), (100, 200), (64, 64), (30, 10)] {
            let out = crop_center(&gradient(w, h), 50, 40).unwrap();
            assert_eq!((out.width(), out.height()), (50, 40), "source {}x{}", w, h);
        }
    }

    #[test]
    fn test_crop_center_keeps_middle() {
        // A wide image loses its left and right edges.
        let img = gradient(300, 100);
        let out = to_depth(&crop_center(&img, 100, 100).unwrap());
        let left = out.get_pixel(0, 50).0[0];
        let right = out.get_pixel(99, 50).0[0];
        assert!(left > 40 && left < 110, "left edge luma {}", left);
        assert!(right > 145 && right < 215, "right edge luma {}", right);
    }

    #[test]
    fn test_crop_rejects_zero_size() {
        assert!(crop_center(&gradient(10, 10), 0, 5).is_err());
    }

    #[test]
    fn test_heightmap_from_luma_normalizes() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([if (x + y) % 2 == 0 { 0 } else { 255 }]));
        let map = heightmap_from_luma(&gray).unwrap();
        assert_eq!((map.width(), map.height()), (3, 2));
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(1, 0), 1.0);
        assert_eq!(map.get(1, 1), 0.0);
    }

    #[test]
    fn test_single_row_image_rejected() {
        let gray = GrayImage::new(8, 1);
        assert!(heightmap_from_luma(&gray).unwrap_err().is_invalid_heightmap());
    }

    #[test]
    fn test_smooth_softens_spike() {
        let mut gray = GrayImage::new(21, 21);
        gray.put_pixel(10, 10, Luma([255]));
        let blurred = smooth(&gray, 2.0).unwrap();
        assert_eq!(blurred.dimensions(), (21, 21));
        assert!(blurred.get_pixel(10, 10).0[0] < 255);
        assert!(blurred.get_pixel(11, 10).0[0] > 0);
        assert_eq!(smooth(&gray, 0.0).unwrap(), gray);
    }

    #[test]
    fn test_smooth_rejects_bad_radius() {
        let gray = GrayImage::new(8, 8);
        for radius in [-3.0, f32::NAN, f32::INFINITY] {
            let err = smooth(&gray, radius).unwrap_err();
            assert!(
                matches!(err, ReliefError::InvalidParameter { name: "blur_radius", .. }),
                "radius {} accepted",
                radius
            );
        }
    }

    #[test]
    fn test_supersmooth_radius_clamps() {
        assert_eq!(supersmooth_radius(0), 0.2);
        assert_eq!(supersmooth_radius(50), 5.0);
        assert_eq!(supersmooth_radius(500), 10.0);
    }

    #[test]
    fn test_options_validation() {
        assert!(AcquireOptions::default().validate().is_ok());
        assert!(AcquireOptions::default().with_size(1, 10).validate().is_err());
        assert!(AcquireOptions::default().with_blur(-1.0).validate().is_err());
    }

    #[test]
    fn test_load_heightmap_from_png() {
        let path = temp_path("images/gradient.png");
        save_image(&gradient(40, 20), &path).unwrap();

        let options = AcquireOptions::default().with_size(16, 16).with_blur(1.0);
        let map = load_heightmap(&path, &options).unwrap();
        assert_eq!((map.width(), map.height()), (16, 16));
        assert!(map.get(0, 8) < map.get(15, 8));
    }

    #[test]
    fn test_missing_image() {
        let err = load_heightmap(temp_path("images/missing.png"), &AcquireOptions::default())
            .unwrap_err();
        assert!(matches!(err, ReliefError::LoadError { .. }));
    }
}
