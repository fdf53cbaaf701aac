use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use ndarray::{Array2, Axis};

/// Inclusive pixel bounds of every visible pixel.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BoundingBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    /// Integer midpoint of the box.
    pub fn center(&self) -> (u32, u32) {
        ((self.x_min + self.x_max) / 2, (self.y_min + self.y_max) / 2)
    }
}

/// Boolean visibility grid indexed `[row, col]`.
#[derive(Clone, Debug)]
pub struct OpacityMask {
    visible: Array2<bool>,
}

impl OpacityMask {
    /// Pixels whose opacity is strictly greater than `threshold` are visible.
    pub fn from_rgba(image: &RgbaImage, threshold: u8) -> Self {
        let (width, height) = image.dimensions();
        let visible = Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
            image.get_pixel(col as u32, row as u32).0[3] > threshold
        });
        Self { visible }
    }

    /// Returns None when the image carries no opacity channel.
    pub fn from_dynamic(image: &DynamicImage, threshold: u8) -> Option<Self> {
        if !image.color().has_alpha() {
            return None;
        }
        Some(Self::from_rgba(&image.to_rgba8(), threshold))
    }

    pub fn width(&self) -> u32 {
        self.visible.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.visible.nrows() as u32
    }

    pub fn is_empty(&self) -> bool {
        !self.visible.iter().any(|&v| v)
    }

    /// Tight bounds via row and column projections.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let rows: Vec<bool> = self
            .visible
            .axis_iter(Axis(0))
            .map(|row| row.iter().any(|&v| v))
            .collect();
        let cols: Vec<bool> = self
            .visible
            .axis_iter(Axis(1))
            .map(|col| col.iter().any(|&v| v))
            .collect();

        let y_min = rows.iter().position(|&v| v)?;
        let y_max = rows.iter().rposition(|&v| v)?;
        let x_min = cols.iter().position(|&v| v)?;
        let x_max = cols.iter().rposition(|&v| v)?;

        Some(BoundingBox {
            x_min: x_min as u32,
            y_min: y_min as u32,
            x_max: x_max as u32,
            y_max: y_max as u32,
        })
    }

    /// 0/255 grayscale rendition of the mask.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            if self.visible[[y as usize, x as usize]] {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn bounding_box_of_rectangle() {
        let mut img = RgbaImage::new(20, 10);
        for y in 2..5 {
            for x in 3..9 {
                img.put_pixel(x, y, Rgba([10, 20, 30, 1]));
            }
        }
        let mask = OpacityMask::from_rgba(&img, 0);
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(
            bbox,
            BoundingBox { x_min: 3, y_min: 2, x_max: 8, y_max: 4 }
        );
        assert_eq!(bbox.width(), 6);
        assert_eq!(bbox.height(), 3);
        assert_eq!(bbox.center(), (5, 3));
    }

    #[test]
    fn projection_spans_disjoint_blobs() {
        let mut img = RgbaImage::new(30, 30);
        img.put_pixel(1, 20, Rgba([0, 0, 0, 255]));
        img.put_pixel(25, 4, Rgba([0, 0, 0, 255]));
        let bbox = OpacityMask::from_rgba(&img, 0).bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox { x_min: 1, y_min: 4, x_max: 25, y_max: 20 });
    }

    #[test]
    fn transparent_image_has_no_box() {
        let img = RgbaImage::new(8, 8);
        let mask = OpacityMask::from_rgba(&img, 0);
        assert!(mask.is_empty());
        assert!(mask.bounding_box().is_none());
    }

    #[test]
    fn threshold_is_exclusive() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 20]));
        assert!(OpacityMask::from_rgba(&img, 20).is_empty());
        assert!(!OpacityMask::from_rgba(&img, 19).is_empty());
    }

    #[test]
    fn rgb_image_has_no_mask() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
        assert!(OpacityMask::from_dynamic(&img, 0).is_none());
    }
}
