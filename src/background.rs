//! Optional replacement background shown behind the kept foreground

use crate::config::ResampleFilter;
use crate::raster::scale;
use image::RgbaImage;

/// User-supplied background of arbitrary size
///
/// The cover-scaled version is computed once per canvas size and filter and
/// reused by every frame and by the flattener.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    source: RgbaImage,
    fitted: Option<FittedBackground>,
}

#[derive(Debug, Clone)]
struct FittedBackground {
    filter: ResampleFilter,
    raster: RgbaImage,
}

impl BackgroundImage {
    #[must_use]
    pub fn new(source: RgbaImage) -> Self {
        Self { source, fitted: None }
    }

    /// Cover-scale to the canvas if not already done for these dimensions and filter
    pub fn fit(&mut self, dimensions: (u32, u32), filter: ResampleFilter) -> &RgbaImage {
        let stale = self
            .fitted
            .as_ref()
            .map_or(true, |f| f.raster.dimensions() != dimensions || f.filter != filter);
        if stale {
            tracing::debug!(
                source_width = self.source.width(),
                source_height = self.source.height(),
                width = dimensions.0,
                height = dimensions.1,
                ?filter,
                "Cover-scaling background image"
            );
            self.fitted = Some(FittedBackground {
                filter,
                raster: scale::cover_scale(&self.source, dimensions.0, dimensions.1, filter.into()),
            });
        }
        &self
            .fitted
            .get_or_insert_with(|| FittedBackground {
                filter,
                raster: RgbaImage::new(dimensions.0, dimensions.1),
            })
            .raster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn halves() -> RgbaImage {
        RgbaImage::from_fn(4, 2, |x, _| if x < 2 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) })
    }

    #[test]
    fn test_fit_follows_canvas_dimensions() {
        let mut background = BackgroundImage::new(RgbaImage::from_pixel(30, 10, Rgba([1, 2, 3, 255])));

        let fitted = background.fit((20, 20), ResampleFilter::Nearest);
        assert_eq!(fitted.dimensions(), (20, 20));
        assert_eq!(*fitted.get_pixel(10, 10), Rgba([1, 2, 3, 255]));

        assert_eq!(background.fit((8, 4), ResampleFilter::Nearest).dimensions(), (8, 4));
    }

    #[test]
    fn test_fit_refits_when_filter_changes() {
        let mut background = BackgroundImage::new(halves());

        // Nearest keeps the hard edge, Triangle blends across it
        let nearest = background.fit((8, 4), ResampleFilter::Nearest).clone();
        assert!(nearest.pixels().all(|p| p[1] == 0 && (p[0] == 255 || p[2] == 255)));

        let smooth = background.fit((8, 4), ResampleFilter::Triangle).clone();
        assert_ne!(smooth, nearest);

        assert_eq!(background.fit((8, 4), ResampleFilter::Nearest), &nearest);
    }
}
