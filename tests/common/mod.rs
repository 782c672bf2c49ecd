//! Shared fixtures for integration tests

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use imgly_mask_editor::{EditSession, EditorConfig, MemorySink};
use std::io::Cursor;

pub const PHOTO: Rgba<u8> = Rgba([70, 130, 180, 255]);

/// Encode an RGBA image as PNG bytes
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("PNG encoding of fixture failed");
    buffer
}

/// Smooth gradient so every pixel is distinguishable
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128, 255])
    })
}

/// Cutout of `image`: opaque left third, soft middle third, removed right third
///
/// Removed pixels are fully zeroed, the way segmentation output stores them.
pub fn banded_cutout(image: &RgbaImage) -> RgbaImage {
    let third = image.width() / 3;
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        if x < third {
            Rgba([p[0], p[1], p[2], 255])
        } else if x < 2 * third {
            Rgba([p[0], p[1], p[2], 100])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Session over an all-opaque `size` x `size` cutout, plus a handle on its sink
pub fn opaque_session(size: u32) -> (EditSession, MemorySink) {
    let image = RgbaImage::from_pixel(size, size, PHOTO);
    session_with(&image, &image)
}

/// Session initialized through the byte-level API
pub fn session_with(original: &RgbaImage, cutout: &RgbaImage) -> (EditSession, MemorySink) {
    let sink = MemorySink::new();
    let mut session = EditSession::new(EditorConfig::default(), Box::new(sink.clone()));
    session
        .init_session(&png_bytes(original), &png_bytes(cutout))
        .expect("fixture session failed to initialize");
    (session, sink)
}

/// Press, drag through `points`, release
pub fn drag(session: &mut EditSession, points: &[(f32, f32)]) {
    let Some((&(x, y), rest)) = points.split_first() else {
        return;
    };
    session.pointer_down(x, y);
    for &(x, y) in rest {
        session.pointer_move(x, y);
    }
    session.pointer_up();
}

/// Mask alpha, panicking when the session has no mask
pub fn mask_alpha(session: &EditSession, x: u32, y: u32) -> u8 {
    session.mask().expect("session has no mask").alpha_at(x, y)
}
