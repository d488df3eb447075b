//! Integration tests for the software raster surface and painter.

use image::RgbaImage;
use vellum_common::{Color, Point, Rect, Size, Surface};

#[test]
fn test_surface_allocates_device_pixels() {
    let surface = Surface::new(Size::new(30, 40), 2.0);
    assert_eq!(surface.device_width(), 60);
    assert_eq!(surface.device_height(), 80);
    assert!((surface.pixel_ratio() - 2.0).abs() < f32::EPSILON);
}

#[test]
fn test_fill_rect_writes_inside_only() {
    let mut surface = Surface::new(Size::new(10, 10), 1.0);
    {
        let mut painter = surface.painter();
        painter.fill_rect(Rect::new(2, 2, 4, 4), Color::rgb(255, 0, 0));
    }
    let image = surface.into_image();
    assert_eq!(image.get_pixel(3, 3)[0], 255);
    assert_eq!(image.get_pixel(0, 0)[3], 0);
    assert_eq!(image.get_pixel(6, 6)[3], 0);
}

#[test]
fn test_fill_rect_respects_pixel_ratio() {
    let mut surface = Surface::new(Size::new(10, 10), 2.0);
    {
        let mut painter = surface.painter();
        painter.fill_rect(Rect::new(1, 1, 2, 2), Color::BLACK);
    }
    let image = surface.into_image();
    // Logical (1,1)-(3,3) maps to device (2,2)-(6,6).
    assert_eq!(image.get_pixel(2, 2)[3], 255);
    assert_eq!(image.get_pixel(5, 5)[3], 255);
    assert_eq!(image.get_pixel(1, 1)[3], 0);
    assert_eq!(image.get_pixel(6, 6)[3], 0);
}

#[test]
fn test_translate_shifts_drawing() {
    let mut surface = Surface::new(Size::new(10, 10), 1.0);
    {
        let mut painter = surface.painter();
        painter.translate(Point::new(5, 5));
        painter.fill_rect(Rect::new(0, 0, 2, 2), Color::BLACK);
    }
    let image = surface.into_image();
    assert_eq!(image.get_pixel(5, 5)[3], 255);
    assert_eq!(image.get_pixel(0, 0)[3], 0);
}

#[test]
fn test_draw_image_opaque_overwrites() {
    let mut surface = Surface::new(Size::new(4, 4), 1.0);
    {
        let mut painter = surface.painter();
        painter.fill_rect(Rect::new(0, 0, 4, 4), Color::rgb(0, 0, 255));
        let tile = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        painter.draw_image(Point::new(1, 1), &tile);
    }
    let image = surface.into_image();
    assert_eq!(image.get_pixel(1, 1)[0], 255);
    assert_eq!(image.get_pixel(0, 0)[2], 255);
}

#[test]
fn test_draw_image_transparent_pixels_skipped() {
    let mut surface = Surface::new(Size::new(4, 4), 1.0);
    {
        let mut painter = surface.painter();
        painter.fill_rect(Rect::new(0, 0, 4, 4), Color::rgb(0, 255, 0));
        let tile = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 0]));
        painter.draw_image(Point::new(0, 0), &tile);
    }
    let image = surface.into_image();
    assert_eq!(image.get_pixel(0, 0)[1], 255);
}

#[test]
fn test_draw_image_clips_out_of_bounds() {
    let mut surface = Surface::new(Size::new(4, 4), 1.0);
    {
        let mut painter = surface.painter();
        let tile = RgbaImage::from_pixel(3, 3, image::Rgba([255, 0, 0, 255]));
        painter.draw_image(Point::new(-2, -2), &tile);
    }
    let image = surface.into_image();
    assert_eq!(image.get_pixel(0, 0)[0], 255);
    assert_eq!(image.get_pixel(1, 1)[3], 0);
}

#[test]
fn test_empty_fill_is_noop() {
    let mut surface = Surface::new(Size::new(4, 4), 1.0);
    {
        let mut painter = surface.painter();
        painter.fill_rect(Rect::new(1, 1, 0, 5), Color::BLACK);
    }
    let image = surface.into_image();
    assert!(image.pixels().all(|p| p[3] == 0));
}

#[test]
fn test_save_roundtrips_through_png() {
    let mut surface = Surface::new(Size::new(2, 2), 1.0);
    {
        let mut painter = surface.painter();
        painter.fill_rect(Rect::new(0, 0, 2, 2), Color::rgb(10, 20, 30));
    }
    let path = std::env::temp_dir().join("vellum_surface_save.png");
    surface.save(&path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(reloaded.get_pixel(1, 1), &image::Rgba([10, 20, 30, 255]));
}

#[test]
fn test_save_reports_unwritable_path() {
    let surface = Surface::new(Size::new(2, 2), 1.0);
    let path = std::path::Path::new("/nonexistent/vellum_surface_save.png");
    assert!(surface.save(path).is_err());
}
