//! Integration tests for page geometry and rotation math.

use vellum_common::{Point, Rect};
use vellum_page::{PageGeometry, Rotation, resolve_paper_color};

#[test]
fn test_rotation_composition_table() {
    use Rotation::{Rotate0, Rotate90, Rotate180, Rotate270};
    assert_eq!(Rotate0.compose(Rotate0), Rotate0);
    assert_eq!(Rotate90.compose(Rotate90), Rotate180);
    assert_eq!(Rotate180.compose(Rotate270), Rotate90);
    assert_eq!(Rotate270.compose(Rotate90), Rotate0);
}

#[test]
fn test_rotation_axis_swap_parity() {
    assert!(!Rotation::Rotate0.swaps_axes());
    assert!(Rotation::Rotate90.swaps_axes());
    assert!(!Rotation::Rotate180.swaps_axes());
    assert!(Rotation::Rotate270.swaps_axes());
}

#[test]
fn test_update_size_at_native_resolution() {
    let mut geo = PageGeometry::new(100.0, 200.0);
    geo.update_size(72.0, 72.0, 1.0);
    assert_eq!(geo.width, 100);
    assert_eq!(geo.height, 200);
}

#[test]
fn test_update_size_applies_zoom_and_dpi() {
    let mut geo = PageGeometry::new(100.0, 200.0);
    geo.update_size(144.0, 72.0, 2.0);
    // width doubles once for dpi and once for zoom; height only for zoom
    assert_eq!(geo.width, 400);
    assert_eq!(geo.height, 400);
}

#[test]
fn test_update_size_swaps_for_odd_rotation() {
    let mut geo = PageGeometry::new(100.0, 200.0);
    geo.computed_rotation = Rotation::Rotate90;
    geo.update_size(72.0, 72.0, 1.0);
    assert_eq!(geo.width, 200);
    assert_eq!(geo.height, 100);
}

#[test]
fn test_update_size_is_idempotent() {
    let mut geo = PageGeometry::new(300.0, 100.0);
    geo.scale_x = 1.5;
    geo.update_size(96.0, 96.0, 1.25);
    let first = geo.rect();
    geo.update_size(96.0, 96.0, 1.25);
    assert_eq!(geo.rect(), first);
}

#[test]
fn test_default_size_respects_scale_and_rotation() {
    let mut geo = PageGeometry::new(100.0, 200.0);
    geo.scale_x = 2.0;
    let (w, h) = geo.default_size();
    assert!((w - 200.0).abs() < f32::EPSILON);
    assert!((h - 200.0).abs() < f32::EPSILON);

    geo.computed_rotation = Rotation::Rotate270;
    let (w, h) = geo.default_size();
    assert!((w - 200.0).abs() < f32::EPSILON);
    assert!((h - 200.0).abs() < f32::EPSILON);

    geo.scale_x = 1.0;
    let (w, h) = geo.default_size();
    assert!((w - 200.0).abs() < f32::EPSILON);
    assert!((h - 100.0).abs() < f32::EPSILON);
}

#[test]
fn test_geometry_rect_accessors() {
    let mut geo = PageGeometry::new(100.0, 100.0);
    geo.set_geometry(Rect::new(10, 20, 30, 40));
    assert_eq!(geo.rect(), Rect::new(10, 20, 30, 40));
    assert_eq!(geo.pos(), Point::new(10, 20));
    geo.set_pos(Point::new(-5, 0));
    assert_eq!(geo.rect(), Rect::new(-5, 0, 30, 40));
}

#[test]
fn test_paper_color_resolution_chain() {
    use vellum_common::Color;
    let page = Some(Color::rgb(1, 2, 3));
    let renderer = Some(Color::rgb(9, 9, 9));
    assert_eq!(resolve_paper_color(page, renderer), Color::rgb(1, 2, 3));
    assert_eq!(resolve_paper_color(None, renderer), Color::rgb(9, 9, 9));
    assert_eq!(resolve_paper_color(None, None), Color::WHITE);
}
