#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_equality() {
    assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    assert_ne!(Point::new(1.0, 2.0), Point::new(1.0, 3.0));
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

// --- screen_to_world / world_to_screen ---

#[test]
fn screen_to_world_identity() {
    let cam = Camera::default();
    let world = cam.screen_to_world(Point::new(50.0, 75.0));
    assert!(point_approx_eq(world, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_subtracts_pan_then_divides_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 40.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(300.0, 240.0));
    assert!(point_approx_eq(world, Point::new(100.0, 100.0)));
}

#[test]
fn world_to_screen_scales_then_adds_pan() {
    let cam = Camera { pan_x: 100.0, pan_y: 40.0, zoom: 2.0 };
    let screen = cam.world_to_screen(Point::new(100.0, 100.0));
    assert!(point_approx_eq(screen, Point::new(300.0, 240.0)));
}

#[test]
fn round_trip_identity_across_zoom_range() {
    let pans = [(0.0, 0.0), (-350.5, 120.25), (1e4, -2e3)];
    let points = [Point::new(0.0, 0.0), Point::new(13.7, -42.1), Point::new(1920.0, 1080.0)];
    let mut zoom = 0.25;
    while zoom <= 4.0 {
        for (px, py) in pans {
            let cam = Camera { pan_x: px, pan_y: py, zoom };
            for p in points {
                let back = cam.world_to_screen(cam.screen_to_world(p));
                assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6, "zoom {zoom} pan ({px},{py})");
            }
        }
        zoom += 0.25;
    }
}

#[test]
fn screen_dist_to_world_divides_by_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

// --- zoom ---

#[test]
fn set_zoom_clamps_to_range() {
    let mut cam = Camera::default();
    cam.set_zoom(10.0);
    assert_eq!(cam.zoom, 4.0);
    cam.set_zoom(0.01);
    assert_eq!(cam.zoom, 0.25);
    cam.set_zoom(1.5);
    assert_eq!(cam.zoom, 1.5);
}

#[test]
fn zoom_at_keeps_cursor_point_fixed() {
    let mut cam = Camera { pan_x: 37.0, pan_y: -12.0, zoom: 1.3 };
    let cursor = Point::new(410.0, 275.0);
    let before = cam.screen_to_world(cursor);
    cam.zoom_at(cursor, 2.7);
    let after = cam.screen_to_world(cursor);
    assert!(point_approx_eq(before, after));
    assert!(approx_eq(cam.zoom, 2.7));
}

#[test]
fn zoom_at_clamped_still_keeps_cursor_point_fixed() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 5.0, zoom: 3.5 };
    let cursor = Point::new(200.0, 100.0);
    let before = cam.screen_to_world(cursor);
    cam.zoom_at(cursor, 50.0);
    assert_eq!(cam.zoom, 4.0);
    assert!(point_approx_eq(before, cam.screen_to_world(cursor)));
}

#[test]
fn zoom_by_multiplies() {
    let mut cam = Camera::default();
    cam.zoom_by(2.0, Point::new(0.0, 0.0));
    assert!(approx_eq(cam.zoom, 2.0));
    // Anchor at origin with zero pan keeps pan at zero.
    assert!(approx_eq(cam.pan_x, 0.0));
}

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(2.5, 1.0);
    assert!(approx_eq(cam.pan_x, 12.5));
    assert!(approx_eq(cam.pan_y, -4.0));
}

#[test]
fn reset_restores_identity() {
    let mut cam = Camera { pan_x: 9.0, pan_y: 9.0, zoom: 3.0 };
    cam.reset();
    assert_eq!(cam, Camera::default());
}
