//! Tests for pixel windows

extern crate std;

use crate::raster::window::Window;

#[test]
fn bounds_and_offsets() {
    let window = Window::new(2, 3, 4, 5);
    std::assert_eq!(window.end_col(), 6);
    std::assert_eq!(window.end_row(), 8);
    std::assert_eq!(window.len(), 20);
    std::assert!(window.contains(3, 2));
    std::assert!(!window.contains(8, 2));
    std::assert_eq!(window.offset_of(4, 3), Some(5));
    std::assert_eq!(window.offset_of(0, 0), None);
}

#[test]
fn intersection_clips() {
    let a = Window::new(0, 0, 10, 10);
    let b = Window::new(8, 5, 10, 10);
    std::assert_eq!(a.intersection(&b), Some(Window::new(8, 5, 2, 5)));
    std::assert_eq!(a.intersection(&Window::new(10, 0, 2, 2)), None);
}
