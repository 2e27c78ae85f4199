use super::*;
use crate::foundation::core::Point;

const HD: Canvas = Canvas {
    width: 1920,
    height: 1080,
};

#[test]
fn percent_mode_quarter_rect() {
    let rect = Rect::from_origin_size(Point::new(960.0, 540.0), Size::new(960.0, 540.0));
    let mapped = map_rect(rect, HD, ScaleMode::Percent).unwrap();
    assert_eq!(
        mapped,
        ScreenRect {
            x: 50.0,
            y: 50.0,
            width: 50.0,
            height: 50.0,
            unit: LengthUnit::Percent,
        }
    );
}

#[test]
fn pixel_mode_multiplies_by_scale() {
    let rect = Rect::from_origin_size(Point::new(100.0, 40.0), Size::new(300.0, 200.0));
    let mapped = map_rect(rect, HD, ScaleMode::Pixel { scale: 0.5 }).unwrap();
    assert_eq!((mapped.x, mapped.y), (50.0, 20.0));
    assert_eq!((mapped.width, mapped.height), (150.0, 100.0));
    assert_eq!(mapped.unit, LengthUnit::Px);
}

#[test]
fn font_sizes_map_to_px_or_vh() {
    let vh = map_font_size(54.0, HD, ScaleMode::Percent).unwrap();
    assert_eq!(vh.unit, LengthUnit::Vh);
    approx::assert_relative_eq!(vh.value, 5.0);

    let half = map_font_size(540.0, HD, ScaleMode::Percent).unwrap();
    assert_eq!(half.css(), "50vh");

    let px = map_font_size(24.0, HD, ScaleMode::Pixel { scale: 2.0 }).unwrap();
    assert_eq!(px.css(), "48px");
}

#[test]
fn zero_canvas_is_a_domain_error() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    for canvas in [
        Canvas { width: 0, height: 1080 },
        Canvas { width: 1920, height: 0 },
    ] {
        assert!(matches!(
            map_rect(rect, canvas, ScaleMode::Percent).unwrap_err(),
            SignageError::Domain(_)
        ));
        assert!(map_font_size(10.0, canvas, ScaleMode::Percent).is_err());
    }
}

#[test]
fn invalid_pixel_scale_is_rejected() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(map_rect(rect, HD, ScaleMode::Pixel { scale }).is_err());
    }
}

#[test]
fn mapping_is_pure() {
    let rect = Rect::new(12.0, 34.0, 56.0, 78.0);
    let a = map_rect(rect, HD, ScaleMode::Percent).unwrap();
    let b = map_rect(rect, HD, ScaleMode::Percent).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fit_scale_letterboxes() {
    approx::assert_relative_eq!(fit_scale(HD, Size::new(960.0, 1000.0)).unwrap(), 0.5);
    approx::assert_relative_eq!(fit_scale(HD, Size::new(4000.0, 540.0)).unwrap(), 0.5);
    assert!(fit_scale(HD, Size::new(0.0, 10.0)).is_err());
}
