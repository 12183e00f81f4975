use super::*;

fn px(buf: &PixelBuffer, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * buf.width + x) * 4) as usize;
    [buf.data[i], buf.data[i + 1], buf.data[i + 2], buf.data[i + 3]]
}

fn is_red(p: [u8; 4]) -> bool {
    p[0] > 200 && p[1] < 50 && p[2] < 50 && p[3] > 200
}

fn is_blue(p: [u8; 4]) -> bool {
    p[0] < 50 && p[1] < 50 && p[2] > 200 && p[3] > 200
}

fn renderer_with(image: &str, decoded: DecodedImage) -> CpuRenderer {
    let mut r = CpuRenderer::default();
    r.register_image(&ImageRef::new(image), &decoded).unwrap();
    r
}

#[test]
fn draws_registered_image_into_dest_rect() {
    let red = DecodedImage::solid(2, 2, [255, 0, 0, 255]).unwrap();
    let mut r = renderer_with("red", red);
    r.resize_surface(8, 8).unwrap();
    r.clear();
    r.draw_image(&ImageRef::new("red"), Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap();

    let out = r.read_pixels().unwrap();
    assert_eq!((out.width, out.height), (8, 8));
    assert!(is_red(px(&out, 1, 1)));
    assert!(is_red(px(&out, 3, 3)));
    assert_eq!(px(&out, 6, 6), [0, 0, 0, 0]);
}

#[test]
fn translate_and_scale_move_the_draw() {
    let red = DecodedImage::solid(1, 1, [255, 0, 0, 255]).unwrap();
    let mut r = renderer_with("red", red);
    r.resize_surface(8, 8).unwrap();
    r.save();
    r.translate(Vec2::new(4.0, 4.0));
    r.scale(2.0, 2.0);
    r.draw_image(&ImageRef::new("red"), Rect::new(0.0, 0.0, 1.0, 1.0))
        .unwrap();
    r.restore();

    let out = r.read_pixels().unwrap();
    assert_eq!(px(&out, 1, 1), [0, 0, 0, 0]);
    assert!(is_red(px(&out, 5, 5)));
    assert_eq!(r.transform(), Affine::IDENTITY);
}

#[test]
fn horizontal_mirror_swaps_columns() {
    let two = DecodedImage::from_straight_rgba8(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut r = renderer_with("two", two);
    r.resize_surface(2, 1).unwrap();
    r.scale(-1.0, 1.0);
    r.translate(Vec2::new(-2.0, 0.0));
    r.draw_image(&ImageRef::new("two"), Rect::new(0.0, 0.0, 2.0, 1.0))
        .unwrap();

    let out = r.read_pixels().unwrap();
    assert!(is_blue(px(&out, 0, 0)));
    assert!(is_red(px(&out, 1, 0)));
}

#[test]
fn write_pixels_replaces_surface_and_later_draws_land_on_top() {
    let red = DecodedImage::solid(1, 1, [255, 0, 0, 255]).unwrap();
    let mut r = renderer_with("red", red);
    r.resize_surface(2, 1).unwrap();

    let mut buf = r.read_pixels().unwrap();
    buf.data = vec![0, 0, 255, 255, 0, 0, 255, 255];
    r.write_pixels(&buf).unwrap();
    r.draw_image(&ImageRef::new("red"), Rect::new(0.0, 0.0, 1.0, 1.0))
        .unwrap();

    let out = r.read_pixels().unwrap();
    assert!(is_red(px(&out, 0, 0)));
    assert!(is_blue(px(&out, 1, 0)));
}

#[test]
fn write_pixels_rejects_wrong_size() {
    let mut r = CpuRenderer::default();
    r.resize_surface(4, 4).unwrap();
    assert!(r.write_pixels(&PixelBuffer::transparent(2, 2)).is_err());
}

#[test]
fn unregistered_image_is_a_render_error() {
    let mut r = CpuRenderer::default();
    r.resize_surface(4, 4).unwrap();
    let err = r
        .draw_image(&ImageRef::new("ghost"), Rect::new(0.0, 0.0, 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, CanvasError::Render(_)));
}

#[test]
fn restore_without_save_is_ignored_and_resize_resets_stack() {
    let mut r = CpuRenderer::default();
    r.restore();
    r.save();
    r.translate(Vec2::new(3.0, 0.0));
    assert_eq!(r.open_scopes(), 1);
    r.resize_surface(3, 3).unwrap();
    assert_eq!(r.open_scopes(), 0);
    assert_eq!(r.transform(), Affine::IDENTITY);
}

#[test]
fn clear_uses_configured_color() {
    let mut r = CpuRenderer::new(CpuRendererOpts::default().with_clear_rgba(Some([10, 20, 30, 255])));
    r.resize_surface(2, 2).unwrap();
    r.clear();
    let out = r.read_pixels().unwrap();
    assert_eq!(px(&out, 1, 1), [10, 20, 30, 255]);
}

#[test]
fn oversized_surface_is_rejected() {
    let mut r = CpuRenderer::default();
    assert!(r.resize_surface(70_000, 4).is_err());
    assert!(r.resize_surface(0, 4).is_err());
}
