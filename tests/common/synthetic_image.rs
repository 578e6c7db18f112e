/// Generates a uniform RGB image buffer.
pub fn flat_rgb(width: usize, height: usize, value: u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![value; 3 * width * height]
}

/// Generates a dark background with a bright filled rectangle at
/// `(x0, y0)` of size `rect_w × rect_h`, a clean stand-in for a card
/// lying on a contrasting surface.
pub fn card_scene(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    rect_w: usize,
    rect_h: usize,
) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(
        x0 + rect_w <= width && y0 + rect_h <= height,
        "rectangle must fit inside the image"
    );

    let mut img = flat_rgb(width, height, 24);
    for y in y0..y0 + rect_h {
        for x in x0..x0 + rect_w {
            let i = 3 * (y * width + x);
            img[i] = 235;
            img[i + 1] = 235;
            img[i + 2] = 235;
        }
    }
    img
}

/// Card-proportioned rectangle dimensions for a given width, rounded to
/// whole pixels.
pub fn card_rect_size(rect_w: usize) -> (usize, usize) {
    let rect_h = (rect_w as f32 * 53.98 / 85.60).round() as usize;
    (rect_w, rect_h)
}
