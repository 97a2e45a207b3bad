use super::*;

fn frame(data: Vec<u8>, premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: (data.len() / 4) as u32,
        height: 1,
        data,
        premultiplied,
    }
}

#[test]
fn premultiplied_half_red_over_black() {
    let mut out = Vec::new();
    frame(vec![128, 0, 0, 128], true)
        .flatten_into(Rgba8::BLACK, &mut out)
        .unwrap();
    assert_eq!(out, vec![128, 0, 0, 255]);
}

#[test]
fn straight_alpha_blends_with_background() {
    let mut out = vec![9; 32];
    frame(vec![0, 0, 0, 0, 200, 100, 50, 255], false)
        .flatten_into(Rgba8::WHITE, &mut out)
        .unwrap();
    assert_eq!(out, vec![255, 255, 255, 255, 200, 100, 50, 255]);
}

#[test]
fn background_alpha_is_ignored() {
    let mut out = Vec::new();
    let bg = Rgba8 {
        r: 10,
        g: 20,
        b: 30,
        a: 0,
    };
    frame(vec![0, 0, 0, 0], true).flatten_into(bg, &mut out).unwrap();
    assert_eq!(out, vec![10, 20, 30, 255]);
}

#[test]
fn short_buffers_are_rejected() {
    let mut f = frame(vec![0; 8], true);
    f.width = 3;
    assert!(f.flatten_into(Rgba8::BLACK, &mut Vec::new()).is_err());
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let f = frame(vec![1, 2, 3, 4, 5, 6, 7, 8], true);
    assert_eq!(f.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}
