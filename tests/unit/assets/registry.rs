use super::*;

#[test]
fn insert_get_release() {
    let mut reg = TextureRegistry::new();
    let a = reg.insert(GlyphImage::blank('A', 2, 2));
    let b = reg.insert(GlyphImage::blank('B', 2, 2));
    assert_ne!(a, b);
    assert_eq!(reg.get(a).unwrap().ch, 'A');
    assert!(reg.release(a));
    assert!(!reg.release(a));
    assert!(reg.get(a).is_none());
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.stats().live(), 1);
}

#[test]
fn release_all_balances_counters() {
    let mut reg = TextureRegistry::new();
    for c in "HELLO".chars() {
        reg.insert(GlyphImage::blank(c, 1, 1));
    }
    assert_eq!(reg.release_all(), 5);
    assert!(reg.is_empty());
    let s = reg.stats();
    assert_eq!(s.allocated, 5);
    assert_eq!(s.released, 5);
    assert_eq!(s.live(), 0);
}

#[test]
fn ids_are_not_reused_after_release() {
    let mut reg = TextureRegistry::new();
    let a = reg.insert(GlyphImage::blank('A', 1, 1));
    reg.release_all();
    let b = reg.insert(GlyphImage::blank('A', 1, 1));
    assert!(b > a);
    assert!(reg.get(a).is_none());
}

#[test]
fn short_buffers_are_replaced_by_a_blank() {
    let mut reg = TextureRegistry::new();
    let short = GlyphImage {
        ch: 'X',
        width: 8,
        height: 8,
        rgba8_premul: std::sync::Arc::new(vec![255; 12]),
    };
    assert!(!short.is_well_formed());
    let id = reg.insert(short);
    let img = reg.get(id).unwrap();
    assert!(img.is_well_formed());
    assert_eq!((img.ch, img.width, img.height), ('X', 1, 1));
    assert!(!img.has_ink());
    assert_eq!(reg.stats().allocated, 1);
}

#[test]
fn well_formed_images_are_kept_verbatim() {
    let mut reg = TextureRegistry::new();
    let img = GlyphImage {
        ch: 'Y',
        width: 2,
        height: 1,
        rgba8_premul: std::sync::Arc::new(vec![255; 8]),
    };
    let id = reg.insert(img.clone());
    assert!(std::sync::Arc::ptr_eq(
        &reg.get(id).unwrap().rgba8_premul,
        &img.rgba8_premul
    ));
}
