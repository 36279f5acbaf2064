#![forbid(unsafe_code)]

use atelier_contracts::gallery::{Category, GalleryItemId, GalleryItemInput};
use atelier_storage::repo::GalleryRepo;
use atelier_storage::store::StudioStore;

fn item(title: &str, category: Category) -> GalleryItemInput {
    GalleryItemInput::v1(
        title.to_string(),
        category,
        format!("{title} in graphite"),
        format!("/assets/{}.jpg", title.to_ascii_lowercase().replace(' ', "-")),
    )
    .unwrap()
}

#[test]
fn at_gallery_db_01_filter_by_category_preserves_order() {
    let mut s = StudioStore::new_in_memory();
    s.append_gallery_item_row(item("Elegant Woman Portrait", Category::PencilSketch))
        .unwrap();
    s.append_gallery_item_row(item("Couple Moment", Category::PortraitArt))
        .unwrap();
    s.append_gallery_item_row(item("Childhood Innocence", Category::PencilSketch))
        .unwrap();

    let sketches = s.gallery_item_rows_by_category(Category::PencilSketch);
    assert_eq!(sketches.len(), 2);
    assert_eq!(sketches[0].gallery_item_id, GalleryItemId(1));
    assert_eq!(sketches[1].gallery_item_id, GalleryItemId(3));
    assert!(s
        .gallery_item_rows_by_category(Category::CustomOrders)
        .is_empty());
    assert_eq!(s.gallery_item_rows().len(), 3);
}
