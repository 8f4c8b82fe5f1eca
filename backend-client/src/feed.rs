use multiseek_protocol::FeedItem;
use multiseek_protocol::FeedPage;
use rand::Rng;
use uuid::Uuid;

const MIN_EDGE: u32 = 500;
const WIDTH_SPAN: u32 = 800;
const HEIGHT_SPAN: u32 = 900;

/// Builds a page of placeholder images with random aspect ratios. The
/// synthetic feed is endless, so `has_more` is always set.
pub(crate) fn synthetic_page(page_number: u32, batch_size: usize) -> FeedPage {
    let mut rng = rand::rng();
    let items = (0..batch_size)
        .map(|_| {
            let width = MIN_EDGE + rng.random_range(0..WIDTH_SPAN);
            let height = MIN_EDGE + rng.random_range(0..HEIGHT_SPAN);
            let seed: u32 = rng.random();
            FeedItem {
                id: Uuid::new_v4().to_string(),
                image_url: format!("https://picsum.photos/{width}/{height}?random={seed}"),
                width,
                height,
            }
        })
        .collect();
    FeedPage {
        items,
        page_number,
        has_more: true,
    }
}
