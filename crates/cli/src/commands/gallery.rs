//! Gallery commands.

use std::path::Path;

use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::gallery::{GalleryClient, ImageFeed, ImageFile, ImageForm, submit_image};
use rocketshoes_storefront::notify::TracingNotifier;

pub async fn list(config: &StorefrontConfig, pages: u32) -> Result<(), Box<dyn std::error::Error>> {
    let client = GalleryClient::new(config.require_gallery()?)?;
    let mut feed = ImageFeed::new();

    for _ in 0..pages {
        if !feed.fetch_next_page(&client).await? {
            break;
        }
    }

    for card in feed.cards() {
        tracing::info!("{} | {} | {} | {}", card.id, card.title, card.description, card.url);
    }
    if feed.has_next_page() {
        tracing::info!("More images available (use --pages)");
    }
    Ok(())
}

pub async fn upload(
    config: &StorefrontConfig,
    file: &Path,
    url: String,
    title: String,
    description: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GalleryClient::new(config.require_gallery()?)?;
    let form = ImageForm {
        image: Some(ImageFile::from_path(file)?),
        url,
        title,
        description,
    };

    let mut feed = ImageFeed::new();
    submit_image(&client, &mut feed, &TracingNotifier, &form).await?;
    Ok(())
}
