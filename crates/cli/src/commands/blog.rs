//! Blog commands.

use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::content::{ContentClient, PostFeed};

pub async fn list(
    config: &StorefrontConfig,
    page_size: u32,
    all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ContentClient::new(config.require_content()?)?;
    let mut feed = PostFeed::load(&client, page_size).await?;
    if all {
        while feed.load_more(&client).await? {}
    }

    for post in feed.posts() {
        tracing::info!(
            "{} | {} | {} | {}",
            post.uid.as_deref().unwrap_or("-"),
            post.title,
            post.author,
            post.published_label().unwrap_or_default()
        );
        if !post.subtitle.is_empty() {
            tracing::info!("    {}", post.subtitle);
        }
    }
    if feed.has_more() {
        tracing::info!("More posts available (use --all)");
    }
    Ok(())
}

pub async fn show(config: &StorefrontConfig, uid: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = ContentClient::new(config.require_content()?)?;
    let post = client.post_by_uid(uid).await?;

    tracing::info!("{}", post.title);
    tracing::info!(
        "{} | {} | {} min",
        post.author,
        post.published_label().unwrap_or_default(),
        post.reading_time_minutes()
    );
    if let Some(banner) = &post.banner_url {
        tracing::info!("Banner: {banner}");
    }
    for section in post.rendered_sections() {
        tracing::info!("## {}", section.heading);
        tracing::info!("{}", section.body_html);
    }
    Ok(())
}
