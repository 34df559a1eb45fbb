//! Share command - compose a share message for one resource entry.

use std::fmt::Write as _;
use std::io::Write as _;

use anyhow::{bail, Result};
use apiexplorer_core::{shape_resources, MessagePoster, SharePayload};
use async_trait::async_trait;
use clap::Args;
use tracing::{info, warn};

use crate::session::Session;
use crate::OutputFormat;

/// Arguments for the share command.
#[derive(Args)]
pub struct ShareArgs {
    /// Resource name or path.
    pub resource: String,

    /// 1-based index of the entry to share.
    #[arg(long, short, default_value_t = 1)]
    pub index: usize,
}

/// Runs the share command.
pub async fn run(args: &ShareArgs, session: &mut Session) -> Result<()> {
    let data = session.fetch(&args.resource).await?;
    let descriptors = shape_resources(&data);

    let Some(descriptor) = args
        .index
        .checked_sub(1)
        .and_then(|i| descriptors.get(i))
    else {
        bail!(
            "No entry {} in {} ({} available)",
            args.index,
            args.resource,
            descriptors.len()
        );
    };

    let mut payload = SharePayload::from_descriptor(descriptor);
    if let Some(image) = payload.image_url.take() {
        payload.image_url = Some(session.client.get_image_url(&image).await);
    }

    let message = payload.compose_message();
    if session.format == OutputFormat::Json {
        let output = serde_json::json!({ "payload": payload, "message": message });
        println!("{}", session.json().format(&output)?);
        return Ok(());
    }

    let poster = StdoutPoster::new(session.text().bold(&payload.title), payload.image_url.clone());
    if !poster.post(&payload.title, &message, None).await {
        bail!("Failed to post message");
    }

    info!(title = %payload.title, "Share message posted");
    Ok(())
}

// ============================================================================
// Stdout Poster
// ============================================================================

/// Posts messages by printing them.
pub struct StdoutPoster {
    heading: String,
    image_url: Option<String>,
}

impl StdoutPoster {
    /// Creates a poster that prints `heading` above each message.
    pub fn new(heading: String, image_url: Option<String>) -> Self {
        Self { heading, image_url }
    }

    fn render(&self, message: &str, image: Option<&[u8]>) -> String {
        let mut out = format!("{}\n{}\n{message}\n", self.heading, "─".repeat(40));
        if let Some(url) = &self.image_url {
            let _ = writeln!(out, "\nImage: {url}");
        }
        if let Some(bytes) = image {
            let _ = writeln!(out, "\nImage attached ({} bytes)", bytes.len());
        }
        out
    }
}

#[async_trait]
impl MessagePoster for StdoutPoster {
    async fn post(&self, title: &str, message: &str, image: Option<&[u8]>) -> bool {
        let rendered = self.render(message, image);
        let mut stdout = std::io::stdout().lock();
        match stdout.write_all(rendered.as_bytes()) {
            Ok(()) => true,
            Err(e) => {
                warn!(title, error = %e, "Failed to print share message");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_image_url() {
        let poster = StdoutPoster::new(
            "Chair".to_string(),
            Some("https://cdn.example.com/MyFiles/chair.png?myft=t".to_string()),
        );
        let out = poster.render("*Chair*\n\n✅ Product available in our catalog.", None);

        assert!(out.starts_with("Chair\n"));
        assert!(out.contains("*Chair*"));
        assert!(out.contains("Image: https://cdn.example.com/MyFiles/chair.png?myft=t"));
    }

    #[test]
    fn test_render_attachment_size() {
        let poster = StdoutPoster::new("X".to_string(), None);
        let out = poster.render("msg", Some(&[1, 2, 3]));
        assert!(out.contains("Image attached (3 bytes)"));
        assert!(!out.contains("Image: "));
    }

    #[tokio::test]
    async fn test_post_succeeds() {
        let poster = StdoutPoster::new("X".to_string(), None);
        assert!(poster.post("X", "msg", None).await);
    }
}
