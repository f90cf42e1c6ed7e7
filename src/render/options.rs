//! Conversion options.

/// Options for converting a Word document to HTML.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Embed images as `data:` URIs (otherwise images are left out)
    pub embed_images: bool,

    /// Emit the core-properties title as a leading `<h1>`
    pub include_title: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            embed_images: true,
            include_title: false,
        }
    }
}

impl ConvertOptions {
    /// Create new convert options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable image embedding.
    pub fn with_embed_images(mut self, embed: bool) -> Self {
        self.embed_images = embed;
        self
    }

    /// Emit the document title as a heading.
    pub fn with_title(mut self, include: bool) -> Self {
        self.include_title = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert!(opts.embed_images);
        assert!(!opts.include_title);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = ConvertOptions::new()
            .with_embed_images(false)
            .with_title(true);
        assert!(!opts.embed_images);
        assert!(opts.include_title);
    }
}
