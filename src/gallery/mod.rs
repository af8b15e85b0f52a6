//! Client-side gallery with pagination.
//!
//! The gallery holds every image of the page in newest-first order. Entries
//! are only ever added (by a stored generation) or mutated in place (favorite
//! flag, upscaled resolution).

use crate::defaults::gallery::PAGE_SIZE;
use crate::types::{GalleryImage, ImageId, Resolution};

/// One rendered page of the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryPage<'a> {
    pub images: &'a [GalleryImage],
    /// 1-based page number
    pub number: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl GalleryPage<'_> {
    /// `Page X of Y`
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.number, self.total_pages.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    current_page: usize,
    page_size: usize,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Gallery {
    /// Empty gallery; a zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            images: Vec::new(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_images(images: Vec<GalleryImage>, page_size: usize) -> Self {
        Self {
            images,
            ..Self::new(page_size)
        }
    }

    /// Parse the gallery payload embedded in the server-rendered page.
    ///
    /// Malformed JSON yields an empty gallery and an error log.
    pub fn from_embedded_json(raw: &str, page_size: usize) -> Self {
        match serde_json::from_str::<Vec<GalleryImage>>(raw) {
            Ok(images) => {
                tracing::debug!(count = images.len(), "loaded embedded gallery");
                Self::with_images(images, page_size)
            }
            Err(err) => {
                tracing::error!("Error parsing gallery data: {err}");
                Self::new(page_size)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`; zero for an empty gallery.
    pub fn total_pages(&self) -> usize {
        self.images.len().div_ceil(self.page_size)
    }

    /// Add a new image in front and go back to the first page.
    pub fn prepend(&mut self, image: GalleryImage) {
        self.images.insert(0, image);
        self.current_page = 1;
    }

    /// The current page.
    pub fn page(&self) -> GalleryPage<'_> {
        let total_pages = self.total_pages();
        let start = ((self.current_page - 1) * self.page_size).min(self.images.len());
        let end = (start + self.page_size).min(self.images.len());
        GalleryPage {
            images: &self.images[start..end],
            number: self.current_page,
            total_pages,
            has_previous: self.current_page > 1,
            has_next: self.current_page < total_pages,
        }
    }

    /// Move by `delta` pages, clamped to `[1, max(total_pages, 1)]`.
    pub fn change_page(&mut self, delta: isize) -> usize {
        let last = self.total_pages().max(1);
        let target = self.current_page.saturating_add_signed(delta);
        self.current_page = target.clamp(1, last);
        self.current_page
    }

    pub fn get(&self, id: ImageId) -> Option<&GalleryImage> {
        self.images.iter().find(|image| image.id == id)
    }

    fn get_mut(&mut self, id: ImageId) -> Option<&mut GalleryImage> {
        self.images.iter_mut().find(|image| image.id == id)
    }

    /// Set the favorite flag of `id`; returns `false` for unknown ids.
    pub fn set_favorite(&mut self, id: ImageId, is_favorite: bool) -> bool {
        match self.get_mut(id) {
            Some(image) => {
                image.is_favorite = is_favorite;
                true
            }
            None => false,
        }
    }

    /// Record the resolution of an upscaled image.
    pub fn apply_upscale(&mut self, id: ImageId, resolution: Resolution) -> bool {
        match self.get_mut(id) {
            Some(image) => {
                image.width = Some(resolution.width);
                image.height = Some(resolution.height);
                true
            }
            None => false,
        }
    }
}
