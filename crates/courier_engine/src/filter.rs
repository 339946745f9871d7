//! Local skip policy applied before a copy is attempted, whenever message
//! metadata happens to be available.

use courier_core::{FilterConfig, SizeLimits};

use crate::types::MessageMeta;

/// Decision for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
    Forward,
    Skip { reason: String },
}

#[derive(Debug, Clone)]
pub struct MessageFilter {
    config: FilterConfig,
    blacklist_lower: Vec<String>,
}

impl MessageFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let blacklist_lower = config
            .blacklist_phrases
            .iter()
            .filter(|phrase| !phrase.trim().is_empty())
            .map(|phrase| phrase.to_lowercase())
            .collect();
        Self {
            config: config.clone(),
            blacklist_lower,
        }
    }

    /// Applies the content-kind, size and blacklist checks in that order.
    pub fn evaluate(&self, meta: &MessageMeta) -> FilterVerdict {
        if !self.config.content.allows(meta.kind) {
            return FilterVerdict::Skip {
                reason: format!("content kind {:?} is disabled", meta.kind),
            };
        }

        if let Some(reason) = self.size_violation(meta) {
            return FilterVerdict::Skip { reason };
        }

        let caption_lower = meta.caption.to_lowercase();
        if let Some(phrase) = self
            .blacklist_lower
            .iter()
            .find(|phrase| caption_lower.contains(phrase.as_str()))
        {
            return FilterVerdict::Skip {
                reason: format!("caption contains blacklisted phrase {phrase:?}"),
            };
        }

        FilterVerdict::Forward
    }

    fn size_violation(&self, meta: &MessageMeta) -> Option<String> {
        // Size limits apply to file-backed content only.
        if meta.file_size == 0 {
            return None;
        }
        let SizeLimits { min_mb, max_mb } = self.config.size;
        let size_mb = meta.file_size / (1024 * 1024);
        if min_mb > 0 && size_mb < min_mb {
            Some(format!("file is below the {min_mb} MB minimum"))
        } else if max_mb > 0 && size_mb > max_mb {
            Some(format!("file is above the {max_mb} MB maximum"))
        } else {
            None
        }
    }
}
