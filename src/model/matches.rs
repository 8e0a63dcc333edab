use super::{BlogId, Site};

/// Sites a plugin was found active on, in the order the registry listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    sites: Vec<Site>,
}

impl MatchResult {
    /// Builds a result, keeping only the first occurrence of each blog id.
    pub fn new(sites: Vec<Site>) -> Self {
        let mut result = Self::default();
        for site in sites {
            result.push(site);
        }
        result
    }

    /// Appends a site unless it is already present.
    pub(crate) fn push(&mut self, site: Site) -> bool {
        if self.contains(site.blog_id) {
            return false;
        }
        self.sites.push(site);
        true
    }

    pub fn contains(&self, blog_id: BlogId) -> bool {
        self.sites.iter().any(|s| s.blog_id == blog_id)
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn ids(&self) -> Vec<BlogId> {
        self.sites.iter().map(|s| s.blog_id).collect()
    }

    /// `(blog_id, url)` pairs in scan order.
    pub fn pairs(&self) -> Vec<(BlogId, String)> {
        self.sites.iter().map(|s| (s.blog_id, s.url())).collect()
    }
}
