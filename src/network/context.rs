use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use serde_json::Value;
use tracing::trace;

use super::{ContextSwitch, Network, PluginRegistry, SiteOptions, ACTIVE_PLUGINS_OPTION};
use crate::error::Result;
use crate::model::{BlogId, Site};

/// Switches into a site for as long as the guard lives.
///
/// Dropping the guard restores the previous site, including when a read
/// panics while the guard is held.
pub struct SiteContext<'a, C: ContextSwitch + ?Sized> {
    inner: &'a mut C,
}

impl<'a, C: ContextSwitch + ?Sized> SiteContext<'a, C> {
    pub fn enter(inner: &'a mut C, blog_id: BlogId) -> Result<Self> {
        inner.switch_to(blog_id)?;
        trace!(blog_id, "Entered site context");
        Ok(Self { inner })
    }
}

impl<C: ContextSwitch + ?Sized> Deref for SiteContext<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.inner
    }
}

impl<C: ContextSwitch + ?Sized> DerefMut for SiteContext<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.inner
    }
}

impl<C: ContextSwitch + ?Sized> Drop for SiteContext<'_, C> {
    fn drop(&mut self) {
        self.inner.restore();
        trace!(blog_id = self.inner.current_blog(), "Restored site context");
    }
}

/// Serves [`SiteOptions`] reads from a [`ContextSwitch`] backend.
///
/// Each read switches into the requested site, reads the option, and
/// switches back before returning.
pub struct Switched<C> {
    inner: RefCell<C>,
}

impl<C: ContextSwitch> Switched<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner: RefCell::new(inner),
        }
    }

    /// Returns the backend's current site.
    pub fn current_blog(&self) -> BlogId {
        self.inner.borrow().current_blog()
    }

    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C: ContextSwitch> SiteOptions for Switched<C> {
    fn active_plugins(&self, blog_id: BlogId) -> Result<Option<Value>> {
        let mut inner = self.inner.borrow_mut();
        let ctx = SiteContext::enter(&mut *inner, blog_id)?;
        Ok(ctx.current_option(ACTIVE_PLUGINS_OPTION))
    }
}

impl<C: ContextSwitch + Network> Network for Switched<C> {
    fn is_multisite(&self) -> bool {
        self.inner.borrow().is_multisite()
    }

    fn network_active_plugins(&self) -> Result<Vec<String>> {
        self.inner.borrow().network_active_plugins()
    }

    fn sites(&self, limit: usize) -> Result<Vec<Site>> {
        self.inner.borrow().sites(limit)
    }
}

impl<C: ContextSwitch + PluginRegistry> PluginRegistry for Switched<C> {
    fn installed_plugins(&self) -> Result<Vec<String>> {
        self.inner.borrow().installed_plugins()
    }
}
