//! Network layer: everything that talks to the wiki.
//!
//! # Submodules
//!
//! - [`fetch`]: page fetches, the inbound-link-count query, and the
//!   disambiguation / person-article content checks
//! - [`redirect`]: the browser seam used to resolve client-side redirects
//!   to a canonical title
//! - [`links`]: outbound article-link extraction from a page's HTML
//!
//! All requests are sequential blocking-style awaits; the pipeline runs
//! offline batches where politeness matters more than throughput.

pub mod fetch;
pub mod links;
pub mod redirect;
