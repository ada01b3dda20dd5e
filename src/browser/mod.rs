//! Browser automation: Chrome discovery, session ownership, the page
//! capability trait, and selector resolution.

pub mod chrome;
pub mod page;
pub mod selectors;
mod session;

pub use page::{CdpPage, PortalPage};
pub use selectors::Selector;
pub use session::{BrowserSession, SessionState};
