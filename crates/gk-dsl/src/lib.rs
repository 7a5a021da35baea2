//! Declarative configuration sections applied to a mutable target.
//!
//! A configuration pass has three parts:
//!
//! - [`Section`] - a closed set of optional settings for one policy area,
//!   forwarded onto a target at build time. Unset options never touch the
//!   target, so the target's own defaults stay in effect.
//! - [`DisableFlag`] - a one-way kill switch. When set, a section tells its
//!   target to deactivate the feature and forwards nothing else.
//! - [`CompositionRoot`] - an ordered list of sections, each scoped to a
//!   child of a shared parent target, applied exactly once.
//!
//! # Example
//!
//! ```
//! use gk_dsl::{ApplyError, CompositionRoot, DisableFlag, Section};
//!
//! #[derive(Default)]
//! struct Banner {
//!     text: Option<String>,
//!     enabled: bool,
//! }
//!
//! #[derive(Default)]
//! struct Site {
//!     banner: Banner,
//! }
//!
//! impl Site {
//!     fn banner(&mut self) -> &mut Banner {
//!         &mut self.banner
//!     }
//! }
//!
//! #[derive(Default)]
//! struct BannerDsl {
//!     text: Option<String>,
//!     disabled: DisableFlag,
//! }
//!
//! impl Section<Banner> for BannerDsl {
//!     fn apply(&self, target: &mut Banner) -> Result<(), ApplyError> {
//!         if self.disabled.is_set() {
//!             target.enabled = false;
//!             return Ok(());
//!         }
//!         target.enabled = true;
//!         if let Some(text) = &self.text {
//!             target.text = Some(text.clone());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let dsl = BannerDsl { text: Some("hello".into()), ..BannerDsl::default() };
//! let mut site = Site::default();
//! CompositionRoot::new()
//!     .section("banner", Site::banner, &dsl)
//!     .build(&mut site)
//!     .unwrap();
//! assert_eq!(site.banner.text.as_deref(), Some("hello"));
//! ```

mod composition;
mod error;
mod flag;
mod section;

pub use composition::CompositionRoot;
pub use error::ApplyError;
pub use flag::DisableFlag;
pub use section::Section;
