//! # Portfolio Core
//!
//! Client-side behavior of the portfolio single-page site, expressed as
//! pure state machines. Compiles to WASM behind a thin browser host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              portfolio-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Device          │  Navigation              │
//! │  - Classifier    │  - Mobile menu           │
//! │  - Viewport tier │  - Section tracker       │
//! ├─────────────────────────────────────────────┤
//! │  Reveal          │  Contact                 │
//! │  - One-shot set  │  - Validation            │
//! │  - Timelines     │  - Deep link             │
//! ├─────────────────────────────────────────────┤
//! │  Coordinator: events in, effect plans out   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every component consumes plain data snapshots (scroll positions,
//! timestamps, intersection ratios) and returns effect values; the host
//! owns the document and applies them. Nothing here needs a browser to
//! test.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod config;
pub mod contact;
pub mod coordinator;
pub mod device;
pub mod error;
pub mod interaction;
pub mod lazy;
pub mod nav;
pub mod reveal;
pub mod scroll_fx;
pub mod timing;

pub use analytics::{AnalyticsEvent, AnalyticsSink, LogSink};
pub use config::SiteConfig;
pub use contact::{Field, FieldError, FormNotice, Submission};
pub use coordinator::{
    BodyClassUpdate, Portfolio, ResizePlan, ScrollFramePlan, StartupPlan, SubmissionOutcome,
};
pub use device::{Classification, DeviceClassifier, DeviceSignals, ViewportTier};
pub use error::{PortfolioError, PortfolioResult};
pub use lazy::{ImageState, LazyImage, LazyImages};
pub use nav::{MenuInput, MenuState, MenuTransition, MobileMenu, SectionGeometry, SectionTracker};
pub use reveal::{HeroEffect, RevealEffect, RevealKind, RevealLedger};
pub use scroll_fx::{ResizeEffect, ScrollEffect, ScrollFx};
pub use timing::{Debounce, FrameGate, ScrollMode, ScrollPlan, ScrollTween, Throttle, Timeline};

/// Portfolio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
