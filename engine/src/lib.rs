//! Page composition engine.
//!
//! # Pipeline
//!
//! A [`PageBuilder`] is constructed once from a template, a component
//! configuration, a [`Fetch`] capability and an [`Envelope`]. Each call to
//! [`PageBuilder::build`] then runs:
//!
//! 1. **Expand** - substitute invocation params into each component endpoint
//! 2. **Fan-out** - fetch every component concurrently
//! 3. **Parse** - run each body through [`Envelope::parse`]
//! 4. **Recover** - route fetch/parse failures to [`Envelope::recover_error`]
//! 5. **Combine** - merge parsed values, in declaration order, into a render context
//! 6. **Render** - substitute the context into the template
//!
//! # Error Handling
//!
//! | When | Error |
//! |------|-------|
//! | construction | [`ConfigError`] for malformed component config |
//! | `build()` | [`BuildError::MissingTemplate`], [`BuildError::Combine`] |
//! | per component | [`ComponentError`], absorbed by the envelope |
//!
//! # Usage
//!
//! ```ignore
//! use mosaic_engine::{JsonEnvelope, PageBuilder};
//!
//! let page = PageBuilder::new()
//!     .with_template("<h1>{{title}}</h1>")
//!     .with_config(r#"{"components":[{"endpoint":"http://{{host}}/title.json"}]}"#)?
//!     .with_fetcher(fetcher)
//!     .with_envelope(JsonEnvelope);
//! let html = page.build(Some(&params)).await?;
//! ```

mod builder;
mod envelope;
mod fetch;


pub use builder::{PageBuilder, create_builder};
pub use envelope::{Envelope, JoinEnvelope, JsonEnvelope, PassThroughEnvelope};
pub use fetch::{Fetch, FetchFut};

pub use mosaic_types;
pub use mosaic_types::{
    BuildError, CombineError, ComponentConfig, ComponentError, ConfigError, FetchError, Fields,
    Params, ParseError, RenderContext,
};
