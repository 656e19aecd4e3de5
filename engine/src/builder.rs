//! Page builder: fan-out fetch, envelope parse/combine, template render.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use mosaic_core::{expand_url, placeholders, render, resolve};
use mosaic_types::{
    BuildError, ComponentConfig, ComponentError, ConfigError, Params, RenderContext,
};

use crate::envelope::{Envelope, PassThroughEnvelope};
use crate::fetch::Fetch;

/// Reusable factory for rendered pages.
///
/// Construction performs no I/O. Component configuration is validated eagerly
/// by [`PageBuilder::with_config`]; a missing template is only reported when
/// [`PageBuilder::build`] is awaited.
pub struct PageBuilder<E = PassThroughEnvelope> {
    template: Option<String>,
    components: Arc<[ComponentConfig]>,
    fetcher: Option<Arc<dyn Fetch>>,
    envelope: Arc<E>,
}

impl PageBuilder<PassThroughEnvelope> {
    /// A builder with no template, no components, no fetcher and the
    /// pass-through envelope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            template: None,
            components: Arc::from(Vec::new()),
            fetcher: None,
            envelope: Arc::new(PassThroughEnvelope),
        }
    }
}

impl Default for PageBuilder<PassThroughEnvelope> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for PageBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            components: Arc::clone(&self.components),
            fetcher: self.fetcher.clone(),
            envelope: Arc::clone(&self.envelope),
        }
    }
}

impl<E: Envelope> PageBuilder<E> {
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Resolve a JSON component configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid JSON or does not have
    /// the `{"components": [{"endpoint": ...}]}` shape.
    pub fn with_config(mut self, config_source: &str) -> Result<Self, ConfigError> {
        self.components = resolve(Some(config_source))?.into();
        Ok(self)
    }

    pub fn with_fetcher(self, fetcher: impl Fetch + 'static) -> Self {
        self.with_shared_fetcher(Arc::new(fetcher))
    }

    pub fn with_shared_fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_envelope<E2: Envelope>(self, envelope: E2) -> PageBuilder<E2> {
        PageBuilder {
            template: self.template,
            components: self.components,
            fetcher: self.fetcher,
            envelope: Arc::new(envelope),
        }
    }

    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentConfig] {
        &self.components
    }

    #[must_use]
    pub fn envelope(&self) -> &E {
        &self.envelope
    }

    /// Render one page.
    ///
    /// Every component is fetched concurrently and parsed by the envelope.
    /// Component failures go to [`Envelope::recover_error`] and leave a `None`
    /// in the combine input; the combine input is always in declaration order,
    /// whatever order the fetches finish in.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MissingTemplate`] if no template was supplied.
    /// - [`BuildError::Combine`] if the envelope cannot combine the results.
    pub async fn build(&self, params: Option<&Params>) -> Result<String, BuildError> {
        let Some(template) = self.template.as_deref() else {
            return Err(BuildError::MissingTemplate);
        };

        let started = Instant::now();
        let parsed = join_all(
            self.components
                .iter()
                .enumerate()
                .map(|(index, component)| self.run_component(index, component, params)),
        )
        .await;

        let failures = parsed.iter().filter(|value| value.is_none()).count();
        let context = self.envelope.combine(parsed)?;
        let page = match context {
            // Static page: with no components a whole-body result has nothing to fill.
            RenderContext::Body(_) if self.components.is_empty() => template.to_string(),
            context => render(template, &context),
        };

        let unresolved = placeholders(&page).len();
        if unresolved > 0 {
            tracing::debug!(unresolved, "Rendered page has unresolved placeholders");
        }
        tracing::info!(
            components = self.components.len(),
            failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered page"
        );

        Ok(page)
    }

    async fn run_component(
        &self,
        index: usize,
        component: &ComponentConfig,
        params: Option<&Params>,
    ) -> Option<E::Parsed> {
        let url = expand_url(&component.endpoint, params);
        tracing::debug!(index, component = component.label(), url = %url, "Fetching component");

        match self.fetch_and_parse(index, url).await {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.envelope.recover_error(&err);
                None
            }
        }
    }

    async fn fetch_and_parse(
        &self,
        index: usize,
        url: String,
    ) -> Result<E::Parsed, ComponentError> {
        let Some(fetcher) = self.fetcher.as_deref() else {
            return Err(ComponentError::NoFetcher { index, url });
        };

        let body = match fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(source) => return Err(ComponentError::Fetch { index, url, source }),
        };
        tracing::debug!(index, bytes = body.len(), "Component fetched");

        self.envelope
            .parse(body)
            .map_err(|source| ComponentError::Parse { index, url, source })
    }
}

/// Construct a page builder from its four optional parts.
///
/// Pass [`PassThroughEnvelope`] when no custom envelope is needed.
///
/// # Errors
///
/// Returns [`ConfigError`] immediately if `config_source` is malformed. A
/// missing template is not an error here; it surfaces from
/// [`PageBuilder::build`].
pub fn create_builder<E: Envelope>(
    template: Option<&str>,
    config_source: Option<&str>,
    fetcher: Option<Arc<dyn Fetch>>,
    envelope: E,
) -> Result<PageBuilder<E>, ConfigError> {
    let components = resolve(config_source)?;
    Ok(PageBuilder {
        template: template.map(str::to_string),
        components: components.into(),
        fetcher,
        envelope: Arc::new(envelope),
    })
}
