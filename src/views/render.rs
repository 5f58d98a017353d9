//! Template responses and the renderer seam.
//!
//! Views never produce markup themselves. They return a [`TemplateResponse`]
//! naming a template and carrying a typed context; a [`Renderer`] turns that
//! into a [`RenderedView`].

use crate::error::{ViewError, ViewResult};
use serde::Serialize;

/// A template name paired with the context it is rendered with.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateResponse<C> {
    pub template: &'static str,
    pub context: C,
}

impl<C: Serialize> TemplateResponse<C> {
    pub fn new(template: &'static str, context: C) -> Self {
        Self { template, context }
    }

    /// Serialize the context and hand it to `renderer`.
    pub fn render(&self, renderer: &dyn Renderer) -> ViewResult<RenderedView> {
        let context =
            serde_json::to_value(&self.context).map_err(|e| ViewError::Render(e.to_string()))?;
        renderer.render(self.template, &context)
    }
}

/// Output of a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub template: String,
    pub body: String,
}

/// Turns a template name and a JSON context into a body.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> ViewResult<RenderedView>;
}

/// Renders `{"template": ..., "context": ...}` as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> ViewResult<RenderedView> {
        let document = serde_json::json!({
            "template": template,
            "context": context,
        });

        let body = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        }
        .map_err(|e| ViewError::Render(e.to_string()))?;

        Ok(RenderedView {
            template: template.to_string(),
            body,
        })
    }
}
