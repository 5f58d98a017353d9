//! MCP tool handlers for the Gitcoin server.
//!
//! Every view handler is exposed as one tool. A tool's output is the rendered
//! view: the template name plus its JSON context.

use crate::error::{StoreError, ViewError};
use crate::models::OfferActionKind;
use crate::views::{GasViews, JsonRenderer, Renderer, TemplateResponse, TownSquareViews};
use chrono::{DateTime, Utc};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// The Gitcoin MCP server: gas dashboard and town square tools.
#[derive(Clone)]
pub struct GitcoinMcpServer {
    gas_views: GasViews,
    townsquare: TownSquareViews,
    renderer: Arc<dyn Renderer>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for GitcoinMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "gitcoin-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for Gitcoin - live gas prices, gas history, gas cost estimates and the town square (offers, announcements, comments, trust bonus).".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GasHistoryParams {
    /// hourly, daily or weekly (default hourly)
    #[serde(default)]
    breakdown: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AtTimeParams {
    /// RFC 3339 timestamp; defaults to now
    #[serde(default)]
    at: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct OfferIdParams {
    offer_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct OfferActionParams {
    profile_id: i64,
    offer_id: i64,
    /// click, completion or decline
    what: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ActivityIdParams {
    activity_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ReactionParams {
    profile_id: i64,
    activity_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PostCommentParams {
    profile_id: i64,
    activity_id: i64,
    comment: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UserIdParams {
    user_id: i64,
}

fn mcp_error(code: ErrorCode, message: impl std::fmt::Display) -> McpError {
    McpError {
        code,
        message: Cow::from(message.to_string()),
        data: None,
    }
}

// Caller mistakes become invalid-params errors, everything else is internal.
fn to_mcp_error(e: ViewError) -> McpError {
    match &e {
        ViewError::InvalidRequest(_)
        | ViewError::Store(StoreError::NotFound(_))
        | ViewError::Store(StoreError::Invalid(_))
        | ViewError::Store(StoreError::UniqueViolation(_)) => {
            mcp_error(ErrorCode::INVALID_PARAMS, e)
        }
        _ => {
            tracing::error!("tool failed: {}", e);
            mcp_error(ErrorCode::INTERNAL_ERROR, e)
        }
    }
}

fn parse_at(at: Option<&str>) -> Result<DateTime<Utc>, McpError> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| mcp_error(ErrorCode::INVALID_PARAMS, format!("invalid time {:?}: {}", raw, e))),
    }
}

impl GitcoinMcpServer {
    fn rendered<C: Serialize>(
        &self,
        response: Result<TemplateResponse<C>, ViewError>,
    ) -> Result<CallToolResult, McpError> {
        let view = response
            .and_then(|r| r.render(self.renderer.as_ref()))
            .map_err(to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(view.body)]))
    }
}

#[tool_router]
impl GitcoinMcpServer {
    /// Create a server rendering views as pretty-printed JSON.
    pub fn new(gas_views: GasViews, townsquare: TownSquareViews) -> Self {
        Self {
            gas_views,
            townsquare,
            renderer: Arc::new(JsonRenderer::pretty()),
            tool_router: Self::tool_router(),
        }
    }

    /// Replace the renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[tool(
        description = "Live gas tool: recommended gas price for a fast confirmation, predicted confirmation times per gas price, ETH/USD rate and network advisories"
    )]
    async fn gas(&self) -> Result<CallToolResult, McpError> {
        self.rendered(self.gas_views.gas().await)
    }

    #[tool(description = "Gas FAQ page")]
    async fn gas_faq(&self) -> Result<CallToolResult, McpError> {
        self.rendered(self.gas_views.gas_faq().await)
    }

    #[tool(description = "List of gas faucets")]
    async fn gas_faucet_list(&self) -> Result<CallToolResult, McpError> {
        self.rendered(self.gas_views.gas_faucet_list().await)
    }

    #[tool(
        description = "Gas calculator: what popular Gitcoin actions cost at current gas prices"
    )]
    async fn gas_calculator(&self) -> Result<CallToolResult, McpError> {
        self.rendered(self.gas_views.gas_calculator().await)
    }

    #[tool(
        description = "Gas price history for the 1, 5, 60, 120 and 180 minute confirmation lines, bucketed hourly, daily or weekly"
    )]
    async fn gas_history(
        &self,
        params: Parameters<GasHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        self.rendered(
            self.gas_views
                .gas_history(params.breakdown.as_deref())
                .await,
        )
    }

    #[tool(description = "Public town square offers that are currently running")]
    async fn current_offers(
        &self,
        params: Parameters<AtTimeParams>,
    ) -> Result<CallToolResult, McpError> {
        let now = parse_at(params.0.at.as_deref())?;
        self.rendered(self.townsquare.current_offers(now).await)
    }

    #[tool(description = "Announcements that are currently showing, highest rank first")]
    async fn current_announcements(
        &self,
        params: Parameters<AtTimeParams>,
    ) -> Result<CallToolResult, McpError> {
        let now = parse_at(params.0.at.as_deref())?;
        self.rendered(self.townsquare.current_announcements(now).await)
    }

    #[tool(description = "Show an offer with its links and count the view")]
    async fn view_offer(
        &self,
        params: Parameters<OfferIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.rendered(self.townsquare.view_offer(params.0.offer_id).await)
    }

    #[tool(description = "Record that a profile clicked, completed or declined an offer")]
    async fn record_offer_action(
        &self,
        params: Parameters<OfferActionParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let what: OfferActionKind = params
            .what
            .parse()
            .map_err(|e| mcp_error(ErrorCode::INVALID_PARAMS, e))?;

        self.rendered(
            self.townsquare
                .record_offer_action(params.profile_id, params.offer_id, what)
                .await,
        )
    }

    #[tool(
        description = "Comments on an activity item with author handle, tip totals, like and flag counts"
    )]
    async fn activity_comments(
        &self,
        params: Parameters<ActivityIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.rendered(self.townsquare.activity_comments(params.0.activity_id).await)
    }

    #[tool(description = "Post a comment on an activity item")]
    async fn post_comment(
        &self,
        params: Parameters<PostCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        self.rendered(
            self.townsquare
                .post_comment(params.profile_id, params.activity_id, &params.comment)
                .await,
        )
    }

    #[tool(description = "Like an activity item")]
    async fn like_activity(
        &self,
        params: Parameters<ReactionParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        self.rendered(
            self.townsquare
                .like_activity(params.profile_id, params.activity_id)
                .await,
        )
    }

    #[tool(description = "Flag an activity item for moderation")]
    async fn flag_activity(
        &self,
        params: Parameters<ReactionParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        self.rendered(
            self.townsquare
                .flag_activity(params.profile_id, params.activity_id)
                .await,
        )
    }

    #[tool(description = "Trust bonus calculation for a user")]
    async fn trust_score(
        &self,
        params: Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.rendered(self.townsquare.trust_score(params.0.user_id).await)
    }
}
