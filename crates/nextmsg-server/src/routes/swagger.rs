//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    BatchRewriteBody, BatchRewriteResponse, ErrorResponse, RewriteBody, VariantResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::rewrite::rewrite,
        super::batch::rewrite_batch,
    ),
    components(
        schemas(
            RewriteBody,
            BatchRewriteBody,
            VariantResponse,
            BatchRewriteResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Rewrite", description = "Relationship-aware message rewriting"),
    ),
    info(
        title = "NextMsg API",
        version = "0.1.0",
        description = "Rewrites a rough draft into three tone variants for a chosen relationship"
    )
)]
pub struct ApiDoc;
