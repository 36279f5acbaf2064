#![forbid(unsafe_code)]

use atelier_contracts::Principal;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::config::DEFAULT_PRINCIPAL_HEADER;
use crate::{
    parse_category_filter, principal_from_header_value, AdapterError, AdapterHealthResponse,
    AddGalleryItemRequest, AddGalleryItemResponse, ClaimOwnerResponse, ContactFormRequest,
    ContactFormResponse, ContactSubmissionView, ContactSubmissionsResponse, GalleryItemView,
    GalleryItemsResponse, OwnerView, SeedGalleryResponse, StudioRuntime,
};

#[derive(Debug, Clone)]
pub struct HttpState {
    pub runtime: StudioRuntime,
    pub principal_header: HeaderName,
}

impl HttpState {
    /// Falls back to the default header when `principal_header` is not a valid header name.
    pub fn new(runtime: StudioRuntime, principal_header: &str) -> Self {
        let principal_header = HeaderName::from_bytes(principal_header.as_bytes())
            .unwrap_or_else(|_| HeaderName::from_static(DEFAULT_PRINCIPAL_HEADER));
        Self {
            runtime,
            principal_header,
        }
    }

    fn caller(&self, headers: &HeaderMap) -> Result<Principal, AdapterError> {
        let raw = match headers.get(&self.principal_header) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                AdapterError::InvalidInput("principal header is not visible ASCII".to_string())
            })?),
        };
        principal_from_header_value(raw)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/owner", get(get_owner))
        .route("/v1/owner/claim", post(claim_owner))
        .route("/v1/submissions", get(list_submissions))
        .route("/v1/contact", post(submit_contact))
        .route("/v1/gallery", get(list_gallery).post(add_gallery_item))
        .route("/v1/gallery/seed", post(seed_gallery))
        .with_state(state)
}

pub async fn healthz(State(state): State<HttpState>) -> Json<AdapterHealthResponse> {
    Json(state.runtime.health_report())
}

pub async fn get_owner(State(state): State<HttpState>) -> Json<OwnerView> {
    Json(OwnerView::from_owner(state.runtime.get_owner().as_ref()))
}

pub async fn claim_owner(
    State(state): State<HttpState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ClaimOwnerResponse>), AdapterError> {
    let caller = state.caller(&headers)?;
    let owner = state.runtime.claim_owner(&caller)?;
    Ok((
        StatusCode::OK,
        Json(ClaimOwnerResponse {
            status: "ok".to_string(),
            outcome: "CLAIMED".to_string(),
            owner: owner.to_string(),
        }),
    ))
}

pub async fn list_submissions(
    State(state): State<HttpState>,
    headers: HeaderMap,
) -> Result<Json<ContactSubmissionsResponse>, AdapterError> {
    let caller = state.caller(&headers)?;
    let rows = state.runtime.list_contact_submissions(&caller)?;
    Ok(Json(ContactSubmissionsResponse {
        status: "ok".to_string(),
        submissions: rows.iter().map(ContactSubmissionView::from).collect(),
    }))
}

pub async fn submit_contact(
    State(state): State<HttpState>,
    Json(request): Json<ContactFormRequest>,
) -> Result<Json<ContactFormResponse>, AdapterError> {
    let id = state
        .runtime
        .submit_contact_form(request.name, request.email, request.message)?;
    Ok(Json(ContactFormResponse {
        status: "ok".to_string(),
        contact_submission_id: id.0,
    }))
}

pub async fn list_gallery(
    State(state): State<HttpState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryItemsResponse>, AdapterError> {
    let category = parse_category_filter(query.category.as_deref())?;
    let rows = state.runtime.list_gallery_items(category);
    Ok(Json(GalleryItemsResponse {
        status: "ok".to_string(),
        items: rows.iter().map(GalleryItemView::from).collect(),
    }))
}

pub async fn add_gallery_item(
    State(state): State<HttpState>,
    Json(request): Json<AddGalleryItemRequest>,
) -> Result<Json<AddGalleryItemResponse>, AdapterError> {
    let input = request.into_input()?;
    let id = state.runtime.add_gallery_item(input)?;
    Ok(Json(AddGalleryItemResponse {
        status: "ok".to_string(),
        gallery_item_id: id.0,
    }))
}

pub async fn seed_gallery(
    State(state): State<HttpState>,
) -> Result<Json<SeedGalleryResponse>, AdapterError> {
    let seeded = state.runtime.seed_initial_gallery_items()?;
    Ok(Json(SeedGalleryResponse {
        status: "ok".to_string(),
        seeded,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::response::IntoResponse;

    fn state() -> HttpState {
        HttpState::new(StudioRuntime::default(), DEFAULT_PRINCIPAL_HEADER)
    }

    fn as_caller(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(DEFAULT_PRINCIPAL_HEADER, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[tokio::test]
    async fn at_http_01_owner_display_before_and_after_claim() {
        let st = state();
        let Json(before) = get_owner(State(st.clone())).await;
        assert_eq!(before.owner, None);
        assert_eq!(before.display, "No owner set yet.");

        let (status, Json(claimed)) = claim_owner(State(st.clone()), as_caller("owner-a"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(claimed.owner, "owner-a");

        let Json(after) = get_owner(State(st)).await;
        assert_eq!(after.owner.as_deref(), Some("owner-a"));
        assert_eq!(after.display, "owner-a");
    }

    #[tokio::test]
    async fn at_http_02_refusals_map_to_status_codes() {
        let st = state();
        let anon = claim_owner(State(st.clone()), HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(anon.into_response().status(), StatusCode::UNAUTHORIZED);

        let unclaimed = list_submissions(State(st.clone()), as_caller("owner-a"))
            .await
            .unwrap_err();
        assert_eq!(unclaimed.outcome_label(), "NO_OWNER_YET");
        assert_eq!(unclaimed.into_response().status(), StatusCode::FORBIDDEN);

        claim_owner(State(st.clone()), as_caller("owner-a"))
            .await
            .unwrap();
        let second = claim_owner(State(st.clone()), as_caller("owner-b"))
            .await
            .unwrap_err();
        assert_eq!(second.into_response().status(), StatusCode::CONFLICT);

        let stranger = list_submissions(State(st), as_caller("owner-b"))
            .await
            .unwrap_err();
        assert_eq!(stranger.outcome_label(), "NOT_OWNER");
    }

    #[tokio::test]
    async fn at_http_03_contact_is_public_and_inbox_is_gated() {
        let st = state();
        submit_contact(
            State(st.clone()),
            Json(ContactFormRequest {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                message: "Pencil portrait, A4.".to_string(),
            }),
        )
        .await
        .unwrap();
        claim_owner(State(st.clone()), as_caller("owner-a"))
            .await
            .unwrap();

        let Json(inbox) = list_submissions(State(st), as_caller("owner-a"))
            .await
            .unwrap();
        assert_eq!(inbox.submissions.len(), 1);
        assert_eq!(inbox.submissions[0].name, "Asha");
    }

    #[tokio::test]
    async fn at_http_04_invalid_principal_header_is_bad_request() {
        let err = claim_owner(State(state()), as_caller("a\tb"))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn at_http_05_gallery_seed_and_filter() {
        let st = state();
        let Json(seed) = seed_gallery(State(st.clone())).await.unwrap();
        assert_eq!(seed.seeded, 6);

        let Json(sketches) = list_gallery(
            State(st.clone()),
            Query(GalleryQuery {
                category: Some("pencilSketch".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(sketches.items.len(), 2);

        let bad = list_gallery(
            State(st),
            Query(GalleryQuery {
                category: Some("oil".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn at_http_06_gallery_add_needs_no_principal_and_health_has_no_path() {
        let st = state();
        let Json(added) = add_gallery_item(
            State(st.clone()),
            Json(AddGalleryItemRequest {
                title: "Harbour at Dusk".to_string(),
                category: "customOrders".to_string(),
                description: String::new(),
                image_url: "/assets/harbour.jpg".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(added.gallery_item_id, 1);

        let Json(health) = healthz(State(st)).await;
        assert_eq!(health.gallery_items, 1);
        assert!(!health.owner_claimed);
    }
}
