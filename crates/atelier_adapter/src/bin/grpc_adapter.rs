#![forbid(unsafe_code)]

use atelier_adapter::config::{init_logging, AdapterConfig};
use atelier_adapter::grpc_api::{
    studio_adapter_server::{StudioAdapter, StudioAdapterServer},
    AddGalleryItemRequest, AddGalleryItemResponse, ClaimOwnerRequest, ClaimOwnerResponse,
    ContactSubmission, GalleryItem, GetOwnerRequest, GetOwnerResponse,
    ListContactSubmissionsRequest, ListContactSubmissionsResponse, ListGalleryItemsRequest,
    ListGalleryItemsResponse, SeedGalleryItemsRequest, SeedGalleryItemsResponse,
    SubmitContactFormRequest, SubmitContactFormResponse,
};
use atelier_adapter::{
    owner_display, parse_category_filter, principal_from_header_value, AdapterError,
    AddGalleryItemRequest as AdapterAddGalleryItemRequest, StudioRuntime,
};
use atelier_contracts::Principal;
use tonic::{transport::Server, Request, Response, Status};

#[derive(Clone)]
struct GrpcStudioAdapter {
    runtime: StudioRuntime,
    principal_key: String,
}

impl GrpcStudioAdapter {
    fn caller<T>(&self, request: &Request<T>) -> Result<Principal, Status> {
        let raw = match request.metadata().get(self.principal_key.as_str()) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                Status::invalid_argument("principal metadata is not visible ASCII")
            })?),
        };
        Ok(principal_from_header_value(raw)?)
    }
}

#[tonic::async_trait]
impl StudioAdapter for GrpcStudioAdapter {
    async fn get_owner(
        &self,
        _request: Request<GetOwnerRequest>,
    ) -> Result<Response<GetOwnerResponse>, Status> {
        let owner = self.runtime.get_owner();
        Ok(Response::new(GetOwnerResponse {
            display: owner_display(owner.as_ref()),
            owner: owner.map(|p| p.to_string()),
        }))
    }

    async fn claim_owner(
        &self,
        request: Request<ClaimOwnerRequest>,
    ) -> Result<Response<ClaimOwnerResponse>, Status> {
        let caller = self.caller(&request)?;
        let owner = self.runtime.claim_owner(&caller)?;
        Ok(Response::new(ClaimOwnerResponse {
            owner: owner.to_string(),
        }))
    }

    async fn list_contact_submissions(
        &self,
        request: Request<ListContactSubmissionsRequest>,
    ) -> Result<Response<ListContactSubmissionsResponse>, Status> {
        let caller = self.caller(&request)?;
        let rows = self.runtime.list_contact_submissions(&caller)?;
        Ok(Response::new(ListContactSubmissionsResponse {
            submissions: rows
                .into_iter()
                .map(|row| ContactSubmission {
                    id: row.contact_submission_id.0,
                    name: row.name,
                    email: row.email,
                    message: row.message,
                    timestamp_ns: row.submitted_at.0,
                })
                .collect(),
        }))
    }

    async fn submit_contact_form(
        &self,
        request: Request<SubmitContactFormRequest>,
    ) -> Result<Response<SubmitContactFormResponse>, Status> {
        let req = request.into_inner();
        let id = self
            .runtime
            .submit_contact_form(req.name, req.email, req.message)?;
        Ok(Response::new(SubmitContactFormResponse {
            contact_submission_id: id.0,
        }))
    }

    async fn list_gallery_items(
        &self,
        request: Request<ListGalleryItemsRequest>,
    ) -> Result<Response<ListGalleryItemsResponse>, Status> {
        let req = request.into_inner();
        let category = parse_category_filter(Some(req.category.as_str()))?;
        let rows = self.runtime.list_gallery_items(category);
        Ok(Response::new(ListGalleryItemsResponse {
            items: rows
                .into_iter()
                .map(|row| GalleryItem {
                    id: row.gallery_item_id.0,
                    title: row.title,
                    category: row.category.as_str().to_string(),
                    description: row.description,
                    image_url: row.image_url,
                })
                .collect(),
        }))
    }

    async fn add_gallery_item(
        &self,
        request: Request<AddGalleryItemRequest>,
    ) -> Result<Response<AddGalleryItemResponse>, Status> {
        let req = request.into_inner();
        let input = AdapterAddGalleryItemRequest {
            title: req.title,
            category: req.category,
            description: req.description,
            image_url: req.image_url,
        }
        .into_input()?;
        let id = self.runtime.add_gallery_item(input)?;
        Ok(Response::new(AddGalleryItemResponse {
            gallery_item_id: id.0,
        }))
    }

    async fn seed_gallery_items(
        &self,
        _request: Request<SeedGalleryItemsRequest>,
    ) -> Result<Response<SeedGalleryItemsResponse>, Status> {
        let seeded = self
            .runtime
            .seed_initial_gallery_items()
            .map_err(Status::from)?;
        Ok(Response::new(SeedGalleryItemsResponse { seeded }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdapterConfig::from_env();
    init_logging(config.log_format);

    let runtime = StudioRuntime::from_config(&config).map_err(|err: AdapterError| {
        tracing::error!(error = %err, "studio runtime failed to start");
        err
    })?;
    let service = GrpcStudioAdapter {
        runtime,
        principal_key: config.principal_header.clone(),
    };

    let addr = config.grpc_bind;
    tracing::info!(
        %addr,
        store_path = %config.store_path.display(),
        "atelier_adapter_grpc listening"
    );
    Server::builder()
        .add_service(StudioAdapterServer::new(service))
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    tracing::info!("atelier_adapter_grpc stopped");
    Ok(())
}
