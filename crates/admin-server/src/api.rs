use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{
        IntoResponse, Json, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::{sync::Arc, time::Duration};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

use application::files::Upload;
use application::playlist::PlaylistRequest;
use domain::DomainError;
use domain::playlist::PlaylistId;
use domain::storage::StoragePath;
use domain::template::{TemplateDraft, TemplateId};
use domain::tv::{Tv, TvId, TvStatus};

use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// JSON error body `{ "error": message, "kind": kind }`
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::InvalidConfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(kind = self.0.kind(), "Request failed: {}", self.0);
        }
        (
            status,
            Json(json!({ "error": self.0.to_string(), "kind": self.0.kind() })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn create_router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Registry
        .route("/api/tvs", get(list_tvs).post(register_tv))
        .route("/api/tvs/{id}", get(get_tv).delete(remove_tv))
        .route(
            "/api/tvs/{id}/playlist",
            put(assign_playlist).delete(unassign_playlist),
        )
        // Content
        .route("/api/media", get(list_media))
        .route("/api/playlists", get(list_playlists).post(create_playlist))
        .route(
            "/api/playlists/{id}",
            get(get_playlist).put(update_playlist).delete(delete_playlist),
        )
        .route("/api/playlists/{id}/activate", post(activate_playlist))
        .route("/api/playlists/{id}/deactivate", post(deactivate_playlist))
        // Files
        .route("/api/files", get(list_files).delete(delete_file))
        .route("/api/files/folders", post(create_folder))
        .route(
            "/api/files/upload",
            post(upload_files).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Templates
        .route("/api/templates", get(list_templates).post(create_template))
        .route(
            "/api/templates/{id}",
            get(get_template).delete(delete_template),
        )
        .route("/api/events", get(sse_handler))
        // TV clients
        .route("/content/{tv_id}", get(tv_content))
        .route("/heartbeat/{tv_id}", post(heartbeat))
        .route("/files/{*path}", get(serve_file))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(format!("{}/index.html", dir))),
        ),
        None => router,
    };

    router.with_state(state)
}

// --- Registry ---

/// TV as shown in the admin panel
#[derive(Debug, Serialize)]
struct TvView {
    id: TvId,
    name: String,
    location: String,
    status: TvStatus,
    last_seen: String,
    last_seen_at: Option<DateTime<Utc>>,
    playlist_id: Option<PlaylistId>,
}

impl TvView {
    fn new(tv: &Tv, playlist_id: Option<PlaylistId>) -> Self {
        Self {
            id: tv.id().clone(),
            name: tv.name.clone(),
            location: tv.location.clone(),
            status: tv.status(),
            last_seen: tv.last_seen_label(),
            last_seen_at: tv.last_seen(),
            playlist_id,
        }
    }
}

#[derive(Deserialize)]
struct RegisterTvRequest {
    name: String,
    location: String,
}

#[derive(Deserialize)]
struct AssignRequest {
    playlist_id: PlaylistId,
}

fn tv_id(raw: &str) -> ApiResult<TvId> {
    Ok(TvId::new(raw)?)
}

fn playlist_id(raw: &str) -> ApiResult<PlaylistId> {
    Ok(PlaylistId::new(raw)?)
}

async fn list_tvs(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let playing: HashMap<TvId, PlaylistId> = state
        .playlists
        .assignments()
        .await?
        .into_iter()
        .map(|a| (a.tv_id, a.playlist_id))
        .collect();

    let tvs: Vec<TvView> = state
        .registry
        .list()
        .await?
        .iter()
        .map(|tv| TvView::new(tv, playing.get(tv.id()).cloned()))
        .collect();
    Ok(Json(tvs))
}

async fn register_tv(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterTvRequest>,
) -> ApiResult<impl IntoResponse> {
    let tv = state.registry.register(&req.name, &req.location).await?;
    Ok((StatusCode::CREATED, Json(TvView::new(&tv, None))))
}

async fn get_tv(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let id = tv_id(&id)?;
    let tv = state.registry.get(&id).await?;
    let playing = state
        .playlists
        .assignments()
        .await?
        .into_iter()
        .find(|a| a.tv_id == id)
        .map(|a| a.playlist_id);
    Ok(Json(TvView::new(&tv, playing)))
}

async fn remove_tv(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.registry.remove(&tv_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .playlists
        .assign(&tv_id(&id)?, &req.playlist_id)
        .await?;
    Ok(Json(playlist))
}

async fn unassign_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.playlists.unassign(&tv_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Content ---

async fn list_media(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.list_media().await?))
}

async fn list_playlists(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.list().await?))
}

async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state.playlists.create(req).await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

async fn get_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.get(&playlist_id(&id)?).await?))
}

async fn update_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.update(&playlist_id(&id)?, req).await?))
}

async fn delete_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.playlists.delete(&playlist_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn activate_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.activate(&playlist_id(&id)?).await?))
}

async fn deactivate_playlist(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.deactivate(&playlist_id(&id)?).await?))
}

// --- Files ---

#[derive(Deserialize)]
struct FolderQuery {
    #[serde(default)]
    path: Option<String>,
}

impl FolderQuery {
    fn dir(&self) -> ApiResult<StoragePath> {
        Ok(StoragePath::parse(self.path.as_deref().unwrap_or("/"))?)
    }
}

#[derive(Deserialize)]
struct CreateFolderRequest {
    #[serde(default)]
    path: Option<String>,
    name: String,
}

#[derive(Deserialize)]
struct DeleteFileQuery {
    #[serde(default)]
    path: Option<String>,
    name: String,
}

async fn list_files(
    Query(query): Query<FolderQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.files.list(&query.dir()?).await?))
}

async fn create_folder(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<impl IntoResponse> {
    let dir = StoragePath::parse(req.path.as_deref().unwrap_or("/"))?;
    let entry = state.files.create_folder(&dir, &req.name).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn upload_files(
    Query(query): Query<FolderQuery>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let dir = query.dir()?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::Validation(format!("Malformed upload: {}", e)))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            // Plain form fields carry no payload
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| DomainError::Validation(format!("Malformed upload: {}", e)))?;
        uploads.push(Upload { name, data });
    }

    let entries = state.files.upload(&dir, uploads).await?;
    Ok((StatusCode::CREATED, Json(entries)))
}

async fn delete_file(
    Query(query): Query<DeleteFileQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let dir = StoragePath::parse(query.path.as_deref().unwrap_or("/"))?;
    state.files.delete(&dir, &query.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Templates ---

async fn list_templates(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.templates.list().await?))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TemplateDraft>,
) -> ApiResult<impl IntoResponse> {
    let template = state.templates.create(draft).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn get_template(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.templates.get(&TemplateId::new(id)).await?))
}

async fn delete_template(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.templates.delete(&TemplateId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Events ---

async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.events.subscribe();
    let stream = BroadcastStream::new(rx).map(|msg| match msg {
        Ok(event) => Event::default().event(event.event_type()).json_data(&event),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            Ok(Event::default().comment(format!("lagged, {} events skipped", skipped)))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

// --- TV clients ---

async fn tv_content(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.content_for(&tv_id(&id)?).await?))
}

async fn heartbeat(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.registry.heartbeat(&tv_id(&id)?, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn serve_file(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let path = StoragePath::parse(&path)?;
    let (data, content_type) = state.files.read(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
