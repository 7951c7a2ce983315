use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use crate::{
    AppState,
    error::{AppError, AppResult, StoreContext},
    extract::MovieForm,
    models::MovieId,
    store::MovieFilter,
    templates,
};

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.store.find_all().await.context("Error fetching movies")?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id_or_title): Path<String>,
) -> AppResult<Html<String>> {
    let filter = MovieFilter::from_id_or_title(&id_or_title);
    let movie = state
        .store
        .find_one(filter)
        .await
        .context("Error retrieving movie")?
        .ok_or(AppError::NotFound)?;
    Ok(Html(templates::movie_page(&movie)))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_movie_page())
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    form: MovieForm,
) -> AppResult<Response> {
    const CONTEXT: &str = "Error adding movie";
    let fields = form.fields(CONTEXT)?;
    let movie = state.store.insert(fields).await.context(CONTEXT)?;
    tracing::info!(id = %movie.id, title = %movie.title, "movie added");
    Ok(redirect_home())
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = MovieId::parse(&id).ok_or(AppError::NotFound)?;
    let movie = state
        .store
        .find_by_id(&id)
        .await
        .context("Error fetching movie for editing")?
        .ok_or(AppError::NotFound)?;
    Ok(Html(templates::edit_movie_page(&movie)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    form: MovieForm,
) -> AppResult<Response> {
    const CONTEXT: &str = "Error updating movie";
    let id = MovieId::parse(&id).ok_or(AppError::NotFound)?;
    let fields = form.fields(CONTEXT)?;
    let movie = state
        .store
        .update_by_id(&id, fields)
        .await
        .context(CONTEXT)?
        .ok_or(AppError::NotFound)?;
    tracing::info!(id = %movie.id, title = %movie.title, "movie updated");
    Ok(redirect_home())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    // A malformed id cannot name a stored movie, so there is nothing to remove.
    if let Some(id) = MovieId::parse(&id) {
        state.store.delete_by_id(&id).await.context("Error deleting movie")?;
        tracing::info!(%id, "movie deleted");
    }
    Ok(redirect_home())
}

fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, models::Movie, store::MovieStore};

    fn state_with(store: MovieStore) -> Arc<AppState> {
        let config = Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "sqlite::memory:".to_string(),
            public_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
        };
        Arc::new(AppState { config: Arc::new(config), store })
    }

    async fn test_app() -> (Router, MovieStore) {
        let db = crate::db::connect_and_migrate("sqlite::memory:").await.unwrap();
        let state = state_with(MovieStore::new(db));
        let store = state.store.clone();
        (crate::app(state), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn error_msg(resp: Response) -> String {
        let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        body["msg"].as_str().unwrap().to_string()
    }

    fn assert_redirects_home(resp: &Response) {
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/");
    }

    async fn only_movie(store: &MovieStore) -> Movie {
        let mut all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        all.remove(0)
    }

    #[tokio::test]
    async fn empty_list_renders() {
        let (app, _) = test_app().await;
        let resp = send(&app, get("/")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("No movies yet."));
    }

    #[tokio::test]
    async fn form_submission_adds_exactly_one_movie() {
        let (app, store) = test_app().await;
        let resp = send(
            &app,
            post_form("/", "Title=Inception&Poster=p.jpg&Released=2010&Metascore=74"),
        )
        .await;
        assert_redirects_home(&resp);

        let movie = only_movie(&store).await;
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.poster.as_deref(), Some("p.jpg"));
        assert_eq!(movie.released.as_deref(), Some("2010"));
        assert_eq!(movie.metascore, Some(74.0));

        let html = body_text(send(&app, get("/")).await).await;
        assert!(html.contains("Inception"));
        assert!(html.contains(movie.id.as_str()));
    }

    #[tokio::test]
    async fn json_submission_is_accepted() {
        let (app, store) = test_app().await;
        let body = serde_json::json!({"Title": "Heat", "Released": 1995, "Metascore": 76});
        assert_redirects_home(&send(&app, post_json("/", body)).await);

        let movie = only_movie(&store).await;
        assert_eq!(movie.released.as_deref(), Some("1995"));
        assert_eq!(movie.metascore, Some(76.0));
    }

    #[tokio::test]
    async fn unsavable_submission_is_a_route_failure() {
        let (app, store) = test_app().await;

        let resp = send(&app, post_form("/", "Poster=p.jpg")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_msg(resp).await, "Error adding movie: Title is required.");

        let resp = send(&app, post_form("/", "Title=X&Metascore=great")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_msg(resp).await, "Error adding movie: Metascore must be a number.");

        let resp = send(&app, post_json("/", serde_json::json!(["not", "a", "movie"]))).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_msg(resp).await.starts_with("Error adding movie: "));

        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fractional_metascore_is_saved() {
        let (app, store) = test_app().await;
        let resp = send(&app, post_form("/", "Title=Inception&Metascore=74.5")).await;
        assert_redirects_home(&resp);
        assert_eq!(only_movie(&store).await.metascore, Some(74.5));
    }

    #[tokio::test]
    async fn title_is_stored_as_submitted() {
        let (app, store) = test_app().await;
        send(&app, post_form("/", "Title=+Inception")).await;
        assert_eq!(only_movie(&store).await.title, " Inception");

        let resp = send(&app, get("/movies/%20Inception")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_update_body_is_reported_with_update_message() {
        let (app, store) = test_app().await;
        send(&app, post_form("/", "Title=Heat")).await;
        let id = only_movie(&store).await.id;

        let resp = send(&app, post_form(&format!("/movies/{id}"), "Poster=p.jpg")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_msg(resp).await, "Error updating movie: Title is required.");
        assert_eq!(only_movie(&store).await.title, "Heat");
    }

    #[tokio::test]
    async fn unknown_id_wins_over_bad_update_body() {
        let (app, _) = test_app().await;
        let uri = format!("/movies/{}", MovieId::generate());
        let resp = send(&app, post_form(&uri, "Metascore=great")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = send(&app, post_form("/movies/not-an-id", "Poster=p.jpg")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_form_renders() {
        let (app, _) = test_app().await;
        let resp = send(&app, get("/add")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Add a Movie"));
    }

    #[tokio::test]
    async fn lookup_by_title_with_spaces() {
        let (app, _) = test_app().await;
        send(&app, post_form("/", "Title=The+Matrix")).await;

        let resp = send(&app, get("/movies/The%20Matrix")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("The Matrix"));

        let resp = send(&app, get("/movies/The%20Matrix%20Reloaded")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_msg(resp).await, "Movie not found.");
    }

    #[tokio::test]
    async fn id_shaped_lookup_never_falls_back_to_title() {
        let (app, _) = test_app().await;
        send(&app, post_form("/", "Title=507f1f77bcf86cd799439011")).await;

        let resp = send(&app, get("/movies/507f1f77bcf86cd799439011")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn repeated_listing_is_stable() {
        let (app, _) = test_app().await;
        send(&app, post_form("/", "Title=Alien")).await;
        send(&app, post_form("/", "Title=Aliens")).await;

        let first = body_text(send(&app, get("/")).await).await;
        let second = body_text(send(&app, get("/")).await).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn edit_form_is_prefilled() {
        let (app, store) = test_app().await;
        send(&app, post_form("/", "Title=Heat&Metascore=76")).await;
        let movie = only_movie(&store).await;

        let resp = send(&app, get(&format!("/movies/edit/{}", movie.id))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("value=\"Heat\""));
        assert!(html.contains("value=\"76\""));
    }

    #[tokio::test]
    async fn edit_form_of_unknown_or_malformed_id_is_404() {
        let (app, _) = test_app().await;
        let resp = send(&app, get(&format!("/movies/edit/{}", MovieId::generate()))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = send(&app, get("/movies/edit/not-an-id")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_404() {
        let (app, _) = test_app().await;
        let uri = format!("/movies/{}", MovieId::generate());
        let resp = send(&app, post_form(&uri, "Title=Ghost")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_still_redirects() {
        let (app, _) = test_app().await;
        let resp = send(&app, get(&format!("/movies/delete/{}", MovieId::generate()))).await;
        assert_redirects_home(&resp);
        assert_redirects_home(&send(&app, get("/movies/delete/whatever")).await);
    }

    #[tokio::test]
    async fn inception_lifecycle() {
        let (app, store) = test_app().await;

        let resp = send(
            &app,
            post_form("/", "Title=Inception&Poster=p.jpg&Released=2010&Metascore=74"),
        )
        .await;
        assert_redirects_home(&resp);
        assert!(body_text(send(&app, get("/")).await).await.contains("Inception"));

        let resp = send(&app, get("/movies/Inception")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("74"));

        let id = only_movie(&store).await.id;
        let uri = format!("/movies/{id}");
        assert_redirects_home(&send(&app, post_form(&uri, "Title=Inception&Metascore=80")).await);

        let updated = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(updated.metascore, Some(80.0));
        assert_eq!(updated.poster, None);
        assert_eq!(updated.released, None);

        assert_redirects_home(&send(&app, get(&format!("/movies/delete/{id}"))).await);
        let resp = send(&app, get(&uri)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_is_500_with_message() {
        let app = crate::app(state_with(MovieStore::disconnected()));
        let id = MovieId::generate();

        let cases = [
            (get("/"), "Error fetching movies: "),
            (get("/movies/Inception"), "Error retrieving movie: "),
            (get(&format!("/movies/{id}")), "Error retrieving movie: "),
            (post_form("/", "Title=Heat"), "Error adding movie: "),
            (get(&format!("/movies/edit/{id}")), "Error fetching movie for editing: "),
            (post_form(&format!("/movies/{id}"), "Title=Heat"), "Error updating movie: "),
            (get(&format!("/movies/delete/{id}")), "Error deleting movie: "),
        ];

        for (req, prefix) in cases {
            let resp = send(&app, req).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{prefix}");
            let msg = error_msg(resp).await;
            assert!(msg.starts_with(prefix), "{msg}");
        }
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let (app, _) = test_app().await;
        let resp = send(&app, get("/css/style.css")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains(".movie"));
    }
}
