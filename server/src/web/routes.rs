use crate::web::pages;
use f1core::prelude::{lookup_driver, FetchOutcome, LookupMetrics, RacingData, Refresh};
use f1core::sessions::SessionKey;
use f1core::{TyreBoard, TyreChart};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::{StatusCode, Uri};
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn RacingData>,
    metrics: Arc<LookupMetrics>,
}

impl AppState {
    pub fn new(source: Arc<dyn RacingData>) -> Self {
        Self {
            source,
            metrics: Arc::new(LookupMetrics::new()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TyreQuery {
    #[serde(default)]
    pub grand_prix: Option<String>,
}

#[derive(Serialize)]
struct TyreResponse<'a> {
    grand_prix: &'a str,
    session_key: SessionKey,
    #[serde(flatten)]
    chart: TyreChart,
}

/// Canonical profile path for the raw `/racer/{n}` segment, kept verbatim.
pub fn canonical_driver_path(raw: &str) -> String {
    format!("/racers/{raw}")
}

fn html(body: String, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::html(body), status).into_response()
}

fn not_found() -> Response {
    html(pages::not_found(), StatusCode::NOT_FOUND)
}

fn json_status<T: Serialize>(value: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}

fn legacy_redirect(full: FullPath) -> Response {
    let raw = full
        .as_str()
        .strip_prefix("/racer/")
        .unwrap_or_default()
        .trim_end_matches('/');
    match canonical_driver_path(raw).parse::<Uri>() {
        Ok(location) => warp::redirect::temporary(location).into_response(),
        Err(err) => {
            warn!("cannot redirect {}: {err}", full.as_str());
            not_found()
        }
    }
}

async fn driver_profile(raw: String, state: AppState) -> Result<Response, Rejection> {
    let outcome = lookup_driver(state.source.as_ref(), &raw).await;
    state.metrics.record(&outcome);
    let response = match outcome {
        FetchOutcome::Found(driver) => html(pages::driver_card(&driver), StatusCode::OK),
        FetchOutcome::NotFound => not_found(),
        FetchOutcome::TransportError(err) => {
            error!("failed to load driver page for {raw:?}: {err}");
            not_found()
        }
    };
    Ok(response)
}

/// Loads the board for the submitted name. An empty name skips the fetch.
async fn load_board(query: TyreQuery, state: &AppState) -> (TyreBoard, Option<Refresh>) {
    let mut board = TyreBoard::new();
    board.set_grand_prix(query.grand_prix.unwrap_or_default());
    if board.grand_prix().trim().is_empty() {
        return (board, None);
    }
    let refresh = board.refresh(state.source.as_ref()).await;
    (board, Some(refresh))
}

async fn tyre_page(query: TyreQuery, state: AppState) -> Result<Response, Rejection> {
    let (board, refresh) = load_board(query, &state).await;
    match refresh {
        Some(Refresh::Loaded(session)) => info!(
            "session {session}: {} drivers over {} laps",
            board.drivers().len(),
            board.total_laps()
        ),
        Some(Refresh::Failed(session, err)) => {
            error!("failed to load stints for session {session}: {err}")
        }
        Some(Refresh::Unresolved) | None => {}
    }
    let chart = board.chart();
    Ok(html(pages::tyre_page(&board, chart.as_ref()), StatusCode::OK))
}

async fn tyre_api(query: TyreQuery, state: AppState) -> Result<Response, Rejection> {
    let (board, refresh) = load_board(query, &state).await;
    let response = match refresh {
        Some(Refresh::Loaded(session_key)) => json_status(
            &TyreResponse {
                grand_prix: board.grand_prix().trim(),
                session_key,
                chart: board.chart().unwrap_or_default(),
            },
            StatusCode::OK,
        ),
        Some(Refresh::Failed(session, err)) => {
            error!("failed to load stints for session {session}: {err}");
            json_status(
                &json!({"error": format!("upstream unavailable: {err}")}),
                StatusCode::BAD_GATEWAY,
            )
        }
        Some(Refresh::Unresolved) | None => json_status(
            &json!({"error": "unknown Grand Prix"}),
            StatusCode::NOT_FOUND,
        ),
    };
    Ok(response)
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    if rejection.is_not_found() {
        return Ok(not_found());
    }
    warn!("unhandled rejection: {rejection:?}");
    Ok(warp::reply::with_status("bad request", StatusCode::BAD_REQUEST).into_response())
}

pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let metrics = state.metrics.clone();
    let state_filter = warp::any().map(move || state.clone());

    let legacy = warp::path("racer")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::path::full())
        .map(|_: String, full: FullPath| legacy_redirect(full));

    let profile = warp::path("racers")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(driver_profile);

    let tyre = warp::path("tyre")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<TyreQuery>())
        .and(state_filter.clone())
        .and_then(tyre_page);

    let api = warp::path!("api" / "tyre")
        .and(warp::get())
        .and(warp::query::<TyreQuery>())
        .and(state_filter)
        .and_then(tyre_api);

    let health = warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || {
            json_status(
                &json!({"status": "ok", "driver_lookups": metrics.snapshot()}),
                StatusCode::OK,
            )
        });

    legacy
        .or(profile)
        .unify()
        .or(tyre)
        .unify()
        .or(api)
        .unify()
        .or(health)
        .unify()
        .recover(handle_rejection)
        .unify()
        .with(warp::log("dashboard"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use f1core::model::{Compound, Driver, DriverNumber, Stint};
    use f1core::prelude::{DriverSource, StintSource, UpstreamError};
    use f1core::upstream::FixtureSource;

    struct Offline;

    #[async_trait]
    impl DriverSource for Offline {
        async fn driver_by_number(&self, _number: DriverNumber) -> FetchOutcome<Driver> {
            FetchOutcome::TransportError(UpstreamError::Status(503))
        }
    }

    #[async_trait]
    impl StintSource for Offline {
        async fn stints_for_session(&self, _session: SessionKey) -> FetchOutcome<Vec<Stint>> {
            FetchOutcome::TransportError(UpstreamError::Status(503))
        }
    }

    fn fixture_state() -> AppState {
        let fixture = FixtureSource::default()
            .with_driver(Driver {
                driver_number: 44,
                full_name: "Lewis HAMILTON".into(),
                broadcast_name: "L HAMILTON".into(),
                country_code: "GBR".into(),
                team_name: "Mercedes".into(),
                team_colour: Some("27F4D2".into()),
                headshot_url: None,
                first_name: None,
                last_name: Some("Hamilton".into()),
                name_acronym: None,
            })
            .with_session(
                SessionKey(9523),
                vec![
                    Stint::new(1, 1, 10, Compound::Soft),
                    Stint::new(1, 10, 20, Compound::Hard),
                ],
            );
        AppState::new(Arc::new(fixture))
    }

    #[tokio::test]
    async fn legacy_path_redirects_to_canonical_profile() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/racer/44")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()["location"], "/racers/44");
    }

    #[tokio::test]
    async fn legacy_redirect_keeps_parameter_verbatim() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/racer/abc")
            .reply(&filter)
            .await;
        assert_eq!(res.headers()["location"], "/racers/abc");
    }

    #[tokio::test]
    async fn profile_renders_known_driver() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/racers/44")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("Lewis HAMILTON"));
    }

    #[tokio::test]
    async fn invalid_or_unknown_drivers_are_not_found() {
        let filter = routes(fixture_state());
        for path in ["/racers/0", "/racers/-1", "/racers/abc", "/racers/33"] {
            let res = warp::test::request().path(path).reply(&filter).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn upstream_failure_reads_as_not_found_and_is_counted() {
        let state = AppState::new(Arc::new(Offline));
        let metrics = state.metrics.clone();
        let filter = routes(state);
        let res = warp::test::request()
            .path("/racers/44")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(metrics.snapshot().transport_errors, 1);
    }

    #[tokio::test]
    async fn tyre_page_renders_chart_for_known_grand_prix() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/tyre?grand_prix=monaco")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("<svg"));
        assert!(body.contains("#1: SOFT (9 laps)"));

        let res = warp::test::request().path("/tyre").reply(&filter).await;
        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(!body.contains("<svg"));
    }

    #[tokio::test]
    async fn tyre_api_returns_chart_rows() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/api/tyre?grand_prix=Monaco")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(value["session_key"], 9523);
        assert_eq!(value["total_laps"], 20);
        assert_eq!(value["data"][0], json!({"driver": "#1", "seg0": 9, "seg1": 10}));
        assert_eq!(value["segmentColors"]["seg0"], json!(["#ff2d55"]));
        assert_eq!(value["segmentColors"]["seg1"], json!(["#ffffff"]));
    }

    #[tokio::test]
    async fn tyre_api_distinguishes_unknown_name_and_upstream_failure() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/api/tyre?grand_prix=Nowhere")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let filter = routes(AppState::new(Arc::new(Offline)));
        let res = warp::test::request()
            .path("/api/tyre?grand_prix=Monaco")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn unknown_paths_render_not_found_page() {
        let filter = routes(fixture_state());
        let res = warp::test::request()
            .path("/paddock")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = warp::test::request().path("/healthz").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
