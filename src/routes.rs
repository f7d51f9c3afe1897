// src/routes.rs
use log::info;
use std::convert::Infallible;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::fundamentals::get_fundamentals;
use crate::handlers::stock::get_stock;
use crate::handlers::AppState;

// Render every rejection as a JSON error body
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found";
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = &api_error.message;
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed";
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error";
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn cors(origins: &[String]) -> warp::cors::Builder {
    warp::cors()
        .allow_origins(origins.iter().map(String::as_str))
        .allow_header("content-type")
        .allow_methods(vec!["GET"])
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let stock_route = warp::path!("api" / "stock" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_stock);

    let fundamentals_route = warp::path!("api" / "fundamentals" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_fundamentals);

    info!("All routes configured successfully.");

    stock_route
        .or(fundamentals_route)
        .recover(handle_rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::FetchResult;
    use crate::services::quote::tests::{bar, FakeProvider};
    use crate::services::registry::RegistrySource;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct NoRegistry;

    #[async_trait]
    impl RegistrySource for NoRegistry {
        async fn issuer_page(&self, _id: &str) -> FetchResult<String> {
            Ok("<p>no table</p>".to_string())
        }
    }

    fn state(info: Option<Value>) -> AppState {
        AppState {
            provider: Arc::new(FakeProvider {
                info,
                bars: Ok(vec![bar(1714633200, 100.0), bar(1714633320, 101.0)]),
            }),
            registry: Arc::new(NoRegistry),
            reference_tz: chrono_tz::Europe::Stockholm,
        }
    }

    fn body(resp: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
        serde_json::from_slice(resp.body()).unwrap()
    }

    #[tokio::test]
    async fn stock_route_returns_quote() {
        let api = routes(state(Some(json!({"longName": "Volvo AB", "currentPrice": 102.0}))));
        let resp = warp::test::request()
            .method("GET")
            .path("/api/stock/VOLV-B.ST")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 200);
        let value = body(&resp);
        assert_eq!(value["companyName"], json!("Volvo AB"));
        assert_eq!(value["percentChange"], json!(2.0));
        assert_eq!(value["lastUpdated"], json!("2024-05-02 09:02:00"));
        assert!(value["fetchTime"].is_string());
        assert!(value.get("openPrice").is_none());
    }

    #[tokio::test]
    async fn provider_failure_is_a_json_500() {
        let api = routes(state(None));
        let resp = warp::test::request()
            .method("GET")
            .path("/api/stock/ZZZZ")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 500);
        assert_eq!(body(&resp), json!({"error": "Quote not found for symbol: ZZZZ"}));
    }

    #[tokio::test]
    async fn history_failure_is_a_json_500() {
        let state = AppState {
            provider: Arc::new(FakeProvider {
                info: Some(json!({"longName": "Volvo AB", "currentPrice": 102.0})),
                bars: Err(503),
            }),
            registry: Arc::new(NoRegistry),
            reference_tz: chrono_tz::Europe::Stockholm,
        };
        let resp = warp::test::request()
            .method("GET")
            .path("/api/stock/VOLV-B.ST")
            .reply(&routes(state))
            .await;

        assert_eq!(resp.status(), 500);
        assert_eq!(body(&resp), json!({"error": "upstream returned status 503"}));
    }

    #[tokio::test]
    async fn fundamentals_route_degrades_short_selling() {
        let api = routes(state(Some(json!({"marketCap": 5.0e9, "priceToBook": 0.9}))));
        let resp = warp::test::request()
            .method("GET")
            .path("/api/fundamentals/SBB-B.ST")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 200);
        let value = body(&resp);
        assert_eq!(value["marketCap"], json!(5.0e9));
        assert_eq!(value["pbRatio"], json!(0.9));
        assert_eq!(value["trailingPE"], json!("N/A"));
        assert_eq!(value["shortSelling"], json!("N/A"));
    }

    #[tokio::test]
    async fn encoded_ticker_is_decoded() {
        let api = routes(state(None));
        let resp = warp::test::request()
            .method("GET")
            .path("/api/fundamentals/%5EOMX")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), 500);
        assert_eq!(body(&resp), json!({"error": "Quote not found for symbol: ^OMX"}));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let api = routes(state(None));
        let resp = warp::test::request().method("GET").path("/api/bonds").reply(&api).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body(&resp), json!({"error": "Not Found"}));
    }
}
