/// API server for the emission predictor

use axum::{
    extract::State,
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use emission_ml::{
    types::{PredictInput, PredictOutput, TrainInput, TrainOutput},
    EmissionPredictor,
};

#[derive(Clone)]
struct AppState {
    predictor: std::sync::Arc<tokio::sync::Mutex<EmissionPredictor>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = AppState {
        predictor: std::sync::Arc::new(tokio::sync::Mutex::new(EmissionPredictor::default())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/train", post(train))
        .route("/api/predict", post(predict))
        .layer(cors)
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://0.0.0.0:8000");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Emission ML API (Rust)",
        "version": "0.1.0"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn train(
    State(state): State<AppState>,
    Json(input): Json<TrainInput>,
) -> Result<Json<TrainOutput>, String> {
    tracing::info!(
        "Train request: {} samples, {} targets",
        input.features.len(),
        input.targets.len()
    );

    let (features, targets) = input.to_arrays().map_err(|e| e.to_string())?;

    let mut predictor = state.predictor.lock().await;

    // A fresh predictor when the request overrides the forest parameters
    if input.n_trees.is_some() || input.seed.is_some() {
        let n_trees = input.n_trees.unwrap_or(predictor.n_trees());
        *predictor = match input.seed {
            Some(seed) => EmissionPredictor::with_seed(n_trees, seed),
            None => EmissionPredictor::new(n_trees),
        };
    }

    predictor
        .train(&features, &targets)
        .map_err(|e| format!("Training error: {}", e))?;

    Ok(Json(TrainOutput {
        n_samples: features.nrows(),
        n_features: features.ncols(),
        n_trees: predictor.n_trees(),
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(input): Json<PredictInput>,
) -> Result<Json<PredictOutput>, String> {
    tracing::info!("Predict request: {} samples", input.features.len());

    let features = input.to_matrix().map_err(|e| e.to_string())?;

    let predictor = state.predictor.lock().await;
    match predictor.predict(&features) {
        Ok(predictions) => Ok(Json(PredictOutput {
            predictions: predictions.to_vec(),
        })),
        Err(e) => Err(format!("Prediction error: {}", e)),
    }
}
