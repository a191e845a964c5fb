//! REST API endpoint handlers for the gateway.
//!
//! Every handler takes the directory lock for the duration of one engine
//! call, so requests are applied in arrival order.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness plus roster counts |
//! | `GET` | `/api/phones` | Every phone as a directory entry |
//! | `GET` | `/api/phones/{id}` | One phone with its binding |
//! | `GET` | `/api/phones/{id}/speed-dial` | Adjacent panels plus control |
//! | `GET` | `/api/phones/{id}/trains-and-mobiles` | Trains, then mobiles |
//! | `GET` | `/api/phones/{id}/rec` | Bound speed-dial phones |
//! | `POST` | `/api/phones/{id}/assign` | Bind an operator |
//! | `POST` | `/api/phones/{id}/unassign` | Release the phone |
//! | `POST` | `/api/phones/{id}/position` | Move a train or mobile |
//! | `GET` | `/api/operators/{id}/phones` | The operator's phonebook |
//! | `POST` | `/api/operators/{id}/release` | Release all of an operator's phones |
//! | `POST` | `/api/persons` | Register a person's phone |
//! | `POST` | `/api/trains` | Register a train's phone |
//! | `GET` | `/api/simulations` | Loaded simulations |
//! | `POST` | `/api/simulations` | Load a simulation |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use switchboard_directory::{PersonPhone, Phone, PhoneManager};
use switchboard_types::{
    Location, OperatorId, PhoneId, PhonebookEntry, PhonebookRecord, SimId, TrainId,
};
use switchboard_world::{Simulation, Train};
use tracing::info;

use crate::error::GatewayError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/phones/{id}/assign`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// The operator identity to bind.
    pub operator_id: OperatorId,
}

/// Request body for `POST /api/trains`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTrainRequest {
    /// Stable train id; a fresh one is generated when omitted.
    #[serde(default)]
    pub id: Option<TrainId>,
    /// Head-code, used as the phone's display name.
    pub headcode: String,
    /// Simulation the train is running in, if any.
    #[serde(default)]
    pub sim_id: Option<SimId>,
}

/// Full view of one phone, including who holds it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneDetail {
    /// The phonebook record as last pushed.
    #[serde(flatten)]
    pub record: PhonebookRecord,
    /// The bound operator, if any.
    pub operator_id: Option<OperatorId>,
    /// Whether the phone is hidden from listings.
    pub hidden: bool,
    /// The carrying train, for train phones.
    pub train_id: Option<TrainId>,
}

impl PhoneDetail {
    fn of(directory: &PhoneManager, phone: &Phone) -> Self {
        Self {
            record: phone.to_record(),
            operator_id: phone.operator().cloned(),
            hidden: phone.is_hidden(),
            train_id: directory.resolve_carrier(phone).copied(),
        }
    }
}

/// Generic success response.
#[derive(Debug, Serialize)]
struct ActionResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

fn find<'a>(directory: &'a PhoneManager, id: &PhoneId) -> Result<&'a Phone, GatewayError> {
    directory
        .lookup(id)
        .ok_or_else(|| GatewayError::NotFound(format!("phone {id}")))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness check with roster counts.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let directory = state.directory.lock().await;
    Json(serde_json::json!({
        "status": "ok",
        "phones": directory.phone_count(),
        "simulations": directory.simulations().count(),
        "boundPhones": directory.bound_count(),
        "boundOperators": directory.operators().len(),
        "connectedOperators": state.rooms.room_count(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/phones
// ---------------------------------------------------------------------------

/// List every phone, in roster order.
pub async fn list_phones(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let phones = state.directory.lock().await.list_all();
    Json(serde_json::json!({
        "count": phones.len(),
        "phones": phones,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/phones/{id}
// ---------------------------------------------------------------------------

/// Return one phone with its binding.
pub async fn get_phone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PhoneDetail>, GatewayError> {
    let directory = state.directory.lock().await;
    let phone = find(&directory, &PhoneId::from(id))?;
    Ok(Json(PhoneDetail::of(&directory, phone)))
}

// ---------------------------------------------------------------------------
// GET /api/phones/{id}/speed-dial | trains-and-mobiles | rec
// ---------------------------------------------------------------------------

/// Speed-dial list for a phone, computed now.
pub async fn speed_dial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PhonebookEntry>>, GatewayError> {
    let directory = state.directory.lock().await;
    let phone = find(&directory, &PhoneId::from(id))?;
    Ok(Json(directory.speed_dial_for(phone)?))
}

/// Trains then mobiles in the phone's simulation, computed now.
pub async fn trains_and_mobiles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PhonebookEntry>>, GatewayError> {
    let directory = state.directory.lock().await;
    let phone = find(&directory, &PhoneId::from(id))?;
    Ok(Json(directory.trains_and_mobiles_for(phone)?))
}

/// REC recipients for a phone: bound speed-dial phones only.
pub async fn rec(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PhonebookEntry>>, GatewayError> {
    let directory = state.directory.lock().await;
    let phone = find(&directory, &PhoneId::from(id))?;
    Ok(Json(directory.broadcast_recipients_for(phone)?))
}

// ---------------------------------------------------------------------------
// POST /api/phones/{id}/assign | unassign | position
// ---------------------------------------------------------------------------

/// Bind an operator to a phone. The operator receives a phonebook push.
pub async fn assign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(AssignRequest { operator_id }) = body?;
    let id = PhoneId::from(id);
    state
        .directory
        .lock()
        .await
        .assign(&id, operator_id.clone())?;

    Ok(Json(ActionResponse {
        ok: true,
        message: format!("Phone {id} assigned to {operator_id}"),
    }))
}

/// Release a phone. Its previous holder receives a phonebook push.
pub async fn unassign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = PhoneId::from(id);
    state.directory.lock().await.unassign(&id)?;

    Ok(Json(ActionResponse {
        ok: true,
        message: format!("Phone {id} released"),
    }))
}

/// Move a train or mobile phone to a new location.
pub async fn position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Location>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(location) = body?;
    let id = PhoneId::from(id);
    let sim = location.sim_id.clone();
    state.directory.lock().await.position_phone(&id, location)?;

    Ok(Json(ActionResponse {
        ok: true,
        message: format!("Phone {id} positioned in {sim}"),
    }))
}

// ---------------------------------------------------------------------------
// /api/operators/{id}
// ---------------------------------------------------------------------------

/// The phonebook an operator would receive right now.
pub async fn operator_phones(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let operator = OperatorId::from(id);
    let phones = state.directory.lock().await.phonebook_for(&operator);
    Json(serde_json::json!({
        "operatorId": operator,
        "count": phones.len(),
        "phones": phones,
    }))
}

/// Release every phone bound to an operator.
pub async fn release_operator(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let operator = OperatorId::from(id);
    let released = state.directory.lock().await.unassign_all_for(&operator);
    Json(serde_json::json!({
        "ok": true,
        "operatorId": operator,
        "released": released,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/persons | /api/trains
// ---------------------------------------------------------------------------

/// Register a person's phone. Duplicate numbers are rejected with 409.
pub async fn register_person(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PersonPhone>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(request) = body?;
    let mut directory = state.directory.lock().await;
    let entry = directory.register_person_phone(request)?.to_entry();
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Register the phone carried by a train.
pub async fn register_train(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterTrainRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(RegisterTrainRequest {
        id,
        headcode,
        sim_id,
    }) = body?;
    if headcode.trim().is_empty() {
        return Err(GatewayError::BadRequest(String::from(
            "headcode must not be empty",
        )));
    }

    let train = Train {
        id: id.unwrap_or_default(),
        headcode,
        sim_id,
    };
    let mut directory = state.directory.lock().await;
    let entry = directory.register_train_phone(&train)?.to_entry();
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "trainId": train.id,
            "phone": entry,
        })),
    ))
}

// ---------------------------------------------------------------------------
// /api/simulations
// ---------------------------------------------------------------------------

/// List loaded simulations with their panel counts.
pub async fn list_simulations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let directory = state.directory.lock().await;
    let sims: Vec<serde_json::Value> = directory
        .simulations()
        .map(|sim| {
            serde_json::json!({
                "id": sim.id,
                "name": sim.name,
                "panels": sim.panel_count(),
            })
        })
        .collect();
    Json(serde_json::json!({
        "count": sims.len(),
        "simulations": sims,
    }))
}

/// Load a simulation definition and generate its fixed phones.
pub async fn load_simulation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Simulation>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(sim) = body?;
    let id = sim.id.clone();
    let mut directory = state.directory.lock().await;
    let before = directory.phone_count();
    directory.load_simulation(sim)?;
    let generated = directory.phone_count().saturating_sub(before);
    info!(sim = %id, phones = generated, "Simulation loaded via API");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id,
            "phones": generated,
        })),
    ))
}
