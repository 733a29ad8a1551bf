use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::LeaveError;
use crate::leave::flow::{LeaveDesk, SubmitOutcome, pick_duration, posted_message, rejection_message};
use crate::model::action::{
    ActionResponse, CONTINUE_RESPONSE, DURATION_SLOT, LEAVE_FORM, SubmitLeave, ValidateDuration,
};
use crate::model::leave_record::LeaveRecord;

#[derive(Serialize, ToSchema)]
pub struct LeaveHistory {
    #[schema(example = "u1")]
    pub sender_id: String,
    /// Approved leaves in submission order.
    pub leaves: Vec<LeaveRecord>,
}

// Storage failures end the request; the requester sees the failure as is.
fn storage_failure(sender_id: &str, e: &LeaveError) -> HttpResponse {
    tracing::error!(error = %e, sender_id, "leave store unavailable");
    HttpResponse::InternalServerError().json(ActionResponse::default().text(rejection_message(e)))
}

/* =========================
Validate the duration slot
========================= */
/// Swagger doc for validate_duration endpoint
#[utoipa::path(
    post,
    path = "/api/leave/validate",
    request_body(
        content = ValidateDuration,
        description = "Duration slot and the latest NLU entities",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Slot accepted, or rejected with a message asking to rephrase", body = ActionResponse,
         example = json!({
            "slots": {"duration_leave": "3 days"},
            "resolved": {"phrase": "for 3 days", "start": "2026-01-05", "end": "2026-01-07"},
            "messages": [],
            "events": []
         })
        ),
        (status = 500, description = "Leave store unavailable", body = ActionResponse)
    ),
    tag = "Leave"
)]
pub async fn validate_duration(
    desk: web::Data<LeaveDesk>,
    payload: web::Json<ValidateDuration>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let raw = pick_duration(payload.duration_leave.as_deref(), &payload.entities).unwrap_or_default();
    let today = Local::now().date_naive();

    let response = match desk.validate_duration(&payload.sender_id, &raw, today) {
        Ok(Some(resolved)) => {
            let mut response = ActionResponse::default().slot(DURATION_SLOT, Some(raw));
            response.resolved = Some(resolved);
            response
        }
        Ok(None) => ActionResponse::default().slot(DURATION_SLOT, None),
        Err(e) if e.is_recoverable() => ActionResponse::default()
            .slot(DURATION_SLOT, None)
            .text(rejection_message(&e)),
        Err(e) => return Ok(storage_failure(&payload.sender_id, &e)),
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Submit the leave form
========================= */
/// Swagger doc for submit_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leave/submit",
    request_body(
        content = SubmitLeave,
        description = "Collected slots and the requester's confirmation",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave posted, declined, or rejected", body = ActionResponse,
         example = json!({
            "messages": [
                {"text": "Your medical leave for 'sick' for 3 days has been posted!"},
                {"response": "utter_continue_convo"}
            ],
            "events": [
                {"event": "slot", "name": "reason_leave", "value": null},
                {"event": "slot", "name": "duration_leave", "value": null}
            ]
         })
        ),
        (status = 500, description = "Leave store unavailable", body = ActionResponse)
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    desk: web::Data<LeaveDesk>,
    payload: web::Json<SubmitLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let reason = payload.reason_leave.unwrap_or_default();
    let duration = payload.duration_leave.unwrap_or_default();
    let today = Local::now().date_naive();

    let result = desk.submit(&payload.sender_id, &reason, &duration, payload.confirmed, today);
    let response = match result {
        Ok(SubmitOutcome::Posted { record, phrase }) => ActionResponse::default()
            .text(posted_message(&reason, &phrase, record.category))
            .response(CONTINUE_RESPONSE)
            .clear_leave_slots(),
        Ok(SubmitOutcome::Declined) => ActionResponse::default()
            .text("Okay, I won't post this leave request.")
            .response(CONTINUE_RESPONSE)
            .clear_leave_slots(),
        Ok(SubmitOutcome::NothingToSubmit) => ActionResponse::default()
            .text(rejection_message(&LeaveError::EmptyDuration))
            .set_slot(DURATION_SLOT, None)
            .reopen(LEAVE_FORM),
        Err(e) if e.is_recoverable() => ActionResponse::default()
            .text(rejection_message(&e))
            .set_slot(DURATION_SLOT, None)
            .reopen(LEAVE_FORM),
        Err(e) => return Ok(storage_failure(&payload.sender_id, &e)),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// for getting a requester's approved leaves endpoint
#[utoipa::path(
    get,
    path = "/api/leave/{sender_id}",
    params(
        ("sender_id" = String, Path, description = "Opaque requester id")
    ),
    responses(
        (status = 200, description = "Approved leaves, oldest submission first", body = LeaveHistory),
        (status = 500, description = "Leave store unavailable", body = ActionResponse)
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    desk: web::Data<LeaveDesk>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let sender_id = path.into_inner();

    match desk.ledger().records(&sender_id) {
        Ok(leaves) => Ok(HttpResponse::Ok().json(LeaveHistory { sender_id, leaves })),
        Err(e) => Ok(storage_failure(&sender_id, &e)),
    }
}
