use crate::api::leave_form::LeaveHistory;
use crate::leave::flow::ResolvedLeave;
use crate::model::action::{
    ActionEvent, ActionResponse, BotMessage, NluEntity, SubmitLeave, ValidateDuration,
};
use crate::model::leave_record::{LeaveCategory, LeaveRecord};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Actions API",
        version = "1.0.0",
        description = r#"
## Conversational leave requests

Actions called by the dialogue assistant while it collects a leave request.

### Flow
- **Validate**: the duration slot is normalized, resolved to dates and checked against the requester's approved leaves
- **Submit**: a confirmed request is classified (medical, vacation, parental, personal, sabbatical, unpaid) and recorded
- **History**: approved leaves of a requester

### Categories
- 30 days or longer is always a **sabbatical**
- A category whose quota is used up falls back to **unpaid**
- Otherwise the reason's keywords decide, **personal** by default

Rejections come back with a message for the requester and re-open the leave form.
"#,
    ),
    paths(
        crate::api::leave_form::validate_duration,
        crate::api::leave_form::submit_leave,
        crate::api::leave_form::leave_history,
    ),
    components(
        schemas(
            ValidateDuration,
            SubmitLeave,
            NluEntity,
            ActionResponse,
            ActionEvent,
            BotMessage,
            ResolvedLeave,
            LeaveRecord,
            LeaveCategory,
            LeaveHistory
        )
    ),
    tags(
        (name = "Leave", description = "Leave request actions"),
    )
)]
pub struct ApiDoc;
