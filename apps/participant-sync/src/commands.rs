//! Subcommands: one per reconciler operation.
//!
//! Every command prints JSON on stdout. Logs and errors go to stderr.

use clap::Args;
use convene_core::PastMeetingId;
use convene_participants::{
    CreateParticipantRequest, MergedParticipant, ParticipantReconciler, ReconcileError,
    UpdateParticipantRequest,
};
use convene_proxy::{
    CreateAttendeeRequest, CreateInviteeRequest, UpdateAttendeeRequest, UpdateInviteeRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Parse a JSON command-line value into a sub-resource payload.
fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON payload: {e}"))
}

/// Arguments shared by every command.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Past meeting id (`<meeting>-<occurrence>` or `<meeting>`)
    #[arg(long)]
    pub past_meeting_id: PastMeetingId,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Create the invitee side
    #[arg(long)]
    pub invited: bool,

    /// Create the attendee side
    #[arg(long)]
    pub attended: bool,

    /// Invitee payload as JSON
    #[arg(long, value_parser = parse_json::<CreateInviteeRequest>)]
    pub invitee: Option<CreateInviteeRequest>,

    /// Attendee payload as JSON
    #[arg(long, value_parser = parse_json::<CreateAttendeeRequest>)]
    pub attendee: Option<CreateAttendeeRequest>,
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Participant id
    #[arg(long)]
    pub participant_id: String,

    /// Desired invitee presence (omit to leave as is)
    #[arg(long)]
    pub invited: Option<bool>,

    /// Desired attendee presence (omit to leave as is)
    #[arg(long)]
    pub attended: Option<bool>,

    /// Invitee id already known to the caller
    #[arg(long)]
    pub known_invitee_id: Option<String>,

    /// Attendee id already known to the caller
    #[arg(long)]
    pub known_attendee_id: Option<String>,

    /// Invitee fields to change, as JSON
    #[arg(long, value_parser = parse_json::<UpdateInviteeRequest>)]
    pub invitee: Option<UpdateInviteeRequest>,

    /// Attendee fields to change, as JSON
    #[arg(long, value_parser = parse_json::<UpdateAttendeeRequest>)]
    pub attendee: Option<UpdateAttendeeRequest>,
}

/// Arguments for the delete and get commands
#[derive(Args, Debug)]
pub struct ParticipantArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Participant id
    #[arg(long)]
    pub participant_id: String,
}

/// JSON output for delete
#[derive(Serialize)]
struct DeleteOutput<'a> {
    past_meeting_id: String,
    participant_id: &'a str,
    deleted: bool,
}

impl CreateArgs {
    fn into_request(self) -> CreateParticipantRequest {
        CreateParticipantRequest {
            is_invited: self.invited,
            is_attended: self.attended,
            invitee: self.invitee,
            attendee: self.attendee,
        }
    }
}

impl UpdateArgs {
    fn into_request(self) -> UpdateParticipantRequest {
        UpdateParticipantRequest {
            known_invitee_id: self.known_invitee_id,
            known_attendee_id: self.known_attendee_id,
            is_invited: self.invited,
            is_attended: self.attended,
            invitee: self.invitee,
            attendee: self.attendee,
        }
    }
}

/// Execute the create command
pub async fn create(reconciler: &ParticipantReconciler, args: CreateArgs) -> CliResult<()> {
    let past_meeting_id = args.target.past_meeting_id.clone();
    let result = reconciler
        .create_participant(&past_meeting_id, args.into_request())
        .await;
    emit(result)
}

/// Execute the update command
pub async fn update(reconciler: &ParticipantReconciler, args: UpdateArgs) -> CliResult<()> {
    let past_meeting_id = args.target.past_meeting_id.clone();
    let participant_id = args.participant_id.clone();
    let result = reconciler
        .update_participant(&past_meeting_id, &participant_id, args.into_request())
        .await;
    emit(result)
}

/// Execute the delete command
pub async fn delete(reconciler: &ParticipantReconciler, args: ParticipantArgs) -> CliResult<()> {
    reconciler
        .delete_participant(&args.target.past_meeting_id, &args.participant_id)
        .await?;

    let output = DeleteOutput {
        past_meeting_id: args.target.past_meeting_id.to_string(),
        participant_id: &args.participant_id,
        deleted: true,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Execute the get command
pub async fn get(reconciler: &ParticipantReconciler, args: ParticipantArgs) -> CliResult<()> {
    let result = reconciler
        .get_participant(&args.target.past_meeting_id, &args.participant_id)
        .await;
    emit(result)
}

/// Print the merged participant. A partial failure still prints what is
/// stored before reporting the error.
fn emit(result: Result<MergedParticipant, ReconcileError>) -> CliResult<()> {
    match result {
        Ok(participant) => print_participant(&participant),
        Err(e) => {
            if let Some(participant) = e.participant() {
                print_participant(participant)?;
            }
            Err(CliError::Reconcile(e))
        }
    }
}

fn print_participant(participant: &MergedParticipant) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(participant)?);
    Ok(())
}
