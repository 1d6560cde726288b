//! Slot-reassignment saga
//!
//! Moving an appointment to another slot takes three remote mutations the
//! service cannot perform atomically:
//!
//! 1. book the new slot,
//! 2. release the old slot,
//! 3. point the appointment at the new slot.
//!
//! They run strictly in that order, each only after the previous one
//! succeeded. Booking first means a failure never leaves the appointment
//! without a slot. Nothing is retried and nothing is undone: a failed run
//! stops where it is and reports the step, the cause and the partial state
//! left behind, for someone to reconcile by hand.
//!
//! ```text
//! Selecting -> Booking -> Releasing -> Repointing -> Committed
//!                  \           \             \
//!                   `-----------`-------------`--> Failed(step, cause)
//! ```

use std::fmt;

use thiserror::Error;
use tracing::{error, info};

use crate::{
    client::SlotClient,
    error::{ClientError, ClientResult, SagaError},
    models::{Appointment, AppointmentId, Slot, SlotId},
    transport::SlotTransport,
};

/// Mutating step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Booking,
    Releasing,
    Repointing,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Booking => "booking the new slot",
            Step::Releasing => "releasing the old slot",
            Step::Repointing => "repointing the appointment",
        })
    }
}

/// Backend state a failed run leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialState {
    /// Nothing was changed; the appointment keeps its old slot
    Untouched,
    /// Both the old and the new slot are booked for one appointment
    BothSlotsHeld,
    /// The old slot is free again but the appointment still points at it;
    /// the new slot is booked and unreferenced
    AppointmentOnReleasedSlot,
}

impl fmt::Display for PartialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartialState::Untouched => "no changes were made",
            PartialState::BothSlotsHeld => "old and new slot are both booked",
            PartialState::AppointmentOnReleasedSlot => {
                "old slot released but appointment still references it; new slot booked"
            }
        })
    }
}

/// Terminal failure of a run
#[derive(Error, Debug)]
#[error("slot reassignment failed while {step}: {cause}")]
pub struct Failure {
    pub step: Step,
    #[source]
    pub cause: ClientError,
}

impl Failure {
    /// What the completed steps left behind
    pub fn partial_state(&self) -> PartialState {
        match self.step {
            Step::Booking => PartialState::Untouched,
            Step::Releasing => PartialState::BothSlotsHeld,
            Step::Repointing => PartialState::AppointmentOnReleasedSlot,
        }
    }
}

/// Phase of a run
#[derive(Debug)]
pub enum Phase {
    Selecting,
    Booking,
    Releasing,
    Repointing,
    Committed,
    Failed(Failure),
}

impl Phase {
    /// The failure, for a failed run
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Phase::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// One user-initiated reassignment
///
/// Runs are ephemeral and single-use: once a run has started executing it
/// can only end `Committed` or `Failed`, and a new attempt needs a new run
/// because slot availability may have changed in between.
#[derive(Debug)]
pub struct SagaRun {
    appointment_id: AppointmentId,
    old_slot_id: SlotId,
    new_slot_id: Option<SlotId>,
    phase: Phase,
}

impl SagaRun {
    /// Start selecting a new slot for `appointment`
    pub fn open(appointment: &Appointment) -> Self {
        Self::new(appointment.id, appointment.slot_id)
    }

    /// Start selecting a new slot for the appointment holding `old_slot_id`
    pub fn new(appointment_id: AppointmentId, old_slot_id: SlotId) -> Self {
        Self {
            appointment_id,
            old_slot_id,
            new_slot_id: None,
            phase: Phase::Selecting,
        }
    }

    pub fn appointment_id(&self) -> AppointmentId {
        self.appointment_id
    }

    pub fn old_slot_id(&self) -> SlotId {
        self.old_slot_id
    }

    pub fn new_slot_id(&self) -> Option<SlotId> {
        self.new_slot_id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn into_phase(self) -> Phase {
        self.phase
    }

    /// Slots the appointment could move to, fetched fresh on every call
    pub async fn candidates<T: SlotTransport>(
        &self,
        client: &SlotClient<T>,
    ) -> ClientResult<Vec<Slot>> {
        let slots = client.list_available_slots().await?;
        Ok(slots
            .into_iter()
            .filter(|slot| slot.id != self.old_slot_id && slot.is_free())
            .collect())
    }

    /// Confirm the target slot: `Selecting -> Booking`
    pub fn confirm(&mut self, new_slot_id: SlotId) -> Result<(), SagaError> {
        if !matches!(self.phase, Phase::Selecting) {
            return Err(SagaError::NotSelecting);
        }
        if new_slot_id == self.old_slot_id {
            return Err(SagaError::SameSlot(new_slot_id));
        }

        self.new_slot_id = Some(new_slot_id);
        self.advance(Phase::Booking);
        Ok(())
    }

    /// Run the three steps from `Booking` to a terminal phase
    pub async fn execute<T: SlotTransport>(
        &mut self,
        client: &SlotClient<T>,
    ) -> Result<&Phase, SagaError> {
        let new_slot_id = match (&self.phase, self.new_slot_id) {
            (Phase::Booking, Some(new_slot_id)) => new_slot_id,
            (Phase::Selecting, _) => return Err(SagaError::NotConfirmed),
            _ => return Err(SagaError::NotResumable),
        };

        if let Err(cause) = client.book_slot(new_slot_id).await {
            return Ok(self.fail(Step::Booking, cause));
        }
        self.advance(Phase::Releasing);

        if let Err(cause) = client.release_slot(self.old_slot_id).await {
            return Ok(self.fail(Step::Releasing, cause));
        }
        self.advance(Phase::Repointing);

        if let Err(cause) = client
            .repoint_appointment(self.appointment_id, new_slot_id)
            .await
        {
            return Ok(self.fail(Step::Repointing, cause));
        }
        self.advance(Phase::Committed);

        Ok(&self.phase)
    }

    fn advance(&mut self, phase: Phase) {
        info!(
            appointment = %self.appointment_id,
            old_slot = %self.old_slot_id,
            new_slot = ?self.new_slot_id,
            from = ?self.phase,
            to = ?phase,
            "Slot reassignment advanced"
        );
        self.phase = phase;
    }

    fn fail(&mut self, step: Step, cause: ClientError) -> &Phase {
        let failure = Failure { step, cause };
        error!(
            appointment = %self.appointment_id,
            old_slot = %self.old_slot_id,
            new_slot = ?self.new_slot_id,
            %step,
            partial_state = %failure.partial_state(),
            "Slot reassignment failed: {}",
            failure.cause
        );
        self.phase = Phase::Failed(failure);
        &self.phase
    }
}

/// Move `appointment_id` from `old_slot_id` to `new_slot_id`
///
/// Returns the terminal phase, `Committed` or `Failed`. `SagaError` is only
/// returned for caller mistakes such as targeting the slot already held.
pub async fn reassign_slot<T: SlotTransport>(
    client: &SlotClient<T>,
    appointment_id: AppointmentId,
    old_slot_id: SlotId,
    new_slot_id: SlotId,
) -> Result<Phase, SagaError> {
    let mut run = SagaRun::new(appointment_id, old_slot_id);
    run.confirm(new_slot_id)?;
    run.execute(client).await?;
    Ok(run.into_phase())
}
