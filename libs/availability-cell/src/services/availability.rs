use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use user_cell::services::UserDirectoryService;

use crate::models::{
    AvailabilityError, AvailabilitySlot, CreateAvailabilityRequest, UpdateAvailabilityRequest,
};
use crate::repository::AvailabilityRepository;
use crate::services::rules::AvailabilityRules;

pub struct AvailabilityService {
    repository: Arc<dyn AvailabilityRepository>,
    users: Arc<UserDirectoryService>,
    rules: AvailabilityRules,
}

impl AvailabilityService {
    pub fn new(repository: Arc<dyn AvailabilityRepository>, users: Arc<UserDirectoryService>) -> Self {
        Self::with_rules(repository, users, AvailabilityRules::default())
    }

    pub fn with_rules(
        repository: Arc<dyn AvailabilityRepository>,
        users: Arc<UserDirectoryService>,
        rules: AvailabilityRules,
    ) -> Self {
        Self { repository, users, rules }
    }

    /// Publish a new slot for a professional.
    pub async fn create_availability(
        &self,
        request: CreateAvailabilityRequest,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        debug!(
            "Creating availability for professional {} on {}",
            request.professional_id, request.available_date
        );

        self.ensure_professional(request.professional_id).await?;

        self.rules
            .validate_time_slot(request.available_date, request.start_time, request.end_time)?;
        self.rules
            .validate_date_range(request.available_date, request.start_time, Utc::now())?;

        let now = Utc::now();
        let slot = AvailabilitySlot {
            id: Uuid::new_v4(),
            professional_id: request.professional_id,
            available_date: request.available_date,
            start_time: request.start_time,
            end_time: request.end_time,
            is_booked: request.is_booked.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        self.ensure_no_overlap(&slot).await?;

        let slot = self.repository.save(&slot).await?;
        info!(
            "Availability {} created for professional {} ({} - {})",
            slot.id, slot.professional_id, slot.start_time, slot.end_time
        );
        Ok(slot)
    }

    pub async fn update_availability(
        &self,
        id: Uuid,
        request: UpdateAvailabilityRequest,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        debug!("Updating availability: {}", id);

        let mut slot = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AvailabilityError::slot_not_found(id))?;

        if request.changes_schedule() {
            slot.available_date = request.available_date.unwrap_or(slot.available_date);
            slot.start_time = request.start_time.unwrap_or(slot.start_time);
            slot.end_time = request.end_time.unwrap_or(slot.end_time);

            self.rules
                .validate_time_slot(slot.available_date, slot.start_time, slot.end_time)?;
            self.rules
                .validate_date_range(slot.available_date, slot.start_time, Utc::now())?;
            self.ensure_no_overlap(&slot).await?;
        }

        if let Some(is_booked) = request.is_booked {
            slot.is_booked = is_booked;
        }
        slot.updated_at = Utc::now();

        let slot = self
            .repository
            .update(&slot)
            .await?
            .ok_or_else(|| AvailabilityError::slot_not_found(id))?;

        info!("Availability {} updated", slot.id);
        Ok(slot)
    }

    pub async fn find_availability_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AvailabilitySlot>, AvailabilityError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn find_by_professional_id(
        &self,
        professional_id: Uuid,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        Ok(self.repository.find_by_professional_id(professional_id).await?)
    }

    pub async fn find_available_slots(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        Ok(self.repository.find_available_slots(professional_id, date).await?)
    }

    pub async fn delete_availability(&self, id: Uuid) -> Result<AvailabilitySlot, AvailabilityError> {
        debug!("Deleting availability: {}", id);

        let slot = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AvailabilityError::slot_not_found(id))?;

        if slot.is_booked {
            warn!("Deleted availability {} while it was still booked", id);
        }
        info!("Availability {} deleted", id);
        Ok(slot)
    }

    /// Book the first free slot of the professional on `date`.
    pub async fn mark_as_booked(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        let candidates = self.repository.find_available_slots(professional_id, date).await?;

        match self.claim_first(&candidates, true).await? {
            Some(slot) => Ok(slot),
            None => Err(AvailabilityError::NotFound(format!(
                "No available slot for professional {} on {}",
                professional_id, date
            ))),
        }
    }

    /// Free the first booked slot of the professional on `date`.
    pub async fn mark_as_available(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<AvailabilitySlot, AvailabilityError> {
        let candidates: Vec<AvailabilitySlot> = self
            .repository
            .find_by_professional_id(professional_id)
            .await?
            .into_iter()
            .filter(|slot| slot.is_same_day(date) && slot.is_booked)
            .collect();

        match self.claim_first(&candidates, false).await? {
            Some(slot) => Ok(slot),
            None => Err(AvailabilityError::NotFound(format!(
                "No booked slot for professional {} on {}",
                professional_id, date
            ))),
        }
    }

    /// Claim a free slot for an appointment at `at`. The slot containing `at`
    /// is tried first, then the remaining free slots of that day in start
    /// order. `None` means every candidate was taken.
    pub async fn claim_slot(
        &self,
        professional_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<AvailabilitySlot>, AvailabilityError> {
        let mut candidates = self
            .repository
            .find_available_slots(professional_id, at.date_naive())
            .await?;

        // Stable sort keeps start order among the non-containing slots.
        candidates.sort_by_key(|slot| !slot.contains(at));

        let claimed = self.claim_first(&candidates, true).await?;
        match &claimed {
            Some(slot) => info!("Slot {} claimed for professional {}", slot.id, professional_id),
            None => warn!(
                "No slot could be claimed for professional {} at {}",
                professional_id, at
            ),
        }
        Ok(claimed)
    }

    /// Put a slot back on the market. Releasing a missing or already free slot
    /// is not an error.
    pub async fn release_slot(&self, id: Uuid) -> Result<Option<AvailabilitySlot>, AvailabilityError> {
        let released = self.repository.try_set_booked(id, false).await?;
        match &released {
            Some(_) => info!("Slot {} released", id),
            None => warn!("Slot {} was not released: missing or already available", id),
        }
        Ok(released)
    }

    /// Take back one specific slot, used to undo a release whose follow-up
    /// write failed. `None` means the slot is gone or someone else booked it.
    pub async fn reclaim_slot(&self, id: Uuid) -> Result<Option<AvailabilitySlot>, AvailabilityError> {
        let reclaimed = self.repository.try_set_booked(id, true).await?;
        if reclaimed.is_none() {
            warn!("Slot {} could not be reclaimed", id);
        }
        Ok(reclaimed)
    }

    async fn claim_first(
        &self,
        candidates: &[AvailabilitySlot],
        booked: bool,
    ) -> Result<Option<AvailabilitySlot>, AvailabilityError> {
        for candidate in candidates {
            if let Some(slot) = self.repository.try_set_booked(candidate.id, booked).await? {
                return Ok(Some(slot));
            }
            debug!("Slot {} changed concurrently, trying next", candidate.id);
        }
        Ok(None)
    }

    async fn ensure_professional(&self, professional_id: Uuid) -> Result<(), AvailabilityError> {
        self.users
            .find_user_by_id(professional_id)
            .await?
            .ok_or_else(|| AvailabilityError::validation("Professional not found"))?;
        Ok(())
    }

    async fn ensure_no_overlap(&self, slot: &AvailabilitySlot) -> Result<(), AvailabilityError> {
        let existing = self
            .repository
            .find_by_professional_id(slot.professional_id)
            .await?;

        if let Some(clash) = existing
            .iter()
            .find(|other| other.id != slot.id && other.overlaps(slot))
        {
            warn!(
                "Availability for professional {} overlaps slot {}",
                slot.professional_id, clash.id
            );
            return Err(AvailabilityError::Conflict(
                "Availability overlaps with an existing slot".to_string(),
            ));
        }
        Ok(())
    }
}
