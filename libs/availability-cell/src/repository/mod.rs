use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::AvailabilitySlot;

pub mod memory;
pub mod supabase;

pub use memory::InMemoryAvailabilityRepository;
pub use supabase::SupabaseAvailabilityRepository;

/// Persistence port for availability slots.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn save(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot>;

    /// Overwrites the stored record, returning `None` when the id is unknown.
    async fn update(&self, slot: &AvailabilitySlot) -> Result<Option<AvailabilitySlot>>;

    /// Conditional flip of `is_booked`: only applies when the stored flag is
    /// `!booked`. Returns `None` when the slot is missing or another writer got
    /// there first.
    async fn try_set_booked(&self, id: Uuid, booked: bool) -> Result<Option<AvailabilitySlot>>;

    async fn delete(&self, id: Uuid) -> Result<Option<AvailabilitySlot>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AvailabilitySlot>>;

    /// Ordered by date then start time.
    async fn find_by_professional_id(&self, professional_id: Uuid) -> Result<Vec<AvailabilitySlot>>;

    /// Unbooked slots of the professional on `date`, ordered by start time.
    async fn find_available_slots(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>>;
}
