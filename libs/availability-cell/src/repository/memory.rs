use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::AvailabilitySlot;
use super::AvailabilityRepository;

#[derive(Default)]
pub struct InMemoryAvailabilityRepository {
    slots: RwLock<HashMap<Uuid, AvailabilitySlot>>,
}

impl InMemoryAvailabilityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn chronological(mut slots: Vec<AvailabilitySlot>) -> Vec<AvailabilitySlot> {
    slots.sort_by(|a, b| {
        a.available_date
            .cmp(&b.available_date)
            .then(a.start_time.cmp(&b.start_time))
            .then(a.id.cmp(&b.id))
    });
    slots
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityRepository {
    async fn save(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot> {
        self.slots.write().await.insert(slot.id, slot.clone());
        Ok(slot.clone())
    }

    async fn update(&self, slot: &AvailabilitySlot) -> Result<Option<AvailabilitySlot>> {
        let mut slots = self.slots.write().await;
        match slots.get_mut(&slot.id) {
            Some(stored) => {
                *stored = slot.clone();
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    async fn try_set_booked(&self, id: Uuid, booked: bool) -> Result<Option<AvailabilitySlot>> {
        // Check and write happen under the same guard.
        let mut slots = self.slots.write().await;
        match slots.get_mut(&id) {
            Some(stored) if stored.is_booked != booked => {
                stored.is_booked = booked;
                stored.updated_at = Utc::now();
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AvailabilitySlot>> {
        Ok(self.slots.write().await.remove(&id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AvailabilitySlot>> {
        Ok(self.slots.read().await.get(&id).cloned())
    }

    async fn find_by_professional_id(&self, professional_id: Uuid) -> Result<Vec<AvailabilitySlot>> {
        Ok(chronological(
            self.slots
                .read()
                .await
                .values()
                .filter(|slot| slot.professional_id == professional_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_available_slots(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>> {
        Ok(chronological(
            self.slots
                .read()
                .await
                .values()
                .filter(|slot| {
                    slot.professional_id == professional_id
                        && slot.is_same_day(date)
                        && !slot.is_booked
                })
                .cloned()
                .collect(),
        ))
    }
}
