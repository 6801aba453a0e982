use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::AvailabilitySlot;
use super::AvailabilityRepository;

const AVAILABILITY_PATH: &str = "/rest/v1/availability";

pub struct SupabaseAvailabilityRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAvailabilityRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn select(&self, query: &str) -> Result<Vec<AvailabilitySlot>> {
        let path = format!("{}?{}", AVAILABILITY_PATH, query);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        parse_rows(result)
    }

    async fn patch(&self, query: &str, body: Value) -> Result<Option<AvailabilitySlot>> {
        let path = format!("{}?{}", AVAILABILITY_PATH, query);
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(body),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;
        Ok(parse_rows(result)?.into_iter().next())
    }
}

fn parse_rows(rows: Vec<Value>) -> Result<Vec<AvailabilitySlot>> {
    let slots = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<AvailabilitySlot>, _>>()?;
    Ok(slots)
}

#[async_trait]
impl AvailabilityRepository for SupabaseAvailabilityRepository {
    async fn save(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot> {
        debug!("Inserting availability {}", slot.id);

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                AVAILABILITY_PATH,
                Some(json!(slot)),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        parse_rows(result)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create availability"))
    }

    async fn update(&self, slot: &AvailabilitySlot) -> Result<Option<AvailabilitySlot>> {
        let update_data = json!({
            "available_date": slot.available_date,
            "start_time": slot.start_time,
            "end_time": slot.end_time,
            "is_booked": slot.is_booked,
            "updated_at": slot.updated_at,
        });
        self.patch(&format!("id=eq.{}", slot.id), update_data).await
    }

    async fn try_set_booked(&self, id: Uuid, booked: bool) -> Result<Option<AvailabilitySlot>> {
        // The is_booked filter makes PostgREST skip the row when a concurrent
        // request already flipped it, which comes back as an empty representation.
        let query = format!("id=eq.{}&is_booked=eq.{}", id, !booked);
        let update_data = json!({
            "is_booked": booked,
            "updated_at": Utc::now(),
        });
        self.patch(&query, update_data).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<AvailabilitySlot>> {
        let path = format!("{}?id=eq.{}", AVAILABILITY_PATH, id);
        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(SupabaseClient::representation_headers()),
            )
            .await?;
        Ok(parse_rows(result)?.into_iter().next())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AvailabilitySlot>> {
        Ok(self.select(&format!("id=eq.{}", id)).await?.into_iter().next())
    }

    async fn find_by_professional_id(&self, professional_id: Uuid) -> Result<Vec<AvailabilitySlot>> {
        self.select(&format!(
            "professional_id=eq.{}&order=available_date.asc,start_time.asc",
            professional_id
        ))
        .await
    }

    async fn find_available_slots(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>> {
        self.select(&format!(
            "professional_id=eq.{}&available_date=eq.{}&is_booked=eq.false&order=start_time.asc",
            professional_id, date
        ))
        .await
    }
}
