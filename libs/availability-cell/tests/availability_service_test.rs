use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;
use uuid::Uuid;

use availability_cell::models::{
    AvailabilityError, AvailabilitySlot, CreateAvailabilityRequest, UpdateAvailabilityRequest,
};
use availability_cell::{AvailabilityService, InMemoryAvailabilityRepository};
use shared_utils::test_utils::TestDates;
use user_cell::models::{CreateUserRequest, UserRole};
use user_cell::{InMemoryUserRepository, UserDirectoryService};

struct Fixture {
    service: Arc<AvailabilityService>,
    users: Arc<UserDirectoryService>,
    professional_id: Uuid,
}

async fn fixture() -> Fixture {
    let users = Arc::new(UserDirectoryService::new(Arc::new(InMemoryUserRepository::new())));
    let professional = users
        .create_user(CreateUserRequest {
            auth_external_id: format!("auth|{}", Uuid::new_v4()),
            first_name: "Paula".to_string(),
            last_name: "Lima".to_string(),
            role: UserRole::Professional,
        })
        .await
        .unwrap();

    let service = Arc::new(AvailabilityService::new(
        Arc::new(InMemoryAvailabilityRepository::new()),
        users.clone(),
    ));

    Fixture {
        service,
        users,
        professional_id: professional.id,
    }
}

fn tomorrow_slot(professional_id: Uuid, start: u32, end: u32) -> CreateAvailabilityRequest {
    CreateAvailabilityRequest {
        professional_id,
        available_date: TestDates::tomorrow(),
        start_time: TestDates::tomorrow_at(start, 0),
        end_time: TestDates::tomorrow_at(end, 0),
        is_booked: None,
    }
}

async fn publish(f: &Fixture, start: u32, end: u32) -> AvailabilitySlot {
    f.service
        .create_availability(tomorrow_slot(f.professional_id, start, end))
        .await
        .unwrap()
}

#[tokio::test]
async fn create_availability_defaults_to_free() {
    let f = fixture().await;

    let slot = publish(&f, 10, 11).await;

    assert!(!slot.is_booked);
    assert_eq!(slot.available_date, TestDates::tomorrow());
    let stored = f.service.find_availability_by_id(slot.id).await.unwrap();
    assert_eq!(stored, Some(slot));
}

#[tokio::test]
async fn unknown_professional_fails_validation() {
    let f = fixture().await;

    let result = f
        .service
        .create_availability(tomorrow_slot(Uuid::new_v4(), 10, 11))
        .await;

    assert_matches!(result, Err(AvailabilityError::Validation(msg)) if msg.contains("Professional not found"));
}

#[tokio::test]
async fn any_existing_user_can_publish_availability() {
    let f = fixture().await;
    let patient = f
        .users
        .create_user(CreateUserRequest {
            auth_external_id: "auth|patient".to_string(),
            first_name: "Rui".to_string(),
            last_name: "Costa".to_string(),
            role: UserRole::Patient,
        })
        .await
        .unwrap();

    let slot = f
        .service
        .create_availability(tomorrow_slot(patient.id, 10, 11))
        .await
        .unwrap();

    assert_eq!(slot.professional_id, patient.id);
}

#[tokio::test]
async fn equal_start_and_end_is_rejected() {
    let f = fixture().await;

    let result = f.service.create_availability(tomorrow_slot(f.professional_id, 10, 10)).await;

    assert_matches!(
        result,
        Err(AvailabilityError::Validation(msg)) if msg == "Start time must be before end time"
    );
}

#[tokio::test]
async fn out_of_hours_slots_are_rejected() {
    let f = fixture().await;

    let early = f.service.create_availability(tomorrow_slot(f.professional_id, 7, 9)).await;
    let late = f.service.create_availability(tomorrow_slot(f.professional_id, 19, 21)).await;

    assert_matches!(early, Err(AvailabilityError::Validation(_)));
    assert_matches!(late, Err(AvailabilityError::Validation(_)));
}

#[tokio::test]
async fn past_and_far_future_dates_are_rejected() {
    let f = fixture().await;
    let yesterday = TestDates::days_ahead(-1);
    let far = TestDates::days_ahead(120);

    let past = f
        .service
        .create_availability(CreateAvailabilityRequest {
            professional_id: f.professional_id,
            available_date: yesterday,
            start_time: TestDates::at(yesterday, 10, 0),
            end_time: TestDates::at(yesterday, 11, 0),
            is_booked: None,
        })
        .await;
    let future = f
        .service
        .create_availability(CreateAvailabilityRequest {
            professional_id: f.professional_id,
            available_date: far,
            start_time: TestDates::at(far, 10, 0),
            end_time: TestDates::at(far, 11, 0),
            is_booked: None,
        })
        .await;

    assert_matches!(past, Err(AvailabilityError::Validation(msg)) if msg.contains("past"));
    assert_matches!(future, Err(AvailabilityError::Validation(msg)) if msg.contains("90 days"));
}

#[tokio::test]
async fn overlapping_slots_conflict() {
    let f = fixture().await;
    publish(&f, 10, 12).await;

    let result = f.service.create_availability(tomorrow_slot(f.professional_id, 11, 13)).await;

    assert_matches!(result, Err(AvailabilityError::Conflict(_)));
}

#[tokio::test]
async fn touching_slots_are_accepted() {
    let f = fixture().await;
    publish(&f, 10, 11).await;

    let next = f.service.create_availability(tomorrow_slot(f.professional_id, 11, 12)).await;

    assert!(next.is_ok());
    assert_eq!(f.service.find_by_professional_id(f.professional_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_revalidates_merged_times_excluding_itself() {
    let f = fixture().await;
    let slot = publish(&f, 10, 11).await;
    publish(&f, 12, 13).await;

    // Growing into its own old range is fine.
    let widened = f
        .service
        .update_availability(
            slot.id,
            UpdateAvailabilityRequest {
                end_time: Some(TestDates::tomorrow_at(11, 30)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(widened.duration_minutes(), 90);

    let clash = f
        .service
        .update_availability(
            slot.id,
            UpdateAvailabilityRequest {
                end_time: Some(TestDates::tomorrow_at(12, 30)),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(clash, Err(AvailabilityError::Conflict(_)));

    let inverted = f
        .service
        .update_availability(
            slot.id,
            UpdateAvailabilityRequest {
                start_time: Some(TestDates::tomorrow_at(11, 30)),
                end_time: Some(TestDates::tomorrow_at(11, 0)),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(inverted, Err(AvailabilityError::Validation(_)));
}

#[tokio::test]
async fn update_and_delete_unknown_slot_are_not_found() {
    let f = fixture().await;
    let id = Uuid::new_v4();

    let update = f.service.update_availability(id, UpdateAvailabilityRequest::default()).await;
    let delete = f.service.delete_availability(id).await;

    assert_matches!(update, Err(AvailabilityError::NotFound(_)));
    assert_matches!(delete, Err(AvailabilityError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_slot() {
    let f = fixture().await;
    let slot = publish(&f, 9, 10).await;

    let deleted = f.service.delete_availability(slot.id).await.unwrap();

    assert_eq!(deleted.id, slot.id);
    assert!(f.service.find_availability_by_id(slot.id).await.unwrap().is_none());
}

#[tokio::test]
async fn booking_the_only_slot_empties_available_slots() {
    let f = fixture().await;
    let slot = publish(&f, 10, 11).await;
    let day = TestDates::tomorrow();

    let booked = f.service.mark_as_booked(f.professional_id, day).await.unwrap();
    assert_eq!(booked.id, slot.id);
    assert!(booked.is_booked);
    assert!(f.service.find_available_slots(f.professional_id, day).await.unwrap().is_empty());

    let second = f.service.mark_as_booked(f.professional_id, day).await;
    assert_matches!(second, Err(AvailabilityError::NotFound(_)));

    let freed = f.service.mark_as_available(f.professional_id, day).await.unwrap();
    assert!(!freed.is_booked);
    assert_eq!(f.service.find_available_slots(f.professional_id, day).await.unwrap().len(), 1);

    let again = f.service.mark_as_available(f.professional_id, day).await;
    assert_matches!(again, Err(AvailabilityError::NotFound(_)));
}

#[tokio::test]
async fn available_slots_are_ordered_by_start() {
    let f = fixture().await;
    publish(&f, 14, 15).await;
    publish(&f, 9, 10).await;
    publish(&f, 11, 12).await;

    let slots = f
        .service
        .find_available_slots(f.professional_id, TestDates::tomorrow())
        .await
        .unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn claim_prefers_slot_containing_the_instant() {
    let f = fixture().await;
    publish(&f, 9, 10).await;
    let afternoon = publish(&f, 15, 16).await;

    let claimed = f
        .service
        .claim_slot(f.professional_id, TestDates::tomorrow_at(15, 30))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(claimed.id, afternoon.id);
}

#[tokio::test]
async fn claim_falls_back_to_first_free_slot_of_the_day() {
    let f = fixture().await;
    let morning = publish(&f, 9, 10).await;
    publish(&f, 15, 16).await;

    let claimed = f
        .service
        .claim_slot(f.professional_id, TestDates::tomorrow_at(12, 0))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(claimed.id, morning.id);
}

#[tokio::test]
async fn claim_without_free_slots_is_none() {
    let f = fixture().await;

    let claimed = f
        .service
        .claim_slot(f.professional_id, TestDates::tomorrow_at(10, 0))
        .await
        .unwrap();

    assert!(claimed.is_none());
}

#[tokio::test]
async fn release_is_idempotent() {
    let f = fixture().await;
    let slot = publish(&f, 10, 11).await;
    f.service.claim_slot(f.professional_id, slot.start_time).await.unwrap();

    let first = f.service.release_slot(slot.id).await.unwrap();
    let second = f.service.release_slot(slot.id).await.unwrap();
    let missing = f.service.release_slot(Uuid::new_v4()).await.unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(missing.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_book_a_slot_once() {
    let f = fixture().await;
    let slot = publish(&f, 10, 11).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = f.service.clone();
        let professional_id = f.professional_id;
        let at = slot.start_time + Duration::minutes(5);
        handles.push(tokio::spawn(async move {
            service.claim_slot(professional_id, at).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
}
