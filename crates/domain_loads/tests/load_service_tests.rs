//! Tests for the load service over the in-memory store

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{LoadId, StorageReference, Timezone};
use domain_loads::{
    Load, LoadError, LoadFields, LoadListQuery, LoadPatch, LoadService, LoadStorePort,
    LengthUnit, MockLoadStore, WeightUnit,
};

fn fields(origin: &str, destination: &str) -> LoadFields {
    LoadFields {
        current_location: origin.to_string(),
        destination_location: destination.to_string(),
        weight: dec!(18),
        weight_unit: WeightUnit::Ton,
        truck_length: dec!(32),
        length_unit: LengthUnit::Ft,
        contact_number: "+91 98200 12345".to_string(),
        staff_contact_number: "9820054321".to_string(),
    }
}

fn stored(origin: &str, destination: &str, created_at: chrono::DateTime<Utc>) -> Load {
    Load {
        id: LoadId::new(),
        fields: fields(origin, destination),
        created_at,
        receipt_storage_id: None,
    }
}

fn service(store: MockLoadStore) -> LoadService {
    LoadService::new(Arc::new(store), "Asia/Kolkata".parse::<Timezone>().unwrap())
}

mod create_and_update {
    use super::*;

    #[tokio::test]
    async fn test_create_stamps_time_and_has_no_receipt() {
        let svc = service(MockLoadStore::new());
        let before = Utc::now();
        let load = svc.create_load(fields("Nagpur", "Pune")).await.unwrap();

        assert!(load.created_at >= before);
        assert!(load.receipt_storage_id.is_none());
        assert_eq!(svc.get_load(load.id).await.unwrap(), load);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let svc = service(MockLoadStore::new());
        let mut bad = fields("", "Pune");
        bad.truck_length = dec!(-1);

        let err = svc.create_load(bad).await.unwrap_err();
        match err {
            LoadError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_receipt_and_created_at() {
        let store = MockLoadStore::new();
        let svc = service(store.clone());
        let load = svc.create_load(fields("Nagpur", "Pune")).await.unwrap();

        let reference = StorageReference::parse("ab12ab12-0000-4fff-8fff-abcdefabcdef").unwrap();
        store.patch_load(load.id, LoadPatch::set_receipt(reference.clone())).await.unwrap();

        let updated = svc.update_load(load.id, fields("Nagpur", "Mumbai")).await.unwrap();
        assert_eq!(updated.fields.destination_location, "Mumbai");
        assert_eq!(updated.receipt_storage_id, Some(reference));
        assert_eq!(updated.created_at, load.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_load() {
        let svc = service(MockLoadStore::new());
        let id = LoadId::new();
        let err = svc.update_load(id, fields("A-town", "B-town")).await.unwrap_err();
        assert!(matches!(err, LoadError::LoadNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let store = MockLoadStore::new();
        store.set_unavailable(true);
        let svc = service(store);
        let err = svc.create_load(fields("Nagpur", "Pune")).await.unwrap_err();
        assert!(matches!(err, LoadError::Storage(_)));
    }
}

mod listing {
    use super::*;

    // 2024-03-10 in Asia/Kolkata is [2024-03-09T18:30Z, 2024-03-10T18:30Z)
    fn day(d: u32, h: u32, m: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    async fn seeded() -> LoadService {
        let store = MockLoadStore::with_loads(vec![
            stored("Nagpur", "Pune", day(9, 18, 0)),
            stored("Pune", "Delhi", day(9, 19, 0)),
            stored("Indore", "Nagpur", day(10, 18, 29)),
            stored("Surat", "Delhi", day(10, 19, 0)),
        ])
        .await;
        service(store)
    }

    #[tokio::test]
    async fn test_single_day_uses_business_timezone() {
        let svc = seeded().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let loads = svc.list_on(date).await.unwrap();

        let origins: Vec<_> = loads.iter().map(|l| l.fields.current_location.as_str()).collect();
        assert_eq!(origins, vec!["Pune", "Indore"]);
    }

    #[tokio::test]
    async fn test_location_matches_origin_or_destination() {
        let svc = seeded().await;
        let loads = svc
            .list_loads(LoadListQuery::default().at_location("Nagpur"))
            .await
            .unwrap();
        assert_eq!(loads.len(), 2);
    }

    #[tokio::test]
    async fn test_range_and_location_combine() {
        let svc = seeded().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let loads = svc
            .list_loads(LoadListQuery::between(date, date).at_location("Delhi"))
            .await
            .unwrap();
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].fields.current_location, "Pune");
    }

    #[tokio::test]
    async fn test_half_range_and_blank_location_are_ignored() {
        let svc = seeded().await;
        let query = LoadListQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 3, 11),
            date_to: None,
            location: Some("  ".to_string()),
        };
        assert_eq!(svc.list_loads(query).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let svc = seeded().await;
        let query = LoadListQuery::between(
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        );
        assert!(matches!(svc.list_loads(query).await, Err(LoadError::Validation(_))));
    }

    #[tokio::test]
    async fn test_today_includes_fresh_load() {
        let svc = service(MockLoadStore::new());
        let load = svc.create_load(fields("Nagpur", "Pune")).await.unwrap();
        let today = svc.list_today().await.unwrap();
        assert!(today.iter().any(|l| l.id == load.id));
    }

    #[tokio::test]
    async fn test_new_receipts_since_requires_receipt_and_recency() {
        let old = stored("Nagpur", "Pune", Utc::now() - Duration::days(3));
        let fresh = stored("Pune", "Delhi", Utc::now());
        let bare = stored("Surat", "Delhi", Utc::now());
        let store = MockLoadStore::with_loads(vec![old.clone(), fresh.clone(), bare]).await;

        let reference = StorageReference::parse("ab12ab12-0000-4fff-8fff-abcdefabcdef").unwrap();
        store.patch_load(old.id, LoadPatch::set_receipt(reference.clone())).await.unwrap();
        store.patch_load(fresh.id, LoadPatch::set_receipt(reference)).await.unwrap();

        let svc = service(store);
        let found = svc.new_receipts_since(Utc::now() - Duration::days(1)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, fresh.id);
    }
}

mod validation_properties {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    proptest! {
        #[test]
        fn non_positive_measurements_are_rejected(minor in -1_000_000i64..=0) {
            let mut bad = fields("Nagpur", "Pune");
            bad.weight = Decimal::new(minor, 2);
            let err = bad.check().unwrap_err();
            prop_assert!(matches!(err, LoadError::Validation(ref m) if m.iter().any(|s| s.starts_with("weight"))));
        }

        #[test]
        fn blank_locations_are_rejected(spaces in " {0,8}") {
            let bad = fields(&spaces, "Pune");
            prop_assert!(bad.check().is_err());
        }

        #[test]
        fn digit_phone_numbers_are_accepted(number in "[6-9][0-9]{9}") {
            let mut ok = fields("Nagpur", "Pune");
            ok.contact_number = number;
            prop_assert!(ok.check().is_ok());
        }
    }
}
