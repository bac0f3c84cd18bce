//! Property tests for storage reference normalization

use core_kernel::storage_reference::{is_canonical, CANONICAL_LEN};
use core_kernel::StorageReference;
use proptest::prelude::*;
use test_utils::{canonical_reference_strategy as canonical_reference, raw_reference_strategy};

mod idempotence {
    use super::*;

    proptest! {
        #[test]
        fn canonical_input_is_returned_unchanged(r in canonical_reference()) {
            let parsed = StorageReference::parse(&r).unwrap();
            prop_assert_eq!(parsed.as_str(), r.as_str());
        }

        #[test]
        fn parsing_output_again_is_a_fixed_point(r in canonical_reference()) {
            let once = StorageReference::parse(&r).unwrap();
            let twice = StorageReference::parse(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}

mod wrapped_forms {
    use super::*;

    proptest! {
        #[test]
        fn token_query_parameter(r in canonical_reference(), exp in 0u32..100_000) {
            let url = format!("https://store.example/api/upload?token={}&exp={}", r, exp);
            let parsed = StorageReference::parse(&url).unwrap();
            prop_assert_eq!(parsed.as_str(), r.as_str());
        }

        #[test]
        fn token_not_first_parameter(r in canonical_reference()) {
            let url = format!("https://store.example/api/upload?sig=abc&token={}", r);
            let parsed = StorageReference::parse(&url).unwrap();
            prop_assert_eq!(parsed.as_str(), r.as_str());
        }

        #[test]
        fn final_path_segment(r in canonical_reference(), host in "[a-z]{3,10}") {
            let url = format!("https://{}.example/api/storage/{}?download=true", host, r);
            let parsed = StorageReference::parse(&url).unwrap();
            prop_assert_eq!(parsed.as_str(), r.as_str());
        }

        #[test]
        fn bare_compact_hex(r in canonical_reference(), tail in "[g-z]{0,8}") {
            let compact = format!("{}{}", r.replace('-', ""), tail);
            let parsed = StorageReference::parse(&compact).unwrap();
            prop_assert_eq!(parsed.as_str(), r.as_str());
        }

        #[test]
        fn any_generated_shape_resolves((raw, canonical) in raw_reference_strategy()) {
            let parsed = StorageReference::parse(&raw).unwrap();
            prop_assert_eq!(parsed.into_inner(), canonical);
        }

        #[test]
        fn every_shape_of_one_blob_agrees(r in canonical_reference()) {
            let shapes = [
                r.clone(),
                format!("https://s/u?token={}&e=1", r),
                format!("https://s/blobs/{}", r),
                r.replace('-', ""),
            ];
            for shape in &shapes {
                let parsed = StorageReference::parse(shape).unwrap();
                prop_assert_eq!(parsed.as_str(), r.as_str());
            }
        }
    }
}

mod rejection {
    use super::*;

    proptest! {
        #[test]
        fn inputs_shorter_than_32_chars(raw in "[0-9a-f]{0,31}") {
            prop_assert!(StorageReference::parse(&raw).is_err());
        }

        #[test]
        fn non_hex_garbage(raw in "[g-z]{32,48}") {
            let err = StorageReference::parse(&raw).unwrap_err();
            prop_assert_eq!(err.raw, raw);
        }

        #[test]
        fn output_is_always_canonical(raw in ".{0,64}") {
            if let Ok(r) = StorageReference::parse(&raw) {
                prop_assert_eq!(r.as_str().len(), CANONICAL_LEN);
                prop_assert!(is_canonical(r.as_str()));
            }
        }
    }
}
