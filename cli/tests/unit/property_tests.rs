//! Property-based tests for configuration validation.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use kfo_cli::domain::{KfoConfig, validate_mount_folder};
use kfo_core::TenantPolicy;

proptest! {
    /// Relative folders made of plain segments are accepted.
    #[test]
    fn prop_plain_relative_folders_accepted(
        segments in prop::collection::vec("[a-z0-9_-]{1,12}", 1..4),
    ) {
        let folder = segments.join("/");
        prop_assert!(validate_mount_folder(&folder).is_ok(), "rejected: {folder}");
    }

    /// Any folder containing a parent segment is rejected.
    #[test]
    fn prop_parent_segments_rejected(
        before in prop::collection::vec("[a-z0-9]{1,8}", 0..3),
        after in prop::collection::vec("[a-z0-9]{1,8}", 0..3),
    ) {
        let mut segments = before;
        segments.push("..".to_string());
        segments.extend(after);
        let folder = segments.join("/");
        prop_assert!(validate_mount_folder(&folder).is_err(), "accepted: {folder}");
    }

    /// Absolute folders are rejected.
    #[test]
    fn prop_absolute_folders_rejected(folder in "/[a-z0-9/]{0,20}") {
        prop_assert!(validate_mount_folder(&folder).is_err(), "accepted: {folder}");
    }

    /// Namespaces without an override always get the global policy.
    #[test]
    fn prop_policy_falls_back_to_global(
        ns in "[a-z][a-z0-9-]{0,10}[a-z0-9]",
        allow_file in any::<bool>(),
        allow_mounted_file in any::<bool>(),
    ) {
        let cfg = KfoConfig {
            policy: TenantPolicy { allow_file, allow_mounted_file },
            ..KfoConfig::default()
        };
        prop_assert_eq!(cfg.policy_for(&ns), cfg.policy);
        prop_assert_eq!(cfg.tenant(&ns).policy, cfg.policy);
    }
}
