#![cfg(test)]

use poise::serenity_prelude::RoleId;
use yumbot::access::*;

fn role(id: u64) -> RoleId {
    RoleId::new(id)
}

#[test]
fn test_admin_only_policy_follows_admin_flag() {
    let policy = AccessPolicy::new(true, vec![role(1), role(2)]);

    assert!(has_access(&Caller::new(true, vec![]), &policy));
    assert!(!has_access(&Caller::new(false, vec![role(1)]), &policy));
    assert!(!has_access(&Caller::new(false, vec![role(1), role(2)]), &policy));
    assert!(has_access(&Caller::new(true, vec![role(3)]), &policy));
}

#[test]
fn test_role_policy_grants_role_holders() {
    let policy = AccessPolicy::new(false, vec![role(1), role(2)]);

    assert!(has_access(&Caller::new(false, vec![role(2)]), &policy));
    assert!(has_access(&Caller::new(false, vec![role(9), role(1)]), &policy));
    assert!(!has_access(&Caller::new(false, vec![role(3)]), &policy));
    assert!(!has_access(&Caller::new(false, vec![]), &policy));
}

#[test]
fn test_admins_bypass_role_policy() {
    let policy = AccessPolicy::new(false, vec![role(1)]);
    assert!(has_access(&Caller::new(true, vec![]), &policy));
}

#[test]
fn test_empty_policy_only_admits_admins() {
    let policy = AccessPolicy::default();

    assert!(has_access(&Caller::new(true, vec![]), &policy));
    assert!(!has_access(&Caller::new(false, vec![role(1)]), &policy));
}

#[test]
fn test_has_access_is_deterministic() {
    let policy = AccessPolicy::new(false, vec![role(5)]);
    let callers = [
        Caller::new(false, vec![role(5)]),
        Caller::new(false, vec![role(6)]),
        Caller::new(true, vec![]),
    ];
    for caller in &callers {
        assert_eq!(has_access(caller, &policy), has_access(caller, &policy));
    }
}

#[test]
fn test_denial_lists_resolved_role_names() {
    let policy = AccessPolicy::new(false, vec![role(1)]);
    let caller = Caller::new(false, vec![role(2)]);
    assert!(!has_access(&caller, &policy));

    let message = denial_message(&policy, Surface::Command, |id| {
        (id == role(1)).then(|| "Moderator".to_string())
    });
    assert_eq!(message, "❌ Bạn cần có một trong các role sau: **Moderator**");
}

#[test]
fn test_denial_substitutes_unresolvable_roles() {
    let policy = AccessPolicy::new(false, vec![role(1), role(42)]);

    let message = denial_message(&policy, Surface::Feature, |id| {
        (id == role(1)).then(|| "Moderator".to_string())
    });
    assert_eq!(
        message,
        "❌ Bạn cần có một trong các role sau: **Moderator, Role(42)**"
    );
}

#[test]
fn test_denial_for_admin_only_policy() {
    let policy = AccessPolicy::new(true, vec![role(1)]);

    let command = denial_message(&policy, Surface::Command, |_| None);
    let feature = denial_message(&policy, Surface::Feature, |_| None);
    assert_eq!(command, "❌ Bạn cần quyền **Admin** để sử dụng lệnh này!");
    assert_eq!(feature, "❌ Bạn cần quyền **Admin** để sử dụng tính năng này!");
}

#[test]
fn test_denial_for_empty_policy_is_generic() {
    let message = denial_message(&AccessPolicy::default(), Surface::Command, |_| None);
    assert_eq!(message, "❌ Bạn không có quyền sử dụng lệnh này!");
}
