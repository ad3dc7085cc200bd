//! Who may use the broadcast (`gui`) feature.

use poise::serenity_prelude as serenity;

/// Static access policy, built once from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    require_admin_only: bool,
    allowed_role_ids: Vec<serenity::RoleId>,
}

/// The attributes of a caller that the policy looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub is_admin: bool,
    pub roles: Vec<serenity::RoleId>,
}

/// Which surface a denial is reported on, only changes the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Command,
    Feature,
}

impl AccessPolicy {
    pub fn new(require_admin_only: bool, allowed_role_ids: Vec<serenity::RoleId>) -> Self {
        Self {
            require_admin_only,
            allowed_role_ids,
        }
    }

    pub fn require_admin_only(&self) -> bool {
        self.require_admin_only
    }
}

impl Caller {
    pub fn new(is_admin: bool, roles: Vec<serenity::RoleId>) -> Self {
        Self { is_admin, roles }
    }

    pub fn from_member(member: &serenity::Member, permissions: Option<serenity::Permissions>) -> Self {
        let is_admin = permissions
            .or(member.permissions)
            .is_some_and(|p| p.administrator());
        Self::new(is_admin, member.roles.clone())
    }
}

/// Decides whether `caller` may use the broadcast feature under `policy`.
///
/// When the policy is admin-only the role list is ignored. Administrators
/// pass otherwise, then role holders. An empty role list denies everyone
/// who is not an administrator.
pub fn has_access(caller: &Caller, policy: &AccessPolicy) -> bool {
    if policy.require_admin_only {
        return caller.is_admin;
    }
    if caller.is_admin {
        return true;
    }
    if !policy.allowed_role_ids.is_empty() {
        return caller
            .roles
            .iter()
            .any(|role| policy.allowed_role_ids.contains(role));
    }
    false
}

/// Builds the message shown to a caller who was denied.
///
/// Role names are resolved through `resolve_name` at the time of the
/// denial; roles it cannot resolve are shown as `Role(<id>)`.
pub fn denial_message<F>(policy: &AccessPolicy, surface: Surface, resolve_name: F) -> String
where
    F: Fn(serenity::RoleId) -> Option<String>,
{
    let target = match surface {
        Surface::Command => "lệnh này",
        Surface::Feature => "tính năng này",
    };

    if policy.require_admin_only {
        return format!("❌ Bạn cần quyền **Admin** để sử dụng {target}!");
    }

    if !policy.allowed_role_ids.is_empty() {
        let names = policy
            .allowed_role_ids
            .iter()
            .map(|&id| resolve_name(id).unwrap_or_else(|| format!("Role({id})")))
            .collect::<Vec<_>>()
            .join(", ");
        return format!("❌ Bạn cần có một trong các role sau: **{names}**");
    }

    format!("❌ Bạn không có quyền sử dụng {target}!")
}
