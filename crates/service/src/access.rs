//! Access-policy seam consulted before service operations.
//!
//! The reconciliation engine assumes it is only reached when authorized;
//! real authorization (users, roles, environment grants) lives outside
//! this repository behind this trait. `AllowAll` is the policy for local,
//! single-user use.

use std::fmt;

/// Resource classes the policy can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Stacks,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Stacks => write!(f, "stacks"),
        }
    }
}

/// Actions the policy can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::View => write!(f, "view"),
            Action::Edit => write!(f, "edit"),
        }
    }
}

/// Authorization gate; `environment` carries the optional environment
/// scope the action targets.
pub trait AccessPolicy {
    fn can(&self, resource: Resource, action: Action, environment: Option<i64>) -> bool;
}

/// Grants everything. Suitable for local CLI use where the operating
/// system user already owns the store and the stack directories.
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn can(&self, _resource: Resource, _action: Action, _environment: Option<i64>) -> bool {
        true
    }
}

#[cfg(test)]
pub(crate) struct DenyAll;

#[cfg(test)]
impl AccessPolicy for DenyAll {
    fn can(&self, _resource: Resource, _action: Action, _environment: Option<i64>) -> bool {
        false
    }
}
