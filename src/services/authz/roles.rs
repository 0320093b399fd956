//! Role → rights table.
//!
//! Built once at startup and shared read-only (`Arc` in `AccessPolicy`).
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Right {
    GetUsers,
    ManageUsers,
}

impl Right {
    pub fn as_str(&self) -> &'static str {
        match self {
            Right::GetUsers => "getUsers",
            Right::ManageUsers => "manageUsers",
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RoleRights {
    table: HashMap<String, HashSet<Right>>,
    none: HashSet<Right>,
}

impl RoleRights {
    pub fn new<I, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (R, Vec<Right>)>,
        R: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(role, rights)| (role.into(), rights.into_iter().collect()))
            .collect();
        Self {
            table,
            none: HashSet::new(),
        }
    }

    /// Unknown roles have no rights.
    pub fn rights(&self, role: &str) -> &HashSet<Right> {
        self.table.get(role).unwrap_or(&self.none)
    }

    pub fn has_all(&self, role: &str, required: &[Right]) -> bool {
        let granted = self.rights(role);
        required.iter().all(|r| granted.contains(r))
    }
}

impl Default for RoleRights {
    fn default() -> Self {
        Self::new([
            ("user", vec![]),
            ("admin", vec![Right::GetUsers, Right::ManageUsers]),
        ])
    }
}
