use thiserror::Error;

use crate::database::models::{StaffMember, UserRole};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("only admins may modify staff records")]
    NotAdmin,
    #[error("admins may only manage staff in their own school")]
    WrongSchool,
    #[error("you cannot archive your own staff record")]
    SelfArchive,
    #[error("staff member is already archived")]
    AlreadyArchived,
    #[error("staff member is not archived")]
    NotArchived,
}

/// The acting identity for staff-mutation guard decisions.
#[derive(Debug, Clone)]
pub struct Actor<'a> {
    pub staff_id: &'a str,
    pub emiscode: i32,
    pub role: UserRole,
}

/// The shared precondition for every staff mutation: admin role, and
/// authority over the record's current school. Superadmins cross schools
/// freely.
pub fn check_school_authority(
    actor: &Actor<'_>,
    target_emiscode: i32,
) -> Result<(), ArchiveError> {
    if !actor.role.is_admin() {
        return Err(ArchiveError::NotAdmin);
    }
    if !actor.role.is_superadmin() && actor.emiscode != target_emiscode {
        return Err(ArchiveError::WrongSchool);
    }
    Ok(())
}

/// Archive preconditions: school authority, and never one's own record.
pub fn check_archive(actor: &Actor<'_>, target: &StaffMember) -> Result<(), ArchiveError> {
    check_school_authority(actor, target.emiscode)?;
    if actor.staff_id == target.staff_id {
        return Err(ArchiveError::SelfArchive);
    }
    if target.is_archived {
        return Err(ArchiveError::AlreadyArchived);
    }
    Ok(())
}

/// Restore preconditions mirror archive, minus the self guard - restoring
/// your own record locks nobody out.
pub fn check_restore(actor: &Actor<'_>, target: &StaffMember) -> Result<(), ArchiveError> {
    check_school_authority(actor, target.emiscode)?;
    if !target.is_archived {
        return Err(ArchiveError::NotArchived);
    }
    Ok(())
}
